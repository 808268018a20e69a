#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Reading and writing SuperDARN DMap records.
//!
//! This serves as the core library implementation for the `dmap` CLI, but can also be used as a
//! free-standing library for working with DMap files.
//!
//! # Overview
//!
//! A DMap file is a sequence of self-describing binary [`Record`]s, each an ordered collection
//! of named fields. A field is either a single typed [`Value`], or a typed N-dimensional
//! [`ArrayValue`].
//!
//! Files are read with [`decode_stream`], which never fails on corrupt input: it returns every
//! record decoded before the first failure, along with where decoding stopped. Records are
//! written with [`encode_records`]. The SuperDARN [`Format`]s add validation of the fields
//! present in each record, and [`io`] handles files and compression.
//!
//! # Example
//!
//! ```
//! use dmap_core::{decode_stream, encode_records, ArrayValue, Record, Value};
//!
//! let mut record = Record::new();
//! record.insert("channel", Value::Char(0));
//! record.insert("qflg", ArrayValue::from(vec![1i8, 0, 1]));
//!
//! let bytes = encode_records([&record])?;
//! let read = decode_stream(&bytes);
//!
//! assert_eq!(read.records, [record]);
//! assert_eq!(read.corruption_offset(), None);
//! # Ok::<(), dmap_core::EncodeError>(())
//! ```

pub mod array;
pub use array::{Array, Shape};

pub mod cursor;
pub use cursor::Cursor;

pub mod decode;
pub use decode::{decode_record, DecodeError, Decoded, LengthMismatch};

pub mod dict;
pub use dict::{from_dict, to_dict, to_dicts, Dict, DictValue, TypeHints};

pub mod encode;
pub use encode::{encode_record, encode_records, EncodeError};

pub mod format;
pub use format::{
    read_fitacf, read_grid, read_iqdat, read_map, read_rawacf, read_snd, write_fitacf,
    write_grid, write_iqdat, write_map, write_rawacf, write_snd, Format, FormatError,
};

pub mod input;
pub use input::{Input, InputError};

pub mod io;

pub mod record;
pub use record::{ArrayValue, Field, Record};

pub mod stream;
pub use stream::{decode_stream, Corruption, Records, StreamRead};

pub mod types;
pub use types::{Type, Value};
