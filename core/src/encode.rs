//! Encoding records.
//!
//! Encoding is the exact inverse of [`decode_record`](crate::decode::decode_record): scalars are
//! written in insertion order, then arrays in insertion order, behind a 16-byte header.

use std::fmt;

use crate::{
    decode::ENCODING_IDENTIFIER,
    record::{ArrayValue, Field, Record},
    types::{Type, Value},
};

/// Encodes a single record.
///
/// The record is validated in full before anything is written, so on error `dest` is left
/// untouched.
pub fn encode_record(record: &Record, dest: &mut Vec<u8>) -> Result<(), EncodeError> {
    validate(record)?;
    write_record(record, dest);
    Ok(())
}

/// Encodes a sequence of records into a new buffer.
///
/// Every record is validated before any byte is produced.
pub fn encode_records<'a, I>(records: I) -> Result<Vec<u8>, EncodeError>
where
    I: IntoIterator<Item = &'a Record>,
    I::IntoIter: Clone,
{
    let records = records.into_iter();

    let mut len = 0usize;
    for record in records.clone() {
        validate(record)?;
        len += record.encoded_len();
    }

    let mut dest = Vec::with_capacity(len);
    let mut n = 0;
    for record in records {
        write_record(record, &mut dest);
        n += 1;
    }

    log::debug!("encoded {n} records ({} bytes)", dest.len());

    Ok(dest)
}

/// Checks that a record can be encoded.
pub fn validate(record: &Record) -> Result<(), EncodeError> {
    for (name, field) in record.iter() {
        if name.as_bytes().contains(&0) {
            return Err(EncodeError::InteriorNul {
                field: name.clone(),
            });
        }

        match field {
            Field::Scalar(Value::String(s)) if s.as_bytes().contains(&0) => {
                return Err(EncodeError::InteriorNul {
                    field: name.clone(),
                });
            }
            Field::Scalar(_) => (),
            Field::Array(ArrayValue::String(_)) => {
                return Err(EncodeError::UnsupportedType {
                    field: name.clone(),
                    ty: Type::String,
                });
            }
            Field::Array(array) => {
                let shape = array.shape();
                let reason = if shape.is_empty() {
                    Some(InvalidShapeReason::NoDimensions)
                } else if shape.iter().any(|&n| n == 0) {
                    Some(InvalidShapeReason::EmptyDimension)
                } else if shape.len() > i32::MAX as usize
                    || shape.iter().any(|&n| n > i32::MAX as usize)
                {
                    Some(InvalidShapeReason::TooLarge)
                } else {
                    None
                };

                if let Some(reason) = reason {
                    return Err(EncodeError::InvalidShape {
                        field: name.clone(),
                        reason,
                    });
                }
            }
        }
    }

    let len = record.encoded_len();
    if i32::try_from(len).is_err() {
        return Err(EncodeError::RecordTooLarge { len });
    }

    Ok(())
}

fn write_record(record: &Record, dest: &mut Vec<u8>) {
    let start = dest.len();
    let scalars = record.scalars().count();
    let arrays = record.len() - scalars;

    // Length is filled in after the body is written.
    dest.extend(ENCODING_IDENTIFIER.to_le_bytes());
    dest.extend(0i32.to_le_bytes());
    dest.extend((scalars as i32).to_le_bytes());
    dest.extend((arrays as i32).to_le_bytes());

    for (name, value) in record.scalars() {
        write_name(name, value.ty(), dest);
        value.write_to(dest);
    }

    for (name, array) in record.arrays() {
        write_name(name, array.ty(), dest);

        let wire_shape = array.shape().to_wire();
        dest.extend((wire_shape.len() as i32).to_le_bytes());
        for n in wire_shape {
            dest.extend((n as i32).to_le_bytes());
        }

        array.write_values(dest);
    }

    let len = (dest.len() - start) as i32;
    dest[start + 4..start + 8].copy_from_slice(&len.to_le_bytes());
}

fn write_name(name: &str, ty: Type, dest: &mut Vec<u8>) {
    dest.extend(name.as_bytes());
    dest.push(0);
    dest.push(ty.tag());
}

/// The reason an array shape cannot be encoded.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InvalidShapeReason {
    /// The shape has no dimensions.
    NoDimensions,
    /// A dimension has size zero.
    EmptyDimension,
    /// A dimension, or the number of dimensions, does not fit in an `i32`.
    TooLarge,
}

impl fmt::Display for InvalidShapeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidShapeReason::NoDimensions => f.write_str("array has no dimensions"),
            InvalidShapeReason::EmptyDimension => f.write_str("array has an empty dimension"),
            InvalidShapeReason::TooLarge => f.write_str("array dimension too large"),
        }
    }
}

/// An error associated with encoding a record.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum EncodeError {
    /// The field has a type that cannot be written in its position.
    UnsupportedType {
        /// Name of the field.
        field: String,
        /// The unsupported type.
        ty: Type,
    },
    /// The shape of an array field cannot be written.
    InvalidShape {
        /// Name of the field.
        field: String,
        /// What is wrong with the shape.
        reason: InvalidShapeReason,
    },
    /// A field name or string value contains a null byte.
    InteriorNul {
        /// Name of the field.
        field: String,
    },
    /// The record does not fit in the size field of the header.
    RecordTooLarge {
        /// Encoded length of the record.
        len: usize,
    },
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeError::UnsupportedType { field, ty } => {
                write!(f, "cannot write field '{field}': {ty} arrays are not supported")
            }
            EncodeError::InvalidShape { field, reason } => {
                write!(f, "cannot write field '{field}': {reason}")
            }
            EncodeError::InteriorNul { field } => {
                write!(f, "cannot write field '{field}': contains a null byte")
            }
            EncodeError::RecordTooLarge { len } => {
                write!(f, "cannot write record of {len} bytes")
            }
        }
    }
}

impl std::error::Error for EncodeError {}
