//! Reading and writing DMap files.
//!
//! Files are commonly distributed compressed. Compression is detected from the leading bytes
//! when reading, and decompressed in full before decoding.

use std::io::{self, Read};

use bzip2::bufread::MultiBzDecoder;
use flate2::bufread::MultiGzDecoder;

pub mod read;
pub mod write;

/// Supported compression methods.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Compression {
    /// bzip2, as used by most SuperDARN data distributions.
    Bzip2,
    /// gzip.
    Gzip,
}

impl Compression {
    const BZIP2_MAGIC_NUMBER: [u8; 3] = *b"BZh";
    const GZIP_MAGIC_NUMBER: [u8; 2] = [0x1f, 0x8b];

    /// Detects the compression method from the start of a reader, without consuming anything.
    pub fn detect<R>(reader: &mut R) -> io::Result<Option<Self>>
    where
        R: io::BufRead,
    {
        let src = reader.fill_buf()?;

        Ok(Self::detect_bytes(src))
    }

    fn detect_bytes(src: &[u8]) -> Option<Self> {
        if src.starts_with(&Self::BZIP2_MAGIC_NUMBER) {
            Some(Compression::Bzip2)
        } else if src.starts_with(&Self::GZIP_MAGIC_NUMBER) {
            Some(Compression::Gzip)
        } else {
            None
        }
    }

    fn decompress<R>(self, reader: R, dest: &mut Vec<u8>) -> io::Result<usize>
    where
        R: io::BufRead,
    {
        match self {
            Compression::Bzip2 => MultiBzDecoder::new(reader).read_to_end(dest),
            Compression::Gzip => MultiGzDecoder::new(reader).read_to_end(dest),
        }
    }
}

fn invalid_data<E>(e: E) -> io::Error
where
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    io::Error::new(io::ErrorKind::InvalidData, e)
}
