//! Utilities for reading DMap files.

use std::{
    fs::File,
    io,
    path::Path,
};

use crate::{format::Format, input::Input, stream::decode_stream, StreamRead};

use super::{invalid_data, Compression};

/// A builder to read DMap records.
#[derive(Debug, Default)]
pub struct Builder {
    compression: Option<Option<Compression>>,
    format: Option<Format>,
}

impl Builder {
    /// Read raw, decompressed bytes from reader.
    pub fn read_bytes<R>(&self, reader: &mut R) -> io::Result<Vec<u8>>
    where
        R: io::BufRead,
    {
        let compression = match self.compression {
            Some(compression) => compression,
            None => Compression::detect(reader)?,
        };

        let mut raw = Vec::new();
        match compression {
            Some(compression) => {
                compression.decompress(reader, &mut raw)?;
                log::debug!("decompressed {compression:?} input to {} bytes", raw.len());
            }
            None => {
                reader.read_to_end(&mut raw)?;
            }
        }

        Ok(raw)
    }

    /// Read records from reader.
    ///
    /// Corruption in the input is not an error, see [`StreamRead::corruption`]. If a format is
    /// set, records failing validation cause an error of kind [`io::ErrorKind::InvalidData`].
    pub fn read<R>(self, reader: &mut R) -> io::Result<StreamRead>
    where
        R: io::BufRead,
    {
        let raw = self.read_bytes(reader)?;

        match self.format {
            Some(format) => format.read(&raw).map_err(invalid_data),
            None => Ok(decode_stream(&raw)),
        }
    }

    /// Read records from input.
    pub fn read_from_input(self, input: &Input) -> io::Result<StreamRead> {
        log::debug!("reading records from {input}");

        self.read(&mut input.open()?)
    }

    /// Read records from path.
    pub fn read_from_path<P>(self, path: P) -> io::Result<StreamRead>
    where
        P: AsRef<Path>,
    {
        self.read(&mut io::BufReader::new(File::open(path)?))
    }

    /// Read records from path or stdin.
    ///
    /// If the provided path is `None`, read from stdin.
    pub fn read_from_path_or_stdin<P>(self, path: Option<P>) -> io::Result<StreamRead>
    where
        P: AsRef<Path>,
    {
        match path {
            Some(path) => self.read_from_path(path),
            None => self.read_from_stdin(),
        }
    }

    /// Read records from stdin.
    pub fn read_from_stdin(self) -> io::Result<StreamRead> {
        self.read(&mut io::stdin().lock())
    }

    /// Set compression method.
    ///
    /// If unset, the compression method will automatically be detected when reading. Setting
    /// `None` reads the input as uncompressed.
    pub fn set_compression(mut self, compression: Option<Compression>) -> Self {
        self.compression = Some(compression);
        self
    }

    /// Set format used to validate records.
    ///
    /// If unset, records are not validated.
    pub fn set_format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write as _;

    use crate::{encode::encode_records, format::tests::record_with, record::Record, Value};

    fn records() -> Vec<Record> {
        (0..3)
            .map(|i| {
                let mut record = Record::new();
                record.insert("bmnum", Value::Short(i));
                record.insert("combf", Value::from("$Id: normalscan"));
                record
            })
            .collect()
    }

    #[test]
    fn test_read_uncompressed() {
        let records = records();
        let src = encode_records(&records).unwrap();

        let read = Builder::default().read(&mut &src[..]).unwrap();

        assert_eq!(read.records, records);
        assert!(read.is_clean());
    }

    #[test]
    fn test_read_bzip2() {
        let records = records();
        let src = encode_records(&records).unwrap();

        let mut encoder =
            bzip2::write::BzEncoder::new(Vec::new(), bzip2::Compression::default());
        encoder.write_all(&src).unwrap();
        let compressed = encoder.finish().unwrap();

        let read = Builder::default().read(&mut &compressed[..]).unwrap();

        assert_eq!(read.records, records);
    }

    #[test]
    fn test_read_gzip() {
        let records = records();
        let src = encode_records(&records).unwrap();

        let mut encoder =
            flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(&src).unwrap();
        let compressed = encoder.finish().unwrap();

        let read = Builder::default().read(&mut &compressed[..]).unwrap();

        assert_eq!(read.records, records);
    }

    #[test]
    fn test_read_forced_uncompressed() {
        let src = b"BZh9 is not a valid record".to_vec();

        let read = Builder::default()
            .set_compression(None)
            .read(&mut &src[..])
            .unwrap();

        assert!(read.records.is_empty());
        assert_eq!(read.corruption_offset(), Some(0));
    }

    #[test]
    fn test_read_with_format() {
        let src = encode_records(&records()).unwrap();

        let result = Builder::default()
            .set_format(Format::Fitacf)
            .read(&mut &src[..]);
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::InvalidData);

        let records = vec![record_with(Format::Fitacf.groups())];
        let src = encode_records(&records).unwrap();

        let read = Builder::default()
            .set_format(Format::Fitacf)
            .read(&mut &src[..])
            .unwrap();
        assert_eq!(read.records, records);
    }
}
