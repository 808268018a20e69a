//! Utilities for writing DMap files.

use std::{
    fs::File,
    io::{self, Write as _},
    path::Path,
};

use crate::{encode::encode_records, format::Format, Record};

use super::{invalid_data, Compression};

/// A builder to write DMap records.
#[derive(Debug, Default)]
pub struct Builder {
    compression: Option<Compression>,
    format: Option<Format>,
}

impl Builder {
    /// Set compression method.
    ///
    /// If unset, records will be written uncompressed.
    pub fn set_compression(mut self, compression: Option<Compression>) -> Self {
        self.compression = compression;
        self
    }

    /// Set format used to validate records before writing.
    ///
    /// If unset, records are not validated against any format.
    pub fn set_format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }

    /// Write records to writer.
    ///
    /// Records are validated and encoded in full before anything is written, so invalid records
    /// result in an error of kind [`io::ErrorKind::InvalidData`] and no output.
    pub fn write<W>(self, writer: &mut W, records: &[Record]) -> io::Result<()>
    where
        W: io::Write,
    {
        let raw = self.encode(records)?;
        self.write_raw(writer, &raw)?;

        log::debug!("wrote {} records", records.len());

        Ok(())
    }

    fn encode(&self, records: &[Record]) -> io::Result<Vec<u8>> {
        match self.format {
            Some(format) => format.write(records).map_err(invalid_data),
            None => encode_records(records).map_err(invalid_data),
        }
    }

    fn write_raw<W>(&self, writer: &mut W, raw: &[u8]) -> io::Result<()>
    where
        W: io::Write,
    {
        match self.compression {
            Some(Compression::Bzip2) => {
                let mut encoder = bzip2::write::BzEncoder::new(writer, bzip2::Compression::best());
                encoder.write_all(raw)?;
                encoder.finish()?;
            }
            Some(Compression::Gzip) => {
                let mut encoder =
                    flate2::write::GzEncoder::new(writer, flate2::Compression::default());
                encoder.write_all(raw)?;
                encoder.finish()?;
            }
            None => writer.write_all(raw)?,
        }

        Ok(())
    }

    /// Write records to stdout.
    pub fn write_to_stdout(self, records: &[Record]) -> io::Result<()> {
        self.write(&mut io::stdout().lock(), records)
    }

    /// Write records to path.
    ///
    /// If path already exists, it will be overwritten. The file is not created if records are
    /// invalid.
    pub fn write_to_path<P>(self, path: P, records: &[Record]) -> io::Result<()>
    where
        P: AsRef<Path>,
    {
        let raw = self.encode(records)?;

        let mut writer = io::BufWriter::new(File::create(path)?);
        self.write_raw(&mut writer, &raw)?;
        writer.flush()?;

        log::debug!("wrote {} records", records.len());

        Ok(())
    }

    /// Write records to path or stdout.
    ///
    /// If the provided path is `None`, write to stdout.
    /// If path already exists, it will be overwritten.
    pub fn write_to_path_or_stdout<P>(self, path: Option<P>, records: &[Record]) -> io::Result<()>
    where
        P: AsRef<Path>,
    {
        match path {
            Some(path) => self.write_to_path(path, records),
            None => self.write_to_stdout(records),
        }
    }
}
