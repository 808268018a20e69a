use std::{io, path::PathBuf};

use anyhow::{anyhow, Error};

use clap::Parser;

use dmap_core::{io::read, Format, Input, StreamRead};

use crate::FormatArg;

/// Check DMap file for corruption.
///
/// Prints the number of records that could be decoded, the number of records whose fields did not
/// span their declared length, and the offset of the first corrupt record, if any.
#[derive(Debug, Parser)]
pub struct Check {
    /// Input DMap file.
    ///
    /// If no file is provided, stdin will be used. Compressed input is detected automatically.
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Validate records against a SuperDARN format.
    ///
    /// Every record decoded before any corruption must contain exactly the fields of the format,
    /// with the expected types.
    #[arg(short = 'f', long, value_enum, value_name = "KIND")]
    format: Option<FormatArg>,

    /// Promote length mismatches to errors.
    ///
    /// By default, records whose fields do not span their declared length are kept with a
    /// warning. Using this flag will cause an error instead.
    #[arg(long)]
    strict: bool,
}

impl Check {
    pub fn run(self) -> Result<(), Error> {
        let input = Input::new(self.input)?;
        let read = read::Builder::default().read_from_input(&input)?;

        write_report(&mut io::stdout().lock(), &read)?;

        if let Some(corruption) = read.corruption {
            return Err(anyhow!(corruption));
        }

        if self.strict && !read.warnings.is_empty() {
            return Err(anyhow!(
                "found {} records with length mismatches",
                read.warnings.len()
            ));
        }

        let Some(format) = self.format.map(Format::from) else {
            if let Some(detected) = input.detect_format() {
                log::info!("{input} looks like {detected}, use --format to validate its records");
            }

            return Ok(());
        };

        for (i, record) in read.records.iter().enumerate() {
            format.validate(record, i)?;
        }

        log::info!("all records are valid {format}");

        Ok(())
    }
}

fn write_report<W>(writer: &mut W, read: &StreamRead) -> io::Result<()>
where
    W: io::Write,
{
    writeln!(writer, "records: {}", read.records.len())?;
    writeln!(writer, "mismatches: {}", read.warnings.len())?;

    match read.corruption_offset() {
        Some(offset) => writeln!(writer, "corruption: {offset}"),
        None => writeln!(writer, "corruption: none"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::error::ErrorKind as ClapErrorKind;

    use crate::tests::{parse_subcmd, try_parse_subcmd};

    #[test]
    fn test_parse_format() {
        let args = parse_subcmd::<Check>("dmap check --format fitacf --strict input.fitacf");

        assert_eq!(args.format, Some(FormatArg::Fitacf));
        assert!(args.strict);
        assert_eq!(args.input, Some(PathBuf::from("input.fitacf")));
    }

    #[test]
    fn test_unknown_format() {
        let result = try_parse_subcmd::<Check>("dmap check -f fit input.fitacf");

        assert_eq!(result.unwrap_err().kind(), ClapErrorKind::InvalidValue);
    }

    #[test]
    fn test_write_report() {
        let read = dmap_core::decode_stream(&[0; 20]);

        let mut dest = Vec::new();
        write_report(&mut dest, &read).unwrap();

        assert_eq!(
            String::from_utf8(dest).unwrap(),
            "records: 0\nmismatches: 0\ncorruption: 0\n"
        );
    }
}
