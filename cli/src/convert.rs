use std::path::PathBuf;

use anyhow::{anyhow, Error};

use clap::Parser;

use dmap_core::{io, Format, Input};

use crate::{CompressionArg, FormatArg};

/// Re-encode DMap file.
///
/// Records are decoded and encoded again, optionally validating them against a SuperDARN format
/// and changing the compression.
#[derive(Debug, Parser)]
pub struct Convert {
    /// Input DMap file.
    ///
    /// If no file is provided, stdin will be used. Compressed input is detected automatically.
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output path.
    ///
    /// If no path is given, records will be written to stdout.
    #[arg(short = 'o', long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Output compression.
    #[arg(short = 'c', long, value_enum, default_value_t = CompressionArg::None)]
    compression: CompressionArg,

    /// Validate records against a SuperDARN format.
    ///
    /// Nothing is written unless every record is valid.
    #[arg(short = 'f', long, value_enum, value_name = "KIND")]
    format: Option<FormatArg>,

    /// Write the records preceding corruption in the input.
    ///
    /// By default, corrupt input is an error and nothing is written.
    #[arg(long)]
    partial: bool,
}

impl Convert {
    pub fn run(self) -> Result<(), Error> {
        let input = Input::new(self.input)?;
        let read = io::read::Builder::default().read_from_input(&input)?;

        if let Some(corruption) = read.corruption {
            if self.partial {
                log::warn!(
                    "writing {} records preceding corruption at offset {}",
                    read.records.len(),
                    corruption.offset
                );
            } else {
                return Err(anyhow!(corruption));
            }
        }

        let mut builder = io::write::Builder::default().set_compression(self.compression.into());
        if let Some(format) = self.format {
            builder = builder.set_format(Format::from(format));
        }

        builder.write_to_path_or_stdout(self.output, &read.records)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::tests::parse_subcmd;

    #[test]
    fn test_parse_defaults() {
        let args = parse_subcmd::<Convert>("dmap convert input.fitacf");

        assert_eq!(args.compression, CompressionArg::None);
        assert_eq!(args.format, None);
        assert_eq!(args.output, None);
        assert!(!args.partial);
    }

    #[test]
    fn test_parse_compression() {
        let args = parse_subcmd::<Convert>(
            "dmap convert -c bzip2 -f rawacf -o output.rawacf.bz2 input.rawacf",
        );

        assert_eq!(args.compression, CompressionArg::Bzip2);
        assert_eq!(args.format, Some(FormatArg::Rawacf));
        assert_eq!(args.output, Some(PathBuf::from("output.rawacf.bz2")));
    }
}
