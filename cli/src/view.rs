use std::{fmt, io, path::PathBuf};

use anyhow::{anyhow, Error};

use clap::Parser;

use dmap_core::{io::read, ArrayValue, Decoded, Field, Input, Records, Value};

/// Print DMap records as text.
///
/// Each record is printed as a header line followed by one line per field, in the form
/// 'name: type = value'. Arrays are printed with their shape, and nested by dimension.
#[derive(Debug, Parser)]
pub struct View {
    /// Input DMap file.
    ///
    /// If no file is provided, stdin will be used. Compressed input is detected automatically.
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Records to print.
    ///
    /// Records are numbered from zero. Multiple, comma-separated values can be provided. By
    /// default, all records are printed.
    #[arg(
        short = 'r',
        long,
        use_value_delimiter = true,
        value_delimiter = ',',
        value_name = "INT,..."
    )]
    records: Option<Vec<usize>>,

    /// Precision to use when printing floats.
    #[arg(short = 'p', long, default_value_t = 6, value_name = "INT")]
    precision: usize,
}

impl View {
    pub fn run(self) -> Result<(), Error> {
        let input = Input::new(self.input)?;
        let raw = read::Builder::default().read_bytes(&mut input.open()?)?;

        let mut writer = io::stdout().lock();
        let mut n = 0;

        for (i, result) in Records::new(&raw).enumerate() {
            let decoded = result?;
            n += 1;

            if self.records.as_ref().map_or(true, |records| records.contains(&i)) {
                write_record(&mut writer, i, &decoded, self.precision)?;
            }
        }

        if let Some(missing) = self
            .records
            .as_ref()
            .and_then(|records| records.iter().find(|&&i| i >= n))
        {
            return Err(anyhow!(
                "cannot print record {missing} from input with {n} records"
            ));
        }

        Ok(())
    }
}

fn write_record<W>(writer: &mut W, i: usize, decoded: &Decoded, precision: usize) -> io::Result<()>
where
    W: io::Write,
{
    writeln!(
        writer,
        "# record {i} at offset {} ({} bytes)",
        decoded.offset, decoded.declared_len
    )?;

    for (name, field) in decoded.record.iter() {
        write!(writer, "{name}: {field} = ")?;

        match field {
            Field::Scalar(value) => write!(writer, "{}", Precise(value, precision))?,
            Field::Array(array) => write_nested(writer, array, array.shape(), 0, precision)?,
        }

        writeln!(writer)?;
    }

    Ok(())
}

fn write_nested<W>(
    writer: &mut W,
    array: &ArrayValue,
    shape: &[usize],
    start: usize,
    precision: usize,
) -> io::Result<()>
where
    W: io::Write,
{
    writer.write_all(b"[")?;

    if let Some((&n, inner)) = shape.split_first() {
        let stride: usize = inner.iter().product();

        for i in 0..n {
            if i > 0 {
                writer.write_all(b", ")?;
            }

            if inner.is_empty() {
                if let Some(value) = array.get_flat(start + i) {
                    write!(writer, "{}", Precise(&value, precision))?;
                }
            } else {
                write_nested(writer, array, inner, start + i * stride, precision)?;
            }
        }
    }

    writer.write_all(b"]")
}

struct Precise<'a>(&'a Value, usize);

impl<'a> fmt::Display for Precise<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = self.1;

        match self.0 {
            Value::Float(v) => write!(f, "{v:.precision$}"),
            Value::Double(v) => write!(f, "{v:.precision$}"),
            v => write!(f, "{v}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use dmap_core::{Array, Record};

    use crate::tests::parse_subcmd;

    #[test]
    fn test_parse_records() {
        let args = parse_subcmd::<View>("dmap view -r 0,2 -p 2 input.dmap");

        assert_eq!(args.records, Some(vec![0, 2]));
        assert_eq!(args.precision, 2);
    }

    #[test]
    fn test_write_record() {
        let mut record = Record::new();
        record.insert("stid", Value::Short(65));
        record.insert(
            "acfd",
            ArrayValue::from(Array::new(vec![0f32, 1., 2., 3., 4., 5.], [2, 3]).unwrap()),
        );
        record.insert("combf", Value::from("normalscan"));

        let decoded = Decoded {
            declared_len: record.encoded_len(),
            record,
            offset: 0,
            mismatch: None,
        };

        let mut dest = Vec::new();
        write_record(&mut dest, 0, &decoded, 1).unwrap();

        assert_eq!(
            String::from_utf8(dest).unwrap(),
            "# record 0 at offset 0 (84 bytes)\n\
            stid: short = 65\n\
            acfd: float[2x3] = [[0.0, 1.0, 2.0], [3.0, 4.0, 5.0]]\n\
            combf: string = \"normalscan\"\n"
        );
    }
}
