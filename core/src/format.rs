//! SuperDARN formats.
//!
//! Each format is a set of field groups. The first group is required; the others are optional,
//! but must be either fully present or fully absent in any record, since they are added by
//! options of the programs producing the files. No fields outside the groups are allowed, and
//! all fields must have the type given by their group.

use std::{fmt, path::Path, str::FromStr};

use crate::{
    decode::LengthMismatch,
    dict::{from_dict, to_dict, BridgeError, Dict, TypeHints},
    encode::{encode_records, EncodeError},
    record::Record,
    stream::{decode_stream, Corruption, StreamRead},
    types::Type,
};

mod tables;

/// A SuperDARN format.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Format {
    /// I&Q sample data.
    Iqdat,
    /// Raw auto-correlation functions.
    Rawacf,
    /// Fitted auto-correlation functions.
    Fitacf,
    /// Gridded velocities.
    Grid,
    /// Convection maps.
    Map,
    /// Sounding mode data.
    Snd,
}

/// A group of fields in a format.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Group {
    /// Whether the group is required.
    pub required: bool,
    /// Names and types of the fields.
    pub fields: &'static [(&'static str, Type)],
}

impl Group {
    const fn required(fields: &'static [(&'static str, Type)]) -> Self {
        Self {
            required: true,
            fields,
        }
    }

    const fn optional(fields: &'static [(&'static str, Type)]) -> Self {
        Self {
            required: false,
            fields,
        }
    }
}

const IQDAT: &[Group] = &[Group::required(tables::IQDAT)];

const RAWACF: &[Group] = &[
    Group::required(tables::RAWACF),
    Group::optional(tables::RAWACF_CORRELATION),
    Group::optional(tables::RAWACF_DIGITIZING),
    Group::optional(tables::RAWACF_FITTEX),
    Group::optional(tables::RAWACF_CROSS_CORRELATION),
];

const FITACF: &[Group] = &[
    Group::required(tables::FITACF),
    Group::optional(tables::FITACF_EXTRA),
    Group::optional(tables::FITACF_FITTED),
    Group::optional(tables::FITACF_ELEVATION),
];

const GRID: &[Group] = &[
    Group::required(tables::GRID),
    Group::optional(tables::GRID_FITTED),
    Group::optional(tables::GRID_EXTRA),
];

const MAP: &[Group] = &[
    Group::required(tables::MAP),
    Group::optional(tables::MAP_EXTRA),
    Group::optional(tables::MAP_FIT),
    Group::optional(tables::MAP_MODEL),
    Group::optional(tables::MAP_HMB),
];

const SND: &[Group] = &[
    Group::required(tables::SND),
    Group::optional(tables::SND_FITTED),
];

impl Format {
    /// All formats.
    pub const ALL: [Format; 6] = [
        Format::Iqdat,
        Format::Rawacf,
        Format::Fitacf,
        Format::Grid,
        Format::Map,
        Format::Snd,
    ];

    /// Guesses the format from the file name of a path.
    ///
    /// File names are split on `.`, and the first part naming a format is used, so that for
    /// instance `20200113.0001.00.sas.fitacf.bz2` is detected as FITACF.
    pub fn detect<P>(path: P) -> Option<Self>
    where
        P: AsRef<Path>,
    {
        let name = path.as_ref().file_name()?.to_str()?;

        name.split('.').find_map(|part| {
            Some(match part.to_ascii_lowercase().as_str() {
                "iqdat" => Format::Iqdat,
                "rawacf" => Format::Rawacf,
                "fitacf" | "fitacf3" => Format::Fitacf,
                "grid" | "grd" => Format::Grid,
                "map" | "cnvmap" => Format::Map,
                "snd" => Format::Snd,
                _ => return None,
            })
        })
    }

    /// Returns the field groups of the format, required group first.
    pub fn groups(&self) -> &'static [Group] {
        match self {
            Format::Iqdat => IQDAT,
            Format::Rawacf => RAWACF,
            Format::Fitacf => FITACF,
            Format::Grid => GRID,
            Format::Map => MAP,
            Format::Snd => SND,
        }
    }

    /// Returns the expected type of a field, or `None` if the field is not part of the format.
    pub fn field_type(&self, name: &str) -> Option<Type> {
        self.fields()
            .find(|(field, _)| *field == name)
            .map(|(_, ty)| ty)
    }

    fn fields(&self) -> impl Iterator<Item = (&'static str, Type)> {
        self.groups()
            .iter()
            .flat_map(|group| group.fields.iter().copied())
    }

    /// Returns the lowercase name of the format.
    pub fn name(&self) -> &'static str {
        match self {
            Format::Iqdat => "iqdat",
            Format::Rawacf => "rawacf",
            Format::Fitacf => "fitacf",
            Format::Grid => "grid",
            Format::Map => "map",
            Format::Snd => "snd",
        }
    }

    /// Decodes a buffer, validating every decoded record.
    ///
    /// Records after a corruption are not validated, since they are not decoded.
    pub fn read(&self, src: &[u8]) -> Result<StreamRead, FormatError> {
        let read = decode_stream(src);

        for (i, record) in read.records.iter().enumerate() {
            self.validate(record, i)?;
        }

        log::debug!("validated {} {self} records", read.records.len());

        Ok(read)
    }

    /// Decodes a buffer into dictionaries, validating every decoded record.
    pub fn read_dicts(&self, src: &[u8]) -> Result<DictRead, FormatError> {
        let StreamRead {
            records,
            corruption,
            warnings,
        } = self.read(src)?;

        Ok(DictRead {
            records: records.iter().map(to_dict).collect(),
            corruption,
            warnings,
        })
    }

    /// Returns type hints for all fields in the format.
    pub fn type_hints(&self) -> TypeHints {
        self.fields().collect()
    }

    /// Checks that a record conforms to the format.
    ///
    /// The record number is only used for error reporting.
    pub fn validate(&self, record: &Record, record_number: usize) -> Result<(), FormatError> {
        let missing: Vec<String> = self
            .groups()
            .iter()
            .flat_map(|group| {
                let missing: Vec<_> = group
                    .fields
                    .iter()
                    .filter(|(name, _)| !record.contains(name))
                    .map(|(name, _)| name.to_string())
                    .collect();

                if group.required || missing.len() < group.fields.len() {
                    missing
                } else {
                    Vec::new()
                }
            })
            .collect();

        if !missing.is_empty() {
            return Err(FormatError::MissingFields {
                format: *self,
                record: record_number,
                fields: missing,
            });
        }

        let extra: Vec<String> = record
            .names()
            .filter(|name| self.field_type(name).is_none())
            .map(String::from)
            .collect();

        if !extra.is_empty() {
            return Err(FormatError::ExtraFields {
                format: *self,
                record: record_number,
                fields: extra,
            });
        }

        let incorrect: Vec<IncorrectType> = record
            .iter()
            .filter_map(|(name, field)| {
                let expected = self.field_type(name)?;
                let found = field.ty();
                (expected != found).then(|| IncorrectType {
                    field: name.clone(),
                    expected,
                    found,
                })
            })
            .collect();

        if !incorrect.is_empty() {
            return Err(FormatError::IncorrectTypes {
                format: *self,
                record: record_number,
                fields: incorrect,
            });
        }

        Ok(())
    }

    /// Validates and encodes records.
    ///
    /// Nothing is encoded unless every record is valid.
    pub fn write<'a, I>(&self, records: I) -> Result<Vec<u8>, WriteError>
    where
        I: IntoIterator<Item = &'a Record>,
        I::IntoIter: Clone,
    {
        let records = records.into_iter();

        for (i, record) in records.clone().enumerate() {
            self.validate(record, i)?;
        }

        Ok(encode_records(records)?)
    }

    /// Converts dictionaries to records using the types of the format, then validates and encodes
    /// them.
    pub fn write_dicts<'a, I>(&self, dicts: I) -> Result<Vec<u8>, WriteError>
    where
        I: IntoIterator<Item = &'a Dict>,
    {
        let hints = self.type_hints();

        let records = dicts
            .into_iter()
            .map(|dict| from_dict(dict, &hints))
            .collect::<Result<Vec<_>, _>>()?;

        self.write(&records)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name().to_ascii_uppercase())
    }
}

impl FromStr for Format {
    type Err = ParseFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseFormatError(s.to_string()))
    }
}

/// An error associated with parsing a format name.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseFormatError(String);

impl fmt::Display for ParseFormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown format '{}'", self.0)
    }
}

impl std::error::Error for ParseFormatError {}

/// The result of reading a format as dictionaries.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DictRead {
    /// Records decoded before any corruption, in file order.
    pub records: Vec<Dict>,
    /// The first record that failed to decode, if any.
    pub corruption: Option<Corruption>,
    /// Records whose fields did not span their declared size.
    pub warnings: Vec<LengthMismatch>,
}

macro_rules! impl_format_io {
    ($($read:ident, $write:ident => $format:ident),* $(,)?) => {
        $(
            #[doc = concat!("Decodes ", stringify!($format), " records into dictionaries.")]
            ///
            /// See [`Format::read_dicts`].
            pub fn $read(src: &[u8]) -> Result<DictRead, FormatError> {
                Format::$format.read_dicts(src)
            }

            #[doc = concat!("Encodes dictionaries as ", stringify!($format), " records.")]
            ///
            /// See [`Format::write_dicts`].
            pub fn $write<'a, I>(dicts: I) -> Result<Vec<u8>, WriteError>
            where
                I: IntoIterator<Item = &'a Dict>,
            {
                Format::$format.write_dicts(dicts)
            }
        )*
    };
}

impl_format_io! {
    read_iqdat, write_iqdat => Iqdat,
    read_rawacf, write_rawacf => Rawacf,
    read_fitacf, write_fitacf => Fitacf,
    read_grid, write_grid => Grid,
    read_map, write_map => Map,
    read_snd, write_snd => Snd,
}

/// A field with a type other than the one expected by the format.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IncorrectType {
    /// Name of the field.
    pub field: String,
    /// Type expected by the format.
    pub expected: Type,
    /// Type of the field in the record.
    pub found: Type,
}

/// An error associated with a record not conforming to a format.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FormatError {
    /// Fields of the required group, or of a partially present optional group, are missing.
    MissingFields {
        /// The format.
        format: Format,
        /// Number of the record, counting from zero.
        record: usize,
        /// Names of the missing fields.
        fields: Vec<String>,
    },
    /// The record has fields that are not part of the format.
    ExtraFields {
        /// The format.
        format: Format,
        /// Number of the record, counting from zero.
        record: usize,
        /// Names of the extra fields.
        fields: Vec<String>,
    },
    /// Fields have unexpected types.
    IncorrectTypes {
        /// The format.
        format: Format,
        /// Number of the record, counting from zero.
        record: usize,
        /// The fields with unexpected types.
        fields: Vec<IncorrectType>,
    },
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::MissingFields {
                format,
                record,
                fields,
            } => write!(
                f,
                "{format} record {record} is missing fields: {}",
                fields.join(", ")
            ),
            FormatError::ExtraFields {
                format,
                record,
                fields,
            } => write!(
                f,
                "{format} record {record} has unexpected fields: {}",
                fields.join(", ")
            ),
            FormatError::IncorrectTypes {
                format,
                record,
                fields,
            } => {
                write!(f, "{format} record {record} has fields of incorrect type: ")?;
                for (i, IncorrectType {
                    field,
                    expected,
                    found,
                }) in fields.iter().enumerate()
                {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{field} ({found}, expected {expected})")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for FormatError {}

/// An error associated with writing a format.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum WriteError {
    /// A dictionary could not be converted to a record.
    Bridge(BridgeError),
    /// A record does not conform to the format.
    Format(FormatError),
    /// A record could not be encoded.
    Encode(EncodeError),
}

impl From<BridgeError> for WriteError {
    fn from(e: BridgeError) -> Self {
        Self::Bridge(e)
    }
}

impl From<FormatError> for WriteError {
    fn from(e: FormatError) -> Self {
        Self::Format(e)
    }
}

impl From<EncodeError> for WriteError {
    fn from(e: EncodeError) -> Self {
        Self::Encode(e)
    }
}

impl fmt::Display for WriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteError::Bridge(e) => write!(f, "{e}"),
            WriteError::Format(e) => write!(f, "{e}"),
            WriteError::Encode(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for WriteError {}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    use crate::{
        array::Array,
        record::{ArrayValue, Field},
        types::Value,
    };

    /// Returns a record with every field of the given groups, with arbitrary values.
    pub(crate) fn record_with(groups: &[Group]) -> Record {
        let mut record = Record::new();

        for group in groups {
            for &(name, ty) in group.fields {
                let field = match ty {
                    Type::Char => Field::Array(ArrayValue::from(vec![1i8, 0])),
                    Type::Short => Field::Scalar(Value::Short(2)),
                    Type::Int => Field::Scalar(Value::Int(3)),
                    Type::Float => Field::Array(ArrayValue::from(
                        Array::new(vec![0.5f32; 4], [2, 2]).unwrap(),
                    )),
                    Type::Double => Field::Scalar(Value::Double(4.5)),
                    Type::String => Field::Scalar(Value::from("make_fit")),
                    Type::Long => Field::Scalar(Value::Long(5)),
                    Type::Uchar => Field::Scalar(Value::Uchar(6)),
                    Type::Ushort => Field::Scalar(Value::Ushort(7)),
                    Type::Uint => Field::Scalar(Value::Uint(8)),
                    Type::Ulong => Field::Scalar(Value::Ulong(9)),
                };
                record.insert(name, field);
            }
        }

        record
    }

    #[test]
    fn test_detect() {
        assert_eq!(
            Format::detect("data/20200113.0001.00.sas.fitacf.bz2"),
            Some(Format::Fitacf)
        );
        assert_eq!(
            Format::detect("20180101.0000.03.rkn.RAWACF"),
            Some(Format::Rawacf)
        );
        assert_eq!(Format::detect("20150302.n.map"), Some(Format::Map));
        assert_eq!(Format::detect("20150302.grd.gz"), Some(Format::Grid));
        assert_eq!(Format::detect("20150302.mapping"), None);
        assert_eq!(Format::detect("fitacf/records.dat"), None);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("SND".parse(), Ok(Format::Snd));
        assert_eq!("iqdat".parse(), Ok(Format::Iqdat));
        assert!("fit".parse::<Format>().is_err());
    }

    #[test]
    fn test_validate_all_groups() {
        for format in Format::ALL {
            let record = record_with(format.groups());
            assert_eq!(format.validate(&record, 0), Ok(()), "{format}");
        }
    }

    #[test]
    fn test_validate_required_group_only() {
        for format in Format::ALL {
            let record = record_with(&format.groups()[..1]);
            assert_eq!(format.validate(&record, 0), Ok(()), "{format}");
        }
    }

    #[test]
    fn test_missing_required_field() {
        let mut record = record_with(Format::Fitacf.groups());
        record.remove("cp");

        assert_eq!(
            Format::Fitacf.validate(&record, 3),
            Err(FormatError::MissingFields {
                format: Format::Fitacf,
                record: 3,
                fields: vec![String::from("cp")]
            })
        );
    }

    #[test]
    fn test_partial_optional_group() {
        let groups = Format::Fitacf.groups();
        let mut record = record_with(&groups[..1]);
        record.insert("elv", ArrayValue::from(vec![0.5f32]));
        record.insert("phi0", ArrayValue::from(vec![0.5f32]));

        let Err(FormatError::MissingFields { fields, .. }) = Format::Fitacf.validate(&record, 0)
        else {
            panic!("expected missing fields");
        };

        assert_eq!(fields.len(), tables::FITACF_ELEVATION.len() - 2);
        assert!(fields.iter().any(|field| field == "x_qflg"));
        assert!(!fields.iter().any(|field| field == "elv"));
    }

    #[test]
    fn test_extra_field() {
        let mut record = record_with(Format::Grid.groups());
        record.insert("vector.foo", Value::Short(1));

        assert_eq!(
            Format::Grid.validate(&record, 0),
            Err(FormatError::ExtraFields {
                format: Format::Grid,
                record: 0,
                fields: vec![String::from("vector.foo")]
            })
        );
    }

    #[test]
    fn test_incorrect_type() {
        let mut record = record_with(Format::Snd.groups());
        record.insert("stid", Value::Int(65));

        assert_eq!(
            Format::Snd.validate(&record, 1),
            Err(FormatError::IncorrectTypes {
                format: Format::Snd,
                record: 1,
                fields: vec![IncorrectType {
                    field: String::from("stid"),
                    expected: Type::Short,
                    found: Type::Int,
                }]
            })
        );
    }

    #[test]
    fn test_read_validates() {
        let records = vec![
            record_with(Format::Map.groups()),
            record_with(&Format::Map.groups()[..2]),
        ];
        let src = encode_records(&records).unwrap();

        let read = Format::Map.read(&src).unwrap();
        assert_eq!(read.records, records);

        // Every GRID field is also a MAP field, so MAP records only have extra fields.
        assert!(matches!(
            Format::Grid.read(&src),
            Err(FormatError::ExtraFields { record: 0, .. })
        ));
        assert!(matches!(
            Format::Snd.read(&src),
            Err(FormatError::MissingFields { record: 0, .. })
        ));
    }

    #[test]
    fn test_write_dicts_round_trip() {
        let records = vec![record_with(Format::Rawacf.groups())];
        let dicts: Vec<_> = records.iter().map(to_dict).collect();

        let src = write_rawacf(&dicts).unwrap();
        let read = read_rawacf(&src).unwrap();

        assert_eq!(read.records, dicts);
        assert_eq!(read.corruption, None);
        assert_eq!(src, encode_records(&records).unwrap());
    }

    #[test]
    fn test_write_rejects_invalid_records() {
        let mut record = record_with(Format::Iqdat.groups());
        record.remove("data");

        assert!(matches!(
            Format::Iqdat.write([&record]),
            Err(WriteError::Format(FormatError::MissingFields { .. }))
        ));

        let dicts = vec![Dict::from([(String::from("cp"), crate::DictValue::from("x"))])];
        assert!(matches!(
            write_iqdat(&dicts),
            Err(WriteError::Bridge(BridgeError::IncompatibleHint { .. }))
        ));
    }
}
