//! Conversion between records and plain dictionaries.
//!
//! A [`Dict`] erases the wire width of each field: all signed integers become `i64`, all
//! unsigned integers `u64`, and all floats `f64`. Converting back to a [`Record`] therefore
//! requires [`TypeHints`] giving the wire type of every field.

use std::fmt;

use indexmap::IndexMap;

use crate::{
    array::Array,
    record::{ArrayValue, Field, Record},
    types::{Type, Value},
};

/// A plain dictionary view of a record.
pub type Dict = IndexMap<String, DictValue>;

/// A plain value in a [`Dict`].
#[derive(Clone, Debug, PartialEq)]
pub enum DictValue {
    /// A signed integer.
    Int(i64),
    /// An unsigned integer.
    UInt(u64),
    /// A float.
    Float(f64),
    /// A string.
    String(String),
    /// An array of signed integers.
    IntArray(Array<i64>),
    /// An array of unsigned integers.
    UIntArray(Array<u64>),
    /// An array of floats.
    FloatArray(Array<f64>),
    /// An array of strings.
    StringArray(Array<String>),
}

macro_rules! impl_dict_value_from {
    ($($native:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$native> for DictValue {
                fn from(v: $native) -> Self {
                    DictValue::$variant(v)
                }
            }
        )*
    };
}

impl_dict_value_from! {
    i64 => Int,
    u64 => UInt,
    f64 => Float,
    String => String,
    Array<i64> => IntArray,
    Array<u64> => UIntArray,
    Array<f64> => FloatArray,
    Array<String> => StringArray,
}

impl From<&str> for DictValue {
    fn from(v: &str) -> Self {
        DictValue::String(v.to_string())
    }
}

impl From<&Value> for DictValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Char(v) => DictValue::Int(i64::from(*v)),
            Value::Short(v) => DictValue::Int(i64::from(*v)),
            Value::Int(v) => DictValue::Int(i64::from(*v)),
            Value::Float(v) => DictValue::Float(f64::from(*v)),
            Value::Double(v) => DictValue::Float(*v),
            Value::String(v) => DictValue::String(v.clone()),
            Value::Long(v) => DictValue::Int(*v),
            Value::Uchar(v) => DictValue::UInt(u64::from(*v)),
            Value::Ushort(v) => DictValue::UInt(u64::from(*v)),
            Value::Uint(v) => DictValue::UInt(u64::from(*v)),
            Value::Ulong(v) => DictValue::UInt(*v),
        }
    }
}

impl From<&ArrayValue> for DictValue {
    fn from(array: &ArrayValue) -> Self {
        match array {
            ArrayValue::Char(a) => DictValue::IntArray(a.map(|&v| i64::from(v))),
            ArrayValue::Short(a) => DictValue::IntArray(a.map(|&v| i64::from(v))),
            ArrayValue::Int(a) => DictValue::IntArray(a.map(|&v| i64::from(v))),
            ArrayValue::Float(a) => DictValue::FloatArray(a.map(|&v| f64::from(v))),
            ArrayValue::Double(a) => DictValue::FloatArray(a.clone()),
            ArrayValue::String(a) => DictValue::StringArray(a.clone()),
            ArrayValue::Long(a) => DictValue::IntArray(a.clone()),
            ArrayValue::Uchar(a) => DictValue::UIntArray(a.map(|&v| u64::from(v))),
            ArrayValue::Ushort(a) => DictValue::UIntArray(a.map(|&v| u64::from(v))),
            ArrayValue::Uint(a) => DictValue::UIntArray(a.map(|&v| u64::from(v))),
            ArrayValue::Ulong(a) => DictValue::UIntArray(a.clone()),
        }
    }
}

/// Wire types for the fields of a [`Dict`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TypeHints(IndexMap<String, Type>);

impl TypeHints {
    /// Creates an empty set of hints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates hints matching the field types of an existing record.
    pub fn from_record(record: &Record) -> Self {
        record
            .iter()
            .map(|(name, field)| (name.clone(), field.ty()))
            .collect()
    }

    /// Returns the hint for a field.
    pub fn get(&self, field: &str) -> Option<Type> {
        self.0.get(field).copied()
    }

    /// Sets the hint for a field, returning the previous hint, if any.
    pub fn insert<S>(&mut self, field: S, ty: Type) -> Option<Type>
    where
        S: Into<String>,
    {
        self.0.insert(field.into(), ty)
    }

    /// Returns the number of hints.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no hints.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S> Extend<(S, Type)> for TypeHints
where
    S: Into<String>,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = (S, Type)>,
    {
        self.0
            .extend(iter.into_iter().map(|(field, ty)| (field.into(), ty)))
    }
}

impl<S> FromIterator<(S, Type)> for TypeHints
where
    S: Into<String>,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (S, Type)>,
    {
        let mut hints = Self::new();
        hints.extend(iter);
        hints
    }
}

/// Converts a record to a dictionary.
///
/// This is lossy: the wire width of each field is not kept.
pub fn to_dict(record: &Record) -> Dict {
    record
        .iter()
        .map(|(name, field)| {
            let value = match field {
                Field::Scalar(value) => DictValue::from(value),
                Field::Array(array) => DictValue::from(array),
            };
            (name.clone(), value)
        })
        .collect()
}

/// Converts records to dictionaries.
pub fn to_dicts<'a, I>(records: I) -> Vec<Dict>
where
    I: IntoIterator<Item = &'a Record>,
{
    records.into_iter().map(to_dict).collect()
}

/// Converts a dictionary to a record, using hints for the wire type of each field.
///
/// Fields keep the order of the dictionary.
pub fn from_dict(dict: &Dict, hints: &TypeHints) -> Result<Record, BridgeError> {
    let mut record = Record::new();

    for (name, value) in dict.iter() {
        let hint = hints.get(name).ok_or_else(|| BridgeError::MissingTypeHint {
            field: name.clone(),
        })?;

        let field = convert(value, hint).map_err(|mismatch| match mismatch {
            Mismatch::Incompatible => BridgeError::IncompatibleHint {
                field: name.clone(),
                hint,
            },
            Mismatch::OutOfRange => BridgeError::OutOfRange {
                field: name.clone(),
                hint,
            },
        })?;

        record.insert(name.clone(), field);
    }

    Ok(record)
}

/// Converts dictionaries to records, using the same hints for all.
pub fn from_dicts<'a, I>(dicts: I, hints: &TypeHints) -> Result<Vec<Record>, BridgeError>
where
    I: IntoIterator<Item = &'a Dict>,
{
    dicts.into_iter().map(|dict| from_dict(dict, hints)).collect()
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Mismatch {
    Incompatible,
    OutOfRange,
}

macro_rules! integer_to_value {
    ($v:expr, $ty:expr) => {{
        let v = $v;
        let out_of_range = |_| Mismatch::OutOfRange;
        match $ty {
            Type::Char => i8::try_from(v).map(Value::Char).map_err(out_of_range),
            Type::Short => i16::try_from(v).map(Value::Short).map_err(out_of_range),
            Type::Int => i32::try_from(v).map(Value::Int).map_err(out_of_range),
            Type::Long => i64::try_from(v).map(Value::Long).map_err(|_| Mismatch::OutOfRange),
            Type::Uchar => u8::try_from(v).map(Value::Uchar).map_err(out_of_range),
            Type::Ushort => u16::try_from(v).map(Value::Ushort).map_err(out_of_range),
            Type::Uint => u32::try_from(v).map(Value::Uint).map_err(out_of_range),
            Type::Ulong => u64::try_from(v).map(Value::Ulong).map_err(|_| Mismatch::OutOfRange),
            Type::Float => Ok(Value::Float(v as f32)),
            Type::Double => Ok(Value::Double(v as f64)),
            Type::String => Err(Mismatch::Incompatible),
        }
    }};
}

macro_rules! integers_to_array {
    ($array:expr, $ty:expr) => {{
        let array = $array;
        let out_of_range = |_| Mismatch::OutOfRange;
        match $ty {
            Type::Char => array
                .try_map(|&v| i8::try_from(v))
                .map(ArrayValue::Char)
                .map_err(out_of_range),
            Type::Short => array
                .try_map(|&v| i16::try_from(v))
                .map(ArrayValue::Short)
                .map_err(out_of_range),
            Type::Int => array
                .try_map(|&v| i32::try_from(v))
                .map(ArrayValue::Int)
                .map_err(out_of_range),
            Type::Long => array
                .try_map(|&v| i64::try_from(v))
                .map(ArrayValue::Long)
                .map_err(|_| Mismatch::OutOfRange),
            Type::Uchar => array
                .try_map(|&v| u8::try_from(v))
                .map(ArrayValue::Uchar)
                .map_err(out_of_range),
            Type::Ushort => array
                .try_map(|&v| u16::try_from(v))
                .map(ArrayValue::Ushort)
                .map_err(out_of_range),
            Type::Uint => array
                .try_map(|&v| u32::try_from(v))
                .map(ArrayValue::Uint)
                .map_err(out_of_range),
            Type::Ulong => array
                .try_map(|&v| u64::try_from(v))
                .map(ArrayValue::Ulong)
                .map_err(|_| Mismatch::OutOfRange),
            Type::Float => Ok(ArrayValue::Float(array.map(|&v| v as f32))),
            Type::Double => Ok(ArrayValue::Double(array.map(|&v| v as f64))),
            Type::String => Err(Mismatch::Incompatible),
        }
    }};
}

fn narrow_float(v: f64) -> Result<f32, Mismatch> {
    let narrowed = v as f32;
    if v.is_finite() && narrowed.is_infinite() {
        Err(Mismatch::OutOfRange)
    } else {
        Ok(narrowed)
    }
}

fn convert(value: &DictValue, hint: Type) -> Result<Field, Mismatch> {
    let field = match value {
        DictValue::Int(v) => Field::Scalar(integer_to_value!(*v, hint)?),
        DictValue::UInt(v) => Field::Scalar(integer_to_value!(*v, hint)?),
        DictValue::Float(v) => Field::Scalar(match hint {
            Type::Float => Value::Float(narrow_float(*v)?),
            Type::Double => Value::Double(*v),
            _ => return Err(Mismatch::Incompatible),
        }),
        DictValue::String(v) => match hint {
            Type::String => Field::Scalar(Value::String(v.clone())),
            _ => return Err(Mismatch::Incompatible),
        },
        DictValue::IntArray(a) => Field::Array(integers_to_array!(a, hint)?),
        DictValue::UIntArray(a) => Field::Array(integers_to_array!(a, hint)?),
        DictValue::FloatArray(a) => Field::Array(match hint {
            Type::Float => ArrayValue::Float(a.try_map(|&v| narrow_float(v))?),
            Type::Double => ArrayValue::Double(a.clone()),
            _ => return Err(Mismatch::Incompatible),
        }),
        DictValue::StringArray(a) => match hint {
            Type::String => Field::Array(ArrayValue::String(a.clone())),
            _ => return Err(Mismatch::Incompatible),
        },
    };

    Ok(field)
}

/// An error associated with converting a dictionary to a record.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BridgeError {
    /// No type hint was given for a field.
    MissingTypeHint {
        /// Name of the field.
        field: String,
    },
    /// The hint cannot represent the kind of value, such as a numeric hint for a string.
    IncompatibleHint {
        /// Name of the field.
        field: String,
        /// The hinted type.
        hint: Type,
    },
    /// The value does not fit in the hinted type.
    OutOfRange {
        /// Name of the field.
        field: String,
        /// The hinted type.
        hint: Type,
    },
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeError::MissingTypeHint { field } => {
                write!(f, "missing type hint for field '{field}'")
            }
            BridgeError::IncompatibleHint { field, hint } => {
                write!(f, "field '{field}' cannot be written as {hint}")
            }
            BridgeError::OutOfRange { field, hint } => {
                write!(f, "value of field '{field}' out of range for {hint}")
            }
        }
    }
}

impl std::error::Error for BridgeError {}
