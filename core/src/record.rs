//! DMap records.
//!
//! A [`Record`] is an insertion-ordered map from field names to [`Field`]s, each of which is
//! either a single typed [`Value`] or a typed, shaped [`ArrayValue`].

use std::fmt;

use indexmap::{map, IndexMap};

use crate::{
    array::{Array, Shape},
    types::{Type, Value},
};

/// Number of bytes in a record header: encoding identifier, size, scalar and array counts.
pub const HEADER_LEN: usize = 16;

/// A typed array of values.
#[derive(Clone, Debug, PartialEq)]
pub enum ArrayValue {
    /// A `char` array.
    Char(Array<i8>),
    /// A `short` array.
    Short(Array<i16>),
    /// An `int` array.
    Int(Array<i32>),
    /// A `float` array.
    Float(Array<f32>),
    /// A `double` array.
    Double(Array<f64>),
    /// A `string` array.
    ///
    /// These may be read, but cannot be written.
    String(Array<String>),
    /// A `long` array.
    Long(Array<i64>),
    /// A `uchar` array.
    Uchar(Array<u8>),
    /// A `ushort` array.
    Ushort(Array<u16>),
    /// A `uint` array.
    Uint(Array<u32>),
    /// A `ulong` array.
    Ulong(Array<u64>),
}

macro_rules! dispatch {
    ($array:expr, $inner:ident => $body:expr) => {
        match $array {
            ArrayValue::Char($inner) => $body,
            ArrayValue::Short($inner) => $body,
            ArrayValue::Int($inner) => $body,
            ArrayValue::Float($inner) => $body,
            ArrayValue::Double($inner) => $body,
            ArrayValue::String($inner) => $body,
            ArrayValue::Long($inner) => $body,
            ArrayValue::Uchar($inner) => $body,
            ArrayValue::Ushort($inner) => $body,
            ArrayValue::Uint($inner) => $body,
            ArrayValue::Ulong($inner) => $body,
        }
    };
}

impl ArrayValue {
    /// Returns the number of elements.
    pub fn elements(&self) -> usize {
        dispatch!(self, array => array.elements())
    }

    /// Returns the element at a flat, row-major index.
    pub fn get_flat(&self, index: usize) -> Option<Value> {
        match self {
            ArrayValue::Char(a) => a.as_slice().get(index).map(|&v| Value::Char(v)),
            ArrayValue::Short(a) => a.as_slice().get(index).map(|&v| Value::Short(v)),
            ArrayValue::Int(a) => a.as_slice().get(index).map(|&v| Value::Int(v)),
            ArrayValue::Float(a) => a.as_slice().get(index).map(|&v| Value::Float(v)),
            ArrayValue::Double(a) => a.as_slice().get(index).map(|&v| Value::Double(v)),
            ArrayValue::String(a) => a.as_slice().get(index).cloned().map(Value::String),
            ArrayValue::Long(a) => a.as_slice().get(index).map(|&v| Value::Long(v)),
            ArrayValue::Uchar(a) => a.as_slice().get(index).map(|&v| Value::Uchar(v)),
            ArrayValue::Ushort(a) => a.as_slice().get(index).map(|&v| Value::Ushort(v)),
            ArrayValue::Uint(a) => a.as_slice().get(index).map(|&v| Value::Uint(v)),
            ArrayValue::Ulong(a) => a.as_slice().get(index).map(|&v| Value::Ulong(v)),
        }
    }

    /// Returns the shape of the array, outer to inner.
    pub fn shape(&self) -> &Shape {
        dispatch!(self, array => array.shape())
    }

    /// Returns the element type.
    pub fn ty(&self) -> Type {
        match self {
            ArrayValue::Char(_) => Type::Char,
            ArrayValue::Short(_) => Type::Short,
            ArrayValue::Int(_) => Type::Int,
            ArrayValue::Float(_) => Type::Float,
            ArrayValue::Double(_) => Type::Double,
            ArrayValue::String(_) => Type::String,
            ArrayValue::Long(_) => Type::Long,
            ArrayValue::Uchar(_) => Type::Uchar,
            ArrayValue::Ushort(_) => Type::Ushort,
            ArrayValue::Uint(_) => Type::Uint,
            ArrayValue::Ulong(_) => Type::Ulong,
        }
    }

    /// Returns the number of bytes the values occupy on the wire.
    pub(crate) fn values_len(&self) -> usize {
        match self {
            ArrayValue::String(array) => array.iter().map(|s| s.len() + 1).sum(),
            array => array.elements() * array.ty().width().unwrap_or(0),
        }
    }

    /// Appends the little-endian wire representation of the values in row-major order.
    pub(crate) fn write_values(&self, dest: &mut Vec<u8>) {
        match self {
            ArrayValue::Char(a) => a.iter().for_each(|v| dest.extend(v.to_le_bytes())),
            ArrayValue::Short(a) => a.iter().for_each(|v| dest.extend(v.to_le_bytes())),
            ArrayValue::Int(a) => a.iter().for_each(|v| dest.extend(v.to_le_bytes())),
            ArrayValue::Float(a) => a.iter().for_each(|v| dest.extend(v.to_le_bytes())),
            ArrayValue::Double(a) => a.iter().for_each(|v| dest.extend(v.to_le_bytes())),
            ArrayValue::String(a) => a.iter().for_each(|v| {
                dest.extend(v.as_bytes());
                dest.push(0);
            }),
            ArrayValue::Long(a) => a.iter().for_each(|v| dest.extend(v.to_le_bytes())),
            ArrayValue::Uchar(a) => dest.extend(a.as_slice()),
            ArrayValue::Ushort(a) => a.iter().for_each(|v| dest.extend(v.to_le_bytes())),
            ArrayValue::Uint(a) => a.iter().for_each(|v| dest.extend(v.to_le_bytes())),
            ArrayValue::Ulong(a) => a.iter().for_each(|v| dest.extend(v.to_le_bytes())),
        }
    }
}

macro_rules! impl_array_from {
    ($($native:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<Array<$native>> for ArrayValue {
                fn from(array: Array<$native>) -> Self {
                    ArrayValue::$variant(array)
                }
            }

            impl From<Vec<$native>> for ArrayValue {
                fn from(values: Vec<$native>) -> Self {
                    ArrayValue::$variant(Array::from_vec(values))
                }
            }
        )*
    };
}

impl_array_from! {
    i8 => Char,
    i16 => Short,
    i32 => Int,
    f32 => Float,
    f64 => Double,
    String => String,
    i64 => Long,
    u8 => Uchar,
    u16 => Ushort,
    u32 => Uint,
    u64 => Ulong,
}

/// A single field of a record.
#[derive(Clone, Debug, PartialEq)]
pub enum Field {
    /// A scalar field.
    Scalar(Value),
    /// An array field.
    Array(ArrayValue),
}

impl Field {
    /// Returns the scalar value, if the field is a scalar.
    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            Field::Scalar(value) => Some(value),
            Field::Array(_) => None,
        }
    }

    /// Returns the array value, if the field is an array.
    pub fn as_array(&self) -> Option<&ArrayValue> {
        match self {
            Field::Scalar(_) => None,
            Field::Array(array) => Some(array),
        }
    }

    /// Returns `true` if the field is an array.
    pub fn is_array(&self) -> bool {
        matches!(self, Field::Array(_))
    }

    /// Returns the (element) type of the field.
    pub fn ty(&self) -> Type {
        match self {
            Field::Scalar(value) => value.ty(),
            Field::Array(array) => array.ty(),
        }
    }

    /// Returns the number of bytes the named field occupies on the wire.
    pub(crate) fn encoded_len(&self, name: &str) -> usize {
        let name_len = name.len() + 1;

        match self {
            Field::Scalar(value) => name_len + 1 + value.encoded_len(),
            Field::Array(array) => {
                name_len + 1 + 4 + 4 * array.shape().len() + array.values_len()
            }
        }
    }
}

impl From<Value> for Field {
    fn from(value: Value) -> Self {
        Field::Scalar(value)
    }
}

impl From<ArrayValue> for Field {
    fn from(array: ArrayValue) -> Self {
        Field::Array(array)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Scalar(value) => write!(f, "{}", value.ty()),
            Field::Array(array) => write!(f, "{}{}", array.ty(), array.shape()),
        }
    }
}

/// A DMap record.
///
/// Fields keep insertion order. When encoded, all scalars are written before all arrays, so
/// equality between records does not consider order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record(IndexMap<String, Field>);

impl Record {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the arrays in insertion order.
    pub fn arrays(&self) -> impl Iterator<Item = (&str, &ArrayValue)> {
        self.0
            .iter()
            .filter_map(|(name, field)| field.as_array().map(|array| (name.as_str(), array)))
    }

    /// Returns `true` if the record contains a field with the given name.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Returns the number of bytes the record occupies on the wire, header included.
    pub fn encoded_len(&self) -> usize {
        HEADER_LEN
            + self
                .0
                .iter()
                .map(|(name, field)| field.encoded_len(name))
                .sum::<usize>()
    }

    /// Returns the field with the given name.
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.0.get(name)
    }

    /// Inserts a field, returning the previous field with the same name, if any.
    ///
    /// A replaced field keeps its original position.
    pub fn insert<S, F>(&mut self, name: S, field: F) -> Option<Field>
    where
        S: Into<String>,
        F: Into<Field>,
    {
        self.0.insert(name.into(), field.into())
    }

    /// Returns `true` if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the fields in insertion order.
    pub fn iter(&self) -> map::Iter<'_, String, Field> {
        self.0.iter()
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns the field names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Removes a field, preserving the order of the remaining fields.
    pub fn remove(&mut self, name: &str) -> Option<Field> {
        self.0.shift_remove(name)
    }

    /// Returns the scalars in insertion order.
    pub fn scalars(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0
            .iter()
            .filter_map(|(name, field)| field.as_scalar().map(|value| (name.as_str(), value)))
    }
}

impl<S, F> FromIterator<(S, F)> for Record
where
    S: Into<String>,
    F: Into<Field>,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (S, F)>,
    {
        Self(
            iter.into_iter()
                .map(|(name, field)| (name.into(), field.into()))
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = (&'a String, &'a Field);
    type IntoIter = map::Iter<'a, String, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> Record {
        let mut record = Record::new();
        record.insert("stid", Value::Short(65));
        record.insert("ptab", ArrayValue::from(vec![0i16, 14, 22]));
        record.insert("origin.command", Value::from("make_fit"));
        record
    }

    #[test]
    fn test_scalars_and_arrays_keep_order() {
        let record = record();

        assert_eq!(
            record.scalars().map(|(name, _)| name).collect::<Vec<_>>(),
            ["stid", "origin.command"]
        );
        assert_eq!(
            record.arrays().map(|(name, _)| name).collect::<Vec<_>>(),
            ["ptab"]
        );
    }

    #[test]
    fn test_equality_ignores_order() {
        let reordered: Record = [
            ("origin.command", Field::from(Value::from("make_fit"))),
            ("ptab", Field::from(ArrayValue::from(vec![0i16, 14, 22]))),
            ("stid", Field::from(Value::Short(65))),
        ]
        .into_iter()
        .collect();

        assert_eq!(record(), reordered);
    }

    #[test]
    fn test_encoded_len() {
        // stid\0 + tag + short = 8
        // ptab\0 + tag + ndims + 1 dim + 3 shorts = 20
        // origin.command\0 + tag + make_fit\0 = 16 + 9 = 25
        assert_eq!(record().encoded_len(), HEADER_LEN + 8 + 20 + 25);
    }

    #[test]
    fn test_array_get_flat() {
        let array = ArrayValue::from(Array::new(vec![1.5f32, 2.5, 3.5, 4.5], [2, 2]).unwrap());

        assert_eq!(array.get_flat(3), Some(Value::Float(4.5)));
        assert_eq!(array.get_flat(4), None);
        assert_eq!(array.ty(), Type::Float);
        assert_eq!(array.shape(), &Shape(vec![2, 2]));
    }
}
