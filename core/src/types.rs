//! DMap primitive types.
//!
//! Every field in a record carries a one-byte tag identifying its primitive type. The table is
//! fixed by the format, see [RFC 0006] of the Radar Software Toolkit.
//!
//! [RFC 0006]: https://radar-software-toolkit-rst.readthedocs.io/en/latest/references/general/dmap_data/

use std::fmt;

/// A DMap primitive type.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Type {
    /// Signed 8-bit integer.
    Char,
    /// Signed 16-bit integer.
    Short,
    /// Signed 32-bit integer.
    Int,
    /// 32-bit float.
    Float,
    /// 64-bit float.
    Double,
    /// Null-terminated string.
    String,
    /// Signed 64-bit integer.
    Long,
    /// Unsigned 8-bit integer.
    Uchar,
    /// Unsigned 16-bit integer.
    Ushort,
    /// Unsigned 32-bit integer.
    Uint,
    /// Unsigned 64-bit integer.
    Ulong,
}

impl Type {
    /// All types, in tag order.
    pub const ALL: [Type; 11] = [
        Type::Char,
        Type::Short,
        Type::Int,
        Type::Float,
        Type::Double,
        Type::String,
        Type::Long,
        Type::Uchar,
        Type::Ushort,
        Type::Uint,
        Type::Ulong,
    ];

    /// Returns the type for a wire tag, or `None` if the tag is unknown.
    ///
    /// Tag 0 denotes a nested DMap record in the RST sources; it is never produced by
    /// SuperDARN data and is treated as unknown.
    pub fn from_tag(tag: u8) -> Option<Self> {
        Some(match tag {
            1 => Type::Char,
            2 => Type::Short,
            3 => Type::Int,
            4 => Type::Float,
            8 => Type::Double,
            9 => Type::String,
            10 => Type::Long,
            16 => Type::Uchar,
            17 => Type::Ushort,
            18 => Type::Uint,
            19 => Type::Ulong,
            _ => return None,
        })
    }

    /// Returns the wire tag.
    pub fn tag(&self) -> u8 {
        match self {
            Type::Char => 1,
            Type::Short => 2,
            Type::Int => 3,
            Type::Float => 4,
            Type::Double => 8,
            Type::String => 9,
            Type::Long => 10,
            Type::Uchar => 16,
            Type::Ushort => 17,
            Type::Uint => 18,
            Type::Ulong => 19,
        }
    }

    /// Returns the byte width of a single value, or `None` for variable-width strings.
    pub fn width(&self) -> Option<usize> {
        match self {
            Type::Char | Type::Uchar => Some(1),
            Type::Short | Type::Ushort => Some(2),
            Type::Int | Type::Uint | Type::Float => Some(4),
            Type::Long | Type::Ulong | Type::Double => Some(8),
            Type::String => None,
        }
    }

    /// Returns the name of the type as used by the RST.
    pub fn name(&self) -> &'static str {
        match self {
            Type::Char => "char",
            Type::Short => "short",
            Type::Int => "int",
            Type::Float => "float",
            Type::Double => "double",
            Type::String => "string",
            Type::Long => "long",
            Type::Uchar => "uchar",
            Type::Ushort => "ushort",
            Type::Uint => "uint",
            Type::Ulong => "ulong",
        }
    }

    /// Returns the type with the given RST name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| ty.name() == name)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single native value of some DMap type.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// A `char` value.
    Char(i8),
    /// A `short` value.
    Short(i16),
    /// An `int` value.
    Int(i32),
    /// A `float` value.
    Float(f32),
    /// A `double` value.
    Double(f64),
    /// A `string` value.
    String(String),
    /// A `long` value.
    Long(i64),
    /// A `uchar` value.
    Uchar(u8),
    /// A `ushort` value.
    Ushort(u16),
    /// A `uint` value.
    Uint(u32),
    /// A `ulong` value.
    Ulong(u64),
}

impl Value {
    /// Returns the type of the value.
    pub fn ty(&self) -> Type {
        match self {
            Value::Char(_) => Type::Char,
            Value::Short(_) => Type::Short,
            Value::Int(_) => Type::Int,
            Value::Float(_) => Type::Float,
            Value::Double(_) => Type::Double,
            Value::String(_) => Type::String,
            Value::Long(_) => Type::Long,
            Value::Uchar(_) => Type::Uchar,
            Value::Ushort(_) => Type::Ushort,
            Value::Uint(_) => Type::Uint,
            Value::Ulong(_) => Type::Ulong,
        }
    }

    /// Appends the little-endian wire representation of the value.
    ///
    /// Strings are written with a trailing null byte.
    pub(crate) fn write_to(&self, dest: &mut Vec<u8>) {
        match self {
            Value::Char(v) => dest.extend(v.to_le_bytes()),
            Value::Short(v) => dest.extend(v.to_le_bytes()),
            Value::Int(v) => dest.extend(v.to_le_bytes()),
            Value::Float(v) => dest.extend(v.to_le_bytes()),
            Value::Double(v) => dest.extend(v.to_le_bytes()),
            Value::String(v) => {
                dest.extend(v.as_bytes());
                dest.push(0);
            }
            Value::Long(v) => dest.extend(v.to_le_bytes()),
            Value::Uchar(v) => dest.push(*v),
            Value::Ushort(v) => dest.extend(v.to_le_bytes()),
            Value::Uint(v) => dest.extend(v.to_le_bytes()),
            Value::Ulong(v) => dest.extend(v.to_le_bytes()),
        }
    }

    /// Returns the number of bytes the value occupies on the wire.
    pub(crate) fn encoded_len(&self) -> usize {
        match self {
            Value::String(s) => s.len() + 1,
            v => v.ty().width().unwrap_or(0),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Char(v) => write!(f, "{v}"),
            Value::Short(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Double(v) => write!(f, "{v}"),
            Value::String(v) => write!(f, "{v:?}"),
            Value::Long(v) => write!(f, "{v}"),
            Value::Uchar(v) => write!(f, "{v}"),
            Value::Ushort(v) => write!(f, "{v}"),
            Value::Uint(v) => write!(f, "{v}"),
            Value::Ulong(v) => write!(f, "{v}"),
        }
    }
}

macro_rules! impl_from_native {
    ($($native:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$native> for Value {
                fn from(v: $native) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_from_native! {
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

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}
