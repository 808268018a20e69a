//! Decoding single records.
//!
//! A record starts with a 16-byte header: the encoding identifier, the size of the record in
//! bytes (header included), the number of scalars and the number of arrays. All scalars follow,
//! then all arrays:
//!
//! ```text
//! scalar := name\0 | u8 tag | value
//! array  := name\0 | u8 tag | i32 ndims | i32 dims[ndims] | values[product(dims)]
//! ```
//!
//! Array dimensions are stored innermost first. All integers are little-endian.

use std::fmt;

use nom::number::complete::{
    le_f32, le_f64, le_i16, le_i32, le_i64, le_i8, le_u16, le_u32, le_u64, le_u8,
};

use crate::{
    array::{Array, Shape},
    cursor::{Cursor, CursorError},
    record::{ArrayValue, Field, Record, HEADER_LEN},
    types::Type,
};

/// The encoding identifier opening every record.
pub const ENCODING_IDENTIFIER: i32 = 0x0001_0001;

/// A successfully decoded record.
#[derive(Clone, Debug, PartialEq)]
pub struct Decoded {
    /// The decoded record.
    pub record: Record,
    /// Absolute offset of the start of the record.
    pub offset: usize,
    /// Size of the record declared in its header.
    pub declared_len: usize,
    /// Set if the fields did not consume exactly the declared size.
    pub mismatch: Option<LengthMismatch>,
}

/// Decodes one record starting at the cursor's position.
///
/// On success, the cursor is moved to the end of the record as declared by its header, even if
/// the fields consumed fewer or more bytes; in that case [`Decoded::mismatch`] is set. Fields are
/// only bounded by the end of the buffer, not by the declared size. On failure, the cursor is left
/// untouched.
pub fn decode_record(cursor: &mut Cursor<'_>) -> Result<Decoded, DecodeError> {
    let offset = cursor.position();
    let available = cursor.remaining();

    let (declared_len, scalars, arrays) = read_header(&mut cursor.clone())?;
    if declared_len > available {
        return Err(DecodeError::Truncated {
            offset,
            declared: declared_len,
            available,
        });
    }

    let mut body = cursor.clone();
    body.read_fixed(HEADER_LEN)?;

    let mut record = Record::new();

    for _ in 0..scalars {
        let (name, ty) = read_name_and_type(&mut body)?;
        let value = body.read_typed(ty)?;
        insert_field(&mut record, name, Field::Scalar(value), offset);
    }

    for _ in 0..arrays {
        let (name, ty) = read_name_and_type(&mut body)?;
        let array = read_array(&mut body, &name, ty)?;
        insert_field(&mut record, name, Field::Array(array), offset);
    }

    let consumed = body.position() - offset;
    let mismatch = (consumed != declared_len).then(|| {
        let mismatch = LengthMismatch {
            offset,
            declared: declared_len,
            consumed,
        };
        log::warn!("{mismatch}");
        mismatch
    });

    cursor.seek(offset + declared_len)?;

    log::trace!(
        "decoded record at offset {offset} with {scalars} scalars and {arrays} arrays \
        ({declared_len} bytes)"
    );

    Ok(Decoded {
        record,
        offset,
        declared_len,
        mismatch,
    })
}

fn insert_field(record: &mut Record, name: String, field: Field, offset: usize) {
    if record.contains(&name) {
        log::warn!("duplicate field '{name}' in record at offset {offset}, keeping the last");
    }
    record.insert(name, field);
}

fn read_header(cursor: &mut Cursor<'_>) -> Result<(usize, usize, usize), DecodeError> {
    let offset = cursor.position();
    let available = cursor.remaining();

    if available < HEADER_LEN {
        return Err(DecodeError::Truncated {
            offset,
            declared: HEADER_LEN,
            available,
        });
    }

    let code = cursor.read_i32()?;
    let size = cursor.read_i32()?;
    let scalars = cursor.read_i32()?;
    let arrays = cursor.read_i32()?;

    let invalid = |reason| DecodeError::InvalidHeader { offset, reason };

    if code != ENCODING_IDENTIFIER {
        return Err(invalid(HeaderError::EncodingIdentifier(code)));
    }

    let size = usize::try_from(size)
        .ok()
        .filter(|&size| size >= HEADER_LEN)
        .ok_or_else(|| invalid(HeaderError::Size(size)))?;

    match (usize::try_from(scalars), usize::try_from(arrays)) {
        (Ok(scalars), Ok(arrays)) => Ok((size, scalars, arrays)),
        _ => Err(invalid(HeaderError::Counts { scalars, arrays })),
    }
}

fn read_name_and_type(cursor: &mut Cursor<'_>) -> Result<(String, Type), DecodeError> {
    let name = cursor.read_string()?;
    let tag = cursor.read_u8()?;

    match Type::from_tag(tag) {
        Some(ty) => Ok((name, ty)),
        None => Err(DecodeError::UnknownType { field: name, tag }),
    }
}

fn read_array(cursor: &mut Cursor<'_>, name: &str, ty: Type) -> Result<ArrayValue, DecodeError> {
    let invalid = |reason| DecodeError::InvalidArrayShape {
        field: name.to_string(),
        reason,
    };

    let dimensions = cursor.read_i32()?;
    if dimensions <= 0 {
        return Err(invalid(ArrayShapeError::Dimensions(dimensions)));
    }

    let wire_shape = (0..dimensions)
        .map(|_| {
            let size = cursor.read_i32()?;
            usize::try_from(size)
                .ok()
                .filter(|&size| size > 0)
                .ok_or_else(|| invalid(ArrayShapeError::Size(size)))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let shape = Shape::from_wire(wire_shape);

    let elements = shape
        .checked_elements()
        .ok_or_else(|| invalid(ArrayShapeError::Overflow))?;

    // Strings take at least one byte each.
    let width = ty.width().unwrap_or(1);
    let remaining = cursor.remaining();
    if elements > remaining / width {
        return Err(invalid(ArrayShapeError::ExceedsRecord {
            elements,
            remaining,
        }));
    }

    Ok(read_values(cursor, ty, elements, shape)?)
}

fn read_values(
    cursor: &mut Cursor<'_>,
    ty: Type,
    n: usize,
    shape: Shape,
) -> Result<ArrayValue, CursorError> {
    Ok(match ty {
        Type::Char => ArrayValue::Char(Array::new_unchecked(cursor.read_many(n, 1, le_i8)?, shape)),
        Type::Short => {
            ArrayValue::Short(Array::new_unchecked(cursor.read_many(n, 2, le_i16)?, shape))
        }
        Type::Int => ArrayValue::Int(Array::new_unchecked(cursor.read_many(n, 4, le_i32)?, shape)),
        Type::Float => {
            ArrayValue::Float(Array::new_unchecked(cursor.read_many(n, 4, le_f32)?, shape))
        }
        Type::Double => {
            ArrayValue::Double(Array::new_unchecked(cursor.read_many(n, 8, le_f64)?, shape))
        }
        Type::String => {
            let values = (0..n)
                .map(|_| cursor.read_string())
                .collect::<Result<Vec<_>, _>>()?;
            ArrayValue::String(Array::new_unchecked(values, shape))
        }
        Type::Long => ArrayValue::Long(Array::new_unchecked(cursor.read_many(n, 8, le_i64)?, shape)),
        Type::Uchar => {
            ArrayValue::Uchar(Array::new_unchecked(cursor.read_many(n, 1, le_u8)?, shape))
        }
        Type::Ushort => {
            ArrayValue::Ushort(Array::new_unchecked(cursor.read_many(n, 2, le_u16)?, shape))
        }
        Type::Uint => ArrayValue::Uint(Array::new_unchecked(cursor.read_many(n, 4, le_u32)?, shape)),
        Type::Ulong => {
            ArrayValue::Ulong(Array::new_unchecked(cursor.read_many(n, 8, le_u64)?, shape))
        }
    })
}

/// The fields of a record did not consume exactly the size declared in its header.
///
/// This is not fatal: the record is kept, and decoding continues at the declared end.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LengthMismatch {
    /// Absolute offset of the start of the record.
    pub offset: usize,
    /// Size declared in the header.
    pub declared: usize,
    /// Bytes consumed by the header and fields.
    pub consumed: usize,
}

impl fmt::Display for LengthMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let LengthMismatch {
            offset,
            declared,
            consumed,
        } = self;
        write!(
            f,
            "record at offset {offset} declares {declared} bytes but its fields span {consumed} bytes"
        )
    }
}

impl std::error::Error for LengthMismatch {}

/// The reason a record header is invalid.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HeaderError {
    /// The encoding identifier is not [`ENCODING_IDENTIFIER`].
    EncodingIdentifier(i32),
    /// The declared size is smaller than the header itself.
    Size(i32),
    /// The number of scalars or arrays is negative.
    Counts {
        /// Declared number of scalars.
        scalars: i32,
        /// Declared number of arrays.
        arrays: i32,
    },
}

impl fmt::Display for HeaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderError::EncodingIdentifier(code) => {
                write!(f, "unknown encoding identifier {code:#010x}")
            }
            HeaderError::Size(size) => write!(f, "invalid record size {size}"),
            HeaderError::Counts { scalars, arrays } => {
                write!(f, "invalid field counts ({scalars} scalars, {arrays} arrays)")
            }
        }
    }
}

/// The reason an array shape is invalid.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ArrayShapeError {
    /// The number of dimensions is not positive.
    Dimensions(i32),
    /// A dimension size is not positive.
    Size(i32),
    /// The number of elements overflows.
    Overflow,
    /// The elements cannot fit in the rest of the buffer.
    ExceedsRecord {
        /// Number of elements declared by the shape.
        elements: usize,
        /// Bytes remaining in the buffer.
        remaining: usize,
    },
}

impl fmt::Display for ArrayShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrayShapeError::Dimensions(n) => write!(f, "invalid number of dimensions {n}"),
            ArrayShapeError::Size(size) => write!(f, "invalid dimension size {size}"),
            ArrayShapeError::Overflow => f.write_str("number of elements overflows"),
            ArrayShapeError::ExceedsRecord {
                elements,
                remaining,
            } => write!(
                f,
                "{elements} elements cannot fit in the {remaining} bytes left in the input"
            ),
        }
    }
}

/// An error associated with decoding a record.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DecodeError {
    /// The record declares more bytes than are available.
    Truncated {
        /// Absolute offset of the start of the record.
        offset: usize,
        /// Declared size of the record.
        declared: usize,
        /// Bytes available from the start of the record.
        available: usize,
    },
    /// The record header is invalid.
    InvalidHeader {
        /// Absolute offset of the start of the record.
        offset: usize,
        /// What is wrong with the header.
        reason: HeaderError,
    },
    /// A field has a type tag that is not a DMap type.
    UnknownType {
        /// Name of the field.
        field: String,
        /// The unknown tag.
        tag: u8,
    },
    /// An array field has an invalid shape.
    InvalidArrayShape {
        /// Name of the field.
        field: String,
        /// What is wrong with the shape.
        reason: ArrayShapeError,
    },
    /// A read ran past the end of the record, or a string was malformed.
    Cursor(CursorError),
}

impl From<CursorError> for DecodeError {
    fn from(e: CursorError) -> Self {
        Self::Cursor(e)
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Truncated {
                offset,
                declared,
                available,
            } => write!(
                f,
                "truncated record at offset {offset}: {declared} bytes declared, \
                {available} bytes available"
            ),
            DecodeError::InvalidHeader { offset, reason } => {
                write!(f, "invalid record header at offset {offset}: {reason}")
            }
            DecodeError::UnknownType { field, tag } => {
                write!(f, "unknown type tag {tag} for field '{field}'")
            }
            DecodeError::InvalidArrayShape { field, reason } => {
                write!(f, "invalid shape for array '{field}': {reason}")
            }
            DecodeError::Cursor(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for DecodeError {}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    use crate::types::Value;

    /// Builds a raw record from a body, for tests that need malformed input.
    pub(crate) fn raw_record(scalars: i32, arrays: i32, body: &[u8]) -> Vec<u8> {
        let mut raw = Vec::new();
        raw.extend(ENCODING_IDENTIFIER.to_le_bytes());
        raw.extend((body.len() as i32 + 16).to_le_bytes());
        raw.extend(scalars.to_le_bytes());
        raw.extend(arrays.to_le_bytes());
        raw.extend(body);
        raw
    }

    fn decode(src: &[u8]) -> Result<Decoded, DecodeError> {
        decode_record(&mut Cursor::new(src))
    }

    #[test]
    fn test_decode_scalars() {
        let mut body = Vec::new();
        body.extend(b"stid\0\x02");
        body.extend(65i16.to_le_bytes());
        body.extend(b"combf\0\x09$Id: normalscan\0");
        let src = raw_record(2, 0, &body);

        let decoded = decode(&src).unwrap();

        assert_eq!(decoded.offset, 0);
        assert_eq!(decoded.declared_len, src.len());
        assert_eq!(decoded.mismatch, None);
        assert_eq!(
            decoded.record.get("stid"),
            Some(&Field::Scalar(Value::Short(65)))
        );
        assert_eq!(
            decoded.record.get("combf"),
            Some(&Field::Scalar(Value::from("$Id: normalscan")))
        );
    }

    #[test]
    fn test_decode_2d_array_reverses_dimensions() {
        let mut body = Vec::new();
        body.extend(b"acfd\0\x04");
        body.extend(2i32.to_le_bytes());
        // Innermost first: 3 columns, 2 rows.
        body.extend(3i32.to_le_bytes());
        body.extend(2i32.to_le_bytes());
        for v in [0f32, 1., 2., 3., 4., 5.] {
            body.extend(v.to_le_bytes());
        }
        let src = raw_record(0, 1, &body);

        let decoded = decode(&src).unwrap();
        let Some(Field::Array(ArrayValue::Float(array))) = decoded.record.get("acfd") else {
            panic!("expected float array");
        };

        assert_eq!(array.shape(), &Shape(vec![2, 3]));
        assert_eq!(array[[1, 0]], 3.);
        assert_eq!(array[[0, 2]], 2.);
    }

    #[test]
    fn test_decode_string_array() {
        let mut body = Vec::new();
        body.extend(b"names\0\x09");
        body.extend(1i32.to_le_bytes());
        body.extend(2i32.to_le_bytes());
        body.extend(b"ab\0c\0");
        let src = raw_record(0, 1, &body);

        let decoded = decode(&src).unwrap();

        assert_eq!(
            decoded.record.get("names"),
            Some(&Field::Array(ArrayValue::from(vec![
                String::from("ab"),
                String::from("c")
            ])))
        );
    }

    #[test]
    fn test_truncated() {
        let src = raw_record(1, 0, b"cp\0\x02\x01\x00");

        assert_eq!(
            decode(&src[..src.len() - 1]),
            Err(DecodeError::Truncated {
                offset: 0,
                declared: src.len(),
                available: src.len() - 1,
            })
        );
        assert!(matches!(
            decode(&src[..10]),
            Err(DecodeError::Truncated { declared: 16, .. })
        ));
    }

    #[test]
    fn test_invalid_header() {
        let mut src = raw_record(0, 0, &[]);
        src[0] = 0;
        assert!(matches!(
            decode(&src),
            Err(DecodeError::InvalidHeader {
                reason: HeaderError::EncodingIdentifier(_),
                ..
            })
        ));

        let mut src = raw_record(0, 0, &[]);
        src[4..8].copy_from_slice(&8i32.to_le_bytes());
        assert!(matches!(
            decode(&src),
            Err(DecodeError::InvalidHeader {
                reason: HeaderError::Size(8),
                ..
            })
        ));

        let src = raw_record(-1, 0, &[]);
        assert!(matches!(
            decode(&src),
            Err(DecodeError::InvalidHeader {
                reason: HeaderError::Counts { scalars: -1, .. },
                ..
            })
        ));
    }

    #[test]
    fn test_unknown_type() {
        let src = raw_record(1, 0, b"cp\0\x05\x01\x00");

        assert_eq!(
            decode(&src),
            Err(DecodeError::UnknownType {
                field: String::from("cp"),
                tag: 5
            })
        );
    }

    #[test]
    fn test_malformed_string() {
        let src = raw_record(1, 0, b"origin.command");

        assert!(matches!(
            decode(&src),
            Err(DecodeError::Cursor(CursorError::MalformedString { .. }))
        ));
    }

    #[test]
    fn test_invalid_array_shapes() {
        let array = |dims: &[i32]| {
            let mut body = Vec::new();
            body.extend(b"slist\0\x02");
            body.extend((dims.len() as i32).to_le_bytes());
            for dim in dims {
                body.extend(dim.to_le_bytes());
            }
            body.extend([0; 4]);
            raw_record(0, 1, &body)
        };

        let reason = |dims: &[i32]| match decode(&array(dims)) {
            Err(DecodeError::InvalidArrayShape { field, reason }) => {
                assert_eq!(field, "slist");
                reason
            }
            other => panic!("unexpected result {other:?}"),
        };

        assert_eq!(reason(&[]), ArrayShapeError::Dimensions(0));
        assert_eq!(reason(&[0]), ArrayShapeError::Size(0));
        assert_eq!(reason(&[2, -1]), ArrayShapeError::Size(-1));
        assert_eq!(
            reason(&[3]),
            ArrayShapeError::ExceedsRecord {
                elements: 3,
                remaining: 4
            }
        );
        assert!(decode(&array(&[2])).is_ok());
    }

    #[test]
    fn test_length_mismatch_is_kept() {
        let mut body = b"cp\0\x02\x01\x00".to_vec();
        body.extend([0xaa; 3]);
        let mut src = raw_record(1, 0, &body);
        let declared = src.len();
        src.extend(raw_record(0, 0, &[]));

        let mut cursor = Cursor::new(&src);
        let decoded = decode_record(&mut cursor).unwrap();

        assert_eq!(
            decoded.mismatch,
            Some(LengthMismatch {
                offset: 0,
                declared,
                consumed: declared - 3
            })
        );
        assert_eq!(decoded.record.get("cp"), Some(&Field::Scalar(Value::Short(1))));
        assert_eq!(cursor.position(), declared);
        assert!(decode_record(&mut cursor).is_ok());
    }

    #[test]
    fn test_fields_overrunning_declared_length_are_kept() {
        let mut src = raw_record(1, 0, b"cp\0\x02\x01\x00");
        src[4..8].copy_from_slice(&20i32.to_le_bytes());
        src.extend(raw_record(0, 0, &[]));

        let mut cursor = Cursor::new(&src);
        let decoded = decode_record(&mut cursor).unwrap();

        assert_eq!(
            decoded.mismatch,
            Some(LengthMismatch {
                offset: 0,
                declared: 20,
                consumed: 22
            })
        );
        assert_eq!(decoded.record.get("cp"), Some(&Field::Scalar(Value::Short(1))));
        assert_eq!(cursor.position(), 20);
    }

    #[test]
    fn test_field_cannot_overrun_buffer() {
        // Declares one more scalar than the buffer contains.
        let src = raw_record(2, 0, b"cp\0\x02\x01\x00");

        assert!(matches!(decode(&src), Err(DecodeError::Cursor(_))));
    }

    #[test]
    fn test_failure_leaves_cursor() {
        let src = raw_record(1, 0, b"cp\0\x05\x01\x00");
        let mut cursor = Cursor::new(&src);

        assert!(decode_record(&mut cursor).is_err());
        assert_eq!(cursor.position(), 0);
    }
}
