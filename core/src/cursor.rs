//! Forward-only reads over an immutable byte buffer.

use std::{fmt, str};

use nom::{
    multi::count,
    number::complete::{
        le_f32, le_f64, le_i16, le_i32, le_i64, le_i8, le_u16, le_u32, le_u64, le_u8,
    },
    IResult,
};

use crate::types::{Type, Value};

/// A bounds-checked cursor over a byte buffer.
///
/// Positions are always absolute offsets from the start of the buffer.
#[derive(Clone, Debug)]
pub struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Creates a new cursor positioned at the start of the buffer.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Returns `true` if no bytes remain.
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn number<T, F>(&mut self, width: usize, parser: F) -> Result<T, CursorError>
    where
        F: FnOnce(&'a [u8]) -> IResult<&'a [u8], T>,
    {
        match parser(&self.buf[self.pos..]) {
            Ok((rest, value)) => {
                self.pos = self.buf.len() - rest.len();
                Ok(value)
            }
            Err(_) => Err(self.out_of_bounds(width)),
        }
    }

    fn out_of_bounds(&self, requested: usize) -> CursorError {
        CursorError::OutOfBounds {
            position: self.pos,
            requested,
            remaining: self.remaining(),
        }
    }

    /// Returns the absolute offset of the cursor.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Reads the next `width` bytes.
    pub fn read_fixed(&mut self, width: usize) -> Result<&'a [u8], CursorError> {
        if width > self.remaining() {
            return Err(self.out_of_bounds(width));
        }

        let bytes = &self.buf[self.pos..self.pos + width];
        self.pos += width;
        Ok(bytes)
    }

    /// Reads a little-endian `i32`.
    pub fn read_i32(&mut self) -> Result<i32, CursorError> {
        self.number(4, le_i32)
    }

    /// Reads `n` consecutive fixed-width values using a `nom` number parser.
    pub(crate) fn read_many<T, F>(
        &mut self,
        n: usize,
        width: usize,
        parser: F,
    ) -> Result<Vec<T>, CursorError>
    where
        F: FnMut(&'a [u8]) -> IResult<&'a [u8], T>,
    {
        let requested = n.saturating_mul(width);
        if requested > self.remaining() {
            return Err(self.out_of_bounds(requested));
        }

        self.number(requested, count(parser, n))
    }

    /// Reads a null-terminated UTF-8 string, consuming the terminator.
    pub fn read_string(&mut self) -> Result<String, CursorError> {
        let rest = &self.buf[self.pos..];

        let Some(len) = rest.iter().position(|&b| b == 0) else {
            return Err(CursorError::MalformedString {
                position: self.pos,
                reason: StringError::Unterminated,
            });
        };

        let s = str::from_utf8(&rest[..len]).map_err(|_| CursorError::MalformedString {
            position: self.pos,
            reason: StringError::InvalidUtf8,
        })?;

        self.pos += len + 1;
        Ok(s.to_string())
    }

    /// Reads a single value of the given type.
    pub fn read_typed(&mut self, ty: Type) -> Result<Value, CursorError> {
        Ok(match ty {
            Type::Char => Value::Char(self.number(1, le_i8)?),
            Type::Short => Value::Short(self.number(2, le_i16)?),
            Type::Int => Value::Int(self.number(4, le_i32)?),
            Type::Float => Value::Float(self.number(4, le_f32)?),
            Type::Double => Value::Double(self.number(8, le_f64)?),
            Type::String => Value::String(self.read_string()?),
            Type::Long => Value::Long(self.number(8, le_i64)?),
            Type::Uchar => Value::Uchar(self.number(1, le_u8)?),
            Type::Ushort => Value::Ushort(self.number(2, le_u16)?),
            Type::Uint => Value::Uint(self.number(4, le_u32)?),
            Type::Ulong => Value::Ulong(self.number(8, le_u64)?),
        })
    }

    /// Reads a single byte.
    pub fn read_u8(&mut self) -> Result<u8, CursorError> {
        self.number(1, le_u8)
    }

    /// Returns the number of bytes left before the end of the buffer.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Moves the cursor to an absolute offset.
    ///
    /// Seeking to the end of the buffer is allowed, seeking past it is not.
    pub fn seek(&mut self, offset: usize) -> Result<(), CursorError> {
        if offset > self.buf.len() {
            Err(CursorError::OutOfBounds {
                position: offset,
                requested: 0,
                remaining: 0,
            })
        } else {
            self.pos = offset;
            Ok(())
        }
    }
}

/// The reason a string could not be read.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StringError {
    /// No null terminator before the end of the buffer.
    Unterminated,
    /// The bytes before the terminator are not valid UTF-8.
    InvalidUtf8,
}

impl fmt::Display for StringError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StringError::Unterminated => f.write_str("missing null terminator"),
            StringError::InvalidUtf8 => f.write_str("invalid UTF-8"),
        }
    }
}

/// An error associated with reading from a [`Cursor`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CursorError {
    /// Fewer bytes remain than were requested.
    OutOfBounds {
        /// Position of the attempted read.
        position: usize,
        /// Number of bytes requested.
        requested: usize,
        /// Number of bytes remaining.
        remaining: usize,
    },
    /// A string could not be read.
    MalformedString {
        /// Position of the start of the string.
        position: usize,
        /// What is wrong with the string.
        reason: StringError,
    },
}

impl fmt::Display for CursorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CursorError::OutOfBounds {
                position,
                requested,
                remaining,
            } => write!(
                f,
                "cannot read {requested} bytes at offset {position} with {remaining} bytes remaining"
            ),
            CursorError::MalformedString { position, reason } => {
                write!(f, "malformed string at offset {position}: {reason}")
            }
        }
    }
}

impl std::error::Error for CursorError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_fixed() {
        let src = [1, 2, 3, 4, 5];
        let mut cursor = Cursor::new(&src);

        assert_eq!(cursor.read_fixed(2), Ok(&src[..2]));
        assert_eq!(cursor.position(), 2);
        assert_eq!(cursor.remaining(), 3);
        assert_eq!(
            cursor.read_fixed(4),
            Err(CursorError::OutOfBounds {
                position: 2,
                requested: 4,
                remaining: 3
            })
        );
        assert_eq!(cursor.position(), 2);
    }

    #[test]
    fn test_read_typed_little_endian() {
        let src = [0x01, 0x00, 0x00, 0x00, 0xff, 0xfe, 0xff, 0x00, 0x00, 0x80, 0x3f];
        let mut cursor = Cursor::new(&src);

        assert_eq!(cursor.read_typed(Type::Int), Ok(Value::Int(1)));
        assert_eq!(cursor.read_typed(Type::Char), Ok(Value::Char(-1)));
        assert_eq!(cursor.read_typed(Type::Short), Ok(Value::Short(-2)));
        assert_eq!(cursor.read_typed(Type::Float), Ok(Value::Float(1.0)));
        assert!(cursor.is_empty());
    }

    #[test]
    fn test_read_typed_out_of_bounds() {
        let src = [0x01, 0x00];
        let mut cursor = Cursor::new(&src);

        assert!(matches!(
            cursor.read_typed(Type::Double),
            Err(CursorError::OutOfBounds { requested: 8, .. })
        ));
    }

    #[test]
    fn test_read_string() {
        let src = b"stid\0cp\0";
        let mut cursor = Cursor::new(src);

        assert_eq!(cursor.read_string().as_deref(), Ok("stid"));
        assert_eq!(cursor.position(), 5);
        assert_eq!(cursor.read_typed(Type::String), Ok(Value::from("cp")));
        assert!(cursor.is_empty());
    }

    #[test]
    fn test_read_string_unterminated() {
        let mut cursor = Cursor::new(b"origin");

        assert_eq!(
            cursor.read_string(),
            Err(CursorError::MalformedString {
                position: 0,
                reason: StringError::Unterminated
            })
        );
    }

    #[test]
    fn test_read_string_invalid_utf8() {
        let mut cursor = Cursor::new(&[0xc3, 0x28, 0x00]);

        assert_eq!(
            cursor.read_string(),
            Err(CursorError::MalformedString {
                position: 0,
                reason: StringError::InvalidUtf8
            })
        );
    }

    #[test]
    fn test_read_many() {
        let src = [1, 0, 2, 0, 3, 0];
        let mut cursor = Cursor::new(&src);

        assert_eq!(cursor.read_many(3, 2, le_i16), Ok(vec![1, 2, 3]));
        assert!(cursor.read_many(1, 2, le_i16).is_err());
    }

    #[test]
    fn test_seek() {
        let mut cursor = Cursor::new(&[0; 4]);

        assert!(cursor.seek(4).is_ok());
        assert!(cursor.is_empty());
        assert!(cursor.seek(5).is_err());
    }
}
