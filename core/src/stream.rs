//! Decoding streams of records.
//!
//! A stream is a flat, decompressed buffer of concatenated records. Decoding stops at the first
//! record that fails to decode; everything before it is kept, and the failure is reported as a
//! [`Corruption`] rather than an error, since real files are often truncated or corrupt at the
//! tail.

use std::{fmt, iter::FusedIterator};

use crate::{
    cursor::Cursor,
    decode::{decode_record, DecodeError, Decoded, LengthMismatch},
    record::Record,
};

/// A lazy iterator over the records in a buffer.
///
/// Yields decoded records until the buffer is exhausted or a record fails to decode, in which
/// case a single [`Corruption`] is yielded and the iterator is fused.
#[derive(Clone, Debug)]
pub struct Records<'a> {
    cursor: Cursor<'a>,
    done: bool,
}

impl<'a> Records<'a> {
    /// Creates a new iterator over the records in a buffer.
    pub fn new(src: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(src),
            done: false,
        }
    }

    /// Returns the offset of the next record.
    pub fn position(&self) -> usize {
        self.cursor.position()
    }
}

impl<'a> Iterator for Records<'a> {
    type Item = Result<Decoded, Corruption>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.cursor.is_empty() {
            return None;
        }

        let offset = self.cursor.position();
        match decode_record(&mut self.cursor) {
            Ok(decoded) => {
                log::debug!(
                    "read record at offset {offset} with {} fields",
                    decoded.record.len()
                );
                Some(Ok(decoded))
            }
            Err(error) => {
                self.done = true;
                let corruption = Corruption { offset, error };
                log::warn!("{corruption}");
                Some(Err(corruption))
            }
        }
    }
}

impl<'a> FusedIterator for Records<'a> {}

/// Decodes all records in a buffer.
///
/// This never fails: a record that cannot be decoded ends the stream, and is reported in
/// [`StreamRead::corruption`].
pub fn decode_stream(src: &[u8]) -> StreamRead {
    let mut read = StreamRead::default();

    for result in Records::new(src) {
        match result {
            Ok(Decoded {
                record, mismatch, ..
            }) => {
                read.records.push(record);
                read.warnings.extend(mismatch);
            }
            Err(corruption) => read.corruption = Some(corruption),
        }
    }

    log::debug!(
        "decoded {} records from {} bytes{}",
        read.records.len(),
        src.len(),
        if read.corruption.is_some() {
            " before corruption"
        } else {
            ""
        }
    );

    read
}

/// The result of decoding a stream.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StreamRead {
    /// Records decoded before any corruption, in file order.
    pub records: Vec<Record>,
    /// The first record that failed to decode, if any.
    pub corruption: Option<Corruption>,
    /// Records whose fields did not span their declared size.
    pub warnings: Vec<LengthMismatch>,
}

impl StreamRead {
    /// Returns the offset at which decoding stopped early, if it did.
    pub fn corruption_offset(&self) -> Option<usize> {
        self.corruption.as_ref().map(|corruption| corruption.offset)
    }

    /// Returns `true` if the stream decoded without corruption or warnings.
    pub fn is_clean(&self) -> bool {
        self.corruption.is_none() && self.warnings.is_empty()
    }
}

/// A record that failed to decode.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Corruption {
    /// Offset of the start of the record.
    pub offset: usize,
    /// Why the record failed to decode.
    pub error: DecodeError,
}

impl fmt::Display for Corruption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "corrupt record at offset {}: {}", self.offset, self.error)
    }
}

impl std::error::Error for Corruption {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{
        decode::{tests::raw_record, HeaderError},
        encode::encode_records,
        record::{ArrayValue, Field},
        types::Value,
    };

    fn records(n: usize) -> Vec<Record> {
        (0..n)
            .map(|i| {
                let mut record = Record::new();
                record.insert("stid", Value::Short(65));
                record.insert("bmnum", Value::Short(i as i16));
                record.insert("combf", Value::from("$Id: normalscan"));
                record.insert("slist", ArrayValue::from(vec![0i16, i as i16]));
                record
            })
            .collect()
    }

    #[test]
    fn test_clean_stream() {
        let records = records(5);
        let src = encode_records(&records).unwrap();

        let read = decode_stream(&src);

        assert_eq!(read.records, records);
        assert_eq!(read.corruption_offset(), None);
        assert!(read.is_clean());
    }

    #[test]
    fn test_empty_stream() {
        let read = decode_stream(&[]);

        assert!(read.records.is_empty());
        assert!(read.is_clean());
    }

    #[test]
    fn test_trailing_garbage() {
        let records = records(3);
        let mut src = encode_records(&records).unwrap();
        let end = src.len();
        src.extend(b"garbage bytes at the end of the file");

        let read = decode_stream(&src);

        assert_eq!(read.records, records);
        assert_eq!(read.corruption_offset(), Some(end));
        assert!(matches!(
            read.corruption.unwrap().error,
            DecodeError::InvalidHeader {
                reason: HeaderError::EncodingIdentifier(_),
                ..
            }
        ));
    }

    #[test]
    fn test_truncated_last_record() {
        let records = records(5);
        let mut src = encode_records(&records).unwrap();
        let last = src.len() - records[4].encoded_len();
        let declared = i32::try_from(src.len() - last + 100).unwrap();
        src[last + 4..last + 8].copy_from_slice(&declared.to_le_bytes());

        let read = decode_stream(&src);

        assert_eq!(read.records, &records[..4]);
        assert_eq!(read.corruption_offset(), Some(last));
        assert!(matches!(
            read.corruption.unwrap().error,
            DecodeError::Truncated { .. }
        ));
    }

    #[test]
    fn test_unknown_type_is_corruption() {
        let records = records(2);
        let mut src = encode_records(&records).unwrap();
        let offset = src.len();
        src.extend(raw_record(1, 0, b"cp\0\x07\x01\x00"));
        src.extend(encode_records(&records).unwrap());

        let read = decode_stream(&src);

        assert_eq!(read.records, records);
        assert_eq!(read.corruption_offset(), Some(offset));
        assert!(matches!(
            read.corruption.unwrap().error,
            DecodeError::UnknownType { tag: 7, .. }
        ));
    }

    #[test]
    fn test_length_mismatch_continues() {
        let records = records(2);
        let mut src = raw_record(1, 0, b"cp\0\x02\x01\x00\xaa\xbb");
        src.extend(encode_records(&records).unwrap());

        let read = decode_stream(&src);

        assert_eq!(read.records.len(), 3);
        assert_eq!(&read.records[1..], &records[..]);
        assert_eq!(read.corruption, None);
        assert_eq!(
            read.warnings,
            [LengthMismatch {
                offset: 0,
                declared: 24,
                consumed: 22
            }]
        );
        assert!(!read.is_clean());
    }

    #[test]
    fn test_fields_overrunning_declared_length_are_kept() {
        let mut src = raw_record(1, 0, b"cp\0\x02\x00\x00");
        src[4..8].copy_from_slice(&20i32.to_le_bytes());
        src.extend(encode_records(&records(1)).unwrap());

        let read = decode_stream(&src);

        assert_eq!(read.records.len(), 1);
        assert_eq!(
            read.records[0].get("cp"),
            Some(&Field::Scalar(Value::Short(0)))
        );
        assert_eq!(
            read.warnings,
            [LengthMismatch {
                offset: 0,
                declared: 20,
                consumed: 22
            }]
        );
        // Decoding resumes at the declared end, inside the overrunning field.
        assert_eq!(read.corruption_offset(), Some(20));
    }

    #[test]
    fn test_records_iterator_is_fused() {
        let mut src = encode_records(&records(1)).unwrap();
        src.extend([0; 20]);

        let mut iter = Records::new(&src);

        assert!(matches!(iter.next(), Some(Ok(_))));
        assert!(matches!(iter.next(), Some(Err(Corruption { offset, .. })) if offset == iter.position()));
        assert!(iter.next().is_none());
        assert!(iter.next().is_none());
    }
}
