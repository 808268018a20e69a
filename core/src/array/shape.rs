//! Array shapes.

use std::{fmt, ops::Deref};

/// Dimension sizes of an array, outer to inner.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Shape(pub Vec<usize>);

impl Shape {
    /// Returns the number of elements, or `None` if there are no dimensions or the product
    /// overflows.
    pub fn checked_elements(&self) -> Option<usize> {
        if self.is_empty() {
            None
        } else {
            self.iter().try_fold(1usize, |acc, &v| acc.checked_mul(v))
        }
    }

    /// Returns the row-major flat index of a multi-index, if it is within bounds.
    pub(crate) fn flat_index<I>(&self, index: I) -> Option<usize>
    where
        I: AsRef<[usize]>,
    {
        let index = index.as_ref();

        if index.len() != self.len() || index.iter().zip(self.iter()).any(|(i, n)| i >= n) {
            return None;
        }

        Some(
            index
                .iter()
                .zip(self.iter())
                .fold(0, |flat, (i, n)| flat * n + i),
        )
    }

    /// Returns the shape as stored on the wire, innermost dimension first.
    pub(crate) fn to_wire(&self) -> Vec<usize> {
        self.iter().rev().copied().collect()
    }

    /// Creates a shape from dimension sizes stored on the wire, innermost dimension first.
    pub(crate) fn from_wire(mut dimensions: Vec<usize>) -> Self {
        dimensions.reverse();
        Self(dimensions)
    }
}

impl AsRef<[usize]> for Shape {
    fn as_ref(&self) -> &[usize] {
        self
    }
}

impl Deref for Shape {
    type Target = [usize];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<usize>> for Shape {
    fn from(shape: Vec<usize>) -> Self {
        Self(shape)
    }
}

impl<const N: usize> From<[usize; N]> for Shape {
    fn from(shape: [usize; N]) -> Self {
        Self(shape.to_vec())
    }
}

impl From<usize> for Shape {
    fn from(shape: usize) -> Self {
        Self(vec![shape])
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, v) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("x")?;
            }
            write!(f, "{v}")?;
        }
        f.write_str("]")
    }
}
