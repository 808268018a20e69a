//! N-dimensional arrays of record values.

use std::{fmt, ops::Index};

pub mod shape;
pub use shape::Shape;

/// An N-dimensional array, stored flat in row-major (C) order.
///
/// The shape is given outer to inner, so that the last dimension varies fastest. This is the
/// reverse of the order in which dimensions are stored on the wire.
#[derive(Clone, Debug, PartialEq)]
pub struct Array<T> {
    data: Vec<T>,
    shape: Shape,
}

impl<T> Array<T> {
    /// Returns the values in row-major order.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Returns the number of values.
    pub fn elements(&self) -> usize {
        self.data.len()
    }

    /// Creates a one-dimensional array.
    pub fn from_vec(data: Vec<T>) -> Self {
        let shape = Shape(vec![data.len()]);

        Self { data, shape }
    }

    /// Returns the value at a multi-index, outer to inner.
    pub fn get<I>(&self, index: I) -> Option<&T>
    where
        I: AsRef<[usize]>,
    {
        self.shape
            .flat_index(index)
            .and_then(|flat| self.data.get(flat))
    }

    /// Returns an iterator over the values in row-major order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Returns a new array of the same shape with `f` applied to each value.
    pub fn map<U, F>(&self, f: F) -> Array<U>
    where
        F: FnMut(&T) -> U,
    {
        Array {
            data: self.data.iter().map(f).collect(),
            shape: self.shape.clone(),
        }
    }

    /// Returns a new array of the same shape with the fallible `f` applied to each value.
    ///
    /// Stops at the first error.
    pub fn try_map<U, E, F>(&self, f: F) -> Result<Array<U>, E>
    where
        F: FnMut(&T) -> Result<U, E>,
    {
        Ok(Array {
            data: self.data.iter().map(f).collect::<Result<_, _>>()?,
            shape: self.shape.clone(),
        })
    }

    /// Creates an array from row-major values and a shape.
    ///
    /// Fails unless the shape has at least one dimension and its product equals the number of
    /// values. Zero-sized dimensions are allowed here, though they cannot be encoded.
    pub fn new<S>(data: Vec<T>, shape: S) -> Result<Self, ShapeError>
    where
        Shape: From<S>,
    {
        let shape = Shape::from(shape);

        if shape.checked_elements() == Some(data.len()) {
            Ok(Self::new_unchecked(data, shape))
        } else {
            Err(ShapeError {
                shape,
                values: data.len(),
            })
        }
    }

    pub(crate) fn new_unchecked(data: Vec<T>, shape: Shape) -> Self {
        Self { data, shape }
    }

    /// Returns the shape, outer to inner.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }
}

impl<T, I> Index<I> for Array<T>
where
    I: AsRef<[usize]>,
{
    type Output = T;

    fn index(&self, index: I) -> &Self::Output {
        self.get(index)
            .expect("index has wrong number of dimensions or is out of bounds")
    }
}

impl<T> From<Vec<T>> for Array<T> {
    fn from(data: Vec<T>) -> Self {
        Self::from_vec(data)
    }
}

/// A shape that does not match the number of values in an array.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ShapeError {
    shape: Shape,
    values: usize,
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ShapeError { shape, values } = self;
        write!(f, "shape {shape} does not hold {values} values")
    }
}

impl std::error::Error for ShapeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_checks_elements() {
        assert!(Array::new(vec![1, 2, 3, 4, 5, 6], [2, 3]).is_ok());
        assert!(Array::new(vec![1, 2, 3], 3).is_ok());
        assert!(Array::new(Vec::<i16>::new(), [3, 0]).is_ok());

        let error = Array::new(vec![1, 2, 3, 4, 5], [2, 3]).unwrap_err();
        assert_eq!(error.to_string(), "shape [2x3] does not hold 5 values");

        assert!(Array::new(Vec::<i32>::new(), Vec::<usize>::new()).is_err());
    }

    #[test]
    fn test_index_row_major() {
        let array = Array::new(vec![0, 1, 2, 3, 4, 5], [2, 3]).unwrap();

        assert_eq!(array[[0, 0]], 0);
        assert_eq!(array[[0, 2]], 2);
        assert_eq!(array[[1, 0]], 3);
        assert_eq!(array[[1, 2]], 5);
        assert_eq!(array.get([2, 0]), None);
        assert_eq!(array.get([0]), None);
    }

    #[test]
    fn test_map_keeps_shape() {
        let array = Array::new(vec![1i16, -2, 3, -4], [2, 2]).unwrap();
        let mapped = array.map(|&x| i64::from(x) * 10);

        assert_eq!(mapped.shape(), array.shape());
        assert_eq!(mapped.as_slice(), &[10, -20, 30, -40]);
    }

    #[test]
    fn test_try_map_propagates_error() {
        let array = Array::from_vec(vec![1i64, 300]);
        let result = array.try_map(|&x| u8::try_from(x));

        assert!(result.is_err());
    }
}
