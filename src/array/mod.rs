//! container types for the arrays read from / written to `DataArray` elements

mod buffer;

pub use buffer::{Buffer, ScalarType};

use ndarray::Array2;

/// A named numeric array with a fixed number of components per tuple.
///
/// This is the value stored in point, cell and field attribute tables, and also
/// the type used for point coordinates (with 3 components).
#[derive(Debug, Clone, PartialEq)]
pub struct DataArray {
    name: String,
    components: usize,
    values: Buffer,
}

impl DataArray {
    /// create a new array. A component count of zero is treated as one.
    pub fn new<N, B>(name: N, components: usize, values: B) -> Self
    where
        N: Into<String>,
        B: Into<Buffer>,
    {
        Self {
            name: name.into(),
            components: components.max(1),
            values: values.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// number of scalar values that make up one tuple
    pub fn components(&self) -> usize {
        self.components
    }

    pub fn values(&self) -> &Buffer {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut Buffer {
        &mut self.values
    }

    pub fn into_values(self) -> Buffer {
        self.values
    }

    pub fn num_tuples(&self) -> usize {
        self.values.len() / self.components
    }

    /// the values of a single tuple converted to `f64`
    pub fn tuple(&self, index: usize) -> Option<Vec<f64>> {
        if index >= self.num_tuples() {
            return None;
        }

        let start = index * self.components;
        (start..start + self.components)
            .map(|idx| self.values.get_f64(idx))
            .collect()
    }

    /// copy the array into a `(tuples, components)` shaped `ndarray`
    pub fn to_array2(&self) -> Array2<f64> {
        let components = self.components;
        Array2::from_shape_fn((self.num_tuples(), components), |(tuple, component)| {
            self.values
                .get_f64(tuple * components + component)
                .unwrap_or(f64::NAN)
        })
    }
}
