use crate::array::DataArray;
use std::sync::Arc;

/// The special meaning a `PointData` / `CellData` element can give to one of its arrays
/// through its `Scalars`, `Vectors`, `Normals`, `Tensors` and `TCoords` attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeRole {
    Scalars,
    Vectors,
    Normals,
    Tensors,
    TCoords,
}

impl AttributeRole {
    pub const ALL: [AttributeRole; 5] = [
        Self::Scalars,
        Self::Vectors,
        Self::Normals,
        Self::Tensors,
        Self::TCoords,
    ];

    /// the xml attribute carrying the name of the active array
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scalars => "Scalars",
            Self::Vectors => "Vectors",
            Self::Normals => "Normals",
            Self::Tensors => "Tensors",
            Self::TCoords => "TCoords",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// An ordered table of attribute arrays.
///
/// Arrays are kept in insertion order and names do not have to be unique. Arrays are
/// stored behind an `Arc` so tables can share values (field data is shared by every
/// piece of a file); mutation through [`Attributes::get_mut`] copies the array first, so
/// changing one table never changes another.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    arrays: Vec<Arc<DataArray>>,
    active: [Option<usize>; 5],
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// append an array, returning its position in the table
    pub fn push<A: Into<Arc<DataArray>>>(&mut self, array: A) -> usize {
        self.arrays.push(array.into());
        self.arrays.len() - 1
    }

    /// append shared arrays in order without copying their values
    pub fn extend_shared(&mut self, arrays: &[Arc<DataArray>]) {
        self.arrays.extend(arrays.iter().cloned());
    }

    /// mark the first array called `name` as the active array for `role`.
    ///
    /// Returns false (and leaves the binding untouched) when no array has that name.
    pub fn set_active(&mut self, role: AttributeRole, name: &str) -> bool {
        match self.position(name) {
            Some(idx) => {
                self.active[role.index()] = Some(idx);
                true
            }
            None => false,
        }
    }

    pub fn active(&self, role: AttributeRole) -> Option<&DataArray> {
        self.active[role.index()]
            .and_then(|idx| self.arrays.get(idx))
            .map(|array| array.as_ref())
    }

    /// first array with the given name
    pub fn get(&self, name: &str) -> Option<&DataArray> {
        self.arrays
            .iter()
            .find(|array| array.name() == name)
            .map(|array| array.as_ref())
    }

    /// mutable access to the first array with the given name. The array is copied if
    /// another table still shares it.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut DataArray> {
        let idx = self.position(name)?;
        Some(Arc::make_mut(&mut self.arrays[idx]))
    }

    /// the shared handle of the first array with the given name
    pub fn shared(&self, name: &str) -> Option<&Arc<DataArray>> {
        self.arrays.iter().find(|array| array.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DataArray> + '_ {
        self.arrays.iter().map(|array| array.as_ref())
    }

    pub fn arrays(&self) -> &[Arc<DataArray>] {
        &self.arrays
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.arrays.iter().map(|array| array.name())
    }

    pub fn len(&self) -> usize {
        self.arrays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arrays.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.arrays.iter().position(|array| array.name() == name)
    }
}
