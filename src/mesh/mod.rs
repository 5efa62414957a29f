//! # Mesh Information
//!
//! A [`PolyData`] is the in-memory form of one `Piece` of a `.vtp` file: point
//! coordinates, four kinds of cells (vertices, lines, triangle strips and polygons) and
//! the attribute tables attached to points, cells and the dataset as a whole.
//!
//! Meshes are assembled through a [`PolyDataBuilder`] and only handed out once every
//! part has been set, so a half built mesh is never observable.

mod attributes;
mod cells;

pub use attributes::{AttributeRole, Attributes};
pub use cells::{CellArray, Cells};

use crate::array::DataArray;
use std::fmt;

/// The four cell categories of a polygonal mesh, in the order they are read.
///
/// Each kind maps to the `NumberOf*` attribute on a `Piece` that declares how many
/// cells it has, and to the child element holding its connectivity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TopologyKind {
    Verts,
    Lines,
    Strips,
    Polys,
}

impl TopologyKind {
    pub const ALL: [TopologyKind; 4] = [Self::Verts, Self::Lines, Self::Strips, Self::Polys];

    /// name of the `Piece` attribute declaring the number of cells
    pub fn count_attribute(&self) -> &'static str {
        match self {
            Self::Verts => "NumberOfVerts",
            Self::Lines => "NumberOfLines",
            Self::Strips => "NumberOfStrips",
            Self::Polys => "NumberOfPolys",
        }
    }

    /// name of the element holding the `offsets` and `connectivity` arrays
    pub fn block_name(&self) -> &'static str {
        match self {
            Self::Verts => "Verts",
            Self::Lines => "Lines",
            Self::Strips => "Strips",
            Self::Polys => "Polys",
        }
    }
}

impl fmt::Display for TopologyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.block_name())
    }
}

/// One polygonal dataset, reconstructed from a single `Piece`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolyData {
    points: Option<DataArray>,
    verts: CellArray,
    lines: CellArray,
    strips: CellArray,
    polys: CellArray,
    point_data: Attributes,
    cell_data: Attributes,
    field_data: Attributes,
}

impl PolyData {
    pub fn builder() -> PolyDataBuilder {
        PolyDataBuilder::default()
    }

    /// point coordinates, three components per point
    pub fn points(&self) -> Option<&DataArray> {
        self.points.as_ref()
    }

    pub fn num_points(&self) -> usize {
        self.points.as_ref().map_or(0, DataArray::num_tuples)
    }

    pub fn cells(&self, kind: TopologyKind) -> &CellArray {
        match kind {
            TopologyKind::Verts => &self.verts,
            TopologyKind::Lines => &self.lines,
            TopologyKind::Strips => &self.strips,
            TopologyKind::Polys => &self.polys,
        }
    }

    pub fn verts(&self) -> &CellArray {
        &self.verts
    }

    pub fn lines(&self) -> &CellArray {
        &self.lines
    }

    pub fn strips(&self) -> &CellArray {
        &self.strips
    }

    pub fn polys(&self) -> &CellArray {
        &self.polys
    }

    /// total number of cells over all four kinds
    pub fn num_cells(&self) -> usize {
        TopologyKind::ALL
            .iter()
            .map(|&kind| self.cells(kind).num_cells())
            .sum()
    }

    pub fn point_data(&self) -> &Attributes {
        &self.point_data
    }

    pub fn cell_data(&self) -> &Attributes {
        &self.cell_data
    }

    /// dataset level arrays. Every piece read from the same file starts with the same
    /// (shared) arrays here
    pub fn field_data(&self) -> &Attributes {
        &self.field_data
    }

    pub fn point_data_mut(&mut self) -> &mut Attributes {
        &mut self.point_data
    }

    pub fn cell_data_mut(&mut self) -> &mut Attributes {
        &mut self.cell_data
    }

    pub fn field_data_mut(&mut self) -> &mut Attributes {
        &mut self.field_data
    }
}

/// Accumulates the parts of a [`PolyData`]
#[derive(Debug, Default)]
pub struct PolyDataBuilder {
    mesh: PolyData,
}

impl PolyDataBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn points(&mut self, points: DataArray) -> &mut Self {
        self.mesh.points = Some(points);
        self
    }

    pub fn cells(&mut self, kind: TopologyKind, cells: CellArray) -> &mut Self {
        let slot = match kind {
            TopologyKind::Verts => &mut self.mesh.verts,
            TopologyKind::Lines => &mut self.mesh.lines,
            TopologyKind::Strips => &mut self.mesh.strips,
            TopologyKind::Polys => &mut self.mesh.polys,
        };
        *slot = cells;
        self
    }

    pub fn point_data(&mut self, point_data: Attributes) -> &mut Self {
        self.mesh.point_data = point_data;
        self
    }

    pub fn cell_data(&mut self, cell_data: Attributes) -> &mut Self {
        self.mesh.cell_data = cell_data;
        self
    }

    pub fn field_data(&mut self, field_data: Attributes) -> &mut Self {
        self.mesh.field_data = field_data;
        self
    }

    pub fn build(self) -> PolyData {
        self.mesh
    }
}
