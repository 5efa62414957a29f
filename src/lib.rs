#![doc = include_str!("../README.md")]

pub mod array;
pub mod decode;
pub mod mesh;
pub mod parse;
pub mod prelude;
mod traits;
mod utils;
mod write_vtk;

pub use array::{Buffer, DataArray, ScalarType};
pub use mesh::{AttributeRole, Attributes, CellArray, PolyData, PolyDataBuilder, TopologyKind};
pub use traits::Numeric;

pub use parse::{parse_polydata, read_polydata, ParseError};
pub use write_vtk::{write_polydata, Encoding};

pub use ndarray;

pub use quick_xml::writer::Writer;

/// general purpose error enumeration for possible causes of failure.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("An io error occured: `{0}`")]
    Io(#[from] std::io::Error),
    #[error("Error while parsing VTK xml: {0}")]
    Parse(#[from] parse::ParseError),
    #[error("Could not write XML data to file: `{0}`")]
    XmlWrite(#[from] quick_xml::Error),
}

#[cfg(test)]
mod helpers {
    use crate::prelude::*;

    use std::sync::Arc;

    /// a unit square split into two triangles, with one point array, one cell array and
    /// one field array
    pub fn triangle_pair() -> PolyData {
        let mut point_data = Attributes::new();
        point_data.push(DataArray::new(
            "temperature",
            1,
            vec![280.0f64, 281.5, 283.0, 279.25],
        ));
        point_data.set_active(AttributeRole::Scalars, "temperature");

        let mut cell_data = Attributes::new();
        cell_data.push(DataArray::new("material", 1, vec![1u8, 2]));

        let mut field_data = Attributes::new();
        field_data.extend_shared(&[Arc::new(DataArray::new("time", 1, vec![0.5f64]))]);

        let mut builder = PolyData::builder();
        builder
            .points(DataArray::new(
                "Points",
                3,
                vec![0.0f32, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0],
            ))
            .cells(
                TopologyKind::Polys,
                CellArray::from_cells([[0u32, 1, 2], [0, 2, 3]]),
            )
            .point_data(point_data)
            .cell_data(cell_data)
            .field_data(field_data);

        builder.build()
    }
}
