//! reading and parsing xml VTK PolyData files
//!
//! most of the time you will only need [`read_polydata`](crate::read_polydata) or
//! [`parse_polydata`](crate::parse_polydata). The stages below are public so a custom
//! [`ArrayDecoder`](crate::decode::ArrayDecoder) can be used with the same piece reader.

mod document;
mod error;
mod event_summary;
mod extract;
mod field;
mod header;
mod piece;

pub use document::{Document, Element};
pub use error::*;
pub use extract::{decode_attribute_table, extract_attribute_array, extract_points, read_count, reconstruct_cells};
pub use field::collect_field_arrays;
pub use header::{FileHeader, Version};
pub use piece::{read_pieces, PieceReader};

use crate::decode::XmlDecoder;
use crate::mesh::PolyData;
use crate::prelude::*;

use std::path::Path;

pub const VTK_FILE: &str = "VTKFile";
/// dataset kind selector for polygonal data
pub const POLY_DATA: &str = "PolyData";
pub const PIECE: &str = "Piece";
pub const POINTS: &str = "Points";
pub const POINT_DATA: &str = "PointData";
pub const CELL_DATA: &str = "CellData";
pub const FIELD_DATA: &str = "FieldData";
pub const DATA_ARRAY: &str = "DataArray";
pub const APPENDED_DATA: &str = "AppendedData";
pub const NUMBER_OF_POINTS: &str = "NumberOfPoints";
pub const NUMBER_OF_TUPLES: &str = "NumberOfTuples";

/// read in and parse an entire `.vtp` file for a given path
pub fn read_polydata<P: AsRef<Path>>(path: P) -> Result<Vec<PolyData>, Error> {
    let bytes = std::fs::read(path)?;
    parse_polydata(&bytes)
}

/// parse an in-memory `.vtp` document into its pieces
pub fn parse_polydata(bytes: &[u8]) -> Result<Vec<PolyData>, Error> {
    let document = Document::parse(bytes).map_err(ParseError::from)?;

    let header = FileHeader::from_root(document.root(), POLY_DATA).map_err(ParseError::from)?;
    let ctx = header.decode_context(&document).map_err(ParseError::from)?;

    let pieces = read_pieces(document.root(), POLY_DATA, &ctx, &XmlDecoder)?;

    Ok(pieces)
}
