use super::error::{Block, Malformed, MissingDataset, ParseError, PieceError};
use super::extract::{decode_attribute_table, extract_points, reconstruct_cells};
use super::field::collect_field_arrays;
use super::{Element, CELL_DATA, PIECE, POINT_DATA};
use crate::array::DataArray;
use crate::decode::{ArrayDecoder, DecodeContext};
use crate::mesh::{Attributes, PolyData, TopologyKind};

use std::iter::FusedIterator;
use std::sync::Arc;

/// Reads the `Piece` children of a dataset element one at a time, in document order.
///
/// Field data is decoded once, when the reader is created. The first piece that fails
/// ends the sequence: its error is yielded and later pieces are never read.
pub struct PieceReader<'a, D: ?Sized> {
    pieces: Vec<&'a Element>,
    position: usize,
    field_arrays: Vec<Arc<DataArray>>,
    ctx: &'a DecodeContext<'a>,
    decoder: &'a D,
    failed: bool,
}

impl<'a, D: ArrayDecoder + ?Sized> PieceReader<'a, D> {
    pub fn new(dataset: &'a Element, ctx: &'a DecodeContext<'a>, decoder: &'a D) -> Result<Self, ParseError> {
        let field_arrays = collect_field_arrays(dataset, ctx, decoder).map_err(ParseError::FieldData)?;
        let pieces: Vec<&Element> = dataset.children_named(PIECE).collect();

        log::debug!(
            "reading {} pieces with {} field arrays",
            pieces.len(),
            field_arrays.len()
        );

        Ok(Self {
            pieces,
            position: 0,
            field_arrays,
            ctx,
            decoder,
            failed: false,
        })
    }

    /// the decoded `FieldData` arrays shared by every piece
    pub fn field_arrays(&self) -> &[Arc<DataArray>] {
        &self.field_arrays
    }

    fn assemble(&self, index: usize, piece: &Element) -> Result<PolyData, PieceError> {
        let mut builder = PolyData::builder();

        let num_points = extract_points(&mut builder, piece, self.ctx, self.decoder)
            .map_err(at(index, Block::Points))?;

        let mut num_cells = 0;
        for kind in TopologyKind::ALL {
            num_cells += reconstruct_cells(&mut builder, kind, piece, self.ctx, self.decoder)
                .map_err(at(index, Block::Cells(kind)))?;
        }

        let point_data = decode_attribute_table(num_points, piece.child(POINT_DATA), self.ctx, self.decoder)
            .map_err(at(index, Block::PointData))?;
        let cell_data = decode_attribute_table(num_cells, piece.child(CELL_DATA), self.ctx, self.decoder)
            .map_err(at(index, Block::CellData))?;

        let mut field_data = Attributes::new();
        field_data.extend_shared(&self.field_arrays);

        builder
            .point_data(point_data)
            .cell_data(cell_data)
            .field_data(field_data);

        log::debug!("piece {index}: {num_points} points, {num_cells} cells");

        Ok(builder.build())
    }
}

fn at(piece: usize, block: Block) -> impl FnOnce(Malformed) -> PieceError {
    move |reason| PieceError::new(piece, block, reason)
}

impl<'a, D: ArrayDecoder + ?Sized> Iterator for PieceReader<'a, D> {
    type Item = Result<PolyData, PieceError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let index = self.position;
        let piece = *self.pieces.get(index)?;
        self.position += 1;

        let result = self.assemble(index, piece);
        if result.is_err() {
            self.failed = true;
        }

        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failed {
            (0, Some(0))
        } else {
            (0, Some(self.pieces.len() - self.position))
        }
    }
}

impl<'a, D: ArrayDecoder + ?Sized> FusedIterator for PieceReader<'a, D> {}

/// Read every piece of the `dataset_kind` element below `root`.
///
/// Either all pieces are returned, in document order, or the error of the first piece
/// that could not be read.
pub fn read_pieces<D: ArrayDecoder + ?Sized>(
    root: &Element,
    dataset_kind: &str,
    ctx: &DecodeContext<'_>,
    decoder: &D,
) -> Result<Vec<PolyData>, ParseError> {
    let dataset = root
        .child(dataset_kind)
        .ok_or_else(|| MissingDataset::new(dataset_kind.into()))?;

    PieceReader::new(dataset, ctx, decoder)?
        .map(|piece| piece.map_err(ParseError::from))
        .collect()
}
