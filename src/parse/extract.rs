//! The per block stages of reading a piece: geometry, cell blocks and attribute tables.
//!
//! Every stage follows the same rule: a `NumberOf*` count of zero means the block is
//! never looked at, a non-zero count means the block has to be there.

use super::error::{self, ArrayDecode, Malformed};
use super::{Element, DATA_ARRAY, NUMBER_OF_POINTS, NUMBER_OF_TUPLES, PIECE, POINTS};
use crate::array::DataArray;
use crate::decode::{ArrayDecoder, DecodeContext, DecodeError, DecodedArray};
use crate::mesh::{AttributeRole, Attributes, CellArray, PolyDataBuilder, TopologyKind};

/// read a `NumberOf*` count from a piece. A missing attribute counts as zero
pub fn read_count(piece: &Element, attribute: &'static str) -> Result<usize, Malformed> {
    match piece.attribute(attribute) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| error::InvalidCount::new(attribute, value.to_owned()).into()),
        None => Ok(0),
    }
}

/// decode the point coordinates of a piece into the builder, returning the number of
/// points
pub fn extract_points<D: ArrayDecoder + ?Sized>(
    builder: &mut PolyDataBuilder,
    piece: &Element,
    ctx: &DecodeContext<'_>,
    decoder: &D,
) -> Result<usize, Malformed> {
    let count = read_count(piece, NUMBER_OF_POINTS)?;

    if count == 0 {
        return Ok(0);
    }

    let points = piece
        .child(POINTS)
        .ok_or_else(|| error::MissingElement::new(PIECE, POINTS))?;
    let array = sole_array(points, POINTS)?;

    let decoded = decode_named(decoder, count, array, ctx)?;

    if decoded.components != 3 {
        return Err(error::InvalidComponents::new(3, decoded.components).into());
    }

    let name = array.attribute("Name").unwrap_or(POINTS);
    builder.points(DataArray::new(name, 3, decoded.values));

    Ok(count)
}

/// decode one topology kind of a piece into the builder, returning the number of cells
pub fn reconstruct_cells<D: ArrayDecoder + ?Sized>(
    builder: &mut PolyDataBuilder,
    kind: TopologyKind,
    piece: &Element,
    ctx: &DecodeContext<'_>,
    decoder: &D,
) -> Result<usize, Malformed> {
    let count = read_count(piece, kind.count_attribute())?;

    if count == 0 {
        return Ok(0);
    }

    let block = piece
        .child(kind.block_name())
        .ok_or_else(|| error::MissingElement::new(PIECE, kind.block_name()))?;
    sole_array(block, kind.block_name())?;

    let legacy = decoder
        .decode_cells(count, block, ctx)
        .map_err(|source| ArrayDecode::new(kind.block_name().into(), source))?;

    let cells = CellArray::from_legacy(legacy)
        .ok_or_else(|| ArrayDecode::new(kind.block_name().into(), DecodeError::InvalidOffsets))?;

    if cells.num_cells() != count {
        return Err(error::CellCountMismatch::new(count, cells.num_cells()).into());
    }

    builder.cells(kind, cells);

    Ok(count)
}

/// decode an array that carries its own tuple count (`NumberOfTuples`), as found in
/// `FieldData`
pub fn extract_attribute_array<D: ArrayDecoder + ?Sized>(
    array: &Element,
    ctx: &DecodeContext<'_>,
    decoder: &D,
) -> Result<DataArray, ArrayDecode> {
    let name = array.attribute("Name").unwrap_or_default();
    let at = |source: DecodeError| ArrayDecode::new(name.into(), source);

    let tuples = array
        .attribute(NUMBER_OF_TUPLES)
        .ok_or(DecodeError::MissingAttribute(NUMBER_OF_TUPLES))
        .and_then(|value| {
            value.trim().parse::<usize>().map_err(|_| DecodeError::InvalidAttribute {
                attribute: NUMBER_OF_TUPLES,
                value: value.to_owned(),
            })
        })
        .map_err(at)?;

    let decoded = decoder.decode_array(tuples, array, ctx).map_err(at)?;

    Ok(DataArray::new(name, decoded.components, decoded.values))
}

/// decode every `DataArray` of a `PointData` or `CellData` element with `count` tuples
/// each, then bind the active attributes it names
pub fn decode_attribute_table<D: ArrayDecoder + ?Sized>(
    count: usize,
    table: Option<&Element>,
    ctx: &DecodeContext<'_>,
    decoder: &D,
) -> Result<Attributes, Malformed> {
    let mut attributes = Attributes::new();

    let table = match table {
        Some(table) if count > 0 => table,
        _ => return Ok(attributes),
    };

    for array in table.children_named(DATA_ARRAY) {
        let decoded = decode_named(decoder, count, array, ctx)?;
        let name = array.attribute("Name").unwrap_or_default();
        attributes.push(DataArray::new(name, decoded.components, decoded.values));
    }

    for role in AttributeRole::ALL {
        if let Some(name) = table.attribute(role.as_str()) {
            if !attributes.set_active(role, name) {
                log::debug!(
                    "{} names `{name}` as active {} but has no such array",
                    table.name(),
                    role.as_str()
                );
            }
        }
    }

    Ok(attributes)
}

/// the first `DataArray` below a block that must have one
fn sole_array<'e>(block: &'e Element, block_name: &'static str) -> Result<&'e Element, error::MissingElement> {
    block
        .child(DATA_ARRAY)
        .ok_or_else(|| error::MissingElement::new(block_name, DATA_ARRAY))
}

fn decode_named<D: ArrayDecoder + ?Sized>(
    decoder: &D,
    count: usize,
    array: &Element,
    ctx: &DecodeContext<'_>,
) -> Result<DecodedArray, ArrayDecode> {
    decoder.decode_array(count, array, ctx).map_err(|source| {
        ArrayDecode::new(array.attribute("Name").unwrap_or_default().into(), source)
    })
}
