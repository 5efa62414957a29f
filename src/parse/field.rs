use super::error::ArrayDecode;
use super::extract::extract_attribute_array;
use super::{Element, DATA_ARRAY, FIELD_DATA};
use crate::array::DataArray;
use crate::decode::{ArrayDecoder, DecodeContext};

use std::sync::Arc;

/// decode the dataset level `FieldData` arrays, in declaration order.
///
/// This runs once per document; every piece receives the same shared arrays.
pub fn collect_field_arrays<D: ArrayDecoder + ?Sized>(
    dataset: &Element,
    ctx: &DecodeContext<'_>,
    decoder: &D,
) -> Result<Vec<Arc<DataArray>>, ArrayDecode> {
    let field = match dataset.child(FIELD_DATA) {
        Some(field) => field,
        None => return Ok(Vec::new()),
    };

    field
        .children_named(DATA_ARRAY)
        .map(|array| extract_attribute_array(array, ctx, decoder).map(Arc::new))
        .collect()
}
