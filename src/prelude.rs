//! Common traits and types that are useful for working with `vtp`
#![allow(unused_imports)]

pub use crate::array::{Buffer, DataArray, ScalarType};
pub use crate::decode::{ArrayDecoder, DecodeContext, XmlDecoder};
pub use crate::mesh::{
    AttributeRole, Attributes, CellArray, PolyData, PolyDataBuilder, TopologyKind,
};
pub use crate::traits::Numeric;
pub use crate::Writer;

pub(crate) use crate::{Error, ParseError};

pub(crate) use derive_more::{Constructor, Display, From};
