//! Turning the content of `DataArray` elements into typed values.
//!
//! Parsing the document structure and decoding the bytes of individual arrays are
//! separate concerns: the piece reader in [`crate::parse`] only ever talks to an
//! [`ArrayDecoder`], and [`XmlDecoder`] is the implementation used for `.vtp` files.

mod error;
mod xml_decoder;

pub use error::DecodeError;
pub use xml_decoder::{DataArrayFormat, DataArrayHeader, XmlDecoder};

use crate::array::Buffer;
use crate::mesh::CellArray;
use crate::parse::Element;
use crate::parse::DATA_ARRAY;

/// Byte order of binary data, from the `byte_order` attribute of `VTKFile`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteOrder {
    #[default]
    LittleEndian,
    BigEndian,
}

impl ByteOrder {
    pub fn from_attribute(value: &str) -> Option<Self> {
        match value {
            "LittleEndian" => Some(Self::LittleEndian),
            "BigEndian" => Some(Self::BigEndian),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LittleEndian => "LittleEndian",
            Self::BigEndian => "BigEndian",
        }
    }
}

/// Width of the integer that prefixes every binary block with its length in bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderType {
    #[default]
    UInt32,
    UInt64,
}

impl HeaderType {
    pub fn from_attribute(value: &str) -> Option<Self> {
        match value {
            "UInt32" => Some(Self::UInt32),
            "UInt64" => Some(Self::UInt64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UInt32 => "UInt32",
            Self::UInt64 => "UInt64",
        }
    }

    pub fn size(&self) -> usize {
        match self {
            Self::UInt32 => 4,
            Self::UInt64 => 8,
        }
    }
}

/// The compressor named in the `compressor` attribute of `VTKFile`.
///
/// Any value is accepted when the header is read; compressed arrays are only rejected
/// when one actually has to be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Compressor {
    #[default]
    None,
    ZLib,
    Lz4,
    Lzma,
    Other(String),
}

impl Compressor {
    pub fn from_attribute(value: Option<&str>) -> Self {
        match value {
            None | Some("") => Self::None,
            Some("vtkZLibDataCompressor") => Self::ZLib,
            Some("vtkLZ4DataCompressor") => Self::Lz4,
            Some("vtkLZMADataCompressor") => Self::Lzma,
            Some(other) => Self::Other(other.to_owned()),
        }
    }

    pub fn is_compressed(&self) -> bool {
        !matches!(self, Self::None)
    }

    pub fn name(&self) -> &str {
        match self {
            Self::None => "none",
            Self::ZLib => "vtkZLibDataCompressor",
            Self::Lz4 => "vtkLZ4DataCompressor",
            Self::Lzma => "vtkLZMADataCompressor",
            Self::Other(name) => name,
        }
    }
}

/// How the payload of the `AppendedData` section is stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendedEncoding {
    Raw,
    Base64,
}

impl AppendedEncoding {
    pub fn from_attribute(value: &str) -> Option<Self> {
        match value {
            "raw" => Some(Self::Raw),
            "base64" => Some(Self::Base64),
            _ => None,
        }
    }
}

/// The payload of the `AppendedData` section, shared by every array of a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppendedData<'a> {
    pub encoding: AppendedEncoding,
    pub bytes: &'a [u8],
}

/// Stream level information every decode of one file needs.
///
/// Built once from the `VTKFile` header and borrowed, read only, by every decode call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeContext<'a> {
    pub compressor: Compressor,
    pub byte_order: ByteOrder,
    pub header_type: HeaderType,
    pub appended: Option<AppendedData<'a>>,
}

/// The result of decoding one `DataArray`
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedArray {
    pub values: Buffer,
    pub components: usize,
}

/// Decodes the raw content of array elements.
///
/// `count` is the number of tuples (or cells) the caller expects. Implementations
/// must not touch anything but the element they are handed and the context.
pub trait ArrayDecoder {
    /// decode a geometry or attribute array holding `count` tuples
    fn decode_array(
        &self,
        count: usize,
        array: &Element,
        ctx: &DecodeContext<'_>,
    ) -> Result<DecodedArray, DecodeError>;

    /// decode the `offsets` / `connectivity` pair of a cell block holding `count` cells
    /// into a legacy counted list `[n0, i.., n1, i.., ...]`
    fn decode_cells(
        &self,
        count: usize,
        block: &Element,
        ctx: &DecodeContext<'_>,
    ) -> Result<Vec<u32>, DecodeError> {
        let offsets = named_array(block, "offsets")?;
        let connectivity = named_array(block, "connectivity")?;

        let offsets = self.decode_array(count, offsets, ctx)?.values.to_indices()?;

        // the connectivity array is exactly as long as the last offset
        let size = offsets.last().copied().unwrap_or(0) as usize;
        let connectivity = self
            .decode_array(size, connectivity, ctx)?
            .values
            .to_indices()?;

        CellArray::from_offsets_connectivity(&offsets, &connectivity)
            .map(CellArray::into_legacy)
            .ok_or(DecodeError::InvalidOffsets)
    }
}

impl<D: ArrayDecoder + ?Sized> ArrayDecoder for &D {
    fn decode_array(
        &self,
        count: usize,
        array: &Element,
        ctx: &DecodeContext<'_>,
    ) -> Result<DecodedArray, DecodeError> {
        (**self).decode_array(count, array, ctx)
    }

    fn decode_cells(
        &self,
        count: usize,
        block: &Element,
        ctx: &DecodeContext<'_>,
    ) -> Result<Vec<u32>, DecodeError> {
        (**self).decode_cells(count, block, ctx)
    }
}

fn named_array<'e>(block: &'e Element, name: &'static str) -> Result<&'e Element, DecodeError> {
    block
        .children_named(DATA_ARRAY)
        .find(|array| array.attribute("Name") == Some(name))
        .ok_or(DecodeError::MissingCellArray(name))
}
