use crate::decode::{ByteOrder, DecodeError};
use crate::traits::Numeric;
use num_traits::ToPrimitive;
use std::fmt;

/// The numeric type tag of a `DataArray` element (its `type` attribute)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float32,
    Float64,
}

impl ScalarType {
    /// parse the `type` attribute of a `DataArray`
    pub fn from_type_name(name: &str) -> Option<Self> {
        let ty = match name {
            "Int8" => Self::Int8,
            "UInt8" => Self::UInt8,
            "Int16" => Self::Int16,
            "UInt16" => Self::UInt16,
            "Int32" => Self::Int32,
            "UInt32" => Self::UInt32,
            "Int64" => Self::Int64,
            "UInt64" => Self::UInt64,
            "Float32" => Self::Float32,
            "Float64" => Self::Float64,
            _ => return None,
        };

        Some(ty)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Int8 => "Int8",
            Self::UInt8 => "UInt8",
            Self::Int16 => "Int16",
            Self::UInt16 => "UInt16",
            Self::Int32 => "Int32",
            Self::UInt32 => "UInt32",
            Self::Int64 => "Int64",
            Self::UInt64 => "UInt64",
            Self::Float32 => "Float32",
            Self::Float64 => "Float64",
        }
    }

    /// size of a single value in bytes
    pub fn size(&self) -> usize {
        match self {
            Self::Int8 | Self::UInt8 => 1,
            Self::Int16 | Self::UInt16 => 2,
            Self::Int32 | Self::UInt32 | Self::Float32 => 4,
            Self::Int64 | Self::UInt64 | Self::Float64 => 8,
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed storage for the values of a decoded array.
///
/// Values keep the exact type declared in the file, nothing is widened on read.
#[derive(Debug, Clone, PartialEq)]
pub enum Buffer {
    Int8(Vec<i8>),
    UInt8(Vec<u8>),
    Int16(Vec<i16>),
    UInt16(Vec<u16>),
    Int32(Vec<i32>),
    UInt32(Vec<u32>),
    Int64(Vec<i64>),
    UInt64(Vec<u64>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
}

/// run `$body` with `$values` bound to the inner vector, whatever its type
macro_rules! dispatch {
    ($buffer:expr, $values:ident => $body:expr) => {
        match $buffer {
            Buffer::Int8($values) => $body,
            Buffer::UInt8($values) => $body,
            Buffer::Int16($values) => $body,
            Buffer::UInt16($values) => $body,
            Buffer::Int32($values) => $body,
            Buffer::UInt32($values) => $body,
            Buffer::Int64($values) => $body,
            Buffer::UInt64($values) => $body,
            Buffer::Float32($values) => $body,
            Buffer::Float64($values) => $body,
        }
    };
}

/// run `$body` with `$num` aliased to the rust type of a scalar type tag and `$wrap`
/// bound to the matching `Buffer` constructor
macro_rules! with_scalar_type {
    ($ty:expr, |$num:ident, $wrap:ident| $body:expr) => {
        match $ty {
            ScalarType::Int8 => {
                type $num = i8;
                let $wrap = Buffer::Int8;
                $body
            }
            ScalarType::UInt8 => {
                type $num = u8;
                let $wrap = Buffer::UInt8;
                $body
            }
            ScalarType::Int16 => {
                type $num = i16;
                let $wrap = Buffer::Int16;
                $body
            }
            ScalarType::UInt16 => {
                type $num = u16;
                let $wrap = Buffer::UInt16;
                $body
            }
            ScalarType::Int32 => {
                type $num = i32;
                let $wrap = Buffer::Int32;
                $body
            }
            ScalarType::UInt32 => {
                type $num = u32;
                let $wrap = Buffer::UInt32;
                $body
            }
            ScalarType::Int64 => {
                type $num = i64;
                let $wrap = Buffer::Int64;
                $body
            }
            ScalarType::UInt64 => {
                type $num = u64;
                let $wrap = Buffer::UInt64;
                $body
            }
            ScalarType::Float32 => {
                type $num = f32;
                let $wrap = Buffer::Float32;
                $body
            }
            ScalarType::Float64 => {
                type $num = f64;
                let $wrap = Buffer::Float64;
                $body
            }
        }
    };
}

impl Buffer {
    /// an empty buffer of the given type
    pub fn empty(scalar_type: ScalarType) -> Self {
        with_scalar_type!(scalar_type, |Num, wrap| wrap(Vec::<Num>::new()))
    }

    /// number of scalar values (not tuples) in the buffer
    pub fn len(&self) -> usize {
        dispatch!(self, values => values.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn scalar_type(&self) -> ScalarType {
        dispatch!(self, values => element_type(values))
    }

    /// size of the values in bytes once serialised, without any header
    pub fn byte_len(&self) -> usize {
        self.len() * self.scalar_type().size()
    }

    /// a single value converted to `f64`
    pub fn get_f64(&self, index: usize) -> Option<f64> {
        dispatch!(self, values => values.get(index).and_then(|value| value.to_f64()))
    }

    /// copy all values into a `Vec<f64>`. 64 bit integers above 2^53 lose precision
    pub fn to_f64(&self) -> Vec<f64> {
        dispatch!(self, values => values
            .iter()
            .map(|value| value.to_f64().unwrap_or(f64::NAN))
            .collect())
    }

    /// interpret the values as point / cell indices
    pub fn to_indices(&self) -> Result<Vec<u32>, DecodeError> {
        dispatch!(self, values => values
            .iter()
            .enumerate()
            .map(|(position, value)| value.to_u32().ok_or(DecodeError::InvalidIndex { position }))
            .collect())
    }

    /// decode packed values. `bytes` must hold a whole number of values
    pub(crate) fn from_bytes(scalar_type: ScalarType, bytes: &[u8], order: ByteOrder) -> Self {
        with_scalar_type!(scalar_type, |Num, wrap| wrap(values_from_bytes::<Num>(bytes, order)))
    }

    /// parse whitespace separated ascii tokens
    pub(crate) fn parse_ascii(scalar_type: ScalarType, text: &str) -> Result<Self, DecodeError> {
        with_scalar_type!(scalar_type, |Num, wrap| parse_tokens::<Num>(text).map(wrap))
    }

    /// serialise every value as little endian bytes onto the end of `out`
    pub(crate) fn extend_le_bytes(&self, out: &mut Vec<u8>) {
        out.reserve(self.byte_len());
        dispatch!(self, values => values.iter().for_each(|value| value.extend_le_bytes(out)))
    }

    /// space separated ascii representation of the values
    pub(crate) fn to_ascii(&self) -> String {
        let mut out = String::with_capacity(self.len() * 4);

        dispatch!(self, values => {
            for (idx, value) in values.iter().enumerate() {
                if idx > 0 {
                    out.push(' ');
                }
                value.push_ascii(&mut out);
            }
        });

        out
    }
}

fn element_type<NUM: Numeric>(_: &[NUM]) -> ScalarType {
    NUM::as_scalar_type()
}

fn values_from_bytes<NUM: Numeric>(bytes: &[u8], order: ByteOrder) -> Vec<NUM> {
    bytes
        .chunks_exact(NUM::SIZE)
        .map(|chunk| NUM::from_bytes(chunk, order))
        .collect()
}

fn parse_tokens<NUM: Numeric>(text: &str) -> Result<Vec<NUM>, DecodeError> {
    text.split_ascii_whitespace()
        .map(|token| {
            token
                .parse::<NUM>()
                .map_err(|_| DecodeError::AsciiToken(token.to_owned()))
        })
        .collect()
}

macro_rules! impl_from_vec {
    ($($num:ty => $variant:ident),*) => {
        $(
            impl From<Vec<$num>> for Buffer {
                fn from(values: Vec<$num>) -> Self {
                    Buffer::$variant(values)
                }
            }
        )*
    };
}

impl_from_vec!(
    i8 => Int8,
    u8 => UInt8,
    i16 => Int16,
    u16 => UInt16,
    i32 => Int32,
    u32 => UInt32,
    i64 => Int64,
    u64 => UInt64,
    f32 => Float32,
    f64 => Float64
);
