//! # Traits
//!
//! Numeric plumbing shared by the decoder and the writer. Every scalar type that may
//! appear in the `type` attribute of a `DataArray` element implements [`Numeric`], which
//! is what lets a single generic routine handle byte swapping, ascii tokens and little
//! endian serialisation for all ten of them.

use crate::array::ScalarType;
use crate::decode::ByteOrder;
use num_traits::{NumCast, ToPrimitive};
use std::fmt::Debug;
use std::str::FromStr;

/// A scalar value that can be stored in a [`Buffer`](crate::Buffer)
pub trait Numeric: Copy + Debug + PartialEq + FromStr + NumCast + ToPrimitive + 'static {
    /// number of bytes a single value occupies in a binary payload
    const SIZE: usize;

    /// the VTK type tag for this scalar
    fn as_scalar_type() -> ScalarType;

    /// read one value from exactly `Self::SIZE` bytes
    fn from_bytes(bytes: &[u8], order: ByteOrder) -> Self;

    fn extend_le_bytes(&self, out: &mut Vec<u8>);

    /// append the ascii representation of this value to `out`
    fn push_ascii(&self, out: &mut String);
}

macro_rules! impl_numeric {
    ($num:ty, $variant:ident, |$value:ident, $out:ident| $ascii:block) => {
        impl Numeric for $num {
            const SIZE: usize = std::mem::size_of::<$num>();

            fn as_scalar_type() -> ScalarType {
                ScalarType::$variant
            }

            fn from_bytes(bytes: &[u8], order: ByteOrder) -> Self {
                let mut arr = [0; std::mem::size_of::<$num>()];
                arr.copy_from_slice(bytes);

                match order {
                    ByteOrder::LittleEndian => <$num>::from_le_bytes(arr),
                    ByteOrder::BigEndian => <$num>::from_be_bytes(arr),
                }
            }

            fn extend_le_bytes(&self, out: &mut Vec<u8>) {
                out.extend_from_slice(&self.to_le_bytes());
            }

            fn push_ascii(&self, $out: &mut String) {
                let $value = *self;
                $ascii
            }
        }
    };
}

macro_rules! impl_numeric_int {
    ($($num:ty => $variant:ident),*) => {
        $(
            impl_numeric!($num, $variant, |value, out| {
                use std::fmt::Write;
                // writing into a String cannot fail
                let _ = write!(out, "{}", value);
            });
        )*
    };
}

macro_rules! impl_numeric_float {
    ($($num:ty => $variant:ident),*) => {
        $(
            impl_numeric!($num, $variant, |value, out| {
                // ryu gives the shortest representation that parses back to the same bits
                let mut buffer = ryu::Buffer::new();
                out.push_str(buffer.format(value));
            });
        )*
    };
}

impl_numeric_int!(
    i8 => Int8,
    u8 => UInt8,
    i16 => Int16,
    u16 => UInt16,
    i32 => Int32,
    u32 => UInt32,
    i64 => Int64,
    u64 => UInt64
);

impl_numeric_float!(f32 => Float32, f64 => Float64);
