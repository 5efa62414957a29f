use crate::decode::{ByteOrder, HeaderType};
use crate::traits::Numeric;

/// read the byte count that prefixes a binary block
pub(crate) fn read_header_int(bytes: &[u8], header_type: HeaderType, order: ByteOrder) -> Option<u64> {
    let header = bytes.get(..header_type.size())?;

    let value = match header_type {
        HeaderType::UInt32 => u64::from(u32::from_bytes(header, order)),
        HeaderType::UInt64 => u64::from_bytes(header, order),
    };

    Some(value)
}

/// number of base64 characters (with padding) needed to encode `bytes` bytes
pub(crate) fn base64_len(bytes: usize) -> usize {
    (bytes + 2) / 3 * 4
}

/// position of the first occurrence of `needle` in `haystack`
pub(crate) fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// position of the last occurrence of `needle` in `haystack`
pub(crate) fn rfind(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .rposition(|window| window == needle)
}
