use super::{AppendedEncoding, ArrayDecoder, DecodeContext, DecodeError, DecodedArray};
use crate::array::{Buffer, ScalarType};
use crate::parse::Element;
use crate::utils;

/// Where the values of a `DataArray` are stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataArrayFormat {
    /// whitespace separated values inside the element
    InlineAscii,
    /// base64 encoded binary block inside the element
    InlineBase64,
    /// binary block at `offset` in the `AppendedData` section
    Appended { offset: usize },
}

/// The attributes of a `DataArray` element needed to decode it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataArrayHeader {
    pub scalar_type: ScalarType,
    pub components: usize,
    pub format: DataArrayFormat,
}

impl DataArrayHeader {
    pub fn from_element(array: &Element) -> Result<Self, DecodeError> {
        let type_name = array
            .attribute("type")
            .ok_or(DecodeError::MissingAttribute("type"))?;
        let scalar_type = ScalarType::from_type_name(type_name)
            .ok_or_else(|| DecodeError::UnsupportedType(type_name.to_owned()))?;

        let components = match array.attribute("NumberOfComponents") {
            Some(value) => match value.trim().parse::<usize>() {
                Ok(components) if components > 0 => components,
                _ => return Err(invalid("NumberOfComponents", value)),
            },
            None => 1,
        };

        let format = match array.attribute("format") {
            Some("ascii") => DataArrayFormat::InlineAscii,
            Some("binary") => DataArrayFormat::InlineBase64,
            Some("appended") => {
                let offset = array
                    .attribute("offset")
                    .ok_or(DecodeError::MissingAttribute("offset"))?;
                let offset = offset
                    .trim()
                    .parse()
                    .map_err(|_| invalid("offset", offset))?;
                DataArrayFormat::Appended { offset }
            }
            Some(other) => return Err(DecodeError::UnsupportedFormat(other.to_owned())),
            None => return Err(DecodeError::MissingAttribute("format")),
        };

        Ok(Self {
            scalar_type,
            components,
            format,
        })
    }
}

fn invalid(attribute: &'static str, value: &str) -> DecodeError {
    DecodeError::InvalidAttribute {
        attribute,
        value: value.to_owned(),
    }
}

/// Decoder for the array encodings of VTK XML files: ascii, inline base64 and the
/// raw or base64 appended section
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlDecoder;

impl ArrayDecoder for XmlDecoder {
    fn decode_array(
        &self,
        count: usize,
        array: &Element,
        ctx: &DecodeContext<'_>,
    ) -> Result<DecodedArray, DecodeError> {
        let header = DataArrayHeader::from_element(array)?;

        let expected = count
            .checked_mul(header.components)
            .ok_or(DecodeError::LengthOverflow)?;

        let values = match header.format {
            DataArrayFormat::InlineAscii => Buffer::parse_ascii(header.scalar_type, array.text())?,
            DataArrayFormat::InlineBase64 => {
                check_uncompressed(ctx)?;
                decode_inline_binary(array.text(), header.scalar_type, expected, ctx)?
            }
            DataArrayFormat::Appended { offset } => {
                check_uncompressed(ctx)?;
                decode_appended(offset, header.scalar_type, expected, ctx)?
            }
        };

        if values.len() != expected {
            return Err(DecodeError::LengthMismatch {
                expected,
                actual: values.len(),
            });
        }

        log::trace!(
            "decoded {} array `{}` ({} x {})",
            header.scalar_type,
            array.attribute("Name").unwrap_or_default(),
            count,
            header.components
        );

        Ok(DecodedArray {
            values,
            components: header.components,
        })
    }
}

fn check_uncompressed(ctx: &DecodeContext<'_>) -> Result<(), DecodeError> {
    if ctx.compressor.is_compressed() {
        Err(DecodeError::UnsupportedCompressor(
            ctx.compressor.name().to_owned(),
        ))
    } else {
        Ok(())
    }
}

/// check the byte count of a binary block against the number of values we expect and
/// decode it
fn read_block(
    declared: u64,
    data: &[u8],
    scalar_type: ScalarType,
    expected: usize,
    ctx: &DecodeContext<'_>,
) -> Result<Buffer, DecodeError> {
    let expected_bytes = expected
        .checked_mul(scalar_type.size())
        .ok_or(DecodeError::LengthOverflow)?;

    if declared != expected_bytes as u64 {
        return Err(DecodeError::ByteLengthMismatch {
            declared,
            expected: expected_bytes,
            scalar_type,
        });
    }

    let block = data.get(..expected_bytes).ok_or(DecodeError::Truncated {
        needed: expected_bytes,
        available: data.len(),
    })?;

    Ok(Buffer::from_bytes(scalar_type, block, ctx.byte_order))
}

fn read_header(bytes: &[u8], ctx: &DecodeContext<'_>) -> Result<u64, DecodeError> {
    utils::read_header_int(bytes, ctx.header_type, ctx.byte_order).ok_or(DecodeError::Truncated {
        needed: ctx.header_type.size(),
        available: bytes.len(),
    })
}

/// Inline binary data is the byte count header followed by the values. Writers either
/// encode both as one base64 stream or encode the header on its own; a header encoded
/// on its own always ends in padding since neither header width is a multiple of 3.
fn decode_inline_binary(
    text: &str,
    scalar_type: ScalarType,
    expected: usize,
    ctx: &DecodeContext<'_>,
) -> Result<Buffer, DecodeError> {
    let encoded: Vec<u8> = text
        .bytes()
        .filter(|byte| !byte.is_ascii_whitespace())
        .collect();

    let header_size = ctx.header_type.size();
    let header_chars = utils::base64_len(header_size);

    let separate_header = encoded
        .get(..header_chars)
        .filter(|run| run.contains(&b'='))
        .and_then(|run| base64::decode(run).ok())
        .filter(|header| header.len() == header_size);

    let (declared, data) = if let Some(header) = separate_header {
        let declared = read_header(&header, ctx)?;
        (declared, base64::decode(&encoded[header_chars..])?)
    } else {
        let mut decoded = base64::decode(&encoded)?;
        let declared = read_header(&decoded, ctx)?;
        decoded.drain(..header_size);
        (declared, decoded)
    };

    read_block(declared, &data, scalar_type, expected, ctx)
}

fn decode_appended(
    offset: usize,
    scalar_type: ScalarType,
    expected: usize,
    ctx: &DecodeContext<'_>,
) -> Result<Buffer, DecodeError> {
    let appended = ctx.appended.ok_or(DecodeError::MissingAppendedData)?;

    let start = appended.bytes.get(offset..).ok_or(DecodeError::Truncated {
        needed: offset,
        available: appended.bytes.len(),
    })?;

    let header_size = ctx.header_type.size();

    match appended.encoding {
        AppendedEncoding::Raw => {
            let declared = read_header(start, ctx)?;
            read_block(declared, &start[header_size..], scalar_type, expected, ctx)
        }
        AppendedEncoding::Base64 => {
            // the header and the values are separate base64 runs
            let header_chars = utils::base64_len(header_size);
            let header_run = start.get(..header_chars).ok_or(DecodeError::Truncated {
                needed: header_chars,
                available: start.len(),
            })?;
            let declared = read_header(&base64::decode(header_run)?, ctx)?;

            let data_chars = usize::try_from(declared)
                .ok()
                .and_then(|bytes| bytes.checked_add(2))
                .map(|bytes| bytes / 3 * 4)
                .ok_or(DecodeError::LengthOverflow)?;
            let rest = &start[header_chars..];
            let data_run = rest.get(..data_chars).ok_or(DecodeError::Truncated {
                needed: data_chars,
                available: rest.len(),
            })?;

            read_block(
                declared,
                &base64::decode(data_run)?,
                scalar_type,
                expected,
                ctx,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::{AppendedData, ByteOrder, Compressor, HeaderType};

    fn array(format: &str, ty: &str, components: &str, text: &str) -> Element {
        Element::new("DataArray")
            .with_attribute("type", ty)
            .with_attribute("Name", "test")
            .with_attribute("NumberOfComponents", components)
            .with_attribute("format", format)
            .with_text(text)
    }

    fn binary_block(header: &[u8], values: &[u8]) -> Vec<u8> {
        let mut out = header.to_vec();
        out.extend_from_slice(values);
        out
    }

    #[test]
    fn ascii_array() {
        let element = array("ascii", "Float32", "3", "0 0 0 1 0 0");
        let decoded = XmlDecoder
            .decode_array(2, &element, &DecodeContext::default())
            .unwrap();

        assert_eq!(decoded.components, 3);
        assert_eq!(
            decoded.values,
            Buffer::Float32(vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0])
        );
    }

    #[test]
    fn ascii_wrong_length() {
        let element = array("ascii", "Int32", "1", "1 2 3");
        let err = XmlDecoder
            .decode_array(2, &element, &DecodeContext::default())
            .unwrap_err();

        assert!(matches!(
            err,
            DecodeError::LengthMismatch {
                expected: 2,
                actual: 3
            }
        ));
    }

    #[test]
    fn inline_binary_single_stream() {
        let raw = binary_block(&8u32.to_le_bytes(), &[1i32.to_le_bytes(), (-7i32).to_le_bytes()].concat());
        let element = array("binary", "Int32", "1", &base64::encode(&raw));

        let decoded = XmlDecoder
            .decode_array(2, &element, &DecodeContext::default())
            .unwrap();
        assert_eq!(decoded.values, Buffer::Int32(vec![1, -7]));
    }

    #[test]
    fn inline_binary_separate_header_big_endian() {
        let header = base64::encode(&12u64.to_be_bytes());
        let data = base64::encode(
            &[1.5f32.to_be_bytes(), 2.5f32.to_be_bytes(), 3.5f32.to_be_bytes()].concat(),
        );
        let element = array("binary", "Float32", "3", &format!("\n  {header}{data}\n"));

        let ctx = DecodeContext {
            byte_order: ByteOrder::BigEndian,
            header_type: HeaderType::UInt64,
            ..Default::default()
        };

        let decoded = XmlDecoder.decode_array(1, &element, &ctx).unwrap();
        assert_eq!(decoded.values, Buffer::Float32(vec![1.5, 2.5, 3.5]));
    }

    #[test]
    fn byte_count_must_match() {
        let raw = binary_block(&4u32.to_le_bytes(), &[0u8; 8]);
        let element = array("binary", "Float32", "1", &base64::encode(&raw));

        let err = XmlDecoder
            .decode_array(2, &element, &DecodeContext::default())
            .unwrap_err();
        assert!(matches!(
            err,
            DecodeError::ByteLengthMismatch {
                declared: 4,
                expected: 8,
                ..
            }
        ));
    }

    #[test]
    fn raw_appended_offsets() {
        let mut payload = binary_block(&2u32.to_le_bytes(), &[5u8, 6]);
        let second = payload.len();
        payload.extend(binary_block(&8u32.to_le_bytes(), &9.0f64.to_le_bytes()));

        let ctx = DecodeContext {
            appended: Some(AppendedData {
                encoding: AppendedEncoding::Raw,
                bytes: &payload,
            }),
            ..Default::default()
        };

        let first = Element::new("DataArray")
            .with_attribute("type", "UInt8")
            .with_attribute("format", "appended")
            .with_attribute("offset", "0");
        let later = Element::new("DataArray")
            .with_attribute("type", "Float64")
            .with_attribute("format", "appended")
            .with_attribute("offset", &second.to_string());

        assert_eq!(
            XmlDecoder.decode_array(2, &first, &ctx).unwrap().values,
            Buffer::UInt8(vec![5, 6])
        );
        assert_eq!(
            XmlDecoder.decode_array(1, &later, &ctx).unwrap().values,
            Buffer::Float64(vec![9.0])
        );
    }

    #[test]
    fn base64_appended() {
        let mut payload = base64::encode(&4u32.to_le_bytes()).into_bytes();
        payload.extend(base64::encode(&3u16.to_le_bytes().repeat(2)).into_bytes());

        let ctx = DecodeContext {
            appended: Some(AppendedData {
                encoding: AppendedEncoding::Base64,
                bytes: &payload,
            }),
            ..Default::default()
        };

        let element = Element::new("DataArray")
            .with_attribute("type", "UInt16")
            .with_attribute("format", "appended")
            .with_attribute("offset", "0");

        assert_eq!(
            XmlDecoder.decode_array(2, &element, &ctx).unwrap().values,
            Buffer::UInt16(vec![3, 3])
        );
    }

    #[test]
    fn appended_without_section() {
        let element = Element::new("DataArray")
            .with_attribute("type", "UInt16")
            .with_attribute("format", "appended")
            .with_attribute("offset", "0");
        let err = XmlDecoder
            .decode_array(1, &element, &DecodeContext::default())
            .unwrap_err();
        assert!(matches!(err, DecodeError::MissingAppendedData));
    }

    #[test]
    fn compressed_binary_is_rejected() {
        let element = array("binary", "Int32", "1", "AAAAAA==");
        let ctx = DecodeContext {
            compressor: Compressor::ZLib,
            ..Default::default()
        };

        let err = XmlDecoder.decode_array(0, &element, &ctx).unwrap_err();
        assert!(matches!(err, DecodeError::UnsupportedCompressor(name) if name == "vtkZLibDataCompressor"));

        // ascii arrays never need the compressor
        let ascii = array("ascii", "Int32", "1", "4");
        assert!(XmlDecoder.decode_array(1, &ascii, &ctx).is_ok());
    }

    #[test]
    fn header_attribute_errors() {
        let ctx = DecodeContext::default();

        let no_type = Element::new("DataArray").with_attribute("format", "ascii");
        assert!(matches!(
            XmlDecoder.decode_array(0, &no_type, &ctx).unwrap_err(),
            DecodeError::MissingAttribute("type")
        ));

        let bad_type = array("ascii", "Float16", "1", "");
        assert!(matches!(
            XmlDecoder.decode_array(0, &bad_type, &ctx).unwrap_err(),
            DecodeError::UnsupportedType(_)
        ));

        let bad_components = array("ascii", "Float32", "zero", "");
        assert!(matches!(
            XmlDecoder.decode_array(0, &bad_components, &ctx).unwrap_err(),
            DecodeError::InvalidAttribute {
                attribute: "NumberOfComponents",
                ..
            }
        ));
    }

    #[test]
    fn cells_from_offsets() {
        let block = Element::new("Polys")
            .with_child(array("ascii", "Int64", "1", "0 1 2 0 2 3 4").with_attribute("Name", "connectivity"))
            .with_child(array("ascii", "Int64", "1", "3 7").with_attribute("Name", "offsets"));

        let legacy = XmlDecoder
            .decode_cells(2, &block, &DecodeContext::default())
            .unwrap();
        assert_eq!(legacy, vec![3, 0, 1, 2, 4, 0, 2, 3, 4]);
    }

    #[test]
    fn cells_missing_connectivity() {
        let block = Element::new("Lines")
            .with_child(array("ascii", "Int64", "1", "2").with_attribute("Name", "offsets"));

        let err = XmlDecoder
            .decode_cells(1, &block, &DecodeContext::default())
            .unwrap_err();
        assert!(matches!(err, DecodeError::MissingCellArray("connectivity")));
    }
}
