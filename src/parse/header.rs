use super::error;
use super::event_summary::EventSummary;
use super::{Document, Element, APPENDED_DATA, VTK_FILE};
use crate::decode::{AppendedData, AppendedEncoding, ByteOrder, Compressor, DecodeContext, HeaderType};

/// `major.minor` from the `version` attribute of `VTKFile`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
}

impl Default for Version {
    fn default() -> Self {
        Self { major: 0, minor: 1 }
    }
}

impl Version {
    fn parse(value: &str) -> Option<Self> {
        let (major, minor) = value.trim().split_once('.')?;
        Some(Self {
            major: major.parse().ok()?,
            minor: minor.parse().ok()?,
        })
    }
}

/// The attributes of the `VTKFile` root element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    pub dataset_kind: String,
    pub version: Version,
    pub byte_order: ByteOrder,
    pub header_type: HeaderType,
    pub compressor: Compressor,
}

impl FileHeader {
    /// read the header of a document whose dataset must be `dataset_kind`
    pub fn from_root(root: &Element, dataset_kind: &str) -> Result<Self, error::Header> {
        if root.name() != VTK_FILE {
            let actual = EventSummary::element(root.name());
            return Err(error::UnexpectedElement::new(VTK_FILE, actual).into());
        }

        let file_type = get_attribute_value::<error::Header>(root, "type")?;
        check_attribute_value(file_type, "type", dataset_kind)?;

        let version = match root.attribute("version") {
            Some(value) => Version::parse(value)
                .ok_or_else(|| unexpected_value("version", "major.minor", value))?,
            None => Version::default(),
        };

        let byte_order = match root.attribute("byte_order") {
            Some(value) => ByteOrder::from_attribute(value)
                .ok_or_else(|| unexpected_value("byte_order", "LittleEndian or BigEndian", value))?,
            None => ByteOrder::default(),
        };

        let header_type = match root.attribute("header_type") {
            Some(value) => HeaderType::from_attribute(value)
                .ok_or_else(|| unexpected_value("header_type", "UInt32 or UInt64", value))?,
            None => HeaderType::default(),
        };

        let compressor = Compressor::from_attribute(root.attribute("compressor"));
        if let Compressor::Other(name) = &compressor {
            log::warn!("unknown compressor `{name}`, compressed binary arrays cannot be read");
        }

        Ok(Self {
            dataset_kind: dataset_kind.to_owned(),
            version,
            byte_order,
            header_type,
            compressor,
        })
    }

    /// the context shared by every array decode of `document`
    pub fn decode_context<'a>(&self, document: &'a Document) -> Result<DecodeContext<'a>, error::Header> {
        let appended = match document.appended() {
            Some(bytes) => {
                // the payload only exists if the element was found while splitting it out
                let encoding = document
                    .root()
                    .child(APPENDED_DATA)
                    .and_then(|element| element.attribute("encoding"))
                    .unwrap_or("raw");

                let encoding = AppendedEncoding::from_attribute(encoding).ok_or_else(|| {
                    error::UnexpectedAttributeValue::new(
                        APPENDED_DATA.into(),
                        "encoding".into(),
                        "raw or base64".into(),
                        encoding.into(),
                    )
                })?;

                Some(AppendedData { encoding, bytes })
            }
            None => None,
        };

        Ok(DecodeContext {
            compressor: self.compressor.clone(),
            byte_order: self.byte_order,
            header_type: self.header_type,
            appended,
        })
    }
}

fn unexpected_value(attribute: &str, expected: &str, actual: &str) -> error::UnexpectedAttributeValue {
    error::UnexpectedAttributeValue::new(
        VTK_FILE.into(),
        attribute.into(),
        expected.into(),
        actual.into(),
    )
}

fn get_attribute_value<'a, E>(element: &'a Element, attribute_key: &str) -> Result<&'a str, E>
where
    E: From<error::MissingAttribute>,
{
    element.attribute(attribute_key).ok_or_else(|| {
        E::from(error::MissingAttribute::new(
            element.name().into(),
            attribute_key.into(),
        ))
    })
}

/// ensure that an attribute's value is what we expect it to be, otherwise return an error with
/// some location information
fn check_attribute_value(
    value: &str,
    attribute_name: &str,
    expected_attribute_value: &str,
) -> Result<(), error::UnexpectedAttributeValue> {
    if value != expected_attribute_value {
        Err(unexpected_value(attribute_name, expected_attribute_value, value))
    } else {
        Ok(())
    }
}
