use crate::prelude::*;

use super::event_summary::EventSummary;
use crate::decode::DecodeError;
use crate::mesh::TopologyKind;

use quick_xml::name::QName;

/// Everything that can go wrong while reading a `.vtp` document
#[derive(Debug, thiserror::Error, From)]
pub enum ParseError {
    #[error("failed to read the xml document: {0}")]
    Xml(Xml),
    #[error("invalid VTKFile header: {0}")]
    Header(Header),
    #[error("{0}")]
    MissingDataset(MissingDataset),
    #[error("failed to read FieldData: {0}")]
    FieldData(ArrayDecode),
    #[error("{0}")]
    Piece(PieceError),
}

/// Failures while building the element tree
#[derive(Debug, thiserror::Error, From)]
pub enum Xml {
    #[error("{0}")]
    MalformedXml(MalformedXml),
    #[error("{0}")]
    MalformedAttribute(MalformedAttribute),
    #[error("{0}")]
    NotUtf8(NotUtf8),
    #[error("{0}")]
    UnexpectedElement(UnexpectedElement),
    #[error("{0}")]
    AppendedSection(AppendedSection),
}

/// Failures while reading the attributes of the `VTKFile` root
#[derive(Debug, thiserror::Error, From)]
pub enum Header {
    #[error("{0}")]
    UnexpectedElement(UnexpectedElement),
    #[error("{0}")]
    MissingAttribute(MissingAttribute),
    #[error("{0}")]
    UnexpectedAttributeValue(UnexpectedAttributeValue),
}

/// Why a single piece (or one of its blocks) could not be read
#[derive(Debug, thiserror::Error, From)]
pub enum Malformed {
    #[error("{0}")]
    InvalidCount(InvalidCount),
    #[error("{0}")]
    MissingElement(MissingElement),
    #[error("{0}")]
    InvalidComponents(InvalidComponents),
    #[error("{0}")]
    CellCountMismatch(CellCountMismatch),
    #[error("{0}")]
    ArrayDecode(ArrayDecode),
}

#[derive(From, Display, Debug)]
#[display(fmt = "failed to parse an xml element: {xml_err}")]
pub struct MalformedXml {
    xml_err: quick_xml::Error,
}

#[derive(From, Display, Debug)]
#[display(fmt = "failed to parse an xml attribute: {att_err}")]
pub struct MalformedAttribute {
    att_err: quick_xml::events::attributes::AttrError,
}

#[derive(From, Display, Debug)]
#[display(fmt = "element or attribute name {name} is not valid utf8")]
pub struct NotUtf8 {
    name: ParsedNameOrBytes,
}

#[derive(Display, Debug)]
#[display(fmt = "unexpected element. Expected `{expected_name}`, got {actual_element}")]
pub struct UnexpectedElement {
    expected_name: String,
    actual_element: EventSummary,
}

impl UnexpectedElement {
    pub(crate) fn new<T: Into<String>>(expected_name: T, actual_element: EventSummary) -> Self {
        Self {
            expected_name: expected_name.into(),
            actual_element,
        }
    }
}

#[derive(Display, Debug, Constructor)]
#[display(fmt = "AppendedData section is malformed: {reason}")]
pub struct AppendedSection {
    reason: &'static str,
}

#[derive(Display, Debug, Constructor)]
#[display(
    fmt = "unexpected attribute value for {attribute_name} in {element_name} element: expected {expected_value}, got {actual_value}"
)]
pub struct UnexpectedAttributeValue {
    pub element_name: String,
    pub attribute_name: String,
    pub expected_value: String,
    pub actual_value: ParsedNameOrBytes,
}

#[derive(Display, Debug, Constructor)]
#[display(fmt = "missing attribute `{attribute_name}` in {element_name} element")]
pub struct MissingAttribute {
    pub element_name: String,
    pub attribute_name: String,
}

#[derive(Display, Debug, Constructor)]
#[display(fmt = "no `{dataset_kind}` element below VTKFile")]
pub struct MissingDataset {
    pub dataset_kind: String,
}

#[derive(Display, Debug, Constructor)]
#[display(fmt = "invalid value `{value}` for count attribute `{attribute}`")]
pub struct InvalidCount {
    pub attribute: &'static str,
    pub value: String,
}

#[derive(Display, Debug, Constructor)]
#[display(fmt = "`{parent}` declares a non-zero count but has no `{name}` element")]
pub struct MissingElement {
    pub parent: &'static str,
    pub name: &'static str,
}

#[derive(Display, Debug, Constructor)]
#[display(fmt = "array must have {expected} components, found {actual}")]
pub struct InvalidComponents {
    pub expected: usize,
    pub actual: usize,
}

#[derive(Display, Debug, Constructor)]
#[display(fmt = "{declared} cells declared but {actual} were decoded")]
pub struct CellCountMismatch {
    pub declared: usize,
    pub actual: usize,
}

#[derive(Display, Debug, Constructor)]
#[display(fmt = "could not decode array `{array_name}`: {source}")]
pub struct ArrayDecode {
    pub array_name: String,
    pub source: DecodeError,
}

/// Where in a piece a failure happened
#[derive(Display, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Block {
    Points,
    #[display(fmt = "{_0}")]
    Cells(TopologyKind),
    PointData,
    CellData,
}

#[derive(Display, Debug, Constructor)]
#[display(fmt = "piece {piece}, {block}: {reason}")]
pub struct PieceError {
    /// zero based index of the piece in the document
    pub piece: usize,
    pub block: Block,
    pub reason: Malformed,
}

#[derive(From, Display, Debug)]
pub enum ParsedNameOrBytes {
    #[display(fmt = "{_0}")]
    Utf8(String),
    #[display(fmt = "{_0:?} (cannot convert to UTF8 string)")]
    Bytes(Vec<u8>),
}

impl ParsedNameOrBytes {
    pub(crate) fn new(bytes: &[u8]) -> Self {
        let vec = Vec::from(bytes);
        match String::from_utf8(vec) {
            Ok(string) => Self::Utf8(string),
            Err(e) => Self::Bytes(e.into_bytes()),
        }
    }
}

impl<'a> From<QName<'a>> for ParsedNameOrBytes {
    fn from(x: QName) -> Self {
        Self::new(x.as_ref())
    }
}

impl<'a> From<&'a str> for ParsedNameOrBytes {
    fn from(x: &str) -> Self {
        Self::Utf8(x.into())
    }
}
