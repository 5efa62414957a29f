use quick_xml::events::BytesStart;

use super::error::ParsedNameOrBytes;

use std::fmt;

/// A short description of the xml event (or tree element) found where something else
/// was expected
#[derive(Debug)]
pub(crate) struct EventSummary {
    name: Option<ParsedNameOrBytes>,
    e_type: &'static str,
}

impl fmt::Display for EventSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "element {name} with type {}", self.e_type),
            None => write!(f, "unnamed name with type {}", self.e_type),
        }
    }
}

impl EventSummary {
    pub(crate) fn eof() -> Self {
        Self {
            name: None,
            e_type: "eof",
        }
    }

    pub(crate) fn start(bytes: &BytesStart<'_>) -> Self {
        Self {
            name: Some(ParsedNameOrBytes::from(bytes.name())),
            e_type: "start",
        }
    }

    pub(crate) fn text() -> Self {
        Self {
            name: None,
            e_type: "text",
        }
    }

    /// an element of the already built tree
    pub(crate) fn element(name: &str) -> Self {
        Self {
            name: Some(ParsedNameOrBytes::from(name)),
            e_type: "element",
        }
    }
}
