use super::error;
use super::event_summary::EventSummary;
use super::APPENDED_DATA;
use crate::utils;

use quick_xml::events::BytesStart;
use quick_xml::events::Event;
use quick_xml::reader::Reader;

/// An xml element with its attributes, children and text content, in document order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
    text: String,
}

impl Element {
    pub fn new<T: Into<String>>(name: T) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// set an attribute, replacing any previous value for the same key
    pub fn with_attribute<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        let key = key.into();
        let value = value.into();

        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key, value)),
        }

        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_text<T: Into<String>>(mut self, text: T) -> Self {
        self.text = text.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.attributes
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// direct children with the given name, in document order
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// the first direct child with the given name
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.name == name)
    }

    /// character data directly inside this element
    pub fn text(&self) -> &str {
        &self.text
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Self, error::Xml> {
        let mut element = Element::new(utf8(start.name().as_ref())?);

        for attribute in start.attributes() {
            let attribute = attribute.map_err(error::MalformedAttribute::from)?;
            let key = utf8(attribute.key.as_ref())?;
            let value = attribute
                .unescape_value()
                .map_err(error::MalformedXml::from)?;

            element.attributes.push((key, value.into_owned()));
        }

        Ok(element)
    }
}

fn utf8(bytes: &[u8]) -> Result<String, error::NotUtf8> {
    String::from_utf8(bytes.to_vec())
        .map_err(|e| error::NotUtf8::from(error::ParsedNameOrBytes::Bytes(e.into_bytes())))
}

/// A parsed xml document: the element tree below the root and the raw payload of the
/// `AppendedData` section, if there was one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Element,
    appended: Option<Vec<u8>>,
}

impl Document {
    pub fn parse(bytes: &[u8]) -> Result<Self, error::Xml> {
        let (xml, appended) = split_appended(bytes)?;

        let mut reader = Reader::from_reader(xml.as_slice());
        // ignore whitespace in the reader
        reader.trim_text(true);

        let mut buffer = Vec::new();
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            buffer.clear();
            let event = reader
                .read_event_into(&mut buffer)
                .map_err(error::MalformedXml::from)?;

            match &event {
                Event::Start(start) => {
                    if root.is_some() {
                        let actual = EventSummary::start(start);
                        return Err(error::UnexpectedElement::new("end of document", actual).into());
                    }
                    stack.push(Element::from_start(start)?);
                }
                Event::Empty(start) => {
                    if root.is_some() {
                        let actual = EventSummary::start(start);
                        return Err(error::UnexpectedElement::new("end of document", actual).into());
                    }
                    let element = Element::from_start(start)?;
                    close_element(element, &mut stack, &mut root);
                }
                Event::End(_) => {
                    // quick-xml has already checked that the end tag matches
                    if let Some(element) = stack.pop() {
                        close_element(element, &mut stack, &mut root);
                    }
                }
                Event::Text(text) => {
                    let Some(parent) = stack.last_mut() else {
                        let actual = EventSummary::text();
                        return Err(error::UnexpectedElement::new("VTKFile", actual).into());
                    };
                    let text = text.unescape().map_err(error::MalformedXml::from)?;
                    parent.text.push_str(&text);
                }
                Event::CData(data) => {
                    if let Some(parent) = stack.last_mut() {
                        parent.text.push_str(&String::from_utf8_lossy(data));
                    }
                }
                Event::Eof => break,
                // declarations, comments, processing instructions
                _ => (),
            }
        }

        if let Some(open) = stack.last() {
            let expected = format!("/{}", open.name);
            return Err(error::UnexpectedElement::new(expected, EventSummary::eof()).into());
        }

        let root = root
            .ok_or_else(|| error::UnexpectedElement::new("VTKFile", EventSummary::eof()))?;

        Ok(Self { root, appended })
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    /// the bytes after the `_` marker of the `AppendedData` section
    pub fn appended(&self) -> Option<&[u8]> {
        self.appended.as_deref()
    }
}

fn close_element(element: Element, stack: &mut [Element], root: &mut Option<Element>) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => *root = Some(element),
    }
}

/// Cut the binary payload of an `<AppendedData>` element out of the document so the
/// remainder is plain xml. The payload starts after the first `_` inside the element
/// and runs up to the last `</AppendedData>`.
fn split_appended(bytes: &[u8]) -> Result<(Vec<u8>, Option<Vec<u8>>), error::AppendedSection> {
    let open_tag = format!("<{APPENDED_DATA}");
    let close_tag = format!("</{APPENDED_DATA}>");

    let start = match utils::find(bytes, open_tag.as_bytes()) {
        Some(start) => start,
        None => return Ok((bytes.to_vec(), None)),
    };

    let tag_end = utils::find(&bytes[start..], b">")
        .map(|idx| start + idx)
        .ok_or_else(|| error::AppendedSection::new("unterminated start tag"))?;

    // <AppendedData encoding="raw"/>
    if bytes[tag_end - 1] == b'/' {
        return Ok((bytes.to_vec(), None));
    }

    let content_start = tag_end + 1;
    let close = utils::rfind(&bytes[content_start..], close_tag.as_bytes())
        .map(|idx| content_start + idx)
        .ok_or_else(|| error::AppendedSection::new("missing closing tag"))?;

    let content = &bytes[content_start..close];

    let payload = match content.iter().position(|&byte| byte == b'_') {
        Some(marker) => Some(content[marker + 1..].to_vec()),
        None if content.iter().all(u8::is_ascii_whitespace) => None,
        None => return Err(error::AppendedSection::new("missing `_` marker")),
    };

    let mut xml = Vec::with_capacity(bytes.len() - content.len());
    xml.extend_from_slice(&bytes[..content_start]);
    xml.extend_from_slice(&bytes[close..]);

    Ok((xml, payload))
}
