//! Event-stream to element-tree conversion

use indexmap::IndexMap;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::element::Element;
use crate::error::MarkupError;

/// Materialize a document into its root [`Element`]
///
/// Processing instructions, comments and doctypes are skipped. Multiple
/// top-level elements are tolerated by keeping the first and ignoring
/// the rest, matching how lenient vendor parsers treat trailing junk.
pub(crate) fn parse_document(input: &str) -> Result<Element, MarkupError> {
    let mut reader = Reader::from_str(input);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                stack.push(element_from_start(&start)?);
            }
            Event::Empty(start) => {
                let element = element_from_start(&start)?;
                attach(&mut stack, &mut root, element);
            }
            Event::Text(text) => {
                if let Some(current) = stack.last_mut() {
                    current.append_text(&text.unescape()?);
                }
            }
            Event::CData(data) => {
                if let Some(current) = stack.last_mut() {
                    let raw = String::from_utf8_lossy(&data).into_owned();
                    current.append_text(&raw);
                }
            }
            Event::End(end) => {
                let Some(element) = stack.pop() else {
                    let tag = String::from_utf8_lossy(end.name().as_ref()).into_owned();
                    return Err(MarkupError::UnbalancedClose(tag));
                };
                attach(&mut stack, &mut root, element);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    root.ok_or(MarkupError::NoRoot)
}

fn element_from_start(start: &BytesStart<'_>) -> Result<Element, MarkupError> {
    let tag = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attributes = IndexMap::new();
    for attr in start.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        attributes.insert(key, value);
    }
    Ok(Element::new(tag, attributes))
}

fn attach(stack: &mut Vec<Element>, root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.push_child(element),
        None => {
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}
