//! Tree ↔ nested map transform (§4.3a).
//!
//! Generalizes `detail_parser.rs::parse_element`: the teacher collapses
//! attrs-only/text-only/mixed elements straight into a `serde_json::Value`,
//! which loses sibling order and collapses duplicate tags onto one map key.
//! `DetailElement` keeps the XML shape (ordered attributes, ordered children,
//! duplicates intact) as the intermediate; `to_map`/`from_map` then apply the
//! extraction rule from §4.3a on top of that faithful tree.

use crate::error::CotError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};
use serde_json::{Map, Value};
use std::io::Cursor;

/// One element of a parsed `<detail>` subtree, in document order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DetailElement {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub text: Option<String>,
    pub children: Vec<DetailElement>,
}

impl DetailElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

fn attrs_of(start: &BytesStart) -> Result<Vec<(String, String)>, CotError> {
    let mut out = Vec::new();
    for attr in start.attributes() {
        let attr = attr?;
        let key = String::from_utf8(attr.key.as_ref().to_vec())?;
        let val = String::from_utf8(attr.value.to_vec())?;
        out.push((key, val));
    }
    Ok(out)
}

fn parse_children<R: std::io::BufRead>(
    reader: &mut Reader<R>,
    end_name: &[u8],
) -> Result<(Vec<DetailElement>, Option<String>), CotError> {
    let mut children = Vec::new();
    let mut text = None;
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                let name = String::from_utf8(e.name().as_ref().to_vec())?;
                let attrs = attrs_of(&e)?;
                let owned_end = e.name().as_ref().to_vec();
                let (grandchildren, child_text) = parse_children(reader, &owned_end)?;
                children.push(DetailElement {
                    name,
                    attrs,
                    text: child_text,
                    children: grandchildren,
                });
            }
            Event::Empty(e) => {
                let name = String::from_utf8(e.name().as_ref().to_vec())?;
                let attrs = attrs_of(&e)?;
                children.push(DetailElement {
                    name,
                    attrs,
                    text: None,
                    children: Vec::new(),
                });
            }
            Event::Text(t) => {
                let s = t.unescape()?.trim().to_string();
                if !s.is_empty() {
                    text = Some(s);
                }
            }
            Event::End(e) if e.name().as_ref() == end_name => break,
            Event::Eof => break,
            _ => {}
        }
    }
    Ok((children, text))
}

/// Parses the contents of a `<detail>...</detail>` block into an ordered tree.
pub fn parse_detail(detail_xml: &str) -> Result<Vec<DetailElement>, CotError> {
    let mut reader = Reader::from_str(detail_xml);
    reader.trim_text(true);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) if e.name().as_ref() == b"detail" => {
                let (children, _) = parse_children(&mut reader, b"detail")?;
                return Ok(children);
            }
            Event::Empty(e) if e.name().as_ref() == b"detail" => return Ok(Vec::new()),
            Event::Eof => return Ok(Vec::new()),
            _ => {}
        }
    }
}

fn write_element<W: std::io::Write>(
    writer: &mut Writer<W>,
    el: &DetailElement,
) -> Result<(), CotError> {
    let mut start = BytesStart::new(el.name.as_str());
    for (k, v) in &el.attrs {
        start.push_attribute((k.as_str(), v.as_str()));
    }
    if el.children.is_empty() && el.text.is_none() {
        writer.write_event(Event::Empty(start))?;
    } else {
        writer.write_event(Event::Start(start))?;
        if let Some(text) = &el.text {
            writer.write_event(Event::Text(quick_xml::events::BytesText::new(text)))?;
        }
        for child in &el.children {
            write_element(writer, child)?;
        }
        writer.write_event(Event::End(quick_xml::events::BytesEnd::new(el.name.as_str())))?;
    }
    Ok(())
}

/// Writes an ordered tree back into a `<detail>...</detail>` block.
pub fn write_detail(children: &[DetailElement]) -> Result<String, CotError> {
    if children.is_empty() {
        return Ok("<detail/>".to_string());
    }
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    writer.write_event(Event::Start(BytesStart::new("detail")))?;
    for child in children {
        write_element(&mut writer, child)?;
    }
    writer.write_event(Event::End(quick_xml::events::BytesEnd::new("detail")))?;
    let bytes = writer.into_inner().into_inner();
    Ok(String::from_utf8(bytes)?)
}

/// Extraction rule from §4.3a, applied to one element.
pub(crate) fn element_to_value(el: &DetailElement) -> Value {
    if el.attrs.is_empty() && el.children.is_empty() {
        return Value::String(el.text.clone().unwrap_or_default());
    }
    let mut map = Map::new();
    for (k, v) in &el.attrs {
        map.insert(k.clone(), Value::String(v.clone()));
    }
    if !el.children.is_empty() {
        for (tag, group) in group_by_tag(&el.children) {
            let value = if group.len() == 1 {
                element_to_value(group[0])
            } else {
                Value::Array(group.iter().map(|e| element_to_value(e)).collect())
            };
            map.insert(tag, value);
        }
    } else if let Some(text) = &el.text {
        map.insert("_text".to_string(), Value::String(text.clone()));
    }
    Value::Object(map)
}

/// Groups children by tag name, preserving first-seen order and the relative
/// order of elements within each group.
fn group_by_tag(children: &[DetailElement]) -> Vec<(String, Vec<&DetailElement>)> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: std::collections::HashMap<String, Vec<&DetailElement>> =
        std::collections::HashMap::new();
    for child in children {
        groups.entry(child.name.clone()).or_insert_with(|| {
            order.push(child.name.clone());
            Vec::new()
        });
        groups.get_mut(&child.name).unwrap().push(child);
    }
    order.into_iter().map(|n| (n.clone(), groups.remove(&n).unwrap())).collect()
}

/// Converts a parsed detail tree (the direct children of `<detail>`) into the
/// nested-map representation used by the flatten step.
pub fn to_map(children: &[DetailElement]) -> Map<String, Value> {
    let mut map = Map::new();
    for (tag, group) in group_by_tag(children) {
        let value = if group.len() == 1 {
            element_to_value(group[0])
        } else {
            Value::Array(group.iter().map(|e| element_to_value(e)).collect())
        };
        map.insert(tag, value);
    }
    map
}

/// Reverse of `element_to_value`: rebuilds an element from a tag name and its
/// map/string/array value. A map is "attributes-only" when every value is a
/// string; otherwise string entries become attributes and map/array entries
/// become nested elements (§4.3a reverse rule).
pub(crate) fn value_to_element(name: &str, value: &Value) -> DetailElement {
    value_to_elements(name, value)
        .into_iter()
        .next()
        .unwrap_or_else(|| DetailElement::new(name))
}

fn value_to_elements(name: &str, value: &Value) -> Vec<DetailElement> {
    match value {
        Value::String(s) => vec![DetailElement {
            name: name.to_string(),
            attrs: Vec::new(),
            text: if s.is_empty() { None } else { Some(s.clone()) },
            children: Vec::new(),
        }],
        Value::Array(items) => items.iter().flat_map(|v| value_to_elements(name, v)).collect(),
        Value::Object(map) => {
            let mut attrs = Vec::new();
            let mut text = None;
            let mut children = Vec::new();
            for (k, v) in map {
                if k == "_text" {
                    if let Value::String(s) = v {
                        text = Some(s.clone());
                    }
                    continue;
                }
                if k.starts_with('_') {
                    continue;
                }
                match v {
                    Value::String(s) => attrs.push((k.clone(), s.clone())),
                    _ => children.extend(value_to_elements(k, v)),
                }
            }
            vec![DetailElement {
                name: name.to_string(),
                attrs,
                text,
                children,
            }]
        }
        _ => vec![DetailElement {
            name: name.to_string(),
            attrs: Vec::new(),
            text: Some(value.to_string()),
            children: Vec::new(),
        }],
    }
}

/// Rebuilds an ordered detail tree from the nested-map representation.
pub fn from_map(map: &Map<String, Value>) -> Vec<DetailElement> {
    map.iter()
        .filter(|(k, _)| !k.starts_with('_'))
        .flat_map(|(k, v)| value_to_elements(k, v))
        .collect()
}
