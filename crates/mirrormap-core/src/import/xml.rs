//! Generic XML → value conversion.
//!
//! Elements become [`XmlElement`]s with an attribute map and their children grouped by name;
//! text nodes become plain [`XmlValue::Text`] values under the `#text` name. A name seen more than
//! once under the same parent collects into an ordered list instead of replacing the earlier
//! value.

use crate::error::ImportError;
use indexmap::IndexMap;

pub const TEXT_NAME: &str = "#text";

#[derive(Debug, Clone, PartialEq)]
pub enum XmlValue {
    Text(String),
    Element(XmlElement),
}

impl XmlValue {
    pub fn as_element(&self) -> Option<&XmlElement> {
        match self {
            XmlValue::Element(el) => Some(el),
            XmlValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            XmlValue::Text(t) => Some(t),
            XmlValue::Element(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlElement {
    pub name: String,
    pub attributes: IndexMap<String, String>,
    pub children: IndexMap<String, XmlChildren>,
}

impl XmlElement {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Children with the given name, in document order.
    pub fn children_named<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a XmlValue> + 'a {
        self.children.get(name).into_iter().flat_map(XmlChildren::iter)
    }

    /// Concatenated text of this element and its descendants, whitespace collapsed.
    pub fn text_content(&self) -> String {
        let mut raw = String::new();
        collect_text(self, &mut raw);
        raw.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

fn collect_text(el: &XmlElement, out: &mut String) {
    for group in el.children.values() {
        for value in group.iter() {
            match value {
                XmlValue::Text(t) => {
                    out.push_str(t);
                    out.push(' ');
                }
                XmlValue::Element(child) => collect_text(child, out),
            }
        }
    }
}

/// One name's worth of children: a single value until a second one shows up.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlChildren {
    One(XmlValue),
    Many(Vec<XmlValue>),
}

impl XmlChildren {
    fn push(&mut self, value: XmlValue) {
        match self {
            XmlChildren::Many(values) => values.push(value),
            XmlChildren::One(first) => {
                let first = std::mem::replace(first, XmlValue::Text(String::new()));
                *self = XmlChildren::Many(vec![first, value]);
            }
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, XmlValue> {
        match self {
            XmlChildren::One(v) => std::slice::from_ref(v).iter(),
            XmlChildren::Many(vs) => vs.iter(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            XmlChildren::One(_) => 1,
            XmlChildren::Many(vs) => vs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Parses `text` and converts its root element.
pub fn parse_document(text: &str) -> Result<XmlElement, ImportError> {
    let doc = roxmltree::Document::parse(text)?;
    Ok(convert_element(doc.root_element()))
}

fn convert_element(node: roxmltree::Node<'_, '_>) -> XmlElement {
    let mut el = XmlElement {
        name: node.tag_name().name().to_string(),
        ..Default::default()
    };
    for attr in node.attributes() {
        el.attributes
            .insert(attr.name().to_string(), attr.value().to_string());
    }
    for child in node.children() {
        let (name, value) = if child.is_element() {
            (
                child.tag_name().name().to_string(),
                XmlValue::Element(convert_element(child)),
            )
        } else if child.is_text() {
            let Some(text) = child.text() else {
                continue;
            };
            (TEXT_NAME.to_string(), XmlValue::Text(text.to_string()))
        } else {
            // Comments and processing instructions carry no outline content.
            continue;
        };
        match el.children.get_mut(&name) {
            Some(group) => group.push(value),
            None => {
                el.children.insert(name, XmlChildren::One(value));
            }
        }
    }
    el
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attributes_and_single_children() {
        let el = parse_document(r#"<map version="1.0"><node TEXT="root"/></map>"#).unwrap();
        assert_eq!(el.name, "map");
        assert_eq!(el.attribute("version"), Some("1.0"));
        let node = el.children_named("node").next().unwrap().as_element().unwrap();
        assert_eq!(node.attribute("TEXT"), Some("root"));
        assert!(matches!(el.children["node"], XmlChildren::One(_)));
    }

    #[test]
    fn repeated_names_collect_into_an_ordered_list() {
        let el = parse_document(r#"<n><node TEXT="a"/><icon/><node TEXT="b"/><node TEXT="c"/></n>"#)
            .unwrap();
        let texts: Vec<&str> = el
            .children_named("node")
            .filter_map(XmlValue::as_element)
            .filter_map(|n| n.attribute("TEXT"))
            .collect();
        assert_eq!(texts, ["a", "b", "c"]);
        assert_eq!(el.children["node"].len(), 3);
        assert_eq!(el.children["icon"].len(), 1);
    }

    #[test]
    fn text_stays_a_plain_value() {
        let el = parse_document("<p>hello <b>big</b> world<!-- skipped --></p>").unwrap();
        let texts: Vec<&str> = el.children_named(TEXT_NAME).filter_map(XmlValue::as_text).collect();
        assert_eq!(texts, ["hello ", " world"]);
        let bold = el.children_named("b").next().unwrap();
        assert!(bold.as_element().is_some());
        assert!(!el.children.contains_key("#comment"));
        assert_eq!(el.text_content(), "hello world big");
    }

    #[test]
    fn malformed_documents_are_errors() {
        let err = parse_document("<map><node></map>").unwrap_err();
        assert!(matches!(err, ImportError::Xml(_)));
    }
}
