//! Committing a [`HeadState`] to its environment.
//!
//! The policy produces values; a [`HeadSink`] is where they take effect. The
//! HTTP server commits into an HTML `<head>` fragment, the browse session
//! into the terminal.

use super::{HeadElement, HeadState};
use crate::utils::escape::escape_script_json;
use anyhow::Result;
use quick_xml::{
    Writer,
    events::{BytesEnd, BytesStart, BytesText, Event},
};
use std::io::Cursor;

pub type XmlWriter = Writer<Cursor<Vec<u8>>>;

/// Destination of a head commit.
pub trait HeadSink {
    fn commit(&mut self, head: &HeadState) -> Result<()>;
}

/// Renders managed head elements as HTML.
pub struct HtmlHead {
    writer: XmlWriter,
}

impl HtmlHead {
    pub fn new() -> Self {
        Self {
            writer: Writer::new(Cursor::new(Vec::new())),
        }
    }

    pub fn into_string(self) -> String {
        String::from_utf8_lossy(&self.writer.into_inner().into_inner()).into_owned()
    }
}

impl Default for HtmlHead {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadSink for HtmlHead {
    fn commit(&mut self, head: &HeadState) -> Result<()> {
        if !head.title().is_empty() {
            write_text_element(&mut self.writer, "title", head.title())?;
        }
        for element in head.elements() {
            write_element(&mut self.writer, element)?;
        }
        Ok(())
    }
}

/// Render a head state to an HTML fragment.
pub fn render_head(head: &HeadState) -> Result<String> {
    let mut sink = HtmlHead::new();
    sink.commit(head)?;
    Ok(sink.into_string())
}

/// Render a head state as one HTML line per element.
pub fn render_head_lines(head: &HeadState) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    if !head.title().is_empty() {
        let mut sink = HtmlHead::new();
        write_text_element(&mut sink.writer, "title", head.title())?;
        lines.push(sink.into_string());
    }
    for element in head.elements() {
        let mut sink = HtmlHead::new();
        write_element(&mut sink.writer, element)?;
        lines.push(sink.into_string());
    }
    Ok(lines)
}

fn write_element(writer: &mut XmlWriter, element: &HeadElement) -> Result<()> {
    match element {
        HeadElement::Meta { key, content } => write_empty_elem(
            writer,
            "meta",
            &[(key.attr.as_str(), key.value.as_str()), ("content", content.as_str())],
        ),
        HeadElement::Link { rel, href } => {
            write_empty_elem(writer, "link", &[("rel", rel.as_str()), ("href", href.as_str())])
        }
        HeadElement::StructuredData(data) => {
            let json = escape_script_json(&serde_json::to_string(data)?);
            let mut elem = BytesStart::new("script");
            elem.push_attribute(("type", "application/ld+json"));
            writer.write_event(Event::Start(elem))?;
            writer.write_event(Event::Text(BytesText::from_escaped(json)))?;
            writer.write_event(Event::End(BytesEnd::new("script")))?;
            Ok(())
        }
    }
}

/// Write a text element: `<tag>text</tag>`.
#[inline]
fn write_text_element(writer: &mut XmlWriter, tag: &str, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

/// Write an empty element with attributes: `<tag attr1="val1" ... />`.
#[inline]
fn write_empty_elem(writer: &mut XmlWriter, tag: &str, attrs: &[(&str, &str)]) -> Result<()> {
    let mut elem = BytesStart::new(tag);
    for (k, v) in attrs {
        elem.push_attribute((*k, *v));
    }
    writer.write_event(Event::Empty(elem))?;
    Ok(())
}
