//! Document head state: the tag registry.
//!
//! [`HeadState`] is a value object describing everything the views manage in
//! a document `<head>`: the title, name/property keyed meta tags, one link per
//! `rel` and a single JSON-LD block.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   pure    ┌──────────────┐  commit   ┌──────────────┐
//! │  view event  │ ────────▶ │  HeadState   │ ────────▶ │   HeadSink   │
//! │ (post, 404…) │  policy   │ (registry)   │           │ html / term  │
//! └──────────────┘           └──────────────┘           └──────────────┘
//! ```
//!
//! Policy lives in [`policy`]. The commit step lives in [`render`] for HTML
//! and [`terminal`] for the browse session.
//!
//! # Invariants
//!
//! - At most one meta entry per `(attribute, value)` pair
//! - At most one link per `rel`
//! - At most one structured-data block
//!
//! Writing an existing key updates it in place, keeping its position in
//! document order. Every operation is total: removing something absent is
//! a no-op.

pub mod policy;
pub mod render;
pub mod terminal;

pub use render::{HeadSink, render_head, render_head_lines};
pub use terminal::TerminalHead;

use std::fmt;

/// The attribute a meta tag is keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetaAttr {
    /// `<meta name="...">` (description, robots, twitter:card, keywords)
    Name,
    /// `<meta property="...">` (Open Graph)
    Property,
}

impl MetaAttr {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Property => "property",
        }
    }
}

impl fmt::Display for MetaAttr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a meta tag: `[attr=value]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TagKey {
    pub attr: MetaAttr,
    pub value: String,
}

impl TagKey {
    pub fn new(attr: MetaAttr, value: impl Into<String>) -> Self {
        Self {
            attr,
            value: value.into(),
        }
    }

    fn matches(&self, attr: MetaAttr, value: &str) -> bool {
        self.attr == attr && self.value == value
    }
}

impl fmt::Display for TagKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.attr, self.value)
    }
}

/// One managed element in the head, in document order.
#[derive(Debug, Clone, PartialEq)]
pub enum HeadElement {
    Meta { key: TagKey, content: String },
    Link { rel: String, href: String },
    StructuredData(serde_json::Value),
}

/// Managed contents of a document head.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeadState {
    title: String,
    elements: Vec<HeadElement>,
}

impl HeadState {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------------
    // Writes
    // ------------------------------------------------------------------------

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Create or update the meta tag matching `[attr=value]`.
    pub fn set_meta(&mut self, attr: MetaAttr, value: &str, content: impl Into<String>) {
        let content = content.into();
        match self.find_meta_mut(attr, value) {
            Some(existing) => *existing = content,
            None => self.elements.push(HeadElement::Meta {
                key: TagKey::new(attr, value),
                content,
            }),
        }
    }

    /// Create or update the link with the given `rel`.
    pub fn set_link(&mut self, rel: &str, href: impl Into<String>) {
        let href = href.into();
        let existing = self.elements.iter_mut().find_map(|el| match el {
            HeadElement::Link { rel: r, href } if r == rel => Some(href),
            _ => None,
        });
        match existing {
            Some(existing) => *existing = href,
            None => self.elements.push(HeadElement::Link {
                rel: rel.to_owned(),
                href,
            }),
        }
    }

    /// Create or replace the JSON-LD block. No merging with previous data.
    pub fn set_structured_data(&mut self, data: serde_json::Value) {
        let existing = self.elements.iter_mut().find_map(|el| match el {
            HeadElement::StructuredData(value) => Some(value),
            _ => None,
        });
        match existing {
            Some(existing) => *existing = data,
            None => self.elements.push(HeadElement::StructuredData(data)),
        }
    }

    pub fn remove_meta(&mut self, attr: MetaAttr, value: &str) {
        self.elements
            .retain(|el| !matches!(el, HeadElement::Meta { key, .. } if key.matches(attr, value)));
    }

    pub fn remove_link(&mut self, rel: &str) {
        self.elements
            .retain(|el| !matches!(el, HeadElement::Link { rel: r, .. } if r == rel));
    }

    pub fn remove_structured_data(&mut self) {
        self.elements
            .retain(|el| !matches!(el, HeadElement::StructuredData(_)));
    }

    // ------------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------------

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Content of the meta tag matching `[attr=value]`.
    pub fn meta(&self, attr: MetaAttr, value: &str) -> Option<&str> {
        self.elements.iter().find_map(|el| match el {
            HeadElement::Meta { key, content } if key.matches(attr, value) => {
                Some(content.as_str())
            }
            _ => None,
        })
    }

    /// Number of meta tags matching `[attr=value]`. Never more than one.
    pub fn count_meta(&self, attr: MetaAttr, value: &str) -> usize {
        self.elements
            .iter()
            .filter(|el| matches!(el, HeadElement::Meta { key, .. } if key.matches(attr, value)))
            .count()
    }

    pub fn link(&self, rel: &str) -> Option<&str> {
        self.elements.iter().find_map(|el| match el {
            HeadElement::Link { rel: r, href } if r == rel => Some(href.as_str()),
            _ => None,
        })
    }

    pub fn count_links(&self, rel: &str) -> usize {
        self.elements
            .iter()
            .filter(|el| matches!(el, HeadElement::Link { rel: r, .. } if r == rel))
            .count()
    }

    pub fn structured_data(&self) -> Option<&serde_json::Value> {
        self.elements.iter().find_map(|el| match el {
            HeadElement::StructuredData(value) => Some(value),
            _ => None,
        })
    }

    /// Whether any `og:*` property is present.
    pub fn has_open_graph(&self) -> bool {
        self.elements.iter().any(|el| {
            matches!(el, HeadElement::Meta { key, .. }
                if key.attr == MetaAttr::Property && key.value.starts_with("og:"))
        })
    }

    /// Managed elements in document order.
    pub fn elements(&self) -> impl Iterator<Item = &HeadElement> {
        self.elements.iter()
    }

    fn find_meta_mut(&mut self, attr: MetaAttr, value: &str) -> Option<&mut String> {
        self.elements.iter_mut().find_map(|el| match el {
            HeadElement::Meta { key, content } if key.matches(attr, value) => Some(content),
            _ => None,
        })
    }
}
