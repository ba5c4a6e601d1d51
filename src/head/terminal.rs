//! Terminal head sink for the browse session.
//!
//! Prints what changed since the previous commit rather than the whole head,
//! so cleanup and upsert steps are visible as they happen.

use super::{HeadElement, HeadSink, HeadState};
use crate::log;
use anyhow::Result;
use std::fmt;

/// One difference between two committed heads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadChange {
    Title(String),
    Added { key: String, value: String },
    Changed { key: String, value: String },
    Removed { key: String },
}

impl fmt::Display for HeadChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Title(title) => write!(f, "title \"{title}\""),
            Self::Added { key, value } => write!(f, "+ {key} {value}"),
            Self::Changed { key, value } => write!(f, "~ {key} {value}"),
            Self::Removed { key } => write!(f, "- {key}"),
        }
    }
}

fn identity(element: &HeadElement) -> String {
    match element {
        HeadElement::Meta { key, .. } => format!("meta[{key}]"),
        HeadElement::Link { rel, .. } => format!("link[rel={rel}]"),
        HeadElement::StructuredData(_) => "script[ld+json]".to_owned(),
    }
}

fn value(element: &HeadElement) -> String {
    match element {
        HeadElement::Meta { content, .. } => format!("\"{content}\""),
        HeadElement::Link { href, .. } => href.clone(),
        HeadElement::StructuredData(data) => match data.get("@type").and_then(|t| t.as_str()) {
            Some(kind) => format!("{kind} block"),
            None => "block".to_owned(),
        },
    }
}

/// Changes turning `prev` into `next`, in document order.
pub fn diff(prev: &HeadState, next: &HeadState) -> Vec<HeadChange> {
    let mut changes = Vec::new();
    if prev.title() != next.title() {
        changes.push(HeadChange::Title(next.title().to_owned()));
    }

    let before: Vec<(String, &HeadElement)> =
        prev.elements().map(|e| (identity(e), e)).collect();
    let after: Vec<(String, &HeadElement)> = next.elements().map(|e| (identity(e), e)).collect();

    for (key, _) in &before {
        if !after.iter().any(|(k, _)| k == key) {
            changes.push(HeadChange::Removed { key: key.clone() });
        }
    }

    for (key, element) in &after {
        match before.iter().find(|(k, _)| k == key) {
            None => changes.push(HeadChange::Added {
                key: key.clone(),
                value: value(element),
            }),
            Some((_, old)) if old != element => changes.push(HeadChange::Changed {
                key: key.clone(),
                value: value(element),
            }),
            Some(_) => {}
        }
    }

    changes
}

/// Logs head changes under the `head` prefix.
#[derive(Debug, Default)]
pub struct TerminalHead {
    last: HeadState,
}

impl TerminalHead {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HeadSink for TerminalHead {
    fn commit(&mut self, head: &HeadState) -> Result<()> {
        for change in diff(&self.last, head) {
            log!("head"; "{change}");
        }
        self.last = head.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::head::MetaAttr;
    use serde_json::json;

    #[test]
    fn test_diff_reports_each_kind() {
        let mut prev = HeadState::new();
        prev.set_title("A");
        prev.set_meta(MetaAttr::Name, "keywords", "ashes");
        prev.set_link("canonical", "https://x.test/a");

        let mut next = prev.clone();
        next.set_title("B");
        next.remove_meta(MetaAttr::Name, "keywords");
        next.set_link("canonical", "https://x.test/b");
        next.set_structured_data(json!({"@type": "Article"}));

        let changes = diff(&prev, &next);
        assert_eq!(
            changes,
            vec![
                HeadChange::Title("B".into()),
                HeadChange::Removed {
                    key: "meta[name=keywords]".into()
                },
                HeadChange::Changed {
                    key: "link[rel=canonical]".into(),
                    value: "https://x.test/b".into()
                },
                HeadChange::Added {
                    key: "script[ld+json]".into(),
                    value: "Article block".into()
                },
            ]
        );
    }

    #[test]
    fn test_diff_identical_is_empty() {
        let mut head = HeadState::new();
        head.set_meta(MetaAttr::Property, "og:type", "website");
        assert!(diff(&head, &head.clone()).is_empty());
    }

    #[test]
    fn test_commit_remembers_last_head() {
        let mut sink = TerminalHead::new();
        let mut head = HeadState::new();
        head.set_title("A");
        sink.commit(&head).unwrap();
        assert!(diff(&sink.last, &head).is_empty());
    }

    #[test]
    fn test_change_display() {
        let change = HeadChange::Removed {
            key: "meta[name=robots]".into(),
        };
        assert_eq!(change.to_string(), "- meta[name=robots]");
    }
}
