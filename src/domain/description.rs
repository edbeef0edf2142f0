use std::fmt;

use serde::Serialize;

/// One line of a section description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DescriptionEntry {
    Header { text: String },
    Parameter { label: String, value: String },
}

/// Ordered, display-only summary of a section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Description {
    entries: Vec<DescriptionEntry>,
}

impl Description {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(&mut self, text: impl Into<String>) -> &mut Self {
        self.entries.push(DescriptionEntry::Header { text: text.into() });
        self
    }

    pub fn parameter(&mut self, label: impl Into<String>, value: impl ToString) -> &mut Self {
        self.entries
            .push(DescriptionEntry::Parameter { label: label.into(), value: value.to_string() });
        self
    }

    pub fn entries(&self) -> &[DescriptionEntry] {
        &self.entries
    }

    /// Value of the first parameter with the given label.
    pub fn value_of(&self, label: &str) -> Option<&str> {
        self.entries.iter().find_map(|entry| match entry {
            DescriptionEntry::Parameter { label: l, value } if l == label => Some(value.as_str()),
            _ => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            match entry {
                DescriptionEntry::Header { text } => writeln!(f, "{}:", text)?,
                DescriptionEntry::Parameter { label, value } => {
                    writeln!(f, "  {}: {}", label, value)?
                }
            }
        }
        Ok(())
    }
}
