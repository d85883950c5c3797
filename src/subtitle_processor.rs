use std::fmt;
use std::path::Path;
use regex::Regex;
use once_cell::sync::Lazy;
use anyhow::{Result, Context};
use log::{debug, warn};
use crate::errors::SubtitleError;

// @module: ASS document reading and writing

// @const: Section header regex
static SECTION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*\[([^\]]+)\]\s*$").unwrap()
});

// @const: Key/value entry regex
static ENTRY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([^:;!\[][^:]*):\s*(.*)$").unwrap()
});

const BOM: char = '\u{feff}';

/// A single `Key: value` entry of a section
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    // @field: Entry key (e.g. "Style", "Dialogue")
    pub key: String,

    // @field: Everything after the colon
    pub value: String,

    // @field: Source line, dropped once the entry is modified
    original: Option<String>,
}

impl Entry {
    /// Split the value into the fields named by `format`.
    ///
    /// The last field receives the remainder of the value, commas included.
    pub fn fields(&self, format: &[String]) -> Vec<String> {
        self.value
            .splitn(format.len().max(1), ',')
            .map(|s| s.to_string())
            .collect()
    }

    /// Get a named field, trimmed
    pub fn field(&self, format: &[String], name: &str) -> Option<String> {
        let index = field_index(format, name)?;
        self.fields(format).get(index).map(|value| value.trim().to_string())
    }

    /// Get a named field without trimming
    pub fn raw_field(&self, format: &[String], name: &str) -> Option<String> {
        let index = field_index(format, name)?;
        self.fields(format).get(index).cloned()
    }

    /// Replace a named field, returning false when the field does not exist
    pub fn set_field(&mut self, format: &[String], name: &str, value: &str) -> bool {
        let Some(index) = field_index(format, name) else {
            return false;
        };
        let mut fields = self.fields(format);
        let Some(slot) = fields.get_mut(index) else {
            return false;
        };
        *slot = value.to_string();
        self.value = fields.join(",");
        self.original = None;
        true
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.original {
            Some(line) => write!(f, "{}", line),
            None => write!(f, "{}: {}", self.key, self.value),
        }
    }
}

fn field_index(format: &[String], name: &str) -> Option<usize> {
    format.iter().position(|f| f.eq_ignore_ascii_case(name))
}

/// A line of a section body
#[derive(Debug, Clone, PartialEq)]
pub enum Line {
    /// A `Key: value` entry
    Entry(Entry),
    /// Comments, blank lines and anything else, kept verbatim
    Verbatim(String),
}

/// A `[Name]` section and its body
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    // @field: Section name without brackets
    pub name: String,

    // @field: Ordered body lines
    pub body: Vec<Line>,

    // @field: Header line as read
    header: String,
}

impl Section {
    /// Whether this is a `[V4+ Styles]` / `[V4 Styles]` section
    pub fn is_styles(&self) -> bool {
        self.name.contains("Styles")
    }

    /// Whether this is the `[Events]` section
    pub fn is_events(&self) -> bool {
        self.name.contains("Events")
    }

    /// Field names from the section's Format line
    pub fn format(&self) -> Option<Vec<String>> {
        self.entries()
            .find(|e| e.key == "Format")
            .map(|e| e.value.split(',').map(|f| f.trim().to_string()).collect())
    }

    /// Iterate over the entries of the section
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.body.iter().filter_map(|line| match line {
            Line::Entry(entry) => Some(entry),
            Line::Verbatim(_) => None,
        })
    }

    /// Iterate mutably over the entries with the given key
    pub fn entries_mut<'a>(&'a mut self, key: &'a str) -> impl Iterator<Item = &'a mut Entry> + 'a {
        self.body.iter_mut().filter_map(move |line| match line {
            Line::Entry(entry) if entry.key == key => Some(entry),
            _ => None,
        })
    }

    /// Format of a section that has entries of `key`, or an error when missing
    pub fn require_format(&self, key: &str) -> Result<Option<Vec<String>>, SubtitleError> {
        if !self.entries().any(|e| e.key == key) {
            return Ok(None);
        }
        self.format()
            .map(Some)
            .ok_or_else(|| SubtitleError::MissingFormat(self.name.clone()))
    }
}

/// Style information needed by the subsetting pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct StyleInfo {
    pub name: String,
    pub font_name: String,
}

/// Dialogue information needed by the subsetting pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct DialogueInfo {
    pub style: String,
    pub text: String,
}

/// Parsed ASS document.
///
/// Parsing is lossless: writing an unmodified document gives back the input
/// (modulo the line ending, which is normalized to the first one seen).
#[derive(Debug, Clone, PartialEq)]
pub struct AssDocument {
    /// Ordered sections
    pub sections: Vec<Section>,

    /// Lines before the first section header
    preamble: Vec<String>,

    has_bom: bool,
    line_ending: &'static str,
    trailing_newline: bool,
}

impl AssDocument {
    /// Read and parse an ASS file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read subtitle file: {:?}", path))?;
        Ok(Self::parse(&content))
    }

    /// Parse ASS content
    pub fn parse(content: &str) -> Self {
        let has_bom = content.starts_with(BOM);
        let content = content.trim_start_matches(BOM);
        let line_ending = if content.contains("\r\n") { "\r\n" } else { "\n" };

        let mut preamble = Vec::new();
        let mut sections: Vec<Section> = Vec::new();

        for line in content.lines() {
            if let Some(caps) = SECTION_REGEX.captures(line) {
                sections.push(Section {
                    name: caps[1].trim().to_string(),
                    body: Vec::new(),
                    header: line.to_string(),
                });
                continue;
            }

            let Some(section) = sections.last_mut() else {
                preamble.push(line.to_string());
                continue;
            };

            let parsed = ENTRY_REGEX.captures(line).map(|caps| Entry {
                key: caps[1].trim().to_string(),
                value: caps[2].to_string(),
                original: Some(line.to_string()),
            });

            section.body.push(match parsed {
                Some(entry) => Line::Entry(entry),
                None => Line::Verbatim(line.to_string()),
            });
        }

        if sections.is_empty() {
            warn!("No sections found in subtitle content");
        } else {
            debug!("Parsed {} subtitle section(s)", sections.len());
        }

        AssDocument {
            sections,
            preamble,
            has_bom,
            line_ending,
            trailing_newline: content.ends_with('\n'),
        }
    }

    /// Write the document to a file
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
        }
        std::fs::write(path, self.to_string())
            .with_context(|| format!("Failed to write subtitle file: {}", path.display()))
    }

    /// Find a section by exact name
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// `WrapStyle` of the script info section, 0 when absent or unreadable
    pub fn wrap_style(&self) -> u8 {
        self.section("Script Info")
            .and_then(|section| section.entries().find(|e| e.key == "WrapStyle"))
            .and_then(|entry| entry.value.trim().parse().ok())
            .unwrap_or(0)
    }

    /// All styles of every styles section, in document order
    pub fn styles(&self) -> Result<Vec<StyleInfo>, SubtitleError> {
        let mut styles = Vec::new();
        for section in self.sections.iter().filter(|s| s.is_styles()) {
            let Some(format) = section.require_format("Style")? else {
                continue;
            };
            for entry in section.entries().filter(|e| e.key == "Style") {
                let name = entry.field(&format, "Name").ok_or_else(|| missing(section, "Name"))?;
                let font_name = entry.field(&format, "Fontname").ok_or_else(|| missing(section, "Fontname"))?;
                styles.push(StyleInfo { name, font_name });
            }
        }
        Ok(styles)
    }

    /// All dialogue lines of every events section, in document order
    pub fn dialogues(&self) -> Result<Vec<DialogueInfo>, SubtitleError> {
        let mut dialogues = Vec::new();
        for section in self.sections.iter().filter(|s| s.is_events()) {
            let Some(format) = section.require_format("Dialogue")? else {
                continue;
            };
            for entry in section.entries().filter(|e| e.key == "Dialogue") {
                let style = entry.field(&format, "Style").ok_or_else(|| missing(section, "Style"))?;
                let text = entry.raw_field(&format, "Text").ok_or_else(|| missing(section, "Text"))?;
                dialogues.push(DialogueInfo { style, text });
            }
        }
        Ok(dialogues)
    }
}

fn missing(section: &Section, field: &str) -> SubtitleError {
    SubtitleError::MissingField {
        section: section.name.clone(),
        field: field.to_string(),
    }
}

impl fmt::Display for AssDocument {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut lines: Vec<String> = self.preamble.clone();
        for section in &self.sections {
            lines.push(section.header.clone());
            for line in &section.body {
                lines.push(match line {
                    Line::Entry(entry) => entry.to_string(),
                    Line::Verbatim(raw) => raw.clone(),
                });
            }
        }

        if self.has_bom {
            write!(f, "{}", BOM)?;
        }
        write!(f, "{}", lines.join(self.line_ending))?;
        if self.trailing_newline {
            write!(f, "{}", self.line_ending)?;
        }
        Ok(())
    }
}
