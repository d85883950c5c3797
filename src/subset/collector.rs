/*!
 * Character collection: which characters each font has to render.
 */

use std::collections::{BTreeSet, HashMap, HashSet};
use indexmap::IndexMap;
use log::{debug, warn};

use crate::dialogue_parts::{self, DialoguePart, FontChange};
use crate::errors::SubtitleError;
use crate::subtitle_processor::{AssDocument, StyleInfo};

/// Required characters per font name.
///
/// Fonts keep the order in which they were first seen; each character set is
/// ordered by ascending code point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FontRequirements {
    fonts: IndexMap<String, BTreeSet<char>>,
}

impl FontRequirements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add every character of `text` to the set of `font`
    pub fn add_text(&mut self, font: &str, text: &str) {
        self.fonts.entry(font.to_string()).or_default().extend(text.chars());
    }

    /// Add a single character to the set of `font`
    pub fn add_char(&mut self, font: &str, c: char) {
        self.fonts.entry(font.to_string()).or_default().insert(c);
    }

    /// Union `characters` into the set of `font`, creating it when needed
    pub fn merge(&mut self, font: &str, characters: BTreeSet<char>) {
        self.fonts.entry(font.to_string()).or_default().extend(characters);
    }

    /// Remove a font, keeping the order of the others
    pub fn remove(&mut self, font: &str) -> Option<BTreeSet<char>> {
        self.fonts.shift_remove(font)
    }

    pub fn get(&self, font: &str) -> Option<&BTreeSet<char>> {
        self.fonts.get(font)
    }

    pub fn contains(&self, font: &str) -> bool {
        self.fonts.contains_key(font)
    }

    pub fn font_names(&self) -> impl Iterator<Item = &String> {
        self.fonts.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &BTreeSet<char>)> {
        self.fonts.iter()
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    /// Sum of the set sizes; a character used by two fonts counts twice
    pub fn total_characters(&self) -> usize {
        self.fonts.values().map(|chars| chars.len()).sum()
    }
}

/// Font of each style, used to find the font a dialogue line starts with
#[derive(Debug, Clone)]
pub struct StyleFonts {
    by_style: HashMap<String, String>,
    fallback: String,
}

impl StyleFonts {
    /// Later definitions of a style name replace earlier ones
    pub fn new(styles: &[StyleInfo], fallback: &str) -> Self {
        let by_style = styles
            .iter()
            .map(|style| (style.name.clone(), style.font_name.clone()))
            .collect();
        StyleFonts {
            by_style,
            fallback: fallback.to_string(),
        }
    }

    pub fn knows(&self, style: &str) -> bool {
        self.by_style.contains_key(style)
    }

    /// Font of a style; unknown styles use `Default`, then the fallback font
    pub fn font_for_style(&self, style: &str) -> &str {
        self.by_style
            .get(style)
            .or_else(|| self.by_style.get("Default"))
            .map(String::as_str)
            .unwrap_or(&self.fallback)
    }

    /// Font active after `change` in a line whose own style uses `line_font`
    pub fn apply(&self, change: FontChange, line_font: &str) -> String {
        match change {
            FontChange::Set(font) => font,
            FontChange::Reset(None) => line_font.to_string(),
            FontChange::Reset(Some(style)) => self
                .by_style
                .get(&style)
                .cloned()
                .unwrap_or_else(|| line_font.to_string()),
        }
    }
}

/// Collect the characters every font needs to render the document's dialogue
pub fn collect_characters(document: &AssDocument, fallback_font: &str) -> Result<FontRequirements, SubtitleError> {
    let styles = StyleFonts::new(&document.styles()?, fallback_font);
    let mut requirements = FontRequirements::new();
    let mut unknown_styles = HashSet::new();
    let dialogues = document.dialogues()?;
    let wrap_style = document.wrap_style();

    for dialogue in &dialogues {
        if !styles.knows(&dialogue.style) && unknown_styles.insert(dialogue.style.clone()) {
            warn!("Dialogue uses unknown style '{}', using '{}'", dialogue.style, styles.font_for_style(&dialogue.style));
        }
        let line_font = styles.font_for_style(&dialogue.style);
        collect_line(&mut requirements, &styles, line_font, &dialogue.text, wrap_style);
    }

    debug!(
        "Collected {} character(s) for {} font(s) from {} dialogue line(s)",
        requirements.total_characters(),
        requirements.len(),
        dialogues.len()
    );
    Ok(requirements)
}

/// Collect one line; overrides only affect the parts after them
pub fn collect_line(
    requirements: &mut FontRequirements,
    styles: &StyleFonts,
    line_font: &str,
    text: &str,
    wrap_style: u8,
) {
    let mut current = line_font.to_string();

    for part in dialogue_parts::parse(text) {
        match part {
            DialoguePart::Text(text) => requirements.add_text(&current, &text),
            DialoguePart::Escape(letter) => {
                if let Some(c) = dialogue_parts::escape_glyph(letter, wrap_style) {
                    requirements.add_char(&current, c);
                }
            }
            DialoguePart::Drawing(_) => {}
            DialoguePart::Override(tags) => {
                for change in tags.iter().filter_map(|tag| tag.font_change()) {
                    current = styles.apply(change, line_font);
                }
            }
        }
    }
}
