/*!
 * Remap tables: each required character gets a slot of the character map.
 */

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use indexmap::IndexMap;
use log::debug;

use crate::errors::SubsetError;
use super::character_map::{CharacterMap, MapCursor};
use super::collector::FontRequirements;
use super::resolver::FontLocations;

/// Remap table of one font; `replacements[i]` stands for `characters[i]`
#[derive(Debug, Clone, PartialEq)]
pub struct RemapEntry {
    font_name: String,
    source_path: PathBuf,
    characters: Vec<char>,
    replacements: Vec<char>,
}

impl RemapEntry {
    /// Create an entry from sorted characters and their aligned replacements
    pub fn new(font_name: &str, source_path: PathBuf, characters: Vec<char>, replacements: Vec<char>) -> Self {
        debug_assert_eq!(characters.len(), replacements.len());
        debug_assert!(characters.windows(2).all(|w| w[0] < w[1]));
        RemapEntry {
            font_name: font_name.to_string(),
            source_path,
            characters,
            replacements,
        }
    }

    pub fn font_name(&self) -> &str {
        &self.font_name
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Required characters, ascending
    pub fn characters(&self) -> &[char] {
        &self.characters
    }

    pub fn replacements(&self) -> &[char] {
        &self.replacements
    }

    /// Replacement of `c`, looked up by its position in the character list
    pub fn replacement_for(&self, c: char) -> Option<char> {
        self.characters
            .binary_search(&c)
            .ok()
            .map(|index| self.replacements[index])
    }
}

/// Assign replacement characters to every required character.
///
/// Fonts with more characters come first (ties keep their order). The cursor
/// is advanced across all fonts and returned for the caller to keep.
pub fn build_remap_table(
    requirements: &FontRequirements,
    locations: &FontLocations,
    map: &CharacterMap,
    mut cursor: MapCursor,
) -> Result<(Vec<RemapEntry>, MapCursor), SubsetError> {
    let required = requirements.total_characters();
    let available = cursor.remaining(map);
    if required > available {
        return Err(SubsetError::AlphabetExhausted { required, available });
    }

    let mut fonts: Vec<_> = requirements.iter().collect();
    fonts.sort_by(|a, b| b.1.len().cmp(&a.1.len()));

    let mut entries = Vec::with_capacity(fonts.len());
    for (font, chars) in fonts {
        let source_path = locations
            .path(font)
            .ok_or_else(|| SubsetError::FontResolutionFailure(vec![font.clone()]))?
            .to_path_buf();

        let characters: Vec<char> = chars.iter().copied().collect();
        let replacements = characters
            .iter()
            .map(|_| cursor.take(map).ok_or(SubsetError::AlphabetExhausted { required, available }))
            .collect::<Result<Vec<char>, _>>()?;

        debug!("Remapping {} character(s) of '{}'", characters.len(), font);
        entries.push(RemapEntry {
            font_name: font.clone(),
            source_path,
            characters,
            replacements,
        });
    }

    Ok((entries, cursor))
}

/// Remap entries indexed by font name, following fallback aliases
#[derive(Debug, Clone)]
pub struct RemapTable {
    entries: Vec<RemapEntry>,
    by_font: HashMap<String, usize>,
    aliases: IndexMap<String, String>,
}

impl RemapTable {
    pub fn new(entries: Vec<RemapEntry>, aliases: IndexMap<String, String>) -> Self {
        let by_font = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| (entry.font_name.clone(), index))
            .collect();
        RemapTable { entries, by_font, aliases }
    }

    pub fn entries(&self) -> &[RemapEntry] {
        &self.entries
    }

    /// Entry used to render text set in `font`
    pub fn lookup(&self, font: &str) -> Option<&RemapEntry> {
        let font = self.aliases.get(font).map(String::as_str).unwrap_or(font);
        self.by_font.get(font).map(|&index| &self.entries[index])
    }
}
