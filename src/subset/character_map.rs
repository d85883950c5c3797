use std::collections::HashSet;
use std::ops::RangeInclusive;

use crate::errors::AppError;

// @module: Replacement alphabet for remapped glyphs

// @const: Ranges of the built-in alphabet, in consumption order
const DEFAULT_RANGES: [RangeInclusive<char>; 3] = [
    '!'..='~',
    '\u{00a1}'..='\u{00ff}',
    '\u{4e00}'..='\u{9fff}',
];

/// Ordered characters that remapped glyphs are moved to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterMap {
    characters: Vec<char>,
}

impl CharacterMap {
    /// Build a map from a custom alphabet
    pub fn from_alphabet(alphabet: &str) -> Result<Self, AppError> {
        if alphabet.is_empty() {
            return Err(AppError::Config("Character map must not be empty".to_string()));
        }

        let mut seen = HashSet::new();
        for c in alphabet.chars() {
            if !Self::is_safe(c) {
                return Err(AppError::Config(format!("Character map contains unsafe character U+{:04X}", c as u32)));
            }
            if !seen.insert(c) {
                return Err(AppError::Config(format!("Character map contains '{}' more than once", c)));
            }
        }

        Ok(CharacterMap {
            characters: alphabet.chars().collect(),
        })
    }

    /// Whether `c` can appear in dialogue text without being read as markup
    pub fn is_safe(c: char) -> bool {
        !c.is_control() && !c.is_whitespace() && !matches!(c, '{' | '}' | '\\' | '\u{00ad}')
    }

    pub fn get(&self, index: usize) -> Option<char> {
        self.characters.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }
}

impl Default for CharacterMap {
    fn default() -> Self {
        let characters = DEFAULT_RANGES
            .iter()
            .flat_map(|range| range.clone())
            .filter(|c| Self::is_safe(*c))
            .collect();
        CharacterMap { characters }
    }
}

/// Position of the next unused slot of a [`CharacterMap`].
///
/// One cursor is threaded through a whole run and only moves forward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MapCursor(usize);

impl MapCursor {
    pub fn position(&self) -> usize {
        self.0
    }

    /// Slots left in `map` after this cursor
    pub fn remaining(&self, map: &CharacterMap) -> usize {
        map.len().saturating_sub(self.0)
    }

    /// Take the next slot
    pub fn take(&mut self, map: &CharacterMap) -> Option<char> {
        let c = map.get(self.0)?;
        self.0 += 1;
        Some(c)
    }
}
