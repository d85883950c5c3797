/*!
 * Font resolution: maps required font names to installed font files.
 */

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use indexmap::IndexMap;
use log::{debug, info, warn};
use walkdir::WalkDir;

use crate::errors::SubsetError;
use super::collector::FontRequirements;
use super::font_metadata::{FontInspector, FontMetadata};

/// Where each required font lives
#[derive(Debug, Clone, PartialEq)]
pub struct FontLocations {
    paths: HashMap<String, PathBuf>,
    fallback_name: String,
    aliases: IndexMap<String, String>,
}

impl FontLocations {
    pub fn new(fallback_name: &str) -> Self {
        FontLocations {
            paths: HashMap::new(),
            fallback_name: fallback_name.to_string(),
            aliases: IndexMap::new(),
        }
    }

    pub fn path(&self, font: &str) -> Option<&Path> {
        self.paths.get(font).map(PathBuf::as_path)
    }

    pub fn fallback_name(&self) -> &str {
        &self.fallback_name
    }

    pub fn fallback_path(&self) -> Option<&Path> {
        self.path(&self.fallback_name)
    }

    /// Missing font names mapped to the fallback that replaced them
    pub fn aliases(&self) -> &IndexMap<String, String> {
        &self.aliases
    }

    /// Apply the matching rules for one scanned file
    pub fn record(&mut self, metadata: &FontMetadata, path: &Path, requirements: &FontRequirements) {
        for name in [&metadata.postscript_name, &metadata.full_name].into_iter().flatten() {
            if requirements.contains(name) {
                self.paths.insert(name.clone(), path.to_path_buf());
            }
        }

        if let Some(family) = &metadata.family_name {
            if requirements.contains(family) && !self.paths.contains_key(family) {
                self.paths.insert(family.clone(), path.to_path_buf());
            }
        }

        if metadata.full_name.as_deref() == Some(self.fallback_name.as_str()) {
            self.paths.insert(self.fallback_name.clone(), path.to_path_buf());
        }
    }
}

/// Resolver settings
#[derive(Debug, Clone)]
pub struct ResolverOptions {
    /// Font used for every font that cannot be found
    pub fallback_font: String,
    /// File extensions that are never fonts (without the dot)
    pub ignored_extensions: Vec<String>,
}

/// Scans font directories and matches files to required font names
#[derive(Debug)]
pub struct FontResolver<'a> {
    inspector: &'a dyn FontInspector,
    options: ResolverOptions,
}

impl<'a> FontResolver<'a> {
    pub fn new(inspector: &'a dyn FontInspector, options: ResolverOptions) -> Self {
        FontResolver { inspector, options }
    }

    /// Scan the directories, fold missing fonts into the fallback and check
    /// that every remaining font has a file.
    pub fn resolve(
        &self,
        mut requirements: FontRequirements,
        directories: &[PathBuf],
    ) -> Result<(FontRequirements, FontLocations), SubsetError> {
        let mut locations = self.scan(&requirements, directories);
        merge_missing_into_fallback(&mut requirements, &mut locations);

        let unresolved: Vec<String> = requirements
            .font_names()
            .filter(|font| locations.path(font).is_none())
            .cloned()
            .collect();
        if !unresolved.is_empty() {
            return Err(SubsetError::FontResolutionFailure(unresolved));
        }

        for (font, chars) in requirements.iter() {
            debug!("Font '{}' -> {:?} ({} characters)", font, locations.path(font), chars.len());
        }
        Ok((requirements, locations))
    }

    /// Scan every directory in order; later matches may override earlier ones
    pub fn scan(&self, requirements: &FontRequirements, directories: &[PathBuf]) -> FontLocations {
        let mut locations = FontLocations::new(&self.options.fallback_font);

        for directory in directories {
            if !directory.is_dir() {
                warn!("Font directory not found, skipping: {:?}", directory);
                continue;
            }

            let mut inspected = 0usize;
            for entry in WalkDir::new(directory).follow_links(true).sort_by_file_name() {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        warn!("Failed to read directory entry: {}", e);
                        continue;
                    }
                };
                if !entry.file_type().is_file() || self.is_ignored(entry.path()) {
                    continue;
                }

                let path = std::path::absolute(entry.path()).unwrap_or_else(|_| entry.path().to_path_buf());
                match self.inspector.inspect(&path) {
                    Ok(metadata) => {
                        inspected += 1;
                        locations.record(&metadata, &path, requirements);
                    }
                    Err(e) => warn!("Error when loading font: {}", e),
                }
            }
            debug!("Inspected {} font file(s) in {:?}", inspected, directory);
        }

        locations
    }

    fn is_ignored(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy())
            .is_some_and(|ext| {
                self.options.ignored_extensions.iter().any(|ignored| ignored.eq_ignore_ascii_case(&ext))
            })
    }
}

/// Move the characters of every unresolved font into the fallback font.
///
/// The fallback entry is created when it was not required itself.
pub fn merge_missing_into_fallback(requirements: &mut FontRequirements, locations: &mut FontLocations) {
    let missing: Vec<String> = requirements
        .font_names()
        .filter(|font| locations.path(font).is_none())
        .cloned()
        .collect();

    let fallback = locations.fallback_name.clone();
    let mut merged = BTreeSet::new();
    for font in &missing {
        warn!("Missing font: {}", font);
        if let Some(chars) = requirements.remove(font) {
            merged.extend(chars);
        }
        if *font != fallback {
            locations.aliases.insert(font.clone(), fallback.clone());
        }
    }

    if !merged.is_empty() {
        info!("Using fallback font '{}' for {} missing font(s)", fallback, missing.len());
        requirements.merge(&fallback, merged);
    }
}
