use std::fmt::Debug;
use std::path::Path;
use ttf_parser::name_id;

use crate::errors::SubsetError;

// @module: Font name introspection

const ENGLISH_US: u16 = 0x0409;

/// Names a font file reports about itself
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontMetadata {
    pub postscript_name: Option<String>,
    pub full_name: Option<String>,
    pub family_name: Option<String>,
}

/// Reads font names from a file.
///
/// A failure means the file is not a usable font; the resolver skips it.
pub trait FontInspector: Debug {
    fn inspect(&self, path: &Path) -> Result<FontMetadata, SubsetError>;
}

/// Inspector reading the `name` table of the first face with ttf-parser
#[derive(Debug, Default, Clone, Copy)]
pub struct TtfInspector;

impl FontInspector for TtfInspector {
    fn inspect(&self, path: &Path) -> Result<FontMetadata, SubsetError> {
        let read_failure = |message: String| SubsetError::FontReadFailure {
            path: path.to_path_buf(),
            message,
        };

        let data = std::fs::read(path).map_err(|e| read_failure(e.to_string()))?;
        let face = ttf_parser::Face::parse(&data, 0).map_err(|e| read_failure(e.to_string()))?;

        Ok(FontMetadata {
            postscript_name: find_name(&face, name_id::POST_SCRIPT_NAME),
            full_name: find_name(&face, name_id::FULL_NAME),
            family_name: find_name(&face, name_id::FAMILY),
        })
    }
}

// @returns: English (US) name when present, else the first decodable one
fn find_name(face: &ttf_parser::Face, id: u16) -> Option<String> {
    let names: Vec<_> = face.names().into_iter().filter(|n| n.name_id == id).collect();
    names
        .iter()
        .filter(|n| n.language_id == ENGLISH_US)
        .find_map(|n| n.to_string())
        .or_else(|| names.iter().find_map(|n| n.to_string()))
}
