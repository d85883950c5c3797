/*!
 * Typed instructions for the font-editing engine.
 *
 * The generator only builds data; [`SubsetPlan::to_script`] renders it as a
 * FontForge native script at the boundary.
 */

use std::collections::HashSet;
use std::fmt;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use crate::errors::SubsetError;
use super::remap::RemapEntry;

// @const: Private-use areas walked for staging code points, in order
const PRIVATE_USE_RANGES: [RangeInclusive<u32>; 3] = [
    0xE000..=0xF8FF,
    0xF0000..=0xFFFFD,
    0x100000..=0x10FFFD,
];

const ENGLISH_US: u16 = 0x409;
const SUBFAMILY_NAME_ID: u16 = 2;

/// A single engine operation
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    Open(PathBuf),
    SelectAll,
    /// Remove one code point from the selection
    SelectFewer(u32),
    /// Delete every selected glyph
    DetachAndRemoveGlyphs,
    Select(u32),
    /// Give the selected glyph a new code point
    SetUnicodeValue(u32),
    ScaleToEm(u32),
    Generate(PathBuf),
    MergeFonts(PathBuf),
    SetTtfName { language: u16, string_id: u16, value: String },
    SetFontNames { font_name: String, family: String, full_name: String, weight: String, copyright: String },
    Quit(i32),
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Instruction::Open(path) => write!(f, "Open({}, 1);", quote_path(path)),
            Instruction::SelectAll => write!(f, "SelectAll();"),
            Instruction::SelectFewer(code) => write!(f, "SelectFewer(0u{:x});", code),
            Instruction::DetachAndRemoveGlyphs => write!(f, "DetachAndRemoveGlyphs();"),
            Instruction::Select(code) => write!(f, "Select(0u{:x});", code),
            Instruction::SetUnicodeValue(code) => write!(f, "SetUnicodeValue(0u{:x});", code),
            Instruction::ScaleToEm(size) => write!(f, "ScaleToEm({});", size),
            Instruction::Generate(path) => write!(f, "Generate({});", quote_path(path)),
            Instruction::MergeFonts(path) => write!(f, "MergeFonts({}, 1);", quote_path(path)),
            Instruction::SetTtfName { language, string_id, value } => {
                write!(f, "SetTTFName(0x{:x}, {}, {});", language, string_id, quote(value))
            }
            Instruction::SetFontNames { font_name, family, full_name, weight, copyright } => write!(
                f,
                "SetFontNames({},{},{},{},{});",
                quote(font_name),
                quote(family),
                quote(full_name),
                quote(weight),
                quote(copyright)
            ),
            Instruction::Quit(code) => write!(f, "Quit({});", code),
        }
    }
}

fn quote(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("\"{}\"", value))
}

fn quote_path(path: &Path) -> String {
    quote(&path.to_string_lossy())
}

/// Generator settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Design em size every subset is scaled to before merging
    pub em_size: u32,
    /// First private-use code point tried for staging
    pub staging_base: u32,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        GeneratorOptions {
            em_size: 1024,
            staging_base: 0xF100,
        }
    }
}

/// Ordered instructions plus the files the engine is expected to produce
#[derive(Debug, Clone, PartialEq)]
pub struct SubsetPlan {
    pub instructions: Vec<Instruction>,
    /// One subset per font, in remap order
    pub intermediates: Vec<PathBuf>,
    /// Merged output font
    pub target: PathBuf,
}

impl SubsetPlan {
    /// Render the plan as a FontForge script
    pub fn to_script(&self) -> String {
        let mut script = String::new();
        for instruction in &self.instructions {
            script.push_str(&instruction.to_string());
            script.push('\n');
        }
        script
    }
}

/// Path of the subset of font `index` inside `work_dir`
pub fn intermediate_path(work_dir: &Path, index: usize) -> PathBuf {
    work_dir.join(format!("temporary-font-{}.ttf", index))
}

/// Pick one staging code point per required character of `entry`.
///
/// Points are taken in position order from the private-use areas, starting
/// at `base`, skipping anything that is one of the entry's own required or
/// replacement characters, so no two glyphs ever share a code point while
/// the remap is in flight.
pub fn staging_code_points(entry: &RemapEntry, base: u32) -> Result<Vec<u32>, SubsetError> {
    let taken: HashSet<u32> = entry
        .characters()
        .iter()
        .chain(entry.replacements())
        .map(|&c| c as u32)
        .collect();

    let needed = entry.characters().len();
    let points: Vec<u32> = PRIVATE_USE_RANGES
        .iter()
        .flat_map(|range| range.clone())
        .filter(|code| *code >= base && !taken.contains(code))
        .take(needed)
        .collect();

    if points.len() < needed {
        return Err(SubsetError::StagingExhausted(entry.font_name().to_string()));
    }
    Ok(points)
}

/// Build the instructions that subset each font, merge the subsets and
/// export the result as `target_name` at `target_path`.
pub fn generate_plan(
    entries: &[RemapEntry],
    work_dir: &Path,
    target_name: &str,
    target_path: &Path,
    options: GeneratorOptions,
) -> Result<SubsetPlan, SubsetError> {
    if entries.is_empty() {
        return Err(SubsetError::InvalidArguments("No fonts to subset".to_string()));
    }

    let mut instructions = Vec::new();
    let mut intermediates = Vec::with_capacity(entries.len());

    for (index, entry) in entries.iter().enumerate() {
        let staging = staging_code_points(entry, options.staging_base)?;
        let intermediate = intermediate_path(work_dir, index);

        instructions.push(Instruction::Open(entry.source_path().to_path_buf()));
        instructions.push(Instruction::SelectAll);
        instructions.extend(entry.characters().iter().map(|&c| Instruction::SelectFewer(c as u32)));
        instructions.push(Instruction::DetachAndRemoveGlyphs);

        for (&c, &stage) in entry.characters().iter().zip(&staging) {
            instructions.push(Instruction::Select(c as u32));
            instructions.push(Instruction::SetUnicodeValue(stage));
        }
        for (&stage, &replacement) in staging.iter().zip(entry.replacements()) {
            instructions.push(Instruction::Select(stage));
            instructions.push(Instruction::SetUnicodeValue(replacement as u32));
        }

        instructions.push(Instruction::ScaleToEm(options.em_size));
        instructions.push(Instruction::Generate(intermediate.clone()));
        intermediates.push(intermediate);
    }

    instructions.push(Instruction::Open(intermediates[0].clone()));
    instructions.extend(intermediates[1..].iter().cloned().map(Instruction::MergeFonts));
    instructions.push(Instruction::SetTtfName {
        language: ENGLISH_US,
        string_id: SUBFAMILY_NAME_ID,
        value: target_name.to_string(),
    });
    instructions.push(Instruction::SetFontNames {
        font_name: target_name.to_string(),
        family: target_name.to_string(),
        full_name: target_name.to_string(),
        weight: String::new(),
        copyright: target_name.to_string(),
    });
    instructions.push(Instruction::Generate(target_path.to_path_buf()));
    instructions.push(Instruction::Quit(0));

    Ok(SubsetPlan {
        instructions,
        intermediates,
        target: target_path.to_path_buf(),
    })
}
