/*!
 * Subtitle rewriting: points every style and every dialogue line at the
 * merged font and its remapped glyphs.
 */

use log::debug;

use crate::dialogue_parts::{self, DialoguePart, OverrideTag};
use crate::errors::SubtitleError;
use crate::subtitle_processor::{AssDocument, StyleInfo};
use super::collector::StyleFonts;
use super::remap::{RemapEntry, RemapTable};

/// Counts of what was rewritten
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteStats {
    pub styles: usize,
    pub dialogues: usize,
}

/// Rewrite the document in place for the merged font `target_font`
pub fn rewrite_subtitle(
    document: &mut AssDocument,
    table: &RemapTable,
    target_font: &str,
    fallback_font: &str,
) -> Result<RewriteStats, SubtitleError> {
    let mut stats = RewriteStats::default();
    let wrap_style = document.wrap_style();

    // Styles: remember the original fonts, then point them at the target
    let mut original_styles = Vec::new();
    for section in document.sections.iter_mut().filter(|s| s.is_styles()) {
        let Some(format) = section.require_format("Style")? else {
            continue;
        };
        let section_name = section.name.clone();
        for entry in section.entries_mut("Style") {
            let (Some(name), Some(font_name)) = (entry.field(&format, "Name"), entry.field(&format, "Fontname")) else {
                return Err(SubtitleError::MissingField {
                    section: section_name,
                    field: "Fontname".to_string(),
                });
            };
            original_styles.push(StyleInfo { name, font_name });
            entry.set_field(&format, "Fontname", target_font);
            stats.styles += 1;
        }
    }
    let styles = StyleFonts::new(&original_styles, fallback_font);

    // Dialogue: rebuild each line from its parts
    for section in document.sections.iter_mut().filter(|s| s.is_events()) {
        let Some(format) = section.require_format("Dialogue")? else {
            continue;
        };
        for entry in section.entries_mut("Dialogue") {
            let (Some(style), Some(text)) = (entry.field(&format, "Style"), entry.raw_field(&format, "Text")) else {
                continue;
            };
            let line_font = styles.font_for_style(&style);
            let rewritten = rewrite_line(&text, line_font, &styles, table, wrap_style);
            if rewritten != text {
                entry.set_field(&format, "Text", &rewritten);
                stats.dialogues += 1;
            }
        }
    }

    debug!("Rewrote {} style(s) and {} dialogue line(s)", stats.styles, stats.dialogues);
    Ok(stats)
}

/// Rewrite one dialogue line.
///
/// Font tags are dropped and text is substituted part by part with the table
/// of the font active at that point. Escapes drawn as a glyph become that
/// glyph's replacement.
pub fn rewrite_line(text: &str, line_font: &str, styles: &StyleFonts, table: &RemapTable, wrap_style: u8) -> String {
    let mut current = line_font.to_string();
    let mut parts = Vec::new();

    for part in dialogue_parts::parse(text) {
        match part {
            DialoguePart::Text(text) => {
                parts.push(DialoguePart::Text(substitute(&text, table.lookup(&current))));
            }
            DialoguePart::Escape(letter) => {
                let mapped = dialogue_parts::escape_glyph(letter, wrap_style)
                    .and_then(|glyph| table.lookup(&current)?.replacement_for(glyph));
                parts.push(match mapped {
                    Some(c) => DialoguePart::Text(c.to_string()),
                    None => part,
                });
            }
            DialoguePart::Drawing(_) => parts.push(part),
            DialoguePart::Override(tags) => {
                let had_tags = !tags.is_empty();
                let mut kept = Vec::with_capacity(tags.len());
                for tag in tags {
                    if let Some(change) = tag.font_change() {
                        current = styles.apply(change, line_font);
                    }
                    if !matches!(tag, OverrideTag::FontName(_)) {
                        kept.push(tag);
                    }
                }
                if had_tags && kept.is_empty() {
                    continue;
                }
                parts.push(DialoguePart::Override(kept));
            }
        }
    }

    dialogue_parts::to_text(&parts)
}

// Characters without a mapping are kept as they are
fn substitute(text: &str, entry: Option<&RemapEntry>) -> String {
    match entry {
        Some(entry) => text.chars().map(|c| entry.replacement_for(c).unwrap_or(c)).collect(),
        None => text.to_string(),
    }
}
