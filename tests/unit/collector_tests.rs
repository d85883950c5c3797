/*!
 * Tests for character collection
 */

use std::collections::BTreeSet;
use anyhow::Result;
use assmin::subset::collector::{collect_characters, collect_line, FontRequirements, StyleFonts};
use assmin::subtitle_processor::{AssDocument, StyleInfo};
use crate::common::AssBuilder;

fn chars(text: &str) -> BTreeSet<char> {
    text.chars().collect()
}

fn style(name: &str, font: &str) -> StyleInfo {
    StyleInfo {
        name: name.to_string(),
        font_name: font.to_string(),
    }
}

/// Test collection of a single style without overrides
#[test]
fn test_collect_characters_withPlainText_shouldUseStyleFont() -> Result<()> {
    let doc = AssDocument::parse(&AssBuilder::new().style("Default", "Arial").dialogue("Default", "Hi").build());
    let requirements = collect_characters(&doc, "Arial")?;

    assert_eq!(requirements.len(), 1);
    assert_eq!(requirements.get("Arial"), Some(&chars("Hi")));
    Ok(())
}

/// Test that \fn only affects the text after it
#[test]
fn test_collect_characters_withInlineFont_shouldSplitFonts() -> Result<()> {
    let doc = AssDocument::parse(
        &AssBuilder::new()
            .style("Default", "Arial")
            .dialogue("Default", "ab{\\fnComic Sans MS}cd")
            .build(),
    );
    let requirements = collect_characters(&doc, "Arial")?;

    assert_eq!(requirements.get("Arial"), Some(&chars("ab")));
    assert_eq!(requirements.get("Comic Sans MS"), Some(&chars("cd")));
    Ok(())
}

/// Test that tags, line breaks and drawings are not collected
#[test]
fn test_collect_characters_withMarkup_shouldIgnoreIt() -> Result<()> {
    let doc = AssDocument::parse(
        &AssBuilder::new()
            .style("Default", "Arial")
            .dialogue("Default", "{\\b1\\pos(1,2)}x\\Ny{\\p1}m 0 0 l 5 5{\\p0}")
            .build(),
    );
    let requirements = collect_characters(&doc, "Arial")?;

    assert_eq!(requirements.get("Arial"), Some(&chars("xy")));
    Ok(())
}

/// Test that a hard space is collected as U+00A0
#[test]
fn test_collect_characters_withHardSpace_shouldCollectNoBreakSpace() -> Result<()> {
    let doc = AssDocument::parse(&AssBuilder::new().style("Default", "Arial").dialogue("Default", "a\\hb").build());
    let requirements = collect_characters(&doc, "Arial")?;

    assert_eq!(requirements.get("Arial"), Some(&chars("a\u{a0}b")));
    Ok(())
}

/// Test that a soft break is collected as a space unless it breaks the line
#[test]
fn test_collect_characters_withSoftBreak_shouldCollectSpaceOutsideWrapStyleTwo() -> Result<()> {
    let content = AssBuilder::new().style("Default", "Arial").dialogue("Default", "a\\nb").build();
    let wrapping = content.replace("ScriptType: v4.00+\n", "ScriptType: v4.00+\nWrapStyle: 2\n");

    let requirements = collect_characters(&AssDocument::parse(&content), "Arial")?;
    assert_eq!(requirements.get("Arial"), Some(&chars("a b")));

    let requirements = collect_characters(&AssDocument::parse(&wrapping), "Arial")?;
    assert_eq!(requirements.get("Arial"), Some(&chars("ab")));
    Ok(())
}

/// Test that fonts keep first-seen order and sets are ordered
#[test]
fn test_collect_characters_withManyLines_shouldKeepFirstSeenOrder() -> Result<()> {
    let doc = AssDocument::parse(
        &AssBuilder::new()
            .style("Default", "Zeta")
            .style("Sign", "Alpha")
            .dialogue("Default", "cba")
            .dialogue("Sign", "z")
            .dialogue("Default", "ab")
            .build(),
    );
    let requirements = collect_characters(&doc, "Arial")?;

    let names: Vec<&String> = requirements.font_names().collect();
    assert_eq!(names, vec!["Zeta", "Alpha"]);
    let zeta: Vec<char> = requirements.get("Zeta").unwrap().iter().copied().collect();
    assert_eq!(zeta, vec!['a', 'b', 'c']);
    Ok(())
}

/// Test that an unknown style uses the Default style
#[test]
fn test_collect_characters_withUnknownStyle_shouldUseDefaultStyle() -> Result<()> {
    let doc = AssDocument::parse(
        &AssBuilder::new()
            .style("Default", "Georgia")
            .dialogue("Missing", "q")
            .build(),
    );
    let requirements = collect_characters(&doc, "Arial")?;

    assert_eq!(requirements.get("Georgia"), Some(&chars("q")));
    Ok(())
}

/// Test that \r returns to the line's style font and \rStyle to that style's
#[test]
fn test_collect_line_withResets_shouldFollowStyles() {
    let styles = StyleFonts::new(&[style("Default", "Arial"), style("Sign", "Impact")], "Arial");
    let mut requirements = FontRequirements::new();

    collect_line(&mut requirements, &styles, "Arial", "a{\\fnX}b{\\r}c{\\rSign}d{\\fn}e", 0);

    assert_eq!(requirements.get("Arial"), Some(&chars("ace")));
    assert_eq!(requirements.get("X"), Some(&chars("b")));
    assert_eq!(requirements.get("Impact"), Some(&chars("d")));
}

/// Test that a later style definition replaces an earlier one
#[test]
fn test_style_fonts_withDuplicateStyle_shouldUseLastDefinition() {
    let styles = StyleFonts::new(&[style("Default", "One"), style("Default", "Two")], "Arial");
    assert_eq!(styles.font_for_style("Default"), "Two");
}

/// Test that the fallback font is used when nothing else matches
#[test]
fn test_style_fonts_withoutDefault_shouldUseFallback() {
    let styles = StyleFonts::new(&[style("Sign", "Impact")], "Arial");
    assert_eq!(styles.font_for_style("Other"), "Arial");
}

/// Test that character totals count shared characters once per font
#[test]
fn test_total_characters_withSharedCharacters_shouldCountPerFont() {
    let mut requirements = FontRequirements::new();
    requirements.add_text("A", "xy");
    requirements.add_text("B", "xz");
    assert_eq!(requirements.total_characters(), 4);

    requirements.remove("A");
    assert_eq!(requirements.total_characters(), 2);
    assert!(!requirements.contains("A"));
}

/// Test that reordering parts without changing each character's font gives the same sets
#[test]
fn test_collect_line_withPermutedParts_shouldCollectSameSets() {
    let styles = styles_for_permutation();
    let mut first = FontRequirements::new();
    let mut second = FontRequirements::new();

    collect_line(&mut first, &styles, "Arial", "ab{\\fnX}cd{\\r}e", 0);
    collect_line(&mut second, &styles, "Arial", "{\\fnX}dc{\\r}eba", 0);

    assert_eq!(first.get("Arial"), second.get("Arial"));
    assert_eq!(first.get("X"), second.get("X"));
}

fn styles_for_permutation() -> StyleFonts {
    StyleFonts::new(&[style("Default", "Arial")], "Arial")
}
