/*!
 * Tests for ASS document parsing and dialogue tokenizing
 */

use anyhow::Result;
use assmin::dialogue_parts::{self, DialoguePart, OverrideTag};
use assmin::errors::SubtitleError;
use assmin::subtitle_processor::AssDocument;
use crate::common::{self, AssBuilder};

/// Test that an unmodified document writes back byte for byte
#[test]
fn test_parse_withComplexDocument_shouldRoundTrip() {
    let content = "\u{feff}[Script Info]\n; comment\nTitle: x\n\n[V4+ Styles]\nFormat: Name, Fontname\nStyle: Default,Sans\n\n[Fonts]\nfontname: a.ttf\nM0123\n\n[Events]\nFormat: Layer, Style, Text\nComment: 0,Default,not shown\nDialogue: 0,Default,{\\b1}Hi, there\n";
    let doc = AssDocument::parse(content);
    assert_eq!(doc.to_string(), content);
}

/// Test that a missing trailing newline is preserved
#[test]
fn test_parse_withoutTrailingNewline_shouldNotAddOne() {
    let content = "[Events]\nFormat: Style, Text\nDialogue: Default,hi";
    assert_eq!(AssDocument::parse(content).to_string(), content);
}

/// Test that styles are read in document order
#[test]
fn test_styles_withTwoStyles_shouldReturnBoth() -> Result<()> {
    let doc = AssDocument::parse(&AssBuilder::new().style("Default", "Arial").style("Sign", "Comic Sans MS").build());
    let styles = doc.styles()?;
    assert_eq!(styles.len(), 2);
    assert_eq!(styles[1].name, "Sign");
    assert_eq!(styles[1].font_name, "Comic Sans MS");
    Ok(())
}

/// Test that dialogue text keeps commas and surrounding spaces
#[test]
fn test_dialogues_withCommasInText_shouldKeepText() -> Result<()> {
    let doc = AssDocument::parse(&AssBuilder::new().style("Default", "Arial").dialogue("Default", " a, b, c").build());
    let dialogues = doc.dialogues()?;
    assert_eq!(dialogues[0].text, " a, b, c");
    Ok(())
}

/// Test that Comment lines are not dialogue
#[test]
fn test_dialogues_withCommentLine_shouldSkipIt() -> Result<()> {
    let content = "[Events]\nFormat: Style, Text\nComment: Default,hidden\nDialogue: Default,shown\n";
    let dialogues = AssDocument::parse(content).dialogues()?;
    assert_eq!(dialogues.len(), 1);
    assert_eq!(dialogues[0].text, "shown");
    Ok(())
}

/// Test that entries before a Format line are rejected
#[test]
fn test_dialogues_withoutFormat_shouldFail() {
    let content = "[Events]\nDialogue: 0,Default,text\n";
    let result = AssDocument::parse(content).dialogues();
    assert!(matches!(result, Err(SubtitleError::MissingFormat(_))));
}

/// Test that a Format line without a Style field is rejected
#[test]
fn test_dialogues_withoutStyleField_shouldFail() {
    let content = "[Events]\nFormat: Layer, Text\nDialogue: 0,text\n";
    let result = AssDocument::parse(content).dialogues();
    assert!(matches!(result, Err(SubtitleError::MissingField { .. })));
}

/// Test that the wrap style is read from the script info section only
#[test]
fn test_wrap_style_withScriptInfo_shouldReadValue() {
    assert_eq!(AssDocument::parse("[Script Info]\nWrapStyle: 2\n").wrap_style(), 2);
    assert_eq!(AssDocument::parse("[Script Info]\nWrapStyle: x\n").wrap_style(), 0);
    assert_eq!(AssDocument::parse("[Script Info]\nTitle: t\n[Other]\nWrapStyle: 2\n").wrap_style(), 0);
}

/// Test that write_to_file creates parent directories
#[test]
fn test_write_to_file_withNestedPath_shouldCreateDirectories() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("a").join("b").join("out.ass");
    let doc = AssDocument::parse("[Script Info]\nTitle: x\n");
    doc.write_to_file(&path)?;
    assert_eq!(std::fs::read_to_string(&path)?, "[Script Info]\nTitle: x\n");
    Ok(())
}

/// Test that \r with a style name is a reset tag
#[test]
fn test_parse_withStyleReset_shouldClassifyReset() {
    let parts = dialogue_parts::parse("{\\rSign\\i1}x");
    assert_eq!(parts[0], DialoguePart::Override(vec![
        OverrideTag::Reset("Sign".to_string()),
        OverrideTag::Other("\\i1".to_string()),
    ]));
}

/// Test that \pos is not mistaken for drawing mode
#[test]
fn test_parse_withPosTag_shouldKeepTextMode() {
    let parts = dialogue_parts::parse("{\\pos(10,20)}text");
    assert_eq!(parts[1], DialoguePart::Text("text".to_string()));
}
