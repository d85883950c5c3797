/*!
 * Tokenizer for ASS dialogue text.
 *
 * Dialogue text is split into plain text, line-break/hard-space escapes,
 * drawing commands and brace-delimited override blocks. Tokenizing is
 * lossless: [`to_text`] on the parts of a line gives back the line.
 */

use std::fmt;

/// Hard space produced by the `\h` escape
pub const HARD_SPACE: char = '\u{00a0}';

/// Wrap style under which `\n` is a line break instead of a space
pub const SOFT_BREAK_WRAP_STYLE: u8 = 2;

/// Character an escape is drawn as under `wrap_style`, if any.
///
/// `\h` is a no-break space. `\n` breaks the line only with wrap style 2 and
/// is drawn as a plain space otherwise. `\N` never draws a glyph.
pub fn escape_glyph(letter: char, wrap_style: u8) -> Option<char> {
    match letter {
        'h' => Some(HARD_SPACE),
        'n' if wrap_style != SOFT_BREAK_WRAP_STYLE => Some(' '),
        _ => None,
    }
}

/// A part of a dialogue line, in document order
#[derive(Debug, Clone, PartialEq)]
pub enum DialoguePart {
    /// Literal text rendered with the active font
    Text(String),
    /// `\N`, `\n` or `\h`; holds the letter after the backslash
    Escape(char),
    /// Vector drawing commands while `\p` drawing mode is on
    Drawing(String),
    /// A `{...}` block
    Override(Vec<OverrideTag>),
}

/// A single tag (or comment) inside an override block
#[derive(Debug, Clone, PartialEq)]
pub enum OverrideTag {
    /// `\fn<name>`, name kept as written
    FontName(String),
    /// `\r` or `\r<style>`
    Reset(String),
    /// `\p<scale>`
    DrawingMode(String),
    /// Any other tag or comment text, verbatim
    Other(String),
}

/// How a tag changes the active font
#[derive(Debug, Clone, PartialEq)]
pub enum FontChange {
    /// Switch to the named font
    Set(String),
    /// Go back to the font of the named style, or of the line's own style
    Reset(Option<String>),
}

impl OverrideTag {
    /// The font change this tag causes, if any
    pub fn font_change(&self) -> Option<FontChange> {
        match self {
            OverrideTag::FontName(name) => {
                let name = name.trim();
                if name.is_empty() {
                    Some(FontChange::Reset(None))
                } else {
                    Some(FontChange::Set(name.to_string()))
                }
            }
            OverrideTag::Reset(style) => {
                let style = style.trim();
                if style.is_empty() {
                    Some(FontChange::Reset(None))
                } else {
                    Some(FontChange::Reset(Some(style.to_string())))
                }
            }
            OverrideTag::DrawingMode(_) | OverrideTag::Other(_) => None,
        }
    }

    fn classify(segment: String) -> Self {
        if let Some(name) = segment.strip_prefix("\\fn") {
            return OverrideTag::FontName(name.to_string());
        }
        if let Some(scale) = segment.strip_prefix("\\p") {
            if !scale.is_empty() && scale.chars().all(|c| c.is_ascii_digit()) {
                return OverrideTag::DrawingMode(scale.to_string());
            }
        }
        if let Some(style) = segment.strip_prefix("\\r") {
            return OverrideTag::Reset(style.to_string());
        }
        OverrideTag::Other(segment)
    }
}

impl fmt::Display for OverrideTag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OverrideTag::FontName(name) => write!(f, "\\fn{}", name),
            OverrideTag::Reset(style) => write!(f, "\\r{}", style),
            OverrideTag::DrawingMode(scale) => write!(f, "\\p{}", scale),
            OverrideTag::Other(raw) => write!(f, "{}", raw),
        }
    }
}

impl fmt::Display for DialoguePart {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DialoguePart::Text(text) | DialoguePart::Drawing(text) => write!(f, "{}", text),
            DialoguePart::Escape(letter) => write!(f, "\\{}", letter),
            DialoguePart::Override(tags) => {
                write!(f, "{{")?;
                for tag in tags {
                    write!(f, "{}", tag)?;
                }
                write!(f, "}}")
            }
        }
    }
}

/// Split dialogue text into parts
pub fn parse(text: &str) -> Vec<DialoguePart> {
    let mut parts = Vec::new();
    let mut buffer = String::new();
    let mut drawing = false;
    let mut rest = text;

    while let Some(c) = rest.chars().next() {
        if c == '{' {
            if let Some(end) = rest.find('}') {
                flush(&mut parts, &mut buffer, drawing);
                let tags = parse_block(&rest[1..end]);
                for tag in &tags {
                    if let OverrideTag::DrawingMode(scale) = tag {
                        drawing = scale.parse::<u32>().is_ok_and(|n| n > 0);
                    }
                }
                parts.push(DialoguePart::Override(tags));
                rest = &rest[end + 1..];
                continue;
            }
        }

        if c == '\\' && !drawing {
            if let Some(letter @ ('N' | 'n' | 'h')) = rest[1..].chars().next() {
                flush(&mut parts, &mut buffer, drawing);
                parts.push(DialoguePart::Escape(letter));
                rest = &rest[2..];
                continue;
            }
        }

        buffer.push(c);
        rest = &rest[c.len_utf8()..];
    }

    flush(&mut parts, &mut buffer, drawing);
    parts
}

/// Join parts back into dialogue text
pub fn to_text(parts: &[DialoguePart]) -> String {
    parts.iter().map(|part| part.to_string()).collect()
}

fn flush(parts: &mut Vec<DialoguePart>, buffer: &mut String, drawing: bool) {
    if buffer.is_empty() {
        return;
    }
    let content = std::mem::take(buffer);
    parts.push(if drawing {
        DialoguePart::Drawing(content)
    } else {
        DialoguePart::Text(content)
    });
}

// Backslashes inside parentheses belong to the enclosing tag, e.g. \t(\fs20)
fn parse_block(content: &str) -> Vec<OverrideTag> {
    let mut tags = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;

    for c in content.chars() {
        let in_tag = current.starts_with('\\');
        match c {
            '\\' if depth == 0 => {
                if !current.is_empty() {
                    tags.push(OverrideTag::classify(std::mem::take(&mut current)));
                }
                current.push(c);
            }
            '(' if in_tag => {
                depth += 1;
                current.push(c);
            }
            ')' if in_tag => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            _ => current.push(c),
        }
    }

    if !current.is_empty() {
        tags.push(OverrideTag::classify(current));
    }
    tags
}
