//! Splits template source into text and action segments.

use super::TemplateParseError;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Segment {
    Text(String),
    /// Action source with delimiters and trim markers removed.
    Action { src: String, line: usize },
}

pub(super) fn segment(src: &str) -> Result<Vec<Segment>, TemplateParseError> {
    let mut segments = Vec::new();
    let mut rest = src;
    let mut line = 1;
    let mut trim_next_text = false;

    while let Some(open) = rest.find(OPEN) {
        let (text, after_text) = rest.split_at(open);
        push_text(&mut segments, text, trim_next_text);
        line += text.matches('\n').count();

        let mut inner_start = &after_text[OPEN.len()..];
        if let Some(stripped) = inner_start.strip_prefix('-')
            && stripped.starts_with(|c: char| c.is_ascii_whitespace())
        {
            trim_trailing_text(&mut segments);
            inner_start = stripped;
        }

        let Some(close) = inner_start.find(CLOSE) else {
            return Err(TemplateParseError {
                line,
                message: "unclosed action: missing '}}'".to_string(),
            });
        };

        let mut inner = &inner_start[..close];
        trim_next_text = false;
        if let Some(stripped) = inner.strip_suffix('-')
            && stripped.ends_with(|c: char| c.is_ascii_whitespace())
        {
            inner = stripped;
            trim_next_text = true;
        }

        let action_line = line;
        line += inner_start[..close].matches('\n').count();
        rest = &inner_start[close + CLOSE.len()..];

        let trimmed = inner.trim();
        if trimmed.starts_with("/*") {
            if !trimmed.ends_with("*/") {
                return Err(TemplateParseError {
                    line: action_line,
                    message: "unclosed comment: missing '*/'".to_string(),
                });
            }
            continue;
        }

        segments.push(Segment::Action {
            src: trimmed.to_string(),
            line: action_line,
        });
    }

    push_text(&mut segments, rest, trim_next_text);
    Ok(segments)
}

fn push_text(segments: &mut Vec<Segment>, text: &str, trim_start: bool) {
    let text = if trim_start { text.trim_start() } else { text };
    if !text.is_empty() {
        segments.push(Segment::Text(text.to_string()));
    }
}

fn trim_trailing_text(segments: &mut Vec<Segment>) {
    if let Some(Segment::Text(text)) = segments.last_mut() {
        let keep = text.trim_end().len();
        text.truncate(keep);
        if text.is_empty() {
            segments.pop();
        }
    }
}
