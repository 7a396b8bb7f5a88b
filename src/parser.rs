use std::borrow::Cow;
use std::ops::Range;

use crate::block::{DisplayItem, InlineRun, Line, Segment};

const FENCE: &str = "```";
const BULLET_MARKERS: [char; 3] = ['•', '-', '*'];

/// Collapse CRLF pairs so later passes only deal with `\n`
pub fn normalize_line_breaks(text: &str) -> Cow<'_, str> {
    if text.contains("\r\n") {
        Cow::Owned(text.replace("\r\n", "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

/// Parse a raw answer into display items.
///
/// Absent or empty input yields no items. Malformed markup (stray or
/// unterminated backticks) is kept as plain text.
pub fn format_answer(raw: Option<&str>) -> Vec<DisplayItem> {
    let Some(raw) = raw.filter(|raw| !raw.is_empty()) else {
        return Vec::new();
    };

    let normalized = normalize_line_breaks(raw);
    let mut items = Vec::new();

    for segment in segment(&normalized) {
        match segment {
            Segment::Code { language, body } => {
                items.push(DisplayItem::CodeBlock { language, body });
            }
            Segment::Text { body } => {
                items.extend(body.split('\n').filter_map(classify_line).map(DisplayItem::Line));
            }
        }
    }

    items
}

/// Split normalized text into fenced code and prose segments.
pub fn segment(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut cursor = 0;

    for fence in find_fences(text) {
        push_text(&text[cursor..fence.start], &mut segments);
        push_code(&text[fence.start + FENCE.len()..fence.end - FENCE.len()], &mut segments);
        cursor = fence.end;
    }
    push_text(&text[cursor..], &mut segments);

    segments
}

/// Byte ranges of closed fences, markers included. The first closing marker
/// after an opening one ends the fence, so fences never nest.
fn find_fences(text: &str) -> Vec<Range<usize>> {
    let mut fences = Vec::new();
    let mut cursor = 0;

    while let Some(offset) = text[cursor..].find(FENCE) {
        let open = cursor + offset;
        let content_start = open + FENCE.len();
        // No closing marker anywhere after this one means no later marker can close either
        let Some(len) = text[content_start..].find(FENCE) else {
            break;
        };
        let end = content_start + len + FENCE.len();
        fences.push(open..end);
        cursor = end;
    }

    fences
}

fn push_text(body: &str, segments: &mut Vec<Segment>) {
    if !body.trim().is_empty() {
        segments.push(Segment::Text {
            body: body.to_string(),
        });
    }
}

fn push_code(content: &str, segments: &mut Vec<Segment>) {
    let content = content.trim();
    let (language, body) = match content.split_once('\n') {
        Some((language, body)) => (language.trim(), body.trim()),
        None => ("", content),
    };

    if !body.is_empty() {
        segments.push(Segment::Code {
            language: language.to_string(),
            body: body.to_string(),
        });
    }
}

/// Classify one line of a text segment. Blank lines yield `None`.
pub fn classify_line(line: &str) -> Option<Line> {
    let trimmed = line.trim();
    let first = trimmed.chars().next()?;

    if BULLET_MARKERS.contains(&first) {
        let rest = trimmed[first.len_utf8()..].trim();
        Some(Line::bullet(format_inline(rest)))
    } else {
        Some(Line::paragraph(format_inline(trimmed)))
    }
}

/// Split a single line into plain and inline-code runs.
///
/// A code span needs at least one character between its backticks; an
/// empty pair stays plain text and its second backtick may open a span.
pub fn format_inline(line: &str) -> Vec<InlineRun> {
    let mut runs = Vec::new();
    let mut plain_start = 0;
    let mut pos = 0;

    while let Some(offset) = line[pos..].find('`') {
        let open = pos + offset;
        let code_start = open + 1;
        match line[code_start..].find(['`', '\n']) {
            Some(0) => pos = code_start,
            Some(len) if line[code_start + len..].starts_with('`') => {
                push_plain(&line[plain_start..open], &mut runs);
                runs.push(InlineRun::Code(line[code_start..code_start + len].to_string()));
                pos = code_start + len + 1;
                plain_start = pos;
            }
            // Spans do not cross line breaks
            Some(len) => pos = code_start + len,
            None => break,
        }
    }
    push_plain(&line[plain_start..], &mut runs);

    runs
}

fn push_plain(text: &str, runs: &mut Vec<InlineRun>) {
    if !text.is_empty() {
        runs.push(InlineRun::Plain(text.to_string()));
    }
}
