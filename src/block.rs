use serde::Serialize;

/// Inline text runs within a single answer line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum InlineRun {
    Plain(String),
    Code(String),
}

impl InlineRun {
    pub fn text(&self) -> &str {
        match self {
            InlineRun::Plain(text) | InlineRun::Code(text) => text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    Bullet,
    Paragraph,
}

/// A non-blank line of answer text, classified for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Line {
    pub kind: LineKind,
    pub runs: Vec<InlineRun>,
}

impl Line {
    pub fn bullet(runs: Vec<InlineRun>) -> Self {
        Self {
            kind: LineKind::Bullet,
            runs,
        }
    }

    pub fn paragraph(runs: Vec<InlineRun>) -> Self {
        Self {
            kind: LineKind::Paragraph,
            runs,
        }
    }

    pub fn is_bullet(&self) -> bool {
        self.kind == LineKind::Bullet
    }
}

/// A contiguous piece of normalized answer text, either fenced code or prose
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Code { language: String, body: String },
    Text { body: String },
}

/// Display-ready items produced from an answer, in source order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "item", rename_all = "snake_case")]
pub enum DisplayItem {
    CodeBlock {
        /// Empty when the fence carried no language line
        language: String,
        body: String,
    },
    Line(Line),
}
