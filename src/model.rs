use serde::{Deserialize, Deserializer, Serialize};

/// A top-level knowledge-base category, e.g. "API Testing"
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Newline-separated "what you'll learn" points
    #[serde(default)]
    pub overview: Option<String>,
}

impl Category {
    /// Non-blank overview lines, trimmed.
    pub fn overview_points(&self) -> Vec<&str> {
        self.overview
            .as_deref()
            .unwrap_or_default()
            .lines()
            .map(str::trim)
            .filter(|point| !point.is_empty())
            .collect()
    }
}

/// A topic within a category
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Subcategory {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub category_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Question {
    pub id: i64,
    /// Empty when the row has no question text
    #[serde(rename = "question", default, deserialize_with = "null_as_empty")]
    pub question_text: String,
    /// Raw answer markup, see [`crate::format_answer`]
    #[serde(rename = "answer", default)]
    pub answer_text: Option<String>,
    #[serde(default)]
    pub difficulty: Difficulty,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Question difficulty. Values other than easy/medium/hard are kept verbatim
/// and get the neutral display treatment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Other(String),
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Other(String::new())
    }
}

impl From<Option<String>> for Difficulty {
    fn from(value: Option<String>) -> Self {
        match value.as_deref() {
            Some("easy") => Difficulty::Easy,
            Some("medium") => Difficulty::Medium,
            Some("hard") => Difficulty::Hard,
            _ => Difficulty::Other(value.unwrap_or_default()),
        }
    }
}

impl From<Difficulty> for String {
    fn from(value: Difficulty) -> Self {
        value.label().to_string()
    }
}

impl Difficulty {
    pub fn label(&self) -> &str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Other(raw) => raw,
        }
    }

    /// Badge colour as a hex string
    pub fn color(&self) -> &'static str {
        match self {
            Difficulty::Easy => "#4caf50",
            Difficulty::Medium => "#ff9800",
            Difficulty::Hard => "#f44336",
            Difficulty::Other(_) => "#757575",
        }
    }
}
