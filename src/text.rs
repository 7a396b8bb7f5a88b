//! Plain-text rendering for the terminal.

use crate::block::{DisplayItem, InlineRun, LineKind};
use crate::browse::{CategoryPage, View};
use crate::model::{Category, Question};
use crate::parser::format_answer;

const CODE_INDENT: &str = "    ";

/// Render display items, one line of output per answer line.
pub fn items_to_text(items: &[DisplayItem]) -> String {
    let mut out = String::new();

    for item in items {
        match item {
            DisplayItem::CodeBlock { language, body } => {
                if !language.is_empty() {
                    out.push_str(&format!("{CODE_INDENT}[{language}]\n"));
                }
                for line in body.lines() {
                    out.push_str(CODE_INDENT);
                    out.push_str(line);
                    out.push('\n');
                }
            }
            DisplayItem::Line(line) => {
                if line.kind == LineKind::Bullet {
                    out.push_str("  • ");
                }
                for run in &line.runs {
                    match run {
                        InlineRun::Plain(text) => out.push_str(text),
                        InlineRun::Code(text) => {
                            out.push('`');
                            out.push_str(text);
                            out.push('`');
                        }
                    }
                }
                out.push('\n');
            }
        }
    }

    out
}

pub fn view_to_text(view: &View) -> String {
    match view {
        View::Loading => "Loading...\n".to_string(),
        View::Failed(message) => format!("{message}\n"),
        View::Home { categories } => home_to_text(categories),
        View::Category(page) => page_to_text(page),
    }
}

fn home_to_text(categories: &[Category]) -> String {
    let mut out = String::from("Categories\n\n");
    for category in categories {
        out.push_str(&format!("  /{:<24} {}\n", category.slug, category.name));
        if let Some(description) = category.description.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
            out.push_str(&format!("  {:<25} {description}\n", ""));
        }
    }
    out
}

fn page_to_text(page: &CategoryPage) -> String {
    let mut out = String::new();
    let category = &page.category;

    out.push_str(&format!("{}\n\n", category.name));
    if let Some(description) = category.description.as_deref() {
        out.push_str(&format!("{}\n\n", description.trim()));
    }

    let points = category.overview_points();
    if !points.is_empty() {
        out.push_str("What you'll learn\n");
        for point in points {
            out.push_str(&format!("  • {point}\n"));
        }
        out.push('\n');
    }

    let Some(selected) = &page.selected else {
        out.push_str("Available topics\n");
        for sub in &page.subcategories {
            out.push_str(&format!("  /{}/{}  {}\n", category.slug, sub.slug, sub.name));
        }
        return out;
    };

    out.push_str(&format!("{}\n\n", selected.name));
    if page.questions.is_empty() {
        out.push_str("No questions yet.\n");
    }
    for (index, question) in page.questions.iter().enumerate() {
        out.push_str(&question_to_text(index + 1, question));
    }
    out
}

fn question_to_text(number: usize, question: &Question) -> String {
    let label = question.difficulty.label();
    let mut out = if label.is_empty() {
        format!("{number}. {}\n", question.question_text)
    } else {
        format!("{number}. {} ({label})\n", question.question_text)
    };
    out.push_str(&items_to_text(&format_answer(question.answer_text.as_deref())));
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{Difficulty, Subcategory};

    fn page() -> CategoryPage {
        CategoryPage {
            category: Category {
                id: 1,
                name: "API Testing".to_string(),
                slug: "api".to_string(),
                description: Some("Talking to services.".to_string()),
                overview: Some("REST\nGraphQL".to_string()),
            },
            subcategories: vec![Subcategory {
                id: 10,
                name: "REST basics".to_string(),
                slug: "rest".to_string(),
                category_id: 1,
            }],
            selected: None,
            questions: vec![],
        }
    }

    #[test]
    fn renders_answer_items() {
        let items = format_answer(Some("Use `get`:\n```py\nr = get(url)\nr.json()\n```\n- fast\n"));
        assert_eq!(
            items_to_text(&items),
            "Use `get`:\n    [py]\n    r = get(url)\n    r.json()\n  • fast\n"
        );
    }

    #[test]
    fn category_overview_lists_topics() {
        assert_eq!(
            view_to_text(&View::Category(page())),
            concat!(
                "API Testing\n\n",
                "Talking to services.\n\n",
                "What you'll learn\n  • REST\n  • GraphQL\n\n",
                "Available topics\n  /api/rest  REST basics\n",
            )
        );
    }

    #[test]
    fn selected_topic_shows_questions() {
        let mut page = page();
        page.category.overview = None;
        page.category.description = None;
        page.selected = page.subcategories.first().cloned();
        page.questions = vec![Question {
            id: 1,
            question_text: "What is REST?".to_string(),
            answer_text: Some("An architectural style".to_string()),
            difficulty: Difficulty::Other("warmup".to_string()),
        }];

        assert_eq!(
            view_to_text(&View::Category(page)),
            "API Testing\n\nREST basics\n\n1. What is REST? (warmup)\nAn architectural style\n\n"
        );
    }

    #[test]
    fn home_lists_categories_with_descriptions() {
        let categories = vec![
            page().category,
            Category {
                id: 2,
                name: "Selenium".to_string(),
                slug: "selenium".to_string(),
                description: Some("   ".to_string()),
                overview: None,
            },
        ];
        assert_eq!(
            view_to_text(&View::Home { categories }),
            format!(
                "Categories\n\n  /{:<24} API Testing\n  {:<25} Talking to services.\n  /{:<24} Selenium\n",
                "api", "", "selenium"
            )
        );
    }

    #[test]
    fn question_without_difficulty_or_answer() {
        let question = Question {
            id: 3,
            question_text: "Why mock?".to_string(),
            answer_text: None,
            difficulty: Difficulty::default(),
        };
        assert_eq!(question_to_text(2, &question), "2. Why mock?\n\n");
    }

    #[test]
    fn failure_is_shown_verbatim() {
        assert_eq!(view_to_text(&View::Failed("category `x` not found".to_string())), "category `x` not found\n");
    }
}
