use crate::block::{DisplayItem, InlineRun, Line, LineKind};
use crate::browse::StudySheet;
use crate::config::ExportConfig;
use crate::model::{Difficulty, Question};
use crate::parser::format_answer;

/// Convert a study sheet to Typst markup
pub fn sheet_to_typst(sheet: &StudySheet, config: &ExportConfig) -> String {
    let mut out = String::new();

    out.push_str("#set page(paper: ");
    push_string(&config.paper, &mut out);
    out.push_str(")\n");
    out.push_str("#set par(linebreaks: \"optimized\")\n\n");

    out.push_str("= ");
    push_text(&sheet.category.name, &mut out);
    out.push_str("\n\n");

    if let Some(description) = sheet.category.description.as_deref().filter(|d| !d.trim().is_empty()) {
        out.push_str("#emph(");
        push_string(description.trim(), &mut out);
        out.push_str(")\n\n");
    }

    for (subcategory, questions) in &sheet.topics {
        out.push_str("== ");
        push_text(&subcategory.name, &mut out);
        out.push_str("\n\n");

        for question in questions {
            emit_question(question, config, &mut out);
        }
    }

    out
}

/// Convert a single raw answer to Typst markup
pub fn answer_to_typst(raw: Option<&str>) -> String {
    let mut out = String::new();
    items_to_typst(&format_answer(raw), &mut out);
    out
}

fn emit_question(question: &Question, config: &ExportConfig, out: &mut String) {
    // Keep the question heading with the start of its answer
    out.push_str("#block(breakable: false)[\n=== ");
    push_text(&question.question_text, out);
    if config.difficulty_badges && !question.difficulty.label().is_empty() {
        out.push(' ');
        emit_badge(&question.difficulty, out);
    }
    out.push_str("\n]\n\n");

    items_to_typst(&format_answer(question.answer_text.as_deref()), out);
}

fn emit_badge(difficulty: &Difficulty, out: &mut String) {
    out.push_str("#box(fill: rgb(");
    push_string(difficulty.color(), out);
    out.push_str("), inset: (x: 4pt, y: 2pt), radius: 3pt)[#text(size: 0.7em, fill: white, ");
    push_string(difficulty.label(), out);
    out.push_str(")]");
}

fn items_to_typst(items: &[DisplayItem], out: &mut String) {
    let mut in_list = false;

    for item in items {
        let is_bullet = matches!(item, DisplayItem::Line(line) if line.is_bullet());
        // A blank line after the last bullet ends the list
        if in_list && !is_bullet {
            out.push('\n');
        }
        in_list = is_bullet;

        match item {
            DisplayItem::CodeBlock { language, body } => {
                out.push_str("#block(breakable: false)[#raw(block: true, ");
                if !language.is_empty() {
                    out.push_str("lang: ");
                    push_string(language, out);
                    out.push_str(", ");
                }
                push_string(body, out);
                out.push_str(")]\n\n");
            }
            DisplayItem::Line(line) => emit_line(line, out),
        }
    }

    if in_list {
        out.push('\n');
    }
}

fn emit_line(line: &Line, out: &mut String) {
    match line.kind {
        LineKind::Bullet => {
            out.push_str("- ");
            runs_to_typst(&line.runs, out);
            out.push('\n');
        }
        LineKind::Paragraph => {
            runs_to_typst(&line.runs, out);
            out.push_str("\n\n");
        }
    }
}

fn runs_to_typst(runs: &[InlineRun], out: &mut String) {
    for run in runs {
        match run {
            InlineRun::Plain(text) => push_text(text, out),
            InlineRun::Code(text) => {
                out.push_str("#raw(");
                push_string(text, out);
                out.push(')');
            }
        }
    }
}

/// Place text in markup as an embedded string expression. Strings are never
/// parsed as markup, so answer content needs no markup escaping.
fn push_text(text: &str, out: &mut String) {
    out.push('#');
    push_string(text, out);
}

fn push_string(text: &str, out: &mut String) {
    out.push('"');
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out.push('"');
}
