// ABOUTME: Bullet point extraction for slides
// ABOUTME: Asks the text model for short phrases and degrades through parse fallbacks

use crate::client::{ChatMessage, ChatRequest, TextModel};
use crate::models::Section;
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;

pub const MAX_BULLETS: usize = 5;

static RE_QUOTED: Lazy<Regex> = Lazy::new(|| Regex::new(r#""([^"]+)""#).unwrap());
static RE_BRACKETED: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[\s*(.+?)\s*\]").unwrap());

/// Get 3-5 concise bullet points for a section.
///
/// Never fails and never returns an empty list: a failed model call yields
/// generic bullets, an unparseable answer goes through [`parse_bullet_points`].
pub async fn extract_key_bullet_points(
    model: &dyn TextModel,
    section: &Section,
    document_title: &str,
) -> Vec<String> {
    let request = ChatRequest {
        messages: vec![ChatMessage::user(bullet_prompt(section, document_title))],
        temperature: Some(0.3),
        max_tokens: Some(300),
        json_output: false,
    };

    match model.complete(&request).await {
        Ok(answer) => parse_bullet_points(&answer, section),
        Err(e) => {
            warn!("Error extracting bullet points for \"{}\": {}", section.title, e);
            vec![
                format!("Explores {}", section.title),
                "Provides essential insights".to_string(),
                "Highlights key information".to_string(),
            ]
        }
    }
}

fn bullet_prompt(section: &Section, document_title: &str) -> String {
    format!(
        r#"Extract 3-5 extremely concise bullet points (5-10 words each) from this content.
Each bullet point should capture a key insight using active, impactful language.

DOCUMENT: {document_title}

SECTION TITLE: {title}

CONTENT:
{content}

KEY THEMES: {themes}

Format your response as a simple list of strings, like this:
["First bullet point", "Second bullet point", "Third bullet point"]

Make each bullet point extremely concise, starting with action verbs when possible.
Focus on the most important facts, insights, or takeaways."#,
        document_title = document_title,
        title = section.title,
        content = section.content,
        themes = section.themes.join(", "),
    )
}

/// Turn a model answer into at most five bullets.
///
/// Tries a list literal first (JSON, or single-quoted strings), then each
/// fallback in order until one yields a usable bullet: quoted substrings,
/// the bracketed list body split on commas, `-`/`*`/`[..]` marked lines, one
/// bullet per theme, and finally three generic bullets built from the
/// section title. Blank items never count as bullets.
pub fn parse_bullet_points(answer: &str, section: &Section) -> Vec<String> {
    let mut bullets = usable(parse_list_literal(answer).unwrap_or_default());

    if bullets.is_empty() {
        warn!("Could not parse bullet list for \"{}\", using fallbacks", section.title);
        bullets = usable(quoted_substrings(answer));
    }
    if bullets.is_empty() {
        bullets = usable(bracketed_items(answer));
    }
    if bullets.is_empty() {
        bullets = usable(marked_lines(answer));
    }
    if bullets.is_empty() {
        bullets = section
            .themes
            .iter()
            .take(MAX_BULLETS)
            .map(|theme| format!("Explores {}", theme))
            .collect();
    }
    if bullets.is_empty() {
        bullets = vec![
            format!("Highlights key aspects of {}", section.title),
            "Provides essential insights".to_string(),
            "Establishes important context".to_string(),
        ];
    }

    bullets.truncate(MAX_BULLETS);
    bullets
}

fn parse_list_literal(answer: &str) -> Option<Vec<String>> {
    match serde_json::from_str::<Vec<serde_json::Value>>(answer.trim()) {
        Ok(values) => Some(
            values
                .into_iter()
                .map(|value| match value {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                })
                .collect(),
        ),
        Err(_) => parse_quoted_list(answer.trim()),
    }
}

// Trimmed items that carry at least one letter or digit
fn usable(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| item.chars().any(char::is_alphanumeric))
        .collect()
}

/// A list of single- or double-quoted strings, e.g. `['a, b', "c"]`.
/// Commas inside quotes belong to the item; a trailing comma is allowed.
fn parse_quoted_list(text: &str) -> Option<Vec<String>> {
    let mut chars = text.strip_prefix('[')?.strip_suffix(']')?.chars().peekable();
    let mut items = Vec::new();

    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        let quote = match chars.next() {
            None => return Some(items),
            Some(c @ ('\'' | '"')) => c,
            Some(_) => return None,
        };

        let mut item = String::new();
        loop {
            match chars.next()? {
                '\\' => match chars.next()? {
                    'n' => item.push('\n'),
                    't' => item.push('\t'),
                    other => item.push(other),
                },
                c if c == quote => break,
                c => item.push(c),
            }
        }
        items.push(item);

        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        match chars.next() {
            None => return Some(items),
            Some(',') => {}
            Some(_) => return None,
        }
    }
}

fn quoted_substrings(answer: &str) -> Vec<String> {
    RE_QUOTED
        .captures_iter(answer)
        .map(|caps| caps[1].to_string())
        .collect()
}

fn bracketed_items(answer: &str) -> Vec<String> {
    let Some(caps) = RE_BRACKETED.captures(answer) else {
        return Vec::new();
    };
    caps[1]
        .split(',')
        .map(|item| {
            item.trim()
                .trim_matches(|c| c == '"' || c == '\'')
                .to_string()
        })
        .filter(|item| !item.is_empty())
        .collect()
}

fn marked_lines(answer: &str) -> Vec<String> {
    answer
        .lines()
        .map(str::trim)
        .filter(|line| {
            line.starts_with('-')
                || line.starts_with('*')
                || (line.starts_with('[') && line.contains(']'))
        })
        .map(|line| {
            line.trim_start_matches(|c| matches!(c, '-' | '*' | '[' | ']' | ' '))
                .trim_end_matches(']')
                .trim()
                .to_string()
        })
        .filter(|line| !line.is_empty())
        .collect()
}
