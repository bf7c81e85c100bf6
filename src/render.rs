//! Result rendering.
//!
//! A [`SearchResult`] can be shown two ways:
//! - Cards - one card per element, one labelled field per key
//! - Raw - the whole body as indented JSON
//!
//! Switching between them never touches the result itself.

use crate::model::types::{Entry, SearchResult};
use colored::Colorize;
use serde_json::Value;

/// Active result view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ViewMode {
    /// One card per result element
    #[default]
    Cards,
    /// Indented JSON of the whole response
    Raw,
}

impl ViewMode {
    /// Tab title for this view
    pub fn name(self) -> &'static str {
        match self {
            Self::Cards => "Card View",
            Self::Raw => "JSON View",
        }
    }

    /// Switch to the other view
    pub fn toggle(self) -> Self {
        match self {
            Self::Cards => Self::Raw,
            Self::Raw => Self::Cards,
        }
    }

    /// Tab position
    pub fn index(self) -> usize {
        match self {
            Self::Cards => 0,
            Self::Raw => 1,
        }
    }

    pub fn all() -> &'static [Self] {
        &[Self::Cards, Self::Raw]
    }
}

/// One labelled value on a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardField {
    pub label: String,
    pub value: String,
}

/// One result element. `fields` is empty when the element is not an object.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Card {
    pub fields: Vec<CardField>,
}

/// Output of [`render`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    Cards(Vec<Card>),
    Raw(String),
}

pub fn render(result: &SearchResult, mode: ViewMode) -> Rendered {
    match mode {
        ViewMode::Cards => Rendered::Cards(cards(result)),
        ViewMode::Raw => Rendered::Raw(raw(result)),
    }
}

/// Build cards in element order; keys keep the order they had in the body.
pub fn cards(result: &SearchResult) -> Vec<Card> {
    result
        .entries()
        .into_iter()
        .map(|entry| match entry {
            Entry::Object(map) => Card {
                fields: map
                    .iter()
                    .map(|(key, value)| CardField {
                        label: key.clone(),
                        value: field_text(value),
                    })
                    .collect(),
            },
            Entry::Other(value) => {
                tracing::debug!(kind = value_kind(value), "non-object element, no fields");
                Card::default()
            }
        })
        .collect()
}

/// Whole result as 2-space indented JSON.
pub fn raw(result: &SearchResult) -> String {
    serde_json::to_string_pretty(result).unwrap_or_else(|_| "null".to_string())
}

/// Strings verbatim, everything else as compact JSON.
pub fn field_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Plain-text card listing for terminal output
pub fn format_cards(cards: &[Card], color: bool) -> String {
    let mut output = String::new();

    let header = "Search Results";
    if color {
        output.push_str(&header.bright_cyan().bold().to_string());
    } else {
        output.push_str(header);
    }
    output.push('\n');
    output.push_str(&format!(
        "{} result{}\n",
        cards.len(),
        if cards.len() == 1 { "" } else { "s" }
    ));
    output.push_str(&"=".repeat(60));
    output.push('\n');

    for (i, card) in cards.iter().enumerate() {
        if i > 0 {
            output.push_str(&"-".repeat(60));
            output.push('\n');
        }
        for field in &card.fields {
            let label = format!("{}:", field.label);
            if color {
                output.push_str(&format!("{} {}\n", label.dimmed(), field.value));
            } else {
                output.push_str(&format!("{label} {}\n", field.value));
            }
        }
    }

    output
}

/// Text for the given view, ready to print.
pub fn format_rendered(rendered: &Rendered, color: bool) -> String {
    match rendered {
        Rendered::Cards(cards) => format_cards(cards, color),
        Rendered::Raw(text) => format!("{text}\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> SearchResult {
        SearchResult::from_value(json!([
            {"name": "Smith", "rank": "Col", "sessions": [1, 2], "bio": null},
            {"name": "Jones", "org": {"unit": "SOCOM"}}
        ]))
    }

    #[test]
    fn test_view_mode_toggle() {
        assert_eq!(ViewMode::default(), ViewMode::Cards);
        assert_eq!(ViewMode::Cards.toggle(), ViewMode::Raw);
        assert_eq!(ViewMode::Cards.toggle().toggle(), ViewMode::Cards);
        assert_eq!(ViewMode::Raw.name(), "JSON View");
    }

    #[test]
    fn test_single_object_is_one_card_in_key_order() {
        let result = SearchResult::from_value(json!({"zulu": "z", "alpha": "a", "mike": 3}));
        let cards = cards(&result);
        assert_eq!(cards.len(), 1);
        let labels: Vec<_> = cards[0].fields.iter().map(|f| f.label.as_str()).collect();
        assert_eq!(labels, ["zulu", "alpha", "mike"]);
        assert_eq!(cards[0].fields[2].value, "3");
    }

    #[test]
    fn test_empty_array_has_no_cards() {
        let result = SearchResult::from_value(json!([]));
        assert!(cards(&result).is_empty());
        assert_eq!(render(&result, ViewMode::Raw), Rendered::Raw("[]".into()));
    }

    #[test]
    fn test_non_string_values_are_compact_json() {
        let cards = cards(&sample());
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].fields[1].value, "Col");
        assert_eq!(cards[0].fields[2].value, "[1,2]");
        assert_eq!(cards[0].fields[3].value, "null");
        assert_eq!(cards[1].fields[1].value, r#"{"unit":"SOCOM"}"#);
    }

    #[test]
    fn test_non_object_elements_render_empty_cards() {
        let result = SearchResult::from_value(json!([{"a": "b"}, "loose", 4, null]));
        let cards = cards(&result);
        assert_eq!(cards.len(), 4);
        assert_eq!(cards[0].fields.len(), 1);
        assert!(cards[1..].iter().all(|c| c.fields.is_empty()));

        let scalar = SearchResult::from_value(json!(true));
        assert_eq!(super::cards(&scalar), vec![Card::default()]);
    }

    #[test]
    fn test_raw_round_trips() {
        let result = sample();
        let text = raw(&result);
        assert!(text.contains("\n  {\n    \"name\": \"Smith\""));
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, result.to_value());
    }

    #[test]
    fn test_example_card() {
        let result = SearchResult::from_value(json!([{"name": "Smith", "rank": "Col"}]));
        let Rendered::Cards(cards) = render(&result, ViewMode::Cards) else {
            panic!("expected cards");
        };
        assert_eq!(
            cards,
            vec![Card {
                fields: vec![
                    CardField { label: "name".into(), value: "Smith".into() },
                    CardField { label: "rank".into(), value: "Col".into() },
                ]
            }]
        );
    }

    #[test]
    fn test_format_cards_plain() {
        let output = format_cards(&cards(&sample()), false);
        assert!(output.starts_with("Search Results\n2 results\n"));
        assert!(output.contains("name: Smith\nrank: Col\n"));
        assert!(output.contains("org: {\"unit\":\"SOCOM\"}"));
        assert!(!output.contains('\u{1b}'));
    }

    #[test]
    fn test_format_rendered_raw_ends_with_newline() {
        let text = format_rendered(&render(&sample(), ViewMode::Raw), false);
        assert!(text.ends_with("]\n"));
    }
}
