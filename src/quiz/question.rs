// src/quiz/question.rs

use serde_json::{Map, Value};

/// Field names tried, in order, for a question's display text.
const TEXT_FIELDS: [&str; 3] = ["q", "question", "text"];
/// Field names tried, in order, for the label of an object-shaped choice.
const LABEL_FIELDS: [&str; 3] = ["text", "label", "choice"];

/// A stored question reduced to the shape the rest of the crate works with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub text: String,
    pub choices: Vec<String>,
    /// Index of the correct choice. `None` when the stored value is missing or not an integer.
    pub correct: Option<i64>,
}

impl Question {
    /// Normalizes any stored question value. Never fails.
    pub fn from_value(raw: &Value) -> Self {
        let Value::Object(obj) = raw else {
            return Question {
                text: scalar_text(raw),
                choices: Vec::new(),
                correct: None,
            };
        };

        Question {
            text: first_present(obj, &TEXT_FIELDS)
                .map(scalar_text)
                .unwrap_or_default(),
            choices: normalize_choices(obj.get("choices")),
            correct: obj.get("correct").and_then(Value::as_i64),
        }
    }
}

fn normalize_choices(raw: Option<&Value>) -> Vec<String> {
    match raw {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .filter(|c| !c.is_null())
            .map(choice_label)
            .collect(),
        Some(single) => vec![choice_label(single)],
    }
}

/// Objects without a usable label yield an empty label so later choices keep their index.
fn choice_label(choice: &Value) -> String {
    match choice {
        Value::Object(obj) => first_present(obj, &LABEL_FIELDS)
            .map(scalar_text)
            .unwrap_or_default(),
        other => scalar_text(other),
    }
}

/// First value among `keys` that is present and non-empty.
fn first_present<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .find(|v| !is_blank(v))
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// Text of a scalar. Null and nested structures render as an empty string.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_falls_back_through_alternate_field_names() {
        assert_eq!(Question::from_value(&json!({"q": "A?"})).text, "A?");
        assert_eq!(Question::from_value(&json!({"q": "", "question": "B?"})).text, "B?");
        assert_eq!(Question::from_value(&json!({"text": "C?"})).text, "C?");
        assert_eq!(Question::from_value(&json!({"choices": []})).text, "");
    }

    #[test]
    fn mixed_choices_are_reduced_to_labels() {
        let q = Question::from_value(&json!({
            "q": "Pick",
            "choices": ["A", {"label": "B"}, null, {"text": "C"}]
        }));

        assert_eq!(q.choices, vec!["A", "B", "C"]);
    }

    #[test]
    fn unlabeled_objects_become_empty_labels_and_scalars_are_stringified() {
        let q = Question::from_value(&json!({
            "choices": [{"correct": 1}, 2, true, {"choice": "D"}, [1]]
        }));

        assert_eq!(q.choices, vec!["", "2", "true", "D", ""]);
    }

    #[test]
    fn single_choice_value_becomes_one_element_list() {
        assert_eq!(
            Question::from_value(&json!({"choices": {"label": "Only"}})).choices,
            vec!["Only"]
        );
        assert_eq!(
            Question::from_value(&json!({"choices": "Solo"})).choices,
            vec!["Solo"]
        );
        assert!(Question::from_value(&json!({"choices": null})).choices.is_empty());
    }

    #[test]
    fn non_object_questions_keep_their_text_only() {
        assert_eq!(
            Question::from_value(&json!("Free text")),
            Question {
                text: "Free text".into(),
                choices: vec![],
                correct: None
            }
        );
        assert_eq!(Question::from_value(&json!(null)).text, "");
        assert_eq!(Question::from_value(&json!(5)).text, "5");
    }

    #[test]
    fn correct_must_be_an_integer() {
        assert_eq!(Question::from_value(&json!({"correct": 2})).correct, Some(2));
        assert_eq!(Question::from_value(&json!({"correct": "2"})).correct, None);
        assert_eq!(Question::from_value(&json!({"correct": 1.5})).correct, None);
        assert_eq!(Question::from_value(&json!({"correct": true})).correct, None);
        assert_eq!(Question::from_value(&json!({})).correct, None);
    }
}
