// src/quiz/redact.rs

use serde_json::{Map, Value};

use crate::models::quiz::{PublicQuestion, PublicTest, Test};

use super::question::Question;

/// Key that marks an answer anywhere in a stored test.
const ANSWER_KEY: &str = "correct";

/// Projects the catalog into the view served to test-takers.
///
/// Top-level test fields are kept minus any `correct` key; each question is
/// reduced to its text and choice labels.
pub fn to_public_view(tests: &[Test]) -> Vec<PublicTest> {
    tests.iter().map(public_test).collect()
}

pub fn public_test(test: &Test) -> PublicTest {
    let mut extra = test.extra.clone();
    strip_answers(&mut extra);

    PublicTest {
        id: test.id,
        title: test.title.clone(),
        extra,
        questions: test
            .questions
            .iter()
            .map(|raw| {
                let Question { text, choices, .. } = Question::from_value(raw);
                PublicQuestion { q: text, choices }
            })
            .collect(),
    }
}

fn strip_answers(fields: &mut Map<String, Value>) {
    fields.remove(ANSWER_KEY);
    fields.values_mut().for_each(strip_answers_in);
}

fn strip_answers_in(value: &mut Value) {
    match value {
        Value::Object(fields) => strip_answers(fields),
        Value::Array(items) => items.iter_mut().for_each(strip_answers_in),
        _ => {}
    }
}
