// src/models/quiz.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::{Map, Value};

use super::lenient;

/// A test definition as stored in `tests.json`.
///
/// Questions are kept as raw JSON so hand-edited or legacy entries survive a
/// round-trip; they are only read through [`crate::quiz::question::Question`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Test {
    #[serde(default, deserialize_with = "stored_id")]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(default, deserialize_with = "stored_questions")]
    pub questions: Vec<Value>,
    /// Any other top-level fields the admin supplied.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Integer id, also accepted as a numeric string. `null` reads as 0.
fn stored_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let raw = Value::deserialize(deserializer)?;
    id_of(&raw).ok_or_else(|| de::Error::custom(format!("invalid test id {}", raw)))
}

fn id_of(raw: &Value) -> Option<i64> {
    match raw {
        Value::Null => Some(0),
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Question list. `null` reads as empty; any other non-array is rejected.
fn stored_questions<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Value>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => Ok(items),
        other => Err(de::Error::custom(format!("questions must be a list, got {}", other))),
    }
}

/// One entry of `tests.json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StoredTest {
    Test(Test),
    /// An entry that does not read as a test. Written back untouched.
    Opaque(Value),
}

impl StoredTest {
    /// The id this entry claims, if any can be read from it.
    pub fn id(&self) -> Option<i64> {
        match self {
            StoredTest::Test(test) => Some(test.id),
            StoredTest::Opaque(raw) => raw.get("id").and_then(id_of),
        }
    }

    pub fn as_test(&self) -> Option<&Test> {
        match self {
            StoredTest::Test(test) => Some(test),
            StoredTest::Opaque(_) => None,
        }
    }
}

/// The `tests.json` document.
///
/// Entries that are not test objects are kept as opaque values: they are
/// hidden from test-takers but still hold their id and their place in the file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TestList(pub Vec<StoredTest>);

impl TestList {
    /// Readable tests, in file order.
    pub fn tests(&self) -> impl Iterator<Item = &Test> {
        self.0.iter().filter_map(StoredTest::as_test)
    }

    /// `max(ids ∪ {0}) + 1`, counting ids of opaque entries too.
    pub fn next_id(&self) -> i64 {
        self.0.iter().filter_map(StoredTest::id).fold(0, i64::max) + 1
    }

    /// Position of the first entry claiming `id`.
    pub fn position(&self, id: i64) -> Option<usize> {
        self.0.iter().position(|entry| entry.id() == Some(id))
    }
}

impl<'de> Deserialize<'de> for TestList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Vec::<Value>::deserialize(deserializer)?;
        let entries = raw
            .into_iter()
            .enumerate()
            .map(|(pos, entry)| match Test::deserialize(&entry) {
                Ok(test) => StoredTest::Test(test),
                Err(e) => {
                    tracing::warn!("Keeping unreadable test entry at position {} as is: {}", pos, e);
                    StoredTest::Opaque(entry)
                }
            })
            .collect();
        Ok(TestList(entries))
    }
}

/// Test payload of an admin add-or-update request.
/// `title` and `questions` are required; their absence is reported, not rejected by serde.
#[derive(Debug, Clone, Deserialize)]
pub struct TestDraft {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub questions: Option<Vec<Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct UpsertTestRequest {
    pub test: Option<TestDraft>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteTestRequest {
    pub id: Option<i64>,
}

/// Answer-free view of a test for test-takers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublicTest {
    pub id: i64,
    pub title: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    pub questions: Vec<PublicQuestion>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicQuestion {
    pub q: String,
    pub choices: Vec<String>,
}

/// DTO for submitting a test attempt. Every field is loosely typed.
#[derive(Debug, Deserialize)]
pub struct SubmitTestRequest {
    /// Only an integer can name a test; any other value finds nothing.
    pub test_id: Option<Value>,
    /// Chosen choice index per question, in question order.
    /// Entries that are not integers (e.g. `null` for a skipped question) never score.
    #[serde(default, deserialize_with = "lenient::list")]
    pub answers: Vec<Value>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub user: Option<String>,
}

/// One entry of the append-only `results.json` log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizResult {
    pub user: String,
    pub test_id: i64,
    /// Number of correctly answered questions.
    pub score: u32,
    /// Number of questions in the test at submission time.
    pub total: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_keeps_entries_that_are_not_tests() {
        let raw = json!([
            {"id": 1, "title": "Rust", "questions": []},
            "garbage",
            null,
            {"id": 9, "questions": {"q": "?"}},
            {"id": 2, "title": "Axum", "questions": [], "level": "easy"}
        ]);

        let list: TestList = serde_json::from_value(raw.clone()).unwrap();

        let tests: Vec<&Test> = list.tests().collect();
        assert_eq!(tests.len(), 2);
        assert_eq!(tests[1].extra["level"], json!("easy"));
        assert_eq!(list.next_id(), 10);
        assert_eq!(serde_json::to_value(&list).unwrap(), raw);
    }

    #[test]
    fn loosely_typed_test_fields_are_normalized() {
        let raw = json!([
            {"id": 1, "title": null, "questions": [{"q": "x", "choices": ["a"], "correct": 0}]},
            {"id": "3", "title": "Strings", "questions": null}
        ]);

        let list: TestList = serde_json::from_value(raw).unwrap();

        let tests: Vec<&Test> = list.tests().collect();
        assert_eq!(tests.len(), 2);
        assert_eq!((tests[0].id, tests[0].title.as_str()), (1, ""));
        assert_eq!(tests[0].questions.len(), 1);
        assert_eq!(tests[1].id, 3);
        assert!(tests[1].questions.is_empty());
        assert_eq!(list.position(3), Some(1));
    }

    #[test]
    fn submission_accepts_any_field_types() {
        let req: SubmitTestRequest =
            serde_json::from_value(json!({"test_id": "1", "answers": null, "user": 5})).unwrap();

        assert_eq!(req.test_id, Some(json!("1")));
        assert!(req.answers.is_empty());
        assert_eq!(req.user.as_deref(), Some("5"));
    }

    #[test]
    fn test_keeps_extra_fields_on_round_trip() {
        let raw = json!({"id": 3, "title": "T", "questions": [{"q": "?", "correct": 1}], "minutes": 10});

        let test: Test = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(serde_json::to_value(&test).unwrap(), raw);
    }

    #[test]
    fn result_without_timestamp_loads() {
        let raw = json!({"user": "ivan", "test_id": 1, "score": 2, "total": 3});

        let result: QuizResult = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(result.submitted_at, None);
        assert_eq!(serde_json::to_value(&result).unwrap(), raw);
    }
}
