// src/quiz/grader.rs

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;

use crate::{models::quiz::QuizResult, store::Document};

use super::{QuizCatalog, QuizError, question::Question};

/// Identity recorded when a submission does not name its user.
pub const ANONYMOUS_USER: &str = "unknown";

/// A test attempt. Not persisted on its own, only through its [`QuizResult`].
#[derive(Debug, Clone)]
pub struct Submission {
    pub test_id: i64,
    /// Chosen choice index per question. `None` marks an answer that cannot match.
    pub answers: Vec<Option<i64>>,
    pub user: String,
}

impl Submission {
    /// Builds a submission from loosely typed answers; non-integers become `None`.
    pub fn new(test_id: i64, answers: &[Value], user: Option<String>) -> Self {
        Self {
            test_id,
            answers: answers.iter().map(Value::as_i64).collect(),
            user: user.unwrap_or_else(|| ANONYMOUS_USER.to_string()),
        }
    }
}

/// Counts questions answered correctly, by position.
///
/// Question `i` scores when an answer exists at `i`, the question has an
/// integer `correct`, and the two are equal. Extra answers are ignored.
pub fn score(questions: &[Question], answers: &[Option<i64>]) -> u32 {
    questions
        .iter()
        .zip(answers)
        .filter(|(q, a)| q.correct.is_some() && q.correct == **a)
        .count() as u32
}

/// Scores submissions and keeps the append-only results log (`results.json`).
#[derive(Debug)]
pub struct QuizGrader {
    catalog: Arc<QuizCatalog>,
    results: Document<Vec<QuizResult>>,
}

impl QuizGrader {
    pub fn new(catalog: Arc<QuizCatalog>, results: Document<Vec<QuizResult>>) -> Self {
        Self { catalog, results }
    }

    /// Grades `submission` against the current definition of its test and logs the result.
    pub async fn submit(&self, submission: Submission) -> Result<QuizResult, QuizError> {
        let test = self
            .catalog
            .get(submission.test_id)
            .await
            .ok_or(QuizError::TestNotFound)?;

        let questions: Vec<Question> = test.questions.iter().map(Question::from_value).collect();

        let result = QuizResult {
            user: submission.user,
            test_id: test.id,
            score: score(&questions, &submission.answers),
            total: questions.len() as u32,
            submitted_at: Some(Utc::now()),
        };

        self.results
            .update(|log| {
                log.push(result.clone());
                Ok::<_, QuizError>(())
            })
            .await?;

        tracing::info!(
            "{} scored {}/{} on test {}",
            result.user,
            result.score,
            result.total,
            result.test_id
        );

        Ok(result)
    }

    /// Every result in submission order.
    pub async fn list_results(&self) -> Vec<QuizResult> {
        self.results.snapshot().await
    }
}
