// src/quiz/catalog.rs

use crate::{
    models::quiz::{StoredTest, Test, TestDraft, TestList},
    store::Document,
};

use super::QuizError;

/// Ordered collection of test definitions backed by `tests.json`.
#[derive(Debug)]
pub struct QuizCatalog {
    doc: Document<TestList>,
}

impl QuizCatalog {
    pub fn new(doc: Document<TestList>) -> Self {
        Self { doc }
    }

    /// Every readable test, including correct answers.
    pub async fn list_all(&self) -> Vec<Test> {
        self.doc.read(|list| list.tests().cloned().collect()).await
    }

    /// The whole document, unreadable entries included. Admin view.
    pub async fn snapshot(&self) -> TestList {
        self.doc.snapshot().await
    }

    pub async fn get(&self, id: i64) -> Option<Test> {
        self.doc
            .read(|list| list.tests().find(|t| t.id == id).cloned())
            .await
    }

    /// Inserts or replaces a test and returns its id.
    ///
    /// * Without an id, the test gets `max(existing ids, 0) + 1` and is appended.
    /// * With an id that exists, the entry is replaced where it stands.
    /// * With an unknown id, the test is appended under that id.
    pub async fn add_or_update(&self, draft: TestDraft) -> Result<i64, QuizError> {
        let TestDraft {
            id,
            title: Some(title),
            questions: Some(questions),
            extra,
        } = draft
        else {
            return Err(QuizError::InvalidTestShape);
        };

        self.doc
            .update(|list| {
                let id = id.unwrap_or_else(|| list.next_id());
                let test = StoredTest::Test(Test {
                    id,
                    title,
                    questions,
                    extra,
                });

                match list.position(id) {
                    Some(pos) => {
                        tracing::info!("Replacing test {}", id);
                        list.0[pos] = test;
                    }
                    None => {
                        tracing::info!("Adding test {}", id);
                        list.0.push(test);
                    }
                }
                Ok(id)
            })
            .await
    }

    /// Removes the first entry with `id`.
    pub async fn delete(&self, id: i64) -> Result<(), QuizError> {
        self.doc
            .update(|list| {
                let pos = list.position(id).ok_or(QuizError::NotFound)?;
                list.0.remove(pos);
                tracing::info!("Deleted test {}", id);
                Ok(())
            })
            .await
    }
}
