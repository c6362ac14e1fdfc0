// src/quiz/mod.rs

//! Test catalog, answer redaction and grading.
//!
//! Nothing in here knows about HTTP: the handlers translate requests into
//! calls on [`QuizCatalog`] and [`QuizGrader`] and map [`QuizError`] back into
//! responses.

pub mod catalog;
pub mod grader;
pub mod question;
pub mod redact;

use thiserror::Error;

use crate::store::StoreError;

pub use catalog::QuizCatalog;
pub use grader::QuizGrader;

#[derive(Debug, Error)]
pub enum QuizError {
    #[error("invalid test structure")]
    InvalidTestShape,

    #[error("not found")]
    NotFound,

    #[error("test not found")]
    TestNotFound,

    #[error(transparent)]
    Store(#[from] StoreError),
}
