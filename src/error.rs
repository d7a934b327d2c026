// File: src/error.rs
//! Error types for the vocabulary trainer.

use thiserror::Error;

/// The single error type shared by the store, codec, persistence and practice modules.
#[derive(Debug, Error)]
pub enum TrainerError {
    /// A word was created with an empty term.
    #[error("Please enter a word")]
    EmptyTerm,

    /// A word was created with an empty definition.
    #[error("Please enter a definition for the word")]
    EmptyDefinition,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Binary encoding error: {0}")]
    Binary(#[from] bincode::Error),

    /// The persisted envelope was written by an unknown format version.
    #[error("Unsupported saved-words format version: {0}")]
    UnsupportedFormatVersion(u32),

    /// The persisted bytes decoded but break a collection invariant.
    #[error("Invalid saved words: {0}")]
    InvalidData(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The session has no word under test.
    #[error("No round in progress; there are no words to practice")]
    NoActiveRound,

    /// Selections cannot change once the round's answer is revealed.
    #[error("The current round has already been graded")]
    RoundGraded,

    #[error("'{0}' is not one of the choices for this round")]
    UnknownChoice(String),
}

impl From<toml::de::Error> for TrainerError {
    fn from(e: toml::de::Error) -> Self {
        TrainerError::Config(e.to_string())
    }
}

/// A convenience `Result` alias using [`TrainerError`].
pub type Result<T> = std::result::Result<T, TrainerError>;
