use std::error::Error;

use crate::models::Step;

pub type HandlerResult = Result<(), Box<dyn Error + Send + Sync>>;

/// Input that does not fit the current step. Recovered by re-prompting.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("\"{input}\" is not one of the options for {step}")]
    UnknownOption { step: Step, input: String },

    #[error("\"{input}\" is not a valid time")]
    InvalidTime { input: String },

    #[error("{step} does not take answers")]
    NoAnswerExpected { step: Step },
}

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("failed to save profile for chat {chat_id}: {source}")]
    Write {
        chat_id: i64,
        #[source]
        source: sqlx::Error,
    },
}

/// Anything that prevents the bot from starting at all.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("{0} environment variable not set")]
    MissingEnvVar(&'static str),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("could not add column {column}: {source}")]
    Migration {
        column: &'static str,
        #[source]
        source: sqlx::Error,
    },
}
