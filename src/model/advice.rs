use serde::{Deserialize, Serialize};

use crate::error::CompletionError;

/// What the completion backend produced for one prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Advice {
    /// Text generated by the language model.
    Completion(String),
    /// A notice produced locally instead of asking the model, e.g. the API
    /// key is missing or there is no run to advise on.
    Advisory(String),
}

impl Advice {
    pub fn text(&self) -> &str {
        match self {
            Advice::Completion(text) | Advice::Advisory(text) => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Advice::Completion(text) | Advice::Advisory(text) => text,
        }
    }

    pub fn is_advisory(&self) -> bool {
        matches!(self, Advice::Advisory(_))
    }
}

pub type CompletionResult = Result<Advice, CompletionError>;

/// Single-fire outcome of an advice request, as handed to the presentation
/// layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdviceResponse {
    Advice(String),
    Error(String),
}

impl AdviceResponse {
    pub fn is_error(&self) -> bool {
        matches!(self, AdviceResponse::Error(_))
    }

    /// Text for an overlay: errors are prefixed the way the in-game screen
    /// shows them.
    pub fn display_text(&self) -> String {
        match self {
            AdviceResponse::Advice(text) => text.clone(),
            AdviceResponse::Error(message) => format!("Error: {}", message),
        }
    }
}
