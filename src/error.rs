//! Error types shared across the crate

use thiserror::Error;

/// Result type alias used throughout the crate
pub type Result<T> = std::result::Result<T, AgentsError>;

/// Main error type for agent runs and configuration
#[derive(Debug, Error)]
pub enum AgentsError {
    /// The API credential was not found in the environment
    #[error("API key not found. Set {var} in the environment or a .env file.")]
    MissingApiKey { var: &'static str },

    /// Error from the OpenAI API
    #[error("OpenAI API error: {0}")]
    OpenAIError(#[from] async_openai::error::OpenAIError),

    /// Maximum turns exceeded
    #[error("Maximum turns exceeded: {max_turns}")]
    MaxTurnsExceeded { max_turns: usize },

    /// Input guardrail triggered
    #[error("Input guardrail triggered: {message}")]
    InputGuardrailTriggered { message: String },

    /// Output guardrail triggered
    #[error("Output guardrail triggered: {message}")]
    OutputGuardrailTriggered { message: String },

    /// Tool execution error
    #[error("Tool execution error: {message}")]
    ToolExecutionError { message: String },

    /// Handoff target could not be resolved
    #[error("Handoff error: {message}")]
    HandoffError { message: String },

    /// The model produced output the runner cannot interpret
    #[error("Model behavior error: {message}")]
    ModelBehaviorError { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
