/*!
 * Error types for the gameloc application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when talking to a model gateway
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

/// Errors surfaced by the translator for a single attempt
#[derive(Error, Debug)]
pub enum TranslationError {
    /// The gateway could not be reached after its internal retry budget
    #[error("Model unavailable: {0}")]
    ModelUnavailable(#[from] ProviderError),

    /// The gateway returned blank or unparseable output
    #[error("Model returned an empty response for record {record_id} ({language_code})")]
    EmptyResponse {
        /// Record being translated
        record_id: String,
        /// Target language of the attempt
        language_code: String,
    },

    /// The record cannot be translated as given
    #[error("Invalid record {record_id}: {reason}")]
    InvalidRecord {
        /// Record identifier
        record_id: String,
        /// What is wrong with it
        reason: String,
    },
}

/// Errors that can occur while loading rulesets
#[derive(Error, Debug)]
pub enum RulesetError {
    /// No ruleset file exists for a requested language
    #[error("No ruleset found for language: {0}")]
    NotFound(String),

    /// A ruleset file could not be read or parsed
    #[error("Failed to load ruleset from {path}: {reason}")]
    LoadFailed {
        /// Path of the offending file
        path: String,
        /// Parse or IO failure description
        reason: String,
    },

    /// No usable ruleset files were found at all
    #[error("No rulesets loadable from directory: {0}")]
    Empty(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a model gateway
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from the translation pipeline
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Error from ruleset loading
    #[error("Ruleset error: {0}")]
    Ruleset(#[from] RulesetError),

    /// Error reading or writing CSV data
    #[error("CSV error: {0}")]
    Csv(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

impl From<csv::Error> for AppError {
    fn from(error: csv::Error) -> Self {
        Self::Csv(error.to_string())
    }
}
