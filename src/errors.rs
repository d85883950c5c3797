/*!
 * Error types for the assmin application.
 *
 * This module contains custom error types for the different stages of the
 * subsetting pipeline, using the thiserror crate for ergonomic error definitions.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while subsetting fonts for a subtitle
#[derive(Error, Debug)]
pub enum SubsetError {
    /// Missing or malformed subtitle path or directory list
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// A candidate file could not be read as a font
    #[error("Failed to read font {path:?}: {message}")]
    FontReadFailure {
        /// Path of the candidate file
        path: PathBuf,
        /// Reason reported by the inspector
        message: String,
    },

    /// Required fonts are still unresolved after scanning every directory
    #[error("Could not find font file(s) for: {}", .0.join(", "))]
    FontResolutionFailure(Vec<String>),

    /// The replacement alphabet is too small for the characters in use
    #[error("Character map exhausted: {required} characters required but only {available} available")]
    AlphabetExhausted {
        /// Distinct characters required across every font
        required: usize,
        /// Slots left in the character map
        available: usize,
    },

    /// No free private-use code points remain for the two-phase remap
    #[error("Ran out of private-use staging code points for font {0}")]
    StagingExhausted(String),

    /// The font engine failed or did not produce the expected files
    #[error("Font engine failed: {0}")]
    ExternalEngineFailure(String),
}

/// Errors that can occur while reading or writing an ASS document
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// A section is used before its Format line
    #[error("Section [{0}] has entries but no Format line")]
    MissingFormat(String),

    /// An entry lacks a field its section requires
    #[error("Entry in section [{section}] has no {field} field")]
    MissingField {
        /// Section name
        section: String,
        /// Field name
        field: String,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from subtitle processing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Error from the subsetting pipeline
    #[error("Subset error: {0}")]
    Subset(#[from] SubsetError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
