//! Error handling for the Pilot application.
//! Defines custom error types and results used throughout the application.

use std::io;
use thiserror::Error;

use crate::generator::GenerationResult;
use crate::template::ValidationError;

/// Custom error types for Pilot operations.
///
/// This enum represents all possible errors that can occur within the Pilot application.
/// It implements the standard Error trait through thiserror's derive macro.
#[derive(Error, Debug)]
pub enum Error {
    /// The template text is not well-formed YAML or its root is not a mapping.
    #[error("Invalid YAML: {0}")]
    ParseError(String),

    /// The template decoded but violates the schema. Carries every defect found.
    #[error("Template validation failed:\n{}", format_validation_errors(.errors))]
    TemplateInvalid { errors: Vec<ValidationError> },

    /// A filesystem operation failed while materializing a template.
    /// `partial` holds whatever was created before the failure; nothing is rolled back.
    #[error("Failed to generate project: {reason}")]
    GenerationFailed { reason: String, partial: Box<GenerationResult> },

    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    /// Represents errors that occur while reading or writing the JSON settings file
    #[error("JSON error: {0}.")]
    JsonError(#[from] serde_json::Error),

    #[error("Template '{name}' not found in {location}.")]
    TemplateNotFound { name: String, location: String },

    #[error("Template '{name}' already exists in {location}. Use --force to overwrite.")]
    TemplateExists { name: String, location: String },

    #[error(
        "Invalid template name '{0}': use letters, digits, '.', '_' or '-', \
         starting with a letter or digit."
    )]
    InvalidTemplateName(String),

    #[error("Directory '{output_dir}' is not empty. Use --force to overwrite.")]
    OutputDirectoryNotEmpty { output_dir: String },

    #[error("File '{path}' already exists. Use --force to overwrite.")]
    OutputFileExists { path: String },

    /// Represents failures to launch the editor or a non-zero editor exit
    #[error("Editor error: {0}.")]
    EditorError(String),

    /// Represents errors that occur during configuration parsing or processing
    #[error("Configuration error: {0}.")]
    ConfigError(String),

    /// Represents failures of interactive prompts
    #[error("Prompt error: {0}.")]
    PromptError(String),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors.iter().map(|e| format!("  - {e}")).collect::<Vec<_>>().join("\n")
}

/// Convenience type alias for Results with Error as the error type.
///
/// # Type Parameters
/// * `T` - The type of the success value
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The Error to handle
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{err}");
    std::process::exit(1);
}
