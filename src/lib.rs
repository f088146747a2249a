//! Pilot scaffolds projects from YAML structure templates.
//! A template names a tree of files and directories plus placeholder
//! variables; Pilot validates it, stores it locally and materializes it
//! under any output directory.

/// Command-line interface module for the Pilot application
pub mod cli;

/// Handlers for each subcommand
pub mod commands;

/// Settings resolution: environment, user config file, defaults
pub mod config;

/// Common constants used throughout the application
pub mod constants;

/// Launching an external editor on a stored template
pub mod editor;

/// Error types and handling for the Pilot application
pub mod error;

/// Creates the files and directories described by a template
pub mod generator;

/// User input and interaction handling
pub mod prompt;

/// Placeholder substitution for file contents
pub mod renderer;

/// Local storage of named templates
/// Layout:
/// - templates/<name>.yaml
/// - archive/<name>.yaml
/// - config.json
pub mod store;

/// Template parsing and validation
pub mod template;
