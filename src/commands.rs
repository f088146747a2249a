//! Handlers for each Pilot subcommand.
//! Every handler takes its collaborators (store, settings, prompter, output
//! sink) explicitly so it can run without a terminal.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::{
    cli::{Command, ConfigAction},
    config::{defaults, env_key, parse_variable, Settings},
    constants::MAX_LISTED_FILES,
    editor::open_in_editor,
    error::{Error, Result},
    generator::{ensure_output_dir, generate, GenerationResult},
    prompt::Prompter,
    renderer::{PlaceholderRenderer, Variables},
    store::{Location, TemplateStore},
    template::{parse_and_validate, summarize, TemplateSummary},
};

fn not_found(name: &str, location: Location) -> Error {
    Error::TemplateNotFound {
        name: name.to_string(),
        location: location.to_string(),
    }
}

fn require(store: &TemplateStore, name: &str, location: Location) -> Result<String> {
    store.read(name, location)?.ok_or_else(|| not_found(name, location))
}

/// Dispatches a parsed subcommand.
pub fn run<W: Write>(
    command: Command,
    store: &TemplateStore,
    prompt: &dyn Prompter,
    out: &mut W,
) -> Result<()> {
    let settings = Settings::from_env(&store.read_config()?);

    match command {
        Command::Create { name, path, force } => create(store, out, &name, &path, force),
        Command::Init { name, output, force, vars } => {
            init(store, &settings, out, &name, output.as_deref(), force, &vars).map(|_| ())
        }
        Command::List { archived, all } => list(store, out, archived, all),
        Command::Source { name, archived } => source(store, out, &name, archived),
        Command::Edit { name, editor } => edit(store, &settings, out, &name, editor.as_deref()),
        Command::Export { name, output, force } => export(store, out, &name, &output, force),
        Command::Duplicate { source, new_name, force } => {
            duplicate(store, out, &source, &new_name, force)
        }
        Command::Delete { name, force, archived } => {
            delete(store, prompt, out, &name, force, archived)
        }
        Command::Archive { name, restore } => archive(store, out, &name, restore),
        Command::Config { action } => config(store, &settings, out, action),
    }
}

/// Validates a YAML file and saves it into the store under `name`.
pub fn create<W: Write>(
    store: &TemplateStore,
    out: &mut W,
    name: &str,
    path: &Path,
    force: bool,
) -> Result<()> {
    if store.exists(name, Location::Active)? && !force {
        return Err(Error::TemplateExists {
            name: name.to_string(),
            location: Location::Active.to_string(),
        });
    }

    let content = fs::read_to_string(path)?;
    let template = parse_and_validate(&content)?;
    let summary = summarize(&template);
    let saved = store.save(name, &content)?;

    writeln!(out, "Template '{name}' created successfully!")?;
    writeln!(out, "  Name: {}", summary.name)?;
    writeln!(out, "  Description: {}", summary.description)?;
    writeln!(out, "  Stored at: {}", saved.display())?;
    Ok(())
}

/// Generates a project from a stored template.
///
/// # Arguments
/// * `output` - Target directory; falls back to the `default_output_dir` setting
/// * `force` - Allow generating into a non-empty directory
/// * `vars` - `KEY=VALUE` overrides applied on top of the template's variables
///
/// # Errors
/// * `Error::OutputDirectoryNotEmpty` if the output has entries and force is false
/// * Any validation or generation error; on `GenerationFailed` the partial
///   result is reported before the error is returned
pub fn init<W: Write>(
    store: &TemplateStore,
    settings: &Settings,
    out: &mut W,
    name: &str,
    output: Option<&Path>,
    force: bool,
    vars: &[String],
) -> Result<GenerationResult> {
    let content = require(store, name, Location::Active)?;

    let output =
        output.map(Path::to_path_buf).unwrap_or_else(|| settings.default_output_dir());
    let output = ensure_output_dir(output, force)?;

    let template = parse_and_validate(&content)?;

    let overrides =
        vars.iter().map(String::as_str).map(parse_variable).collect::<Result<Variables>>()?;
    let overrides = (!overrides.is_empty()).then_some(overrides);

    info!("Initializing project from template '{}'", name);
    writeln!(out, "Initializing project from template '{name}'...")?;

    let renderer = PlaceholderRenderer::new();
    let result = match generate(&renderer, &template, &output, overrides.as_ref()) {
        Ok(result) => result,
        Err(Error::GenerationFailed { reason, partial }) => {
            writeln!(
                out,
                "Generation stopped after creating {} directories and {} files in {}.",
                partial.created_directories.len(),
                partial.created_files.len(),
                output.display()
            )?;
            return Err(Error::GenerationFailed { reason, partial });
        }
        Err(e) => return Err(e),
    };

    writeln!(out, "Project initialized successfully!")?;
    writeln!(out)?;
    writeln!(out, "Created:")?;
    writeln!(out, "  {} directories", result.created_directories.len())?;
    writeln!(out, "  {} files", result.created_files.len())?;
    writeln!(out)?;
    writeln!(out, "Location: {}", output.display())?;

    if result.created_files.len() <= MAX_LISTED_FILES {
        writeln!(out)?;
        writeln!(out, "Files created:")?;
        for file in &result.created_files {
            let relative = file.strip_prefix(&output).unwrap_or(file);
            writeln!(out, "  └─ {}", relative.display())?;
        }
    } else {
        writeln!(out)?;
        writeln!(out, "Run 'tree {}' to see full structure.", output.display())?;
    }

    Ok(result)
}

/// Lists templates with their summaries.
pub fn list<W: Write>(
    store: &TemplateStore,
    out: &mut W,
    archived: bool,
    all: bool,
) -> Result<()> {
    if all {
        list_location(store, out, Location::Active)?;
        writeln!(out)?;
        list_location(store, out, Location::Archived)
    } else {
        list_location(store, out, Location::from_archived(archived))
    }
}

fn list_location<W: Write>(
    store: &TemplateStore,
    out: &mut W,
    location: Location,
) -> Result<()> {
    let label = match location {
        Location::Active => "Active",
        Location::Archived => "Archived",
    };
    let names = store.list(location)?;

    if names.is_empty() {
        writeln!(out, "No {} templates found.", label.to_lowercase())?;
        if location == Location::Active {
            writeln!(out, "Create one with: pilot create <name> --path <yaml-file>")?;
        }
        return Ok(());
    }

    let mut rows = Vec::with_capacity(names.len());
    for name in &names {
        let summary = store
            .read(name, location)?
            .and_then(|content| parse_and_validate(&content).ok())
            .map(|template| summarize(&template))
            .unwrap_or_else(|| {
                warn!("Template '{}' could not be parsed", name);
                TemplateSummary {
                    name: name.clone(),
                    description: "Unable to parse".to_string(),
                    version: "?".to_string(),
                }
            });
        rows.push((name.as_str(), summary));
    }

    let key_width = rows.iter().map(|(key, _)| key.len()).chain([4]).max().unwrap_or(4);
    let name_width = rows.iter().map(|(_, s)| s.name.len()).chain([4]).max().unwrap_or(4);
    let desc_width =
        rows.iter().map(|(_, s)| s.description.len()).chain([11]).max().unwrap_or(11);

    writeln!(out, "{label} Templates")?;
    writeln!(
        out,
        "{:<key_width$}  {:<name_width$}  {:<desc_width$}  VERSION",
        "KEY", "NAME", "DESCRIPTION"
    )?;
    for (key, summary) in rows {
        writeln!(
            out,
            "{:<key_width$}  {:<name_width$}  {:<desc_width$}  {}",
            key, summary.name, summary.description, summary.version
        )?;
    }
    Ok(())
}

/// Prints the raw YAML of a template.
pub fn source<W: Write>(
    store: &TemplateStore,
    out: &mut W,
    name: &str,
    archived: bool,
) -> Result<()> {
    let content = require(store, name, Location::from_archived(archived))?;
    write!(out, "{content}")?;
    if !content.ends_with('\n') {
        writeln!(out)?;
    }
    Ok(())
}

/// Opens a template in the editor, then re-validates it.
/// Validation problems after editing are reported but do not fail the command.
pub fn edit<W: Write>(
    store: &TemplateStore,
    settings: &Settings,
    out: &mut W,
    name: &str,
    editor: Option<&str>,
) -> Result<()> {
    let original = require(store, name, Location::Active)?;
    let path = store.template_path(name, Location::Active)?;
    let editor = editor.unwrap_or_else(|| settings.editor());

    writeln!(out, "Opening '{name}' in {editor}...")?;
    open_in_editor(editor, &path)?;

    let updated = fs::read_to_string(&path)?;
    if updated == original {
        writeln!(out, "No changes detected.")?;
        return Ok(());
    }

    match parse_and_validate(&updated) {
        Ok(_) => writeln!(out, "Template '{name}' updated and validated successfully!")?,
        Err(e @ (Error::ParseError(_) | Error::TemplateInvalid { .. })) => {
            warn!("Template '{}' is invalid after editing", name);
            writeln!(out, "Template has validation warnings: {e}")?;
            writeln!(out, "The file has been saved, but may not work correctly.")?;
        }
        Err(e) => return Err(e),
    }
    Ok(())
}

/// Copies a template to an external file.
pub fn export<W: Write>(
    store: &TemplateStore,
    out: &mut W,
    name: &str,
    output: &Path,
    force: bool,
) -> Result<()> {
    if !store.exists(name, Location::Active)? {
        return Err(not_found(name, Location::Active));
    }
    let output = absolute_path(output)?;
    if output.exists() && !force {
        return Err(Error::OutputFileExists { path: output.display().to_string() });
    }

    if !store.export(name, &output)? {
        return Err(not_found(name, Location::Active));
    }
    writeln!(out, "Template '{name}' exported successfully!")?;
    writeln!(out, "Saved to: {}", output.display())?;
    Ok(())
}

fn absolute_path(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

/// Copies a template under a new name.
pub fn duplicate<W: Write>(
    store: &TemplateStore,
    out: &mut W,
    source: &str,
    new_name: &str,
    force: bool,
) -> Result<()> {
    if !store.exists(source, Location::Active)? {
        return Err(not_found(source, Location::Active));
    }
    if store.exists(new_name, Location::Active)? && !force {
        return Err(Error::TemplateExists {
            name: new_name.to_string(),
            location: Location::Active.to_string(),
        });
    }

    store.duplicate(source, new_name)?;
    writeln!(out, "Template duplicated successfully!")?;
    writeln!(out, "  From: {source}")?;
    writeln!(out, "  To:   {new_name}")?;
    Ok(())
}

/// Deletes a template after confirmation (skipped with `force`).
pub fn delete<W: Write>(
    store: &TemplateStore,
    prompt: &dyn Prompter,
    out: &mut W,
    name: &str,
    force: bool,
    archived: bool,
) -> Result<()> {
    let location = Location::from_archived(archived);
    if !store.exists(name, location)? {
        return Err(not_found(name, location));
    }

    let confirmed = prompt.confirm(
        force,
        format!("Are you sure you want to delete '{name}'? This cannot be undone."),
    )?;
    if !confirmed {
        writeln!(out, "Deletion cancelled.")?;
        return Ok(());
    }

    store.delete(name, location)?;
    writeln!(out, "Template '{name}' deleted successfully.")?;
    Ok(())
}

/// Archives a template, or restores it from the archive.
/// Refuses when the destination already holds a template of the same name.
pub fn archive<W: Write>(
    store: &TemplateStore,
    out: &mut W,
    name: &str,
    restore: bool,
) -> Result<()> {
    let (from, to) = if restore {
        (Location::Archived, Location::Active)
    } else {
        (Location::Active, Location::Archived)
    };

    if !store.exists(name, from)? {
        return Err(not_found(name, from));
    }
    if store.exists(name, to)? {
        return Err(Error::TemplateExists { name: name.to_string(), location: to.to_string() });
    }

    if restore {
        store.restore(name)?;
        writeln!(out, "Template '{name}' restored from archive!")?;
    } else {
        store.archive(name)?;
        writeln!(out, "Template '{name}' archived successfully!")?;
        writeln!(out, "Restore with: pilot archive {name} --restore")?;
    }
    Ok(())
}

/// Reads or changes user settings.
pub fn config<W: Write>(
    store: &TemplateStore,
    settings: &Settings,
    out: &mut W,
    action: ConfigAction,
) -> Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let value = settings
                .get(&key)
                .map(str::to_string)
                .or_else(|| std::env::var(env_key(&key)).ok())
                .ok_or_else(|| Error::ConfigError(format!("unknown setting '{key}'")))?;
            writeln!(out, "{value}")?;
        }
        ConfigAction::Set { key, value } => {
            let mut user_config = store.read_config()?;
            user_config.insert(key.clone(), serde_json::Value::String(value.clone()));
            store.write_config(&user_config)?;
            writeln!(out, "Set {key} = {value}")?;
        }
        ConfigAction::Unset { key } => {
            let mut user_config = store.read_config()?;
            if user_config.remove(&key).is_some() {
                store.write_config(&user_config)?;
                writeln!(out, "Removed {key}")?;
            } else if defaults().contains_key(key.as_str()) {
                writeln!(out, "{key} is not set in the user config")?;
            } else {
                return Err(Error::ConfigError(format!("unknown setting '{key}'")));
            }
        }
        ConfigAction::List => {
            for (key, value) in settings.iter() {
                writeln!(out, "{key} = {value}")?;
            }
        }
    }
    Ok(())
}
