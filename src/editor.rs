use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;

use log::debug;

use crate::error::{Error, Result};

/// Splits an editor setting such as `code --wait` into program and arguments.
pub fn editor_command(editor: &str) -> Result<(String, Vec<String>)> {
    let mut parts = editor.split_whitespace().map(str::to_string);
    let program =
        parts.next().ok_or_else(|| Error::EditorError("no editor configured".to_string()))?;
    Ok((program, parts.collect()))
}

/// Opens `path` in `editor` and waits for it to exit.
///
/// # Errors
/// * `Error::EditorError` if the editor cannot be started or exits unsuccessfully
pub fn open_in_editor<P: AsRef<Path>>(editor: &str, path: P) -> Result<()> {
    let path = path.as_ref();
    let (program, args) = editor_command(editor)?;
    debug!("Running {} {:?} {}", program, args, path.display());

    let status = Command::new(&program).args(&args).arg(path).status().map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            Error::EditorError(format!("editor '{program}' not found"))
        } else {
            Error::EditorError(format!("failed to start '{program}': {e}"))
        }
    })?;

    if !status.success() {
        return Err(Error::EditorError(format!("'{program}' exited with {status}")));
    }
    Ok(())
}
