//! Project generation: materializes a validated template on disk.
use log::debug;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::{
    error::{Error, Result},
    renderer::{merge_variables, ContentRenderer, Variables},
    template::{StructureNode, Template},
};

/// Record of everything a generation created, in traversal order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationResult {
    pub created_files: Vec<PathBuf>,
    /// The output root is always the first entry.
    pub created_directories: Vec<PathBuf>,
}

fn absolute(path: &Path) -> io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

/// Checks that the output directory is safe to generate into.
///
/// # Arguments
/// * `output_dir` - Target directory path for generated output
/// * `force` - Whether to allow a non-empty existing directory
///
/// # Returns
/// * `Result<PathBuf>` - Absolute output directory path
///
/// # Errors
/// * `Error::OutputDirectoryNotEmpty` if the directory has entries and force is false
pub fn ensure_output_dir<P: AsRef<Path>>(output_dir: P, force: bool) -> Result<PathBuf> {
    let output_dir = absolute(output_dir.as_ref())?;
    if output_dir.is_dir() && !force && fs::read_dir(&output_dir)?.next().is_some() {
        return Err(Error::OutputDirectoryNotEmpty {
            output_dir: output_dir.display().to_string(),
        });
    }
    Ok(output_dir)
}

/// Walks a template's structure tree and creates it under an output root.
pub struct Generator<'a> {
    renderer: &'a dyn ContentRenderer,
    variables: Variables,
    result: GenerationResult,
}

impl<'a> Generator<'a> {
    /// Creates a generator whose effective variables are the template's own
    /// with `overrides` applied on top.
    pub fn new(
        renderer: &'a dyn ContentRenderer,
        template: &Template,
        overrides: Option<&Variables>,
    ) -> Self {
        Self {
            renderer,
            variables: merge_variables(&template.variables, overrides),
            result: GenerationResult::default(),
        }
    }

    /// Generates the project structure.
    ///
    /// # Arguments
    /// * `structure` - Nodes to create directly under the output root
    /// * `output_root` - Directory to generate into; created with its parents if absent
    ///
    /// # Returns
    /// * `Result<GenerationResult>` - Paths created, in pre-order traversal order
    ///
    /// # Errors
    /// * `Error::GenerationFailed` on the first filesystem failure, carrying the
    ///   partial result. Files already written are left in place.
    pub fn generate(
        mut self,
        structure: &[StructureNode],
        output_root: &Path,
    ) -> Result<GenerationResult> {
        match self.generate_all(structure, output_root) {
            Ok(()) => Ok(self.result),
            Err(e) => Err(Error::GenerationFailed {
                reason: e.to_string(),
                partial: Box::new(self.result),
            }),
        }
    }

    fn generate_all(&mut self, structure: &[StructureNode], output_root: &Path) -> io::Result<()> {
        let output_root = absolute(output_root)?;
        self.create_directory(&output_root)?;
        self.generate_nodes(structure, &output_root)
    }

    fn generate_nodes(&mut self, nodes: &[StructureNode], parent: &Path) -> io::Result<()> {
        for node in nodes {
            let path = parent.join(node.name());
            match node {
                StructureNode::Directory { children, .. } => {
                    self.create_directory(&path)?;
                    self.generate_nodes(children, &path)?;
                }
                StructureNode::File { content, .. } => {
                    let content = self.renderer.render(content, &self.variables);
                    self.create_file(&path, &content)?;
                }
            }
        }
        Ok(())
    }

    fn create_directory(&mut self, path: &Path) -> io::Result<()> {
        debug!("Creating directory: {}", path.display());
        fs::create_dir_all(path).map_err(|e| with_path(e, path))?;
        self.result.created_directories.push(path.to_path_buf());
        Ok(())
    }

    fn create_file(&mut self, path: &Path, content: &str) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| with_path(e, parent))?;
        }
        debug!("Writing file: {}", path.display());
        fs::write(path, content).map_err(|e| with_path(e, path))?;
        self.result.created_files.push(path.to_path_buf());
        Ok(())
    }
}

fn with_path(err: io::Error, path: &Path) -> io::Error {
    io::Error::new(err.kind(), format!("{}: {err}", path.display()))
}

/// Generates `template` under `output_root`.
///
/// Existing directories are reused and existing files are overwritten; the
/// emptiness policy for the output root is left to [`ensure_output_dir`].
pub fn generate(
    renderer: &dyn ContentRenderer,
    template: &Template,
    output_root: &Path,
    overrides: Option<&Variables>,
) -> Result<GenerationResult> {
    Generator::new(renderer, template, overrides).generate(&template.structure, output_root)
}
