//! Template parsing and validation for Pilot.
//! Turns raw YAML text into a strongly-typed [`Template`], collecting every
//! schema defect in a single pass instead of stopping at the first one.

use std::fmt;
use std::path::{Component, Path};

use log::debug;
use serde_yaml::{Mapping, Value};

use crate::constants::MAX_DIRECTORY_DEPTH;
use crate::error::{Error, Result};
use crate::renderer::Variables;

pub const DEFAULT_DESCRIPTION: &str = "No description";
pub const DEFAULT_VERSION: &str = "1.0";

/// A validated project template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub name: String,
    pub description: Option<String>,
    pub version: Option<String>,
    /// Placeholder values used when rendering file contents
    pub variables: Variables,
    pub structure: Vec<StructureNode>,
}

/// One entry of a template's structure tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructureNode {
    File { name: String, content: String },
    Directory { name: String, children: Vec<StructureNode> },
}

impl StructureNode {
    /// Path segment this node occupies under its parent.
    pub fn name(&self) -> &str {
        match self {
            StructureNode::File { name, .. } | StructureNode::Directory { name, .. } => name,
        }
    }
}

/// Display-only view of a template with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSummary {
    pub name: String,
    pub description: String,
    pub version: String,
}

/// A single schema defect, located by its position in the document
/// (`structure[0].children[2]`). Root-level defects have an empty location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub location: String,
    pub message: String,
}

impl ValidationError {
    fn new(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.location.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.location, self.message)
        }
    }
}

/// Parses raw template text into its root mapping.
///
/// # Arguments
/// * `content` - YAML document text
///
/// # Returns
/// * `Result<Mapping>` - The decoded root mapping
///
/// # Errors
/// * `Error::ParseError` if the text is not well-formed YAML or the root is
///   not a mapping (a list, a scalar or an empty document), or if the
///   document nests deeper than the YAML decoder allows (more than
///   `MAX_DIRECTORY_DEPTH` directories)
pub fn parse(content: &str) -> Result<Mapping> {
    let value: Value = serde_yaml::from_str(content).map_err(|e| {
        let message = e.to_string();
        if message.contains("recursion limit exceeded") {
            Error::ParseError(format!(
                "{message} (structure may nest at most {MAX_DIRECTORY_DEPTH} directories)"
            ))
        } else {
            Error::ParseError(message)
        }
    })?;
    match value {
        Value::Mapping(mapping) => Ok(mapping),
        _ => Err(Error::ParseError("Template must be a YAML mapping".to_string())),
    }
}

/// Checks a decoded template against the schema.
///
/// Every node of the structure tree is visited; the returned list holds one
/// entry per defect, in document order. An empty list means the mapping is
/// a valid template.
pub fn validate(mapping: &Mapping) -> Vec<ValidationError> {
    let mut decoder = Decoder::default();
    decoder.template(mapping);
    decoder.errors
}

/// Parses and validates template text in one step.
///
/// # Arguments
/// * `content` - YAML document text
///
/// # Returns
/// * `Result<Template>` - The validated template
///
/// # Errors
/// * `Error::ParseError` if the text cannot be decoded to a mapping
/// * `Error::TemplateInvalid` carrying the complete ordered list of defects
pub fn parse_and_validate(content: &str) -> Result<Template> {
    let mapping = parse(content)?;
    let mut decoder = Decoder::default();
    let template = decoder.template(&mapping);

    if !decoder.errors.is_empty() {
        debug!("Template has {} validation error(s)", decoder.errors.len());
        return Err(Error::TemplateInvalid { errors: decoder.errors });
    }

    template.ok_or_else(|| Error::ParseError("Template could not be decoded".to_string()))
}

/// Returns name, description and version with the display defaults applied.
pub fn summarize(template: &Template) -> TemplateSummary {
    TemplateSummary {
        name: template.name.clone(),
        description: template
            .description
            .clone()
            .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
        version: template.version.clone().unwrap_or_else(|| DEFAULT_VERSION.to_string()),
    }
}

/// Renders a YAML scalar as text. Numbers and booleans use their canonical
/// YAML spelling; `None` means the value is not a scalar.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn is_single_segment(name: &str) -> bool {
    if name.contains(['/', '\\']) {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!((components.next(), components.next()), (Some(Component::Normal(_)), None))
}

/// Walks the decoded document, building the typed model and recording
/// defects as it goes.
#[derive(Default)]
struct Decoder {
    errors: Vec<ValidationError>,
}

impl Decoder {
    fn error(&mut self, location: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ValidationError::new(location, message));
    }

    fn template(&mut self, root: &Mapping) -> Option<Template> {
        let name = match root.get("name") {
            None => {
                self.error("", "Missing required field: 'name'");
                None
            }
            Some(value) => {
                let name = scalar_to_string(value);
                if name.is_none() {
                    self.error("", "'name' must be a string");
                }
                name
            }
        };

        let structure = match root.get("structure") {
            None => {
                self.error("", "Missing required field: 'structure'");
                None
            }
            Some(Value::Sequence(items)) => Some(self.nodes(items, "structure")),
            Some(_) => {
                self.error("", "'structure' must be a list");
                None
            }
        };

        let description = self.optional_text(root, "description");
        let version = self.optional_text(root, "version");
        let variables = self.variables(root);

        Some(Template {
            name: name?,
            description,
            version,
            variables,
            structure: structure?,
        })
    }

    fn optional_text(&mut self, root: &Mapping, field: &str) -> Option<String> {
        match root.get(field) {
            None | Some(Value::Null) => None,
            Some(value) => {
                let text = scalar_to_string(value);
                if text.is_none() {
                    self.error("", format!("'{field}' must be a string"));
                }
                text
            }
        }
    }

    fn variables(&mut self, root: &Mapping) -> Variables {
        let mut variables = Variables::new();
        let mapping = match root.get("variables") {
            None | Some(Value::Null) => return variables,
            Some(Value::Mapping(mapping)) => mapping,
            Some(_) => {
                self.error("", "'variables' must be a mapping");
                return variables;
            }
        };

        for (key, value) in mapping {
            let Some(key) = scalar_to_string(key) else {
                self.error("variables", "keys must be strings");
                continue;
            };
            let value = match value {
                Value::Null => Some(String::new()),
                other => scalar_to_string(other),
            };
            match value {
                Some(value) => {
                    variables.insert(key, value);
                }
                None => self.error(format!("variables.{key}"), "must be a scalar value"),
            }
        }
        variables
    }

    fn nodes(&mut self, items: &[Value], prefix: &str) -> Vec<StructureNode> {
        items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| self.node(item, &format!("{prefix}[{index}]")))
            .collect()
    }

    fn node(&mut self, item: &Value, location: &str) -> Option<StructureNode> {
        let Value::Mapping(item) = item else {
            self.error(location, "must be a mapping");
            return None;
        };

        let name = match item.get("name") {
            None => {
                self.error(location, "missing 'name' field");
                None
            }
            Some(value) => self.segment(value, location),
        };

        match item.get("type") {
            None => {
                self.error(location, "missing 'type' field");
                None
            }
            Some(Value::String(kind)) if kind == "file" => {
                let content = match item.get("content") {
                    None | Some(Value::Null) => Some(String::new()),
                    Some(value) => {
                        let content = scalar_to_string(value);
                        if content.is_none() {
                            self.error(location, "'content' must be a string");
                        }
                        content
                    }
                };
                Some(StructureNode::File { name: name?, content: content? })
            }
            Some(Value::String(kind)) if kind == "directory" => {
                let children = match item.get("children") {
                    None => Vec::new(),
                    Some(Value::Sequence(children)) => {
                        self.nodes(children, &format!("{location}.children"))
                    }
                    Some(_) => {
                        self.error(format!("{location}.children"), "must be a list");
                        Vec::new()
                    }
                };
                Some(StructureNode::Directory { name: name?, children })
            }
            Some(_) => {
                self.error(location, "'type' must be 'file' or 'directory'");
                None
            }
        }
    }

    fn segment(&mut self, value: &Value, location: &str) -> Option<String> {
        let Some(name) = scalar_to_string(value) else {
            self.error(location, "'name' must be a string");
            return None;
        };
        if name.is_empty() {
            self.error(location, "'name' must not be empty");
            return None;
        }
        if !is_single_segment(&name) {
            self.error(location, format!("'name' must be a single path segment, got '{name}'"));
            return None;
        }
        Some(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_segment() {
        assert!(is_single_segment("src"));
        assert!(is_single_segment("main.rs"));
        assert!(is_single_segment(".gitignore"));
        assert!(!is_single_segment(".."));
        assert!(!is_single_segment("."));
        assert!(!is_single_segment("a/b"));
        assert!(!is_single_segment("/etc"));
        assert!(!is_single_segment("a\\b"));
    }

    #[test]
    fn test_scalar_to_string() {
        assert_eq!(scalar_to_string(&Value::from("x")), Some("x".to_string()));
        assert_eq!(scalar_to_string(&Value::from(true)), Some("true".to_string()));
        assert_eq!(scalar_to_string(&Value::from(42)), Some("42".to_string()));
        assert_eq!(scalar_to_string(&Value::Sequence(vec![])), None);
    }

    #[test]
    fn test_validation_error_display() {
        assert_eq!(
            ValidationError::new("", "Missing required field: 'name'").to_string(),
            "Missing required field: 'name'"
        );
        assert_eq!(
            ValidationError::new("structure[1]", "missing 'type' field").to_string(),
            "structure[1]: missing 'type' field"
        );
    }
}
