//! Placeholder substitution for generated file contents.
//! Only literal `{{ key }}` and `{{key}}` tokens are recognised; there is no
//! expression language, filters or control flow.
use indexmap::IndexMap;

/// Variable name to textual value. Order is kept so substitution is deterministic.
pub type Variables = IndexMap<String, String>;

/// Trait for file content renderers.
pub trait ContentRenderer {
    /// Renders file content with the given variables.
    ///
    /// # Arguments
    /// * `content` - Raw file content from the template
    /// * `variables` - Effective variables for this generation
    ///
    /// # Returns
    /// * `String` - Content with placeholders replaced
    fn render(&self, content: &str, variables: &Variables) -> String;
}

/// Replaces `{{ key }}` and `{{key}}` with the value of `key`.
///
/// Each key is replaced independently, in variable order, with no
/// re-expansion of inserted values beyond that. Placeholders whose key is
/// not defined are left untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaceholderRenderer;

impl PlaceholderRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl ContentRenderer for PlaceholderRenderer {
    fn render(&self, content: &str, variables: &Variables) -> String {
        let mut rendered = content.to_string();
        for (key, value) in variables {
            if !rendered.contains("{{") {
                break;
            }
            rendered = rendered
                .replace(&format!("{{{{ {key} }}}}"), value)
                .replace(&format!("{{{{{key}}}}}"), value);
        }
        rendered
    }
}

/// Applies `overrides` on top of `base`; an override wins on key collision.
pub fn merge_variables(base: &Variables, overrides: Option<&Variables>) -> Variables {
    let mut merged = base.clone();
    if let Some(overrides) = overrides {
        for (key, value) in overrides {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Variables {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_both_spacing_forms() {
        let renderer = PlaceholderRenderer::new();
        let variables = vars(&[("name", "World")]);
        assert_eq!(renderer.render("Hello {{ name }}", &variables), "Hello World");
        assert_eq!(renderer.render("Hello {{name}}", &variables), "Hello World");
        assert_eq!(renderer.render("{{name}} and {{ name }}", &variables), "World and World");
    }

    #[test]
    fn test_other_whitespace_left_alone() {
        let renderer = PlaceholderRenderer::new();
        let variables = vars(&[("name", "World")]);
        assert_eq!(renderer.render("{{  name  }}", &variables), "{{  name  }}");
        assert_eq!(renderer.render("{{ name}}", &variables), "{{ name}}");
        assert_eq!(renderer.render("{{\tname\t}}", &variables), "{{\tname\t}}");
    }

    #[test]
    fn test_missing_key_is_verbatim() {
        let renderer = PlaceholderRenderer::new();
        let variables = vars(&[("name", "World")]);
        assert_eq!(renderer.render("{{ missing }}", &variables), "{{ missing }}");
        assert_eq!(renderer.render("plain text", &Variables::new()), "plain text");
    }

    #[test]
    fn test_merge_override_wins() {
        let base = vars(&[("a", "1"), ("b", "2")]);
        let overrides = vars(&[("b", "3"), ("c", "4")]);
        let merged = merge_variables(&base, Some(&overrides));
        assert_eq!(merged, vars(&[("a", "1"), ("b", "3"), ("c", "4")]));
        assert_eq!(base.get("b").map(String::as_str), Some("2"));
        assert_eq!(merge_variables(&base, None), base);
    }
}
