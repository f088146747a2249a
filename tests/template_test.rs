use pilot::constants::MAX_DIRECTORY_DEPTH;
use pilot::error::Error;
use pilot::template::{
    parse, parse_and_validate, summarize, validate, StructureNode, ValidationError,
};

fn messages(errors: &[ValidationError]) -> Vec<String> {
    errors.iter().map(ToString::to_string).collect()
}

#[test]
fn test_parse_valid_template() {
    let content = r##"
name: "test-project"
description: "A test project"
version: "1.0"
variables:
  author: Ada
structure:
  - name: "src"
    type: "directory"
    children:
      - name: "main.py"
        type: "file"
        content: |
          print("Hello, World!")
  - name: "README.md"
    type: "file"
    content: "# Test Project"
"##;
    let template = parse_and_validate(content).unwrap();

    assert_eq!(template.name, "test-project");
    assert_eq!(template.description.as_deref(), Some("A test project"));
    assert_eq!(template.variables.get("author").map(String::as_str), Some("Ada"));
    assert_eq!(
        template.structure,
        vec![
            StructureNode::Directory {
                name: "src".to_string(),
                children: vec![StructureNode::File {
                    name: "main.py".to_string(),
                    content: "print(\"Hello, World!\")\n".to_string(),
                }],
            },
            StructureNode::File {
                name: "README.md".to_string(),
                content: "# Test Project".to_string(),
            },
        ]
    );
}

#[test]
fn test_parse_invalid_yaml() {
    let result = parse_and_validate("name: [unclosed");
    assert!(matches!(result, Err(Error::ParseError(_))));
}

#[test]
fn test_non_mapping_root_rejected() {
    assert!(matches!(parse("- a\n- b\n"), Err(Error::ParseError(_))));
    assert!(matches!(parse("just a string"), Err(Error::ParseError(_))));
    assert!(matches!(parse(""), Err(Error::ParseError(_))));
}

#[test]
fn test_empty_mapping_yields_two_errors() {
    let errors = validate(&parse("{}").unwrap());
    assert_eq!(
        messages(&errors),
        vec!["Missing required field: 'name'", "Missing required field: 'structure'"]
    );
}

#[test]
fn test_structure_must_be_list() {
    let errors = validate(&parse("name: t\nstructure:\n  src: {}\n").unwrap());
    assert_eq!(messages(&errors), vec!["'structure' must be a list"]);
}

#[test]
fn test_node_errors_are_separate_and_located() {
    let content = r#"
name: t
structure:
  - content: "no name, no type"
  - name: ok.txt
    type: file
  - name: lib
    type: directory
    children:
      - name: x
        type: symlink
      - "not a mapping"
      - name: deep
        type: directory
        children: "nope"
"#;
    let errors = validate(&parse(content).unwrap());
    assert_eq!(
        messages(&errors),
        vec![
            "structure[0]: missing 'name' field",
            "structure[0]: missing 'type' field",
            "structure[2].children[0]: 'type' must be 'file' or 'directory'",
            "structure[2].children[1]: must be a mapping",
            "structure[2].children[2].children: must be a list",
        ]
    );

    match parse_and_validate(content) {
        Err(Error::TemplateInvalid { errors }) => assert_eq!(errors.len(), 5),
        other => panic!("Expected TemplateInvalid, got {other:?}"),
    }
}

#[test]
fn test_invalid_template_display_lists_every_error() {
    let err = parse_and_validate("{}").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Template validation failed:\n  \
         - Missing required field: 'name'\n  \
         - Missing required field: 'structure'"
    );
}

#[test]
fn test_names_must_be_single_segments() {
    let content = r#"
name: t
structure:
  - name: "../escape"
    type: file
  - name: "a/b"
    type: directory
  - name: ""
    type: file
  - name: [1, 2]
    type: file
"#;
    let errors = validate(&parse(content).unwrap());
    assert_eq!(errors.len(), 4);
    assert_eq!(errors[0].location, "structure[0]");
    assert!(errors[0].message.contains("single path segment"));
    assert_eq!(errors[1].location, "structure[1]");
    assert_eq!(errors[2].message, "'name' must not be empty");
    assert_eq!(errors[3].message, "'name' must be a string");
}

#[test]
fn test_scalars_stringified() {
    let content = r#"
name: t
version: 2.5
variables:
  port: 8080
  debug: true
  empty:
structure:
  - name: 2024
    type: file
"#;
    let template = parse_and_validate(content).unwrap();
    assert_eq!(template.version.as_deref(), Some("2.5"));
    assert_eq!(template.variables.get("port").map(String::as_str), Some("8080"));
    assert_eq!(template.variables.get("debug").map(String::as_str), Some("true"));
    assert_eq!(template.variables.get("empty").map(String::as_str), Some(""));
    assert_eq!(template.structure[0].name(), "2024");
}

#[test]
fn test_nested_variable_value_rejected() {
    let content = "name: t\nvariables:\n  list: [1, 2]\nstructure: []\n";
    let errors = validate(&parse(content).unwrap());
    assert_eq!(messages(&errors), vec!["variables.list: must be a scalar value"]);
}

#[test]
fn test_defaults_for_optional_node_fields() {
    let content = r#"
name: t
structure:
  - name: empty.txt
    type: file
  - name: empty_dir
    type: directory
"#;
    let template = parse_and_validate(content).unwrap();
    assert_eq!(
        template.structure,
        vec![
            StructureNode::File { name: "empty.txt".to_string(), content: String::new() },
            StructureNode::Directory { name: "empty_dir".to_string(), children: vec![] },
        ]
    );
    assert!(template.variables.is_empty());
}

#[test]
fn test_parse_is_deterministic() {
    let content = "name: t\nstructure:\n  - name: a\n    type: file\n    content: x\n";
    assert_eq!(parse_and_validate(content).unwrap(), parse_and_validate(content).unwrap());

    let bad = "name: t\nstructure:\n  - type: file\n";
    let first = validate(&parse(bad).unwrap());
    let second = validate(&parse(bad).unwrap());
    assert_eq!(first, second);
}

#[test]
fn test_summarize_defaults() {
    let template = parse_and_validate("name: bare\nstructure: []\n").unwrap();
    let summary = summarize(&template);
    assert_eq!(summary.name, "bare");
    assert_eq!(summary.description, "No description");
    assert_eq!(summary.version, "1.0");
}

/// Template with `depth` nested directories and one file in the innermost one.
fn nested_template(depth: usize) -> String {
    let mut yaml = String::from("name: deep\nstructure:\n");
    for level in 0..depth {
        let indent = "    ".repeat(level);
        yaml.push_str(&format!(
            "{indent}  - name: d{level}\n{indent}    type: directory\n{indent}    children:\n"
        ));
    }
    let indent = "    ".repeat(depth);
    yaml.push_str(&format!("{indent}  - name: leaf.txt\n{indent}    type: file\n"));
    yaml
}

fn depth_of(nodes: &[StructureNode]) -> usize {
    nodes
        .iter()
        .map(|node| match node {
            StructureNode::Directory { children, .. } => 1 + depth_of(children),
            StructureNode::File { .. } => 0,
        })
        .max()
        .unwrap_or(0)
}

#[test]
fn test_deepest_supported_nesting() {
    let template = parse_and_validate(&nested_template(MAX_DIRECTORY_DEPTH)).unwrap();
    assert_eq!(depth_of(&template.structure), MAX_DIRECTORY_DEPTH);
}

#[test]
fn test_nesting_beyond_limit_is_a_clear_parse_error() {
    match parse_and_validate(&nested_template(MAX_DIRECTORY_DEPTH + 1)) {
        Err(Error::ParseError(msg)) => {
            assert!(msg.contains("recursion limit exceeded"));
            assert!(msg.contains("at most 62 directories"));
        }
        other => panic!("Expected ParseError, got {other:?}"),
    }
}
