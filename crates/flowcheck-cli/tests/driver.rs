use super::*;
use clap::Parser;
use flowcheck_ast::node::TypeAlias;
use flowcheck_ast::{Stmt, TypeAnnotation};
use flowcheck_common::Span;
use flowcheck_common::diagnostics::diagnostic_codes;
use std::path::PathBuf;
use tempfile::TempDir;

fn alias(name: &str, right: TypeAnnotation) -> Stmt {
    Stmt::TypeAlias(TypeAlias {
        id: name.to_string(),
        type_params: Vec::new(),
        right,
        recursive: false,
        span: Span::new(4, 20),
    })
}

fn write_program(dir: &Path, file_name: &str, body: Vec<Stmt>) -> PathBuf {
    let program = Program {
        file_name: file_name.to_string(),
        body,
    };
    let path = dir.join("program.json");
    std::fs::write(&path, serde_json::to_string(&program).unwrap()).unwrap();
    path
}

fn args_for(input: &Path, extra: &[&str]) -> CliArgs {
    let input = input.to_string_lossy().into_owned();
    let mut argv = vec!["flowcheck".to_string(), input];
    argv.extend(extra.iter().map(|arg| (*arg).to_string()));
    CliArgs::try_parse_from(argv).unwrap()
}

#[test]
fn test_compile_prints_javascript() {
    let dir = TempDir::new().unwrap();
    let input = write_program(dir.path(), "user.js", vec![alias("Name", TypeAnnotation::string())]);

    let result = compile(&args_for(&input, &[])).unwrap();
    assert!(!result.has_errors());
    assert_eq!(
        result.output.as_deref(),
        Some("import _t from \"tcomb\";\nconst Name = _t.String;\n")
    );
}

#[test]
fn test_config_beside_input_is_picked_up() {
    let dir = TempDir::new().unwrap();
    let input = write_program(dir.path(), "user.js", vec![alias("Name", TypeAnnotation::string())]);
    std::fs::write(
        dir.path().join("flowcheck.json"),
        r#"{ "transform": { "runtimeLibrary": "tcomb-lite" } }"#,
    )
    .unwrap();

    let result = compile(&args_for(&input, &[])).unwrap();
    assert_eq!(
        result.output.as_deref(),
        Some("import _t from \"tcomb-lite\";\nconst Name = _t.String;\n")
    );
}

#[test]
fn test_explicit_config_and_flag_override() {
    let dir = TempDir::new().unwrap();
    let input = write_program(dir.path(), "user.js", vec![alias("Name", TypeAnnotation::string())]);
    let config = dir.path().join("custom.json");
    std::fs::write(&config, r#"{ "transform": { "runtimeLibrary": "from-config" } }"#).unwrap();
    let config = config.to_string_lossy().into_owned();

    let result = compile(&args_for(&input, &["--config", &config, "--runtime-library", "from-flag"]))
        .unwrap();
    assert!(result.output.unwrap().starts_with("import _t from \"from-flag\";"));
}

#[test]
fn test_emit_ast_round_trips() {
    let dir = TempDir::new().unwrap();
    let input = write_program(dir.path(), "user.js", vec![alias("Name", TypeAnnotation::string())]);

    let result = compile(&args_for(&input, &["--emit-ast"])).unwrap();
    let output = result.output.unwrap();
    let program: Program = serde_json::from_str(&output).unwrap();
    assert_eq!(program.file_name, "user.js");
    assert_eq!(program.body.len(), 2);
    assert!(matches!(program.body[0], Stmt::Import(_)));
}

#[test]
fn test_diagnostics_name_the_input_when_file_name_is_missing() {
    let dir = TempDir::new().unwrap();
    let input = write_program(dir.path(), "", vec![alias("$Reify", TypeAnnotation::string())]);

    let result = compile(&args_for(&input, &[])).unwrap();
    assert!(result.has_errors());
    assert!(result.output.is_none());
    let diagnostic = &result.diagnostics[0];
    assert_eq!(diagnostic.code, diagnostic_codes::RESERVED_TYPE_NAME);
    assert_eq!(diagnostic.file, input.display().to_string());
}

#[test]
fn test_unreadable_input_is_an_error() {
    let dir = TempDir::new().unwrap();
    let err = read_program(&dir.path().join("missing.json")).unwrap_err();
    assert!(format!("{err:#}").contains("failed to read program"));
}

#[test]
fn test_malformed_program_is_an_error() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("program.json");
    std::fs::write(&input, "{ \"body\": 3 }").unwrap();
    let err = read_program(&input).unwrap_err();
    assert!(format!("{err:#}").contains("failed to parse program JSON"));
}
