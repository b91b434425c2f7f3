use super::*;
use clap::Parser;
use tempfile::TempDir;

fn args(extra: &[&str]) -> CliArgs {
    let mut argv = vec!["flowcheck", "program.json"];
    argv.extend_from_slice(extra);
    CliArgs::try_parse_from(argv).unwrap()
}

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_parse_config_with_comments() {
    let config = parse_config(
        r#"{
            // line comment
            "transform": {
                /* block */ "warnOnFailure": true,
                "runtimeLibrary": "tcomb//lite"
            }
        }"#,
    )
    .unwrap();
    let transform = config.transform.unwrap();
    assert_eq!(transform.warn_on_failure, Some(true));
    assert_eq!(transform.runtime_library.as_deref(), Some("tcomb//lite"));
    assert_eq!(transform.skip_asserts, None);
}

#[test]
fn test_bool_options_accept_strings() {
    let config = parse_config(r#"{ "transform": { "skipAsserts": "yes", "skipHelpers": "false" } }"#)
        .unwrap();
    let transform = config.transform.unwrap();
    assert_eq!(transform.skip_asserts, Some(true));
    assert_eq!(transform.skip_helpers, Some(false));
}

#[test]
fn test_invalid_bool_string_is_rejected() {
    let err = parse_config(r#"{ "transform": { "skipAsserts": "maybe" } }"#).unwrap_err();
    assert!(format!("{err:#}").contains("invalid boolean value: 'maybe'"));
}

#[test]
fn test_globals_accept_names_and_maps() {
    let config = parse_config(
        r#"{ "transform": { "globals": ["Buffer", { "HTMLElement": true, "Event": false }] } }"#,
    )
    .unwrap();
    assert_eq!(
        config.transform.unwrap().globals,
        Some(vec!["Buffer".to_string(), "HTMLElement".to_string()])
    );
}

#[test]
fn test_extends_merges_child_over_base() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "base.json",
        r#"{ "transform": { "warnOnFailure": true, "globals": ["Buffer"], "runtimeLibrary": "base-lib" } }"#,
    );
    let child = write(
        dir.path(),
        "flowcheck.json",
        r#"{ "extends": "./base", "transform": { "runtimeLibrary": "child-lib" } }"#,
    );

    let config = load_config(&child).unwrap();
    assert!(config.extends.is_none());
    let transform = config.transform.unwrap();
    assert_eq!(transform.warn_on_failure, Some(true));
    assert_eq!(transform.globals, Some(vec!["Buffer".to_string()]));
    assert_eq!(transform.runtime_library.as_deref(), Some("child-lib"));
}

#[test]
fn test_extends_cycle_is_an_error() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.json", r#"{ "extends": "./b.json" }"#);
    let b = write(dir.path(), "b.json", r#"{ "extends": "./a.json" }"#);

    let err = load_config(&b).unwrap_err();
    assert!(format!("{err:#}").contains("extends cycle detected"));
}

#[test]
fn test_missing_config_reports_path() {
    let dir = TempDir::new().unwrap();
    let err = load_config(&dir.path().join("nope.json")).unwrap_err();
    assert!(format!("{err:#}").contains("failed to read config"));
}

#[test]
fn test_discover_config_next_to_input() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("program.json");
    assert_eq!(discover_config(&input), None);

    let config = write(dir.path(), CONFIG_FILE_NAME, "{}");
    assert_eq!(discover_config(&input), Some(config));
    assert_eq!(discover_config(Path::new("-")), None);
}

#[test]
fn test_defaults_without_config() {
    let options = resolve_transform_options(None, &args(&[]));
    assert_eq!(options, TransformOptions::default());
}

#[test]
fn test_flags_override_config() {
    let config = parse_config(
        r#"{ "transform": { "skipAsserts": false, "globals": ["Buffer"], "runtimeLibrary": "from-config" } }"#,
    )
    .unwrap();
    let options = resolve_transform_options(
        Some(&config),
        &args(&[
            "--skip-asserts",
            "-g",
            "Buffer",
            "-g",
            "Node",
            "--runtime-library",
            "from-flag",
        ]),
    );
    assert!(options.skip_asserts);
    assert!(!options.skip_helpers);
    assert_eq!(options.globals, vec!["Buffer", "Node"]);
    assert_eq!(options.runtime_library, "from-flag");
}

#[test]
fn test_config_values_apply_without_flags() {
    let config = parse_config(
        r#"{ "transform": { "skipHelpers": true, "ambientTypes": ["Window"] } }"#,
    )
    .unwrap();
    let options = resolve_transform_options(Some(&config), &args(&[]));
    assert!(options.skip_helpers);
    assert_eq!(options.ambient_types, vec!["Window"]);
    assert_eq!(options.runtime_library, "tcomb");
}
