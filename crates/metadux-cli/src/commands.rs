//! Command execution.
//!
//! Each command builds a [`MetaStore`], drives it, and returns the text to
//! print. Nothing here writes to stdout directly.

use std::path::Path;

use serde_json::Value;
use tracing::{debug, info};

use metadux_core::path::{self, deep_keys};
use metadux_core::{MetaStore, MetaduxConfig};
use metadux_types::{Action, Meta, add_meta};

use crate::cli::{Assignment, Command};
use crate::error::CliError;

/// Run `command` and return its output.
pub fn execute(command: &Command, config: &MetaduxConfig) -> Result<String, CliError> {
    match command {
        Command::Replay { actions, state } => replay(actions, state.as_deref(), config),
        Command::Get {
            state,
            path,
            default,
        } => get(state, path, default.as_ref()),
        Command::Set { state, assignments } => set(state.as_deref(), assignments, config),
        Command::Keys { file } => keys(file),
    }
}

fn replay(
    actions_file: &Path,
    state_file: Option<&Path>,
    config: &MetaduxConfig,
) -> Result<String, CliError> {
    let actions: Vec<Action> = serde_json::from_str(&read(actions_file)?).map_err(|source| {
        CliError::Json {
            path: actions_file.to_path_buf(),
            source,
        }
    })?;
    let mut store = seeded_store(state_file, config)?;

    let mut changed = 0_usize;
    for (index, action) in actions.iter().enumerate() {
        let did_change = store.dispatch(action);
        debug!(index, kind = %action.kind, did_change, "replayed action");
        if did_change {
            changed = changed.saturating_add(1);
        }
    }
    info!(dispatched = actions.len(), changed, "replay finished");

    render(&Value::Object(Meta::clone(&store.meta())))
}

fn get(state_file: &Path, at: &str, default: Option<&Value>) -> Result<String, CliError> {
    let store = MetaStore::with_meta(read_object(state_file)?);
    let value = store
        .get_meta_value(at, default)
        .ok_or_else(|| CliError::NotFound(at.to_owned()))?;
    render(&value)
}

fn set(
    state_file: Option<&Path>,
    assignments: &[Assignment],
    config: &MetaduxConfig,
) -> Result<String, CliError> {
    let mut store = seeded_store(state_file, config)?;
    let current = store.meta();

    // Each touched top-level entry starts from its current value so index
    // segments land in existing arrays instead of creating objects.
    let mut fragment = Meta::new();
    for assignment in assignments {
        if let Some(first) = assignment.path.segments().first() {
            if let Some(existing) = current.get(first) {
                fragment
                    .entry(first.clone())
                    .or_insert_with(|| existing.clone());
            }
        }
        path::set(&mut fragment, &assignment.path, assignment.value.clone());
    }

    debug!(assignments = assignments.len(), "merging assignments");
    store.dispatch(&add_meta(fragment));
    render(&Value::Object(Meta::clone(&store.meta())))
}

fn keys(file: &Path) -> Result<String, CliError> {
    let tree = read_object(file)?;
    let lines: Vec<String> = deep_keys(&tree).map(|leaf| leaf.to_string()).collect();
    Ok(lines.join("\n"))
}

fn seeded_store(state_file: Option<&Path>, config: &MetaduxConfig) -> Result<MetaStore, CliError> {
    match state_file {
        Some(file) => Ok(MetaStore::with_meta(read_object(file)?)),
        None => Ok(MetaStore::from_config(&config.store)),
    }
}

fn read(file: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(file).map_err(|source| CliError::Read {
        path: file.to_path_buf(),
        source,
    })
}

fn read_object(file: &Path) -> Result<Meta, CliError> {
    let value: Value = serde_json::from_str(&read(file)?).map_err(|source| CliError::Json {
        path: file.to_path_buf(),
        source,
    })?;
    match value {
        Value::Object(meta) => Ok(meta),
        _ => Err(CliError::NotAnObject {
            path: file.to_path_buf(),
        }),
    }
}

fn render(value: &Value) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::io::Write;
    use std::path::PathBuf;

    use serde_json::json;
    use tempfile::NamedTempFile;

    use metadux_core::path::MetaPath;

    use super::*;

    fn json_file(value: &Value) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{value}").unwrap();
        file
    }

    fn parse(output: &str) -> Value {
        serde_json::from_str(output).unwrap()
    }

    #[test]
    fn replay_applies_actions_in_order() {
        let state = json_file(&json!({"some": {"nested": {"meta": "data"}}, "simple": 4}));
        let actions = json_file(&json!([
            {"type": "ADD_META", "payload": {"meta": {"simple": 8}}},
            {"type": "REMOVE_META", "payload": {"remove": "some.nested"}},
            {"type": "OTHER"},
        ]));
        let command = Command::Replay {
            actions: actions.path().to_path_buf(),
            state: Some(state.path().to_path_buf()),
        };
        let output = execute(&command, &MetaduxConfig::default()).unwrap();
        assert_eq!(parse(&output), json!({"some": {}, "simple": 8}));
    }

    #[test]
    fn replay_without_state_uses_config_seed() {
        let actions = json_file(&json!([{"type": "ADD_META", "payload": {"meta": {"b": 2}}}]));
        let mut config = MetaduxConfig::default();
        config.store.initial_meta.insert("a".to_owned(), json!(1));
        let command = Command::Replay {
            actions: actions.path().to_path_buf(),
            state: None,
        };
        let output = execute(&command, &config).unwrap();
        assert_eq!(parse(&output), json!({"a": 1, "b": 2}));
    }

    #[test]
    fn get_reads_path_or_default() {
        let state = json_file(&json!({"other": ["a", "b", {"key": "value"}]}));
        let found = Command::Get {
            state: state.path().to_path_buf(),
            path: "other.2.key".to_owned(),
            default: None,
        };
        assert_eq!(execute(&found, &MetaduxConfig::default()).unwrap(), "\"value\"");

        let defaulted = Command::Get {
            state: state.path().to_path_buf(),
            path: "missing".to_owned(),
            default: Some(json!("default value")),
        };
        assert_eq!(
            execute(&defaulted, &MetaduxConfig::default()).unwrap(),
            "\"default value\""
        );

        let missing = Command::Get {
            state: state.path().to_path_buf(),
            path: "missing".to_owned(),
            default: None,
        };
        assert!(matches!(
            execute(&missing, &MetaduxConfig::default()),
            Err(CliError::NotFound(path)) if path == "missing"
        ));
    }

    #[test]
    fn set_merges_assignments() {
        let state = json_file(&json!({"user": {"name": "ada", "id": 1}}));
        let command = Command::Set {
            state: Some(state.path().to_path_buf()),
            assignments: vec![
                Assignment {
                    path: MetaPath::parse("user.name"),
                    value: json!("grace"),
                },
                Assignment {
                    path: MetaPath::parse("layout.columns"),
                    value: json!([1, 2]),
                },
            ],
        };
        let output = execute(&command, &MetaduxConfig::default()).unwrap();
        assert_eq!(
            parse(&output),
            json!({"user": {"name": "grace", "id": 1}, "layout": {"columns": [1, 2]}})
        );
    }

    #[test]
    fn set_writes_into_existing_arrays() {
        let state = json_file(&json!({"arr": [1, 2, 3], "rows": [{"id": 1}, {"id": 2}]}));
        let command = Command::Set {
            state: Some(state.path().to_path_buf()),
            assignments: vec![
                Assignment {
                    path: MetaPath::parse("arr.1"),
                    value: json!(9),
                },
                Assignment {
                    path: MetaPath::parse("arr.4"),
                    value: json!("tail"),
                },
                Assignment {
                    path: MetaPath::parse("rows.0.name"),
                    value: json!("first"),
                },
            ],
        };
        let output = execute(&command, &MetaduxConfig::default()).unwrap();
        assert_eq!(
            parse(&output),
            json!({
                "arr": [1, 9, 3, null, "tail"],
                "rows": [{"id": 1, "name": "first"}, {"id": 2}],
            })
        );
    }

    #[test]
    fn keys_lists_leaf_paths() {
        let tree = json_file(&json!({"a": {"b": true, "c": [1]}, "d": null}));
        let command = Command::Keys {
            file: tree.path().to_path_buf(),
        };
        assert_eq!(
            execute(&command, &MetaduxConfig::default()).unwrap(),
            "a.b\na.c.0\nd"
        );
    }

    #[test]
    fn non_object_state_is_rejected() {
        let state = json_file(&json!([1, 2]));
        let command = Command::Keys {
            file: state.path().to_path_buf(),
        };
        assert!(matches!(
            execute(&command, &MetaduxConfig::default()),
            Err(CliError::NotAnObject { .. })
        ));
    }

    #[test]
    fn missing_file_is_read_error() {
        let command = Command::Keys {
            file: PathBuf::from("/nonexistent/metadux.json"),
        };
        assert!(matches!(
            execute(&command, &MetaduxConfig::default()),
            Err(CliError::Read { .. })
        ));
    }
}
