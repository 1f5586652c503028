use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use todo_store::Config;

// Mutex to ensure environment variable tests don't run in parallel
static ENV_MUTEX: Mutex<()> = Mutex::new(());

const ENV_VARS: [&str; 4] = [
    "TODO_STORE_CONFIG",
    "TODO_STORE_DATA_FILE",
    "TODO_STORE_EXPORT_DIR",
    "TODO_STORE_LOG_LEVEL",
];

fn clear_env() {
    for var in ENV_VARS {
        env::remove_var(var);
    }
}

#[test]
fn test_load_config_from_yaml() {
    let yaml_content = r#"
data_file: "/var/lib/todo/todos.json"
export_dir: "/tmp/exports"
log_level: "debug"
"#;

    let filename = "test_todo_yaml_1.yaml";
    fs::write(filename, yaml_content).unwrap();

    let config = Config::from_file("test_todo_yaml_1").unwrap();

    assert_eq!(config.data_file, PathBuf::from("/var/lib/todo/todos.json"));
    assert_eq!(config.export_dir, PathBuf::from("/tmp/exports"));
    assert_eq!(config.log_level, "debug");

    fs::remove_file(filename).unwrap();
}

#[test]
fn test_load_partial_config_from_toml() {
    let toml_content = r#"
data_file = "data/todos.json"
"#;

    let filename = "test_todo_toml_2.toml";
    fs::write(filename, toml_content).unwrap();

    let config = Config::from_file("test_todo_toml_2").unwrap();

    assert_eq!(config.data_file, PathBuf::from("data/todos.json"));
    assert_eq!(config.export_dir, PathBuf::from("."));
    assert_eq!(config.log_level, "info");

    fs::remove_file(filename).unwrap();
}

#[test]
fn test_config_validation_fails_for_bad_level() {
    let yaml_content = r#"
data_file: "todos.json"
log_level: "loud"
"#;

    let filename = "test_todo_invalid_3.yaml";
    fs::write(filename, yaml_content).unwrap();

    let result = Config::from_file("test_todo_invalid_3");
    assert!(result.is_err());

    fs::remove_file(filename).unwrap();
}

#[test]
fn test_missing_config_file() {
    let result = Config::from_file("no_such_todo_config_file");
    assert!(result.is_err());
}

#[test]
fn test_load_config_from_env() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();

    env::set_var("TODO_STORE_DATA_FILE", "env-todos.json");
    env::set_var("TODO_STORE_LOG_LEVEL", "warn");

    let config = Config::from_env().unwrap().unwrap();

    assert_eq!(config.data_file, PathBuf::from("env-todos.json"));
    assert_eq!(config.log_level, "warn");
    assert_eq!(config.export_dir, PathBuf::from("."));

    clear_env();
}

#[test]
fn test_no_env_vars() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();

    assert!(Config::from_env().unwrap().is_none());

    let config = Config::load().unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_invalid_level_env() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();

    env::set_var("TODO_STORE_LOG_LEVEL", "chatty");
    assert!(Config::from_env().is_err());

    clear_env();
}

#[test]
fn test_config_env_points_to_file() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();

    let yaml_content = r#"
data_file: "pointed.json"
"#;
    let filename = "test_todo_override_5.yaml";
    fs::write(filename, yaml_content).unwrap();

    env::set_var("TODO_STORE_CONFIG", "test_todo_override_5");

    let config = Config::load().unwrap();
    assert_eq!(config.data_file, PathBuf::from("pointed.json"));

    clear_env();
    fs::remove_file(filename).unwrap();
}

#[test]
fn test_empty_data_file_rejected() {
    let config = Config::new("");
    assert!(config.validate().is_err());
    assert!(Config::new("todos.json").validate().is_ok());
}
