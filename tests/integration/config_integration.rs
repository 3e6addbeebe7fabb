//! Configuration layering feeding plugin construction.

use super::test_utils::{HomeGuard, ENV_MUTEX};
use appinit::config::{global_config_path, ConfigLoader};
use appinit::plugins::{build_plugins, Collaborators};
use appinit::surface::SurfaceMode;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_global_config_path_follows_home() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let temp = TempDir::new().unwrap();
    let _home = HomeGuard::set(temp.path());

    assert_eq!(
        global_config_path(),
        Some(temp.path().join(".config").join("appinit").join("config.toml"))
    );
}

#[test]
fn test_layers_combine_into_plugin_list() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let temp = TempDir::new().unwrap();
    let home = temp.path().join("home");
    let project = temp.path().join("project");
    let _home = HomeGuard::set(&home);

    fs::create_dir_all(home.join(".config").join("appinit")).unwrap();
    fs::write(
        home.join(".config").join("appinit").join("config.toml"),
        r#"
[plugins.settings]
enabled = false
"#,
    )
    .unwrap();

    fs::create_dir_all(project.join("config")).unwrap();
    fs::write(
        project.join("config").join("appinit.toml"),
        r#"
[app]
mode = "fullscreen"
packaged = true
"#,
    )
    .unwrap();

    let config = ConfigLoader::load(&project).unwrap();
    assert_eq!(config.app.mode, SurfaceMode::Fullscreen);
    assert!(!config.plugins.settings.enabled);

    let plugins = build_plugins(&config, &Collaborators::default());
    let names: Vec<&str> = plugins.iter().map(|p| p.name()).collect();
    assert_eq!(names[0], "fullscreen-surface");
    assert!(!names.contains(&"settings"));
}

#[test]
fn test_invalid_config_is_rejected_with_every_problem() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("appinit.toml");
    fs::write(
        &file,
        r#"
[app]
content = ""

[window]
height = 0
"#,
    )
    .unwrap();

    let err = ConfigLoader::load_validated(temp.path(), Some(&file)).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("content cannot be empty"));
    assert!(message.contains("height must be positive"));
}

#[test]
fn test_unknown_mode_is_a_config_error() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("appinit.toml");
    fs::write(&file, "[app]\nmode = \"borderless\"\n").unwrap();

    let result = ConfigLoader::load_from_file(&file);
    assert!(matches!(result, Err(appinit::InitError::ConfigError(_))));
}
