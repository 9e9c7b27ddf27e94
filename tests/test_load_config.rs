use std::fs;
use std::time::Duration;

use tempfile::tempdir;

use gemini_archive::load_config::load_config;

fn write_scripts(dir: &std::path::Path) -> (String, String, String) {
    let hook = dir.join("hook.js");
    let page = dir.join("single-file.js");
    let zip = dir.join("zip.js");
    fs::write(&hook, "/* hook */").unwrap();
    fs::write(&page, "const singlefile = {};").unwrap();
    fs::write(&zip, "/* zip */").unwrap();
    (
        hook.display().to_string(),
        page.display().to_string(),
        zip.display().to_string(),
    )
}

#[test]
fn loads_a_minimal_config_with_defaults() {
    let dir = tempdir().unwrap();
    let (hook, page, zip) = write_scripts(dir.path());
    let config_path = dir.path().join("archive.yaml");
    fs::write(
        &config_path,
        format!(
            "archive_dir: {0}/conversations\n\
             source_dir: {0}\n\
             report_path: {0}/commit-msg\n\
             capture:\n\
             \x20 hook_script: {hook}\n\
             \x20 page_script: {page}\n\
             \x20 zip_script: {zip}\n",
            dir.path().display()
        ),
    )
    .unwrap();

    let config = load_config(&config_path).expect("config should load");

    assert_eq!(config.concurrency, 10, "default concurrency");
    assert_eq!(config.capture.ready_timeout, Duration::from_secs(20));
    assert_eq!(config.capture.settle_delay, Duration::from_secs(3));
    assert_eq!(config.capture.ready_selector, "message-content");
    assert_eq!(
        config.capture.share_base_url,
        "https://gemini.google.com/share"
    );
    assert_eq!(config.capture.scripts.hook, "/* hook */");
    assert!(
        config.capture.scripts.page.ends_with("window.singlefile = singlefile;"),
        "the serializer binding must be exported for later evaluation"
    );
}

#[test]
fn explicit_tunables_override_the_defaults() {
    let dir = tempdir().unwrap();
    let (hook, page, zip) = write_scripts(dir.path());
    let config_path = dir.path().join("archive.yaml");
    fs::write(
        &config_path,
        format!(
            "archive_dir: {0}/conversations\n\
             source_dir: {0}\n\
             report_path: {0}/commit-msg\n\
             concurrency: 3\n\
             capture:\n\
             \x20 ready_timeout_secs: 5\n\
             \x20 settle_delay_secs: 1\n\
             \x20 hook_script: {hook}\n\
             \x20 page_script: {page}\n\
             \x20 zip_script: {zip}\n",
            dir.path().display()
        ),
    )
    .unwrap();

    let config = load_config(&config_path).unwrap();
    assert_eq!(config.concurrency, 3);
    assert_eq!(config.capture.ready_timeout, Duration::from_secs(5));
    assert_eq!(config.capture.settle_delay, Duration::from_secs(1));
}

#[test]
fn a_missing_config_file_is_an_error() {
    let err = load_config("/nonexistent/archive.yaml").unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));
}

#[test]
fn a_missing_script_payload_is_an_error() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("archive.yaml");
    fs::write(
        &config_path,
        format!(
            "archive_dir: {0}/conversations\n\
             source_dir: {0}\n\
             report_path: {0}/commit-msg\n\
             capture:\n\
             \x20 hook_script: {0}/missing-hook.js\n\
             \x20 page_script: {0}/missing-page.js\n\
             \x20 zip_script: {0}/missing-zip.js\n",
            dir.path().display()
        ),
    )
    .unwrap();

    let err = load_config(&config_path).unwrap_err();
    assert!(err.to_string().contains("Failed to read script payload"));
}

#[test]
fn malformed_yaml_is_an_error() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("archive.yaml");
    fs::write(&config_path, "archive_dir: [unclosed").unwrap();

    let err = load_config(&config_path).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config YAML"));
}
