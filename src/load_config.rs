use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{error, info};

use crate::config::{ArchiveConfig, CaptureConfig, ScriptBundle};

#[derive(Deserialize)]
struct StaticConfig {
    archive_dir: PathBuf,
    source_dir: PathBuf,
    report_path: PathBuf,
    #[serde(default = "default_concurrency")]
    concurrency: usize,
    capture: CaptureSection,
}

#[derive(Deserialize)]
struct CaptureSection {
    #[serde(default = "default_share_base_url")]
    share_base_url: String,
    #[serde(default = "default_ready_selector")]
    ready_selector: String,
    #[serde(default = "default_ready_timeout_secs")]
    ready_timeout_secs: u64,
    #[serde(default = "default_settle_delay_secs")]
    settle_delay_secs: u64,
    hook_script: PathBuf,
    page_script: PathBuf,
    zip_script: PathBuf,
}

fn default_concurrency() -> usize {
    10
}

fn default_share_base_url() -> String {
    "https://gemini.google.com/share".to_string()
}

fn default_ready_selector() -> String {
    "message-content".to_string()
}

fn default_ready_timeout_secs() -> u64 {
    20
}

fn default_settle_delay_secs() -> u64 {
    3
}

/// Loads the static YAML config file and the single-file script payloads it
/// points at. Returns a fully merged [`ArchiveConfig`] or an error.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ArchiveConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => {
            info!(config_path = ?path_ref, "Config file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    let static_conf: StaticConfig = match serde_yaml::from_str(&config_content) {
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            conf
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
        }
    };

    let scripts = load_scripts(&static_conf.capture)?;

    let config = ArchiveConfig {
        archive_dir: static_conf.archive_dir,
        source_dir: static_conf.source_dir,
        report_path: static_conf.report_path,
        concurrency: static_conf.concurrency,
        capture: CaptureConfig {
            share_base_url: static_conf.capture.share_base_url,
            ready_selector: static_conf.capture.ready_selector,
            ready_timeout: Duration::from_secs(static_conf.capture.ready_timeout_secs),
            settle_delay: Duration::from_secs(static_conf.capture.settle_delay_secs),
            scripts,
        },
    };

    config.trace_loaded();
    Ok(config)
}

fn load_scripts(section: &CaptureSection) -> Result<ScriptBundle> {
    let hook = read_script(&section.hook_script)?;
    let mut page = read_script(&section.page_script)?;
    // The serializer script evaluates to a module-scoped binding; export it
    // so later evaluate() calls can reach it.
    page.push_str("\n;window.singlefile = singlefile;");
    let zip = read_script(&section.zip_script)?;

    info!(
        hook_bytes = hook.len(),
        page_bytes = page.len(),
        zip_bytes = zip.len(),
        "Loaded capture script payloads"
    );
    Ok(ScriptBundle { hook, page, zip })
}

fn read_script(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .with_context(|| format!("Failed to read script payload {:?}", path))
}
