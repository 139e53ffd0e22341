use std::path::{Path, PathBuf};

use eyre::WrapErr;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;

/// Version written by this build. Raising it means adding a step to
/// [`migrate`].
pub const CURRENT_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurateConfig {
    /// Files written before versioning have no field and read as 0.
    #[serde(default)]
    pub config_version: u32,
    #[serde(default)]
    pub log_format: LogFormat,
    /// Where drafts are kept. `None` = the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drafts_dir: Option<PathBuf>,
}

impl Default for CurateConfig {
    fn default() -> Self {
        Self {
            config_version: CURRENT_VERSION,
            log_format: LogFormat::default(),
            drafts_dir: None,
        }
    }
}

impl CurateConfig {
    pub fn drafts_dir(&self) -> eyre::Result<PathBuf> {
        match &self.drafts_dir {
            Some(dir) => Ok(dir.clone()),
            None => {
                let base = dirs::data_local_dir()
                    .ok_or_else(|| eyre::eyre!("no local data directory found"))?;
                Ok(base.join("curate").join("drafts"))
            }
        }
    }
}

pub fn default_config_path() -> eyre::Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join("curate").join("config.json"))
}

/// Load the config at `path`, migrating older versions. A missing file
/// yields the defaults.
pub fn load_config(path: &Path) -> eyre::Result<CurateConfig> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(CurateConfig::default());
    }
    let raw = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read config at {}", path.display()))?;

    // Migrations operate on the untyped document.
    let document: serde_json::Value = serde_json::from_str(&raw)
        .wrap_err_with(|| format!("config at {} is not valid JSON", path.display()))?;
    let version = document
        .get("config_version")
        .and_then(serde_json::Value::as_u64)
        .map_or(0, |v| u32::try_from(v).unwrap_or(u32::MAX));

    let document = migrate(document, version)?;
    serde_json::from_value(document)
        .wrap_err_with(|| format!("config at {} has an unexpected shape", path.display()))
}

/// [`load_config`] under a subscriber scoped to the call, for use before the
/// process-wide subscriber is installed.
pub fn load_config_logged<W>(
    path: &Path,
    format: LogFormat,
    filter: EnvFilter,
    writer: W,
) -> eyre::Result<CurateConfig>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer);
    match format {
        LogFormat::Text => {
            tracing::subscriber::with_default(builder.finish(), || load_config(path))
        }
        LogFormat::Json => {
            tracing::subscriber::with_default(builder.json().finish(), || load_config(path))
        }
    }
}

/// Bring a config document from `from_version` to [`CURRENT_VERSION`], one
/// step at a time. Documents from a newer build are refused.
pub fn migrate(mut json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION})"
        ));
    }

    // 1: `json_logs: bool` is replaced by `log_format`
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;
        if let Some(json_logs) = obj.remove("json_logs").and_then(|v| v.as_bool()) {
            let format = if json_logs { "json" } else { "text" };
            obj.entry("log_format")
                .or_insert(serde_json::Value::String(format.to_string()));
        }
        obj.insert(
            "config_version".to_string(),
            serde_json::Value::Number(1.into()),
        );
        tracing::info!(from = from_version, to = 1, "migrated config: json_logs replaced by log_format");
    }

    Ok(json)
}

/// Write the config atomically, stamped with the current version.
pub fn save_config(config: &CurateConfig, path: &Path) -> eyre::Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }

    let mut stamped = config.clone();
    stamped.config_version = CURRENT_VERSION;
    let json = serde_json::to_string_pretty(&stamped)?;

    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, json.as_bytes())?;
    std::fs::rename(&tmp_path, path)?;

    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}
