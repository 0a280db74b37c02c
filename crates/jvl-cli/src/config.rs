//! `jvl.toml` configuration.
//!
//! Two layers are read: the global file in the user config directory and the
//! project file in the working directory. Project values override global ones.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use jvl_core::Options;
use jvl_core::merge::merge_options;
use jvl_core::settings::SEPARATOR;

pub const CONFIG_FILE_NAME: &str = "jvl.toml";

/// Settings applied to every load started from the command line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JvlConfig {
    /// Protocol applied to locators that do not name one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_protocol: Option<String>,

    /// Options passed to every protocol.
    #[serde(default, skip_serializing_if = "Options::is_empty")]
    pub options: Options,
}

impl JvlConfig {
    /// Overlay `layer` on top of this configuration.
    pub fn merge(mut self, layer: JvlConfig) -> Self {
        if layer.default_protocol.is_some() {
            self.default_protocol = layer.default_protocol;
        }
        self.options = merge_options([&self.options, &layer.options]);
        self
    }

    fn validate(&self) -> anyhow::Result<()> {
        if let Some(protocol) = &self.default_protocol {
            if protocol.trim().is_empty() {
                anyhow::bail!("default_protocol must not be empty");
            }
            if protocol.contains(SEPARATOR) {
                anyhow::bail!(
                    "default_protocol \"{}\" must not contain \"{}\"",
                    protocol,
                    SEPARATOR
                );
            }
        }
        Ok(())
    }
}

/// Locates and reads the configuration layers.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    global_path: Option<PathBuf>,
    project_path: PathBuf,
}

impl ConfigStore {
    /// Store for the user config directory and the current directory.
    pub fn discover() -> anyhow::Result<Self> {
        let global_dir = dirs::config_dir().map(|dir| dir.join("jvl"));
        let project_root = std::env::current_dir()?;
        Ok(Self::from_paths(global_dir, project_root))
    }

    pub fn from_paths(global_dir: Option<PathBuf>, project_root: PathBuf) -> Self {
        Self {
            global_path: global_dir.map(|dir| dir.join(CONFIG_FILE_NAME)),
            project_path: project_root.join(CONFIG_FILE_NAME),
        }
    }

    /// Read both layers; missing files count as empty.
    pub fn load(&self) -> anyhow::Result<JvlConfig> {
        let global = match &self.global_path {
            Some(path) => read_layer(path)?,
            None => JvlConfig::default(),
        };
        let project = read_layer(&self.project_path)?;

        Ok(global.merge(project))
    }
}

fn read_layer(path: &Path) -> anyhow::Result<JvlConfig> {
    if !path.exists() {
        return Ok(JvlConfig::default());
    }

    tracing::debug!(path = %path.display(), "reading config layer");
    parse_config_file(path)
}

/// Parse a `jvl.toml` file.
pub fn parse_config_file(path: &Path) -> anyhow::Result<JvlConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_config_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse `jvl.toml` content.
pub fn parse_config_str(content: &str) -> anyhow::Result<JvlConfig> {
    let config: JvlConfig =
        toml::from_str(content).map_err(|e| enhance_toml_error(e, content))?;
    config.validate()?;
    Ok(config)
}

fn enhance_toml_error(error: toml::de::Error, content: &str) -> anyhow::Error {
    let message = error.message().to_string();

    match error.span() {
        Some(span) => {
            let line = content[..span.start.min(content.len())].matches('\n').count() + 1;
            anyhow::anyhow!(
                "TOML parsing error at line {}:\n{}\n\nError: {}",
                line,
                line_context(content, line),
                message
            )
        }
        None => anyhow::anyhow!("TOML parsing error: {}", message),
    }
}

fn line_context(content: &str, line: usize) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let start = line.saturating_sub(2);
    let end = (line + 1).min(lines.len());

    lines[start.min(end)..end]
        .iter()
        .enumerate()
        .map(|(i, text)| {
            let number = start + i + 1;
            let marker = if number == line { ">>>" } else { "   " };
            format!("{} {:4} | {}", marker, number, text)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_parses_default_protocol_and_options() {
        let config = parse_config_str(
            r#"
default_protocol = "require"

[options]
cwd = "/srv/data"
"#,
        )
        .unwrap();

        assert_eq!(config.default_protocol.as_deref(), Some("require"));
        assert_eq!(config.options["cwd"], json!("/srv/data"));
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(parse_config_str("").unwrap(), JvlConfig::default());
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(parse_config_str("protocolz = 1").is_err());
    }

    #[test]
    fn test_separator_in_default_protocol_is_rejected() {
        let err = parse_config_str("default_protocol = \"a:b\"").unwrap_err();
        assert!(err.to_string().contains("must not contain"));
    }

    #[test]
    fn test_syntax_errors_report_line() {
        let err = parse_config_str("default_protocol = \"require\"\n[options\n").unwrap_err();
        assert!(err.to_string().starts_with("TOML parsing error at line"), "{err}");
    }

    #[test]
    fn test_project_layer_overrides_global_layer() {
        let global = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();
        std::fs::write(
            global.path().join(CONFIG_FILE_NAME),
            "default_protocol = \"require\"\n[options]\nk = \"global\"\nonly_global = true\n",
        )
        .unwrap();
        std::fs::write(
            project.path().join(CONFIG_FILE_NAME),
            "[options]\nk = \"project\"\n",
        )
        .unwrap();

        let store =
            ConfigStore::from_paths(Some(global.path().to_path_buf()), project.path().to_path_buf());
        let config = store.load().unwrap();

        assert_eq!(config.default_protocol.as_deref(), Some("require"));
        assert_eq!(config.options["k"], json!("project"));
        assert_eq!(config.options["only_global"], json!(true));
    }

    #[test]
    fn test_missing_files_load_as_default() {
        let project = TempDir::new().unwrap();
        let store = ConfigStore::from_paths(None, project.path().to_path_buf());
        assert_eq!(store.load().unwrap(), JvlConfig::default());
    }
}
