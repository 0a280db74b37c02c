//! The `require` protocol: loads a data module from the filesystem.

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::error::{Result, ValidationError, type_name};
use crate::locator::{Options, Value};
use crate::protocol::{Fail, Protocol, Succeed};

/// Extensions tried, in order, when the target does not name a file.
pub const MODULE_EXTENSIONS: [&str; 2] = ["json", "toml"];

/// Resolves `target` relative to `options.cwd` (default: the process working
/// directory) and loads it as JSON, or TOML for `.toml` files.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequireProtocol;

impl Protocol for RequireProtocol {
    fn call(&self, succeed: Succeed, fail: Fail, target: &str, options: &Options) -> Result<()> {
        if target.is_empty() {
            return Err(ValidationError::EmptyField { field: "target" }.into());
        }

        let cwd = match options.get("cwd") {
            None | Some(Value::Null) => None,
            Some(Value::String(cwd)) => Some(PathBuf::from(cwd)),
            Some(other) => {
                return Err(ValidationError::NotAString {
                    field: "options.cwd",
                    found: type_name(other).to_string(),
                }
                .into());
            }
        };

        match require(target, cwd.as_deref()) {
            Ok(value) => succeed.call(value),
            Err(err) => fail.call(anyhow::anyhow!(
                "require protocol is unable to load the module \"{}\" ({:#})",
                target,
                err
            )),
        }

        Ok(())
    }
}

fn require(target: &str, cwd: Option<&Path>) -> anyhow::Result<Value> {
    let base = match cwd {
        Some(cwd) => cwd.to_path_buf(),
        None => std::env::current_dir().context("Could not determine the working directory")?,
    };
    let requested = base.join(target);

    let path = resolve_module(&requested)
        .ok_or_else(|| anyhow::anyhow!("Cannot find module '{}'", requested.display()))?;

    tracing::debug!(path = %path.display(), "require protocol loading module");
    load_module(&path)
}

/// Find the file a module path refers to.
///
/// Tries the path itself, then each of [`MODULE_EXTENSIONS`] appended, then
/// `index.<ext>` inside the path when it is a directory.
pub fn resolve_module(path: &Path) -> Option<PathBuf> {
    if path.is_file() {
        return Some(path.to_path_buf());
    }

    for extension in MODULE_EXTENSIONS {
        let mut candidate = path.as_os_str().to_owned();
        candidate.push(".");
        candidate.push(extension);
        let candidate = PathBuf::from(candidate);
        if candidate.is_file() {
            return Some(candidate);
        }
    }

    if path.is_dir() {
        return MODULE_EXTENSIONS
            .iter()
            .map(|extension| path.join(format!("index.{}", extension)))
            .find(|candidate| candidate.is_file());
    }

    None
}

fn load_module(path: &Path) -> anyhow::Result<Value> {
    let content = std::fs::read_to_string(path)?;

    let is_toml = path
        .extension()
        .is_some_and(|extension| extension.eq_ignore_ascii_case("toml"));

    if is_toml {
        let table: toml::Table = toml::from_str(&content)?;
        Ok(serde_json::to_value(table)?)
    } else {
        Ok(serde_json::from_str(&content)?)
    }
}
