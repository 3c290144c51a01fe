//! Typed view of the raw `extra.shared-package` settings object.

use serde_json::{Map, Value};

use crate::error::SharedPackageError;

pub const VENDOR_DIR_KEY: &str = "vendor-dir";
pub const SYMLINK_DIR_KEY: &str = "symlink-dir";
pub const SYMLINK_BASE_PATH_KEY: &str = "symlink-base-path";
pub const SYMLINK_ENABLED_KEY: &str = "symlink-enabled";
pub const PACKAGE_LIST_KEY: &str = "package-list";
pub const FORCE_SOURCE_KEY: &str = "force-source";

/// Settings exactly as written by the user, type-checked but not resolved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    pub vendor_dir: Option<String>,
    pub symlink_dir: Option<String>,
    pub symlink_base_path: Option<String>,
    pub symlink_enabled: Option<bool>,
    pub package_list: Vec<String>,
    pub force_source: Option<bool>,
}

impl Settings {
    /// Validate a raw settings object. Every key is optional here; whether
    /// `vendor-dir` is present is decided during resolution, where the
    /// environment override is known.
    pub fn from_value(value: &Value) -> Result<Self, SharedPackageError> {
        let object = value.as_object().ok_or_else(|| {
            SharedPackageError::config("the \"shared-package\" settings should be a JSON object")
        })?;

        Ok(Settings {
            vendor_dir: string_setting(object, VENDOR_DIR_KEY)?,
            symlink_dir: string_setting(object, SYMLINK_DIR_KEY)?,
            symlink_base_path: string_setting(object, SYMLINK_BASE_PATH_KEY)?,
            symlink_enabled: bool_setting(object, SYMLINK_ENABLED_KEY)?,
            package_list: list_setting(object, PACKAGE_LIST_KEY)?,
            force_source: bool_setting(object, FORCE_SOURCE_KEY)?,
        })
    }
}

fn string_setting(
    object: &Map<String, Value>,
    key: &str,
) -> Result<Option<String>, SharedPackageError> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Err(SharedPackageError::config(format!(
            "\"{}\" should not be empty",
            key
        ))),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(SharedPackageError::config(format!(
            "\"{}\" should be a string",
            key
        ))),
    }
}

fn bool_setting(
    object: &Map<String, Value>,
    key: &str,
) -> Result<Option<bool>, SharedPackageError> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(_) => Err(SharedPackageError::config(format!(
            "\"{}\" should be a boolean",
            key
        ))),
    }
}

fn list_setting(
    object: &Map<String, Value>,
    key: &str,
) -> Result<Vec<String>, SharedPackageError> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    SharedPackageError::config(format!(
                        "\"{}\" entries should be strings, got {}",
                        key, item
                    ))
                })
            })
            .collect(),
        Some(_) => Err(SharedPackageError::config(format!(
            "\"{}\" should be a list",
            key
        ))),
    }
}
