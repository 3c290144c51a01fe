//! Project manifest and global settings loading.

use anyhow::{Context, Result};
use log::debug;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

use crate::runtime::Runtime;

/// Manifest file name at the root of a consuming project.
pub const MANIFEST_FILENAME: &str = "shared-package.json";

/// Key of the settings block inside the manifest's `extra` object.
pub const SETTINGS_KEY: &str = "shared-package";

/// Directory under the user's config dir holding the global settings.
pub const GLOBAL_CONFIG_DIR: &str = "shared-package";

/// Global settings file name inside [`GLOBAL_CONFIG_DIR`].
pub const GLOBAL_CONFIG_FILENAME: &str = "config.json";

fn default_vendor_dir() -> String {
    "vendor".to_string()
}

/// The consuming project's manifest.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ProjectManifest {
    /// Project identifier recorded in the usage ledger.
    pub name: String,
    /// The project's normal vendor directory.
    #[serde(rename = "vendor-dir", default = "default_vendor_dir")]
    pub vendor_dir: String,
    #[serde(default)]
    pub extra: Map<String, Value>,
}

impl ProjectManifest {
    pub fn path(project_dir: &Path) -> PathBuf {
        project_dir.join(MANIFEST_FILENAME)
    }

    #[tracing::instrument(skip(runtime))]
    pub fn load<R: Runtime>(runtime: &R, project_dir: &Path) -> Result<Self> {
        let path = Self::path(project_dir);
        let content = runtime
            .read_to_string(&path)
            .with_context(|| format!("Failed to read project manifest {:?}", path))?;
        let manifest: ProjectManifest = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse project manifest {:?}", path))?;
        Ok(manifest)
    }

    /// The raw `extra.shared-package` settings, if present.
    pub fn settings(&self) -> Option<&Value> {
        self.extra.get(SETTINGS_KEY)
    }

    /// Fill settings keys the project does not define from the global settings.
    /// Project values always win.
    pub fn merge_global(&mut self, global: &Value) {
        let Some(global) = global.as_object() else {
            return;
        };

        let entry = self
            .extra
            .entry(SETTINGS_KEY.to_string())
            .or_insert_with(|| Value::Object(Map::new()));

        if let Value::Object(local) = entry {
            for (key, value) in global {
                if !local.contains_key(key) {
                    debug!("Using global setting {:?}", key);
                    local.insert(key.clone(), value.clone());
                }
            }
        }
    }
}

/// Load the `extra.shared-package` block of the global settings file,
/// `<config_dir>/shared-package/config.json`.
#[tracing::instrument(skip(runtime))]
pub fn load_global_settings<R: Runtime>(runtime: &R) -> Result<Option<Value>> {
    let Some(config_dir) = runtime.config_dir() else {
        return Ok(None);
    };
    let path = config_dir
        .join(GLOBAL_CONFIG_DIR)
        .join(GLOBAL_CONFIG_FILENAME);
    if !runtime.exists(&path) {
        debug!("No global settings at {:?}", path);
        return Ok(None);
    }

    let content = runtime.read_to_string(&path)?;
    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse global settings {:?}", path))?;
    Ok(value
        .get("extra")
        .and_then(|extra| extra.get(SETTINGS_KEY))
        .cloned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;
    use crate::test_utils::test_project;
    use mockall::predicate::eq;
    use serde_json::json;

    #[test]
    fn test_load_manifest() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_read_to_string()
            .with(eq(test_project().join(MANIFEST_FILENAME)))
            .returning(|_| {
                Ok(r#"{
                    "name": "acme/app",
                    "extra": {"shared-package": {"vendor-dir": "../shared"}}
                }"#
                .into())
            });

        let manifest = ProjectManifest::load(&runtime, &test_project()).unwrap();
        assert_eq!(manifest.name, "acme/app");
        assert_eq!(manifest.vendor_dir, "vendor");
        assert_eq!(manifest.settings(), Some(&json!({"vendor-dir": "../shared"})));
    }

    #[test]
    fn test_load_manifest_requires_name() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_read_to_string()
            .returning(|_| Ok(r#"{"vendor-dir": "lib"}"#.into()));

        assert!(ProjectManifest::load(&runtime, &test_project()).is_err());
    }

    #[test]
    fn test_merge_global_keeps_project_values() {
        let mut manifest: ProjectManifest = serde_json::from_value(json!({
            "name": "acme/app",
            "extra": {"shared-package": {"vendor-dir": "local"}}
        }))
        .unwrap();

        manifest.merge_global(&json!({"vendor-dir": "global", "package-list": ["*"]}));

        assert_eq!(
            manifest.settings(),
            Some(&json!({"vendor-dir": "local", "package-list": ["*"]}))
        );
    }

    #[test]
    fn test_merge_global_without_project_block() {
        let mut manifest: ProjectManifest =
            serde_json::from_value(json!({"name": "acme/app"})).unwrap();

        manifest.merge_global(&json!({"vendor-dir": "/opt/shared"}));

        assert_eq!(manifest.settings(), Some(&json!({"vendor-dir": "/opt/shared"})));
    }

    #[test]
    fn test_load_global_settings() {
        let mut runtime = MockRuntime::new();
        let path = PathBuf::from("/home/user/.config/shared-package/config.json");
        runtime
            .expect_config_dir()
            .returning(|| Some(PathBuf::from("/home/user/.config")));
        runtime
            .expect_exists()
            .with(eq(path.clone()))
            .returning(|_| true);
        runtime
            .expect_read_to_string()
            .with(eq(path))
            .returning(|_| {
                Ok(r#"{"extra": {"shared-package": {"vendor-dir": "/opt/shared"}}}"#.into())
            });

        let settings = load_global_settings(&runtime).unwrap();
        assert_eq!(settings, Some(json!({"vendor-dir": "/opt/shared"})));
    }

    #[test]
    fn test_load_global_settings_missing_file() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_config_dir()
            .returning(|| Some(PathBuf::from("/home/user/.config")));
        runtime.expect_exists().returning(|_| false);

        assert_eq!(load_global_settings(&runtime).unwrap(), None);
    }
}
