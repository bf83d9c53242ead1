//! Settings resolution.
//!
//! Each setting is taken from the first source that has a non-empty value:
//! command line, process environment (handled by the argument parser), the
//! environment file, then the built-in default.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

use crate::error::SyncError;
use crate::io::read_json;
use crate::store::{CollectionStore, FileStore, PostmanApi, DEFAULT_API_BASE};

pub const DEFAULT_ENV_FILE: &str = "./postman.env.json";

pub const KEY_API_KEY: &str = "postmanApiKey";
pub const KEY_COLLECTION_UID: &str = "collectionUid";
pub const KEY_OUTPUT_FILE: &str = "aiOutputFile";
pub const KEY_OUTPUT_IS_PATCH: &str = "aiOutputIsPatch";

#[derive(Debug, Deserialize)]
struct RawEnvFile {
    #[serde(default)]
    values: Vec<RawEntry>,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    key: Option<String>,
    value: Option<Value>,
    enabled: Option<bool>,
}

/// Key/value pairs from a Postman environment export.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvFile {
    vars: BTreeMap<String, String>,
}

impl EnvFile {
    /// Entries with `"enabled": false` and entries without a key are skipped.
    /// Non-string values are kept in their JSON text form.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        let raw: RawEnvFile = serde_json::from_value(value)?;
        let mut vars = BTreeMap::new();
        for entry in raw.values {
            if entry.enabled == Some(false) {
                continue;
            }
            let (Some(key), Some(value)) = (entry.key, entry.value) else {
                continue;
            };
            let text = match value {
                Value::Null => continue,
                Value::String(s) => s,
                other => other.to_string(),
            };
            vars.insert(key, text);
        }
        Ok(EnvFile { vars })
    }

    /// A missing file is an empty environment.
    pub fn load(path: &Path) -> Result<Self, SyncError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no environment file");
            return Ok(EnvFile::default());
        }
        let value = read_json(path)?;
        let env = EnvFile::from_value(value).map_err(|source| SyncError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), entries = env.vars.len(), "loaded environment file");
        Ok(env)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str).filter(|v| !v.is_empty())
    }
}

/// Values supplied on the command line or through process environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_key: Option<String>,
    pub collection_uid: Option<String>,
    pub api_base_url: Option<String>,
    pub store_file: Option<PathBuf>,
    pub input: Option<PathBuf>,
    pub patch: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_key: Option<String>,
    pub collection_uid: Option<String>,
    pub api_base_url: String,
    pub store_file: Option<PathBuf>,
    pub input: Option<PathBuf>,
    pub patch: bool,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// `"true"` in any letter case; everything else is false.
pub fn parse_flag(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

impl Settings {
    pub fn resolve(overrides: Overrides, env: &EnvFile) -> Self {
        let from_env = |key: &str| env.get(key).map(str::to_string);
        Settings {
            api_key: non_empty(overrides.api_key).or_else(|| from_env(KEY_API_KEY)),
            collection_uid: non_empty(overrides.collection_uid)
                .or_else(|| from_env(KEY_COLLECTION_UID)),
            api_base_url: non_empty(overrides.api_base_url)
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            store_file: overrides.store_file,
            input: overrides
                .input
                .or_else(|| from_env(KEY_OUTPUT_FILE).map(PathBuf::from)),
            patch: non_empty(overrides.patch)
                .or_else(|| from_env(KEY_OUTPUT_IS_PATCH))
                .is_some_and(|v| parse_flag(&v)),
        }
    }

    /// A file store when one is configured, otherwise the remote API, which
    /// needs both an API key and a collection uid.
    pub fn open_store(&self) -> Result<Box<dyn CollectionStore>, SyncError> {
        if let Some(path) = &self.store_file {
            return Ok(Box::new(FileStore::new(path.clone())));
        }
        let api_key = self.api_key.clone().ok_or_else(|| {
            SyncError::Config(format!(
                "API key (--postman-api-key, POSTMAN_API_KEY or {KEY_API_KEY} in the environment file)"
            ))
        })?;
        let uid = self.collection_uid.clone().ok_or_else(|| {
            SyncError::Config(format!(
                "collection uid (--collection-uid, COLLECTION_UID or {KEY_COLLECTION_UID} in the environment file)"
            ))
        })?;
        Ok(Box::new(PostmanApi::new(&self.api_base_url, api_key, uid)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn env() -> EnvFile {
        EnvFile::from_value(json!({
            "name": "dev",
            "values": [
                {"key": "postmanApiKey", "value": "file-key", "enabled": true},
                {"key": "collectionUid", "value": "file-uid"},
                {"key": "aiOutputFile", "value": "out/ai.json"},
                {"key": "aiOutputIsPatch", "value": true},
                {"key": "disabled", "value": "x", "enabled": false},
                {"value": "no key"}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn env_file_skips_disabled_and_keyless() {
        let env = env();
        assert_eq!(env.get("postmanApiKey"), Some("file-key"));
        assert_eq!(env.get("aiOutputIsPatch"), Some("true"));
        assert_eq!(env.get("disabled"), None);
    }

    #[test]
    fn command_line_beats_env_file() {
        let settings = Settings::resolve(
            Overrides {
                api_key: Some("cli-key".into()),
                patch: Some("FALSE".into()),
                ..Overrides::default()
            },
            &env(),
        );
        assert_eq!(settings.api_key.as_deref(), Some("cli-key"));
        assert_eq!(settings.collection_uid.as_deref(), Some("file-uid"));
        assert_eq!(settings.input, Some(PathBuf::from("out/ai.json")));
        assert!(!settings.patch);
        assert_eq!(settings.api_base_url, DEFAULT_API_BASE);
    }

    #[test]
    fn empty_override_falls_through() {
        let settings = Settings::resolve(
            Overrides {
                api_key: Some(String::new()),
                ..Overrides::default()
            },
            &env(),
        );
        assert_eq!(settings.api_key.as_deref(), Some("file-key"));
        assert!(settings.patch);
    }

    #[test]
    fn missing_credentials_is_config_error() {
        let settings = Settings::resolve(Overrides::default(), &EnvFile::default());
        assert!(!settings.patch);
        assert!(matches!(settings.open_store(), Err(SyncError::Config(_))));
    }

    #[test]
    fn store_file_needs_no_credentials() {
        let settings = Settings::resolve(
            Overrides {
                store_file: Some(PathBuf::from("collection.json")),
                ..Overrides::default()
            },
            &EnvFile::default(),
        );
        assert!(settings.open_store().is_ok());
    }

    #[test]
    fn flag_parsing() {
        assert!(parse_flag("true"));
        assert!(parse_flag("True"));
        assert!(!parse_flag("yes"));
        assert!(!parse_flag(""));
    }

    #[test]
    fn missing_env_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let env = EnvFile::load(&dir.path().join("postman.env.json")).unwrap();
        assert_eq!(env, EnvFile::default());
    }
}
