//! Where the controls file lives and how it is laid out.
//!
//! Defaults match the retail game; a JSON file can override any field, which is mostly
//! useful for pointing at a copy of `controls.rmp` while testing.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{
    BACKUP_SUFFIX, CONTROLS_DIR_COMPONENTS, CONTROLS_FILE_LEN, CONTROLS_FILE_NAME,
    RESPEC_KEY_OFFSET,
};
use crate::error::{IoOp, KeyfixError, Result};
use crate::keys::HotkeyPolicy;

fn default_expected_len() -> u64 {
    CONTROLS_FILE_LEN
}

fn default_key_offset() -> u64 {
    RESPEC_KEY_OFFSET
}

fn default_backup_suffix() -> String {
    BACKUP_SUFFIX.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchSettings {
    /// Explicit controls file; `None` resolves under the local application data folder.
    #[serde(default)]
    pub controls_path: Option<PathBuf>,
    #[serde(default = "default_expected_len")]
    pub expected_len: u64,
    #[serde(default = "default_key_offset")]
    pub key_offset: u64,
    #[serde(default = "default_backup_suffix")]
    pub backup_suffix: String,
    #[serde(default)]
    pub policy: HotkeyPolicy,
}

impl Default for PatchSettings {
    fn default() -> Self {
        Self {
            controls_path: None,
            expected_len: default_expected_len(),
            key_offset: default_key_offset(),
            backup_suffix: default_backup_suffix(),
            policy: HotkeyPolicy::default(),
        }
    }
}

impl PatchSettings {
    #[must_use]
    pub fn builder() -> PatchSettingsBuilder {
        PatchSettingsBuilder::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: Self =
            serde_json::from_str(json).map_err(|err| KeyfixError::InvalidSettings {
                reason: err.to_string(),
            })?;
        settings.check()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs_err::read_to_string(path)
            .map_err(|err| KeyfixError::io(IoOp::Read, path, 0, err))?;
        Self::from_json_str(&json)
    }

    /// Reject layouts where the key offset falls outside the file.
    pub fn check(&self) -> Result<()> {
        if self.key_offset >= self.expected_len {
            return Err(KeyfixError::InvalidSettings {
                reason: format!(
                    "key offset {:#x} is outside a {}-byte file",
                    self.key_offset, self.expected_len
                ),
            });
        }
        if self.backup_suffix.is_empty() {
            return Err(KeyfixError::InvalidSettings {
                reason: "backup suffix must not be empty".into(),
            });
        }
        Ok(())
    }

    pub fn resolve_controls_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.controls_path {
            return Ok(path.clone());
        }
        let base = dirs_next::data_local_dir().ok_or(KeyfixError::DataDirUnavailable)?;
        Ok(default_controls_path(&base))
    }
}

/// `<base>/EA Games/Dead Space 2/controls.rmp`.
#[must_use]
pub fn default_controls_path(base: &Path) -> PathBuf {
    CONTROLS_DIR_COMPONENTS
        .iter()
        .fold(base.to_path_buf(), |acc, part| acc.join(part))
        .join(CONTROLS_FILE_NAME)
}

#[derive(Debug, Clone, Default)]
pub struct PatchSettingsBuilder {
    inner: PatchSettings,
}

impl PatchSettingsBuilder {
    #[must_use]
    pub fn controls_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.inner.controls_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn expected_len(mut self, len: u64) -> Self {
        self.inner.expected_len = len;
        self
    }

    #[must_use]
    pub fn key_offset(mut self, offset: u64) -> Self {
        self.inner.key_offset = offset;
        self
    }

    #[must_use]
    pub fn backup_suffix<S: Into<String>>(mut self, suffix: S) -> Self {
        self.inner.backup_suffix = suffix.into();
        self
    }

    #[must_use]
    pub fn policy(mut self, policy: HotkeyPolicy) -> Self {
        self.inner.policy = policy;
        self
    }

    #[must_use]
    pub fn build(self) -> PatchSettings {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_match_the_game_layout() {
        let settings = PatchSettings::default();
        assert_eq!(settings.expected_len, 1008);
        assert_eq!(settings.key_offset, 0x228);
        assert_eq!(settings.backup_suffix, ".bak");
        settings.check().expect("defaults are consistent");
    }

    #[test]
    fn empty_json_gives_defaults() {
        let settings = PatchSettings::from_json_str("{}").expect("parse");
        assert_eq!(settings, PatchSettings::default());
    }

    #[test]
    fn json_overrides_single_fields() {
        let settings =
            PatchSettings::from_json_str(r#"{"controls_path": "/tmp/controls.rmp", "policy": {"reserved": [27]}}"#)
                .expect("parse");
        assert_eq!(settings.controls_path, Some(PathBuf::from("/tmp/controls.rmp")));
        assert!(settings.policy.require_no_modifiers);
        assert_eq!(settings.policy.reserved.len(), 1);
        assert_eq!(settings.key_offset, RESPEC_KEY_OFFSET);
    }

    #[test]
    fn offset_outside_file_is_rejected() {
        let err = PatchSettings::from_json_str(r#"{"expected_len": 16, "key_offset": 16}"#)
            .expect_err("offset outside file");
        assert!(matches!(err, KeyfixError::InvalidSettings { .. }));
    }

    #[test]
    fn malformed_json_is_invalid_settings() {
        let err = PatchSettings::from_json_str("{ not json").expect_err("malformed");
        assert!(matches!(err, KeyfixError::InvalidSettings { .. }));
    }

    #[test]
    fn load_reads_from_disk() {
        let dir = tempdir().expect("tmp");
        let path = dir.path().join("keyfix.json");
        std::fs::write(&path, r#"{"backup_suffix": ".orig"}"#).expect("write");
        let settings = PatchSettings::load(&path).expect("load");
        assert_eq!(settings.backup_suffix, ".orig");

        let missing = PatchSettings::load(&dir.path().join("absent.json")).expect_err("missing");
        assert!(matches!(missing, KeyfixError::Io { op: IoOp::Read, .. }));
    }

    #[test]
    fn default_path_layout() {
        let path = default_controls_path(Path::new("/home/user/AppData/Local"));
        assert_eq!(
            path,
            PathBuf::from("/home/user/AppData/Local/EA Games/Dead Space 2/controls.rmp")
        );
    }

    #[test]
    fn explicit_path_wins_over_data_dir() {
        let settings = PatchSettings::builder()
            .controls_path("/games/controls.rmp")
            .build();
        assert_eq!(
            settings.resolve_controls_path().expect("resolve"),
            PathBuf::from("/games/controls.rmp")
        );
    }
}
