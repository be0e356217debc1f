//! Validated handle on the game's `controls.rmp`.
//!
//! Construction runs the size guard and reads the stored respec key, so a `ControlsFile`
//! only exists for a file that passed validation. Failures come back as errors for the
//! caller to present; nothing here exits the process.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::guard;
use crate::keys::{CaptureInput, HotkeyCapture, ScanCode};
use crate::patch::{self, PatchReport, backup_path};
use crate::settings::PatchSettings;

#[derive(Debug, Clone)]
pub struct ControlsFile {
    path: PathBuf,
    settings: PatchSettings,
    current: ScanCode,
}

impl ControlsFile {
    pub fn open(settings: &PatchSettings) -> Result<Self> {
        settings.check()?;
        let path = settings.resolve_controls_path()?;
        guard::validate(&path, settings.expected_len)?;
        let current = ScanCode(patch::read_byte(&path, settings.key_offset)?);
        tracing::info!(
            path = %path.display(),
            scan_code = current.0,
            key = %current,
            "opened controls file"
        );
        Ok(Self {
            path,
            settings: settings.clone(),
            current,
        })
    }

    /// Open the file at `path` with the default layout.
    pub fn open_path<P: Into<PathBuf>>(path: P) -> Result<Self> {
        Self::open(&PatchSettings::builder().controls_path(path).build())
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn backup_path(&self) -> PathBuf {
        backup_path(&self.path, &self.settings.backup_suffix)
    }

    /// Scan code read at open time, or written by the last successful [`Self::save`].
    #[must_use]
    pub fn current_scan_code(&self) -> ScanCode {
        self.current
    }

    /// Re-read the stored code from disk.
    pub fn reload(&mut self) -> Result<ScanCode> {
        guard::validate(&self.path, self.settings.expected_len)?;
        self.current = ScanCode(patch::read_byte(&self.path, self.settings.key_offset)?);
        Ok(self.current)
    }

    /// A chooser using the configured policy, pre-populated with the stored key.
    #[must_use]
    pub fn chooser(&self) -> HotkeyCapture {
        let mut capture = HotkeyCapture::new(self.settings.policy.clone());
        capture.handle(CaptureInput::Preset(self.current));
        capture
    }

    /// Write `code` as the new respec key.
    ///
    /// The size guard runs again first, since the game may have rewritten the file since it
    /// was opened.
    pub fn save(&mut self, code: ScanCode) -> Result<PatchReport> {
        guard::validate(&self.path, self.settings.expected_len)?;
        let report = patch::write_byte_with_backup(
            &self.path,
            self.settings.key_offset,
            code.0,
            &self.settings.backup_suffix,
        )?;
        self.current = code;
        tracing::info!(key = %code, changed = report.changed(), "respec key saved");
        Ok(report)
    }
}
