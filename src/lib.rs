#![deny(clippy::all, clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![cfg_attr(
    test,
    allow(clippy::cast_possible_truncation, clippy::uninlined_format_args)
)]
#![allow(clippy::module_name_repetitions)]
//
// Documentation lints: error and panic sections would repeat the `KeyfixError` docs.
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
//
// Offsets and scan codes are clearer as hex literals.
#![allow(clippy::unreadable_literal)]

//! `keyfix-core` rebinds the Dead Space 2 respec key.
//!
//! The game stores the key as a single scan code at a fixed offset of `controls.rmp`. This
//! crate validates the file, reads the code, turns a captured key press into a new code,
//! and writes it back with a first-write-wins backup and read-back verification.

/// The keyfix-core crate version (matches `Cargo.toml`).
pub const KEYFIX_CORE_VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod constants;
pub mod controls;
pub mod error;
pub mod guard;
pub mod keys;
mod lock;
pub mod patch;
pub mod settings;

pub use constants::*;
pub use controls::ControlsFile;
pub use error::{IoOp, KeyfixError, Result};
pub use guard::{GuardReport, validate};
pub use keys::{
    CaptureInput, CaptureState, HotkeyCapture, HotkeyPolicy, KeyEvent, Modifiers,
    RejectionReason, ScanCode, ValidatedKeyCode, VirtualKey, validate_key_event,
};
pub use lock::{FileLock, LockMode};
pub use patch::{
    BackupOutcome, PatchMedium, PatchReport, backup_path, ensure_backup, patch_and_verify,
    read_byte, write_byte,
};
pub use settings::{PatchSettings, PatchSettingsBuilder, default_controls_path};
