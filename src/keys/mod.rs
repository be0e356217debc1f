//! Key capture: virtual-key/scan-code tables, the accept policy, and the chooser state.

pub mod capture;
pub mod codes;
pub mod policy;

pub use capture::{CaptureInput, CaptureState, HotkeyCapture};
pub use codes::{ScanCode, VirtualKey};
pub use policy::{
    HotkeyPolicy, KeyEvent, Modifiers, RejectionReason, ValidatedKeyCode, validate_key_event,
};
