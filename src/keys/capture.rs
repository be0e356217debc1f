//! Display-free hotkey chooser state.
//!
//! The host UI forwards key-down/key-up notifications as [`CaptureInput`]s; the chooser
//! moves between `Idle`, `CapturingCombo` and `Validated` and never touches the toolkit.

use super::codes::{ScanCode, VirtualKey};
use super::policy::{
    HotkeyPolicy, KeyEvent, Modifiers, RejectionReason, ValidatedKeyCode, validate_key_event,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Idle,
    /// A combination is being held or was rejected; `rejection` says why it cannot be saved.
    CapturingCombo {
        key: VirtualKey,
        modifiers: Modifiers,
        rejection: Option<RejectionReason>,
    },
    Validated(ValidatedKeyCode),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureInput {
    KeyDown(KeyEvent),
    /// A key went up; `all_released` is true once no key or modifier remains held.
    KeyUp {
        all_released: bool,
    },
    Reset,
    /// Load the code currently stored in the controls file.
    Preset(ScanCode),
}

#[derive(Debug, Clone)]
pub struct HotkeyCapture {
    policy: HotkeyPolicy,
    state: CaptureState,
}

impl Default for HotkeyCapture {
    fn default() -> Self {
        Self::new(HotkeyPolicy::default())
    }
}

impl HotkeyCapture {
    #[must_use]
    pub fn new(policy: HotkeyPolicy) -> Self {
        Self {
            policy,
            state: CaptureState::Idle,
        }
    }

    #[must_use]
    pub fn state(&self) -> &CaptureState {
        &self.state
    }

    #[must_use]
    pub fn policy(&self) -> &HotkeyPolicy {
        &self.policy
    }

    pub fn handle(&mut self, input: CaptureInput) -> &CaptureState {
        let next = match input {
            CaptureInput::KeyDown(event) => self.resolve(event.normalized()),
            CaptureInput::KeyUp { all_released } => match self.state {
                CaptureState::CapturingCombo {
                    key: VirtualKey::NONE,
                    ..
                } if all_released => CaptureState::Idle,
                state => state,
            },
            CaptureInput::Reset => CaptureState::Idle,
            CaptureInput::Preset(scan_code) => match scan_code.to_virtual_key() {
                Some(key) => match self.resolve(KeyEvent::new(key, Modifiers::NONE)) {
                    // keep the stored byte even if the reverse mapping is ambiguous
                    CaptureState::Validated(valid) => CaptureState::Validated(ValidatedKeyCode {
                        key: valid.key,
                        scan_code,
                    }),
                    other => other,
                },
                None => {
                    tracing::debug!(scan_code = scan_code.0, "stored scan code has no key");
                    CaptureState::Idle
                }
            },
        };
        self.state = next;
        &self.state
    }

    fn resolve(&self, event: KeyEvent) -> CaptureState {
        match validate_key_event(event, &self.policy) {
            Ok(valid) => CaptureState::Validated(valid),
            Err(reason) => CaptureState::CapturingCombo {
                key: event.key,
                modifiers: event.modifiers,
                rejection: Some(reason),
            },
        }
    }

    #[must_use]
    pub fn can_save(&self) -> bool {
        matches!(self.state, CaptureState::Validated(_))
    }

    /// Scan code to write, only once the chooser holds an accepted key.
    #[must_use]
    pub fn scan_code(&self) -> Option<ScanCode> {
        match self.state {
            CaptureState::Validated(valid) => Some(valid.scan_code),
            _ => None,
        }
    }

    /// Text for the chooser box, e.g. `Ctrl+A` or `F5`.
    #[must_use]
    pub fn display_text(&self) -> String {
        match self.state {
            CaptureState::Idle => "None".to_string(),
            CaptureState::Validated(valid) => valid.key.to_string(),
            CaptureState::CapturingCombo { key, modifiers, .. } => {
                match (modifiers.is_empty(), key == VirtualKey::NONE) {
                    (true, true) => "None".to_string(),
                    (true, false) => key.to_string(),
                    (false, true) => modifiers.to_string(),
                    (false, false) => format!("{modifiers}+{key}"),
                }
            }
        }
    }
}
