//! Which captured key presses may be stored as the respec key.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::codes::{ScanCode, VirtualKey};

/// Modifier keys held while a key went down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Modifiers {
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub control: bool,
    #[serde(default)]
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        alt: false,
    };
    pub const SHIFT: Self = Self {
        shift: true,
        control: false,
        alt: false,
    };
    pub const CONTROL: Self = Self {
        shift: false,
        control: true,
        alt: false,
    };
    pub const ALT: Self = Self {
        shift: false,
        control: false,
        alt: true,
    };

    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Self::NONE
    }

    /// The modifier set a modifier key contributes on its own.
    #[must_use]
    pub fn of_key(key: VirtualKey) -> Option<Self> {
        match key {
            VirtualKey::SHIFT | VirtualKey::LSHIFT | VirtualKey::RSHIFT => Some(Self::SHIFT),
            VirtualKey::CONTROL | VirtualKey::LCONTROL | VirtualKey::RCONTROL => {
                Some(Self::CONTROL)
            }
            VirtualKey::MENU | VirtualKey::LMENU | VirtualKey::RMENU => Some(Self::ALT),
            _ => None,
        }
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<&str> = [
            (self.control, "Ctrl"),
            (self.alt, "Alt"),
            (self.shift, "Shift"),
        ]
        .into_iter()
        .filter_map(|(held, label)| held.then_some(label))
        .collect();
        if parts.is_empty() {
            f.write_str("None")
        } else {
            f.write_str(&parts.join("+"))
        }
    }
}

/// A raw key-down as reported by the host toolkit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: VirtualKey,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    #[must_use]
    pub fn new(key: VirtualKey, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// Fold modifier-only presses into a consistent shape.
    ///
    /// Pressing just Ctrl reports key=Ctrl with modifiers=Ctrl; that becomes key=Ctrl with
    /// no modifiers. A modifier key pressed while a different modifier is held carries no
    /// key at all.
    #[must_use]
    pub fn normalized(self) -> Self {
        let Some(own) = Modifiers::of_key(self.key) else {
            return self;
        };
        if self.modifiers == own {
            Self::new(self.key, Modifiers::NONE)
        } else if !self.modifiers.is_empty() {
            Self::new(VirtualKey::NONE, self.modifiers)
        } else {
            self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RejectionReason {
    #[error("no key pressed")]
    NoKey,
    #[error("modifier keys are not supported ({0} held)")]
    ModifiersHeld(Modifiers),
    #[error("{0} cannot be used as the respec key")]
    ReservedKey(VirtualKey),
    #[error("{0} has no keyboard scan code")]
    NoScanCode(VirtualKey),
}

/// A key press accepted by the policy, ready to be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedKeyCode {
    pub key: VirtualKey,
    pub scan_code: ScanCode,
}

/// Reject rules applied to captured key presses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HotkeyPolicy {
    pub require_no_modifiers: bool,
    pub reserved: Vec<VirtualKey>,
}

impl Default for HotkeyPolicy {
    fn default() -> Self {
        Self {
            require_no_modifiers: true,
            reserved: vec![
                VirtualKey::LWIN,
                VirtualKey::RWIN,
                VirtualKey::APPS,
                VirtualKey::NUMLOCK,
                VirtualKey::ESCAPE,
                VirtualKey::PAUSE,
                VirtualKey::TAB,
            ],
        }
    }
}

impl HotkeyPolicy {
    #[must_use]
    pub fn is_reserved(&self, key: VirtualKey) -> bool {
        self.reserved.contains(&key)
    }
}

/// Decide whether a raw key event can be stored, and translate it to a scan code.
pub fn validate_key_event(
    event: KeyEvent,
    policy: &HotkeyPolicy,
) -> Result<ValidatedKeyCode, RejectionReason> {
    let event = event.normalized();
    if event.key == VirtualKey::NONE {
        return Err(RejectionReason::NoKey);
    }
    if policy.require_no_modifiers && !event.modifiers.is_empty() {
        return Err(RejectionReason::ModifiersHeld(event.modifiers));
    }
    if policy.is_reserved(event.key) {
        return Err(RejectionReason::ReservedKey(event.key));
    }
    let scan_code = event
        .key
        .to_scan_code()
        .ok_or(RejectionReason::NoScanCode(event.key))?;
    Ok(ValidatedKeyCode {
        key: event.key,
        scan_code,
    })
}
