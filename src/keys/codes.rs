//! Windows virtual-key codes and their set-1 scan codes.
//!
//! The table mirrors what `MapVirtualKey` returns for a US layout: `VK_TO_VSC` for the
//! forward direction, `VSC_TO_VK` for the reverse. Several keys share a scan code (the
//! numpad and the navigation cluster, left and right modifiers); the reverse lookup picks
//! the first row that carries the code, so row order matters.

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// A Windows virtual-key code (`VK_*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VirtualKey(pub u8);

/// A set-1 keyboard scan code, the value stored in the controls file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScanCode(pub u8);

impl VirtualKey {
    pub const NONE: Self = Self(0x00);
    pub const TAB: Self = Self(0x09);
    pub const SHIFT: Self = Self(0x10);
    pub const CONTROL: Self = Self(0x11);
    pub const MENU: Self = Self(0x12);
    pub const PAUSE: Self = Self(0x13);
    pub const ESCAPE: Self = Self(0x1B);
    pub const SPACE: Self = Self(0x20);
    pub const INSERT: Self = Self(0x2D);
    pub const A: Self = Self(0x41);
    pub const E: Self = Self(0x45);
    pub const LWIN: Self = Self(0x5B);
    pub const RWIN: Self = Self(0x5C);
    pub const APPS: Self = Self(0x5D);
    pub const NUMPAD0: Self = Self(0x60);
    pub const F1: Self = Self(0x70);
    pub const F13: Self = Self(0x7C);
    pub const F24: Self = Self(0x87);
    pub const SEPARATOR: Self = Self(0x6C);
    pub const NUMLOCK: Self = Self(0x90);
    pub const LSHIFT: Self = Self(0xA0);
    pub const RSHIFT: Self = Self(0xA1);
    pub const LCONTROL: Self = Self(0xA2);
    pub const RCONTROL: Self = Self(0xA3);
    pub const LMENU: Self = Self(0xA4);
    pub const RMENU: Self = Self(0xA5);
}

struct KeyRow {
    vk: u8,
    scan: u8,
    name: &'static str,
}

const fn row(vk: u8, scan: u8, name: &'static str) -> KeyRow {
    KeyRow { vk, scan, name }
}

#[rustfmt::skip]
static KEY_ROWS: &[KeyRow] = &[
    row(0x08, 0x0E, "Backspace"), row(0x09, 0x0F, "Tab"),       row(0x0D, 0x1C, "Enter"),
    row(0x10, 0x2A, "Shift"),     row(0x11, 0x1D, "Ctrl"),      row(0x12, 0x38, "Alt"),
    row(0x14, 0x3A, "Caps Lock"), row(0x1B, 0x01, "Esc"),       row(0x20, 0x39, "Space"),
    // navigation cluster before the numpad so shared codes resolve to it
    row(0x21, 0x49, "Page Up"),   row(0x22, 0x51, "Page Down"), row(0x23, 0x4F, "End"),
    row(0x24, 0x47, "Home"),      row(0x25, 0x4B, "Left"),      row(0x26, 0x48, "Up"),
    row(0x27, 0x4D, "Right"),     row(0x28, 0x50, "Down"),      row(0x2C, 0x54, "Print Screen"),
    row(0x2D, 0x52, "Insert"),    row(0x2E, 0x53, "Delete"),    row(0x0C, 0x4C, "Clear"),
    row(0x30, 0x0B, "0"), row(0x31, 0x02, "1"), row(0x32, 0x03, "2"), row(0x33, 0x04, "3"),
    row(0x34, 0x05, "4"), row(0x35, 0x06, "5"), row(0x36, 0x07, "6"), row(0x37, 0x08, "7"),
    row(0x38, 0x09, "8"), row(0x39, 0x0A, "9"),
    row(0x41, 0x1E, "A"), row(0x42, 0x30, "B"), row(0x43, 0x2E, "C"), row(0x44, 0x20, "D"),
    row(0x45, 0x12, "E"), row(0x46, 0x21, "F"), row(0x47, 0x22, "G"), row(0x48, 0x23, "H"),
    row(0x49, 0x17, "I"), row(0x4A, 0x24, "J"), row(0x4B, 0x25, "K"), row(0x4C, 0x26, "L"),
    row(0x4D, 0x32, "M"), row(0x4E, 0x31, "N"), row(0x4F, 0x18, "O"), row(0x50, 0x19, "P"),
    row(0x51, 0x10, "Q"), row(0x52, 0x13, "R"), row(0x53, 0x1F, "S"), row(0x54, 0x14, "T"),
    row(0x55, 0x16, "U"), row(0x56, 0x2F, "V"), row(0x57, 0x11, "W"), row(0x58, 0x2D, "X"),
    row(0x59, 0x15, "Y"), row(0x5A, 0x2C, "Z"),
    row(0x5B, 0x5B, "Left Windows"), row(0x5C, 0x5C, "Right Windows"), row(0x5D, 0x5D, "Menu"),
    row(0x60, 0x52, "Num 0"), row(0x61, 0x4F, "Num 1"), row(0x62, 0x50, "Num 2"),
    row(0x63, 0x51, "Num 3"), row(0x64, 0x4B, "Num 4"), row(0x65, 0x4C, "Num 5"),
    row(0x66, 0x4D, "Num 6"), row(0x67, 0x47, "Num 7"), row(0x68, 0x48, "Num 8"),
    row(0x69, 0x49, "Num 9"),
    row(0x6A, 0x37, "Num *"), row(0x6B, 0x4E, "Num +"), row(0x6D, 0x4A, "Num -"),
    row(0x6E, 0x53, "Num ."),
    row(0x70, 0x3B, "F1"), row(0x71, 0x3C, "F2"), row(0x72, 0x3D, "F3"),  row(0x73, 0x3E, "F4"),
    row(0x74, 0x3F, "F5"), row(0x75, 0x40, "F6"), row(0x76, 0x41, "F7"),  row(0x77, 0x42, "F8"),
    row(0x78, 0x43, "F9"), row(0x79, 0x44, "F10"), row(0x7A, 0x57, "F11"), row(0x7B, 0x58, "F12"),
    // Num Lock before Pause: both report 0x45 and the reverse lookup yields Num Lock
    row(0x90, 0x45, "Num Lock"), row(0x13, 0x45, "Pause"), row(0x91, 0x46, "Scroll Lock"),
    row(0xA0, 0x2A, "Left Shift"), row(0xA1, 0x36, "Right Shift"),
    row(0xA2, 0x1D, "Left Ctrl"),  row(0xA3, 0x1D, "Right Ctrl"),
    row(0xA4, 0x38, "Left Alt"),   row(0xA5, 0x38, "Right Alt"),
    row(0xBA, 0x27, ";"), row(0xBB, 0x0D, "="), row(0xBC, 0x33, ","), row(0xBD, 0x0C, "-"),
    row(0xBE, 0x34, "."), row(0xBF, 0x35, "/"), row(0xC0, 0x29, "`"), row(0xDB, 0x1A, "["),
    row(0xDC, 0x2B, "\\"), row(0xDD, 0x1B, "]"), row(0xDE, 0x28, "'"), row(0xE2, 0x56, "<>"),
    row(0x6F, 0x35, "Num /"),
    // extended and layout-specific keys; rows above win any shared code
    row(0x7C, 0x64, "F13"), row(0x7D, 0x65, "F14"), row(0x7E, 0x66, "F15"), row(0x7F, 0x67, "F16"),
    row(0x80, 0x68, "F17"), row(0x81, 0x69, "F18"), row(0x82, 0x6A, "F19"), row(0x83, 0x6B, "F20"),
    row(0x84, 0x6C, "F21"), row(0x85, 0x6D, "F22"), row(0x86, 0x6E, "F23"), row(0x87, 0x76, "F24"),
    row(0x6C, 0x7E, "Num ,"),
    row(0xC1, 0x73, "ABNT C1"), row(0xC2, 0x7E, "ABNT C2"), row(0xDF, 0x29, "OEM 8"),
    row(0x03, 0x46, "Break"), row(0x2F, 0x63, "Help"), row(0x5F, 0x5F, "Sleep"),
    row(0xFB, 0x62, "Zoom"),
    // E0-prefixed: only the low byte is stored
    row(0xA6, 0x6A, "Browser Back"),      row(0xA7, 0x69, "Browser Forward"),
    row(0xA8, 0x67, "Browser Refresh"),   row(0xA9, 0x68, "Browser Stop"),
    row(0xAA, 0x65, "Browser Search"),    row(0xAB, 0x66, "Browser Favorites"),
    row(0xAC, 0x32, "Browser Home"),      row(0xAD, 0x20, "Volume Mute"),
    row(0xAE, 0x2E, "Volume Down"),       row(0xAF, 0x30, "Volume Up"),
    row(0xB0, 0x19, "Next Track"),        row(0xB1, 0x10, "Previous Track"),
    row(0xB2, 0x24, "Stop Media"),        row(0xB3, 0x22, "Play/Pause"),
    row(0xB4, 0x6C, "Mail"),              row(0xB5, 0x6D, "Select Media"),
    row(0xB6, 0x6B, "Launch App 1"),      row(0xB7, 0x21, "Launch App 2"),
];

static BY_VK: Lazy<HashMap<u8, &'static KeyRow>> =
    Lazy::new(|| KEY_ROWS.iter().map(|r| (r.vk, r)).collect());

static BY_SCAN: Lazy<HashMap<u8, &'static KeyRow>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for r in KEY_ROWS {
        map.entry(r.scan).or_insert(r);
    }
    map
});

impl VirtualKey {
    /// Scan code for this key, `None` for keys with no physical mapping.
    #[must_use]
    pub fn to_scan_code(self) -> Option<ScanCode> {
        BY_VK.get(&self.0).map(|r| ScanCode(r.scan))
    }

    #[must_use]
    pub fn name(self) -> Option<&'static str> {
        BY_VK.get(&self.0).map(|r| r.name)
    }

    /// Shift, Ctrl or Alt in either the generic or the left/right form.
    #[must_use]
    pub fn is_modifier(self) -> bool {
        matches!(self.0, 0x10..=0x12 | 0xA0..=0xA5)
    }
}

impl ScanCode {
    /// Virtual key that produces this scan code, used to show the stored binding.
    #[must_use]
    pub fn to_virtual_key(self) -> Option<VirtualKey> {
        BY_SCAN.get(&self.0).map(|r| VirtualKey(r.vk))
    }
}

impl fmt::Display for VirtualKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "VK {:#04x}", self.0),
        }
    }
}

impl fmt::Display for ScanCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_virtual_key() {
            Some(vk) => write!(f, "{vk}"),
            None => write!(f, "scan {:#04x}", self.0),
        }
    }
}

impl From<ScanCode> for u8 {
    fn from(code: ScanCode) -> Self {
        code.0
    }
}
