//! Fixed layout facts about the Dead Space 2 `controls.rmp` file.

/// Exact size of a valid `controls.rmp`, in bytes.
pub const CONTROLS_FILE_LEN: u64 = 1008;

/// Offset of the respec key scan code.
pub const RESPEC_KEY_OFFSET: u64 = 0x228;

/// Appended to the controls file name to form the backup name.
pub const BACKUP_SUFFIX: &str = ".bak";

pub const CONTROLS_FILE_NAME: &str = "controls.rmp";

/// Directories under the per-user local data folder that hold the controls file.
pub const CONTROLS_DIR_COMPONENTS: [&str; 2] = ["EA Games", "Dead Space 2"];
