//! Display texts and key bindings for the HMI screens.
//!
//! The display is 2x16; longer texts are truncated by the device.

/// Home screen, top row.
pub const HOME_TOP: &str = "+:Open door";

/// Home screen, bottom row.
pub const HOME_BOTTOM: &str = "-:Change Password";

/// Prompt for an authentication pass.
pub const PROMPT_PASSWORD: &str = "enter password";

/// Prompt for a new credential (provisioning and change).
pub const PROMPT_NEW_PASSWORD: &str = "enter new pass";

/// Prompt for the provisioning confirmation pass.
pub const PROMPT_CONFIRM: &str = "one more time";

/// Notice shown on any per-keystroke mismatch.
pub const NOTICE_MISMATCH: &str = "unmatched";

/// Notice shown while the alarm is sounding.
pub const NOTICE_ALARM: &str = "!! EMERGENCY !!";

/// Door cycle phases.
pub const NOTICE_OPENING: &str = "Opening ...";
pub const NOTICE_HOLDING: &str = "Holding ...";
pub const NOTICE_CLOSING: &str = "Closing ...";

/// Home key that requests the door cycle.
pub const KEY_OPEN_DOOR: char = '+';

/// Home key that requests a credential change.
pub const KEY_CHANGE_CREDENTIAL: char = '-';

/// Echo character for masked credential entry.
pub const MASK_CHAR: char = '*';
