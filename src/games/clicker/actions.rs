//! Semantic action IDs for Idle Clicker click targets.
//!
//! Registered during render and dispatched back through `InputEvent::Click`.

// ── Home ────────────────────────────────────────────────────────
pub const CLICK: u16 = 0;
pub const TOGGLE_AUTO_CLICKER: u16 = 1;

// ── Navigation ──────────────────────────────────────────────────
pub const TAB_HOME: u16 = 10;
pub const TAB_UPGRADES: u16 = 11;
pub const TAB_ACHIEVEMENTS: u16 = 12;
pub const TAB_SETTINGS: u16 = 13;

// ── Upgrade purchase (base + display index) ─────────────────────
pub const BUY_UPGRADE_BASE: u16 = 100;

// ── Settings ────────────────────────────────────────────────────
pub const CYCLE_LANGUAGE: u16 = 200;
pub const TOGGLE_EXTENDED_POINTS: u16 = 201;
pub const RESET_PROGRESS: u16 = 202;

/// Keys `a`..`i` buy the upgrade shown at that position.
pub const BUY_KEYS: &str = "abcdefghi";

pub fn buy_key(display_idx: usize) -> Option<char> {
    BUY_KEYS.chars().nth(display_idx)
}
