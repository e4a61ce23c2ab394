//! Idle Clicker game state definitions.

use crate::i18n::Language;

/// Level owned for a single catalog upgrade.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OwnedUpgrade {
    pub id: u32,
    pub level: u32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Settings {
    pub language: Language,
    pub show_extended_points: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tab {
    Home,
    Upgrades,
    Achievements,
    Settings,
}

impl Tab {
    pub fn all() -> &'static [Tab] {
        &[Tab::Home, Tab::Upgrades, Tab::Achievements, Tab::Settings]
    }

    pub fn i18n_key(self) -> &'static str {
        match self {
            Tab::Home => "nav.home",
            Tab::Upgrades => "nav.upgrades",
            Tab::Achievements => "nav.achievements",
            Tab::Settings => "nav.settings",
        }
    }

    pub fn key(self) -> char {
        match self {
            Tab::Home => '1',
            Tab::Upgrades => '2',
            Tab::Achievements => '3',
            Tab::Settings => '4',
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

/// Transient message shown at the bottom of the content area.
#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub ticks_left: u32,
}

/// Full state of an Idle Clicker session.
pub struct ClickerState {
    /// Spendable points. Never negative.
    pub points: f64,
    /// Points earned over the whole save, unaffected by spending.
    pub points_all_time: f64,
    pub total_clicks: u64,
    /// Owned upgrades in purchase order.
    pub upgrades: Vec<OwnedUpgrade>,
    pub settings: Settings,
    /// Ids of unlocked achievements, in unlock order.
    pub achievements: Vec<String>,

    // Session-only state, not persisted.
    pub auto_clicker_active: bool,
    /// Ticks accumulated toward the next auto-click.
    pub auto_click_elapsed: u32,
    /// Ticks until the click button accepts input again.
    pub cooldown_ticks: u32,
    pub tab: Tab,
    pub toast: Option<Toast>,
    /// Set by the first reset press; the second press erases the save.
    pub reset_armed: bool,
    /// Set whenever persisted fields change.
    pub dirty: bool,
}

impl ClickerState {
    pub fn new() -> Self {
        Self {
            points: 0.0,
            points_all_time: 0.0,
            total_clicks: 0,
            upgrades: Vec::new(),
            settings: Settings::default(),
            achievements: Vec::new(),
            auto_clicker_active: false,
            auto_click_elapsed: 0,
            cooldown_ticks: 0,
            tab: Tab::Home,
            toast: None,
            reset_armed: false,
            dirty: false,
        }
    }

    pub fn level_of(&self, id: u32) -> u32 {
        self.upgrades
            .iter()
            .find(|u| u.id == id)
            .map_or(0, |u| u.level)
    }

    pub fn set_level(&mut self, id: u32, level: u32) {
        match self.upgrades.iter_mut().find(|u| u.id == id) {
            Some(owned) => owned.level = level,
            None => self.upgrades.push(OwnedUpgrade { id, level }),
        }
    }

    pub fn has_achievement(&self, id: &str) -> bool {
        self.achievements.iter().any(|a| a == id)
    }

    /// Credit points earned by clicking or the auto-clicker.
    pub fn earn(&mut self, amount: f64) {
        if amount <= 0.0 || !amount.is_finite() {
            return;
        }
        self.points += amount;
        self.points_all_time += amount;
        self.dirty = true;
    }

    pub fn show_toast(&mut self, message: String, kind: ToastKind, ticks: u32) {
        self.toast = Some(Toast {
            message,
            kind,
            ticks_left: ticks,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_is_empty() {
        let state = ClickerState::new();
        assert_eq!(state.points, 0.0);
        assert!(state.upgrades.is_empty());
        assert_eq!(state.tab, Tab::Home);
        assert!(!state.dirty);
    }

    #[test]
    fn set_level_inserts_then_updates() {
        let mut state = ClickerState::new();
        assert_eq!(state.level_of(3), 0);
        state.set_level(3, 1);
        state.set_level(3, 2);
        assert_eq!(state.level_of(3), 2);
        assert_eq!(state.upgrades.len(), 1);
    }

    #[test]
    fn earn_tracks_all_time_and_dirty() {
        let mut state = ClickerState::new();
        state.earn(12.0);
        state.points -= 10.0;
        state.earn(3.0);
        assert!((state.points - 5.0).abs() < 1e-9);
        assert!((state.points_all_time - 15.0).abs() < 1e-9);
        assert!(state.dirty);
    }

    #[test]
    fn earn_ignores_non_positive() {
        let mut state = ClickerState::new();
        state.earn(-5.0);
        state.earn(f64::NAN);
        assert_eq!(state.points, 0.0);
        assert!(!state.dirty);
    }

    #[test]
    fn tab_keys_are_unique() {
        let mut keys: Vec<char> = Tab::all().iter().map(|t| t.key()).collect();
        keys.dedup();
        assert_eq!(keys.len(), Tab::all().len());
    }
}
