//! Achievement definitions and unlock checks.

use super::catalog::{Catalog, UpgradeKind};
use super::state::ClickerState;

pub struct Achievement {
    /// Stable id, persisted in user data.
    pub id: &'static str,
    /// Prefix of the `.name` / `.desc` translation keys.
    pub i18n_key: &'static str,
    condition: fn(&ClickerState, &Catalog) -> bool,
}

impl Achievement {
    pub fn name_key(&self) -> String {
        format!("{}.name", self.i18n_key)
    }

    pub fn desc_key(&self) -> String {
        format!("{}.desc", self.i18n_key)
    }

    pub fn is_met(&self, state: &ClickerState, catalog: &Catalog) -> bool {
        (self.condition)(state, catalog)
    }
}

pub static ACHIEVEMENTS: &[Achievement] = &[
    Achievement {
        id: "first_click",
        i18n_key: "achievements.firstClick",
        condition: |s, _| s.total_clicks >= 1,
    },
    Achievement {
        id: "hundred_clicks",
        i18n_key: "achievements.hundredClicks",
        condition: |s, _| s.total_clicks >= 100,
    },
    Achievement {
        id: "thousand_clicks",
        i18n_key: "achievements.thousandClicks",
        condition: |s, _| s.total_clicks >= 1_000,
    },
    Achievement {
        id: "thousand_points",
        i18n_key: "achievements.thousandPoints",
        condition: |s, _| s.points_all_time >= 1_000.0,
    },
    Achievement {
        id: "million_points",
        i18n_key: "achievements.millionPoints",
        condition: |s, _| s.points_all_time >= 1_000_000.0,
    },
    Achievement {
        id: "first_upgrade",
        i18n_key: "achievements.firstUpgrade",
        condition: |s, _| s.upgrades.iter().any(|u| u.level > 0),
    },
    Achievement {
        id: "maxed_upgrade",
        i18n_key: "achievements.maxedUpgrade",
        condition: |s, c| {
            s.upgrades
                .iter()
                .any(|u| c.get(u.id).is_some_and(|def| def.is_maxed(u.level)))
        },
    },
    Achievement {
        id: "automation",
        i18n_key: "achievements.automation",
        condition: |s, c| {
            c.iter()
                .any(|def| def.kind == UpgradeKind::AutoClicker && s.level_of(def.id) > 0)
        },
    },
];

pub fn find(id: &str) -> Option<&'static Achievement> {
    ACHIEVEMENTS.iter().find(|a| a.id == id)
}

/// Unlock every achievement whose condition now holds. Returns the newly
/// unlocked ones; already unlocked achievements are never reported twice.
pub fn check_achievements(
    state: &mut ClickerState,
    catalog: &Catalog,
) -> Vec<&'static Achievement> {
    let newly: Vec<&'static Achievement> = ACHIEVEMENTS
        .iter()
        .filter(|a| !state.has_achievement(a.id) && a.is_met(state, catalog))
        .collect();
    for a in &newly {
        log::info!("achievement unlocked: {}", a.id);
        state.achievements.push(a.id.to_string());
    }
    if !newly.is_empty() {
        state.dirty = true;
    }
    newly
}
