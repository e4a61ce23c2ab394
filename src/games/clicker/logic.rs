//! Idle Clicker game logic, pure functions, fully testable.

use crate::config::GameConfig;
use crate::format::format_number;
use crate::i18n::{self, t, tr};

use super::achievements::check_achievements;
use super::catalog::{Catalog, UpgradeDef, UpgradeKind};
use super::state::{ClickerState, Tab, ToastKind};

/// Per-click yield derived from owned upgrades.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClickBonus {
    /// Flat points added after the multiplier.
    pub bonus: f64,
    pub multiplier: f64,
}

impl ClickBonus {
    pub fn per_click(&self) -> f64 {
        self.multiplier + self.bonus
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PurchaseError {
    #[error("upgrade {0} is not in the catalog")]
    UnknownUpgrade(u32),
    #[error("{name} is already at max level {max_level}")]
    MaxLevel { name: String, max_level: u32 },
    #[error("need {cost} points, have {points}")]
    InsufficientPoints { cost: f64, points: f64 },
}

impl PurchaseError {
    /// Localized message for the failure toast.
    pub fn user_message(&self) -> String {
        match self {
            PurchaseError::UnknownUpgrade(_) => t("upgrades.unknownUpgrade"),
            PurchaseError::MaxLevel { name, .. } => tr("upgrades.atMaxLevel", &[("name", name)]),
            PurchaseError::InsufficientPoints { cost, .. } => {
                tr("upgrades.notEnoughPoints", &[("cost", &format_number(*cost))])
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Purchase {
    pub id: u32,
    pub new_level: u32,
    pub cost: f64,
}

/// One card in the upgrade shop.
pub struct UpgradeRow<'a> {
    pub def: &'a UpgradeDef,
    pub level: u32,
    pub cost: f64,
    pub affordable: bool,
    pub maxed: bool,
}

/// Owned upgrades with level > 0 that still exist in the catalog.
pub fn active_upgrades<'a>(
    state: &ClickerState,
    catalog: &'a Catalog,
) -> Vec<(&'a UpgradeDef, u32)> {
    state
        .upgrades
        .iter()
        .filter(|o| o.level > 0)
        .filter_map(|o| catalog.get(o.id).map(|def| (def, o.level)))
        .collect()
}

/// Combine click effects: max-style multipliers first, then multiplicative
/// boosts, then flat bonuses. The result does not depend on purchase order.
pub fn click_bonus(state: &ClickerState, catalog: &Catalog) -> ClickBonus {
    let owned = active_upgrades(state, catalog);
    let mut multiplier = 1.0_f64;
    let mut bonus = 0.0_f64;

    for (def, level) in &owned {
        let level = *level as f64;
        match def.kind {
            UpgradeKind::DoubleClick => multiplier = multiplier.max(level * 2.0),
            UpgradeKind::TripleClick => multiplier = multiplier.max(level * 3.0),
            _ => {}
        }
    }
    for (def, level) in &owned {
        if def.kind == UpgradeKind::MultiplierBoost {
            multiplier *= *level as f64 + 2.0;
        }
    }
    for (def, level) in &owned {
        if def.kind == UpgradeKind::MegaClicker {
            bonus += 5.0 * (*level as f64 + 1.0);
        }
    }

    ClickBonus { bonus, multiplier }
}

/// Manual click. Returns the points earned, or None while cooling down.
pub fn click(state: &mut ClickerState, catalog: &Catalog, config: &GameConfig) -> Option<f64> {
    if state.cooldown_ticks > 0 {
        return None;
    }
    let earned = click_bonus(state, catalog).per_click();
    state.earn(earned);
    state.total_clicks += 1;
    state.cooldown_ticks = config.cooldown_ticks();
    Some(earned)
}

pub fn auto_click_interval_ms(level: u32) -> u32 {
    1000u32.saturating_sub(level.saturating_mul(200)).max(500)
}

pub fn auto_click_reward(level: u32) -> f64 {
    10.0 * level as f64
}

pub fn auto_clicker_level(state: &ClickerState, catalog: &Catalog) -> u32 {
    catalog
        .auto_clicker()
        .map_or(0, |def| state.level_of(def.id))
}

/// Switch the auto-clicker on or off. Returns false when it is not owned.
pub fn toggle_auto_clicker(state: &mut ClickerState, catalog: &Catalog) -> bool {
    if auto_clicker_level(state, catalog) == 0 {
        log::debug!("auto-clicker toggle ignored: not owned");
        return false;
    }
    state.auto_clicker_active = !state.auto_clicker_active;
    state.auto_click_elapsed = 0;
    log::debug!("auto-clicker toggled: {}", state.auto_clicker_active);
    true
}

/// Advance the game by `delta_ticks` ticks.
pub fn tick(state: &mut ClickerState, catalog: &Catalog, config: &GameConfig, delta_ticks: u32) {
    if delta_ticks == 0 {
        return;
    }

    state.cooldown_ticks = state.cooldown_ticks.saturating_sub(delta_ticks);

    if let Some(toast) = &mut state.toast {
        toast.ticks_left = toast.ticks_left.saturating_sub(delta_ticks);
        if toast.ticks_left == 0 {
            state.toast = None;
        }
    }

    tick_auto_clicker(state, catalog, config, delta_ticks);

    let unlocked = check_achievements(state, catalog);
    if let Some(last) = unlocked.last() {
        let name = t(&last.name_key());
        state.show_toast(
            tr("achievements.unlocked", &[("name", &name)]),
            ToastKind::Info,
            config.toast_ticks(),
        );
    }
}

fn tick_auto_clicker(
    state: &mut ClickerState,
    catalog: &Catalog,
    config: &GameConfig,
    delta_ticks: u32,
) {
    if !state.auto_clicker_active {
        return;
    }
    let level = auto_clicker_level(state, catalog);
    if level == 0 {
        state.auto_clicker_active = false;
        state.auto_click_elapsed = 0;
        return;
    }

    let interval = config.ticks(auto_click_interval_ms(level)).max(1);
    state.auto_click_elapsed += delta_ticks;
    let fired = state.auto_click_elapsed / interval;
    state.auto_click_elapsed %= interval;
    if fired > 0 {
        let earned = auto_click_reward(level) * fired as f64;
        log::debug!("auto-clicker earned {earned} points ({fired} clicks)");
        state.earn(earned);
    }
}

/// Validate and apply a purchase: the upgrade must exist, be below its max
/// level, and be affordable at `cost * cost_multiplier^level`.
pub fn buy_upgrade(
    state: &mut ClickerState,
    catalog: &Catalog,
    id: u32,
) -> Result<Purchase, PurchaseError> {
    let def = catalog.get(id).ok_or(PurchaseError::UnknownUpgrade(id))?;
    let level = state.level_of(id);
    if def.is_maxed(level) {
        return Err(PurchaseError::MaxLevel {
            name: def.name.clone(),
            max_level: def.max_level,
        });
    }
    let cost = def.cost_at(level);
    if state.points < cost {
        return Err(PurchaseError::InsufficientPoints {
            cost,
            points: state.points,
        });
    }

    state.points = (state.points - cost).max(0.0);
    state.set_level(id, level + 1);
    state.dirty = true;
    if def.kind == UpgradeKind::AutoClicker {
        state.auto_click_elapsed = 0;
    }
    log::debug!(
        "bought {} -> level {}/{} for {cost}, {} points left",
        def.name,
        level + 1,
        def.max_level,
        state.points
    );

    Ok(Purchase {
        id,
        new_level: level + 1,
        cost,
    })
}

/// Purchase with toast feedback. Returns true on success.
pub fn purchase(state: &mut ClickerState, catalog: &Catalog, config: &GameConfig, id: u32) -> bool {
    match buy_upgrade(state, catalog, id) {
        Ok(p) => {
            let name = catalog.get(id).map(|d| d.name.as_str()).unwrap_or_default();
            let level = p.new_level.to_string();
            state.show_toast(
                tr("upgrades.purchaseSuccess", &[("name", name), ("level", &level)]),
                ToastKind::Success,
                config.toast_ticks(),
            );
            true
        }
        Err(e) => {
            log::debug!("purchase failed: {e}");
            state.show_toast(e.user_message(), ToastKind::Error, config.toast_ticks());
            false
        }
    }
}

/// Shop cards in display order (by rarity).
pub fn upgrade_rows<'a>(state: &ClickerState, catalog: &'a Catalog) -> Vec<UpgradeRow<'a>> {
    catalog
        .sorted_by_rarity()
        .into_iter()
        .map(|def| {
            let level = state.level_of(def.id);
            let cost = def.cost_at(level);
            let maxed = def.is_maxed(level);
            UpgradeRow {
                def,
                level,
                cost,
                affordable: !maxed && state.points >= cost,
                maxed,
            }
        })
        .collect()
}

/// Buy the shop card at `display_idx` (as ordered by `upgrade_rows`).
pub fn purchase_at(
    state: &mut ClickerState,
    catalog: &Catalog,
    config: &GameConfig,
    display_idx: usize,
) -> bool {
    let id = match catalog.sorted_by_rarity().get(display_idx) {
        Some(def) => def.id,
        None => return false,
    };
    purchase(state, catalog, config, id)
}

pub fn switch_tab(state: &mut ClickerState, tab: Tab) {
    state.tab = tab;
    state.reset_armed = false;
}

pub fn cycle_language(state: &mut ClickerState) {
    let next = state.settings.language.next();
    state.settings.language = next;
    i18n::set_lang(next);
    state.reset_armed = false;
    state.dirty = true;
}

pub fn toggle_extended_points(state: &mut ClickerState) {
    state.settings.show_extended_points = !state.settings.show_extended_points;
    state.reset_armed = false;
    state.dirty = true;
}

/// First call arms the reset, the second performs it. Returns true when the
/// progress was wiped; settings survive the reset.
pub fn request_reset(state: &mut ClickerState, config: &GameConfig) -> bool {
    if !state.reset_armed {
        state.reset_armed = true;
        state.show_toast(t("settings.resetConfirm"), ToastKind::Error, config.toast_ticks());
        return false;
    }

    let settings = state.settings.clone();
    *state = ClickerState::new();
    state.settings = settings;
    state.tab = Tab::Settings;
    state.show_toast(t("settings.resetDone"), ToastKind::Info, config.toast_ticks());
    log::info!("progress reset");
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::clicker::catalog::test_catalog;

    const DOUBLE: u32 = 1;
    const MEGA: u32 = 2;
    const TRIPLE: u32 = 3;
    const BOOST: u32 = 4;
    const AUTO: u32 = 5;

    fn setup() -> (ClickerState, Catalog, GameConfig) {
        (ClickerState::new(), test_catalog(), GameConfig::default())
    }

    #[test]
    fn bare_click_earns_one() {
        let (mut state, catalog, config) = setup();
        assert_eq!(click(&mut state, &catalog, &config), Some(1.0));
        assert!((state.points - 1.0).abs() < 1e-9);
        assert_eq!(state.total_clicks, 1);
    }

    #[test]
    fn click_ignored_during_cooldown() {
        let (mut state, catalog, config) = setup();
        click(&mut state, &catalog, &config);
        assert_eq!(click(&mut state, &catalog, &config), None);
        assert_eq!(state.total_clicks, 1);
        tick(&mut state, &catalog, &config, config.cooldown_ticks());
        assert_eq!(click(&mut state, &catalog, &config), Some(1.0));
    }

    #[test]
    fn double_and_triple_take_the_max() {
        let (mut state, catalog, _) = setup();
        state.set_level(DOUBLE, 2); // x4
        assert_eq!(click_bonus(&state, &catalog).multiplier, 4.0);
        state.set_level(TRIPLE, 1); // x3, smaller
        assert_eq!(click_bonus(&state, &catalog).multiplier, 4.0);
        state.set_level(TRIPLE, 2); // x6
        assert_eq!(click_bonus(&state, &catalog).multiplier, 6.0);
    }

    #[test]
    fn mega_clicker_adds_flat_bonus() {
        let (mut state, catalog, _) = setup();
        state.set_level(MEGA, 1);
        let b = click_bonus(&state, &catalog);
        assert_eq!(b.bonus, 10.0);
        assert_eq!(b.per_click(), 11.0);
        state.set_level(MEGA, 3);
        assert_eq!(click_bonus(&state, &catalog).bonus, 20.0);
    }

    #[test]
    fn multiplier_boost_applies_after_max() {
        let (mut state, catalog, _) = setup();
        // purchase order should not matter
        state.set_level(BOOST, 1);
        state.set_level(DOUBLE, 2);
        state.set_level(MEGA, 1);
        let b = click_bonus(&state, &catalog);
        assert_eq!(b.multiplier, 12.0); // max(1, 4) * 3
        assert_eq!(b.per_click(), 22.0);
    }

    #[test]
    fn auto_clicker_has_no_click_effect() {
        let (mut state, catalog, _) = setup();
        state.set_level(AUTO, 3);
        assert_eq!(click_bonus(&state, &catalog).per_click(), 1.0);
    }

    #[test]
    fn unknown_owned_ids_are_ignored() {
        let (mut state, catalog, _) = setup();
        state.set_level(99, 4);
        assert_eq!(click_bonus(&state, &catalog).per_click(), 1.0);
    }

    #[test]
    fn auto_click_interval_floors_at_500() {
        assert_eq!(auto_click_interval_ms(0), 1000);
        assert_eq!(auto_click_interval_ms(1), 800);
        assert_eq!(auto_click_interval_ms(2), 600);
        assert_eq!(auto_click_interval_ms(3), 500);
        assert_eq!(auto_click_interval_ms(5), 500);
        assert_eq!(auto_click_interval_ms(u32::MAX), 500);
    }

    #[test]
    fn toggle_requires_ownership() {
        let (mut state, catalog, _) = setup();
        assert!(!toggle_auto_clicker(&mut state, &catalog));
        assert!(!state.auto_clicker_active);
        state.set_level(AUTO, 1);
        assert!(toggle_auto_clicker(&mut state, &catalog));
        assert!(state.auto_clicker_active);
        assert!(toggle_auto_clicker(&mut state, &catalog));
        assert!(!state.auto_clicker_active);
    }

    #[test]
    fn auto_clicker_pays_per_interval() {
        let (mut state, catalog, config) = setup();
        state.set_level(AUTO, 1); // 800ms = 32 ticks, +10
        toggle_auto_clicker(&mut state, &catalog);
        tick(&mut state, &catalog, &config, 31);
        assert_eq!(state.points, 0.0);
        tick(&mut state, &catalog, &config, 1);
        assert_eq!(state.points, 10.0);
        // a long frame pays for every elapsed interval
        tick(&mut state, &catalog, &config, 64);
        assert_eq!(state.points, 30.0);
    }

    #[test]
    fn auto_clicker_idle_when_off() {
        let (mut state, catalog, config) = setup();
        state.set_level(AUTO, 2);
        tick(&mut state, &catalog, &config, 400);
        assert_eq!(state.points, 0.0);
    }

    #[test]
    fn auto_clicker_reward_scales_with_level() {
        let (mut state, catalog, config) = setup();
        state.set_level(AUTO, 3); // 500ms = 20 ticks, +30
        toggle_auto_clicker(&mut state, &catalog);
        tick(&mut state, &catalog, &config, 40);
        assert_eq!(state.points, 60.0);
    }

    #[test]
    fn buy_deducts_exact_cost_and_levels_up() {
        let (mut state, catalog, _) = setup();
        state.points = 175.0;
        let p = buy_upgrade(&mut state, &catalog, DOUBLE).unwrap();
        assert_eq!(p, Purchase { id: DOUBLE, new_level: 1, cost: 50.0 });
        assert_eq!(state.points, 125.0);
        let p = buy_upgrade(&mut state, &catalog, DOUBLE).unwrap();
        assert_eq!(p.cost, 100.0);
        assert_eq!(state.points, 25.0);
        assert_eq!(state.level_of(DOUBLE), 2);
    }

    #[test]
    fn buy_fails_when_unaffordable() {
        let (mut state, catalog, _) = setup();
        state.points = 49.0;
        let err = buy_upgrade(&mut state, &catalog, DOUBLE).unwrap_err();
        assert_eq!(err, PurchaseError::InsufficientPoints { cost: 50.0, points: 49.0 });
        assert_eq!(state.points, 49.0);
        assert_eq!(state.level_of(DOUBLE), 0);
    }

    #[test]
    fn buy_fails_at_max_level() {
        let (mut state, catalog, _) = setup();
        state.points = 1e12;
        state.set_level(BOOST, 3);
        assert!(matches!(
            buy_upgrade(&mut state, &catalog, BOOST),
            Err(PurchaseError::MaxLevel { max_level: 3, .. })
        ));
        assert_eq!(state.level_of(BOOST), 3);
        assert_eq!(state.points, 1e12);
    }

    #[test]
    fn buy_unknown_upgrade() {
        let (mut state, catalog, _) = setup();
        state.points = 1e6;
        assert_eq!(
            buy_upgrade(&mut state, &catalog, 42),
            Err(PurchaseError::UnknownUpgrade(42))
        );
    }

    #[test]
    fn purchase_shows_toasts() {
        let (mut state, catalog, config) = setup();
        crate::i18n::set_lang(crate::i18n::Language::En);
        assert!(!purchase(&mut state, &catalog, &config, DOUBLE));
        let toast = state.toast.clone().unwrap();
        assert_eq!(toast.kind, ToastKind::Error);
        assert_eq!(toast.message, "Not enough points: 50 needed");

        state.points = 50.0;
        assert!(purchase(&mut state, &catalog, &config, DOUBLE));
        let toast = state.toast.clone().unwrap();
        assert_eq!(toast.kind, ToastKind::Success);
        assert_eq!(toast.message, "Purchased Double Click (Lv. 1)");
    }

    #[test]
    fn toast_expires() {
        let (mut state, catalog, config) = setup();
        state.show_toast("hi".into(), ToastKind::Info, 5);
        tick(&mut state, &catalog, &config, 4);
        assert!(state.toast.is_some());
        tick(&mut state, &catalog, &config, 1);
        assert!(state.toast.is_none());
    }

    #[test]
    fn achievement_unlock_shows_toast() {
        let (mut state, catalog, config) = setup();
        crate::i18n::set_lang(crate::i18n::Language::En);
        click(&mut state, &catalog, &config);
        tick(&mut state, &catalog, &config, 1);
        assert!(state.has_achievement("first_click"));
        assert_eq!(
            state.toast.as_ref().map(|t| t.message.as_str()),
            Some("Achievement unlocked: First Click")
        );
    }

    #[test]
    fn rows_follow_rarity_and_affordability() {
        let (mut state, catalog, _) = setup();
        state.points = 120.0;
        state.set_level(BOOST, 3);
        let rows = upgrade_rows(&state, &catalog);
        let ids: Vec<u32> = rows.iter().map(|r| r.def.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert!(rows[0].affordable); // 50
        assert!(rows[1].affordable); // 100
        assert!(!rows[2].affordable); // 500
        assert!(rows[3].maxed && !rows[3].affordable);
    }

    #[test]
    fn purchase_at_uses_display_order() {
        let (mut state, catalog, config) = setup();
        state.points = 100.0;
        assert!(purchase_at(&mut state, &catalog, &config, 1));
        assert_eq!(state.level_of(MEGA), 1);
        assert!(!purchase_at(&mut state, &catalog, &config, 9));
    }

    #[test]
    fn buying_auto_clicker_restarts_interval() {
        let (mut state, catalog, config) = setup();
        state.set_level(AUTO, 1);
        toggle_auto_clicker(&mut state, &catalog);
        tick(&mut state, &catalog, &config, 30);
        state.points = 1_000.0;
        buy_upgrade(&mut state, &catalog, AUTO).unwrap();
        assert_eq!(state.auto_click_elapsed, 0);
    }

    #[test]
    fn reset_needs_two_presses_and_keeps_settings() {
        let (mut state, catalog, config) = setup();
        state.points = 500.0;
        state.set_level(DOUBLE, 2);
        state.settings.show_extended_points = true;
        assert!(!request_reset(&mut state, &config));
        assert_eq!(state.points, 500.0);
        assert!(request_reset(&mut state, &config));
        assert_eq!(state.points, 0.0);
        assert!(state.upgrades.is_empty());
        assert!(state.settings.show_extended_points);
        assert_eq!(click_bonus(&state, &catalog).per_click(), 1.0);
    }

    #[test]
    fn switching_tab_disarms_reset() {
        let (mut state, _, config) = setup();
        request_reset(&mut state, &config);
        switch_tab(&mut state, Tab::Home);
        assert!(!state.reset_armed);
    }

    #[test]
    fn other_settings_disarm_reset() {
        let (mut state, _, config) = setup();
        state.points = 500.0;

        request_reset(&mut state, &config);
        toggle_extended_points(&mut state);
        assert!(!state.reset_armed);
        assert!(!request_reset(&mut state, &config));
        assert_eq!(state.points, 500.0);

        cycle_language(&mut state);
        assert!(!state.reset_armed);
        assert!(!request_reset(&mut state, &config));
        assert_eq!(state.points, 500.0);
        cycle_language(&mut state);
    }

    #[test]
    fn settings_toggles_mark_dirty() {
        let (mut state, _, _) = setup();
        cycle_language(&mut state);
        assert_eq!(state.settings.language, crate::i18n::Language::De);
        assert_eq!(crate::i18n::current_lang(), crate::i18n::Language::De);
        cycle_language(&mut state);
        toggle_extended_points(&mut state);
        assert!(state.settings.show_extended_points);
        assert!(state.dirty);
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn points_never_negative(
                points in 0.0f64..1e7,
                buys in proptest::collection::vec(1u32..=5, 0..40),
            ) {
                let (mut state, catalog, _) = setup();
                state.points = points;
                for id in buys {
                    let _ = buy_upgrade(&mut state, &catalog, id);
                    prop_assert!(state.points >= 0.0);
                }
            }

            #[test]
            fn level_never_exceeds_max(
                buys in proptest::collection::vec(1u32..=5, 0..60),
            ) {
                let (mut state, catalog, _) = setup();
                state.points = 1e15;
                for id in buys {
                    let _ = buy_upgrade(&mut state, &catalog, id);
                }
                for owned in &state.upgrades {
                    let def = catalog.get(owned.id).unwrap();
                    prop_assert!(owned.level <= def.max_level);
                }
            }

            #[test]
            fn successful_buy_deducts_cost_at_level(
                id in 1u32..=5,
                level in 0u32..3,
                extra in 0.0f64..1000.0,
            ) {
                let (mut state, catalog, _) = setup();
                let cost = catalog.get(id).unwrap().cost_at(level);
                state.set_level(id, level);
                state.points = cost + extra;
                let p = buy_upgrade(&mut state, &catalog, id).unwrap();
                prop_assert!((p.cost - cost).abs() < 1e-6);
                prop_assert!((state.points - extra).abs() < 1e-6);
            }

            #[test]
            fn click_always_earns_at_least_one(
                levels in proptest::collection::vec(0u32..=5, 5),
            ) {
                let (mut state, catalog, _) = setup();
                for (i, level) in levels.iter().enumerate() {
                    state.set_level(i as u32 + 1, *level);
                }
                prop_assert!(click_bonus(&state, &catalog).per_click() >= 1.0);
            }
        }
    }
}
