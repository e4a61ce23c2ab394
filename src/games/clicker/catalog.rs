//! Static upgrade catalog, embedded from `upgrades.json`.

use std::collections::{BTreeMap, HashSet};

use ratzilla::ratatui::style::Color;
use serde::Deserialize;

const EMBEDDED_CATALOG: &str = include_str!("upgrades.json");

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("upgrade catalog is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("duplicate upgrade id {0}")]
    DuplicateId(u32),
    #[error("upgrade {id}: {reason}")]
    Invalid { id: u32, reason: &'static str },
    #[error("more than one auto clicker upgrade")]
    MultipleAutoClickers,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    pub fn color(self) -> Color {
        match self {
            Rarity::Common => Color::Rgb(0x4c, 0xaf, 0x50),
            Rarity::Rare => Color::Rgb(0x21, 0x96, 0xf3),
            Rarity::Epic => Color::Rgb(0x9c, 0x27, 0xb0),
            Rarity::Legendary => Color::Rgb(0xff, 0xd7, 0x00),
        }
    }

    pub fn i18n_key(self) -> &'static str {
        match self {
            Rarity::Common => "upgrades.rarity.common",
            Rarity::Rare => "upgrades.rarity.rare",
            Rarity::Epic => "upgrades.rarity.epic",
            Rarity::Legendary => "upgrades.rarity.legendary",
        }
    }
}

/// What an upgrade does. Effects are resolved by kind, never by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UpgradeKind {
    AutoClicker,
    DoubleClick,
    TripleClick,
    MegaClicker,
    MultiplierBoost,
}

fn default_cost_multiplier() -> f64 {
    1.0
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeDef {
    pub id: u32,
    pub name: String,
    pub kind: UpgradeKind,
    /// One-line summary, used when a level has no description of its own.
    pub effect: String,
    pub rarity: Rarity,
    pub cost: f64,
    #[serde(default = "default_cost_multiplier")]
    pub cost_multiplier: f64,
    pub max_level: u32,
    #[serde(default)]
    pub levels: BTreeMap<u32, String>,
}

impl UpgradeDef {
    /// Price of the next level when the player currently owns `level`.
    pub fn cost_at(&self, level: u32) -> f64 {
        self.cost * self.cost_multiplier.powi(level as i32)
    }

    pub fn is_maxed(&self, level: u32) -> bool {
        level >= self.max_level
    }

    /// Description of what the next level gives, or of the final level once
    /// maxed.
    pub fn description_for(&self, level: u32) -> &str {
        let shown = if self.is_maxed(level) {
            self.max_level
        } else {
            level + 1
        };
        self.levels
            .get(&shown)
            .map(String::as_str)
            .unwrap_or(&self.effect)
    }

    /// Description of the level currently owned.
    pub fn effect_at(&self, level: u32) -> &str {
        self.levels
            .get(&level)
            .map(String::as_str)
            .unwrap_or(&self.effect)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        let invalid = |reason| CatalogError::Invalid { id: self.id, reason };
        if self.max_level == 0 {
            return Err(invalid("maxLevel must be at least 1"));
        }
        if !(self.cost.is_finite() && self.cost > 0.0) {
            return Err(invalid("cost must be positive"));
        }
        if !(self.cost_multiplier.is_finite() && self.cost_multiplier >= 1.0) {
            return Err(invalid("costMultiplier must be at least 1"));
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct CatalogFile {
    upgrades: Vec<UpgradeDef>,
}

#[derive(Clone, Debug)]
pub struct Catalog {
    upgrades: Vec<UpgradeDef>,
}

impl Catalog {
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::new(file.upgrades)
    }

    pub fn new(upgrades: Vec<UpgradeDef>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for def in &upgrades {
            def.validate()?;
            if !seen.insert(def.id) {
                return Err(CatalogError::DuplicateId(def.id));
            }
        }
        let auto_clickers = upgrades
            .iter()
            .filter(|u| u.kind == UpgradeKind::AutoClicker)
            .count();
        if auto_clickers > 1 {
            return Err(CatalogError::MultipleAutoClickers);
        }
        Ok(Self { upgrades })
    }

    /// The catalog shipped with the game.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(EMBEDDED_CATALOG)
    }

    pub fn get(&self, id: u32) -> Option<&UpgradeDef> {
        self.upgrades.iter().find(|u| u.id == id)
    }

    pub fn auto_clicker(&self) -> Option<&UpgradeDef> {
        self.upgrades
            .iter()
            .find(|u| u.kind == UpgradeKind::AutoClicker)
    }

    pub fn iter(&self) -> impl Iterator<Item = &UpgradeDef> {
        self.upgrades.iter()
    }

    pub fn len(&self) -> usize {
        self.upgrades.len()
    }

    /// Upgrades ordered common → legendary; ties keep catalog order.
    pub fn sorted_by_rarity(&self) -> Vec<&UpgradeDef> {
        let mut sorted: Vec<&UpgradeDef> = self.upgrades.iter().collect();
        sorted.sort_by_key(|u| u.rarity);
        sorted
    }
}

#[cfg(test)]
pub(crate) fn test_catalog() -> Catalog {
    Catalog::builtin().expect("builtin catalog")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_is_valid() {
        let catalog = test_catalog();
        assert_eq!(catalog.len(), 5);
        assert_eq!(catalog.auto_clicker().map(|u| u.id), Some(5));
    }

    #[test]
    fn cost_compounds_per_level() {
        let catalog = test_catalog();
        let double = catalog.get(1).unwrap();
        assert!((double.cost_at(0) - 50.0).abs() < 1e-9);
        assert!((double.cost_at(1) - 100.0).abs() < 1e-9);
        assert!((double.cost_at(3) - 400.0).abs() < 1e-9);
    }

    #[test]
    fn missing_cost_multiplier_defaults_to_one() {
        let json = r#"{"upgrades":[{"id":9,"name":"Flat","kind":"megaClicker",
            "effect":"flat","rarity":"rare","cost":10,"maxLevel":3}]}"#;
        let catalog = Catalog::from_json(json).unwrap();
        let flat = catalog.get(9).unwrap();
        assert!((flat.cost_at(2) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn sorted_by_rarity_is_stable() {
        let catalog = test_catalog();
        let ids: Vec<u32> = catalog.sorted_by_rarity().iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);

        let json = r#"{"upgrades":[
            {"id":1,"name":"A","kind":"megaClicker","effect":"","rarity":"epic","cost":1,"maxLevel":1},
            {"id":2,"name":"B","kind":"doubleClick","effect":"","rarity":"common","cost":1,"maxLevel":1},
            {"id":3,"name":"C","kind":"tripleClick","effect":"","rarity":"epic","cost":1,"maxLevel":1},
            {"id":4,"name":"D","kind":"multiplierBoost","effect":"","rarity":"legendary","cost":1,"maxLevel":1}
        ]}"#;
        let catalog = Catalog::from_json(json).unwrap();
        let ids: Vec<u32> = catalog.sorted_by_rarity().iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![2, 1, 3, 4]);
    }

    #[test]
    fn description_follows_level() {
        let catalog = test_catalog();
        let double = catalog.get(1).unwrap();
        assert_eq!(double.description_for(0), "Clicks are worth x2");
        assert_eq!(double.description_for(2), "Clicks are worth x6");
        // maxed shows the final level
        assert_eq!(double.description_for(5), "Clicks are worth x10");
        assert_eq!(double.description_for(9), "Clicks are worth x10");
        assert_eq!(double.effect_at(2), "Clicks are worth x4");
        assert_eq!(double.effect_at(0), "Each click counts at least twice");
    }

    #[test]
    fn description_falls_back_to_effect() {
        let json = r#"{"upgrades":[{"id":1,"name":"A","kind":"megaClicker",
            "effect":"summary","rarity":"rare","cost":1,"maxLevel":2}]}"#;
        let catalog = Catalog::from_json(json).unwrap();
        assert_eq!(catalog.get(1).unwrap().description_for(0), "summary");
    }

    #[test]
    fn duplicate_ids_rejected() {
        let json = r#"{"upgrades":[
            {"id":1,"name":"A","kind":"megaClicker","effect":"","rarity":"rare","cost":1,"maxLevel":1},
            {"id":1,"name":"B","kind":"doubleClick","effect":"","rarity":"rare","cost":1,"maxLevel":1}
        ]}"#;
        assert!(matches!(
            Catalog::from_json(json),
            Err(CatalogError::DuplicateId(1))
        ));
    }

    #[test]
    fn invalid_definitions_rejected() {
        let zero_max = r#"{"upgrades":[{"id":1,"name":"A","kind":"megaClicker",
            "effect":"","rarity":"rare","cost":1,"maxLevel":0}]}"#;
        assert!(matches!(
            Catalog::from_json(zero_max),
            Err(CatalogError::Invalid { id: 1, .. })
        ));

        let shrinking = r#"{"upgrades":[{"id":2,"name":"A","kind":"megaClicker",
            "effect":"","rarity":"rare","cost":1,"costMultiplier":0.5,"maxLevel":3}]}"#;
        assert!(matches!(
            Catalog::from_json(shrinking),
            Err(CatalogError::Invalid { id: 2, .. })
        ));
    }

    #[test]
    fn two_auto_clickers_rejected() {
        let json = r#"{"upgrades":[
            {"id":1,"name":"A","kind":"autoClicker","effect":"","rarity":"rare","cost":1,"maxLevel":1},
            {"id":2,"name":"B","kind":"autoClicker","effect":"","rarity":"rare","cost":1,"maxLevel":1}
        ]}"#;
        assert!(matches!(
            Catalog::from_json(json),
            Err(CatalogError::MultipleAutoClickers)
        ));
    }

    #[test]
    fn unknown_kind_rejected() {
        let json = r#"{"upgrades":[{"id":1,"name":"A","kind":"teleport",
            "effect":"","rarity":"rare","cost":1,"maxLevel":1}]}"#;
        assert!(matches!(Catalog::from_json(json), Err(CatalogError::Json(_))));
    }
}
