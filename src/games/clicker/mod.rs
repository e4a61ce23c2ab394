//! Idle Clicker: click for points, buy upgrades, let the auto-clicker run.

pub mod achievements;
pub mod actions;
pub mod catalog;
pub mod logic;
pub mod render;
pub mod save;
pub mod state;

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::Frame;

use crate::config::GameConfig;
use crate::games::Game;
use crate::i18n;
use crate::input::{ClickState, InputEvent};
use crate::storage::KeyValueStore;

use actions::*;
use catalog::Catalog;
use state::{ClickerState, Tab};

pub struct ClickerGame {
    pub state: ClickerState,
    catalog: Catalog,
    config: GameConfig,
    store: Box<dyn KeyValueStore>,
    ticks_since_save: u32,
}

impl ClickerGame {
    /// Start a session, restoring whatever progress `store` holds.
    pub fn new(config: GameConfig, catalog: Catalog, store: Box<dyn KeyValueStore>) -> Self {
        let mut state = ClickerState::new();
        let data = save::load_user_data(store.as_ref(), &config.storage_key);
        save::apply_user_data(&mut state, &data, &catalog);
        i18n::set_lang(state.settings.language);
        log::info!(
            "session started: {} points, {} upgrades owned",
            state.points,
            state.upgrades.len()
        );

        Self {
            state,
            catalog,
            config,
            store,
            ticks_since_save: 0,
        }
    }

    fn persist(&mut self) {
        let data = save::extract_user_data(&self.state);
        if let Err(e) = save::save_user_data(self.store.as_ref(), &self.config.storage_key, &data)
        {
            log::warn!("saving user data failed: {e}");
        }
        self.state.dirty = false;
        self.ticks_since_save = 0;
    }

    fn reset(&mut self) {
        if !logic::request_reset(&mut self.state, &self.config) {
            return;
        }
        if let Err(e) = save::delete_user_data(self.store.as_ref(), &self.config.storage_key) {
            log::warn!("deleting user data failed: {e}");
        }
        self.state.dirty = true;
    }

    fn handle_click(&mut self, action_id: u16) -> bool {
        match action_id {
            CLICK => {
                logic::click(&mut self.state, &self.catalog, &self.config);
            }
            TOGGLE_AUTO_CLICKER => {
                logic::toggle_auto_clicker(&mut self.state, &self.catalog);
            }
            TAB_HOME => logic::switch_tab(&mut self.state, Tab::Home),
            TAB_UPGRADES => logic::switch_tab(&mut self.state, Tab::Upgrades),
            TAB_ACHIEVEMENTS => logic::switch_tab(&mut self.state, Tab::Achievements),
            TAB_SETTINGS => logic::switch_tab(&mut self.state, Tab::Settings),
            CYCLE_LANGUAGE => logic::cycle_language(&mut self.state),
            TOGGLE_EXTENDED_POINTS => logic::toggle_extended_points(&mut self.state),
            RESET_PROGRESS => self.reset(),
            id if id >= BUY_UPGRADE_BASE && id < BUY_UPGRADE_BASE + BUY_KEYS.len() as u16 => {
                let idx = (id - BUY_UPGRADE_BASE) as usize;
                logic::purchase_at(&mut self.state, &self.catalog, &self.config, idx);
            }
            _ => return false,
        }
        true
    }

    fn handle_key(&mut self, key: char) -> bool {
        if let Some(tab) = Tab::all().iter().find(|t| t.key() == key) {
            logic::switch_tab(&mut self.state, *tab);
            return true;
        }

        match (self.state.tab, key.to_ascii_lowercase()) {
            (Tab::Home, ' ' | 'c') => self.handle_click(CLICK),
            (Tab::Home, 't') => self.handle_click(TOGGLE_AUTO_CLICKER),
            (Tab::Upgrades, k) => match BUY_KEYS.find(k) {
                Some(idx) => self.handle_click(BUY_UPGRADE_BASE + idx as u16),
                None => false,
            },
            (Tab::Settings, 'l') => self.handle_click(CYCLE_LANGUAGE),
            (Tab::Settings, 'x') => self.handle_click(TOGGLE_EXTENDED_POINTS),
            (Tab::Settings, 'r') => self.handle_click(RESET_PROGRESS),
            _ => false,
        }
    }
}

impl Game for ClickerGame {
    fn handle_input(&mut self, event: &InputEvent) -> bool {
        let consumed = match event {
            InputEvent::Key(c) => self.handle_key(*c),
            InputEvent::Click(id) => self.handle_click(*id),
        };
        if consumed && self.state.dirty {
            self.persist();
        }
        consumed
    }

    fn tick(&mut self, delta_ticks: u32) {
        logic::tick(&mut self.state, &self.catalog, &self.config, delta_ticks);

        self.ticks_since_save = self.ticks_since_save.saturating_add(delta_ticks);
        if self.state.dirty && self.ticks_since_save >= self.config.autosave_ticks() {
            self.persist();
        }
    }

    fn render(&self, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
        render::render(&self.state, &self.catalog, f, area, click_state);
    }
}
