use crate::session::{Session, SessionConfig};

use super::AppState;

#[derive(Debug, Clone, Copy)]
enum MenuItem {
    Decks,
    ReservePercent,
}

const MENU_ITEMS: [MenuItem; 2] = [MenuItem::Decks, MenuItem::ReservePercent];

const MAX_DECKS: usize = 8;
const RESERVE_STEP: f64 = 5.0;
const MIN_RESERVE: f64 = 5.0;
const MAX_RESERVE: f64 = 75.0;

impl MenuItem {
    fn display(self, app: &AppState) -> String {
        match self {
            MenuItem::Decks => format!("Decks in shoe: {}", app.cfg_decks),
            MenuItem::ReservePercent => format!("Reserve: {:.0}%", app.cfg_reserve_percent),
        }
    }

    fn inc(self, app: &mut AppState) {
        match self {
            MenuItem::Decks => {
                if app.cfg_decks < MAX_DECKS {
                    app.cfg_decks += 1;
                }
            }
            MenuItem::ReservePercent => {
                app.cfg_reserve_percent = (app.cfg_reserve_percent + RESERVE_STEP).min(MAX_RESERVE);
            }
        }
    }

    fn dec(self, app: &mut AppState) {
        match self {
            MenuItem::Decks => {
                if app.cfg_decks > 1 {
                    app.cfg_decks -= 1;
                }
            }
            MenuItem::ReservePercent => {
                app.cfg_reserve_percent = (app.cfg_reserve_percent - RESERVE_STEP).max(MIN_RESERVE);
            }
        }
    }
}

impl AppState {
    pub fn menu_items_display(&self) -> Vec<String> {
        MENU_ITEMS.iter().map(|item| item.display(self)).collect()
    }

    pub fn toggle_menu(&mut self) {
        self.close_help();
        self.scene = match self.scene {
            super::Scene::Menu => super::Scene::Table,
            _ => {
                self.open_menu();
                super::Scene::Menu
            }
        };
    }

    // --- Menu operations ---
    pub fn open_menu(&mut self) {
        self.close_help();
        self.menu_index = 0;
        self.cfg_decks = self.session.config().number_of_decks;
        self.cfg_reserve_percent = self.session.config().reserve_percent;
        self.scene = super::Scene::Menu;
    }

    /// Start a fresh shoe with the edited settings. Tallies restart with it.
    pub fn apply_menu(&mut self) -> bool {
        let config = SessionConfig {
            number_of_decks: self.cfg_decks.clamp(1, MAX_DECKS),
            reserve_percent: self.cfg_reserve_percent,
            ..*self.session.config()
        };
        match Session::new(config) {
            Ok(session) => {
                self.session = session;
                self.reset_table();
                self.scene = super::Scene::Table;
                true
            }
            Err(err) => {
                log::warn!("menu settings rejected: {err}");
                false
            }
        }
    }

    pub fn cancel_menu(&mut self) {
        self.scene = super::Scene::Table;
    }

    pub fn menu_next(&mut self) {
        self.menu_index = (self.menu_index + 1) % MENU_ITEMS.len();
    }
    pub fn menu_prev(&mut self) {
        self.menu_index = (self.menu_index + MENU_ITEMS.len() - 1) % MENU_ITEMS.len();
    }
    pub fn menu_inc(&mut self) {
        let item = MENU_ITEMS[self.menu_index % MENU_ITEMS.len()];
        item.inc(self);
    }
    pub fn menu_dec(&mut self) {
        let item = MENU_ITEMS[self.menu_index % MENU_ITEMS.len()];
        item.dec(self);
    }
}
