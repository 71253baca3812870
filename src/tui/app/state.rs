use crate::agents::HumanAgent;
use crate::deck::DeckError;
use crate::game::{Phase, Round, RoundError};
use crate::session::{Session, SessionConfig, SessionError, SessionStats};
use crate::strategy::Decision;
use crate::tui::logger::LogBuffer;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Scene {
    Menu,
    Table,
}

/// High-level input actions for the TUI controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum InputAction {
    MenuNext,
    MenuPrev,
    MenuInc,
    MenuDec,
    MenuApply,
    MenuCancel,
    ToggleMenu,
    ToggleHelp,
    Deal,
    Hit,
    Stand,
}

#[derive(Debug)]
#[non_exhaustive]
pub struct AppState {
    pub scene: Scene,
    pub session: Session,
    pub player_name: String,
    // Menu config being edited
    pub menu_index: usize,
    pub cfg_decks: usize,
    pub cfg_reserve_percent: f64,
    pub(crate) agent: HumanAgent,
    /// Tallies from shoes already played out at this table.
    finished_shoes: SessionStats,
    shoes_played: u32,
    help_open: bool,
    action_error: Option<String>,
    action_error_at: Option<Instant>,
    logs: LogBuffer,
}

impl AppState {
    pub const LOG_LINES: usize = 6;
    const ACTION_ERROR_TTL: Duration = Duration::from_secs(3);

    pub fn new(config: SessionConfig, player_name: impl Into<String>) -> Result<Self, SessionError> {
        let session = Session::new(config)?;
        Ok(Self {
            scene: Scene::Menu,
            session,
            player_name: player_name.into(),
            menu_index: 0,
            cfg_decks: config.number_of_decks,
            cfg_reserve_percent: config.reserve_percent,
            agent: HumanAgent::new(),
            finished_shoes: SessionStats::default(),
            shoes_played: 0,
            help_open: false,
            action_error: None,
            action_error_at: None,
            logs: LogBuffer::default(),
        })
    }

    /// Route captured log lines into the log panel.
    pub fn with_logs(mut self, logs: LogBuffer) -> Self {
        self.logs = logs;
        self
    }

    pub fn log_tail(&self) -> Vec<String> {
        self.logs.tail(Self::LOG_LINES)
    }

    pub fn round(&self) -> Option<&Round> {
        self.session.round()
    }

    /// Counters across every shoe played since the table was configured.
    pub fn table_stats(&self) -> SessionStats {
        self.finished_shoes + self.session.stats()
    }

    pub fn shoe_number(&self) -> u32 {
        self.shoes_played + 1
    }

    pub fn round_open(&self) -> bool {
        self.round().is_some_and(|r| !r.is_resolved())
    }

    pub fn can_decide(&self) -> bool {
        self.scene == Scene::Table && self.round().is_some_and(|r| r.phase() == Phase::PlayerTurn)
    }

    /// Whether the dealer's hole card (position 0) should be face down.
    pub fn hide_hole_card(&self) -> bool {
        self.round_open()
    }

    pub fn action_error(&self) -> Option<&str> {
        self.action_error.as_deref()
    }

    fn set_action_error(&mut self, msg: impl Into<String>) {
        self.action_error = Some(msg.into());
        self.action_error_at = Some(Instant::now());
    }

    fn clear_action_error(&mut self) {
        self.action_error = None;
        self.action_error_at = None;
    }

    /// Drop stale error messages; called on every tick.
    pub fn tick(&mut self) {
        if self.action_error_at.is_some_and(|at| at.elapsed() >= Self::ACTION_ERROR_TTL) {
            self.clear_action_error();
        }
    }

    pub fn help_open(&self) -> bool {
        self.help_open
    }

    pub(crate) fn close_help(&mut self) {
        self.help_open = false;
    }

    /// One-line description of what the table is waiting for.
    pub fn status_line(&self) -> String {
        match self.round() {
            None => format!("Welcome {}, press Space to deal.", self.player_name),
            Some(r) => match (r.phase(), r.outcome()) {
                (Phase::PlayerTurn, _) => {
                    format!("{} has {}. Another card? [H]it / [S]tand", self.player_name, r.player().total())
                }
                (Phase::Resolved, Some(outcome)) => {
                    let player = r.player().result().map(|x| x.to_string()).unwrap_or_default();
                    let dealer = r.dealer().result().map(|x| x.to_string()).unwrap_or_default();
                    format!("*** {outcome} ({player} vs {dealer}). Space to play again.")
                }
                _ => String::from("Dealer is playing..."),
            },
        }
    }

    fn deal(&mut self) -> bool {
        if self.round_open() {
            self.set_action_error("Finish the current round first");
            return false;
        }
        if self.session.is_over() {
            if let Err(err) = self.new_shoe() {
                self.set_action_error(err.to_string());
                return false;
            }
        }
        self.agent.clear();
        match self.session.start_round() {
            Ok(_) => {
                self.clear_action_error();
                true
            }
            Err(err) => {
                self.report(err);
                false
            }
        }
    }

    /// Show `err` to the player. A shoe that ran dry mid-round is replaced.
    fn report(&mut self, err: SessionError) {
        self.agent.clear();
        if err == SessionError::Round(RoundError::Deck(DeckError::Empty)) {
            if let Err(next) = self.new_shoe() {
                self.set_action_error(next.to_string());
                return;
            }
            self.set_action_error("Shoe ran out; round discarded and a new shoe shuffled");
            return;
        }
        self.set_action_error(err.to_string());
    }

    pub(crate) fn reset_table(&mut self) {
        self.finished_shoes = SessionStats::default();
        self.shoes_played = 0;
        self.agent.clear();
        self.clear_action_error();
    }

    fn new_shoe(&mut self) -> Result<(), SessionError> {
        let config = *self.session.config();
        let next = Session::new(config)?;
        self.finished_shoes += self.session.stats();
        self.shoes_played += 1;
        self.session = next;
        log::info!("shoe {} finished; shuffling a fresh shoe", self.shoes_played);
        Ok(())
    }

    fn queue_decision(&mut self, decision: Decision) -> bool {
        if !self.can_decide() {
            return false;
        }
        if !self.agent.receive(decision) {
            return false;
        }
        self.agent_on_turn()
    }

    /// Hand the human agent's pending decision to the round.
    pub fn agent_on_turn(&mut self) -> bool {
        match self.session.poll_agent(&mut self.agent) {
            Ok(acted) => {
                if acted {
                    self.clear_action_error();
                }
                acted
            }
            Err(err) => {
                self.report(err);
                false
            }
        }
    }

    pub fn handle_input(&mut self, action: InputAction) -> bool {
        match action {
            InputAction::ToggleMenu => {
                self.toggle_menu();
                false
            }
            InputAction::ToggleHelp => {
                if self.scene == Scene::Table {
                    self.help_open = !self.help_open;
                }
                false
            }
            InputAction::MenuNext => {
                if self.scene == Scene::Menu {
                    self.menu_next();
                }
                false
            }
            InputAction::MenuPrev => {
                if self.scene == Scene::Menu {
                    self.menu_prev();
                }
                false
            }
            InputAction::MenuInc => {
                if self.scene == Scene::Menu {
                    self.menu_inc();
                }
                false
            }
            InputAction::MenuDec => {
                if self.scene == Scene::Menu {
                    self.menu_dec();
                }
                false
            }
            InputAction::MenuApply => {
                if self.scene == Scene::Menu {
                    return self.apply_menu();
                }
                false
            }
            InputAction::MenuCancel => {
                if self.scene == Scene::Menu {
                    self.cancel_menu();
                }
                false
            }
            InputAction::Deal => self.scene == Scene::Table && self.deal(),
            InputAction::Hit => self.queue_decision(Decision::Hit),
            InputAction::Stand => self.queue_decision(Decision::Stand),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> AppState {
        let mut app = AppState::new(SessionConfig::new(1, 25.0).with_seed(1), "Tester").unwrap();
        assert!(app.handle_input(InputAction::MenuApply));
        app
    }

    #[test]
    fn decisions_ignored_before_deal() {
        let mut app = table();
        assert!(!app.handle_input(InputAction::Hit));
        assert!(!app.agent.has_pending());
        assert_eq!(app.table_stats().total, 0);
    }

    #[test]
    fn standing_always_resolves_the_round() {
        let mut app = table();
        assert!(app.handle_input(InputAction::Deal));
        if app.can_decide() {
            assert!(app.handle_input(InputAction::Stand));
        }
        assert!(!app.round_open());
        assert_eq!(app.table_stats().total, 1);
        assert!(app.status_line().starts_with("***"));
    }

    #[test]
    fn exhausted_shoe_rolls_over_and_keeps_tallies() {
        let mut app = table();
        let mut rounds = 0;
        while !app.session.is_over() {
            assert!(app.handle_input(InputAction::Deal));
            while app.can_decide() {
                app.handle_input(InputAction::Stand);
            }
            rounds += 1;
        }
        assert!(app.handle_input(InputAction::Deal));
        assert_eq!(app.shoe_number(), 2);
        assert!(app.table_stats().total >= rounds);
    }
}
