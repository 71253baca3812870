//! Session: one shoe played round after round until it reaches its reserve.
//!
//! A [`Session`] owns its deck, the round in progress and the running
//! [`SessionStats`]. The automated loop ([`Session::run`]) and the interactive
//! entry points ([`Session::start_round`], [`Session::hit`], [`Session::stand`])
//! drive the same [`Round`] state machine.

use crate::agents::{BasicStrategyAgent, PlayerAgent};
use crate::deck::{Deck, DeckError};
use crate::game::{Outcome, Phase, Round, RoundError, RoundOptions};
use crate::strategy::Decision;
use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign};

pub const DEFAULT_DECKS: usize = 6;
pub const DEFAULT_RESERVE_PERCENT: f64 = 25.0;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("invalid session configuration: {0}")]
    Config(DeckError),
    #[error(transparent)]
    Round(#[from] RoundError),
    #[error("shoe is depleted; start a new session")]
    Depleted,
    #[error("no round in progress")]
    NoRound,
    #[error("a simulation worker thread panicked")]
    Worker,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub number_of_decks: usize,
    /// Share of the shoe, in percent, kept back from play.
    pub reserve_percent: f64,
    /// Seed for reproducible shuffles; `None` uses OS entropy.
    pub seed: Option<u64>,
    pub dealer_plays_after_player_bust: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            number_of_decks: DEFAULT_DECKS,
            reserve_percent: DEFAULT_RESERVE_PERCENT,
            seed: None,
            dealer_plays_after_player_bust: false,
        }
    }
}

impl SessionConfig {
    pub fn new(number_of_decks: usize, reserve_percent: f64) -> Self {
        Self { number_of_decks, reserve_percent, ..Self::default() }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), SessionError> {
        self.build_deck().map(|_| ())
    }

    pub fn round_options(&self) -> RoundOptions {
        RoundOptions { dealer_plays_after_player_bust: self.dealer_plays_after_player_bust }
    }

    fn build_deck(&self) -> Result<Deck, SessionError> {
        Deck::new(self.number_of_decks, self.reserve_percent).map_err(SessionError::Config)
    }
}

/// Aggregate counters for a session. Monotonic; reset only by a new session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub total: u64,
    pub wins: u64,
    pub losses: u64,
    pub pushes: u64,
    /// Rounds abandoned because the shoe ran dry mid-round; not counted in `total`.
    pub discarded: u64,
}

impl SessionStats {
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::PlayerWins => self.wins += 1,
            Outcome::DealerWins => self.losses += 1,
            Outcome::Push => self.pushes += 1,
        }
        self.total += 1;
    }

    /// Player wins as a percentage of rounds played.
    pub fn win_percent(&self) -> f64 {
        percent(self.wins, self.total)
    }

    /// Wins plus pushes as a percentage of rounds played.
    pub fn not_losing_percent(&self) -> f64 {
        percent(self.wins + self.pushes, self.total)
    }
}

fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}

impl AddAssign for SessionStats {
    fn add_assign(&mut self, rhs: Self) {
        self.total += rhs.total;
        self.wins += rhs.wins;
        self.losses += rhs.losses;
        self.pushes += rhs.pushes;
        self.discarded += rhs.discarded;
    }
}

impl Add for SessionStats {
    type Output = Self;
    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl Sum for SessionStats {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

/// Run one full round from `deck` and record its outcome.
///
/// On error nothing is recorded; cards already drawn stay out of the shoe.
pub fn run_round(
    deck: &mut Deck,
    stats: &mut SessionStats,
    agent: &mut dyn PlayerAgent,
    options: &RoundOptions,
) -> Result<Outcome, RoundError> {
    let mut round = Round::new(*options);
    let outcome = round.play(deck, agent)?;
    stats.record(outcome);
    Ok(outcome)
}

#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    deck: Deck,
    stats: SessionStats,
    round: Option<Round>,
    prepared: bool,
}

impl Session {
    pub fn new(config: SessionConfig) -> Result<Self, SessionError> {
        let deck = config.build_deck()?;
        Ok(Self::with_deck(config, deck))
    }

    /// Use a caller-built shoe (for example a stacked deck). Deck settings in `config` are ignored.
    pub fn with_deck(config: SessionConfig, deck: Deck) -> Self {
        Self { config, deck, stats: SessionStats::default(), round: None, prepared: false }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    pub fn is_over(&self) -> bool {
        self.deck.is_depleted()
    }

    /// Shuffle then cut, once per shoe.
    pub fn prepare(&mut self) {
        if self.prepared {
            return;
        }
        match self.config.seed {
            Some(seed) => self.deck.shuffle_seeded(seed),
            None => self.deck.shuffle(),
        }
        self.deck.cut();
        self.prepared = true;
        log::info!(
            "session start: {} deck(s), {} cards, reserve {}% ({} cards)",
            self.deck.number_of_decks(),
            self.deck.remaining_count(),
            self.deck.reserve_percent(),
            self.deck.reserve_threshold(),
        );
    }

    /// Skip the opening shuffle and cut, dealing the shoe in its current order.
    pub fn mark_prepared(&mut self) {
        self.prepared = true;
    }

    /// Play one automated round with `agent` in the player seat.
    ///
    /// The shoe is shuffled and cut first if no round has been dealt from it yet.
    pub fn play_round(&mut self, agent: &mut dyn PlayerAgent) -> Result<Outcome, SessionError> {
        if self.is_over() {
            return Err(SessionError::Depleted);
        }
        self.prepare();
        let options = self.config.round_options();
        let played = run_round(&mut self.deck, &mut self.stats, agent, &options);
        self.discard_if_dry(played.map_err(SessionError::from))
    }

    /// Play rounds until the shoe reaches its reserve.
    ///
    /// A round that runs out of cards part way is discarded and ends the
    /// session; any other round error is returned.
    pub fn run(&mut self, agent: &mut dyn PlayerAgent) -> Result<SessionStats, SessionError> {
        self.prepare();
        while !self.is_over() {
            match self.play_round(agent) {
                Ok(_) => {}
                Err(SessionError::Round(RoundError::Deck(DeckError::Empty))) => break,
                Err(e) => return Err(e),
            }
        }
        if self.stats.total == 0 {
            log::warn!("session ended without a complete round; reserve too large for the shoe?");
        }
        log::info!(
            "session end: {} rounds, {} wins, {} losses, {} pushes",
            self.stats.total,
            self.stats.wins,
            self.stats.losses,
            self.stats.pushes,
        );
        Ok(self.stats)
    }

    /// Deal a fresh round for an interactive player.
    ///
    /// If the player is dealt a natural the round resolves immediately.
    pub fn start_round(&mut self) -> Result<&Round, SessionError> {
        if let Some(open) = self.round.as_ref().filter(|r| !r.is_resolved()) {
            let err = RoundError::OutOfTurn { expected: Phase::Resolved, actual: open.phase() };
            return Err(err.into());
        }
        if self.is_over() {
            return Err(SessionError::Depleted);
        }
        self.prepare();
        let mut round = Round::new(self.config.round_options());
        let dealt = round.deal(&mut self.deck).map_err(SessionError::from);
        self.discard_if_dry(dealt)?;
        self.round = Some(round);
        let finished = self.finish_if_player_done();
        self.discard_if_dry(finished)?;
        self.current()
    }

    pub fn hit(&mut self) -> Result<&Round, SessionError> {
        self.decide(Decision::Hit)
    }

    pub fn stand(&mut self) -> Result<&Round, SessionError> {
        self.decide(Decision::Stand)
    }

    /// Apply a player decision to the round in progress.
    pub fn decide(&mut self, decision: Decision) -> Result<&Round, SessionError> {
        let round = self.round.as_mut().ok_or(SessionError::NoRound)?;
        let applied = round.apply(decision, &mut self.deck).map_err(SessionError::from);
        let finished = applied.and_then(|_| self.finish_if_player_done());
        self.discard_if_dry(finished)?;
        self.current()
    }

    /// Feed whatever `agent` has to offer into the round in progress.
    ///
    /// Returns `Ok(false)` when the agent has no decision ready.
    pub fn poll_agent(&mut self, agent: &mut dyn PlayerAgent) -> Result<bool, SessionError> {
        let round = self.round.as_ref().ok_or(SessionError::NoRound)?;
        if round.phase() != Phase::PlayerTurn {
            return Ok(false);
        }
        let up = round.dealer_upcard_value().map_err(RoundError::from)?;
        match agent.decide(round.player(), up) {
            Some(decision) => self.decide(decision).map(|_| true),
            None => Ok(false),
        }
    }

    /// A round the shoe ran dry under is dropped and counted; the error still
    /// reaches the caller.
    fn discard_if_dry<T>(&mut self, result: Result<T, SessionError>) -> Result<T, SessionError> {
        if let Err(SessionError::Round(RoundError::Deck(DeckError::Empty))) = &result {
            log::warn!("shoe ran out mid-round; round discarded");
            self.round = None;
            self.stats.discarded += 1;
        }
        result
    }

    fn finish_if_player_done(&mut self) -> Result<(), SessionError> {
        let Some(round) = self.round.as_mut() else {
            return Ok(());
        };
        if round.phase() == Phase::DealerTurn {
            let outcome = round.play_dealer(&mut self.deck)?;
            self.stats.record(outcome);
        }
        Ok(())
    }

    fn current(&self) -> Result<&Round, SessionError> {
        self.round.as_ref().ok_or(SessionError::NoRound)
    }
}

/// Play a whole shoe with basic strategy and return the tallies.
///
/// ```
/// use blackjack_rs::session::run_session;
///
/// let stats = run_session(6, 25.0).unwrap();
/// assert!(stats.total > 0);
/// assert_eq!(stats.total, stats.wins + stats.losses + stats.pushes);
/// ```
pub fn run_session(number_of_decks: usize, reserve_percent: f64) -> Result<SessionStats, SessionError> {
    run_session_with(SessionConfig::new(number_of_decks, reserve_percent))
}

pub fn run_session_with(config: SessionConfig) -> Result<SessionStats, SessionError> {
    Session::new(config)?.run(&mut BasicStrategyAgent)
}

/// Run `sessions` independent shoes across up to `threads` workers and sum the results.
///
/// Each session builds its own deck; with a seed, session `i` shuffles with `seed + i`.
pub fn run_batch(
    config: &SessionConfig,
    sessions: usize,
    threads: usize,
) -> Result<SessionStats, SessionError> {
    config.validate()?;
    let threads = threads.clamp(1, sessions.max(1));
    let configs: Vec<SessionConfig> = (0..sessions)
        .map(|i| SessionConfig {
            seed: config.seed.map(|s| s.wrapping_add(i as u64)),
            ..*config
        })
        .collect();
    let chunk = ((configs.len() + threads - 1) / threads).max(1);

    std::thread::scope(|scope| {
        let workers: Vec<_> = configs
            .chunks(chunk)
            .map(|batch| {
                scope.spawn(move || -> Result<SessionStats, SessionError> {
                    batch.iter().map(|c| run_session_with(*c)).sum()
                })
            })
            .collect();
        workers
            .into_iter()
            .map(|w| w.join().unwrap_or(Err(SessionError::Worker)))
            .sum()
    })
}
