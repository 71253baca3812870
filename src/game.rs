use crate::agents::PlayerAgent;
use crate::deck::{Deck, DeckError};
use crate::hand::{Hand, HandError, HandResult};
use crate::strategy::{dealer_strategy, Decision};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The dealer's face-up card is the second card dealt to them.
pub const UPCARD_POSITION: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Phase {
    Dealing,
    PlayerTurn,
    DealerTurn,
    Resolved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    PlayerWins,
    DealerWins,
    Push,
}

impl Outcome {
    pub fn label(self) -> &'static str {
        match self {
            Outcome::PlayerWins => "Player wins",
            Outcome::DealerWins => "Dealer wins",
            Outcome::Push => "Push",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum RoundError {
    #[error(transparent)]
    Deck(#[from] DeckError),
    #[error(transparent)]
    Hand(#[from] HandError),
    #[error("round is in {actual:?}, expected {expected:?}")]
    OutOfTurn { expected: Phase, actual: Phase },
    #[error("player agent did not provide a decision")]
    AwaitingDecision,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundOptions {
    /// Draw out the dealer's hand even when the player has already busted.
    /// The outcome is unchanged; only the dealer's final hand differs.
    pub dealer_plays_after_player_bust: bool,
}

/// One round of heads-up blackjack: `Dealing -> PlayerTurn -> DealerTurn -> Resolved`.
///
/// Every transition goes through this type, whether the player seat is driven
/// by basic strategy or by a human through a UI.
#[derive(Debug, Clone)]
pub struct Round {
    player: Hand,
    dealer: Hand,
    phase: Phase,
    outcome: Option<Outcome>,
    options: RoundOptions,
}

impl Round {
    pub fn new(options: RoundOptions) -> Self {
        Self {
            player: Hand::new(),
            dealer: Hand::new(),
            phase: Phase::Dealing,
            outcome: None,
            options,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn player(&self) -> &Hand {
        &self.player
    }

    pub fn dealer(&self) -> &Hand {
        &self.dealer
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn is_resolved(&self) -> bool {
        self.phase == Phase::Resolved
    }

    pub fn dealer_upcard_value(&self) -> Result<u8, HandError> {
        self.dealer.card_value_at(UPCARD_POSITION)
    }

    fn expect(&self, expected: Phase) -> Result<(), RoundError> {
        if self.phase != expected {
            return Err(RoundError::OutOfTurn { expected, actual: self.phase });
        }
        Ok(())
    }

    /// Two cards each, alternating player then dealer.
    pub fn deal(&mut self, deck: &mut Deck) -> Result<(), RoundError> {
        self.expect(Phase::Dealing)?;
        for _ in 0..2 {
            self.player.add_card(deck.draw()?);
            self.dealer.add_card(deck.draw()?);
        }
        self.phase = Phase::PlayerTurn;
        // a natural needs no decision
        if self.player.is_blackjack() {
            self.phase = Phase::DealerTurn;
        }
        Ok(())
    }

    pub fn hit(&mut self, deck: &mut Deck) -> Result<(), RoundError> {
        self.expect(Phase::PlayerTurn)?;
        self.player.add_card(deck.draw()?);
        if self.player.is_bust() {
            self.phase = Phase::DealerTurn;
        }
        Ok(())
    }

    pub fn stand(&mut self) -> Result<(), RoundError> {
        self.expect(Phase::PlayerTurn)?;
        self.phase = Phase::DealerTurn;
        Ok(())
    }

    /// Apply one player decision.
    pub fn apply(&mut self, decision: Decision, deck: &mut Deck) -> Result<(), RoundError> {
        match decision {
            Decision::Hit => self.hit(deck),
            Decision::Stand => self.stand(),
        }
    }

    /// Ask `agent` for decisions until the player stands or busts.
    pub fn play_player<A>(&mut self, deck: &mut Deck, agent: &mut A) -> Result<(), RoundError>
    where
        A: PlayerAgent + ?Sized,
    {
        while self.phase == Phase::PlayerTurn {
            let up = self.dealer_upcard_value()?;
            let decision = agent.decide(&self.player, up).ok_or(RoundError::AwaitingDecision)?;
            self.apply(decision, deck)?;
        }
        Ok(())
    }

    /// Dealer draws to 17 (skipped after a player bust unless configured), then the round resolves.
    pub fn play_dealer(&mut self, deck: &mut Deck) -> Result<Outcome, RoundError> {
        self.expect(Phase::DealerTurn)?;
        if !self.player.is_bust() || self.options.dealer_plays_after_player_bust {
            while dealer_strategy(&self.dealer) == Decision::Hit {
                self.dealer.add_card(deck.draw()?);
            }
        }
        let outcome = resolve_outcome(&self.player, &self.dealer)?;
        log::debug!(
            "round resolved: player {} [{}] vs dealer {} [{}] -> {outcome}",
            self.player.result()?,
            self.player,
            self.dealer.result()?,
            self.dealer,
        );
        self.outcome = Some(outcome);
        self.phase = Phase::Resolved;
        Ok(outcome)
    }

    /// Drive the whole round from `Dealing` to `Resolved`.
    pub fn play<A>(&mut self, deck: &mut Deck, agent: &mut A) -> Result<Outcome, RoundError>
    where
        A: PlayerAgent + ?Sized,
    {
        self.deal(deck)?;
        self.play_player(deck, agent)?;
        self.play_dealer(deck)
    }
}

/// Compare two finished hands.
///
/// A dealer natural beats everything, a player bust loses before the dealer's
/// hand matters, then a player natural or a dealer bust wins; remaining
/// totals compare numerically.
pub fn resolve_outcome(player: &Hand, dealer: &Hand) -> Result<Outcome, HandError> {
    let p = player.result()?;
    let d = dealer.result()?;
    Ok(match (p, d) {
        (_, HandResult::Blackjack) => Outcome::DealerWins,
        (HandResult::Bust, _) => Outcome::DealerWins,
        (HandResult::Blackjack, _) => Outcome::PlayerWins,
        (_, HandResult::Bust) => Outcome::PlayerWins,
        (HandResult::Total(pt), HandResult::Total(dt)) => match pt.cmp(&dt) {
            std::cmp::Ordering::Greater => Outcome::PlayerWins,
            std::cmp::Ordering::Less => Outcome::DealerWins,
            std::cmp::Ordering::Equal => Outcome::Push,
        },
    })
}
