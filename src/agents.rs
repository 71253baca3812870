//! Agents: pluggable deciders for the player seat.
//!
//! The round state machine never hard-wires who chooses between hitting and
//! standing. Automated simulation plugs in [`BasicStrategyAgent`]; an
//! interactive host queues a human's choice in a [`HumanAgent`]; tests and
//! scripts can pass any closure.

use crate::hand::Hand;
use crate::strategy::{player_strategy, Decision};
use core::fmt;

/// A decision provider for the player's turn.
pub trait PlayerAgent {
    /// Choose the next move for `player` given the dealer's upcard value.
    ///
    /// Returning `None` means the agent has no decision yet (for example a
    /// human who has not pressed a key); the round waits in that case.
    fn decide(&mut self, player: &Hand, dealer_upcard_value: u8) -> Option<Decision>;
}

/// Plays the fixed basic-strategy table.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicStrategyAgent;

impl PlayerAgent for BasicStrategyAgent {
    fn decide(&mut self, player: &Hand, dealer_upcard_value: u8) -> Option<Decision> {
        Some(player_strategy(player, dealer_upcard_value))
    }
}

/// Adapter so any `FnMut(&Hand, u8) -> Decision` can sit in the player seat.
pub struct FnAgent<F>(pub F);

impl<F> fmt::Debug for FnAgent<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnAgent")
    }
}

impl<F> PlayerAgent for FnAgent<F>
where
    F: FnMut(&Hand, u8) -> Decision,
{
    fn decide(&mut self, player: &Hand, dealer_upcard_value: u8) -> Option<Decision> {
        Some((self.0)(player, dealer_upcard_value))
    }
}

/// Holds at most one pending decision received from a UI.
#[derive(Debug, Default)]
pub struct HumanAgent {
    pending: Option<Decision>,
}

impl HumanAgent {
    pub fn new() -> Self {
        Self { pending: None }
    }

    /// Queue a decision; refused while another one is still pending.
    pub fn receive(&mut self, decision: Decision) -> bool {
        if self.pending.is_some() {
            return false;
        }
        self.pending = Some(decision);
        true
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn clear(&mut self) {
        self.pending = None;
    }
}

impl PlayerAgent for HumanAgent {
    fn decide(&mut self, _player: &Hand, _dealer_upcard_value: u8) -> Option<Decision> {
        self.pending.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_strategy_agent_matches_table() {
        let hand: Hand = "Tc 6d".parse().unwrap();
        let mut agent = BasicStrategyAgent;
        assert_eq!(agent.decide(&hand, 10), Some(Decision::Hit));
        assert_eq!(agent.decide(&hand, 5), Some(Decision::Stand));
    }

    #[test]
    fn human_agent_yields_each_decision_once() {
        let hand: Hand = "Tc 6d".parse().unwrap();
        let mut agent = HumanAgent::new();
        assert_eq!(agent.decide(&hand, 10), None);
        assert!(agent.receive(Decision::Stand));
        assert!(!agent.receive(Decision::Hit), "second decision must wait");
        assert_eq!(agent.decide(&hand, 10), Some(Decision::Stand));
        assert_eq!(agent.decide(&hand, 10), None);
    }

    #[test]
    fn closures_are_agents() {
        let hand: Hand = "2c 3d".parse().unwrap();
        let mut calls = 0;
        let mut agent = FnAgent(|_: &Hand, _: u8| {
            calls += 1;
            Decision::Stand
        });
        assert_eq!(agent.decide(&hand, 4), Some(Decision::Stand));
        drop(agent);
        assert_eq!(calls, 1);
    }
}
