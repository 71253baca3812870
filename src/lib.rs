//! blackjack-rs: Blackjack scoring, basic strategy and shoe simulation
//!
//! Goals:
//! - Exact soft/hard Ace scoring and a fixed basic-strategy table
//! - One round state machine shared by automated simulation and interactive play
//! - No panics for invalid input; use `Result` for recoverable errors
//!
//! ## Quick start: simulate a six-deck shoe
//! ```
//! use blackjack_rs::session::{run_session_with, SessionConfig};
//!
//! let stats = run_session_with(SessionConfig::new(6, 25.0).with_seed(7)).unwrap();
//! assert_eq!(stats.total, stats.wins + stats.losses + stats.pushes);
//! println!("player wins {:.2}%", stats.win_percent());
//! ```
//!
//! ## Scoring and strategy
//! ```
//! use blackjack_rs::hand::{Hand, HandResult};
//! use blackjack_rs::strategy::{player_strategy, Decision};
//!
//! let hand: Hand = "7c Ad".parse().unwrap();
//! assert_eq!(hand.result().unwrap(), HandResult::Total(18));
//! assert_eq!(player_strategy(&hand, 7), Decision::Stand);
//! assert_eq!(player_strategy(&hand, 9), Decision::Hit);
//! ```
//!
//! ## TUI
//! Play interactively with:
//! ```sh
//! cargo run --bin blackjack-rs -- play
//! ```

pub mod agents;
pub mod cards;
pub mod deck;
pub mod game;
pub mod hand;
pub mod session;
pub mod strategy;
pub mod tui;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
