//! Basic-strategy decisions for the two seats at the table.
//!
//! Both functions are pure: they read only the acting hand and, for the
//! player, the point value of the dealer's upcard.

use crate::cards::Rank;
use crate::hand::Hand;
use serde::{Deserialize, Serialize};

/// Dealer stands on any 17 or better.
pub const DEALER_STANDS_ON: u8 = 17;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    Hit,
    Stand,
}

/// House rule: hit below 17, stand otherwise.
///
/// Soft 17 is treated like any other 17 (the dealer stands on it).
///
/// ```
/// use blackjack_rs::hand::Hand;
/// use blackjack_rs::strategy::{dealer_strategy, Decision};
///
/// let sixteen: Hand = "Tc 6d".parse().unwrap();
/// let seventeen: Hand = "Tc 7d".parse().unwrap();
/// assert_eq!(dealer_strategy(&sixteen), Decision::Hit);
/// assert_eq!(dealer_strategy(&seventeen), Decision::Stand);
/// ```
pub fn dealer_strategy(hand: &Hand) -> Decision {
    if hand.total() >= DEALER_STANDS_ON {
        Decision::Stand
    } else {
        Decision::Hit
    }
}

/// Player basic strategy against the dealer's upcard value (2..=11).
///
/// Rules are evaluated in a fixed order and the first match wins; the
/// two-card soft table is consulted before the hard table.
pub fn player_strategy(hand: &Hand, dealer_upcard_value: u8) -> Decision {
    let total = hand.total();
    let up = dealer_upcard_value;

    if hand.len() == 2 && hand.contains_rank(Rank::Ace) {
        return if total >= 19 || (total == 18 && matches!(up, 2 | 7 | 8)) {
            Decision::Stand
        } else {
            Decision::Hit
        };
    }

    if total <= 11 || (total == 12 && matches!(up, 2 | 3)) {
        Decision::Hit
    } else if total >= 17 || (2..=6).contains(&up) {
        Decision::Stand
    } else if u16::from(total) < u16::from(up) + 10 {
        Decision::Hit
    } else {
        Decision::Stand
    }
}
