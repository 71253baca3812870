use crate::cards::{parse_cards, Card, Rank};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lowest total two real cards can make (2 + 2).
pub const MIN_TWO_CARD_TOTAL: u8 = 4;

pub const BLACKJACK: u8 = 21;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum HandError {
    #[error("illegal hand: {cards} card(s) totalling {total}")]
    Illegal { cards: usize, total: u8 },
    #[error("no card at position {0}")]
    NoCardAt(usize),
    #[error("card parse error: {0}")]
    Parse(String),
}

/// Classification of a finished (two or more card) hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandResult {
    Blackjack,
    Bust,
    Total(u8),
}

impl fmt::Display for HandResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandResult::Blackjack => f.write_str("blackjack"),
            HandResult::Bust => f.write_str("bust"),
            HandResult::Total(t) => write!(f, "{t}"),
        }
    }
}

/// Cards dealt to one participant during one round. Only ever grows.
///
/// ```
/// use blackjack_rs::hand::{Hand, HandResult};
///
/// let hand: Hand = "Ah Ad 9c".parse().unwrap();
/// assert_eq!(hand.total(), 21);
/// assert_eq!(hand.result().unwrap(), HandResult::Total(21));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hand {
    cards: Vec<Card>,
    total: u8,
    soft: bool,
}

impl Hand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cards<I>(cards: I) -> Self
    where
        I: IntoIterator<Item = Card>,
    {
        let mut hand = Self::new();
        for card in cards {
            hand.add_card(card);
        }
        hand
    }

    pub fn add_card(&mut self, card: Card) {
        self.cards.push(card);
        self.recompute();
    }

    // Aces start at 11; knock 10 off one Ace at a time until the hand fits.
    fn recompute(&mut self) {
        let mut total: u32 = self.cards.iter().map(|c| u32::from(c.points())).sum();
        let mut soft_aces = self.cards.iter().filter(|c| c.rank() == Rank::Ace).count();
        while total > u32::from(BLACKJACK) && soft_aces > 0 {
            total -= 10;
            soft_aces -= 1;
        }
        self.total = u8::try_from(total).unwrap_or(u8::MAX);
        self.soft = soft_aces > 0;
    }

    pub fn total(&self) -> u8 {
        self.total
    }

    /// True while at least one Ace still counts as 11.
    pub fn is_soft(&self) -> bool {
        self.soft
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn card(&self, position: usize) -> Option<Card> {
        self.cards.get(position).copied()
    }

    pub fn contains_rank(&self, rank: Rank) -> bool {
        self.cards.iter().any(|c| c.rank() == rank)
    }

    /// Point value of the card at `position` (0-based, deal order).
    pub fn card_value_at(&self, position: usize) -> Result<u8, HandError> {
        self.card(position).map(Card::points).ok_or(HandError::NoCardAt(position))
    }

    pub fn is_blackjack(&self) -> bool {
        self.cards.len() == 2 && self.total == BLACKJACK
    }

    pub fn is_bust(&self) -> bool {
        self.total > BLACKJACK
    }

    /// Classify the hand. Only meaningful once at least two cards are dealt.
    pub fn result(&self) -> Result<HandResult, HandError> {
        if self.cards.len() < 2 || self.total < MIN_TWO_CARD_TOTAL {
            return Err(HandError::Illegal { cards: self.cards.len(), total: self.total });
        }
        Ok(if self.is_blackjack() {
            HandResult::Blackjack
        } else if self.is_bust() {
            HandResult::Bust
        } else {
            HandResult::Total(self.total)
        })
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for card in &self.cards {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{card}")?;
            first = false;
        }
        Ok(())
    }
}

impl FromStr for Hand {
    type Err = HandError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cards = parse_cards(s).map_err(|e| HandError::Parse(e.to_string()))?;
        Ok(Self::from_cards(cards))
    }
}
