use crate::cards::{Card, Rank, Suit};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;
use std::fmt;

pub const CARDS_PER_DECK: usize = 52;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum DeckError {
    #[error("cannot draw from an empty deck")]
    Empty,
    #[error("a shoe needs at least one deck")]
    NoDecks,
    #[error("reserve percent must be in [0, 100), got {0}")]
    InvalidReserve(f64),
}

/// A shoe of one or more 52-card decks, dealt from the front.
///
/// The reserve threshold is fixed when the shoe is built; once fewer cards
/// than that remain the shoe reports itself depleted and no new round starts.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: VecDeque<Card>,
    number_of_decks: usize,
    reserve_percent: f64,
    reserve_threshold: usize,
}

impl Deck {
    /// Build `number_of_decks` full decks in suit-major order (no shuffle yet).
    ///
    /// ```
    /// use blackjack_rs::deck::Deck;
    ///
    /// let deck = Deck::new(6, 25.0).unwrap();
    /// assert_eq!(deck.remaining_count(), 312);
    /// assert_eq!(deck.reserve_threshold(), 78);
    /// ```
    pub fn new(number_of_decks: usize, reserve_percent: f64) -> Result<Self, DeckError> {
        if number_of_decks == 0 {
            return Err(DeckError::NoDecks);
        }
        let mut cards = Vec::with_capacity(CARDS_PER_DECK * number_of_decks);
        for _ in 0..number_of_decks {
            for s in Suit::ALL {
                for r in Rank::ALL {
                    cards.push(Card::new(r, s));
                }
            }
        }
        let mut deck = Self::stacked(cards, reserve_percent)?;
        deck.number_of_decks = number_of_decks;
        Ok(deck)
    }

    /// A shoe holding exactly `cards`, front first. Useful for replays and tests.
    pub fn stacked(cards: Vec<Card>, reserve_percent: f64) -> Result<Self, DeckError> {
        if !reserve_percent.is_finite() || !(0.0..100.0).contains(&reserve_percent) {
            return Err(DeckError::InvalidReserve(reserve_percent));
        }
        let reserve_threshold = (cards.len() as f64 * reserve_percent / 100.0).floor() as usize;
        let number_of_decks = (cards.len() + CARDS_PER_DECK - 1) / CARDS_PER_DECK;
        Ok(Self { cards: cards.into(), number_of_decks, reserve_percent, reserve_threshold })
    }

    pub fn number_of_decks(&self) -> usize {
        self.number_of_decks
    }

    pub fn reserve_percent(&self) -> f64 {
        self.reserve_percent
    }

    pub fn reserve_threshold(&self) -> usize {
        self.reserve_threshold
    }

    pub fn remaining_count(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Shuffle with OS-seeded thread randomness.
    pub fn shuffle(&mut self) {
        self.shuffle_with(&mut rand::rng());
    }

    /// Shuffle using a seeded RNG for reproducibility.
    pub fn shuffle_seeded(&mut self, seed: u64) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.shuffle_with(&mut rng);
    }

    /// Shuffle using the provided RNG implementing Rng.
    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.make_contiguous().shuffle(rng);
    }

    /// Rotate so the card at `remaining / 2` becomes the front.
    pub fn cut(&mut self) {
        let half = self.cards.len() / 2;
        self.cards.rotate_left(half);
    }

    /// Remove and return the front card.
    pub fn draw(&mut self) -> Result<Card, DeckError> {
        self.cards.pop_front().ok_or(DeckError::Empty)
    }

    /// True once fewer cards remain than the reserve threshold.
    pub fn is_depleted(&self) -> bool {
        self.cards.len() < self.reserve_threshold
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> + '_ {
        self.cards.iter()
    }
}

impl fmt::Display for Deck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}-card deck", self.cards.len())?;
        for card in &self.cards {
            writeln!(f, "  {}", card.long_name())?;
        }
        Ok(())
    }
}
