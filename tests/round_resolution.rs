use blackjack_rs::agents::{BasicStrategyAgent, FnAgent, HumanAgent};
use blackjack_rs::cards::parse_cards;
use blackjack_rs::deck::{Deck, DeckError};
use blackjack_rs::game::{resolve_outcome, Outcome, Phase, Round, RoundError, RoundOptions};
use blackjack_rs::hand::Hand;
use blackjack_rs::strategy::Decision;

// Deal order is player, dealer, player, dealer; hits come off the front after that.
fn shoe(s: &str) -> Deck {
    Deck::stacked(parse_cards(s).unwrap(), 0.0).unwrap()
}

fn hand(s: &str) -> Hand {
    s.parse().unwrap()
}

fn play(cards: &str, options: RoundOptions) -> (Round, Deck, Outcome) {
    let mut deck = shoe(cards);
    let mut round = Round::new(options);
    let outcome = round.play(&mut deck, &mut BasicStrategyAgent).unwrap();
    (round, deck, outcome)
}

#[test]
fn higher_total_wins() {
    let (round, _, outcome) = play("Tc 9d 7h Ts", RoundOptions::default());
    assert_eq!(round.player().total(), 17);
    assert_eq!(round.dealer().total(), 19);
    assert_eq!(outcome, Outcome::DealerWins);
    assert_eq!(round.phase(), Phase::Resolved);
    assert_eq!(round.outcome(), Some(Outcome::DealerWins));
}

#[test]
fn equal_totals_push() {
    let (_, _, outcome) = play("Tc Td 8h 8s", RoundOptions::default());
    assert_eq!(outcome, Outcome::Push);
}

#[test]
fn dealer_bust_pays_the_player() {
    let (round, deck, outcome) = play("Tc 6d 8h Ts 9c", RoundOptions::default());
    assert_eq!(round.dealer().len(), 3);
    assert!(round.dealer().is_bust());
    assert!(deck.is_empty());
    assert_eq!(outcome, Outcome::PlayerWins);
}

#[test]
fn dealer_natural_beats_player_natural() {
    let (round, _, outcome) = play("Ac As Kc Kd", RoundOptions::default());
    assert!(round.player().is_blackjack());
    assert!(round.dealer().is_blackjack());
    assert_eq!(outcome, Outcome::DealerWins);
}

#[test]
fn player_natural_beats_dealer_twenty_one() {
    let player = hand("Ac Kc");
    assert_eq!(resolve_outcome(&player, &hand("7d 7h 7s")), Ok(Outcome::PlayerWins));
    assert_eq!(resolve_outcome(&hand("7d 7h 7s"), &player), Ok(Outcome::DealerWins));
}

#[test]
fn player_bust_loses_even_if_dealer_busts() {
    assert_eq!(resolve_outcome(&hand("Tc 6d Kh"), &hand("Ts 6s Qh")), Ok(Outcome::DealerWins));
}

#[test]
fn dealer_skips_drawing_after_player_bust() {
    // player 16 vs upcard 10 hits into a bust; dealer sits on 15
    let (round, deck, outcome) = play("Tc 5d 6h Ts Kc 2c", RoundOptions::default());
    assert!(round.player().is_bust());
    assert_eq!(round.dealer().len(), 2);
    assert_eq!(deck.remaining_count(), 1);
    assert_eq!(outcome, Outcome::DealerWins);
}

#[test]
fn dealer_can_play_out_after_player_bust() {
    let options = RoundOptions { dealer_plays_after_player_bust: true };
    let (round, deck, outcome) = play("Tc 5d 6h Ts Kc 2c", options);
    assert!(round.player().is_bust());
    assert_eq!(round.dealer().total(), 17);
    assert!(deck.is_empty());
    assert_eq!(outcome, Outcome::DealerWins);
}

#[test]
fn upcard_is_the_dealers_second_card() {
    let mut deck = shoe("Tc 2d 8h 9s");
    let mut round = Round::new(RoundOptions::default());
    assert!(round.dealer_upcard_value().is_err());
    round.deal(&mut deck).unwrap();
    assert_eq!(round.dealer_upcard_value(), Ok(9));
    assert_eq!(round.phase(), Phase::PlayerTurn);
}

#[test]
fn agent_sees_hand_and_upcard() {
    let mut deck = shoe("Tc 2d 3h 9s 2c");
    let mut round = Round::new(RoundOptions::default());
    let mut seen = Vec::new();
    let mut agent = FnAgent(|h: &Hand, up: u8| {
        seen.push((h.total(), up));
        if h.len() < 3 {
            Decision::Hit
        } else {
            Decision::Stand
        }
    });
    round.deal(&mut deck).unwrap();
    round.play_player(&mut deck, &mut agent).unwrap();
    assert_eq!(seen, vec![(13, 9), (15, 9)]);
    assert_eq!(round.phase(), Phase::DealerTurn);
}

#[test]
fn actions_out_of_turn_are_rejected() {
    let mut deck = shoe("Tc 9d 7h Ts");
    let mut round = Round::new(RoundOptions::default());
    assert_eq!(
        round.hit(&mut deck),
        Err(RoundError::OutOfTurn { expected: Phase::PlayerTurn, actual: Phase::Dealing })
    );
    assert!(round.play_dealer(&mut deck).is_err());
    round.deal(&mut deck).unwrap();
    assert!(matches!(round.deal(&mut deck), Err(RoundError::OutOfTurn { .. })));
    round.stand().unwrap();
    assert!(matches!(round.stand(), Err(RoundError::OutOfTurn { .. })));
}

#[test]
fn short_shoe_fails_the_deal() {
    let mut deck = shoe("Tc 9d 7h");
    let mut round = Round::new(RoundOptions::default());
    assert_eq!(round.deal(&mut deck), Err(RoundError::Deck(DeckError::Empty)));
}

#[test]
fn undecided_human_pauses_the_round() {
    let mut deck = shoe("Tc 9d 6h Ts 2c");
    let mut round = Round::new(RoundOptions::default());
    let mut human = HumanAgent::new();
    assert_eq!(round.play(&mut deck, &mut human), Err(RoundError::AwaitingDecision));
    assert_eq!(round.phase(), Phase::PlayerTurn);
    assert!(human.receive(Decision::Stand));
    round.play_player(&mut deck, &mut human).unwrap();
    assert_eq!(round.play_dealer(&mut deck), Ok(Outcome::DealerWins));
}
