use blackjack_rs::hand::Hand;
use blackjack_rs::strategy::{dealer_strategy, player_strategy, Decision};

fn hand(s: &str) -> Hand {
    s.parse().unwrap()
}

const UPCARDS: std::ops::RangeInclusive<u8> = 2..=11;

#[test]
fn dealer_hits_below_seventeen_only() {
    assert_eq!(dealer_strategy(&hand("Tc 6d")), Decision::Hit);
    assert_eq!(dealer_strategy(&hand("Tc 7d")), Decision::Stand);
    assert_eq!(dealer_strategy(&hand("Ac 6d")), Decision::Stand);
    assert_eq!(dealer_strategy(&hand("Ac 5d")), Decision::Hit);
    assert_eq!(dealer_strategy(&hand("Tc 6d 9h")), Decision::Stand);
}

#[test]
fn player_always_hits_eleven_or_less() {
    for up in UPCARDS {
        assert_eq!(player_strategy(&hand("5c 6d"), up), Decision::Hit);
        assert_eq!(player_strategy(&hand("2c 3d 4h"), up), Decision::Hit);
    }
}

#[test]
fn hard_hands_against_each_upcard() {
    // 12 hits against 2 and 3, stands against 4-6, then hits while below upcard + 10.
    let twelve = hand("Tc 2d");
    let expected = [
        (2, Decision::Hit),
        (3, Decision::Hit),
        (4, Decision::Stand),
        (5, Decision::Stand),
        (6, Decision::Stand),
        (7, Decision::Hit),
        (10, Decision::Hit),
        (11, Decision::Hit),
    ];
    for (up, decision) in expected {
        assert_eq!(player_strategy(&twelve, up), decision, "12 vs {up}");
    }

    let sixteen = hand("Tc 6d");
    assert_eq!(player_strategy(&sixteen, 6), Decision::Stand);
    assert_eq!(player_strategy(&sixteen, 7), Decision::Hit);
    assert_eq!(player_strategy(&sixteen, 10), Decision::Hit);

    for up in UPCARDS {
        assert_eq!(player_strategy(&hand("Tc 7d"), up), Decision::Stand, "17 vs {up}");
        assert_eq!(player_strategy(&hand("Tc 5d 4h"), up), Decision::Stand, "19 vs {up}");
    }
}

#[test]
fn soft_two_card_hands() {
    let soft18 = hand("Ac 7d");
    for up in UPCARDS {
        let expected = if matches!(up, 2 | 7 | 8) { Decision::Stand } else { Decision::Hit };
        assert_eq!(player_strategy(&soft18, up), expected, "A7 vs {up}");
        assert_eq!(player_strategy(&hand("Ac 8d"), up), Decision::Stand, "A8 vs {up}");
        assert_eq!(player_strategy(&hand("Ac 6d"), up), Decision::Hit, "A6 vs {up}");
        assert_eq!(player_strategy(&hand("Ac Ad"), up), Decision::Hit, "AA vs {up}");
    }
}

#[test]
fn soft_table_applies_only_to_two_cards() {
    // three-card soft 18 falls through to the hard table
    let three_card = hand("Ac 3d 4h");
    assert_eq!(three_card.total(), 18);
    assert_eq!(player_strategy(&three_card, 9), Decision::Stand);
    assert_eq!(player_strategy(&hand("Ac 7d"), 9), Decision::Hit);
}
