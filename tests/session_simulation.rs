use blackjack_rs::agents::BasicStrategyAgent;
use blackjack_rs::cards::parse_cards;
use blackjack_rs::deck::{Deck, DeckError};
use blackjack_rs::game::{Outcome, Phase, RoundError};
use blackjack_rs::session::{
    run_batch, run_session, run_session_with, Session, SessionConfig, SessionError, SessionStats,
};

fn stacked(cards: &str, reserve: f64) -> Session {
    let deck = Deck::stacked(parse_cards(cards).unwrap(), reserve).unwrap();
    let mut session = Session::with_deck(SessionConfig::default(), deck);
    session.mark_prepared();
    session
}

fn consistent(stats: &SessionStats) {
    assert_eq!(stats.total, stats.wins + stats.losses + stats.pushes);
}

#[test]
fn six_deck_shoe_plays_to_reserve() {
    let mut session = Session::new(SessionConfig::new(6, 25.0).with_seed(2024)).unwrap();
    let stats = session.run(&mut BasicStrategyAgent).unwrap();
    consistent(&stats);
    assert!(stats.total > 20);
    assert_eq!(stats.discarded, 0);
    assert!(session.is_over());
    assert!(session.deck().remaining_count() < 78);
}

#[test]
fn unseeded_session_runs() {
    let stats = run_session(1, 25.0).unwrap();
    consistent(&stats);
    assert!(stats.total > 0);
}

#[test]
fn seeded_sessions_repeat_exactly() {
    let cfg = SessionConfig::new(4, 30.0).with_seed(5);
    assert_eq!(run_session_with(cfg).unwrap(), run_session_with(cfg).unwrap());
}

#[test]
fn zero_reserve_ends_on_an_empty_shoe() {
    let stats = run_session_with(SessionConfig::new(1, 0.0).with_seed(8)).unwrap();
    consistent(&stats);
    assert_eq!(stats.discarded, 1);
}

#[test]
fn invalid_settings_are_reported() {
    assert_eq!(run_session(0, 25.0), Err(SessionError::Config(DeckError::NoDecks)));
    assert!(matches!(
        run_session(1, 100.0),
        Err(SessionError::Config(DeckError::InvalidReserve(_)))
    ));
}

#[test]
fn batch_matches_individual_sessions() {
    let cfg = SessionConfig::new(2, 25.0).with_seed(100);
    let batch = run_batch(&cfg, 5, 3).unwrap();
    let expected: SessionStats =
        (0..5).map(|i| run_session_with(cfg.with_seed(100 + i)).unwrap()).sum();
    assert_eq!(batch, expected);
    consistent(&batch);
}

#[test]
fn interactive_round_lifecycle() {
    // player 12 vs upcard 9, hits a 5 to 17 and stands; dealer 19
    let mut session = stacked("Tc 9d 2h Ts 5c", 0.0);
    assert_eq!(session.hit().unwrap_err(), SessionError::NoRound);

    let round = session.start_round().unwrap();
    assert_eq!(round.phase(), Phase::PlayerTurn);
    assert!(matches!(
        session.start_round(),
        Err(SessionError::Round(RoundError::OutOfTurn { .. }))
    ));

    let round = session.hit().unwrap();
    assert_eq!(round.player().total(), 17);
    let round = session.stand().unwrap();
    assert_eq!(round.outcome(), Some(Outcome::DealerWins));
    assert_eq!(session.stats().losses, 1);
    assert_eq!(session.stats().total, 1);
}

#[test]
fn natural_resolves_on_the_deal() {
    let mut session = stacked("Ac 9d Kc 8d", 0.0);
    let round = session.start_round().unwrap();
    assert!(round.is_resolved());
    assert_eq!(round.outcome(), Some(Outcome::PlayerWins));
    assert_eq!(session.stats().wins, 1);
}

#[test]
fn no_round_starts_below_reserve() {
    // six cards, half held back
    let mut session = stacked("Tc Td 8h 8s 2c 3c", 50.0);
    session.start_round().unwrap();
    session.stand().unwrap();
    assert!(session.is_over());
    assert_eq!(session.start_round().unwrap_err(), SessionError::Depleted);
    assert_eq!(session.stats().pushes, 1);
}

#[test]
fn first_automated_round_comes_from_a_shuffled_shoe() {
    let cfg = SessionConfig::new(1, 25.0).with_seed(7);
    let mut session = Session::new(cfg).unwrap();
    session.play_round(&mut BasicStrategyAgent).unwrap();
    let used = 52 - session.deck().remaining_count();

    let mut expected = Deck::new(1, 25.0).unwrap();
    expected.shuffle_seeded(7);
    expected.cut();
    assert!(session.deck().iter().eq(expected.iter().skip(used)));

    let fresh = Deck::new(1, 25.0).unwrap();
    assert!(!session.deck().iter().eq(fresh.iter().skip(used)));
}

#[test]
fn shoe_running_dry_mid_round_closes_the_round() {
    // four cards, one held back: the deal empties the shoe and the hit finds nothing
    let mut session = stacked("Tc 9d 2h Ts", 25.0);
    session.start_round().unwrap();
    assert_eq!(
        session.hit().unwrap_err(),
        SessionError::Round(RoundError::Deck(DeckError::Empty))
    );
    assert!(session.round().is_none());
    assert_eq!(session.stats().discarded, 1);
    assert_eq!(session.stats().total, 0);
    assert_eq!(session.start_round().unwrap_err(), SessionError::Depleted);
}
