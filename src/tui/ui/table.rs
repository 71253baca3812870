use crate::cards::{Card, Rank, Suit};
use crate::game::{Outcome, Phase};
use crate::hand::Hand;
use crate::tui::app::AppState;
use ratatui::prelude::*;
use ratatui::widgets::*;

use super::layout::{centered_rect, inner};

const CARD_WIDTH: u16 = 7;

pub(super) fn draw_table(f: &mut Frame, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // header
            Constraint::Length(6), // dealer
            Constraint::Length(6), // player
            Constraint::Length(4), // status
            Constraint::Min(AppState::LOG_LINES as u16 + 2),
        ])
        .split(f.area());

    let stats = app.table_stats();
    let deck = app.session.deck();
    let header_lines = vec![
        Line::from(format!(
            "Shoe #{}  Cards left: {}  Reserve: {} ({:.0}%)",
            app.shoe_number(),
            deck.remaining_count(),
            deck.reserve_threshold(),
            deck.reserve_percent(),
        )),
        Line::from(format!(
            "Rounds: {}  {} wins: {}  Dealer wins: {}  Pushes: {}  Win {:.2}%  Not losing {:.2}%",
            stats.total,
            app.player_name,
            stats.wins,
            stats.losses,
            stats.pushes,
            stats.win_percent(),
            stats.not_losing_percent(),
        )),
    ];
    let header = Paragraph::new(header_lines)
        .block(Block::default().title("blackjack-rs").borders(Borders::ALL));
    f.render_widget(header, chunks[0]);

    let round = app.round();
    let outcome = round.and_then(|r| r.outcome());
    let hide_hole = app.hide_hole_card();

    let dealer_title = match round {
        Some(r) if hide_hole => match r.dealer_upcard_value() {
            Ok(v) => format!("Dealer: upcard {v}"),
            Err(_) => String::from("Dealer"),
        },
        Some(r) => format!("Dealer: {}", r.dealer().total()),
        None => String::from("Dealer"),
    };
    let dealer_border = match outcome {
        Some(Outcome::DealerWins) => Some(Color::Green),
        _ => None,
    };
    draw_hand(f, chunks[1], &dealer_title, round.map(|r| r.dealer()), hide_hole, dealer_border);

    let player_title = match round {
        Some(r) => {
            let mut t = format!("{}: {}", app.player_name, r.player().total());
            if r.player().is_blackjack() {
                t.push_str(" *Blackjack*");
            } else if r.player().is_bust() {
                t.push_str(" *Busted!*");
            } else if r.player().is_soft() {
                t.push_str(" (soft)");
            }
            t
        }
        None => app.player_name.clone(),
    };
    let player_border = match (round.map(|r| r.phase()), outcome) {
        (_, Some(Outcome::PlayerWins)) => Some(Color::Green),
        (_, Some(Outcome::Push)) => Some(Color::Yellow),
        (Some(Phase::PlayerTurn), _) => Some(Color::Cyan),
        _ => None,
    };
    draw_hand(f, chunks[2], &player_title, round.map(|r| r.player()), false, player_border);

    let status_area = chunks[3];
    f.render_widget(Block::default().borders(Borders::ALL).title("Status"), status_area);
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(inner(status_area));
    let mut left_info = vec![Line::from(app.status_line())];
    if let Some(err) = app.action_error() {
        left_info.push(Line::from(Span::styled(
            format!("Error: {err}"),
            Style::default().fg(Color::Red),
        )));
    }
    let action_style = |enabled: bool| {
        if enabled {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::DIM)
        }
    };
    let right_keys = vec![
        Line::from(vec![
            Span::styled("H hit", action_style(app.can_decide())),
            Span::raw(" • "),
            Span::styled("S stand", action_style(app.can_decide())),
            Span::raw(" • "),
            Span::styled("Space deal", action_style(!app.round_open())),
        ]),
        Line::from("? help • M menu • Q quit"),
    ];
    f.render_widget(Paragraph::new(left_info).wrap(Wrap { trim: true }), cols[0]);
    f.render_widget(
        Paragraph::new(right_keys).wrap(Wrap { trim: true }).alignment(Alignment::Right),
        cols[1],
    );

    let log_lines: Vec<Line> = app
        .log_tail()
        .into_iter()
        .map(|l| Line::from(Span::styled(l, Style::default().add_modifier(Modifier::DIM))))
        .collect();
    let log_para =
        Paragraph::new(log_lines).block(Block::default().title("Log").borders(Borders::ALL));
    f.render_widget(log_para, chunks[4]);

    if app.help_open() {
        draw_help(f);
    }
}

fn draw_hand(
    f: &mut Frame,
    area: Rect,
    title: &str,
    hand: Option<&Hand>,
    hide_first: bool,
    border: Option<Color>,
) {
    let mut block = Block::default().title(title.to_string()).borders(Borders::ALL);
    if let Some(color) = border {
        block = block.border_style(Style::default().fg(color));
    }
    f.render_widget(block, area);
    let Some(hand) = hand else {
        return;
    };
    let slots = hand.len().max(1) as u16;
    let card_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints((0..slots).map(|_| Constraint::Length(CARD_WIDTH)).collect::<Vec<_>>())
        .split(inner(area));
    for (i, card) in hand.cards().iter().enumerate() {
        let shown = if hide_first && i == 0 { None } else { Some(*card) };
        render_card_widget(f, card_chunks[i], shown);
    }
}

fn draw_help(f: &mut Frame) {
    let area = centered_rect(60, 60, f.area());
    let block = Block::default().title("Help").borders(Borders::ALL);
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let lines = vec![
        Line::from(Span::styled("Table:", bold)),
        Line::from("- Space: deal a new round"),
        Line::from("- H: hit (take another card)"),
        Line::from("- S: stand"),
        Line::from("- The dealer's upcard is their second card; the first stays down"),
        Line::from("- Dealer draws to 17 and stands on every 17"),
        Line::from(""),
        Line::from(Span::styled("Menu:", bold)),
        Line::from("- M: open / close menu"),
        Line::from("- Up / Down: move selection"),
        Line::from("- + / -: adjust value"),
        Line::from("- Enter: apply (starts a new shoe)"),
        Line::from("- Esc: cancel"),
        Line::from(""),
        Line::from("Close help: ? or Esc • Q quits"),
    ];
    let para = Paragraph::new(lines).wrap(Wrap { trim: true });
    f.render_widget(Clear, area);
    f.render_widget(block, area);
    f.render_widget(para, inner(area));
}

fn suit_glyph_and_style(s: Suit) -> (char, Style) {
    match s {
        Suit::Hearts => ('♥', Style::default().fg(Color::Red)),
        Suit::Diamonds => ('♦', Style::default().fg(Color::Red)),
        Suit::Spades => ('♠', Style::default().fg(Color::White)),
        Suit::Clubs => ('♣', Style::default().fg(Color::White)),
    }
}

fn rank_label(r: Rank) -> &'static str {
    match r {
        Rank::Ten => "10",
        Rank::Jack => "J",
        Rank::Queen => "Q",
        Rank::King => "K",
        Rank::Ace => "A",
        pip => pip.name(),
    }
}

fn render_card_widget(f: &mut Frame, area: Rect, card: Option<Card>) {
    let block = Block::default().borders(Borders::ALL);
    f.render_widget(block, area);
    let content = match card {
        Some(c) => {
            let (glyph, style) = suit_glyph_and_style(c.suit());
            Line::from(Span::styled(format!("{}{}", rank_label(c.rank()), glyph), style))
        }
        None => Line::from(Span::styled("??", Style::default().fg(Color::DarkGray))),
    };
    f.render_widget(Paragraph::new(content).alignment(Alignment::Center), inner(area));
}
