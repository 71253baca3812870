use blackjack_rs::session::{
    run_batch, Session, SessionConfig, SessionStats, DEFAULT_DECKS, DEFAULT_RESERVE_PERCENT,
};
use blackjack_rs::agents::BasicStrategyAgent;
use blackjack_rs::tui::app::AppState;
use blackjack_rs::tui::{controller, logger::TuiLogger};
use clap::{Args, Parser, Subcommand};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use log::LevelFilter;
use ratatui::prelude::*;
use serde::Serialize;
use std::error::Error;
use std::io::{self, IsTerminal, Stdout};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "blackjack-rs", version, about = "Blackjack basic-strategy simulator and table")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Clone, Copy)]
struct ShoeArgs {
    /// Decks in the shoe
    #[arg(long, env = "BLACKJACK_DECKS", default_value_t = DEFAULT_DECKS)]
    decks: usize,

    /// Percent of the shoe kept back from play
    #[arg(long, env = "BLACKJACK_RESERVE", default_value_t = DEFAULT_RESERVE_PERCENT)]
    reserve: f64,
}

#[derive(Subcommand)]
enum Command {
    /// Play shoes out with basic strategy and report the player's results
    Simulate {
        #[command(flatten)]
        shoe: ShoeArgs,

        /// Seed for reproducible shuffles
        #[arg(long, env = "BLACKJACK_SEED")]
        seed: Option<u64>,

        /// Number of shoes to play
        #[arg(long, default_value_t = 1)]
        sessions: usize,

        /// Worker threads for multi-shoe runs
        #[arg(long, default_value_t = 1)]
        threads: usize,

        /// Dealer finishes their hand even after the player busts
        #[arg(long)]
        dealer_plays_out: bool,

        /// Print the counters as JSON
        #[arg(long)]
        json: bool,

        /// List the shuffled shoe before playing (single session only)
        #[arg(long)]
        show_deck: bool,

        /// Player name used in the report
        #[arg(long, default_value = "Player")]
        name: String,
    },
    /// Sit at an interactive table in the terminal
    Play {
        #[command(flatten)]
        shoe: ShoeArgs,

        /// Your name at the table
        #[arg(long, default_value = "Player")]
        name: String,
    },
}

#[derive(Serialize)]
struct Report<'a> {
    player: &'a str,
    config: SessionConfig,
    sessions: usize,
    #[serde(flatten)]
    stats: SessionStats,
    win_percent: f64,
    not_losing_percent: f64,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    match cli.command {
        Command::Simulate {
            shoe,
            seed,
            sessions,
            threads,
            dealer_plays_out,
            json,
            show_deck,
            name,
        } => {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
                .init();
            let config = SessionConfig {
                number_of_decks: shoe.decks,
                reserve_percent: shoe.reserve,
                seed,
                dealer_plays_after_player_bust: dealer_plays_out,
            };
            let output = Output { json, show_deck };
            simulate(config, sessions, threads, output, &name)
        }
        Command::Play { shoe, name } => play(SessionConfig::new(shoe.decks, shoe.reserve), name),
    }
}

#[derive(Clone, Copy)]
struct Output {
    json: bool,
    show_deck: bool,
}

fn simulate(
    config: SessionConfig,
    sessions: usize,
    threads: usize,
    output: Output,
    name: &str,
) -> Result<(), Box<dyn Error>> {
    let stats = if sessions <= 1 {
        let mut session = Session::new(config)?;
        session.prepare();
        if output.show_deck && !output.json {
            println!("{}", session.deck());
        }
        session.run(&mut BasicStrategyAgent)?
    } else {
        run_batch(&config, sessions, threads)?
    };

    if output.json {
        let report = Report {
            player: name,
            config,
            sessions: sessions.max(1),
            stats,
            win_percent: stats.win_percent(),
            not_losing_percent: stats.not_losing_percent(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Total games {}", stats.total);
    println!("{name} wins {}", stats.wins);
    println!("Dealer wins {}", stats.losses);
    println!("Pushes {}", stats.pushes);
    println!("{name} wins {:.2}%", stats.win_percent());
    println!("{name} doesn't lose {:.2}%", stats.not_losing_percent());
    Ok(())
}

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    crossterm::execute!(terminal.backend_mut(), crossterm::terminal::LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn play(config: SessionConfig, name: String) -> Result<(), Box<dyn Error>> {
    if !io::stdout().is_terminal() {
        println!(
            "blackjack-rs play requires a real terminal (TTY).\nRun in Terminal and press q to quit. Version: {}",
            blackjack_rs::VERSION
        );
        return Ok(());
    }
    let logs = TuiLogger::install(LevelFilter::Info)?;
    let mut app = AppState::new(config, name)?.with_logs(logs);

    let mut terminal = setup_terminal()?;
    let tick_rate = Duration::from_millis(250);
    let res = controller::run(&mut terminal, &mut app, tick_rate);

    // Always attempt to restore terminal
    restore_terminal(terminal)?;
    Ok(res?)
}
