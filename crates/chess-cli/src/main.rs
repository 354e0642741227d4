//! Chess in the terminal.
//!
//! Reads squares and commands from stdin, one per line, and feeds them to a
//! [`chess_engine::Game`]. A [`render::BoardPrinter`] subscribed to the game
//! redraws the board after every turn.

mod command;
mod config;
mod render;

use anyhow::Context;
use chess_core::Coordinate;
use chess_engine::{Game, Observer};
use clap::Parser;
use command::{Command, HELP};
use config::{CliConfig, Glyphs};
use render::{BoardPrinter, RenderOptions};
use std::cell::RefCell;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::rc::Rc;

/// Play chess in the terminal.
#[derive(Parser)]
#[command(name = "chess-cli")]
#[command(about = "Two-player chess in the terminal")]
struct Args {
    /// Path to a TOML configuration file (default: chess.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Maximum log level written to stderr (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,

    /// Draw pieces with Unicode chess symbols
    #[arg(long)]
    unicode: bool,

    /// Hide file letters and rank numbers
    #[arg(long)]
    no_coordinates: bool,

    /// Do not mark the destinations of the selected piece
    #[arg(long)]
    no_highlights: bool,
}

impl Args {
    /// Applies command-line overrides on top of the file configuration.
    fn apply(&self, config: &mut CliConfig) {
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if self.unicode {
            config.glyphs = Glyphs::Unicode;
        }
        if self.no_coordinates {
            config.show_coordinates = false;
        }
        if self.no_highlights {
            config.highlight_moves = false;
        }
    }
}

/// A game together with the printer subscribed to it.
struct Session<W: Write> {
    game: Game,
    printer: Rc<RefCell<BoardPrinter<W>>>,
}

impl<W: Write + 'static> Session<W> {
    fn new(out: W, options: RenderOptions) -> Self {
        let printer = Rc::new(RefCell::new(BoardPrinter::new(out, options)));
        let mut session = Session {
            game: Game::new(),
            printer,
        };
        session.start();
        session
    }

    /// Subscribes the printer to the current game and draws it. The game
    /// notified once at construction, before anyone was listening.
    fn start(&mut self) {
        self.game.subscribe(&self.printer);
        self.redraw();
    }

    fn redraw(&self) {
        self.printer.borrow_mut().update(&self.game);
    }

    /// Feeds a selection to the game. Returns true when the selection
    /// changed without concluding a turn, which sends no notification.
    fn select(&mut self, at: Coordinate) -> bool {
        let turn = self.game.turn();
        let before = self.game.interpreter().selection();
        self.game.submit_selection(at);
        self.game.turn() == turn && self.game.interpreter().selection() != before
    }

    /// Handles one command. Returns false when the user quits.
    fn handle(&mut self, command: Command) -> bool {
        match command {
            Command::Quit => return false,
            Command::Nothing => {}
            Command::Help => println!("{}", HELP),
            Command::Board => self.redraw(),
            Command::NewGame => {
                tracing::info!("new game");
                self.game = Game::new();
                self.start();
            }
            Command::Promote(kind) => self.game.submit_promotion_choice(&kind),
            Command::Select(at) => {
                if self.select(at) {
                    self.redraw();
                }
            }
        }
        true
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mut config = CliConfig::load(args.config.as_deref()).context("loading configuration")?;
    args.apply(&mut config);

    tracing_subscriber::fmt()
        .with_max_level(config.level()?)
        .with_writer(io::stderr)
        .init();
    tracing::debug!(?config, "configuration loaded");

    println!("Type 'help' for commands.");
    let mut session = Session::new(io::stdout(), RenderOptions::from(&config));

    for line in io::stdin().lock().lines() {
        let line = line.context("reading stdin")?;
        match Command::parse(&line) {
            Ok(command) => {
                if !session.handle(command) {
                    break;
                }
            }
            Err(e) => println!("{}", e),
        }
    }

    Ok(())
}
