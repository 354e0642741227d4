//! Text rendering of the readable game surface.

use crate::config::{CliConfig, Glyphs};
use chess_core::{Color, Coordinate, PieceKind};
use chess_engine::{Game, GameState, Observer, Piece};
use std::io::Write;
use tracing::warn;

/// Marker drawn on an empty square the selected piece can move to.
const HIGHLIGHT: char = '*';

/// Options controlling how the board is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub glyphs: Glyphs,
    pub show_coordinates: bool,
    pub highlight_moves: bool,
}

impl From<&CliConfig> for RenderOptions {
    fn from(config: &CliConfig) -> Self {
        RenderOptions {
            glyphs: config.glyphs,
            show_coordinates: config.show_coordinates,
            highlight_moves: config.highlight_moves,
        }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions::from(&CliConfig::default())
    }
}

fn unicode_glyph(kind: PieceKind, color: Color) -> char {
    match (color, kind) {
        (Color::White, PieceKind::King) => '♔',
        (Color::White, PieceKind::Queen) => '♕',
        (Color::White, PieceKind::Rook) => '♖',
        (Color::White, PieceKind::Bishop) => '♗',
        (Color::White, PieceKind::Knight) => '♘',
        (Color::White, PieceKind::Pawn) => '♙',
        (Color::Black, PieceKind::King) => '♚',
        (Color::Black, PieceKind::Queen) => '♛',
        (Color::Black, PieceKind::Rook) => '♜',
        (Color::Black, PieceKind::Bishop) => '♝',
        (Color::Black, PieceKind::Knight) => '♞',
        (Color::Black, PieceKind::Pawn) => '♟',
        (_, PieceKind::Empty) => '·',
    }
}

fn glyph(piece: &Piece, glyphs: Glyphs) -> char {
    match (glyphs, piece.color()) {
        (Glyphs::Ascii, _) => piece.to_char(),
        (Glyphs::Unicode, Some(color)) => unicode_glyph(piece.kind(), color),
        (Glyphs::Unicode, None) => '·',
    }
}

/// Renders the board grid followed by a status line.
pub fn render(game: &Game, options: RenderOptions) -> String {
    let highlights: &[Coordinate] = if options.highlight_moves {
        game.interpreter().highlights(game.board())
    } else {
        &[]
    };

    let mut out = String::new();
    for row in 0..Coordinate::SIZE {
        if options.show_coordinates {
            out.push_str(&format!("{} ", Coordinate::SIZE - row));
        }
        let cells: Vec<String> = (0..Coordinate::SIZE)
            .map(|col| {
                let at = Coordinate::new(row, col);
                match game.board().get(at) {
                    Some(piece) if piece.is_empty() && highlights.contains(&at) => {
                        HIGHLIGHT.to_string()
                    }
                    Some(piece) => glyph(piece, options.glyphs).to_string(),
                    None => " ".to_string(),
                }
            })
            .collect();
        out.push_str(&cells.join(" "));
        out.push('\n');
    }
    if options.show_coordinates {
        out.push_str("  a b c d e f g h\n");
    }
    out.push_str(&status(game));
    out.push('\n');
    out
}

/// One line describing whose turn it is and what the game waits for.
pub fn status(game: &Game) -> String {
    let side = game.side_to_move();
    match game.state() {
        GameState::Ongoing => {
            let check = if game.is_check() { ", check" } else { "" };
            let mut line = format!(
                "{} to move ({} legal moves{})",
                side,
                game.legal_move_count(),
                check
            );
            if let Some(at) = game.interpreter().selected() {
                line.push_str(&format!(", {} selected", at));
            }
            line
        }
        GameState::PromotionPending => match game.promotion_square() {
            Some(at) => format!(
                "Pawn on {} promotes: promote Bishop, Knight, Rook or Queen",
                at
            ),
            None => "Waiting for a promotion choice".to_string(),
        },
        state => state.end_message(side),
    }
}

/// Observer that redraws the board after every notification.
///
/// The end message is announced once when the game reaches a terminal state.
pub struct BoardPrinter<W: Write> {
    out: W,
    options: RenderOptions,
    announced: bool,
}

impl<W: Write> BoardPrinter<W> {
    pub fn new(out: W, options: RenderOptions) -> Self {
        BoardPrinter {
            out,
            options,
            announced: false,
        }
    }

    /// Draws the game right away, outside the notification cycle.
    pub fn draw(&mut self, game: &Game) {
        let mut frame = render(game, self.options);
        match (game.is_game_over(), self.announced) {
            (true, false) => {
                frame.push_str("Type 'new' for a new game.\n");
                self.announced = true;
            }
            (false, _) => self.announced = false,
            (true, true) => {}
        }
        if let Err(e) = self
            .out
            .write_all(frame.as_bytes())
            .and_then(|()| self.out.flush())
        {
            warn!(error = %e, "failed to draw board");
        }
    }

    #[cfg(test)]
    pub(crate) fn writer(&self) -> &W {
        &self.out
    }
}

impl<W: Write> Observer for BoardPrinter<W> {
    fn update(&mut self, game: &Game) {
        self.draw(game);
    }
}
