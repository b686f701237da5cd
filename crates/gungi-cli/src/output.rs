//! Plain-text and JSON renderings of command results.

use std::fmt;

use gungi_core::{Color, Gungi, HandPiece, Move, Piece, SetupMode};
use serde::Serialize;

/// Prints `value` as pretty JSON or through its `Display` impl.
pub fn emit<T: Serialize + fmt::Display>(value: &T, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{value}");
    }
    Ok(())
}

fn mode_name(mode: SetupMode) -> &'static str {
    match mode {
        SetupMode::Intro => "intro",
        SetupMode::Beginner => "beginner",
        SetupMode::Intermediate => "intermediate",
        SetupMode::Advanced => "advanced",
    }
}

fn hand_text(hand: &[HandPiece]) -> String {
    if hand.is_empty() {
        return "-".to_string();
    }
    hand.iter()
        .map(|hp| format!("{}{}", Piece::new(hp.piece_type, hp.color).fen_char(), hp.count))
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Serialize)]
pub struct ValidateReport<'a> {
    pub fen: &'a str,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl fmt::Display for ValidateReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error {
            None => write!(f, "valid"),
            Some(error) => write!(f, "invalid: {error}"),
        }
    }
}

#[derive(Serialize)]
pub struct MoveEntry<'a> {
    pub san: String,
    #[serde(rename = "move")]
    pub mv: &'a Move,
}

#[derive(Serialize)]
#[serde(transparent)]
pub struct MoveListReport<'a> {
    pub moves: Vec<MoveEntry<'a>>,
}

impl<'a> MoveListReport<'a> {
    pub fn new(moves: &'a [Move]) -> Self {
        Self {
            moves: moves
                .iter()
                .map(|mv| MoveEntry {
                    san: gungi_core::move_to_san(mv),
                    mv,
                })
                .collect(),
        }
    }
}

impl fmt::Display for MoveListReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.moves.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", entry.san)?;
        }
        Ok(())
    }
}

#[derive(Serialize)]
pub struct StatusReport {
    pub fen: String,
    pub mode: SetupMode,
    pub turn: Color,
    pub move_number: u32,
    pub in_draft: bool,
    pub in_check: bool,
    pub termination: Option<String>,
    pub legal_moves: usize,
    pub white_hand: Vec<HandPiece>,
    pub black_hand: Vec<HandPiece>,
}

impl StatusReport {
    pub fn from_game(game: &Gungi) -> Self {
        Self {
            fen: game.fen(),
            mode: game.mode(),
            turn: game.turn(),
            move_number: game.move_number(),
            in_draft: game.in_draft(),
            in_check: game.in_check(),
            termination: game.termination().map(|reason| reason.to_string()),
            legal_moves: game.moves().len(),
            white_hand: game.hand(Color::White),
            black_hand: game.hand(Color::Black),
        }
    }
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "fen:         {}", self.fen)?;
        writeln!(f, "mode:        {}", mode_name(self.mode))?;
        writeln!(f, "turn:        {} (move {})", self.turn, self.move_number)?;
        writeln!(f, "draft:       {}", if self.in_draft { "yes" } else { "no" })?;
        writeln!(f, "check:       {}", if self.in_check { "yes" } else { "no" })?;
        writeln!(f, "moves:       {}", self.legal_moves)?;
        writeln!(f, "white hand:  {}", hand_text(&self.white_hand))?;
        writeln!(f, "black hand:  {}", hand_text(&self.black_hand))?;
        match &self.termination {
            Some(reason) => write!(f, "result:      {reason}"),
            None => write!(f, "result:      in progress"),
        }
    }
}

#[derive(Serialize)]
pub struct PlayReport {
    pub history: Vec<String>,
    pub status: StatusReport,
}

impl fmt::Display for PlayReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (ply, chunk) in self.history.chunks(2).enumerate() {
            writeln!(f, "{}. {}", ply + 1, chunk.join(" "))?;
        }
        write!(f, "{}", self.status)
    }
}

#[derive(Serialize)]
pub struct PerftReport {
    pub fen: String,
    pub depth: u32,
    pub nodes: u64,
    pub elapsed_ms: u128,
}

impl fmt::Display for PerftReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "perft({}) = {} in {} ms",
            self.depth, self.nodes, self.elapsed_ms
        )
    }
}
