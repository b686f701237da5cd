mod config;
mod output;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use gungi_core::{perft, validate_fen, Gungi, PieceType, SetupMode, Square};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use config::Config;
use output::{emit, MoveListReport, PerftReport, PlayReport, StatusReport, ValidateReport};

#[derive(Parser)]
#[command(name = "gungi")]
#[command(about = "Gungi rules engine: validate positions, list moves, replay games")]
struct Cli {
    /// Config file (defaults to ./gungi.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Emit JSON instead of plain text
    #[arg(long, global = true)]
    json: bool,
    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true)]
    log: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct PositionArgs {
    /// Position string; takes precedence over --mode
    #[arg(long)]
    fen: Option<String>,
    /// Starting setup: intro, beginner, intermediate or advanced
    #[arg(long, value_parser = parse_mode)]
    mode: Option<SetupMode>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a position string and report why it is rejected
    Validate { fen: String },
    /// List legal moves in notation
    Moves {
        #[command(flatten)]
        position: PositionArgs,
        /// Only moves of the piece on top of this square (rank-file)
        #[arg(long, value_parser = parse_square, conflicts_with = "hand")]
        square: Option<Square>,
        /// Only placements of this hand piece (letter, kanji or name)
        #[arg(long, value_parser = parse_piece_type)]
        hand: Option<PieceType>,
    },
    /// Play moves given in notation and report where the game stands
    Play {
        #[command(flatten)]
        position: PositionArgs,
        moves: Vec<String>,
    },
    /// Count leaf nodes of the move tree
    Perft {
        #[command(flatten)]
        position: PositionArgs,
        #[arg(short, long, default_value = "2")]
        depth: u32,
    },
    /// Report turn, check, hands and termination for a position
    Status {
        #[command(flatten)]
        position: PositionArgs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    init_tracing(cli.log.as_deref().unwrap_or(&config.log));
    let json = cli.json || config.json;

    match cli.command {
        Commands::Validate { fen } => {
            let error = validate_fen(&fen).err().map(|err| err.to_string());
            let valid = error.is_none();
            emit(&ValidateReport { fen: &fen, valid, error }, json)?;
            if !valid {
                bail!("position rejected");
            }
        }
        Commands::Moves {
            position,
            square,
            hand,
        } => {
            let game = load_game(&position, &config)?;
            let moves = match (square, hand) {
                (Some(square), _) => game.moves_for_square(square)?,
                (None, Some(kind)) => game.moves_for_hand(kind),
                (None, None) => game.moves(),
            };
            debug!(count = moves.len(), fen = %game.fen(), "generated moves");
            emit(&MoveListReport::new(&moves), json)?;
        }
        Commands::Play { position, moves } => {
            let mut game = load_game(&position, &config)?;
            for (ply, san) in moves.iter().enumerate() {
                game.make_san_move(san)
                    .with_context(|| format!("ply {}: cannot play {san}", ply + 1))?;
            }
            if let Some(reason) = game.termination() {
                info!(%reason, plies = moves.len(), "game finished");
            }
            let report = PlayReport {
                history: game.history_san(),
                status: StatusReport::from_game(&game),
            };
            emit(&report, json)?;
        }
        Commands::Perft { position, depth } => {
            let game = load_game(&position, &config)?;
            let start = Instant::now();
            let nodes = perft(game.position(), depth);
            let report = PerftReport {
                fen: game.fen(),
                depth,
                nodes,
                elapsed_ms: start.elapsed().as_millis(),
            };
            emit(&report, json)?;
        }
        Commands::Status { position } => {
            let game = load_game(&position, &config)?;
            emit(&StatusReport::from_game(&game), json)?;
        }
    }
    Ok(())
}

/// `RUST_LOG` first, then the configured filter, then `warn`.
fn init_tracing(fallback: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_game(args: &PositionArgs, config: &Config) -> Result<Gungi> {
    match &args.fen {
        Some(fen) => Gungi::from_fen(fen).with_context(|| format!("invalid position: {fen}")),
        None => Ok(Gungi::new(args.mode.unwrap_or(config.mode))),
    }
}

fn parse_mode(input: &str) -> Result<SetupMode, String> {
    SetupMode::from_name(input).ok_or_else(|| format!("unknown setup mode `{input}`"))
}

fn parse_square(input: &str) -> Result<Square, String> {
    Square::parse(input).ok_or_else(|| format!("expected rank-file such as 7-5, got `{input}`"))
}

fn parse_piece_type(input: &str) -> Result<PieceType, String> {
    let mut chars = input.chars();
    let by_symbol = match (chars.next(), chars.next()) {
        (Some(ch), None) => {
            PieceType::from_kanji(ch).or_else(|| PieceType::from_fen_code(ch.to_ascii_lowercase()))
        }
        _ => None,
    };
    by_symbol
        .or_else(|| {
            PieceType::ALL
                .into_iter()
                .find(|kind| kind.english_name().eq_ignore_ascii_case(input))
        })
        .ok_or_else(|| format!("unknown piece `{input}`"))
}
