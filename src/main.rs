use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use cozy_chess::Color;
use indicatif::{ProgressBar, ProgressStyle};
use roundbot::board::cozy::Position;
use roundbot::config::PlayerConfig;
use roundbot::player::{Player, RandomPlayer};
use roundbot::selfplay::{play_game, write_record};
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Kind {
    Alphabeta,
    Random,
}

#[derive(Parser, Debug)]
#[command(name = "roundbot", version, about = "Play a game between two time-managed players", long_about = None)]
struct Args {
    /// FEN string or 'startpos'
    #[arg(long, default_value = "startpos")]
    fen: String,

    #[arg(long, value_enum, default_value_t = Kind::Alphabeta)]
    white: Kind,

    #[arg(long, value_enum, default_value_t = Kind::Random)]
    black: Kind,

    /// JSON player config shared by both alpha-beta players
    #[arg(long)]
    config: Option<PathBuf>,

    /// Turns per round (overrides config)
    #[arg(long)]
    round_turns: Option<u32>,

    /// Seconds per round (overrides config)
    #[arg(long)]
    round_seconds: Option<f64>,

    /// Fixed depth cap for iterative deepening (overrides config)
    #[arg(long)]
    max_depth: Option<u32>,

    #[arg(long, default_value_t = 200)]
    max_plies: usize,

    /// Seed for random players
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Write the game record as JSON
    #[arg(long)]
    out: Option<PathBuf>,
}

fn build_player(kind: Kind, color: Color, cfg: &PlayerConfig, seed: u64) -> Result<Box<dyn Player<Position>>> {
    let p: Box<dyn Player<Position>> = match kind {
        Kind::Alphabeta => Box::new(cfg.chess_player(color)?),
        Kind::Random => Box::new(RandomPlayer::new(seed)),
    };
    Ok(p)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut cfg = match &args.config {
        Some(path) => PlayerConfig::load(path)?,
        None => PlayerConfig::default(),
    };
    if let Some(k) = args.round_turns { cfg.round_turns = k; }
    if let Some(s) = args.round_seconds { cfg.round_seconds = s; }
    if args.max_depth.is_some() { cfg.max_depth = args.max_depth; }
    cfg.validate()?;

    let start = if args.fen == "startpos" {
        Position::startpos()
    } else {
        Position::from_fen(&args.fen).map_err(anyhow::Error::msg).context("invalid --fen")?
    };

    let mut white = build_player(args.white, Color::White, &cfg, args.seed)?;
    let mut black = build_player(args.black, Color::Black, &cfg, args.seed.wrapping_add(1))?;

    let pb = ProgressBar::new(args.max_plies as u64);
    pb.set_style(ProgressStyle::with_template("{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} plies {msg}")?);
    let record = play_game(white.as_mut(), black.as_mut(), start, args.max_plies, |_, mv| {
        pb.inc(1);
        pb.set_message(mv.to_string());
    })?;
    pb.finish_with_message(format!("{:?}", record.result));

    println!("{} vs {}: {:?} after {} plies", record.white, record.black, record.result, record.plies());
    println!("{}", record.moves.join(" "));
    if let Some(out) = &args.out {
        write_record(&record, out).with_context(|| format!("writing {}", out.display()))?;
        println!("Wrote {}", out.display());
    }
    Ok(())
}
