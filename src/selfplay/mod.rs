use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use cozy_chess::Color;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::board::cozy::{Position, NO_PROGRESS_LIMIT};
use crate::error::DecideError;
use crate::game::GameState;
use crate::player::Player;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    WhiteWins,
    BlackWins,
    Draw,
    /// Ply limit reached first.
    Unfinished,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub start_fen: String,
    pub white: String,
    pub black: String,
    pub moves: Vec<String>,
    pub result: Outcome,
}

impl GameRecord {
    pub fn plies(&self) -> usize { self.moves.len() }
}

/// Plays `white` against `black` from `start` for at most `max_plies`.
///
/// The side to move with no legal moves loses, matching how the search
/// scores such positions; the no-progress limit is a draw. `on_ply` sees
/// every move as it is played.
pub fn play_game(
    white: &mut dyn Player<Position>,
    black: &mut dyn Player<Position>,
    start: Position,
    max_plies: usize,
    mut on_ply: impl FnMut(usize, &str),
) -> Result<GameRecord, DecideError> {
    let mut record = GameRecord {
        start_fen: format!("{}", start.board()),
        white: white.name().to_string(),
        black: black.name().to_string(),
        moves: Vec::new(),
        result: Outcome::Unfinished,
    };
    let mut pos = start;
    while record.moves.len() < max_plies {
        let legal = pos.legal_moves();
        if legal.is_empty() {
            record.result = if pos.side_to_move() == Color::White { Outcome::BlackWins } else { Outcome::WhiteWins };
            break;
        }
        if pos.no_progress_count() >= NO_PROGRESS_LIMIT {
            record.result = Outcome::Draw;
            break;
        }
        let mover: &mut dyn Player<Position> = if pos.side_to_move() == Color::White { white } else { black };
        let mv = mover.choose(&pos, &legal)?;
        let mstr = format!("{}", mv);
        debug!("{} plays {}", mover.name(), mstr);
        pos = pos.apply(&mv);
        on_ply(record.moves.len() + 1, &mstr);
        record.moves.push(mstr);
    }
    info!("game over after {} plies: {:?}", record.plies(), record.result);
    Ok(record)
}

pub fn write_record<P: AsRef<Path>>(record: &GameRecord, path: P) -> std::io::Result<()> {
    if let Some(dir) = path.as_ref().parent() {
        if !dir.as_os_str().is_empty() { create_dir_all(dir)?; }
    }
    let mut w = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut w, record)?;
    w.write_all(b"\n")?;
    w.flush()
}
