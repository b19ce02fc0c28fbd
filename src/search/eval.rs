use cozy_chess::{Board, Color, Piece, Square};

use crate::board::cozy::Position;
use crate::game::{GameState, Value};

/// Static evaluation: state -> utility for a fixed player.
///
/// `WIN`/`LOSS` are reserved for outcomes that are genuinely forced; a
/// heuristic returning them will stop iterative deepening early.
pub trait Evaluate<S>: Send + Sync {
    fn evaluate(&self, state: &S) -> Value;
}

impl<S, F> Evaluate<S> for F
where
    F: Fn(&S) -> Value + Send + Sync,
{
    fn evaluate(&self, state: &S) -> Value { self(state) }
}

/// Flags nodes worth searching past the nominal depth limit.
pub trait SelectiveDeepening<S>: Send + Sync {
    fn should_extend(&self, state: &S) -> bool;
}

impl<S, F> SelectiveDeepening<S> for F
where
    F: Fn(&S) -> bool + Send + Sync,
{
    fn should_extend(&self, state: &S) -> bool { self(state) }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NeverExtend;

impl<S> SelectiveDeepening<S> for NeverExtend {
    fn should_extend(&self, _state: &S) -> bool { false }
}

/// Keep searching while a capture is pending.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExtendOnCapture;

impl<S: GameState> SelectiveDeepening<S> for ExtendOnCapture {
    fn should_extend(&self, state: &S) -> bool { !state.capture_moves().is_empty() }
}

const PAWN: f64 = 1.0;
const KNIGHT: f64 = 3.0;
const BISHOP: f64 = 3.0;
const ROOK: f64 = 5.0;
const QUEEN: f64 = 9.0;

// Non-pawn material at or below which kings are rewarded for centralizing.
const ENDGAME_MATERIAL: f64 = 13.0;
const MAX_CENTER_DISTANCE: f64 = 4.95;

fn opponent(color: Color) -> Color {
    if color == Color::White { Color::Black } else { Color::White }
}

fn count_piece(board: &Board, color: Color, piece: Piece) -> f64 {
    let bb = board.colors(color) & board.pieces(piece);
    bb.into_iter().count() as f64
}

fn material(board: &Board, color: Color) -> f64 {
    count_piece(board, color, Piece::Pawn) * PAWN
        + count_piece(board, color, Piece::Knight) * KNIGHT
        + count_piece(board, color, Piece::Bishop) * BISHOP
        + count_piece(board, color, Piece::Rook) * ROOK
        + count_piece(board, color, Piece::Queen) * QUEEN
}

fn non_pawn_material(board: &Board, color: Color) -> f64 {
    material(board, color) - count_piece(board, color, Piece::Pawn) * PAWN
}

fn center_distance(sq: Square) -> f64 {
    let file = sq.file() as i32 as f64;
    let rank = sq.rank() as i32 as f64;
    ((file - 3.5).powi(2) + (rank - 3.5).powi(2)).sqrt()
}

/// Ranks a pawn has advanced from its starting rank.
fn pawn_advance(sq: Square, color: Color) -> f64 {
    let rank = sq.rank() as i32;
    let advanced = if color == Color::White { rank - 1 } else { 6 - rank };
    advanced.max(0) as f64
}

/// Material balance from `perspective`'s point of view.
#[derive(Clone, Copy, Debug)]
pub struct Material {
    pub perspective: Color,
}

impl Evaluate<Position> for Material {
    fn evaluate(&self, pos: &Position) -> Value {
        let b = pos.board();
        material(b, self.perspective) - material(b, opponent(self.perspective))
    }
}

/// Material plus pawn advancement, central occupancy and, once the heavy
/// pieces are traded, king centralization.
#[derive(Clone, Copy, Debug)]
pub struct Positional {
    pub perspective: Color,
}

impl Positional {
    fn side_score(board: &Board, color: Color, endgame: bool) -> f64 {
        let mut score = material(board, color);
        let ours = board.colors(color);
        for sq in ours & board.pieces(Piece::Pawn) {
            score += 0.1 * pawn_advance(sq, color);
        }
        for sq in ours {
            if center_distance(sq) < 1.5 { score += 0.05; }
        }
        if endgame {
            for sq in ours & board.pieces(Piece::King) {
                score += 0.1 * (MAX_CENTER_DISTANCE - center_distance(sq));
            }
        }
        score
    }
}

impl Evaluate<Position> for Positional {
    fn evaluate(&self, pos: &Position) -> Value {
        let b = pos.board();
        let them = opponent(self.perspective);
        let endgame = non_pawn_material(b, self.perspective) + non_pawn_material(b, them) <= ENDGAME_MATERIAL;
        Self::side_score(b, self.perspective, endgame) - Self::side_score(b, them, endgame)
    }
}
