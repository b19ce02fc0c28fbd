use cozy_chess::{Board as CozyBoard, Color, Move, Piece, Square};

use crate::game::{GameState, SearchMove};

/// Half-moves without capture or pawn move after which the game is drawn.
pub const NO_PROGRESS_LIMIT: u32 = 100;

#[derive(Clone, Debug)]
pub struct Position {
    board: CozyBoard,
}

impl Position {
    pub fn startpos() -> Self {
        Self { board: CozyBoard::default() }
    }

    pub fn from_fen(fen: &str) -> Result<Self, String> {
        CozyBoard::from_fen(fen, false).map(|b| Self { board: b }).map_err(|e| format!("FEN error: {e:?}"))
    }

    pub fn board(&self) -> &CozyBoard { &self.board }

    pub fn find_move_uci(&self, mv_uci: &str) -> Option<Move> {
        let mut found = None;
        self.board.generate_moves(|moves| {
            for m in moves {
                if format!("{}", m) == mv_uci { found = Some(m); break; }
            }
            found.is_some()
        });
        found
    }

    pub fn make_move_uci(&mut self, mv_uci: &str) -> Result<(), String> {
        match self.find_move_uci(mv_uci) {
            Some(m) => { self.board.play(m); Ok(()) }
            None => Err(format!("Illegal move: {}", mv_uci)),
        }
    }

    pub fn side_to_move(&self) -> Color { self.board.side_to_move() }

    pub fn is_capture(&self, m: Move) -> bool {
        let stm = self.board.side_to_move();
        let opp = if stm == Color::White { Color::Black } else { Color::White };
        if self.board.colors(opp).has(m.to) { return true; }
        // en passant: diagonal pawn step onto an empty square
        self.board.piece_on(m.from) == Some(Piece::Pawn) && m.from.file() != m.to.file()
    }
}

impl SearchMove for Move {
    type Square = Square;
    fn origin(&self) -> Square { self.from }
    fn target(&self) -> Square { self.to }
}

impl GameState for Position {
    type Move = Move;
    type Player = Color;

    fn legal_moves(&self) -> Vec<Move> {
        let mut moves: Vec<Move> = Vec::with_capacity(64);
        self.board.generate_moves(|ml| { moves.extend(ml); false });
        moves
    }

    fn capture_moves(&self) -> Vec<Move> {
        let mut caps = self.legal_moves();
        caps.retain(|&m| self.is_capture(m));
        caps
    }

    fn apply(&self, mv: &Move) -> Self {
        let mut child = self.board.clone();
        child.play(*mv);
        Self { board: child }
    }

    fn current_player(&self) -> Color { self.board.side_to_move() }

    fn no_progress_count(&self) -> u32 { self.board.halfmove_clock() as u32 }

    fn is_terminal(&self) -> bool {
        let mut has_legal = false;
        self.board.generate_moves(|_| { has_legal = true; true });
        !has_legal
    }
}
