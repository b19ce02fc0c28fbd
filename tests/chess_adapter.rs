use cozy_chess::{Color, Square};
use roundbot::board::cozy::Position;
use roundbot::search::eval::{ExtendOnCapture, Material, Positional};
use roundbot::{GameState, SearchEngine, SearchMove, WIN};

#[test]
fn startpos_has_twenty_quiet_moves() {
    let p = Position::startpos();
    assert_eq!(p.legal_moves().len(), 20);
    assert!(p.capture_moves().is_empty());
    assert_eq!(p.current_player(), Color::White);
    assert_eq!(p.no_progress_count(), 0);
    assert!(!p.is_terminal());
}

#[test]
fn captures_are_detected() {
    // 1. e4 d5: exd5 is the only capture
    let mut p = Position::startpos();
    p.make_move_uci("e2e4").expect("legal");
    p.make_move_uci("d7d5").expect("legal");
    let caps: Vec<String> = p.capture_moves().iter().map(|m| m.to_string()).collect();
    assert_eq!(caps, vec!["e4d5".to_string()]);
    assert_eq!(p.current_player(), Color::White);
}

#[test]
fn en_passant_counts_as_a_capture() {
    let p = Position::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2").expect("valid fen");
    let ep = p.find_move_uci("e5d6").expect("en passant is legal");
    assert!(p.is_capture(ep));
    let push = p.find_move_uci("e5e6").expect("legal");
    assert!(!p.is_capture(push));
}

#[test]
fn moves_report_their_squares() {
    let p = Position::startpos();
    let m = p.find_move_uci("g1f3").expect("legal");
    assert_eq!(m.origin(), Square::G1);
    assert_eq!(m.target(), Square::F3);
    assert!(m.same_squares(&m));
    assert!(p.find_move_uci("e2e5").is_none());
    let mut q = p.clone();
    assert!(q.make_move_uci("e2e5").is_err());
}

#[test]
fn checkmated_side_has_no_moves() {
    let p = Position::from_fen("R5k1/5ppp/8/8/8/8/8/6K1 b - - 1 1").expect("valid fen");
    assert!(p.is_terminal());
    assert!(p.legal_moves().is_empty());
}

#[test]
fn applying_a_move_leaves_the_parent_alone() {
    let p = Position::startpos();
    let m = p.find_move_uci("e2e4").expect("legal");
    let child = p.apply(&m);
    assert_eq!(child.current_player(), Color::Black);
    assert_eq!(p.current_player(), Color::White);
    assert_eq!(child.no_progress_count(), 0);
}

#[test]
fn free_queen_is_taken_at_depth_one() {
    let p = Position::from_fen("k7/8/8/8/8/8/3qQ3/7K w - - 0 1").expect("valid fen");
    let e = SearchEngine::<Position>::new(Color::White, Material { perspective: Color::White });
    let res = e.search_root(&p, 1).expect("no stop signal");
    assert_eq!(res.best_move.map(|m| m.to_string()), Some("e2d2".to_string()));
    assert_eq!(res.value, 9.0);
}

#[test]
fn capture_extension_sees_the_recapture() {
    // Qxd5 wins a pawn at depth 1 but loses the queen to exd5
    let p = Position::from_fen("k7/8/4p3/3p4/8/8/8/K2Q4 w - - 0 1").expect("valid fen");
    let flat = SearchEngine::<Position>::new(Color::White, Material { perspective: Color::White });
    let res = flat.search_root(&p, 1).expect("no stop signal");
    assert_eq!(res.best_move.map(|m| m.to_string()), Some("d1d5".to_string()));

    let deep = flat.clone().with_deepening(ExtendOnCapture);
    let res = deep.search_root(&p, 1).expect("no stop signal");
    assert_ne!(res.best_move.map(|m| m.to_string()), Some("d1d5".to_string()));
    assert!(res.value < 9.0);
}

#[test]
fn mate_is_scored_as_a_win() {
    let p = Position::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").expect("valid fen");
    let e = SearchEngine::<Position>::new(Color::White, Positional { perspective: Color::White });
    let res = e.search_root(&p, 2).expect("no stop signal");
    assert_eq!(res.value, WIN);
    assert_eq!(res.best_move.map(|m| m.to_string()), Some("a1a8".to_string()));
}
