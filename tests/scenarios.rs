//! End-to-end scenarios exercising the whole stack: FEN in, move
//! generation, SAN, PGN, and the terminal-state predicates.

use fianchetto::pgn::{parse_pgn, WriteOptions};
use fianchetto::{is_threefold_repetition, perft, Position, SanError};

fn pos(fen: &str) -> Position {
    Position::from_fen(fen).unwrap()
}

fn play(start: &Position, sans: &[&str]) -> Position {
    let mut position = start.clone();
    for san in sans {
        let m = position
            .parse_san(san, false)
            .unwrap_or_else(|e| panic!("{san}: {e}"));
        position = position.apply(m);
    }
    position
}

#[test]
fn starting_position_has_twenty_moves() {
    assert_eq!(Position::startpos().legal_moves().len(), 20);
}

#[test]
fn twenty_replies_after_e4() {
    let p = pos("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1");
    assert_eq!(p.legal_moves().len(), 20);
}

#[test]
fn ruy_lopez_fen_after_six_plies() {
    let p = play(
        &Position::startpos(),
        &["e4", "e5", "Nf3", "Nc6", "Bb5", "a6"],
    );
    assert_eq!(
        p.fen(),
        "r1bqkbnr/1ppp1ppp/p1n5/1B2p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 0 4"
    );
}

#[test]
fn queen_and_rook_mate() {
    let p = pos("8/5r2/4K1q1/4p3/3k4/8/8/8 w - - 0 7");
    assert!(p.in_checkmate());
    assert!(!p.in_stalemate());
}

#[test]
fn blocked_king_stalemate() {
    let p = pos("4k3/4P3/4K3/8/8/8/8/8 b - - 0 78");
    assert!(p.in_stalemate());
    assert!(!p.in_checkmate());
}

#[test]
fn knight_versus_king_is_insufficient() {
    assert!(pos("k7/8/n7/8/8/8/8/7K b - - 0 1").is_insufficient_material());
}

#[test]
fn knight_shuffle_reaches_threefold() {
    let mut history = vec![Position::startpos()];
    for san in ["Nf3", "Nf6", "Ng1", "Ng8", "Nf3", "Nf6", "Ng1", "Ng8"] {
        let next = play(history.last().unwrap(), &[san]);
        history.push(next);
    }
    assert!(is_threefold_repetition(&history));
}

#[test]
fn pgn_round_trip_preserves_the_tree() {
    let source = r#"[Event "Casual Game"]
[Site "?"]
[Date "2021.07.11"]
[Round "?"]
[White "Alice"]
[Black "Bob"]
[Result "1-0"]

{annotated} 1. e4 $1 {[%clk 0:05:00] principled} e5 (1... c5 {the
sicilian} 2. Nf3 d6 $5) 2. Nf3 {[%eval 0.30,15] [%cal Gg1f3]} Nc6 3. Bb5
a6?! 1-0
"#;
    let games = parse_pgn(source).unwrap();
    assert_eq!(games.len(), 1);
    let original = &games[0];

    // every main-line move must be legal against the running position
    let steps = original.replay().unwrap();
    assert_eq!(steps.len(), 6);

    let serialized = original.to_pgn(&WriteOptions::default());
    let reparsed = parse_pgn(&serialized).unwrap().remove(0);
    assert_eq!(original.moves, reparsed.moves);
    assert_eq!(original.root_comments, reparsed.root_comments);
    assert_eq!(original.result, reparsed.result);
    for (name, value) in &original.headers {
        assert_eq!(reparsed.header(name), Some(value.as_str()), "header {name}");
    }

    // wrapping changes layout, not content
    let wrapped = original.to_pgn(&WriteOptions::wrapped(40));
    let rewrapped = parse_pgn(&wrapped).unwrap().remove(0);
    assert_eq!(original.moves, rewrapped.moves);
}

#[test]
fn perft_table_from_the_start() {
    let p = Position::startpos();
    assert_eq!(perft(&p, 1), 20);
    assert_eq!(perft(&p, 2), 400);
    assert_eq!(perft(&p, 3), 8902);
}

#[test]
#[ignore = "slow; run with --ignored in release mode"]
fn perft_table_deep() {
    let p = Position::startpos();
    assert_eq!(perft(&p, 4), 197_281);
    assert_eq!(perft(&p, 5), 4_865_609);
}

#[test]
fn over_disambiguated_knight_move_needs_sloppy_mode() {
    let p = pos("r1bqkbnr/ppp2ppp/2n5/1B1pP3/4P3/8/PPPP2PP/RNBQK1NR b KQkq - 2 4");
    assert!(matches!(
        p.parse_san("Nge7", false),
        Err(SanError::Unknown(_))
    ));
    let m = p.parse_san("Nge7", true).unwrap();
    assert_eq!(m.to_string(), "g8e7");
}

#[test]
fn fen_round_trip_over_played_games() {
    // every position reached in a short game serializes and parses back
    let mut position = Position::startpos();
    for san in [
        "d4", "Nf6", "c4", "e6", "Nc3", "Bb4", "e3", "O-O", "Bd3", "d5", "Nf3", "c5", "O-O",
        "Nc6", "a3", "Bxc3", "bxc3", "dxc4", "Bxc4",
    ] {
        let m = position.parse_san(san, false).unwrap();
        position = position.apply(m);
        let fen = position.fen();
        assert_eq!(Position::from_fen(&fen).unwrap(), position, "at {fen}");
    }
}

#[test]
fn side_not_to_move_is_never_in_check_in_reachable_positions() {
    let mut position = Position::startpos();
    for san in ["e4", "e5", "Bc4", "Nc6", "Qh5", "Nf6", "Qxf7#"] {
        let m = position.parse_san(san, false).unwrap();
        position = position.apply(m);
        let waiting = !position.turn();
        assert!(!position.attacked_by(position.king_sq(waiting), position.turn()));
    }
    assert!(position.in_checkmate());
}
