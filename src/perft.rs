//! Leaf-node counting over the legal move tree, the standard oracle for
//! validating move generation.

use crate::position::Position;

pub fn perft(position: &Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = position.legal_moves();

    if depth == 1 {
        return moves.len() as u64;
    }

    moves
        .iter()
        .map(|&m| perft(&position.apply(m), depth - 1))
        .sum()
}

/// Per-move leaf counts at the root, for pinpointing generator bugs.
pub fn perft_divide(position: &Position, depth: u32) -> Vec<(String, u64)> {
    position
        .legal_moves()
        .iter()
        .map(|&m| {
            let count = if depth <= 1 {
                1
            } else {
                perft(&position.apply(m), depth - 1)
            };
            (m.to_string(), count)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

    #[test]
    fn startpos_shallow() {
        let p = Position::startpos();
        assert_eq!(perft(&p, 0), 1);
        assert_eq!(perft(&p, 1), 20);
        assert_eq!(perft(&p, 2), 400);
        assert_eq!(perft(&p, 3), 8902);
    }

    #[test]
    #[ignore = "slow; run with --ignored in release mode"]
    fn startpos_deep() {
        let p = Position::startpos();
        assert_eq!(perft(&p, 4), 197_281);
        assert_eq!(perft(&p, 5), 4_865_609);
    }

    #[test]
    fn kiwipete_shallow() {
        let p = Position::from_fen(KIWIPETE).unwrap();
        assert_eq!(perft(&p, 1), 48);
        assert_eq!(perft(&p, 2), 2039);
    }

    #[test]
    #[ignore = "slow; run with --ignored in release mode"]
    fn kiwipete_deep() {
        let p = Position::from_fen(KIWIPETE).unwrap();
        assert_eq!(perft(&p, 3), 97_862);
        assert_eq!(perft(&p, 4), 4_085_603);
    }

    #[test]
    fn en_passant_heavy_position() {
        // position 3 from the chessprogramming wiki perft suite
        let p = Position::from_fen("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1").unwrap();
        assert_eq!(perft(&p, 1), 14);
        assert_eq!(perft(&p, 2), 191);
        assert_eq!(perft(&p, 3), 2812);
        assert_eq!(perft(&p, 4), 43_238);
    }

    #[test]
    fn promotion_heavy_position() {
        // position 4 from the chessprogramming wiki perft suite
        let p = Position::from_fen("r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1")
            .unwrap();
        assert_eq!(perft(&p, 1), 6);
        assert_eq!(perft(&p, 2), 264);
        assert_eq!(perft(&p, 3), 9467);
    }

    #[test]
    fn divide_sums_to_perft() {
        let p = Position::startpos();
        let divided = perft_divide(&p, 3);
        assert_eq!(divided.len(), 20);
        let total: u64 = divided.iter().map(|(_, n)| n).sum();
        assert_eq!(total, perft(&p, 3));
    }
}
