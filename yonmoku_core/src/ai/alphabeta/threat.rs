//! 即勝ち・即受け・自殺手の検出。
//!
//! どれも「列に置いてみて、置いた石から 4 方向を調べて、戻す」だけで判定する。

use crate::engine::board::Board;
use crate::engine::types::{Color, ColumnSet};

use super::move_ordering::order_moves;

/// 相手の即勝ちに対する受けの判定結果。
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum Block {
    /// 相手に即勝ちの列がない。
    Unneeded,
    /// この列を埋めれば相手の即勝ちを防げる。
    Single(u8),
    /// 1 手では防げない（ダブルスレット、または受けの列が選べない）。相手の勝ち列を持つ。
    Unavailable(ColumnSet),
}

/// `candidates` のうち、`player` が置くと 4 連になる列をすべて返す。
///
/// 手番に関係なく `player` の石として試す。盤面は呼び出し前の状態に戻る。
#[inline]
pub fn winning_columns(board: &mut Board, player: Color, candidates: ColumnSet) -> ColumnSet {
    ColumnSet::from_columns(candidates.iter().filter(|&column| {
        board
            .with_move_for(player, column, |after, landing| {
                after.check_win_from(landing.row(), landing.column())
            })
            .unwrap_or(false)
    }))
}

/// `player` の即勝ちの列を中央優先で 1 つ返す。
#[inline]
pub fn find_immediate_win(board: &mut Board, player: Color, valid: ColumnSet) -> Option<u8> {
    let wins = winning_columns(board, player, valid);
    order_moves(wins, board.columns(), None).first()
}

/// `opponent` の即勝ちを防ぐ列を求める。
///
/// 相手の勝ち列は盤面上で置ける列すべてから探す（ホストのマスクは自分の手にだけ効く）。
/// 勝ち列が 2 本以上あるか、唯一の勝ち列が `valid` に含まれない場合は
/// `Block::Unavailable` を返し、受けを推測しない。
#[inline]
pub fn find_required_block(board: &mut Board, opponent: Color, valid: ColumnSet) -> Block {
    let playable = board.playable_columns();
    let threats = winning_columns(board, opponent, playable);

    let mut columns = threats.iter();
    match (columns.next(), columns.next()) {
        (None, _) => Block::Unneeded,
        (Some(column), None) if valid.contains(column) => Block::Single(column),
        _ => Block::Unavailable(threats),
    }
}

/// `player` が `column` に置くと、相手に即勝ちの応手が生まれるかを返す。
///
/// 置いた手そのものが勝ちなら自殺手ではない。置けない列は `false`。
#[inline]
pub fn leaves_immediate_win(board: &mut Board, player: Color, column: u8) -> bool {
    board
        .with_move_for(player, column, |after, landing| {
            if after.check_win_from(landing.row(), landing.column()) {
                return false;
            }
            let replies = after.playable_columns();
            !winning_columns(after, player.opponent(), replies).is_empty()
        })
        .unwrap_or(false)
}

/// `candidates` から自殺手を除いた列を返す（全部が自殺手なら空集合）。
#[inline]
pub fn safe_columns(board: &mut Board, player: Color, candidates: ColumnSet) -> ColumnSet {
    ColumnSet::from_columns(
        candidates
            .iter()
            .filter(|&column| !leaves_immediate_win(board, player, column)),
    )
}
