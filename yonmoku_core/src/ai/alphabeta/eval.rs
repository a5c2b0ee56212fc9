use crate::engine::board::Board;
use crate::engine::types::Color;

/// 窓の長さ（勝ちに必要な連続数）。
const WINDOW_LEN: u8 = 4;

/// 片方の色だけを含む窓の重み（添字は窓内の石数）。4 個は終局として別扱いなので 3 個と同じ値で頭打ちにする。
const WINDOW_WEIGHTS: [i32; 5] = [0, 1, 5, 50, 50];

/// 石が属する窓の数に比例する中央ボーナスの重み。
const CENTER_WEIGHT: i32 = 1;

/// 盤サイズごとに前計算した長さ 4 の窓（ビットマスク）の集合。
#[derive(Clone, Debug)]
pub(super) struct Evaluator {
    /// 横・縦・斜め 2 方向のすべての窓。
    windows: Vec<u64>,
}

impl Evaluator {
    /// 盤サイズに合わせて窓を列挙する。
    pub(super) fn new(board: &Board) -> Self {
        let rows = i16::from(board.rows());
        let columns = i16::from(board.columns());
        let stride = rows.wrapping_add(1);
        let len = i16::from(WINDOW_LEN);

        let mut windows = Vec::new();
        for (d_row, d_col) in [(0_i16, 1_i16), (1, 0), (1, 1), (-1, 1)] {
            for row in 0..rows {
                for column in 0..columns {
                    let end_row = row.wrapping_add(d_row.wrapping_mul(len.wrapping_sub(1)));
                    let end_col = column.wrapping_add(d_col.wrapping_mul(len.wrapping_sub(1)));
                    if !(0..rows).contains(&end_row) || !(0..columns).contains(&end_col) {
                        continue;
                    }

                    let mut mask = u64::MIN;
                    for step in 0..len {
                        let r = row.wrapping_add(d_row.wrapping_mul(step));
                        let c = column.wrapping_add(d_col.wrapping_mul(step));
                        let index = c.wrapping_mul(stride).wrapping_add(r);
                        let shift = u32::try_from(index).unwrap_or(u32::MAX);
                        mask |= 1_u64.checked_shl(shift).unwrap_or(u64::MIN);
                    }
                    windows.push(mask);
                }
            }
        }

        Self { windows }
    }

    /// 手番視点の静的評価。
    pub(super) fn evaluate(&self, board: &Board) -> i32 {
        self.score_for(board, board.side_to_move())
    }

    /// `color` 視点の静的評価。`score_for(b, A) == -score_for(b, B)` を満たす。
    pub(super) fn score_for(&self, board: &Board, color: Color) -> i32 {
        let own = board.discs(color);
        let other = board.discs(color.opponent());

        self.windows.iter().fold(0_i32, |score, &window| {
            let mine = (own & window).count_ones();
            let theirs = (other & window).count_ones();
            let presence = i32::try_from(mine)
                .unwrap_or(0)
                .wrapping_sub(i32::try_from(theirs).unwrap_or(0))
                .wrapping_mul(CENTER_WEIGHT);
            let line = if theirs == 0 {
                window_weight(mine)
            } else if mine == 0 {
                window_weight(theirs).wrapping_neg()
            } else {
                0
            };
            score.wrapping_add(line).wrapping_add(presence)
        })
    }

    /// 窓の総数を返す。
    #[cfg(test)]
    pub(super) fn window_count(&self) -> usize {
        self.windows.len()
    }
}

/// 窓内の石数に対応する重み。
fn window_weight(count: u32) -> i32 {
    usize::try_from(count)
        .ok()
        .and_then(|index| WINDOW_WEIGHTS.get(index).copied())
        .unwrap_or(0)
}
