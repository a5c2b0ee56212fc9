use crate::engine::types::{ColumnSet, MAX_COLUMNS};

/// 並べ替え済みの列（探索ノードごとのヒープ確保を避けるため固定長）。
#[derive(Copy, Clone, Debug)]
pub(super) struct OrderedColumns {
    /// 列（先頭 `len` 個が有効）。
    columns: [u8; MAX_COLUMNS as usize],
    /// 次に返す位置。
    cursor: u8,
    /// 有効な要素数。
    len: u8,
}

impl OrderedColumns {
    /// 最初の列を返す（空なら `None`）。
    pub(super) fn first(&self) -> Option<u8> {
        (self.len > u8::MIN)
            .then(|| self.columns.first().copied())
            .flatten()
    }
}

impl Iterator for OrderedColumns {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        if self.cursor >= self.len {
            return None;
        }
        let column = self.columns.get(usize::from(self.cursor)).copied();
        self.cursor = self.cursor.wrapping_add(1);
        column
    }
}

/// 中央からの距離（半列単位）。偶数列の盤では中央 2 列が同距離になる。
pub(super) const fn center_distance(column: u8, width: u8) -> u8 {
    let doubled = column.wrapping_mul(2);
    let center = width.saturating_sub(1);
    doubled.abs_diff(center)
}

/// 候補列を中央優先（同距離なら左を先）に並べ、置換表の最善手があれば先頭へ移す。
///
/// 並び順は枝刈り効率にのみ影響し、候補列を除外することはない。
pub(super) fn order_moves(candidates: ColumnSet, width: u8, tt_move: Option<u8>) -> OrderedColumns {
    let mut ordered = OrderedColumns {
        columns: [u8::MIN; MAX_COLUMNS as usize],
        cursor: u8::MIN,
        len: u8::MIN,
    };

    for column in candidates.iter() {
        if let Some(slot) = ordered.columns.get_mut(usize::from(ordered.len)) {
            *slot = column;
            ordered.len = ordered.len.wrapping_add(1);
        }
    }

    let len = usize::from(ordered.len);
    if let Some(active) = ordered.columns.get_mut(..len) {
        active.sort_by_key(|&column| (center_distance(column, width), column));

        if let Some(best) = tt_move.filter(|&column| candidates.contains(column)) {
            if let Some(pos) = active.iter().position(|&column| column == best) {
                if let Some(prefix) = active.get_mut(..=pos) {
                    prefix.rotate_right(1);
                }
            }
        }
    }

    ordered
}
