use crate::engine::snapshot::Snapshot;
use crate::engine::types::{Color, ColumnSet, MAX_COLUMNS};
use crate::engine::zobrist::ZOBRIST;
use crate::error::{BoardError, MoveError};

/// 盤面に使えるビット数（最上位ビットは局面コードの手番に使う）。
const USABLE_BITS: u16 = 63;

/// 勝ちに必要な連続数。
const CONNECT: u8 = 4;

/// 勝ち判定の 4 方向（行の増分、列の増分）。横・縦・右上がり・右下がり。
const DIRECTIONS: [(i16, i16); 4] = [(0, 1), (1, 0), (1, 1), (-1, 1)];

/// 列の配列長。
const HEIGHTS_LEN: usize = MAX_COLUMNS as usize;

/// 石が着地したマス（行は下端を 0 とする）。
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Landing {
    /// 列。
    column: u8,
    /// 行（下端が 0）。
    row: u8,
}

impl Landing {
    /// 列を返す。
    #[inline]
    #[must_use]
    pub const fn column(self) -> u8 {
        self.column
    }

    /// 行（下端が 0）を返す。
    #[inline]
    #[must_use]
    pub const fn row(self) -> u8 {
        self.row
    }
}

/// `apply` の取り消しに必要な情報。
///
/// 複製できないため、1 回の `apply` に対して `undo` はちょうど 1 回だけ呼べる。
#[derive(Debug, Eq, PartialEq)]
#[must_use = "an applied move must be undone with Board::undo"]
pub struct UndoRecord {
    /// 着地したマス。
    landing: Landing,
    /// 着手前のハッシュ。
    prior_hash: u64,
    /// 着手前の手番。
    prior_side: Color,
}

impl UndoRecord {
    /// 着地したマスを返す。
    #[inline]
    #[must_use]
    pub const fn landing(&self) -> Landing {
        self.landing
    }
}

/// 探索用の可変盤面。
///
/// 列ごとに `rows + 1` ビット（最上段の上に番兵 1 ビット）を割り当てたビットボードで保持する。
/// ビット位置は `column * (rows + 1) + row`（行は下端が 0）。
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Board {
    /// 列数。
    columns: u8,
    /// 占有状況と手番から決まる Zobrist ハッシュ。
    hash: u64,
    /// 列ごとの石の数。
    heights: [u8; HEIGHTS_LEN],
    /// 置かれている石の数。
    moves: u16,
    /// 赤石のビットボード。
    red: u64,
    /// 行数。
    rows: u8,
    /// 手番。
    side_to_move: Color,
    /// 黄石のビットボード。
    yellow: u64,
}

impl Board {
    /// 標準盤の列数。
    pub const STANDARD_COLUMNS: u8 = 7;

    /// 標準盤の行数。
    pub const STANDARD_ROWS: u8 = 6;

    /// 手番側の石を `column` に落とす。
    ///
    /// # Errors
    ///
    /// 列が範囲外なら `MoveError::ColumnOutOfRange`、満杯なら `MoveError::ColumnFull`。
    #[inline]
    pub fn apply(&mut self, column: u8) -> Result<UndoRecord, MoveError> {
        self.apply_for(self.side_to_move, column)
    }

    /// `color` の石を `column` に落とし、手番を `color` の相手にする。
    ///
    /// 脅威検出で相手側の着手を試すために使う。
    ///
    /// # Errors
    ///
    /// 列が範囲外なら `MoveError::ColumnOutOfRange`、満杯なら `MoveError::ColumnFull`。
    #[inline]
    pub fn apply_for(&mut self, color: Color, column: u8) -> Result<UndoRecord, MoveError> {
        let row = self.landing_row(column)?;
        let bit_index = self.bit_index(row, column);
        let bit = bit_at(bit_index);

        match color {
            Color::Red => self.red |= bit,
            Color::Yellow => self.yellow |= bit,
        }

        let record = UndoRecord {
            landing: Landing { column, row },
            prior_hash: self.hash,
            prior_side: self.side_to_move,
        };

        if let Some(height) = self.heights.get_mut(usize::from(column)) {
            *height = height.wrapping_add(1);
        }
        self.moves = self.moves.wrapping_add(1);

        let next_side = color.opponent();
        self.hash ^= ZOBRIST.piece(color, bit_index)
            ^ ZOBRIST.side(self.side_to_move)
            ^ ZOBRIST.side(next_side);
        self.side_to_move = next_side;

        Ok(record)
    }

    /// 着手ビット位置を返す。
    fn bit_index(&self, row: u8, column: u8) -> u32 {
        let stride = u32::from(self.rows).wrapping_add(1);
        u32::from(column)
            .wrapping_mul(stride)
            .wrapping_add(u32::from(row))
    }

    /// 各列の最下段ビットの集合。
    fn bottom_mask(&self) -> u64 {
        (u8::MIN..self.columns).fold(u64::MIN, |mask, column| {
            mask | bit_at(self.bit_index(u8::MIN, column))
        })
    }

    /// 最後に置いた石 `(row, column)` を通る 4 本の線だけを調べ、4 連以上なら `true`。
    ///
    /// 行は下端を 0 とする。空マスを指定した場合は `false`。
    #[inline]
    #[must_use]
    pub fn check_win_from(&self, row: u8, column: u8) -> bool {
        let Some(color) = self.piece_at(row, column) else {
            return false;
        };

        DIRECTIONS.iter().any(|&(d_row, d_col)| {
            let forward = self.run_length(color, row, column, d_row, d_col);
            let backward = self.run_length(color, row, column, d_row.wrapping_neg(), d_col.wrapping_neg());
            forward.saturating_add(backward).saturating_add(1) >= CONNECT
        })
    }

    /// 列数を返す。
    #[inline]
    #[must_use]
    pub const fn columns(&self) -> u8 {
        self.columns
    }

    /// Zobrist ハッシュを盤面から計算し直す。
    #[must_use]
    pub(crate) fn compute_hash(&self) -> u64 {
        let mut key = ZOBRIST.side(self.side_to_move);
        for (color, bitboard) in [(Color::Red, self.red), (Color::Yellow, self.yellow)] {
            let mut bb = bitboard;
            while bb != u64::MIN {
                key ^= ZOBRIST.piece(color, bb.trailing_zeros());
                bb &= bb.wrapping_sub(1);
            }
        }
        key
    }

    /// 指定色の石のビットボードを返す。
    #[inline]
    #[must_use]
    pub(crate) const fn discs(&self, color: Color) -> u64 {
        match color {
            Color::Red => self.red,
            Color::Yellow => self.yellow,
        }
    }

    /// 空きマス数を返す。
    #[inline]
    #[must_use]
    pub fn empty_cells(&self) -> u16 {
        u16::from(self.rows)
            .wrapping_mul(u16::from(self.columns))
            .saturating_sub(self.moves)
    }

    /// スナップショットから盤面を構築する。
    ///
    /// # Errors
    ///
    /// 盤サイズが表現できない場合は `BoardError::UnsupportedDimensions`、
    /// 下が空いている石がある場合は `BoardError::FloatingDisc` を返す。
    #[inline]
    pub fn from_snapshot(snapshot: &Snapshot, side_to_move: Color) -> Result<Self, BoardError> {
        let mut board = Self::new(snapshot.rows(), snapshot.columns())?;
        board.side_to_move = side_to_move;

        for column in u8::MIN..board.columns {
            let mut gap = false;
            // 下端（スナップショットの最終行）から上へ走査する。
            for row_from_top in (u8::MIN..board.rows).rev() {
                match snapshot.cell(row_from_top, column) {
                    None => gap = true,
                    Some(_) if gap => {
                        return Err(BoardError::FloatingDisc {
                            row: row_from_top,
                            column,
                        });
                    }
                    Some(color) => {
                        let row = board.height(column);
                        let bit = bit_at(board.bit_index(row, column));
                        match color {
                            Color::Red => board.red |= bit,
                            Color::Yellow => board.yellow |= bit,
                        }
                        if let Some(height) = board.heights.get_mut(usize::from(column)) {
                            *height = height.wrapping_add(1);
                        }
                        board.moves = board.moves.wrapping_add(1);
                    }
                }
            }
        }

        board.hash = board.compute_hash();
        Ok(board)
    }

    /// 現在の Zobrist ハッシュを返す。
    #[inline]
    #[must_use]
    pub const fn hash(&self) -> u64 {
        self.hash
    }

    /// 列の石の数を返す（範囲外は 0）。
    #[inline]
    #[must_use]
    pub fn height(&self, column: u8) -> u8 {
        self.heights
            .get(usize::from(column))
            .copied()
            .unwrap_or(u8::MIN)
    }

    /// 盤面が埋まっているかを返す。
    #[inline]
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.empty_cells() == 0
    }

    /// 次に石が着地する行を返す。
    fn landing_row(&self, column: u8) -> Result<u8, MoveError> {
        if column >= self.columns {
            return Err(MoveError::ColumnOutOfRange {
                column,
                columns: self.columns,
            });
        }
        let height = self.height(column);
        if height >= self.rows {
            return Err(MoveError::ColumnFull { column });
        }
        Ok(height)
    }

    /// 置かれている石の数を返す。
    #[inline]
    #[must_use]
    pub const fn move_count(&self) -> u16 {
        self.moves
    }

    /// 空の盤面を生成する（赤番）。
    ///
    /// # Errors
    ///
    /// 行・列が 0、列数が上限を超える、または `(rows + 1) * columns > 63` の場合
    /// `BoardError::UnsupportedDimensions` を返す。
    #[inline]
    pub fn new(rows: u8, columns: u8) -> Result<Self, BoardError> {
        let bits = (u16::from(rows).wrapping_add(1)).wrapping_mul(u16::from(columns));
        if rows == u8::MIN || columns == u8::MIN || columns > MAX_COLUMNS || bits > USABLE_BITS {
            return Err(BoardError::UnsupportedDimensions { rows, columns });
        }
        Ok(Self {
            columns,
            hash: u64::MIN,
            heights: [u8::MIN; HEIGHTS_LEN],
            moves: u16::MIN,
            red: u64::MIN,
            rows,
            side_to_move: Color::Red,
            yellow: u64::MIN,
        })
    }

    /// 指定マスの石を返す（行は下端が 0）。
    #[inline]
    #[must_use]
    pub fn piece_at(&self, row: u8, column: u8) -> Option<Color> {
        if row >= self.rows || column >= self.columns {
            return None;
        }
        let mask = bit_at(self.bit_index(row, column));
        if self.red & mask != u64::MIN {
            Some(Color::Red)
        } else if self.yellow & mask != u64::MIN {
            Some(Color::Yellow)
        } else {
            None
        }
    }

    /// 指定列に着手できるかを返す。
    #[inline]
    #[must_use]
    pub fn playable(&self, column: u8) -> bool {
        column < self.columns && self.height(column) < self.rows
    }

    /// 着手可能な列の集合を返す。
    #[inline]
    #[must_use]
    pub fn playable_columns(&self) -> ColumnSet {
        ColumnSet::from_columns((u8::MIN..self.columns).filter(|&column| self.playable(column)))
    }

    /// 局面を一意に表す 64 bit コード（置換表の照合用）。
    ///
    /// 列ごとに「手番側の石 + 占有 + 最下段」を足すと、各列は高さの位置に 1 が立ち
    /// その下に手番側の石が並ぶ形になるため、占有と手番側の石の組が一意に決まる。
    /// 最上位ビットには手番を入れる。空の盤面でも 0 にはならない。
    #[inline]
    #[must_use]
    pub fn position_code(&self) -> u64 {
        let own = self.discs(self.side_to_move);
        let occupied = self.red | self.yellow;
        let code = own
            .wrapping_add(occupied)
            .wrapping_add(self.bottom_mask());
        match self.side_to_move {
            Color::Red => code,
            Color::Yellow => code | (1_u64 << USABLE_BITS),
        }
    }

    /// 行数を返す。
    #[inline]
    #[must_use]
    pub const fn rows(&self) -> u8 {
        self.rows
    }

    /// `(row, column)` から `(d_row, d_col)` 方向に続く同色の石の数（最大 3）。
    fn run_length(&self, color: Color, row: u8, column: u8, d_row: i16, d_col: i16) -> u8 {
        let mut count = u8::MIN;
        let mut r = i16::from(row);
        let mut c = i16::from(column);
        while count < CONNECT.wrapping_sub(1) {
            r = r.wrapping_add(d_row);
            c = c.wrapping_add(d_col);
            let (Ok(next_row), Ok(next_col)) = (u8::try_from(r), u8::try_from(c)) else {
                break;
            };
            if self.piece_at(next_row, next_col) != Some(color) {
                break;
            }
            count = count.wrapping_add(1);
        }
        count
    }

    /// 手番を返す。
    #[inline]
    #[must_use]
    pub const fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// 標準盤（6 行 7 列）の空の盤面を返す。
    #[inline]
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            columns: Self::STANDARD_COLUMNS,
            hash: u64::MIN,
            heights: [u8::MIN; HEIGHTS_LEN],
            moves: u16::MIN,
            red: u64::MIN,
            rows: Self::STANDARD_ROWS,
            side_to_move: Color::Red,
            yellow: u64::MIN,
        }
    }

    /// 上端を行 0 とするスナップショットに変換する。
    #[inline]
    #[must_use]
    pub fn to_snapshot(&self) -> Snapshot {
        let mut cells = Vec::with_capacity(usize::from(self.rows).wrapping_mul(usize::from(self.columns)));
        for row_from_top in (u8::MIN..self.rows).rev() {
            for column in u8::MIN..self.columns {
                cells.push(self.piece_at(row_from_top, column));
            }
        }
        Snapshot::from_cells_unchecked(self.rows, self.columns, cells)
    }

    /// `apply` → `undo` の組を `f` の前後で必ず実行する。
    ///
    /// `f` が早期リターン（`?`）しても盤面は元に戻る。
    ///
    /// # Errors
    ///
    /// 着手できない列の場合は `f` を呼ばずに `MoveError` を返す。
    #[inline]
    pub fn with_move<R, F>(&mut self, column: u8, f: F) -> Result<R, MoveError>
    where
        F: FnOnce(&mut Self, Landing) -> R,
    {
        self.with_move_for(self.side_to_move, column, f)
    }

    /// `apply_for` → `undo` の組を `f` の前後で必ず実行する。
    ///
    /// # Errors
    ///
    /// 着手できない列の場合は `f` を呼ばずに `MoveError` を返す。
    #[inline]
    pub fn with_move_for<R, F>(&mut self, color: Color, column: u8, f: F) -> Result<R, MoveError>
    where
        F: FnOnce(&mut Self, Landing) -> R,
    {
        let record = self.apply_for(color, column)?;
        let result = f(self, record.landing());
        self.undo(record);
        Ok(result)
    }

    /// `apply` / `apply_for` を取り消す。適用と逆の順序で呼ぶこと。
    #[inline]
    pub fn undo(&mut self, record: UndoRecord) {
        let Landing { column, row } = record.landing;
        let mask = !bit_at(self.bit_index(row, column));
        self.red &= mask;
        self.yellow &= mask;

        if let Some(height) = self.heights.get_mut(usize::from(column)) {
            *height = height.wrapping_sub(1);
        }
        self.moves = self.moves.wrapping_sub(1);
        self.hash = record.prior_hash;
        self.side_to_move = record.prior_side;
    }
}

/// 1 ビットだけ立てた値を返す。
const fn bit_at(index: u32) -> u64 {
    match 1_u64.checked_shl(index) {
        Some(value) => value,
        None => u64::MIN,
    }
}

#[cfg(test)]
mod tests {
    use super::Board;
    use crate::engine::snapshot::Snapshot;
    use crate::engine::types::Color;
    use crate::error::{BoardError, MoveError};

    fn board_from(text: &str, side: Color) -> Board {
        let snapshot = Snapshot::parse(text);
        assert!(snapshot.is_ok(), "snapshot must parse: {snapshot:?}");
        let board = snapshot.and_then(|value| Board::from_snapshot(&value, side));
        assert!(board.is_ok(), "board must build: {board:?}");
        board.unwrap_or_else(|_| Board::standard())
    }

    #[test]
    fn apply_then_undo_restores_every_field() {
        let mut board = Board::standard();
        let before = board.clone();

        let first = board.apply(3);
        assert!(first.is_ok());
        let Ok(first) = first else { return };
        assert_eq!(board.move_count(), 1);
        assert_eq!(board.height(3), 1);
        assert_eq!(board.side_to_move(), Color::Yellow);
        assert_eq!(board.piece_at(0, 3), Some(Color::Red));

        let second = board.apply(3);
        assert!(second.is_ok());
        let Ok(second) = second else { return };
        assert_eq!(second.landing().row(), 1);

        board.undo(second);
        board.undo(first);
        assert_eq!(board, before);
    }

    #[test]
    fn incremental_hash_matches_recomputation() {
        let mut board = Board::standard();
        let mut records = Vec::new();
        for column in [3_u8, 3, 2, 4, 4, 0, 6, 6, 6, 1] {
            let record = board.apply(column);
            assert!(record.is_ok());
            let Ok(record) = record else { return };
            assert_eq!(board.hash(), board.compute_hash());
            records.push(record);
        }
        while let Some(record) = records.pop() {
            board.undo(record);
            assert_eq!(board.hash(), board.compute_hash());
        }
        assert_eq!(board, Board::standard());
    }

    #[test]
    fn hash_and_code_depend_on_side_to_move() {
        let board = Board::standard();
        let red_hash = board.hash();
        let red_code = board.position_code();

        let yellow_board = board_from(".......\n.......\n.......\n.......\n.......\n.......", Color::Yellow);
        assert_ne!(yellow_board.hash(), red_hash);
        assert_ne!(yellow_board.position_code(), red_code);
        assert_ne!(red_code, 0);
    }

    #[test]
    fn full_and_out_of_range_columns_are_rejected() {
        let mut board = Board::standard();
        let mut records = Vec::new();
        for _ in 0..Board::STANDARD_ROWS {
            let record = board.apply(0);
            assert!(record.is_ok());
            records.extend(record);
        }
        assert_eq!(records.len(), 6);
        assert_eq!(board.apply(0), Err(MoveError::ColumnFull { column: 0 }));
        assert_eq!(
            board.apply(7),
            Err(MoveError::ColumnOutOfRange { column: 7, columns: 7 })
        );
        assert!(!board.playable(0));
        assert!(!board.playable_columns().contains(0));
    }

    #[test]
    fn win_is_detected_in_all_four_directions() {
        let horizontal = board_from(
            "
            .......
            .......
            .......
            .......
            .......
            XXXX...
            ",
            Color::Yellow,
        );
        assert!(horizontal.check_win_from(0, 3));
        assert!(horizontal.check_win_from(0, 1));

        let vertical = board_from(
            "
            .......
            .......
            ..X....
            ..X....
            ..X....
            ..X....
            ",
            Color::Yellow,
        );
        assert!(vertical.check_win_from(3, 2));

        let rising = board_from(
            "
            .......
            .......
            ...X...
            ..XO...
            .XOO...
            XOOO...
            ",
            Color::Yellow,
        );
        assert!(rising.check_win_from(3, 3));
        assert!(rising.check_win_from(0, 0));

        let falling = board_from(
            "
            .......
            .......
            X......
            OX.....
            OOX....
            OOOX...
            ",
            Color::Yellow,
        );
        assert!(falling.check_win_from(3, 0));
        assert!(falling.check_win_from(0, 3));

        let three = board_from(
            "
            .......
            .......
            .......
            .......
            .......
            XXX.XXX
            ",
            Color::Yellow,
        );
        assert!(!three.check_win_from(0, 2));
        assert!(!three.check_win_from(0, 3));
    }

    #[test]
    fn floating_discs_are_rejected() {
        let snapshot = Snapshot::parse("X..\n...\n...");
        assert!(snapshot.is_ok());
        let Ok(snapshot) = snapshot else { return };
        assert_eq!(
            Board::from_snapshot(&snapshot, Color::Red),
            Err(BoardError::FloatingDisc { row: 0, column: 0 })
        );
    }

    #[test]
    fn snapshot_round_trip_preserves_discs() {
        let text = "
            .......
            .......
            .......
            ...X...
            ..OX...
            .XOOX..
            ";
        let board = board_from(text, Color::Yellow);
        assert_eq!(board.move_count(), 7);
        assert_eq!(board.height(3), 3);
        let again = Board::from_snapshot(&board.to_snapshot(), Color::Yellow);
        assert_eq!(again, Ok(board));
    }

    #[test]
    fn unsupported_dimensions_are_rejected() {
        assert!(matches!(Board::new(0, 7), Err(BoardError::UnsupportedDimensions { .. })));
        assert!(matches!(Board::new(8, 8), Err(BoardError::UnsupportedDimensions { .. })));
        assert!(Board::new(4, 4).is_ok());
        assert!(Board::new(8, 7).is_ok());
    }

    #[test]
    fn board_fills_up() {
        let mut board = Board::new(2, 2).unwrap_or_else(|_| Board::standard());
        let mut records = Vec::new();
        for column in [0_u8, 0, 1, 1] {
            if let Ok(record) = board.apply(column) {
                records.push(record);
            }
        }
        assert!(board.is_full());
        assert!(board.playable_columns().is_empty());
        while let Some(record) = records.pop() {
            board.undo(record);
        }
        assert_eq!(board.move_count(), 0);
    }
}
