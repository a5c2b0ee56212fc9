//! 公開 API が返すエラー型。

use thiserror::Error;

/// 着手の適用に失敗した理由。
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
#[non_exhaustive]
pub enum MoveError {
    /// 列が満杯。
    #[error("column {column} is full")]
    ColumnFull {
        /// 対象の列。
        column: u8,
    },
    /// 列番号が盤の範囲外。
    #[error("column {column} is out of range (board has {columns} columns)")]
    ColumnOutOfRange {
        /// 対象の列。
        column: u8,
        /// 盤の列数。
        columns: u8,
    },
}

/// 盤面の構築（サイズ指定・スナップショット読み込み）に失敗した理由。
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
#[non_exhaustive]
pub enum BoardError {
    /// セル数が `rows * columns` と一致しない、または行ごとの長さが揃っていない。
    #[error("snapshot has {actual} cells, expected {expected}")]
    DimensionMismatch {
        /// 実際のセル数。
        actual: usize,
        /// 期待するセル数。
        expected: usize,
    },
    /// 下が空いているマスに石がある。
    #[error("disc at row {row}, column {column} has an empty cell below it")]
    FloatingDisc {
        /// 上端を 0 とした行番号。
        row: u8,
        /// 列番号。
        column: u8,
    },
    /// 同じマスに両者の石が置かれている。
    #[error("cell at row {row}, column {column} is claimed by both players")]
    OverlappingDiscs {
        /// 上端を 0 とした行番号。
        row: u8,
        /// 列番号。
        column: u8,
    },
    /// 未知の文字。
    #[error("unknown cell marker {marker:?}")]
    UnknownMarker {
        /// 読み取った文字。
        marker: char,
    },
    /// 対応していない盤サイズ。
    #[error("unsupported board size {rows}x{columns}")]
    UnsupportedDimensions {
        /// 行数。
        rows: u8,
        /// 列数。
        columns: u8,
    },
}

/// 手選択（`choose_move`）の契約違反。
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
#[non_exhaustive]
pub enum AgentError {
    /// スナップショットが不正。
    #[error("invalid snapshot: {0}")]
    Board(#[from] BoardError),
    /// マスクの長さが列数と一致しない。
    #[error("valid-move mask has {actual} entries, board has {expected} columns")]
    MaskLength {
        /// 実際の長さ。
        actual: usize,
        /// 盤の列数。
        expected: usize,
    },
    /// マスクが満杯の列を着手可能としている。
    #[error("valid-move mask marks full column {column} as playable")]
    MaskedColumnFull {
        /// 対象の列。
        column: u8,
    },
    /// 着手可能な列がない。
    #[error("no legal move: the valid-move mask is empty")]
    NoLegalMove,
}
