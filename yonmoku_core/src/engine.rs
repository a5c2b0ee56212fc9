/// 探索用の可変盤面（着手・取り消し・勝ち判定）。
pub mod board;
/// ホスト環境から渡される盤面スナップショット。
pub mod snapshot;
pub mod types;
mod zobrist;

pub type Board = board::Board;
pub type Color = types::Color;
pub type ColumnSet = types::ColumnSet;
pub type Landing = board::Landing;
pub type Snapshot = snapshot::Snapshot;
pub type UndoRecord = board::UndoRecord;
