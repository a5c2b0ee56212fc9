use core::time::Duration;

use crate::engine::snapshot::Snapshot;
use crate::engine::types::Color;
use crate::error::AgentError;

/// ホスト環境から 1 手ごとに渡される入力。
#[derive(Copy, Clone, Debug)]
pub struct MoveRequest<'req> {
    /// 手番側。
    pub player: Color,
    /// 盤面スナップショット。
    pub snapshot: &'req Snapshot,
    /// この手の持ち時間。
    pub time_budget: Duration,
    /// 列ごとの着手可否。
    pub valid_mask: &'req [bool],
}

/// 手を選択するAI。
pub trait Ai {
    /// 現在局面から次の列を選択する。
    ///
    /// # Errors
    ///
    /// 着手可能な列がない等、呼び出し側の契約違反を `AgentError` で返す。
    fn select_move(&mut self, request: &MoveRequest<'_>) -> Result<u8, AgentError>;
}
