use std::time::{Duration, Instant};

use super::eval::Evaluator;
use super::tt::TranspositionTable;

/// 探索の制限。
#[derive(Clone, Copy, Debug)]
pub(super) struct SearchLimits {
    /// 次の深さの所要時間の見積もりに使う分岐係数。
    branching_factor: f64,
    /// 反復深化の最大深さ（ply）。
    max_depth: u8,
    /// 探索のノード上限。
    node_budget: u64,
    /// 持ち時間。
    time_budget: Duration,
    /// 置換表を使うか。
    use_tt: bool,
}

impl SearchLimits {
    /// 分岐係数を返す。
    pub(super) const fn branching_factor(&self) -> f64 {
        self.branching_factor
    }

    /// 探索の最大深さ（ply）を返す。
    pub(super) const fn max_depth(&self) -> u8 {
        self.max_depth
    }

    /// 探索制限を生成する。
    ///
    /// - `max_depth`: 反復深化の最大深さ（ply）
    /// - `node_budget`: 探索のノード上限（`u64::MAX` で無制限扱い）
    /// - `time_budget`: 反復深化の持ち時間
    pub(super) const fn new(
        max_depth: u8,
        node_budget: u64,
        time_budget: Duration,
        branching_factor: f64,
        use_tt: bool,
    ) -> Self {
        Self {
            branching_factor,
            max_depth,
            node_budget,
            time_budget,
            use_tt,
        }
    }

    /// 探索のノード上限を返す。
    pub(super) const fn node_budget(&self) -> u64 {
        self.node_budget
    }

    /// 持ち時間を返す。
    pub(super) const fn time_budget(&self) -> Duration {
        self.time_budget
    }

    /// 置換表を使うかを返す。
    pub(super) const fn use_tt(&self) -> bool {
        self.use_tt
    }
}

/// 探索統計。
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SearchStats {
    /// ベータカットで枝刈りした回数。
    cutoffs: u64,
    /// 探索したノード数。
    nodes: u64,
    /// 置換表で探索を打ち切れた回数。
    tt_hits: u64,
    /// 置換表へ保存した回数。
    tt_stores: u64,
}

impl SearchStats {
    /// 枝刈りの回数を返す。
    #[inline]
    #[must_use]
    pub const fn cutoffs(&self) -> u64 {
        self.cutoffs
    }

    /// 枝刈りの回数を加算する。
    pub(super) const fn inc_cutoffs(&mut self) {
        self.cutoffs = self.cutoffs.wrapping_add(1);
    }

    /// 探索ノード数を加算する。
    pub(super) const fn inc_nodes(&mut self) {
        self.nodes = self.nodes.wrapping_add(1);
    }

    /// 置換表ヒット回数を加算する。
    pub(super) const fn inc_tt_hits(&mut self) {
        self.tt_hits = self.tt_hits.wrapping_add(1);
    }

    /// 置換表保存回数を加算する。
    pub(super) const fn inc_tt_stores(&mut self) {
        self.tt_stores = self.tt_stores.wrapping_add(1);
    }

    /// すべて 0 の統計を返す。
    pub(super) const fn new() -> Self {
        Self {
            cutoffs: 0,
            nodes: 0,
            tt_hits: 0,
            tt_stores: 0,
        }
    }

    /// 探索ノード数を返す。
    #[inline]
    #[must_use]
    pub const fn nodes(&self) -> u64 {
        self.nodes
    }

    /// 置換表ヒット回数を返す。
    #[inline]
    #[must_use]
    pub const fn tt_hits(&self) -> u64 {
        self.tt_hits
    }

    /// 置換表保存回数を返す。
    #[inline]
    #[must_use]
    pub const fn tt_stores(&self) -> u64 {
        self.tt_stores
    }
}

/// ノード上限により探索を中断する。
#[derive(Debug, Clone, Copy)]
pub(super) struct SearchAbort;

/// 探索実行に必要な共有コンテキスト。
pub(super) struct SearchContext<'ctx> {
    /// 探索開始時刻（持ち時間の起点）。
    started: Instant,
    /// 静的評価。
    evaluator: &'ctx Evaluator,
    /// 探索制限。
    limits: SearchLimits,
    /// 探索統計。
    stats: SearchStats,
    /// 置換表。
    tt: &'ctx mut TranspositionTable,
}

impl<'ctx> SearchContext<'ctx> {
    /// 探索開始からの経過時間を返す。
    pub(super) fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// 静的評価を返す。
    pub(super) const fn evaluator(&self) -> &'ctx Evaluator {
        self.evaluator
    }

    /// 探索制限を返す。
    pub(super) const fn limits(&self) -> SearchLimits {
        self.limits
    }

    /// 探索コンテキストを生成する。`started` は持ち時間の起点。
    pub(super) fn new(
        started: Instant,
        evaluator: &'ctx Evaluator,
        limits: SearchLimits,
        tt: &'ctx mut TranspositionTable,
    ) -> Self {
        Self {
            started,
            evaluator,
            limits,
            stats: SearchStats::new(),
            tt,
        }
    }

    /// 持ち時間の残りを返す。
    pub(super) fn remaining(&self) -> Duration {
        self.limits.time_budget().saturating_sub(self.elapsed())
    }

    /// 探索統計を返す。
    pub(super) const fn stats(&self) -> SearchStats {
        self.stats
    }

    /// 探索統計への可変参照を返す。
    pub(super) const fn stats_mut(&mut self) -> &mut SearchStats {
        &mut self.stats
    }

    /// 置換表への参照を返す。
    pub(super) const fn tt(&self) -> &TranspositionTable {
        &*self.tt
    }

    /// 置換表への可変参照を返す。
    pub(super) const fn tt_mut(&mut self) -> &mut TranspositionTable {
        &mut *self.tt
    }
}
