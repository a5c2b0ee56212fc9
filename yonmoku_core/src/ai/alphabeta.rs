//! 戦術チェックと反復深化アルファベータ探索を組み合わせたエージェント。
//!
//! 1 手ごとの流れ:
//! 1. マスク・スナップショットの検証
//! 2. 自分の即勝ち → 相手の即勝ちの受け
//! 3. 自殺手を除いた候補で反復深化（時間・ノード上限つき）
//! 4. 1 つも深さが完了しなければ中央優先で選ぶ

mod eval;
mod limits;
mod move_ordering;
mod search;
pub mod threat;
mod tt;

use core::time::Duration;
use std::time::Instant;

use tracing::{info, info_span, trace, warn};

use crate::ai::config::EngineConfig;
use crate::ai::types::{Ai, MoveRequest};
use crate::engine::board::Board;
use crate::engine::snapshot::Snapshot;
use crate::engine::types::{Color, ColumnSet};
use crate::error::AgentError;

use eval::Evaluator;
use limits::SearchLimits;
pub use limits::SearchStats;
use move_ordering::order_moves;
use threat::Block;
use tt::TranspositionTable;

/// 勝ちの評価値の基準点（残り深さを足して早い勝ちを優先する）。
const SCORE_WIN: i32 = 1_000_000;

/// 探索窓の初期値。
const INF: i32 = 10_000_000;

/// 手を決めた理由。
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum Decision {
    /// 置けば勝つ列。
    ImmediateWin,
    /// 相手の即勝ちを防ぐ列。
    RequiredBlock,
    /// 反復深化で完了した最深の深さの最善手。
    Search,
    /// 探索を使わない（または 1 深さも完了しない）ときの中央優先の列。
    Fallback,
}

/// `Agent::analyze` の結果。
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SearchReport {
    /// 選んだ列。
    column: u8,
    /// 完了した探索深さ（戦術チェックで決まった場合は 0）。
    completed_depth: u8,
    /// 手を決めた理由。
    decision: Decision,
    /// 探索の評価値（手番視点。探索していなければ `None`）。
    score: Option<i32>,
    /// 探索統計。
    stats: SearchStats,
}

impl SearchReport {
    /// 選んだ列を返す。
    #[inline]
    #[must_use]
    pub const fn column(&self) -> u8 {
        self.column
    }

    /// 完了した探索深さを返す。
    #[inline]
    #[must_use]
    pub const fn completed_depth(&self) -> u8 {
        self.completed_depth
    }

    /// 手を決めた理由を返す。
    #[inline]
    #[must_use]
    pub const fn decision(&self) -> Decision {
        self.decision
    }

    /// 探索の評価値を返す。
    #[inline]
    #[must_use]
    pub const fn score(&self) -> Option<i32> {
        self.score
    }

    /// 探索統計を返す。
    #[inline]
    #[must_use]
    pub const fn stats(&self) -> SearchStats {
        self.stats
    }

    /// 探索を伴わない結果。
    const fn tactical(column: u8, decision: Decision) -> Self {
        Self {
            column,
            completed_depth: 0,
            decision,
            score: None,
            stats: SearchStats::new(),
        }
    }
}

/// アルファベータ探索を行うAI。
///
/// 置換表だけが手をまたいで残る。対局が変わったら `new_game` を呼ぶ
/// （石数が前回より減ったスナップショットを受け取った場合も自動で捨てる）。
#[derive(Debug)]
pub struct Agent {
    /// 探索設定。
    config: EngineConfig,
    /// 前回呼び出し時の石数。
    last_disc_count: Option<usize>,
    /// 置換表。
    tt: TranspositionTable,
}

impl Agent {
    /// 手を選んで理由と探索統計を返す。
    ///
    /// 持ち時間は `time_budget` と設定の持ち時間の短い方を使う。
    ///
    /// # Errors
    ///
    /// - マスクの長さが列数と違う: `AgentError::MaskLength`
    /// - スナップショットが不正: `AgentError::Board`
    /// - マスクに着手可能な列がない: `AgentError::NoLegalMove`
    /// - マスクが満杯の列を着手可能としている: `AgentError::MaskedColumnFull`
    #[inline]
    pub fn analyze(
        &mut self,
        snapshot: &Snapshot,
        valid_mask: &[bool],
        player: Color,
        time_budget: Duration,
    ) -> Result<SearchReport, AgentError> {
        let started = Instant::now();
        let disc_count = snapshot.disc_count();
        let span = info_span!("choose_move", ?player, discs = disc_count);
        let _entered = span.enter();

        let expected = usize::from(snapshot.columns());
        if valid_mask.len() != expected {
            return Err(AgentError::MaskLength {
                actual: valid_mask.len(),
                expected,
            });
        }
        let mut board = Board::from_snapshot(snapshot, player)?;
        let valid = ColumnSet::from_mask(valid_mask);
        if valid.is_empty() {
            return Err(AgentError::NoLegalMove);
        }
        if let Some(column) = valid.iter().find(|&column| !board.playable(column)) {
            return Err(AgentError::MaskedColumnFull { column });
        }

        self.begin_move(disc_count);

        if let Some(column) = threat::find_immediate_win(&mut board, player, valid) {
            info!(column, "immediate win");
            return Ok(SearchReport::tactical(column, Decision::ImmediateWin));
        }
        match threat::find_required_block(&mut board, player.opponent(), valid) {
            Block::Single(column) => {
                info!(column, "required block");
                return Ok(SearchReport::tactical(column, Decision::RequiredBlock));
            }
            Block::Unavailable(threats) => {
                warn!(?threats, "opponent threat cannot be blocked with one move");
            }
            Block::Unneeded => {}
        }

        let mut candidates = valid;
        if self.config.use_suicide_filter() {
            let safe = threat::safe_columns(&mut board, player, valid);
            if safe.is_empty() {
                warn!(?valid, "every valid column hands the opponent an immediate win");
            } else {
                candidates = safe;
            }
        }

        if self.config.max_depth() == u8::MIN {
            return fallback(&board, candidates);
        }

        let limits = SearchLimits::new(
            self.config.max_depth(),
            self.config.node_budget(),
            time_budget.min(self.config.time_budget()),
            self.config.branching_factor(),
            self.config.use_transposition_table(),
        );
        let evaluator = Evaluator::new(&board);
        let result = search::iterative_deepening(
            &mut board,
            candidates,
            limits,
            &evaluator,
            &mut self.tt,
            started,
        );

        let Some(column) = result.best_move() else {
            return fallback(&board, candidates).map(|report| SearchReport {
                stats: result.stats(),
                ..report
            });
        };
        info!(
            column,
            depth = result.completed_depth(),
            score = result.best_score(),
            nodes = result.stats().nodes(),
            elapsed_us = started.elapsed().as_micros(),
            "search"
        );
        Ok(SearchReport {
            column,
            completed_depth: result.completed_depth(),
            decision: Decision::Search,
            score: Some(result.best_score()),
            stats: result.stats(),
        })
    }

    /// 1 手分の置換表の準備（対局の切り替わり検出と世代更新）。
    fn begin_move(&mut self, disc_count: usize) {
        if self.last_disc_count.is_some_and(|last| disc_count < last) {
            trace!(disc_count, "disc count decreased, treating as a new game");
            self.tt.clear();
        }
        self.last_disc_count = Some(disc_count);
        self.tt.new_search();
    }

    /// 手を選ぶ。
    ///
    /// 返す列は常に `valid_mask` で着手可能とされた列。
    ///
    /// メモリ上限は呼び出しごとには渡さない。`EngineConfig::with_memory_limit` で
    /// エージェント生成時に指定し、置換表はその半分までを使う。
    ///
    /// # Errors
    ///
    /// `analyze` と同じ。
    #[inline]
    pub fn choose_move(
        &mut self,
        snapshot: &Snapshot,
        valid_mask: &[bool],
        player: Color,
        time_budget: Duration,
    ) -> Result<u8, AgentError> {
        self.analyze(snapshot, valid_mask, player, time_budget)
            .map(|report| report.column())
    }

    /// 探索設定を返す。
    #[inline]
    #[must_use]
    pub const fn config(&self) -> EngineConfig {
        self.config
    }

    /// 設定を指定して初期化する。置換表はメモリ上限の半分までを使う。
    #[inline]
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        let tt = if config.use_transposition_table() {
            TranspositionTable::with_memory_limit(config.memory_limit_bytes())
        } else {
            TranspositionTable::new(0)
        };
        Self {
            config,
            last_disc_count: None,
            tt,
        }
    }

    /// 新しい対局に備えて置換表を捨てる。
    #[inline]
    pub fn new_game(&mut self) {
        trace!("transposition table cleared");
        self.tt.clear();
        self.last_disc_count = None;
    }
}

impl Default for Agent {
    #[inline]
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Ai for Agent {
    #[inline]
    fn select_move(&mut self, request: &MoveRequest<'_>) -> Result<u8, AgentError> {
        self.choose_move(
            request.snapshot,
            request.valid_mask,
            request.player,
            request.time_budget,
        )
    }
}

/// 候補から中央優先で 1 列選ぶ。
fn fallback(board: &Board, candidates: ColumnSet) -> Result<SearchReport, AgentError> {
    let column = order_moves(candidates, board.columns(), None)
        .first()
        .ok_or(AgentError::NoLegalMove)?;
    info!(column, "center-first fallback");
    Ok(SearchReport::tactical(column, Decision::Fallback))
}
