use std::time::{Duration, Instant};

use tracing::debug;

use crate::engine::board::{Board, Landing};
use crate::engine::types::ColumnSet;

use super::eval::Evaluator;
use super::limits::{SearchAbort, SearchContext, SearchLimits, SearchStats};
use super::move_ordering::order_moves;
use super::tt::{Bound, TranspositionTable};
use super::{INF, SCORE_WIN};

/// 反復深化の結果。
#[derive(Clone, Copy, Debug)]
pub(super) struct SearchResult {
    /// 最後に完了した深さの最善手（1 深さも完了しなければ `None`）。
    best_move: Option<u8>,
    /// `best_move` の評価値（手番視点）。
    best_score: i32,
    /// 探索を完了した深さ。
    completed_depth: u8,
    /// 探索統計。
    stats: SearchStats,
}

impl SearchResult {
    /// 最善手を返す。
    pub(super) const fn best_move(&self) -> Option<u8> {
        self.best_move
    }

    /// 最善手の評価値を返す。
    pub(super) const fn best_score(&self) -> i32 {
        self.best_score
    }

    /// 完了した深さを返す。
    pub(super) const fn completed_depth(&self) -> u8 {
        self.completed_depth
    }

    /// 探索統計を返す。
    pub(super) const fn stats(&self) -> SearchStats {
        self.stats
    }
}

/// 反復深化によるルート探索。
///
/// 深さ 1 から順に読み、完了した深さの結果だけを採用する。次の深さは
/// 「直前の深さの所要時間 × 分岐係数」が残り時間に収まるときだけ始める。
/// 勝ち負けが読み切れた時点、または空きマス数に達した時点で打ち切る。
pub(super) fn iterative_deepening(
    board: &mut Board,
    candidates: ColumnSet,
    limits: SearchLimits,
    evaluator: &Evaluator,
    tt: &mut TranspositionTable,
    started: Instant,
) -> SearchResult {
    let mut ctx = SearchContext::new(started, evaluator, limits, tt);
    let mut result = SearchResult {
        best_move: None,
        best_score: 0,
        completed_depth: 0,
        stats: SearchStats::new(),
    };

    let reachable = u8::try_from(board.empty_cells()).unwrap_or(u8::MAX);
    let max_depth = limits.max_depth().min(reachable);
    let mut last_elapsed: Option<Duration> = None;

    for depth in 1..=max_depth {
        if !next_depth_fits(&ctx, last_elapsed) {
            debug!(depth, remaining_us = ctx.remaining().as_micros(), "stop deepening");
            break;
        }

        let depth_started = Instant::now();
        let Ok((Some(column), score)) = search_depth(board, candidates, depth, &mut ctx) else {
            // ノード上限で中断した深さは捨てる。
            break;
        };
        let elapsed = depth_started.elapsed();

        result.best_move = Some(column);
        result.best_score = score;
        result.completed_depth = depth;
        debug!(
            depth,
            column,
            score,
            nodes = ctx.stats().nodes(),
            elapsed_us = elapsed.as_micros(),
            "depth completed"
        );

        if score.wrapping_abs() >= SCORE_WIN {
            break;
        }
        last_elapsed = Some(elapsed);
    }

    result.stats = ctx.stats();
    result
}

/// 次の深さを始めてよいかを返す。
fn next_depth_fits(ctx: &SearchContext<'_>, last_elapsed: Option<Duration>) -> bool {
    let remaining = ctx.remaining();
    if remaining.is_zero() {
        return false;
    }
    let Some(last) = last_elapsed else {
        return true;
    };
    let estimate = last.as_secs_f64() * ctx.limits().branching_factor();
    Duration::try_from_secs_f64(estimate).is_ok_and(|needed| needed <= remaining)
}

/// 深さ `depth` でルートを全幅探索する。
///
/// ルートでは `candidates` の列だけを調べる。評価値が同じなら並び順で先の列を残す。
pub(super) fn search_depth(
    board: &mut Board,
    candidates: ColumnSet,
    depth: u8,
    ctx: &mut SearchContext<'_>,
) -> Result<(Option<u8>, i32), SearchAbort> {
    let use_tt = ctx.limits().use_tt();
    let key = board.hash();
    let check = board.position_code();
    let tt_move = if use_tt {
        ctx.tt().probe_best_move(key, check)
    } else {
        None
    };

    let mut best_move: Option<u8> = None;
    let mut best_score = INF.wrapping_neg();
    let mut alpha = INF.wrapping_neg();
    let beta = INF;
    let next_depth = depth.saturating_sub(1);

    for column in order_moves(candidates, board.columns(), tt_move) {
        let Ok(child) = board.with_move(column, |child, landing| {
            negamax(
                child,
                Some(landing),
                next_depth,
                beta.wrapping_neg(),
                alpha.wrapping_neg(),
                ctx,
            )
        }) else {
            continue;
        };
        let score = child?.wrapping_neg();
        if score > best_score {
            best_score = score;
            best_move = Some(column);
        }
        if score > alpha {
            alpha = score;
        }
    }

    if use_tt && best_move.is_some() {
        // 候補を絞ったルートの値は全合法手での値の下限にしかならない。
        let bound = if candidates == board.playable_columns() {
            Bound::Exact
        } else {
            Bound::Lower
        };
        ctx.tt_mut()
            .store(key, check, depth, best_score, bound, best_move);
        ctx.stats_mut().inc_tt_stores();
    }

    Ok((best_move, best_score))
}

/// ネガマックス（αβ、fail-soft）。
///
/// `last` はこの局面を作った手。その手で 4 連ができていれば手番側の負けで、
/// 残り深さが大きいほど（早く負けるほど）悪い値を返す。
pub(super) fn negamax(
    board: &mut Board,
    last: Option<Landing>,
    depth: u8,
    alpha: i32,
    beta: i32,
    ctx: &mut SearchContext<'_>,
) -> Result<i32, SearchAbort> {
    ctx.stats_mut().inc_nodes();
    if ctx.stats().nodes() > ctx.limits().node_budget() {
        return Err(SearchAbort);
    }

    if let Some(landing) = last {
        if board.check_win_from(landing.row(), landing.column()) {
            return Ok(SCORE_WIN.wrapping_add(i32::from(depth)).wrapping_neg());
        }
    }
    if board.is_full() {
        return Ok(0);
    }
    if depth == u8::MIN {
        return Ok(ctx.evaluator().evaluate(board));
    }

    let use_tt = ctx.limits().use_tt();
    let key = board.hash();
    let check = board.position_code();
    let alpha_orig = alpha;
    let mut alpha = alpha;
    let mut beta = beta;
    let mut tt_move = None;

    if use_tt {
        tt_move = ctx.tt().probe_best_move(key, check);
        if let Some(entry) = ctx.tt().probe(key, check, depth) {
            let value = entry.value();
            match entry.bound() {
                Bound::Exact => {
                    ctx.stats_mut().inc_tt_hits();
                    return Ok(value);
                }
                Bound::Lower => alpha = alpha.max(value),
                Bound::Upper => beta = beta.min(value),
            }
            if alpha >= beta {
                ctx.stats_mut().inc_tt_hits();
                return Ok(value);
            }
        }
    }

    let mut best_score = INF.wrapping_neg();
    let mut best_move: Option<u8> = None;
    let next_depth = depth.wrapping_sub(1);

    for column in order_moves(board.playable_columns(), board.columns(), tt_move) {
        let Ok(child) = board.with_move(column, |child, landing| {
            negamax(
                child,
                Some(landing),
                next_depth,
                beta.wrapping_neg(),
                alpha.wrapping_neg(),
                ctx,
            )
        }) else {
            continue;
        };
        let score = child?.wrapping_neg();
        if score > best_score {
            best_score = score;
            best_move = Some(column);
        }
        if score > alpha {
            alpha = score;
        }
        if alpha >= beta {
            ctx.stats_mut().inc_cutoffs();
            break;
        }
    }

    if use_tt {
        let bound = if best_score <= alpha_orig {
            Bound::Upper
        } else if best_score >= beta {
            Bound::Lower
        } else {
            Bound::Exact
        };
        ctx.tt_mut()
            .store(key, check, depth, best_score, bound, best_move);
        ctx.stats_mut().inc_tt_stores();
    }

    Ok(best_score)
}
