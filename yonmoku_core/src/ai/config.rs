use core::time::Duration;

/// `advanced()` の最大探索深さ（6x7 盤の全マス数）。
const ADVANCED_MAX_DEPTH: u8 = 42;

/// `minimax()` 系の既定深さ。
const MINIMAX_DEFAULT_DEPTH: u8 = 4;

/// 既定の持ち時間（ミリ秒）。
const DEFAULT_TIME_BUDGET_MS: u64 = 500;

/// 既定のメモリ上限（バイト）。
const DEFAULT_MEMORY_LIMIT: usize = 10 * 1024 * 1024;

/// 既定の実効分岐係数（前の深さの所要時間に掛けて次の深さを見積もる）。
const DEFAULT_BRANCHING_FACTOR: f64 = 4.0;

/// 探索エンジンの設定。
///
/// エージェントの強さの違いは継承ではなく、この設定の組み合わせで表す。
#[derive(Copy, Clone, Debug, PartialEq)]
#[non_exhaustive]
pub struct EngineConfig {
    /// 反復深化で次の深さの所要時間を見積もる係数。
    branching_factor: f64,
    /// 反復深化の最大深さ（0 なら戦術チェックと中央優先のみ）。
    max_depth: u8,
    /// メモリ上限（置換表はこの半分までを使う）。
    memory_limit_bytes: usize,
    /// 探索ノード上限（`u64::MAX` で無制限扱い）。
    node_budget: u64,
    /// 持ち時間の上限（`choose_move` の引数とのうち短い方を使う）。
    time_budget: Duration,
    /// 自殺手（相手に即勝ちを与える手）を除外するか。
    use_suicide_filter: bool,
    /// 置換表を使うか。
    use_transposition_table: bool,
}

impl EngineConfig {
    /// 置換表・自殺手フィルタ付きの反復深化（時間で深さが決まる）。
    #[inline]
    #[must_use]
    pub const fn advanced() -> Self {
        Self {
            branching_factor: DEFAULT_BRANCHING_FACTOR,
            max_depth: ADVANCED_MAX_DEPTH,
            memory_limit_bytes: DEFAULT_MEMORY_LIMIT,
            node_budget: u64::MAX,
            time_budget: Duration::from_millis(DEFAULT_TIME_BUDGET_MS),
            use_suicide_filter: true,
            use_transposition_table: true,
        }
    }

    /// 分岐係数を返す。
    #[inline]
    #[must_use]
    pub const fn branching_factor(&self) -> f64 {
        self.branching_factor
    }

    /// 最大深さを返す。
    #[inline]
    #[must_use]
    pub const fn max_depth(&self) -> u8 {
        self.max_depth
    }

    /// メモリ上限を返す。
    #[inline]
    #[must_use]
    pub const fn memory_limit_bytes(&self) -> usize {
        self.memory_limit_bytes
    }

    /// `depth` 固定の素朴なミニマックス（置換表・自殺手フィルタなし）。
    ///
    /// 持ち時間は十分大きく取り、指定深さを打ち切らずに読み切る。
    #[inline]
    #[must_use]
    pub const fn minimax(depth: u8) -> Self {
        Self {
            branching_factor: DEFAULT_BRANCHING_FACTOR,
            max_depth: depth,
            memory_limit_bytes: DEFAULT_MEMORY_LIMIT,
            node_budget: u64::MAX,
            time_budget: Duration::MAX,
            use_suicide_filter: false,
            use_transposition_table: false,
        }
    }

    /// 既定深さのミニマックス。
    #[inline]
    #[must_use]
    pub const fn minimax_default() -> Self {
        Self::minimax(MINIMAX_DEFAULT_DEPTH)
    }

    /// ノード上限を返す。
    #[inline]
    #[must_use]
    pub const fn node_budget(&self) -> u64 {
        self.node_budget
    }

    /// 即勝ち・即受けの戦術チェックだけを行い、それ以外は中央優先で選ぶ。
    #[inline]
    #[must_use]
    pub const fn tactical() -> Self {
        Self {
            branching_factor: DEFAULT_BRANCHING_FACTOR,
            max_depth: 0,
            memory_limit_bytes: DEFAULT_MEMORY_LIMIT,
            node_budget: u64::MAX,
            time_budget: Duration::from_millis(DEFAULT_TIME_BUDGET_MS),
            use_suicide_filter: false,
            use_transposition_table: false,
        }
    }

    /// 既定の持ち時間を返す。
    #[inline]
    #[must_use]
    pub const fn time_budget(&self) -> Duration {
        self.time_budget
    }

    /// 自殺手フィルタの有無を返す。
    #[inline]
    #[must_use]
    pub const fn use_suicide_filter(&self) -> bool {
        self.use_suicide_filter
    }

    /// 置換表の有無を返す。
    #[inline]
    #[must_use]
    pub const fn use_transposition_table(&self) -> bool {
        self.use_transposition_table
    }

    /// 分岐係数を設定する（正の有限値以外は無視する）。
    #[inline]
    #[must_use]
    pub fn with_branching_factor(mut self, factor: f64) -> Self {
        if factor.is_finite() && factor > 0.0 {
            self.branching_factor = factor;
        }
        self
    }

    /// 最大深さを設定する。
    #[inline]
    #[must_use]
    pub const fn with_max_depth(mut self, depth: u8) -> Self {
        self.max_depth = depth;
        self
    }

    /// メモリ上限を設定する。
    #[inline]
    #[must_use]
    pub const fn with_memory_limit(mut self, bytes: usize) -> Self {
        self.memory_limit_bytes = bytes;
        self
    }

    /// ノード上限を設定する。
    #[inline]
    #[must_use]
    pub const fn with_node_budget(mut self, nodes: u64) -> Self {
        self.node_budget = nodes;
        self
    }

    /// 自殺手フィルタの有無を設定する。
    #[inline]
    #[must_use]
    pub const fn with_suicide_filter(mut self, enabled: bool) -> Self {
        self.use_suicide_filter = enabled;
        self
    }

    /// 既定の持ち時間を設定する。
    #[inline]
    #[must_use]
    pub const fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = budget;
        self
    }

    /// 置換表の有無を設定する。
    #[inline]
    #[must_use]
    pub const fn with_transposition_table(mut self, enabled: bool) -> Self {
        self.use_transposition_table = enabled;
        self
    }
}

impl Default for EngineConfig {
    #[inline]
    fn default() -> Self {
        Self::advanced()
    }
}

#[cfg(test)]
mod tests {
    use core::time::Duration;

    use super::EngineConfig;

    #[test]
    fn branching_factor_rejects_non_positive_values() {
        let config = EngineConfig::advanced();
        assert!((config.with_branching_factor(2.5).branching_factor() - 2.5).abs() < f64::EPSILON);
        for factor in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert_eq!(config.with_branching_factor(factor), config);
        }
    }

    #[test]
    fn presets_differ_only_in_their_switches() {
        let tactical = EngineConfig::tactical();
        assert_eq!(tactical.max_depth(), 0);
        assert!(!tactical.use_suicide_filter());
        assert!(!tactical.use_transposition_table());

        let minimax = EngineConfig::minimax_default();
        assert_eq!(minimax.max_depth(), 4);
        assert_eq!(minimax.time_budget(), Duration::MAX);

        let advanced = EngineConfig::default();
        assert_eq!(advanced, EngineConfig::advanced());
        assert_eq!(
            tactical
                .with_max_depth(42)
                .with_suicide_filter(true)
                .with_transposition_table(true),
            advanced
        );
    }
}
