use core::mem::size_of;

/// 置換表のエントリ数の下限。
const MIN_ENTRIES: usize = 1 << 10;

/// 置換表のエントリ数の上限。
const MAX_ENTRIES: usize = 1 << 22;

/// 置換表の bound 種別。
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(super) enum Bound {
    /// 正確な値。
    Exact,
    /// 下限（この値以上）。
    Lower,
    /// 上限（この値以下）。
    Upper,
}

/// 置換表エントリ。
#[derive(Copy, Clone, Debug)]
pub(super) struct TTEntry {
    /// ベストムーブ（列）。
    best_move: Option<u8>,
    /// `value` の意味（exact/lower/upper）。
    bound: Bound,
    /// 局面コード（ハッシュ衝突の照合用。0 は空きスロット）。
    check: u64,
    /// この値が保証される探索深さ。
    depth: u8,
    /// 保存時の世代（手ごとに進む）。
    generation: u8,
    /// 盤面ハッシュ。
    key: u64,
    /// 評価値（手番視点）。
    value: i32,
}

impl TTEntry {
    /// 空きスロット。
    const EMPTY: Self = Self {
        best_move: None,
        bound: Bound::Exact,
        check: u64::MIN,
        depth: u8::MIN,
        generation: u8::MIN,
        key: u64::MIN,
        value: 0,
    };

    /// このエントリの bound 種別を返す。
    pub(super) const fn bound(&self) -> Bound {
        self.bound
    }

    /// このエントリに保存されている評価値を返す。
    pub(super) const fn value(&self) -> i32 {
        self.value
    }
}

/// 置換表（固定長、1 スロット 1 エントリ）。
///
/// 同じ対局の間は手をまたいで保持し、対局の切り替わりで `clear` する。
#[derive(Debug)]
pub(super) struct TranspositionTable {
    /// ハッシュ表本体（長さは 2 の冪）。
    entries: Vec<TTEntry>,
    /// 現在の世代。
    generation: u8,
}

impl TranspositionTable {
    /// エントリ数を返す。
    pub(super) fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// すべてのエントリを捨てる（対局の切り替わり）。
    pub(super) fn clear(&mut self) {
        self.entries.fill(TTEntry::EMPTY);
        self.generation = u8::MIN;
    }

    /// 一致するエントリを返す（キーと局面コードの両方が一致するもののみ）。
    fn lookup(&self, key: u64, check: u64) -> Option<&TTEntry> {
        self.entries
            .get(self.index(key))
            .filter(|entry| entry.check != u64::MIN && entry.check == check && entry.key == key)
    }

    /// キーからインデックスを求める。
    fn index(&self, key: u64) -> usize {
        let mask = self.entries.len().wrapping_sub(1);
        let folded = key ^ key.wrapping_shr(32);
        let low_u32 = u32::try_from(folded & u64::from(u32::MAX)).unwrap_or(u32::MAX);
        usize::try_from(low_u32).unwrap_or(usize::MAX) & mask
    }

    /// 新しい手の探索を始める（世代を進める）。
    pub(super) fn new_search(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    /// エントリ数を指定して初期化する（2 の冪に切り上げ、上下限で丸める）。
    pub(super) fn new(size: usize) -> Self {
        let size_pow2 = size.clamp(MIN_ENTRIES, MAX_ENTRIES).next_power_of_two();
        Self {
            entries: vec![TTEntry::EMPTY; size_pow2],
            generation: u8::MIN,
        }
    }

    /// 使用中のスロット数を返す。
    #[cfg(test)]
    pub(super) fn occupied(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.check != u64::MIN)
            .count()
    }

    /// 指定深さ以上のエントリを取得する。
    ///
    /// キーまたは局面コードが一致しないエントリ（ハッシュ衝突）はミス扱い。
    pub(super) fn probe(&self, key: u64, check: u64, depth: u8) -> Option<TTEntry> {
        self.lookup(key, check)
            .filter(|entry| entry.depth >= depth)
            .copied()
    }

    /// ベストムーブのみを取得する（深さは問わない）。
    pub(super) fn probe_best_move(&self, key: u64, check: u64) -> Option<u8> {
        self.lookup(key, check).and_then(|entry| entry.best_move)
    }

    /// エントリを保存する。
    ///
    /// 空き・古い世代・浅いエントリを置き換える。同じ世代でより深いエントリは残す。
    pub(super) fn store(
        &mut self,
        key: u64,
        check: u64,
        depth: u8,
        stored_value: i32,
        bound: Bound,
        best_move: Option<u8>,
    ) {
        let idx = self.index(key);
        let generation = self.generation;
        let Some(slot) = self.entries.get_mut(idx) else {
            return;
        };
        let replace =
            slot.check == u64::MIN || slot.generation != generation || depth >= slot.depth;
        if replace {
            *slot = TTEntry {
                best_move,
                bound,
                check,
                depth,
                generation,
                key,
                value: stored_value,
            };
        }
    }

    /// メモリ上限の半分に収まるエントリ数で初期化する。
    pub(super) fn with_memory_limit(bytes: usize) -> Self {
        let budget = bytes / 2;
        let fit = budget / size_of::<TTEntry>().max(1);
        // 上限を超えないよう 2 の冪に切り下げる。
        let size = if fit == 0 {
            MIN_ENTRIES
        } else {
            1_usize << fit.ilog2()
        };
        Self::new(size)
    }
}
