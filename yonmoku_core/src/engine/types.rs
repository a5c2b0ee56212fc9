/// 手番（石の色）。
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum Color {
    /// 赤。
    Red,
    /// 黄。
    Yellow,
}

impl Color {
    /// 相手側の色を返す。
    #[inline]
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Red => Self::Yellow,
            Self::Yellow => Self::Red,
        }
    }
}

/// 盤の列数の上限。
pub const MAX_COLUMNS: u8 = 16;

/// 列の集合（ビット `c` が列 `c` に対応）。
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct ColumnSet(
    /// 列ごとのビット。
    u32,
);

impl ColumnSet {
    /// 空集合。
    pub const EMPTY: Self = Self(u32::MIN);

    /// 指定列からなる集合を返す（範囲外の列は無視する）。
    #[inline]
    #[must_use]
    pub fn from_columns<I: IntoIterator<Item = u8>>(columns: I) -> Self {
        columns
            .into_iter()
            .fold(Self::EMPTY, |set, column| set.with(column))
    }

    /// ブール配列のマスクから集合を生成する。
    #[inline]
    #[must_use]
    pub fn from_mask(mask: &[bool]) -> Self {
        let mut set = Self::EMPTY;
        for (index, &playable) in mask.iter().enumerate() {
            if !playable {
                continue;
            }
            if let Ok(column) = u8::try_from(index) {
                set = set.with(column);
            }
        }
        set
    }

    /// 指定列を含むかどうかを返す。
    #[inline]
    #[must_use]
    pub const fn contains(self, column: u8) -> bool {
        if column >= MAX_COLUMNS {
            return false;
        }
        self.0 & (1_u32 << column) != u32::MIN
    }

    /// 空集合かどうかを返す。
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == u32::MIN
    }

    /// 列を昇順に列挙する。
    #[inline]
    pub fn iter(self) -> impl Iterator<Item = u8> {
        let mut bits = self.0;
        core::iter::from_fn(move || {
            if bits == u32::MIN {
                return None;
            }
            let column = u8::try_from(bits.trailing_zeros()).unwrap_or(u8::MAX);
            bits &= bits.wrapping_sub(1);
            Some(column)
        })
    }

    /// 要素数を返す。
    #[inline]
    #[must_use]
    pub const fn len(self) -> u32 {
        self.0.count_ones()
    }

    /// 指定列を加えた集合を返す。
    #[inline]
    #[must_use]
    pub const fn with(self, column: u8) -> Self {
        if column >= MAX_COLUMNS {
            return self;
        }
        Self(self.0 | (1_u32 << column))
    }

    /// 指定列を除いた集合を返す。
    #[inline]
    #[must_use]
    pub const fn without(self, column: u8) -> Self {
        if column >= MAX_COLUMNS {
            return self;
        }
        Self(self.0 & !(1_u32 << column))
    }
}
