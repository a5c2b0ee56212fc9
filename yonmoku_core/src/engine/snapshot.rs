use crate::engine::types::Color;
use crate::error::BoardError;

/// ホスト環境から渡される盤面スナップショット。
///
/// 行 0 が最上段（ホスト側の表示と同じ向き）。セルは行優先で並ぶ。
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Snapshot {
    /// 各セルの石（行優先、上端から）。
    cells: Vec<Option<Color>>,
    /// 列数。
    columns: u8,
    /// 行数。
    rows: u8,
}

impl Snapshot {
    /// 指定マスの石を返す（行は上端から数える）。
    #[inline]
    #[must_use]
    pub fn cell(&self, row: u8, column: u8) -> Option<Color> {
        if row >= self.rows || column >= self.columns {
            return None;
        }
        let index = usize::from(row)
            .wrapping_mul(usize::from(self.columns))
            .wrapping_add(usize::from(column));
        self.cells.get(index).copied().flatten()
    }

    /// 列数を返す。
    #[inline]
    #[must_use]
    pub const fn columns(&self) -> u8 {
        self.columns
    }

    /// 置かれている石の数を返す。
    #[inline]
    #[must_use]
    pub fn disc_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// 空の盤面を返す。
    ///
    /// # Errors
    ///
    /// 行数・列数が 0 の場合、`BoardError::UnsupportedDimensions` を返す。
    #[inline]
    pub fn empty(rows: u8, columns: u8) -> Result<Self, BoardError> {
        let len = usize::from(rows).wrapping_mul(usize::from(columns));
        Self::from_cells(rows, columns, vec![None; len])
    }

    /// セル列（行優先、上端から）から生成する。
    ///
    /// # Errors
    ///
    /// セル数が `rows * columns` と一致しない場合 `BoardError::DimensionMismatch`、
    /// サイズが 0 の場合 `BoardError::UnsupportedDimensions` を返す。
    #[inline]
    pub fn from_cells(
        rows: u8,
        columns: u8,
        cells: Vec<Option<Color>>,
    ) -> Result<Self, BoardError> {
        if rows == u8::MIN || columns == u8::MIN {
            return Err(BoardError::UnsupportedDimensions { rows, columns });
        }
        let expected = usize::from(rows).wrapping_mul(usize::from(columns));
        if cells.len() != expected {
            return Err(BoardError::DimensionMismatch {
                actual: cells.len(),
                expected,
            });
        }
        Ok(Self {
            cells,
            columns,
            rows,
        })
    }

    /// 検証済みのセル列から生成する（crate 内部向け）。
    pub(crate) const fn from_cells_unchecked(
        rows: u8,
        columns: u8,
        cells: Vec<Option<Color>>,
    ) -> Self {
        Self {
            cells,
            columns,
            rows,
        }
    }

    /// 2 チャンネルの観測平面から生成する。
    ///
    /// `planes[(row * columns + column) * 2 + channel]` が 1 のとき石があるとみなす。
    /// チャンネル 0 は手番側（`mover`）、チャンネル 1 は相手側。
    ///
    /// # Errors
    ///
    /// 長さ不一致・サイズ 0 に加え、同じマスに両チャンネルが立っている場合は
    /// `BoardError::OverlappingDiscs` を返す。
    #[inline]
    pub fn from_planes(
        rows: u8,
        columns: u8,
        planes: &[u8],
        mover: Color,
    ) -> Result<Self, BoardError> {
        let cell_count = usize::from(rows).wrapping_mul(usize::from(columns));
        if planes.len() != cell_count.wrapping_mul(2) {
            return Err(BoardError::DimensionMismatch {
                actual: planes.len() / 2,
                expected: cell_count,
            });
        }

        let mut cells = Vec::with_capacity(cell_count);
        for (index, pair) in planes.chunks_exact(2).enumerate() {
            let own = pair.first().copied().unwrap_or(0) != 0;
            let other = pair.get(1).copied().unwrap_or(0) != 0;
            let cell = match (own, other) {
                (true, true) => {
                    let width = usize::from(columns).max(1);
                    return Err(BoardError::OverlappingDiscs {
                        row: u8::try_from(index / width).unwrap_or(u8::MAX),
                        column: u8::try_from(index % width).unwrap_or(u8::MAX),
                    });
                }
                (true, false) => Some(mover),
                (false, true) => Some(mover.opponent()),
                (false, false) => None,
            };
            cells.push(cell);
        }
        Self::from_cells(rows, columns, cells)
    }

    /// テキスト表現から生成する。
    ///
    /// 1 行が盤の 1 段（上端から）。`.` が空、`X`/`R` が赤、`O`/`Y` が黄。
    /// 空行と前後の空白は無視する。
    ///
    /// # Errors
    ///
    /// 未知の文字は `BoardError::UnknownMarker`、行の長さが揃っていない場合は
    /// `BoardError::DimensionMismatch` を返す。
    #[inline]
    pub fn parse(text: &str) -> Result<Self, BoardError> {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        let width = lines.first().map_or(0, |line| line.chars().count());
        let rows = u8::try_from(lines.len()).unwrap_or(u8::MAX);
        let columns = u8::try_from(width).unwrap_or(u8::MAX);

        let mut cells = Vec::with_capacity(lines.len().wrapping_mul(width));
        for line in &lines {
            for marker in line.chars() {
                let cell = match marker {
                    '.' => None,
                    'X' | 'R' => Some(Color::Red),
                    'O' | 'Y' => Some(Color::Yellow),
                    _ => return Err(BoardError::UnknownMarker { marker }),
                };
                cells.push(cell);
            }
        }
        Self::from_cells(rows, columns, cells)
    }

    /// 行数を返す。
    #[inline]
    #[must_use]
    pub const fn rows(&self) -> u8 {
        self.rows
    }
}
