use crate::engine::types::Color;

/// 盤面ビットの総数（列ごとに番兵ビットを含む）。
const BIT_COUNT: usize = 64;

/// 乱数表の初期シード。
const SEED: u64 = 0xDEAD_BEEF_CAFE_BABE;

/// Zobrist ハッシュ用の乱数表。
#[derive(Debug, Clone)]
pub(crate) struct Zobrist {
    /// 赤石用乱数。
    red: [u64; BIT_COUNT],
    /// 手番用乱数（黄番のときだけ XOR する）。
    side_to_move: u64,
    /// 黄石用乱数。
    yellow: [u64; BIT_COUNT],
}

/// コンパイル時に生成した乱数表。
pub(crate) static ZOBRIST: Zobrist = Zobrist::new();

impl Zobrist {
    /// 乱数表を生成する。
    const fn new() -> Self {
        let mut seed = SEED;
        let mut red = [0_u64; BIT_COUNT];
        let mut yellow = [0_u64; BIT_COUNT];
        let mut index = 0;
        while index < BIT_COUNT {
            red[index] = splitmix64(&mut seed);
            yellow[index] = splitmix64(&mut seed);
            index += 1;
        }
        let side_to_move = splitmix64(&mut seed);
        Self {
            red,
            side_to_move,
            yellow,
        }
    }

    /// 指定ビット位置に置かれた石の乱数を返す。
    pub(crate) fn piece(&self, color: Color, bit_index: u32) -> u64 {
        let table = match color {
            Color::Red => &self.red,
            Color::Yellow => &self.yellow,
        };
        usize::try_from(bit_index)
            .ok()
            .and_then(|idx| table.get(idx).copied())
            .unwrap_or(u64::MIN)
    }

    /// 手番の乱数を返す（黄番のみ非ゼロ）。
    pub(crate) const fn side(&self, side_to_move: Color) -> u64 {
        match side_to_move {
            Color::Red => u64::MIN,
            Color::Yellow => self.side_to_move,
        }
    }
}

/// `SplitMix64` による擬似乱数生成。
const fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
