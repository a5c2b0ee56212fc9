//! `engine` の性能計測（着手と取り消し、勝ち判定）。

use core::hint::black_box;
use criterion::BatchSize;
use criterion::Criterion;
use yonmoku_core::engine;

/// `cargo bench` の引数を取り込みつつ `Criterion` を生成する。
fn criterion_configured() -> Criterion {
    let base = Criterion::default();
    base.configure_from_args()
}

/// 中盤の代表局面（固定手順で 12 手進める）。
fn midgame_board() -> engine::Board {
    let mut board = engine::Board::standard();
    for column in [3_u8, 3, 3, 3, 2, 4, 4, 2, 5, 1, 6, 0] {
        if let Ok(record) = board.apply(column) {
            // 局面を進めるだけなので取り消し情報は捨てる。
            drop(record);
        }
    }
    board
}

/// `Board::apply` → `Board::undo` を計測する。
fn bench_apply_undo(criterion: &mut Criterion) {
    let mut board = midgame_board();
    criterion.bench_function("engine/apply_undo_midgame", |bench| {
        bench.iter(|| {
            for column in 0..engine::Board::STANDARD_COLUMNS {
                if let Ok(record) = board.apply(black_box(column)) {
                    board.undo(record);
                }
            }
        });
    });
}

/// `Board::check_win_from` を計測する。
fn bench_check_win(criterion: &mut Criterion) {
    let board = midgame_board();
    criterion.bench_function("engine/check_win_from_midgame", |bench| {
        bench.iter(|| {
            (0..engine::Board::STANDARD_COLUMNS)
                .filter(|&column| board.height(column) > 0)
                .filter(|&column| {
                    let row = board.height(column).wrapping_sub(1);
                    board.check_win_from(black_box(row), black_box(column))
                })
                .count()
        });
    });
}

/// スナップショットからの盤面構築を計測する。
fn bench_from_snapshot(criterion: &mut Criterion) {
    let board = midgame_board();
    let snapshot = board.to_snapshot();
    let side = board.side_to_move();
    criterion.bench_function("engine/from_snapshot_midgame", |bench| {
        bench.iter_batched(
            || snapshot.clone(),
            |input| black_box(engine::Board::from_snapshot(&input, side)),
            BatchSize::SmallInput,
        );
    });
}

/// ベンチマークのエントリーポイント。
fn main() {
    let mut criterion = criterion_configured();

    bench_apply_undo(&mut criterion);
    bench_check_win(&mut criterion);
    bench_from_snapshot(&mut criterion);

    criterion.final_summary();
}
