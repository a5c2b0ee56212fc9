//! `ai::alphabeta` の性能計測（固定深さでの 1 手選択）。

use core::hint::black_box;
use core::time::Duration;
use criterion::BatchSize;
use criterion::BenchmarkId;
use criterion::Criterion;
use yonmoku_core::ai::EngineConfig;
use yonmoku_core::ai::alphabeta::Agent;
use yonmoku_core::engine;

/// 固定深さで読み切れるよう十分に長い持ち時間。
const BENCH_TIME_BUDGET: Duration = Duration::from_secs(60);

/// `cargo bench` の引数を取り込みつつ `Criterion` を生成する。
fn criterion_configured() -> Criterion {
    let base = Criterion::default();
    base.configure_from_args()
}

/// 固定手順で `plies` 手進めた局面を返す。
fn board_after(plies: usize) -> engine::Board {
    let mut board = engine::Board::standard();
    for &column in [3_u8, 3, 3, 3, 2, 4, 4, 2, 5, 1, 6, 0].iter().take(plies) {
        if let Ok(record) = board.apply(column) {
            drop(record);
        }
    }
    board
}

/// ベンチ用に代表局面をいくつか用意する。
fn board_samples() -> [engine::Board; 3] {
    [board_after(0), board_after(6), board_after(12)]
}

/// `Agent::choose_move` を置換表あり・なしで計測する。
fn bench_choose_move(criterion: &mut Criterion) {
    let samples = board_samples();
    let configs = [
        ("minimax6", EngineConfig::minimax(6)),
        (
            "advanced6",
            EngineConfig::advanced()
                .with_max_depth(6)
                .with_time_budget(BENCH_TIME_BUDGET),
        ),
    ];

    for (name, config) in configs {
        let mut group = criterion.benchmark_group(format!("ai/alphabeta/{name}"));
        for (index, board) in samples.iter().enumerate() {
            let snapshot = board.to_snapshot();
            let mask: Vec<bool> = (0..board.columns())
                .map(|column| board.playable(column))
                .collect();
            let player = board.side_to_move();

            group.bench_with_input(BenchmarkId::new("pos", index), &snapshot, |bench, input| {
                bench.iter_batched(
                    || Agent::new(config),
                    |mut agent| {
                        black_box(agent.choose_move(input, &mask, player, BENCH_TIME_BUDGET))
                    },
                    BatchSize::LargeInput,
                );
            });
        }
        group.finish();
    }
}

/// ベンチマークのエントリーポイント。
fn main() {
    let mut criterion = criterion_configured();
    bench_choose_move(&mut criterion);
    criterion.final_summary();
}
