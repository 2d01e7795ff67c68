use std::sync::Arc;
use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use aspen_chess::game_state::game_state::GameState;
use aspen_chess::move_generation::move_generator::LegalMoveGenerator;
use aspen_chess::search::board_scoring::PositionalScorer;
use aspen_chess::search::iterative_deepening::Searcher;
use aspen_chess::tables::chess_context::ChessContext;

#[derive(Clone, Copy)]
struct SearchCase {
    name: &'static str,
    fen: &'static str,
}

const CASES: &[SearchCase] = &[
    SearchCase {
        name: "startpos",
        fen: "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    },
    SearchCase {
        name: "classical_mid",
        fen: "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
    },
    SearchCase {
        name: "tactical",
        fen: "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    },
    SearchCase {
        name: "end_kpk",
        fen: "8/8/8/8/8/4k3/4P3/4K3 w - - 0 1",
    },
];

fn bench_fixed_depth_search(c: &mut Criterion) {
    let depth = std::env::var("ASPEN_SEARCH_DEPTH")
        .ok()
        .and_then(|v| v.parse::<u8>().ok())
        .unwrap_or(4)
        .max(1);

    let context = ChessContext::shared();

    let mut group = c.benchmark_group("fixed_depth_search");
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(4));
    group.sample_size(10);

    for case in CASES {
        let game = GameState::from_fen(&context, case.fen).expect("benchmark FEN should parse");
        group.bench_with_input(
            BenchmarkId::new(case.name, format!("d{depth}")),
            &game,
            |b, game| {
                b.iter(|| {
                    let mut searcher = Searcher::new(
                        Arc::clone(&context),
                        LegalMoveGenerator::new(Arc::clone(&context)),
                        PositionalScorer,
                    );
                    let summary = searcher
                        .search_depth(black_box(game), black_box(depth))
                        .expect("search should run");
                    black_box(summary.nodes)
                });
            },
        );
    }

    group.finish();
}

criterion_group!(search_benches, bench_fixed_depth_search);
criterion_main!(search_benches);
