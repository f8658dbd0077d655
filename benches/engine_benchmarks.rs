//! Benchmarks for move generation, perft and search.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use chess_core::board::{ClassicalEval, Evaluator, Position, SearchLimits, Searcher};
use chess_core::StopFlag;

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
const MIDDLEGAME: &str = "r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4";

fn position(fen: &str) -> Position {
    Position::from_fen(fen).expect("benchmark FEN is valid")
}

fn bench_perft(c: &mut Criterion) {
    let mut group = c.benchmark_group("perft");

    let mut startpos = Position::startpos();
    for depth in 1..=4 {
        group.bench_with_input(BenchmarkId::new("startpos", depth), &depth, |b, &depth| {
            b.iter(|| startpos.perft(black_box(depth)))
        });
    }

    let mut kiwipete = position(KIWIPETE);
    for depth in 1..=3 {
        group.bench_with_input(BenchmarkId::new("kiwipete", depth), &depth, |b, &depth| {
            b.iter(|| kiwipete.perft(black_box(depth)))
        });
    }

    group.finish();
}

fn bench_movegen(c: &mut Criterion) {
    let mut group = c.benchmark_group("movegen");

    for (name, pos) in [
        ("startpos", Position::startpos()),
        ("middlegame", position(MIDDLEGAME)),
        ("kiwipete", position(KIWIPETE)),
    ] {
        group.bench_function(BenchmarkId::new("legal", name), |b| {
            b.iter(|| black_box(pos.generate_moves()))
        });
        group.bench_function(BenchmarkId::new("captures", name), |b| {
            b.iter(|| black_box(pos.generate_captures()))
        });
    }

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    group.sample_size(10);

    let stop = StopFlag::new();

    for depth in [3, 4, 5] {
        group.bench_with_input(BenchmarkId::new("startpos", depth), &depth, |b, &depth| {
            b.iter(|| {
                let mut pos = Position::startpos();
                let mut searcher = Searcher::new(ClassicalEval);
                searcher.resize_tt(16);
                searcher.search(&mut pos, &SearchLimits::depth(depth), &stop)
            })
        });
    }

    for depth in [3, 4] {
        group.bench_with_input(BenchmarkId::new("tactical", depth), &depth, |b, &depth| {
            b.iter(|| {
                let mut pos = position("r1bqkb1r/pppp1Qpp/2n2n2/4p3/2B1P3/8/PPPP1PPP/RNB1K1NR b KQkq - 0 4");
                let mut searcher = Searcher::new(ClassicalEval);
                searcher.resize_tt(16);
                searcher.search(&mut pos, &SearchLimits::depth(depth), &stop)
            })
        });
    }

    group.finish();
}

fn bench_eval(c: &mut Criterion) {
    let mut group = c.benchmark_group("eval");

    for (name, fen) in [
        ("middlegame", MIDDLEGAME),
        ("kiwipete", KIWIPETE),
        ("endgame", "8/5k2/8/8/8/8/5K2/4R3 w - - 0 1"),
    ] {
        let pos = position(fen);
        let mut eval = ClassicalEval;
        group.bench_with_input(BenchmarkId::new("classical", name), &pos, |b, pos| {
            b.iter(|| black_box(eval.evaluate(pos)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_perft, bench_movegen, bench_search, bench_eval);
criterion_main!(benches);
