use criterion::{criterion_group, criterion_main, Criterion};
use rand::SeedableRng;
use rand_xorshift::XorShiftRng;
use weaves::{
    generators,
    grid::MazeGrid,
    units::{Height, Width},
};

fn bench_woven_maze_32(c: &mut Criterion) {
    c.bench_function("woven_maze_32", |b| {
        b.iter(|| generators::generate(Width(32), Height(32), 42))
    });
}

fn bench_woven_backtracker_128(c: &mut Criterion) {
    let mut rng = XorShiftRng::seed_from_u64(7);
    c.bench_function("woven_backtracker_128", move |b| {
        b.iter(|| {
            let mut g = MazeGrid::new(Width(128), Height(128)).unwrap();
            generators::woven_backtracker(&mut g, &mut rng);
            g
        })
    });
}

fn bench_passage_graph_32(c: &mut Criterion) {
    let g = generators::generate(Width(32), Height(32), 42).unwrap();
    c.bench_function("passage_graph_32", move |b| b.iter(|| g.passage_graph()));
}

criterion_group!(
    benches,
    bench_woven_maze_32,
    bench_woven_backtracker_128,
    bench_passage_graph_32
);
criterion_main!(benches);
