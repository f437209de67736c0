//! Solver benchmarks.
//!
//! Run with: cargo bench --bench solver_benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::time::Duration;
use tsp_grasp::prelude::*;

/// Random points in the unit square, Euclidean distances.
fn euclidean(n: usize, seed: u64) -> DistanceMatrix {
    let mut rng = SearchRng::new(seed);
    let points: Vec<(f64, f64)> = (0..n).map(|_| (rng.gen_f64(), rng.gen_f64())).collect();
    let rows = points
        .iter()
        .map(|&(x1, y1)| {
            points
                .iter()
                .map(|&(x2, y2)| ((x1 - x2).powi(2) + (y1 - y2).powi(2)).sqrt())
                .collect()
        })
        .collect();
    DistanceMatrix::from_rows(rows).unwrap()
}

fn bench_tour_cost(c: &mut Criterion) {
    let mut group = c.benchmark_group("tour_cost");
    for n in [50, 200, 1000] {
        let m = euclidean(n, 42);
        let eval = Evaluator::new(&m, NoLinkPolicy::default());
        let tour = Tour::identity(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| black_box(eval.cost(black_box(tour.path()))));
        });
    }
    group.finish();
}

fn bench_two_opt(c: &mut Criterion) {
    let mut group = c.benchmark_group("two_opt");
    group.sample_size(20);
    for n in [25, 50, 100] {
        let m = euclidean(n, 42);
        let eval = Evaluator::new(&m, NoLinkPolicy::default());
        let start = Solution::evaluate(Tour::identity(n), &eval).unwrap();
        for (name, policy) in [
            ("first", AcceptancePolicy::FirstImprovement),
            ("best", AcceptancePolicy::BestImprovement),
        ] {
            let search = TwoOpt::default().with_policy(policy);
            group.bench_with_input(BenchmarkId::new(name, n), &n, |b, _| {
                b.iter(|| black_box(search.run(start.clone(), &eval).solution.cost()));
            });
        }
    }
    group.finish();
}

fn bench_randomized_greedy(c: &mut Criterion) {
    let mut group = c.benchmark_group("randomized_greedy");
    for n in [50, 200] {
        let m = euclidean(n, 7);
        let eval = Evaluator::new(&m, NoLinkPolicy::default());
        let mut rng = SearchRng::new(7);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| black_box(randomized_greedy(&eval, 0, 3, &mut rng)));
        });
    }
    group.finish();
}

fn bench_grasp_iterations(c: &mut Criterion) {
    let mut group = c.benchmark_group("grasp");
    group.sample_size(10);
    let m = euclidean(50, 1);
    let eval = Evaluator::new(&m, NoLinkPolicy::default());
    for workers in [1, 4] {
        let config = GraspConfig::default()
            .with_seed(1)
            .with_max_iterations(20)
            .with_time_budget(Duration::from_secs(60))
            .with_workers(workers);
        group.bench_with_input(BenchmarkId::new("workers", workers), &workers, |b, _| {
            b.iter(|| black_box(solve_grasp(&eval, &config).unwrap().best.cost()));
        });
    }
    group.finish();
}

fn bench_solve_exact(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve_exact");
    group.sample_size(10);
    for n in [7, 9] {
        let m = euclidean(n, 3);
        let eval = Evaluator::new(&m, NoLinkPolicy::default());
        for (name, method) in [
            ("enumerate", ExactMethod::Enumerate),
            ("branch_and_bound", ExactMethod::BranchAndBound),
        ] {
            group.bench_with_input(BenchmarkId::new(name, n), &n, |b, _| {
                b.iter(|| black_box(solve_exact(&eval, method).unwrap().cost()));
            });
        }
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_tour_cost,
    bench_two_opt,
    bench_randomized_greedy,
    bench_grasp_iterations,
    bench_solve_exact
);
criterion_main!(benches);
