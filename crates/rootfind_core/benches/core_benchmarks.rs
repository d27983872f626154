//! Criterion benchmarks for rootfind_core evaluation and solver throughput.
//!
//! Measures compiled-expression evaluation (plain and dual), each solver on
//! a reference problem, and bracket scans across grid sizes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rootfind_core::analysis::{bracket, check, suggest};
use rootfind_core::compare::{compare, Method, SolveConfig};
use rootfind_core::expr::Expression;
use rootfind_core::math::solvers::{
    BisectionSolver, DerivativeMode, FixedPointSolver, NewtonRaphsonSolver, SecantSolver,
    SolverConfig,
};

const FORMULA: &str = "exp(-x) * sin(3*x) + x^2 / (1 + x^2) - 0.5";

/// Benchmark compilation and evaluation of a representative formula.
fn bench_expression(c: &mut Criterion) {
    let mut group = c.benchmark_group("expression");

    group.bench_function("compile", |b| {
        b.iter(|| Expression::compile(black_box(FORMULA)).unwrap());
    });

    let f = Expression::compile(FORMULA).unwrap();
    group.bench_function("eval", |b| {
        b.iter(|| f.eval(black_box(0.731)).unwrap());
    });
    group.bench_function("eval_with_derivative", |b| {
        b.iter(|| f.eval_with_derivative(black_box(0.731)).unwrap());
    });

    group.finish();
}

/// Benchmark each solver on cos(x) = x.
fn bench_solvers(c: &mut Criterion) {
    let mut group = c.benchmark_group("solvers");
    let f = Expression::compile("cos(x) - x").unwrap();
    let g = Expression::compile("cos(x)").unwrap();
    let config = SolverConfig::new(1e-10, 500).unwrap();

    let newton = NewtonRaphsonSolver::new(config);
    group.bench_function("newton_analytic", |b| {
        b.iter(|| newton.solve(&f, black_box(0.5)).unwrap());
    });

    let newton_numeric =
        NewtonRaphsonSolver::new(config).with_derivative(DerivativeMode::Numeric { step: None });
    group.bench_function("newton_numeric", |b| {
        b.iter(|| newton_numeric.solve(&f, black_box(0.5)).unwrap());
    });

    let fixed = FixedPointSolver::new(config);
    group.bench_function("fixed_point", |b| {
        b.iter(|| fixed.solve(&g, None, black_box(0.5)).unwrap());
    });

    let bisection = BisectionSolver::new(config);
    group.bench_function("bisection", |b| {
        b.iter(|| bisection.solve(&f, black_box(0.0), black_box(1.0)).unwrap());
    });

    let secant = SecantSolver::new(config);
    group.bench_function("secant", |b| {
        b.iter(|| secant.solve(&f, black_box(0.0), black_box(1.0)).unwrap());
    });

    group.finish();
}

/// Benchmark bracket scans across grid sizes.
fn bench_bracket(c: &mut Criterion) {
    let mut group = c.benchmark_group("bracket");
    let f = Expression::compile("sin(x) - 0.1*x").unwrap();

    for steps in [100, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::new("scan", steps), &steps, |b, &steps| {
            b.iter(|| bracket(&f, black_box(-20.0), black_box(20.0), steps).unwrap());
        });
    }

    group.finish();
}

/// Benchmark diagnostics and the parallel comparison.
fn bench_diagnostics(c: &mut Criterion) {
    let mut group = c.benchmark_group("diagnostics");
    let f = Expression::compile("x^2 - 2").unwrap();
    let g = Expression::compile("cos(x)").unwrap();

    group.bench_function("contraction_check_300", |b| {
        b.iter(|| check(&g, black_box(0.0), black_box(1.0), 300).unwrap());
    });

    group.bench_function("suggest", |b| {
        b.iter(|| suggest(&f, black_box(1.0)).unwrap());
    });

    let mut cfg = SolveConfig::new(1.0);
    cfg.f = Some(f.clone());
    cfg.g = Some(f.fixed_point_map(0.25));
    cfg.x1 = 2.0;
    cfg.solver = SolverConfig::new(1e-10, 200).unwrap();
    group.bench_function("compare_all", |b| {
        b.iter(|| compare(black_box(&Method::ALL), &cfg).unwrap());
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_expression,
    bench_solvers,
    bench_bracket,
    bench_diagnostics
);
criterion_main!(benches);
