//! Engine Benchmarks
//!
//! Parsing, evaluation and the numerical routines the calculator modes call
//! on every keystroke or redraw.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use graphium::graphing::{DEFAULT_POINTS, Viewport, sample_curves};
use graphium::{calculus, parse, stats};
use std::fmt::Write;
use std::hint::black_box;

// Honour RUST_LOG while benchmarking
fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

const FORMULAS: &[(&str, &str)] = &[
    ("poly", "x^3 + 2*x^2 + x"),
    ("trig", "sin(x) * cos(x)"),
    ("implicit", "3x^2 + 2(x - 1)"),
    ("nested", "sin(cos(tan(x)))"),
    ("mixed", "x^2 * sin(x) * exp(-x/3) + log(x^2 + 1)"),
];

/// Sum of `n` alternating terms
fn long_sum(n: usize) -> String {
    let mut s = String::with_capacity(n * 12);
    for i in 1..=n {
        if i > 1 {
            s.push_str(if i % 2 == 0 { " - " } else { " + " });
        }
        let term = match i % 3 {
            0 => write!(s, "{i}*x^{}", i % 5),
            1 => write!(s, "sin({i}*x)"),
            _ => write!(s, "sqrt(x + {i})"),
        };
        term.unwrap();
    }
    s
}

// ==============================================================================
// Parsing
// ==============================================================================

fn bench_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");

    for (name, formula) in FORMULAS {
        group.bench_function(*name, |b| b.iter(|| parse(black_box(formula))));
    }

    for n in [50, 200] {
        let text = long_sum(n);
        group.bench_with_input(BenchmarkId::new("long_sum", n), &text, |b, text| {
            b.iter(|| parse(black_box(text)))
        });
    }

    group.finish();
}

// ==============================================================================
// Evaluation and differentiation on pre-parsed trees
// ==============================================================================

fn bench_evaluation(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluation");

    for (name, formula) in FORMULAS {
        let expr = parse(formula).unwrap();
        group.bench_function(*name, |b| {
            b.iter(|| black_box(&expr).eval(&[("x", black_box(1.7))]))
        });
    }

    group.finish();
}

fn bench_derivative(c: &mut Criterion) {
    let mut group = c.benchmark_group("derivative");

    for (name, formula) in FORMULAS {
        let expr = parse(formula).unwrap();
        group.bench_function(*name, |b| b.iter(|| black_box(&expr).derivative("x")));
    }

    group.finish();
}

// ==============================================================================
// Numerical routines
// ==============================================================================

fn bench_numeric(c: &mut Criterion) {
    init();
    let mut group = c.benchmark_group("numeric");

    let square = parse("x^2").unwrap();
    let sinc = parse("sin(x)/x").unwrap();
    let cubic = parse("x^3 - 2*x - 5").unwrap();
    let cubic_prime = cubic.derivative("x").unwrap();

    group.bench_function("integrate_x^2", |b| {
        b.iter(|| calculus::integrate(square.to_fn("x"), black_box(0.0), black_box(1.0)))
    });

    group.bench_function("limit_sinc", |b| {
        b.iter(|| calculus::limit(sinc.to_fn("x"), black_box(0.0)))
    });

    group.bench_function("newton_cubic", |b| {
        b.iter(|| {
            calculus::newton(cubic.to_fn("x"), cubic_prime.to_fn("x"), black_box(2.0), 1e-6, 50)
        })
    });

    let viewport = Viewport::default();
    group.bench_function("sample_three_curves", |b| {
        b.iter(|| {
            sample_curves(
                black_box(&["sin(x)", "x^2 / 4", "1/x"]),
                &viewport,
                DEFAULT_POINTS,
                None,
            )
        })
    });

    let data: Vec<f64> = (0..1000).map(|i| f64::from(i % 97) * 0.5).collect();
    group.bench_function("statistics_1000", |b| {
        b.iter(|| stats::statistics(black_box(&data)))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_parsing,
    bench_evaluation,
    bench_derivative,
    bench_numeric
);
criterion_main!(benches);
