//! Property-based tests
//!
//! Uses quickcheck to cover:
//! - Parser and validator robustness on arbitrary text
//! - Determinism of the numeric routines
//! - Arithmetic identities of the integer helpers

use quickcheck::{Arbitrary, Gen, QuickCheck, TestResult};

use crate::{ResultKind, calculus, check_expression, discrete, evaluate, parse, stats};

// ============================================================
// PART 1: GENERATORS
// ============================================================

/// Random well-formed formula in `x`
fn random_formula(g: &mut Gen, depth: usize) -> String {
    if depth == 0 {
        return match u8::arbitrary(g) % 3 {
            0 => "x".to_string(),
            1 => format!("{}", u8::arbitrary(g) % 10),
            _ => "pi".to_string(),
        };
    }
    let lhs = random_formula(g, depth - 1);
    let rhs = random_formula(g, depth - 1);
    match u8::arbitrary(g) % 7 {
        0 => format!("({lhs} + {rhs})"),
        1 => format!("({lhs} - {rhs})"),
        2 => format!("{lhs} * {rhs}"),
        3 => format!("({lhs}) / ({rhs} + 2)"),
        4 => format!("sin({lhs})"),
        5 => format!("({lhs})^2"),
        _ => format!("-{lhs}"),
    }
}

/// Text built from the characters a formula is made of, balanced or not
fn formula_like_text(g: &mut Gen) -> String {
    const ALPHABET: &[char] = &[
        '1', '2', '.', 'x', 'y', 'e', '+', '-', '*', '/', '^', '%', '!', '(', ')', ' ', 's', 'i',
        'n', ',',
    ];
    let len = usize::arbitrary(g) % 24;
    (0..len)
        .map(|_| ALPHABET[usize::arbitrary(g) % ALPHABET.len()])
        .collect()
}

// ============================================================
// PART 2: ROBUSTNESS
// ============================================================

#[cfg(test)]
mod robustness {
    use super::*;

    #[test]
    fn test_parser_never_panics_on_random_input() {
        fn prop_parser_no_panic(input: String) -> TestResult {
            // Either Ok or Err, never a panic
            let _ = parse(&input);
            TestResult::passed()
        }
        QuickCheck::new()
            .tests(1000)
            .max_tests(2000)
            .quickcheck(prop_parser_no_panic as fn(String) -> TestResult);
    }

    #[test]
    fn test_parser_never_panics_on_formula_like_text() {
        fn prop() -> bool {
            let mut g = Gen::new(16);
            let text = formula_like_text(&mut g);
            let _ = parse(&text);
            let _ = evaluate(&text);
            true
        }
        QuickCheck::new().tests(1000).quickcheck(prop as fn() -> bool);
    }

    #[test]
    fn test_generated_formulas_parse() {
        fn prop() -> bool {
            let mut g = Gen::new(8);
            let depth = usize::arbitrary(&mut g) % 4;
            let formula = random_formula(&mut g, depth);
            parse(&formula).is_ok()
        }
        QuickCheck::new().tests(300).quickcheck(prop as fn() -> bool);
    }

    /// `valid` is exactly "no errors", and a formula the parser rejects is
    /// never reported valid
    #[test]
    fn test_validator_valid_iff_no_errors() {
        fn prop(input: String) -> bool {
            let report = check_expression(&input);
            let consistent = report.valid == report.errors.is_empty();
            let parse_failures_flagged = parse(&input).is_ok() || !report.valid;
            consistent && parse_failures_flagged
        }
        QuickCheck::new()
            .tests(1000)
            .quickcheck(prop as fn(String) -> bool);

        fn prop_formula_like() -> bool {
            let mut g = Gen::new(16);
            prop(formula_like_text(&mut g))
        }
        QuickCheck::new()
            .tests(500)
            .quickcheck(prop_formula_like as fn() -> bool);
    }
}

// ============================================================
// PART 3: DETERMINISM AND ARITHMETIC
// ============================================================

#[cfg(test)]
mod numeric {
    use super::*;

    #[test]
    fn test_integer_sums_evaluate_exactly() {
        fn prop(a: i32, b: i32) -> bool {
            let result = evaluate(&format!("{a} + {b}"));
            result.kind == ResultKind::Number
                && result.value == (i64::from(a) + i64::from(b)).to_string()
        }
        QuickCheck::new()
            .tests(500)
            .quickcheck(prop as fn(i32, i32) -> bool);
    }

    #[test]
    fn test_numeric_routines_are_idempotent() {
        fn prop() -> bool {
            let mut g = Gen::new(8);
            let formula = random_formula(&mut g, 2);
            let Ok(expr) = parse(&formula) else {
                return false;
            };
            let first = calculus::integrate(expr.to_fn("x"), 0.0, 1.0);
            let second = calculus::integrate(expr.to_fn("x"), 0.0, 1.0);
            let same_integral = match (first, second) {
                (Ok(a), Ok(b)) => a.to_bits() == b.to_bits(),
                (Err(a), Err(b)) => a == b,
                _ => false,
            };
            same_integral && evaluate(&formula) == evaluate(&formula)
        }
        QuickCheck::new().tests(200).quickcheck(prop as fn() -> bool);
    }

    #[test]
    fn test_statistics_idempotent_and_histogram_complete() {
        fn prop(data: Vec<i16>) -> TestResult {
            if data.len() < 2 {
                return TestResult::discard();
            }
            let data: Vec<f64> = data.into_iter().map(f64::from).collect();
            let (Ok(a), Ok(b)) = (stats::statistics(&data), stats::statistics(&data)) else {
                return TestResult::failed();
            };
            let total: usize = stats::histogram(&data).iter().map(|bin| bin.count).sum();
            TestResult::from_bool(a == b && total == data.len() && a.min <= a.median && a.median <= a.max)
        }
        QuickCheck::new()
            .tests(300)
            .quickcheck(prop as fn(Vec<i16>) -> TestResult);
    }

    #[test]
    fn test_bezout_identity() {
        fn prop(a: i32, b: i32) -> bool {
            let (a, b) = (i128::from(a), i128::from(b));
            let bz = discrete::extended_gcd(a, b);
            let g = discrete::gcd(a, b);
            let divides = g == 0 || (a % g == 0 && b % g == 0);
            bz.gcd == g && a * bz.x + b * bz.y == g && divides
        }
        QuickCheck::new()
            .tests(1000)
            .quickcheck(prop as fn(i32, i32) -> bool);
    }

    #[test]
    fn test_floored_mod_takes_divisor_sign() {
        fn prop(a: i16, b: i16) -> TestResult {
            if b == 0 {
                return TestResult::discard();
            }
            let result = evaluate(&format!("({a}) mod ({b})"));
            let Ok(r) = result.value.parse::<f64>() else {
                return TestResult::failed();
            };
            let b = f64::from(b);
            let in_range = if b > 0.0 { (0.0..b).contains(&r) } else { r <= 0.0 && r > b };
            TestResult::from_bool(in_range && (f64::from(a) - r) % b == 0.0)
        }
        QuickCheck::new()
            .tests(500)
            .quickcheck(prop as fn(i16, i16) -> TestResult);
    }
}
