//! Exact integer routines: combinatorics, number theory, modular arithmetic
//! and integer recurrences
//!
//! Everything here works on machine integers. Counting functions grow fast,
//! so they use checked `u128` arithmetic and report [`CalcError::Overflow`]
//! instead of wrapping.

use crate::error::{CalcError, CalcResult};
use serde::Serialize;
use std::str::FromStr;

fn overflow(what: impl Into<String>) -> CalcError {
    CalcError::Overflow(what.into())
}

// =============================================================================
// Combinatorics
// =============================================================================

/// `n!`
pub fn factorial(n: u32) -> CalcResult<u128> {
    (2..=u128::from(n)).try_fold(1u128, |acc, k| {
        acc.checked_mul(k).ok_or_else(|| overflow(format!("{n}!")))
    })
}

fn check_r(n: u32, r: u32) -> CalcResult<()> {
    if r > n {
        return Err(CalcError::invalid_input(format!(
            "r = {r} cannot exceed n = {n}"
        )));
    }
    Ok(())
}

/// `P(n, r) = n! / (n - r)!`
pub fn permutations(n: u32, r: u32) -> CalcResult<u128> {
    check_r(n, r)?;
    (u128::from(n - r + 1)..=u128::from(n)).try_fold(1u128, |acc, k| {
        acc.checked_mul(k)
            .ok_or_else(|| overflow(format!("P({n}, {r})")))
    })
}

/// `C(n, r) = n! / (r! (n - r)!)`
///
/// Built up one factor at a time so every intermediate value is itself a
/// binomial coefficient.
pub fn combinations(n: u32, r: u32) -> CalcResult<u128> {
    check_r(n, r)?;
    let r = r.min(n - r);
    let mut acc = 1u128;
    for i in 0..u128::from(r) {
        acc = acc
            .checked_mul(u128::from(n) - i)
            .ok_or_else(|| overflow(format!("C({n}, {r})")))?
            / (i + 1);
    }
    Ok(acc)
}

/// `n^r`: ordered selections with repetition
pub fn permutations_with_repetition(n: u32, r: u32) -> CalcResult<u128> {
    u128::from(n)
        .checked_pow(r)
        .ok_or_else(|| overflow(format!("{n}^{r}")))
}

/// `C(n + r - 1, r)`: multisets of size `r` from `n` kinds
pub fn combinations_with_repetition(n: u32, r: u32) -> CalcResult<u128> {
    if r == 0 {
        return Ok(1);
    }
    if n == 0 {
        return Ok(0);
    }
    let total = (n - 1)
        .checked_add(r)
        .ok_or_else(|| overflow(format!("C({n}+{r}-1, {r})")))?;
    combinations(total, r)
}

/// Permutations of `n` items with no fixed point
pub fn derangements(n: u32) -> CalcResult<u128> {
    // D(n) = (n - 1)(D(n-1) + D(n-2)), D(0) = 1, D(1) = 0
    let (mut prev, mut cur) = (1u128, 0u128);
    if n == 0 {
        return Ok(prev);
    }
    for k in 2..=u128::from(n) {
        let next = prev
            .checked_add(cur)
            .and_then(|s| s.checked_mul(k - 1))
            .ok_or_else(|| overflow(format!("D({n})")))?;
        prev = cur;
        cur = next;
    }
    Ok(cur)
}

/// `C(2n, n) / (n + 1)`
pub fn catalan(n: u32) -> CalcResult<u128> {
    let two_n = n
        .checked_mul(2)
        .ok_or_else(|| overflow(format!("Catalan({n})")))?;
    Ok(combinations(two_n, n)? / (u128::from(n) + 1))
}

/// Number of partitions of an `n`-element set, via the Bell triangle
pub fn bell(n: u32) -> CalcResult<u128> {
    let mut row = vec![1u128];
    for _ in 0..n {
        let mut next = Vec::with_capacity(row.len() + 1);
        let mut last = *row.last().unwrap_or(&1);
        next.push(last);
        for &above in &row {
            last = last
                .checked_add(above)
                .ok_or_else(|| overflow(format!("Bell({n})")))?;
            next.push(last);
        }
        row = next;
    }
    Ok(row[0])
}

// =============================================================================
// Number theory
// =============================================================================

/// Non-negative greatest common divisor; `gcd(0, 0) = 0`
pub fn gcd(a: i128, b: i128) -> i128 {
    let (mut a, mut b) = (a.unsigned_abs(), b.unsigned_abs());
    while b != 0 {
        (a, b) = (b, a % b);
    }
    // Only gcd(i128::MIN, 0) leaves this range
    i128::try_from(a).unwrap_or(i128::MAX)
}

/// Non-negative least common multiple; zero if either argument is zero
pub fn lcm(a: i128, b: i128) -> CalcResult<i128> {
    if a == 0 || b == 0 {
        return Ok(0);
    }
    (a / gcd(a, b))
        .checked_mul(b)
        .map(i128::abs)
        .ok_or_else(|| overflow(format!("lcm({a}, {b})")))
}

/// Bézout coefficients: `a·x + b·y = gcd`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Bezout {
    pub gcd: i128,
    pub x: i128,
    pub y: i128,
}

/// Extended Euclid; the returned gcd is non-negative
pub fn extended_gcd(a: i128, b: i128) -> Bezout {
    let (mut old_r, mut r) = (a, b);
    let (mut old_s, mut s) = (1i128, 0i128);
    let (mut old_t, mut t) = (0i128, 1i128);
    while r != 0 {
        let q = old_r / r;
        (old_r, r) = (r, old_r - q * r);
        (old_s, s) = (s, old_s - q * s);
        (old_t, t) = (t, old_t - q * t);
    }
    if old_r < 0 {
        Bezout {
            gcd: -old_r,
            x: -old_s,
            y: -old_t,
        }
    } else {
        Bezout {
            gcd: old_r,
            x: old_s,
            y: old_t,
        }
    }
}

/// Trial division by 2 and odd numbers up to √n
pub fn is_prime(n: u64) -> bool {
    match n {
        0 | 1 => false,
        2 | 3 => true,
        _ if n % 2 == 0 => false,
        _ => (3u64..)
            .step_by(2)
            .take_while(|i: &u64| i.saturating_mul(*i) <= n)
            .all(|i| n % i != 0),
    }
}

/// Prime factors in ascending order, with multiplicity; empty for 0 and 1
pub fn prime_factors(n: u64) -> Vec<u64> {
    let mut factors = Vec::new();
    if n < 2 {
        return factors;
    }
    let mut rest = n;
    let mut p = 2u64;
    while p.saturating_mul(p) <= rest {
        while rest % p == 0 {
            factors.push(p);
            rest /= p;
        }
        p += if p == 2 { 1 } else { 2 };
    }
    if rest > 1 {
        factors.push(rest);
    }
    factors
}

/// Euler's φ: integers in `1..=n` coprime to `n`
pub fn totient(n: u64) -> u64 {
    let mut factors = prime_factors(n);
    factors.dedup();
    factors.into_iter().fold(n, |acc, p| acc / p * (p - 1))
}

/// All positive divisors, ascending; empty for 0
pub fn divisors(n: u64) -> Vec<u64> {
    let mut small = Vec::new();
    let mut large = Vec::new();
    let mut i = 1u64;
    while i.saturating_mul(i) <= n {
        if n % i == 0 {
            small.push(i);
            if i != n / i {
                large.push(n / i);
            }
        }
        i += 1;
    }
    small.extend(large.into_iter().rev());
    small
}

// =============================================================================
// Modular arithmetic
// =============================================================================

fn check_modulus(m: i128) -> CalcResult<()> {
    if m <= 0 {
        return Err(CalcError::invalid_input(format!(
            "modulus must be positive, got {m}"
        )));
    }
    Ok(())
}

/// Least non-negative residue of `a` modulo `m`
pub fn modulo(a: i128, m: i128) -> CalcResult<i128> {
    check_modulus(m)?;
    Ok(a.rem_euclid(m))
}

/// `base^exp mod m` by square-and-multiply
pub fn mod_pow(base: i128, exp: u64, m: u64) -> CalcResult<u64> {
    check_modulus(i128::from(m))?;
    let m = u128::from(m);
    let mut base = base.rem_euclid(m as i128) as u128;
    let mut exp = exp;
    let mut acc = 1 % m;
    while exp > 0 {
        if exp & 1 == 1 {
            acc = acc * base % m;
        }
        base = base * base % m;
        exp >>= 1;
    }
    // acc < m <= u64::MAX
    Ok(acc as u64)
}

/// `x` in `[0, m)` with `a·x ≡ 1 (mod m)`
///
/// Fails with a domain error when `gcd(a, m) ≠ 1`.
pub fn mod_inverse(a: i128, m: i128) -> CalcResult<i128> {
    check_modulus(m)?;
    let b = extended_gcd(a.rem_euclid(m), m);
    if b.gcd != 1 {
        return Err(CalcError::domain(format!(
            "{a} has no inverse mod {m} (gcd = {})",
            b.gcd
        )));
    }
    Ok(b.x.rem_euclid(m))
}

// =============================================================================
// Recurrences
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    /// `F(n) = F(n-1) + F(n-2)`, `F(0) = 0`, `F(1) = 1`
    Fibonacci,
    /// `L(n) = L(n-1) + L(n-2)`, `L(0) = 2`, `L(1) = 1`
    Lucas,
    /// `T(n) = T(n-1) + T(n-2) + T(n-3)`, `T(0) = T(1) = 0`, `T(2) = 1`
    Tribonacci,
}

impl Recurrence {
    fn seed(self) -> &'static [u128] {
        match self {
            Recurrence::Fibonacci => &[0, 1],
            Recurrence::Lucas => &[2, 1],
            Recurrence::Tribonacci => &[0, 0, 1],
        }
    }

    /// Terms `0..=n`
    pub fn terms(self, n: usize) -> CalcResult<Vec<u128>> {
        let seed = self.seed();
        let order = seed.len();
        let mut terms: Vec<u128> = seed.iter().copied().take(n + 1).collect();
        while terms.len() <= n {
            let next = terms[terms.len() - order..]
                .iter()
                .try_fold(0u128, |acc, &t| acc.checked_add(t))
                .ok_or_else(|| overflow(format!("{self:?} term {}", terms.len())))?;
            terms.push(next);
        }
        Ok(terms)
    }

    /// The `n`-th term
    pub fn nth(self, n: usize) -> CalcResult<u128> {
        let terms = self.terms(n)?;
        Ok(terms[n])
    }
}

impl FromStr for Recurrence {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fibonacci" => Ok(Recurrence::Fibonacci),
            "lucas" => Ok(Recurrence::Lucas),
            "tribonacci" => Ok(Recurrence::Tribonacci),
            other => Err(CalcError::invalid_input(format!(
                "unknown recurrence '{other}'"
            ))),
        }
    }
}

pub fn fibonacci(n: usize) -> CalcResult<u128> {
    Recurrence::Fibonacci.nth(n)
}

pub fn lucas(n: usize) -> CalcResult<u128> {
    Recurrence::Lucas.nth(n)
}

pub fn tribonacci(n: usize) -> CalcResult<u128> {
    Recurrence::Tribonacci.nth(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counting() {
        assert_eq!(factorial(0), Ok(1));
        assert_eq!(factorial(10), Ok(3_628_800));
        assert_eq!(permutations(5, 2), Ok(20));
        assert_eq!(combinations(5, 2), Ok(10));
        assert_eq!(combinations(52, 5), Ok(2_598_960));
        assert_eq!(permutations_with_repetition(5, 2), Ok(25));
        assert_eq!(combinations_with_repetition(5, 2), Ok(15));
        assert_eq!(combinations_with_repetition(0, 0), Ok(1));
        assert!(matches!(permutations(2, 5), Err(CalcError::InvalidInput(_))));
    }

    #[test]
    fn test_special_numbers() {
        let d: Vec<u128> = (0..=6).map(|n| derangements(n).unwrap()).collect();
        assert_eq!(d, vec![1, 0, 1, 2, 9, 44, 265]);
        let c: Vec<u128> = (0..=6).map(|n| catalan(n).unwrap()).collect();
        assert_eq!(c, vec![1, 1, 2, 5, 14, 42, 132]);
        let b: Vec<u128> = (0..=6).map(|n| bell(n).unwrap()).collect();
        assert_eq!(b, vec![1, 1, 2, 5, 15, 52, 203]);
    }

    #[test]
    fn test_overflow_is_reported() {
        assert!(factorial(34).is_ok());
        assert!(matches!(factorial(35), Err(CalcError::Overflow(_))));
        assert!(matches!(
            permutations_with_repetition(2, 200),
            Err(CalcError::Overflow(_))
        ));
        assert!(matches!(fibonacci(500), Err(CalcError::Overflow(_))));
    }

    #[test]
    fn test_gcd_family() {
        assert_eq!(gcd(48, 18), 6);
        assert_eq!(gcd(-48, 18), 6);
        assert_eq!(gcd(0, 0), 0);
        assert_eq!(lcm(4, 6), Ok(12));
        assert_eq!(lcm(-4, 6), Ok(12));

        let b = extended_gcd(240, 46);
        assert_eq!(b.gcd, 2);
        assert_eq!(240 * b.x + 46 * b.y, 2);

        let b = extended_gcd(-12, 8);
        assert_eq!(b.gcd, 4);
        assert_eq!(-12 * b.x + 8 * b.y, 4);
    }

    #[test]
    fn test_primes() {
        let primes: Vec<u64> = (0..30).filter(|&n| is_prime(n)).collect();
        assert_eq!(primes, vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
        assert_eq!(prime_factors(360), vec![2, 2, 2, 3, 3, 5]);
        assert_eq!(prime_factors(97), vec![97]);
        assert!(prime_factors(1).is_empty());
        assert_eq!(totient(36), 12);
        assert_eq!(totient(1), 1);
        assert_eq!(divisors(28), vec![1, 2, 4, 7, 14, 28]);
        assert_eq!(divisors(36), vec![1, 2, 3, 4, 6, 9, 12, 18, 36]);
    }

    #[test]
    fn test_modular() {
        assert_eq!(modulo(-7, 3), Ok(2));
        assert_eq!(mod_pow(4, 13, 497), Ok(445));
        assert_eq!(mod_pow(-2, 3, 5), Ok(2));
        assert_eq!(mod_pow(7, 0, 1), Ok(0));
        assert_eq!(mod_inverse(3, 11), Ok(4));
        assert_eq!(mod_inverse(-3, 11), Ok(7));
        assert!(matches!(mod_inverse(6, 9), Err(CalcError::Domain(_))));
        assert!(matches!(modulo(3, 0), Err(CalcError::InvalidInput(_))));
    }

    #[test]
    fn test_recurrences() {
        assert_eq!(
            Recurrence::Fibonacci.terms(10).unwrap(),
            vec![0, 1, 1, 2, 3, 5, 8, 13, 21, 34, 55]
        );
        assert_eq!(lucas(5), Ok(11));
        assert_eq!(
            Recurrence::Tribonacci.terms(7).unwrap(),
            vec![0, 0, 1, 1, 2, 4, 7, 13]
        );
        assert_eq!(Recurrence::Tribonacci.terms(1).unwrap(), vec![0, 0]);
        assert_eq!("Lucas".parse::<Recurrence>(), Ok(Recurrence::Lucas));
        assert!("padovan".parse::<Recurrence>().is_err());
    }
}
