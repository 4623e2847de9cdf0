//! Two-variable linear programming by corner-point enumeration
//!
//! Maximises `c1·x + c2·y` over constraints `a·x + b·y (<=|>=|=) c` with an
//! implicit `x, y >= 0`. Candidates are the origin, every pairwise
//! intersection of constraint lines and every axis intercept.

use crate::error::{CalcError, CalcResult};
use crate::traits::same_point;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, warn};

/// Below this `|det|` two constraint lines count as parallel
const PARALLEL_EPSILON: f64 = 1e-4;
/// Slack allowed when checking a candidate against a constraint
const FEASIBILITY_SLACK: f64 = 1e-3;
/// Corners closer than this in both coordinates are the same corner
const CORNER_DEDUP: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Relation {
    Le,
    Ge,
    Eq,
}

impl Relation {
    pub fn symbol(&self) -> &'static str {
        match self {
            Relation::Le => "<=",
            Relation::Ge => ">=",
            Relation::Eq => "=",
        }
    }
}

/// `a·x + b·y (relation) c`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearConstraint {
    pub a: f64,
    pub b: f64,
    pub relation: Relation,
    pub c: f64,
}

impl LinearConstraint {
    pub fn new(a: f64, b: f64, relation: Relation, c: f64) -> Self {
        LinearConstraint { a, b, relation, c }
    }

    pub fn is_satisfied(&self, x: f64, y: f64) -> bool {
        let lhs = self.a * x + self.b * y;
        match self.relation {
            Relation::Le => lhs <= self.c + FEASIBILITY_SLACK,
            Relation::Ge => lhs >= self.c - FEASIBILITY_SLACK,
            Relation::Eq => (lhs - self.c).abs() <= FEASIBILITY_SLACK,
        }
    }
}

impl fmt::Display for LinearConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.b < 0.0 { '-' } else { '+' };
        write!(
            f,
            "{}x {} {}y {} {}",
            self.a,
            sign,
            self.b.abs(),
            self.relation.symbol(),
            self.c
        )
    }
}

/// A constraint line that could not be read
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("line {line}: {reason} in \"{text}\"")]
pub struct ConstraintParseError {
    /// 1-indexed line number
    pub line: usize,
    pub text: String,
    pub reason: String,
}

impl FromStr for LinearConstraint {
    type Err = String;

    /// Grammar: `[±][coef][*]x [±][coef][*]y relation [±]number`, where
    /// either term may be missing and `relation` is `<=`, `>=`, `=`, `≤` or `≥`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();

        let (lhs, relation, rhs) = split_relation(&compact)
            .ok_or_else(|| "missing relation (<=, >= or =)".to_string())?;
        let c = rhs
            .parse::<f64>()
            .map_err(|_| format!("right-hand side '{}' is not a number", rhs))?;
        let (a, b) = parse_terms(lhs)?;

        Ok(LinearConstraint { a, b, relation, c })
    }
}

fn split_relation(s: &str) -> Option<(&str, Relation, &str)> {
    const RELATIONS: [(&str, Relation); 5] = [
        ("<=", Relation::Le),
        (">=", Relation::Ge),
        ("≤", Relation::Le),
        ("≥", Relation::Ge),
        ("=", Relation::Eq),
    ];
    RELATIONS.iter().find_map(|(token, rel)| {
        s.find(token)
            .map(|pos| (&s[..pos], *rel, &s[pos + token.len()..]))
    })
}

/// Coefficients of `x` and `y` in a sum of linear terms
fn parse_terms(lhs: &str) -> Result<(f64, f64), String> {
    if lhs.is_empty() {
        return Err("missing left-hand side".to_string());
    }

    let (mut a, mut b) = (0.0, 0.0);
    let mut rest = lhs;
    let mut first = true;

    while !rest.is_empty() {
        let sign = if let Some(r) = rest.strip_prefix('+') {
            rest = r;
            1.0
        } else if let Some(r) = rest.strip_prefix('-') {
            rest = r;
            -1.0
        } else if first {
            1.0
        } else {
            return Err(format!("expected '+' or '-' before '{}'", rest));
        };

        let digits = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let coef = if digits == 0 {
            1.0
        } else {
            rest[..digits]
                .parse::<f64>()
                .map_err(|_| format!("bad coefficient '{}'", &rest[..digits]))?
        };
        rest = &rest[digits..];
        rest = rest.strip_prefix('*').unwrap_or(rest);

        match rest.chars().next() {
            Some('x') => a += sign * coef,
            Some('y') => b += sign * coef,
            Some(c) => return Err(format!("expected x or y, found '{}'", c)),
            None => return Err("constant terms belong on the right-hand side".to_string()),
        }
        rest = &rest[1..];
        first = false;
    }

    Ok((a, b))
}

/// Parse one constraint per non-blank line
///
/// Lines that fail to parse are returned separately and otherwise ignored.
pub fn parse_constraints(text: &str) -> (Vec<LinearConstraint>, Vec<ConstraintParseError>) {
    let mut constraints = Vec::new();
    let mut errors = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match trimmed.parse::<LinearConstraint>() {
            Ok(c) => constraints.push(c),
            Err(reason) => {
                let err = ConstraintParseError {
                    line: idx + 1,
                    text: trimmed.to_string(),
                    reason,
                };
                warn!(%err, "skipping constraint");
                errors.push(err);
            }
        }
    }
    (constraints, errors)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Corner {
    pub x: f64,
    pub y: f64,
    /// Objective value at this corner
    pub z: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LpSolution {
    pub constraints: Vec<LinearConstraint>,
    /// Lines skipped by [`parse_constraints`]
    pub skipped: Vec<ConstraintParseError>,
    /// Feasible corners after deduplication, in discovery order
    pub corners: Vec<Corner>,
    pub optimal: Corner,
}

fn feasible(constraints: &[LinearConstraint], x: f64, y: f64) -> bool {
    x >= 0.0 && y >= 0.0 && constraints.iter().all(|c| c.is_satisfied(x, y))
}

/// Candidate corners in discovery order, before feasibility filtering
fn candidates(constraints: &[LinearConstraint]) -> Vec<(f64, f64)> {
    let mut points = vec![(0.0, 0.0)];

    for (i, p) in constraints.iter().enumerate() {
        for q in &constraints[i + 1..] {
            let det = p.a * q.b - q.a * p.b;
            if det.abs() > PARALLEL_EPSILON {
                let x = (p.c * q.b - q.c * p.b) / det;
                let y = (p.a * q.c - q.a * p.c) / det;
                points.push((x, y));
            }
        }
    }

    for con in constraints {
        if con.a != 0.0 {
            points.push((con.c / con.a, 0.0));
        }
        if con.b != 0.0 {
            points.push((0.0, con.c / con.b));
        }
    }
    points
}

/// Maximise `c1·x + c2·y` subject to `constraints` and `x, y >= 0`
///
/// Ties between corners keep the one found first.
pub fn solve(objective: (f64, f64), constraints: &[LinearConstraint]) -> CalcResult<LpSolution> {
    let (c1, c2) = objective;

    let mut corners: Vec<Corner> = Vec::new();
    for (x, y) in candidates(constraints) {
        if !feasible(constraints, x, y) {
            continue;
        }
        if corners
            .iter()
            .any(|k| same_point((k.x, k.y), (x, y), CORNER_DEDUP))
        {
            continue;
        }
        corners.push(Corner {
            x,
            y,
            z: c1 * x + c2 * y,
        });
    }

    let optimal = corners
        .iter()
        .copied()
        .reduce(|best, c| if c.z > best.z { c } else { best })
        .ok_or(CalcError::Infeasible)?;

    debug!(corners = corners.len(), x = optimal.x, y = optimal.y, z = optimal.z, "lp solved");
    Ok(LpSolution {
        constraints: constraints.to_vec(),
        skipped: Vec::new(),
        corners,
        optimal,
    })
}

/// Parse `text` line by line, then [`solve`]
pub fn solve_text(objective: (f64, f64), text: &str) -> CalcResult<LpSolution> {
    let (constraints, skipped) = parse_constraints(text);
    let mut solution = solve(objective, &constraints)?;
    solution.skipped = skipped;
    Ok(solution)
}
