//! Plane and solid measurement, coordinate geometry and the Euler
//! characteristic of closed surfaces

use crate::error::{CalcError, CalcResult};
use serde::Serialize;
use std::f64::consts::PI;

/// Right-angle test tolerance on `a² + b² - c²`
pub const RIGHT_ANGLE_TOLERANCE: f64 = 1e-4;
/// Twice-area threshold below which three points count as collinear
pub const COLLINEAR_TOLERANCE: f64 = 1e-4;

fn positive(name: &str, value: f64) -> CalcResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(CalcError::invalid_input(format!(
            "{name} must be a positive number, got {value}"
        )))
    }
}

// =============================================================================
// Plane figures
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TriangleKind {
    Equilateral,
    Isosceles,
    Scalene,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Triangle {
    pub sides: [f64; 3],
    pub kind: TriangleKind,
    pub right: bool,
    pub perimeter: f64,
    pub semi_perimeter: f64,
    /// Heron's formula
    pub area: f64,
    /// Degrees, opposite `sides[0]`, `sides[1]`, `sides[2]`
    pub angles: [f64; 3],
    pub circumradius: f64,
    pub inradius: f64,
}

/// Solve a triangle from its three side lengths
///
/// Sides must be positive and satisfy the strict triangle inequality.
pub fn triangle(a: f64, b: f64, c: f64) -> CalcResult<Triangle> {
    let (a, b, c) = (positive("a", a)?, positive("b", b)?, positive("c", c)?);
    let s = (a + b + c) / 2.0;
    if s - a <= 0.0 || s - b <= 0.0 || s - c <= 0.0 {
        return Err(CalcError::invalid_input(format!(
            "sides {a}, {b}, {c} do not form a triangle"
        )));
    }
    let area = (s * (s - a) * (s - b) * (s - c)).sqrt();

    let mut sorted = [a, b, c];
    sorted.sort_by(f64::total_cmp);
    let kind = if sorted[0] == sorted[2] {
        TriangleKind::Equilateral
    } else if sorted[0] == sorted[1] || sorted[1] == sorted[2] {
        TriangleKind::Isosceles
    } else {
        TriangleKind::Scalene
    };
    let right =
        (sorted[0].powi(2) + sorted[1].powi(2) - sorted[2].powi(2)).abs() < RIGHT_ANGLE_TOLERANCE;

    // Law of cosines; the clamp absorbs rounding on near-degenerate input
    let angle = |opp: f64, p: f64, q: f64| {
        ((p * p + q * q - opp * opp) / (2.0 * p * q))
            .clamp(-1.0, 1.0)
            .acos()
            .to_degrees()
    };
    let angle_a = angle(a, b, c);
    let angle_b = angle(b, a, c);

    Ok(Triangle {
        sides: [a, b, c],
        kind,
        right,
        perimeter: 2.0 * s,
        semi_perimeter: s,
        area,
        angles: [angle_a, angle_b, 180.0 - angle_a - angle_b],
        circumradius: a * b * c / (4.0 * area),
        inradius: area / s,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Circle {
    pub radius: f64,
    pub diameter: f64,
    pub circumference: f64,
    pub area: f64,
}

pub fn circle(radius: f64) -> CalcResult<Circle> {
    let r = positive("radius", radius)?;
    Ok(Circle {
        radius: r,
        diameter: 2.0 * r,
        circumference: 2.0 * PI * r,
        area: PI * r * r,
    })
}

impl Circle {
    /// Arc length subtended by `theta` radians
    pub fn arc_length(&self, theta: f64) -> f64 {
        self.radius * theta
    }

    pub fn sector_area(&self, theta: f64) -> f64 {
        0.5 * self.radius * self.radius * theta
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegularPolygon {
    pub sides: u32,
    pub side_length: f64,
    pub perimeter: f64,
    pub apothem: f64,
    pub area: f64,
    /// Degrees
    pub interior_angle: f64,
    pub exterior_angle: f64,
    pub interior_sum: f64,
    pub diagonals: u64,
}

pub fn regular_polygon(sides: u32, side_length: f64) -> CalcResult<RegularPolygon> {
    if sides < 3 {
        return Err(CalcError::invalid_input(format!(
            "a polygon needs at least 3 sides, got {sides}"
        )));
    }
    let s = positive("side length", side_length)?;
    let n = f64::from(sides);
    let perimeter = n * s;
    let apothem = s / (2.0 * (PI / n).tan());
    Ok(RegularPolygon {
        sides,
        side_length: s,
        perimeter,
        apothem,
        area: perimeter * apothem / 2.0,
        interior_angle: (n - 2.0) * 180.0 / n,
        exterior_angle: 360.0 / n,
        interior_sum: (n - 2.0) * 180.0,
        diagonals: u64::from(sides) * u64::from(sides - 3) / 2,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ellipse {
    pub semi_major: f64,
    pub semi_minor: f64,
    /// Distance from centre to each focus
    pub linear_eccentricity: f64,
    pub eccentricity: f64,
    pub area: f64,
    /// Ramanujan's second approximation
    pub perimeter: f64,
}

pub fn ellipse(semi_major: f64, semi_minor: f64) -> CalcResult<Ellipse> {
    let a = positive("semi-major axis", semi_major)?;
    let b = positive("semi-minor axis", semi_minor)?;
    if b > a {
        return Err(CalcError::invalid_input(
            "semi-minor axis cannot exceed the semi-major axis",
        ));
    }
    let c = (a * a - b * b).sqrt();
    let h = (a - b).powi(2) / (a + b).powi(2);
    Ok(Ellipse {
        semi_major: a,
        semi_minor: b,
        linear_eccentricity: c,
        eccentricity: c / a,
        area: PI * a * b,
        perimeter: PI * (a + b) * (1.0 + 3.0 * h / (10.0 + (4.0 - 3.0 * h).sqrt())),
    })
}

// =============================================================================
// Solids
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Solid {
    /// Curved surface only, for solids that have one
    pub lateral_area: Option<f64>,
    pub surface_area: f64,
    pub volume: f64,
}

pub fn sphere(radius: f64) -> CalcResult<Solid> {
    let r = positive("radius", radius)?;
    Ok(Solid {
        lateral_area: None,
        surface_area: 4.0 * PI * r * r,
        volume: 4.0 / 3.0 * PI * r.powi(3),
    })
}

pub fn cylinder(radius: f64, height: f64) -> CalcResult<Solid> {
    let r = positive("radius", radius)?;
    let h = positive("height", height)?;
    Ok(Solid {
        lateral_area: Some(2.0 * PI * r * h),
        surface_area: 2.0 * PI * r * (r + h),
        volume: PI * r * r * h,
    })
}

/// Right circular cone; the slant height is `hypot(r, h)`
pub fn cone(radius: f64, height: f64) -> CalcResult<Solid> {
    let r = positive("radius", radius)?;
    let h = positive("height", height)?;
    let slant = r.hypot(h);
    Ok(Solid {
        lateral_area: Some(PI * r * slant),
        surface_area: PI * r * (r + slant),
        volume: PI * r * r * h / 3.0,
    })
}

/// Ring torus with tube radius `minor` swept around a circle of radius `major`
pub fn torus(major: f64, minor: f64) -> CalcResult<Solid> {
    let big = positive("major radius", major)?;
    let r = positive("minor radius", minor)?;
    if r > big {
        return Err(CalcError::invalid_input(
            "minor radius cannot exceed the major radius",
        ));
    }
    Ok(Solid {
        lateral_area: None,
        surface_area: 4.0 * PI * PI * big * r,
        volume: 2.0 * PI * PI * big * r * r,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Platonic {
    Tetrahedron,
    Cube,
    Octahedron,
    Dodecahedron,
    Icosahedron,
}

impl Platonic {
    /// `(vertices, edges, faces)`
    pub fn counts(self) -> (i64, i64, i64) {
        match self {
            Platonic::Tetrahedron => (4, 6, 4),
            Platonic::Cube => (8, 12, 6),
            Platonic::Octahedron => (6, 12, 8),
            Platonic::Dodecahedron => (20, 30, 12),
            Platonic::Icosahedron => (12, 30, 20),
        }
    }

    /// Surface area and volume for edge length `a`
    pub fn measure(self, edge: f64) -> CalcResult<Solid> {
        let a = positive("edge length", edge)?;
        let (s3, s5) = (3f64.sqrt(), 5f64.sqrt());
        let (surface, volume) = match self {
            Platonic::Tetrahedron => (s3, 2f64.sqrt() / 12.0),
            Platonic::Cube => (6.0, 1.0),
            Platonic::Octahedron => (2.0 * s3, 2f64.sqrt() / 3.0),
            Platonic::Dodecahedron => (
                3.0 * (25.0 + 10.0 * s5).sqrt(),
                (15.0 + 7.0 * s5) / 4.0,
            ),
            Platonic::Icosahedron => (5.0 * s3, 5.0 * (3.0 + s5) / 12.0),
        };
        Ok(Solid {
            lateral_area: None,
            surface_area: surface * a * a,
            volume: volume * a.powi(3),
        })
    }
}

// =============================================================================
// Coordinate geometry
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// `None` for a vertical segment
    pub fn slope(self, other: Point) -> Option<f64> {
        let m = (other.y - self.y) / (other.x - self.x);
        m.is_finite().then_some(m)
    }
}

/// Slope and intercept of the line through two points; `None` when vertical
pub fn line_through(a: Point, b: Point) -> Option<(f64, f64)> {
    let m = a.slope(b)?;
    Some((m, a.y - m * a.x))
}

/// Point dividing `a → b` internally in the ratio `m : n`
pub fn section_internal(a: Point, b: Point, m: f64, n: f64) -> CalcResult<Point> {
    if m + n == 0.0 {
        return Err(CalcError::invalid_input("ratio terms cannot sum to zero"));
    }
    Ok(Point::new(
        (m * b.x + n * a.x) / (m + n),
        (m * b.y + n * a.y) / (m + n),
    ))
}

/// Point dividing `a → b` externally in the ratio `m : n`; `None` when `m = n`
pub fn section_external(a: Point, b: Point, m: f64, n: f64) -> Option<Point> {
    (m != n).then(|| {
        Point::new(
            (m * b.x - n * a.x) / (m - n),
            (m * b.y - n * a.y) / (m - n),
        )
    })
}

/// Shoelace area of the triangle `abc`
pub fn triangle_area(a: Point, b: Point, c: Point) -> f64 {
    ((a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y)) / 2.0).abs()
}

pub fn centroid(a: Point, b: Point, c: Point) -> Point {
    Point::new((a.x + b.x + c.x) / 3.0, (a.y + b.y + c.y) / 3.0)
}

pub fn collinear(a: Point, b: Point, c: Point) -> bool {
    triangle_area(a, b, c) < COLLINEAR_TOLERANCE
}

// =============================================================================
// Topology
// =============================================================================

/// `χ = V - E + F`
pub fn euler_characteristic(vertices: i64, edges: i64, faces: i64) -> i64 {
    vertices - edges + faces
}

/// Genus of the closed orientable surface with characteristic `chi`
///
/// `χ = 2 - 2g`, so only even values up to 2 correspond to one.
pub fn genus(chi: i64) -> Option<i64> {
    (chi <= 2 && chi % 2 == 0).then_some((2 - chi) / 2)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Surface {
    Sphere,
    /// `χ = 0`: torus if orientable, Klein bottle otherwise
    TorusOrKleinBottle,
    ProjectivePlane,
    /// Orientable surface with `genus` handles
    Orientable { genus: i64 },
    /// Odd `χ < 1` or `χ > 2`: no single closed surface to name
    Unclassified,
}

/// Name the closed surface a characteristic most likely describes
pub fn classify_surface(chi: i64) -> Surface {
    match chi {
        2 => Surface::Sphere,
        1 => Surface::ProjectivePlane,
        0 => Surface::TorusOrKleinBottle,
        _ => match genus(chi) {
            Some(genus) => Surface::Orientable { genus },
            None => Surface::Unclassified,
        },
    }
}
