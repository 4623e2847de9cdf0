//! Unit conversion
//!
//! Every unit maps linearly onto the base unit of its category
//! (`base = value * scale + offset`); only temperatures use a non-zero
//! offset. Conversion goes through the base unit, so any two units of the
//! same category convert directly.

use crate::error::{CalcError, CalcResult};
use crate::format::format_significant;
use regex::Regex;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::fmt;
use std::sync::{LazyLock, OnceLock};
use tracing::debug;

/// Significant digits kept in a printed conversion
const DISPLAY_DIGITS: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    Length,
    Mass,
    Time,
    Temperature,
    Area,
    Volume,
    Speed,
    Force,
    Energy,
    Power,
    Pressure,
    Data,
}

impl Category {
    pub const ALL: [Category; 12] = [
        Category::Length,
        Category::Mass,
        Category::Time,
        Category::Temperature,
        Category::Area,
        Category::Volume,
        Category::Speed,
        Category::Force,
        Category::Energy,
        Category::Power,
        Category::Pressure,
        Category::Data,
    ];

    /// Symbols offered for this category, base unit first
    pub fn units(self) -> Vec<&'static str> {
        UNITS
            .iter()
            .filter(|u| u.category == self)
            .map(|u| u.symbol)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Unit {
    pub symbol: &'static str,
    pub category: Category,
    scale: f64,
    offset: f64,
}

const fn linear(symbol: &'static str, category: Category, scale: f64) -> Unit {
    Unit {
        symbol,
        category,
        scale,
        offset: 0.0,
    }
}

const fn affine(symbol: &'static str, scale: f64, offset: f64) -> Unit {
    Unit {
        symbol,
        category: Category::Temperature,
        scale,
        offset,
    }
}

impl Unit {
    fn to_base(&self, value: f64) -> f64 {
        value * self.scale + self.offset
    }

    fn from_base(&self, value: f64) -> f64 {
        (value - self.offset) / self.scale
    }
}

use Category::*;

// Base units: m, kg, s, K, m^2, m^3, m/s, N, J, W, Pa, bit
static UNITS: &[Unit] = &[
    linear("m", Length, 1.0),
    linear("km", Length, 1e3),
    linear("cm", Length, 1e-2),
    linear("mm", Length, 1e-3),
    linear("mi", Length, 1609.344),
    linear("yd", Length, 0.9144),
    linear("ft", Length, 0.3048),
    linear("in", Length, 0.0254),
    linear("nm", Length, 1e-9),
    linear("angstrom", Length, 1e-10),
    linear("kg", Mass, 1.0),
    linear("g", Mass, 1e-3),
    linear("mg", Mass, 1e-6),
    linear("lb", Mass, 0.453_592_37),
    linear("oz", Mass, 0.028_349_523_125),
    // US short ton
    linear("ton", Mass, 907.184_74),
    linear("tonne", Mass, 1e3),
    linear("s", Time, 1.0),
    linear("ms", Time, 1e-3),
    linear("min", Time, 60.0),
    linear("h", Time, 3600.0),
    linear("day", Time, 86_400.0),
    linear("week", Time, 604_800.0),
    // Julian year
    linear("year", Time, 31_557_600.0),
    affine("K", 1.0, 0.0),
    affine("degC", 1.0, 273.15),
    affine("degF", 5.0 / 9.0, 273.15 - 32.0 * 5.0 / 9.0),
    linear("m^2", Area, 1.0),
    linear("km^2", Area, 1e6),
    linear("cm^2", Area, 1e-4),
    linear("ft^2", Area, 0.092_903_04),
    linear("mi^2", Area, 2_589_988.110_336),
    linear("acre", Area, 4046.856_422_4),
    linear("hectare", Area, 1e4),
    linear("m^3", Volume, 1.0),
    linear("L", Volume, 1e-3),
    linear("mL", Volume, 1e-6),
    linear("cm^3", Volume, 1e-6),
    linear("gallon", Volume, 3.785_411_784e-3),
    linear("quart", Volume, 9.463_529_46e-4),
    linear("pint", Volume, 4.731_764_73e-4),
    linear("cup", Volume, 2.365_882_365e-4),
    linear("floz", Volume, 2.957_352_956_25e-5),
    linear("m/s", Speed, 1.0),
    linear("km/h", Speed, 1.0 / 3.6),
    linear("mph", Speed, 0.447_04),
    linear("knot", Speed, 1852.0 / 3600.0),
    linear("ft/s", Speed, 0.3048),
    linear("N", Force, 1.0),
    linear("kN", Force, 1e3),
    linear("lbf", Force, 4.448_221_615_260_5),
    linear("dyn", Force, 1e-5),
    linear("J", Energy, 1.0),
    linear("kJ", Energy, 1e3),
    linear("cal", Energy, 4.184),
    linear("kcal", Energy, 4184.0),
    linear("Wh", Energy, 3600.0),
    linear("kWh", Energy, 3.6e6),
    linear("eV", Energy, 1.602_176_634e-19),
    linear("BTU", Energy, 1055.055_852_62),
    linear("W", Power, 1.0),
    linear("kW", Power, 1e3),
    linear("MW", Power, 1e6),
    // Mechanical horsepower
    linear("hp", Power, 745.699_871_582_270_2),
    linear("Pa", Pressure, 1.0),
    linear("kPa", Pressure, 1e3),
    linear("bar", Pressure, 1e5),
    linear("atm", Pressure, 101_325.0),
    linear("psi", Pressure, 6894.757_293_168_361),
    linear("mmHg", Pressure, 133.322_387_415),
    linear("torr", Pressure, 101_325.0 / 760.0),
    linear("bit", Data, 1.0),
    linear("byte", Data, 8.0),
    linear("kB", Data, 8e3),
    linear("MB", Data, 8e6),
    linear("GB", Data, 8e9),
    linear("TB", Data, 8e12),
];

/// Spelled-out names accepted alongside the symbols
const ALIASES: &[(&str, &str)] = &[
    ("meter", "m"),
    ("meters", "m"),
    ("kilometer", "km"),
    ("kilometers", "km"),
    ("mile", "mi"),
    ("miles", "mi"),
    ("foot", "ft"),
    ("feet", "ft"),
    ("inch", "in"),
    ("inches", "in"),
    ("gram", "g"),
    ("grams", "g"),
    ("kilogram", "kg"),
    ("kilograms", "kg"),
    ("lbs", "lb"),
    ("second", "s"),
    ("seconds", "s"),
    ("minute", "min"),
    ("minutes", "min"),
    ("hour", "h"),
    ("hours", "h"),
    ("days", "day"),
    ("weeks", "week"),
    ("years", "year"),
    ("celsius", "degC"),
    ("fahrenheit", "degF"),
    ("kelvin", "K"),
    ("liter", "L"),
    ("liters", "L"),
    ("l", "L"),
    ("ml", "mL"),
    ("gal", "gallon"),
    ("kph", "km/h"),
    ("kmh", "km/h"),
    ("knots", "knot"),
    ("bits", "bit"),
    ("bytes", "byte"),
];

static LOOKUP: OnceLock<FxHashMap<&'static str, &'static Unit>> = OnceLock::new();

fn init_lookup() -> FxHashMap<&'static str, &'static Unit> {
    let mut map = FxHashMap::with_capacity_and_hasher(UNITS.len() + ALIASES.len(), Default::default());
    for unit in UNITS {
        map.insert(unit.symbol, unit);
    }
    for &(alias, symbol) in ALIASES {
        if let Some(unit) = map.get(symbol).copied() {
            map.insert(alias, unit);
        }
    }
    map
}

/// Look up a unit by symbol or spelled-out name
pub fn lookup(name: &str) -> CalcResult<&'static Unit> {
    LOOKUP
        .get_or_init(init_lookup)
        .get(name.trim())
        .copied()
        .ok_or_else(|| CalcError::UnknownUnit(name.trim().to_string()))
}

/// A value tagged with the unit it was converted to
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Quantity {
    pub value: f64,
    pub unit: &'static str,
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", format_significant(self.value, DISPLAY_DIGITS), self.unit)
    }
}

/// Convert `value` from one unit to another of the same category
///
/// # Example
/// ```
/// let q = graphium::units::convert(1.0, "km", "m").unwrap();
/// assert_eq!(q.to_string(), "1000 m");
/// ```
pub fn convert(value: f64, from: &str, to: &str) -> CalcResult<Quantity> {
    let source = lookup(from)?;
    let target = lookup(to)?;
    if source.category != target.category {
        return Err(CalcError::UnitMismatch {
            from: source.symbol.to_string(),
            to: target.symbol.to_string(),
        });
    }
    let converted = target.from_base(source.to_base(value));
    debug!(value, from = source.symbol, to = target.symbol, converted, "unit conversion");
    Ok(Quantity {
        value: converted,
        unit: target.symbol,
    })
}

static CONVERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?)\s*(\S+)\s+(?:to|in)\s+(\S+)\s*$")
        .expect("valid regex")
});

/// Split `"<number> <unit> to <unit>"` into its parts
///
/// Returns `None` for text of any other shape, so callers can fall back to
/// ordinary evaluation.
pub fn parse_conversion(text: &str) -> Option<(f64, &str, &str)> {
    let caps = CONVERSION.captures(text)?;
    let value = caps.get(1)?.as_str().parse().ok()?;
    Some((value, caps.get(2)?.as_str(), caps.get(3)?.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * b.abs().max(1.0)
    }

    #[test]
    fn test_length() {
        assert_eq!(convert(1.0, "km", "m").unwrap().value, 1000.0);
        assert!(close(convert(1.0, "mi", "ft").unwrap().value, 5280.0));
        assert!(close(convert(12.0, "in", "feet").unwrap().value, 1.0));
    }

    #[test]
    fn test_temperature_is_affine() {
        assert!(close(convert(100.0, "degC", "degF").unwrap().value, 212.0));
        assert!(close(convert(32.0, "degF", "degC").unwrap().value, 0.0));
        assert!(close(convert(0.0, "celsius", "K").unwrap().value, 273.15));
        assert!(close(convert(-40.0, "degF", "degC").unwrap().value, -40.0));
    }

    #[test]
    fn test_other_categories() {
        assert!(close(convert(1.0, "h", "s").unwrap().value, 3600.0));
        assert!(close(convert(1.0, "hectare", "m^2").unwrap().value, 1e4));
        assert!(close(convert(1.0, "gallon", "quart").unwrap().value, 4.0));
        assert!(close(convert(36.0, "km/h", "m/s").unwrap().value, 10.0));
        assert!(close(convert(1.0, "kWh", "kJ").unwrap().value, 3600.0));
        assert!(close(convert(1.0, "atm", "kPa").unwrap().value, 101.325));
        assert!(close(convert(1.0, "byte", "bit").unwrap().value, 8.0));
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            convert(1.0, "furlong", "m"),
            Err(CalcError::UnknownUnit("furlong".to_string()))
        );
        assert_eq!(
            convert(1.0, "kg", "m"),
            Err(CalcError::UnitMismatch {
                from: "kg".to_string(),
                to: "m".to_string()
            })
        );
    }

    #[test]
    fn test_display_and_parse() {
        assert_eq!(convert(1.0, "km", "m").unwrap().to_string(), "1000 m");
        assert_eq!(convert(1.0, "ft", "in").unwrap().to_string(), "12 in");
        assert_eq!(parse_conversion("1 km to m"), Some((1.0, "km", "m")));
        assert_eq!(parse_conversion("2.5e3 m in km"), Some((2500.0, "m", "km")));
        assert_eq!(parse_conversion("5kg to lb"), Some((5.0, "kg", "lb")));
        assert_eq!(parse_conversion("2 + 3"), None);
    }

    #[test]
    fn test_every_category_has_units() {
        for category in Category::ALL {
            let units = category.units();
            assert!(units.len() >= 3, "{category:?}");
            for symbol in units {
                assert_eq!(lookup(symbol).unwrap().category, category);
            }
        }
    }
}
