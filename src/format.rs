//! Number formatting for calculator output
//!
//! Results are rendered the way a browser calculator prints them: a fixed
//! number of significant digits, then the shortest text that reads back to
//! the same double (`0.1 + 0.2` shows as `0.3`).

/// Format to `digits` significant digits, keeping trailing zeros
///
/// Scientific notation is used when the decimal exponent is below -6 or at
/// least `digits`, e.g. `to_precision(123456.0, 3) == "1.23e+5"`.
pub fn to_precision(x: f64, digits: usize) -> String {
    let digits = digits.clamp(1, 100);
    if x.is_nan() {
        return "NaN".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if x == 0.0 {
        return if digits == 1 {
            "0".to_string()
        } else {
            format!("0.{}", "0".repeat(digits - 1))
        };
    }

    // Rounds to `digits` significant figures and tells us the exponent
    let sci = format!("{:.*e}", digits - 1, x);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };

    if exp < -6 || exp >= digits as i32 {
        let sign = if exp >= 0 { "+" } else { "-" };
        format!("{}e{}{}", mantissa, sign, exp.abs())
    } else {
        let decimals = (digits as i32 - 1 - exp).max(0) as usize;
        format!("{:.*}", decimals, x)
    }
}

/// Shortest round-trip rendering of a double
///
/// Plain decimal notation between 1e-6 and 1e21, exponent form (`1e+21`,
/// `1.5e-7`) outside that range.
pub fn shortest(x: f64) -> String {
    if x.is_nan() {
        return "NaN".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if x == 0.0 {
        return "0".to_string();
    }
    let abs = x.abs();
    if (1e-6..1e21).contains(&abs) {
        format!("{}", x)
    } else {
        let s = format!("{:e}", x);
        match s.split_once('e') {
            Some((m, e)) if !e.starts_with('-') => format!("{}e+{}", m, e),
            _ => s,
        }
    }
}

/// Round to `digits` significant digits, then print the shortest form
pub fn format_significant(x: f64, digits: usize) -> String {
    let rounded = to_precision(x, digits).parse::<f64>().unwrap_or(x);
    shortest(rounded)
}

/// Fixed number of decimals; negative zero prints unsigned
pub fn to_fixed(x: f64, decimals: usize) -> String {
    let x = if x == 0.0 { 0.0 } else { x };
    format!("{:.*}", decimals, x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_precision_fixed() {
        assert_eq!(to_precision(9.0, 10), "9.000000000");
        assert_eq!(to_precision(0.5, 3), "0.500");
        assert_eq!(to_precision(-1.23456, 3), "-1.23");
        assert_eq!(to_precision(0.0, 3), "0.00");
        assert_eq!(to_precision(0.000123, 2), "0.00012");
    }

    #[test]
    fn test_to_precision_exponential() {
        assert_eq!(to_precision(123456.0, 3), "1.23e+5");
        assert_eq!(to_precision(1.5e-7, 2), "1.5e-7");
    }

    #[test]
    fn test_shortest() {
        assert_eq!(shortest(4.0), "4");
        assert_eq!(shortest(0.3), "0.3");
        assert_eq!(shortest(-0.0), "0");
        assert_eq!(shortest(1e21), "1e+21");
        assert_eq!(shortest(1.5e-7), "1.5e-7");
        assert_eq!(shortest(123456789.0), "123456789");
        assert_eq!(shortest(0.000001), "0.000001");
    }

    #[test]
    fn test_format_significant() {
        assert_eq!(format_significant(0.1 + 0.2, 12), "0.3");
        assert_eq!(format_significant(1.0 / 3.0, 12), "0.333333333333");
        assert_eq!(format_significant(2.0_f64.sqrt(), 12), "1.41421356237");
        assert_eq!(format_significant(1e100, 12), "1e+100");
    }

    #[test]
    fn test_to_fixed() {
        assert_eq!(to_fixed(3.0, 4), "3.0000");
        assert_eq!(to_fixed(-2.5, 1), "-2.5");
        assert_eq!(to_fixed(-0.0, 2), "0.00");
    }
}
