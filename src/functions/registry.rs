use crate::Expr;
use rustc_hash::FxHashMap;
use std::ops::RangeInclusive;
use std::sync::OnceLock;

/// Symbolic differentiation rule.
/// Arguments: (args of the function call, derivatives of the arguments).
/// Returns the total derivative, or `None` when no closed form exists.
pub(crate) type DerivativeFn = fn(&[Expr], &[Expr]) -> Option<Expr>;

/// Definition of a built-in function including its evaluation and differentiation logic
#[derive(Clone)]
pub(crate) struct FunctionDefinition {
    /// Canonical name of the function (e.g., "sin", "log10")
    pub name: &'static str,

    /// Acceptable argument count (arity)
    pub arity: RangeInclusive<usize>,

    /// Numerical evaluation function; `None` signals a domain error
    pub eval: fn(&[f64]) -> Option<f64>,

    pub derivative: DerivativeFn,
}

impl FunctionDefinition {
    /// Helper to check if argument count is valid
    pub(crate) fn validate_arity(&self, args: usize) -> bool {
        self.arity.contains(&args)
    }

    /// Human readable arity for error messages
    pub(crate) fn arity_description(&self) -> String {
        let (lo, hi) = (*self.arity.start(), *self.arity.end());
        if lo == hi {
            lo.to_string()
        } else if hi == usize::MAX {
            format!("at least {}", lo)
        } else {
            format!("{}-{}", lo, hi)
        }
    }
}

/// Static registry storing all function definitions
static REGISTRY: OnceLock<FxHashMap<&'static str, FunctionDefinition>> = OnceLock::new();

/// Initialize the registry with all function definitions
fn init_registry() -> FxHashMap<&'static str, FunctionDefinition> {
    let defs = crate::functions::definitions::all_definitions();
    let mut map = FxHashMap::with_capacity_and_hasher(defs.len(), Default::default());
    for def in defs {
        map.insert(def.name, def);
    }
    map
}

/// Central registry for getting function definitions
pub(crate) struct Registry;

impl Registry {
    /// Get a function definition by name - O(1) HashMap lookup
    pub(crate) fn get(name: &str) -> Option<&'static FunctionDefinition> {
        REGISTRY.get_or_init(init_registry).get(name)
    }
}

/// Whether `name` is a built-in function the parser treats as a call
pub fn is_builtin(name: &str) -> bool {
    Registry::get(name).is_some()
}

/// All built-in function names, sorted
pub fn function_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = REGISTRY
        .get_or_init(init_registry)
        .keys()
        .copied()
        .collect();
    names.sort_unstable();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert!(is_builtin("sin"));
        assert!(is_builtin("log10"));
        assert!(!is_builtin("x"));
        let log = Registry::get("log").unwrap();
        assert!(log.validate_arity(1));
        assert!(log.validate_arity(2));
        assert!(!log.validate_arity(3));
        assert_eq!(log.arity_description(), "1-2");
        assert_eq!(Registry::get("max").unwrap().arity_description(), "at least 1");
    }

    #[test]
    fn test_function_names_sorted() {
        let names = function_names();
        assert!(names.windows(2).all(|w| w[0] < w[1]));
        assert!(names.contains(&"factorial"));
    }
}
