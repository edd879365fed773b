use crate::util::CONSTANTS;
use std::collections::HashMap;

/// Which side wins when a caller variable has the name of a built-in
/// constant (`pi` or `e`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Precedence {
    /// Built-in constants shadow caller variables
    #[default]
    Builtins,
    /// Caller variables shadow built-in constants
    Caller,
}

/// The variables visible during one evaluation: caller bindings merged with
/// the built-in constants.
///
/// # Examples
///
/// ```
/// # use std::collections::HashMap;
/// # use graphcalc::{Environment, Precedence};
/// let mut vars: HashMap<String, f64> = HashMap::new();
/// vars.insert("pi".into(), 3.0);
///
/// let env = Environment::new(&vars, Precedence::Builtins);
/// assert_eq!(env.get("pi"), Some(std::f64::consts::PI));
///
/// let env = Environment::new(&vars, Precedence::Caller);
/// assert_eq!(env.get("pi"), Some(3.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    variables: HashMap<String, f64>,
}

impl Environment {
    /// Merge `variables` with the built-in constants, resolving name clashes
    /// according to `precedence`
    pub fn new(variables: &HashMap<String, f64>, precedence: Precedence) -> Self {
        let mut merged = HashMap::with_capacity(variables.len() + CONSTANTS.len());
        let builtins = CONSTANTS.iter().map(|&(name, value)| (name.to_owned(), value));
        let caller = variables.iter().map(|(name, &value)| (name.clone(), value));
        match precedence {
            Precedence::Builtins => {
                merged.extend(caller);
                merged.extend(builtins);
            }
            Precedence::Caller => {
                merged.extend(builtins);
                merged.extend(caller);
            }
        }
        Environment { variables: merged }
    }

    /// Get the value bound to `name`, if any
    pub fn get(&self, name: &str) -> Option<f64> {
        self.variables.get(name).copied()
    }

    /// Check if `name` is bound
    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// Bind `name` to `value`, replacing any previous binding, built-ins
    /// included
    pub fn bind(&mut self, name: &str, value: f64) {
        self.variables.insert(name.to_owned(), value);
    }
}
