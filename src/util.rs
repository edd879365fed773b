use crate::token::power;
use hashbrown::HashMap;
use std::fmt::{self, Display, Formatter};

/// Built-in constants, visible in every evaluation
pub const CONSTANTS: [(&str, f64); 2] = [("pi", std::f64::consts::PI), ("e", std::f64::consts::E)];

/// How many arguments a function makes use of.
///
/// Arity is informational only: calls are never rejected for passing the
/// wrong number of arguments. Extra arguments are ignored, and missing ones
/// read as `NaN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly `n` arguments
    Exact(usize),
    /// Between `min` and `max` arguments, inclusive
    Between(usize, usize),
    /// At least `min` arguments
    Variadic {
        /// Smallest useful number of arguments
        min: usize,
    },
}

impl Display for Arity {
    fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
        match *self {
            Self::Exact(n) => write!(fmt, "{}", n),
            Self::Between(min, max) => write!(fmt, "{}..{}", min, max),
            Self::Variadic { min } => write!(fmt, "{}+", min),
        }
    }
}

/// A named numeric function callable from expressions
#[derive(Debug, Clone, Copy)]
pub struct Function {
    /// Name used in expressions
    pub name: &'static str,
    /// Documented argument count
    pub arity: Arity,
    call: fn(&[f64]) -> f64,
}

impl Function {
    /// Call the function with already evaluated `args`
    pub fn call(&self, args: &[f64]) -> f64 {
        (self.call)(args)
    }
}

/// The `index`-th argument, or `NaN` if the caller did not provide it
fn arg(args: &[f64], index: usize) -> f64 {
    args.get(index).copied().unwrap_or(f64::NAN)
}

fn unary(args: &[f64], func: fn(f64) -> f64) -> f64 {
    func(arg(args, 0))
}

fn log(args: &[f64]) -> f64 {
    match args {
        [value] => libm::log(*value),
        [base, value, ..] => libm::log(*value) / libm::log(*base),
        [] => f64::NAN,
    }
}

/// Round half-way cases towards positive infinity
fn round(value: f64) -> f64 {
    let floor = libm::floor(value);
    let rounded = if value - floor >= 0.5 { floor + 1.0 } else { floor };
    if rounded == 0.0 {
        libm::copysign(0.0, value)
    } else {
        rounded
    }
}

fn extremum(args: &[f64], pick: fn(f64, f64) -> f64, empty: f64) -> f64 {
    if args.iter().any(|value| value.is_nan()) {
        return f64::NAN;
    }
    args.iter().copied().fold(empty, pick)
}

fn random(_: &[f64]) -> f64 {
    rand::random::<f64>()
}

macro_rules! functions {
    ($($name:literal => $arity:expr, $call:expr;)*) => {{
        let mut map = HashMap::<&'static str, Function>::new();
        $(
            map.insert($name, Function { name: $name, arity: $arity, call: $call });
        )*
        map.shrink_to_fit();
        map
    }};
}

lazy_static! {
    /// Every function callable from an expression, by name
    pub static ref FUNCTIONS: HashMap<&'static str, Function> = functions! {
        "abs" => Arity::Exact(1), |args| unary(args, libm::fabs);
        "acos" => Arity::Exact(1), |args| unary(args, libm::acos);
        "asin" => Arity::Exact(1), |args| unary(args, libm::asin);
        "atan" => Arity::Exact(1), |args| unary(args, libm::atan);
        "atan2" => Arity::Exact(2), |args| libm::atan2(arg(args, 0), arg(args, 1));
        "ceil" => Arity::Exact(1), |args| unary(args, libm::ceil);
        "cos" => Arity::Exact(1), |args| unary(args, libm::cos);
        "floor" => Arity::Exact(1), |args| unary(args, libm::floor);
        "ln" => Arity::Exact(1), |args| unary(args, libm::log);
        "log" => Arity::Between(1, 2), log;
        "max" => Arity::Variadic { min: 1 }, |args| extremum(args, f64::max, f64::NEG_INFINITY);
        "min" => Arity::Variadic { min: 1 }, |args| extremum(args, f64::min, f64::INFINITY);
        "pow" => Arity::Exact(2), |args| power(arg(args, 0), arg(args, 1));
        "random" => Arity::Variadic { min: 1 }, random;
        "round" => Arity::Exact(1), |args| unary(args, round);
        "sin" => Arity::Exact(1), |args| unary(args, libm::sin);
        "sqrt" => Arity::Exact(1), |args| unary(args, libm::sqrt);
        "tan" => Arity::Exact(1), |args| unary(args, libm::tan);
    };
}
