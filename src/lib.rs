#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(
    clippy::needless_return,
    clippy::missing_docs_in_private_items,
    clippy::module_name_repetitions,
    clippy::non_ascii_literal
)]

//! Graphcalc, a small calculator language for evaluating and graphing
//! mathematical expressions embedded in strings.
//!
//! The easiest way to use this crate is with the
//! [`calculate`](fn.calculate.html) function:
//!
//! ```
//! use std::collections::HashMap;
//! assert_eq!(graphcalc::calculate("3 + 5 * 2", &HashMap::new()), Ok(13.0));
//! ```
//!
//! The second argument to `calculate` is a [`HashMap`](std::collections::HashMap)
//! that can define variables:
//!
//! ```
//! use std::collections::HashMap;
//!
//! let mut context: HashMap<String, f64> = HashMap::new();
//! context.insert("a".into(), 3.5);
//! assert_eq!(graphcalc::calculate("2 * a", &context), Ok(7.0));
//! ```
//!
//! An expression can also be evaluated over a range of values of one of
//! its variables with [`range`](fn.range.html), which is how graphs are
//! drawn:
//!
//! ```
//! use std::collections::HashMap;
//!
//! let samples = graphcalc::range("x ** 2", "x", 0.0, 3.0, 1.0, &HashMap::new()).unwrap();
//! assert_eq!(samples.inputs, vec![0.0, 1.0, 2.0, 3.0]);
//! assert_eq!(samples.outputs, vec![0.0, 1.0, 4.0, 9.0]);
//! ```
//!
//! # Language definition
//!
//! An expression can contain the following elements:
//!
//! - number literals: `12`, `12.`, `12.5`, `.5`. There is no exponent
//!   notation; a number can be negated with a leading `-`, once;
//! - variables, made of ASCII letters, digits and `_`. The constants `pi`
//!   and `e` are always defined;
//! - parenthesized sub-expressions;
//! - function calls with one or more comma separated arguments:
//!   `abs`, `acos`, `asin`, `atan`, `atan2`, `ceil`, `cos`, `floor`, `ln`,
//!   `log` (`log(x)` or `log(base, x)`), `max`, `min`, `pow`, `random`,
//!   `round`, `sin`, `sqrt`, `tan`;
//! - binary operators, in two precedence tiers: `+` and `-` bind loosest;
//!   `*`, `/`, `**` (power), `<<`, `>>`, `&`, `|` and `^` (xor) all bind
//!   equally tighter. Both tiers are left associative, so `2*3**2` is `36`.
//!
//! Bitwise operators convert their operands to 32-bit signed integers.
//! Other characters are ignored.
//!
//! # Technical details
//!
//! The evaluator is a recursive descent parser computing values as it goes,
//! without building a tree. It works only with `f64` data: division by zero
//! gives infinities or `NaN` rather than an error. Expressions can be
//! tokenized once with [`Expr`](struct.Expr.html) and evaluated many times.

#[macro_use]
extern crate lazy_static;

mod env;
mod error;
mod expr;
pub mod graph;
mod lexer;
mod range;
mod token;
mod util;

pub use env::{Environment, Precedence};
pub use error::Error;
pub use expr::{calculate, evaluate, Calculator, Expr};
pub use lexer::{tokenize, TokenStream};
pub use range::{range, samples, Samples};
pub use token::{to_int32, Op, Tier, Token};
pub use util::{Arity, Function, CONSTANTS, FUNCTIONS};

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn precedence() {
        assert_eq!(calculate("1+2*3", &HashMap::new()), Ok(7.0));
        assert_eq!(calculate("2*3**2", &HashMap::new()), Ok(36.0));
        assert_eq!(calculate("8/2*2", &HashMap::new()), Ok(8.0));
    }

    #[test]
    fn nesting() {
        assert_eq!(calculate("sqrt(16)+max(1,2,3)", &HashMap::new()), Ok(7.0));
    }

    #[test]
    fn shadowing() {
        let mut context: HashMap<String, f64> = HashMap::new();
        context.insert("pi".into(), 1.0);
        assert_eq!(calculate("pi", &context), Ok(std::f64::consts::PI));
    }

    #[test]
    fn bitwise() {
        assert_eq!(calculate("5&3", &HashMap::new()), Ok(1.0));
        assert_eq!(calculate("-1>>0", &HashMap::new()), Ok(-1.0));
        assert_eq!(calculate("3000000000|0", &HashMap::new()), Ok(-1_294_967_296.0));
    }

    #[test]
    fn failures() {
        assert_eq!(
            calculate("foo(1)", &HashMap::new()),
            Err(Error::UnknownIdentifier("foo".into()))
        );
        assert!(matches!(
            calculate("1+1)", &HashMap::new()),
            Err(Error::TrailingTokens(_))
        ));
    }

    #[test]
    fn ranging() {
        let samples = range("x*x", "x", 0.0, 2.0, 1.0, &HashMap::new()).unwrap();
        assert_eq!(samples.inputs, vec![0.0, 1.0, 2.0]);
        assert_eq!(samples.outputs, vec![0.0, 1.0, 4.0]);
    }
}
