use std::fmt::{self, Display, Formatter};

/// Possible tokens to find in the input string
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A numeric literal
    Number(f64),
    /// A word: variable, constant or function name
    Identifier(String),
    /// A binary operator. `-` doubles as the negation sign
    Operator(Op),
    /// Left parenthesis
    LParen,
    /// Right parenthesis
    RParen,
    /// Function argument separator
    Comma,
}

impl Token {
    /// Check if this token ends the current expression or term
    pub fn is_terminator(&self) -> bool {
        matches!(self, Self::RParen | Self::Comma)
    }
}

impl Display for Token {
    fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
        match self {
            Self::Number(value) => write!(fmt, "{}", value),
            Self::Identifier(name) => write!(fmt, "{}", name),
            Self::Operator(op) => write!(fmt, "{}", op.symbol()),
            Self::LParen => write!(fmt, "("),
            Self::RParen => write!(fmt, ")"),
            Self::Comma => write!(fmt, ","),
        }
    }
}

/// The two precedence classes of binary operators. All operators inside a
/// tier bind equally and associate left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tier {
    /// `+` and `-`
    Low,
    /// Everything else
    High,
}

/// Allowed operators in the algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `**`, floating point power
    Pow,
    /// `<<`
    Shl,
    /// `>>`, sign propagating
    Shr,
    /// `&`
    BitAnd,
    /// `|`
    BitOr,
    /// `^`, exclusive or
    BitXor,
}

impl Op {
    /// All operators, two-character symbols first so they can be matched
    /// before their one-character prefixes.
    pub const ALL: [Op; 10] = [
        Op::Pow,
        Op::Shl,
        Op::Shr,
        Op::BitAnd,
        Op::BitOr,
        Op::Plus,
        Op::Mul,
        Op::Div,
        Op::Minus,
        Op::BitXor,
    ];

    /// Source text of the operator
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Pow => "**",
            Self::Shl => "<<",
            Self::Shr => ">>",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitXor => "^",
        }
    }

    /// Look up an operator by its source text
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|op| op.symbol() == symbol)
    }

    /// Get the operator precedence tier
    pub fn tier(self) -> Tier {
        match self {
            Self::Plus | Self::Minus => Tier::Low,
            _ => Tier::High,
        }
    }

    /// Apply the operator to two operands.
    ///
    /// Bitwise operators truncate their operands to 32-bit signed integers
    /// first, and the shift count is taken modulo 32.
    pub fn apply(self, left: f64, right: f64) -> f64 {
        match self {
            Self::Plus => left + right,
            Self::Minus => left - right,
            Self::Mul => left * right,
            Self::Div => left / right,
            Self::Pow => power(left, right),
            Self::Shl => f64::from(to_int32(left).wrapping_shl(shift_count(right))),
            Self::Shr => f64::from(to_int32(left).wrapping_shr(shift_count(right))),
            Self::BitAnd => f64::from(to_int32(left) & to_int32(right)),
            Self::BitOr => f64::from(to_int32(left) | to_int32(right)),
            Self::BitXor => f64::from(to_int32(left) ^ to_int32(right)),
        }
    }
}

/// Floating point power, with `NaN` for a `NaN` exponent and for `±1`
/// raised to an infinite exponent
pub fn power(base: f64, exponent: f64) -> f64 {
    if exponent.is_nan() || (exponent.is_infinite() && libm::fabs(base) == 1.0) {
        return f64::NAN;
    }
    libm::pow(base, exponent)
}

/// Convert `value` to a 32-bit two's complement integer: truncate towards
/// zero, then wrap modulo 2^32. Non finite values become 0.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss
)]
pub fn to_int32(value: f64) -> i32 {
    if !value.is_finite() {
        return 0;
    }
    let wrapped = libm::trunc(value).rem_euclid(4_294_967_296.0);
    wrapped as u32 as i32
}

#[allow(clippy::cast_sign_loss)]
fn shift_count(value: f64) -> u32 {
    (to_int32(value) as u32) & 31
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(5.0 => 5 ; "small integers are unchanged")]
    #[test_case(-1.9 => -1 ; "negative values truncate towards zero")]
    #[test_case(4_294_967_296.0 => 0 ; "two to the thirty second wraps to zero")]
    #[test_case(2_147_483_648.0 => i32::MIN ; "two to the thirty first wraps to min")]
    #[test_case(-2_147_483_649.0 => i32::MAX ; "below min wraps to max")]
    #[test_case(f64::NAN => 0 ; "nan is zero")]
    #[test_case(f64::INFINITY => 0 ; "infinity is zero")]
    fn int32(value: f64) -> i32 {
        to_int32(value)
    }

    #[test_case(Op::BitAnd, 5.0, 3.0 => 1.0 ; "and")]
    #[test_case(Op::BitOr, 5.0, 3.0 => 7.0 ; "or")]
    #[test_case(Op::BitXor, 5.0, 3.0 => 6.0 ; "xor")]
    #[test_case(Op::Shl, 1.0, 33.0 => 2.0 ; "shift count is masked")]
    #[test_case(Op::Shl, 1.0, 31.0 => -2_147_483_648.0 ; "left shift wraps into the sign bit")]
    #[test_case(Op::Shr, -8.0, 1.0 => -4.0 ; "right shift is arithmetic")]
    #[test_case(Op::Shr, -1.0, 0.0 => -1.0 ; "right shift by zero keeps the sign")]
    #[test_case(Op::Pow, 2.0, 10.0 => 1024.0 ; "power")]
    #[test_case(Op::Pow, 2.5, 2.0 => 6.25 ; "power is not truncated")]
    fn apply(op: Op, left: f64, right: f64) -> f64 {
        op.apply(left, right)
    }

    #[test]
    fn tiers() {
        assert_eq!(Op::Plus.tier(), Tier::Low);
        assert_eq!(Op::Minus.tier(), Tier::Low);
        for op in &Op::ALL {
            if !matches!(op, Op::Plus | Op::Minus) {
                assert_eq!(op.tier(), Tier::High, "{:?}", op);
            }
        }
    }

    #[test]
    fn symbols() {
        for op in &Op::ALL {
            assert_eq!(Op::from_symbol(op.symbol()), Some(*op));
        }
        assert_eq!(Op::from_symbol("%"), None);
    }

    #[test_case(1.0, f64::NAN ; "one to the nan")]
    #[test_case(-1.0, f64::INFINITY ; "minus one to the infinity")]
    #[test_case(1.0, f64::NEG_INFINITY ; "one to the negative infinity")]
    #[test_case(2.0, f64::NAN ; "nan exponent")]
    fn power_is_nan(base: f64, exponent: f64) {
        assert!(Op::Pow.apply(base, exponent).is_nan());
    }

    #[test]
    fn power_edges() {
        assert_eq!(power(5.0, 0.0), 1.0);
        assert_eq!(power(f64::NAN, 0.0), 1.0);
        assert_eq!(power(2.0, f64::INFINITY), f64::INFINITY);
        assert_eq!(power(0.5, f64::INFINITY), 0.0);
    }

    #[test]
    fn division_by_zero() {
        assert_eq!(Op::Div.apply(1.0, 0.0), f64::INFINITY);
        assert_eq!(Op::Div.apply(-1.0, 0.0), f64::NEG_INFINITY);
        assert!(Op::Div.apply(0.0, 0.0).is_nan());
    }
}
