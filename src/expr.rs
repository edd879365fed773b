use crate::env::{Environment, Precedence};
use crate::error::Error;
use crate::lexer::{tokenize, TokenStream};
use crate::token::{Op, Tier, Token};
use crate::util::{Function, FUNCTIONS};
use log::debug;
use std::collections::HashMap;

/// Evaluate a single expression from `input`.
///
/// Returns `Ok(result)` if the evaluation is successful, or `Err(cause)` if
/// the expression is malformed. Built-in constants shadow variables of the
/// same name in `context`; use a [`Calculator`] to change that.
///
/// # Example
///
/// ```
/// # use std::collections::HashMap;
/// # use graphcalc::calculate;
/// assert_eq!(calculate("45 - 2**3", &HashMap::new()), Ok(37.0));
///
/// let mut context: HashMap<String, f64> = HashMap::new();
/// context.insert("a".into(), -5.0);
/// assert_eq!(calculate("3 * a", &context), Ok(-15.0));
/// ```
pub fn calculate<'a, C>(input: &str, context: C) -> Result<f64, Error>
where
    C: Into<&'a HashMap<String, f64>>,
{
    Calculator::default().calculate(input, context)
}

/// Evaluate the expression at the front of `tokens` in `env`, consuming the
/// tokens that make it up.
///
/// Evaluation stops before a `)` or `,` that does not belong to the
/// expression, and these tokens are left in the stream. Use
/// [`Expr::eval_in`] to also reject such leftovers.
pub fn evaluate(tokens: &mut TokenStream, env: &Environment) -> Result<f64, Error> {
    Evaluator { tokens, env }.expression()
}

/// Holds the calculation settings shared by [`Calculator::calculate`] and
/// [`Calculator::range`].
///
/// ```
/// # use std::collections::HashMap;
/// # use graphcalc::{Calculator, Precedence};
/// let mut context: HashMap<String, f64> = HashMap::new();
/// context.insert("e".into(), 2.0);
///
/// let calculator = Calculator::new().precedence(Precedence::Caller);
/// assert_eq!(calculator.calculate("e * 3", &context), Ok(6.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Calculator {
    pub(crate) precedence: Precedence,
}

impl Calculator {
    /// A calculator where built-in constants win over caller variables
    pub fn new() -> Self {
        Self::default()
    }

    /// Choose how caller variables and built-in constants are merged
    #[must_use]
    pub fn precedence(mut self, precedence: Precedence) -> Self {
        self.precedence = precedence;
        self
    }

    /// Build the environment for `variables` with this calculator's settings
    pub fn environment(&self, variables: &HashMap<String, f64>) -> Environment {
        Environment::new(variables, self.precedence)
    }

    /// Evaluate `input` with the variables in `context`
    pub fn calculate<'a, C>(&self, input: &str, context: C) -> Result<f64, Error>
    where
        C: Into<&'a HashMap<String, f64>>,
    {
        let env = self.environment(context.into());
        let result = Expr::new(input).eval_in(&env);
        debug!("calculate {:?} = {:?}", input, result);
        result
    }
}

/// A tokenized mathematical expression.
///
/// Tokenizing once and evaluating many times avoids scanning the text again
/// for every new set of variables. Each evaluation works on its own copy of
/// the tokens.
///
/// # Examples
/// ```
/// # use graphcalc::Expr;
/// # use std::collections::HashMap;
/// let expr = Expr::new("3 + 5 * 2");
/// assert_eq!(expr.eval(&HashMap::new()), Ok(13.0));
///
/// let mut context: HashMap<String, f64> = HashMap::new();
/// context.insert("a".into(), 42.0);
/// let expr = Expr::new("-a * 2");
/// assert_eq!(expr.eval(&context), Ok(-84.0));
/// context.insert("a".into(), 1.0);
/// assert_eq!(expr.eval(&context), Ok(-2.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    tokens: TokenStream,
}

impl Expr {
    /// Tokenize the given mathematical `expression`
    pub fn new(expression: &str) -> Self {
        Self {
            tokens: tokenize(expression),
        }
    }

    /// The tokens of this expression
    pub fn tokens(&self) -> &TokenStream {
        &self.tokens
    }

    /// Evaluate the expression in a given `context`, with the built-in
    /// constants taking precedence.
    pub fn eval<'a, C>(&self, context: C) -> Result<f64, Error>
    where
        C: Into<&'a HashMap<String, f64>>,
    {
        self.eval_in(&Environment::new(context.into(), Precedence::default()))
    }

    /// Evaluate the expression in an already merged environment.
    ///
    /// Fails with [`Error::TrailingTokens`] if anything is left after a
    /// complete expression, like the last parenthesis in `1 + 1)`.
    pub fn eval_in(&self, env: &Environment) -> Result<f64, Error> {
        let mut tokens = self.tokens.clone();
        let value = evaluate(&mut tokens, env)?;
        match tokens.next() {
            Some(token) => Err(Error::TrailingTokens(token.to_string())),
            None => Ok(value),
        }
    }
}

impl From<TokenStream> for Expr {
    fn from(tokens: TokenStream) -> Self {
        Self { tokens }
    }
}

/// What a token in operand position stands for. Variables are looked up
/// first, then functions, then literals.
#[derive(Debug, Clone)]
enum Resolution {
    Variable(f64),
    Function(Function),
    Literal(f64),
    Unresolved(String),
}

impl Resolution {
    fn of(token: Token, env: &Environment) -> Self {
        let name = match token {
            Token::Number(value) => return Self::Literal(value),
            Token::Identifier(name) => name,
            other => return Self::Unresolved(other.to_string()),
        };
        if let Some(value) = env.get(&name) {
            Self::Variable(value)
        } else if let Some(&function) = FUNCTIONS.get(name.as_str()) {
            Self::Function(function)
        } else if name == "Infinity" {
            Self::Literal(f64::INFINITY)
        } else {
            Self::Unresolved(name)
        }
    }
}

/// Recursive descent over a token stream, computing the value while
/// parsing.
struct Evaluator<'t, 'e> {
    tokens: &'t mut TokenStream,
    env: &'e Environment,
}

impl<'t, 'e> Evaluator<'t, 'e> {
    /// Terms joined by `+` and `-`
    fn expression(&mut self) -> Result<f64, Error> {
        if self.tokens.is_empty() {
            return Err(Error::MissingOperand);
        }
        let mut value = self.term()?;
        while let Some(op) = self.operator(Tier::Low)? {
            let right = self.term()?;
            value = op.apply(value, right);
        }
        Ok(value)
    }

    /// Operands joined by any operator of the high tier
    fn term(&mut self) -> Result<f64, Error> {
        let mut value = self.operand()?;
        while let Some(op) = self.operator(Tier::High)? {
            let right = self.operand()?;
            value = op.apply(value, right);
        }
        Ok(value)
    }

    /// Consume the next operator if it belongs to `tier`.
    ///
    /// Returns `None` at the end of the stream, before `)` or `,`, and
    /// before an operator of a lower tier, which is left for the caller.
    fn operator(&mut self, tier: Tier) -> Result<Option<Op>, Error> {
        let op = match self.tokens.peek() {
            None => return Ok(None),
            Some(token) if token.is_terminator() => return Ok(None),
            Some(Token::Operator(op)) if op.tier() == tier => *op,
            Some(Token::Operator(op)) if op.tier() < tier => return Ok(None),
            Some(other) => return Err(Error::UnknownOperator(other.to_string())),
        };
        self.tokens.next();
        Ok(Some(op))
    }

    /// A parenthesized expression, or an optionally negated variable,
    /// function call or literal
    fn operand(&mut self) -> Result<f64, Error> {
        let mut token = self.tokens.next().ok_or(Error::MissingOperand)?;
        if token == Token::LParen {
            let value = self.expression()?;
            return match self.tokens.next() {
                Some(Token::RParen) => Ok(value),
                _ => Err(Error::ExpectedCloseParen),
            };
        }

        // a single sign only: `- -1` is rejected on the second `-`
        let mut sign = 1.0;
        if token == Token::Operator(Op::Minus) {
            sign = -1.0;
            token = self.tokens.next().ok_or(Error::MissingOperand)?;
        }

        match Resolution::of(token, self.env) {
            Resolution::Variable(value) | Resolution::Literal(value) => Ok(sign * value),
            Resolution::Function(function) => Ok(sign * self.call(&function)?),
            Resolution::Unresolved(name) => Err(Error::UnknownIdentifier(name)),
        }
    }

    /// The parenthesized, comma separated arguments of a function call
    fn call(&mut self, function: &Function) -> Result<f64, Error> {
        if self.tokens.next() != Some(Token::LParen) {
            return Err(Error::ExpectedOpenParen);
        }
        let mut args = vec![self.expression()?];
        while self.tokens.peek() == Some(&Token::Comma) {
            self.tokens.next();
            args.push(self.expression()?);
        }
        match self.tokens.next() {
            Some(Token::RParen) => Ok(function.call(&args)),
            _ => Err(Error::ExpectedCloseParen),
        }
    }
}
