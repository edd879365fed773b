use crate::token::{Op, Token};
use log::trace;
use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

/// Split `text` into a [`TokenStream`].
///
/// At each position the lexer tries, in order: operators and punctuation
/// (two character operators first), numeric literals (`.5`, `2.`, `2.5`,
/// `25`) and finally word runs of ASCII letters, digits and `_`. Any other
/// character is skipped silently.
///
/// # Examples
///
/// ```
/// # use graphcalc::{tokenize, Token, Op};
/// let tokens: Vec<Token> = tokenize("2**x").collect();
/// assert_eq!(tokens, vec![
///     Token::Number(2.0),
///     Token::Operator(Op::Pow),
///     Token::Identifier("x".into()),
/// ]);
/// ```
pub fn tokenize(text: &str) -> TokenStream {
    let tokens = Lexer::new(text).collect::<Vec<_>>();
    trace!("tokenized {:?} into {} tokens", text, tokens.len());
    TokenStream::new(tokens)
}

/// An helper struct for lexing the input
struct Lexer<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Lexer { input, position: 0 }
    }

    fn rest(&self) -> &'a str {
        let input: &'a str = self.input;
        &input[self.position..]
    }

    fn punctuation(&mut self) -> Option<Token> {
        let rest = self.rest();
        for op in &Op::ALL {
            if rest.starts_with(op.symbol()) {
                self.position += op.symbol().len();
                return Some(Token::Operator(*op));
            }
        }
        let token = match rest.as_bytes().first().copied()? {
            b'(' => Token::LParen,
            b')' => Token::RParen,
            b',' => Token::Comma,
            _ => return None,
        };
        self.position += 1;
        Some(token)
    }

    fn number(&mut self) -> Option<Token> {
        let bytes = self.rest().as_bytes();
        let integer = digits(bytes);
        let length = if bytes.get(integer) == Some(&b'.') {
            let fraction = digits(&bytes[integer + 1..]);
            if integer == 0 && fraction == 0 {
                return None;
            }
            integer + 1 + fraction
        } else if integer > 0 {
            integer
        } else {
            return None;
        };

        let value = self.rest()[..length].parse().ok()?;
        self.position += length;
        Some(Token::Number(value))
    }

    fn word(&mut self) -> Option<Token> {
        let length = self
            .rest()
            .bytes()
            .take_while(|&c| is_word_part(c))
            .count();
        if length == 0 {
            return None;
        }
        let word = &self.rest()[..length];
        self.position += length;
        Some(Token::Identifier(word.to_owned()))
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        while self.position < self.input.len() {
            if let Some(token) = self
                .punctuation()
                .or_else(|| self.number())
                .or_else(|| self.word())
            {
                return Some(token);
            }
            // skip one unrecognized character, which may span several bytes
            let skipped = self.rest().chars().next().map_or(1, char::len_utf8);
            self.position += skipped;
        }
        None
    }
}

fn digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|c| c.is_ascii_digit()).count()
}

/// Check if `c` can appear inside a word
fn is_word_part(c: u8) -> bool {
    c == b'_' || c.is_ascii_alphanumeric()
}

/// The tokens of a single expression, consumed from the front while
/// evaluating.
///
/// Cloning a stream is cheap: clones share the underlying tokens and only
/// copy the read position, so every evaluation can work on its own copy.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenStream {
    tokens: Arc<[Token]>,
    position: usize,
}

impl TokenStream {
    /// Create a stream reading `tokens` from the first one
    pub fn new(tokens: Vec<Token>) -> Self {
        TokenStream {
            tokens: tokens.into(),
            position: 0,
        }
    }

    /// Look at the next token without consuming it
    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    /// Number of tokens not consumed yet
    pub fn remaining(&self) -> usize {
        self.tokens.len() - self.position
    }

    /// Check if every token was consumed
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }
}

impl Iterator for TokenStream {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.position).cloned();
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining(), Some(self.remaining()))
    }
}

impl Display for TokenStream {
    fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
        let mut first = true;
        for token in &self.tokens[self.position..] {
            if !first {
                write!(fmt, " ")?;
            }
            write!(fmt, "{}", token)?;
            first = false;
        }
        Ok(())
    }
}
