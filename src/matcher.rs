//! Shell-style path patterns.
//!
//! `*` matches any run of characters other than `/`, `?` matches one such
//! character, `[...]` matches a class (`[^...]` negates it, `a-z` is a range)
//! and `\` escapes the next character. A pattern is fully validated before it
//! is matched, so a malformed pattern is reported even when the value would
//! have been rejected early.

use thiserror::Error;

const SEPARATOR: char = '/';

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PatternError {
    #[error("bad pattern '{pattern}': {reason}")]
    BadPattern {
        pattern: String,
        reason: &'static str,
    },
}

/// Evaluates a path pattern against a value.
pub trait PathMatcher: Send + Sync {
    fn matches(&self, pattern: &str, value: &str) -> Result<bool, PatternError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GlobMatcher;

impl PathMatcher for GlobMatcher {
    fn matches(&self, pattern: &str, value: &str) -> Result<bool, PatternError> {
        let tokens = compile(pattern)?;
        let chars: Vec<char> = value.chars().collect();
        Ok(match_tokens(&tokens, &chars))
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Literal(char),
    AnyChar,
    Star,
    Class {
        negated: bool,
        ranges: Vec<(char, char)>,
    },
}

impl Token {
    fn matches_char(&self, c: char) -> bool {
        match self {
            Token::Literal(expected) => *expected == c,
            Token::AnyChar => c != SEPARATOR,
            Token::Class { negated, ranges } => {
                let in_class = ranges.iter().any(|(lo, hi)| *lo <= c && c <= *hi);
                in_class != *negated
            }
            Token::Star => false,
        }
    }
}

fn compile(pattern: &str) -> Result<Vec<Token>, PatternError> {
    let bad = |reason| PatternError::BadPattern {
        pattern: pattern.to_string(),
        reason,
    };

    let mut tokens = Vec::new();
    let mut chars = pattern.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '*' => {
                if tokens.last() != Some(&Token::Star) {
                    tokens.push(Token::Star);
                }
            }
            '?' => tokens.push(Token::AnyChar),
            '\\' => {
                let escaped = chars.next().ok_or_else(|| bad("trailing escape"))?;
                tokens.push(Token::Literal(escaped));
            }
            '[' => {
                let negated = chars.next_if_eq(&'^').is_some();
                let mut ranges = Vec::new();
                loop {
                    match chars.peek().copied() {
                        None => return Err(bad("unterminated character class")),
                        Some(']') if !ranges.is_empty() => {
                            chars.next();
                            break;
                        }
                        Some(_) => {}
                    }
                    let lo = class_char(&mut chars).ok_or_else(|| bad("invalid character class"))?;
                    let hi = if chars.next_if_eq(&'-').is_some() {
                        class_char(&mut chars).ok_or_else(|| bad("invalid range in character class"))?
                    } else {
                        lo
                    };
                    ranges.push((lo, hi));
                }
                tokens.push(Token::Class { negated, ranges });
            }
            other => tokens.push(Token::Literal(other)),
        }
    }

    Ok(tokens)
}

// NOTE: A bare ']' or '-' cannot start a class member; escape them instead.
fn class_char(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Option<char> {
    match chars.next()? {
        ']' | '-' => None,
        '\\' => chars.next(),
        c => Some(c),
    }
}

fn match_tokens(tokens: &[Token], text: &[char]) -> bool {
    match tokens.split_first() {
        None => text.is_empty(),
        Some((Token::Star, rest)) => {
            for i in 0..=text.len() {
                if match_tokens(rest, &text[i..]) {
                    return true;
                }
                if text.get(i) == Some(&SEPARATOR) {
                    break;
                }
            }
            false
        }
        Some((token, rest)) => match text.split_first() {
            Some((c, tail)) if token.matches_char(*c) => match_tokens(rest, tail),
            _ => false,
        },
    }
}
