use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A word-like unit of text with its location in the source string.
///
/// `start` and `end` are byte offsets into the tokenized string and always fall
/// on character boundaries, so `&text[start..end] == token.text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

impl Token {
    pub fn new(text: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            text: text.into(),
            start,
            end,
        }
    }
}

/// Splits text into an ordered sequence of tokens.
///
/// The same tokenizer must be used for catalog names and query text, otherwise
/// phrase boundaries will not line up.
pub trait Tokenizer: Send + Sync + std::fmt::Debug {
    fn tokenize(&self, text: &str) -> Vec<Token>;
}

/// Default English tokenizer.
///
/// Runs of alphanumeric characters form one token, every other non-whitespace
/// character is a token on its own, and whitespace is dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordTokenizer;

impl Tokenizer for WordTokenizer {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut word_start: Option<usize> = None;

        for (offset, c) in text.char_indices() {
            if c.is_alphanumeric() {
                word_start.get_or_insert(offset);
                continue;
            }

            if let Some(start) = word_start.take() {
                tokens.push(Token::new(&text[start..offset], start, offset));
            }

            if !c.is_whitespace() {
                let end = offset + c.len_utf8();
                tokens.push(Token::new(&text[offset..end], offset, end));
            }
        }

        if let Some(start) = word_start {
            tokens.push(Token::new(&text[start..], start, text.len()));
        }

        tokens
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token {index} is empty")]
    Empty { index: usize },

    #[error("Token {index} lies outside the text or off a character boundary")]
    OutOfBounds { index: usize },

    #[error("Token {index} starts before the end of the previous token")]
    Overlapping { index: usize },

    #[error("Token {index} text does not match the text at its offsets")]
    TextMismatch { index: usize },
}

/// Check that a tokenizer's output honours the offset contract for `text`.
///
/// # Errors
///
/// Returns the first violation found: an empty token, offsets outside `text`,
/// tokens that overlap or go backwards, or token text that differs from the
/// slice its offsets point at.
pub fn validate_tokens(text: &str, tokens: &[Token]) -> Result<(), TokenError> {
    let mut previous_end = 0;

    for (index, token) in tokens.iter().enumerate() {
        if token.start >= token.end {
            return Err(TokenError::Empty { index });
        }
        if token.start < previous_end {
            return Err(TokenError::Overlapping { index });
        }
        let Some(slice) = text.get(token.start..token.end) else {
            return Err(TokenError::OutOfBounds { index });
        };
        if slice != token.text {
            return Err(TokenError::TextMismatch { index });
        }
        previous_end = token.end;
    }

    Ok(())
}

/// Title-case text: the first letter of each alphabetic run is uppercased and
/// the rest of the run lowercased.
#[must_use]
pub fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut in_word = false;

    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                result.extend(c.to_lowercase());
            } else {
                result.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            result.push(c);
            in_word = false;
        }
    }

    result
}
