use std::{borrow::Cow, iter::Peekable, ops::Range, str::CharIndices};

use crate::dsl::error::ParseError;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TokenKind {
    // Column names and unquoted values
    // Examples: path, directory, /tmp/%.txt
    Ident,
    String,
    LParen,
    RParen,
    And,
    Or,
    Not,
    Like,
    Eq,
    Eof,
}

/// Single token with its text and span. Quoted strings carry their
/// unescaped content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub lexeme: Cow<'a, str>,
    pub span: Range<usize>,
}

pub struct Lexer<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
        }
    }

    fn token(&self, kind: TokenKind, span: Range<usize>) -> Token<'a> {
        Token {
            kind,
            lexeme: Cow::Borrowed(&self.input[span.clone()]),
            span,
        }
    }

    /// Scan an unquoted word starting at `start` with `first_char`.
    fn scan_word(&mut self, start: usize, first_char: char) -> Token<'a> {
        let mut end = start + first_char.len_utf8();

        while let Some(&(i, c)) = self.chars.peek() {
            if is_delimiter(c) {
                break;
            }
            end = i + c.len_utf8();
            self.chars.next();
        }

        let kind = classify_keyword(&self.input[start..end]);
        self.token(kind, start..end)
    }

    /// SQL-style quoted string: a doubled quote stands for one literal quote.
    fn scan_string(&mut self, start: usize, quote: char) -> Result<Token<'a>, ParseError> {
        let content_start = start + 1;
        let mut content = String::new();
        let mut escaped = false;

        while let Some((i, c)) = self.chars.next() {
            if c != quote {
                content.push(c);
                continue;
            }
            if let Some(&(_, next)) = self.chars.peek()
                && next == quote
            {
                self.chars.next();
                content.push(quote);
                escaped = true;
                continue;
            }

            let lexeme = if escaped {
                Cow::Owned(content)
            } else {
                Cow::Borrowed(&self.input[content_start..i])
            };
            return Ok(Token {
                kind: TokenKind::String,
                lexeme,
                span: start..i + 1,
            });
        }

        Err(ParseError::new(
            "unterminated string literal",
            start..self.input.len(),
        ))
    }

    /// Return the next token from the input.
    pub fn next_token(&mut self) -> Result<Token<'a>, ParseError> {
        loop {
            let Some((start, c)) = self.chars.next() else {
                let len = self.input.len();
                return Ok(self.token(TokenKind::Eof, len..len));
            };

            if c.is_whitespace() {
                continue;
            }

            return match c {
                // All of these are ASCII single-byte characters.
                '(' => Ok(self.token(TokenKind::LParen, start..start + 1)),
                ')' => Ok(self.token(TokenKind::RParen, start..start + 1)),
                '=' => Ok(self.token(TokenKind::Eq, start..start + 1)),
                '\'' | '"' => self.scan_string(start, c),
                '|' if matches!(self.chars.peek(), Some(&(_, '|'))) => {
                    self.chars.next();
                    Ok(self.token(TokenKind::Or, start..start + 2))
                }
                _ => Ok(self.scan_word(start, c)),
            };
        }
    }
}

// Unquoted paths stay single words as long as they contain no spaces,
// parentheses, quotes or '='.
#[inline]
fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || matches!(c, '(' | ')' | '=' | '\'' | '"')
}

#[inline]
fn classify_keyword(lexeme: &str) -> TokenKind {
    match lexeme.len() {
        2 if lexeme.eq_ignore_ascii_case("or") => TokenKind::Or,
        3 if lexeme.eq_ignore_ascii_case("and") => TokenKind::And,
        3 if lexeme.eq_ignore_ascii_case("not") => TokenKind::Not,
        4 if lexeme.eq_ignore_ascii_case("like") => TokenKind::Like,
        _ => TokenKind::Ident,
    }
}

pub fn lex(input: &str) -> Result<Vec<Token<'_>>, ParseError> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::with_capacity(16);

    loop {
        let token = lexer.next_token()?;
        let is_eof = token.kind == TokenKind::Eof;
        tokens.push(token);
        if is_eof {
            break;
        }
    }

    Ok(tokens)
}

#[cfg(test)]
#[path = "lexer_tests.rs"]
mod tests;
