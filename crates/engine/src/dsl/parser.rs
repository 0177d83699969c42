use crate::dsl::{
    ast::{CmpOp, Column, Constraint, Predicate},
    error::ParseError,
    lexer::{Token, TokenKind, lex},
};

struct Parser<'t, 'a> {
    tokens: &'t [Token<'a>],
    pos: usize,
}

impl<'t, 'a> Parser<'t, 'a> {
    fn new(tokens: &'t [Token<'a>]) -> Self {
        Parser { tokens, pos: 0 }
    }

    fn peek(&self) -> TokenKind {
        self.tokens
            .get(self.pos)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    fn current(&self) -> Option<&'t Token<'a>> {
        self.tokens.get(self.pos).or_else(|| self.tokens.last())
    }

    fn advance(&mut self) -> Option<&'t Token<'a>> {
        let tok = self.tokens.get(self.pos);
        self.pos += 1;
        tok
    }

    fn error(&self, message: &str) -> ParseError {
        let span = self.current().map(|t| t.span.clone()).unwrap_or(0..0);
        let found = match self.current() {
            Some(t) if t.kind == TokenKind::Eof => "end of input".to_owned(),
            Some(t) => format!("{:?}", t.lexeme),
            None => "end of input".to_owned(),
        };
        ParseError::new(format!("{message}, found {found}"), span)
    }

    fn parse_or_expr(&mut self) -> Result<Predicate, ParseError> {
        let mut ors = vec![self.parse_and_expr()?];
        while self.peek() == TokenKind::Or {
            self.advance();
            ors.push(self.parse_and_expr()?);
        }
        Ok(collapse(ors, Predicate::Or))
    }

    fn parse_and_expr(&mut self) -> Result<Predicate, ParseError> {
        let mut terms = vec![self.parse_not_expr()?];
        while self.peek() == TokenKind::And {
            self.advance();
            terms.push(self.parse_not_expr()?);
        }
        Ok(collapse(terms, Predicate::And))
    }

    fn parse_not_expr(&mut self) -> Result<Predicate, ParseError> {
        let mut neg_count = 0;
        while self.peek() == TokenKind::Not {
            self.advance();
            neg_count += 1;
        }

        let expr = self.parse_primary()?;
        Ok(if neg_count % 2 == 1 { expr.not() } else { expr })
    }

    fn parse_primary(&mut self) -> Result<Predicate, ParseError> {
        if self.peek() == TokenKind::LParen {
            self.advance();
            let expr = self.parse_or_expr()?;
            if self.peek() != TokenKind::RParen {
                return Err(self.error("expected ')'"));
            }
            self.advance();
            return Ok(expr);
        }
        self.parse_constraint().map(Predicate::Leaf)
    }

    fn parse_constraint(&mut self) -> Result<Constraint, ParseError> {
        if self.peek() != TokenKind::Ident {
            return Err(self.error("expected a column name"));
        }
        let column = match self.current().map(|t| t.lexeme.to_ascii_lowercase()).as_deref() {
            Some("path") => Column::Path,
            Some("directory") => Column::Directory,
            _ => return Err(self.error("expected column `path` or `directory`")),
        };
        self.advance();

        let op = match self.peek() {
            TokenKind::Like => CmpOp::Like,
            TokenKind::Eq => CmpOp::Eq,
            _ => return Err(self.error("expected LIKE or '='")),
        };
        self.advance();

        let value = match self.peek() {
            TokenKind::String | TokenKind::Ident => self
                .advance()
                .map(|t| t.lexeme.clone().into_owned())
                .unwrap_or_default(),
            _ => return Err(self.error("expected a quoted value")),
        };

        Ok(Constraint { column, op, value })
    }
}

fn collapse(mut items: Vec<Predicate>, wrap: fn(Vec<Predicate>) -> Predicate) -> Predicate {
    match items.pop() {
        Some(only) if items.is_empty() => only,
        Some(last) => {
            items.push(last);
            wrap(items)
        }
        None => wrap(items),
    }
}

/// Parse a `path LIKE '…' OR directory = '…'` style predicate.
pub fn parse_predicate(input: &str) -> Result<Predicate, ParseError> {
    let tokens = lex(input)?;

    if tokens.len() == 1 {
        return Err(ParseError::new("empty predicate", 0..input.len()));
    }

    let mut parser = Parser::new(&tokens);
    let expr = parser.parse_or_expr()?;
    if parser.peek() != TokenKind::Eof {
        return Err(parser.error("expected AND, OR or end of input"));
    }
    Ok(expr)
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
