mod ast;
mod error;
mod lexer;
mod parser;
mod predicates;

pub use ast::*;
pub use error::ParseError;
pub use lexer::{Token, TokenKind};
pub use parser::parse_predicate;
pub use predicates::CompiledPredicate;
