//! Tokens handed over by the lexer.
//!
//! The node factories in this crate (`IdentifierExpr::from_token`,
//! `IntegerLiteral::from_token`, ...) copy the token's span unchanged.

use crate::nodes::Location;

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Token {
    /// Source text of the token.
    pub lexeme: String,
    pub location: Location,
}

impl Token {
    #[must_use]
    pub fn new(lexeme: impl Into<String>, location: Location) -> Self {
        Self {
            lexeme: lexeme.into(),
            location,
        }
    }
}
