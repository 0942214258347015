mod token;

use std::iter::FusedIterator;

pub use self::token::*;

/// A lexer reads a mathematical expression and produces one token at a time.
/// Each token is grown greedily: characters are appended one by one and the
/// token's kind is re-derived after every append, until the next character
/// would no longer continue the current kind.
///
/// The input is expected to be pre-stripped of whitespace; the parser does
/// that before handing the text over.
pub struct Lexer<'a> {
    expr: &'a [u8],
    index: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer from an already-stripped expression.
    pub fn new(expr: &str) -> Lexer {
        Lexer {
            expr: expr.as_bytes(),
            index: 0,
        }
    }

    fn next_token(&mut self) -> Token {
        let mut token = Token::new();
        token.push(self.expr[self.index] as char);
        self.index += 1;

        while self.index < self.expr.len() {
            let c = self.expr[self.index] as char;
            if token.has_ended(c) {
                break;
            }
            token.push(c);
            self.index += 1;
        }

        token
    }
}

impl<'a> FusedIterator for Lexer<'a> {}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.expr.len() {
            return None;
        }
        Some(self.next_token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(expr: &str) -> Vec<(TokenKind, String)> {
        Lexer::new(expr).map(|t| (t.kind, t.text)).collect()
    }

    #[test]
    fn it_handles_empty_input() {
        let mut lexer = Lexer::new("");
        assert_eq!(lexer.next(), None);
    }

    #[test]
    fn it_handles_single_char_tokens() {
        assert_eq!(
            kinds("+-*/^%,()"),
            vec![
                (TokenKind::Operator, "+".to_string()),
                (TokenKind::Operator, "-".to_string()),
                (TokenKind::Operator, "*".to_string()),
                (TokenKind::Operator, "/".to_string()),
                (TokenKind::Operator, "^".to_string()),
                (TokenKind::Operator, "%".to_string()),
                (TokenKind::Operator, ",".to_string()),
                (TokenKind::BracketOpen, "(".to_string()),
                (TokenKind::BracketClose, ")".to_string()),
            ]
        );
    }

    #[test]
    fn it_handles_numbers() {
        assert_eq!(
            kinds("12+3.5"),
            vec![
                (TokenKind::Number, "12".to_string()),
                (TokenKind::Operator, "+".to_string()),
                (TokenKind::Number, "3.5".to_string()),
            ]
        );
    }

    #[test]
    fn it_accepts_at_most_one_decimal_point() {
        // a second dot starts a new number token
        assert_eq!(
            kinds("1.2.3"),
            vec![
                (TokenKind::Number, "1.2".to_string()),
                (TokenKind::Number, ".3".to_string()),
            ]
        );
    }

    #[test]
    fn it_terminates_variables_on_operators_and_brackets() {
        assert_eq!(
            kinds("foo+bar"),
            vec![
                (TokenKind::Variable, "foo".to_string()),
                (TokenKind::Operator, "+".to_string()),
                (TokenKind::Variable, "bar".to_string()),
            ]
        );
        assert_eq!(
            kinds("x*(y)"),
            vec![
                (TokenKind::Variable, "x".to_string()),
                (TokenKind::Operator, "*".to_string()),
                (TokenKind::BracketOpen, "(".to_string()),
                (TokenKind::Variable, "y".to_string()),
                (TokenKind::BracketClose, ")".to_string()),
            ]
        );
    }

    #[test]
    fn it_does_not_terminate_variables_on_commas() {
        // quirk of the grammar: the comma is not in the terminator set
        assert_eq!(kinds("x,y"), vec![(TokenKind::Variable, "x,y".to_string())]);
    }

    #[test]
    fn it_classifies_keywords_as_functions() {
        assert_eq!(
            kinds("clamp(1,2,3)")[0],
            (TokenKind::Function, "clamp".to_string())
        );
        assert_eq!(
            kinds("toRadians(90)")[0],
            (TokenKind::Function, "toRadians".to_string())
        );
    }

    #[test]
    fn it_captures_keyword_prefixed_identifiers_as_functions() {
        // `sind` starts with `sin`, so it lexes as a function token that
        // keeps growing until the opening bracket
        assert_eq!(
            kinds("sind(0)"),
            vec![
                (TokenKind::Function, "sind".to_string()),
                (TokenKind::BracketOpen, "(".to_string()),
                (TokenKind::Number, "0".to_string()),
                (TokenKind::BracketClose, ")".to_string()),
            ]
        );
    }
}
