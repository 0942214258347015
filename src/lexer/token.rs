/// Keywords that turn an accumulating token into a function token. The match
/// is a prefix test, so an identifier like `sinx` is captured as a function
/// token for `sin`; that ambiguity is part of the grammar and kept as-is.
pub const FUNCTION_KEYWORDS: [&str; 13] = [
    "sin",
    "cos",
    "tan",
    "root",
    "mod",
    "abs",
    "asin",
    "acos",
    "atan",
    "pow",
    "clamp",
    "toRadians",
    "toDegree",
];

/// Characters that end a variable token. The comma is deliberately absent
/// from this set, so `x,y` lexes as a single variable.
const VARIABLE_TERMINATORS: &str = " (){}+-*/^%";

/// The kind of a token, derived from its accumulated text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// The empty initial state; superseded as soon as a character arrives.
    Undefined,
    Number,
    Variable,
    Operator,
    BracketOpen,
    BracketClose,
    Function,
}

/// Derives the kind of a token from its full text. Recomputed from scratch
/// every time a character is appended, so the classification carries no
/// hidden state.
pub fn classify(text: &str) -> TokenKind {
    if text.is_empty() {
        return TokenKind::Undefined;
    }
    match text {
        "+" | "-" | "*" | "/" | "^" | "%" | "," => return TokenKind::Operator,
        "(" => return TokenKind::BracketOpen,
        ")" => return TokenKind::BracketClose,
        _ => {}
    }
    if FUNCTION_KEYWORDS.iter().any(|k| text.starts_with(k)) {
        TokenKind::Function
    } else if text.chars().all(|c| c.is_ascii_digit() || c == '.') {
        TokenKind::Number
    } else {
        TokenKind::Variable
    }
}

/// A token is a number, a variable, a function, an operator or a bracket in
/// a math expression, produced on demand by the [`Lexer`](super::Lexer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub(crate) fn new() -> Token {
        Token {
            kind: TokenKind::Undefined,
            text: String::new(),
        }
    }

    pub fn is_operator(&self, op: &str) -> bool {
        self.kind == TokenKind::Operator && self.text == op
    }

    /// Appends a character and re-derives the token kind.
    pub(crate) fn push(&mut self, c: char) {
        self.text.push(c);
        self.kind = classify(&self.text);
    }

    /// Whether the next character `c` would fall outside this token, given
    /// the kind the token currently has.
    pub(crate) fn has_ended(&self, c: char) -> bool {
        match self.kind {
            TokenKind::Variable => VARIABLE_TERMINATORS.contains(c),
            TokenKind::Number => {
                if self.text.contains('.') {
                    !c.is_ascii_digit()
                } else {
                    !(c.is_ascii_digit() || c == '.')
                }
            }
            TokenKind::Operator | TokenKind::BracketOpen | TokenKind::BracketClose => true,
            TokenKind::Function => c == '(',
            TokenKind::Undefined => false,
        }
    }
}
