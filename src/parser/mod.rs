use std::iter::once;
use std::mem;

use thiserror::Error;

use crate::lexer::{Lexer, Token, TokenKind};
use crate::node::{Expr, Literal};

/// A structural problem found while parsing.
///
/// Structural errors are collected, not thrown: parsing always runs to the
/// end of the input and resolves as much of the tree as it can, so a
/// diagnostic here means the returned tree may be partial or missing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralError {
    #[error("function `{0}` is missing its argument")]
    MissingFunctionArgument(String),
    #[error("operator `{0}` is misplaced")]
    MisplacedOperator(String),
    #[error("operand expected, but got `{0}` instead")]
    OperandExpected(String),
    #[error("token `{0}` is undefined and cannot be parsed")]
    UndefinedToken(String),
}

/// The outcome of a parse: the resolved tree, if any part of the input was
/// resolvable, together with every structural diagnostic that was reported
/// along the way.
#[derive(Debug)]
pub struct Parsed {
    pub root: Option<Expr>,
    pub diagnostics: Vec<StructuralError>,
}

/// Parses a textual math expression into an expression tree.
///
/// Whitespace, tabs and line breaks are stripped up front. With
/// `simplify` set, constant subtrees are folded once before the tree is
/// returned. Malformed input never panics; it is reported through
/// [`Parsed::diagnostics`] and the offending sub-expression is left out of
/// the result.
pub fn parse(input: &str, simplify: bool) -> Parsed {
    let stripped = strip_chars(input, " \t\r\n");
    let mut lexer = Lexer::new(&stripped);
    let mut diagnostics = Vec::new();

    let mut root = resolve_group(&mut lexer, &mut diagnostics);
    if simplify {
        root = root.map(Expr::simplify);
    }

    Parsed { root, diagnostics }
}

fn strip_chars(input: &str, to_remove: &str) -> String {
    input.chars().filter(|c| !to_remove.contains(*c)).collect()
}

/// An element of the sequence the reducer works on: either a raw token or a
/// sub-expression that has already been resolved (a bracketed group, or an
/// intermediate result of an earlier pass).
#[derive(Debug, Clone)]
enum Element {
    Token(Token),
    Node(Expr),
}

impl Element {
    fn is_operator(&self, op: &str) -> bool {
        matches!(self, Element::Token(t) if t.is_operator(op))
    }

    fn describe(&self) -> String {
        match self {
            Element::Token(t) => t.text.clone(),
            Element::Node(node) => node.to_string(),
        }
    }
}

/// Collects one bracket scope into a flat element sequence and resolves it
/// to a single node.
///
/// Tokens are pulled until the input ends or a closing bracket is consumed
/// (the bracket itself is dropped). An opening bracket recurses, so a nested
/// group lands in the sequence as one already-resolved element. If the scope
/// contains top-level commas it is an argument list: each comma-separated
/// run reduces independently and the results travel on in the transient
/// [`Expr::Args`] carrier.
fn resolve_group(lexer: &mut Lexer, diagnostics: &mut Vec<StructuralError>) -> Option<Expr> {
    let mut elements: Vec<Element> = Vec::new();
    let mut is_argument_list = false;

    while let Some(token) = lexer.next() {
        match token.kind {
            TokenKind::BracketClose => break,
            TokenKind::BracketOpen => {
                if let Some(inner) = resolve_group(lexer, diagnostics) {
                    elements.push(Element::Node(inner));
                }
            }
            _ => {
                if token.is_operator(",") {
                    is_argument_list = true;
                }
                elements.push(Element::Token(token));
            }
        }
    }

    if is_argument_list {
        let mut args = Vec::new();
        let mut run: Vec<Element> = Vec::new();
        for element in elements {
            if element.is_operator(",") {
                if let Some(arg) = reduce(mem::take(&mut run), diagnostics) {
                    args.push(arg);
                }
            } else {
                run.push(element);
            }
        }
        if let Some(arg) = reduce(run, diagnostics) {
            args.push(arg);
        }
        Some(Expr::Args(args))
    } else {
        reduce(elements, diagnostics)
    }
}

/// Reduces one flat element sequence to a single node.
///
/// This is not a precedence-climbing parser: precedence falls out of the
/// order of four full left-to-right rewrite sweeps over the (shrinking)
/// sequence, one for function application, one for `^`, one for `* / %`,
/// and a final additive sweep.
fn reduce(mut elements: Vec<Element>, diagnostics: &mut Vec<StructuralError>) -> Option<Expr> {
    match elements.len() {
        0 => return None,
        1 => return element_to_node(&elements[0], diagnostics),
        2 => return reduce_pair(elements, diagnostics),
        _ => {}
    }

    apply_functions(&mut elements, diagnostics);
    reduce_powers(&mut elements, diagnostics);
    reduce_multiplicative(&mut elements, diagnostics);

    if elements.len() == 1 {
        return element_to_node(&elements[0], diagnostics);
    }
    reduce_additive(&elements, diagnostics)
}

/// A two-element sequence resolves only as a function applied to its
/// argument or as a negation.
fn reduce_pair(elements: Vec<Element>, diagnostics: &mut Vec<StructuralError>) -> Option<Expr> {
    let mut iter = elements.into_iter();
    let (first, second) = match (iter.next(), iter.next()) {
        (Some(first), Some(second)) => (first, second),
        _ => return None,
    };

    match first {
        Element::Token(ref t) if t.kind == TokenKind::Function => {
            let arg = element_to_node(&second, diagnostics)?;
            apply_function(t, arg, diagnostics)
        }
        ref el if el.is_operator("-") => {
            let inner = element_to_node(&second, diagnostics)?;
            Some(Expr::Negate(Box::new(inner)))
        }
        other => {
            diagnostics.push(StructuralError::OperandExpected(other.describe()));
            None
        }
    }
}

/// Converts a single element into a node. Only resolved nodes, number tokens
/// and variable tokens convert; anything else is a structural error and
/// yields `None` after reporting.
fn element_to_node(element: &Element, diagnostics: &mut Vec<StructuralError>) -> Option<Expr> {
    let token = match element {
        Element::Node(node) => return Some(node.clone()),
        Element::Token(token) => token,
    };

    match token.kind {
        TokenKind::Number => match parse_literal(&token.text) {
            Some(literal) => Some(Expr::Num(literal)),
            None => {
                diagnostics.push(StructuralError::UndefinedToken(token.text.clone()));
                None
            }
        },
        TokenKind::Variable => Some(Expr::Variable {
            name: token.text.clone(),
            value: 0.0,
        }),
        TokenKind::Function => {
            diagnostics.push(StructuralError::MissingFunctionArgument(token.text.clone()));
            None
        }
        TokenKind::Operator => {
            diagnostics.push(StructuralError::OperandExpected(token.text.clone()));
            None
        }
        TokenKind::Undefined => {
            diagnostics.push(StructuralError::UndefinedToken(token.text.clone()));
            None
        }
        // brackets never reach the element sequence
        TokenKind::BracketOpen | TokenKind::BracketClose => {
            diagnostics.push(StructuralError::OperandExpected(token.text.clone()));
            None
        }
    }
}

/// The width of a literal follows its spelling: no decimal point means an
/// integer literal.
fn parse_literal(text: &str) -> Option<Literal> {
    if text.contains('.') {
        text.parse::<f64>().ok().map(Literal::Float)
    } else {
        match text.parse::<i64>() {
            Ok(v) => Some(Literal::Int(v)),
            // out of integer range; keep the value as a floating literal
            Err(_) => text.parse::<f64>().ok().map(Literal::Float),
        }
    }
}

/// Builds the node for a function token applied to its resolved argument.
/// An [`Expr::Args`] argument supplies the ordered call arguments; any other
/// node is the single argument. Surplus arguments are ignored, missing ones
/// are reported. Dispatch is a prefix match on the token text, mirroring the
/// lexer's keyword detection.
fn apply_function(
    token: &Token,
    arg: Expr,
    diagnostics: &mut Vec<StructuralError>,
) -> Option<Expr> {
    let args = match arg {
        Expr::Args(list) => list,
        other => vec![other],
    };
    let name = token.text.as_str();

    let node = if name.starts_with("sin") {
        Expr::Sin(unary(args, token, diagnostics)?)
    } else if name.starts_with("cos") {
        Expr::Cos(unary(args, token, diagnostics)?)
    } else if name.starts_with("tan") {
        Expr::Tan(unary(args, token, diagnostics)?)
    } else if name.starts_with("asin") {
        Expr::Asin(unary(args, token, diagnostics)?)
    } else if name.starts_with("acos") {
        Expr::Acos(unary(args, token, diagnostics)?)
    } else if name.starts_with("atan") {
        Expr::Atan(unary(args, token, diagnostics)?)
    } else if name.starts_with("abs") {
        Expr::Abs(unary(args, token, diagnostics)?)
    } else if name.starts_with("root") {
        let (a, b) = binary(args, token, diagnostics)?;
        Expr::Sqrt(a, b)
    } else if name.starts_with("mod") {
        let (a, b) = binary(args, token, diagnostics)?;
        Expr::Mod(a, b)
    } else if name.starts_with("pow") {
        let (a, b) = binary(args, token, diagnostics)?;
        Expr::Pow(a, b)
    } else if name.starts_with("clamp") {
        let (min, max, value) = ternary(args, token, diagnostics)?;
        Expr::Clamp { min, max, value }
    } else if name.starts_with("toRadians") {
        Expr::ToRadians(unary(args, token, diagnostics)?)
    } else if name.starts_with("toDegree") {
        Expr::ToDegree(unary(args, token, diagnostics)?)
    } else {
        diagnostics.push(StructuralError::UndefinedToken(token.text.clone()));
        return None;
    };
    Some(node)
}

fn unary(
    args: Vec<Expr>,
    token: &Token,
    diagnostics: &mut Vec<StructuralError>,
) -> Option<Box<Expr>> {
    let mut iter = args.into_iter();
    match iter.next() {
        Some(a) => Some(Box::new(a)),
        None => {
            diagnostics.push(StructuralError::MissingFunctionArgument(token.text.clone()));
            None
        }
    }
}

fn binary(
    args: Vec<Expr>,
    token: &Token,
    diagnostics: &mut Vec<StructuralError>,
) -> Option<(Box<Expr>, Box<Expr>)> {
    let mut iter = args.into_iter();
    match (iter.next(), iter.next()) {
        (Some(a), Some(b)) => Some((Box::new(a), Box::new(b))),
        _ => {
            diagnostics.push(StructuralError::MissingFunctionArgument(token.text.clone()));
            None
        }
    }
}

fn ternary(
    args: Vec<Expr>,
    token: &Token,
    diagnostics: &mut Vec<StructuralError>,
) -> Option<(Box<Expr>, Box<Expr>, Box<Expr>)> {
    let mut iter = args.into_iter();
    match (iter.next(), iter.next(), iter.next()) {
        (Some(a), Some(b), Some(c)) => Some((Box::new(a), Box::new(b), Box::new(c))),
        _ => {
            diagnostics.push(StructuralError::MissingFunctionArgument(token.text.clone()));
            None
        }
    }
}

/// Pass one: every function element swallows the element after it, so later
/// passes only ever see functions as finished sub-expressions.
fn apply_functions(elements: &mut Vec<Element>, diagnostics: &mut Vec<StructuralError>) {
    let drained = mem::take(elements);
    let mut out = Vec::with_capacity(drained.len());
    let mut i = 0;

    while i < drained.len() {
        let token = match &drained[i] {
            Element::Token(t) if t.kind == TokenKind::Function => t.clone(),
            other => {
                out.push(other.clone());
                i += 1;
                continue;
            }
        };

        if i + 1 >= drained.len() {
            diagnostics.push(StructuralError::MissingFunctionArgument(token.text));
            i += 1;
            continue;
        }

        if let Some(arg) = element_to_node(&drained[i + 1], diagnostics) {
            if let Some(node) = apply_function(&token, arg, diagnostics) {
                out.push(Element::Node(node));
            }
        }
        i += 2;
    }

    *elements = out;
}

/// Pass two: `^`. Each occurrence splices its two neighbors into a power
/// node; the scan resumes at the splice position, so a following `^` sees
/// the freshly built node as its left operand. That makes the operator
/// left-associative: `a^b^c` parses as `(a^b)^c`.
fn reduce_powers(elements: &mut Vec<Element>, diagnostics: &mut Vec<StructuralError>) {
    let mut p = 0;
    while p < elements.len() {
        if !elements[p].is_operator("^") {
            p += 1;
            continue;
        }
        if p == 0 || p == elements.len() - 1 {
            diagnostics.push(StructuralError::MisplacedOperator("^".to_string()));
            p += 1;
            continue;
        }

        let left = element_to_node(&elements[p - 1], diagnostics);
        let right = element_to_node(&elements[p + 1], diagnostics);
        match (left, right) {
            (Some(l), Some(r)) => {
                let node = Expr::Pow(Box::new(l), Box::new(r));
                elements.splice(p - 1..=p + 1, once(Element::Node(node)));
                // leave p where it is: it now addresses the element right
                // after the splice
            }
            _ => p += 1,
        }
    }
}

/// Pass three: `*`, `/` and `%`. Besides the plain three-element splice,
/// this pass absorbs a unary minus on either side of the operator:
///
/// - a minus directly after the operator negates the right operand whenever
///   an operand follows it;
/// - a minus before the left operand is absorbed only in the narrow case
///   where it is the very first element of the sequence and the operator
///   sits at position 2. Minuses deeper in the sequence are left for the
///   additive pass.
fn reduce_multiplicative(elements: &mut Vec<Element>, diagnostics: &mut Vec<StructuralError>) {
    let mut p = 0;
    while p < elements.len() {
        let op = match &elements[p] {
            Element::Token(t)
                if t.kind == TokenKind::Operator
                    && matches!(t.text.as_str(), "*" | "/" | "%") =>
            {
                t.clone()
            }
            _ => {
                p += 1;
                continue;
            }
        };
        if p == 0 || p == elements.len() - 1 {
            diagnostics.push(StructuralError::MisplacedOperator(op.text));
            p += 1;
            continue;
        }

        let mut begin = p - 1;
        let mut span = 3;

        let mut left = element_to_node(&elements[p - 1], diagnostics);
        if p == 2 && elements[0].is_operator("-") {
            left = left.map(|node| Expr::Negate(Box::new(node)));
            begin = 0;
            span = 4;
        }

        let right = if elements[p + 1].is_operator("-") && p + 2 < elements.len() {
            span += 1;
            element_to_node(&elements[p + 2], diagnostics)
                .map(|node| Expr::Negate(Box::new(node)))
        } else {
            element_to_node(&elements[p + 1], diagnostics)
        };

        match (left, right) {
            (Some(l), Some(r)) => {
                let node = match op.text.as_str() {
                    "*" => Expr::Mul(Box::new(l), Box::new(r)),
                    "/" => Expr::Div(Box::new(l), Box::new(r)),
                    _ => Expr::Mod(Box::new(l), Box::new(r)),
                };
                elements.splice(begin..begin + span, once(Element::Node(node)));
                p = begin + 1;
            }
            _ => {
                // the bad operand was reported above; drop the operator and
                // rescan from the element that follows it
                elements.remove(p);
            }
        }
    }
}

/// Pass four: a single forward sweep collecting `left`, `operator`, `right`
/// slots for `+` and `-`. Each completed triple becomes the new left
/// operand, which chains additions left-to-right: `a-b+c` is `(a-b)+c`.
/// A minus found where an operand is due negates that operand instead.
/// Malformed elements are reported and dropped without aborting the sweep.
fn reduce_additive(elements: &[Element], diagnostics: &mut Vec<StructuralError>) -> Option<Expr> {
    let mut combined: Option<Expr> = None;
    let mut left: Option<Expr> = None;
    let mut operator: Option<Token> = None;
    let mut right: Option<Expr> = None;
    let mut negate_left = false;
    let mut negate_right = false;

    for (i, element) in elements.iter().enumerate() {
        let op_token = match element {
            Element::Token(t) if t.kind == TokenKind::Undefined => {
                diagnostics.push(StructuralError::UndefinedToken(t.text.clone()));
                continue;
            }
            Element::Token(t) if t.kind == TokenKind::Operator => Some(t),
            _ => None,
        };

        if i == 0 && !negate_left {
            if let Some(t) = op_token {
                if t.text == "-" {
                    negate_left = true;
                } else {
                    diagnostics.push(StructuralError::OperandExpected(t.text.clone()));
                }
                continue;
            }
        }

        if left.is_none() {
            if let Some(node) = element_to_node(element, diagnostics) {
                left = Some(if negate_left {
                    negate_left = false;
                    Expr::Negate(Box::new(node))
                } else {
                    node
                });
            }
        } else if operator.is_none() {
            match op_token {
                Some(t) if t.text == "+" || t.text == "-" => operator = Some(t.clone()),
                Some(t) => diagnostics.push(StructuralError::MisplacedOperator(t.text.clone())),
                None => diagnostics.push(StructuralError::OperandExpected(element.describe())),
            }
        } else if right.is_none() {
            match op_token {
                Some(t) if !negate_right => {
                    if t.text == "-" {
                        negate_right = true;
                    } else {
                        diagnostics.push(StructuralError::OperandExpected(t.text.clone()));
                    }
                }
                _ => {
                    if let Some(node) = element_to_node(element, diagnostics) {
                        right = Some(if negate_right {
                            Expr::Negate(Box::new(node))
                        } else {
                            node
                        });
                    }
                }
            }
        }

        match (left.take(), operator.take(), right.take()) {
            (Some(l), Some(op), Some(r)) => {
                let node = match op.text.as_str() {
                    "+" => Expr::Add(Box::new(l), Box::new(r)),
                    _ => Expr::Sub(Box::new(l), Box::new(r)),
                };
                combined = Some(node.clone());
                left = Some(node);
                negate_right = false;
            }
            (l, op, r) => {
                left = l;
                operator = op;
                right = r;
            }
        }
    }

    combined
}
