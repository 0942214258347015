use super::{Expr, Literal};

impl Expr {
    /// Folds constant subtrees bottom-up: every node whose simplified
    /// children are all literals is replaced by a single floating literal,
    /// produced by the node's own f64 evaluation. Literals and variables are
    /// fixed points; a variable never folds, even after it has been bound.
    /// No algebraic identities are applied.
    pub fn simplify(self) -> Expr {
        let node = match self {
            Expr::Num(_) | Expr::Variable { .. } => return self,
            Expr::Negate(a) => Expr::Negate(simplified(a)),
            Expr::Add(a, b) => Expr::Add(simplified(a), simplified(b)),
            Expr::Sub(a, b) => Expr::Sub(simplified(a), simplified(b)),
            Expr::Mul(a, b) => Expr::Mul(simplified(a), simplified(b)),
            Expr::Div(a, b) => Expr::Div(simplified(a), simplified(b)),
            Expr::Mod(a, b) => Expr::Mod(simplified(a), simplified(b)),
            Expr::Pow(a, b) => Expr::Pow(simplified(a), simplified(b)),
            Expr::Sqrt(a, b) => Expr::Sqrt(simplified(a), simplified(b)),
            Expr::Sin(a) => Expr::Sin(simplified(a)),
            Expr::Cos(a) => Expr::Cos(simplified(a)),
            Expr::Tan(a) => Expr::Tan(simplified(a)),
            Expr::Asin(a) => Expr::Asin(simplified(a)),
            Expr::Acos(a) => Expr::Acos(simplified(a)),
            Expr::Atan(a) => Expr::Atan(simplified(a)),
            Expr::Abs(a) => Expr::Abs(simplified(a)),
            Expr::ToRadians(a) => Expr::ToRadians(simplified(a)),
            Expr::ToDegree(a) => Expr::ToDegree(simplified(a)),
            Expr::Clamp { min, max, value } => Expr::Clamp {
                min: simplified(min),
                max: simplified(max),
                value: simplified(value),
            },
            // never part of a finished tree; simplify the held arguments and
            // leave the carrier alone
            Expr::Args(list) => {
                return Expr::Args(list.into_iter().map(Expr::simplify).collect());
            }
        };

        if node.children().iter().all(|c| matches!(c, Expr::Num(_))) {
            Expr::Num(Literal::Float(node.compute_f64()))
        } else {
            node
        }
    }
}

fn simplified(node: Box<Expr>) -> Box<Expr> {
    Box::new(node.simplify())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn it_folds_constant_trees_to_a_single_literal() {
        let root = parse("2+3*4", true).root.unwrap();
        assert_eq!(root, Expr::Num(Literal::Float(14.0)));
    }

    #[test]
    fn it_folds_constant_subtrees_under_a_variable() {
        let root = parse("x*(2+3)", true).root.unwrap();
        match root {
            Expr::Mul(a, b) => {
                assert!(matches!(*a, Expr::Variable { .. }));
                assert_eq!(*b, Expr::Num(Literal::Float(5.0)));
            }
            other => panic!("expected a product, got {:?}", other),
        }
    }

    #[test]
    fn it_is_idempotent() {
        let once = parse("pow(2,3)+1", false).root.unwrap().simplify();
        let twice = once.clone().simplify();
        assert_eq!(once, twice);
        assert!((once.compute_f64() - 9.0).abs() < 1e-9);
    }

    #[test]
    fn it_never_folds_a_bound_variable() {
        let mut root = parse("x+1", true).root.unwrap();
        root.set_variable("x", 4.0);
        // still an addition: binding does not turn the leaf into a literal
        let folded = root.simplify();
        assert!(matches!(folded, Expr::Add(_, _)));
        assert!((folded.compute_f64() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn it_folds_function_nodes() {
        let root = parse("abs(0-3)*clamp(0,10,4)", true).root.unwrap();
        assert_eq!(root, Expr::Num(Literal::Float(12.0)));
    }
}
