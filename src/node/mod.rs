mod display;
mod eval;
mod simplify;

use std::fmt::Write;

/// A numeric literal together with the width it was written in. A literal
/// without a decimal point is an integer, one with a decimal point is
/// floating. The distinction only affects how the literal is displayed;
/// evaluation width is chosen by the caller (see [`Expr::compute_f64`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
}

impl Literal {
    pub fn as_f32(self) -> f32 {
        match self {
            Literal::Int(v) => v as f32,
            Literal::Float(v) => v as f32,
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Literal::Int(v) => v as f64,
            Literal::Float(v) => v as f64,
        }
    }

    pub fn as_int(self) -> i64 {
        match self {
            Literal::Int(v) => v,
            Literal::Float(v) => v as i64,
        }
    }
}

/// A node in the expression tree.
///
/// The set of variants is closed: an expression is a literal, a variable
/// leaf, or one of the operator/function combinations below. A parsed tree
/// never contains [`Expr::Args`]; that variant only exists while the parser
/// carries a resolved argument list towards its function.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Num(Literal),
    /// A named leaf with a mutable bound value, 0 until bound.
    Variable { name: String, value: f64 },
    Negate(Box<Expr>),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Mod(Box<Expr>, Box<Expr>),
    Pow(Box<Expr>, Box<Expr>),
    /// `root(a, b)`, computed as `a^(1/b)`.
    Sqrt(Box<Expr>, Box<Expr>),
    Sin(Box<Expr>),
    Cos(Box<Expr>),
    Tan(Box<Expr>),
    Asin(Box<Expr>),
    Acos(Box<Expr>),
    Atan(Box<Expr>),
    Abs(Box<Expr>),
    ToRadians(Box<Expr>),
    ToDegree(Box<Expr>),
    /// `clamp(min, max, value)`, bounding `value` into `[min, max]`.
    Clamp {
        min: Box<Expr>,
        max: Box<Expr>,
        value: Box<Expr>,
    },
    /// Transient carrier for a comma-separated argument list.
    Args(Vec<Expr>),
}

impl Expr {
    /// True for every node that is not a bare number or variable. Functional
    /// operands are parenthesized when rendered inside another template so
    /// the printed form re-parses with the same structure.
    pub fn is_functional(&self) -> bool {
        !matches!(self, Expr::Num(_) | Expr::Variable { .. })
    }

    /// Rebinds every variable leaf called `name` in this tree. Same-named
    /// leaves are independent occurrences and are all updated.
    pub fn set_variable(&mut self, name: &str, value: f64) {
        match self {
            Expr::Num(_) => {}
            Expr::Variable { name: n, value: v } => {
                if n == name {
                    *v = value;
                }
            }
            _ => {
                for child in self.children_mut() {
                    child.set_variable(name, value);
                }
            }
        }
    }

    /// Returns a debug listing of every variable leaf in traversal order as
    /// `"name = value, "` entries. Occurrences are not deduplicated.
    pub fn get_variables(&self) -> String {
        let mut out = String::new();
        self.collect_variables(&mut out);
        out
    }

    fn collect_variables(&self, out: &mut String) {
        match self {
            Expr::Num(_) => {}
            Expr::Variable { name, value } => {
                let _ = write!(out, "{} = {}, ", name, value);
            }
            _ => {
                for child in self.children() {
                    child.collect_variables(out);
                }
            }
        }
    }

    pub(crate) fn children(&self) -> Vec<&Expr> {
        match self {
            Expr::Num(_) | Expr::Variable { .. } => Vec::new(),
            Expr::Negate(a)
            | Expr::Sin(a)
            | Expr::Cos(a)
            | Expr::Tan(a)
            | Expr::Asin(a)
            | Expr::Acos(a)
            | Expr::Atan(a)
            | Expr::Abs(a)
            | Expr::ToRadians(a)
            | Expr::ToDegree(a) => vec![a.as_ref()],
            Expr::Add(a, b)
            | Expr::Sub(a, b)
            | Expr::Mul(a, b)
            | Expr::Div(a, b)
            | Expr::Mod(a, b)
            | Expr::Pow(a, b)
            | Expr::Sqrt(a, b) => vec![a.as_ref(), b.as_ref()],
            Expr::Clamp { min, max, value } => vec![min.as_ref(), max.as_ref(), value.as_ref()],
            Expr::Args(list) => list.iter().collect(),
        }
    }

    fn children_mut(&mut self) -> Vec<&mut Expr> {
        match self {
            Expr::Num(_) | Expr::Variable { .. } => Vec::new(),
            Expr::Negate(a)
            | Expr::Sin(a)
            | Expr::Cos(a)
            | Expr::Tan(a)
            | Expr::Asin(a)
            | Expr::Acos(a)
            | Expr::Atan(a)
            | Expr::Abs(a)
            | Expr::ToRadians(a)
            | Expr::ToDegree(a) => vec![a.as_mut()],
            Expr::Add(a, b)
            | Expr::Sub(a, b)
            | Expr::Mul(a, b)
            | Expr::Div(a, b)
            | Expr::Mod(a, b)
            | Expr::Pow(a, b)
            | Expr::Sqrt(a, b) => vec![a.as_mut(), b.as_mut()],
            Expr::Clamp { min, max, value } => vec![min.as_mut(), max.as_mut(), value.as_mut()],
            Expr::Args(list) => list.iter_mut().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str) -> Expr {
        Expr::Variable {
            name: name.to_string(),
            value: 0.0,
        }
    }

    #[test]
    fn it_broadcasts_variable_bindings_to_every_occurrence() {
        // x + x * 2
        let mut expr = Expr::Add(
            Box::new(var("x")),
            Box::new(Expr::Mul(
                Box::new(var("x")),
                Box::new(Expr::Num(Literal::Int(2))),
            )),
        );
        expr.set_variable("x", 5.0);
        assert_eq!(expr.get_variables(), "x = 5, x = 5, ");
        assert!((expr.compute_f64() - 15.0).abs() < 1e-9);
    }

    #[test]
    fn it_leaves_other_variables_untouched() {
        let mut expr = Expr::Sub(Box::new(var("a")), Box::new(var("b")));
        expr.set_variable("a", 3.0);
        assert_eq!(expr.get_variables(), "a = 3, b = 0, ");
    }

    #[test]
    fn it_tags_only_leaves_as_atomic() {
        assert!(!Expr::Num(Literal::Int(1)).is_functional());
        assert!(!var("x").is_functional());
        assert!(Expr::Negate(Box::new(var("x"))).is_functional());
        assert!(Expr::Sin(Box::new(var("x"))).is_functional());
    }
}
