use std::fmt;
use std::fmt::{Display, Formatter, Write};

use super::{Expr, Literal};

/// Writes `node` as an operand inside a larger template, parenthesizing it
/// when it is functional so the printed form re-parses with the same shape.
fn write_operand(f: &mut Formatter<'_>, node: &Expr) -> fmt::Result {
    if node.is_functional() {
        f.write_char('(')?;
        Display::fmt(node, f)?;
        f.write_char(')')
    } else {
        Display::fmt(node, f)
    }
}

fn write_infix(f: &mut Formatter<'_>, a: &Expr, op: &str, b: &Expr) -> fmt::Result {
    write_operand(f, a)?;
    write!(f, " {} ", op)?;
    write_operand(f, b)
}

fn write_call(f: &mut Formatter<'_>, name: &str, args: &[&Expr]) -> fmt::Result {
    f.write_str(name)?;
    f.write_char('(')?;
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write_operand(f, arg)?;
    }
    f.write_char(')')
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            // floating literals keep their decimal point so the width
            // survives a re-parse
            Expr::Num(Literal::Int(v)) => write!(f, "{}", v),
            Expr::Num(Literal::Float(v)) => write!(f, "{:?}", v),
            Expr::Variable { name, .. } => f.write_str(name),
            Expr::Negate(a) => {
                f.write_char('-')?;
                write_operand(f, a)
            }
            Expr::Add(a, b) => write_infix(f, a, "+", b),
            Expr::Sub(a, b) => write_infix(f, a, "-", b),
            Expr::Mul(a, b) => write_infix(f, a, "*", b),
            Expr::Div(a, b) => write_infix(f, a, "/", b),
            Expr::Pow(a, b) => write_infix(f, a, "^", b),
            // both the `%` operator and the mod function print in call form
            Expr::Mod(a, b) => write_call(f, "mod", &[a, b]),
            Expr::Sqrt(a, b) => write_call(f, "root", &[a, b]),
            Expr::Sin(a) => write_call(f, "sin", &[a]),
            Expr::Cos(a) => write_call(f, "cos", &[a]),
            Expr::Tan(a) => write_call(f, "tan", &[a]),
            Expr::Asin(a) => write_call(f, "asin", &[a]),
            Expr::Acos(a) => write_call(f, "acos", &[a]),
            Expr::Atan(a) => write_call(f, "atan", &[a]),
            Expr::Abs(a) => write_call(f, "abs", &[a]),
            Expr::ToRadians(a) => write_call(f, "toRadians", &[a]),
            Expr::ToDegree(a) => write_call(f, "toDegree", &[a]),
            Expr::Clamp { min, max, value } => write_call(f, "clamp", &[min, max, value]),
            Expr::Args(list) => {
                for (i, arg) in list.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    Display::fmt(arg, f)?;
                }
                Ok(())
            }
        }
    }
}

impl Expr {
    /// Markup rendering for display engines: a power becomes
    /// `base<sup>exponent</sup>`. Every other node renders exactly as
    /// [`Display`] does, including the children of the power itself.
    pub fn to_engine_string(&self) -> String {
        match self {
            Expr::Pow(a, b) => {
                let base = if a.is_functional() {
                    format!("({})", a)
                } else {
                    a.to_string()
                };
                format!("{}<sup>{}</sup>", base, b)
            }
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::parse;

    #[test]
    fn it_formats_expressions_in_a_reparseable_form() {
        const CASES: [&str; 8] = [
            "1+2",
            "1*3+5",
            "2^3^2",
            "3*-2",
            "10%3",
            "root(27, 3)",
            "clamp(0, 10, 15)",
            "sin(1)*abs(0-2)",
        ];
        for case in &CASES {
            let root = parse(case, false).root.unwrap();

            // format it and re-parse it to check that the value is unchanged
            let formatted = root.to_string();
            let reparsed = parse(&formatted, false);
            assert!(
                reparsed.diagnostics.is_empty(),
                "case {:?} rendered to {:?} which did not re-parse cleanly",
                case,
                formatted
            );
            let ground_truth = root.compute_f64();
            let roundtripped = reparsed.root.unwrap().compute_f64();
            assert!(
                (roundtripped - ground_truth).abs() < 0.001,
                "case {:?} rendered to {:?}: {} != {}",
                case,
                formatted,
                roundtripped,
                ground_truth
            );
        }
    }

    #[test]
    fn it_parenthesizes_functional_operands() {
        let root = parse("(1+2)*3", false).root.unwrap();
        assert_eq!(root.to_string(), "(1 + 2) * 3");

        let root = parse("-(1+2)", false).root.unwrap();
        assert_eq!(root.to_string(), "-(1 + 2)");
    }

    #[test]
    fn it_keeps_the_literal_width_in_the_output() {
        let root = parse("2*3.5", false).root.unwrap();
        assert_eq!(root.to_string(), "2 * 3.5");

        // folded constants become floating literals
        let folded = parse("2*2", true).root.unwrap();
        assert_eq!(folded.to_string(), "4.0");
    }

    #[test]
    fn it_renders_powers_as_markup_in_engine_strings() {
        let root = parse("2^3", false).root.unwrap();
        assert_eq!(root.to_engine_string(), "2<sup>3</sup>");

        let root = parse("(1+2)^x", false).root.unwrap();
        assert_eq!(root.to_engine_string(), "(1 + 2)<sup>x</sup>");

        // only the power itself switches form
        let root = parse("1+2", false).root.unwrap();
        assert_eq!(root.to_engine_string(), "1 + 2");
    }
}
