use super::Expr;

/// Width-specific evaluation.
///
/// The three entry points are not one computation narrowed at the end: each
/// one walks the whole subtree again at its own width, so intermediate
/// rounding and truncation differ per node. A power feeding an integer
/// division, for example, is truncated once by the power and once more by
/// the division.
///
/// The trigonometric functions are the exception to the width rule: their
/// operand is always evaluated at f64 width and only the final result is
/// narrowed.
impl Expr {
    pub fn compute_f32(&self) -> f32 {
        match self {
            Expr::Num(lit) => lit.as_f32(),
            Expr::Variable { value, .. } => *value as f32,
            Expr::Negate(a) => -a.compute_f32(),
            Expr::Add(a, b) => a.compute_f32() + b.compute_f32(),
            Expr::Sub(a, b) => a.compute_f32() - b.compute_f32(),
            Expr::Mul(a, b) => a.compute_f32() * b.compute_f32(),
            Expr::Div(a, b) => a.compute_f32() / b.compute_f32(),
            Expr::Mod(a, b) => a.compute_f32() % b.compute_f32(),
            Expr::Pow(a, b) => (a.compute_f32() as f64).powf(b.compute_f32() as f64) as f32,
            Expr::Sqrt(a, b) => (a.compute_f32() as f64).powf(1.0 / b.compute_f32() as f64) as f32,
            Expr::Sin(a) => a.compute_f64().sin() as f32,
            Expr::Cos(a) => a.compute_f64().cos() as f32,
            Expr::Tan(a) => a.compute_f64().tan() as f32,
            Expr::Asin(a) => a.compute_f64().asin() as f32,
            Expr::Acos(a) => a.compute_f64().acos() as f32,
            Expr::Atan(a) => a.compute_f64().atan() as f32,
            Expr::Abs(a) => a.compute_f32().abs(),
            Expr::ToRadians(a) => (a.compute_f32() as f64).to_radians() as f32,
            Expr::ToDegree(a) => (a.compute_f32() as f64).to_degrees() as f32,
            Expr::Clamp { min, max, value } => {
                min.compute_f32().max(max.compute_f32().min(value.compute_f32()))
            }
            Expr::Args(_) => 0.0,
        }
    }

    pub fn compute_f64(&self) -> f64 {
        match self {
            Expr::Num(lit) => lit.as_f64(),
            Expr::Variable { value, .. } => *value,
            Expr::Negate(a) => -a.compute_f64(),
            Expr::Add(a, b) => a.compute_f64() + b.compute_f64(),
            Expr::Sub(a, b) => a.compute_f64() - b.compute_f64(),
            Expr::Mul(a, b) => a.compute_f64() * b.compute_f64(),
            Expr::Div(a, b) => a.compute_f64() / b.compute_f64(),
            Expr::Mod(a, b) => a.compute_f64() % b.compute_f64(),
            Expr::Pow(a, b) => a.compute_f64().powf(b.compute_f64()),
            Expr::Sqrt(a, b) => a.compute_f64().powf(1.0 / b.compute_f64()),
            Expr::Sin(a) => a.compute_f64().sin(),
            Expr::Cos(a) => a.compute_f64().cos(),
            Expr::Tan(a) => a.compute_f64().tan(),
            Expr::Asin(a) => a.compute_f64().asin(),
            Expr::Acos(a) => a.compute_f64().acos(),
            Expr::Atan(a) => a.compute_f64().atan(),
            Expr::Abs(a) => a.compute_f64().abs(),
            Expr::ToRadians(a) => a.compute_f64().to_radians(),
            Expr::ToDegree(a) => a.compute_f64().to_degrees(),
            Expr::Clamp { min, max, value } => {
                min.compute_f64().max(max.compute_f64().min(value.compute_f64()))
            }
            Expr::Args(_) => 0.0,
        }
    }

    /// Integer evaluation. Narrowing from float truncates toward zero and
    /// saturates at the i64 range; division and modulo by zero yield 0 so
    /// that evaluation stays total at this width too.
    pub fn compute_int(&self) -> i64 {
        match self {
            Expr::Num(lit) => lit.as_int(),
            Expr::Variable { value, .. } => *value as i64,
            Expr::Negate(a) => a.compute_int().wrapping_neg(),
            Expr::Add(a, b) => a.compute_int().wrapping_add(b.compute_int()),
            Expr::Sub(a, b) => a.compute_int().wrapping_sub(b.compute_int()),
            Expr::Mul(a, b) => a.compute_int().wrapping_mul(b.compute_int()),
            Expr::Div(a, b) => {
                let divisor = b.compute_int();
                if divisor == 0 {
                    0
                } else {
                    a.compute_int().wrapping_div(divisor)
                }
            }
            Expr::Mod(a, b) => {
                let divisor = b.compute_int();
                if divisor == 0 {
                    0
                } else {
                    a.compute_int().wrapping_rem(divisor)
                }
            }
            Expr::Pow(a, b) => (a.compute_int() as f64).powf(b.compute_int() as f64) as i64,
            Expr::Sqrt(a, b) => {
                (a.compute_int() as f64).powf(1.0 / b.compute_int() as f64) as i64
            }
            Expr::Sin(a) => a.compute_f64().sin() as i64,
            Expr::Cos(a) => a.compute_f64().cos() as i64,
            Expr::Tan(a) => a.compute_f64().tan() as i64,
            Expr::Asin(a) => a.compute_f64().asin() as i64,
            Expr::Acos(a) => a.compute_f64().acos() as i64,
            Expr::Atan(a) => a.compute_f64().atan() as i64,
            Expr::Abs(a) => a.compute_int().wrapping_abs(),
            Expr::ToRadians(a) => (a.compute_int() as f64).to_radians() as i64,
            Expr::ToDegree(a) => (a.compute_int() as f64).to_degrees() as i64,
            Expr::Clamp { min, max, value } => {
                min.compute_int().max(max.compute_int().min(value.compute_int()))
            }
            Expr::Args(_) => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::parse;

    fn eval_f64(expr: &str) -> f64 {
        parse(expr, false).root.unwrap().compute_f64()
    }

    #[test]
    fn it_computes_basic_arithmetic() {
        assert!((eval_f64("1+2*3") - 7.0).abs() < 1e-9);
        assert!((eval_f64("10/4") - 2.5).abs() < 1e-9);
        assert!((eval_f64("10%3") - 1.0).abs() < 1e-9);
    }

    #[test]
    fn it_computes_the_nth_root_as_an_inverse_power() {
        assert!((eval_f64("root(27, 3)") - 3.0).abs() < 1e-9);
        // a negative base with a non-integer exponent is NaN, as for powf
        assert!(eval_f64("root(0-8, 3)").is_nan());
    }

    #[test]
    fn it_clamps_at_the_requested_width() {
        assert!((eval_f64("clamp(0, 10, 15)") - 10.0).abs() < 1e-9);
        assert!((eval_f64("clamp(0, 10, -5)") - 0.0).abs() < 1e-9);
        assert!((eval_f64("clamp(0, 10, 7)") - 7.0).abs() < 1e-9);
    }

    #[test]
    fn it_treats_mod_function_and_operator_alike() {
        assert!((eval_f64("mod(10, 3)") - eval_f64("10 % 3")).abs() < 1e-9);
    }

    #[test]
    fn it_truncates_intermediates_under_integer_width() {
        // 8 / 3: the integer walk truncates to 2 while the double walk keeps
        // the fraction
        let parsed = parse("pow(2,3)/3", false);
        let root = parsed.root.unwrap();
        assert_eq!(root.compute_int(), 2);
        assert!((root.compute_f64() - 8.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn it_keeps_integer_division_total() {
        let root = parse("7/0", false).root.unwrap();
        assert_eq!(root.compute_int(), 0);
        assert!(root.compute_f64().is_infinite());
    }

    #[test]
    fn it_evaluates_trig_operands_at_double_width() {
        // the operand is evaluated as f64 even under compute_int, so the
        // narrowed result is the truncated cosine, not cos(6) of a truncated
        // operand
        let root = parse("cos(3.14*2)", false).root.unwrap();
        assert_eq!(root.compute_int(), 0);
        assert!((root.compute_f64() - (3.14f64 * 2.0).cos()).abs() < 1e-12);
    }

    #[test]
    fn it_converts_between_degrees_and_radians() {
        assert!((eval_f64("toRadians(180)") - std::f64::consts::PI).abs() < 1e-9);
        assert!((eval_f64("toDegree(3.141592653589793)") - 180.0).abs() < 1e-9);
    }
}
