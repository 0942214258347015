extern crate mathexpr;

use std::env;

use mathexpr::parse;

const SHOWCASE: &str = "(pow(2,2)*cos(3.14*2)+3)*x";

fn main() {
    let mut expr = env::args().skip(1).collect::<Vec<_>>().join(" ");
    if expr.is_empty() {
        expr = SHOWCASE.to_string();
    }
    println!("Original expression: {}", expr);

    let parsed = parse(&expr, false);
    for diagnostic in &parsed.diagnostics {
        println!("Problem: {}", diagnostic);
    }

    let mut root = match parsed.root {
        Some(root) => root,
        None => {
            println!("Nothing to evaluate");
            return;
        }
    };
    root.set_variable("x", 10.0);

    println!("Parsed expression: {}", root);
    println!("Engine form: {}", root.to_engine_string());
    let variables = root.get_variables();
    if !variables.is_empty() {
        println!("Variables: {}", variables);
    }

    let simplified = root.clone().simplify();
    println!("Simplified expression: {}", simplified);

    println!("Expression result (f32): {}", root.compute_f32());
    println!("Expression result (f64): {}", root.compute_f64());
    println!("Expression result (int): {}", root.compute_int());
}
