use std::fmt;

use simpleui_ast::ParamType;

use crate::escape::js_string_literal;

/// A generation-time value: what an expression evaluates to in markup.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Number(f64),
}

impl Value {
    pub fn empty() -> Self {
        Value::Str(String::new())
    }

    pub fn param_type(&self) -> ParamType {
        match self {
            Value::Str(_) => ParamType::String,
            Value::Number(_) => ParamType::Number,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.param_type().name()
    }

    /// The value as a JavaScript literal: quoted strings, bare numbers.
    pub fn to_js_literal(&self) -> String {
        match self {
            Value::Str(s) => js_string_literal(s),
            Value::Number(n) => format_number(*n),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            Value::Number(n) => f.write_str(&format_number(*n)),
        }
    }
}

/// Render a number the way a browser would print it: integral values
/// without a fractional part, non-finite values by name, and exponent
/// form outside `1e-6 <= |n| < 1e21`.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        // -0 prints as 0
        return "0".to_string();
    }
    let magnitude = n.abs();
    if magnitude >= 1e21 || magnitude < 1e-6 {
        return exponent_form(n);
    }
    if n.fract() == 0.0 && magnitude < 1e15 {
        return format!("{}", n as i64);
    }
    format!("{n}")
}

/// `1.5e+21` / `1e-7`: shortest mantissa, explicitly signed exponent.
fn exponent_form(n: f64) -> String {
    let sci = format!("{n:e}");
    match sci.split_once('e') {
        Some((mantissa, exp)) if exp.starts_with('-') => format!("{mantissa}e{exp}"),
        Some((mantissa, exp)) => format!("{mantissa}e+{exp}"),
        None => sci,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_numbers_drop_fraction() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(-42.0), "-42");
        assert_eq!(format_number(-0.0), "0");
    }

    #[test]
    fn fractional_numbers() {
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(0.1 + 0.2), "0.30000000000000004");
    }

    #[test]
    fn huge_numbers_use_exponent_form() {
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(-2.5e22), "-2.5e+22");
        assert_eq!(format_number(1e20), "100000000000000000000");
    }

    #[test]
    fn tiny_numbers_use_exponent_form() {
        assert_eq!(format_number(1e-7), "1e-7");
        assert_eq!(format_number(1.5e-7), "1.5e-7");
        assert_eq!(format_number(0.000001), "0.000001");
    }

    #[test]
    fn non_finite_numbers() {
        assert_eq!(format_number(f64::INFINITY), "Infinity");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(format_number(f64::NAN), "NaN");
    }

    #[test]
    fn js_literals() {
        assert_eq!(Value::Str("World".into()).to_js_literal(), "\"World\"");
        assert_eq!(Value::Number(2.5).to_js_literal(), "2.5");
    }
}
