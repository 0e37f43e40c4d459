//! Expression evaluation.
//!
//! Markup has no notion of computation, so markup expressions are folded
//! to a literal [`Value`] at generation time. Script expressions are
//! rendered as JavaScript source instead and computed by the browser.

use simpleui_ast::{BinaryOp, Expression, ParamType};

use crate::error::{GenError, Warning};
use crate::scope::ArgStack;
use crate::value::{format_number, Value};

/// Name of the helper the script emitter defines when a textbox value is
/// read.
pub const TEXTBOX_VALUE_HELPER: &str = "__simpleuiTextboxValue";

// ── Markup context ────────────────────────────────────────────────────────

/// Evaluate `expr` for markup output.
///
/// Symbols resolve against the innermost argument frame. An unresolved
/// symbol evaluates to an empty string and is recorded in `warnings`.
pub fn evaluate(
    expr: &Expression,
    scope: &ArgStack,
    warnings: &mut Vec<Warning>,
) -> Result<Value, GenError> {
    match expr {
        Expression::StringLiteral { value } => Ok(Value::Str(value.clone())),
        Expression::NumberLiteral { value } => Ok(Value::Number(*value)),
        Expression::SymbolReference { symbol } => match scope.lookup(symbol) {
            Some(value) => Ok(value.clone()),
            None => {
                log::warn!("unresolved symbol `{symbol}` rendered as an empty string");
                warnings.push(Warning::UnresolvedSymbol { symbol: symbol.clone() });
                Ok(Value::empty())
            }
        },
        Expression::TextboxValue { .. } => Err(GenError::UnhandledExpressionKind {
            kind: "TextboxValue",
            context: "markup",
        }),
        Expression::BinaryOperation { left, op, right } => {
            let l = evaluate(left, scope, warnings)?;
            let r = evaluate(right, scope, warnings)?;
            apply(*op, l, r)
        }
    }
}

/// Apply `op` to two evaluated operands.
///
/// | op | number, number | string involved |
/// |----|----------------|-----------------|
/// | `+` | sum | concatenation |
/// | `-` `*` `/` | arithmetic | `InvalidOperation` |
pub fn apply(op: BinaryOp, left: Value, right: Value) -> Result<Value, GenError> {
    match (op, left, right) {
        (BinaryOp::Add, Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
        (BinaryOp::Add, a, b) => Ok(Value::Str(format!("{a}{b}"))),
        (BinaryOp::Sub, Value::Number(a), Value::Number(b)) => Ok(Value::Number(a - b)),
        (BinaryOp::Mul, Value::Number(a), Value::Number(b)) => Ok(Value::Number(a * b)),
        (BinaryOp::Div, Value::Number(a), Value::Number(b)) => Ok(Value::Number(a / b)),
        (op, a, b) => Err(GenError::InvalidOperation {
            op: op.symbol(),
            left: a.type_name(),
            right: b.type_name(),
        }),
    }
}

// ── Script context ────────────────────────────────────────────────────────

/// JavaScript source for an expression, with its type when known
/// statically.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptExpr {
    pub code: String,
    pub ty: Option<ParamType>,
    /// Whether `code` is a binary operation that needs parentheses when
    /// nested.
    compound: bool,
}

impl ScriptExpr {
    fn atom(code: String, ty: Option<ParamType>) -> Self {
        Self { code, ty, compound: false }
    }

    fn nested(&self) -> String {
        if self.compound { format!("({})", self.code) } else { self.code.clone() }
    }
}

/// Render `expr` as JavaScript.
///
/// Symbols are emitted as identifiers (function parameters and constants
/// exist at run time). `uses_textbox` is set when the output calls
/// [`TEXTBOX_VALUE_HELPER`].
pub fn script_expression(expr: &Expression, uses_textbox: &mut bool) -> Result<ScriptExpr, GenError> {
    match expr {
        Expression::StringLiteral { value } => {
            Ok(ScriptExpr::atom(Value::Str(value.clone()).to_js_literal(), Some(ParamType::String)))
        }
        Expression::NumberLiteral { value } => {
            Ok(ScriptExpr::atom(format_number(*value), Some(ParamType::Number)))
        }
        Expression::SymbolReference { symbol } => Ok(ScriptExpr::atom(symbol.clone(), None)),
        Expression::TextboxValue { textbox } => {
            *uses_textbox = true;
            let arg = Value::Str(textbox.clone()).to_js_literal();
            Ok(ScriptExpr::atom(format!("{TEXTBOX_VALUE_HELPER}({arg})"), None))
        }
        Expression::BinaryOperation { left, op, right } => {
            let l = script_expression(left, uses_textbox)?;
            let r = script_expression(right, uses_textbox)?;
            let ty = match op {
                BinaryOp::Add => match (l.ty, r.ty) {
                    (Some(ParamType::String), _) | (_, Some(ParamType::String)) => {
                        Some(ParamType::String)
                    }
                    (Some(ParamType::Number), Some(ParamType::Number)) => Some(ParamType::Number),
                    _ => None,
                },
                BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div => {
                    if l.ty == Some(ParamType::String) || r.ty == Some(ParamType::String) {
                        return Err(GenError::InvalidOperation {
                            op: op.symbol(),
                            left: type_label(l.ty),
                            right: type_label(r.ty),
                        });
                    }
                    Some(ParamType::Number)
                }
            };
            Ok(ScriptExpr {
                code: format!("{} {} {}", l.nested(), op.symbol(), r.nested()),
                ty,
                compound: true,
            })
        }
    }
}

fn type_label(ty: Option<ParamType>) -> &'static str {
    ty.map(ParamType::name).unwrap_or("unknown")
}
