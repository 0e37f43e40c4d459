//! Component argument frames.
//!
//! Each component instantiation pushes one [`Frame`] binding its parameters
//! to the evaluated call-site arguments. Symbol lookup only consults the
//! innermost frame: a nested component call cannot see the parameters of
//! the component that instantiated it.

use std::ops::{Deref, DerefMut};

use simpleui_ast::{Component, Expression, ParamType};

use crate::error::{GenError, Warning};
use crate::eval::evaluate;
use crate::value::Value;

// ── Frame ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub name: String,
    pub ty: ParamType,
    pub value: Value,
}

/// Parameter bindings of one component instantiation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    bindings: Vec<Binding>,
}

impl Frame {
    pub fn new(bindings: Vec<Binding>) -> Self {
        Self { bindings }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.iter().find(|b| b.name == name).map(|b| &b.value)
    }
}

// ── ArgStack ──────────────────────────────────────────────────────────────

/// Stack of argument frames, innermost last.
#[derive(Debug, Default)]
pub struct ArgStack {
    frames: Vec<Frame>,
}

impl ArgStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of component instantiations currently being rendered.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn top(&self) -> Option<&Frame> {
        self.frames.last()
    }

    /// Resolve `name` against the innermost frame only.
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.top()?.get(name)
    }

    /// Push `frame` for the lifetime of the returned guard. The frame is
    /// popped when the guard drops, including on early `?` returns and
    /// unwinding.
    pub fn enter(&mut self, frame: Frame) -> FrameGuard<'_> {
        self.frames.push(frame);
        FrameGuard { stack: self }
    }
}

/// Scoped access to an [`ArgStack`] with one extra frame pushed.
pub struct FrameGuard<'s> {
    stack: &'s mut ArgStack,
}

impl Deref for FrameGuard<'_> {
    type Target = ArgStack;

    fn deref(&self) -> &ArgStack {
        self.stack
    }
}

impl DerefMut for FrameGuard<'_> {
    fn deref_mut(&mut self) -> &mut ArgStack {
        self.stack
    }
}

impl Drop for FrameGuard<'_> {
    fn drop(&mut self) {
        self.stack.frames.pop();
    }
}

// ── Binding ───────────────────────────────────────────────────────────────

/// Pair the component's parameters positionally with the call-site
/// arguments, evaluated in the caller's scope.
///
/// Validation normally rejects mismatched calls before generation; this
/// re-checks count and runtime type so a bypassed validation fails instead
/// of silently coercing.
pub fn bind_arguments(
    component: &Component,
    args: &[Expression],
    caller: &ArgStack,
    warnings: &mut Vec<Warning>,
) -> Result<Frame, GenError> {
    if component.params.len() != args.len() {
        return Err(GenError::ParameterBindingError {
            component: component.name.clone(),
            reason: format!(
                "expected {} argument(s), got {}",
                component.params.len(),
                args.len()
            ),
        });
    }

    let mut bindings = Vec::with_capacity(args.len());
    for (param, arg) in component.params.iter().zip(args) {
        let value = evaluate(arg, caller, warnings)?;
        if value.param_type() != param.ty {
            return Err(GenError::ParameterBindingError {
                component: component.name.clone(),
                reason: format!(
                    "parameter `{}` expects a {}, got a {}",
                    param.name,
                    param.ty.name(),
                    value.type_name()
                ),
            });
        }
        bindings.push(Binding { name: param.name.clone(), ty: param.ty, value });
    }
    Ok(Frame::new(bindings))
}
