//! The script emitter: declared functions, then top-level statements.

use simpleui_ast::{Document, Function, Statement};

use crate::error::GenError;
use crate::eval::{script_expression, TEXTBOX_VALUE_HELPER};
use crate::writer::Writer;

/// Reads an input's value, as a number when it parses as one.
fn textbox_helper() -> String {
    format!(
        "\
function {TEXTBOX_VALUE_HELPER}(id) {{
    const el = document.getElementById(id);
    if (!el) return \"\";
    const raw = el.value;
    const n = Number(raw);
    return raw.trim() !== \"\" && !Number.isNaN(n) ? n : raw;
}}"
    )
}

/// Render the document's script. The output depends on nothing but `doc`.
pub fn emit_script(doc: &Document) -> Result<String, GenError> {
    log::debug!(
        "script pass: {} function(s), {} statement(s)",
        doc.functions.len(),
        doc.statements.len()
    );
    let mut w = Writer::new();
    let mut uses_textbox = false;
    let mut first = true;

    for func in &doc.functions {
        if !first {
            w.blank();
        }
        first = false;
        function(func, &mut uses_textbox, &mut w)?;
    }

    if !doc.statements.is_empty() {
        if !first {
            w.blank();
        }
        first = false;
        for stmt in &doc.statements {
            w.line(&statement(stmt, &mut uses_textbox)?);
        }
    }

    if uses_textbox {
        if !first {
            w.blank();
        }
        w.line(&textbox_helper());
    }
    Ok(w.finish())
}

fn function(func: &Function, uses_textbox: &mut bool, w: &mut Writer) -> Result<(), GenError> {
    let open = format!("function {}({}) {{", func.name, func.params.join(", "));
    w.block(&open, "}", |w| {
        for stmt in &func.body {
            w.line(&statement(stmt, uses_textbox)?);
        }
        Ok(())
    })
}

fn statement(stmt: &Statement, uses_textbox: &mut bool) -> Result<String, GenError> {
    Ok(match stmt {
        Statement::Alert { value } => format!("alert({});", script_expression(value, uses_textbox)?.code),
        Statement::Const { name, value } => {
            format!("const {name} = {};", script_expression(value, uses_textbox)?.code)
        }
    })
}
