use std::io::Write;

use crate::ast::{Definition, Expr};

const INDENT_WIDTH: usize = 2;

pub fn print_definition_string(definition: &Definition) -> String {
    let mut buf = Vec::with_capacity(512);
    print_definition(&mut buf, definition).unwrap();
    String::from_utf8(buf).unwrap()
}

pub fn print_expr_string(expr: &Expr) -> String {
    let mut buf = Vec::with_capacity(256);
    print_expr(&mut buf, 0, expr).unwrap();
    String::from_utf8(buf).unwrap()
}

pub fn print_definition(w: &mut impl Write, definition: &Definition) -> std::io::Result<()> {
    write!(w, "definition {}(", definition.name)?;
    for (idx, param) in definition.parameter_names.iter().enumerate() {
        if idx > 0 {
            write!(w, ", ")?;
        }
        write!(w, "{param}")?;
    }
    writeln!(w, ")")?;
    print_expr(w, 1, &definition.body)
}

pub fn print_expr(w: &mut impl Write, i: usize, expr: &Expr) -> std::io::Result<()> {
    let mut pending = vec![(i, expr)];
    while let Some((i, expr)) = pending.pop() {
        sp(w, i)?;
        match expr {
            Expr::Int(value) => writeln!(w, "int {value}")?,
            Expr::Var(name) => writeln!(w, "var {name}")?,
            Expr::Call { name, args } => {
                writeln!(w, "call {name}")?;
                pending.extend(args.iter().rev().map(|arg| (i + 1, arg)));
            }
        }
    }
    Ok(())
}

fn sp(w: &mut impl Write, i: usize) -> std::io::Result<()> {
    write!(w, "{:width$}", "", width = i * INDENT_WIDTH)
}
