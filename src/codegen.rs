use std::{
    fmt::{self, Write},
    format_args as f,
};

use crate::ast::{Definition, Expr};

const DEFAULT_CODE_CAPACITY: usize = 256;

/// Renders the definition in the target syntax.
pub fn generate(definition: &Definition) -> String {
    CodeGen::with_capacity(DEFAULT_CODE_CAPACITY).gen(definition)
}

pub struct CodeGen {
    code: String,
}

impl CodeGen {
    pub fn with_capacity(capacity: usize) -> CodeGen {
        CodeGen {
            code: String::with_capacity(capacity),
        }
    }

    pub fn gen(mut self, definition: &Definition) -> String {
        self.gen_definition(definition);
        self.code
    }

    fn gen_definition(&mut self, definition: &Definition) {
        let Definition {
            name,
            parameter_names,
            body,
        } = definition;
        self.emit(f!("function {name}("));
        self.gen_separated(parameter_names.as_slice(), |this, param| this.emit(f!("{param}")));
        self.emit(f!(") {{ return "));
        self.gen_expr(body);
        self.emit(f!(" }}"));
    }

    /// Walks `expr` with an explicit work stack, so nesting depth is not
    /// limited by the call stack.
    fn gen_expr(&mut self, expr: &Expr) {
        let mut pending = vec![Work::Expr(expr)];
        while let Some(work) = pending.pop() {
            match work {
                Work::Text(text) => self.emit(f!("{text}")),
                Work::Expr(Expr::Int(value)) => self.emit(f!("{value}")),
                Work::Expr(Expr::Var(name)) => self.emit(f!("{name}")),
                Work::Expr(Expr::Call { name, args }) => {
                    self.emit(f!("{name}("));
                    pending.push(Work::Text(")"));
                    for (i, arg) in args.iter().enumerate().rev() {
                        pending.push(Work::Expr(arg));
                        if i > 0 {
                            pending.push(Work::Text(","));
                        }
                    }
                }
            }
        }
    }

    /// Generates each item, with a `,` between them.
    fn gen_separated<T>(&mut self, items: &[T], mut gen_item: impl FnMut(&mut Self, &T)) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.emit(f!(","));
            }
            gen_item(self, item);
        }
    }
}

enum Work<'a> {
    Expr(&'a Expr),
    Text(&'static str),
}

// Utility functions.
impl CodeGen {
    fn emit(&mut self, f: fmt::Arguments<'_>) {
        self.code
            .write_fmt(f)
            .expect("code emit should be infallible");
    }
}
