// definition ::= def ID '(' [ID (',' ID)*] ')' expr end
// expr ::= integer
//        | ID '(' [expr (',' expr)*] ')'
//        | ID

/// The root of every program.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Definition {
    pub name: Box<str>,
    /// Duplicates are accepted as written.
    pub parameter_names: Vec<Box<str>>,
    pub body: Expr,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expr {
    Int(i64),
    Var(Box<str>),
    Call {
        name: Box<str>,
        args: Vec<Expr>,
    },
}

/// Unnests calls onto a heap stack before dropping them, so deep trees
/// don't overflow the call stack.
impl Drop for Expr {
    fn drop(&mut self) {
        let Expr::Call { args, .. } = self else {
            return;
        };
        let mut pending = std::mem::take(args);
        while let Some(mut expr) = pending.pop() {
            if let Expr::Call { args, .. } = &mut expr {
                pending.append(args);
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod test_utils {
    use super::*;

    pub fn var(name: &str) -> Expr {
        Expr::Var(name.into())
    }

    pub fn call(name: &str, args: impl IntoIterator<Item = Expr>) -> Expr {
        Expr::Call {
            name: name.into(),
            args: args.into_iter().collect(),
        }
    }

    pub fn def(name: &str, parameter_names: &[&str], body: Expr) -> Definition {
        Definition {
            name: name.into(),
            parameter_names: parameter_names.iter().map(|&p| p.into()).collect(),
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_utils::call;
    use super::*;

    #[test]
    fn test_drop_deeply_nested_expr() {
        let mut expr = Expr::Int(1);
        for _ in 0..200_000 {
            expr = call("g", [expr, Expr::Var("x".into())]);
        }
        drop(expr);
    }
}
