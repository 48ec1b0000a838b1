//! Resolver mapping templates as a small expression tree.
//!
//! Statements (`#set`, `#if`, `#foreach`, `$util.qr`, `$util.toJson`) each
//! render on their own line at the current depth; values render inline.
//! Object literals always span multiple lines so the output is stable
//! regardless of how deeply they nest.

use std::{
    fmt::{self, Write},
    ops,
};

const INDENT: &str = "  ";

///
/// Expr
///

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// `$path`, e.g. `$ctx.args.limit`
    Ref(String),
    Str(String),
    Int(i64),
    Bool(bool),
    Null,
    List(Vec<Expr>),
    Obj(Vec<(String, Expr)>),

    /// `$target(arg, ...)`
    Call(String, Vec<Expr>),
    Not(Box<Expr>),

    Set(String, Box<Expr>),
    Qr(Box<Expr>),
    ToJson(Box<Expr>),
    If {
        cond: Box<Expr>,
        then: Box<Expr>,
        otherwise: Option<Box<Expr>>,
    },
    Foreach {
        item: String,
        list: Box<Expr>,
        body: Box<Expr>,
    },
    Compound(Vec<Expr>),

    /// Emitted as-is.
    Raw(String),
}

impl Expr {
    pub fn reference(path: impl Into<String>) -> Self {
        Self::Ref(path.into())
    }

    pub fn str(s: impl Into<String>) -> Self {
        Self::Str(s.into())
    }

    pub fn raw(s: impl Into<String>) -> Self {
        Self::Raw(s.into())
    }

    pub fn list(items: impl IntoIterator<Item = Self>) -> Self {
        Self::List(items.into_iter().collect())
    }

    pub fn obj<K: Into<String>>(entries: impl IntoIterator<Item = (K, Self)>) -> Self {
        Self::Obj(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn call(target: impl Into<String>, args: impl IntoIterator<Item = Self>) -> Self {
        Self::Call(target.into(), args.into_iter().collect())
    }

    pub fn set(name: impl Into<String>, value: Self) -> Self {
        Self::Set(name.into(), Box::new(value))
    }

    #[must_use]
    pub fn qr(expr: Self) -> Self {
        Self::Qr(Box::new(expr))
    }

    #[must_use]
    pub fn to_json(expr: Self) -> Self {
        Self::ToJson(Box::new(expr))
    }

    #[must_use]
    pub fn if_then(cond: Self, then: Self) -> Self {
        Self::If {
            cond: Box::new(cond),
            then: Box::new(then),
            otherwise: None,
        }
    }

    #[must_use]
    pub fn if_else(cond: Self, then: Self, otherwise: Self) -> Self {
        Self::If {
            cond: Box::new(cond),
            then: Box::new(then),
            otherwise: Some(Box::new(otherwise)),
        }
    }

    pub fn foreach(item: impl Into<String>, list: Self, body: Self) -> Self {
        Self::Foreach {
            item: item.into(),
            list: Box::new(list),
            body: Box::new(body),
        }
    }

    pub fn compound(exprs: impl IntoIterator<Item = Self>) -> Self {
        Self::Compound(exprs.into_iter().collect())
    }

    /// `$util.qr($target.put(key, value))`
    pub fn put(target: &str, key: impl Into<String>, value: Self) -> Self {
        Self::qr(Self::call(format!("{target}.put"), [Self::str(key), value]))
    }

    /// Render as template text with a trailing newline.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        // writing into a String cannot fail
        let _ = self.write_block(&mut out, 0);
        out
    }

    fn write_block(&self, out: &mut String, depth: usize) -> fmt::Result {
        let pad = INDENT.repeat(depth);

        match self {
            Self::Compound(exprs) => {
                for expr in exprs {
                    expr.write_block(out, depth)?;
                }
            }
            Self::Set(name, value) => {
                writeln!(out, "{pad}#set( ${name} = {} )", value.inline(depth))?;
            }
            Self::If {
                cond,
                then,
                otherwise,
            } => {
                writeln!(out, "{pad}#if( {} )", cond.inline(depth))?;
                then.write_block(out, depth + 1)?;
                if let Some(otherwise) = otherwise {
                    writeln!(out, "{pad}#else")?;
                    otherwise.write_block(out, depth + 1)?;
                }
                writeln!(out, "{pad}#end")?;
            }
            Self::Foreach { item, list, body } => {
                writeln!(out, "{pad}#foreach( ${item} in {} )", list.inline(depth))?;
                body.write_block(out, depth + 1)?;
                writeln!(out, "{pad}#end")?;
            }
            Self::Raw(text) => {
                for line in text.lines() {
                    writeln!(out, "{pad}{line}")?;
                }
            }
            other => writeln!(out, "{pad}{}", other.inline(depth))?,
        }

        Ok(())
    }

    fn inline(&self, depth: usize) -> String {
        match self {
            Self::Ref(path) => format!("${path}"),
            Self::Str(s) => format!("\"{}\"", s.replace('"', "\\\"")),
            Self::Int(n) => n.to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Null => "null".to_string(),
            Self::List(items) => {
                let items: Vec<String> = items.iter().map(|item| item.inline(depth)).collect();
                format!("[{}]", items.join(", "))
            }
            Self::Obj(entries) if entries.is_empty() => "{}".to_string(),
            Self::Obj(entries) => {
                let pad = INDENT.repeat(depth);
                let inner = INDENT.repeat(depth + 1);
                let entries: Vec<String> = entries
                    .iter()
                    .map(|(key, value)| format!("{inner}\"{key}\": {}", value.inline(depth + 1)))
                    .collect();

                format!("{{\n{}\n{pad}}}", entries.join(",\n"))
            }
            Self::Call(target, args) => {
                let args: Vec<String> = args.iter().map(|arg| arg.inline(depth)).collect();
                format!("${target}({})", args.join(", "))
            }
            Self::Not(expr) => format!("!{}", expr.inline(depth)),
            Self::Qr(expr) => format!("$util.qr({})", expr.inline(depth)),
            Self::ToJson(expr) => format!("$util.toJson({})", expr.inline(depth)),
            Self::Raw(text) => text.clone(),
            Self::Set(..) | Self::If { .. } | Self::Foreach { .. } | Self::Compound(_) => {
                self.render().trim_end().to_string()
            }
        }
    }
}

impl ops::Not for Expr {
    type Output = Self;

    fn not(self) -> Self {
        Self::Not(Box::new(self))
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
