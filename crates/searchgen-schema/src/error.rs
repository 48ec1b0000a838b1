use serde::Serialize;
use std::{collections::BTreeMap, fmt};

///
/// err
/// format a message straight into an ErrorTree
///

#[macro_export]
macro_rules! err {
    ($errs:expr, $($arg:tt)*) => {{
        $errs.add(format!($($arg)*));
    }};
}

///
/// ErrorTree
///
/// Route-aware error aggregation. Messages hang off the node that produced
/// them, so a report over the whole schema reads `Post.title: ...`.
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct ErrorTree {
    pub messages: Vec<String>,
    pub children: BTreeMap<String, ErrorTree>,
}

impl ErrorTree {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            messages: Vec::new(),
            children: BTreeMap::new(),
        }
    }

    pub fn add(&mut self, message: impl ToString) {
        self.messages.push(message.to_string());
    }

    pub fn add_for(&mut self, route: impl Into<String>, message: impl ToString) {
        self.children
            .entry(route.into())
            .or_default()
            .add(message);
    }

    /// Merge a child tree under `route`, dropping it if it holds nothing.
    pub fn merge_for(&mut self, route: impl Into<String>, tree: Self) {
        if tree.is_empty() {
            return;
        }

        let entry = self.children.entry(route.into()).or_default();
        entry.messages.extend(tree.messages);
        for (child_route, child) in tree.children {
            entry.merge_for(child_route, child);
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty() && self.children.values().all(Self::is_empty)
    }

    /// Flatten into `(route, message)` pairs in deterministic order.
    #[must_use]
    pub fn flatten(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        self.flatten_into("", &mut out);
        out
    }

    fn flatten_into(&self, prefix: &str, out: &mut Vec<(String, String)>) {
        for message in &self.messages {
            out.push((prefix.to_string(), message.clone()));
        }
        for (route, child) in &self.children {
            let path = if prefix.is_empty() {
                route.clone()
            } else {
                format!("{prefix}.{route}")
            };
            child.flatten_into(&path, out);
        }
    }

    pub fn result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ErrorTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines = self
            .flatten()
            .into_iter()
            .map(|(route, message)| {
                if route.is_empty() {
                    message
                } else {
                    format!("{route}: {message}")
                }
            })
            .collect::<Vec<_>>();

        write!(f, "{}", lines.join("; "))
    }
}

impl std::error::Error for ErrorTree {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_tree_is_ok() {
        assert!(ErrorTree::new().result().is_ok());

        let mut tree = ErrorTree::new();
        tree.merge_for("Post", ErrorTree::new());
        assert!(tree.is_empty());
    }

    #[test]
    fn routes_flatten_in_order() {
        let mut field = ErrorTree::new();
        err!(field, "unknown type '{}'", "Missing");

        let mut tree = ErrorTree::new();
        tree.add("schema level");
        tree.merge_for("Post", field);
        tree.add_for("Comment", "duplicate field 'id'");

        assert_eq!(
            tree.flatten(),
            vec![
                (String::new(), "schema level".to_string()),
                ("Comment".to_string(), "duplicate field 'id'".to_string()),
                ("Post".to_string(), "unknown type 'Missing'".to_string()),
            ]
        );
        assert_eq!(
            tree.to_string(),
            "schema level; Comment: duplicate field 'id'; Post: unknown type 'Missing'"
        );
    }
}
