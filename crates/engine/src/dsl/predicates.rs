use std::path::{MAIN_SEPARATOR, Path, is_separator};

use filetab_fs::{PathPattern, pattern::ANY_RUN};

use crate::dsl::ast::{CmpOp, Column, Constraint, Predicate};

#[derive(Debug, Clone)]
enum Node {
    And(Vec<Node>),
    Or(Vec<Node>),
    Not(Box<Node>),
    Leaf(PathPattern),
}

/// A predicate whose constraints are anchored at a working directory and
/// compiled into path patterns.
#[derive(Debug, Clone)]
pub struct CompiledPredicate {
    root: Node,
    scan: Vec<PathPattern>,
}

impl CompiledPredicate {
    pub fn new(pred: &Predicate, cwd: &Path, case_insensitive: bool) -> Self {
        let mut scan = Vec::new();
        let root = compile(pred, cwd, case_insensitive, true, &mut scan);
        Self { root, scan }
    }

    /// Patterns to expand: one per constraint not under a `NOT`.
    pub fn scan_patterns(&self) -> &[PathPattern] {
        &self.scan
    }

    /// Evaluate the full boolean expression against an absolute, normalized path.
    pub fn matches_path(&self, path: &Path) -> bool {
        eval(&self.root, path)
    }
}

pub(crate) fn constraint_pattern(c: &Constraint, cwd: &Path, ci: bool) -> PathPattern {
    match (c.column, c.op) {
        (Column::Path, CmpOp::Like) => PathPattern::like(&c.value, cwd, ci),
        (Column::Path, CmpOp::Eq) => PathPattern::exact(&c.value, cwd, ci),
        (Column::Directory, CmpOp::Eq) => PathPattern::children_of(&c.value, cwd, ci),
        (Column::Directory, CmpOp::Like) => {
            let children = format!(
                "{}{MAIN_SEPARATOR}{ANY_RUN}",
                c.value.trim_end_matches(is_separator)
            );
            PathPattern::like(&children, cwd, ci)
        }
    }
}

fn compile(
    pred: &Predicate,
    cwd: &Path,
    ci: bool,
    positive: bool,
    scan: &mut Vec<PathPattern>,
) -> Node {
    let all = |items: &[Predicate], scan: &mut Vec<PathPattern>| -> Vec<Node> {
        items
            .iter()
            .map(|p| compile(p, cwd, ci, positive, scan))
            .collect()
    };

    match pred {
        Predicate::And(items) => Node::And(all(items, scan)),
        Predicate::Or(items) => Node::Or(all(items, scan)),
        Predicate::Not(inner) => Node::Not(Box::new(compile(inner, cwd, ci, false, scan))),
        Predicate::Leaf(c) => {
            let pattern = constraint_pattern(c, cwd, ci);
            if positive {
                scan.push(pattern.clone());
            }
            Node::Leaf(pattern)
        }
    }
}

fn eval(node: &Node, path: &Path) -> bool {
    match node {
        Node::And(items) => items.iter().all(|n| eval(n, path)),
        Node::Or(items) => items.iter().any(|n| eval(n, path)),
        Node::Not(inner) => !eval(inner, path),
        Node::Leaf(pattern) => pattern.matches_path(path),
    }
}

#[cfg(test)]
#[path = "predicates_tests.rs"]
mod tests;
