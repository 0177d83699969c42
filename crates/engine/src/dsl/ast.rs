use std::fmt;

/// Column a constraint is placed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Path,
    Directory,
}

impl Column {
    pub fn as_str(self) -> &'static str {
        match self {
            Column::Path => "path",
            Column::Directory => "directory",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Like,
    Eq,
}

/// `<column> LIKE '<value>'` or `<column> = '<value>'`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    pub column: Column,
    pub op: CmpOp,
    pub value: String,
}

/// Boolean expression over path constraints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
    Not(Box<Predicate>),
    Leaf(Constraint),
}

impl Predicate {
    fn leaf(column: Column, op: CmpOp, value: impl Into<String>) -> Self {
        Predicate::Leaf(Constraint {
            column,
            op,
            value: value.into(),
        })
    }

    pub fn path_like(pattern: impl Into<String>) -> Self {
        Self::leaf(Column::Path, CmpOp::Like, pattern)
    }

    pub fn path_eq(path: impl Into<String>) -> Self {
        Self::leaf(Column::Path, CmpOp::Eq, path)
    }

    pub fn directory_like(pattern: impl Into<String>) -> Self {
        Self::leaf(Column::Directory, CmpOp::Like, pattern)
    }

    pub fn directory_eq(dir: impl Into<String>) -> Self {
        Self::leaf(Column::Directory, CmpOp::Eq, dir)
    }

    /// Flattens nested ORs so `a.or(b).or(c)` stays one level deep.
    pub fn or(self, other: Predicate) -> Self {
        match self {
            Predicate::Or(mut items) => {
                items.push(other);
                Predicate::Or(items)
            }
            first => Predicate::Or(vec![first, other]),
        }
    }

    pub fn and(self, other: Predicate) -> Self {
        match self {
            Predicate::And(mut items) => {
                items.push(other);
                Predicate::And(items)
            }
            first => Predicate::And(vec![first, other]),
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Predicate::Not(Box::new(self))
    }

    /// Leaves reachable without passing through a `NOT`; these are the only
    /// constraints that can contribute candidates.
    pub fn positive_leaves(&self) -> Vec<&Constraint> {
        let mut out = Vec::new();
        collect_positive(self, &mut out);
        out
    }
}

fn collect_positive<'a>(p: &'a Predicate, out: &mut Vec<&'a Constraint>) {
    match p {
        Predicate::Leaf(c) => out.push(c),
        Predicate::And(items) | Predicate::Or(items) => {
            for item in items {
                collect_positive(item, out);
            }
        }
        Predicate::Not(_) => {}
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self.op {
            CmpOp::Like => "LIKE",
            CmpOp::Eq => "=",
        };
        write!(
            f,
            "{} {op} '{}'",
            self.column.as_str(),
            self.value.replace('\'', "''")
        )
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join(f: &mut fmt::Formatter<'_>, items: &[Predicate], sep: &str) -> fmt::Result {
            f.write_str("(")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    f.write_str(sep)?;
                }
                write!(f, "{item}")?;
            }
            f.write_str(")")
        }

        match self {
            Predicate::Leaf(c) => write!(f, "{c}"),
            Predicate::Not(inner) => write!(f, "NOT {inner}"),
            Predicate::And(items) => join(f, items, " AND "),
            Predicate::Or(items) => join(f, items, " OR "),
        }
    }
}
