//! Query AST.
//!
//! A [`Query`] is an immutable tree that is not tied to any collection; it
//! can be evaluated against any [`DocumentSource`](crate::collection::DocumentSource)
//! whose schema has the fields it names.
//!
//! Long `AND`/`OR` chains nest one level per term, so everything that walks a
//! tree (evaluation, formatting, comparison, cloning and dropping) uses an
//! explicit stack instead of recursion.

use crate::errors::BadgerResult;
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::{self, Debug, Display, Formatter};
use std::mem;

/// Matches a whole `YYYY-MM-DD` range bound.
static DATE_BOUND: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("valid date pattern"));

/// Finds the first `YYYY-MM-DD` inside a field value.
pub(crate) static DATE_IN_TEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]{4}-[0-9]{2}-[0-9]{2}").expect("valid date pattern"));

/// A node of a parsed query.
///
/// Leaf values are stored lowercased, except for date bounds which are
/// compared as written.
pub enum Query {
    /// Matches every document.
    All,
    /// Matches nothing.
    Nil,
    /// Field equals any of the values, ignoring case.
    Exact { field: String, values: Vec<String> },
    /// Field contains the value, ignoring case. Whole words only on
    /// whole-word fields.
    Contains { field: String, value: String },
    /// Inclusive lexical range; an empty bound is open.
    StrRange {
        field: String,
        first: String,
        last: String,
    },
    /// Inclusive range over the first `YYYY-MM-DD` found in the field; an
    /// empty bound is open.
    DateRange {
        field: String,
        first: String,
        last: String,
    },
    /// Inclusive integer range.
    IntRange { field: String, first: i64, last: i64 },
    Not(Box<Query>),
    And(Box<Query>, Box<Query>),
    Or(Box<Query>, Box<Query>),
}

fn int_bound(bound: &str, open: i64) -> BadgerResult<i64> {
    if bound.is_empty() {
        Ok(open)
    } else {
        Ok(bound.parse::<i64>()?)
    }
}

impl Query {
    pub fn all() -> Query {
        Query::All
    }

    pub fn nil() -> Query {
        Query::Nil
    }

    /// Matches documents whose `field` equals any of `values`.
    pub fn exact<S: AsRef<str>>(field: &str, values: &[S]) -> Query {
        Query::Exact {
            field: field.to_string(),
            values: values.iter().map(|v| v.as_ref().to_lowercase()).collect(),
        }
    }

    /// Matches documents whose `field` contains `value`.
    pub fn contains(field: &str, value: &str) -> Query {
        Query::Contains {
            field: field.to_string(),
            value: value.to_lowercase(),
        }
    }

    /// Builds a range query, picking date, integer or string comparison from
    /// the bounds.
    ///
    /// A range is a date range if any non-empty bound looks like `YYYY-MM-DD`,
    /// else an integer range if every non-empty bound is an integer, else a
    /// string range. Both bounds empty gives [`Query::Nil`].
    ///
    /// ```rust
    /// use badger::query::Query;
    ///
    /// assert!(matches!(Query::range("date", "2010-06-14", ""), Query::DateRange { .. }));
    /// assert_eq!(
    ///     Query::range("size", "", "42"),
    ///     Query::IntRange { field: "size".into(), first: i64::MIN, last: 42 }
    /// );
    /// assert!(matches!(Query::range("name", "a", "M"), Query::StrRange { .. }));
    /// assert_eq!(Query::range("name", "", ""), Query::Nil);
    /// ```
    pub fn range(field: &str, first: &str, last: &str) -> Query {
        if first.is_empty() && last.is_empty() {
            return Query::Nil;
        }

        if [first, last]
            .iter()
            .any(|b| !b.is_empty() && DATE_BOUND.is_match(b))
        {
            return Query::DateRange {
                field: field.to_string(),
                first: first.to_string(),
                last: last.to_string(),
            };
        }

        let ints = int_bound(first, i64::MIN).and_then(|f| Ok((f, int_bound(last, i64::MAX)?)));
        if let Ok((first, last)) = ints {
            return Query::IntRange {
                field: field.to_string(),
                first,
                last,
            };
        }

        Query::StrRange {
            field: field.to_string(),
            first: first.to_lowercase(),
            last: last.to_lowercase(),
        }
    }

    pub fn not(query: Query) -> Query {
        Query::Not(Box::new(query))
    }

    pub fn and(left: Query, right: Query) -> Query {
        Query::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: Query, right: Query) -> Query {
        Query::Or(Box::new(left), Box::new(right))
    }

    /// Field named by a leaf, `None` for boolean nodes and `All`/`Nil`.
    pub fn field(&self) -> Option<&str> {
        match self {
            Query::Exact { field, .. }
            | Query::Contains { field, .. }
            | Query::StrRange { field, .. }
            | Query::DateRange { field, .. }
            | Query::IntRange { field, .. } => Some(field),
            _ => None,
        }
    }

    /// Number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            match node {
                Query::Not(inner) => stack.push(&**inner),
                Query::And(left, right) | Query::Or(left, right) => {
                    stack.push(&**right);
                    stack.push(&**left);
                }
                _ => {}
            }
        }
        count
    }

    /// Renders the tree one node per line, children indented.
    ///
    /// ```rust
    /// use badger::query::Query;
    ///
    /// let q = Query::or(Query::contains("tags", "cheese"), Query::not(Query::contains("tags", "moon")));
    /// assert_eq!(q.dump_tree(), "OR\n  tags:cheese\n  NOT\n    tags:moon\n");
    /// ```
    pub fn dump_tree(&self) -> String {
        let mut out = String::new();
        let mut stack = vec![(self, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            out.push_str(&"  ".repeat(depth));
            match node {
                Query::Not(inner) => {
                    out.push_str("NOT\n");
                    stack.push((&**inner, depth + 1));
                }
                Query::And(left, right) | Query::Or(left, right) => {
                    out.push_str(if matches!(node, Query::And(..)) { "AND\n" } else { "OR\n" });
                    stack.push((&**right, depth + 1));
                    stack.push((&**left, depth + 1));
                }
                leaf => {
                    out.push_str(&leaf.to_string());
                    out.push('\n');
                }
            }
        }
        out
    }

    /// Copy of a leaf, or of a boolean node with `Nil` children.
    fn shallow_clone(&self) -> Query {
        match self {
            Query::All => Query::All,
            Query::Nil => Query::Nil,
            Query::Exact { field, values } => Query::Exact {
                field: field.clone(),
                values: values.clone(),
            },
            Query::Contains { field, value } => Query::Contains {
                field: field.clone(),
                value: value.clone(),
            },
            Query::StrRange { field, first, last } => Query::StrRange {
                field: field.clone(),
                first: first.clone(),
                last: last.clone(),
            },
            Query::DateRange { field, first, last } => Query::DateRange {
                field: field.clone(),
                first: first.clone(),
                last: last.clone(),
            },
            Query::IntRange { field, first, last } => Query::IntRange {
                field: field.clone(),
                first: *first,
                last: *last,
            },
            Query::Not(_) => Query::not(Query::Nil),
            Query::And(..) => Query::and(Query::Nil, Query::Nil),
            Query::Or(..) => Query::or(Query::Nil, Query::Nil),
        }
    }

    fn fmt_leaf(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Query::All => write!(f, "<ALL>"),
            Query::Nil => write!(f, "<NONE>"),
            Query::Exact { field, values } => {
                write!(f, "{}:={}", field, values.iter().join("|"))
            }
            Query::Contains { field, value } => write!(f, "{}:{}", field, value),
            Query::StrRange { field, first, last } | Query::DateRange { field, first, last } => {
                write!(f, "{}:[{} TO {}]", field, first, last)
            }
            Query::IntRange { field, first, last } => {
                let bound = |v: i64, open: i64| if v == open { String::new() } else { v.to_string() };
                write!(
                    f,
                    "{}:[{} TO {}]",
                    field,
                    bound(*first, i64::MIN),
                    bound(*last, i64::MAX)
                )
            }
            Query::Not(_) | Query::And(..) | Query::Or(..) => Ok(()),
        }
    }
}

enum Piece<'q> {
    Node(&'q Query),
    Text(&'static str),
}

impl Display for Query {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut stack = vec![Piece::Node(self)];
        while let Some(piece) = stack.pop() {
            match piece {
                Piece::Text(text) => f.write_str(text)?,
                Piece::Node(node) => match node {
                    Query::Not(inner) => {
                        f.write_str("-")?;
                        stack.push(Piece::Node(inner));
                    }
                    Query::And(left, right) | Query::Or(left, right) => {
                        let op = if matches!(node, Query::And(..)) { " AND " } else { " OR " };
                        f.write_str("(")?;
                        stack.push(Piece::Text(")"));
                        stack.push(Piece::Node(right));
                        stack.push(Piece::Text(op));
                        stack.push(Piece::Node(left));
                    }
                    leaf => leaf.fmt_leaf(f)?,
                },
            }
        }
        Ok(())
    }
}

impl Debug for Query {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Query").field(&format_args!("{}", self)).finish()
    }
}

impl Clone for Query {
    fn clone(&self) -> Self {
        let mut root = self.shallow_clone();
        {
            let mut stack: Vec<(&Query, &mut Query)> = vec![(self, &mut root)];
            while let Some((source, target)) = stack.pop() {
                match (source, target) {
                    (Query::Not(from), Query::Not(to)) => {
                        **to = from.shallow_clone();
                        stack.push((&**from, &mut **to));
                    }
                    (Query::And(from_left, from_right), Query::And(to_left, to_right))
                    | (Query::Or(from_left, from_right), Query::Or(to_left, to_right)) => {
                        **to_left = from_left.shallow_clone();
                        **to_right = from_right.shallow_clone();
                        stack.push((&**from_left, &mut **to_left));
                        stack.push((&**from_right, &mut **to_right));
                    }
                    _ => {}
                }
            }
        }
        root
    }
}

impl PartialEq for Query {
    fn eq(&self, other: &Self) -> bool {
        let mut stack = vec![(self, other)];
        while let Some(pair) = stack.pop() {
            let same = match pair {
                (Query::All, Query::All) | (Query::Nil, Query::Nil) => true,
                (
                    Query::Exact { field, values },
                    Query::Exact {
                        field: other_field,
                        values: other_values,
                    },
                ) => field == other_field && values == other_values,
                (
                    Query::Contains { field, value },
                    Query::Contains {
                        field: other_field,
                        value: other_value,
                    },
                ) => field == other_field && value == other_value,
                (
                    Query::StrRange { field, first, last },
                    Query::StrRange {
                        field: other_field,
                        first: other_first,
                        last: other_last,
                    },
                )
                | (
                    Query::DateRange { field, first, last },
                    Query::DateRange {
                        field: other_field,
                        first: other_first,
                        last: other_last,
                    },
                ) => field == other_field && first == other_first && last == other_last,
                (
                    Query::IntRange { field, first, last },
                    Query::IntRange {
                        field: other_field,
                        first: other_first,
                        last: other_last,
                    },
                ) => field == other_field && first == other_first && last == other_last,
                (Query::Not(inner), Query::Not(other_inner)) => {
                    stack.push((&**inner, &**other_inner));
                    true
                }
                (Query::And(left, right), Query::And(other_left, other_right))
                | (Query::Or(left, right), Query::Or(other_left, other_right)) => {
                    stack.push((&**left, &**other_left));
                    stack.push((&**right, &**other_right));
                    true
                }
                _ => false,
            };
            if !same {
                return false;
            }
        }
        true
    }
}

impl Eq for Query {}

impl Drop for Query {
    fn drop(&mut self) {
        let mut detached = Vec::new();
        detach_children(self, &mut detached);
        while let Some(mut node) = detached.pop() {
            detach_children(&mut node, &mut detached);
        }
    }
}

/// Moves the boolean children of `node` onto `out`, leaving `Nil` behind, so
/// a dropped tree is freed one node at a time.
fn detach_children(node: &mut Query, out: &mut Vec<Query>) {
    match node {
        Query::Not(inner) => out.push(mem::replace(&mut **inner, Query::Nil)),
        Query::And(left, right) | Query::Or(left, right) => {
            out.push(mem::replace(&mut **left, Query::Nil));
            out.push(mem::replace(&mut **right, Query::Nil));
        }
        _ => {}
    }
}
