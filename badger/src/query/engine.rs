use crate::collection::{DocSet, DocumentSource};
use crate::errors::{BadgerError, BadgerResult, ErrorKind};
use crate::query::ast::DATE_IN_TEXT;
use crate::query::Query;

fn in_range<T: PartialOrd + ?Sized>(value: &T, first: Option<&T>, last: Option<&T>) -> bool {
    first.map_or(true, |first| value >= first) && last.map_or(true, |last| value <= last)
}

fn bound(value: &str) -> Option<&str> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

impl Query {
    /// Evaluates the query against `source`, returning the matching identities.
    ///
    /// # Errors
    ///
    /// Returns a `SchemaError` if any leaf names a field the source cannot
    /// resolve or match against.
    ///
    /// ```rust
    /// use badger::collection::{Collection, Document, Schema};
    /// use badger::errors::BadgerResult;
    /// use badger::query::Query;
    ///
    /// struct Event {
    ///     date: String,
    /// }
    ///
    /// impl Document for Event {
    ///     fn schema() -> BadgerResult<Schema<Self>> {
    ///         Schema::builder().string("date", |e: &Event| e.date.as_str()).build()
    ///     }
    /// }
    ///
    /// let events = Collection::<Event>::new().unwrap();
    /// events.insert(Event { date: "2010-06-14T10:20".into() });
    /// events.insert(Event { date: "1865-01-01".into() });
    /// events.insert(Event { date: "unknown".into() });
    ///
    /// let recent = Query::range("date", "2000-01-01", "").evaluate(&events).unwrap();
    /// assert_eq!(recent.len(), 1);
    /// ```
    pub fn evaluate<S: DocumentSource + ?Sized>(&self, source: &S) -> BadgerResult<DocSet> {
        let mut steps = vec![Step::Visit(self)];
        let mut results: Vec<DocSet> = Vec::new();

        while let Some(step) = steps.pop() {
            match step {
                Step::Visit(node) => match node {
                    Query::Not(inner) => {
                        steps.push(Step::Complement);
                        steps.push(Step::Visit(inner));
                    }
                    Query::And(left, right) => {
                        steps.push(Step::Intersect);
                        steps.push(Step::Visit(right));
                        steps.push(Step::Visit(left));
                    }
                    Query::Or(left, right) => {
                        steps.push(Step::Union);
                        steps.push(Step::Visit(right));
                        steps.push(Step::Visit(left));
                    }
                    leaf => results.push(leaf.evaluate_leaf(source)?),
                },
                Step::Complement => {
                    let inner = pop_result(&mut results)?;
                    let mut all = source.find_all();
                    all.subtract(&inner);
                    results.push(all);
                }
                Step::Intersect => {
                    let right = pop_result(&mut results)?;
                    let left = pop_result(&mut results)?;
                    results.push(left.intersect(&right));
                }
                Step::Union => {
                    let right = pop_result(&mut results)?;
                    let left = pop_result(&mut results)?;
                    results.push(left.union(&right));
                }
            }
        }

        pop_result(&mut results)
    }

    fn evaluate_leaf<S: DocumentSource + ?Sized>(&self, source: &S) -> BadgerResult<DocSet> {
        match self {
            Query::All => Ok(source.find_all()),
            Query::Nil => Ok(DocSet::new()),
            Query::Exact { field, values } => source.match_field(field, &|v: &str| {
                let v = v.to_lowercase();
                values.iter().any(|wanted| *wanted == v)
            }),
            Query::Contains { field, value } => {
                if source.is_whole_word(field)? {
                    source.match_phrase(field, value)
                } else {
                    source.match_field(field, &|v: &str| v.to_lowercase().contains(value.as_str()))
                }
            }
            Query::StrRange { field, first, last } => source.match_field(field, &|v: &str| {
                in_range(v.to_lowercase().as_str(), bound(first), bound(last))
            }),
            Query::DateRange { field, first, last } => source.match_field(field, &|v: &str| {
                DATE_IN_TEXT
                    .find(v)
                    .map(|date| in_range(date.as_str(), bound(first), bound(last)))
                    .unwrap_or(false)
            }),
            Query::IntRange { field, first, last } => source.match_field(field, &|v: &str| {
                v.parse::<i64>()
                    .map(|n| in_range(&n, Some(first), Some(last)))
                    .unwrap_or(false)
            }),
            Query::Not(_) | Query::And(..) | Query::Or(..) => {
                log::error!("Boolean node {} evaluated as a leaf", self);
                Err(BadgerError::new(
                    "boolean node evaluated as a leaf",
                    ErrorKind::InternalError,
                ))
            }
        }
    }
}

// post-order work items; boolean nodes combine the results of their children
enum Step<'q> {
    Visit(&'q Query),
    Complement,
    Intersect,
    Union,
}

fn pop_result(results: &mut Vec<DocSet>) -> BadgerResult<DocSet> {
    results.pop().ok_or_else(|| {
        log::error!("Query evaluation ran out of intermediate results");
        BadgerError::new(
            "query evaluation ran out of intermediate results",
            ErrorKind::InternalError,
        )
    })
}
