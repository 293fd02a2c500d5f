//! Query language shared by every store backend.

use serde_json::Value;
use std::cmp::Ordering;

use super::Document;

/// A single field condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Eq(Value),
    Ne(Value),
    Gt(Value),
    Gte(Value),
    Lt(Value),
    Lte(Value),
    /// Field value is one of the listed values.
    In(Vec<Value>),
    /// Field is an array holding the value.
    Contains(Value),
}

impl Condition {
    fn matches(&self, field: Option<&Value>) -> bool {
        match self {
            Condition::Eq(expected) => field == Some(expected),
            Condition::Ne(expected) => field != Some(expected),
            Condition::Gt(bound) => compare_field(field, bound) == Some(Ordering::Greater),
            Condition::Gte(bound) => matches!(
                compare_field(field, bound),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Condition::Lt(bound) => compare_field(field, bound) == Some(Ordering::Less),
            Condition::Lte(bound) => matches!(
                compare_field(field, bound),
                Some(Ordering::Less | Ordering::Equal)
            ),
            Condition::In(options) => field.is_some_and(|v| options.contains(v)),
            Condition::Contains(item) => matches!(field, Some(Value::Array(items)) if items.contains(item)),
        }
    }
}

fn compare_field(field: Option<&Value>, bound: &Value) -> Option<Ordering> {
    field.and_then(|v| compare_values(v, bound))
}

/// Order two JSON scalars of the same kind. Mixed kinds do not compare.
pub fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        _ => None,
    }
}

/// Conjunction of field conditions. An empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    clauses: Vec<(String, Condition)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter on a document's `id`.
    pub fn by_id(id: impl Into<String>) -> Self {
        Self::new().eq("id", id.into())
    }

    pub fn with(mut self, field: impl Into<String>, condition: Condition) -> Self {
        self.clauses.push((field.into(), condition));
        self
    }

    pub fn eq(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with(field, Condition::Eq(value.into()))
    }

    pub fn ne(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with(field, Condition::Ne(value.into()))
    }

    pub fn gt(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with(field, Condition::Gt(value.into()))
    }

    pub fn gte(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with(field, Condition::Gte(value.into()))
    }

    pub fn lt(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with(field, Condition::Lt(value.into()))
    }

    pub fn lte(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with(field, Condition::Lte(value.into()))
    }

    pub fn one_of<I, V>(self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.with(field, Condition::In(values.into_iter().map(Into::into).collect()))
    }

    pub fn contains(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with(field, Condition::Contains(value.into()))
    }

    /// Add an equality clause only when a value is present.
    pub fn eq_opt<V: Into<Value>>(self, field: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(v) => self.eq(field, v),
            None => self,
        }
    }

    pub fn clauses(&self) -> &[(String, Condition)] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn matches(&self, doc: &Document) -> bool {
        self.clauses
            .iter()
            .all(|(field, condition)| condition.matches(doc.get(field)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

/// Sort on one field, tie-broken by `id` in the same direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub direction: SortDirection,
}

impl Sort {
    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Descending,
        }
    }

    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Ascending,
        }
    }

    /// Compare two documents. Documents missing the field sort last.
    pub fn compare(&self, a: &Document, b: &Document) -> Ordering {
        let primary = match (a.get(&self.field), b.get(&self.field)) {
            (Some(x), Some(y)) => self.directed(compare_values(x, y).unwrap_or(Ordering::Equal)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };

        primary.then_with(|| {
            let ids = match (a.get("id"), b.get("id")) {
                (Some(x), Some(y)) => compare_values(x, y).unwrap_or(Ordering::Equal),
                _ => Ordering::Equal,
            };
            self.directed(ids)
        })
    }

    fn directed(&self, ordering: Ordering) -> Ordering {
        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Filter, order and window applied by [`DocumentStore::find`](super::DocumentStore::find).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindQuery {
    pub filter: Filter,
    pub sort: Option<Sort>,
    pub skip: u64,
    pub limit: Option<u64>,
}

impl FindQuery {
    pub fn new(filter: Filter) -> Self {
        Self {
            filter,
            ..Default::default()
        }
    }

    pub fn sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = skip;
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_equality_and_range() {
        let review = doc(json!({"id": "r1", "productId": "p1", "rating": 4}));

        assert!(Filter::new().eq("productId", "p1").matches(&review));
        assert!(!Filter::new().eq("productId", "p2").matches(&review));
        assert!(Filter::new().gte("rating", 4).matches(&review));
        assert!(!Filter::new().gt("rating", 4).matches(&review));
        assert!(Filter::new().lt("rating", 5).lte("rating", 4).matches(&review));
    }

    #[test]
    fn test_ne_matches_missing_field() {
        let forum = doc(json!({"id": "f1"}));
        assert!(Filter::new().ne("authorId", "u1").matches(&forum));
    }

    #[test]
    fn test_in_and_contains() {
        let product = doc(json!({"id": "p1", "status": "approved", "tags": ["ai", "devtools"]}));

        assert!(Filter::new().one_of("status", ["approved", "submitted"]).matches(&product));
        assert!(!Filter::new().one_of("status", ["pending"]).matches(&product));
        assert!(Filter::new().contains("tags", "ai").matches(&product));
        assert!(!Filter::new().contains("tags", "games").matches(&product));
    }

    #[test]
    fn test_mixed_kinds_never_match_ranges() {
        let launch = doc(json!({"id": "l1", "launchDate": "2024-01-01T00:00:00.000Z"}));
        assert!(!Filter::new().gt("launchDate", 5).matches(&launch));
    }

    #[test]
    fn test_sort_descending_with_id_tiebreak() {
        let a = doc(json!({"id": "a", "createdAt": "2024-01-01T00:00:00.000Z"}));
        let b = doc(json!({"id": "b", "createdAt": "2024-01-01T00:00:00.000Z"}));
        let c = doc(json!({"id": "c", "createdAt": "2024-02-01T00:00:00.000Z"}));

        let mut docs = vec![a, b, c];
        let sort = Sort::descending("createdAt");
        docs.sort_by(|x, y| sort.compare(x, y));

        let ids: Vec<_> = docs.iter().map(|d| d["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
    }
}
