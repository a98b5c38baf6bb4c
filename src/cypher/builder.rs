//! Chainable Cypher query builder.
//!
//! A [`QueryBuilder`] is a value: every clause method consumes it and
//! returns the extended builder, so intermediate states can be cloned and
//! inspected. Clauses are kept in an append-only log and only arranged into
//! Cypher clause order by [`QueryBuilder::build`], which never mutates.

use std::fmt;

use smallvec::SmallVec;

/// Kinds of logged fragments, in the order they are serialized.
///
/// `SKIP` and `LIMIT` are slots, not fragments; see
/// [`QueryBuilder::skip_count`] and [`QueryBuilder::limit_count`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClauseKind {
    Unwind,
    Match,
    OptionalMatch,
    Merge,
    Create,
    Where,
    With,
    Set,
    Remove,
    Delete,
    Return,
    OrderBy,
    Union,
}

/// One clause contribution. Immutable once appended.
///
/// `SKIP`, `LIMIT` and `DISTINCT` are not logged; they live in single
/// last-write-wins slots on the builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    Match(String),
    OptionalMatch(String),
    Merge(String),
    Create(String),
    Where(String),
    With(String),
    Set(String),
    Remove(String),
    Delete(String),
    Unwind { expr: String, alias: String },
    Return(String),
    OrderBy(String),
    Union { query: String, all: bool },
}

impl Fragment {
    pub fn kind(&self) -> ClauseKind {
        match self {
            Fragment::Match(_) => ClauseKind::Match,
            Fragment::OptionalMatch(_) => ClauseKind::OptionalMatch,
            Fragment::Merge(_) => ClauseKind::Merge,
            Fragment::Create(_) => ClauseKind::Create,
            Fragment::Where(_) => ClauseKind::Where,
            Fragment::With(_) => ClauseKind::With,
            Fragment::Set(_) => ClauseKind::Set,
            Fragment::Remove(_) => ClauseKind::Remove,
            Fragment::Delete(_) => ClauseKind::Delete,
            Fragment::Unwind { .. } => ClauseKind::Unwind,
            Fragment::Return(_) => ClauseKind::Return,
            Fragment::OrderBy(_) => ClauseKind::OrderBy,
            Fragment::Union { .. } => ClauseKind::Union,
        }
    }

    /// Payload of single-text fragments.
    fn text(&self) -> Option<&str> {
        match self {
            Fragment::Match(s)
            | Fragment::OptionalMatch(s)
            | Fragment::Merge(s)
            | Fragment::Create(s)
            | Fragment::Where(s)
            | Fragment::With(s)
            | Fragment::Set(s)
            | Fragment::Remove(s)
            | Fragment::Delete(s)
            | Fragment::Return(s)
            | Fragment::OrderBy(s) => Some(s),
            Fragment::Unwind { .. } | Fragment::Union { .. } => None,
        }
    }
}

/// Anything `union` accepts: raw query text or another builder.
///
/// Builders are serialized at the moment they are passed in.
pub trait Subquery {
    fn into_subquery(self) -> String;
}

impl Subquery for &str {
    fn into_subquery(self) -> String { self.to_string() }
}

impl Subquery for String {
    fn into_subquery(self) -> String { self }
}

impl Subquery for &String {
    fn into_subquery(self) -> String { self.clone() }
}

impl Subquery for &QueryBuilder {
    fn into_subquery(self) -> String { self.build() }
}

impl Subquery for QueryBuilder {
    fn into_subquery(self) -> String { self.build() }
}

/// Accumulates clause fragments and serializes them in Cypher clause order.
///
/// ```
/// use age_rs::cypher::QueryBuilder;
///
/// let q = QueryBuilder::new()
///     .return_("n")
///     .match_("(n:Person)")
///     .where_("n.age > 25")
///     .build();
/// assert_eq!(q, "MATCH (n:Person) WHERE n.age > 25 RETURN n");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryBuilder {
    log: Vec<Fragment>,
    /// Last call wins.
    skip: Option<u64>,
    /// Last call wins.
    limit: Option<u64>,
    distinct: bool,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(mut self, fragment: Fragment) -> Self {
        self.log.push(fragment);
        self
    }

    // ========================================================================
    // Clause appenders
    // ========================================================================

    /// Add a pattern to the single `MATCH` clause.
    pub fn match_(self, pattern: impl Into<String>) -> Self {
        self.push(Fragment::Match(pattern.into()))
    }

    /// Each call produces its own `OPTIONAL MATCH` clause.
    pub fn optional_match(self, pattern: impl Into<String>) -> Self {
        self.push(Fragment::OptionalMatch(pattern.into()))
    }

    /// Each call produces its own `MERGE` clause.
    pub fn merge(self, pattern: impl Into<String>) -> Self {
        self.push(Fragment::Merge(pattern.into()))
    }

    pub fn create(self, pattern: impl Into<String>) -> Self {
        self.push(Fragment::Create(pattern.into()))
    }

    /// Conditions are AND-ed. Pass OR-ed alternatives as one pre-built string.
    pub fn where_(self, condition: impl Into<String>) -> Self {
        self.push(Fragment::Where(condition.into()))
    }

    pub fn with(self, expr: impl Into<String>) -> Self {
        self.push(Fragment::With(expr.into()))
    }

    pub fn set(self, assignment: impl Into<String>) -> Self {
        self.push(Fragment::Set(assignment.into()))
    }

    pub fn remove(self, item: impl Into<String>) -> Self {
        self.push(Fragment::Remove(item.into()))
    }

    pub fn delete(self, item: impl Into<String>) -> Self {
        self.push(Fragment::Delete(item.into()))
    }

    /// `UNWIND expr AS alias`, one clause per call.
    pub fn unwind(self, expr: impl Into<String>, alias: impl Into<String>) -> Self {
        self.push(Fragment::Unwind { expr: expr.into(), alias: alias.into() })
    }

    pub fn return_(self, expr: impl Into<String>) -> Self {
        self.push(Fragment::Return(expr.into()))
    }

    pub fn order_by(self, expr: impl Into<String>) -> Self {
        self.push(Fragment::OrderBy(expr.into()))
    }

    pub fn skip(mut self, count: u64) -> Self {
        self.skip = Some(count);
        self
    }

    pub fn limit(mut self, count: u64) -> Self {
        self.limit = Some(count);
        self
    }

    /// Applies to `RETURN` only.
    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Append `UNION` (or `UNION ALL`) followed by `query`.
    pub fn union(self, query: impl Subquery, all: bool) -> Self {
        self.push(Fragment::Union { query: query.into_subquery(), all })
    }

    pub fn union_all(self, query: impl Subquery) -> Self {
        self.union(query, true)
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Appended fragments in call order.
    pub fn fragments(&self) -> &[Fragment] {
        &self.log
    }

    pub fn skip_count(&self) -> Option<u64> {
        self.skip
    }

    pub fn limit_count(&self) -> Option<u64> {
        self.limit
    }

    pub fn is_distinct(&self) -> bool {
        self.distinct
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty() && self.skip.is_none() && self.limit.is_none() && !self.distinct
    }

    // ========================================================================
    // Serialization
    // ========================================================================

    fn entries(&self, kind: ClauseKind) -> SmallVec<[&str; 4]> {
        self.log
            .iter()
            .filter(|f| f.kind() == kind)
            .filter_map(Fragment::text)
            .collect()
    }

    /// One `KEYWORD a<sep>b<sep>c` segment, or nothing.
    fn joined(&self, segments: &mut Vec<String>, kind: ClauseKind, keyword: &str, sep: &str) {
        let items = self.entries(kind);
        if !items.is_empty() {
            segments.push(format!("{keyword} {}", items.join(sep)));
        }
    }

    /// One `KEYWORD x` segment per entry.
    fn each(&self, segments: &mut Vec<String>, kind: ClauseKind, keyword: &str) {
        for item in self.entries(kind) {
            segments.push(format!("{keyword} {item}"));
        }
    }

    /// Serialize to Cypher. Pure: may be called any number of times.
    pub fn build(&self) -> String {
        let mut segments: Vec<String> = Vec::new();

        for fragment in &self.log {
            if let Fragment::Unwind { expr, alias } = fragment {
                segments.push(format!("UNWIND {expr} AS {alias}"));
            }
        }
        self.joined(&mut segments, ClauseKind::Match, "MATCH", ", ");
        self.each(&mut segments, ClauseKind::OptionalMatch, "OPTIONAL MATCH");
        self.each(&mut segments, ClauseKind::Merge, "MERGE");
        self.joined(&mut segments, ClauseKind::Create, "CREATE", ", ");
        self.joined(&mut segments, ClauseKind::Where, "WHERE", " AND ");
        self.joined(&mut segments, ClauseKind::With, "WITH", ", ");
        self.joined(&mut segments, ClauseKind::Set, "SET", ", ");
        self.joined(&mut segments, ClauseKind::Remove, "REMOVE", ", ");
        self.joined(&mut segments, ClauseKind::Delete, "DELETE", ", ");

        let returns = self.entries(ClauseKind::Return);
        if !returns.is_empty() {
            let keyword = if self.distinct { "RETURN DISTINCT" } else { "RETURN" };
            segments.push(format!("{keyword} {}", returns.join(", ")));
        }

        self.joined(&mut segments, ClauseKind::OrderBy, "ORDER BY", ", ");
        if let Some(n) = self.skip {
            segments.push(format!("SKIP {n}"));
        }
        if let Some(n) = self.limit {
            segments.push(format!("LIMIT {n}"));
        }

        let mut query = segments.join(" ");
        for fragment in &self.log {
            if let Fragment::Union { query: sub, all } = fragment {
                query.push_str(if *all { " UNION ALL " } else { " UNION " });
                query.push_str(sub);
            }
        }

        tracing::trace!(fragments = self.log.len(), len = query.len(), "built cypher");
        query
    }
}

impl fmt::Display for QueryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.build())
    }
}

impl From<QueryBuilder> for String {
    fn from(builder: QueryBuilder) -> Self {
        builder.build()
    }
}

impl From<&QueryBuilder> for String {
    fn from(builder: &QueryBuilder) -> Self {
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_builds_empty() {
        assert_eq!(QueryBuilder::new().build(), "");
        assert!(QueryBuilder::new().is_empty());
    }

    #[test]
    fn test_is_empty_tracks_every_slot() {
        assert!(!QueryBuilder::new().distinct().is_empty());
        assert!(!QueryBuilder::new().skip(0).is_empty());
        assert!(!QueryBuilder::new().limit(1).is_empty());
        assert!(!QueryBuilder::new().return_("n").is_empty());
    }

    #[test]
    fn test_match_where_return() {
        let q = QueryBuilder::new()
            .match_("(n:Person)")
            .where_("n.age > 25")
            .return_("n")
            .build();
        assert_eq!(q, "MATCH (n:Person) WHERE n.age > 25 RETURN n");
    }

    #[test]
    fn test_order_by_and_limit() {
        let q = QueryBuilder::new()
            .match_("(n:Person)")
            .where_("n.age > 25")
            .return_("n")
            .order_by("n.name")
            .limit(10)
            .build();
        assert_eq!(q, "MATCH (n:Person) WHERE n.age > 25 RETURN n ORDER BY n.name LIMIT 10");
    }

    #[test]
    fn test_call_order_does_not_matter() {
        let q = QueryBuilder::new()
            .limit(5)
            .return_("n")
            .where_("n.x = 1")
            .match_("(n)")
            .build();
        assert_eq!(q, "MATCH (n) WHERE n.x = 1 RETURN n LIMIT 5");
    }

    #[test]
    fn test_multiple_matches_comma_joined() {
        let q = QueryBuilder::new().match_("(a)").match_("(b)").return_("a").return_("b").build();
        assert_eq!(q, "MATCH (a), (b) RETURN a, b");
    }

    #[test]
    fn test_where_conditions_and_joined() {
        let q = QueryBuilder::new()
            .match_("(n)")
            .where_("n.a = 1")
            .where_("(n.b = 2 OR n.c = 3)")
            .return_("n")
            .build();
        assert_eq!(q, "MATCH (n) WHERE n.a = 1 AND (n.b = 2 OR n.c = 3) RETURN n");
    }

    #[test]
    fn test_optional_match_and_merge_per_call() {
        let q = QueryBuilder::new()
            .merge("(a:A {k: 1})")
            .optional_match("(a)-[:R]->(b)")
            .merge("(c:C)")
            .optional_match("(a)-[:S]->(d)")
            .match_("(x)")
            .build();
        assert_eq!(
            q,
            "MATCH (x) OPTIONAL MATCH (a)-[:R]->(b) OPTIONAL MATCH (a)-[:S]->(d) MERGE (a:A {k: 1}) MERGE (c:C)"
        );
    }

    #[test]
    fn test_unwind_first_per_call() {
        let q = QueryBuilder::new()
            .create("(n:Item {v: x})")
            .unwind("[1, 2, 3]", "x")
            .unwind("['a']", "y")
            .build();
        assert_eq!(q, "UNWIND [1, 2, 3] AS x UNWIND ['a'] AS y CREATE (n:Item {v: x})");
    }

    #[test]
    fn test_full_clause_order() {
        let q = QueryBuilder::new()
            .limit(2)
            .skip(1)
            .order_by("m.name")
            .return_("m")
            .delete("r")
            .remove("m.tmp")
            .set("m.seen = true")
            .with("m")
            .where_("n.id = 1")
            .create("(z)")
            .merge("(m:M)")
            .optional_match("(n)-[r]->(m)")
            .match_("(n)")
            .unwind("$xs", "x")
            .build();
        assert_eq!(
            q,
            "UNWIND $xs AS x MATCH (n) OPTIONAL MATCH (n)-[r]->(m) MERGE (m:M) CREATE (z) \
             WHERE n.id = 1 WITH m SET m.seen = true REMOVE m.tmp DELETE r RETURN m \
             ORDER BY m.name SKIP 1 LIMIT 2"
        );
    }

    #[test]
    fn test_skip_limit_last_call_wins() {
        let b = QueryBuilder::new().match_("(n)").return_("n").skip(3).skip(7).limit(1).limit(9);
        assert_eq!(b.skip_count(), Some(7));
        assert_eq!(b.limit_count(), Some(9));
        assert_eq!(b.build(), "MATCH (n) RETURN n SKIP 7 LIMIT 9");
    }

    #[test]
    fn test_distinct() {
        let q = QueryBuilder::new().match_("(n)").return_("n").distinct().build();
        assert!(q.ends_with("RETURN DISTINCT n"));
        let q = QueryBuilder::new().match_("(n)").distinct().build();
        assert_eq!(q, "MATCH (n)");
    }

    #[test]
    fn test_union_string_and_builder() {
        let other = QueryBuilder::new().match_("(m:B)").return_("m AS x");
        let q = QueryBuilder::new()
            .match_("(n:A)")
            .return_("n AS x")
            .union(&other, false)
            .union_all("MATCH (o:C) RETURN o AS x")
            .build();
        assert_eq!(
            q,
            "MATCH (n:A) RETURN n AS x UNION MATCH (m:B) RETURN m AS x UNION ALL MATCH (o:C) RETURN o AS x"
        );
    }

    #[test]
    fn test_union_builder_is_snapshotted() {
        let other = QueryBuilder::new().match_("(m)").return_("m");
        let b = QueryBuilder::new().match_("(n)").return_("n").union(&other, true);
        let _later = other.limit(1);
        assert_eq!(b.build(), "MATCH (n) RETURN n UNION ALL MATCH (m) RETURN m");
    }

    #[test]
    fn test_build_is_idempotent_and_not_frozen() {
        let b = QueryBuilder::new().match_("(n)").return_("n");
        let first = b.build();
        assert_eq!(first, b.build());
        let b = b.limit(3);
        assert_ne!(first, b.build());
        assert_eq!(b.build(), "MATCH (n) RETURN n LIMIT 3");
    }

    #[test]
    fn test_display_aliases_build() {
        let b = QueryBuilder::new().match_("(n)").return_("count(n)");
        assert_eq!(b.to_string(), b.build());
        assert_eq!(String::from(&b), b.build());
    }

    #[test]
    fn test_fragments_in_call_order() {
        let b = QueryBuilder::new().return_("n").match_("(n)");
        let kinds: Vec<_> = b.fragments().iter().map(Fragment::kind).collect();
        assert_eq!(kinds, vec![ClauseKind::Return, ClauseKind::Match]);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn apply(b: QueryBuilder, op: usize) -> QueryBuilder {
            match op {
                0 => b.unwind("xs", "x"),
                1 => b.match_("(n)"),
                2 => b.optional_match("(n)-->(m)"),
                3 => b.merge("(k:K)"),
                4 => b.create("(c)"),
                5 => b.where_("n.a = 1"),
                6 => b.with("n"),
                7 => b.set("n.b = 2"),
                8 => b.remove("n.c"),
                9 => b.delete("m"),
                10 => b.return_("n"),
                11 => b.order_by("n.a"),
                12 => b.skip(4),
                _ => b.limit(8),
            }
        }

        proptest! {
            #[test]
            fn clause_order_is_call_order_independent(
                ops in Just((0usize..14).collect::<Vec<_>>()).prop_shuffle()
            ) {
                let canonical = (0usize..14).fold(QueryBuilder::new(), apply).build();
                let shuffled = ops.into_iter().fold(QueryBuilder::new(), apply).build();
                prop_assert_eq!(shuffled, canonical);
            }
        }
    }
}
