use crate::common::{
    flatten, param, QueryParam, Value, KEY_FIELD, KEY_SELECT_PRIORITY, PARAM_END_TS, PARAM_KEY,
    PARAM_META, PARAM_PREFIX, PARAM_PREFIX_COUNT, PARAM_START_TS, PREFIX_PRIORITY,
    TIME_RANGE_PRIORITY, TS_FIELD,
};
use crate::errors::{CollectorError, CollectorResult, ErrorKind};
use crate::model::{Model, ModelSchema};
use crate::query::QueryResult;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// The restriction a single query node applies.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryKind {
    /// Records under the given keys.
    KeySelect { keys: Vec<String> },
    /// Records whose `_ts` falls in `[start_ts, end_ts)`; either bound may be open.
    TimeRange {
        start_ts: Option<i64>,
        end_ts: Option<i64>,
    },
    /// Records whose key starts with one of the prefixes, optionally limited
    /// to `count` hits per prefix.
    Prefix {
        prefixes: Vec<String>,
        count: Option<Value>,
    },
}

impl QueryKind {
    /// Returns the wire position of the kind; lower compiles first.
    pub fn priority(&self) -> u8 {
        match self {
            QueryKind::Prefix { .. } => PREFIX_PRIORITY,
            QueryKind::TimeRange { .. } => TIME_RANGE_PRIORITY,
            QueryKind::KeySelect { .. } => KEY_SELECT_PRIORITY,
        }
    }

    fn compile(&self) -> CollectorResult<Vec<QueryParam>> {
        match self {
            QueryKind::KeySelect { keys } => {
                Ok(keys.iter().map(|key| param(PARAM_KEY, key)).collect())
            }
            QueryKind::TimeRange { start_ts, end_ts } => {
                let mut params = Vec::with_capacity(2);
                if let Some(start_ts) = start_ts {
                    params.push(param(PARAM_START_TS, *start_ts));
                }
                if let Some(end_ts) = end_ts {
                    params.push(param(PARAM_END_TS, *end_ts));
                }
                Ok(params)
            }
            QueryKind::Prefix { prefixes, count } => {
                let mut params: Vec<QueryParam> = prefixes
                    .iter()
                    .map(|prefix| param(PARAM_PREFIX, prefix))
                    .collect();
                if let Some(count) = count {
                    match count.as_integer() {
                        Some(count) => params.push(param(PARAM_PREFIX_COUNT, count)),
                        None => {
                            log::error!(
                                "Invalid {} {}, expected an integer",
                                PARAM_PREFIX_COUNT,
                                count
                            );
                            return Err(CollectorError::new(
                                &format!(
                                    "Invalid {} {:?}, expected an integer",
                                    PARAM_PREFIX_COUNT, count
                                ),
                                ErrorKind::InvalidQueryParameter,
                            ));
                        }
                    }
                }
                Ok(params)
            }
        }
    }
}

/// One link of a query chain.
///
/// Nodes are immutable and shared: every builder call allocates a new node
/// pointing at the node it was called on, so a chain can be extended in
/// several directions without one branch seeing the other.
pub struct QueryNode {
    kind: QueryKind,
    priority: u8,
    prev: Option<Arc<QueryNode>>,
}

impl QueryNode {
    pub fn new(kind: QueryKind, prev: Option<Arc<QueryNode>>) -> Self {
        QueryNode {
            priority: kind.priority(),
            kind,
            prev,
        }
    }

    pub fn kind(&self) -> &QueryKind {
        &self.kind
    }

    pub fn priority(&self) -> u8 {
        self.priority
    }

    pub fn prev(&self) -> Option<&Arc<QueryNode>> {
        self.prev.as_ref()
    }

    /// Compiles this node alone into wire parameters.
    pub fn compile(&self) -> CollectorResult<Vec<QueryParam>> {
        self.kind.compile()
    }
}

impl Debug for QueryNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryNode")
            .field("kind", &self.kind)
            .field("priority", &self.priority)
            .finish()
    }
}

/// Stably sorts nodes by priority, keeping the relative order of equal ones.
pub fn sort_chain(mut chain: Vec<Arc<QueryNode>>) -> Vec<Arc<QueryNode>> {
    chain.sort_by_key(|node| node.priority());
    chain
}

/// Compiles sorted nodes into the final parameter list.
///
/// Node output is concatenated in order, then `meta=_key` and `meta=_ts`
/// are appended so every hit carries its identity.
pub fn compile_chain(chain: &[Arc<QueryNode>]) -> CollectorResult<Vec<QueryParam>> {
    let compiled = chain
        .iter()
        .map(|node| node.compile())
        .collect::<CollectorResult<Vec<_>>>()?;

    let mut params = flatten(compiled);
    params.push(param(PARAM_META, KEY_FIELD));
    params.push(param(PARAM_META, TS_FIELD));
    Ok(params)
}

/// Fluent query construction, available on models and on queries.
///
/// Every call returns a new [`Query`] extending the chain of the receiver;
/// the receiver itself is never modified. The order of calls across kinds
/// does not affect the compiled parameters, only the order within a kind
/// does.
///
/// # Usage
/// ```ignore
/// let result = model
///     .select(["foo", "bar"])
///     .when(Some(1_000), None)
///     .prefix_with_count(["ba"], 5)
///     .execute()?;
/// ```
pub trait QueryApi<S: ModelSchema> {
    /// Extends the chain with a node of the given kind.
    fn chain(&self, kind: QueryKind) -> Query<S>;

    /// Restricts the result to the given keys.
    fn select<I, K>(&self, keys: I) -> Query<S>
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.chain(QueryKind::KeySelect {
            keys: keys.into_iter().map(Into::into).collect(),
        })
    }

    /// Restricts the result to records created in `[start_ts, end_ts)`.
    fn when(&self, start_ts: Option<i64>, end_ts: Option<i64>) -> Query<S> {
        self.chain(QueryKind::TimeRange { start_ts, end_ts })
    }

    /// Restricts the result to keys starting with one of `prefixes`.
    fn prefix<I, P>(&self, prefixes: I) -> Query<S>
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        self.chain(QueryKind::Prefix {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
            count: None,
        })
    }

    /// Like [`QueryApi::prefix`], with at most `prefix_count` hits per prefix.
    ///
    /// The count must have an integer interpretation; this is checked when the
    /// query is compiled, failing with `InvalidQueryParameter`.
    fn prefix_with_count<I, P, C>(&self, prefixes: I, prefix_count: C) -> Query<S>
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
        C: Into<Value>,
    {
        self.chain(QueryKind::Prefix {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
            count: Some(prefix_count.into()),
        })
    }
}

/// A query chain bound to the model it was started from.
pub struct Query<S: ModelSchema> {
    model: Arc<Model<S>>,
    node: Arc<QueryNode>,
}

impl<S: ModelSchema> Query<S> {
    pub(crate) fn new(model: Arc<Model<S>>, node: QueryNode) -> Self {
        Query {
            model,
            node: Arc::new(node),
        }
    }

    pub fn model(&self) -> &Model<S> {
        &self.model
    }

    pub fn node(&self) -> &Arc<QueryNode> {
        &self.node
    }

    /// Returns every node of the chain, most recent first.
    pub fn get_chain(&self) -> Vec<Arc<QueryNode>> {
        let mut chain = Vec::new();
        let mut current = Some(&self.node);
        while let Some(node) = current {
            chain.push(node.clone());
            current = node.prev();
        }
        chain
    }

    /// Returns the parameters [`Query::execute`] sends.
    pub fn compile(&self) -> CollectorResult<Vec<QueryParam>> {
        let mut chain = self.get_chain();
        chain.reverse();
        compile_chain(&sort_chain(chain))
    }

    /// Runs the query against the collection of its model.
    pub fn execute(&self) -> CollectorResult<QueryResult<S>> {
        self.model.execute(Some(self))
    }
}

impl<S: ModelSchema> Clone for Query<S> {
    fn clone(&self) -> Self {
        Query {
            model: self.model.clone(),
            node: self.node.clone(),
        }
    }
}

impl<S: ModelSchema> Debug for Query<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.get_chain()).finish()
    }
}

impl<S: ModelSchema> QueryApi<S> for Model<S> {
    fn chain(&self, kind: QueryKind) -> Query<S> {
        Query::new(Arc::new(self.clone()), QueryNode::new(kind, None))
    }
}

impl<S: ModelSchema> QueryApi<S> for Query<S> {
    fn chain(&self, kind: QueryKind) -> Query<S> {
        Query::new(
            self.model.clone(),
            QueryNode::new(kind, Some(self.node.clone())),
        )
    }
}
