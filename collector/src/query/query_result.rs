use crate::codec::{JsonLines, JsonLinesCodec};
use crate::errors::{CollectorError, CollectorResult, ErrorKind};
use crate::model::{Model, ModelSchema};
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// The response of a query, read back as model instances.
///
/// # Purpose
/// Keeps the raw JSON-lines response together with the model that issued the
/// query. Records are only decoded while iterating, each one turned into a
/// fresh instance through [`Model::create`], so instances share the
/// collection and log target of the originating model.
///
/// # Characteristics
/// - **Lazy**: decoding happens one line at a time
/// - **Restartable**: every call to [`QueryResult::iter`] starts over from the
///   stored text
/// - **Ordered**: instances come back in response order
///
/// # Usage
/// ```ignore
/// let result = model.prefix(["ba"]).execute()?;
/// for item in &result {
///     println!("{}", item?);
/// }
/// let first = result.first()?;
/// ```
pub struct QueryResult<S: ModelSchema> {
    model: Arc<Model<S>>,
    raw: String,
}

impl<S: ModelSchema> QueryResult<S> {
    pub(crate) fn new(model: Arc<Model<S>>, raw: String) -> Self {
        QueryResult { model, raw }
    }

    /// Returns a fresh iterator over the decoded instances.
    pub fn iter(&self) -> QueryResultIter<'_, S> {
        QueryResultIter {
            model: &self.model,
            lines: JsonLinesCodec::parse(&self.raw),
        }
    }

    /// Returns the first instance; an empty response fails with `NotFound`.
    pub fn first(&self) -> CollectorResult<Model<S>> {
        match self.iter().next() {
            Some(result) => result,
            None => {
                log::error!(target: self.model.logname(), "No record in the query result");
                Err(CollectorError::new(
                    "No record in the query result",
                    ErrorKind::NotFound,
                ))
            }
        }
    }

    /// Decodes every instance.
    pub fn all(&self) -> CollectorResult<Vec<Model<S>>> {
        self.iter().collect()
    }

    /// Returns the response text as received.
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

impl<S: ModelSchema> Debug for QueryResult<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryResult")
            .field("model", &S::model_name())
            .field("raw", &self.raw)
            .finish()
    }
}

impl<'a, S: ModelSchema> IntoIterator for &'a QueryResult<S> {
    type Item = CollectorResult<Model<S>>;
    type IntoIter = QueryResultIter<'a, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the instances of a [`QueryResult`].
pub struct QueryResultIter<'a, S: ModelSchema> {
    model: &'a Model<S>,
    lines: JsonLines<'a>,
}

impl<S: ModelSchema> Iterator for QueryResultIter<'_, S> {
    type Item = CollectorResult<Model<S>>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.lines.next()?;
        Some(record.and_then(|record| self.model.create(record)))
    }
}
