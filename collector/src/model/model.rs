use crate::codec::Payload;
use crate::collection::Collection;
use crate::common::{datetime_from_millis, Record, Value, KEY_FIELD, TS_FIELD};
use crate::errors::{CollectorError, CollectorResult, ErrorKind};
use crate::model::{is_identity_field, ModelSchema};
use crate::query::{compile_chain, Query, QueryResult};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use std::fmt::{Debug, Display, Formatter};
use std::marker::PhantomData;
use std::sync::Arc;

/// A record of a remote collection, mapped onto the declared fields of `S`.
///
/// # Purpose
/// Holds the values of every declared field of the schema `S`, the record
/// identity (`_key`, `_ts`) and the collection binding it reads from and
/// writes to. It is also the starting point of queries against that
/// collection.
///
/// # Characteristics
/// - **Declared fields**: every field of `S` has a slot, `Null` until set
/// - **Identity**: `_key` and `_ts` are fixed at construction and never change
/// - **Untracked values**: undeclared names written through [`FieldMap::set_item`]
///   are kept aside and never saved
/// - **Shared binding**: clones and instances created from this one talk to
///   the same collection
///
/// # Usage
/// ```ignore
/// let collection = Collection::new(InMemoryCollection::new("items"));
/// let mut item = Model::<Item>::new(collection, None, record! { "_key": "foo" })?;
/// item.set_value("foo_value");
/// item.save()?;
///
/// let found = item.select(["foo"]).execute()?.first()?;
/// assert_eq!(found.value(), &Value::from("foo_value"));
/// ```
pub struct Model<S: ModelSchema> {
    collection: Collection,
    logname: String,
    values: IndexMap<String, Value>,
    untracked: IndexMap<String, Value>,
    key: Option<String>,
    ts: Option<i64>,
    _schema: PhantomData<fn() -> S>,
}

impl<S: ModelSchema> Model<S> {
    /// Creates a model instance bound to `collection`.
    ///
    /// # Arguments
    /// * `collection` - The collection binding the instance reads from and writes to
    /// * `logname` - Log target; defaults to `S::model_name()`
    /// * `values` - Initial values: declared fields, `_key` and `_ts`
    ///
    /// # Behavior
    /// - Declared fields take the supplied value, the others stay `Null`
    /// - `_key` is kept as text; a `Null` key means no identity
    /// - `_ts` must have an integer interpretation, otherwise `InvalidDataType`
    /// - Any other name is logged at warn level and dropped
    pub fn new(
        collection: Collection,
        logname: Option<&str>,
        values: Record,
    ) -> CollectorResult<Self> {
        let logname = logname.unwrap_or(S::model_name()).to_string();
        let mut model = Model {
            collection,
            values: S::field_names()
                .iter()
                .map(|name| (name.to_string(), Value::Null))
                .collect(),
            untracked: IndexMap::new(),
            key: None,
            ts: None,
            logname,
            _schema: PhantomData,
        };

        for (name, value) in values {
            match name.as_str() {
                KEY_FIELD => model.key = key_from_value(value),
                TS_FIELD => model.ts = model.ts_from_value(value)?,
                _ if S::is_field(&name) => {
                    model.values.insert(name, value);
                }
                _ => {
                    log::warn!(
                        target: model.logname.as_str(),
                        "Dropping undeclared field {} of {}",
                        name,
                        S::model_name()
                    );
                }
            }
        }
        Ok(model)
    }

    /// Creates a model instance without values or identity.
    pub fn empty(collection: Collection) -> Self {
        Model {
            collection,
            logname: S::model_name().to_string(),
            values: S::field_names()
                .iter()
                .map(|name| (name.to_string(), Value::Null))
                .collect(),
            untracked: IndexMap::new(),
            key: None,
            ts: None,
            _schema: PhantomData,
        }
    }

    /// Creates a new instance bound to the same collection and log target.
    pub fn create(&self, values: Record) -> CollectorResult<Model<S>> {
        Model::new(self.collection.clone(), Some(&self.logname), values)
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Returns the creation timestamp in milliseconds since the Unix epoch.
    pub fn ts(&self) -> Option<i64> {
        self.ts
    }

    /// Returns the creation timestamp as a UTC date time.
    pub fn ts_datetime(&self) -> Option<DateTime<Utc>> {
        self.ts.and_then(datetime_from_millis)
    }

    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    pub fn logname(&self) -> &str {
        &self.logname
    }

    /// Returns the value of a declared field.
    pub fn get(&self, name: &str) -> CollectorResult<&Value> {
        match self.values.get(name) {
            Some(value) => Ok(value),
            None => Err(self.field_not_found(name)),
        }
    }

    /// Sets the value of a declared field.
    pub fn set<T: Into<Value>>(&mut self, name: &str, value: T) -> CollectorResult<()> {
        if is_identity_field(name) {
            return Err(self.immutable_field(name));
        }
        match self.values.get_mut(name) {
            Some(slot) => {
                *slot = value.into();
                Ok(())
            }
            None => Err(self.field_not_found(name)),
        }
    }

    /// Returns the value of a declared field, `Null` for any other name.
    ///
    /// Backs the getters generated by the `ModelSchema` derive.
    pub fn field_value(&self, name: &str) -> &Value {
        self.values.get(name).unwrap_or(&NULL_VALUE)
    }

    /// Sets a declared field; other names are ignored.
    ///
    /// Backs the setters generated by the `ModelSchema` derive.
    pub fn set_field_value(&mut self, name: &str, value: Value) {
        if let Some(slot) = self.values.get_mut(name) {
            *slot = value;
        }
    }

    /// Returns a value written under an undeclared name.
    pub fn untracked(&self, name: &str) -> Option<&Value> {
        self.untracked.get(name)
    }

    /// Writes the instance to the collection.
    ///
    /// The payload carries `_key` when present and every declared field that
    /// is not `Null`. Remote failures are logged and returned.
    pub fn save(&self) -> CollectorResult<()> {
        let mut record = Record::with_capacity(self.values.len() + 1);
        if let Some(key) = &self.key {
            record.put(KEY_FIELD, key.as_str());
        }
        for (name, value) in self.values.iter().filter(|(_, value)| !value.is_null()) {
            record.put(name, value.clone());
        }

        self.collection
            .post(&Payload::from(record))
            .map(|_| ())
            .map_err(|err| {
                log::error!(target: self.logname.as_str(), "Failed to save {}: {}", self, err);
                err
            })
    }

    /// Removes the instance from the collection by its key.
    pub fn delete(&self) -> CollectorResult<()> {
        match &self.key {
            Some(key) => self.collection.delete(key).map(|_| ()).map_err(|err| {
                log::error!(target: self.logname.as_str(), "Failed to delete {}: {}", key, err);
                err
            }),
            None => {
                log::error!(
                    target: self.logname.as_str(),
                    "Cannot delete a record without {}",
                    KEY_FIELD
                );
                Err(CollectorError::new(
                    &format!("Cannot delete a record without {}", KEY_FIELD),
                    ErrorKind::NotIdentifiable,
                ))
            }
        }
    }

    /// Runs `query` against the collection; without a query every record is read.
    ///
    /// The query chain is put back in construction order, stably sorted by
    /// node priority and compiled. `meta=_key` and `meta=_ts` always close the
    /// parameter list.
    pub fn execute(&self, query: Option<&Query<S>>) -> CollectorResult<QueryResult<S>> {
        let params = match query {
            Some(query) => query.compile()?,
            None => compile_chain(&[])?,
        };
        let raw = self.collection.request(&params)?;
        Ok(QueryResult::new(Arc::new(self.clone()), raw))
    }

    fn ts_from_value(&self, value: Value) -> CollectorResult<Option<i64>> {
        if value.is_null() {
            return Ok(None);
        }
        match value.as_integer() {
            Some(ts) => Ok(Some(ts)),
            None => {
                log::error!(target: self.logname.as_str(), "Invalid {} value {}", TS_FIELD, value);
                Err(CollectorError::new(
                    &format!("Invalid {} value {}, expected an integer", TS_FIELD, value),
                    ErrorKind::InvalidDataType,
                ))
            }
        }
    }

    fn field_not_found(&self, name: &str) -> CollectorError {
        log::error!(target: self.logname.as_str(), "{} has no field {}", S::model_name(), name);
        CollectorError::new(
            &format!("{} has no field {}", S::model_name(), name),
            ErrorKind::FieldNotFound,
        )
    }

    fn immutable_field(&self, name: &str) -> CollectorError {
        log::error!(target: self.logname.as_str(), "Field {} is read-only", name);
        CollectorError::new(
            &format!("Field {} is read-only", name),
            ErrorKind::ImmutableField,
        )
    }
}

static NULL_VALUE: Value = Value::Null;

fn key_from_value(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(key) => Some(key),
        other => Some(other.to_string()),
    }
}

/// Mapping-style access to the fields of a model.
///
/// Keys are the declared fields in declaration order, followed by `_key` and
/// `_ts` when they are set.
pub trait FieldMap {
    /// Returns the value under `name`; undeclared names fail with `FieldNotFound`.
    fn get_item(&self, name: &str) -> CollectorResult<Value>;

    /// Writes `value` under `name`. Undeclared names go to the untracked bag;
    /// `_key` and `_ts` fail with `ImmutableField`.
    fn set_item(&mut self, name: &str, value: Value) -> CollectorResult<()>;

    /// Resets a declared field to `Null` or removes an untracked value.
    fn del_item(&mut self, name: &str) -> CollectorResult<()>;

    fn keys(&self) -> Vec<String>;

    fn to_record(&self) -> Record;

    fn len(&self) -> usize {
        self.keys().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains_key(&self, name: &str) -> bool {
        self.keys().iter().any(|key| key == name)
    }
}

impl<S: ModelSchema> FieldMap for Model<S> {
    fn get_item(&self, name: &str) -> CollectorResult<Value> {
        match name {
            KEY_FIELD => Ok(Value::from(self.key.clone())),
            TS_FIELD => Ok(Value::from(self.ts)),
            _ => self.get(name).cloned(),
        }
    }

    fn set_item(&mut self, name: &str, value: Value) -> CollectorResult<()> {
        if is_identity_field(name) {
            return Err(self.immutable_field(name));
        }
        match self.values.get_mut(name) {
            Some(slot) => *slot = value,
            None => {
                self.untracked.insert(name.to_string(), value);
            }
        }
        Ok(())
    }

    fn del_item(&mut self, name: &str) -> CollectorResult<()> {
        if is_identity_field(name) {
            return Err(self.immutable_field(name));
        }
        if let Some(slot) = self.values.get_mut(name) {
            *slot = Value::Null;
            return Ok(());
        }
        match self.untracked.shift_remove(name) {
            Some(_) => Ok(()),
            None => Err(self.field_not_found(name)),
        }
    }

    fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.values.keys().cloned().collect();
        if self.key.is_some() {
            keys.push(KEY_FIELD.to_string());
        }
        if self.ts.is_some() {
            keys.push(TS_FIELD.to_string());
        }
        keys
    }

    fn to_record(&self) -> Record {
        let mut record = Record::with_capacity(self.values.len() + 2);
        for (name, value) in &self.values {
            record.put(name, value.clone());
        }
        if let Some(key) = &self.key {
            record.put(KEY_FIELD, key.as_str());
        }
        if let Some(ts) = self.ts {
            record.put(TS_FIELD, ts);
        }
        record
    }
}

impl<S: ModelSchema> Clone for Model<S> {
    fn clone(&self) -> Self {
        Model {
            collection: self.collection.clone(),
            logname: self.logname.clone(),
            values: self.values.clone(),
            untracked: self.untracked.clone(),
            key: self.key.clone(),
            ts: self.ts,
            _schema: PhantomData,
        }
    }
}

impl<S: ModelSchema> PartialEq<Record> for Model<S> {
    fn eq(&self, other: &Record) -> bool {
        self.to_record() == *other
    }
}

impl<S: ModelSchema> Display for Model<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_record())
    }
}

impl<S: ModelSchema> Debug for Model<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("model", &S::model_name())
            .field("collection", &self.collection)
            .field("values", &self.to_record())
            .finish()
    }
}
