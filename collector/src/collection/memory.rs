use crate::codec::{JsonLinesCodec, Payload};
use crate::collection::CollectionProvider;
use crate::common::{
    get_current_time_or_zero, QueryParam, Record, Value, KEY_FIELD, PARAM_END_TS, PARAM_KEY,
    PARAM_META, PARAM_PREFIX, PARAM_PREFIX_COUNT, PARAM_START_TS, TS_FIELD,
};
use crate::errors::{CollectorError, CollectorResult, ErrorKind};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Process-local collection that speaks the remote store's wire protocol.
///
/// # Purpose
/// Lets models run against a store without a network: reads understand the
/// same query parameters the remote does and answer with JSON-lines text,
/// writes upsert by `_key`. Useful for tests and offline tooling.
///
/// # Characteristics
/// - **Ordered**: records are returned in insertion order
/// - **Upsert**: posting an existing `_key` merges the new values into it
/// - **Identity**: a posted record without `_key` gets a UUID; without `_ts`
///   it gets the current time in milliseconds
/// - **Metadata**: `_key` / `_ts` are only echoed back when requested through
///   `meta` parameters
/// - **Thread-Safe**: clones share the same records behind a lock
///
/// # Read parameters
/// - `key`: select records by key; repeated values are alternatives
/// - `prefix`: select records whose key starts with the prefix
/// - `prefixcount`: at most this many hits per prefix, for the prefixes listed
///   since the previous `prefixcount`
/// - `startts` / `endts`: `_ts` lower bound (inclusive) and upper bound (exclusive)
/// - `meta`: metadata field to include in every hit
#[derive(Clone)]
pub struct InMemoryCollection {
    name: String,
    records: Arc<RwLock<Vec<Record>>>,
}

impl InMemoryCollection {
    /// Creates an empty collection.
    pub fn new(name: &str) -> Self {
        InMemoryCollection {
            name: name.to_string(),
            records: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Creates a collection seeded with `records`, stored exactly as given.
    pub fn with_records(name: &str, records: Vec<Record>) -> Self {
        InMemoryCollection {
            name: name.to_string(),
            records: Arc::new(RwLock::new(records)),
        }
    }

    /// Returns a snapshot of every stored record, metadata included.
    pub fn records(&self) -> Vec<Record> {
        self.records.read().clone()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    fn upsert(&self, record: &Record) {
        let mut records = self.records.write();
        let key = key_of(record);

        if let Some(key) = &key {
            if let Some(existing) = records
                .iter_mut()
                .find(|existing| key_of(existing).as_deref() == Some(key.as_str()))
            {
                existing.merge(record);
                return;
            }
        }

        let mut entry = Record::with_capacity(record.len() + 2);
        entry.put(KEY_FIELD, key.unwrap_or_else(|| Uuid::new_v4().to_string()));
        if !record.contains_key(TS_FIELD) {
            entry.put(TS_FIELD, get_current_time_or_zero());
        }
        entry.merge(record);
        records.push(entry);
    }
}

impl CollectionProvider for InMemoryCollection {
    fn request(&self, params: &[QueryParam]) -> CollectorResult<String> {
        log::debug!("Requesting in-memory collection {}: {:?}", self.name, params);
        let filter = ReadFilter::parse(params)?;
        let records = self.records.read();

        let mut prefix_hits = HashMap::new();
        let mut hits = Vec::new();
        for record in records.iter() {
            if filter.matches(record, &mut prefix_hits) {
                hits.push(filter.project(record));
            }
        }
        JsonLinesCodec::serialize_records(&hits)
    }

    fn post(&self, payload: &Payload) -> CollectorResult<String> {
        log::debug!("Posting to in-memory collection {}: {:?}", self.name, payload);
        for record in payload.records() {
            self.upsert(record);
        }
        Ok(String::new())
    }

    fn delete(&self, key: &str) -> CollectorResult<String> {
        log::debug!("Deleting: {}.", key);
        self.records
            .write()
            .retain(|record| key_of(record).as_deref() != Some(key));
        Ok(String::new())
    }

    fn name(&self) -> String {
        self.name.clone()
    }
}

fn key_of(record: &Record) -> Option<String> {
    match record.get(KEY_FIELD) {
        None | Some(Value::Null) => None,
        Some(value) => Some(value.to_string()),
    }
}

#[derive(Default)]
struct PrefixGroup {
    prefixes: Vec<String>,
    count: Option<usize>,
}

#[derive(Default)]
struct ReadFilter {
    keys: Vec<String>,
    prefix_groups: Vec<PrefixGroup>,
    start_ts: Option<i64>,
    end_ts: Option<i64>,
    meta: Vec<String>,
}

impl ReadFilter {
    fn parse(params: &[QueryParam]) -> CollectorResult<Self> {
        let mut filter = ReadFilter::default();
        for (name, value) in params {
            match name.as_str() {
                PARAM_KEY => filter.keys.push(value.clone()),
                PARAM_PREFIX => {
                    let open_group = filter
                        .prefix_groups
                        .last()
                        .is_some_and(|group| group.count.is_none());
                    if !open_group {
                        filter.prefix_groups.push(PrefixGroup::default());
                    }
                    if let Some(group) = filter.prefix_groups.last_mut() {
                        group.prefixes.push(value.clone());
                    }
                }
                PARAM_PREFIX_COUNT => {
                    let count = parse_number::<usize>(name, value)?;
                    match filter.prefix_groups.last_mut() {
                        Some(group) if group.count.is_none() => group.count = Some(count),
                        _ => log::warn!("Ignoring {} without a preceding prefix", name),
                    }
                }
                PARAM_START_TS => filter.start_ts = Some(parse_number::<i64>(name, value)?),
                PARAM_END_TS => filter.end_ts = Some(parse_number::<i64>(name, value)?),
                PARAM_META => filter.meta.push(value.clone()),
                _ => log::debug!("Ignoring unsupported parameter {}={}", name, value),
            }
        }
        Ok(filter)
    }

    fn matches(&self, record: &Record, prefix_hits: &mut HashMap<(usize, usize), usize>) -> bool {
        let key = key_of(record).unwrap_or_default();

        if !self.keys.is_empty() && !self.keys.contains(&key) {
            return false;
        }

        if self.start_ts.is_some() || self.end_ts.is_some() {
            let ts = match record.get(TS_FIELD).and_then(Value::as_integer) {
                Some(ts) => ts,
                None => return false,
            };
            if self.start_ts.is_some_and(|start| ts < start) {
                return false;
            }
            if self.end_ts.is_some_and(|end| ts >= end) {
                return false;
            }
        }

        if self.prefix_groups.is_empty() {
            return true;
        }

        for (group_index, group) in self.prefix_groups.iter().enumerate() {
            for (prefix_index, prefix) in group.prefixes.iter().enumerate() {
                if !key.starts_with(prefix.as_str()) {
                    continue;
                }
                let hits = prefix_hits.entry((group_index, prefix_index)).or_insert(0);
                if group.count.map_or(true, |count| *hits < count) {
                    *hits += 1;
                    return true;
                }
            }
        }
        false
    }

    fn project(&self, record: &Record) -> Record {
        record
            .iter()
            .filter(|(name, _)| {
                let is_meta = name.as_str() == KEY_FIELD || name.as_str() == TS_FIELD;
                !is_meta || self.meta.iter().any(|meta| meta == *name)
            })
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> CollectorResult<T> {
    value.trim().parse::<T>().map_err(|_| {
        log::error!("Invalid value {} for parameter {}", value, name);
        CollectorError::new(
            &format!("Invalid value {} for parameter {}", value, name),
            ErrorKind::InvalidQueryParameter,
        )
    })
}
