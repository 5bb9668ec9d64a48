use crate::common::Value;
use indexmap::map::{IntoIter, Iter};
use indexmap::IndexMap;
use std::fmt::{Debug, Display, Formatter};

/// An insertion-ordered mapping of names to values.
///
/// A `Record` is one line of the remote store's JSON-lines protocol: the codec
/// parses every response line into a record and serializes records for writes.
/// Models are constructed from records and export their mapping view as one.
///
/// # Usage
/// ```text
/// let mut record = Record::new();
/// record.put("_key", "foo");
/// record.put("value", 10);
///
/// let same = record! { "_key": "foo", "value": 10 };
/// assert_eq!(record, same);
/// ```
#[derive(Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Record {
    entries: IndexMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Record {
            entries: IndexMap::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Record {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    /// Inserts or replaces the value stored under `name`.
    pub fn put<T: Into<Value>>(&mut self, name: &str, value: T) {
        self.entries.insert(name.to_string(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    /// Removes `name`, keeping the order of the remaining entries.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.entries.shift_remove(name)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    pub fn iter(&self) -> Iter<'_, String, Value> {
        self.entries.iter()
    }

    /// Copies every entry of `other` into this record, overwriting on conflict.
    pub fn merge(&mut self, other: &Record) {
        for (name, value) in other.iter() {
            self.entries.insert(name.clone(), value.clone());
        }
    }
}

impl IntoIterator for Record {
    type Item = (String, Value);
    type IntoIter = IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = (&'a String, &'a Value);
    type IntoIter = Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Record {
            entries: iter.into_iter().collect(),
        }
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Map(record.entries)
    }
}

impl Debug for Record {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

impl Display for Record {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => write!(f, "{}", json),
            Err(_) => Err(std::fmt::Error),
        }
    }
}

/// Builds a [`Record`] from `"name": value` pairs.
///
/// ```text
/// let record = record! { "_key": "foo", "value": "foo_value" };
/// ```
#[macro_export]
macro_rules! record {
    () => {
        $crate::common::Record::new()
    };

    ($($key:literal : $value:expr),* $(,)?) => {
        {
            let mut record = $crate::common::Record::new();
            $(
                record.put($key, $value);
            )*
            record
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record;

    #[test]
    fn test_put_and_get() {
        let mut record = Record::new();
        record.put("value", "foo_value");
        record.put("count", 3);
        assert_eq!(record.get("value"), Some(&Value::from("foo_value")));
        assert_eq!(record.get("count"), Some(&Value::I64(3)));
        assert_eq!(record.get("missing"), None);
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let record = record! { "z": 1, "a": 2, "m": 3 };
        let keys: Vec<&String> = record.keys().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut record = record! { "a": 1, "b": 2, "c": 3 };
        assert_eq!(record.remove("b"), Some(Value::I64(2)));
        let keys: Vec<&String> = record.keys().collect();
        assert_eq!(keys, vec!["a", "c"]);
    }

    #[test]
    fn test_merge_overwrites() {
        let mut record = record! { "_key": "bar", "value": "old" };
        record.merge(&record! { "value": "new", "prop": "p" });
        assert_eq!(record, record! { "_key": "bar", "value": "new", "prop": "p" });
    }

    #[test]
    fn test_empty_macro() {
        let record = record!();
        assert!(record.is_empty());
    }

    #[test]
    fn test_display_is_json() {
        let record = record! { "_key": "foo", "n": 1 };
        assert_eq!(record.to_string(), r#"{"_key":"foo","n":1}"#);
    }
}
