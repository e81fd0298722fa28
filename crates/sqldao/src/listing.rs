//! Result shapes for `list`.

use crate::value::{Record, Value};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::HashMap;

/// Hashable form of a key value. Reals compare by bit pattern, with `-0.0`
/// folded into `0.0` so it matches `Value`'s own equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum KeyIndex {
    Null,
    Bool(bool),
    Integer(i64),
    Real(u64),
    Text(String),
    Blob(Vec<u8>),
}

impl From<&Value> for KeyIndex {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => KeyIndex::Null,
            Value::Bool(b) => KeyIndex::Bool(*b),
            Value::Integer(i) => KeyIndex::Integer(*i),
            Value::Real(r) if *r == 0.0 => KeyIndex::Real(0.0f64.to_bits()),
            Value::Real(r) => KeyIndex::Real(r.to_bits()),
            Value::Text(s) => KeyIndex::Text(s.clone()),
            Value::Blob(b) => KeyIndex::Blob(b.clone()),
        }
    }
}

/// Rows keyed by their key-column value, in query order.
///
/// A repeated key replaces the earlier row but keeps its position.
/// Serializes as a map from the key's display form to the row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyedRecords {
    entries: Vec<(Value, Record)>,
    index: HashMap<KeyIndex, usize>,
}

impl KeyedRecords {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: Value, record: Record) -> Option<Record> {
        let slot = KeyIndex::from(&key);
        if let Some(&pos) = self.index.get(&slot) {
            return Some(std::mem::replace(&mut self.entries[pos].1, record));
        }
        self.index.insert(slot, self.entries.len());
        self.entries.push((key, record));
        None
    }

    pub fn get(&self, key: &Value) -> Option<&Record> {
        self.index
            .get(&KeyIndex::from(key))
            .map(|&pos| &self.entries[pos].1)
    }

    pub fn contains_key(&self, key: &Value) -> bool {
        self.index.contains_key(&KeyIndex::from(key))
    }

    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &Record> {
        self.entries.iter().map(|(_, record)| record)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Record)> {
        self.entries.iter().map(|(k, record)| (k, record))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for KeyedRecords {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, record) in &self.entries {
            map.serialize_entry(&key.to_string(), record)?;
        }
        map.end()
    }
}

impl IntoIterator for KeyedRecords {
    type Item = (Value, Record);
    type IntoIter = std::vec::IntoIter<(Value, Record)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// What `list` returns: keyed rows or a plain ordered sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Listing {
    Keyed(KeyedRecords),
    Rows(Vec<Record>),
}

impl Listing {
    pub fn len(&self) -> usize {
        match self {
            Listing::Keyed(keyed) => keyed.len(),
            Listing::Rows(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rows in query order, dropping the keys.
    pub fn into_rows(self) -> Vec<Record> {
        match self {
            Listing::Keyed(keyed) => keyed.into_iter().map(|(_, record)| record).collect(),
            Listing::Rows(rows) => rows,
        }
    }

    pub fn into_keyed(self) -> Option<KeyedRecords> {
        match self {
            Listing::Keyed(keyed) => Some(keyed),
            Listing::Rows(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keyed_replaces_duplicates_in_place() {
        let mut keyed = KeyedRecords::new();
        keyed.insert(Value::Integer(1), Record::new().with("n", "a"));
        keyed.insert(Value::Integer(2), Record::new().with("n", "b"));
        let old = keyed.insert(Value::Integer(1), Record::new().with("n", "c"));

        assert_eq!(old, Some(Record::new().with("n", "a")));
        assert_eq!(keyed.len(), 2);
        let keys: Vec<&Value> = keyed.keys().collect();
        assert_eq!(keys, vec![&Value::Integer(1), &Value::Integer(2)]);
        assert_eq!(
            keyed.get(&Value::Integer(1)).and_then(|r| r.get("n")),
            Some(&Value::Text("c".into()))
        );
    }

    #[test]
    fn listing_into_rows_keeps_order() {
        let mut keyed = KeyedRecords::new();
        keyed.insert(Value::Integer(9), Record::new().with("id", 9));
        keyed.insert(Value::Integer(3), Record::new().with("id", 3));
        let rows = Listing::Keyed(keyed).into_rows();
        let ids: Vec<_> = rows.iter().map(|r| r.get("id").cloned()).collect();
        assert_eq!(ids, vec![Some(Value::Integer(9)), Some(Value::Integer(3))]);
    }

    #[test]
    fn keyed_lookup_follows_value_equality() {
        let mut keyed = KeyedRecords::new();
        keyed.insert(Value::Real(-0.0), Record::new().with("n", "zero"));
        keyed.insert(Value::Text("1".into()), Record::new().with("n", "text"));
        keyed.insert(Value::Integer(1), Record::new().with("n", "int"));

        assert_eq!(keyed.len(), 3);
        assert!(keyed.contains_key(&Value::Real(0.0)));
        assert_eq!(
            keyed.get(&Value::Integer(1)).and_then(|r| r.get("n")),
            Some(&Value::Text("int".into()))
        );
        assert!(!keyed.contains_key(&Value::Integer(2)));
    }

    #[test]
    fn keyed_serializes_as_map_in_query_order() {
        let mut keyed = KeyedRecords::new();
        keyed.insert(Value::Integer(2), Record::new().with("id", 2).with("name", "b"));
        keyed.insert(Value::Integer(1), Record::new().with("id", 1).with("name", "a"));
        keyed.insert(Value::Integer(2), Record::new().with("id", 2).with("name", "c"));

        let text = serde_json::to_string(&Listing::Keyed(keyed)).unwrap();
        assert_eq!(
            text,
            r#"{"2":{"id":2,"name":"c"},"1":{"id":1,"name":"a"}}"#
        );
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["1"], json!({"id": 1, "name": "a"}));
    }
}
