//! Insertion-ordered field records with last-write-wins merge semantics.
//!
//! Each extraction pass over a page produces its own partial [`Record`];
//! [`Record::merged`] combines them, with later parts overwriting earlier
//! ones per key. No pass mutates another pass's output.

/// A flat mapping of field name to string value, preserving the order in
/// which keys were first inserted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing the value in place if the key already exists.
    /// A replaced key keeps its original position.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Combine pass outputs into one record. Later parts win on key
    /// collision; within a part, insertion order is preserved.
    pub fn merged<I>(parts: I) -> Record
    where
        I: IntoIterator<Item = Record>,
    {
        let mut out = Record::new();
        for part in parts {
            for (key, value) in part.fields {
                out.set(key, value);
            }
        }
        out
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut rec = Record::new();
        for (k, v) in iter {
            rec.set(k, v);
        }
        rec
    }
}
