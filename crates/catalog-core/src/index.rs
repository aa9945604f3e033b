//! In-memory catalog index.
//!
//! The index maps entry codes to their descriptive fields and keeps the order
//! in which codes appear in the storage document. That order is what ties in
//! the ranking fall back to.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

use crate::config::SearchConfig;
use crate::search::fold_case;

/// One catalog record: a searchable name followed by metadata fields
/// (frequency, start date, end date, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    fields: Vec<String>,
    /// Case-folded copy of the name, computed once at load.
    folded_name: String,
}

impl Entry {
    pub fn new(fields: Vec<String>) -> Self {
        let folded_name = fields
            .first()
            .map(String::as_str)
            .map(fold_case)
            .unwrap_or_default();
        Self {
            fields,
            folded_name,
        }
    }

    /// The searchable name (field 0). Empty when the record has no fields.
    pub fn name(&self) -> &str {
        self.fields.first().map(String::as_str).unwrap_or("")
    }

    pub fn folded_name(&self) -> &str {
        &self.folded_name
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn field(&self, position: usize) -> Option<&str> {
        self.fields.get(position).map(String::as_str)
    }

    /// The first three fields, padded with empty strings.
    pub fn summary(&self) -> [String; SearchConfig::PROJECTED_FIELDS] {
        std::array::from_fn(|i| self.field(i).unwrap_or_default().to_string())
    }
}

/// Ordered mapping from entry code to [`Entry`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Index {
    entries: Vec<(String, Entry)>,
    positions: HashMap<String, usize>,
}

impl Index {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert or replace an entry.
    ///
    /// A replaced code keeps its original position.
    pub fn insert(&mut self, code: impl Into<String>, fields: Vec<String>) {
        let code = code.into();
        let entry = Entry::new(fields);
        match self.positions.get(&code) {
            Some(&position) => self.entries[position].1 = entry,
            None => {
                self.positions.insert(code.clone(), self.entries.len());
                self.entries.push((code, entry));
            }
        }
    }

    pub fn get(&self, code: &str) -> Option<&Entry> {
        self.positions
            .get(code)
            .map(|&position| &self.entries[position].1)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.positions.contains_key(code)
    }

    /// Position of a code in document order.
    pub fn position(&self, code: &str) -> Option<usize> {
        self.positions.get(code).copied()
    }

    /// Entries in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries
            .iter()
            .map(|(code, entry)| (code.as_str(), entry))
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(code, _)| code.as_str())
    }
}

impl<C, F> FromIterator<(C, Vec<F>)> for Index
where
    C: Into<String>,
    F: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (C, Vec<F>)>>(iter: I) -> Self {
        let mut index = Index::new();
        for (code, fields) in iter {
            index.insert(code, fields.into_iter().map(Into::into).collect());
        }
        index
    }
}

impl Serialize for Index {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (code, entry) in &self.entries {
            map.serialize_entry(code, entry.fields())?;
        }
        map.end()
    }
}

struct IndexVisitor;

impl<'de> Visitor<'de> for IndexVisitor {
    type Value = Index;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an object mapping entry codes to arrays of strings")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Index, A::Error> {
        let mut index = Index::new();
        while let Some((code, fields)) = access.next_entry::<String, Vec<String>>()? {
            index.insert(code, fields);
        }
        Ok(index)
    }
}

impl<'de> Deserialize<'de> for Index {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(IndexVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_keeps_document_order() {
        let json = r#"{
            "Z9": ["Zeta", "MONTHLY", "2001-01"],
            "A1": ["Alpha", "DAILY", "2002-01", "2024-01"],
            "M5": ["Mu", "YEARLY", "2003"]
        }"#;
        let index: Index = serde_json::from_str(json).unwrap();
        let codes: Vec<&str> = index.codes().collect();
        assert_eq!(codes, vec!["Z9", "A1", "M5"]);
        assert_eq!(index.get("A1").unwrap().name(), "Alpha");
        assert_eq!(index.position("M5"), Some(2));
    }

    #[test]
    fn test_duplicate_code_keeps_first_position_last_value() {
        let json = r#"{"A": ["first"], "B": ["b"], "A": ["second"]}"#;
        let index: Index = serde_json::from_str(json).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.position("A"), Some(0));
        assert_eq!(index.get("A").unwrap().name(), "second");
    }

    #[test]
    fn test_rejects_wrong_shape() {
        assert!(serde_json::from_str::<Index>(r#"["A1", "A2"]"#).is_err());
        assert!(serde_json::from_str::<Index>(r#"{"A1": "Consumer"}"#).is_err());
        assert!(serde_json::from_str::<Index>(r#"{"A1": [1, 2]}"#).is_err());
    }

    #[test]
    fn test_serialize_roundtrip_preserves_order() {
        let index: Index = vec![
            ("B2", vec!["Beta", "MONTHLY", "2010-01"]),
            ("A1", vec!["Alpha", "DAILY", "2011-01"]),
        ]
        .into_iter()
        .collect();
        let json = serde_json::to_string(&index).unwrap();
        assert!(json.find("B2").unwrap() < json.find("A1").unwrap());
        let back: Index = serde_json::from_str(&json).unwrap();
        assert_eq!(back, index);
    }

    #[test]
    fn test_entry_summary_pads_missing_fields() {
        let entry = Entry::new(vec!["Only Name".to_string()]);
        assert_eq!(
            entry.summary(),
            ["Only Name".to_string(), String::new(), String::new()]
        );

        let empty = Entry::new(Vec::new());
        assert_eq!(empty.name(), "");
        assert_eq!(empty.folded_name(), "");
    }

    #[test]
    fn test_folded_name_is_lowercase() {
        let entry = Entry::new(vec!["Consumer PRICE Index".to_string()]);
        assert_eq!(entry.folded_name(), "consumer price index");

        let turkish = Entry::new(vec!["İhracat Birim Değer Endeksi".to_string()]);
        assert_eq!(turkish.folded_name(), "ihracat birim değer endeksi");
        assert_eq!(turkish.name(), "İhracat Birim Değer Endeksi");
    }
}
