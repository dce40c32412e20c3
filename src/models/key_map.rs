//! Translation of internal field names into the endpoint's parameter names.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::query::FieldValue;

/// Names of crawler properties. A query field with one of these names is
/// always rejected, even when the key map has an entry for it.
pub const RESERVED_FIELDS: &[&str] = &[
    "host",
    "keyMap",
    "key_map",
    "method",
    "defaults",
    "query",
    "transport",
    "parser",
];

/// Internal field name → wire parameter name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyMap(BTreeMap<String, String>);

impl KeyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key map of the timetable listing form.
    pub fn calendar() -> Self {
        [
            ("semesterID", "slt_namhoc"),
            ("subjectID", "slt_mamonhoc_filter"),
            ("subjectClassID", "slt_malopmonhoc_filter"),
            ("subjectName", "slt_monhoc_filter"),
            ("teacherName", "slt_giaovien_filter"),
            ("day", "slt_thu_filter"),
            ("amphitheater", "slt_giangduong_filter"),
        ]
        .into_iter()
        .collect()
    }

    /// Key map of the enrollment grid filters.
    pub fn enrollment() -> Self {
        [
            ("limit", "pageSize"),
            ("semesterID", "SinhvienLmh[term_id]"),
            ("studentID", "SinhvienLmh[masvTitle]"),
            ("studentName", "SinhvienLmh[hotenTitle]"),
            ("studentDateBirth", "SinhvienLmh[ngaysinhTitle]"),
            ("studentOfficialClass", "SinhvienLmh[lopkhoahocTitle]"),
            ("subjectClassID", "SinhvienLmh[tenlopmonhocTitle]"),
            ("subjectClassName", "SinhvienLmh[tenmonhocTitle]"),
            ("subjectGroup", "SinhvienLmh[nhom]"),
            ("subjectCreditNumber", "SinhvienLmh[sotinchiTitle]"),
            ("subjectNote", "SinhvienLmh[ghichu]"),
            ("page", "SinhvienLmh_page"),
        ]
        .into_iter()
        .collect()
    }

    pub fn insert(&mut self, field: impl Into<String>, wire: impl Into<String>) {
        self.0.insert(field.into(), wire.into());
    }

    /// Wire name for `field`, if mapped.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Wire names claimed by more than one field, sorted.
    pub fn collisions(&self) -> Vec<&str> {
        let mut seen: HashMap<&str, usize> = HashMap::new();
        for wire in self.0.values() {
            *seen.entry(wire.as_str()).or_default() += 1;
        }
        let mut dupes: Vec<&str> = seen
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(wire, _)| wire)
            .collect();
        dupes.sort_unstable();
        dupes
    }

    /// Rename every field to its wire name, keeping the input order.
    ///
    /// Fails on the first reserved or unmapped field.
    pub fn translate(&self, fields: Vec<(String, FieldValue)>) -> Result<WireParams> {
        let mut params = Vec::with_capacity(fields.len());
        for (field, value) in fields {
            if RESERVED_FIELDS.contains(&field.as_str()) {
                return Err(AppError::reserved(field));
            }
            let wire = self.get(&field).ok_or_else(|| AppError::unmapped(&field))?;
            params.push((wire.to_string(), value));
        }
        Ok(WireParams(params))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for KeyMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Ordered wire parameters, ready for a query string or request body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WireParams(Vec<(String, FieldValue)>);

impl WireParams {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Pairs with every value rendered as text, for form bodies.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        self.0.iter().map(|(k, v)| (k.clone(), v.to_string())).collect()
    }

    /// JSON object body; numbers stay numbers.
    pub fn to_json(&self) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = self
            .0
            .iter()
            .map(|(k, v)| {
                let value = match v {
                    FieldValue::Number(n) => serde_json::Value::from(*n),
                    FieldValue::Text(s) => serde_json::Value::from(s.as_str()),
                };
                (k.clone(), value)
            })
            .collect();
        serde_json::Value::Object(map)
    }
}
