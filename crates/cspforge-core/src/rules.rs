//! Insertion-ordered directive → values map.
//!
//! Keys stay raw strings: a mapping may carry names outside the catalog, and
//! only `Policy::parse` decides whether they are legal. Header output follows
//! insertion order, so the map never reorders keys.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::grammar::unquote;

/// Raw CSP rules: directive name → value list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rules {
    entries: Vec<(String, Vec<String>)>,
}

impl Rules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, directive: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(k, _)| k == directive)
            .map(|(_, v)| v.as_slice())
    }

    pub fn contains_key(&self, directive: &str) -> bool {
        self.get(directive).is_some()
    }

    /// Replace the values of `directive`, keeping its position; new keys are appended.
    pub fn insert(&mut self, directive: impl Into<String>, values: Vec<String>) {
        let directive = directive.into();
        match self.entries.iter_mut().find(|(k, _)| *k == directive) {
            Some((_, v)) => *v = values,
            None => self.entries.push((directive, values)),
        }
    }

    /// Append values to `directive`, creating it if missing. Duplicates are kept.
    pub fn append(&mut self, directive: impl Into<String>, values: impl IntoIterator<Item = String>) {
        let directive = directive.into();
        match self.entries.iter_mut().find(|(k, _)| *k == directive) {
            Some((_, v)) => v.extend(values),
            None => self.entries.push((directive, values.into_iter().collect())),
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// List union per key: shared keys concatenate, new keys are appended.
    pub fn merge(&mut self, other: &Rules) {
        for (k, v) in other.iter() {
            self.append(k, v.iter().cloned());
        }
    }

    /// Set difference per key, only for keys already present here.
    ///
    /// Values compare on their unquoted form, so `self` also removes `'self'`.
    pub fn subtract(&mut self, other: &Rules) {
        for (k, current) in self.entries.iter_mut() {
            let Some(remove) = other.get(k) else {
                continue;
            };
            current.retain(|v| !remove.iter().any(|r| unquote(r) == unquote(v)));
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for Rules
where
    K: Into<String>,
    V: IntoIterator<Item = S>,
    S: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut rules = Rules::new();
        for (k, v) in iter {
            rules.insert(k, v.into_iter().map(Into::into).collect());
        }
        rules
    }
}

impl Serialize for Rules {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Accepts either a list or a single string per directive.
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

struct RulesVisitor;

impl<'de> Visitor<'de> for RulesVisitor {
    type Value = Rules;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of directive names to value lists")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Rules, A::Error> {
        let mut rules = Rules::new();
        while let Some((k, v)) = access.next_entry::<String, OneOrMany>()? {
            let values = match v {
                OneOrMany::One(s) => vec![s],
                OneOrMany::Many(v) => v,
            };
            rules.append(k, values);
        }
        Ok(rules)
    }
}

impl<'de> Deserialize<'de> for Rules {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RulesVisitor)
    }
}
