//! Per-request override instructions.
//!
//! `RawOverrides` is the loosely typed shape a host attaches to a request
//! (role names as strings). It converts into `PolicyOverrides`, rejecting
//! unknown roles up front.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::config::{ClearTarget, PolicyKind};
use crate::error::{CspError, Result};
use crate::rules::Rules;

/// Typed overrides, applied in field order: reset, remove, add.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyOverrides {
    pub reset: Option<ClearTarget>,
    pub remove: Vec<(PolicyKind, Rules)>,
    pub add: Vec<(PolicyKind, Rules)>,
}

impl PolicyOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reset(mut self, target: ClearTarget) -> Self {
        self.reset = Some(target);
        self
    }

    pub fn with_remove(mut self, kind: PolicyKind, rules: Rules) -> Self {
        self.remove.push((kind, rules));
        self
    }

    pub fn with_add(mut self, kind: PolicyKind, rules: Rules) -> Self {
        self.add.push((kind, rules));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.reset.is_none() && self.remove.is_empty() && self.add.is_empty()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawOverrides {
    #[serde(default)]
    pub reset: Option<String>,
    #[serde(default)]
    pub remove: BTreeMap<String, Rules>,
    #[serde(default)]
    pub add: BTreeMap<String, Rules>,
}

impl TryFrom<RawOverrides> for PolicyOverrides {
    type Error = CspError;

    fn try_from(raw: RawOverrides) -> Result<Self> {
        let reset = raw.reset.as_deref().map(str::parse::<ClearTarget>).transpose()?;
        let remove = roles(raw.remove, "remove")?;
        let add = roles(raw.add, "add")?;
        Ok(Self { reset, remove, add })
    }
}

fn roles(raw: BTreeMap<String, Rules>, operation: &'static str) -> Result<Vec<(PolicyKind, Rules)>> {
    raw.into_iter()
        .map(|(role, rules)| Ok((PolicyKind::parse_for(&role, operation)?, rules)))
        .collect()
}
