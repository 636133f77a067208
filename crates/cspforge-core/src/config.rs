//! The (enforce, report) policy pair and its request-scoped mutations.
//!
//! `Config` is meant to be built once as a template and never mutated by
//! requests directly: `render` clones it, applies the request's overrides to
//! the clone, and serializes. `compile` is the in-place variant and is atomic.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{CspError, Result};
use crate::overrides::PolicyOverrides;
use crate::policy::Policy;
use crate::rules::Rules;

/// Which of the two policies an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyKind {
    Enforce,
    Report,
}

impl PolicyKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PolicyKind::Enforce => "enforce",
            PolicyKind::Report => "report",
        }
    }

    /// Parse a role name; `operation` names the caller in the error.
    pub fn parse_for(s: &str, operation: &'static str) -> Result<Self> {
        match s {
            "enforce" => Ok(PolicyKind::Enforce),
            "report" => Ok(PolicyKind::Report),
            other => Err(CspError::InvalidPolicyKind {
                kind: other.to_string(),
                operation,
            }),
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyKind {
    type Err = CspError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_for(s, "policy")
    }
}

/// Target of a reset: one policy or both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearTarget {
    Enforce,
    Report,
    All,
}

impl ClearTarget {
    pub fn as_str(self) -> &'static str {
        match self {
            ClearTarget::Enforce => "enforce",
            ClearTarget::Report => "report",
            ClearTarget::All => "all",
        }
    }
}

impl From<PolicyKind> for ClearTarget {
    fn from(kind: PolicyKind) -> Self {
        match kind {
            PolicyKind::Enforce => ClearTarget::Enforce,
            PolicyKind::Report => ClearTarget::Report,
        }
    }
}

impl FromStr for ClearTarget {
    type Err = CspError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "all" => Ok(ClearTarget::All),
            other => PolicyKind::parse_for(other, "reset").map(Into::into),
        }
    }
}

/// Startup rule mappings, keyed by role. Missing roles start empty.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyMap {
    #[serde(default)]
    pub enforce: Rules,
    #[serde(default)]
    pub report: Rules,
}

/// Compiled header values; an empty string means "omit this header".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CspHeaders {
    pub enforce: String,
    pub report: String,
}

impl CspHeaders {
    pub fn get(&self, kind: PolicyKind) -> &str {
        match kind {
            PolicyKind::Enforce => &self.enforce,
            PolicyKind::Report => &self.report,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.enforce.is_empty() && self.report.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    enforce: Policy,
    report: Policy,
}

impl From<PolicyMap> for Config {
    fn from(map: PolicyMap) -> Self {
        Self::new(map.enforce, map.report)
    }
}

impl Config {
    pub fn new(enforce: Rules, report: Rules) -> Self {
        Self {
            enforce: Policy::new(enforce),
            report: Policy::new(report),
        }
    }

    pub fn policy(&self, kind: PolicyKind) -> &Policy {
        match kind {
            PolicyKind::Enforce => &self.enforce,
            PolicyKind::Report => &self.report,
        }
    }

    pub fn policy_mut(&mut self, kind: PolicyKind) -> &mut Policy {
        match kind {
            PolicyKind::Enforce => &mut self.enforce,
            PolicyKind::Report => &mut self.report,
        }
    }

    /// Look up a policy by role name (`enforce` or `report`).
    pub fn policy_named(&self, role: &str) -> Result<&Policy> {
        PolicyKind::parse_for(role, "get").map(|kind| self.policy(kind))
    }

    pub fn clear_policy(&mut self, target: ClearTarget) {
        tracing::debug!(reset = target.as_str(), "csp policy reset");
        match target {
            ClearTarget::Enforce => {
                self.enforce.clear();
            }
            ClearTarget::Report => {
                self.report.clear();
            }
            ClearTarget::All => {
                self.enforce.clear();
                self.report.clear();
            }
        }
    }

    /// Merge `add` into one policy; dedup is left to `parse`.
    pub fn add_to_policy(&mut self, add: &Rules, kind: PolicyKind) {
        tracing::debug!(policy = %kind, directives = add.len(), "csp rules added");
        self.policy_mut(kind).merge(add);
    }

    /// Remove values from existing directives.
    ///
    /// The diff is applied to *both* policies whatever `kind` says: a value
    /// removed for one role is removed for the other as well. Directives the
    /// policies don't carry are ignored.
    pub fn remove_from_policy(&mut self, remove: &Rules, kind: PolicyKind) {
        tracing::debug!(policy = %kind, directives = remove.len(), "csp rules removed from both policies");
        self.enforce.subtract(remove);
        self.report.subtract(remove);
    }

    /// Apply overrides (reset, then removals, then additions) and validate
    /// both policies. On error `self` is unchanged.
    pub fn compile(&mut self, overrides: &PolicyOverrides) -> Result<()> {
        let mut next = self.clone();
        next.apply_and_parse(overrides)?;
        *self = next;
        Ok(())
    }

    /// Header values of an already compiled config.
    pub fn headers(&self) -> Result<CspHeaders> {
        Ok(CspHeaders {
            enforce: self.enforce.raw_header_value()?,
            report: self.report.raw_header_value()?,
        })
    }

    /// Compile a per-request copy of this template and serialize it.
    pub fn render(&self, overrides: &PolicyOverrides) -> Result<CspHeaders> {
        let mut scoped = self.clone();
        scoped.apply_and_parse(overrides)?;
        scoped.headers()
    }

    fn apply_and_parse(&mut self, overrides: &PolicyOverrides) -> Result<()> {
        if let Some(target) = overrides.reset {
            self.clear_policy(target);
        }
        for (kind, rules) in &overrides.remove {
            self.remove_from_policy(rules, *kind);
        }
        for (kind, rules) in &overrides.add {
            self.add_to_policy(rules, *kind);
        }
        self.enforce.parse()?;
        self.report.parse()?;
        Ok(())
    }
}
