//! One CSP policy (enforce or report-only): raw rules, validation, serialization.
//!
//! A policy moves between two states. Construction and every mutation leave it
//! `Unvalidated`; a successful `parse` makes it `Validated` and only then can it
//! be serialized. Empty policies are trivially valid.

use std::collections::HashSet;

use crate::error::{CspError, Result};
use crate::grammar::{self, Directive};
use crate::rules::Rules;

/// Validation state of a policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyState {
    Unvalidated,
    Validated,
}

/// How `Policy::apply` changes one directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOp {
    /// Append values after the existing ones.
    Add(Vec<String>),
    /// Overwrite the value list.
    Replace(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    rules: Rules,
    state: PolicyState,
}

impl Default for Policy {
    fn default() -> Self {
        Self::new(Rules::new())
    }
}

impl Policy {
    /// Store `rules` verbatim; nothing is checked until `parse`.
    pub fn new(rules: Rules) -> Self {
        let mut policy = Self {
            rules,
            state: PolicyState::Unvalidated,
        };
        policy.touch();
        policy
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn state(&self) -> PolicyState {
        self.state
    }

    pub fn is_validated(&self) -> bool {
        self.state == PolicyState::Validated
    }

    pub fn clear(&mut self) -> &mut Self {
        self.rules.clear();
        self.touch();
        self
    }

    /// Overwrite one directive by raw name. Unknown names are rejected by `parse`.
    pub fn replace_rules(&mut self, directive: impl Into<String>, values: Vec<String>) -> &mut Self {
        self.rules.insert(directive, values);
        self.touch();
        self
    }

    /// Add to or replace a catalog directive.
    pub fn apply(&mut self, directive: Directive, op: RuleOp) -> &mut Self {
        match op {
            RuleOp::Add(values) => self.rules.append(directive.as_str(), values),
            RuleOp::Replace(values) => self.rules.insert(directive.as_str(), values),
        }
        self.touch();
        self
    }

    pub fn add(&mut self, directive: Directive, value: impl Into<String>) -> &mut Self {
        self.apply(directive, RuleOp::Add(vec![value.into()]))
    }

    pub fn replace<I, S>(&mut self, directive: Directive, values: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.apply(
            directive,
            RuleOp::Replace(values.into_iter().map(Into::into).collect()),
        )
    }

    /// Merge `other` into the raw rules (see `Rules::merge`).
    pub fn merge(&mut self, other: &Rules) -> &mut Self {
        self.rules.merge(other);
        self.touch();
        self
    }

    /// Remove values per directive (see `Rules::subtract`).
    pub fn subtract(&mut self, other: &Rules) -> &mut Self {
        self.rules.subtract(other);
        self.touch();
        self
    }

    /// Validate every directive, dedup its values and quote keywords.
    ///
    /// On error the rules are left exactly as they were.
    pub fn parse(&mut self) -> Result<&mut Self> {
        let mut parsed = Rules::new();
        for (name, values) in self.rules.iter() {
            parsed.insert(name, validate_directive(name, values)?);
        }
        tracing::debug!(directives = parsed.len(), "csp policy validated");
        self.rules = parsed;
        self.state = PolicyState::Validated;
        Ok(self)
    }

    /// Canonical header value: `"<directive> <values>;"` per non-empty directive.
    pub fn raw_header_value(&self) -> Result<String> {
        if self.state != PolicyState::Validated {
            return Err(CspError::Unvalidated);
        }
        let mut out = String::new();
        for (name, values) in self.rules.iter() {
            if values.is_empty() {
                continue;
            }
            out.push_str(name);
            out.push(' ');
            out.push_str(&values.join(" "));
            out.push(';');
        }
        Ok(out)
    }

    fn touch(&mut self) {
        self.state = if self.rules.is_empty() {
            PolicyState::Validated
        } else {
            PolicyState::Unvalidated
        };
    }
}

/// Dedup on the unquoted form, keeping the first occurrence.
fn dedup(values: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .iter()
        .filter(|v| seen.insert(grammar::unquote(v).to_string()))
        .cloned()
        .collect()
}

fn validate_directive(name: &str, values: &[String]) -> Result<Vec<String>> {
    let values = dedup(values);

    let directive = Directive::from_name(name);
    match directive {
        Some(Directive::ReportUri) => {
            if let Some(bad) = values.iter().find(|v| !grammar::is_report_uri(v)) {
                return Err(CspError::InvalidReportUri { value: bad.clone() });
            }
            Ok(values)
        }
        Some(Directive::Sandbox) => {
            if let Some(bad) = values.iter().find(|v| !Directive::Sandbox.is_keyword(v)) {
                return Err(CspError::InvalidSandboxKeyword { value: bad.clone() });
            }
            Ok(values.iter().map(|v| grammar::unquote(v).to_string()).collect())
        }
        Some(d) => validate_sources(d, values),
        None => Err(CspError::InvalidDirectiveName {
            directive: name.to_string(),
        }),
    }
}

fn validate_sources(directive: Directive, values: Vec<String>) -> Result<Vec<String>> {
    if values.len() > 1 {
        if directive.allows_none() && values.iter().any(|v| grammar::is_none(v)) {
            return Err(CspError::ConflictingNoneValue {
                directive: directive.to_string(),
            });
        }
        if values.iter().any(|v| grammar::is_wildcard(v)) {
            return Err(CspError::ConflictingWildcardValue {
                directive: directive.to_string(),
            });
        }
    }

    values
        .into_iter()
        .map(|v| {
            if directive.is_keyword(&v) {
                Ok(grammar::quote(&v))
            } else if grammar::is_host_source(&v) {
                Ok(v)
            } else {
                Err(CspError::InvalidSourceValue {
                    directive: directive.to_string(),
                    value: v,
                })
            }
        })
        .collect()
}
