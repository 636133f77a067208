//! CSP 1.0 directive catalog and value grammars.
//!
//! Matching rules:
//! - Keywords are matched exactly (`self`, not `SELF`), either bare or already
//!   wrapped in single quotes.
//! - Host and report-uri grammars are case-insensitive.
//! - A domain-style host must carry a dot or the literal `localhost`.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{CspError, Result};

/// `sandbox` tokens allowed by CSP 1.0.
pub const SANDBOX_TOKENS: [&str; 4] = [
    "allow-forms",
    "allow-same-origin",
    "allow-scripts",
    "allow-top-navigation",
];

const NONE: &str = "none";
const WILDCARD: &str = "*";

/// A directive from the closed CSP 1.0 catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Directive {
    ReportUri,
    Sandbox,
    ConnectSrc,
    DefaultSrc,
    FontSrc,
    FrameSrc,
    ImgSrc,
    MediaSrc,
    ObjectSrc,
    ScriptSrc,
    StyleSrc,
}

impl Directive {
    /// Every catalog entry, in catalog order.
    pub const ALL: [Directive; 11] = [
        Directive::ReportUri,
        Directive::Sandbox,
        Directive::ConnectSrc,
        Directive::DefaultSrc,
        Directive::FontSrc,
        Directive::FrameSrc,
        Directive::ImgSrc,
        Directive::MediaSrc,
        Directive::ObjectSrc,
        Directive::ScriptSrc,
        Directive::StyleSrc,
    ];

    /// Directive name as it appears in the header.
    pub fn as_str(self) -> &'static str {
        match self {
            Directive::ReportUri => "report-uri",
            Directive::Sandbox => "sandbox",
            Directive::ConnectSrc => "connect-src",
            Directive::DefaultSrc => "default-src",
            Directive::FontSrc => "font-src",
            Directive::FrameSrc => "frame-src",
            Directive::ImgSrc => "img-src",
            Directive::MediaSrc => "media-src",
            Directive::ObjectSrc => "object-src",
            Directive::ScriptSrc => "script-src",
            Directive::StyleSrc => "style-src",
        }
    }

    /// Look up a directive by its header name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.as_str() == name)
    }

    /// Keyword vocabulary. For source directives these are rendered quoted;
    /// for `sandbox` they are the only legal values.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Directive::ReportUri => &[],
            Directive::Sandbox => &SANDBOX_TOKENS,
            Directive::ScriptSrc => &["none", "self", "unsafe-eval", "unsafe-inline"],
            Directive::StyleSrc => &["none", "self", "unsafe-inline"],
            Directive::ConnectSrc
            | Directive::DefaultSrc
            | Directive::FontSrc
            | Directive::FrameSrc
            | Directive::ImgSrc
            | Directive::MediaSrc
            | Directive::ObjectSrc => &["none", "self"],
        }
    }

    /// True for the nine `*-src` directives sharing the host-source grammar.
    pub fn is_source(self) -> bool {
        !matches!(self, Directive::ReportUri | Directive::Sandbox)
    }

    /// Whether `value` (bare or quoted) is a keyword of this directive.
    pub fn is_keyword(self, value: &str) -> bool {
        let bare = unquote(value);
        self.keywords().iter().any(|k| *k == bare)
    }

    /// Whether `'none'` is meaningful here (it denies everything else).
    pub fn allows_none(self) -> bool {
        self.keywords().contains(&NONE)
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Directive {
    type Err = CspError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s).ok_or_else(|| CspError::InvalidDirectiveName {
            directive: s.to_string(),
        })
    }
}

/// Strip one pair of surrounding single quotes, if present.
pub fn unquote(value: &str) -> &str {
    value
        .strip_prefix('\'')
        .and_then(|v| v.strip_suffix('\''))
        .unwrap_or(value)
}

/// Wrap a keyword in single quotes for output.
pub fn quote(keyword: &str) -> String {
    format!("'{}'", unquote(keyword))
}

pub(crate) fn is_none(value: &str) -> bool {
    unquote(value) == NONE
}

pub(crate) fn is_wildcard(value: &str) -> bool {
    value == WILDCARD
}

// Domain/IPv4 hosts are captured as `name` so the dot-or-localhost rule can be
// checked outside the regex (no look-around support).
#[allow(clippy::expect_used)]
static HOST_SOURCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?ix)
        ^(?:https?://)?
        (?:
            (?P<name>(?:\*\.)?(?:[a-z0-9-][a-z0-9.-]*|%[a-f0-9]{2}))
          | \[(?:[a-f0-9]{0,4}:)*[a-f0-9]{0,4}\]
        )
        (?::[0-9]+)?$",
    )
    .expect("host-source pattern is a literal")
});

#[allow(clippy::expect_used)]
static REPORT_URI: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?ix)
        ^(?:
            (?:https?://)?
            (?:
                (?P<name>[a-z0-9-][a-z0-9.-]*|%[a-f0-9]{2})
              | \[(?:[a-f0-9]{0,4}:)*[a-f0-9]{0,4}\]
            )
            (?::[0-9]+)?
            (?:/(?:[-a-z0-9_!\#$&'()*+,./:;=?@\[\]~]|%[a-f0-9]{2})*)?
          | /(?:[-a-z0-9_!\#$&'()*+,./:;=?@\[\]~]|%[a-f0-9]{2})*
        )$",
    )
    .expect("report-uri pattern is a literal")
});

#[allow(clippy::expect_used)]
static HTTP_SCHEME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^https?://").expect("scheme pattern is a literal"));

/// Everything after an optional `http://`/`https://` prefix.
fn after_scheme(value: &str) -> &str {
    match HTTP_SCHEME.find(value) {
        Some(m) => &value[m.end()..],
        None => value,
    }
}

fn has_dot_or_localhost(rest: &str) -> bool {
    rest.contains('.') || rest.to_ascii_lowercase().contains("localhost")
}

fn matches_host_grammar(re: &Regex, value: &str) -> bool {
    let Some(caps) = re.captures(value) else {
        return false;
    };
    if caps.name("name").is_some() {
        return has_dot_or_localhost(after_scheme(value));
    }
    true
}

/// Host-source grammar: `data:`, a bare `*`, or `[scheme://]host[:port]`.
pub fn is_host_source(value: &str) -> bool {
    if value.eq_ignore_ascii_case("data:") || is_wildcard(value) {
        return true;
    }
    matches_host_grammar(&HOST_SOURCE, value)
}

/// report-uri grammar: an absolute URL without credentials, or a bare
/// absolute path with optional query.
pub fn is_report_uri(value: &str) -> bool {
    matches_host_grammar(&REPORT_URI, value)
}
