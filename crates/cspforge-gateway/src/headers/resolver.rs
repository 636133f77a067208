use cspforge_core::PolicyKind;

use super::user_agent::{Browser, UserAgent};

/// Header names for the enforce and report-only policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderNames {
    pub enforce: &'static str,
    pub report: &'static str,
}

impl HeaderNames {
    pub const MODERN: HeaderNames = HeaderNames {
        enforce: "Content-Security-Policy",
        report: "Content-Security-Policy-Report-Only",
    };

    /// Firefox < 23 and Internet Explorer.
    pub const X_PREFIXED: HeaderNames = HeaderNames {
        enforce: "X-Content-Security-Policy",
        report: "X-Content-Security-Policy-Report-Only",
    };

    /// Chrome < 25 and Safari < 7.
    pub const WEBKIT: HeaderNames = HeaderNames {
        enforce: "X-WebKit-CSP",
        report: "X-WebKit-CSP-Report-Only",
    };

    pub fn get(&self, kind: PolicyKind) -> &'static str {
        match kind {
            PolicyKind::Enforce => self.enforce,
            PolicyKind::Report => self.report,
        }
    }
}

/// Picks header names per client.
#[derive(Debug, Clone, Copy)]
pub struct HeaderNameResolver {
    legacy: bool,
}

impl Default for HeaderNameResolver {
    fn default() -> Self {
        Self::new(true)
    }
}

impl HeaderNameResolver {
    /// With `legacy == false` every client gets the modern names.
    pub fn new(legacy: bool) -> Self {
        Self { legacy }
    }

    pub fn resolve(&self, user_agent: Option<&str>) -> HeaderNames {
        if !self.legacy {
            return HeaderNames::MODERN;
        }
        match user_agent {
            Some(ua) => names_for(UserAgent::parse(ua)),
            None => HeaderNames::MODERN,
        }
    }

    pub fn enforce_header_name(&self, user_agent: Option<&str>) -> &'static str {
        self.resolve(user_agent).enforce
    }

    pub fn report_header_name(&self, user_agent: Option<&str>) -> &'static str {
        self.resolve(user_agent).report
    }
}

pub fn names_for(ua: UserAgent) -> HeaderNames {
    match ua.browser {
        Browser::Chrome if ua.major >= 25 => HeaderNames::MODERN,
        Browser::Chrome => HeaderNames::WEBKIT,
        Browser::Firefox if ua.major >= 23 => HeaderNames::MODERN,
        Browser::Firefox => HeaderNames::X_PREFIXED,
        Browser::Msie => HeaderNames::X_PREFIXED,
        Browser::Safari if ua.major >= 7 => HeaderNames::MODERN,
        Browser::Safari => HeaderNames::WEBKIT,
        Browser::Unknown => HeaderNames::MODERN,
    }
}
