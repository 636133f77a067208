//! Minimal user-agent sniffing: browser family and major version only.

use once_cell::sync::Lazy;
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Browser {
    Chrome,
    Firefox,
    Msie,
    Safari,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserAgent {
    pub browser: Browser,
    /// Major version, 0 when the agent string carries none.
    pub major: u32,
}

// Checked in order: Chrome agents also mention Safari, and some IE agents
// mention Mozilla-style tokens.
static PATTERNS: Lazy<Vec<(Browser, Regex)>> = Lazy::new(|| {
    [
        (Browser::Msie, r"MSIE (\d+)|Trident/\d+"),
        (Browser::Firefox, r"Firefox/(\d+)"),
        (Browser::Chrome, r"(?:Chrome|CriOS)/(\d+)"),
        (Browser::Safari, r"Version/(\d+).*Safari/"),
    ]
    .into_iter()
    .filter_map(|(b, p)| Regex::new(p).ok().map(|re| (b, re)))
    .collect()
});

impl UserAgent {
    pub const UNKNOWN: UserAgent = UserAgent {
        browser: Browser::Unknown,
        major: 0,
    };

    pub fn parse(ua: &str) -> Self {
        for (browser, re) in PATTERNS.iter() {
            if let Some(caps) = re.captures(ua) {
                let major = caps
                    .get(1)
                    .and_then(|m| m.as_str().parse().ok())
                    .unwrap_or(0);
                return UserAgent {
                    browser: *browser,
                    major,
                };
            }
        }
        Self::UNKNOWN
    }
}
