use crate::{
    Address,
    config::{ConfigSource, NO_PROXY},
};
use std::borrow::Cow;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Ordered list of patterns for which the proxy has to be bypassed.
///
/// Patterns are matched literally as case-sensitive substrings of the
/// full `host:port` address, there is no wildcard expansion, nor any
/// domain or CIDR awareness. This coarse policy means a pattern can match
/// inside a port number or inside an unrelated host, e.g. `1.1.1.1` matches
/// `21.1.1.100:443`.
pub struct BypassList {
    patterns: Vec<String>,
}

impl BypassList {
    /// Parse a raw, comma separated, bypass list.
    ///
    /// Patterns are taken literally: no whitespace is trimmed and
    /// empty segments are kept (and thus match any address).
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw.is_empty() {
            return Self::default();
        }
        Self {
            patterns: raw.split(',').map(ToOwned::to_owned).collect(),
        }
    }

    /// Returns true if the list has no patterns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// The patterns of this list, in order.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(String::as_str)
    }

    /// Returns the first pattern contained in the given address, if any.
    #[must_use]
    pub fn find_match(&self, address: &str) -> Option<&str> {
        self.patterns().find(|pattern| address.contains(pattern))
    }

    /// Returns true if any pattern is contained in the given address.
    #[must_use]
    pub fn matches(&self, address: &str) -> bool {
        self.find_match(address).is_some()
    }
}

#[derive(Debug, Clone)]
/// Decides whether the proxy must be skipped for a target [`Address`].
///
/// The bypass list is read from the [`ConfigSource`] on every call.
pub struct BypassMatcher<S> {
    source: S,
    key: Cow<'static, str>,
}

impl<S> BypassMatcher<S> {
    /// Create a new [`BypassMatcher`] reading the [`NO_PROXY`] key.
    pub const fn new(source: S) -> Self {
        Self {
            source,
            key: Cow::Borrowed(NO_PROXY),
        }
    }

    /// Overwrite the configuration key of the bypass list.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<Cow<'static, str>>) -> Self {
        self.key = key.into();
        self
    }
}

impl<S: ConfigSource> BypassMatcher<S> {
    /// Read the current [`BypassList`].
    pub fn bypass_list(&self) -> BypassList {
        self.source
            .get(&self.key)
            .map(|raw| BypassList::parse(&raw))
            .unwrap_or_default()
    }

    /// Returns true if the proxy must be bypassed for the given [`Address`].
    pub fn is_bypassed(&self, address: &Address) -> bool {
        let list = self.bypass_list();
        if list.is_empty() {
            return false;
        }
        let address = address.to_string();
        match list.find_match(&address) {
            Some(pattern) => {
                tracing::trace!(%address, pattern, "address matches bypass pattern");
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StaticConfig;

    fn matcher(no_proxy: &str) -> BypassMatcher<StaticConfig> {
        BypassMatcher::new(StaticConfig::new().with(NO_PROXY, no_proxy))
    }

    fn addr(s: &str) -> Address {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_literal_patterns() {
        let list = BypassList::parse("127.0.0.1, example.com,,internal");
        assert_eq!(
            list.patterns().collect::<Vec<_>>(),
            ["127.0.0.1", " example.com", "", "internal"]
        );
        assert!(BypassList::parse("").is_empty());
    }

    #[test]
    fn test_unset_or_empty_never_bypasses() {
        let unset = BypassMatcher::new(StaticConfig::new());
        assert!(!unset.is_bypassed(&addr("127.0.0.1:50051")));
        assert!(!matcher("").is_bypassed(&addr("127.0.0.1:50051")));
    }

    #[test]
    fn test_substring_match() {
        let m = matcher("example.org,127.0.0.1");
        assert!(m.is_bypassed(&addr("127.0.0.1:50051")));
        assert!(m.is_bypassed(&addr("api.example.org:443")));
        assert!(!m.is_bypassed(&addr("example.com:443")));
    }

    #[test]
    fn test_match_is_case_sensitive() {
        assert!(!matcher("EXAMPLE.com").is_bypassed(&addr("example.com:443")));
    }

    #[test]
    fn test_whitespace_is_not_trimmed() {
        let m = matcher("foo, example.com");
        assert!(!m.is_bypassed(&addr("example.com:443")));
    }

    #[test]
    fn test_coarse_policy_false_positives_are_documented_behavior() {
        // ip pattern inside an unrelated ip
        assert!(matcher("1.1.1.1").is_bypassed(&addr("21.1.1.100:443")));
        // pattern inside the port
        assert!(matcher("443").is_bypassed(&addr("example.com:443")));
        // pattern as prefix of an unrelated host
        assert!(matcher("example").is_bypassed(&addr("example-evil.net:80")));
    }

    #[test]
    fn test_empty_segment_matches_everything() {
        assert!(matcher("10.0.0.1,").is_bypassed(&addr("example.com:443")));
    }

    #[test]
    fn test_first_match_wins() {
        let list = BypassList::parse("example,example.com");
        assert_eq!(list.find_match("example.com:443"), Some("example"));
        assert!(list.matches("example.com:443"));
        assert!(!list.matches("127.0.0.1:443"));
    }

    #[test]
    fn test_custom_key() {
        let m = BypassMatcher::new(StaticConfig::new().with("no_proxy", "127.0.0.1"))
            .with_key("no_proxy");
        assert!(m.is_bypassed(&addr("127.0.0.1:1")));
    }
}
