use crate::{
    Address,
    address::{authority_port, default_port},
    config::{ConfigSource, HTTP_PROXY, HTTPS_PROXY},
    dial::DialError,
    error::{ErrorContext, OpaqueError},
};
use http::Uri;
use std::borrow::Cow;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// The forward proxy currently configured, if any.
///
/// The URL is kept as-is, it is only validated when
/// the proxy address is extracted using [`ProxyConfig::proxy_address`].
pub struct ProxyConfig {
    url: Option<String>,
}

impl ProxyConfig {
    /// A [`ProxyConfig`] which has no proxy configured.
    #[must_use]
    pub const fn none() -> Self {
        Self { url: None }
    }

    /// A [`ProxyConfig`] for the given proxy URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
        }
    }

    /// Returns true if a proxy is configured.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.url.is_some()
    }

    /// The raw proxy URL, if configured.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Extract the connectable `host:port` of the configured proxy.
    ///
    /// Returns `Ok(None)` in case no proxy is configured and
    /// a [`DialError`] of kind `Config` in case the URL is malformed.
    ///
    /// A URL without scheme is interpreted as an `http` URL. The port
    /// defaults to the one of the scheme (`http` or `https`) if missing.
    /// User info within the URL is ignored, proxy authentication is not supported.
    pub fn proxy_address(&self) -> Result<Option<Address>, DialError> {
        let Some(url) = self.url.as_deref() else {
            return Ok(None);
        };
        parse_proxy_address(url).map(Some).map_err(DialError::config)
    }
}

fn parse_proxy_address(url: &str) -> Result<Address, OpaqueError> {
    let url: Cow<'_, str> = if url.contains("://") {
        Cow::Borrowed(url)
    } else {
        Cow::Owned(format!("http://{url}"))
    };

    let uri: Uri = url.parse().context("parse proxy url")?;

    match uri.scheme_str() {
        Some("http" | "https") => (),
        Some(scheme) => {
            return Err(OpaqueError::from_display(format!(
                "unsupported proxy scheme '{scheme}'"
            )));
        }
        None => return Err(OpaqueError::from_display("proxy url has no scheme")),
    }

    let authority = uri.authority().context("proxy url has no host")?;
    if authority.as_str().contains('@') {
        tracing::debug!("ignore credentials of proxy url: authenticated proxies are not supported");
    }

    let port = match authority_port(authority)? {
        Some(port) => port,
        None => default_port(uri.scheme_str())
            .context("proxy url has no port nor a scheme with known port")?,
    };

    Address::try_new(authority.host(), port)
}

#[derive(Debug, Clone)]
/// Resolves the [`ProxyConfig`] from a [`ConfigSource`].
///
/// The primary key ([`HTTP_PROXY`] by default) takes precedence,
/// the fallback key ([`HTTPS_PROXY`] by default) is only consulted
/// when the primary key is unset or empty.
pub struct ProxyConfigResolver<S> {
    source: S,
    primary: Cow<'static, str>,
    fallback: Cow<'static, str>,
}

impl<S> ProxyConfigResolver<S> {
    /// Create a new [`ProxyConfigResolver`] using the default keys.
    pub const fn new(source: S) -> Self {
        Self {
            source,
            primary: Cow::Borrowed(HTTP_PROXY),
            fallback: Cow::Borrowed(HTTPS_PROXY),
        }
    }

    /// Overwrite the primary and fallback configuration keys.
    #[must_use]
    pub fn with_keys(
        mut self,
        primary: impl Into<Cow<'static, str>>,
        fallback: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.primary = primary.into();
        self.fallback = fallback.into();
        self
    }

}

impl<S: ConfigSource> ProxyConfigResolver<S> {
    /// Resolve the current [`ProxyConfig`].
    ///
    /// This never fails: absence of both keys is a valid "no proxy" config.
    pub fn resolve(&self) -> ProxyConfig {
        let url = self
            .non_empty(&self.primary)
            .or_else(|| self.non_empty(&self.fallback));
        ProxyConfig { url }
    }

    fn non_empty(&self, key: &str) -> Option<String> {
        self.source
            .get(key)
            .filter(|value| !value.is_empty())
    }
}
