use crate::error::{ErrorContext, OpaqueError};
use http::{Uri, uri::Authority};
use std::{
    fmt,
    net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr},
    str::FromStr,
};

/// A network endpoint to dial, in the form of `host:port`.
///
/// The host can be a domain name, an IPv4 literal or an IPv6 literal.
/// IPv6 hosts are bracketed when formatted.
///
/// ## Examples
///
/// - `example.com:443`
/// - `127.0.0.1:50051`
/// - `[::1]:50051`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address {
    host: String,
    port: u16,
}

const HTTP_DEFAULT_PORT: u16 = 80;
const HTTPS_DEFAULT_PORT: u16 = 443;

impl Address {
    /// Creates a new [`Address`] from a host and port.
    ///
    /// An IPv6 host can be given with or without brackets,
    /// brackets around any other host are rejected.
    pub fn try_new(host: impl AsRef<str>, port: u16) -> Result<Self, OpaqueError> {
        let host = host.as_ref();
        if let Some(inner) = host.strip_prefix('[') {
            let ip = inner
                .strip_suffix(']')
                .filter(|ip| ip.parse::<Ipv6Addr>().is_ok())
                .with_context(|| {
                    format!("bracketed address host '{host}' is not an ipv6 address")
                })?;
            return Ok(Self {
                host: ip.to_owned(),
                port,
            });
        }
        if host.is_empty() {
            return Err(OpaqueError::from_display("address host is empty"));
        }
        let valid = if host.contains(':') {
            host.parse::<Ipv6Addr>().is_ok()
        } else {
            !host.contains(|c: char| c.is_whitespace() || c == '[' || c == ']')
        };
        if !valid {
            return Err(OpaqueError::from_display(format!(
                "address host '{host}' is neither a valid domain nor an ip"
            )));
        }
        Ok(Self {
            host: host.to_owned(),
            port,
        })
    }

    /// creates a new local ipv4 [`Address`] for the given port
    ///
    /// # Example
    ///
    /// ```
    /// use grpc_proxy_dial::Address;
    ///
    /// let addr = Address::local_ipv4(50051);
    /// assert_eq!("127.0.0.1:50051", addr.to_string());
    /// ```
    #[must_use]
    pub fn local_ipv4(port: u16) -> Self {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), port).into()
    }

    /// Try to create an [`Address`] from the authority of a [`Uri`].
    ///
    /// When the [`Uri`] has no explicit port, the default port of
    /// the `http` or `https` scheme is used.
    pub fn try_from_uri(uri: &Uri) -> Result<Self, OpaqueError> {
        let authority = uri.authority().context("uri has no authority")?;
        let port = match authority_port(authority)? {
            Some(port) => port,
            None => default_port(uri.scheme_str())
                .with_context(|| format!("uri '{uri}' has no port nor a scheme with known port"))?,
        };
        Self::try_new(authority.host(), port)
    }

    /// Host of this [`Address`], without brackets in case of IPv6.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Port of this [`Address`].
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the [`IpAddr`] in case the host is an IP literal.
    #[must_use]
    pub fn ip_addr(&self) -> Option<IpAddr> {
        self.host.parse().ok()
    }
}

/// Port explicitly defined in the [`Authority`], if any.
///
/// Unlike [`Authority::port_u16`] an invalid port is an error
/// instead of being treated as absent.
pub(crate) fn authority_port(authority: &Authority) -> Result<Option<u16>, OpaqueError> {
    let host_port = authority
        .as_str()
        .rsplit_once('@')
        .map_or(authority.as_str(), |(_, host_port)| host_port);
    match host_port.rsplit_once(':') {
        Some((_, port)) if !port.contains(']') => port
            .parse::<u16>()
            .map(Some)
            .with_context(|| format!("parse port of authority '{authority}'")),
        _ => Ok(None),
    }
}

pub(crate) fn default_port(scheme: Option<&str>) -> Option<u16> {
    match scheme {
        Some(s) if s.eq_ignore_ascii_case("http") => Some(HTTP_DEFAULT_PORT),
        Some(s) if s.eq_ignore_ascii_case("https") => Some(HTTPS_DEFAULT_PORT),
        _ => None,
    }
}

impl From<SocketAddr> for Address {
    fn from(addr: SocketAddr) -> Self {
        Self {
            host: addr.ip().to_string(),
            port: addr.port(),
        }
    }
}

impl TryFrom<&str> for Address {
    type Error = OpaqueError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Err(OpaqueError::from_display("address is empty"));
        }

        let (host, port) = if value.starts_with('[') {
            let (host, port) = value
                .split_once("]:")
                .context("ipv6 address requires the [host]:port form")?;
            let port = parse_port(value, port)?;
            return Self::try_new(format!("{host}]"), port);
        } else {
            let (host, port) = value
                .rsplit_once(':')
                .context("address requires the host:port form")?;
            if host.contains(':') {
                return Err(OpaqueError::from_display(
                    "ipv6 address requires the [host]:port form",
                ));
            }
            (host, port)
        };

        Self::try_new(host, parse_port(value, port)?)
    }
}

fn parse_port(address: &str, port: &str) -> Result<u16, OpaqueError> {
    port.parse::<u16>()
        .with_context(|| format!("parse port of address '{address}'"))
}

impl TryFrom<String> for Address {
    type Error = OpaqueError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.as_str().try_into()
    }
}

impl FromStr for Address {
    type Err = OpaqueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.try_into()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

impl serde::Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_addresses() {
        for (input, host, port) in [
            ("127.0.0.1:50051", "127.0.0.1", 50051),
            ("example.com:443", "example.com", 443),
            ("[::1]:8080", "::1", 8080),
            ("localhost:0", "localhost", 0),
        ] {
            let addr: Address = input.parse().unwrap();
            assert_eq!(addr.host(), host, "input: {input}");
            assert_eq!(addr.port(), port, "input: {input}");
            assert_eq!(addr.to_string(), input);
        }
    }

    #[test]
    fn test_parse_invalid_addresses() {
        for input in [
            "",
            "example.com",
            ":443",
            "example.com:",
            "example.com:http",
            "example.com:65536",
            "::1:8080",
            "[::1]",
            "[]:80",
            "exa mple.com:80",
            "example.com\t:80",
            "[example.com]:80",
            "[127.0.0.1]:80",
            "exam]ple.com:80",
        ] {
            assert!(input.parse::<Address>().is_err(), "input: {input}");
        }
    }

    #[test]
    fn test_from_socket_addr() {
        let addr = Address::from("[::1]:9000".parse::<SocketAddr>().unwrap());
        assert_eq!(addr.to_string(), "[::1]:9000");
        assert_eq!(addr.ip_addr(), Some("::1".parse().unwrap()));
    }

    #[test]
    fn test_try_from_uri() {
        for (uri, expected) in [
            ("http://127.0.0.1:50051", "127.0.0.1:50051"),
            ("http://example.com", "example.com:80"),
            ("https://example.com", "example.com:443"),
            ("http://[::1]:50051/example.ExampleService", "[::1]:50051"),
        ] {
            let uri: Uri = uri.parse().unwrap();
            assert_eq!(Address::try_from_uri(&uri).unwrap().to_string(), expected);
        }

        for uri in ["grpc://example.com", "http://example.com:99999", "/path"] {
            let uri: Uri = uri.parse().unwrap();
            assert!(Address::try_from_uri(&uri).is_err(), "uri: {uri}");
        }
    }

    #[test]
    fn test_serde_as_string() {
        let addr = Address::local_ipv4(50051);
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, r#""127.0.0.1:50051""#);
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
    }
}
