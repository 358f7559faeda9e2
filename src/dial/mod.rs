//! Proxy-aware dialing.
//!
//! A [`Dialer`] establishes the transport (TCP) connection for a target
//! [`Address`]. Two dialers are provided:
//!
//! - [`ExplicitStrategyDialer`]: routes using the [`DialStrategy`], which
//!   honours the bypass list before considering the configured proxy;
//! - [`DefaultAmbientDialer`]: mimics the implicit proxy detection found
//!   in transport stacks, routing every target via the configured proxy.
//!
//! Neither dialer speaks a proxy protocol (e.g. HTTP `CONNECT`): when routed
//! via a proxy only the raw transport link to the proxy is established,
//! and the proxy is expected to forward the traffic.

use crate::Address;
use std::fmt;
use tokio::net::TcpStream;
use tokio_util::sync::CancellationToken;

mod error;
#[doc(inline)]
pub use error::{DialError, DialErrorKind};

mod connect;
#[doc(inline)]
pub use connect::tcp_connect;

mod strategy;
#[doc(inline)]
pub use strategy::{DialStrategy, ExplicitStrategyDialer};

mod ambient;
#[doc(inline)]
pub use ambient::DefaultAmbientDialer;

/// Establishes the transport connection for a target [`Address`].
///
/// Implementations hold no state shared between dial attempts,
/// and can therefore be used concurrently.
pub trait Dialer: Clone + Send + Sync + 'static {
    /// Dial the given [`Address`], or whatever address it is routed to.
    ///
    /// At most one connection attempt is made per call.
    /// The attempt is aborted when the [`CancellationToken`] is cancelled.
    fn dial(
        &self,
        cancel: &CancellationToken,
        address: Address,
    ) -> impl Future<Output = Result<TcpStream, DialError>> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
/// The kind of a [`DialDecision`].
pub enum DialDecisionKind {
    /// Connect directly to the target.
    Direct,
    /// Connect to the proxy instead of the target.
    ViaProxy,
}

impl fmt::Display for DialDecisionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct => f.write_str("direct"),
            Self::ViaProxy => f.write_str("via_proxy"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", content = "address", rename_all = "snake_case")]
/// Routing decision for a single dial attempt.
///
/// A decision is never cached: it is created, consumed to
/// open exactly one connection and then dropped.
pub enum DialDecision {
    /// Connect directly to the target [`Address`].
    Direct(Address),
    /// Connect to the [`Address`] of the proxy.
    ViaProxy(Address),
}

impl DialDecision {
    /// The [`DialDecisionKind`] of this decision.
    #[must_use]
    pub fn kind(&self) -> DialDecisionKind {
        match self {
            Self::Direct(_) => DialDecisionKind::Direct,
            Self::ViaProxy(_) => DialDecisionKind::ViaProxy,
        }
    }

    /// The [`Address`] which will actually be connected to.
    #[must_use]
    pub fn target(&self) -> &Address {
        match self {
            Self::Direct(address) | Self::ViaProxy(address) => address,
        }
    }

    /// Open the transport connection for this decision.
    pub async fn connect(self, cancel: &CancellationToken) -> Result<TcpStream, DialError> {
        tcp_connect(cancel, self.target()).await
    }
}
