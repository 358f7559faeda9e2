use super::{DialDecision, DialError, Dialer};
use crate::{
    Address,
    config::ConfigSource,
    proxy::{BypassMatcher, ProxyConfigResolver},
};
use tokio::net::TcpStream;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone)]
/// Decides, per dial attempt, whether to connect directly or via the proxy.
///
/// The decision is made in the following order:
///
/// 1. targets matched by the bypass list are connected to directly;
/// 2. when no proxy is configured, the target is connected to directly;
/// 3. otherwise the proxy is connected to.
///
/// Configuration is read from the [`ConfigSource`] on every attempt,
/// so changes are picked up by the very next dial.
pub struct DialStrategy<S> {
    bypass: BypassMatcher<S>,
    resolver: ProxyConfigResolver<S>,
}

impl<S: Clone> DialStrategy<S> {
    /// Create a new [`DialStrategy`] reading its configuration from the given source.
    pub fn new(source: S) -> Self {
        Self {
            bypass: BypassMatcher::new(source.clone()),
            resolver: ProxyConfigResolver::new(source),
        }
    }
}

impl<S: ConfigSource> DialStrategy<S> {
    /// Decide how the given [`Address`] is to be dialed.
    ///
    /// Fails with a config [`DialError`] in case a proxy is configured
    /// but its address cannot be extracted.
    pub fn decide(&self, address: &Address) -> Result<DialDecision, DialError> {
        if self.bypass.is_bypassed(address) {
            return Ok(DialDecision::Direct(address.clone()));
        }

        match self.resolver.resolve().proxy_address()? {
            Some(proxy) => Ok(DialDecision::ViaProxy(proxy)),
            None => Ok(DialDecision::Direct(address.clone())),
        }
    }

    /// Dial the given [`Address`] according to the current [`DialDecision`].
    pub async fn dial(
        &self,
        cancel: &CancellationToken,
        address: Address,
    ) -> Result<TcpStream, DialError> {
        let decision = self.decide(&address).inspect_err(|err| {
            tracing::debug!(%address, "failed to decide dial route: {err}");
        })?;
        tracing::debug!(
            %address,
            decision = %decision.kind(),
            connect_address = %decision.target(),
            "dial",
        );
        decision.connect(cancel).await
    }
}

#[derive(Debug, Clone)]
/// A [`Dialer`] which exclusively uses a [`DialStrategy`] to route connections.
///
/// When this dialer is used, no implicit proxy detection of any kind is applied.
pub struct ExplicitStrategyDialer<S> {
    strategy: DialStrategy<S>,
}

impl<S: Clone> ExplicitStrategyDialer<S> {
    /// Create a new [`ExplicitStrategyDialer`] reading its configuration from the given source.
    pub fn new(source: S) -> Self {
        Self {
            strategy: DialStrategy::new(source),
        }
    }
}

impl<S> Dialer for ExplicitStrategyDialer<S>
where
    S: ConfigSource + Clone,
{
    async fn dial(
        &self,
        cancel: &CancellationToken,
        address: Address,
    ) -> Result<TcpStream, DialError> {
        self.strategy.dial(cancel, address).await
    }
}
