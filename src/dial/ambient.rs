use super::{DialDecision, DialError, Dialer};
use crate::{
    Address,
    config::{ConfigSource, ProcessEnv},
    proxy::ProxyConfigResolver,
};
use tokio::net::TcpStream;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone)]
/// A [`Dialer`] modelling the implicit, ambient proxy detection
/// that transport stacks apply when no custom dialer is supplied.
///
/// Whenever a proxy is configured, every target is dialed via that proxy:
/// the bypass list is not consulted. Without proxy configuration it dials
/// the target directly.
///
/// This is the behaviour an [`ExplicitStrategyDialer`] is designed to replace,
/// and is kept around mostly to contrast both behaviours.
///
/// [`ExplicitStrategyDialer`]: super::ExplicitStrategyDialer
pub struct DefaultAmbientDialer<S = ProcessEnv> {
    resolver: ProxyConfigResolver<S>,
}

impl Default for DefaultAmbientDialer {
    fn default() -> Self {
        Self::new(ProcessEnv::new())
    }
}

impl<S> DefaultAmbientDialer<S> {
    /// Create a new [`DefaultAmbientDialer`] reading its configuration from the given source.
    pub const fn new(source: S) -> Self {
        Self {
            resolver: ProxyConfigResolver::new(source),
        }
    }
}

impl<S: ConfigSource> DefaultAmbientDialer<S> {
    fn decide(&self, address: Address) -> Result<DialDecision, DialError> {
        Ok(match self.resolver.resolve().proxy_address()? {
            Some(proxy) => DialDecision::ViaProxy(proxy),
            None => DialDecision::Direct(address),
        })
    }
}

impl<S> Dialer for DefaultAmbientDialer<S>
where
    S: ConfigSource + Clone,
{
    async fn dial(
        &self,
        cancel: &CancellationToken,
        address: Address,
    ) -> Result<TcpStream, DialError> {
        let decision = self.decide(address)?;
        tracing::debug!(
            decision = %decision.kind(),
            connect_address = %decision.target(),
            "ambient dial",
        );
        decision.connect(cancel).await
    }
}
