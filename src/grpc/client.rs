use super::proto::example_service_client::ExampleServiceClient;
use crate::{
    Address,
    dial::{DefaultAmbientDialer, DialError, DialErrorKind, Dialer},
};
use http::Uri;
use hyper_util::rt::TokioIo;
use std::{
    fmt,
    pin::Pin,
    task::{Context, Poll},
    time::Duration,
};
use tokio::net::TcpStream;
use tokio_util::sync::CancellationToken;
use tonic::transport::{Channel, Endpoint};
use tower_service::Service;

#[derive(Debug, Clone)]
/// Connector used by tonic to establish the transport of a [`Channel`].
///
/// Every connection is established by the wrapped [`Dialer`],
/// no other (implicit) connection mechanism is ever used.
pub struct DialConnector<D> {
    dialer: D,
    cancel: CancellationToken,
}

impl<D> DialConnector<D> {
    /// Create a new [`DialConnector`] for the given [`Dialer`].
    ///
    /// All dial attempts are aborted once the [`CancellationToken`] is cancelled.
    pub const fn new(dialer: D, cancel: CancellationToken) -> Self {
        Self { dialer, cancel }
    }
}

impl<D: Dialer> Service<Uri> for DialConnector<D> {
    type Response = TokioIo<TcpStream>;
    type Error = DialError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, uri: Uri) -> Self::Future {
        let dialer = self.dialer.clone();
        let cancel = self.cancel.clone();
        Box::pin(async move {
            let address = Address::try_from_uri(&uri).map_err(DialError::config)?;
            let stream = dialer.dial(&cancel, address).await?;
            Ok(TokioIo::new(stream))
        })
    }
}

/// Builder of gRPC [`Channel`]s which delegate connection establishment
/// exclusively to a [`Dialer`].
///
/// Unless another dialer is supplied using [`ClientAdapter::with_dialer`],
/// the [`DefaultAmbientDialer`] is used.
pub struct ClientAdapter<D = DefaultAmbientDialer> {
    endpoint: Endpoint,
    dialer: D,
    cancel: CancellationToken,
}

impl<D: fmt::Debug> fmt::Debug for ClientAdapter<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientAdapter")
            .field("uri", self.endpoint.uri())
            .field("dialer", &self.dialer)
            .field("cancel", &self.cancel)
            .finish()
    }
}

impl ClientAdapter {
    /// Create a new [`ClientAdapter`] for the given target.
    ///
    /// The target is either a `host:port` [`Address`] or an `http` URI.
    /// Fails with a config [`DialError`] for a target without a valid host and port.
    pub fn try_new(target: impl AsRef<str>) -> Result<Self, DialError> {
        let target = target.as_ref().trim();
        let uri = if target.contains("://") {
            target.to_owned()
        } else {
            format!("http://{target}")
        };

        let endpoint = Endpoint::from_shared(uri).map_err(DialError::config)?;
        // fail early rather than on the first dial attempt
        Address::try_from_uri(endpoint.uri()).map_err(DialError::config)?;

        Ok(Self {
            endpoint,
            dialer: DefaultAmbientDialer::default(),
            cancel: CancellationToken::new(),
        })
    }

    /// Create a new [`ClientAdapter`] for the given target [`Address`].
    pub fn from_address(address: &Address) -> Result<Self, DialError> {
        Self::try_new(address.to_string())
    }
}

impl<D> ClientAdapter<D> {
    /// Use the given [`Dialer`] as the sole connection mechanism.
    pub fn with_dialer<T>(self, dialer: T) -> ClientAdapter<T> {
        ClientAdapter {
            endpoint: self.endpoint,
            dialer,
            cancel: self.cancel,
        }
    }

    /// Abort connection attempts which take longer than the given duration.
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.endpoint = self.endpoint.connect_timeout(timeout);
        self
    }

    /// Abort all (current and future) dial attempts once the token is cancelled.
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// The URI of the target.
    pub fn uri(&self) -> &Uri {
        self.endpoint.uri()
    }
}

impl<D: Dialer> ClientAdapter<D> {
    fn connector(&self) -> DialConnector<D> {
        DialConnector::new(self.dialer.clone(), self.cancel.clone())
    }

    /// Connect to the target, establishing the transport eagerly.
    pub async fn connect(&self) -> Result<Channel, DialError> {
        let uri = self.endpoint.uri();
        tracing::debug!(%uri, "connect grpc channel");
        self.endpoint
            .connect_with_connector(self.connector())
            .await
            .map_err(|err| {
                tracing::debug!(%uri, "failed to connect grpc channel: {err}");
                into_dial_error(err)
            })
    }

    /// Create a [`Channel`] which only dials the target once it is first used.
    pub fn connect_lazy(&self) -> Channel {
        self.endpoint.connect_with_connector_lazy(self.connector())
    }

    /// Connect to the target and wrap the [`Channel`] in an [`ExampleServiceClient`].
    pub async fn connect_client(&self) -> Result<ExampleServiceClient, DialError> {
        self.connect().await.map(ExampleServiceClient::new)
    }
}

/// Recover the [`DialErrorKind`] of a dial failure wrapped by the transport,
/// any other failure (e.g. a timeout or handshake error) is a connect error.
fn into_dial_error(err: tonic::transport::Error) -> DialError {
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(&err);
    while let Some(cause) = source {
        if let Some(dial_err) = cause.downcast_ref::<DialError>() {
            return match dial_err.kind() {
                DialErrorKind::Config => DialError::config(err),
                DialErrorKind::Connect => DialError::connect(err),
                DialErrorKind::Cancelled => DialError::cancelled(),
            };
        }
        source = cause.source();
    }
    DialError::connect(err)
}
