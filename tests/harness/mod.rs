//! Test server and mock forward proxies used by the end-to-end tests.

use grpc_proxy_dial::{Address, grpc::server};
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};
use tokio::{
    io::copy_bidirectional,
    net::{TcpListener, TcpStream},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;

/// The example gRPC service, served on a random local port.
pub(crate) struct TestServer {
    address: Address,
    shutdown: CancellationToken,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub(crate) async fn spawn() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = Address::from(listener.local_addr().unwrap());

        let shutdown = CancellationToken::new();
        let handle = tokio::spawn({
            let shutdown = shutdown.clone();
            async move {
                server::serve(listener, shutdown.cancelled_owned())
                    .await
                    .unwrap();
            }
        });

        Self {
            address,
            shutdown,
            handle,
        }
    }

    pub(crate) fn address(&self) -> &Address {
        &self.address
    }

    pub(crate) async fn shutdown(self) {
        self.shutdown.cancel();
        self.handle.await.unwrap();
    }
}

/// A mock forward proxy which counts the connections it accepts.
///
/// Accepted connections are either dropped immediately
/// or relayed as raw bytes to a fixed upstream.
pub(crate) struct MockProxy {
    address: Address,
    connections: Arc<AtomicUsize>,
    handle: JoinHandle<()>,
}

impl MockProxy {
    /// Spawn a proxy which records and immediately drops every connection.
    pub(crate) async fn counting() -> Self {
        Self::spawn(None).await
    }

    /// Spawn a proxy which relays every connection to the given upstream.
    pub(crate) async fn relay(upstream: Address) -> Self {
        Self::spawn(Some(upstream)).await
    }

    async fn spawn(upstream: Option<Address>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = Address::from(listener.local_addr().unwrap());
        let connections = Arc::new(AtomicUsize::new(0));

        let handle = tokio::spawn({
            let connections = connections.clone();
            async move {
                loop {
                    let Ok((mut inbound, peer)) = listener.accept().await else {
                        return;
                    };
                    connections.fetch_add(1, Ordering::SeqCst);
                    tracing::debug!(%peer, "mock proxy: connection accepted");

                    let Some(upstream) = upstream.clone() else {
                        drop(inbound);
                        continue;
                    };
                    tokio::spawn(async move {
                        let Ok(mut outbound) =
                            TcpStream::connect((upstream.host(), upstream.port())).await
                        else {
                            return;
                        };
                        if let Err(err) = copy_bidirectional(&mut inbound, &mut outbound).await {
                            tracing::debug!(%peer, "mock proxy: relay ended: {err}");
                        }
                    });
                }
            }
        });

        Self {
            address,
            connections,
            handle,
        }
    }

    pub(crate) fn address(&self) -> &Address {
        &self.address
    }

    /// The proxy URL, as it would be set in `HTTP_PROXY`.
    pub(crate) fn url(&self) -> String {
        format!("http://{}", self.address)
    }

    pub(crate) fn connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }
}

impl Drop for MockProxy {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// An address on which nothing is listening.
pub(crate) async fn closed_address() -> Address {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    Address::from(listener.local_addr().unwrap())
}
