use super::DialError;
use crate::Address;
use std::io;
use tokio::net::TcpStream;
use tokio_util::sync::CancellationToken;

/// Establish a [`TcpStream`] connection to the given [`Address`].
///
/// Domain names are resolved using the system resolver.
/// The connect attempt is aborted as soon as the [`CancellationToken`]
/// is cancelled, resulting in a cancelled [`DialError`].
pub async fn tcp_connect(
    cancel: &CancellationToken,
    address: &Address,
) -> Result<TcpStream, DialError> {
    let stream = cancellable(
        cancel,
        address,
        TcpStream::connect((address.host(), address.port())),
    )
    .await?;
    if let Err(err) = stream.set_nodelay(true) {
        tracing::debug!(%address, "failed to set TCP_NODELAY: {err}");
    }
    Ok(stream)
}

/// Race a connect future against the [`CancellationToken`].
///
/// The future is never polled when the token is already cancelled.
async fn cancellable<T>(
    cancel: &CancellationToken,
    address: &Address,
    connect: impl Future<Output = io::Result<T>>,
) -> Result<T, DialError> {
    if cancel.is_cancelled() {
        return Err(DialError::cancelled());
    }

    tokio::select! {
        biased;

        _ = cancel.cancelled() => {
            tracing::debug!(%address, "tcp connect cancelled");
            Err(DialError::cancelled())
        }
        result = connect => result.map_err(DialError::connect),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        future::pending,
        sync::atomic::{AtomicBool, Ordering},
        time::Duration,
    };
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_connect_ok() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = Address::from(listener.local_addr().unwrap());

        let stream = tcp_connect(&CancellationToken::new(), &address)
            .await
            .unwrap();
        assert_eq!(stream.peer_addr().unwrap(), listener.local_addr().unwrap());
    }

    #[tokio::test]
    async fn test_connect_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = Address::from(listener.local_addr().unwrap());
        drop(listener);

        let err = tcp_connect(&CancellationToken::new(), &address)
            .await
            .unwrap_err();
        assert!(err.is_connect(), "{err}");
    }

    #[tokio::test]
    async fn test_connect_already_cancelled() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = Address::from(listener.local_addr().unwrap());

        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = tcp_connect(&cancel, &address).await.unwrap_err();
        assert!(err.is_cancelled(), "{err}");
    }

    #[tokio::test]
    async fn test_connect_cancelled_in_flight() {
        let address = Address::local_ipv4(50051);
        let cancel = CancellationToken::new();
        tokio::spawn({
            let cancel = cancel.clone();
            async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                cancel.cancel();
            }
        });

        let err = tokio::time::timeout(
            Duration::from_secs(5),
            cancellable(&cancel, &address, pending::<io::Result<()>>()),
        )
        .await
        .unwrap()
        .unwrap_err();
        assert!(err.is_cancelled(), "{err}");
    }

    #[tokio::test]
    async fn test_already_cancelled_never_polls_connect() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        let polled = AtomicBool::new(false);
        let err = cancellable(&cancel, &Address::local_ipv4(50051), async {
            polled.store(true, Ordering::SeqCst);
            Ok::<_, io::Error>(())
        })
        .await
        .unwrap_err();
        assert!(!polled.load(Ordering::SeqCst));
        assert!(err.is_cancelled(), "{err}");
    }
}
