use super::proto::{
    HelloRequest, HelloResponse,
    example_service_server::{ExampleService, ExampleServiceServer},
};
use crate::error::{ErrorContext, OpaqueError};
use tokio::net::TcpListener;
use tonic::{
    Request, Response, Status,
    transport::{Server, server::TcpIncoming},
};

/// Port on which the [`HelloService`] is served by default.
pub const DEFAULT_PORT: u16 = 50051;

#[derive(Debug, Clone, Default)]
#[non_exhaustive]
/// [`ExampleService`] which greets the caller by name.
pub struct HelloService;

impl HelloService {
    /// Create a new [`HelloService`].
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ExampleService for HelloService {
    async fn say_hello(
        &self,
        request: Request<HelloRequest>,
    ) -> Result<Response<HelloResponse>, Status> {
        let remote_addr = request.remote_addr();
        let HelloRequest { name } = request.into_inner();
        tracing::debug!(?remote_addr, %name, "say hello");
        Ok(Response::new(HelloResponse {
            message: format!("Hello, {name}"),
        }))
    }
}

/// Serve the [`HelloService`] on the given listener
/// until the shutdown future resolves.
///
/// Serve errors are logged and returned, the service is never restarted.
pub async fn serve(
    listener: TcpListener,
    shutdown: impl Future<Output = ()> + Send,
) -> Result<(), OpaqueError> {
    let local_addr = listener.local_addr().ok();
    tracing::info!(?local_addr, "serving grpc example service");

    let result = Server::builder()
        .add_service(ExampleServiceServer::new(HelloService::new()))
        .serve_with_incoming_shutdown(TcpIncoming::from(listener), shutdown)
        .await;

    if let Err(err) = &result {
        tracing::error!(?local_addr, "grpc server failed: {err}");
    }
    result.context("serve grpc example service")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_say_hello() {
        let response = HelloService::new()
            .say_hello(Request::new(HelloRequest {
                name: "world".to_owned(),
            }))
            .await
            .unwrap();
        assert_eq!(response.into_inner().message, "Hello, world");
    }

    #[tokio::test]
    async fn test_say_hello_empty_name() {
        let response = HelloService::new()
            .say_hello(Request::new(HelloRequest::default()))
            .await
            .unwrap();
        assert_eq!(response.into_inner().message, "Hello, ");
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn test_serve_stops_on_shutdown() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        serve(listener, std::future::ready(())).await.unwrap();
        assert!(logs_contain("serving grpc example service"));
    }
}
