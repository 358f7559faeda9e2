//! Messages and service glue of the `example` protobuf package:
//!
//! ```proto
//! syntax = "proto3";
//!
//! package example;
//!
//! service ExampleService {
//!   rpc SayHello (HelloRequest) returns (HelloResponse);
//! }
//!
//! message HelloRequest {
//!   string name = 1;
//! }
//!
//! message HelloResponse {
//!   string message = 1;
//! }
//! ```

#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct HelloRequest {
    #[prost(string, tag = "1")]
    pub name: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct HelloResponse {
    #[prost(string, tag = "1")]
    pub message: ::prost::alloc::string::String,
}

/// Client for the `example.ExampleService` service.
pub mod example_service_client {
    use super::{HelloRequest, HelloResponse};
    use tonic::{
        IntoRequest, Response, Status,
        client::Grpc,
        codegen::{GrpcMethod, http},
        transport::Channel,
    };

    #[derive(Debug, Clone)]
    /// Client for the `example.ExampleService` service,
    /// operating on top of a tonic [`Channel`].
    pub struct ExampleServiceClient {
        inner: Grpc<Channel>,
    }

    impl ExampleServiceClient {
        /// Create a new client operating on the given [`Channel`].
        #[must_use]
        pub fn new(channel: Channel) -> Self {
            Self {
                inner: Grpc::new(channel),
            }
        }

        /// Call the unary `SayHello` method.
        pub async fn say_hello(
            &mut self,
            request: impl IntoRequest<HelloRequest>,
        ) -> Result<Response<HelloResponse>, Status> {
            self.inner
                .ready()
                .await
                .map_err(|err| Status::unknown(format!("service was not ready: {err}")))?;
            let codec = tonic_prost::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static("/example.ExampleService/SayHello");
            let mut req = request.into_request();
            req.extensions_mut()
                .insert(GrpcMethod::new("example.ExampleService", "SayHello"));
            self.inner.unary(req, path, codec).await
        }
    }
}

/// Server for the `example.ExampleService` service.
pub mod example_service_server {
    use super::{HelloRequest, HelloResponse};
    use std::{
        convert::Infallible,
        sync::Arc,
        task::{Context, Poll},
    };
    use tonic::{
        Request, Response, Status,
        body::Body,
        codegen::{BoxFuture, Service, StdError, http},
        server::{Grpc, NamedService, UnaryService},
    };

    /// Trait to implement the `example.ExampleService` service.
    pub trait ExampleService: Send + Sync + 'static {
        /// Handle the unary `SayHello` method.
        fn say_hello(
            &self,
            request: Request<HelloRequest>,
        ) -> impl Future<Output = Result<Response<HelloResponse>, Status>> + Send;
    }

    #[derive(Debug)]
    /// Tonic service serving an [`ExampleService`] implementation.
    pub struct ExampleServiceServer<T> {
        inner: Arc<T>,
    }

    impl<T> ExampleServiceServer<T> {
        /// Create a new server for the given [`ExampleService`] implementation.
        pub fn new(inner: T) -> Self {
            Self::from_arc(Arc::new(inner))
        }

        /// Create a new server for a shared [`ExampleService`] implementation.
        pub fn from_arc(inner: Arc<T>) -> Self {
            Self { inner }
        }
    }

    impl<T> Clone for ExampleServiceServer<T> {
        fn clone(&self) -> Self {
            Self {
                inner: self.inner.clone(),
            }
        }
    }

    impl<T> NamedService for ExampleServiceServer<T> {
        const NAME: &'static str = "example.ExampleService";
    }

    struct SayHelloSvc<T>(Arc<T>);

    impl<T: ExampleService> UnaryService<HelloRequest> for SayHelloSvc<T> {
        type Response = HelloResponse;
        type Future = BoxFuture<Response<Self::Response>, Status>;

        fn call(&mut self, request: Request<HelloRequest>) -> Self::Future {
            let inner = Arc::clone(&self.0);
            Box::pin(async move { inner.say_hello(request).await })
        }
    }

    impl<T, B> Service<http::Request<B>> for ExampleServiceServer<T>
    where
        T: ExampleService,
        B: tonic::codegen::Body + Send + 'static,
        B::Error: Into<StdError> + Send + 'static,
    {
        type Response = http::Response<Body>;
        type Error = Infallible;
        type Future = BoxFuture<Self::Response, Self::Error>;

        fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }

        fn call(&mut self, req: http::Request<B>) -> Self::Future {
            match req.uri().path() {
                "/example.ExampleService/SayHello" => {
                    let method = SayHelloSvc(self.inner.clone());
                    Box::pin(async move {
                        let codec = tonic_prost::ProstCodec::default();
                        let mut grpc = Grpc::new(codec);
                        Ok(grpc.unary(method, req).await)
                    })
                }
                _ => Box::pin(async move {
                    let mut response = http::Response::new(Body::default());
                    let headers = response.headers_mut();
                    headers.insert(
                        Status::GRPC_STATUS,
                        (tonic::Code::Unimplemented as i32).into(),
                    );
                    headers.insert(
                        http::header::CONTENT_TYPE,
                        tonic::metadata::GRPC_CONTENT_TYPE,
                    );
                    Ok(response)
                }),
            }
        }
    }
}
