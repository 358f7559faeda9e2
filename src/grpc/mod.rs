//! gRPC plumbing for the `example.ExampleService` service.
//!
//! The [`client::ClientAdapter`] builds tonic channels whose only means
//! of establishing a connection is a [`Dialer`](crate::dial::Dialer),
//! while the [`server`] serves the service the client talks to.

pub mod client;
pub mod proto;
pub mod server;

#[doc(inline)]
pub use client::{ClientAdapter, DialConnector};
#[doc(inline)]
pub use proto::{
    HelloRequest, HelloResponse, example_service_client::ExampleServiceClient,
    example_service_server::ExampleService,
};
