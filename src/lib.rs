//! Proxy-aware dialing for gRPC clients.
//!
//! Given a target `host:port`, the [`DialStrategy`] decides whether a connection
//! is established directly or via the configured forward proxy, based on
//! the `HTTP_PROXY`, `HTTPS_PROXY` and `NO_PROXY` configuration keys.
//! The [`ClientAdapter`] plugs such a strategy into a tonic channel as its sole
//! connection mechanism, overriding any implicit proxy detection.
//!
//! Configuration is always injected using a [`ConfigSource`],
//! e.g. [`ProcessEnv`] for the process environment
//! or [`StaticConfig`] for a fixed (test) configuration.
//!
//! # Example
//!
//! ```no_run
//! use grpc_proxy_dial::{
//!     config::ProcessEnv,
//!     dial::ExplicitStrategyDialer,
//!     grpc::{ClientAdapter, HelloRequest},
//! };
//!
//! # async fn example() -> Result<(), grpc_proxy_dial::error::BoxError> {
//! let mut client = ClientAdapter::try_new("127.0.0.1:50051")?
//!     .with_dialer(ExplicitStrategyDialer::new(ProcessEnv::new()))
//!     .connect_client()
//!     .await?;
//!
//! let response = client
//!     .say_hello(HelloRequest {
//!         name: "world".to_owned(),
//!     })
//!     .await?;
//! assert_eq!(response.into_inner().message, "Hello, world");
//! # Ok(())
//! # }
//! ```
//!
//! [`DialStrategy`]: crate::dial::DialStrategy
//! [`ClientAdapter`]: crate::grpc::ClientAdapter
//! [`ConfigSource`]: crate::config::ConfigSource
//! [`ProcessEnv`]: crate::config::ProcessEnv
//! [`StaticConfig`]: crate::config::StaticConfig

#![cfg_attr(docsrs, feature(doc_auto_cfg, doc_cfg))]
#![cfg_attr(not(test), warn(clippy::print_stdout, clippy::dbg_macro))]

pub mod config;
pub mod dial;
pub mod error;
pub mod grpc;
pub mod proxy;

mod address;
#[doc(inline)]
pub use address::Address;
