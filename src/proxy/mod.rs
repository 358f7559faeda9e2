//! Forward proxy configuration and bypass (no-proxy) matching.
//!
//! Both the [`ProxyConfigResolver`] and the [`BypassMatcher`] read
//! their [`ConfigSource`] on every call and hold no other state.
//!
//! [`ConfigSource`]: crate::config::ConfigSource

mod resolver;
#[doc(inline)]
pub use resolver::{ProxyConfig, ProxyConfigResolver};

mod bypass;
#[doc(inline)]
pub use bypass::{BypassList, BypassMatcher};
