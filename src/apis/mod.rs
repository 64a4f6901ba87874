//! Snapshot API implementations.
//!
//! Concrete [`GameApi`](crate::GameApi) backends live here behind feature
//! gates:
//!
//! | Feature    | Backend        |
//! |------------|----------------|
//! | `api-http` | [`HttpGameApi`] |

#[cfg(feature = "api-http")]
pub mod http;

#[cfg(feature = "api-http")]
pub use http::HttpGameApi;
