//! Service plumbing around the engine: the refresh runtime and HTTP surface.

pub mod http;
pub mod runtime;

pub use http::*;
pub use runtime::*;
