//! Douyin user comparison facade built on one shared, configured client.
//!
//! [`ApiClient`] owns the transport, the resolved base URL, default headers, and the
//! interceptor chains. [`DouyinUserApi`] exposes the four backend operations on top of it.
//! Both are cheap to clone and meant to be constructed once and handed to callers.

pub mod id;

mod client;
mod douyin;

pub use client::*;
pub use douyin::*;
pub use id::*;
