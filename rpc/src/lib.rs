//! JSON-RPC transport for the feedback server.
//!
//! Thin glue around [`feedback_analysis::Analyzer`]: Content-Length
//! framed JSON-RPC over TCP, one task per connection, one task per
//! request.

pub mod codec;
pub mod proto;

mod server;

pub use server::RpcServer;
