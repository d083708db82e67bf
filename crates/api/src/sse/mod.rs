//! Server-Sent Events infrastructure for real-time subscriber streams.

mod handler;

pub use handler::stream_user;
