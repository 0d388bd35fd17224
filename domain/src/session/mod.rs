//! Stream session domain.
//!
//! - [`entities::StreamSession`]: the buffer and lifecycle flag of one render
//! - [`stream::StreamEvent`]: incremental progress of a streaming response

pub mod entities;
pub mod stream;
