//! API Module
//!
//! Trigger entry point for scheduled or event-driven invocations.
//!
//! Structure:
//! - handler.rs: runs the pipeline for one event
//! - response.rs: `{"statusCode", "body"}` response shapes
//!
//! Every pipeline failure becomes the same 500 response; nothing escapes
//! the handler.

pub mod handler;
pub mod response;

#[cfg(test)]
mod tests;

pub use handler::{InvocationContext, InvocationHandler};
pub use response::{FailureBody, InvocationResponse, SuccessBody};
