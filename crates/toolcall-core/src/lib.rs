//! # toolcall-core
//!
//! Shared data model and the model-invocation contract for
//! tool-augmented generation. Application code asks an abstract model to
//! complete a conversation, possibly using tools, without binding to a
//! specific vendor API.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        caller / loop                         │
//! │  ┌──────────────┐  ┌───────────────┐  ┌───────────────────┐  │
//! │  │   Context    │  │     Tool      │  │  ModelInvocation  │  │
//! │  │  (elements)  │──│  (capability) │──│     (port)        │  │
//! │  └──────────────┘  └───────────────┘  └───────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The [`ModelInvocation`] trait is the port every vendor adapter
//! implements; its result is always exactly one of a terminal
//! [`Completion`] or a batch of [`ToolRequests`].

pub mod content;
pub mod context;
pub mod error;
pub mod invocation;
pub mod mock;
pub mod tool;

pub use content::{ContentPart, MultimodalContent};
pub use context::{Completion, ContextElement, Input, ToolRequest, ToolRequests, ToolResponse};
pub use error::{Error, Result};
pub use invocation::{InvocationResult, ModelInvocation, OutputSelection, ToolSelection};
pub use tool::{FnTool, Tool, ToolFailure, ToolSpecification};
