//! # toolcall
//!
//! Tool-augmented generation over an abstract model port: a toolbox of
//! capabilities, the blocking loop that drives repeated model invocation
//! and concurrent tool dispatch, and the realtime dispatcher that runs
//! tool calls as cancellable background work on live sessions.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                         call sites                             │
//! │   converse / generate / select / complete_steps                │
//! │  ┌────────────┐  ┌─────────────┐  ┌─────────────────────────┐  │
//! │  │   Loop     │──│   Toolbox   │  │   RealtimeDispatcher    │  │
//! │  │  (driver)  │  │ (dispatch)  │  │ (cancellable bg tasks)  │  │
//! │  └─────┬──────┘  └─────────────┘  └───────────┬─────────────┘  │
//! └────────┼──────────────────────────────────────┼────────────────┘
//!          ▼                                      ▼
//!   ModelInvocation port                   RealtimeSession
//! ```
//!
//! The loop repeatedly invokes the model and interprets the result as
//! either a terminal completion or a batch of tool requests. Requested
//! tools run concurrently with isolated failure handling; a tool that
//! requires a direct result short-circuits the turn. Recursion is
//! bounded by the toolbox's round-trip limit.

pub mod choice;
pub mod conversation;
mod driver;
pub mod realtime;
pub mod steps;
pub mod structured;
pub mod toolbox;

pub use choice::{Selection, select};
pub use conversation::{ConversationTurn, converse};
pub use realtime::{
    RealtimeDispatcher, RealtimeEvent, RealtimeSession, RealtimeStream, SessionEvent, SessionInput,
};
pub use steps::{Step, complete_steps};
pub use structured::{Generated, generate};
pub use toolbox::{Toolbox, ToolSuggestion};

// Re-export the shared contract so most callers need a single crate.
pub use toolcall_core::{
    Completion, ContentPart, ContextElement, Error, FnTool, Input, InvocationResult,
    ModelInvocation, MultimodalContent, OutputSelection, Result, Tool, ToolFailure, ToolRequest,
    ToolRequests, ToolResponse, ToolSelection, ToolSpecification,
};
