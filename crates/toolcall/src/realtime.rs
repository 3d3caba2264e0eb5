//! Realtime Tool Dispatcher
//!
//! The streaming counterpart of the blocking loop, for live sessions
//! (voice, live chat) where input and output are continuous streams.
//! Tool requests arrive multiplexed with content chunks and session
//! events; each is dispatched as an independent background task whose
//! response is written straight back into the session input. The session
//! owns the conversation context, so there is no local context list and
//! no round-trip limit at this layer.
//!
//! Interruption is the common path, not the exceptional one: every user
//! barge-in cancels all pending tool tasks. A cancelled task never
//! writes a response — even one whose tool call already finished — and
//! always clears its `pending` slot on the way out.

use std::collections::HashMap;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::Stream;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use toolcall_core::content::MultimodalContent;
use toolcall_core::context::{ToolRequest, ToolResponse};
use toolcall_core::error::Result;

use crate::toolbox::Toolbox;

/// An event read from a live session's output stream
#[derive(Clone, Debug)]
pub enum SessionEvent {
    /// A chunk of model output
    Content(MultimodalContent),

    /// The model requested a tool call
    ToolRequest(ToolRequest),

    /// The current turn was cut off by the user or the model
    Interrupted,

    /// The session finished
    Completed,
}

/// Input written back into a live session
#[derive(Clone, Debug)]
pub enum SessionInput {
    /// The response to an earlier tool request
    ToolResponse(ToolResponse),
}

/// A live model session with a readable output stream and writable input
#[async_trait]
pub trait RealtimeSession: Send + Sync {
    /// Read the next event from the session output
    async fn read(&self) -> Result<SessionEvent>;

    /// Write input back into the session
    async fn write(&self, input: SessionInput) -> Result<()>;
}

/// An event surfaced to the consumer of an attached session
#[derive(Clone, Debug)]
pub enum RealtimeEvent {
    /// A chunk of model output
    Content(MultimodalContent),

    /// The current turn was interrupted; pending tool work was cancelled
    Interrupted,

    /// The session finished
    Completed,
}

/// Stream type returned by [`RealtimeDispatcher::attach`]
pub type RealtimeStream = Pin<Box<dyn Stream<Item = Result<RealtimeEvent>> + Send>>;

/// Cancellation handles for in-flight tool tasks, keyed by request id
type PendingTasks = Arc<Mutex<HashMap<String, CancellationToken>>>;

/// Dispatches tool requests from a live session as cancellable background work
pub struct RealtimeDispatcher;

impl RealtimeDispatcher {
    /// Attach a toolbox to a live session
    ///
    /// Returns the stream of content and session events. Tool requests
    /// never appear on the stream; they are executed in the background
    /// and their responses written back into the session input.
    pub fn attach(session: Arc<dyn RealtimeSession>, toolbox: Arc<Toolbox>) -> RealtimeStream {
        let (tx, rx) = mpsc::channel(32);
        tokio::spawn(run(session, toolbox, tx));

        Box::pin(futures::stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|event| (event, rx))
        }))
    }
}

/// Read session events until completion, failure, or consumer drop
async fn run(
    session: Arc<dyn RealtimeSession>,
    toolbox: Arc<Toolbox>,
    tx: mpsc::Sender<Result<RealtimeEvent>>,
) {
    let pending: PendingTasks = Arc::new(Mutex::new(HashMap::new()));

    loop {
        match session.read().await {
            Ok(SessionEvent::Content(content)) => {
                if tx.send(Ok(RealtimeEvent::Content(content))).await.is_err() {
                    break;
                }
            }
            Ok(SessionEvent::ToolRequest(request)) => {
                spawn_tool_task(
                    Arc::clone(&session),
                    Arc::clone(&toolbox),
                    &pending,
                    request,
                );
            }
            Ok(SessionEvent::Interrupted) => {
                tracing::debug!("turn interrupted; cancelling pending tool tasks");
                cancel_pending(&pending);
                if tx.send(Ok(RealtimeEvent::Interrupted)).await.is_err() {
                    break;
                }
            }
            Ok(SessionEvent::Completed) => {
                let outstanding = pending.lock().unwrap().len();
                debug_assert!(
                    outstanding == 0,
                    "session completed with {outstanding} pending tool tasks"
                );
                if outstanding != 0 {
                    tracing::warn!(outstanding, "session completed with pending tool tasks");
                }
                let _ = tx.send(Ok(RealtimeEvent::Completed)).await;
                break;
            }
            Err(error) => {
                let _ = tx.send(Err(error)).await;
                break;
            }
        }
    }

    // Nothing may deliver stale results once the stream is over
    cancel_pending(&pending);
}

/// Cancel every in-flight tool task
///
/// Entries are removed by the tasks themselves as they observe the
/// cancellation and unwind.
fn cancel_pending(pending: &PendingTasks) {
    for token in pending.lock().unwrap().values() {
        token.cancel();
    }
}

/// Execute one tool request in the background
fn spawn_tool_task(
    session: Arc<dyn RealtimeSession>,
    toolbox: Arc<Toolbox>,
    pending: &PendingTasks,
    request: ToolRequest,
) {
    let token = CancellationToken::new();
    pending
        .lock()
        .unwrap()
        .insert(request.identifier.clone(), token.clone());
    let pending = Arc::clone(pending);

    tokio::spawn(async move {
        let identifier = request.identifier.clone();

        let outcome = tokio::select! {
            biased;
            () = token.cancelled() => None,
            result = toolbox.respond(&request) => Some(result),
        };

        match outcome {
            // Cancelled mid-call; dropping the result is the point
            None => {}
            Some(Ok(response)) => {
                // The turn may have been interrupted after the call
                // finished; a stale result must not reach a session that
                // has already moved on.
                if !token.is_cancelled() {
                    if let Err(error) = session.write(SessionInput::ToolResponse(response)).await {
                        tracing::error!(tool = %request.tool, error = %error, "failed to deliver tool response");
                    }
                }
            }
            Some(Err(error)) => {
                // Log-and-drop: a failed background tool must not take
                // down the whole session.
                tracing::error!(tool = %request.tool, error = %error, "background tool task failed");
            }
        }

        pending.lock().unwrap().remove(&identifier);
    });
}
