//! The sink bridging the output pipeline to the HTTP transport.
//!
//! Push side: the pipeline's pump tasks. Pull side: the chunked HTTP
//! response body draining the channel. The channel is bounded, so a
//! slow client exerts back-pressure on the pumps instead of buffering
//! the whole job output in memory.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::mpsc;

/// Final outcome of one job, rendered as the last line of the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalStatus {
    /// The worker exited. `code` is `None` when it was killed by a signal.
    Exited { code: Option<i32> },
    /// The worker could not run to completion (spawn or wait failure).
    Failed { message: String },
}

impl TerminalStatus {
    /// The human-readable final line pushed to the client.
    ///
    /// These strings are a wire contract with the Korean-language UI;
    /// keep them stable.
    pub fn message(&self) -> String {
        match self {
            Self::Exited { code: Some(code) } => {
                format!("\n프로세스가 종료되었습니다. (코드: {code})\n")
            }
            Self::Exited { code: None } => {
                "\n프로세스가 종료되었습니다. (코드: unknown)\n".to_string()
            }
            Self::Failed { message } => format!("오류: {message}\n"),
        }
    }
}

/// Write side of the client stream.
///
/// Cloneable; the stdout pump, stderr pump, and supervisor each hold
/// one. The closed flag is the single point of coordination: the
/// check-and-set is atomic, so a write racing the close is either
/// delivered before it or dropped, never delivered after a panic.
#[derive(Clone)]
pub struct StreamSink {
    tx: mpsc::Sender<Bytes>,
    closed: Arc<AtomicBool>,
}

impl StreamSink {
    /// Create a sink and the receiver the transport layer drains.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<Bytes>) {
        let (tx, rx) = mpsc::channel(capacity);
        (
            Self {
                tx,
                closed: Arc::new(AtomicBool::new(false)),
            },
            rx,
        )
    }

    /// Push a chunk toward the client.
    ///
    /// A chunk arriving after close is dropped and logged, not an
    /// error. A failed send means the receiver is gone (the client
    /// disconnected); that marks the sink closed and the chunk is
    /// dropped -- the worker itself is not touched.
    pub async fn send(&self, chunk: impl Into<Bytes>) {
        if self.closed.load(Ordering::Acquire) {
            tracing::debug!("Dropping chunk: stream sink already closed");
            return;
        }
        if self.tx.send(chunk.into()).await.is_err() && !self.closed.swap(true, Ordering::AcqRel) {
            tracing::debug!("Client disconnected; stream sink closed");
        }
    }

    /// Mark the sink closed. Returns `true` only for the call that
    /// performed the transition, so terminal handling can run exactly
    /// once even if multiple paths race to close.
    pub fn close(&self) -> bool {
        !self.closed.swap(true, Ordering::AcqRel)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}
