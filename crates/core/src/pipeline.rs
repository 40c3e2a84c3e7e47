//! Output multiplexing for a running job.
//!
//! Three event sources -- the worker's stdout, its stderr, and its exit
//! -- fan in to the single [`StreamSink`]. Two pump tasks forward the
//! output streams chunk by chunk; the supervisor waits for both pumps
//! to hit EOF, reaps the process, then performs the terminal sequence
//! exactly once: final status line, sink close, staged-file cleanup.
//!
//! Within one stream byte order is preserved; interleaving between
//! stdout and stderr is best-effort, matching what any line-based log
//! viewer expects from a subprocess.
//!
//! There is deliberately no timeout here. A worker that never exits
//! (hand-off mode keeps the browser session open) is a supported
//! long-running state, and a client disconnect only stops forwarding --
//! the pumps keep draining so the worker never blocks on a full pipe.

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::task::JoinHandle;

use crate::staging::StagedFile;
use crate::stream::{StreamSink, TerminalStatus};
use crate::worker::WorkerHandle;

/// Marker prepended to every stderr chunk so the client can tell worker
/// diagnostics from progress output without a structured protocol.
pub const ERROR_PREFIX: &str = "ERROR: ";

/// Read buffer size for the pump tasks.
const READ_BUF_SIZE: usize = 4096;

/// Run a launched job to completion in a detached task.
///
/// Returns immediately; the caller hands the receiver half of `sink`'s
/// channel to the transport layer and forgets about the job. The join
/// handle yields the job's terminal status, which tests use to observe
/// outcomes.
pub fn spawn(
    handle: WorkerHandle,
    staged: StagedFile,
    sink: StreamSink,
) -> JoinHandle<TerminalStatus> {
    tokio::spawn(run(handle, staged, sink))
}

async fn run(handle: WorkerHandle, staged: StagedFile, sink: StreamSink) -> TerminalStatus {
    let mut child = handle.child;

    let stdout_pump = child
        .stdout
        .take()
        .map(|out| tokio::spawn(pump(out, sink.clone(), None)));
    let stderr_pump = child
        .stderr
        .take()
        .map(|err| tokio::spawn(pump(err, sink.clone(), Some(ERROR_PREFIX))));

    // Both streams reach EOF when the worker exits (or crashes), so
    // waiting on the pumps first guarantees every chunk is forwarded
    // before the terminal line.
    if let Some(task) = stdout_pump {
        let _ = task.await;
    }
    if let Some(task) = stderr_pump {
        let _ = task.await;
    }

    let status = match child.wait().await {
        Ok(exit) => TerminalStatus::Exited { code: exit.code() },
        Err(e) => TerminalStatus::Failed {
            message: e.to_string(),
        },
    };

    sink.send(status.message()).await;
    sink.close();
    staged.unstage().await;

    tracing::info!(?status, "Job finished");
    status
}

/// Forward one output stream to the sink until EOF.
///
/// `prefix` tags every chunk (used for stderr). Chunks are moved out of
/// the read buffer without copying for the untagged path.
async fn pump<R: AsyncRead + Unpin>(mut reader: R, sink: StreamSink, prefix: Option<&'static str>) {
    let mut buf = BytesMut::with_capacity(READ_BUF_SIZE);
    loop {
        match reader.read_buf(&mut buf).await {
            Ok(n) if n > 0 => {
                let chunk = match prefix {
                    Some(tag) => {
                        let mut tagged = BytesMut::with_capacity(tag.len() + buf.len());
                        tagged.extend_from_slice(tag.as_bytes());
                        tagged.extend_from_slice(&buf.split());
                        tagged.freeze()
                    }
                    None => buf.split().freeze(),
                };
                sink.send(chunk).await;
            }
            _ => break,
        }
    }
}
