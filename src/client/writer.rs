//! Shared outbound writer
//!
//! Both the application (publish, subscribe) and the reader task (PONG
//! replies) write to the same transport. Frames are written whole under a
//! mutex so they never interleave.

use std::sync::Arc;

use bytes::Bytes;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

use crate::error::Result;
use crate::stats::ClientStats;

type BoxedWrite = Box<dyn AsyncWrite + Send + Unpin>;

/// Cloneable handle to the write half of a connection
#[derive(Clone)]
pub struct FrameWriter {
    inner: Arc<Mutex<BoxedWrite>>,
    stats: Arc<ClientStats>,
}

impl FrameWriter {
    /// Wrap a write half
    pub fn new<W>(writer: W, stats: Arc<ClientStats>) -> Self
    where
        W: AsyncWrite + Send + Unpin + 'static,
    {
        Self {
            inner: Arc::new(Mutex::new(Box::new(writer))),
            stats,
        }
    }

    /// Write one complete frame and flush it
    ///
    /// Fire-and-forget: there is no backpressure beyond the transport's own.
    pub async fn send(&self, frame: Bytes) -> Result<()> {
        let mut writer = self.inner.lock().await;
        writer.write_all(&frame).await?;
        writer.flush().await?;

        self.stats.add_bytes_sent(frame.len());
        tracing::trace!(bytes = frame.len(), "Frame written");
        Ok(())
    }

    /// Shut down the write half
    pub async fn shutdown(&self) -> Result<()> {
        self.inner.lock().await.shutdown().await?;
        Ok(())
    }
}

impl std::fmt::Debug for FrameWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameWriter").finish_non_exhaustive()
    }
}
