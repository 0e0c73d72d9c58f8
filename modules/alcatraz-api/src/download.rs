//! Large synthetic log download.
//!
//! The payload is one fixed-size chunk written `chunk_count` times. Only that
//! one chunk is ever allocated: every write hands the sink a reference-counted
//! handle to the same buffer, and the sink is flushed after each write so the
//! transport never accumulates more than a chunk.

use std::io;

use async_trait::async_trait;
use axum::body::Body;
use bytes::Bytes;
use tokio::sync::mpsc;
use tracing::debug;

use crate::error::ApiError;

pub const CHUNK_SIZE: usize = 1024 * 1024;
pub const CHUNK_COUNT: usize = 1024;
pub const FILL_BYTE: u8 = b'A';
pub const DOWNLOAD_FILENAME: &str = "log.txt";

/// Shape of the generated payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadSpec {
    pub chunk_size: usize,
    pub chunk_count: usize,
    pub fill_byte: u8,
}

impl Default for DownloadSpec {
    fn default() -> Self {
        Self {
            chunk_size: CHUNK_SIZE,
            chunk_count: CHUNK_COUNT,
            fill_byte: FILL_BYTE,
        }
    }
}

impl DownloadSpec {
    pub fn total_bytes(&self) -> u64 {
        self.chunk_size as u64 * self.chunk_count as u64
    }

    pub fn content_disposition(&self) -> String {
        format!("attachment; filename={DOWNLOAD_FILENAME}")
    }
}

/// Output transport for a streamed payload.
#[async_trait]
pub trait ChunkSink: Send {
    /// Whether `flush` actually pushes data to the peer.
    fn supports_flush(&self) -> bool;

    async fn write_chunk(&mut self, chunk: Bytes) -> io::Result<()>;

    async fn flush(&mut self) -> io::Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamOutcome {
    Completed { bytes_written: u64 },
    /// The sink failed mid-stream, usually because the client went away.
    Aborted { bytes_written: u64 },
}

impl StreamOutcome {
    pub fn bytes_written(&self) -> u64 {
        match self {
            StreamOutcome::Completed { bytes_written } | StreamOutcome::Aborted { bytes_written } => {
                *bytes_written
            }
        }
    }
}

/// A download that has been checked against its sink and is ready to run.
pub struct PayloadStream<S> {
    sink: S,
    spec: DownloadSpec,
}

impl<S: ChunkSink> PayloadStream<S> {
    /// Refuses sinks that cannot flush incrementally. Nothing is written on failure.
    pub fn prepare(sink: S, spec: DownloadSpec) -> Result<Self, ApiError> {
        if !sink.supports_flush() {
            return Err(ApiError::StreamingUnsupported);
        }
        Ok(Self { sink, spec })
    }

    pub async fn run(mut self) -> StreamOutcome {
        let chunk = Bytes::from(vec![self.spec.fill_byte; self.spec.chunk_size]);
        let mut bytes_written = 0u64;

        for i in 0..self.spec.chunk_count {
            if let Err(e) = self.sink.write_chunk(chunk.clone()).await {
                debug!(chunk = i, bytes_written, error = %e, "Download write failed, stopping");
                return StreamOutcome::Aborted { bytes_written };
            }
            bytes_written += chunk.len() as u64;

            if let Err(e) = self.sink.flush().await {
                debug!(chunk = i, bytes_written, error = %e, "Download flush failed, stopping");
                return StreamOutcome::Aborted { bytes_written };
            }
        }

        StreamOutcome::Completed { bytes_written }
    }
}

/// Feeds an HTTP response body through a single-slot channel.
pub struct ChannelSink {
    tx: mpsc::Sender<Bytes>,
}

/// Create a sink and the response body it feeds.
pub fn channel_body() -> (ChannelSink, Body) {
    let (tx, mut rx) = mpsc::channel::<Bytes>(1);
    let stream = async_stream::stream! {
        while let Some(chunk) = rx.recv().await {
            yield Ok::<Bytes, io::Error>(chunk);
        }
    };
    (ChannelSink { tx }, Body::from_stream(stream))
}

fn body_dropped() -> io::Error {
    io::Error::new(io::ErrorKind::BrokenPipe, "response body dropped")
}

#[async_trait]
impl ChunkSink for ChannelSink {
    fn supports_flush(&self) -> bool {
        true
    }

    async fn write_chunk(&mut self, chunk: Bytes) -> io::Result<()> {
        self.tx.send(chunk).await.map_err(|_| body_dropped())
    }

    /// Waits until the body has taken the queued chunk.
    async fn flush(&mut self) -> io::Result<()> {
        self.tx.reserve().await.map(drop).map_err(|_| body_dropped())
    }
}
