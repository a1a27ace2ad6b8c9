//! Async chunk readers for subprocess output (non-UTF8-safe).
//!
//! yt-dlp can emit non-UTF8 bytes (titles, filenames) and, without
//! `--newline`, rewrites its progress line with bare `\r`. Reading bytes and
//! splitting on either `\n` or `\r` keeps every progress update a separate
//! chunk and never aborts on invalid UTF-8.

use std::io;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Reads CR- or LF-terminated chunks, skipping empty ones.
pub(crate) struct ChunkReader<R> {
    reader: BufReader<R>,
    buf: Vec<u8>,
}

impl<R: AsyncRead + Unpin> ChunkReader<R> {
    pub(crate) fn new(stream: R) -> Self {
        Self {
            reader: BufReader::new(stream),
            buf: Vec::with_capacity(1024),
        }
    }

    /// Next non-empty chunk, or `None` at end of stream.
    pub(crate) async fn next_chunk(&mut self) -> io::Result<Option<String>> {
        loop {
            self.buf.clear();
            let eof = read_until_line_end(&mut self.reader, &mut self.buf).await?;

            if !self.buf.is_empty() {
                return Ok(Some(String::from_utf8_lossy(&self.buf).into_owned()));
            }
            if eof {
                return Ok(None);
            }
        }
    }
}

/// Append bytes up to (not including) the next `\n` or `\r`. Returns `true` at EOF.
async fn read_until_line_end<R: AsyncRead + Unpin>(
    reader: &mut BufReader<R>,
    buf: &mut Vec<u8>,
) -> io::Result<bool> {
    loop {
        let available = reader.fill_buf().await?;
        if available.is_empty() {
            return Ok(true);
        }

        if let Some(pos) = available.iter().position(|b| *b == b'\n' || *b == b'\r') {
            buf.extend_from_slice(&available[..pos]);
            reader.consume(pos + 1);
            return Ok(false);
        }

        let len = available.len();
        buf.extend_from_slice(available);
        reader.consume(len);
    }
}

/// Drain a diagnostic stream (stderr) into the log.
///
/// The task exits when the stream closes or a read fails.
pub(crate) fn spawn_stderr_logger(
    stream: impl AsyncRead + Unpin + Send + 'static,
    session_id: u64,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut reader = ChunkReader::new(stream);
        loop {
            match reader.next_chunk().await {
                Ok(Some(line)) => {
                    warn!(target: "vidfetch.ytdlp", session = session_id, "stderr: {}", line);
                }
                Ok(None) => break,
                Err(e) => {
                    debug!(target: "vidfetch.ytdlp", session = session_id, error = %e, "stderr reader exiting due to read error");
                    break;
                }
            }
        }
        debug!(target: "vidfetch.ytdlp", session = session_id, "stderr reader task exiting");
    })
}
