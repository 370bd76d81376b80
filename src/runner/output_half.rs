//! Output half for draining a child process stream.

use tokio::io::{AsyncRead, AsyncReadExt, BufReader};
use tokio::sync::oneshot;

/// Output half for a child process stream (stdout or stderr).
///
/// Provides a method to drain the stream to end-of-stream in a background
/// task. One half is created per stream so stdout and stderr are always
/// consumed concurrently; a stream left unread can fill its OS pipe buffer
/// and block the child.
pub struct OutputHalf<R: AsyncRead + Unpin + Send> {
    reader: BufReader<R>,
}

impl<R: AsyncRead + Unpin + Send + 'static> OutputHalf<R> {
    /// Create a new output half from an AsyncRead.
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
        }
    }

    /// Consume self and drain the stream to completion in a background task.
    ///
    /// The returned channel yields exactly one value: the full captured text,
    /// or the I/O error that interrupted the read. The read is binary-safe;
    /// bytes that are not valid UTF-8 are replaced rather than failing the
    /// capture. The sender is dropped if the capture task is aborted, which
    /// surfaces as a receive error.
    pub fn capture(self) -> oneshot::Receiver<std::io::Result<String>> {
        let (tx, rx) = oneshot::channel();
        let mut reader = self.reader;

        tokio::spawn(async move {
            let mut buffer = Vec::new();
            let result = reader
                .read_to_end(&mut buffer)
                .await
                .map(move |_| String::from_utf8_lossy(&buffer).into_owned());
            let _ = tx.send(result);
        });

        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[tokio::test]
    async fn captures_full_stream() {
        let half = OutputHalf::new(Cursor::new(b"hello stream".to_vec()));
        let captured = half.capture().await.unwrap().unwrap();
        assert_eq!(captured, "hello stream");
    }

    #[tokio::test]
    async fn captures_empty_stream() {
        let half = OutputHalf::new(Cursor::new(Vec::new()));
        let captured = half.capture().await.unwrap().unwrap();
        assert_eq!(captured, "");
    }

    #[tokio::test]
    async fn captures_non_utf8_bytes_lossily() {
        let half = OutputHalf::new(Cursor::new(vec![0xFF, 0xFE]));
        let captured = half.capture().await.unwrap().unwrap();
        assert_eq!(captured, "\u{FFFD}\u{FFFD}");
    }

    #[tokio::test]
    async fn captures_more_than_a_pipe_buffer() {
        // 64KB+ to mirror the OS pipe buffer size that matters in real runs.
        let data = vec![b'x'; 100_000];
        let half = OutputHalf::new(Cursor::new(data));
        let captured = half.capture().await.unwrap().unwrap();
        assert_eq!(captured.len(), 100_000);
    }
}
