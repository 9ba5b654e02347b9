//! Message framing: `Content-Length: N\r\n\r\n{json}` over any async
//! byte stream. The frame cap matches the 50 MB message limit the
//! service has always advertised to clients.

use anyhow::{Context, Result, bail};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};

/// Largest accepted frame body.
const MAX_MESSAGE_BYTES: usize = 50 * 1024 * 1024;

/// Reads length-prefixed JSON frames from an async reader.
pub struct FrameReader<R> {
    reader: BufReader<R>,
}

impl<R: AsyncRead + Unpin> FrameReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
        }
    }

    /// Read the next frame; `Ok(None)` means the peer closed cleanly
    /// between frames.
    pub async fn read_frame(&mut self) -> Result<Option<serde_json::Value>> {
        let Some(length) = self.read_content_length().await? else {
            return Ok(None);
        };
        if length > MAX_MESSAGE_BYTES {
            bail!("frame of {length} bytes exceeds the {MAX_MESSAGE_BYTES}-byte message limit");
        }

        let mut body = vec![0u8; length];
        self.reader
            .read_exact(&mut body)
            .await
            .context("reading frame body")?;
        let value = serde_json::from_slice(&body).context("parsing frame body as JSON")?;
        Ok(Some(value))
    }

    /// Consume header lines up to the blank separator and return the
    /// Content-Length value, or `None` on EOF before any header byte.
    async fn read_content_length(&mut self) -> Result<Option<usize>> {
        let mut length = None;
        let mut line = String::new();
        let mut mid_headers = false;

        loop {
            line.clear();
            let read = self
                .reader
                .read_line(&mut line)
                .await
                .context("reading frame header")?;
            if read == 0 {
                if mid_headers {
                    bail!("connection closed in the middle of frame headers");
                }
                return Ok(None);
            }
            mid_headers = true;

            let header = line.trim();
            if header.is_empty() {
                break;
            }
            if let Some((name, value)) = header.split_once(':')
                && name.trim().eq_ignore_ascii_case("Content-Length")
            {
                length = Some(
                    value
                        .trim()
                        .parse()
                        .with_context(|| format!("invalid Content-Length {value:?}"))?,
                );
            }
            // Anything else (Content-Type and friends) is ignored.
        }

        match length {
            Some(length) => Ok(Some(length)),
            None => bail!("frame headers carried no Content-Length"),
        }
    }
}

/// Writes length-prefixed JSON frames to an async writer.
pub struct FrameWriter<W> {
    writer: W,
}

impl<W: AsyncWrite + Unpin> FrameWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub async fn write_frame(&mut self, message: &serde_json::Value) -> Result<()> {
        let body = serde_json::to_vec(message).context("serializing frame")?;
        let header = format!("Content-Length: {}\r\n\r\n", body.len());
        self.writer
            .write_all(header.as_bytes())
            .await
            .context("writing frame header")?;
        self.writer
            .write_all(&body)
            .await
            .context("writing frame body")?;
        self.writer.flush().await.context("flushing frame")?;
        Ok(())
    }
}
