use anyhow::Context;
use bytes::{BufMut, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::http::response::{Body, Response};

const HTTP_VERSION: &str = "HTTP/1.1";

/// Size of each read from a streamed body.
pub const CHUNK_SIZE: usize = 1024;

/// Serializes the status line, the headers when the body carries them, and
/// the blank line that ends the head.
pub fn serialize_head(resp: &Response) -> BytesMut {
    let mut buf = BytesMut::with_capacity(128);

    // Status line
    buf.put_slice(
        format!(
            "{} {} {}\r\n",
            HTTP_VERSION,
            resp.status.as_u16(),
            resp.status.reason_phrase()
        )
        .as_bytes(),
    );

    if resp.body.has_headers() {
        buf.put_slice(format!("Content-type: {}\r\n", resp.content_type).as_bytes());
        buf.put_slice(format!("Content-length: {}\r\n", resp.body.len()).as_bytes());
    }

    // Header/body separator
    buf.put_slice(b"\r\n");

    buf
}

/// Writes responses onto a forward-only output.
///
/// The head goes out before any body byte, so the declared length is fixed
/// once `send` starts.
pub struct ResponseWriter<'a, W> {
    out: &'a mut W,
    written: u64,
}

impl<'a, W> ResponseWriter<'a, W>
where
    W: AsyncWrite + Unpin,
{
    pub fn new(out: &'a mut W) -> Self {
        Self { out, written: 0 }
    }

    /// Body bytes written so far. After a failed `send` this is how far the
    /// body got.
    pub fn body_bytes_written(&self) -> u64 {
        self.written
    }

    /// Writes the whole response, flushing after the head and again after the
    /// body. Returns the number of body bytes sent, which always equals the
    /// declared Content-length on success.
    pub async fn send(&mut self, response: Response) -> anyhow::Result<u64> {
        let head = serialize_head(&response);
        self.out
            .write_all(&head)
            .await
            .context("failed to write response head")?;
        self.out.flush().await.context("failed to flush response head")?;

        match response.body {
            Body::Literal(payload) => {
                self.out
                    .write_all(&payload)
                    .await
                    .context("failed to write response body")?;
                self.written = payload.len() as u64;
            }
            Body::Stream { reader, len } => {
                self.copy_body(reader, len).await?;
            }
        }

        self.out.flush().await.context("failed to flush response")?;

        Ok(self.written)
    }

    async fn copy_body<R>(&mut self, reader: R, len: u64) -> anyhow::Result<()>
    where
        R: AsyncRead + Unpin,
    {
        // Never send more than was declared, even if the file grew.
        let mut reader = reader.take(len);
        let mut chunk = BytesMut::with_capacity(CHUNK_SIZE);

        loop {
            chunk.clear();
            let n = reader
                .read_buf(&mut chunk)
                .await
                .context("failed to read response body")?;

            if n == 0 {
                break;
            }

            self.out
                .write_all(&chunk)
                .await
                .context("failed to write response body")?;
            self.written += n as u64;
        }

        if self.written < len {
            anyhow::bail!(
                "response body truncated: declared {} bytes, sent {}",
                len,
                self.written
            );
        }

        Ok(())
    }
}
