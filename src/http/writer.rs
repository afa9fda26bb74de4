use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::fmt::Write as _;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::response::{Response, StatusCode};

const HTTP_VERSION: &str = "HTTP/1.1";

/// `HTTP/1.1 <code> <reason>`, without the line ending.
pub fn status_line(status: StatusCode) -> String {
    format!("{} {} {}", HTTP_VERSION, status.as_u16(), status.reason_phrase())
}

/// Status line, headers in their given order, and the blank separator line.
///
/// A 301 carries no body and ends right after the separator; 200 and 404
/// are followed by their body as is.
fn render_head(resp: &Response) -> Bytes {
    let size = resp
        .headers
        .iter()
        .map(|(k, v)| k.len() + v.len() + 4)
        .sum::<usize>()
        + 32;
    let mut head = BytesMut::with_capacity(size);

    // Writing into a BytesMut cannot fail.
    let _ = write!(head, "{}\r\n", status_line(resp.status));
    for (name, value) in &resp.headers {
        let _ = write!(head, "{}: {}\r\n", name, value);
    }
    head.put_slice(b"\r\n");

    head.freeze()
}

/// Renders a response into its wire form in one piece.
pub fn serialize_response(resp: &Response) -> Vec<u8> {
    let mut wire = render_head(resp).to_vec();
    wire.extend_from_slice(&resp.body);
    wire
}

/// Holds the rendered head and the body of one response until both are on
/// the wire.
pub struct ResponseWriter {
    status: StatusCode,
    head: Bytes,
    body: Bytes,
}

impl ResponseWriter {
    pub fn new(response: Response) -> Self {
        let head = render_head(&response);
        let body = match response.status {
            StatusCode::MovedPermanently => Bytes::new(),
            StatusCode::Ok | StatusCode::NotFound => Bytes::from(response.body),
        };

        Self {
            status: response.status,
            head,
            body,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Bytes not yet written.
    pub fn remaining(&self) -> usize {
        self.head.len() + self.body.len()
    }

    /// Writes what is left of head and body, then flushes. A failed write
    /// leaves the unsent part in place.
    pub async fn write_to_stream<S>(&mut self, stream: &mut S) -> anyhow::Result<()>
    where
        S: AsyncWrite + Unpin,
    {
        let mut wire = (&mut self.head).chain(&mut self.body);
        stream.write_all_buf(&mut wire).await?;
        stream.flush().await?;
        Ok(())
    }
}
