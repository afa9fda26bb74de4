use bytes::{Buf, BytesMut};
use std::collections::HashMap;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::{timeout_at, Instant};
use tracing::{debug, info, warn};

use crate::http::parser::{body_length, parse_body, parse_headers, parse_request_line, ParseError, RequestLine};
use crate::http::request::Request;
use crate::http::writer::ResponseWriter;
use crate::server::handler::RequestHandler;

/// Serves a single request over `stream`, then closes it.
pub struct Connection<S> {
    stream: S,
    buffer: BytesMut,
    state: ConnectionState,
    handler: RequestHandler,
    read_timeout: Duration,
    eof: bool,
}

pub enum ConnectionState {
    AwaitingRequestLine,
    AwaitingHeaders(RequestLine),
    AwaitingBody(RequestLine, HashMap<String, String>, usize),
    Routing(Request),
    Responding(ResponseWriter),
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, handler: RequestHandler, read_timeout: Duration) -> Self {
        Self {
            stream,
            buffer: BytesMut::with_capacity(4096),
            state: ConnectionState::AwaitingRequestLine,
            handler,
            read_timeout,
            eof: false,
        }
    }

    /// Drives the connection to `Closed`.
    ///
    /// A request that fails to parse, or does not arrive within the read
    /// timeout, closes the connection without any response.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        let deadline = Instant::now() + self.read_timeout;

        loop {
            let state = std::mem::replace(&mut self.state, ConnectionState::Closed);

            self.state = match state {
                ConnectionState::AwaitingRequestLine => {
                    if self.eof && self.buffer.is_empty() {
                        debug!("Client closed before sending a request");
                        ConnectionState::Closed
                    } else {
                        match parse_request_line(&self.buffer, self.eof) {
                            Ok((line, consumed)) => {
                                self.buffer.advance(consumed);
                                info!(method = line.method.as_str(), uri = %line.uri, "Request");
                                ConnectionState::AwaitingHeaders(line)
                            }
                            Err(ParseError::Incomplete) => {
                                self.await_more(deadline, ConnectionState::AwaitingRequestLine).await?
                            }
                            Err(e) => abort("Bad request", e),
                        }
                    }
                }

                ConnectionState::AwaitingHeaders(line) => {
                    match parse_headers(&self.buffer, self.eof) {
                        Ok((headers, consumed)) => {
                            self.buffer.advance(consumed);
                            match body_length(&headers) {
                                Ok(Some(len)) => ConnectionState::AwaitingBody(line, headers, len),
                                Ok(None) => ConnectionState::Routing(assemble(line, headers, None)),
                                Err(e) => abort("Bad request body", e),
                            }
                        }
                        Err(ParseError::Incomplete) => {
                            self.await_more(deadline, ConnectionState::AwaitingHeaders(line)).await?
                        }
                        Err(e) => abort("Bad request headers", e),
                    }
                }

                ConnectionState::AwaitingBody(line, headers, len) => {
                    match parse_body(&self.buffer, len, self.eof) {
                        Ok((body, json)) => {
                            self.buffer.advance(len);
                            ConnectionState::Routing(assemble(line, headers, Some((body, json))))
                        }
                        Err(ParseError::Incomplete) => {
                            self.await_more(deadline, ConnectionState::AwaitingBody(line, headers, len)).await?
                        }
                        Err(e) => abort("Bad request body", e),
                    }
                }

                ConnectionState::Routing(req) => {
                    let writer = ResponseWriter::new(self.handler.handle(&req).await);
                    info!(
                        uri = %req.uri,
                        status = writer.status().as_u16(),
                        bytes = writer.remaining(),
                        "Responding"
                    );
                    ConnectionState::Responding(writer)
                }

                ConnectionState::Responding(mut writer) => {
                    writer.write_to_stream(&mut self.stream).await?;
                    if let Err(e) = self.stream.shutdown().await {
                        debug!(error = %e, "Shutdown after response failed");
                    }
                    ConnectionState::Closed
                }

                ConnectionState::Closed => {
                    break;
                }
            };
        }

        Ok(())
    }

    /// Reads more bytes, then resumes in `next`. Closes once the deadline passes.
    async fn await_more(&mut self, deadline: Instant, next: ConnectionState) -> anyhow::Result<ConnectionState> {
        match timeout_at(deadline, self.stream.read_buf(&mut self.buffer)).await {
            Ok(Ok(0)) => {
                self.eof = true;
                Ok(next)
            }
            Ok(Ok(_)) => Ok(next),
            Ok(Err(e)) => Err(e.into()),
            Err(_) => {
                warn!("Request not received within read timeout");
                Ok(ConnectionState::Closed)
            }
        }
    }
}

fn abort(context: &str, error: ParseError) -> ConnectionState {
    warn!(error = %error, "{}", context);
    ConnectionState::Closed
}

fn assemble(
    line: RequestLine,
    headers: HashMap<String, String>,
    body: Option<(Vec<u8>, serde_json::Value)>,
) -> Request {
    let (body, json) = match body {
        Some((body, json)) => (Some(body), Some(json)),
        None => (None, None),
    };

    Request {
        method: line.method,
        uri: line.uri,
        version: line.version,
        headers,
        body,
        json,
    }
}
