//! HTTP protocol implementation.
//!
//! A deliberately small HTTP/1.1 server side: one request per connection,
//! no keep-alive, no chunked bodies.
//!
//! # Architecture
//!
//! - **`connection`**: Per-connection state machine driving parse, route and respond
//! - **`parser`**: Decodes the request line, headers and JSON body from a byte buffer
//! - **`request`**: HTTP request representation
//! - **`response`**: HTTP response representation, builder and canned responses
//! - **`writer`**: Serializes and writes responses to the client
//! - **`mime`**: MIME type detection based on file extensions
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────────────┐
//!        │ AwaitingRequestLine │
//!        └──────────┬──────────┘
//!                   ▼
//!        ┌─────────────────────┐
//!        │  AwaitingHeaders    │
//!        └──────────┬──────────┘
//!                   │ content-length present
//!                   ▼
//!        ┌─────────────────────┐
//!        │   AwaitingBody      │
//!        └──────────┬──────────┘
//!                   ▼
//!        ┌─────────────────────┐
//!        │      Routing        │
//!        └──────────┬──────────┘
//!                   ▼
//!        ┌─────────────────────┐
//!        │     Responding      │
//!        └──────────┬──────────┘
//!                   ▼
//!                Closed   ← also reached directly from any parse failure
//! ```
//!
//! # Example
//!
//! ```ignore
//! use folio::http::connection::Connection;
//! use tokio::net::TcpListener;
//!
//! let listener = TcpListener::bind("127.0.0.1:8080").await?;
//! loop {
//!     let (socket, _addr) = listener.accept().await?;
//!     let handler = handler.clone();
//!     tokio::spawn(async move {
//!         let mut conn = Connection::new(socket, handler, Duration::from_secs(30));
//!         if let Err(e) = conn.run().await {
//!             eprintln!("Connection error: {}", e);
//!         }
//!     });
//! }
//! ```

pub mod request;
pub mod response;
pub mod parser;
pub mod connection;
pub mod writer;
pub mod mime;
