//! Streaming transport: a long-lived HTTP request whose body is decoded as
//! Server-Sent Events. The task emits `Open` once headers arrive, one
//! `Message` per `data:` frame, and `Error` when the request, body, or server
//! gives up. Closing the handle is aborting the task.

use futures_util::StreamExt;
use reqwest::header::ACCEPT;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::client::{ClientEvent, Envelope};

/// Cap on bytes buffered for a single event; a frame past this is discarded
/// rather than ballooning client memory on a misbehaving server.
pub const MAX_EVENT_BYTES: usize = 1 << 20;

/// One decoded unit from the stream.
#[derive(Debug, PartialEq, Eq)]
pub enum SseFrame {
    /// Complete `data:` payload.
    Data(String),
    /// A frame that blew past [`MAX_EVENT_BYTES`] and was dropped; carries
    /// the byte count seen before the terminator.
    Oversized(usize),
}

/// Incremental decoder for a `text/event-stream` body. Only `data:` fields
/// are dispatched; comments and the `event:`/`id:`/`retry:` fields are
/// ignored (the monitoring server never sends them).
#[derive(Default)]
pub struct SseDecoder {
    buf: Vec<u8>,
    data: Vec<String>,
    // discarding the current frame until its blank-line terminator
    dropping: bool,
    dropped: usize,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one body chunk, returning every complete frame it closed.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseFrame> {
        self.buf.extend_from_slice(chunk);
        let mut out = Vec::new();
        while let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buf.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line);
            let line = line.trim_end_matches(['\n', '\r']);

            if self.dropping {
                self.dropped += line.len();
                if line.is_empty() {
                    out.push(SseFrame::Oversized(self.dropped));
                    self.dropping = false;
                    self.dropped = 0;
                }
                continue;
            }

            if line.is_empty() {
                // Blank line terminates the event.
                if !self.data.is_empty() {
                    out.push(SseFrame::Data(self.data.join("\n")));
                    self.data.clear();
                }
            } else if let Some(rest) = line.strip_prefix("data:") {
                self.data
                    .push(rest.strip_prefix(' ').unwrap_or(rest).to_string());
                let pending: usize = self.data.iter().map(|s| s.len()).sum();
                if pending > MAX_EVENT_BYTES {
                    self.dropped = pending;
                    self.data.clear();
                    self.dropping = true;
                }
            }
            // Anything else: comment or unrecognized field, skip.
        }
        // A single line with no newline yet can also blow the cap.
        if self.buf.len() > MAX_EVENT_BYTES {
            self.dropped += self.buf.len();
            self.buf.clear();
            self.dropping = true;
        } else if self.dropping && !self.buf.is_empty() {
            self.dropped += self.buf.len();
            self.buf.clear();
        }
        out
    }
}

pub fn spawn(
    url: String,
    epoch: u64,
    tx: mpsc::UnboundedSender<Envelope>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let send = |event: ClientEvent| {
            let _ = tx.send(Envelope { epoch, event });
        };

        let client = reqwest::Client::new();
        let resp = match client
            .get(&url)
            .header(ACCEPT, "text/event-stream")
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                send(ClientEvent::Error(e.to_string()));
                return;
            }
        };
        if !resp.status().is_success() {
            send(ClientEvent::Error(format!(
                "server returned {}",
                resp.status()
            )));
            return;
        }
        debug!(epoch, "stream open");
        send(ClientEvent::Open);

        let mut body = resp.bytes_stream();
        let mut decoder = SseDecoder::new();
        while let Some(item) = body.next().await {
            match item {
                Ok(chunk) => {
                    for frame in decoder.feed(&chunk) {
                        match frame {
                            SseFrame::Data(payload) => send(ClientEvent::Message(payload)),
                            SseFrame::Oversized(n) => send(ClientEvent::Malformed(format!(
                                "oversized stream event dropped ({n} bytes, cap {MAX_EVENT_BYTES})"
                            ))),
                        }
                    }
                }
                Err(e) => {
                    send(ClientEvent::Error(e.to_string()));
                    return;
                }
            }
        }
        // Orderly end of body still means the push channel is gone.
        send(ClientEvent::Error("stream closed by server".into()));
    })
}
