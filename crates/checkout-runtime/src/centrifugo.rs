//! Centrifugo Status Channel
//!
//! Implementation of `StatusChannel` over Centrifugo's unidirectional HTTP
//! stream: one POST opens the connection with the page's token and the order
//! channel in `subs`, the server then writes newline-delimited JSON frames.
//!
//! ```text
//! {"connect":{"client":"...","version":"..."}}
//! {}                                                      <- ping
//! {"push":{"channel":"payment:notify#42","pub":{"data":{"status":"completed"}}}}
//! ```

use std::collections::{HashMap, VecDeque};
use std::fmt::Display;

use async_trait::async_trait;
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};

use checkout_core::{
    CheckoutError, Result, StatusChannel, StatusMessage, StatusSubscription,
};

use crate::config::ChannelConfig;

/// Centrifugo streaming client
#[derive(Clone, Debug)]
pub struct CentrifugoChannel {
    client: reqwest::Client,
    url: String,
    token: String,
}

impl CentrifugoChannel {
    pub fn new(url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            token: token.into(),
        }
    }

    /// Create from configuration
    pub fn from_config(config: &ChannelConfig) -> Self {
        Self::new(config.url.clone(), config.token.clone())
    }
}

#[derive(Serialize)]
struct ConnectRequest<'a> {
    token: &'a str,
    subs: HashMap<&'a str, serde_json::Value>,
}

#[async_trait(?Send)]
impl StatusChannel for CentrifugoChannel {
    async fn subscribe(&self, channel: &str) -> Result<StatusSubscription> {
        let request = ConnectRequest {
            token: &self.token,
            subs: HashMap::from([(channel, serde_json::json!({}))]),
        };

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| CheckoutError::Channel(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CheckoutError::Channel(format!(
                "connection rejected with status {status}"
            )));
        }

        let frames = decode_frames(response.bytes_stream(), channel.to_string());
        Ok(StatusSubscription::new(channel, frames.boxed_local()))
    }
}

/// Longest unterminated line the decoder will buffer
pub const MAX_LINE_LEN: usize = 64 * 1024;

/// Splits a byte stream into trimmed, non-empty lines
#[derive(Debug, Default)]
pub struct LineDecoder {
    buf: Vec<u8>,
}

impl LineDecoder {
    /// Feed a chunk, returning every line it completed.
    ///
    /// Fails once the pending partial line exceeds [`MAX_LINE_LEN`]; the
    /// buffer is dropped at that point.
    pub fn push(&mut self, chunk: &[u8]) -> Result<Vec<String>> {
        self.buf.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(pos) = self.buf.iter().position(|b| *b == b'\n') {
            let raw: Vec<u8> = self.buf.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&raw).trim().to_string();
            if !line.is_empty() {
                lines.push(line);
            }
        }

        if self.buf.len() > MAX_LINE_LEN {
            let len = self.buf.len();
            self.buf = Vec::new();
            return Err(CheckoutError::Channel(format!(
                "frame exceeds {MAX_LINE_LEN} bytes without a newline ({len} buffered)"
            )));
        }

        Ok(lines)
    }

    /// Whatever is left once the stream ends
    pub fn finish(&mut self) -> Option<String> {
        let raw = std::mem::take(&mut self.buf);
        let line = String::from_utf8_lossy(&raw).trim().to_string();
        (!line.is_empty()).then_some(line)
    }
}

#[derive(Deserialize)]
struct Frame {
    #[serde(default)]
    push: Option<Push>,
    #[serde(default)]
    disconnect: Option<Disconnect>,
}

#[derive(Deserialize)]
struct Push {
    #[serde(default)]
    channel: String,
    #[serde(rename = "pub", default)]
    publication: Option<Publication>,
}

#[derive(Deserialize)]
struct Publication {
    data: serde_json::Value,
}

#[derive(Deserialize)]
struct Disconnect {
    #[serde(default)]
    code: u32,
    #[serde(default)]
    reason: String,
}

/// Turn one frame into a status message.
///
/// Pings, connect replies, other channels' pushes and payloads without a
/// `status` yield `None`; a disconnect yields an error.
pub fn parse_frame(line: &str, channel: &str) -> Option<Result<StatusMessage>> {
    let frame: Frame = match serde_json::from_str(line) {
        Ok(frame) => frame,
        Err(e) => {
            tracing::warn!(error = %e, "Skipping malformed status frame");
            return None;
        }
    };

    if let Some(d) = frame.disconnect {
        return Some(Err(CheckoutError::Channel(format!(
            "disconnected ({}): {}",
            d.code, d.reason
        ))));
    }

    let push = frame.push?;
    if push.channel != channel {
        tracing::debug!(channel = %push.channel, "Ignoring push for another channel");
        return None;
    }

    let data = push.publication?.data;
    match serde_json::from_value::<StatusMessage>(data) {
        Ok(message) => Some(Ok(message)),
        Err(e) => {
            tracing::debug!(error = %e, "Publication carries no status");
            None
        }
    }
}

struct DecodeState<S> {
    chunks: std::pin::Pin<Box<S>>,
    lines: LineDecoder,
    pending: VecDeque<Result<StatusMessage>>,
    channel: String,
    done: bool,
}

impl<S> DecodeState<S> {
    fn accept(&mut self, line: &str) {
        if let Some(item) = parse_frame(line, &self.channel) {
            self.pending.push_back(item);
        }
    }
}

/// Decode a chunked NDJSON body into status messages for `channel`
pub fn decode_frames<S, B, E>(chunks: S, channel: String) -> impl Stream<Item = Result<StatusMessage>>
where
    S: Stream<Item = std::result::Result<B, E>>,
    B: AsRef<[u8]>,
    E: Display,
{
    let state = DecodeState {
        chunks: Box::pin(chunks),
        lines: LineDecoder::default(),
        pending: VecDeque::new(),
        channel,
        done: false,
    };

    futures::stream::unfold(state, |mut state| async move {
        loop {
            if let Some(item) = state.pending.pop_front() {
                return Some((item, state));
            }
            if state.done {
                return None;
            }

            match state.chunks.next().await {
                Some(Ok(chunk)) => match state.lines.push(chunk.as_ref()) {
                    Ok(lines) => {
                        for line in lines {
                            state.accept(&line);
                        }
                    }
                    Err(e) => {
                        state.pending.push_back(Err(e));
                        state.done = true;
                    }
                },
                Some(Err(e)) => {
                    state
                        .pending
                        .push_back(Err(CheckoutError::Channel(e.to_string())));
                    state.done = true;
                }
                None => {
                    if let Some(line) = state.lines.finish() {
                        state.accept(&line);
                    }
                    state.done = true;
                }
            }
        }
    })
}
