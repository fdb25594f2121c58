/********************************************************************************
 * Copyright (c) 2026 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

use crate::data_plane::transport::TransportError;
use crate::protocol::client_fault::ClientFault;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Header a client sets to request a receipt.
pub const RECEIPT_HEADER: &str = "receipt";
/// Header carrying the echoed receipt identifier.
pub const RECEIPT_ID_HEADER: &str = "receipt-id";
/// Short error description on ERROR frames.
pub const MESSAGE_HEADER: &str = "message";

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Command {
    Connect,
    Connected,
    Send,
    Subscribe,
    Unsubscribe,
    Ack,
    Nack,
    Begin,
    Commit,
    Abort,
    Disconnect,
    Message,
    Receipt,
    Error,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Command::Connect => "CONNECT",
            Command::Connected => "CONNECTED",
            Command::Send => "SEND",
            Command::Subscribe => "SUBSCRIBE",
            Command::Unsubscribe => "UNSUBSCRIBE",
            Command::Ack => "ACK",
            Command::Nack => "NACK",
            Command::Begin => "BEGIN",
            Command::Commit => "COMMIT",
            Command::Abort => "ABORT",
            Command::Disconnect => "DISCONNECT",
            Command::Message => "MESSAGE",
            Command::Receipt => "RECEIPT",
            Command::Error => "ERROR",
        };
        f.write_str(name)
    }
}

/// One protocol frame: a command, headers and an opaque body.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    command: Command,
    headers: BTreeMap<String, String>,
    body: Vec<u8>,
}

impl Frame {
    pub fn new(command: Command) -> Self {
        Self {
            command,
            headers: BTreeMap::new(),
            body: Vec::new(),
        }
    }

    /// RECEIPT frame acknowledging `receipt_id`.
    pub fn receipt(receipt_id: impl Into<String>) -> Self {
        Self::new(Command::Receipt).with_header(RECEIPT_ID_HEADER, receipt_id)
    }

    /// ERROR frame with `message` as header and `details` as body.
    pub fn error(message: impl Into<String>, details: Option<&str>) -> Self {
        let frame = Self::new(Command::Error).with_header(MESSAGE_HEADER, message);
        match details {
            Some(details) => frame.with_body(details.as_bytes().to_vec()),
            None => frame,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    pub fn command(&self) -> Command {
        self.command
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Receipt the client asked for, if any.
    pub fn receipt_request(&self) -> Option<&str> {
        self.header(RECEIPT_HEADER)
    }

    /// Identifier echoed by a RECEIPT or ERROR frame.
    pub fn receipt_id(&self) -> Option<&str> {
        self.header(RECEIPT_ID_HEADER)
    }
}

/// Outbound side of a client connection.
#[async_trait]
pub trait FrameSink: Send + Sync {
    /// Writes `frame` and flushes it before returning.
    async fn write_and_flush(&self, frame: Frame) -> Result<(), TransportError>;
}

/// One stage of the inbound frame pipeline.
#[async_trait]
pub trait FrameHandler: Send + Sync {
    async fn on_frame(&self, frame: Frame, sink: &dyn FrameSink) -> Result<(), ClientFault>;
}

#[cfg(test)]
mod tests {
    use super::{Command, Frame, MESSAGE_HEADER, RECEIPT_HEADER};

    #[test]
    fn receipt_frame_echoes_identifier() {
        let frame = Frame::receipt("r-1");
        assert_eq!(frame.command(), Command::Receipt);
        assert_eq!(frame.receipt_id(), Some("r-1"));
        assert!(frame.body().is_empty());
    }

    #[test]
    fn error_frame_carries_message_and_details() {
        let frame = Frame::error("bad destination", Some("no such queue"));
        assert_eq!(frame.command(), Command::Error);
        assert_eq!(frame.header(MESSAGE_HEADER), Some("bad destination"));
        assert_eq!(frame.body(), b"no such queue");

        let bare = Frame::error("bad destination", None);
        assert!(bare.body().is_empty());
    }

    #[test]
    fn receipt_request_reads_receipt_header() {
        let frame = Frame::new(Command::Send).with_header(RECEIPT_HEADER, "r-9");
        assert_eq!(frame.receipt_request(), Some("r-9"));
        assert_eq!(Frame::new(Command::Send).receipt_request(), None);
    }

    #[test]
    fn command_serializes_as_wire_name() {
        assert_eq!(Command::Unsubscribe.to_string(), "UNSUBSCRIBE");
        assert_eq!(
            serde_json::to_string(&Command::Unsubscribe).expect("serialize"),
            "\"UNSUBSCRIBE\""
        );
    }
}
