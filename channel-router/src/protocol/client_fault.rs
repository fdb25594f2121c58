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

use crate::protocol::frame::{Frame, RECEIPT_ID_HEADER};
use thiserror::Error;

/// A client-caused fault, surfaced to the protocol layer as an ERROR frame.
///
/// The routing core never recovers from these locally.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("{message}")]
pub struct ClientFault {
    message: String,
    details: Option<String>,
    frame: Option<Box<Frame>>,
}

impl ClientFault {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            details: None,
            frame: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Attaches the frame that caused the fault.
    pub fn with_frame(mut self, frame: Frame) -> Self {
        self.frame = Some(Box::new(frame));
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    pub fn frame(&self) -> Option<&Frame> {
        self.frame.as_deref()
    }

    /// ERROR frame for the client. Echoes the receipt id when the
    /// originating frame asked for one.
    pub fn to_error_frame(&self) -> Frame {
        let error = Frame::error(self.message.as_str(), self.details.as_deref());
        match self.frame().and_then(Frame::receipt_request) {
            Some(receipt) => error.with_header(RECEIPT_ID_HEADER, receipt),
            None => error,
        }
    }
}
