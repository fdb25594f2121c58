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

use crate::observability::events;
use crate::protocol::client_fault::ClientFault;
use crate::protocol::frame::{Frame, FrameHandler, FrameSink};
use async_trait::async_trait;
use tracing::{debug, warn};

const COMPONENT: &str = "receipt_handler";

/// Acknowledges receipt requests before passing frames down the pipeline.
///
/// When an inbound frame carries [`RECEIPT_HEADER`](crate::RECEIPT_HEADER),
/// exactly one RECEIPT frame echoing its value is written and flushed, then
/// the unchanged frame goes to `next`. A failed receipt write is logged and
/// does not stop dispatch.
pub struct ReceiptWritingHandler<H> {
    next: H,
}

impl<H: FrameHandler> ReceiptWritingHandler<H> {
    pub fn new(next: H) -> Self {
        Self { next }
    }

    pub fn inner(&self) -> &H {
        &self.next
    }
}

#[async_trait]
impl<H: FrameHandler> FrameHandler for ReceiptWritingHandler<H> {
    async fn on_frame(&self, frame: Frame, sink: &dyn FrameSink) -> Result<(), ClientFault> {
        if let Some(receipt_id) = frame.receipt_request() {
            let receipt = Frame::receipt(receipt_id);
            match sink.write_and_flush(receipt).await {
                Ok(()) => debug!(
                    event = events::RECEIPT_WRITE,
                    component = COMPONENT,
                    receipt_id,
                    command = %frame.command(),
                    "receipt written"
                ),
                Err(err) => warn!(
                    event = events::RECEIPT_WRITE_FAILED,
                    component = COMPONENT,
                    receipt_id,
                    err = %err,
                    "failed to write receipt"
                ),
            }
        }

        let command = frame.command();
        self.next.on_frame(frame, sink).await.map_err(|fault| {
            debug!(
                event = events::CLIENT_FAULT,
                component = COMPONENT,
                command = %command,
                fault = %fault,
                "handler raised client fault"
            );
            fault
        })
    }
}

#[cfg(test)]
mod tests {
    use super::ReceiptWritingHandler;
    use crate::data_plane::transport::TransportError;
    use crate::protocol::client_fault::ClientFault;
    use crate::protocol::frame::{Command, Frame, FrameHandler, FrameSink, RECEIPT_HEADER};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Journal {
        entries: Mutex<Vec<(&'static str, Frame)>>,
    }

    impl Journal {
        fn push(&self, source: &'static str, frame: Frame) {
            self.entries.lock().expect("journal lock").push((source, frame));
        }

        fn take(&self) -> Vec<(&'static str, Frame)> {
            std::mem::take(&mut *self.entries.lock().expect("journal lock"))
        }
    }

    #[async_trait]
    impl FrameSink for Journal {
        async fn write_and_flush(&self, frame: Frame) -> Result<(), TransportError> {
            self.push("sink", frame);
            Ok(())
        }
    }

    struct FailingSink;

    #[async_trait]
    impl FrameSink for FailingSink {
        async fn write_and_flush(&self, _frame: Frame) -> Result<(), TransportError> {
            Err(TransportError::Io("connection reset".to_string()))
        }
    }

    /// Records into the same journal as the sink so ordering is observable.
    struct Next<'a> {
        journal: &'a Journal,
    }

    #[async_trait]
    impl FrameHandler for Next<'_> {
        async fn on_frame(&self, frame: Frame, _sink: &dyn FrameSink) -> Result<(), ClientFault> {
            self.journal.push("next", frame);
            Ok(())
        }
    }

    struct Rejecting;

    #[async_trait]
    impl FrameHandler for Rejecting {
        async fn on_frame(&self, frame: Frame, _sink: &dyn FrameSink) -> Result<(), ClientFault> {
            Err(ClientFault::new("rejected").with_frame(frame))
        }
    }

    #[tokio::test]
    async fn receipt_precedes_the_unchanged_frame() {
        let journal = Journal::default();
        let handler = ReceiptWritingHandler::new(Next { journal: &journal });
        let inbound = Frame::new(Command::Send)
            .with_header(RECEIPT_HEADER, "r-42")
            .with_body(b"payload".to_vec());

        handler
            .on_frame(inbound.clone(), &journal)
            .await
            .expect("handled");

        let entries = journal.take();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], ("sink", Frame::receipt("r-42")));
        assert_eq!(entries[1], ("next", inbound));
    }

    #[tokio::test]
    async fn frames_without_receipt_header_write_nothing() {
        let journal = Journal::default();
        let handler = ReceiptWritingHandler::new(Next { journal: &journal });
        let inbound = Frame::new(Command::Ack);

        handler
            .on_frame(inbound.clone(), &journal)
            .await
            .expect("handled");

        assert_eq!(journal.take(), vec![("next", inbound)]);
    }

    #[tokio::test]
    async fn failed_receipt_write_still_dispatches() {
        let journal = Journal::default();
        let handler = ReceiptWritingHandler::new(Next { journal: &journal });
        let inbound = Frame::new(Command::Send).with_header(RECEIPT_HEADER, "r-1");

        handler
            .on_frame(inbound.clone(), &FailingSink)
            .await
            .expect("handled");

        assert_eq!(journal.take(), vec![("next", inbound)]);
    }

    #[tokio::test]
    async fn client_faults_surface_unchanged() {
        let journal = Journal::default();
        let handler = ReceiptWritingHandler::new(Rejecting);
        let inbound = Frame::new(Command::Subscribe).with_header(RECEIPT_HEADER, "r-5");

        let fault = handler
            .on_frame(inbound.clone(), &journal)
            .await
            .expect_err("fault");

        assert_eq!(fault.frame(), Some(&inbound));
        assert_eq!(fault.to_error_frame().receipt_id(), Some("r-5"));
        assert_eq!(journal.take(), vec![("sink", Frame::receipt("r-5"))]);
    }
}
