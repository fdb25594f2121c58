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

mod support;

use async_trait::async_trait;
use channel_router::{
    ClientFault, Command, Frame, FrameHandler, FrameSink, ReceiptWritingHandler, RouterContext,
    TransportError, RECEIPT_HEADER,
};
use std::sync::Arc;
use support::{in_memory_store, key, open_router};
use tokio::sync::Mutex;

#[derive(Default)]
struct WireLog {
    frames: Mutex<Vec<String>>,
}

#[async_trait]
impl FrameSink for WireLog {
    async fn write_and_flush(&self, frame: Frame) -> Result<(), TransportError> {
        let line = format!("{} {}", frame.command(), frame.receipt_id().unwrap_or("-"));
        self.frames.lock().await.push(line);
        Ok(())
    }
}

/// Adds a route for every SEND frame and reports unknown commands as faults.
struct RouteOnSend {
    context: RouterContext,
    log: Arc<WireLog>,
}

#[async_trait]
impl FrameHandler for RouteOnSend {
    async fn on_frame(&self, frame: Frame, _sink: &dyn FrameSink) -> Result<(), ClientFault> {
        self.log
            .frames
            .lock()
            .await
            .push(format!("handled {}", frame.command()));

        match frame.command() {
            Command::Send => {
                let destination = frame.header("destination").unwrap_or("unknown").to_string();
                let router = open_router(&self.context, "inbox").await;
                router
                    .add_route(&key(&destination), &[])
                    .await
                    .map_err(|err| {
                        ClientFault::new("routing failed").with_details(err.to_string())
                    })?;
                Ok(())
            }
            _ => Err(ClientFault::new("unsupported command")
                .with_details(frame.command().to_string())
                .with_frame(frame)),
        }
    }
}

#[tokio::test]
async fn receipt_is_written_before_dispatch() {
    integration_test_utils::init_logging();

    let log = Arc::new(WireLog::default());
    let context = RouterContext::new(in_memory_store());
    let handler = ReceiptWritingHandler::new(RouteOnSend {
        context: context.clone(),
        log: log.clone(),
    });

    let frame = Frame::new(Command::Send)
        .with_header(RECEIPT_HEADER, "r-42")
        .with_header("destination", "audit");
    handler.on_frame(frame, log.as_ref()).await.expect("handled");

    assert_eq!(
        *log.frames.lock().await,
        vec!["RECEIPT r-42".to_string(), "handled SEND".to_string()]
    );

    let router = open_router(&context, "inbox").await;
    let routes = router.routes().await.expect("open router");
    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0].target_key(), &key("audit"));
}

#[tokio::test]
async fn frames_without_receipt_request_get_no_receipt() {
    integration_test_utils::init_logging();

    let log = Arc::new(WireLog::default());
    let handler = ReceiptWritingHandler::new(RouteOnSend {
        context: RouterContext::new(in_memory_store()),
        log: log.clone(),
    });

    let frame = Frame::new(Command::Send).with_header("destination", "audit");
    handler.on_frame(frame, log.as_ref()).await.expect("handled");

    assert_eq!(*log.frames.lock().await, vec!["handled SEND".to_string()]);
}

#[tokio::test]
async fn client_fault_becomes_error_frame_with_receipt() {
    integration_test_utils::init_logging();

    let log = Arc::new(WireLog::default());
    let handler = ReceiptWritingHandler::new(RouteOnSend {
        context: RouterContext::new(in_memory_store()),
        log: log.clone(),
    });

    let frame = Frame::new(Command::Begin).with_header(RECEIPT_HEADER, "r-9");
    let fault = handler
        .on_frame(frame, log.as_ref())
        .await
        .expect_err("BEGIN is unsupported");
    log.write_and_flush(fault.to_error_frame())
        .await
        .expect("sink open");

    assert_eq!(fault.message(), "unsupported command");
    assert_eq!(fault.details(), Some("BEGIN"));
    assert_eq!(
        *log.frames.lock().await,
        vec![
            "RECEIPT r-9".to_string(),
            "handled BEGIN".to_string(),
            "ERROR r-9".to_string(),
        ]
    );
}
