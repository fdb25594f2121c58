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

use async_trait::async_trait;
use channel_router::{
    Channel, ChannelKey, ChannelTransport, InMemoryTransport, Message, TransportError, WaitPolicy,
};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Default)]
struct Journal {
    failing: BTreeSet<ChannelKey>,
    sent: BTreeMap<ChannelKey, Vec<Message>>,
    opened: usize,
}

/// [`ChannelTransport`] over an [`InMemoryTransport`] that records every
/// successful send per target and fails sends to chosen targets.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    inner: Arc<InMemoryTransport>,
    journal: Arc<Mutex<Journal>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Underlying queues, for seeding sources and draining targets.
    pub fn queues(&self) -> Arc<InMemoryTransport> {
        self.inner.clone()
    }

    /// Every later send to `key` fails with [`TransportError::Io`].
    pub async fn fail_sends_to(&self, key: &ChannelKey) {
        self.journal.lock().await.failing.insert(key.clone());
    }

    pub async fn sent_to(&self, key: &ChannelKey) -> Vec<Message> {
        self.journal
            .lock()
            .await
            .sent
            .get(key)
            .cloned()
            .unwrap_or_default()
    }

    /// Handles created so far, released or not.
    pub async fn opened_handles(&self) -> usize {
        self.journal.lock().await.opened
    }

    /// Handles created and not yet released.
    pub fn open_handles(&self) -> usize {
        self.inner.open_handles()
    }
}

struct RecordingChannel {
    inner: Box<dyn Channel>,
    journal: Arc<Mutex<Journal>>,
}

#[async_trait]
impl Channel for RecordingChannel {
    fn key(&self) -> &ChannelKey {
        self.inner.key()
    }

    async fn receive(&self, wait: WaitPolicy) -> Result<Option<Message>, TransportError> {
        self.inner.receive(wait).await
    }

    async fn send(&self, message: &Message, wait: WaitPolicy) -> Result<(), TransportError> {
        let key = self.inner.key().clone();
        if self.journal.lock().await.failing.contains(&key) {
            debug!(channel_key = %key, "injected send failure");
            return Err(TransportError::Io(format!("injected failure on `{key}`")));
        }

        self.inner.send(message, wait).await?;
        self.journal
            .lock()
            .await
            .sent
            .entry(key)
            .or_default()
            .push(message.clone());
        Ok(())
    }

    fn release(&self) {
        self.inner.release();
    }
}

#[async_trait]
impl ChannelTransport for RecordingTransport {
    async fn create_channel(&self, key: &ChannelKey) -> Result<Box<dyn Channel>, TransportError> {
        let inner = self.inner.create_channel(key).await?;
        self.journal.lock().await.opened += 1;
        Ok(Box::new(RecordingChannel {
            inner,
            journal: self.journal.clone(),
        }))
    }
}
