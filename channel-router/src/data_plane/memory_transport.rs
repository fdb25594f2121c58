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

//! Process-local channel transport with FIFO queues per channel key.

use crate::channel_key::ChannelKey;
use crate::data_plane::transport::{Channel, ChannelTransport, TransportError};
use crate::message::Message;
use crate::wait_policy::WaitPolicy;
use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, Notify};
use tokio::time::Instant;

struct ChannelQueue {
    key: ChannelKey,
    capacity: Option<usize>,
    messages: Mutex<VecDeque<Message>>,
    closed: AtomicBool,
    readable: Notify,
    writable: Notify,
}

impl ChannelQueue {
    fn new(key: ChannelKey, capacity: Option<usize>) -> Self {
        Self {
            key,
            capacity,
            messages: Mutex::new(VecDeque::new()),
            closed: AtomicBool::new(false),
            readable: Notify::new(),
            writable: Notify::new(),
        }
    }

    fn close(&self) {
        self.closed.store(true, Ordering::Release);
        self.readable.notify_waiters();
        self.writable.notify_waiters();
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    async fn receive(&self, wait: WaitPolicy) -> Option<Message> {
        let deadline = wait.limit().map(|limit| Instant::now() + limit);

        loop {
            let notified = self.readable.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if let Some(message) = self.messages.lock().await.pop_front() {
                self.writable.notify_one();
                return Some(message);
            }
            if self.is_closed() {
                return None;
            }

            match deadline {
                None => notified.await,
                Some(deadline) => {
                    if Instant::now() >= deadline
                        || tokio::time::timeout_at(deadline, notified).await.is_err()
                    {
                        return None;
                    }
                }
            }
        }
    }

    async fn send(&self, message: &Message, wait: WaitPolicy) -> Result<(), TransportError> {
        let deadline = wait.limit().map(|limit| Instant::now() + limit);

        loop {
            let notified = self.writable.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.is_closed() {
                return Err(TransportError::Closed(self.key.clone()));
            }
            {
                let mut messages = self.messages.lock().await;
                if self
                    .capacity
                    .map_or(true, |capacity| messages.len() < capacity)
                {
                    messages.push_back(message.clone());
                    self.readable.notify_one();
                    return Ok(());
                }
            }

            match deadline {
                None => notified.await,
                Some(deadline) => {
                    if Instant::now() >= deadline
                        || tokio::time::timeout_at(deadline, notified).await.is_err()
                    {
                        return Err(match wait {
                            WaitPolicy::Immediate => TransportError::Full(self.key.clone()),
                            _ => TransportError::Timeout(self.key.clone()),
                        });
                    }
                }
            }
        }
    }
}

/// Handle onto one [`InMemoryTransport`] queue.
pub struct InMemoryChannel {
    queue: Arc<ChannelQueue>,
    open_handles: Arc<AtomicUsize>,
    released: AtomicBool,
}

#[async_trait]
impl Channel for InMemoryChannel {
    fn key(&self) -> &ChannelKey {
        &self.queue.key
    }

    async fn receive(&self, wait: WaitPolicy) -> Result<Option<Message>, TransportError> {
        Ok(self.queue.receive(wait).await)
    }

    async fn send(&self, message: &Message, wait: WaitPolicy) -> Result<(), TransportError> {
        self.queue.send(message, wait).await
    }

    fn release(&self) {
        if !self.released.swap(true, Ordering::AcqRel) {
            self.open_handles.fetch_sub(1, Ordering::AcqRel);
        }
    }
}

/// [`ChannelTransport`] whose channels are in-process FIFO queues.
///
/// Closing a channel is the shutdown signal for whoever drains it: receivers
/// get the remaining messages and then `None`, senders get
/// [`TransportError::Closed`].
#[derive(Default)]
pub struct InMemoryTransport {
    queues: DashMap<ChannelKey, Arc<ChannelQueue>>,
    capacity: Option<usize>,
    open_handles: Arc<AtomicUsize>,
}

impl InMemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bounds every channel to `capacity` queued messages.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
            ..Self::default()
        }
    }

    fn queue(&self, key: &ChannelKey) -> Arc<ChannelQueue> {
        self.queues
            .entry(key.clone())
            .or_insert_with(|| Arc::new(ChannelQueue::new(key.clone(), self.capacity)))
            .clone()
    }

    /// Enqueues without holding a handle.
    pub async fn enqueue(&self, key: &ChannelKey, message: Message) -> Result<(), TransportError> {
        self.queue(key).send(&message, WaitPolicy::Immediate).await
    }

    pub fn close_channel(&self, key: &ChannelKey) {
        self.queue(key).close();
    }

    pub fn is_closed(&self, key: &ChannelKey) -> bool {
        self.queues
            .get(key)
            .map(|queue| queue.is_closed())
            .unwrap_or(false)
    }

    /// Takes every message currently queued on `key`.
    pub async fn drain(&self, key: &ChannelKey) -> Vec<Message> {
        let Some(queue) = self.queues.get(key).map(|queue| queue.clone()) else {
            return Vec::new();
        };
        let drained: Vec<Message> = queue.messages.lock().await.drain(..).collect();
        queue.writable.notify_waiters();
        drained
    }

    pub async fn len(&self, key: &ChannelKey) -> usize {
        let Some(queue) = self.queues.get(key).map(|queue| queue.clone()) else {
            return 0;
        };
        let len = queue.messages.lock().await.len();
        len
    }

    /// Handles created and not yet released.
    pub fn open_handles(&self) -> usize {
        self.open_handles.load(Ordering::Acquire)
    }
}

#[async_trait]
impl ChannelTransport for InMemoryTransport {
    async fn create_channel(&self, key: &ChannelKey) -> Result<Box<dyn Channel>, TransportError> {
        self.open_handles.fetch_add(1, Ordering::AcqRel);
        Ok(Box::new(InMemoryChannel {
            queue: self.queue(key),
            open_handles: self.open_handles.clone(),
            released: AtomicBool::new(false),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::InMemoryTransport;
    use crate::data_plane::transport::{ChannelTransport, TransportError};
    use crate::{ChannelKey, Message, WaitPolicy};
    use std::sync::Arc;
    use std::time::Duration;

    fn key() -> ChannelKey {
        ChannelKey::new("queue")
    }

    #[tokio::test]
    async fn receive_preserves_fifo_order() {
        let transport = InMemoryTransport::new();
        let first = Message::new("1");
        let second = Message::new("2");
        transport.enqueue(&key(), first.clone()).await.expect("open");
        transport.enqueue(&key(), second.clone()).await.expect("open");

        let channel = transport.open_scoped(&key()).await.expect("open");
        assert_eq!(
            channel.receive(WaitPolicy::Immediate).await.expect("ok"),
            Some(first)
        );
        assert_eq!(
            channel.receive(WaitPolicy::Immediate).await.expect("ok"),
            Some(second)
        );
        assert_eq!(channel.receive(WaitPolicy::Immediate).await.expect("ok"), None);
    }

    #[tokio::test]
    async fn closed_channel_drains_then_reports_none() {
        let transport = InMemoryTransport::new();
        transport.enqueue(&key(), Message::new("1")).await.expect("open");
        transport.close_channel(&key());

        let channel = transport.open_scoped(&key()).await.expect("open");
        assert!(channel
            .receive(WaitPolicy::Indefinite)
            .await
            .expect("ok")
            .is_some());
        assert!(channel
            .receive(WaitPolicy::Indefinite)
            .await
            .expect("ok")
            .is_none());
        assert_eq!(
            channel.send(&Message::new("2"), WaitPolicy::Immediate).await,
            Err(TransportError::Closed(key()))
        );
    }

    #[tokio::test]
    async fn indefinite_receive_wakes_on_close() {
        let transport = Arc::new(InMemoryTransport::new());
        let channel = transport.open_scoped(&key()).await.expect("open");

        let closer = transport.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            closer.close_channel(&key());
        });

        assert!(channel
            .receive(WaitPolicy::Indefinite)
            .await
            .expect("ok")
            .is_none());
    }

    #[tokio::test]
    async fn timeout_receive_expires_empty() {
        let transport = InMemoryTransport::new();
        let channel = transport.open_scoped(&key()).await.expect("open");

        let received = channel
            .receive(WaitPolicy::from_duration(Duration::from_millis(10)))
            .await
            .expect("ok");

        assert!(received.is_none());
    }

    #[tokio::test]
    async fn bounded_channel_rejects_immediate_send_when_full() {
        let transport = InMemoryTransport::with_capacity(1);
        let channel = transport.open_scoped(&key()).await.expect("open");

        channel
            .send(&Message::new("1"), WaitPolicy::Immediate)
            .await
            .expect("room for one");
        assert_eq!(
            channel.send(&Message::new("2"), WaitPolicy::Immediate).await,
            Err(TransportError::Full(key()))
        );
        assert_eq!(
            channel
                .send(
                    &Message::new("3"),
                    WaitPolicy::from_duration(Duration::from_millis(5))
                )
                .await,
            Err(TransportError::Timeout(key()))
        );
    }

    #[tokio::test]
    async fn open_handles_track_scoped_release() {
        let transport = InMemoryTransport::new();
        {
            let _a = transport.open_scoped(&key()).await.expect("open");
            let _b = transport.open_scoped(&ChannelKey::new("other")).await.expect("open");
            assert_eq!(transport.open_handles(), 2);
        }
        assert_eq!(transport.open_handles(), 0);
    }
}
