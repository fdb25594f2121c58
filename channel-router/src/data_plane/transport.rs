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

//! Channel transport contract consumed by the routing loop.

use crate::channel_key::ChannelKey;
use crate::message::Message;
use crate::wait_policy::WaitPolicy;
use async_trait::async_trait;
use std::ops::Deref;
use thiserror::Error;

/// Transport-level failures on receive or send.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum TransportError {
    #[error("channel `{0}` is closed")]
    Closed(ChannelKey),
    #[error("channel `{0}` is full")]
    Full(ChannelKey),
    #[error("timed out waiting on channel `{0}`")]
    Timeout(ChannelKey),
    #[error("transport failure: {0}")]
    Io(String),
}

/// Open handle to one channel.
#[async_trait]
pub trait Channel: Send + Sync {
    fn key(&self) -> &ChannelKey;

    /// Next message, or `None` once the channel is closed and drained or the
    /// wait policy expires with nothing available.
    async fn receive(&self, wait: WaitPolicy) -> Result<Option<Message>, TransportError>;

    async fn send(&self, message: &Message, wait: WaitPolicy) -> Result<(), TransportError>;

    /// Gives the handle's resources back to the transport. Must be idempotent.
    fn release(&self);
}

/// Opens channel handles by key.
#[async_trait]
pub trait ChannelTransport: Send + Sync {
    async fn create_channel(&self, key: &ChannelKey) -> Result<Box<dyn Channel>, TransportError>;

    /// Opens `key` wrapped so the handle is released when it goes out of scope.
    async fn open_scoped(&self, key: &ChannelKey) -> Result<ScopedChannel, TransportError> {
        self.create_channel(key).await.map(ScopedChannel::new)
    }
}

/// Channel handle released on drop.
pub struct ScopedChannel {
    inner: Box<dyn Channel>,
}

impl ScopedChannel {
    pub fn new(inner: Box<dyn Channel>) -> Self {
        Self { inner }
    }
}

impl Deref for ScopedChannel {
    type Target = dyn Channel;

    fn deref(&self) -> &Self::Target {
        self.inner.as_ref()
    }
}

impl Drop for ScopedChannel {
    fn drop(&mut self) {
        self.inner.release();
    }
}
