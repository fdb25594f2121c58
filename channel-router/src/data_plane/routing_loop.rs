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

//! Routing loop that drains a source channel and forwards each message to the
//! targets chosen by the source's routing strategy.

use crate::channel_key::ChannelKey;
use crate::control_plane::route_store::{RouteStore, RouteStoreError};
use crate::data_plane::transport::{ChannelTransport, TransportError};
use crate::message::Message;
use crate::observability::{events, fields, fields::WorkerContext};
use crate::routing::RoutingStrategy;
use crate::wait_policy::WaitPolicy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn, Level};
use uuid::Uuid;

const COMPONENT: &str = "routing_loop";

/// Wait policies applied by a routing loop.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RoutingLoopConfig {
    pub receive_wait: WaitPolicy,
    pub send_wait: WaitPolicy,
}

impl Default for RoutingLoopConfig {
    fn default() -> Self {
        Self {
            receive_wait: WaitPolicy::Indefinite,
            send_wait: WaitPolicy::Immediate,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LoopState {
    Draining,
    Stopped,
}

/// One target that could not be opened or sent to for one message.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SendFailure {
    pub target_key: ChannelKey,
    pub msg_id: Uuid,
    pub error: TransportError,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RoutingLoopStats {
    pub received: u64,
    /// Successful sends, one per target per message.
    pub forwarded: u64,
    /// Messages that matched no target.
    pub dropped: u64,
    /// Failed sends in the order they happened. The remaining targets of the
    /// same message were still attempted.
    pub send_errors: Vec<SendFailure>,
}

impl RoutingLoopStats {
    pub fn send_failures(&self) -> usize {
        self.send_errors.len()
    }
}

/// Reasons a routing loop stopped other than its source draining.
///
/// Failures after a message was taken off the source hand that message back
/// so the owner can requeue it.
#[derive(Debug, Error, PartialEq)]
pub enum RoutingLoopError {
    #[error("unable to open source channel: {0}")]
    Open(TransportError),
    #[error("receive from source failed: {0}")]
    Receive(TransportError),
    #[error("unable to read routing table: {source}")]
    Store {
        source: RouteStoreError,
        message: Box<Message>,
    },
    #[error("no routing table entry for `{key}`")]
    EntryAbsent { key: ChannelKey, message: Box<Message> },
}

impl RoutingLoopError {
    /// The in-flight message that was received but not routed, if any.
    pub fn message(&self) -> Option<&Message> {
        match self {
            RoutingLoopError::Store { message, .. }
            | RoutingLoopError::EntryAbsent { message, .. } => Some(message.as_ref()),
            RoutingLoopError::Open(_) | RoutingLoopError::Receive(_) => None,
        }
    }

    pub fn into_message(self) -> Option<Message> {
        match self {
            RoutingLoopError::Store { message, .. }
            | RoutingLoopError::EntryAbsent { message, .. } => Some(*message),
            RoutingLoopError::Open(_) | RoutingLoopError::Receive(_) => None,
        }
    }
}

struct FormattedMessageFields {
    msg_id: String,
    routing_key: String,
}

impl FormattedMessageFields {
    fn from_message(message: &Message) -> Self {
        Self {
            msg_id: fields::format_message_id(message),
            routing_key: fields::format_routing_key(message),
        }
    }
}

/// Long-running worker bound to one source channel.
///
/// The routing table entry is re-read for every message, so route changes
/// apply from the next message on without restarting the loop. Targets of one
/// message are sent to one after another, which keeps per-target order equal
/// to the source's receive order.
pub struct RoutingLoop {
    worker_id: String,
    source_key: ChannelKey,
    store: Arc<dyn RouteStore>,
    transport: Arc<dyn ChannelTransport>,
    config: RoutingLoopConfig,
    state: LoopState,
    stats: RoutingLoopStats,
}

impl RoutingLoop {
    pub fn new(
        source_key: ChannelKey,
        store: Arc<dyn RouteStore>,
        transport: Arc<dyn ChannelTransport>,
        config: RoutingLoopConfig,
    ) -> Self {
        Self {
            worker_id: Uuid::new_v4().hyphenated().to_string(),
            source_key,
            store,
            transport,
            config,
            state: LoopState::Draining,
            stats: RoutingLoopStats::default(),
        }
    }

    pub fn worker_id(&self) -> &str {
        &self.worker_id
    }

    pub fn source_key(&self) -> &ChannelKey {
        &self.source_key
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn stats(&self) -> &RoutingLoopStats {
        &self.stats
    }

    /// Drains the source until it reports no message, then stops.
    ///
    /// Receive failures, routing-table read failures and a missing entry stop
    /// the loop and are returned. A failed send to one target is recorded in
    /// [`RoutingLoopStats::send_errors`] and the other targets are still tried.
    pub async fn run(&mut self) -> Result<RoutingLoopStats, RoutingLoopError> {
        let result = self.drain().await;
        self.state = LoopState::Stopped;

        let worker_context = WorkerContext::with_current_thread(self.worker_id.as_str());
        match &result {
            Ok(stats) => info!(
                event = events::LOOP_STOP,
                component = COMPONENT,
                worker_id = worker_context.worker_id.as_str(),
                worker_thread = worker_context.worker_thread.as_str(),
                channel_key = %self.source_key,
                reason = fields::REASON_SOURCE_DRAINED,
                received = stats.received,
                forwarded = stats.forwarded,
                dropped = stats.dropped,
                send_failures = stats.send_failures(),
                "source drained; routing loop stopped"
            ),
            Err(err) => warn!(
                event = events::LOOP_STOP,
                component = COMPONENT,
                worker_id = worker_context.worker_id.as_str(),
                worker_thread = worker_context.worker_thread.as_str(),
                channel_key = %self.source_key,
                err = %err,
                "routing loop stopped on failure"
            ),
        }

        result
    }

    async fn drain(&mut self) -> Result<RoutingLoopStats, RoutingLoopError> {
        let worker_context = WorkerContext::with_current_thread(self.worker_id.as_str());
        info!(
            event = events::LOOP_START,
            component = COMPONENT,
            worker_id = worker_context.worker_id.as_str(),
            worker_thread = worker_context.worker_thread.as_str(),
            channel_key = %self.source_key,
            "routing loop draining source"
        );

        let source = self
            .transport
            .open_scoped(&self.source_key)
            .await
            .map_err(RoutingLoopError::Open)?;

        loop {
            let message = match source.receive(self.config.receive_wait).await {
                Ok(Some(message)) => message,
                Ok(None) => return Ok(self.stats.clone()),
                Err(err) => {
                    warn!(
                        event = events::LOOP_RECEIVE_FAILED,
                        component = COMPONENT,
                        worker_id = worker_context.worker_id.as_str(),
                        channel_key = %self.source_key,
                        err = %err,
                        "receive from source failed"
                    );
                    return Err(RoutingLoopError::Receive(err));
                }
            };
            self.stats.received += 1;

            let message_fields = tracing::enabled!(Level::DEBUG)
                .then(|| FormattedMessageFields::from_message(&message));
            if let Some(fields) = message_fields.as_ref() {
                debug!(
                    event = events::LOOP_RECEIVE,
                    component = COMPONENT,
                    worker_id = worker_context.worker_id.as_str(),
                    channel_key = %self.source_key,
                    msg_id = fields.msg_id.as_str(),
                    routing_key = fields.routing_key.as_str(),
                    "received message from source"
                );
            }

            let targets = self.resolve_targets(&message, &worker_context).await?;
            if targets.is_empty() {
                self.stats.dropped += 1;
                continue;
            }

            for target_key in &targets {
                self.forward(&message, target_key, &worker_context).await;
            }
        }
    }

    async fn resolve_targets(
        &self,
        message: &Message,
        worker_context: &WorkerContext,
    ) -> Result<BTreeSet<ChannelKey>, RoutingLoopError> {
        let entry = match self.store.get(&self.source_key).await {
            Ok(Some(entry)) => entry,
            Ok(None) => {
                warn!(
                    event = events::LOOP_ENTRY_READ_FAILED,
                    component = COMPONENT,
                    worker_id = worker_context.worker_id.as_str(),
                    channel_key = %self.source_key,
                    reason = fields::REASON_ENTRY_ABSENT,
                    "routing table entry is absent"
                );
                return Err(RoutingLoopError::EntryAbsent {
                    key: self.source_key.clone(),
                    message: Box::new(message.clone()),
                });
            }
            Err(err) => {
                warn!(
                    event = events::LOOP_ENTRY_READ_FAILED,
                    component = COMPONENT,
                    worker_id = worker_context.worker_id.as_str(),
                    channel_key = %self.source_key,
                    err = %err,
                    "unable to read routing table entry"
                );
                return Err(RoutingLoopError::Store {
                    source: err,
                    message: Box::new(message.clone()),
                });
            }
        };

        let (targets, reason) = match entry.strategy() {
            Some(strategy) => (
                strategy.route(message, entry.routes()),
                fields::REASON_NO_MATCHING_ROUTE,
            ),
            None => (BTreeSet::new(), fields::REASON_NO_STRATEGY),
        };

        if targets.is_empty() && tracing::enabled!(Level::DEBUG) {
            let fields = FormattedMessageFields::from_message(message);
            debug!(
                event = events::LOOP_DROP_NO_TARGET,
                component = COMPONENT,
                worker_id = worker_context.worker_id.as_str(),
                channel_key = %self.source_key,
                msg_id = fields.msg_id.as_str(),
                routing_key = fields.routing_key.as_str(),
                reason,
                "dropping message without targets"
            );
        }

        Ok(targets)
    }

    async fn forward(
        &mut self,
        message: &Message,
        target_key: &ChannelKey,
        worker_context: &WorkerContext,
    ) {
        let msg_id = fields::format_message_id(message);
        debug!(
            event = events::LOOP_SEND_ATTEMPT,
            component = COMPONENT,
            worker_id = worker_context.worker_id.as_str(),
            channel_key = %self.source_key,
            target_key = %target_key,
            msg_id = msg_id.as_str(),
            "attempting forward"
        );

        let target = match self.transport.open_scoped(target_key).await {
            Ok(target) => target,
            Err(err) => {
                warn!(
                    event = events::LOOP_SEND_FAILED,
                    component = COMPONENT,
                    worker_id = worker_context.worker_id.as_str(),
                    channel_key = %self.source_key,
                    target_key = %target_key,
                    msg_id = msg_id.as_str(),
                    err = %err,
                    "unable to open target channel"
                );
                self.record_send_failure(message, target_key, err);
                return;
            }
        };

        match target.send(message, self.config.send_wait).await {
            Ok(()) => {
                self.stats.forwarded += 1;
                debug!(
                    event = events::LOOP_SEND_OK,
                    component = COMPONENT,
                    worker_id = worker_context.worker_id.as_str(),
                    channel_key = %self.source_key,
                    target_key = %target_key,
                    msg_id = msg_id.as_str(),
                    "forward succeeded"
                );
            }
            Err(err) => {
                warn!(
                    event = events::LOOP_SEND_FAILED,
                    component = COMPONENT,
                    worker_id = worker_context.worker_id.as_str(),
                    channel_key = %self.source_key,
                    target_key = %target_key,
                    msg_id = msg_id.as_str(),
                    err = %err,
                    "forward failed"
                );
                self.record_send_failure(message, target_key, err);
            }
        }
    }

    fn record_send_failure(
        &mut self,
        message: &Message,
        target_key: &ChannelKey,
        error: TransportError,
    ) {
        self.stats.send_errors.push(SendFailure {
            target_key: target_key.clone(),
            msg_id: message.id,
            error,
        });
    }
}
