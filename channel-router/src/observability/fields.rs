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

//! Canonical structured field keys and value-format helpers.

use crate::message::Message;

pub const EVENT: &str = "event";
pub const COMPONENT: &str = "component";
pub const WORKER_ID: &str = "worker_id";
pub const WORKER_THREAD: &str = "worker_thread";

pub const CHANNEL_KEY: &str = "channel_key";
pub const TARGET_KEY: &str = "target_key";
pub const MSG_ID: &str = "msg_id";
pub const ROUTING_KEY: &str = "routing_key";
pub const TARGET_COUNT: &str = "target_count";
pub const REASON: &str = "reason";
pub const ERR: &str = "err";

pub const NONE: &str = "none";
pub const REASON_SOURCE_DRAINED: &str = "source_drained";
pub const REASON_ENTRY_ABSENT: &str = "entry_absent";
pub const REASON_NO_STRATEGY: &str = "no_strategy";
pub const REASON_NO_MATCHING_ROUTE: &str = "no_matching_route";
pub const REASON_INVALID_THREAD_NAME: &str = "invalid_thread_name";
pub const DEFAULT_WORKER_THREAD: &str = "unknown-thread";

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WorkerContext {
    pub worker_id: String,
    pub worker_thread: String,
}

impl WorkerContext {
    pub fn new(worker_id: impl Into<String>, worker_thread: Option<&str>) -> Self {
        Self {
            worker_id: worker_id.into(),
            worker_thread: thread_name_or_default(worker_thread),
        }
    }

    pub fn with_current_thread(worker_id: impl Into<String>) -> Self {
        Self {
            worker_id: worker_id.into(),
            worker_thread: current_thread_name_or_default(),
        }
    }
}

pub fn thread_name_or_default(thread_name: Option<&str>) -> String {
    thread_name.unwrap_or(DEFAULT_WORKER_THREAD).to_string()
}

pub fn current_thread_name_or_default() -> String {
    thread_name_or_default(std::thread::current().name())
}

pub fn format_message_id(message: &Message) -> String {
    message.id.hyphenated().to_string()
}

pub fn format_routing_key(message: &Message) -> String {
    message
        .routing_key()
        .map(str::to_string)
        .unwrap_or_else(|| NONE.to_string())
}
