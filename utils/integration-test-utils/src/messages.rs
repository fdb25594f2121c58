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

use channel_router::Message;

/// Message whose payload is `body`, routed with `routing_key`.
pub fn keyed_message(body: &str, routing_key: &str) -> Message {
    Message::new(body).with_routing_key(routing_key)
}

/// `count` messages with payloads `"<prefix>-0"`, `"<prefix>-1"`, ...
pub fn numbered_messages(prefix: &str, count: usize) -> Vec<Message> {
    (0..count)
        .map(|index| Message::new(format!("{prefix}-{index}")))
        .collect()
}

pub fn payload_text(message: &Message) -> String {
    String::from_utf8_lossy(&message.payload).into_owned()
}
