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

//! Broker message as seen by the routing core.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Header carrying the key a routing strategy matches against route bindings.
pub const ROUTING_KEY_HEADER: &str = "routing-key";

/// Opaque payload plus headers. The routing core never mutates a message while
/// deciding where it goes; forwarding sends the same value to every target.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub headers: BTreeMap<String, String>,
    pub payload: Vec<u8>,
}

impl Message {
    pub fn new(payload: impl Into<Vec<u8>>) -> Self {
        Self {
            id: Uuid::new_v4(),
            headers: BTreeMap::new(),
            payload: payload.into(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_routing_key(self, routing_key: impl Into<String>) -> Self {
        self.with_header(ROUTING_KEY_HEADER, routing_key)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    pub fn routing_key(&self) -> Option<&str> {
        self.header(ROUTING_KEY_HEADER)
    }
}
