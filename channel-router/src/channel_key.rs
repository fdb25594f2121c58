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

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

///
/// [`ChannelKey`] identifies one queue or topic across the whole cluster.
///
/// Two keys are the same channel when their values are equal, regardless of
/// which node or handle produced them.
///
/// # Examples
///
/// ```
/// use channel_router::ChannelKey;
///
/// let orders = ChannelKey::new("queue.orders");
/// assert_eq!(orders, ChannelKey::from("queue.orders"));
/// assert_eq!(orders.as_str(), "queue.orders");
/// ```
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelKey(String);

impl ChannelKey {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ChannelKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChannelKey {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ChannelKey {
    fn from(name: String) -> Self {
        Self(name)
    }
}
