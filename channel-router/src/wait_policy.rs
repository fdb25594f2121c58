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

//! Named wait policies for channel receive/send calls.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How long a channel operation may block.
///
/// A zero duration is always [`WaitPolicy::Immediate`]: a non-blocking poll.
/// Waiting forever has to be asked for by name with [`WaitPolicy::Indefinite`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "WaitPolicyRepr")]
pub enum WaitPolicy {
    #[default]
    Indefinite,
    Immediate,
    Timeout {
        #[serde(rename = "timeout_ms", with = "duration_millis")]
        duration: Duration,
    },
}

impl WaitPolicy {
    pub fn from_duration(duration: Duration) -> Self {
        if duration.is_zero() {
            WaitPolicy::Immediate
        } else {
            WaitPolicy::Timeout { duration }
        }
    }

    /// Upper bound on blocking, `None` meaning unbounded.
    pub fn limit(&self) -> Option<Duration> {
        match self {
            WaitPolicy::Indefinite => None,
            WaitPolicy::Immediate => Some(Duration::ZERO),
            WaitPolicy::Timeout { duration } => Some(*duration),
        }
    }
}

/// Wire shape of [`WaitPolicy`]; a zero timeout is folded into `Immediate`.
#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
enum WaitPolicyRepr {
    Indefinite,
    Immediate,
    Timeout {
        #[serde(rename = "timeout_ms", with = "duration_millis")]
        duration: Duration,
    },
}

impl From<WaitPolicyRepr> for WaitPolicy {
    fn from(repr: WaitPolicyRepr) -> Self {
        match repr {
            WaitPolicyRepr::Indefinite => WaitPolicy::Indefinite,
            WaitPolicyRepr::Immediate => WaitPolicy::Immediate,
            WaitPolicyRepr::Timeout { duration } => WaitPolicy::from_duration(duration),
        }
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub(super) fn serialize<S: Serializer>(duration: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(duration.as_millis() as u64)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::WaitPolicy;
    use std::time::Duration;

    #[test]
    fn zero_duration_is_a_non_blocking_poll() {
        assert_eq!(WaitPolicy::from_duration(Duration::ZERO), WaitPolicy::Immediate);
        assert_eq!(WaitPolicy::Immediate.limit(), Some(Duration::ZERO));
    }

    #[test]
    fn indefinite_has_no_limit() {
        assert_eq!(WaitPolicy::default(), WaitPolicy::Indefinite);
        assert_eq!(WaitPolicy::Indefinite.limit(), None);
    }

    #[test]
    fn timeout_deserializes_from_millis() {
        let policy: WaitPolicy =
            serde_json::from_str(r#"{"timeout":{"timeout_ms":250}}"#).expect("should parse");

        assert_eq!(
            policy,
            WaitPolicy::Timeout {
                duration: Duration::from_millis(250)
            }
        );

        let immediate: WaitPolicy = serde_json::from_str(r#""immediate""#).expect("should parse");
        assert_eq!(immediate, WaitPolicy::Immediate);
    }

    #[test]
    fn zero_timeout_deserializes_as_immediate() {
        let policy: WaitPolicy =
            serde_json::from_str(r#"{"timeout":{"timeout_ms":0}}"#).expect("should parse");

        assert_eq!(policy, WaitPolicy::Immediate);
        assert_eq!(
            serde_json::to_string(&policy).expect("should serialize"),
            r#""immediate""#
        );
    }
}
