// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

macro_rules! entity_id {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(ListId);
entity_id!(ItemId);

/// Current wall-clock time in Unix milliseconds, the raw material for fresh ids.
pub fn now_millis() -> i64 {
    let nanos = OffsetDateTime::now_utc().unix_timestamp_nanos();
    i64::try_from(nanos / 1_000_000).unwrap_or(i64::MAX)
}

/// Picks an id that is at least `now_ms` and strictly greater than every id
/// already issued, so two entities created in the same millisecond still
/// differ. `None` when the largest id is already `i64::MAX`.
pub fn next_id(now_ms: i64, largest_existing: Option<i64>) -> Option<i64> {
    match largest_existing {
        Some(largest) if largest >= now_ms => largest.checked_add(1),
        _ => Some(now_ms),
    }
}
