/*! Branded ID types for type-safe window references. */

use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU32, Ordering};

/// Opaque window identity token.
///
/// Issued when the host opens a window ([`WindowId::new`]) and stable for
/// that window's whole lifetime. A host that already has a stable native
/// window identifier can brand it directly with `WindowId(raw)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From, Into)]
pub struct WindowId(pub u32);

/// Global counter for `WindowId` generation. Starts at 1 (0 could be confused with "null").
static WINDOW_COUNTER: AtomicU32 = AtomicU32::new(1);

impl WindowId {
  /// Generate a new unique `WindowId`.
  pub fn new() -> Self {
    Self(WINDOW_COUNTER.fetch_add(1, Ordering::Relaxed))
  }
}

impl Default for WindowId {
  fn default() -> Self {
    Self::new()
  }
}
