/*! Event types emitted when tracking or shield state changes. */

use super::{Window, WindowId};
use serde::Serialize;

/// Events emitted by the manager.
///
/// Non-fatal by construction: `shield:error` is how platform flag
/// failures are reported instead of surfacing to the caller.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data")]
pub enum Event {
  /// A window entered the live registry.
  #[serde(rename = "window:tracked")]
  WindowTracked { window: Window },

  /// A window left the live registry. Any manual override it had was
  /// purged along with it.
  #[serde(rename = "window:untracked")]
  WindowUntracked { window_id: WindowId },

  /// The capture-shield flag applied to a window changed.
  #[serde(rename = "shield:changed")]
  ShieldChanged { window_id: WindowId, shielded: bool },

  /// The platform rejected a flag update. The window keeps its previous
  /// flag state.
  #[serde(rename = "shield:error")]
  ShieldError { window_id: WindowId, reason: String },
}
