/*! Pure reads through the same precedence used for flag application. */

use super::Veil;
use crate::platform::SecureSurface;
use crate::policy::SecurePolicy;
use crate::types::{Window, WindowId};
use std::sync::Arc;

impl<S: SecureSurface> Veil<S> {
  /// Whether the shield decision for this window is "secure".
  ///
  /// Same precedence as flag application, with no side effect. Unknown
  /// windows and an uninitialized manager answer `false`.
  pub fn is_secure(&self, window_id: WindowId) -> bool {
    self.read(|s| s.decision_for(window_id).unwrap_or(false))
  }

  /// Whether [`initialize`](Self::initialize) has run.
  pub fn is_initialized(&self) -> bool {
    self.read(|s| s.is_initialized())
  }

  /// Effective global state: the configured default, masked by debug
  /// suppression (a debug-suppressed manager reads as globally off).
  pub fn is_globally_enabled(&self) -> bool {
    self.read(|s| {
      s.settings()
        .is_some_and(|c| c.default_secure && !c.debug_suppressed)
    })
  }

  /// Whether the debug safety valve is active.
  pub fn is_debug_suppressed(&self) -> bool {
    self.read(|s| s.settings().is_some_and(|c| c.debug_suppressed))
  }

  /// The installed policy, if any.
  pub fn policy(&self) -> Option<Arc<dyn SecurePolicy>> {
    self.read(|s| s.settings().and_then(|c| c.policy.clone()))
  }

  /// Number of live tracked windows.
  ///
  /// Counts created-but-not-destroyed windows, not windows currently
  /// flagged secure.
  pub fn tracked_window_count(&self) -> usize {
    self.read(|s| s.count())
  }

  /// The descriptor for a live window, if tracked.
  pub fn window(&self, window_id: WindowId) -> Option<Window> {
    self.read(|s| s.window(window_id).map(|t| t.info.clone()))
  }

  /// Visit every live window.
  ///
  /// The visitor runs on a snapshot taken under the lock, so it may
  /// itself call back into the manager and tolerates windows being
  /// destroyed concurrently with the walk.
  pub fn for_each_live(&self, mut visitor: impl FnMut(&Window)) {
    let snapshot = self.read(|s| s.live_windows());
    for window in &snapshot {
      visitor(window);
    }
  }
}
