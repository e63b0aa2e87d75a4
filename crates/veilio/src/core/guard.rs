/*! Scoped shielding - a manual override with RAII cleanup. */

use super::Veil;
use crate::platform::SecureSurface;
use crate::types::{VeilError, VeilResult, WindowId};
use std::fmt;

/// Forces the shield on for one window while alive.
///
/// Created by [`Veil::secure_scope`]. Dropping the guard clears the
/// override again, reverting the window to whatever the policy or
/// global default dictate. Useful for wrapping a sensitive section of
/// an otherwise unshielded screen.
#[must_use = "the shield reverts as soon as the guard is dropped"]
pub struct ShieldGuard<S: SecureSurface> {
  veil: Veil<S>,
  window_id: WindowId,
}

impl<S: SecureSurface> Veil<S> {
  /// Assert the shield for `window_id` until the returned guard drops.
  ///
  /// # Errors
  ///
  /// Returns [`VeilError::WindowNotTracked`] when the window is not in
  /// the live registry.
  pub fn secure_scope(&self, window_id: WindowId) -> VeilResult<ShieldGuard<S>> {
    let tracked = self.read(|s| s.window(window_id).is_some());
    if !tracked {
      return Err(VeilError::WindowNotTracked(window_id));
    }
    self.enable_for(window_id);
    Ok(ShieldGuard {
      veil: self.clone(),
      window_id,
    })
  }
}

impl<S: SecureSurface> Drop for ShieldGuard<S> {
  fn drop(&mut self) {
    self.veil.clear_override(self.window_id);
  }
}

impl<S: SecureSurface> fmt::Debug for ShieldGuard<S> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ShieldGuard")
      .field("window_id", &self.window_id)
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::super::testing::TestSurface;
  use super::super::{LifecycleHandler, WindowEvent};
  use super::*;
  use crate::types::Window;

  fn veil() -> Veil<TestSurface> {
    Veil::<TestSurface>::builder()
      .default_secure(false)
      .debug_suppressed(false)
      .build()
  }

  fn open(veil: &Veil<TestSurface>) -> (WindowId, TestSurface) {
    let id = WindowId::new();
    let surface = TestSurface::new();
    veil.on_window_event(WindowEvent::Created {
      window: Window::new(id, "NotesScreen"),
      surface: surface.clone(),
    });
    (id, surface)
  }

  #[test]
  fn shields_for_the_guard_lifetime() {
    let veil = veil();
    let (id, surface) = open(&veil);
    assert!(!veil.is_secure(id), "default is off in this setup");

    {
      let _guard = veil.secure_scope(id).unwrap_or_else(|e| panic!("{e}"));
      assert!(veil.is_secure(id));
      assert!(surface.shielded());
    }

    assert!(!veil.is_secure(id), "drop must revert to the default");
    assert!(!surface.shielded());
  }

  #[test]
  fn unknown_windows_are_rejected() {
    let veil = veil();
    let result = veil.secure_scope(WindowId(31_337));
    assert!(matches!(result, Err(VeilError::WindowNotTracked(_))));
  }

  #[test]
  fn dropping_after_window_destruction_is_harmless() {
    let veil = veil();
    let (id, _surface) = open(&veil);
    let guard = veil.secure_scope(id).unwrap_or_else(|e| panic!("{e}"));

    veil.on_window_event(WindowEvent::Destroyed { window_id: id });
    drop(guard); // clears an override that destruction already purged
    assert_eq!(veil.tracked_window_count(), 0);
  }
}
