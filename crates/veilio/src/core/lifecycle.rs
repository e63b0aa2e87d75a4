/*!
Lifecycle adapter - feeds host window-lifecycle notifications into the
manager.

The host delivers events for any single window in created -> resumed*
-> destroyed order. Created and resumed recompute and apply the shield
decision; destroyed unregisters the window (purging any manual
override) before the descriptor goes invalid. Everything else is a
no-op.
*/

use super::Veil;
use crate::platform::SecureSurface;
use crate::types::{Window, WindowId};

/// A host window-lifecycle notification.
#[derive(Debug, Clone)]
pub enum WindowEvent<S> {
  /// The window was created and its surface is ready for flag updates.
  Created {
    /// Descriptor for the new window.
    window: Window,
    /// Handle the shield flag is applied through.
    surface: S,
  },
  /// The window returned to the foreground.
  Resumed {
    /// Identity of the resumed window.
    window_id: WindowId,
  },
  /// The window left the foreground. Ignored.
  Backgrounded {
    /// Identity of the backgrounded window.
    window_id: WindowId,
  },
  /// The window is going away. Its descriptor is invalid after this.
  Destroyed {
    /// Identity of the destroyed window.
    window_id: WindowId,
  },
}

/// Receiver for host lifecycle notifications.
pub trait LifecycleHandler: Send + Sync + 'static {
  /// The surface type for this host.
  type Surface: SecureSurface;

  /// Called by the host for every window-lifecycle notification.
  fn on_window_event(&self, event: WindowEvent<Self::Surface>);
}

impl<S: SecureSurface> LifecycleHandler for Veil<S> {
  type Surface = S;

  fn on_window_event(&self, event: WindowEvent<S>) {
    match event {
      WindowEvent::Created { window, surface } => {
        let window_id = window.id;
        self.write(|s| {
          s.track(window, surface);
          s.apply_window(window_id, false);
        });
      }
      WindowEvent::Resumed { window_id } => {
        // Some platforms silently drop the flag when a window regains
        // the foreground, so resume always re-asserts.
        self.write(|s| s.apply_window(window_id, true));
      }
      WindowEvent::Backgrounded { window_id } => {
        log::debug!("ignoring background transition for window {window_id}");
      }
      WindowEvent::Destroyed { window_id } => {
        self.write(|s| s.untrack(window_id));
      }
    }
  }
}
