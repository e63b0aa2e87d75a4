/*!
Configuration and override operations.

Every mutation runs inside one write-lock section together with the
recompute-and-apply it triggers, so concurrent calls cannot interleave
a decision with a stale application.
*/

use super::{Override, Settings, ShieldConfig, Veil};
use crate::platform::SecureSurface;
use crate::policy::SecurePolicy;
use crate::types::WindowId;
use std::sync::Arc;

impl<S: SecureSurface> Veil<S> {
  /// Install the initial configuration. First caller wins.
  ///
  /// Returns `true` if this call configured the manager; a later call
  /// is a no-op that returns `false` and preserves the first
  /// configuration. Initialization ends with a recompute-and-apply over
  /// every window tracked so far, covering windows whose created events
  /// raced ahead of a background initializer.
  pub fn initialize(&self, config: ShieldConfig) -> bool {
    self.write(|s| {
      let installed = s.install_settings(Settings {
        default_secure: config.default_secure,
        debug_suppressed: config.debug_suppressed,
        policy: config.policy,
      });
      if !installed {
        log::debug!("already initialized, keeping the first configuration");
        return false;
      }
      s.apply_all(false);
      true
    })
  }

  /// Update the global default and recompute-and-apply for every live
  /// window. A no-op until initialized.
  pub fn set_globally_enabled(&self, secure: bool) {
    self.write(|s| {
      if s.set_default_secure(secure) {
        s.apply_all(false);
      } else {
        log::warn!("ignoring global default change: not initialized");
      }
    });
  }

  /// Toggle the debug safety valve and recompute-and-apply everywhere.
  /// A no-op until initialized.
  pub fn set_debug_suppressed(&self, suppressed: bool) {
    self.write(|s| {
      if s.set_debug_suppressed(suppressed) {
        s.apply_all(false);
      } else {
        log::warn!("ignoring debug suppression change: not initialized");
      }
    });
  }

  /// Replace the installed policy (`None` clears it) and
  /// recompute-and-apply for every live window. A no-op until
  /// initialized.
  ///
  /// Installing replaces wholesale - build [`AllOf`](crate::AllOf) /
  /// [`AnyOf`](crate::AnyOf) trees explicitly if merging is wanted.
  pub fn set_policy(&self, policy: Option<Arc<dyn SecurePolicy>>) {
    self.write(|s| {
      if s.set_policy(policy) {
        s.apply_all(false);
      } else {
        log::warn!("ignoring policy change: not initialized");
      }
    });
  }

  /// Force the shield on for one window, bypassing policy and global
  /// default until cleared.
  ///
  /// Under debug suppression the intent is still recorded; the shield
  /// stays down until suppression is lifted, at which point the
  /// recorded override is honored.
  pub fn enable_for(&self, window_id: WindowId) {
    self.set_override(window_id, Override::Secure);
  }

  /// Force the shield off for one window, bypassing policy and global
  /// default until cleared.
  pub fn disable_for(&self, window_id: WindowId) {
    self.set_override(window_id, Override::Insecure);
  }

  fn set_override(&self, window_id: WindowId, value: Override) {
    self.write(|s| {
      if !s.is_initialized() {
        log::warn!("ignoring override for window {window_id}: not initialized");
        return;
      }
      if s.window(window_id).is_none() {
        log::warn!("ignoring override for untracked window {window_id}");
        return;
      }
      s.set_override(window_id, value);
      s.apply_window(window_id, false);
    });
  }

  /// Drop the manual override for one window and recompute-and-apply
  /// from policy/global default.
  pub fn clear_override(&self, window_id: WindowId) {
    self.write(|s| {
      if s.remove_override(window_id) {
        s.apply_window(window_id, false);
      }
    });
  }

  /// Drop every manual override and recompute-and-apply for every live
  /// window.
  pub fn clear_all_overrides(&self) {
    self.write(|s| {
      s.clear_overrides();
      s.apply_all(false);
    });
  }

  /// Force a recompute-and-apply across all live windows, bypassing the
  /// applied-value cache.
  pub fn reapply_all(&self) {
    self.write(|s| s.apply_all(true));
  }
}

#[cfg(test)]
mod tests {
  use super::super::testing::TestSurface;
  use super::*;
  use crate::policy::NameBased;
  use crate::types::{Event, Window};

  fn veil() -> Veil<TestSurface> {
    Veil::<TestSurface>::builder()
      .default_secure(true)
      .debug_suppressed(false)
      .build()
  }

  fn open_window(veil: &Veil<TestSurface>, type_name: &str) -> (WindowId, TestSurface) {
    let id = WindowId::new();
    let surface = TestSurface::new();
    veil.write(|s| {
      s.track(Window::new(id, type_name), surface.clone());
      s.apply_window(id, false);
    });
    (id, surface)
  }

  fn drain(events: &mut async_broadcast::Receiver<Event>) -> Vec<Event> {
    let mut out = Vec::new();
    while let Ok(event) = events.try_recv() {
      out.push(event);
    }
    out
  }

  mod initialize {
    use super::*;

    #[test]
    fn first_caller_wins() {
      let veil: Veil<TestSurface> = Veil::new();
      assert!(veil.initialize(ShieldConfig {
        default_secure: true,
        debug_suppressed: false,
        policy: None,
      }));
      assert!(
        !veil.initialize(ShieldConfig {
          default_secure: false,
          debug_suppressed: true,
          policy: None,
        }),
        "second initialize must be a no-op"
      );
      assert!(veil.is_globally_enabled(), "first configuration must stand");
      assert!(!veil.is_debug_suppressed());
    }

    #[test]
    fn covers_windows_tracked_before_initialization() {
      let veil: Veil<TestSurface> = Veil::new();
      let id = WindowId::new();
      let surface = TestSurface::new();
      veil.write(|s| {
        s.track(Window::new(id, "EarlyScreen"), surface.clone());
        s.apply_window(id, false);
      });
      assert!(!surface.shielded(), "no application before initialize");

      veil.initialize(ShieldConfig {
        default_secure: true,
        debug_suppressed: false,
        policy: None,
      });
      assert!(surface.shielded(), "initialize must recompute early windows");
      assert!(veil.is_secure(id));
    }
  }

  mod overrides {
    use super::*;

    #[test]
    fn disable_beats_global_default_until_cleared() {
      let veil = veil();
      let (id, surface) = open_window(&veil, "HomeScreen");
      assert!(veil.is_secure(id));
      assert!(surface.shielded());

      veil.disable_for(id);
      assert!(!veil.is_secure(id));
      assert!(!surface.shielded());

      veil.clear_override(id);
      assert!(veil.is_secure(id), "cleared override reverts to the default");
      assert!(surface.shielded());
    }

    #[test]
    fn enable_beats_policy() {
      let veil: Veil<TestSurface> = Veil::<TestSurface>::builder()
        .default_secure(false)
        .debug_suppressed(false)
        .policy(NameBased::new(["CheckoutScreen"]))
        .build();
      let (id, surface) = open_window(&veil, "HomeScreen");
      assert!(!veil.is_secure(id), "policy says no for this name");

      veil.enable_for(id);
      assert!(veil.is_secure(id), "manual intent beats the policy");
      assert!(surface.shielded());
    }

    #[test]
    fn clear_all_reverts_every_window() {
      let veil = veil();
      let (a, surface_a) = open_window(&veil, "A");
      let (b, surface_b) = open_window(&veil, "B");
      veil.disable_for(a);
      veil.disable_for(b);
      assert!(!surface_a.shielded());
      assert!(!surface_b.shielded());

      veil.clear_all_overrides();
      assert!(veil.is_secure(a));
      assert!(veil.is_secure(b));
      assert!(surface_a.shielded());
      assert!(surface_b.shielded());
    }

    #[test]
    fn unknown_window_is_a_no_op() {
      let veil = veil();
      veil.enable_for(WindowId(9999));
      assert_eq!(veil.tracked_window_count(), 0);
      assert!(!veil.is_secure(WindowId(9999)));
    }
  }

  mod global_default {
    use super::*;

    #[test]
    fn change_reapplies_to_live_windows() {
      let veil = veil();
      let (id, surface) = open_window(&veil, "HomeScreen");
      assert!(surface.shielded());

      veil.set_globally_enabled(false);
      assert!(!veil.is_secure(id));
      assert!(!surface.shielded());

      veil.set_globally_enabled(true);
      assert!(surface.shielded());
    }

    #[test]
    fn overridden_windows_are_unaffected() {
      let veil = veil();
      let (id, surface) = open_window(&veil, "HomeScreen");
      veil.disable_for(id);

      veil.set_globally_enabled(false);
      veil.set_globally_enabled(true);
      assert!(!veil.is_secure(id), "override still wins after default flips");
      assert!(!surface.shielded());
    }
  }

  mod policies {
    use super::*;

    #[test]
    fn installing_a_policy_recomputes_live_windows() {
      let veil = veil();
      let (home, home_surface) = open_window(&veil, "HomeScreen");
      let (checkout, checkout_surface) = open_window(&veil, "CheckoutScreen");
      assert!(home_surface.shielded(), "default shields everything");

      veil.set_policy(Some(Arc::new(NameBased::new(["CheckoutScreen"]))));
      assert!(!veil.is_secure(home));
      assert!(veil.is_secure(checkout));
      assert!(!home_surface.shielded());
      assert!(checkout_surface.shielded());
    }

    #[test]
    fn clearing_the_policy_restores_the_default() {
      let veil = veil();
      let (home, home_surface) = open_window(&veil, "HomeScreen");
      veil.set_policy(Some(Arc::new(NameBased::new(["CheckoutScreen"]))));
      assert!(!home_surface.shielded());

      veil.set_policy(None);
      assert!(veil.is_secure(home));
      assert!(home_surface.shielded());
    }
  }

  mod debug_suppression {
    use super::*;

    #[test]
    fn wins_over_override_and_default() {
      let veil: Veil<TestSurface> = Veil::<TestSurface>::builder()
        .default_secure(true)
        .debug_suppressed(true)
        .build();
      let (id, surface) = open_window(&veil, "VaultScreen");
      assert!(!veil.is_secure(id), "debug forces not-secure");
      assert!(!surface.shielded());

      veil.enable_for(id);
      assert!(!veil.is_secure(id), "even a manual enable is suppressed");
      assert!(!surface.shielded());
    }

    #[test]
    fn recorded_intent_survives_suppression() {
      let veil: Veil<TestSurface> = Veil::<TestSurface>::builder()
        .default_secure(false)
        .debug_suppressed(true)
        .build();
      let (id, surface) = open_window(&veil, "VaultScreen");
      veil.enable_for(id);
      assert!(!surface.shielded());

      veil.set_debug_suppressed(false);
      assert!(veil.is_secure(id), "lifting debug honors the recorded intent");
      assert!(surface.shielded());
    }
  }

  mod failures {
    use super::*;

    #[test]
    fn platform_failure_emits_an_event_and_nothing_panics() {
      let veil = veil();
      let mut events = veil.subscribe();
      let id = WindowId::new();
      let surface = TestSurface::new();
      surface.fail_updates();
      veil.write(|s| {
        s.track(Window::new(id, "HomeScreen"), surface.clone());
        s.apply_window(id, false);
      });

      let saw_error = drain(&mut events)
        .iter()
        .any(|e| matches!(e, Event::ShieldError { window_id, .. } if *window_id == id));
      assert!(saw_error, "failure must surface as a shield:error event");
    }
  }

  mod reapply {
    use super::*;

    #[test]
    fn reapply_all_bypasses_the_cache() {
      let veil = veil();
      let (_, surface) = open_window(&veil, "HomeScreen");
      let calls_before = surface.calls();

      surface.silently_reset_flag();
      veil.reapply_all();
      assert!(surface.shielded(), "forced pass must re-assert the flag");
      assert!(surface.calls() > calls_before);
    }
  }

  mod uninitialized {
    use super::*;

    #[test]
    fn mutations_are_tolerated_no_ops() {
      let veil: Veil<TestSurface> = Veil::new();
      veil.set_globally_enabled(true);
      veil.set_debug_suppressed(true);
      veil.set_policy(Some(Arc::new(NameBased::new(["X"]))));
      veil.enable_for(WindowId(1));
      veil.clear_override(WindowId(1));
      veil.clear_all_overrides();
      veil.reapply_all();

      assert!(!veil.is_initialized());
      assert!(!veil.is_globally_enabled());
      assert!(veil.policy().is_none());
    }
  }
}
