/*!
Registry - the single source of truth for manager state.

All fields are private. Mutations go through methods that maintain
invariants and emit events. This guarantees:
- tracked membership matches exactly the created-but-not-destroyed set
- an override entry never outlives its window
- flag changes and failures are always reported on the event stream

The caller (the manager) holds the lock; nothing here blocks, and the
only external call is the surface flag update, which the
[`SecureSurface`] contract requires to be fast and non-blocking.
*/

use async_broadcast::Sender;
use std::collections::HashMap;
use std::sync::Arc;

use crate::platform::{apply_shield, Applied, SecureSurface};
use crate::policy::SecurePolicy;
use crate::types::{Event, Window, WindowId};

/// Manual per-window decision. Absence from the override table means
/// "defer to policy/global default".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Override {
  /// Force the shield on, bypassing policy and global default.
  Secure,
  /// Force the shield off, bypassing policy and global default.
  Insecure,
}

/// Configuration installed by `initialize`. Absent until then.
pub(crate) struct Settings {
  pub(crate) default_secure: bool,
  pub(crate) debug_suppressed: bool,
  pub(crate) policy: Option<Arc<dyn SecurePolicy>>,
}

/// Per-window registry entry.
pub(crate) struct TrackedWindow<S> {
  pub(crate) info: Window,
  pub(crate) surface: S,
  /// Last flag value actually applied to the surface. `None` until the
  /// first successful application.
  pub(crate) shielded: Option<bool>,
}

/// Internal state storage with automatic event emission.
pub(crate) struct Registry<S> {
  events_tx: Sender<Event>,
  windows: HashMap<WindowId, TrackedWindow<S>>,
  overrides: HashMap<WindowId, Override>,
  settings: Option<Settings>,
}

impl<S: SecureSurface> Registry<S> {
  pub(crate) fn new(events_tx: Sender<Event>) -> Self {
    Self {
      events_tx,
      windows: HashMap::new(),
      overrides: HashMap::new(),
      settings: None,
    }
  }

  /// Emit an event.
  fn emit(&self, event: Event) {
    if let Err(e) = self.events_tx.try_broadcast(event) {
      if e.is_full() {
        log::error!("event channel overflow - events are being dropped");
      }
    }
  }

  // === Lifecycle membership ===

  /// Insert a window into the live set.
  ///
  /// Re-announcing an already-tracked identity refreshes the descriptor
  /// and surface in place (the host re-sent created) and keeps both the
  /// applied flag state and any override.
  pub(crate) fn track(&mut self, window: Window, surface: S) {
    let window_id = window.id;
    if let Some(existing) = self.windows.get_mut(&window_id) {
      log::debug!("window {window_id} tracked twice, refreshing entry");
      existing.info = window;
      existing.surface = surface;
      return;
    }
    self.windows.insert(
      window_id,
      TrackedWindow {
        info: window.clone(),
        surface,
        shielded: None,
      },
    );
    self.emit(Event::WindowTracked { window });
  }

  /// Remove a window from the live set.
  ///
  /// The override entry is purged unconditionally: a stale override
  /// must never survive to a recycled window identity.
  pub(crate) fn untrack(&mut self, window_id: WindowId) {
    self.overrides.remove(&window_id);
    if self.windows.remove(&window_id).is_some() {
      self.emit(Event::WindowUntracked { window_id });
    }
  }

  pub(crate) fn window(&self, window_id: WindowId) -> Option<&TrackedWindow<S>> {
    self.windows.get(&window_id)
  }

  pub(crate) fn count(&self) -> usize {
    self.windows.len()
  }

  pub(crate) fn live_ids(&self) -> Vec<WindowId> {
    self.windows.keys().copied().collect()
  }

  /// Snapshot of all live descriptors.
  pub(crate) fn live_windows(&self) -> Vec<Window> {
    self.windows.values().map(|t| t.info.clone()).collect()
  }

  // === Settings ===

  /// Install the initial configuration. First caller wins: returns
  /// `false` and changes nothing if settings are already installed.
  pub(crate) fn install_settings(&mut self, settings: Settings) -> bool {
    if self.settings.is_some() {
      return false;
    }
    self.settings = Some(settings);
    true
  }

  pub(crate) fn settings(&self) -> Option<&Settings> {
    self.settings.as_ref()
  }

  pub(crate) fn is_initialized(&self) -> bool {
    self.settings.is_some()
  }

  /// Update the global default. Returns `false` when uninitialized.
  pub(crate) fn set_default_secure(&mut self, secure: bool) -> bool {
    match self.settings.as_mut() {
      Some(settings) => {
        settings.default_secure = secure;
        true
      }
      None => false,
    }
  }

  /// Toggle the debug safety valve. Returns `false` when uninitialized.
  pub(crate) fn set_debug_suppressed(&mut self, suppressed: bool) -> bool {
    match self.settings.as_mut() {
      Some(settings) => {
        settings.debug_suppressed = suppressed;
        true
      }
      None => false,
    }
  }

  /// Replace (or clear) the installed policy. Returns `false` when
  /// uninitialized.
  pub(crate) fn set_policy(&mut self, policy: Option<Arc<dyn SecurePolicy>>) -> bool {
    match self.settings.as_mut() {
      Some(settings) => {
        settings.policy = policy;
        true
      }
      None => false,
    }
  }

  // === Override table ===

  /// Record a manual decision for a live window.
  pub(crate) fn set_override(&mut self, window_id: WindowId, value: Override) {
    self.overrides.insert(window_id, value);
  }

  /// Drop the manual decision for a window. Returns whether one existed.
  pub(crate) fn remove_override(&mut self, window_id: WindowId) -> bool {
    self.overrides.remove(&window_id).is_some()
  }

  /// Drop every manual decision.
  pub(crate) fn clear_overrides(&mut self) {
    self.overrides.clear();
  }

  // === Decisions ===

  /// The precedence algorithm, evaluated fresh on every call.
  ///
  /// Debug suppression beats the manual override, which beats the
  /// installed policy, which beats the global default. Returns `None`
  /// when the manager is uninitialized or the window unknown.
  pub(crate) fn decision_for(&self, window_id: WindowId) -> Option<bool> {
    let settings = self.settings.as_ref()?;
    let tracked = self.windows.get(&window_id)?;
    if settings.debug_suppressed {
      return Some(false);
    }
    if let Some(value) = self.overrides.get(&window_id) {
      return Some(matches!(value, Override::Secure));
    }
    if let Some(policy) = &settings.policy {
      return Some(policy.should_secure(&tracked.info));
    }
    Some(settings.default_secure)
  }

  /// Recompute the decision for one window and push it to the surface.
  ///
  /// `force` bypasses the applied-value cache; resume transitions use it
  /// because the platform may have silently reset the flag.
  pub(crate) fn apply_window(&mut self, window_id: WindowId, force: bool) {
    let Some(decision) = self.decision_for(window_id) else {
      return;
    };
    let event = match self.windows.get_mut(&window_id) {
      None => return,
      Some(tracked) => {
        if !force && tracked.shielded == Some(decision) {
          return;
        }
        match apply_shield(&tracked.surface, decision) {
          Applied::Set => {
            let changed = tracked.shielded != Some(decision);
            tracked.shielded = Some(decision);
            changed.then_some(Event::ShieldChanged {
              window_id,
              shielded: decision,
            })
          }
          Applied::SkippedClosing => None,
          Applied::Failed(reason) => Some(Event::ShieldError { window_id, reason }),
        }
      }
    };
    if let Some(event) = event {
      self.emit(event);
    }
  }

  /// Recompute and apply for every live window.
  pub(crate) fn apply_all(&mut self, force: bool) {
    for window_id in self.live_ids() {
      self.apply_window(window_id, force);
    }
  }
}
