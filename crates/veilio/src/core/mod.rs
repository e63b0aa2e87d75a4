/*!
Core manager - owns all shield state and event broadcasting.

# Module Structure

- `mod.rs` - `Veil` struct, construction, builder, lock helpers
- `registry.rs` - registry with private fields + operations + event emission
- `mutations.rs` - configuration and override operations (recompute-and-apply)
- `queries.rs` - pure reads through the same precedence
- `lifecycle.rs` - `WindowEvent`, `LifecycleHandler` impl
- `guard.rs` - scoped `ShieldGuard`

# Example

```ignore
let veil: Veil<HostSurface> = Veil::builder()
  .default_secure(true)
  .debug_suppressed(false)
  .build();

veil.on_window_event(WindowEvent::Created { window, surface });
assert!(veil.is_secure(window_id));

let mut events = veil.subscribe();
while let Ok(event) = events.recv().await {
    // handle event
}
```
*/

mod guard;
mod lifecycle;
mod mutations;
mod queries;
mod registry;

pub use guard::ShieldGuard;
pub use lifecycle::{LifecycleHandler, WindowEvent};

pub(crate) use registry::{Override, Registry, Settings};

use crate::platform::SecureSurface;
use crate::policy::SecurePolicy;
use crate::types::Event;
use async_broadcast::InactiveReceiver;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// The window security state manager.
///
/// Merges a per-window manual override, an optional policy, and a
/// global default into one shield decision per live window, and keeps
/// the platform flag synchronized with that decision across the window
/// lifecycle.
///
/// An explicit, constructible object: build one where initialization
/// happens and hand clones to the lifecycle source and call sites.
/// Clone is cheap (Arc bumps) - share freely across threads.
pub struct Veil<S: SecureSurface> {
  pub(crate) state: Arc<RwLock<Registry<S>>>,
  events_keepalive: InactiveReceiver<Event>,
}

impl<S: SecureSurface> Clone for Veil<S> {
  fn clone(&self) -> Self {
    Self {
      state: Arc::clone(&self.state),
      events_keepalive: self.events_keepalive.clone(),
    }
  }
}

impl<S: SecureSurface> fmt::Debug for Veil<S> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Veil").finish_non_exhaustive()
  }
}

impl<S: SecureSurface> Default for Veil<S> {
  fn default() -> Self {
    Self::new()
  }
}

impl<S: SecureSurface> Veil<S> {
  /// Create an unconfigured manager.
  ///
  /// Until [`initialize`](Self::initialize) runs, every query answers
  /// "not secure" and every mutation is a tolerated no-op. Lifecycle
  /// events are still tracked, so windows created while a background
  /// initializer is racing a foreground callback are picked up by the
  /// recompute that initialization ends with.
  pub fn new() -> Self {
    let (mut tx, rx) = async_broadcast::broadcast(EVENT_CHANNEL_CAPACITY);
    tx.set_overflow(true); // drop oldest events when full
    Self {
      state: Arc::new(RwLock::new(Registry::new(tx))),
      events_keepalive: rx.deactivate(),
    }
  }

  /// Create a builder for a configured manager.
  pub fn builder() -> VeilBuilder {
    VeilBuilder::default()
  }

  /// Subscribe to events from this manager.
  pub fn subscribe(&self) -> async_broadcast::Receiver<Event> {
    self.events_keepalive.activate_cloned()
  }

  /// Read state. Never blocks inside the closure.
  #[inline]
  pub(crate) fn read<R>(&self, f: impl FnOnce(&Registry<S>) -> R) -> R {
    f(&self.state.read())
  }

  /// Write state. The closure is the coarse mutual-exclusion section
  /// covering "recompute and apply"; nothing inside may block.
  #[inline]
  pub(crate) fn write<R>(&self, f: impl FnOnce(&mut Registry<S>) -> R) -> R {
    f(&mut self.state.write())
  }
}

/// Initialization settings for [`Veil::initialize`].
#[derive(Clone)]
pub struct ShieldConfig {
  /// Decision used when no override and no policy applies.
  pub default_secure: bool,
  /// Debug safety valve: forces "not secure" for every window so
  /// instrumented builds stay capturable.
  pub debug_suppressed: bool,
  /// Policy consulted when no manual override is present.
  pub policy: Option<Arc<dyn SecurePolicy>>,
}

impl Default for ShieldConfig {
  /// Shield everything by default; suppress in debug builds, matching
  /// the build profile (`cfg!(debug_assertions)`).
  fn default() -> Self {
    Self {
      default_secure: true,
      debug_suppressed: cfg!(debug_assertions),
      policy: None,
    }
  }
}

impl fmt::Debug for ShieldConfig {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ShieldConfig")
      .field("default_secure", &self.default_secure)
      .field("debug_suppressed", &self.debug_suppressed)
      .field("has_policy", &self.policy.is_some())
      .finish()
  }
}

/// Builder for a configured [`Veil`].
///
/// # Example
///
/// ```ignore
/// let veil: Veil<HostSurface> = Veil::builder()
///     .default_secure(false)
///     .policy(NameBased::new(["CheckoutScreen"]))
///     .build();
/// ```
#[derive(Default)]
#[must_use = "Builder does nothing until .build() is called"]
pub struct VeilBuilder {
  config: ShieldConfig,
}

impl VeilBuilder {
  /// Decision used when no override and no policy applies.
  /// Default: `true`.
  pub fn default_secure(mut self, secure: bool) -> Self {
    self.config.default_secure = secure;
    self
  }

  /// Set the debug safety valve explicitly instead of detecting it from
  /// the build profile.
  pub fn debug_suppressed(mut self, suppressed: bool) -> Self {
    self.config.debug_suppressed = suppressed;
    self
  }

  /// Install a policy at initialization.
  pub fn policy(mut self, policy: impl SecurePolicy) -> Self {
    self.config.policy = Some(Arc::new(policy));
    self
  }

  /// Build an initialized manager with the configured options.
  pub fn build<S: SecureSurface>(self) -> Veil<S> {
    let veil = Veil::new();
    veil.initialize(self.config);
    veil
  }
}

impl fmt::Debug for VeilBuilder {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("VeilBuilder")
      .field("config", &self.config)
      .finish()
  }
}
