/*!
Veilio - per-window capture-shield state management.

Decides, for every live window, whether the host platform's
anti-capture flag (the one blocking screenshots, screen recording, and
recents thumbnails) should be asserted, and keeps that flag
synchronized with the window lifecycle.

Decision precedence, highest first:

1. **debug suppression** - forces "not secure" everywhere so
   instrumented/test builds stay screenshot-able;
2. **manual override** - `enable_for`/`disable_for`, explicit developer
   intent for one window;
3. **installed policy** - a predicate over window identity/metadata,
   composable with [`AllOf`]/[`AnyOf`];
4. **global default**.

```ignore
use veilio::{LifecycleHandler, NameBased, Veil, Window, WindowEvent, WindowId};

// One manager per process, built where initialization happens.
// `HostSurface` is the host's window handle implementing SecureSurface.
let veil: Veil<HostSurface> = Veil::builder()
  .default_secure(false)
  .policy(NameBased::new(["CheckoutScreen", "login::LoginScreen"]))
  .build();

// The host feeds lifecycle notifications in.
veil.on_window_event(WindowEvent::Created { window, surface });

// Manual override beats policy and default until cleared.
veil.enable_for(window_id);
veil.clear_override(window_id);

// Pure query through the same precedence.
let secure = veil.is_secure(window_id);

// Events for observability.
let mut events = veil.subscribe();
while let Ok(event) = events.recv().await {
    // handle event
}
```

The crate performs no pixel-level capture prevention itself - it only
decides and applies the single platform-provided flag, through the
host's [`SecureSurface`] implementation. Nothing is persisted across
process restarts.
*/

mod core;
mod platform;
mod policy;

mod types;
pub use types::*;

pub use crate::core::{LifecycleHandler, ShieldConfig, ShieldGuard, Veil, VeilBuilder, WindowEvent};
pub use crate::platform::SecureSurface;
pub use crate::policy::{
  AllOf, AlwaysSecure, AnyOf, NameBased, NeverSecure, SecurePolicy, TagBased,
};
