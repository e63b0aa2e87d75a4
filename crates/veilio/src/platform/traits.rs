/*!
Platform abstraction for the capture-shield flag.

The host owns the real window handles; this crate needs exactly two
things from them: a way to assert/clear the platform's anti-capture
flag and a way to ask whether the window is mid-teardown. Core code
only uses this trait - never platform-specific types directly.
*/

use crate::types::VeilResult;

/// A host window handle the capture-shield flag can be applied to.
/// Clone is expected to be cheap (handles are typically reference-counted).
///
/// Implementations must be:
///
/// - **idempotent**: setting the flag to its current value leaves the
///   same end state as setting it once;
/// - **non-blocking**: the manager calls this inside its state lock, so
///   a flag update must be a fast, synchronous operation;
/// - **teardown-aware**: [`is_closing`](Self::is_closing) reports
///   whether the window has started going away.
pub trait SecureSurface: Clone + Send + Sync + 'static {
  /// Assert (`true`) or clear (`false`) the platform anti-capture flag.
  fn set_capture_shield(&self, shielded: bool) -> VeilResult<()>;

  /// Whether the window is in the process of closing.
  fn is_closing(&self) -> bool;
}

/// Outcome of one flag application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Applied {
  /// The flag now holds the requested value.
  Set,
  /// The window is mid-teardown; nothing was touched.
  SkippedClosing,
  /// The platform rejected the update; the previous flag state stands.
  Failed(String),
}

/// Apply the flag to a surface, tolerating teardown and platform errors.
///
/// Never propagates a failure: a closing window is a silent no-op and a
/// platform error is logged here and reported by the caller as a
/// non-fatal event.
pub(crate) fn apply_shield<S: SecureSurface>(surface: &S, shielded: bool) -> Applied {
  if surface.is_closing() {
    log::debug!("skipping capture-shield update on a closing window");
    return Applied::SkippedClosing;
  }
  match surface.set_capture_shield(shielded) {
    Ok(()) => Applied::Set,
    Err(e) => {
      log::warn!("capture-shield update failed: {e}");
      Applied::Failed(e.to_string())
    }
  }
}
