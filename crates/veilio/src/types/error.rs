/*! Error types for veilio operations. */

use super::WindowId;

/// Errors that can occur during veilio operations.
#[derive(Debug, thiserror::Error)]
pub enum VeilError {
  /// The platform refused to update the capture-shield flag.
  ///
  /// Raised by [`SecureSurface`](crate::SecureSurface) implementations;
  /// the manager recovers from it locally and never propagates it.
  #[error("platform rejected capture-shield update: {0}")]
  ShieldRejected(String),

  /// The window is not in the live registry.
  #[error("window not tracked: {0}")]
  WindowNotTracked(WindowId),
}

/// Result type for veilio operations.
pub type VeilResult<T> = Result<T, VeilError>;
