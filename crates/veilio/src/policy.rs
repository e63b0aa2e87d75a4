/*!
Security policies - predicates over window identity and metadata.

A policy decides whether a window should have the capture shield
asserted when no manual override is present. Policies are pure
predicates; [`AllOf`] and [`AnyOf`] build arbitrarily nested AND/OR
trees over them.

```ignore
use std::sync::Arc;
use veilio::{AllOf, AnyOf, NameBased, TagBased};

// Shield windows that are tagged sensitive OR named in the checkout set.
let policy = AnyOf::new(vec![
  Arc::new(TagBased::new("sensitive")),
  Arc::new(NameBased::new(["CheckoutScreen", "login::LoginScreen"])),
]);
```
*/

use crate::types::Window;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// A predicate over window identity/metadata.
///
/// Implementations must be total: an answer for every descriptor, no
/// panics, no side effects. The manager evaluates policies inside its
/// state lock, so they must also be fast and non-blocking.
pub trait SecurePolicy: Send + Sync + 'static {
  /// Whether the capture shield should be asserted for `window`.
  fn should_secure(&self, window: &Window) -> bool;
}

/// Any `Fn(&Window) -> bool` closure is a policy.
impl<F> SecurePolicy for F
where
  F: Fn(&Window) -> bool + Send + Sync + 'static,
{
  fn should_secure(&self, window: &Window) -> bool {
    self(window)
  }
}

/// Asserts the shield for every window.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysSecure;

impl SecurePolicy for AlwaysSecure {
  fn should_secure(&self, _window: &Window) -> bool {
    true
  }
}

/// Never asserts the shield.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverSecure;

impl SecurePolicy for NeverSecure {
  fn should_secure(&self, _window: &Window) -> bool {
    false
  }
}

/// Asserts the shield for windows whose type name is in a fixed set.
///
/// Both the full type name and its `::`-short form are checked against
/// the set, so an entry of `"CheckoutScreen"` matches a window reported
/// as `"checkout::CheckoutScreen"` as well as one reported by the short
/// form alone.
#[derive(Debug, Clone, Default)]
pub struct NameBased {
  names: HashSet<String>,
}

impl NameBased {
  /// Build from any collection of type names (full or short form).
  pub fn new<I, S>(names: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      names: names.into_iter().map(Into::into).collect(),
    }
  }
}

impl SecurePolicy for NameBased {
  fn should_secure(&self, window: &Window) -> bool {
    self.names.contains(window.type_name.as_str()) || self.names.contains(window.short_name())
  }
}

/// Asserts the shield for windows whose type declares a marker tag.
///
/// Only the declared tag list is consulted, never runtime content.
#[derive(Debug, Clone)]
pub struct TagBased {
  tag: String,
}

impl TagBased {
  /// Build a policy matching the given marker tag exactly.
  pub fn new(tag: impl Into<String>) -> Self {
    Self { tag: tag.into() }
  }
}

impl SecurePolicy for TagBased {
  fn should_secure(&self, window: &Window) -> bool {
    window.has_tag(&self.tag)
  }
}

/// True iff every child policy is true.
///
/// An empty `AllOf` is vacuously true. Evaluation short-circuits left
/// to right.
#[derive(Clone, Default)]
pub struct AllOf {
  policies: Vec<Arc<dyn SecurePolicy>>,
}

impl AllOf {
  /// Combine the given policies with AND logic.
  pub fn new(policies: Vec<Arc<dyn SecurePolicy>>) -> Self {
    Self { policies }
  }
}

impl SecurePolicy for AllOf {
  fn should_secure(&self, window: &Window) -> bool {
    self.policies.iter().all(|p| p.should_secure(window))
  }
}

impl fmt::Debug for AllOf {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("AllOf")
      .field("policies", &self.policies.len())
      .finish()
  }
}

/// True iff any child policy is true.
///
/// An empty `AnyOf` is vacuously false. Evaluation short-circuits left
/// to right.
#[derive(Clone, Default)]
pub struct AnyOf {
  policies: Vec<Arc<dyn SecurePolicy>>,
}

impl AnyOf {
  /// Combine the given policies with OR logic.
  pub fn new(policies: Vec<Arc<dyn SecurePolicy>>) -> Self {
    Self { policies }
  }
}

impl SecurePolicy for AnyOf {
  fn should_secure(&self, window: &Window) -> bool {
    self.policies.iter().any(|p| p.should_secure(window))
  }
}

impl fmt::Debug for AnyOf {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("AnyOf")
      .field("policies", &self.policies.len())
      .finish()
  }
}
