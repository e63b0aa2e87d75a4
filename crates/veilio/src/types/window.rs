/*! Window descriptor - the unit of capture-shield application. */

use super::WindowId;
use serde::{Deserialize, Serialize};

/// Identity and metadata for one live window.
///
/// The host hands a descriptor in with the created event and it stays
/// valid until the matching destroyed event. The manager never extends a
/// window's lifetime - it only tracks descriptors and drops them again
/// on destroy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
  pub id: WindowId,
  /// Fully qualified screen type, e.g. `"checkout::CheckoutScreen"`.
  pub type_name: String,
  /// Marker tags declared for this window's type, e.g. `"sensitive"`.
  ///
  /// Tags are declared explicitly when the descriptor is built; nothing
  /// is ever inferred from runtime content.
  pub tags: Vec<String>,
}

impl Window {
  /// Create a descriptor with no tags.
  pub fn new(id: WindowId, type_name: impl Into<String>) -> Self {
    Self {
      id,
      type_name: type_name.into(),
      tags: Vec::new(),
    }
  }

  /// Declare a marker tag for this window's type.
  #[must_use]
  pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
    self.tags.push(tag.into());
    self
  }

  /// The last `::`-separated segment of [`type_name`](Self::type_name).
  ///
  /// `"checkout::CheckoutScreen"` and `"CheckoutScreen"` both yield
  /// `"CheckoutScreen"`.
  pub fn short_name(&self) -> &str {
    self.type_name.rsplit("::").next().unwrap_or(&self.type_name)
  }

  /// Whether this window's type declares the given marker tag.
  pub fn has_tag(&self, tag: &str) -> bool {
    self.tags.iter().any(|t| t == tag)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  mod short_name {
    use super::*;

    #[test]
    fn strips_module_path() {
      let window = Window::new(WindowId(1), "checkout::CheckoutScreen");
      assert_eq!(window.short_name(), "CheckoutScreen");
    }

    #[test]
    fn plain_name_is_its_own_short_form() {
      let window = Window::new(WindowId(1), "CheckoutScreen");
      assert_eq!(window.short_name(), "CheckoutScreen");
    }

    #[test]
    fn deep_paths_keep_only_the_last_segment() {
      let window = Window::new(WindowId(1), "app::settings::pin::PinEntryScreen");
      assert_eq!(window.short_name(), "PinEntryScreen");
    }
  }

  mod tags {
    use super::*;

    #[test]
    fn declared_tag_is_present() {
      let window = Window::new(WindowId(1), "VaultScreen").with_tag("sensitive");
      assert!(window.has_tag("sensitive"));
      assert!(!window.has_tag("public"), "undeclared tag must not match");
    }

    #[test]
    fn tags_accumulate() {
      let window = Window::new(WindowId(1), "VaultScreen")
        .with_tag("sensitive")
        .with_tag("pci");
      assert!(window.has_tag("sensitive"));
      assert!(window.has_tag("pci"));
    }

    #[test]
    fn matching_is_exact() {
      let window = Window::new(WindowId(1), "VaultScreen").with_tag("sensitive");
      assert!(!window.has_tag("sens"), "prefixes must not match");
      assert!(!window.has_tag("Sensitive"), "matching is case-sensitive");
    }
  }
}
