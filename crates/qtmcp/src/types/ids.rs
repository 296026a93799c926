/*!
Object naming styles and session-scoped reference ids.

Three interchangeable client-visible styles address the same object:
a hierarchical path from a top-level root, a numeric `#N` ref minted on
first exposure, and a symbolic alias bound to a path. Parsing yields the
style; resolution is a single match in the resolver.
*/

use derive_more::{Display, From, Into};

/// A parsed client-supplied object identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectId {
  /// `#N` numeric ref, session scoped.
  Numeric(u64),
  /// Exact match in the symbolic alias map.
  Alias(String),
  /// Hierarchical `/`-separated path.
  Path(String),
}

/// Session-scoped numeric object ref, printed as `#N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, From, Into)]
#[display("#{_0}")]
pub struct ObjectRef(pub u64);

impl ObjectRef {
  /// Parse `#N`. Returns `None` for anything else.
  pub fn parse(s: &str) -> Option<Self> {
    s.strip_prefix('#')?.parse().ok().map(Self)
  }
}

/// Session-scoped accessibility ref, printed as `ref_N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, From, Into)]
#[display("ref_{_0}")]
pub struct AccessRef(pub u64);

impl AccessRef {
  /// Parse `ref_N`. Returns `None` for anything else.
  pub fn parse(s: &str) -> Option<Self> {
    s.strip_prefix("ref_")?.parse().ok().map(Self)
  }
}

/// Signal subscription id, printed as `sub_N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, From, Into)]
#[display("sub_{_0}")]
pub struct SubscriptionId(pub u64);

impl SubscriptionId {
  /// Parse `sub_N`. Returns `None` for anything else.
  pub fn parse(s: &str) -> Option<Self> {
    s.strip_prefix("sub_")?.parse().ok().map(Self)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn refs_round_trip_through_display() {
    assert_eq!(ObjectRef(7).to_string(), "#7");
    assert_eq!(ObjectRef::parse("#7"), Some(ObjectRef(7)));
    assert_eq!(AccessRef(3).to_string(), "ref_3");
    assert_eq!(AccessRef::parse("ref_3"), Some(AccessRef(3)));
    assert_eq!(SubscriptionId(1).to_string(), "sub_1");
    assert_eq!(SubscriptionId::parse("sub_1"), Some(SubscriptionId(1)));
  }

  #[test]
  fn malformed_refs_do_not_parse() {
    assert_eq!(ObjectRef::parse("7"), None);
    assert_eq!(ObjectRef::parse("#x"), None);
    assert_eq!(AccessRef::parse("ref_"), None);
    assert_eq!(SubscriptionId::parse("sub_one"), None);
  }
}
