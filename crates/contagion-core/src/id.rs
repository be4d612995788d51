//! Identity types for contagion graphs
//!
//! Graph files may label nodes with integers or strings. State lookups only
//! ever compare labels, so every identifier is canonicalised to its string
//! form: the integer `7` and the label `"7"` name the same node.

use std::borrow::Borrow;
use std::fmt;

/// Node identity - the canonical string label of a graph node
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct NodeId(String);

impl NodeId {
    #[inline]
    pub fn new(label: impl Into<String>) -> Self {
        NodeId(label.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(label: &str) -> Self {
        NodeId(label.to_string())
    }
}

impl From<String> for NodeId {
    fn from(label: String) -> Self {
        NodeId(label)
    }
}

impl From<i64> for NodeId {
    fn from(id: i64) -> Self {
        NodeId(id.to_string())
    }
}

impl From<u64> for NodeId {
    fn from(id: u64) -> Self {
        NodeId(id.to_string())
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_integer_and_label_canonicalise_equal() {
        assert_eq!(NodeId::from(7i64), NodeId::from("7"));
        assert_eq!(NodeId::from(7u64), NodeId::new(String::from("7")));
    }

    #[test]
    fn test_lookup_by_str() {
        let mut set = HashSet::new();
        set.insert(NodeId::from("alice"));

        assert!(set.contains("alice"));
        assert!(!set.contains("bob"));
    }

    #[test]
    fn test_display() {
        let id = NodeId::from(42i64);
        assert_eq!(id.to_string(), "42");
        assert_eq!(format!("{:?}", id), "Node(42)");
    }
}
