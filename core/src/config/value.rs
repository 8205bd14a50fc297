//! Configuration values and nodes

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ConfigKey;

/// A single configuration value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    /// Integers above `i64::MAX`.
    UInt(u64),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Node(Node),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Integers widen to numbers.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Int(i) => Some(*i as f64),
            Value::UInt(u) => Some(*u as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Value::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_scalar(&self) -> bool {
        !matches!(self, Value::Node(_) | Value::Array(_))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Node> for Value {
    fn from(node: Node) -> Self {
        Value::Node(node)
    }
}

/// A keyed tree of values.
///
/// Keys the application knows are addressed with [`ConfigKey`]; anything else
/// found on disk is kept verbatim and written back unchanged. JSON `null`
/// entries are dropped on load.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, Option<Value>>",
    into = "BTreeMap<String, Value>"
)]
pub struct Node {
    values: BTreeMap<String, Value>,
}

impl From<BTreeMap<String, Option<Value>>> for Node {
    fn from(raw: BTreeMap<String, Option<Value>>) -> Self {
        Self {
            values: raw
                .into_iter()
                .filter_map(|(key, value)| value.map(|v| (key, v)))
                .collect(),
        }
    }
}

impl From<Node> for BTreeMap<String, Value> {
    fn from(node: Node) -> Self {
        node.values
    }
}

impl Node {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: ConfigKey) -> Option<&Value> {
        self.values.get(key.as_str())
    }

    pub fn get_raw(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn set(&mut self, key: ConfigKey, value: impl Into<Value>) {
        self.values.insert(key.as_str().to_string(), value.into());
    }

    pub fn set_raw(&mut self, key: &str, value: impl Into<Value>) {
        self.values.insert(key.to_string(), value.into());
    }

    pub fn remove(&mut self, key: ConfigKey) -> Option<Value> {
        self.values.remove(key.as_str())
    }

    pub fn remove_raw(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    pub fn string(&self, key: ConfigKey) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn int(&self, key: ConfigKey) -> Option<i64> {
        self.get(key).and_then(Value::as_int)
    }

    pub fn child(&self, key: ConfigKey) -> Option<&Node> {
        self.child_raw(key.as_str())
    }

    pub fn child_raw(&self, key: &str) -> Option<&Node> {
        self.values.get(key).and_then(Value::as_node)
    }

    /// Nested node at `key`. With `create`, an absent entry becomes an empty node.
    ///
    /// Returns `None` when a scalar occupies `key`.
    pub fn child_mut(&mut self, key: ConfigKey, create: bool) -> Option<&mut Node> {
        self.child_mut_raw(key.as_str(), create)
    }

    pub fn child_mut_raw(&mut self, key: &str, create: bool) -> Option<&mut Node> {
        if create && !self.values.contains_key(key) {
            self.values
                .insert(key.to_string(), Value::Node(Node::default()));
        }
        match self.values.get_mut(key) {
            Some(Value::Node(node)) => Some(node),
            _ => None,
        }
    }

    /// Walk `path` from this node, creating intermediate nodes when `create` is set.
    pub fn descend_mut(&mut self, path: &[ConfigKey], create: bool) -> Option<&mut Node> {
        let mut node = self;
        for key in path {
            node = node.child_mut(*key, create)?;
        }
        Some(node)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mixed_json() {
        let node: Node = serde_json::from_str(
            r#"{"formatVersion": 2, "computer": {"identifier": "C64"}, "speed": 0.5,
                "warp": true, "gone": null}"#,
        )
        .unwrap();
        assert_eq!(node.int(ConfigKey::FormatVersion), Some(2));
        assert_eq!(
            node.child(ConfigKey::Computer)
                .and_then(|c| c.string(ConfigKey::Identifier)),
            Some("C64")
        );
        assert_eq!(node.get_raw("speed").and_then(Value::as_f64), Some(0.5));
        assert_eq!(node.get_raw("warp").and_then(Value::as_bool), Some(true));
        assert!(node.get_raw("gone").is_none());
    }

    #[test]
    fn unknown_keys_survive_serialization() {
        let json = r#"{"somethingNew":{"a":1}}"#;
        let node: Node = serde_json::from_str(json).unwrap();
        assert_eq!(serde_json::to_string(&node).unwrap(), json);
    }

    #[test]
    fn arrays_and_large_integers_survive_serialization() {
        let json = r#"{"recentFiles":["a.d64",{"b":[1,2]}],"seed":18446744073709551615}"#;
        let node: Node = serde_json::from_str(json).unwrap();
        assert_eq!(
            node.get_raw("recentFiles")
                .and_then(Value::as_array)
                .map(<[Value]>::len),
            Some(2)
        );
        assert_eq!(
            node.get_raw("seed"),
            Some(&Value::UInt(18446744073709551615))
        );
        assert!(!node.get_raw("recentFiles").unwrap().is_scalar());
        assert_eq!(serde_json::to_string(&node).unwrap(), json);
    }

    #[test]
    fn child_mut_does_not_overwrite_scalars() {
        let mut node = Node::new();
        node.set(ConfigKey::Computer, "C64");
        assert!(node.child_mut(ConfigKey::Computer, true).is_none());
        assert_eq!(node.string(ConfigKey::Computer), Some("C64"));
    }

    #[test]
    fn descend_mut_creates_path() {
        let mut node = Node::new();
        node.descend_mut(&[ConfigKey::UserPort, ConfigKey::UserPortJoystick1], true)
            .unwrap()
            .set(ConfigKey::Identifier, "Competition Pro");
        let inner = node
            .child(ConfigKey::UserPort)
            .and_then(|n| n.child(ConfigKey::UserPortJoystick1))
            .unwrap();
        assert_eq!(inner.string(ConfigKey::Identifier), Some("Competition Pro"));
        assert!(node.descend_mut(&[ConfigKey::ExpansionPort], false).is_none());
    }
}
