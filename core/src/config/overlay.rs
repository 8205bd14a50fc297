//! Cascading configuration layers
//!
//! An [`OverlayConfig`] stacks one writable override node over any number of
//! read-only [`Layer`]s (per-title settings over global settings over built-in
//! defaults). Reads walk the stack top-down; writes only ever reach the
//! override node.

use std::path::Path;
use std::sync::Arc;

use smallvec::SmallVec;

use super::{ConfigError, ConfigKey, Identifier, Node, Value, file};

/// A read-only configuration layer.
///
/// There is intentionally no way to get a mutable reference to the root.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layer {
    root: Node,
}

impl Layer {
    pub fn new(root: Node) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }
}

impl From<Node> for Layer {
    fn from(root: Node) -> Self {
        Self::new(root)
    }
}

/// Writable override over read-only fallbacks.
#[derive(Debug, Clone, Default)]
pub struct OverlayConfig {
    override_layer: Node,
    fallbacks: Vec<Arc<Layer>>,
}

impl OverlayConfig {
    pub fn new(override_layer: Node, fallbacks: Vec<Arc<Layer>>) -> Self {
        Self {
            override_layer,
            fallbacks,
        }
    }

    /// Read view over the roots of all layers.
    pub fn view(&self) -> NodeView<'_> {
        let mut layers = SmallVec::with_capacity(self.fallbacks.len() + 1);
        layers.push(Some(&self.override_layer));
        layers.extend(self.fallbacks.iter().map(|layer| Some(layer.root())));
        NodeView { layers }
    }

    pub fn resolve(&self, key: ConfigKey, skip_first_layer: bool) -> Option<&Value> {
        self.view().resolve(key, skip_first_layer)
    }

    pub fn resolve_identifier(&self, key: ConfigKey) -> Option<&str> {
        self.view().resolve_identifier(key)
    }

    pub fn identifier(&self, key: ConfigKey) -> Identifier {
        self.view().identifier(key)
    }

    /// Read view of the nested node at `key`, if any layer has one.
    pub fn node(&self, key: ConfigKey) -> Option<NodeView<'_>> {
        self.view().node(key)
    }

    /// Nested node at `key` in the override layer.
    ///
    /// With `create`, an absent node is materialized in the override layer;
    /// fallback layers are never touched.
    pub fn node_mut(&mut self, key: ConfigKey, create: bool) -> Option<&mut Node> {
        self.override_layer.child_mut(key, create)
    }

    pub fn node_mut_path(&mut self, path: &[ConfigKey], create: bool) -> Option<&mut Node> {
        self.override_layer.descend_mut(path, create)
    }

    pub fn set(&mut self, key: ConfigKey, value: impl Into<Value>) {
        self.override_layer.set(key, value);
    }

    /// Store `identifier` in the nested node at `path`, creating it as needed.
    ///
    /// Does nothing if a scalar sits somewhere on `path`.
    pub fn set_identifier(&mut self, path: &[ConfigKey], identifier: &Identifier) {
        if let Some(node) = self.override_layer.descend_mut(path, true) {
            node.set(ConfigKey::Identifier, identifier);
        }
    }

    /// Remove `key` from the override layer, exposing the fallbacks again.
    pub fn remove(&mut self, key: ConfigKey) -> Option<Value> {
        self.override_layer.remove(key)
    }

    pub fn override_layer(&self) -> &Node {
        &self.override_layer
    }

    pub fn fallbacks(&self) -> &[Arc<Layer>] {
        &self.fallbacks
    }

    /// Persist the override layer. Fallback layers are never written.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        file::save(path, &self.override_layer)
    }
}

/// The same position in every layer of an [`OverlayConfig`].
///
/// Layer 0 is always the override layer. A layer without a node at this
/// position is kept as `None` so that skipping the first layer stays accurate.
#[derive(Debug, Clone)]
pub struct NodeView<'a> {
    layers: SmallVec<[Option<&'a Node>; 4]>,
}

impl<'a> NodeView<'a> {
    fn present(&self, skip_first_layer: bool) -> impl Iterator<Item = &'a Node> + '_ {
        let skip = usize::from(skip_first_layer);
        self.layers.iter().skip(skip).filter_map(|layer| *layer)
    }

    /// First value stored under `key`, top-down.
    ///
    /// The topmost layer holding `key` decides: if it holds a nested node the
    /// result is `None`, since nodes are not scalars.
    pub fn resolve(&self, key: ConfigKey, skip_first_layer: bool) -> Option<&'a Value> {
        self.present(skip_first_layer)
            .find_map(|node| node.get(key))
            .filter(|value| value.is_scalar())
    }

    /// Identifier stored under `key`, with sentinels applied.
    ///
    /// `auto` and `default` defer to the next layer, `none` stops the scan
    /// with no identifier.
    pub fn resolve_identifier(&self, key: ConfigKey) -> Option<&'a str> {
        for node in self.present(false) {
            let Some(value) = node.get(key) else {
                continue;
            };
            let Some(s) = value.as_str() else {
                continue;
            };
            match Identifier::parse(s) {
                Identifier::Explicit(_) => return Some(s),
                Identifier::None => return None,
                Identifier::Auto | Identifier::Default => {}
            }
        }
        None
    }

    /// First non-`default` identifier, undecoded. `Default` if no layer sets one.
    pub fn identifier(&self, key: ConfigKey) -> Identifier {
        self.present(false)
            .filter_map(|node| node.get(key).and_then(Identifier::from_value))
            .find(|identifier| *identifier != Identifier::Default)
            .unwrap_or(Identifier::Default)
    }

    /// Descend into `key` in every layer. `None` if no layer has a node there.
    pub fn node(&self, key: ConfigKey) -> Option<NodeView<'a>> {
        self.node_raw(key.as_str())
    }

    pub fn node_raw(&self, key: &str) -> Option<NodeView<'a>> {
        let layers: SmallVec<[Option<&'a Node>; 4]> = self
            .layers
            .iter()
            .map(|layer| layer.and_then(|node| node.child_raw(key)))
            .collect();
        layers.iter().any(Option::is_some).then_some(NodeView { layers })
    }

    pub fn string(&self, key: ConfigKey) -> Option<&'a str> {
        self.resolve(key, false).and_then(Value::as_str)
    }

    pub fn int(&self, key: ConfigKey) -> Option<i64> {
        self.resolve(key, false).and_then(Value::as_int)
    }

    /// Keys present in any layer, deduplicated, sorted.
    pub fn keys(&self) -> Vec<&'a str> {
        let mut keys: Vec<&'a str> = self
            .present(false)
            .flat_map(|node| node.iter().map(|(key, _)| key))
            .collect();
        keys.sort_unstable();
        keys.dedup();
        keys
    }

    /// Raw string stored under a dynamic key, top-down.
    pub fn string_raw(&self, key: &str) -> Option<&'a str> {
        self.present(false)
            .find_map(|node| node.get_raw(key))
            .and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer(json: &str) -> Arc<Layer> {
        Arc::new(Layer::new(serde_json::from_str(json).unwrap()))
    }

    fn overlay(top: &str, fallbacks: &[&str]) -> OverlayConfig {
        OverlayConfig::new(
            serde_json::from_str(top).unwrap(),
            fallbacks.iter().map(|json| layer(json)).collect(),
        )
    }

    #[test]
    fn first_layer_wins() {
        let config = overlay(r#"{"computer":"SX-64"}"#, &[r#"{"computer":"C64"}"#]);
        assert_eq!(
            config.resolve(ConfigKey::Computer, false).and_then(Value::as_str),
            Some("SX-64")
        );
        assert_eq!(
            config.resolve(ConfigKey::Computer, true).and_then(Value::as_str),
            Some("C64")
        );
    }

    #[test]
    fn falls_through_missing_keys() {
        let config = overlay("{}", &["{}", r#"{"computer":"C64"}"#]);
        assert_eq!(
            config.resolve(ConfigKey::Computer, false).and_then(Value::as_str),
            Some("C64")
        );
        assert!(config.resolve(ConfigKey::UserPort, false).is_none());
    }

    #[test]
    fn node_is_not_a_scalar() {
        let config = overlay(r#"{"computer":{"identifier":"C64"}}"#, &[r#"{"computer":"C64"}"#]);
        assert!(config.resolve(ConfigKey::Computer, false).is_none());
    }

    #[test]
    fn identifier_sentinels() {
        let config = overlay(
            r#"{"joystickPort1":{"identifier":"auto"},"joystickPort2":{"identifier":"none"}}"#,
            &[r#"{"joystickPort1":{"identifier":"Paddles"},"joystickPort2":{"identifier":"Paddles"}}"#],
        );
        let port1 = config.node(ConfigKey::JoystickPort1).unwrap();
        assert_eq!(port1.resolve_identifier(ConfigKey::Identifier), Some("Paddles"));
        assert_eq!(port1.identifier(ConfigKey::Identifier), Identifier::Auto);

        let port2 = config.node(ConfigKey::JoystickPort2).unwrap();
        assert_eq!(port2.resolve_identifier(ConfigKey::Identifier), None);
        assert_eq!(port2.identifier(ConfigKey::Identifier), Identifier::None);
    }

    #[test]
    fn default_sentinel_inherits() {
        let config = overlay(
            r#"{"computer":{"identifier":"default"}}"#,
            &[r#"{"computer":{"identifier":"C64C"}}"#],
        );
        let computer = config.node(ConfigKey::Computer).unwrap();
        assert_eq!(computer.resolve_identifier(ConfigKey::Identifier), Some("C64C"));
        assert_eq!(
            computer.identifier(ConfigKey::Identifier),
            Identifier::Explicit("C64C".to_string())
        );
    }

    #[test]
    fn node_view_tracks_absent_override() {
        let config = overlay("{}", &[r#"{"computer":{"identifier":"C64"}}"#]);
        let computer = config.node(ConfigKey::Computer).unwrap();
        assert_eq!(
            computer
                .resolve(ConfigKey::Identifier, true)
                .and_then(Value::as_str),
            Some("C64")
        );
        assert!(config.node(ConfigKey::UserPort).is_none());
    }

    #[test]
    fn node_mut_creates_only_in_override() {
        let global = layer(r#"{"computer":{"identifier":"C64"}}"#);
        let mut config = OverlayConfig::new(Node::new(), vec![global.clone()]);

        config
            .node_mut(ConfigKey::Computer, true)
            .unwrap()
            .set(ConfigKey::Identifier, "VIC-20");

        assert_eq!(
            config
                .node(ConfigKey::Computer)
                .and_then(|n| n.resolve_identifier(ConfigKey::Identifier)),
            Some("VIC-20")
        );
        assert_eq!(
            global
                .root()
                .child(ConfigKey::Computer)
                .and_then(|n| n.string(ConfigKey::Identifier)),
            Some("C64")
        );
        assert!(config.node_mut(ConfigKey::UserPort, false).is_none());
    }

    #[test]
    fn remove_reveals_fallback() {
        let mut config = overlay(r#"{"computer":"SX-64"}"#, &[r#"{"computer":"C64"}"#]);
        config.remove(ConfigKey::Computer);
        assert_eq!(config.view().string(ConfigKey::Computer), Some("C64"));
    }

    #[test]
    fn save_writes_only_override_layer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("title.json");
        let mut config = overlay("{}", &[r#"{"computer":{"identifier":"C64"}}"#]);
        config.set_identifier(
            &[ConfigKey::ExpansionPort],
            &Identifier::Explicit("EasyFlash".to_string()),
        );
        config.save(&path).unwrap();

        let saved = file::load(&path).unwrap();
        assert!(saved.child(ConfigKey::Computer).is_none());
        assert_eq!(
            saved
                .child(ConfigKey::ExpansionPort)
                .and_then(|n| n.string(ConfigKey::Identifier)),
            Some("EasyFlash")
        );
    }
}
