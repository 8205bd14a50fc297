//! On-disk format migrations
//!
//! Each step upgrades a document by exactly one format version. Steps are pure
//! and never look at the version field themselves; [`migrate`] chains them
//! and stamps the final version.

use super::{ConfigError, ConfigKey, Node};

/// Format version written by this build.
pub const FORMAT_VERSION: i64 = 2;

type Step = fn(Node) -> Node;

/// `(from_version, step)`, ordered by version.
const STEPS: &[(i64, Step)] = &[(1, flat_to_nested)];

/// Version-1 flat keys and where their values live in version 2.
const FLAT_KEYS: &[(&str, &[ConfigKey])] = &[
    ("computer", &[ConfigKey::Computer, ConfigKey::Identifier]),
    ("diskDrive8", &[ConfigKey::DiskDrive8, ConfigKey::Identifier]),
    ("diskDrive9", &[ConfigKey::DiskDrive9, ConfigKey::Identifier]),
    ("diskDrive10", &[ConfigKey::DiskDrive10, ConfigKey::Identifier]),
    ("diskDrive11", &[ConfigKey::DiskDrive11, ConfigKey::Identifier]),
    ("cassetteDrive", &[ConfigKey::CassetteDrive, ConfigKey::Identifier]),
    ("controlPort1", &[ConfigKey::JoystickPort1, ConfigKey::Identifier]),
    ("controlPort2", &[ConfigKey::JoystickPort2, ConfigKey::Identifier]),
    ("userPort", &[ConfigKey::UserPort, ConfigKey::Identifier]),
    (
        "userPortJoystick1",
        &[
            ConfigKey::UserPort,
            ConfigKey::UserPortJoystick1,
            ConfigKey::Identifier,
        ],
    ),
    (
        "userPortJoystick2",
        &[
            ConfigKey::UserPort,
            ConfigKey::UserPortJoystick2,
            ConfigKey::Identifier,
        ],
    ),
    (
        "singularAdapterMode",
        &[ConfigKey::UserPort, ConfigKey::SingularAdapterMode],
    ),
    ("expansionPort", &[ConfigKey::ExpansionPort, ConfigKey::Identifier]),
];

/// Version a document claims. Documents without one predate versioning.
pub fn version_of(root: &Node) -> Result<i64, ConfigError> {
    match root.get(ConfigKey::FormatVersion) {
        None => Ok(1),
        Some(value) => value.as_int().ok_or(ConfigError::MalformedVersion),
    }
}

/// Bring `root` up to [`FORMAT_VERSION`].
///
/// A current document is returned unchanged.
///
/// # Errors
///
/// [`ConfigError::UnsupportedVersion`] if the document's version has no
/// migration path (older than 1 or newer than this build),
/// [`ConfigError::MalformedVersion`] if the version is not an integer.
pub fn migrate(root: Node) -> Result<Node, ConfigError> {
    let mut version = version_of(&root)?;
    if version == FORMAT_VERSION {
        return Ok(root);
    }
    if !(1..FORMAT_VERSION).contains(&version) {
        return Err(ConfigError::UnsupportedVersion(version));
    }

    let mut root = root;
    while version < FORMAT_VERSION {
        let Some((_, step)) = STEPS.iter().find(|(from, _)| *from == version) else {
            return Err(ConfigError::UnsupportedVersion(version));
        };
        root = step(root);
        version += 1;
        tracing::debug!("Migrated configuration to format version {}", version);
    }
    root.set(ConfigKey::FormatVersion, FORMAT_VERSION);
    Ok(root)
}

/// 1 -> 2: flat identifiers become nested nodes.
///
/// Keys missing from the table are dropped. Nested values under a flat key
/// are not valid version-1 data and are dropped as well.
fn flat_to_nested(old: Node) -> Node {
    let mut new = Node::new();
    for (old_key, path) in FLAT_KEYS {
        let Some(value) = old.get_raw(old_key).filter(|value| value.is_scalar()) else {
            continue;
        };
        let Some((leaf, parents)) = path.split_last() else {
            continue;
        };
        if let Some(node) = new.descend_mut(parents, true) {
            node.set(*leaf, value.clone());
        }
    }
    new
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Node {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn control_port_moves_into_joystick_port_node() {
        let migrated = migrate(parse(
            r#"{"formatVersion": 1, "controlPort1": "Competition Pro"}"#,
        ))
        .unwrap();

        assert_eq!(migrated.int(ConfigKey::FormatVersion), Some(2));
        assert_eq!(
            migrated
                .child(ConfigKey::JoystickPort1)
                .and_then(|n| n.string(ConfigKey::Identifier)),
            Some("Competition Pro")
        );
        assert!(migrated.get_raw("controlPort1").is_none());
    }

    #[test]
    fn user_port_keys_share_one_node() {
        let migrated = migrate(parse(
            r#"{"formatVersion": 1,
                "userPort": "Singular Crew",
                "singularAdapterMode": "oem",
                "userPortJoystick1": "Atari CX-40"}"#,
        ))
        .unwrap();

        let user_port = migrated.child(ConfigKey::UserPort).unwrap();
        assert_eq!(user_port.string(ConfigKey::Identifier), Some("Singular Crew"));
        assert_eq!(user_port.string(ConfigKey::SingularAdapterMode), Some("oem"));
        assert_eq!(
            user_port
                .child(ConfigKey::UserPortJoystick1)
                .and_then(|n| n.string(ConfigKey::Identifier)),
            Some("Atari CX-40")
        );
        assert!(user_port.child(ConfigKey::UserPortJoystick2).is_none());
    }

    #[test]
    fn unknown_flat_keys_are_dropped() {
        let migrated = migrate(parse(r#"{"formatVersion": 1, "borderMode": "wide"}"#)).unwrap();
        assert_eq!(migrated.len(), 1);
    }

    #[test]
    fn missing_version_means_version_one() {
        let migrated = migrate(parse(r#"{"computer": "SX-64"}"#)).unwrap();
        assert_eq!(
            migrated
                .child(ConfigKey::Computer)
                .and_then(|n| n.string(ConfigKey::Identifier)),
            Some("SX-64")
        );
    }

    #[test]
    fn current_version_is_identity() {
        let doc = parse(
            r#"{"formatVersion": 2, "joystickPort1": {"identifier": "Paddles"}, "extra": 3}"#,
        );
        assert_eq!(migrate(doc.clone()).unwrap(), doc);
    }

    #[test]
    fn non_integer_version_is_corrupt() {
        let doc = parse(r#"{"formatVersion": "two"}"#);
        assert!(matches!(migrate(doc), Err(ConfigError::MalformedVersion)));
    }

    #[test]
    fn unknown_versions_fail() {
        for version in [0, 3, 99] {
            let doc = parse(&format!(r#"{{"formatVersion": {}}}"#, version));
            assert!(matches!(
                migrate(doc),
                Err(ConfigError::UnsupportedVersion(v)) if v == version
            ));
        }
    }
}
