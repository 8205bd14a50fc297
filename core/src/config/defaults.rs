//! Built-in defaults, the bottom layer of every configuration stack

use super::migration::FORMAT_VERSION;
use super::{ConfigKey, Identifier, Layer, Node};

/// Defaults used when neither the title nor the global configuration says otherwise.
pub fn builtin_defaults() -> Layer {
    let mut root = Node::new();
    root.set(ConfigKey::FormatVersion, FORMAT_VERSION);

    let slots = [
        (ConfigKey::Computer, Identifier::Auto),
        (ConfigKey::DiskDrive8, Identifier::Auto),
        (ConfigKey::DiskDrive9, Identifier::None),
        (ConfigKey::DiskDrive10, Identifier::None),
        (ConfigKey::DiskDrive11, Identifier::None),
        (ConfigKey::CassetteDrive, Identifier::None),
        (ConfigKey::JoystickPort1, Identifier::Auto),
        (ConfigKey::JoystickPort2, Identifier::Auto),
        (ConfigKey::UserPort, Identifier::None),
        (ConfigKey::ExpansionPort, Identifier::None),
    ];
    for (key, identifier) in slots {
        if let Some(node) = root.child_mut(key, true) {
            node.set(ConfigKey::Identifier, identifier);
        }
    }

    if let Some(user_port) = root.child_mut(ConfigKey::UserPort, false) {
        for key in [ConfigKey::UserPortJoystick1, ConfigKey::UserPortJoystick2] {
            if let Some(node) = user_port.child_mut(key, true) {
                node.set(ConfigKey::Identifier, Identifier::Auto);
            }
        }
    }

    Layer::new(root)
}
