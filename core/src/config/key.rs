//! Configuration keys

/// Keys understood by the configuration store.
///
/// On disk every key is stored under its camelCase name (see [`ConfigKey::as_str`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConfigKey {
    FormatVersion,
    Identifier,
    Computer,
    DiskDrive8,
    DiskDrive9,
    DiskDrive10,
    DiskDrive11,
    CassetteDrive,
    JoystickPort1,
    JoystickPort2,
    UserPort,
    UserPortJoystick1,
    UserPortJoystick2,
    SingularAdapterMode,
    ExpansionPort,
    InputMapping,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 16] = [
        ConfigKey::FormatVersion,
        ConfigKey::Identifier,
        ConfigKey::Computer,
        ConfigKey::DiskDrive8,
        ConfigKey::DiskDrive9,
        ConfigKey::DiskDrive10,
        ConfigKey::DiskDrive11,
        ConfigKey::CassetteDrive,
        ConfigKey::JoystickPort1,
        ConfigKey::JoystickPort2,
        ConfigKey::UserPort,
        ConfigKey::UserPortJoystick1,
        ConfigKey::UserPortJoystick2,
        ConfigKey::SingularAdapterMode,
        ConfigKey::ExpansionPort,
        ConfigKey::InputMapping,
    ];

    /// Disk drive slots in bus order.
    pub const DISK_DRIVES: [ConfigKey; 4] = [
        ConfigKey::DiskDrive8,
        ConfigKey::DiskDrive9,
        ConfigKey::DiskDrive10,
        ConfigKey::DiskDrive11,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ConfigKey::FormatVersion => "formatVersion",
            ConfigKey::Identifier => "identifier",
            ConfigKey::Computer => "computer",
            ConfigKey::DiskDrive8 => "diskDrive8",
            ConfigKey::DiskDrive9 => "diskDrive9",
            ConfigKey::DiskDrive10 => "diskDrive10",
            ConfigKey::DiskDrive11 => "diskDrive11",
            ConfigKey::CassetteDrive => "cassetteDrive",
            ConfigKey::JoystickPort1 => "joystickPort1",
            ConfigKey::JoystickPort2 => "joystickPort2",
            ConfigKey::UserPort => "userPort",
            ConfigKey::UserPortJoystick1 => "userPortJoystick1",
            ConfigKey::UserPortJoystick2 => "userPortJoystick2",
            ConfigKey::SingularAdapterMode => "singularAdapterMode",
            ConfigKey::ExpansionPort => "expansionPort",
            ConfigKey::InputMapping => "inputMapping",
        }
    }

    pub fn from_name(name: &str) -> Option<ConfigKey> {
        ConfigKey::ALL.into_iter().find(|key| key.as_str() == name)
    }
}

impl std::fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::ConfigKey;

    #[test]
    fn names_roundtrip() {
        for key in ConfigKey::ALL {
            assert_eq!(ConfigKey::from_name(key.as_str()), Some(key));
        }
        assert_eq!(ConfigKey::from_name("controlPort1"), None);
    }
}
