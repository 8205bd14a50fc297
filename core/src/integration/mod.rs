//! Integration tests for joyport core
//!
//! Tests the configuration stack on disk, the machine it describes and a
//! full session lifecycle with devices coming and going.


#[cfg(test)]
pub(crate) mod test_utils {
    use std::path::Path;
    use std::sync::Arc;

    use joyport_shared::Catalog;

    use crate::{
        config::{Layer, OverlayConfig, builtin_defaults, file},
        session::MachineSession,
        test_utils::SharedEmulator,
    };

    /// Write `json` to `dir/name` and return the path.
    pub fn write_config(dir: &Path, name: &str, json: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, json).unwrap();
        path
    }

    /// Title settings over global settings over built-in defaults, as loaded at startup.
    pub fn load_stack(title: &Path, global: &Path) -> OverlayConfig {
        OverlayConfig::new(
            file::load_or_default(title),
            vec![
                Arc::new(Layer::new(file::load_or_default(global))),
                Arc::new(builtin_defaults()),
            ],
        )
    }

    pub fn new_session(config: OverlayConfig) -> (MachineSession, SharedEmulator) {
        let emulator = SharedEmulator::default();
        let session = MachineSession::new(
            Arc::new(Catalog::builtin()),
            config,
            Box::new(emulator.clone()),
        );
        (session, emulator)
    }
}
