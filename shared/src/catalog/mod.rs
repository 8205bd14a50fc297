//! Catalog of selectable hardware.
//!
//! A [`Catalog`] is built once at startup and shared by reference. Each
//! category keeps its parts in declaration order plus an identifier index,
//! so lookups from configuration identifiers are O(1).

mod builtin;
mod parts;

pub use parts::{
    AdapterMode, CassetteDrive, Cartridge, Computer, Controller, DiskDrive, MachinePart, PartInfo,
    PRIORITY_DEFAULT, PRIORITY_HIGH, UserPortModule,
};

use std::collections::HashMap;

use crate::connector::{ConnectorKind, is_compatible};

/// Parts of one kind, indexed by identifier.
#[derive(Debug, Clone)]
pub struct Category<T> {
    parts: Vec<T>,
    index: HashMap<String, usize>,
}

impl<T: MachinePart> Category<T> {
    /// Build a category. When identifiers repeat, the first part wins.
    pub fn new(parts: Vec<T>) -> Self {
        let mut index = HashMap::with_capacity(parts.len());
        for (i, part) in parts.iter().enumerate() {
            index.entry(part.identifier().to_string()).or_insert(i);
        }
        Self { parts, index }
    }

    pub fn get(&self, identifier: &str) -> Option<&T> {
        self.index.get(identifier).map(|&i| &self.parts[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.parts.iter()
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Parts that fit a port accepting `accepted`.
    pub fn compatible_with<'a>(
        &'a self,
        accepted: &'a [ConnectorKind],
    ) -> impl Iterator<Item = &'a T> + 'a {
        self.parts
            .iter()
            .filter(move |part| is_compatible(part.connector(), accepted))
    }

    /// The part automatic selection picks: highest priority, then name ascending.
    pub fn best<'a>(&'a self, accepted: &'a [ConnectorKind]) -> Option<&'a T> {
        self.compatible_with(accepted).min_by(|a, b| {
            b.priority()
                .cmp(&a.priority())
                .then_with(|| a.name().cmp(b.name()))
        })
    }
}

/// All hardware known to the application.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub computers: Category<Computer>,
    pub disk_drives: Category<DiskDrive>,
    pub cassette_drives: Category<CassetteDrive>,
    pub controllers: Category<Controller>,
    pub user_port_modules: Category<UserPortModule>,
    pub cartridges: Category<Cartridge>,
}

impl Catalog {
    /// The catalog of Commodore hardware shipped with the application.
    pub fn builtin() -> Self {
        Self {
            computers: Category::new(builtin::computers()),
            disk_drives: Category::new(builtin::disk_drives()),
            cassette_drives: Category::new(builtin::cassette_drives()),
            controllers: Category::new(builtin::controllers()),
            user_port_modules: Category::new(builtin::user_port_modules()),
            cartridges: Category::new(builtin::cartridges()),
        }
    }

    /// Controllers that can be plugged into a port accepting `accepted`.
    pub fn controllers_for<'a>(
        &'a self,
        accepted: &'a [ConnectorKind],
    ) -> impl Iterator<Item = &'a Controller> + 'a {
        self.controllers.compatible_with(accepted)
    }

    /// Computer used when the configuration names none.
    pub fn default_computer(&self) -> Option<&Computer> {
        self.computers.best(&[ConnectorKind::None])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::CapabilityKind;

    #[test]
    fn lookup_by_identifier() {
        let catalog = Catalog::builtin();
        let stick = catalog.controllers.get("Competition Pro").unwrap();
        assert_eq!(stick.capability, CapabilityKind::Joystick);
        assert!(catalog.controllers.get("Nonexistent").is_none());
    }

    #[test]
    fn first_duplicate_wins() {
        let parts = vec![
            Cartridge {
                info: PartInfo::new("x", "First", ConnectorKind::ExpansionPort, 0),
            },
            Cartridge {
                info: PartInfo::new("x", "Second", ConnectorKind::ExpansionPort, 0),
            },
        ];
        let category = Category::new(parts);
        assert_eq!(category.get("x").unwrap().name(), "First");
        assert_eq!(category.len(), 2);
    }

    #[test]
    fn controllers_for_control_port_excludes_user_port_modules() {
        let catalog = Catalog::builtin();
        let accepts = [ConnectorKind::ControlPort];
        assert!(
            catalog
                .controllers_for(&accepts)
                .all(|c| c.connector() == ConnectorKind::ControlPort)
        );
        assert!(catalog.controllers_for(&accepts).count() > 3);
        assert_eq!(
            catalog
                .controllers_for(&[ConnectorKind::UserPort])
                .count(),
            0
        );
    }

    #[test]
    fn best_prefers_priority_then_name() {
        let parts = vec![
            Cartridge {
                info: PartInfo::new("b", "Bbb", ConnectorKind::ExpansionPort, 10),
            },
            Cartridge {
                info: PartInfo::new("a", "Aaa", ConnectorKind::ExpansionPort, 10),
            },
            Cartridge {
                info: PartInfo::new("c", "Ccc", ConnectorKind::ExpansionPort, 5),
            },
        ];
        let category = Category::new(parts);
        let best = category.best(&[ConnectorKind::ExpansionPort]).unwrap();
        assert_eq!(best.identifier(), "a");
    }

    #[test]
    fn default_computer_is_c64() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.default_computer().unwrap().identifier(), "C64");
    }
}
