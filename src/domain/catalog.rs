//! Static flower and wrapper reference data.

use super::errors::{DomainError, DomainResult};
use super::models::{Flower, FlowerId};

const FLOWERS_JSON: &str = include_str!("flowers.json");

/// A decorative wrap the bouquet can be bundled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wrapper {
    pub id: &'static str,
    pub name: &'static str,
}

pub const WRAPPERS: [Wrapper; 3] = [
    Wrapper { id: "wrapper-1", name: "Classic" },
    Wrapper { id: "wrapper-2", name: "Elegant" },
    Wrapper { id: "wrapper-3", name: "Natural" },
];

/// Read-only list of the flowers a bouquet can be made from.
///
/// # Examples
///
/// ```
/// use bloomy::domain::FlowerCatalog;
///
/// let catalog = FlowerCatalog::builtin();
/// let rose = catalog.get(6).unwrap();
/// assert_eq!(rose.name, "rose");
/// assert!(catalog.get(999).is_none());
/// ```
#[derive(Debug, Clone)]
pub struct FlowerCatalog {
    flowers: Vec<Flower>,
}

impl FlowerCatalog {
    /// Parses a catalog from its JSON form. Ids must be unique.
    pub fn from_json(json: &str) -> DomainResult<Self> {
        let flowers: Vec<Flower> =
            serde_json::from_str(json).map_err(|e| DomainError::InvalidCatalog(e.to_string()))?;
        for (index, flower) in flowers.iter().enumerate() {
            if flowers[..index].iter().any(|other| other.id == flower.id) {
                return Err(DomainError::InvalidCatalog(format!(
                    "duplicate flower id {}",
                    flower.id
                )));
            }
        }
        Ok(Self { flowers })
    }

    /// The catalog compiled into the binary.
    pub fn builtin() -> Self {
        // flowers.json is checked by test_builtin_catalog_parses
        Self::from_json(FLOWERS_JSON).unwrap_or_else(|_| Self { flowers: Vec::new() })
    }

    pub fn get(&self, id: FlowerId) -> Option<&Flower> {
        self.flowers.iter().find(|flower| flower.id == id)
    }

    pub fn flowers(&self) -> &[Flower] {
        &self.flowers
    }

    pub fn len(&self) -> usize {
        self.flowers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flowers.is_empty()
    }
}

impl Default for FlowerCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

pub fn wrapper(id: &str) -> Option<&'static Wrapper> {
    WRAPPERS.iter().find(|wrapper| wrapper.id == id)
}
