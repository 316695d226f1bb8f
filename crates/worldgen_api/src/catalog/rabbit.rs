//! Rabbit color morphs.
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

use tracing::info;

use crate::catalog::{CatalogRegistry, CatalogType};
use crate::error::{Error, Result};

#[derive(Debug)]
struct RabbitTypeData {
    id: String,
    name: String,
}

/// A rabbit color morph.
///
/// Handles are cheap to clone and compare by identity: two handles are equal
/// only if they come from the same [`RabbitType::new`] call, even when their
/// ids match.
#[derive(Clone, Debug)]
pub struct RabbitType(Arc<RabbitTypeData>);

impl RabbitType {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self(Arc::new(RabbitTypeData {
            id: id.into(),
            name: name.into(),
        }))
    }
}

impl CatalogType for RabbitType {
    fn id(&self) -> &str {
        &self.0.id
    }

    fn name(&self) -> &str {
        &self.0.name
    }
}

impl PartialEq for RabbitType {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for RabbitType {}

impl Hash for RabbitType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.0).hash(state);
    }
}

static INSTALLED: OnceLock<RabbitTypes> = OnceLock::new();

/// The known vanilla [`RabbitType`]s, bound from a registry.
#[derive(Clone, Debug)]
pub struct RabbitTypes {
    brown: RabbitType,
    white: RabbitType,
    black: RabbitType,
    black_and_white: RabbitType,
    gold: RabbitType,
    salt_and_pepper: RabbitType,
    killer: RabbitType,
}

impl RabbitTypes {
    pub const BROWN: &'static str = "minecraft:brown";
    pub const WHITE: &'static str = "minecraft:white";
    pub const BLACK: &'static str = "minecraft:black";
    pub const BLACK_AND_WHITE: &'static str = "minecraft:black_and_white";
    pub const GOLD: &'static str = "minecraft:gold";
    pub const SALT_AND_PEPPER: &'static str = "minecraft:salt_and_pepper";
    pub const KILLER: &'static str = "minecraft:killer";

    /// Every slot id with its display name, in declaration order.
    pub const VANILLA: [(&'static str, &'static str); 7] = [
        (Self::BROWN, "Brown"),
        (Self::WHITE, "White"),
        (Self::BLACK, "Black"),
        (Self::BLACK_AND_WHITE, "Black and White"),
        (Self::GOLD, "Gold"),
        (Self::SALT_AND_PEPPER, "Salt and Pepper"),
        (Self::KILLER, "Killer"),
    ];

    /// Registers a fresh value for every vanilla slot.
    ///
    /// This is the registration a host performs when it has no custom rabbit
    /// types of its own.
    pub fn register_vanilla(registry: &mut CatalogRegistry<RabbitType>) -> Result<()> {
        for (id, name) in Self::VANILLA {
            registry.register(RabbitType::new(id, name))?;
        }
        Ok(())
    }

    /// Binds every slot from `registry`.
    ///
    /// The registry must be frozen. Fails on the first missing id.
    pub fn resolve(registry: &CatalogRegistry<RabbitType>) -> Result<Self> {
        if !registry.is_frozen() {
            return Err(Error::InvalidConfig(format!(
                "{} registry must be frozen before rabbit types are resolved",
                registry.label()
            )));
        }
        Ok(Self {
            brown: registry.require(Self::BROWN)?,
            white: registry.require(Self::WHITE)?,
            black: registry.require(Self::BLACK)?,
            black_and_white: registry.require(Self::BLACK_AND_WHITE)?,
            gold: registry.require(Self::GOLD)?,
            salt_and_pepper: registry.require(Self::SALT_AND_PEPPER)?,
            killer: registry.require(Self::KILLER)?,
        })
    }

    /// Makes `types` the process-wide binding returned by [`RabbitTypes::get`].
    ///
    /// Only the first call succeeds; the binding never changes afterwards.
    pub fn install(types: RabbitTypes) -> Result<&'static RabbitTypes> {
        let mut fresh = false;
        let installed = INSTALLED.get_or_init(|| {
            fresh = true;
            types
        });
        if !fresh {
            return Err(Error::InvalidConfig(
                "rabbit types are already installed".into(),
            ));
        }
        info!("Installed {} rabbit types.", installed.all().len());
        Ok(installed)
    }

    /// The process-wide binding.
    pub fn get() -> Result<&'static RabbitTypes> {
        INSTALLED.get().ok_or(Error::NotInitialized("RabbitTypes"))
    }

    pub fn brown(&self) -> &RabbitType {
        &self.brown
    }

    pub fn white(&self) -> &RabbitType {
        &self.white
    }

    pub fn black(&self) -> &RabbitType {
        &self.black
    }

    pub fn black_and_white(&self) -> &RabbitType {
        &self.black_and_white
    }

    pub fn gold(&self) -> &RabbitType {
        &self.gold
    }

    pub fn salt_and_pepper(&self) -> &RabbitType {
        &self.salt_and_pepper
    }

    pub fn killer(&self) -> &RabbitType {
        &self.killer
    }

    /// Every bound value, in declaration order.
    pub fn all(&self) -> [&RabbitType; 7] {
        [
            &self.brown,
            &self.white,
            &self.black,
            &self.black_and_white,
            &self.gold,
            &self.salt_and_pepper,
            &self.killer,
        ]
    }
}
