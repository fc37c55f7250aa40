use std::collections::{BTreeSet, HashMap};
use std::error::Error;
use std::fs;
use std::path::Path;

use super::config::{MaterialsConfig, XpSpec};
use super::types::{MaterialId, XpRange};

pub const DEFAULT_MAX_VEIN_SIZE: usize = 64;

const BUILTIN_MATERIALS: &str = include_str!("default_materials.toml");

#[derive(Clone, Debug)]
pub struct Material {
    pub id: MaterialId,
    pub key: String,
    pub ore: Option<OreInfo>,
}

/// Per-ore rules consulted when a vein is mined.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OreInfo {
    pub xp: Option<XpRange>,
    pub drop: MaterialId,
}

#[derive(Clone, Debug)]
pub struct MaterialCatalog {
    pub materials: Vec<Material>,
    pub by_key: HashMap<String, MaterialId>,
    pub max_vein_size: usize,
}

impl Default for MaterialCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl MaterialCatalog {
    /// Catalog holding only air.
    pub fn new() -> Self {
        Self {
            materials: vec![Material {
                id: MaterialId::AIR,
                key: "air".into(),
                ore: None,
            }],
            by_key: HashMap::from([("air".to_string(), MaterialId::AIR)]),
            max_vein_size: DEFAULT_MAX_VEIN_SIZE,
        }
    }

    /// The vanilla-like table: 18 ores including the deepslate and nether variants.
    pub fn builtin() -> Result<Self, Box<dyn Error>> {
        Self::from_toml_str(BUILTIN_MATERIALS)
    }

    pub fn get_id(&self, key: &str) -> Option<MaterialId> {
        self.by_key.get(key).copied()
    }

    pub fn get(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0 as usize)
    }

    /// Name for logs; unknown ids render as `?`.
    pub fn key(&self, id: MaterialId) -> &str {
        self.get(id).map(|m| m.key.as_str()).unwrap_or("?")
    }

    #[inline]
    pub fn is_ore(&self, id: MaterialId) -> bool {
        self.get(id).is_some_and(|m| m.ore.is_some())
    }

    pub fn experience_range_for(&self, id: MaterialId) -> Option<XpRange> {
        self.get(id).and_then(|m| m.ore).and_then(|o| o.xp)
    }

    /// What a normal break of `id` yields; non-ores drop themselves.
    pub fn drop_for(&self, id: MaterialId) -> MaterialId {
        self.get(id)
            .and_then(|m| m.ore)
            .map(|o| o.drop)
            .unwrap_or(id)
    }

    pub fn ores(&self) -> impl Iterator<Item = &Material> {
        self.materials.iter().filter(|m| m.ore.is_some())
    }

    pub fn from_config(cfg: MaterialsConfig) -> Result<Self, Box<dyn Error>> {
        let max_vein_size = cfg.max_vein_size.unwrap_or(DEFAULT_MAX_VEIN_SIZE);
        if max_vein_size == 0 {
            return Err("max_vein_size must be at least 1".into());
        }
        // Every name mentioned anywhere gets an id; sorted so ids are stable across loads.
        let mut names: BTreeSet<&str> = cfg.materials.iter().map(String::as_str).collect();
        for (key, def) in &cfg.ores {
            names.insert(key.as_str());
            if let Some(d) = &def.drop {
                names.insert(d.as_str());
            }
        }
        names.remove("air");

        let mut catalog = MaterialCatalog::new();
        catalog.max_vein_size = max_vein_size;
        for key in names {
            if catalog.materials.len() > u16::MAX as usize {
                return Err("too many materials".into());
            }
            let id = MaterialId(catalog.materials.len() as u16);
            catalog.by_key.insert(key.to_string(), id);
            catalog.materials.push(Material {
                id,
                key: key.to_string(),
                ore: None,
            });
        }

        for (key, def) in &cfg.ores {
            if key == "air" {
                return Err("air cannot be an ore".into());
            }
            let xp = match def.xp {
                None => None,
                Some(XpSpec::Fixed(v)) => Some(XpRange::constant(v)),
                Some(XpSpec::Range([min, max])) => Some(
                    XpRange::new(min, max)
                        .ok_or_else(|| format!("ore {key}: xp range [{min}, {max}] is inverted"))?,
                ),
            };
            let id = catalog.by_key[key.as_str()];
            let drop = match &def.drop {
                Some(d) => catalog.by_key[d.as_str()],
                None => id,
            };
            catalog.materials[id.0 as usize].ore = Some(OreInfo { xp, drop });
        }
        Ok(catalog)
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: MaterialsConfig = toml::from_str(toml_str)?;
        Self::from_config(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }
}
