use serde::Deserialize;
use std::collections::HashMap;

// Top-level materials config file
#[derive(Deserialize, Debug, Default)]
pub struct MaterialsConfig {
    // Cap on blocks gathered per vein, seed included.
    #[serde(default)]
    pub max_vein_size: Option<usize>,
    // Plain, non-ore substances.
    #[serde(default)]
    pub materials: Vec<String>,
    // Vein-eligible substances keyed by name.
    #[serde(default)]
    pub ores: HashMap<String, OreDef>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct OreDef {
    // Experience credited per block; absent means none.
    #[serde(default)]
    pub xp: Option<XpSpec>,
    // Item produced by a normal break; defaults to the ore itself.
    #[serde(default)]
    pub drop: Option<String>,
}

// Experience accepts either a constant (`xp = 3`) or a range (`xp = [1, 5]`)
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(untagged)]
pub enum XpSpec {
    Fixed(u32),
    Range([u32; 2]),
}
