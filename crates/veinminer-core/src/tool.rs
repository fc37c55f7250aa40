use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Enchantment {
    SilkTouch,
    Fortune,
    Unbreaking,
}

/// Snapshot of the item in the breaking player's main hand.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolState {
    // None means an empty hand.
    #[serde(default)]
    pub item: Option<String>,
    #[serde(default)]
    pub enchantments: Vec<Enchantment>,
}

impl ToolState {
    pub fn empty_hand() -> Self {
        Self::default()
    }

    pub fn new(item: impl Into<String>) -> Self {
        Self {
            item: Some(item.into()),
            enchantments: Vec::new(),
        }
    }

    pub fn with(mut self, e: Enchantment) -> Self {
        if !self.enchantments.contains(&e) {
            self.enchantments.push(e);
        }
        self
    }

    #[inline]
    pub fn is_empty_hand(&self) -> bool {
        self.item.is_none()
    }

    #[inline]
    pub fn has(&self, e: Enchantment) -> bool {
        self.enchantments.contains(&e)
    }

    /// Silk touch yields the block itself and suppresses experience. An empty hand never has it.
    #[inline]
    pub fn has_silk_touch(&self) -> bool {
        !self.is_empty_hand() && self.has(Enchantment::SilkTouch)
    }
}
