//! Upgrade cards offered between waves

use rand::Rng;

use super::state::PlayerStats;
use crate::consts::CARDS_OFFERED;

/// A named, one-shot mutation of the player's stats
#[derive(Debug, Clone, Copy)]
pub struct Card {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub image: Option<&'static str>,
    pub apply: fn(&mut PlayerStats),
}

pub static CARD_POOL: [Card; 12] = [
    Card {
        id: "mana_discharge",
        name: "Mana Discharge",
        description: "Mana cost reduced by 25%.",
        image: Some("cards/vortex.jpeg"),
        apply: |s| s.mana_cost *= 0.75,
    },
    Card {
        id: "arcane_flow",
        name: "Arcane Flow",
        description: "Recharge speed +40%.",
        image: Some("cards/vortex.jpeg"),
        apply: |s| s.mana_charge_speed *= 1.4,
    },
    Card {
        id: "deep_reserves",
        name: "Deep Reserves",
        description: "Max Mana +60.",
        image: Some("cards/overflowing_chalice.jpeg"),
        apply: |s| s.max_mana += 60.0,
    },
    Card {
        id: "glass_wand",
        name: "Glass Wand",
        description: "Damage x2, but Max HP -1.",
        image: Some("cards/broken_wand.jpeg"),
        apply: |s| {
            s.damage *= 2.0;
            s.max_hp = s.max_hp.saturating_sub(1).max(1);
        },
    },
    Card {
        id: "stone_skin",
        name: "Stone Skin",
        description: "Max HP +1.",
        image: Some("cards/helmet.jpeg"),
        apply: |s| s.max_hp += 1,
    },
    Card {
        id: "haste",
        name: "Haste",
        description: "Move Speed +20%.",
        image: Some("cards/winged_boot.jpeg"),
        apply: |s| s.move_speed *= 1.2,
    },
    Card {
        id: "sniper",
        name: "Sniper",
        description: "Projectile Speed +40%, Range +.",
        image: Some("cards/sniper.jpeg"),
        apply: |s| s.projectile_speed *= 1.4,
    },
    Card {
        id: "giant_slayer",
        name: "Giant Slayer",
        description: "Projectile Size +60%.",
        image: Some("cards/skull_crusher.jpeg"),
        apply: |s| s.projectile_size *= 1.6,
    },
    Card {
        id: "overcharge",
        name: "Overcharge",
        description: "Damage +30%, Cost +10%.",
        image: Some("cards/lightning.jpeg"),
        apply: |s| {
            s.damage *= 1.3;
            s.mana_cost *= 1.1;
        },
    },
    Card {
        id: "blood_rite",
        name: "Blood Rite",
        description: "Vampirism: 15% chance to heal on kill.",
        image: Some("cards/vampirism.jpeg"),
        apply: |s| s.vampirism = (s.vampirism + 0.15).min(1.0),
    },
    Card {
        id: "soul_piercer",
        name: "Soul Piercer",
        description: "Projectiles pierce +1 enemy.",
        image: Some("cards/piercing.jpeg"),
        apply: |s| s.piercing += 1,
    },
    Card {
        id: "feather_weight",
        name: "Feather",
        description: "Jump +20%, Fall Slower.",
        image: Some("cards/winged_boot.jpeg"),
        // Only the jump impulse changes; gravity is shared by everything
        apply: |s| s.jump_force *= 1.1,
    },
];

/// Look up a card by id
pub fn card_by_id(id: &str) -> Option<&'static Card> {
    CARD_POOL.iter().find(|c| c.id == id)
}

/// Draw distinct pool indices uniformly without replacement
pub fn sample_cards<R: Rng + ?Sized>(rng: &mut R) -> Vec<usize> {
    rand::seq::index::sample(rng, CARD_POOL.len(), CARDS_OFFERED).into_vec()
}
