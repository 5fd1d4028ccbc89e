//! Run-scoped stats aggregate
//!
//! Weapon levels and passive upgrade levels, plus the numbers derived from
//! them. The upgrade system mutates this through [`Stats::apply_upgrade`];
//! the simulation only reads it. A fresh aggregate is built from the base
//! template merged with a [`CharacterProfile`] on every run reset.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::consts::BASE_MOVE_INTERVAL;

/// Weapon archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    /// Pulses damage to everything near the head
    Aura,
    /// Drones orbiting the head
    Swarm,
    /// Auto-turret firing at the nearest enemy
    Cannon,
    /// Piercing bolt
    Lance,
    /// Fan of pellets
    Scatter,
    /// Charge-up rail shot
    Rail,
    /// Proximity mines dropped at the tail
    Mines,
    /// Homing missiles
    Seeker,
    /// Gravity-lobbed shells that splash on impact
    Mortar,
    /// Expanding damage ring
    Nova,
}

impl WeaponKind {
    pub const COUNT: usize = 10;

    pub const ALL: [WeaponKind; Self::COUNT] = [
        WeaponKind::Aura,
        WeaponKind::Swarm,
        WeaponKind::Cannon,
        WeaponKind::Lance,
        WeaponKind::Scatter,
        WeaponKind::Rail,
        WeaponKind::Mines,
        WeaponKind::Seeker,
        WeaponKind::Mortar,
        WeaponKind::Nova,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WeaponKind::Aura => "Aura",
            WeaponKind::Swarm => "Swarm",
            WeaponKind::Cannon => "Cannon",
            WeaponKind::Lance => "Lance",
            WeaponKind::Scatter => "Scatter",
            WeaponKind::Rail => "Rail",
            WeaponKind::Mines => "Mines",
            WeaponKind::Seeker => "Seeker",
            WeaponKind::Mortar => "Mortar",
            WeaponKind::Nova => "Nova",
        }
    }
}

/// Derived numbers for one weapon at its current level
///
/// `radius`, `count`, `speed` and `special` mean different things per
/// archetype (see [`WeaponStats::derive`]).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WeaponStats {
    pub level: u32,
    pub damage: f32,
    /// Seconds between triggers
    pub interval: f32,
    pub radius: f32,
    pub count: u32,
    /// Cells per frame for projectiles, radians per second for the swarm
    pub speed: f32,
    pub special: f32,
}

impl WeaponStats {
    /// Recompute a weapon's numbers from its level (level 0 = not owned)
    pub fn derive(kind: WeaponKind, level: u32) -> Self {
        if level == 0 {
            return Self::default();
        }
        let l = (level - 1) as f32;
        let steps = level - 1;
        use WeaponKind::*;
        let (damage, interval, radius, count, speed, special) = match kind {
            Aura => (4.0 + 2.0 * l, (0.8 - 0.05 * l).max(0.4), 2.5 + 0.3 * l, 0, 0.0, 0.0),
            // interval doubles as the per-enemy hit debounce
            Swarm => (6.0 + 2.0 * l, 0.5, 2.0, 2 + steps, 3.0 + 0.3 * l, 0.0),
            Cannon => (8.0 + 3.0 * l, (1.0 - 0.08 * l).max(0.35), 0.0, 1 + steps / 3, 0.45, 0.0),
            Lance => (10.0 + 4.0 * l, (1.6 - 0.1 * l).max(0.6), 0.0, 1, 0.6, 0.0),
            // special: total fan spread in radians
            Scatter => (5.0 + 1.5 * l, (1.3 - 0.08 * l).max(0.5), 0.0, 3 + steps, 0.4, 0.5),
            // special: charge time before the shot leaves
            Rail => (30.0 + 10.0 * l, (3.0 - 0.2 * l).max(1.2), 0.0, 1, 1.2, 0.6),
            // radius: blast radius, special: trigger radius, count: max live mines
            Mines => (
                20.0 + 6.0 * l,
                (2.5 - 0.15 * l).max(1.0),
                2.5 + 0.25 * l,
                3 + level,
                0.0,
                1.2,
            ),
            Seeker => (7.0 + 2.0 * l, (1.4 - 0.1 * l).max(0.5), 0.0, 1 + steps / 2, 0.35, 0.0),
            // radius: splash radius
            Mortar => (14.0 + 4.0 * l, (2.2 - 0.12 * l).max(0.9), 2.0 + 0.2 * l, 1, 0.5, 0.0),
            // radius: max ring radius
            Nova => (8.0 + 3.0 * l, (3.5 - 0.2 * l).max(1.5), 6.0 + 0.5 * l, 1, 0.0, 0.0),
        };
        Self {
            level,
            damage,
            interval,
            radius,
            count,
            speed,
            special,
        }
    }

    #[inline]
    pub fn owned(&self) -> bool {
        self.level > 0
    }
}

/// Upgrades the external upgrade system can apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Upgrade {
    Weapon(WeaponKind),
    Crit,
    Chain,
    EchoCache,
    NeuralMagnet,
    Magnet,
    Reflect,
    Phase,
    SpeedBoost,
    Overclock,
    HackSpeed,
    Shield,
}

/// Optional overrides a playable character applies over the base template
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterProfile {
    pub name: String,
    /// Starting weapon levels (replaces the base loadout when non-empty)
    pub weapons: BTreeMap<WeaponKind, u32>,
    pub crit_chance: Option<f32>,
    pub crit_multiplier: Option<f32>,
    pub move_interval: Option<f32>,
    pub shield_charges: Option<u32>,
    pub chain_level: Option<u32>,
    pub echo_level: Option<u32>,
    pub reflect_level: Option<u32>,
    pub phase_level: Option<u32>,
    pub hack_speed: Option<f32>,
}

impl CharacterProfile {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Run-scoped stats aggregate
#[derive(Debug, Clone, PartialEq)]
pub struct Stats {
    weapons: [WeaponStats; WeaponKind::COUNT],
    pub crit_chance: f32,
    pub crit_multiplier: f32,
    pub chain_level: u32,
    pub echo_level: u32,
    pub neural_magnet_level: u32,
    pub magnet_level: u32,
    pub reflect_level: u32,
    pub phase_level: u32,
    pub speed_boost_level: u32,
    pub overclock_level: u32,
    /// Terminal hack rate multiplier
    pub hack_speed: f32,
    /// Seconds per grid step before boosts
    pub move_interval: f32,
    /// Shield charges granted at run start
    pub shield_charges: u32,
}

impl Default for Stats {
    fn default() -> Self {
        Self::base()
    }
}

impl Stats {
    /// The base template every run starts from
    pub fn base() -> Self {
        let mut stats = Self {
            weapons: [WeaponStats::default(); WeaponKind::COUNT],
            crit_chance: 0.05,
            crit_multiplier: 2.0,
            chain_level: 0,
            echo_level: 0,
            neural_magnet_level: 0,
            magnet_level: 0,
            reflect_level: 0,
            phase_level: 0,
            speed_boost_level: 1,
            overclock_level: 0,
            hack_speed: 1.0,
            move_interval: BASE_MOVE_INTERVAL,
            shield_charges: 0,
        };
        stats.set_weapon_level(WeaponKind::Cannon, 1);
        stats
    }

    /// Base template merged with a character's overrides
    pub fn from_profile(profile: &CharacterProfile) -> Self {
        let mut stats = Self::base();
        if !profile.weapons.is_empty() {
            for kind in WeaponKind::ALL {
                let level = profile.weapons.get(&kind).copied().unwrap_or(0);
                stats.set_weapon_level(kind, level);
            }
        }
        if let Some(v) = profile.crit_chance {
            stats.crit_chance = v.clamp(0.0, 1.0);
        }
        if let Some(v) = profile.crit_multiplier {
            stats.crit_multiplier = v.max(1.0);
        }
        if let Some(v) = profile.move_interval {
            // A zero interval would step every tick forever
            stats.move_interval = v.max(0.02);
        }
        if let Some(v) = profile.shield_charges {
            stats.shield_charges = v;
        }
        if let Some(v) = profile.chain_level {
            stats.chain_level = v;
        }
        if let Some(v) = profile.echo_level {
            stats.echo_level = v;
        }
        if let Some(v) = profile.reflect_level {
            stats.reflect_level = v;
        }
        if let Some(v) = profile.phase_level {
            stats.phase_level = v;
        }
        if let Some(v) = profile.hack_speed {
            stats.hack_speed = v.max(0.0);
        }
        stats
    }

    #[inline]
    pub fn weapon(&self, kind: WeaponKind) -> &WeaponStats {
        &self.weapons[kind.index()]
    }

    pub fn set_weapon_level(&mut self, kind: WeaponKind, level: u32) {
        self.weapons[kind.index()] = WeaponStats::derive(kind, level);
    }

    /// Owned weapons in archetype order
    pub fn owned_weapons(&self) -> impl Iterator<Item = (WeaponKind, &WeaponStats)> {
        WeaponKind::ALL
            .into_iter()
            .map(|kind| (kind, &self.weapons[kind.index()]))
            .filter(|(_, w)| w.owned())
    }

    /// Apply one level of an upgrade and recompute what depends on it
    pub fn apply_upgrade(&mut self, upgrade: Upgrade) {
        match upgrade {
            Upgrade::Weapon(kind) => {
                let level = self.weapon(kind).level + 1;
                self.set_weapon_level(kind, level);
            }
            Upgrade::Crit => {
                self.crit_chance = (self.crit_chance + 0.05).min(0.75);
                self.crit_multiplier += 0.25;
            }
            Upgrade::Chain => self.chain_level += 1,
            Upgrade::EchoCache => self.echo_level += 1,
            Upgrade::NeuralMagnet => self.neural_magnet_level += 1,
            Upgrade::Magnet => self.magnet_level += 1,
            Upgrade::Reflect => self.reflect_level += 1,
            Upgrade::Phase => self.phase_level += 1,
            Upgrade::SpeedBoost => self.speed_boost_level += 1,
            Upgrade::Overclock => self.overclock_level += 1,
            Upgrade::HackSpeed => self.hack_speed += 0.25,
            Upgrade::Shield => self.shield_charges += 1,
        }
    }

    /// Fraction of the original hit a chained bounce deals
    pub fn chain_damage_ratio(&self) -> f32 {
        (0.4 + 0.1 * self.chain_level as f32).min(0.9)
    }

    /// Charge needed before the echo cache bursts
    pub fn echo_threshold(&self) -> f32 {
        (120.0 - 10.0 * self.echo_level as f32).max(60.0)
    }

    pub fn reflect_chance(&self) -> f32 {
        (0.1 * self.reflect_level as f32).min(0.5)
    }

    /// Bonus xp magnet radius
    pub fn magnet_bonus(&self) -> f32 {
        0.5 * self.magnet_level as f32
    }

    /// Move interval with an active speed boost
    pub fn boosted_move_interval(&self) -> f32 {
        let shrink = 1.0 - crate::consts::SPEED_BOOST_PER_LEVEL * self.speed_boost_level as f32;
        self.move_interval * shrink.max(0.4)
    }

    /// Overclock window length
    pub fn overclock_active(&self) -> f32 {
        3.0 + 0.5 * self.overclock_level as f32
    }

    /// Overclock recharge time
    pub fn overclock_cooldown(&self) -> f32 {
        (12.0 - self.overclock_level as f32).max(6.0)
    }
}
