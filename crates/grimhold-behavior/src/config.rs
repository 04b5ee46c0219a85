//! Behavior configuration.
//!
//! One record per species instead of one implementation per species. The
//! whole table loads from TOML; values that make no sense are clamped by
//! [`BehaviorConfig::validate`] rather than rejected, except non-finite
//! numbers, which are refused outright.

use grimhold_common::{CommonError, CommonResult, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tracing::{info, warn};

use crate::death::MAX_REMOVAL_DELAY;
use crate::error::{BehaviorError, BehaviorResult};
use crate::hooks::{HooksConfig, SummonWindowSettings, WalkPauseSettings};
use crate::knockback::KnockbackParams;
use crate::sequencer::AttackTiming;

// ============================================================================
// Projectile Profile
// ============================================================================

/// How a projectile deals damage on its primary hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HitMode {
    /// One immediate tick, then destroy.
    #[default]
    DestroyOnContact,
    /// Stop travelling and tick at each offset (seconds after contact).
    MultiHit {
        /// Tick offsets; sorted and clamped at load
        offsets: Vec<f32>,
    },
}

/// Transient effect spawned when a projectile is destroyed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectProfile {
    /// Effect prefab name
    pub prefab: String,
    /// Offset used when travelling left
    pub left_offset: Vec2,
    /// Offset used when travelling right
    pub right_offset: Vec2,
}

impl Default for EffectProfile {
    fn default() -> Self {
        Self {
            prefab: "impact".to_string(),
            left_offset: Vec2::ZERO,
            right_offset: Vec2::ZERO,
        }
    }
}

/// Tuning of a fired projectile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileProfile {
    /// Travel speed (units/second)
    pub speed: f32,
    /// Seconds before natural expiry
    pub lifetime: f32,
    /// Damage per tick
    pub damage: f32,
    /// Primary hit behaviour
    pub hit_mode: HitMode,
    /// Terminate without effect if the owner dies first
    pub track_owner: bool,
    /// Max heading change (radians/second); zero snaps instantly
    pub turn_rate: f32,
    /// Projectile prefab name
    pub prefab: String,
    /// Spawn point relative to the owner, mirrored when facing left
    pub spawn_offset: Vec2,
    /// Effect spawned on destruction
    pub impact_effect: Option<EffectProfile>,
}

impl Default for ProjectileProfile {
    fn default() -> Self {
        Self {
            speed: 8.0,
            lifetime: 3.0,
            damage: 10.0,
            hit_mode: HitMode::DestroyOnContact,
            track_owner: false,
            turn_rate: 0.0,
            prefab: "projectile".to_string(),
            spawn_offset: Vec2::ZERO,
            impact_effect: None,
        }
    }
}

impl ProjectileProfile {
    /// Clamp every value into its legal range.
    pub fn validate(&mut self) {
        self.speed = self.speed.max(0.0);
        self.lifetime = self.lifetime.max(0.0);
        self.damage = self.damage.max(0.0);
        self.turn_rate = self.turn_rate.max(0.0);
        if let HitMode::MultiHit { offsets } = &mut self.hit_mode {
            for offset in offsets.iter_mut() {
                *offset = offset.max(0.0);
            }
            offsets.sort_by(f32::total_cmp);
        }
    }

    fn check_finite(&self, species: &str) -> CommonResult<()> {
        finite(species, "projectile.speed", self.speed)?;
        finite(species, "projectile.lifetime", self.lifetime)?;
        finite(species, "projectile.damage", self.damage)?;
        finite(species, "projectile.turn_rate", self.turn_rate)?;
        if let HitMode::MultiHit { offsets } = &self.hit_mode {
            for &offset in offsets {
                finite(species, "projectile.hit_mode.offsets", offset)?;
            }
        }
        Ok(())
    }
}

// ============================================================================
// Species Profile
// ============================================================================

/// Where melee damage is reported as landing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HitPoint {
    /// At the attacker's reference position.
    Attacker,
    /// At the target's reference position.
    #[default]
    Target,
}

/// How an attack instance reaches its target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Delivery {
    /// Damage applied directly to the target.
    #[default]
    Direct,
    /// Each instance fires a projectile.
    Projectile(ProjectileProfile),
}

/// Per-species configuration record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeciesProfile {
    /// Approach speed (units/second)
    pub move_speed: f32,
    /// Distance at which attacks start and land
    pub attack_range: f32,
    /// Distance at which approach stops
    pub stop_distance: f32,
    /// Windup before the first instance
    pub windup: f32,
    /// Total attack duration from start
    pub attack_duration: f32,
    /// Base cooldown
    pub cooldown: f32,
    /// Damage per direct instance
    pub damage: f32,
    /// Instances per attack
    pub instance_count: u32,
    /// Delay between instances
    pub instance_interval: f32,
    /// Reported impact point for direct hits
    pub hit_point: HitPoint,
    /// Knockback response
    pub knockback: KnockbackParams,
    /// Attack timers stop while the actor is frozen
    pub freezable: bool,
    /// Direct or projectile
    pub delivery: Delivery,
    /// Strategy hooks
    pub hooks: HooksConfig,
}

impl Default for SpeciesProfile {
    fn default() -> Self {
        Self {
            move_speed: 2.5,
            attack_range: 1.2,
            stop_distance: 1.0,
            windup: 0.3,
            attack_duration: 0.6,
            cooldown: 1.0,
            damage: 10.0,
            instance_count: 1,
            instance_interval: 0.0,
            hit_point: HitPoint::Target,
            knockback: KnockbackParams::default(),
            freezable: false,
            delivery: Delivery::Direct,
            hooks: HooksConfig::default(),
        }
    }
}

impl SpeciesProfile {
    /// Attack timing derived from the profile.
    #[must_use]
    pub fn timing(&self) -> AttackTiming {
        AttackTiming::new(self.attack_range, self.windup, self.attack_duration, self.cooldown)
            .with_instances(self.instance_count, self.instance_interval)
    }

    /// Projectile profile if the species fires projectiles.
    #[must_use]
    pub fn projectile(&self) -> Option<&ProjectileProfile> {
        match &self.delivery {
            Delivery::Projectile(profile) => Some(profile),
            Delivery::Direct => None,
        }
    }

    /// Clamp every value into its legal range.
    pub fn validate(&mut self) {
        self.move_speed = self.move_speed.max(0.0);
        self.attack_range = self.attack_range.max(0.0);
        self.stop_distance = self.stop_distance.max(0.0);
        self.windup = self.windup.max(0.0);
        self.attack_duration = self.attack_duration.max(0.0);
        self.cooldown = self.cooldown.max(0.0);
        self.damage = self.damage.max(0.0);
        self.instance_count = self.instance_count.max(1);
        self.instance_interval = self.instance_interval.max(0.0);
        self.knockback = KnockbackParams::new(self.knockback.intensity, self.knockback.duration);
        if let Delivery::Projectile(profile) = &mut self.delivery {
            profile.validate();
        }
    }

    fn check_finite(&self, species: &str) -> CommonResult<()> {
        finite(species, "move_speed", self.move_speed)?;
        finite(species, "attack_range", self.attack_range)?;
        finite(species, "stop_distance", self.stop_distance)?;
        finite(species, "windup", self.windup)?;
        finite(species, "attack_duration", self.attack_duration)?;
        finite(species, "cooldown", self.cooldown)?;
        finite(species, "damage", self.damage)?;
        finite(species, "instance_interval", self.instance_interval)?;
        finite(species, "knockback.intensity", self.knockback.intensity)?;
        finite(species, "knockback.duration", self.knockback.duration)?;
        match &self.delivery {
            Delivery::Projectile(profile) => profile.check_finite(species),
            Delivery::Direct => Ok(()),
        }
    }

    // === Presets ===

    /// Melee brawler.
    #[must_use]
    pub fn brawler() -> Self {
        Self {
            damage: 15.0,
            ..Self::default()
        }
    }

    /// Ranged archer firing destroy-on-contact arrows.
    #[must_use]
    pub fn archer() -> Self {
        Self {
            move_speed: 2.0,
            attack_range: 6.0,
            stop_distance: 5.0,
            windup: 0.5,
            attack_duration: 0.8,
            cooldown: 1.5,
            damage: 0.0,
            hit_point: HitPoint::Attacker,
            delivery: Delivery::Projectile(ProjectileProfile {
                speed: 9.0,
                lifetime: 2.5,
                damage: 8.0,
                prefab: "arrow".to_string(),
                spawn_offset: Vec2::new(0.4, 0.6),
                impact_effect: Some(EffectProfile {
                    prefab: "arrow_hit".to_string(),
                    left_offset: Vec2::new(0.2, 0.0),
                    right_offset: Vec2::new(-0.2, 0.0),
                }),
                ..ProjectileProfile::default()
            }),
            ..Self::default()
        }
    }

    /// Channeling caster whose orbs tick several times while attached.
    #[must_use]
    pub fn caster() -> Self {
        Self {
            move_speed: 1.5,
            attack_range: 5.0,
            stop_distance: 4.5,
            windup: 0.8,
            attack_duration: 1.2,
            cooldown: 2.5,
            damage: 0.0,
            hit_point: HitPoint::Attacker,
            freezable: true,
            knockback: KnockbackParams::new(0.6, 0.2),
            delivery: Delivery::Projectile(ProjectileProfile {
                speed: 4.0,
                lifetime: 3.0,
                damage: 5.0,
                hit_mode: HitMode::MultiHit {
                    offsets: vec![0.0, 0.3, 0.6],
                },
                track_owner: true,
                turn_rate: 3.0,
                prefab: "hex_orb".to_string(),
                spawn_offset: Vec2::new(0.3, 0.8),
                impact_effect: Some(EffectProfile {
                    prefab: "hex_burst".to_string(),
                    ..EffectProfile::default()
                }),
            }),
            ..Self::default()
        }
    }

    /// Flyer that summons in, then dives for double strikes.
    #[must_use]
    pub fn flyer() -> Self {
        Self {
            move_speed: 3.5,
            attack_range: 1.0,
            stop_distance: 0.8,
            windup: 0.2,
            attack_duration: 0.4,
            cooldown: 0.8,
            damage: 8.0,
            instance_count: 2,
            instance_interval: 0.15,
            hit_point: HitPoint::Attacker,
            knockback: KnockbackParams::new(1.5, 0.3),
            hooks: HooksConfig {
                summon_window: Some(SummonWindowSettings { duration: 1.5 }),
                walk_pause: None,
            },
            ..Self::default()
        }
    }

    /// Stalker that creeps in with a walk/pause gait.
    #[must_use]
    pub fn stalker() -> Self {
        Self {
            move_speed: 4.0,
            attack_range: 1.4,
            stop_distance: 1.2,
            windup: 0.25,
            attack_duration: 0.5,
            cooldown: 1.2,
            damage: 12.0,
            hooks: HooksConfig {
                walk_pause: Some(WalkPauseSettings { walk: 1.2, pause: 0.6 }),
                summon_window: None,
            },
            ..Self::default()
        }
    }
}

// ============================================================================
// Behavior Config
// ============================================================================

/// Root behavior configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    // === Timing ===
    /// Physics step (seconds)
    pub fixed_timestep: f32,
    /// Upper bound on physics steps per frame
    pub max_steps_per_frame: u32,

    // === Cleanup ===
    /// Delay between an actor's death and its removal
    pub enemy_removal_delay: f32,
    /// Delay between a projectile's destruction and its removal
    pub projectile_removal_delay: f32,

    // === Species ===
    /// Species table. A table in the file replaces the built-in presets.
    pub species: BTreeMap<String, SpeciesProfile>,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            fixed_timestep: 1.0 / 60.0,
            max_steps_per_frame: 10,
            enemy_removal_delay: 1.0,
            projectile_removal_delay: 0.1,
            species: Self::presets(),
        }
    }
}

impl BehaviorConfig {
    /// Built-in species table.
    #[must_use]
    pub fn presets() -> BTreeMap<String, SpeciesProfile> {
        [
            ("brawler", SpeciesProfile::brawler()),
            ("archer", SpeciesProfile::archer()),
            ("caster", SpeciesProfile::caster()),
            ("flyer", SpeciesProfile::flyer()),
            ("stalker", SpeciesProfile::stalker()),
        ]
        .into_iter()
        .map(|(name, profile)| (name.to_string(), profile))
        .collect()
    }

    /// Parse, check and clamp a TOML document.
    pub fn from_toml_str(contents: &str) -> BehaviorResult<Self> {
        let mut config: Self =
            toml::from_str(contents).map_err(|e| BehaviorError::ConfigParse(e.to_string()))?;
        config.check_finite()?;
        config.validate();
        Ok(config)
    }

    /// Load configuration from `path`.
    /// Returns the default config if the file is missing or invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Behavior config not found at {}, using defaults", path.display());
            return Self::default();
        }

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!("Failed to read behavior config: {e}");
                return Self::default();
            },
        };

        match Self::from_toml_str(&contents) {
            Ok(config) => {
                info!(
                    species = config.species.len(),
                    "Loaded behavior config from {}",
                    path.display()
                );
                config
            },
            Err(e) => {
                warn!("Rejected behavior config: {e}");
                Self::default()
            },
        }
    }

    /// Save configuration to `path`.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents =
            toml::to_string_pretty(self).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut file = fs::File::create(path)?;
        file.write_all(contents.as_bytes())?;

        info!("Saved behavior config to {}", path.display());
        Ok(())
    }

    /// Validate and clamp configuration values to sensible ranges.
    pub fn validate(&mut self) {
        self.fixed_timestep = self.fixed_timestep.clamp(1.0 / 240.0, 0.1);
        self.max_steps_per_frame = self.max_steps_per_frame.clamp(1, 32);
        self.enemy_removal_delay = self.enemy_removal_delay.clamp(0.0, MAX_REMOVAL_DELAY);
        self.projectile_removal_delay = self.projectile_removal_delay.clamp(0.0, MAX_REMOVAL_DELAY);

        for profile in self.species.values_mut() {
            profile.validate();
        }
    }

    /// Look up a species profile.
    pub fn species(&self, name: &str) -> BehaviorResult<&SpeciesProfile> {
        self.species
            .get(name)
            .ok_or_else(|| BehaviorError::UnknownSpecies(name.to_string()))
    }

    fn check_finite(&self) -> CommonResult<()> {
        finite("config", "fixed_timestep", self.fixed_timestep)?;
        finite("config", "enemy_removal_delay", self.enemy_removal_delay)?;
        finite("config", "projectile_removal_delay", self.projectile_removal_delay)?;
        for (name, profile) in &self.species {
            profile.check_finite(name)?;
        }
        Ok(())
    }
}

fn finite(scope: &str, name: &'static str, value: f32) -> CommonResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        warn!(scope, name, value, "non-finite config value");
        Err(CommonError::OutOfRange { name, value })
    }
}
