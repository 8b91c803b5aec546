//! Generator and simulation parameter bundles, selectable by preset name.
//! Plain structs with a `Default` impl, no config-file loader — presets
//! here are small fixed bundles, not user-edited files.

use crate::error::InvalidInputError;

/// Top-level request to generate a world.
#[derive(Debug, Clone)]
pub struct WorldRequest {
    pub seed: i64,
    pub width: u32,
    pub height: u32,
    pub preset: String,
    pub density: f32,
}

impl WorldRequest {
    pub fn validate(&self) -> Result<(), InvalidInputError> {
        if self.width == 0 || self.height == 0 {
            return Err(InvalidInputError::NonPositiveDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if !(0.0..=2.0).contains(&self.density) {
            return Err(InvalidInputError::DensityOutOfRange(self.density));
        }
        if GeneratorConfig::for_preset(&self.preset).is_none() {
            return Err(InvalidInputError::UnknownPreset(self.preset.clone()));
        }
        Ok(())
    }
}

/// Parameter bundle driving the whole generation pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    /// Tiles per plate, used as `max(4, w*h/plate_tile_ratio)`.
    pub plate_tile_ratio: u32,
    pub continental_plate_fraction: f64,
    /// Tiles per feature, used as `max(3, (w*h/feature_tile_ratio)*density)`.
    pub feature_tile_ratio: u32,
    pub feature_min_separation: i64,
    pub feature_attempt_multiplier: u32,
    pub min_clans: u32,
    pub max_clans: u32,
    pub clan_tile_ratio: u32,
    pub large_clan_member_range: (u32, u32),
    pub small_clan_member_range: (u32, u32),
    pub min_structure_spacing: i64,
    pub disaster_weights: DisasterWeights,
}

impl GeneratorConfig {
    pub fn for_preset(preset: &str) -> Option<Self> {
        match preset {
            "default" | "standard" => Some(Self::default()),
            "dense" => Some(Self {
                feature_tile_ratio: 3000,
                clan_tile_ratio: 12000,
                ..Self::default()
            }),
            "sparse" => Some(Self {
                feature_tile_ratio: 8000,
                clan_tile_ratio: 30000,
                ..Self::default()
            }),
            _ => None,
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            plate_tile_ratio: 10_000,
            continental_plate_fraction: 0.7,
            feature_tile_ratio: 5_000,
            feature_min_separation: 10,
            feature_attempt_multiplier: 10,
            min_clans: 3,
            max_clans: 50,
            clan_tile_ratio: 20_000,
            large_clan_member_range: (20, 30),
            small_clan_member_range: (5, 15),
            min_structure_spacing: 5,
            disaster_weights: DisasterWeights::default(),
        }
    }
}

/// Deterministic split of the 5% per-structure disaster roll. The
/// within-5% split isn't otherwise constrained, so this crate fixes one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisasterWeights {
    pub earthquake: f64,
    pub fire: f64,
    pub flood: f64,
}

impl Default for DisasterWeights {
    fn default() -> Self {
        Self {
            earthquake: 0.30,
            fire: 0.45,
            flood: 0.25,
        }
    }
}

/// Region scheduler timing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickConfig {
    pub tick_length_seconds: f64,
    pub active_multiplier: f64,
    pub background_multiplier: f64,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            tick_length_seconds: 1.0,
            active_multiplier: 1.0,
            background_multiplier: 1.0 / 60.0,
        }
    }
}

impl TickConfig {
    /// Ticks between background-region processing passes.
    pub fn background_interval_ticks(&self) -> u64 {
        (1.0 / self.background_multiplier).round() as u64
    }
}

/// Event propagation defaults.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropagationConfig {
    pub decay_k: f64,
    pub max_hops: u32,
    pub acceptance_threshold: f64,
}

impl Default for PropagationConfig {
    fn default() -> Self {
        Self {
            decay_k: 0.8,
            max_hops: 6,
            acceptance_threshold: 0.01,
        }
    }
}

/// Saturation caps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaturationConfig {
    pub story_cap: u32,
    pub event_cap: u32,
    pub soft_cap_fraction: f64,
}

impl Default for SaturationConfig {
    fn default() -> Self {
        Self {
            story_cap: 50,
            event_cap: 20,
            soft_cap_fraction: 0.8,
        }
    }
}

/// One simulated year, in ticks.
pub const TICKS_PER_YEAR: u64 = 10_000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_dimensions() {
        let req = WorldRequest {
            seed: 1,
            width: 0,
            height: 10,
            preset: "default".to_string(),
            density: 1.0,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn rejects_unknown_preset() {
        let req = WorldRequest {
            seed: 1,
            width: 10,
            height: 10,
            preset: "nonsense".to_string(),
            density: 1.0,
        };
        assert!(matches!(
            req.validate(),
            Err(InvalidInputError::UnknownPreset(_))
        ));
    }

    #[test]
    fn rejects_density_out_of_range() {
        let req = WorldRequest {
            seed: 1,
            width: 10,
            height: 10,
            preset: "default".to_string(),
            density: 5.0,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn accepts_valid_request() {
        let req = WorldRequest {
            seed: 1,
            width: 128,
            height: 128,
            preset: "default".to_string(),
            density: 1.0,
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn background_interval_is_sixty() {
        assert_eq!(TickConfig::default().background_interval_ticks(), 60);
    }

    #[test]
    fn disaster_weights_sum_to_one() {
        let w = DisasterWeights::default();
        assert!((w.earthquake + w.fire + w.flood - 1.0).abs() < 1e-9);
    }
}
