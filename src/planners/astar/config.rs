use crate::infra::ConfigError;

/// Pixel-space parameters of the transition model.
///
/// Velocities are derived from the quantization unit so that one walk step
/// covers one tile at the default unit of 4 px.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhysicsConfig {
    pub tile_size: i32,
    pub unit_pixels: i32,
    pub max_jump_frames: u32,
    pub max_fall_steps: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            tile_size: 16,
            unit_pixels: 4,
            max_jump_frames: 32,
            max_fall_steps: 64,
        }
    }
}

impl PhysicsConfig {
    pub fn with_unit(unit_pixels: i32) -> Self {
        Self {
            unit_pixels,
            ..Self::default()
        }
    }

    /// Vertical velocity gained per frame.
    pub fn gravity(&self) -> i32 {
        self.unit_pixels
    }

    pub fn jump_vy0(&self) -> i32 {
        -5 * self.unit_pixels
    }

    pub fn run_jump_vy0(&self) -> i32 {
        -6 * self.unit_pixels
    }

    pub fn walk_vx(&self) -> i32 {
        4 * self.unit_pixels
    }

    pub fn run_vx(&self) -> i32 {
        6 * self.unit_pixels
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tile_size <= 0 {
            return Err(ConfigError::InvalidTileSize(self.tile_size));
        }
        if self.unit_pixels <= 0 || self.tile_size % self.unit_pixels != 0 {
            return Err(ConfigError::InvalidUnit {
                unit: self.unit_pixels,
                tile: self.tile_size,
            });
        }
        if self.max_jump_frames == 0 {
            return Err(ConfigError::ZeroJumpFrames);
        }
        if self.max_fall_steps == 0 {
            return Err(ConfigError::ZeroFallSteps);
        }
        Ok(())
    }
}

/// Weights of the additive heuristic. Each proximity penalty is
/// `(range - distance) * weight` and only applies when the sensor fired.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeuristicWeights {
    pub forward: f32,
    pub wall: f32,
    pub wall_range: i32,
    pub gap: f32,
    pub gap_range: i32,
    pub enemy: f32,
    pub enemy_range: i32,
}

impl Default for HeuristicWeights {
    fn default() -> Self {
        Self {
            forward: 5.0,
            wall: 3.0,
            wall_range: 8,
            gap: 6.0,
            gap_range: 8,
            enemy: 4.0,
            enemy_range: 6,
        }
    }
}

impl HeuristicWeights {
    /// Non-finite weights would put non-finite `f` values in the open set.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("forward", self.forward),
            ("wall", self.wall),
            ("gap", self.gap),
            ("enemy", self.enemy),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::InvalidWeight { name, value });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannerConfig {
    /// Columns of progress, measured from the start, that count as reaching the goal
    pub goal_columns: i32,
    /// Accepted expansions before the search gives up with `Action::None`
    pub max_expansions: usize,
    /// Successors further left than `start.col - backward_limit` are dropped
    pub backward_limit: i32,
    /// Popped nodes whose path cost exceeds this are not expanded
    pub max_path_cost: f32,
    /// Cost of forward moves and jumps
    pub forward_cost: f32,
    /// Cost of stepping back or holding still
    pub fallback_cost: f32,
    pub weights: HeuristicWeights,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            goal_columns: 6,
            max_expansions: 4000,
            backward_limit: 6,
            max_path_cost: 48.0,
            forward_cost: 1.0,
            fallback_cost: 1.25,
            weights: HeuristicWeights::default(),
        }
    }
}

impl PlannerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.goal_columns < 1 {
            return Err(ConfigError::ZeroGoalColumns);
        }
        if self.max_expansions == 0 {
            return Err(ConfigError::ZeroExpansionLimit);
        }
        for (name, value) in [
            ("max_path_cost", self.max_path_cost),
            ("forward_cost", self.forward_cost),
            ("fallback_cost", self.fallback_cost),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidCost { name, value });
            }
        }
        self.weights.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_physics() {
        let physics = PhysicsConfig::default();
        assert!(physics.validate().is_ok());
        assert_eq!(physics.walk_vx(), physics.tile_size);
        assert_eq!(physics.run_vx(), 24);
        assert_eq!(physics.gravity(), 4);
        assert!(physics.run_jump_vy0() < physics.jump_vy0());
    }

    #[test]
    fn test_unit_must_divide_tile() {
        assert!(PhysicsConfig::with_unit(2).validate().is_ok());
        assert_eq!(
            PhysicsConfig::with_unit(5).validate(),
            Err(ConfigError::InvalidUnit { unit: 5, tile: 16 })
        );
        assert_eq!(
            PhysicsConfig::with_unit(0).validate(),
            Err(ConfigError::InvalidUnit { unit: 0, tile: 16 })
        );
    }

    #[test]
    fn test_planner_config_validation() {
        assert!(PlannerConfig::default().validate().is_ok());

        let config = PlannerConfig {
            max_expansions: 0,
            ..PlannerConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroExpansionLimit));

        let config = PlannerConfig {
            fallback_cost: f32::NAN,
            ..PlannerConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidCost {
                name: "fallback_cost",
                ..
            })
        ));
    }

    #[test]
    fn test_heuristic_weights_must_be_finite() {
        assert!(HeuristicWeights::default().validate().is_ok());

        let config = PlannerConfig {
            weights: HeuristicWeights {
                gap: f32::INFINITY,
                ..HeuristicWeights::default()
            },
            ..PlannerConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidWeight {
                name: "gap",
                value: f32::INFINITY
            })
        );

        let weights = HeuristicWeights {
            forward: f32::NAN,
            ..HeuristicWeights::default()
        };
        assert!(matches!(
            weights.validate(),
            Err(ConfigError::InvalidWeight { name: "forward", .. })
        ));
    }
}
