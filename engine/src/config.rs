//! Configuration types for the sandbox scene

use crate::physics::restoring::RestoringController;
use crate::physics::world::PhysicsConfig;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Errors that can occur while loading a sandbox configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Scene description for the suspended-plate sandbox
///
/// Lengths are in scene points; the physics world runs in meters, with
/// `points_per_meter` converting between the two. Masses are derived from
/// shape area and `density`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    /// Gravity in m/s²
    pub gravity: Vec2,
    pub points_per_meter: f32,
    /// Mass per square meter for every body in the scene
    pub density: f32,

    pub ground_width: f32,
    pub ground_height: f32,
    pub ground_restitution: f32,
    pub ground_friction: f32,
    /// Replaces the plate's shape-derived moment of inertia
    pub ground_inertia: Option<f32>,

    pub spring_frequency: f32,
    pub spring_damping: f32,
    pub restoring_torque_multiplier: f32,
    pub damping_torque_multiplier: f32,

    pub ball_radius: f32,
    pub ground_category: u32,
    pub ball_category: u32,
    /// Give spawned balls `ball_category` instead of the default all-categories mask
    pub assign_ball_category: bool,

    pub spawn_test_cube: bool,
    pub cube_size: f32,

    /// Longest frame the clock will report, in seconds
    pub max_frame_dt: f32,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, -9.8),
            points_per_meter: 150.0,
            density: 1.0,
            ground_width: 320.0,
            ground_height: 35.0,
            ground_restitution: 0.75,
            ground_friction: 0.2,
            ground_inertia: None,
            spring_frequency: 2.0,
            spring_damping: 0.1,
            restoring_torque_multiplier: 10.0,
            damping_torque_multiplier: 0.5,
            ball_radius: 20.0,
            ground_category: 0b01,
            ball_category: 0b10,
            assign_ball_category: false,
            spawn_test_cube: true,
            cube_size: 30.0,
            max_frame_dt: 0.25,
        }
    }
}

impl SandboxConfig {
    /// Parse and validate a JSON config; missing fields keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        debug!(?config, "Loaded sandbox config");
        Ok(config)
    }

    /// Read, parse and validate a JSON config file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!(path = ?path, "Reading sandbox config");
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check that every size, rate and coefficient is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("points_per_meter", self.points_per_meter),
            ("density", self.density),
            ("ground_width", self.ground_width),
            ("ground_height", self.ground_height),
            ("spring_frequency", self.spring_frequency),
            ("ball_radius", self.ball_radius),
            ("cube_size", self.cube_size),
            ("max_frame_dt", self.max_frame_dt),
        ];
        for (name, value) in positive {
            if !(value > 0.0) || !value.is_finite() {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }

        let unit = [
            ("ground_restitution", self.ground_restitution),
            ("ground_friction", self.ground_friction),
            ("spring_damping", self.spring_damping),
        ];
        for (name, value) in unit {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }

        if let Some(inertia) = self.ground_inertia {
            if !(inertia > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "ground_inertia must be positive, got {inertia}"
                )));
            }
        }

        if self.ground_category == 0 || self.ball_category == 0 {
            return Err(ConfigError::Invalid(
                "ground and ball categories must have at least one bit set".to_string(),
            ));
        }

        let finite = [
            ("restoring_torque_multiplier", self.restoring_torque_multiplier),
            ("damping_torque_multiplier", self.damping_torque_multiplier),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be finite, got {value}"
                )));
            }
        }

        if !self.gravity.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "gravity must be finite, got {:?}",
                self.gravity
            )));
        }

        Ok(())
    }

    /// Solver settings for the sandbox world
    pub fn physics_config(&self) -> PhysicsConfig {
        PhysicsConfig {
            gravity: self.gravity,
            ..Default::default()
        }
    }

    /// Self-leveling controller for the ground plate
    pub fn restoring_controller(&self) -> RestoringController {
        RestoringController::new(
            self.restoring_torque_multiplier,
            self.damping_torque_multiplier,
        )
    }

    /// Convert a length in scene points to meters
    pub fn to_meters(&self, points: f32) -> f32 {
        points / self.points_per_meter
    }

    /// Convert a length in meters to scene points
    pub fn to_points(&self, meters: f32) -> f32 {
        meters * self.points_per_meter
    }
}
