//! Scheduler configuration, validation, and error types.
//!
//! [`SimConfig`] is the construction input for a [`Sim`](crate::Sim).
//! [`validate()`](SimConfig::validate) rejects configurations the loop
//! cannot run with; [`Sim::new`](crate::Sim::new) calls it, so an invalid
//! scheduler is never constructed.

use thiserror::Error;

// ── SimConfig ────────────────────────────────────────────────────

/// Rates a scheduler starts with.
///
/// Both rates remain adjustable at runtime through
/// [`SimHandle::set_fps`](crate::SimHandle::set_fps) and
/// [`SimHandle::set_render_fps`](crate::SimHandle::set_render_fps).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimConfig {
    /// Simulation steps per second. Must be > 0. Default: 60.
    pub fps: i32,
    /// Render limit in frames per second. `<= 0` renders on every loop
    /// iteration. Default: 0.
    pub render_fps: i32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            fps: 60,
            render_fps: 0,
        }
    }
}

impl SimConfig {
    /// Config with the given simulation rate and an unthrottled renderer.
    pub fn new(fps: i32) -> Self {
        Self {
            fps,
            ..Self::default()
        }
    }

    /// Builder-style setter for the render limit.
    pub fn with_render_fps(mut self, render_fps: i32) -> Self {
        self.render_fps = render_fps;
        self
    }

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fps <= 0 {
            return Err(ConfigError::InvalidFps { value: self.fps });
        }
        Ok(())
    }
}

// ── ConfigError ──────────────────────────────────────────────────

/// Errors detected while constructing a scheduler.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The simulation rate is zero or negative.
    #[error("simulation fps must be > 0, got {value}")]
    InvalidFps {
        /// The rejected rate.
        value: i32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = SimConfig::default();
        assert_eq!(config.fps, 60);
        assert_eq!(config.render_fps, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_fps_rejected() {
        assert_eq!(
            SimConfig::new(0).validate(),
            Err(ConfigError::InvalidFps { value: 0 })
        );
    }

    #[test]
    fn negative_fps_rejected() {
        assert_eq!(
            SimConfig::new(-5).validate(),
            Err(ConfigError::InvalidFps { value: -5 })
        );
    }

    #[test]
    fn render_fps_not_validated() {
        // Any render rate is legal; <= 0 means unthrottled.
        assert!(SimConfig::new(30).with_render_fps(-1).validate().is_ok());
        assert!(SimConfig::new(30).with_render_fps(0).validate().is_ok());
        assert!(SimConfig::new(30).with_render_fps(144).validate().is_ok());
    }

    #[test]
    fn error_message_names_value() {
        let err = SimConfig::new(-2).validate().unwrap_err();
        assert_eq!(err.to_string(), "simulation fps must be > 0, got -2");
    }
}
