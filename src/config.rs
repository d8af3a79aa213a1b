use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tags::BuildOptions;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub layout: LayoutConfig,
    pub view: ViewConfig,
    pub ingest: IngestConfig,
}

/// Force layout tuning. Node charge is `-charge_strength * radius`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    pub charge_strength: f32,
    pub theta: f32,
    pub link_distance: f32,
    pub center_strength: f32,
    pub collision_padding: f32,
    pub collision_iterations: usize,
    pub alpha_decay: f32,
    pub alpha_min: f32,
    pub velocity_decay: f32,
    pub drag_alpha_target: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            charge_strength: 300.0,
            theta: 0.9999,
            link_distance: 100.0,
            center_strength: 0.1,
            collision_padding: 1.0,
            collision_iterations: 1,
            alpha_decay: 0.1,
            alpha_min: 0.001,
            velocity_decay: 0.2,
            drag_alpha_target: 0.3,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewConfig {
    /// Initial link filter slider position, 0..=100.
    pub link_filter: u8,
    pub render_interval_ms: u64,
    pub min_zoom: f32,
    pub max_zoom: f32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            link_filter: 100,
            render_interval_ms: 150,
            min_zoom: 0.1,
            max_zoom: 10.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IngestConfig {
    pub dedup_within_file: bool,
}

impl IngestConfig {
    pub fn build_options(self) -> BuildOptions {
        BuildOptions {
            dedup_within_file: self.dedup_within_file,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("`{field}` must be within {min}..={max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("`view.min_zoom` ({min}) must be below `view.max_zoom` ({max})")]
    ZoomRange { min: f32, max: f32 },
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

impl AppConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = Self::from_json(&text)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text).context("failed to parse config JSON")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let layout = &self.layout;
        check_range("layout.charge_strength", layout.charge_strength.into(), 0.0, 1.0e6)?;
        check_range("layout.theta", layout.theta.into(), 0.0, 10.0)?;
        check_range("layout.link_distance", layout.link_distance.into(), 0.0, 1.0e5)?;
        check_range("layout.center_strength", layout.center_strength.into(), 0.0, 1.0)?;
        check_range("layout.collision_padding", layout.collision_padding.into(), 0.0, 1.0e3)?;
        check_range(
            "layout.collision_iterations",
            layout.collision_iterations as f64,
            0.0,
            16.0,
        )?;
        check_range("layout.alpha_decay", layout.alpha_decay.into(), 0.0, 1.0)?;
        check_range("layout.alpha_min", layout.alpha_min.into(), 0.0, 1.0)?;
        check_range("layout.velocity_decay", layout.velocity_decay.into(), 0.0, 1.0)?;
        check_range("layout.drag_alpha_target", layout.drag_alpha_target.into(), 0.0, 1.0)?;

        let view = &self.view;
        check_range("view.link_filter", view.link_filter.into(), 0.0, 100.0)?;
        check_range("view.min_zoom", view.min_zoom.into(), 0.001, 1.0e3)?;
        check_range("view.max_zoom", view.max_zoom.into(), 0.001, 1.0e3)?;
        if view.min_zoom >= view.max_zoom {
            return Err(ConfigError::ZoomRange {
                min: view.min_zoom,
                max: view.max_zoom,
            });
        }
        Ok(())
    }
}
