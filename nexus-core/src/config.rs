//! Tunables for layout and fetching.
//!
//! Both structs deserialize from partial JSON; missing keys take the defaults
//! below, so a host can pass `{}` or just the keys it wants to change.

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, LayoutResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Fraction of each sector actually used for node placement.
    pub compression_factor: f64,
    /// Added to the farthest member distance of a zone.
    pub zone_margin: f64,
    /// Radius of the center marker.
    pub center_radius: f64,
    /// Radius of a peer marker.
    pub node_radius: f64,
    /// `max_radius = shortest viewport dimension / viewport_divisor`.
    pub viewport_divisor: f64,
    /// Used until the host reports a viewport.
    pub default_max_radius: f64,
    /// Diameter multiplier for the hovered entity.
    pub hover_scale: f64,
    /// Tooltip anchor offset from the pointer (screen units).
    pub tooltip_offset: (f64, f64),
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            compression_factor: 0.6,
            zone_margin: 80.0,
            center_radius: 40.0,
            node_radius: 30.0,
            viewport_divisor: 1.7,
            default_max_radius: 550.0,
            hover_scale: 1.2,
            tooltip_offset: (15.0, -30.0),
        }
    }
}

impl LayoutConfig {
    /// Layout radius for a viewport whose shorter side is `shortest_dimension`.
    pub fn max_radius_for_viewport(&self, shortest_dimension: f64) -> f64 {
        shortest_dimension / self.viewport_divisor
    }

    /// Reject values the layout stages cannot work with.
    pub fn validate(&self) -> LayoutResult<()> {
        check_compression(self.compression_factor)?;
        check_radius("zone_margin", self.zone_margin)?;
        check_radius("center_radius", self.center_radius)?;
        check_radius("node_radius", self.node_radius)?;
        check_radius("default_max_radius", self.default_max_radius)?;
        if !(self.viewport_divisor.is_finite() && self.viewport_divisor > 0.0) {
            return Err(LayoutError::InvalidRadius {
                name: "viewport_divisor",
                value: self.viewport_divisor,
            });
        }
        Ok(())
    }
}

pub(crate) fn check_compression(value: f64) -> LayoutResult<()> {
    if value.is_finite() && value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(LayoutError::InvalidCompression { value })
    }
}

pub(crate) fn check_radius(name: &'static str, value: f64) -> LayoutResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(LayoutError::InvalidRadius { name, value })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Outstanding fetches older than this are cancelled.
    pub fetch_timeout_ms: u64,
    /// Prefix for the endpoint paths, e.g. `http://127.0.0.1:5000`.
    pub base_url: String,
    pub main_endpoint: String,
    pub cited_by_endpoint: String,
    /// Query parameter carrying the paper id on GET requests.
    pub paper_id_param: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_ms: 120_000,
            base_url: String::new(),
            main_endpoint: "/api/paper-graph".to_string(),
            cited_by_endpoint: "/api/paper-graph/cited-by".to_string(),
            paper_id_param: "paper_id".to_string(),
        }
    }
}
