use crate::{LayoutError, Vec2};
use serde::{Deserialize, Serialize};

/// How node positions are computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementMode {
    /// Deterministic two-pass placement
    #[default]
    Static,
    /// Force relaxation seeded from the levels
    Dynamic,
}

/// How edges are drawn between node boxes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteStyle {
    /// Leave the source on its right side, enter the target on its left
    /// side, and bend when the two are not level
    #[default]
    Curved,
    /// Straight segment along the line joining the two centers
    Direct,
}

/// Parameters of the force relaxation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForceConfig {
    /// Radius of the circle each node keeps clear of other nodes
    pub collision_radius: f32,

    /// Magnitude of the pairwise repulsion
    pub repulsion_strength: f32,

    /// Repulsion range as a fraction of the canvas width
    pub repulsion_range: f32,

    /// Pull towards the level column
    pub x_strength: f32,

    /// Pull towards the children's centroid
    pub y_strength: f32,

    pub alpha_decay: f32,

    /// The simulation stops once alpha drops below this value
    pub alpha_min: f32,

    /// Fraction of the velocity lost on every tick
    pub velocity_decay: f32,

    /// Hard cap on the number of ticks of a run
    pub max_ticks: usize,
}

impl Default for ForceConfig {
    fn default() -> Self {
        Self {
            collision_radius: 80.0,
            repulsion_strength: 3000.0,
            repulsion_range: 0.7,
            x_strength: 1.0,
            y_strength: 0.8,
            alpha_decay: 0.01,
            alpha_min: 0.001,
            velocity_decay: 0.4,
            max_ticks: 1000,
        }
    }
}

/// Layout configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Width and height of the drawing area
    pub canvas: Vec2,

    /// Extra horizontal space added per level, keeps edge labels readable
    pub level_padding: f32,

    /// Minimum vertical distance between nodes of a level
    pub min_node_spacing: f32,

    pub mode: PlacementMode,

    pub route_style: RouteStyle,

    /// Whether nodes may be moved after layout
    pub allow_drag: bool,

    pub forces: ForceConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            canvas: Vec2::new(800.0, 600.0),
            level_padding: 150.0,
            min_node_spacing: 80.0,
            mode: PlacementMode::default(),
            route_style: RouteStyle::default(),
            allow_drag: true,
            forces: ForceConfig::default(),
        }
    }
}

fn check(ok: bool, message: impl FnOnce() -> String) -> Result<(), LayoutError> {
    if ok {
        Ok(())
    } else {
        Err(LayoutError::InvalidConfig(message()))
    }
}

fn non_negative(value: f32) -> bool {
    value.is_finite() && value >= 0.0
}

fn unit_fraction(value: f32) -> bool {
    value > 0.0 && value <= 1.0
}

impl LayoutConfig {
    /// Check that every value is usable by the placers
    ///
    /// # Errors
    /// Returns [`LayoutError::InvalidConfig`] naming the first bad value
    pub fn validate(&self) -> Result<(), LayoutError> {
        let canvas = self.canvas;
        check(
            canvas.is_finite() && canvas.x > 0.0 && canvas.y > 0.0,
            || format!("canvas must be positive, got {}x{}", canvas.x, canvas.y),
        )?;
        check(non_negative(self.level_padding), || {
            format!("level_padding must be >= 0, got {}", self.level_padding)
        })?;
        check(non_negative(self.min_node_spacing), || {
            format!("min_node_spacing must be >= 0, got {}", self.min_node_spacing)
        })?;

        let forces = &self.forces;
        check(forces.collision_radius.is_finite() && forces.collision_radius > 0.0, || {
            format!("collision_radius must be > 0, got {}", forces.collision_radius)
        })?;
        for (name, value) in [
            ("repulsion_strength", forces.repulsion_strength),
            ("repulsion_range", forces.repulsion_range),
            ("x_strength", forces.x_strength),
            ("y_strength", forces.y_strength),
            ("alpha_min", forces.alpha_min),
        ] {
            check(non_negative(value), || format!("{name} must be >= 0, got {value}"))?;
        }
        for (name, value) in [
            ("alpha_decay", forces.alpha_decay),
            ("velocity_decay", forces.velocity_decay),
        ] {
            check(unit_fraction(value), || {
                format!("{name} must be in (0, 1], got {value}")
            })?;
        }
        check(forces.max_ticks > 0, || "max_ticks must be > 0".to_string())
    }
}
