//! Simulation parameters.

use serde_json::{json, Value};
use stillwater_core::params::{param_bool, param_f64, param_usize};

/// Default grid side length in cells.
pub const DEFAULT_GRID_SIZE: usize = 80;
/// Default dye diffusion rate.
pub const DEFAULT_DIFFUSION: f64 = 0.0001;
/// Default kinematic viscosity (velocity diffusion rate).
pub const DEFAULT_VISCOSITY: f64 = 0.0001;
/// Default Gauss-Seidel sweeps for diffusion.
pub const DEFAULT_SOLVER_ITERS: usize = 20;
/// Default Gauss-Seidel sweeps for the pressure solve.
pub const DEFAULT_PRESSURE_ITERS: usize = 20;
/// Default time-step ceiling in seconds (one 60 Hz frame).
pub const DEFAULT_DT_MAX: f64 = 1.0 / 60.0;
/// Default per-step velocity damping factor.
pub const DEFAULT_VELOCITY_DAMPING: f64 = 0.99;
/// Default per-step density decay factor.
pub const DEFAULT_DENSITY_DECAY: f64 = 0.995;
/// Default drag-to-force multiplier (applied to the normalized drag delta).
pub const DEFAULT_FORCE_SCALE: f64 = 5.0;
/// Default dye deposited per drag-move event.
pub const DEFAULT_DYE_AMOUNT: f64 = 40.0;
/// Default ambient force amplitude.
pub const DEFAULT_AMBIENT_FORCE: f64 = 0.02;
/// Default ambient dye blob amount.
pub const DEFAULT_AMBIENT_DYE: f64 = 30.0;

/// Tunable constants for the fluid simulation.
///
/// Use [`Default`] for the calibrated calming-visual settings, or
/// [`SimParams::from_json`] to let the host override individual keys.
#[derive(Debug, Clone, Copy)]
pub struct SimParams {
    /// Grid side length in cells. Fixed for the lifetime of a simulator.
    pub grid_size: usize,
    /// Dye diffusion rate.
    pub diffusion: f64,
    /// Velocity diffusion rate (viscosity).
    pub viscosity: f64,
    /// Gauss-Seidel sweeps per diffusion solve.
    pub solver_iters: usize,
    /// Gauss-Seidel sweeps per pressure solve.
    pub pressure_iters: usize,
    /// Ceiling applied to caller-supplied `dt`, in seconds.
    pub dt_max: f64,
    /// Uniform multiplicative velocity damping per step.
    pub velocity_damping: f64,
    /// Uniform multiplicative density decay per step.
    pub density_decay: f64,
    /// Multiplier from normalized drag delta to velocity impulse.
    pub force_scale: f64,
    /// Dye deposited at the pointer cell per drag-move event.
    pub dye_amount: f64,
    /// Whether ambient stimuli keep the visual alive without input.
    pub ambient: bool,
    /// Ambient force amplitude.
    pub ambient_force: f64,
    /// Ambient dye blob amount.
    pub ambient_dye: f64,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            diffusion: DEFAULT_DIFFUSION,
            viscosity: DEFAULT_VISCOSITY,
            solver_iters: DEFAULT_SOLVER_ITERS,
            pressure_iters: DEFAULT_PRESSURE_ITERS,
            dt_max: DEFAULT_DT_MAX,
            velocity_damping: DEFAULT_VELOCITY_DAMPING,
            density_decay: DEFAULT_DENSITY_DECAY,
            force_scale: DEFAULT_FORCE_SCALE,
            dye_amount: DEFAULT_DYE_AMOUNT,
            ambient: true,
            ambient_force: DEFAULT_AMBIENT_FORCE,
            ambient_dye: DEFAULT_AMBIENT_DYE,
        }
    }
}

impl SimParams {
    /// Extracts parameters from a JSON object, falling back to defaults
    /// for missing or mistyped keys.
    pub fn from_json(params: &Value) -> Self {
        Self {
            grid_size: param_usize(params, "grid_size", DEFAULT_GRID_SIZE),
            diffusion: param_f64(params, "diffusion", DEFAULT_DIFFUSION),
            viscosity: param_f64(params, "viscosity", DEFAULT_VISCOSITY),
            solver_iters: param_usize(params, "solver_iters", DEFAULT_SOLVER_ITERS),
            pressure_iters: param_usize(params, "pressure_iters", DEFAULT_PRESSURE_ITERS),
            dt_max: param_f64(params, "dt_max", DEFAULT_DT_MAX),
            velocity_damping: param_f64(params, "velocity_damping", DEFAULT_VELOCITY_DAMPING),
            density_decay: param_f64(params, "density_decay", DEFAULT_DENSITY_DECAY),
            force_scale: param_f64(params, "force_scale", DEFAULT_FORCE_SCALE),
            dye_amount: param_f64(params, "dye_amount", DEFAULT_DYE_AMOUNT),
            ambient: param_bool(params, "ambient", true),
            ambient_force: param_f64(params, "ambient_force", DEFAULT_AMBIENT_FORCE),
            ambient_dye: param_f64(params, "ambient_dye", DEFAULT_AMBIENT_DYE),
        }
    }

    /// Current parameter values as a JSON object.
    pub fn to_json(&self) -> Value {
        json!({
            "grid_size": self.grid_size,
            "diffusion": self.diffusion,
            "viscosity": self.viscosity,
            "solver_iters": self.solver_iters,
            "pressure_iters": self.pressure_iters,
            "dt_max": self.dt_max,
            "velocity_damping": self.velocity_damping,
            "density_decay": self.density_decay,
            "force_scale": self.force_scale,
            "dye_amount": self.dye_amount,
            "ambient": self.ambient,
            "ambient_force": self.ambient_force,
            "ambient_dye": self.ambient_dye,
        })
    }

    /// Schema describing all parameters, their types, ranges, and defaults.
    pub fn schema() -> Value {
        json!({
            "grid_size": {
                "type": "integer",
                "default": DEFAULT_GRID_SIZE,
                "min": 3,
                "max": 512,
                "description": "Grid side length in cells"
            },
            "diffusion": {
                "type": "number",
                "default": DEFAULT_DIFFUSION,
                "min": 0.0,
                "max": 0.01,
                "description": "Dye diffusion rate"
            },
            "viscosity": {
                "type": "number",
                "default": DEFAULT_VISCOSITY,
                "min": 0.0,
                "max": 0.01,
                "description": "Velocity diffusion rate (viscosity)"
            },
            "solver_iters": {
                "type": "integer",
                "default": DEFAULT_SOLVER_ITERS,
                "min": 1,
                "max": 60,
                "description": "Gauss-Seidel sweeps per diffusion solve"
            },
            "pressure_iters": {
                "type": "integer",
                "default": DEFAULT_PRESSURE_ITERS,
                "min": 1,
                "max": 60,
                "description": "Gauss-Seidel sweeps per pressure solve"
            },
            "dt_max": {
                "type": "number",
                "default": DEFAULT_DT_MAX,
                "min": 0.001,
                "max": 0.1,
                "description": "Ceiling applied to caller-supplied dt, in seconds"
            },
            "velocity_damping": {
                "type": "number",
                "default": DEFAULT_VELOCITY_DAMPING,
                "min": 0.9,
                "max": 1.0,
                "description": "Per-step multiplicative velocity damping"
            },
            "density_decay": {
                "type": "number",
                "default": DEFAULT_DENSITY_DECAY,
                "min": 0.9,
                "max": 1.0,
                "description": "Per-step multiplicative density decay"
            },
            "force_scale": {
                "type": "number",
                "default": DEFAULT_FORCE_SCALE,
                "min": 0.0,
                "max": 50.0,
                "description": "Multiplier from normalized drag delta to velocity impulse"
            },
            "dye_amount": {
                "type": "number",
                "default": DEFAULT_DYE_AMOUNT,
                "min": 0.0,
                "max": 200.0,
                "description": "Dye deposited at the pointer cell per drag move"
            },
            "ambient": {
                "type": "boolean",
                "default": true,
                "description": "Keep the visual alive with ambient stimuli when idle"
            },
            "ambient_force": {
                "type": "number",
                "default": DEFAULT_AMBIENT_FORCE,
                "min": 0.0,
                "max": 1.0,
                "description": "Ambient force amplitude"
            },
            "ambient_dye": {
                "type": "number",
                "default": DEFAULT_AMBIENT_DYE,
                "min": 0.0,
                "max": 200.0,
                "description": "Ambient dye blob amount"
            }
        })
    }
}
