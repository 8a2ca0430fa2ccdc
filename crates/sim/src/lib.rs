#![deny(unsafe_code)]
//! Grid-based incompressible-flow simulation for the stillwater visual.
//!
//! The solver is a Stam-style stable-fluids scheme: implicit diffusion via
//! Gauss-Seidel relaxation, a pressure projection to keep the velocity field
//! approximately divergence-free, and unconditionally stable semi-Lagrangian
//! advection. [`FluidSim`] orchestrates one tick per animation frame and
//! owns the forcing adapter that turns pointer drags and ambient stimuli
//! into localized impulses.

pub mod forcing;
pub mod params;
pub mod sim;
pub mod solver;

pub use forcing::Impulse;
pub use params::SimParams;
pub use sim::FluidSim;
pub use solver::FieldKind;
