//! The simulator: state machine, impulse queue, and per-frame stepper.

use std::sync::mpsc::{self, Receiver, Sender};

use glam::DVec2;
use serde_json::Value;
use stillwater_core::{FluidGrid, Palette, SimError, Xorshift64};

use crate::forcing::{self, AmbientDriver, Impulse, PointerTracker};
use crate::params::SimParams;
use crate::solver::{self, FieldKind};

/// Interactive 2D fluid simulation.
///
/// Two states: *uninitialized* (no canvas size known yet, no fields) and
/// *running* (fields allocated, stepped every frame). The first
/// [`initialize`](FluidSim::initialize) call with positive canvas
/// dimensions allocates and pre-warms the grid; a later call with
/// *different* dimensions zeroes the fields and re-seeds. There is no
/// paused state — hosts simply stop calling [`step`](FluidSim::step).
///
/// All methods run on the host's frame-callback thread. Input callbacks on
/// other threads should push impulses through
/// [`impulse_sender`](FluidSim::impulse_sender); the queue is drained at
/// the top of every step, so the grid is only ever touched from one thread.
pub struct FluidSim {
    params: SimParams,
    grid: Option<FluidGrid>,
    canvas: (u32, u32),
    palette: Palette,
    pointer: PointerTracker,
    ambient: AmbientDriver,
    rng: Xorshift64,
    tx: Sender<Impulse>,
    rx: Receiver<Impulse>,
}

impl FluidSim {
    /// Creates an uninitialized simulator.
    ///
    /// `seed` drives pre-warm seeding and ambient stimuli; two simulators
    /// built with the same params and seed, fed the same calls, produce
    /// bit-identical fields.
    pub fn new(params: SimParams, seed: u64) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            params,
            grid: None,
            canvas: (0, 0),
            palette: Palette::default(),
            pointer: PointerTracker::default(),
            ambient: AmbientDriver::new(),
            rng: Xorshift64::new(seed),
            tx,
            rx,
        }
    }

    /// Creates a simulator from a JSON params object, falling back to
    /// defaults for missing keys.
    pub fn from_json(json_params: &Value, seed: u64) -> Self {
        Self::new(SimParams::from_json(json_params), seed)
    }

    /// Allocates (or resets) the fields for a canvas of the given pixel
    /// dimensions.
    ///
    /// Pixel dimensions only affect input normalization and the renderer's
    /// per-cell rectangle size; the grid resolution is `params.grid_size`
    /// and is fixed for this instance. Calling again with the same
    /// dimensions is a no-op; different dimensions trigger a full field
    /// reset followed by pre-warm seeding.
    ///
    /// Returns `SimError::InvalidDimensions` if either dimension is zero.
    pub fn initialize(&mut self, width: u32, height: u32) -> Result<(), SimError> {
        if width == 0 || height == 0 {
            return Err(SimError::InvalidDimensions);
        }
        match self.grid.as_mut() {
            Some(grid) => {
                if self.canvas == (width, height) {
                    return Ok(());
                }
                self.canvas = (width, height);
                grid.reset();
                forcing::prewarm(grid, &mut self.rng);
            }
            None => {
                let mut grid = FluidGrid::new(self.params.grid_size)?;
                forcing::prewarm(&mut grid, &mut self.rng);
                self.grid = Some(grid);
                self.canvas = (width, height);
            }
        }
        Ok(())
    }

    /// Zeroes every field. Does not re-seed; the next rendered frame is
    /// blank until new impulses arrive.
    pub fn reset(&mut self) {
        if let Some(grid) = self.grid.as_mut() {
            grid.reset();
        }
    }

    /// Whether the simulator has been initialized.
    pub fn is_running(&self) -> bool {
        self.grid.is_some()
    }

    /// Read-only access to the fields, if running.
    pub fn grid(&self) -> Option<&FluidGrid> {
        self.grid.as_ref()
    }

    /// Canvas pixel dimensions, if running.
    pub fn canvas_size(&self) -> Option<(u32, u32)> {
        self.grid.as_ref().map(|_| self.canvas)
    }

    /// The active palette.
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Replaces the active palette. Takes effect on the next paint; the
    /// solver never sees it.
    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
    }

    /// A cloneable handle for pushing impulses from input callbacks that
    /// run off the frame thread. Queued impulses are applied at the top of
    /// the next [`step`](FluidSim::step).
    pub fn impulse_sender(&self) -> Sender<Impulse> {
        self.tx.clone()
    }

    /// Current parameter values as a JSON object.
    pub fn params(&self) -> Value {
        self.params.to_json()
    }

    /// Schema describing all parameters, their types, ranges, and defaults.
    pub fn param_schema(&self) -> Value {
        SimParams::schema()
    }

    // -- Direct impulse injection (frame thread) --

    /// Adds a velocity impulse at grid cell `(x, y)`, clamped into the
    /// interior. No-op before initialization.
    pub fn add_force(&mut self, x: usize, y: usize, fx: f64, fy: f64) {
        if let Some(grid) = self.grid.as_mut() {
            forcing::add_force(grid, x, y, fx, fy);
        }
    }

    /// Adds a dye impulse at grid cell `(x, y)`, clamped into the interior.
    /// No-op before initialization.
    pub fn add_density(&mut self, x: usize, y: usize, amount: f64) {
        if let Some(grid) = self.grid.as_mut() {
            forcing::add_density(grid, x, y, amount);
        }
    }

    // -- Pointer events (screen-space pixel coordinates) --

    /// Starts a drag gesture at screen position `(x, y)`.
    pub fn on_pointer_down(&mut self, x: f64, y: f64) {
        self.pointer.press(DVec2::new(x, y));
    }

    /// Advances a drag gesture, queueing a force and a dye impulse derived
    /// from the drag delta. Off-canvas coordinates are clamped, never
    /// rejected. No-op before initialization or without a preceding
    /// pointer-down.
    pub fn on_pointer_move(&mut self, x: f64, y: f64) {
        if self.grid.is_none() {
            return;
        }
        let pos = DVec2::new(x, y);
        let Some(delta) = self.pointer.drag(pos) else {
            return;
        };
        let (cw, ch) = (self.canvas.0 as f64, self.canvas.1 as f64);
        // Scale by inverse canvas dimension so the impulse strength is
        // resolution independent.
        let fx = delta.x / cw * self.params.force_scale;
        let fy = delta.y / ch * self.params.force_scale;
        let (cx, cy) = self.cell_of(pos);
        let _ = self.tx.send(Impulse::Force {
            x: cx,
            y: cy,
            fx,
            fy,
        });
        let _ = self.tx.send(Impulse::Dye {
            x: cx,
            y: cy,
            amount: self.params.dye_amount,
        });
    }

    /// Ends the drag gesture. Velocity decay handles the trailing motion.
    pub fn on_pointer_up(&mut self) {
        self.pointer.release();
    }

    /// Maps a screen position to a grid cell, clamped into bounds.
    fn cell_of(&self, pos: DVec2) -> (usize, usize) {
        let n = self.params.grid_size as f64;
        let (cw, ch) = (self.canvas.0 as f64, self.canvas.1 as f64);
        let cx = (pos.x / cw * n).floor().clamp(0.0, n - 1.0) as usize;
        let cy = (pos.y / ch * n).floor().clamp(0.0, n - 1.0) as usize;
        (cx, cy)
    }

    /// Advances the simulation by one frame.
    ///
    /// `dt` is in seconds and is clamped into `[0, dt_max]` so a stalled
    /// frame cannot destabilize the diffusion solve. Order per tick: drain
    /// the impulse queue, ambient injection, diffuse velocity, project,
    /// advect velocity, project again, diffuse density, advect density,
    /// rescale dye so its grid total cannot exceed the pre-solve total,
    /// then uniform velocity damping and density decay. No-op before
    /// initialization.
    pub fn step(&mut self, dt: f64) {
        let dt = dt.clamp(0.0, self.params.dt_max);
        let Some(grid) = self.grid.as_mut() else {
            return;
        };

        while let Ok(impulse) = self.rx.try_recv() {
            forcing::apply(grid, impulse);
        }

        if self.params.ambient {
            self.ambient.inject(
                grid,
                &mut self.rng,
                self.params.ambient_force,
                self.params.ambient_dye,
            );
        }

        let p = &self.params;
        let n = grid.n();
        let dye_total = grid.total_density();

        // Velocity: diffuse into the scratch pair, correct, advect back,
        // correct again. The second projection cleans up the divergence the
        // advection reintroduces.
        solver::diffuse(
            FieldKind::VelX,
            &mut grid.vx_prev,
            &grid.vx,
            p.viscosity,
            dt,
            p.solver_iters,
            n,
        );
        solver::diffuse(
            FieldKind::VelY,
            &mut grid.vy_prev,
            &grid.vy,
            p.viscosity,
            dt,
            p.solver_iters,
            n,
        );
        solver::project(
            &mut grid.vx_prev,
            &mut grid.vy_prev,
            &mut grid.vx,
            &mut grid.vy,
            p.pressure_iters,
            n,
        );
        solver::advect(
            FieldKind::VelX,
            &mut grid.vx,
            &grid.vx_prev,
            &grid.vx_prev,
            &grid.vy_prev,
            dt,
            n,
        );
        solver::advect(
            FieldKind::VelY,
            &mut grid.vy,
            &grid.vy_prev,
            &grid.vx_prev,
            &grid.vy_prev,
            dt,
            n,
        );
        solver::project(
            &mut grid.vx,
            &mut grid.vy,
            &mut grid.vx_prev,
            &mut grid.vy_prev,
            p.pressure_iters,
            n,
        );

        // Density rides the corrected velocity field.
        solver::diffuse(
            FieldKind::Scalar,
            &mut grid.density_prev,
            &grid.density,
            p.diffusion,
            dt,
            p.solver_iters,
            n,
        );
        solver::advect(
            FieldKind::Scalar,
            &mut grid.density,
            &grid.density_prev,
            &grid.vx,
            &grid.vy,
            dt,
            n,
        );

        // Semi-Lagrangian advection is a gather, not a redistribution: a
        // convergent flow can backtrace many cells into the same dense
        // region and inflate the grid total. Rescale to the pre-solve
        // total so the decay below keeps it strictly non-increasing.
        let advected_total = grid.total_density();
        if advected_total > dye_total && advected_total > 0.0 {
            let scale = dye_total / advected_total;
            for d in grid.density.iter_mut() {
                *d *= scale;
            }
        }

        for v in grid.vx.iter_mut().chain(grid.vy.iter_mut()) {
            *v *= p.velocity_damping;
        }
        for d in grid.density.iter_mut() {
            *d *= p.density_decay;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn quiet_params(grid_size: usize) -> SimParams {
        SimParams {
            grid_size,
            ambient: false,
            ..SimParams::default()
        }
    }

    // -- State machine --

    #[test]
    fn new_simulator_is_uninitialized() {
        let sim = FluidSim::new(SimParams::default(), 42);
        assert!(!sim.is_running());
        assert!(sim.grid().is_none());
        assert!(sim.canvas_size().is_none());
    }

    #[test]
    fn initialize_with_zero_dimension_is_an_error() {
        let mut sim = FluidSim::new(SimParams::default(), 42);
        assert!(matches!(
            sim.initialize(0, 480),
            Err(SimError::InvalidDimensions)
        ));
        assert!(matches!(
            sim.initialize(640, 0),
            Err(SimError::InvalidDimensions)
        ));
        assert!(!sim.is_running());
    }

    #[test]
    fn initialize_allocates_grid_and_prewarms() {
        let mut sim = FluidSim::new(quiet_params(32), 42);
        sim.initialize(640, 480).unwrap();
        assert!(sim.is_running());
        assert_eq!(sim.canvas_size(), Some((640, 480)));
        let grid = sim.grid().unwrap();
        assert_eq!(grid.n(), 32);
        assert!(grid.total_density() > 0.0, "pre-warm should seed dye");
    }

    #[test]
    fn initialize_same_size_is_a_no_op() {
        let mut sim = FluidSim::new(quiet_params(32), 42);
        sim.initialize(640, 480).unwrap();
        let before = sim.grid().unwrap().density.clone();
        sim.initialize(640, 480).unwrap();
        assert_eq!(sim.grid().unwrap().density, before);
    }

    #[test]
    fn initialize_with_new_size_resets_and_reseeds() {
        let mut sim = FluidSim::new(quiet_params(32), 42);
        sim.initialize(640, 480).unwrap();
        sim.add_density(16, 16, 12345.0);
        let marked = sim.grid().unwrap().density[sim.grid().unwrap().idx(16, 16)];

        sim.initialize(800, 600).unwrap();

        assert_eq!(sim.canvas_size(), Some((800, 600)));
        let grid = sim.grid().unwrap();
        assert_ne!(grid.density[grid.idx(16, 16)], marked, "old dye survived");
        assert!(grid.total_density() > 0.0, "re-seed should deposit dye");
    }

    #[test]
    fn reset_zeroes_fields_without_reseeding() {
        let mut sim = FluidSim::new(quiet_params(32), 42);
        sim.initialize(640, 480).unwrap();
        sim.reset();
        let grid = sim.grid().unwrap();
        assert_eq!(grid.total_density(), 0.0);
        assert!(grid.vx.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn step_before_initialize_is_a_no_op() {
        let mut sim = FluidSim::new(SimParams::default(), 42);
        sim.step(1.0 / 60.0);
        assert!(!sim.is_running());
    }

    // -- Impulses and pointer mapping --

    #[test]
    fn queued_impulses_apply_at_next_step() {
        let mut sim = FluidSim::new(quiet_params(32), 42);
        sim.initialize(320, 320).unwrap();
        sim.reset();

        let tx = sim.impulse_sender();
        tx.send(Impulse::Dye {
            x: 16,
            y: 16,
            amount: 50.0,
        })
        .unwrap();

        assert_eq!(sim.grid().unwrap().total_density(), 0.0, "not yet drained");
        sim.step(1.0 / 60.0);
        assert!(sim.grid().unwrap().total_density() > 0.0);
    }

    #[test]
    fn impulse_sender_works_from_another_thread() {
        let mut sim = FluidSim::new(quiet_params(32), 42);
        sim.initialize(320, 320).unwrap();
        sim.reset();

        let tx = sim.impulse_sender();
        std::thread::spawn(move || {
            tx.send(Impulse::Dye {
                x: 10,
                y: 10,
                amount: 25.0,
            })
            .unwrap();
        })
        .join()
        .unwrap();

        sim.step(1.0 / 60.0);
        assert!(sim.grid().unwrap().total_density() > 0.0);
    }

    #[test]
    fn drag_gesture_deposits_dye_near_the_pointer() {
        let mut sim = FluidSim::new(quiet_params(40), 42);
        sim.initialize(400, 400).unwrap();
        sim.reset();

        // 400 px canvas over 40 cells: 10 px per cell.
        sim.on_pointer_down(200.0, 200.0);
        sim.on_pointer_move(210.0, 200.0);
        sim.on_pointer_up();
        sim.step(1.0 / 60.0);

        let grid = sim.grid().unwrap();
        assert!(grid.density[grid.idx(21, 20)] > 0.0);
        // The far corner stays effectively empty: the splat is local and one
        // step of diffusion leaves only sub-epsilon traces at that distance.
        assert!(grid.density[grid.idx(2, 38)] < 1e-9);
    }

    #[test]
    fn pointer_move_without_down_does_nothing() {
        let mut sim = FluidSim::new(quiet_params(32), 42);
        sim.initialize(320, 320).unwrap();
        sim.reset();
        sim.on_pointer_move(100.0, 100.0);
        sim.step(1.0 / 60.0);
        assert_eq!(sim.grid().unwrap().total_density(), 0.0);
    }

    #[test]
    fn off_canvas_pointer_coordinates_are_clamped() {
        let mut sim = FluidSim::new(quiet_params(32), 42);
        sim.initialize(320, 320).unwrap();
        sim.reset();
        sim.on_pointer_down(-50.0, 1000.0);
        sim.on_pointer_move(-40.0, 1010.0);
        sim.step(1.0 / 60.0);
        // Must not panic, and the dye lands inside the grid.
        assert!(sim.grid().unwrap().total_density() > 0.0);
    }

    // -- Step semantics --

    #[test]
    fn total_density_never_increases_without_input() {
        let mut sim = FluidSim::new(quiet_params(32), 42);
        sim.initialize(320, 320).unwrap();
        let mut previous = sim.grid().unwrap().total_density();
        assert!(previous > 0.0);

        for _ in 0..30 {
            sim.step(1.0 / 60.0);
            let total = sim.grid().unwrap().total_density();
            assert!(
                total <= previous + 1e-9,
                "density grew with no sources: {total} > {previous}"
            );
            previous = total;
        }
    }

    #[test]
    fn oversized_dt_is_clamped_before_use() {
        let mut a = FluidSim::new(quiet_params(24), 42);
        let mut b = FluidSim::new(quiet_params(24), 42);
        a.initialize(240, 240).unwrap();
        b.initialize(240, 240).unwrap();
        a.add_density(12, 12, 80.0);
        b.add_density(12, 12, 80.0);
        a.add_force(12, 12, 0.3, -0.2);
        b.add_force(12, 12, 0.3, -0.2);

        a.step(1.0); // far above the clamp
        b.step(SimParams::default().dt_max);

        assert_eq!(a.grid().unwrap().density, b.grid().unwrap().density);
        assert_eq!(a.grid().unwrap().vx, b.grid().unwrap().vx);
    }

    #[test]
    fn identical_inputs_produce_bit_identical_fields() {
        let params = SimParams {
            grid_size: 24,
            ..SimParams::default()
        };
        let mut a = FluidSim::new(params, 1234);
        let mut b = FluidSim::new(params, 1234);
        a.initialize(480, 480).unwrap();
        b.initialize(480, 480).unwrap();

        for frame in 0..90 {
            if frame % 10 == 0 {
                a.add_force(8, 8, 0.1, 0.05);
                b.add_force(8, 8, 0.1, 0.05);
                a.add_density(15, 15, 20.0);
                b.add_density(15, 15, 20.0);
            }
            a.step(1.0 / 60.0);
            b.step(1.0 / 60.0);
        }

        let (ga, gb) = (a.grid().unwrap(), b.grid().unwrap());
        assert_eq!(ga.density, gb.density);
        assert_eq!(ga.vx, gb.vx);
        assert_eq!(ga.vy, gb.vy);
    }

    #[test]
    fn step_keeps_fields_finite_under_heavy_forcing() {
        let mut sim = FluidSim::new(quiet_params(24), 42);
        sim.initialize(240, 240).unwrap();
        for _ in 0..60 {
            sim.add_force(12, 12, 10.0, -10.0);
            sim.add_density(12, 12, 500.0);
            sim.step(1.0 / 60.0);
        }
        let grid = sim.grid().unwrap();
        assert!(grid.density.iter().all(|v| v.is_finite()));
        assert!(grid.vx.iter().all(|v| v.is_finite()));
        assert!(grid.vy.iter().all(|v| v.is_finite()));
    }

    // -- Params surface --

    #[test]
    fn from_json_and_params_round_trip() {
        let sim = FluidSim::from_json(&json!({"grid_size": 48, "ambient": false}), 7);
        let params = sim.params();
        assert_eq!(params["grid_size"], 48);
        assert_eq!(params["ambient"], false);
        assert!(sim.param_schema().get("grid_size").is_some());
    }

    #[test]
    fn set_palette_does_not_disturb_solver_state() {
        let mut sim = FluidSim::new(quiet_params(24), 42);
        sim.initialize(240, 240).unwrap();
        let before = sim.grid().unwrap().density.clone();
        sim.set_palette(Palette::ember());
        assert_eq!(sim.grid().unwrap().density, before);
        assert_eq!(sim.palette().len(), Palette::ember().len());
    }
}
