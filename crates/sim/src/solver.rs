//! The numerical core: diffusion, projection, advection, boundaries.
//!
//! All operations work on raw row-major `&[f64]` slices plus the side
//! length `n`, mutating in place over the interior `1..n-1` and finishing
//! with an explicit boundary pass. Stability is structural rather than
//! checked: diffusion is implicit (Gauss-Seidel), advection is
//! semi-Lagrangian, and the iteration counts are fixed so per-frame cost
//! stays deterministic at O(iterations * n^2).

/// Selects how `set_boundary` mirrors edge values.
///
/// Velocity components flip sign at the walls they run perpendicular to
/// (no-flow); everything else is copied straight from the interior
/// neighbor (no-stick).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Plain scalar (density, pressure, divergence): straight copy everywhere.
    Scalar,
    /// Velocity x component: sign flip at the left/right walls.
    VelX,
    /// Velocity y component: sign flip at the top/bottom walls.
    VelY,
}

/// Flat index of cell `(i, j)` in a row-major n×n slice.
#[inline]
fn at(i: usize, j: usize, n: usize) -> usize {
    j * n + i
}

/// Enforces wall boundary conditions by mirroring interior neighbors.
///
/// Edge cells copy (or sign-flip, per `kind`) their adjacent interior cell;
/// corners take the average of the two adjacent edge cells.
pub fn set_boundary(kind: FieldKind, x: &mut [f64], n: usize) {
    for k in 1..n - 1 {
        let left = x[at(1, k, n)];
        let right = x[at(n - 2, k, n)];
        x[at(0, k, n)] = if kind == FieldKind::VelX { -left } else { left };
        x[at(n - 1, k, n)] = if kind == FieldKind::VelX { -right } else { right };

        let top = x[at(k, 1, n)];
        let bottom = x[at(k, n - 2, n)];
        x[at(k, 0, n)] = if kind == FieldKind::VelY { -top } else { top };
        x[at(k, n - 1, n)] = if kind == FieldKind::VelY { -bottom } else { bottom };
    }

    x[at(0, 0, n)] = 0.5 * (x[at(1, 0, n)] + x[at(0, 1, n)]);
    x[at(0, n - 1, n)] = 0.5 * (x[at(1, n - 1, n)] + x[at(0, n - 2, n)]);
    x[at(n - 1, 0, n)] = 0.5 * (x[at(n - 2, 0, n)] + x[at(n - 1, 1, n)]);
    x[at(n - 1, n - 1, n)] = 0.5 * (x[at(n - 2, n - 1, n)] + x[at(n - 1, n - 2, n)]);
}

/// Gauss-Seidel relaxation solving `c * x[i,j] - a * sum(neighbors) = x0[i,j]`.
///
/// Each sweep reads the current (not iteration-frozen) neighbor values and
/// reapplies boundary conditions. The fixed sweep count trades convergence
/// accuracy for deterministic per-frame cost; this is the dominant cost
/// center of the solver.
pub fn lin_solve(kind: FieldKind, x: &mut [f64], x0: &[f64], a: f64, c: f64, iters: usize, n: usize) {
    let c_inv = 1.0 / c;
    for _ in 0..iters {
        for j in 1..n - 1 {
            for i in 1..n - 1 {
                let neighbors = x[at(i - 1, j, n)]
                    + x[at(i + 1, j, n)]
                    + x[at(i, j - 1, n)]
                    + x[at(i, j + 1, n)];
                x[at(i, j, n)] = (x0[at(i, j, n)] + a * neighbors) * c_inv;
            }
        }
        set_boundary(kind, x, n);
    }
}

/// Diffusion step: spreads `x0` into `x` over time `dt` at `rate`.
///
/// `a = dt * rate * (n-2)^2`; larger `a` spreads faster. Solved implicitly
/// with [`lin_solve`] so any `a` is stable.
pub fn diffuse(kind: FieldKind, x: &mut [f64], x0: &[f64], rate: f64, dt: f64, iters: usize, n: usize) {
    let a = dt * rate * ((n - 2) * (n - 2)) as f64;
    x.copy_from_slice(x0);
    lin_solve(kind, x, x0, a, 1.0 + 4.0 * a, iters, n);
}

/// Semi-Lagrangian advection: transports `d0` along `(vel_x, vel_y)` into `d`.
///
/// Each interior cell traces backward by `dt * (n-2)` along the local
/// velocity, clamps the source position into `[0.5, n-1.5]`, and bilinearly
/// interpolates `d0` there. Unconditionally stable regardless of velocity
/// magnitude, at the cost of some numerical diffusion.
pub fn advect(
    kind: FieldKind,
    d: &mut [f64],
    d0: &[f64],
    vel_x: &[f64],
    vel_y: &[f64],
    dt: f64,
    n: usize,
) {
    let dt0 = dt * (n - 2) as f64;
    let max = n as f64 - 1.5;

    for j in 1..n - 1 {
        for i in 1..n - 1 {
            let cell = at(i, j, n);
            let x = (i as f64 - dt0 * vel_x[cell]).clamp(0.5, max);
            let y = (j as f64 - dt0 * vel_y[cell]).clamp(0.5, max);

            let i0 = x.floor() as usize;
            let i1 = i0 + 1;
            let j0 = y.floor() as usize;
            let j1 = j0 + 1;

            let s1 = x - i0 as f64;
            let s0 = 1.0 - s1;
            let t1 = y - j0 as f64;
            let t0 = 1.0 - t1;

            d[cell] = s0 * (t0 * d0[at(i0, j0, n)] + t1 * d0[at(i0, j1, n)])
                + s1 * (t0 * d0[at(i1, j0, n)] + t1 * d0[at(i1, j1, n)]);
        }
    }
    set_boundary(kind, d, n);
}

/// Pressure projection: removes the divergent component of the velocity field.
///
/// Computes per-cell divergence (central difference scaled by `-0.5/n`),
/// solves the pressure Poisson equation with [`lin_solve`], and subtracts
/// the pressure gradient from the velocity. `p` and `div` are caller-owned
/// scratch; both are fully overwritten.
pub fn project(
    vel_x: &mut [f64],
    vel_y: &mut [f64],
    p: &mut [f64],
    div: &mut [f64],
    iters: usize,
    n: usize,
) {
    let nf = n as f64;

    for j in 1..n - 1 {
        for i in 1..n - 1 {
            div[at(i, j, n)] = -0.5
                * (vel_x[at(i + 1, j, n)] - vel_x[at(i - 1, j, n)] + vel_y[at(i, j + 1, n)]
                    - vel_y[at(i, j - 1, n)])
                / nf;
            p[at(i, j, n)] = 0.0;
        }
    }
    set_boundary(FieldKind::Scalar, div, n);
    set_boundary(FieldKind::Scalar, p, n);

    lin_solve(FieldKind::Scalar, p, div, 1.0, 4.0, iters, n);

    for j in 1..n - 1 {
        for i in 1..n - 1 {
            vel_x[at(i, j, n)] -= 0.5 * nf * (p[at(i + 1, j, n)] - p[at(i - 1, j, n)]);
            vel_y[at(i, j, n)] -= 0.5 * nf * (p[at(i, j + 1, n)] - p[at(i, j - 1, n)]);
        }
    }
    set_boundary(FieldKind::VelX, vel_x, n);
    set_boundary(FieldKind::VelY, vel_y, n);
}
