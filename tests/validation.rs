// tests/validation.rs
//
// Integration-style validation tests against the public solver API.
// Run with: cargo test --test validation

use stable_fluids::boundary::BoundaryCondition;
use stable_fluids::config::SimConfig;
use stable_fluids::diagnostics::{max_abs_divergence, min_max_interior, total_interior};
use stable_fluids::error::{SolverError, SolverResult};
use stable_fluids::field::Field;
use stable_fluids::solver::FluidSolver;
use stable_fluids::visualisation::save_density_png;

use approx::assert_relative_eq;

fn dirichlet(n: usize) -> FluidSolver {
    FluidSolver::new(n, BoundaryCondition::Dirichlet).unwrap()
}

/// String-tagged injection, the way an interaction layer would call in.
fn inject(s: &mut FluidSolver, tag: &str, i: usize, j: usize, amount: f32) -> SolverResult<()> {
    let field: Field = tag.parse()?;
    s.add_input_to_field(field, i, j, amount)
}

fn snapshot(s: &FluidSolver) -> Vec<Vec<f32>> {
    Field::ALL
        .iter()
        .flat_map(|&f| [s.grid().field(f).to_vec(), s.grid().field_prev(f).to_vec()])
        .collect()
}

/// Density-weighted mean x over the interior.
fn centroid_x(s: &FluidSolver) -> f64 {
    let g = s.grid();
    let n = g.n();
    let mut w = 0.0;
    let mut wx = 0.0;
    for j in 1..=n {
        for i in 1..=n {
            let d = g.density()[g.idx(i, j)] as f64;
            w += d;
            wx += d * i as f64;
        }
    }
    wx / w
}

#[test]
fn injection_scenario_n10_dirichlet() {
    let mut s = dirichlet(10);
    s.add_input_to_field(Field::Density, 5, 5, 1.0).unwrap();
    let id = s.grid().idx(5, 5);
    assert_eq!(s.density()[id], 0.8);
    assert_eq!(
        s.density().iter().filter(|&&x| x != 0.0).count(),
        1,
        "only the injected cell should change"
    );
}

#[test]
fn zero_input_stays_zero() {
    let mut s = dirichlet(24);
    for _ in 0..50 {
        s.step();
    }
    for (k, buf) in snapshot(&s).iter().enumerate() {
        assert!(
            buf.iter().all(|&x| x == 0.0),
            "buffer {k} picked up non-zero values without any input"
        );
    }
}

#[test]
fn dirichlet_ring_is_zero_after_every_step() {
    let n = 16;
    let mut s = dirichlet(n);
    for k in 0..10 {
        inject(&mut s, "density", 1 + k % n, n, 20.0).unwrap();
        inject(&mut s, "u", n, 1 + k % n, 3.0).unwrap();
        inject(&mut s, "v", 1, 1 + (3 * k) % n, -3.0).unwrap();
        s.step();

        let g = s.grid();
        for f in Field::ALL {
            for j in 0..g.side() {
                for i in 0..g.side() {
                    if !g.is_interior(i, j) {
                        assert_eq!(g.field(f)[g.idx(i, j)], 0.0, "{f} ring ({i},{j})");
                    }
                }
            }
        }
    }
}

#[test]
fn pure_diffusion_keeps_density_non_negative() {
    let n = 20;
    let mut s = dirichlet(n);
    for (i, j, a) in [(10, 10, 50.0), (1, 1, 5.0), (20, 3, 1.0), (7, 19, 0.25)] {
        s.add_input_to_field(Field::Density, i, j, a).unwrap();
    }
    let mass_before = s.total_density();

    // snapshot <- injected density, then diffuse into the current buffer
    s.swap_buffers(Field::Density);
    s.diffuse(Field::Density, 20);

    let (lo, hi) = min_max_interior(n, s.density());
    assert!(lo >= 0.0, "diffusion produced negative density {lo}");
    assert!(hi <= 40.0, "diffusion cannot exceed the initial peak, got {hi}");
    let mass_after = total_interior(n, s.density());
    assert!(
        mass_after <= mass_before + 1e-4,
        "absorbing walls cannot create mass: {mass_before} -> {mass_after}"
    );
}

#[test]
fn projection_moves_divergence_toward_zero() {
    let n = 32;
    let mut s = dirichlet(n);
    s.add_input_to_field(Field::VelocityU, n / 2, n / 2, 10.0).unwrap();
    let before = max_abs_divergence(n, s.velocity_u(), s.velocity_v());

    s.project();

    let after = max_abs_divergence(n, s.velocity_u(), s.velocity_v());
    assert!(
        after < before,
        "projection did not reduce divergence: {before:.4e} -> {after:.4e}"
    );
}

#[test]
fn swap_exchanges_accessor_roles() {
    let mut s = dirichlet(6);
    s.add_input_to_field(Field::Density, 2, 2, 1.0).unwrap(); // sentinel in current
    let id22 = s.grid().idx(2, 2);
    let id33 = s.grid().idx(3, 3);

    s.swap_buffers(Field::Density);
    assert_eq!(s.grid().density_prev()[id22], 0.8);
    assert_eq!(s.density()[id22], 0.0);

    s.add_input_to_field(Field::Density, 3, 3, 2.5).unwrap(); // sentinel in the other buffer
    s.swap_buffers(Field::Density);
    assert_eq!(s.density()[id22], 0.8);
    assert_eq!(s.grid().density_prev()[id33], 2.0);
    assert_eq!(s.density()[id33], 0.0);
}

#[test]
fn unknown_field_tag_is_reported_and_changes_nothing() {
    let mut s = dirichlet(8);
    inject(&mut s, "density", 4, 4, 1.0).unwrap();
    let before = snapshot(&s);

    let err = inject(&mut s, "temperature", 4, 4, 1.0).unwrap_err();
    assert!(matches!(err, SolverError::UnknownField(ref t) if t == "temperature"));
    assert!(Field::try_from(9).is_err());

    assert_eq!(snapshot(&s), before);
}

#[test]
fn out_of_range_cell_is_a_reported_error() {
    let mut s = dirichlet(8);
    let err = s.add_input_to_field(Field::Density, 9, 1, 1.0).unwrap_err();
    assert!(matches!(err, SolverError::OutOfBounds { i: 9, j: 1, n: 8 }));
    assert!(s.density().iter().all(|&x| x == 0.0));
}

#[test]
fn large_velocities_stay_bounded() {
    // No CFL limit: the backtrace is clamped into the lattice, and both
    // diffusion and bilinear sampling are convex combinations.
    let n = 16;
    let mut s = dirichlet(n);
    for k in 1..=n {
        s.add_input_to_field(Field::VelocityU, k, n / 2, 500.0).unwrap();
        s.add_input_to_field(Field::VelocityV, n / 2, k, -500.0).unwrap();
    }
    s.add_input_to_field(Field::Density, 4, 4, 1.0).unwrap();
    let peak = 0.8f32;

    for _ in 0..20 {
        s.step();
        let (lo, hi) = min_max_interior(n, s.density());
        assert!(lo.is_finite() && hi.is_finite());
        assert!(lo >= -1e-6, "density went negative: {lo}");
        assert!(hi <= peak + 1e-5, "density exceeded initial peak: {hi}");
    }
    assert!(s.velocity_u().iter().all(|x| x.is_finite()));
    assert!(s.velocity_v().iter().all(|x| x.is_finite()));
}

#[test]
fn density_is_carried_downstream() {
    let n = 32;
    let mut s = dirichlet(n);
    let c = n / 2;
    for j in c - 4..=c + 4 {
        for i in c - 4..=c + 4 {
            s.add_input_to_field(Field::VelocityU, i, j, 0.1).unwrap();
        }
    }
    for j in c - 1..=c + 1 {
        for i in c - 1..=c + 1 {
            s.add_input_to_field(Field::Density, i, j, 10.0).unwrap();
        }
    }
    let x_start = centroid_x(&s);
    assert_relative_eq!(x_start, c as f64, epsilon = 1e-9);

    for _ in 0..5 {
        s.step();
    }
    let x_end = centroid_x(&s);
    assert!(
        x_end > x_start,
        "density centroid should drift in +x: {x_start} -> {x_end}"
    );
}

#[test]
fn solver_from_config_uses_its_values() {
    let mut cfg = SimConfig::default();
    cfg.n = 10;
    cfg.params.dt = 0.5;
    let mut s = FluidSolver::from_config(&cfg).unwrap();
    assert_eq!(s.n(), 10);
    assert_eq!(s.boundary(), BoundaryCondition::Dirichlet);
    s.add_input_to_field(Field::Density, 1, 1, 1.0).unwrap();
    assert_eq!(s.density()[s.grid().idx(1, 1)], 0.5);

    cfg.n = 0;
    assert!(FluidSolver::from_config(&cfg).is_err());
}

#[test]
fn density_snapshot_png_is_written() {
    let n = 12;
    let mut s = dirichlet(n);
    s.add_input_to_field(Field::Density, 6, 6, 2.0).unwrap();
    s.step();

    let dir = std::env::temp_dir().join(format!("stable_fluids_png_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("density.png");
    save_density_png(n, s.density(), &path, 4).unwrap();

    let meta = std::fs::metadata(&path).unwrap();
    assert!(meta.len() > 0);
    std::fs::remove_dir_all(&dir).ok();
}
