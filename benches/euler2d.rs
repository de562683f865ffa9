#![feature(test)]
extern crate test;

use shocktube::context::SimulationContext;
use shocktube::field::Field;
use shocktube::hydro::euler2d::{self, Primitive};
use shocktube::hydro::geometry::Direction;
use shocktube::mesh::Mesh;
use shocktube::setup::{setup_grid, ShockTube};
use shocktube::solvers::euler2d_hllc::{self, Solver};

const GAMMA: f64 = 1.4;
const N: i64 = 128;




// ============================================================================
#[bench]
fn riemann_hllc_on_sod_states(b: &mut test::Bencher) {

    let ul = Primitive(1.0, 0.0, 0.0, 1.0).to_conserved(GAMMA);
    let ur = Primitive(0.125, 0.0, 0.0, 0.1).to_conserved(GAMMA);

    b.iter(|| {
        let f = euler2d::riemann_hllc(test::black_box(ul), test::black_box(ur), Direction::X, GAMMA);
        assert!(f.mass_density().is_finite());
    });
}




// ============================================================================
#[bench]
fn compute_flux_on_square_mesh(b: &mut test::Bencher) {

    let data = setup_grid(N, N, 1.0, 1.0, &ShockTube::sod(), GAMMA).unwrap();
    let mut flux_i = Field::zeros((N as usize + 1, N as usize));

    b.iter(|| {
        euler2d_hllc::compute_flux(&data.conserved, Direction::X, GAMMA, &mut flux_i);
    });
}




// ============================================================================
#[bench]
fn advance_sod_by_ten_steps(b: &mut test::Bencher) {

    b.iter(|| {
        let data = setup_grid(N, N, 1.0, 1.0, &ShockTube::sod(), GAMMA).unwrap();
        let context = SimulationContext {
            mesh: Mesh::new(N, N, 1.0, 1.0).unwrap(),
            ..SimulationContext::default()
        };
        let mut solver = Solver::new(context, data.conserved).unwrap();

        for _ in 0..10 {
            solver.advance().unwrap();
        }
    });
}
