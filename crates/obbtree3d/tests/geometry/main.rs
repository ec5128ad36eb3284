#[macro_use]
extern crate approx;

mod collision_modes;
mod collision_scenarios;
mod common;
mod obb_disjoint_symmetry;
mod obb_tree_invariants;
mod obb_tree_queries;
mod tolerance_monotonicity;
