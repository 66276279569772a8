// src/lib.rs

pub mod boundary;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod field;
pub mod grid;
pub mod linear_solve;
pub mod params;
pub mod solver;
pub mod visualisation;
