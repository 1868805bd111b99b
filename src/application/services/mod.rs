//! Application services

pub mod seed;

pub use seed::{SeedFile, SeedService};
