//! Barrier-synchronized parallel Conway's Game of Life (B3/S23) on a torus.

pub mod config;
pub mod error;
pub mod grid;
pub mod parallel;
pub mod reference;
pub mod render;
pub mod rules;

pub use config::WorldConfig;
pub use error::{ConfigError, LifeError, Result};
pub use grid::Grid;
pub use parallel::{EngineConfig, Partition, RunReport, SimulationEngine, SnapshotPolicy};
pub use reference::ReferenceLife;
