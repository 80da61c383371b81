//! Row-partitioned engine: one thread per partition, two barriers per generation.

mod barrier;
mod engine;
mod partition;
mod shared;

pub use barrier::{BarrierWaitResult, BrokenBarrier, GenerationBarrier};
pub use engine::{ApplyStats, EngineConfig, RunReport, SimulationEngine, SnapshotPolicy, apply_rows};
pub use partition::{Partition, partition};
pub use shared::SharedGrid;
