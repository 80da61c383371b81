//! Error types shared by the engines, the world loader and the binary.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LifeError>;

#[derive(Debug, Error)]
pub enum LifeError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The world file declared a different number of live cells than it listed.
    #[error("declared {declared} initial live cells but {supplied} were supplied")]
    State { declared: usize, supplied: usize },

    /// Another participant failed while this worker waited at a generation barrier.
    #[error("generation barrier broken while worker {rank} was waiting")]
    BarrierBroken { rank: usize },

    #[error("worker {rank} panicked")]
    WorkerPanicked { rank: usize },

    #[error("failed to build reference thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("failed to spawn worker {rank}: {source}")]
    Spawn {
        rank: usize,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("worker count must be a positive integer")]
    ZeroWorkers,

    #[error("worker count {workers} exceeds the grid height {height}")]
    TooManyWorkers { workers: usize, height: usize },

    #[error("grid dimensions must be non-zero (got {width}x{height})")]
    EmptyGrid { width: usize, height: usize },

    #[error("a {width}x{height} grid does not fit in memory")]
    GridTooLarge { width: u64, height: u64 },

    #[error("cell ({x}, {y}) lies outside the {width}x{height} grid")]
    CellOutOfBounds {
        x: u64,
        y: u64,
        width: usize,
        height: usize,
    },

    #[error("missing `{0}` in world description")]
    MissingField(&'static str),

    #[error("invalid number {token:?} for `{field}`")]
    InvalidNumber { field: &'static str, token: String },

    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
