pub mod audio;
pub mod audit;
pub mod coaching;
pub mod config;
pub mod error;
pub mod provider;
pub mod resume;
pub mod scripts;
pub mod speech;
pub mod telemetry;
pub mod trainer;
