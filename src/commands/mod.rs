// Command handlers module
pub mod run;
pub mod sample;
pub mod ticks;
pub mod version;

// Re-exports for cleaner imports
pub use run::execute as run;
pub use sample::execute as sample;
pub use ticks::execute as ticks;
pub use version::execute as version;
