//! Background engine driving generation subprocesses.

mod generator;

pub use generator::GenerationSupervisor;
