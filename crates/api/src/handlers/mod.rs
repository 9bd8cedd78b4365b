//! HTTP handlers, grouped by resource. All of them are thin: the domain
//! logic lives in `nanodash_core` and the engine.

pub mod assets;
pub mod gallery;
pub mod generation;
pub mod jobs;
pub mod prompts;
pub mod uploads;
