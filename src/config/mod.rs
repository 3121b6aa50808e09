//! Configuration loading for ezpass.

pub mod settings;

pub use settings::Settings;
