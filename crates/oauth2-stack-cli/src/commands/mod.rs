pub mod config;
pub mod outputs;
pub mod synth;
pub mod validate;
