#[macro_use]
extern crate lazy_static;

pub mod config;
pub mod constants;
pub mod error;
pub mod observables;
pub mod process;
pub mod theory;
pub mod utils;

pub use config::PredictionConfig;
pub use error::{ObservableError, Result};
pub use process::{Lepton, Meson, Process};
