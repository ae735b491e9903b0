pub mod settings;

pub use settings::{Settings, CONFIG_PATH_ENV, PROGRAM_ENV};
