//! Project configuration loaded from `.regseal.toml`.

pub mod settings;

pub use settings::Settings;
