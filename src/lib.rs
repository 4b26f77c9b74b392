#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod gedcom;
pub mod ir;
pub mod layout;
pub mod render;
pub mod snapshot;
pub mod theme;
pub mod worker;

#[cfg(feature = "cli")]
pub use cli::run;
