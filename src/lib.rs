pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{cli::LocalStorage, CliConfig};

pub use config::toml_config::TomlConfig;
pub use core::engine::ReplayEngine;
pub use core::event::{EventKind, InputEvent, KeyInput, Modifiers, PointerInput};
pub use core::guard::{install_guard, GuardPolicy, DEFAULT_BLOCKED_KEYS};
pub use core::page::Page;
pub use core::pipeline::SuppressionPipeline;
pub use utils::error::{GuardError, Result};
