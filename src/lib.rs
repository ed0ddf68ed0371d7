pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::TomlConfig;

pub use crate::adapters::{JsonFileStore, MemoryStore};
pub use crate::core::engine::{DrawSettings, GroupEngine};
pub use crate::core::spinner::Spinner;
pub use crate::domain::model::{Group, ReservedSlotMap, SiteState, Student};
pub use crate::domain::ports::{ConfigProvider, StateStore};
pub use crate::utils::error::{GroupError, Result};
