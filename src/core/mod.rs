pub mod constraint;
pub mod draw;
pub mod engine;
pub mod export;
pub mod finalize;
pub mod pool;
pub mod session;
pub mod spinner;
pub mod store;

pub use crate::domain::model::{Group, ReservedSlotMap, SiteState, Student};
pub use crate::domain::ports::{ConfigProvider, StateStore};
pub use crate::utils::error::Result;
