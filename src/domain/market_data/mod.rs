//! Market data aggregate containing entities, services and value objects.

pub mod entities;
pub mod repositories;
pub mod services;
pub mod value_objects;

pub use entities::*;
pub use repositories::PriceHistoryRepository;
pub use services::{DEFAULT_BATCH_SEPARATOR, FetchPlan, merge_histories};
pub use value_objects::*;
