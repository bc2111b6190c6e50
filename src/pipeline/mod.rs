//! Resolver output flows strictly forward through these stages:
//! normalize -> filter -> present/export. Only `cache` holds state.

pub mod cache;
pub mod export;
pub mod filter;
pub mod normalize;
pub mod present;

pub use cache::{DatasetCache, LoadedDataset};
pub use filter::{FilteredView, ViewRequest};
pub use normalize::{AdizPolicy, NormalizeOptions, NormalizeReport, Normalizer};
