pub mod catalog;
pub mod generation_store;
pub mod mix_generator;
pub mod sequence_search;
pub mod subsets;

pub use catalog::{Catalog, CatalogError, CatalogStore};
pub use generation_store::{Generation, GenerationStore};
pub use mix_generator::{GenerationError, GenerationLimits, MixGenerator};
