pub mod camelot;
pub mod mix;
pub mod track;

pub use camelot::Relation;
pub use mix::{Mix, MixesMap, SelectionError, StyleOrder, TrackSet};
pub use track::{Track, TrackId, TrackInfo, TrackRecord};
