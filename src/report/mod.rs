//! Report module - terminal rendering and exports of classification results

pub mod bundle;
pub mod export;
pub mod json_export;
pub mod map_export;
pub mod summary;
pub mod table;

pub use bundle::*;
pub use export::*;
pub use json_export::*;
pub use map_export::*;
pub use summary::*;
pub use table::*;
