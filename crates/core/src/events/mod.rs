//! Classification events module.
//!
//! Provides the record type and the sink trait the engine emits to after a
//! successful classification. Storage adapters implement the sink.

mod classification_record;
mod sink;

pub use classification_record::*;
pub use sink::*;
