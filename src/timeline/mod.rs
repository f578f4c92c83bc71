//! The segment timeline: the canonical per-request model every stage reads
//! from and writes back onto.

pub mod aligner;
pub mod builder;
pub mod segment;

pub use aligner::align_transcript;
pub use builder::build_timeline;
pub use segment::{Segment, SegmentKind, Timeline};
