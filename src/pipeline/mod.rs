//! The dubbing pipeline: sequential stages over one timeline.
//!
//! One request runs one linear sequence of stages — build, align, translate,
//! redistribute, composite, mix — with no stage-level concurrency. The
//! orchestrator drives the sequence and owns the request's scratch
//! artifacts.

pub mod compositor;
pub mod mixer;
pub mod orchestrator;
pub mod redistribute;
pub mod translate;

pub use compositor::composite_vocal_track;
pub use mixer::{mix, mix_with_gain};
pub use orchestrator::{DubRequest, DubbingPipeline};
pub use redistribute::{SpeakerSynthesis, redistribute_speaker_audio};
pub use translate::translate_segments;
