//! Audio primitives: the in-memory buffer model and WAV file I/O.

pub mod buffer;
pub mod wav;

pub use buffer::AudioBuffer;
pub use wav::{read_wav, write_wav};
