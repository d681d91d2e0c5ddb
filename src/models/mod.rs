pub mod assemblyai;
pub mod audio;
pub mod job;
pub mod sentiment;

pub use assemblyai::*;
pub use audio::*;
pub use job::*;
pub use sentiment::*;
