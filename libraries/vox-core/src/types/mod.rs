mod audio;
mod result;

pub use audio::{peak, AudioSignal, SampleRate};
pub use result::{Payload, ProcessingResult};
