//! ASR module: relays audio to a Whisper-compatible `/asr` endpoint and hands the
//! backend's response back unparsed.

mod client;
mod language;
mod response;
mod types;

pub use client::{AsrClient, AsrClientBuilder};
pub use language::Language;
pub use response::BackendResponse;
pub use types::{AudioPayload, OutputFormat, Task, TranscriptionOptions, AUDIO_FIELD_NAME};
