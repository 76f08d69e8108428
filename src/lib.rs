//! # whisper-asr-client
//!
//! Async client for Whisper-compatible ASR backends that expose `POST /asr`
//! (e.g. `whisper-asr-webservice`).
//!
//! ## Overview
//!
//! The client shapes exactly one request per call: the audio goes into a
//! multipart body under a single file field, the transcription options go into the
//! query string, and the backend's response body is handed back byte-for-byte.
//! There is no retry, caching or parsing in between.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use whisper_asr_client::{AsrClient, AudioPayload, OutputFormat, Task, TranscriptionOptions};
//!
//! #[tokio::main]
//! async fn main() -> whisper_asr_client::Result<()> {
//!     let client = AsrClient::builder()
//!         .base_url("http://127.0.0.1:9000")
//!         .build()?;
//!
//!     let options = TranscriptionOptions::new(Task::Transcribe, OutputFormat::Vtt)
//!         .vad_filter(true);
//!     let audio = AudioPayload::from_file("meeting.wav").await?;
//!
//!     let response = client.transcribe(&options, &audio).await?;
//!     println!("{}", response.text()?);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`asr`] | Client, request options, audio payload and raw response |
//! | [`config`] | Backend address resolution (builder, env, YAML) |
//! | [`transport`] | `reqwest` client construction and transport errors |

pub mod asr;
pub mod config;
pub mod transport;

pub use asr::{
    AsrClient, AsrClientBuilder, AudioPayload, BackendResponse, Language, OutputFormat, Task,
    TranscriptionOptions,
};
pub use config::AsrConfig;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
