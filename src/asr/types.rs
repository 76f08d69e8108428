//! Request-side types for a transcription call.

use super::language::Language;
use crate::{Error, ErrorContext, Result};
use bytes::Bytes;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Multipart field name the backend reads the audio from.
pub const AUDIO_FIELD_NAME: &str = "audio_file";

const DEFAULT_FILE_NAME: &str = "audio.wav";
const DEFAULT_MIME: &str = "application/octet-stream";

/// What the backend should do with the speech.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Task {
    /// Transcribe in the spoken language.
    #[default]
    Transcribe,
    /// Translate the speech to English.
    Translate,
}

impl Task {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transcribe => "transcribe",
            Self::Translate => "translate",
        }
    }
}

impl FromStr for Task {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "transcribe" => Ok(Self::Transcribe),
            "translate" => Ok(Self::Translate),
            _ => Err(Error::validation_with_context(
                "task must be 'transcribe' or 'translate'",
                ErrorContext::new()
                    .with_field_path("task")
                    .with_details(s.to_string()),
            )),
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Response format requested from the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Txt,
    Vtt,
    Srt,
    Tsv,
    Json,
}

impl OutputFormat {
    pub const ALL: &'static [OutputFormat] = &[
        OutputFormat::Txt,
        OutputFormat::Vtt,
        OutputFormat::Srt,
        OutputFormat::Tsv,
        OutputFormat::Json,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Txt => "txt",
            Self::Vtt => "vtt",
            Self::Srt => "srt",
            Self::Tsv => "tsv",
            Self::Json => "json",
        }
    }

    /// Media type a backend conventionally answers with for this format.
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Txt => "text/plain",
            Self::Vtt => "text/vtt",
            Self::Srt => "application/x-subrip",
            Self::Tsv => "text/tab-separated-values",
            Self::Json => "application/json",
        }
    }

    pub fn extension(&self) -> &'static str {
        self.as_str()
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.as_str() == wanted)
            .ok_or_else(|| {
                Error::validation_with_context(
                    "output must be one of txt, vtt, srt, tsv, json",
                    ErrorContext::new()
                        .with_field_path("output")
                        .with_details(s.to_string()),
                )
            })
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Non-file parameters of a transcription request, sent as query parameters.
///
/// Only `task` and `output` are mandatory. Field order here is the order of the
/// query string; `None` fields are left out of the request entirely so the backend
/// applies its own default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TranscriptionOptions {
    pub task: Task,
    pub output: OutputFormat,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encode: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vad_filter: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_timestamps: Option<bool>,
}

impl TranscriptionOptions {
    pub fn new(task: Task, output: OutputFormat) -> Self {
        Self {
            task,
            output,
            ..Default::default()
        }
    }

    pub fn encode(mut self, encode: bool) -> Self {
        self.encode = Some(encode);
        self
    }

    pub fn language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }

    pub fn initial_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.initial_prompt = Some(prompt.into());
        self
    }

    pub fn vad_filter(mut self, enable: bool) -> Self {
        self.vad_filter = Some(enable);
        self
    }

    pub fn word_timestamps(mut self, enable: bool) -> Self {
        self.word_timestamps = Some(enable);
        self
    }
}

/// One audio file, forwarded to the backend as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioPayload {
    data: Bytes,
    file_name: String,
    mime_type: Option<String>,
}

impl AudioPayload {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            file_name: DEFAULT_FILE_NAME.to_string(),
            mime_type: None,
        }
    }

    /// Read a file from disk, keeping its file name for the multipart part.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await?;
        let mut payload = Self::new(data);
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            payload.file_name = name.to_string();
        }
        Ok(payload)
    }

    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = name.into();
        self
    }

    pub fn with_mime_type(mut self, mime: impl Into<String>) -> Self {
        self.mime_type = Some(mime.into());
        self
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn mime_type(&self) -> &str {
        self.mime_type.as_deref().unwrap_or(DEFAULT_MIME)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Multipart body holding this payload as its single file field.
    pub(crate) fn to_form(&self) -> Result<reqwest::multipart::Form> {
        // `Bytes` clones share the buffer; the audio is never copied.
        let part = reqwest::multipart::Part::stream_with_length(
            self.data.clone(),
            self.data.len() as u64,
        )
            .file_name(self.file_name.clone())
            .mime_str(self.mime_type())
            .map_err(|e| {
                Error::validation_with_context(
                    format!("Invalid mime: {}", e),
                    ErrorContext::new()
                        .with_field_path("audio.mime_type")
                        .with_details(self.mime_type().to_string()),
                )
            })?;
        Ok(reqwest::multipart::Form::new().part(AUDIO_FIELD_NAME, part))
    }
}
