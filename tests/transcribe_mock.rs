//! Integration tests for `AsrClient::transcribe` against a mock ASR backend.

use mockito::{Matcher, Mock, Server, ServerGuard};
use std::time::{Duration, Instant};
use whisper_asr_client::{
    AsrClient, AudioPayload, Error, Language, OutputFormat, Task, TranscriptionOptions,
};

/// Mock backend that sits behind the `/whisper` prefix, as a reverse proxy would expose it.
struct MockServerFixture {
    server: ServerGuard,
}

impl MockServerFixture {
    async fn new() -> Self {
        Self {
            server: Server::new_async().await,
        }
    }

    fn client(&self) -> AsrClient {
        AsrClient::builder()
            .base_url(self.server.url())
            .base_path("/whisper")
            .build()
            .expect("client should build against mock server")
    }

    /// Mock for a successful transcription whose multipart body must contain `marker`.
    async fn mock_transcription(&mut self, marker: &str, content_type: &str, body: &str) -> Mock {
        self.server
            .mock("POST", "/whisper/asr")
            .match_header(
                "content-type",
                Matcher::Regex("^multipart/form-data; boundary=".to_string()),
            )
            .match_body(Matcher::Regex(regex::escape(marker)))
            .with_status(200)
            .with_header("content-type", content_type)
            .with_body(body)
            .expect(1)
            .create_async()
            .await
    }

    async fn mock_error(&mut self, status: usize, body: &str) -> Mock {
        self.server
            .mock("POST", "/whisper/asr")
            .with_status(status)
            .with_body(body)
            .expect(1)
            .create_async()
            .await
    }
}

/// The whole multipart body: one part named `audio_file` carrying `content`, then the closing boundary.
fn single_part_body(file_name: &str, content: &str) -> String {
    format!(
        "(?s)\\A--[0-9a-f-]+\r\nContent-Disposition: form-data; name=\"audio_file\"; filename=\"{}\"\r\nContent-Type: [^\r\n]+\r\n\r\n{}\r\n--[0-9a-f-]+--\r\n\\z",
        regex::escape(file_name),
        regex::escape(content),
    )
}

#[tokio::test]
async fn vtt_body_is_returned_verbatim() {
    let mut fixture = MockServerFixture::new().await;
    let vtt = "WEBVTT\n\n00:00.000 --> 00:02.000\nhello";
    let mock = fixture.mock_transcription("RIFFhello", "text/vtt", vtt).await;

    let options = TranscriptionOptions::new(Task::Transcribe, OutputFormat::Vtt);
    let response = fixture
        .client()
        .transcribe(&options, &AudioPayload::new(&b"RIFFhello"[..]))
        .await
        .expect("transcription should succeed");

    mock.assert_async().await;
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().unwrap(), vtt);
    assert_eq!(response.content_type(), Some("text/vtt"));
}

#[tokio::test]
async fn json_output_is_not_reformatted() {
    let mut fixture = MockServerFixture::new().await;
    // Odd spacing must survive untouched.
    let raw = r#"{ "text" : " hi",  "language":"en" }"#;
    let mock = fixture
        .mock_transcription("clip", "application/json", raw)
        .await;

    let options = TranscriptionOptions::new(Task::Transcribe, OutputFormat::Json);
    let response = fixture
        .client()
        .transcribe(&options, &AudioPayload::new(&b"clip"[..]))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(response.bytes().as_ref(), raw.as_bytes());
    assert_eq!(response.json().unwrap()["text"], " hi");
}

#[tokio::test]
async fn query_carries_only_present_options() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("POST", "/whisper/asr")
        .match_query(Matcher::Exact(
            "task=translate&output=json&vad_filter=true".to_string(),
        ))
        .with_status(200)
        .with_body("{}")
        .expect(1)
        .create_async()
        .await;

    let options = TranscriptionOptions::new(Task::Translate, OutputFormat::Json).vad_filter(true);
    fixture
        .client()
        .transcribe(&options, &AudioPayload::new(&b"RIFF"[..]))
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn query_carries_every_option_when_set() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("POST", "/whisper/asr")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("encode".into(), "false".into()),
            Matcher::UrlEncoded("task".into(), "transcribe".into()),
            Matcher::UrlEncoded("language".into(), "yue".into()),
            Matcher::UrlEncoded("initial_prompt".into(), "粤语, 会议 & notes".into()),
            Matcher::UrlEncoded("vad_filter".into(), "false".into()),
            Matcher::UrlEncoded("word_timestamps".into(), "true".into()),
            Matcher::UrlEncoded("output".into(), "tsv".into()),
        ]))
        .with_status(200)
        .with_body("start\tend\ttext\n")
        .expect(1)
        .create_async()
        .await;

    let options = TranscriptionOptions::new(Task::Transcribe, OutputFormat::Tsv)
        .encode(false)
        .language(Language::Cantonese)
        .initial_prompt("粤语, 会议 & notes")
        .word_timestamps(true);
    let response = fixture
        .client()
        .transcribe(&options, &AudioPayload::new(&b"RIFF"[..]))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(response.text().unwrap(), "start\tend\ttext\n");
}

#[tokio::test]
async fn body_is_a_single_file_part() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("POST", "/whisper/asr")
        .match_body(Matcher::Regex(single_part_body("talk.wav", "RIFFdata")))
        .with_status(200)
        .with_body("ok")
        .expect(1)
        .create_async()
        .await;

    let audio = AudioPayload::new(&b"RIFFdata"[..])
        .with_file_name("talk.wav")
        .with_mime_type("audio/wav");
    fixture
        .client()
        .transcribe(&TranscriptionOptions::default(), &audio)
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn empty_payload_is_forwarded() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("POST", "/whisper/asr")
        .match_body(Matcher::Regex(single_part_body("audio.wav", "")))
        .with_status(200)
        .with_body("")
        .expect(1)
        .create_async()
        .await;

    let response = fixture
        .client()
        .transcribe(&TranscriptionOptions::default(), &AudioPayload::new(Vec::<u8>::new()))
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(response.bytes().is_empty());
}

#[tokio::test]
async fn server_error_surfaces_status() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture.mock_error(500, "model crashed").await;

    let err = fixture
        .client()
        .transcribe(&TranscriptionOptions::default(), &AudioPayload::new(&b"RIFF"[..]))
        .await
        .unwrap_err();

    // Exactly one attempt, no retry.
    mock.assert_async().await;
    assert!(matches!(err, Error::Transport(_)), "got {:?}", err);
    assert_eq!(err.status(), Some(500));
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn client_error_surfaces_status() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture.mock_error(422, r#"{"detail":"bad audio"}"#).await;

    let err = fixture
        .client()
        .transcribe(&TranscriptionOptions::default(), &AudioPayload::new(&b""[..]))
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert_eq!(err.status(), Some(422));
}

#[tokio::test]
async fn connection_refused_is_transport_error_without_status() {
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let client = AsrClient::builder()
        .base_url(format!("http://{}", addr))
        .build()
        .unwrap();

    let err = client
        .transcribe(&TranscriptionOptions::default(), &AudioPayload::new(&b"RIFF"[..]))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Transport(_)));
    assert_eq!(err.status(), None);
    assert!(err.is_connect());
}

#[tokio::test]
async fn silent_backend_times_out_within_configured_bound() {
    // Accepts connections into the backlog but never answers.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let client = AsrClient::builder()
        .base_url(format!("http://{}", listener.local_addr().unwrap()))
        .timeout(Duration::from_millis(200))
        .build()
        .unwrap();

    let started = Instant::now();
    let err = client
        .transcribe(&TranscriptionOptions::default(), &AudioPayload::new(&b"RIFF"[..]))
        .await
        .unwrap_err();
    let elapsed = started.elapsed();

    assert!(err.is_timeout(), "got {:?}", err);
    assert_eq!(err.status(), None);
    assert!(elapsed >= Duration::from_millis(200), "{:?}", elapsed);
    assert!(elapsed < Duration::from_millis(900), "{:?}", elapsed);
    drop(listener);
}

#[tokio::test]
async fn concurrent_calls_do_not_cross_talk() {
    let mut fixture = MockServerFixture::new().await;
    let first = fixture
        .mock_transcription("payload-one", "text/plain", "first transcript")
        .await;
    let second = fixture
        .mock_transcription("payload-two", "text/plain", "second transcript")
        .await;

    let client = fixture.client();
    let options = TranscriptionOptions::default();
    let audio_one = AudioPayload::new(&b"payload-one"[..]);
    let audio_two = AudioPayload::new(&b"payload-two"[..]);

    let (one, two) = tokio::join!(
        client.transcribe(&options, &audio_one),
        client.transcribe(&options, &audio_two),
    );

    first.assert_async().await;
    second.assert_async().await;
    assert_eq!(one.unwrap().text().unwrap(), "first transcript");
    assert_eq!(two.unwrap().text().unwrap(), "second transcript");
}

#[tokio::test]
async fn cloned_clients_share_nothing_mutable() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("POST", "/whisper/asr")
        .with_status(200)
        .with_body("ok")
        .expect(4)
        .create_async()
        .await;

    let client = fixture.client();
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let client = client.clone();
            tokio::spawn(async move {
                let audio = AudioPayload::new(format!("clip-{i}").into_bytes());
                client
                    .transcribe(&TranscriptionOptions::default(), &audio)
                    .await
                    .map(|r| r.into_bytes())
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap().as_ref(), b"ok");
    }
    mock.assert_async().await;
}
