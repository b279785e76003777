//! Client layer: orchestrates transport calls and maps transport ↔ domain.

mod events;

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::domain::{
    AnswerCallback, DeleteMessages, EditText, Event, FileId, FileSource, FileUpload, PollTime,
    SendFile, SendFileResponse, SendText, SendTextResponse, SendVoice, Token, ValidationError,
};
use crate::transport::{Params, Reply, TransportError};

pub use events::EventStream;

const DEFAULT_API_URL: &str = "https://myteam.mail.ru/bot/v1";

// Extra time granted to `events/get` on top of `pollTime` before the HTTP client gives up.
const POLL_TIMEOUT_SLACK: Duration = Duration::from_secs(5);

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HttpMethod {
    Get,
    Post,
}

#[derive(Debug, Clone)]
struct HttpRequest {
    method: HttpMethod,
    url: Url,
    upload: Option<FileUpload>,
    timeout: Option<Duration>,
}

#[derive(Debug, Clone)]
struct HttpResponse {
    status: u16,
    body: String,
}

trait HttpTransport: Send + Sync {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let method = match request.method {
                HttpMethod::Get => reqwest::Method::GET,
                HttpMethod::Post => reqwest::Method::POST,
            };
            let mut builder = self.client.request(method, request.url);
            if let Some(timeout) = request.timeout {
                builder = builder.timeout(timeout);
            }
            if let Some(upload) = request.upload {
                let (filename, contents) = upload.into_parts();
                let part = reqwest::multipart::Part::bytes(contents).file_name(filename);
                builder = builder.multipart(reqwest::multipart::Form::new().part("file", part));
            }
            let response = builder.send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`VkTeamsClient`].
///
/// This error preserves:
/// - HTTP-level failures (non-2xx status or transport failures),
/// - API-level failures (`"ok": false` with the server description),
/// - validation/parse failures.
pub enum VkTeamsError {
    /// HTTP client / transport failure (DNS, TLS, timeouts, etc).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// Non-successful HTTP status code returned by the server.
    #[error("unexpected HTTP status: {status}")]
    HttpStatus { status: u16, body: Option<String> },

    /// The Bot API answered `"ok": false`.
    #[error("response status is not ok: {}", .description.as_deref().unwrap_or("no description"))]
    Api { description: Option<String> },

    /// Response body could not be parsed as the expected format.
    #[error("parse error: {0}")]
    Parse(#[source] Box<dyn StdError + Send + Sync>),

    /// Request parameters could not be encoded.
    #[error("encode error: {0}")]
    Encode(#[source] Box<dyn StdError + Send + Sync>),

    /// The configured API URL is not a valid base URL.
    #[error("invalid API url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl From<TransportError> for VkTeamsError {
    fn from(value: TransportError) -> Self {
        match value {
            TransportError::Encode { .. } => Self::Encode(Box::new(value)),
            TransportError::Json(_) | TransportError::MissingField { .. } => {
                Self::Parse(Box::new(value))
            }
        }
    }
}

fn into_result<T>(reply: Reply<T>) -> Result<T, VkTeamsError> {
    match reply {
        Reply::Ok(value) => Ok(value),
        Reply::NotOk { description } => Err(VkTeamsError::Api { description }),
    }
}

#[derive(Debug, Clone)]
/// Builder for [`VkTeamsClient`].
///
/// Use this when you need to customize the API url, timeouts, user-agent or poll time.
pub struct VkTeamsClientBuilder {
    token: Token,
    api_url: String,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    poll_time: PollTime,
}

impl VkTeamsClientBuilder {
    /// Create a builder with the default API url and poll time.
    pub fn new(token: Token) -> Self {
        Self {
            token,
            api_url: DEFAULT_API_URL.to_owned(),
            timeout: None,
            user_agent: None,
            poll_time: PollTime::default(),
        }
    }

    /// Override the Bot API base url, e.g. `https://api.internal.myteam.mail.ru/bot/v1`
    /// for on-premise installations.
    pub fn api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Set an HTTP client timeout applied to every request.
    ///
    /// `events/get` overrides it with `pollTime` plus a few seconds, so a short timeout
    /// does not break long polling.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// How long the server may hold each poll of [`VkTeamsClient::subscribe`].
    pub fn poll_time(mut self, poll_time: PollTime) -> Self {
        self.poll_time = poll_time;
        self
    }

    /// Build a [`VkTeamsClient`].
    pub fn build(self) -> Result<VkTeamsClient, VkTeamsError> {
        let api_url = self.api_url.trim_end_matches('/').to_owned();
        Url::parse(&api_url)?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        let client = builder
            .build()
            .map_err(|err| VkTeamsError::Transport(Box::new(err)))?;

        Ok(VkTeamsClient {
            token: self.token,
            api_url,
            poll_time: self.poll_time,
            http: Arc::new(ReqwestTransport { client }),
        })
    }
}

#[derive(Clone)]
/// High-level VK Teams Bot API client.
///
/// This type orchestrates query encoding, the `token` parameter and response parsing.
/// By default it talks to `https://myteam.mail.ru/bot/v1`. Cloning is cheap and clones
/// share the underlying HTTP connection pool.
pub struct VkTeamsClient {
    token: Token,
    api_url: String,
    poll_time: PollTime,
    http: Arc<dyn HttpTransport>,
}

impl std::fmt::Debug for VkTeamsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VkTeamsClient")
            .field("api_url", &self.api_url)
            .field("poll_time", &self.poll_time)
            .finish_non_exhaustive()
    }
}

impl VkTeamsClient {
    /// Create a client using the default API url.
    ///
    /// For more customization, use [`VkTeamsClient::builder`].
    pub fn new(token: Token) -> Self {
        Self {
            token,
            api_url: DEFAULT_API_URL.to_owned(),
            poll_time: PollTime::default(),
            http: Arc::new(ReqwestTransport {
                client: reqwest::Client::new(),
            }),
        }
    }

    /// Start building a client with custom settings.
    pub fn builder(token: Token) -> VkTeamsClientBuilder {
        VkTeamsClientBuilder::new(token)
    }

    /// Send a text message (`messages/sendText`).
    ///
    /// Errors:
    /// - [`VkTeamsError::HttpStatus`] for non-2xx HTTP responses,
    /// - [`VkTeamsError::Api`] when the server answers `"ok": false`,
    /// - [`VkTeamsError::Parse`] when the reply is malformed or lacks `msgId`.
    pub async fn send_text(&self, request: SendText) -> Result<SendTextResponse, VkTeamsError> {
        let params = crate::transport::encode_send_text_query(&request)?;
        let body = self
            .call(HttpMethod::Get, "/messages/sendText", params, None, None)
            .await?;
        into_result(crate::transport::decode_send_text_json_response(&body)?)
    }

    /// Send a file (`messages/sendFile`), either uploading new contents or resending an
    /// existing [`crate::FileId`].
    pub async fn send_file(&self, request: SendFile) -> Result<SendFileResponse, VkTeamsError> {
        let params = crate::transport::encode_send_file_query(&request)?;
        let requested = existing_file_id(request.source());
        let upload = request.into_upload();
        self.send_file_like("/messages/sendFile", params, requested, upload)
            .await
    }

    /// Send a voice message (`messages/sendVoice`).
    pub async fn send_voice(&self, request: SendVoice) -> Result<SendFileResponse, VkTeamsError> {
        let params = crate::transport::encode_send_voice_query(&request)?;
        let requested = existing_file_id(request.source());
        let upload = request.into_upload();
        self.send_file_like("/messages/sendVoice", params, requested, upload)
            .await
    }

    /// Replace the text (and keyboard) of a message the bot sent (`messages/editText`).
    pub async fn edit_text(&self, request: EditText) -> Result<(), VkTeamsError> {
        let params = crate::transport::encode_edit_text_query(&request)?;
        let body = self
            .call(HttpMethod::Get, "/messages/editText", params, None, None)
            .await?;
        into_result(crate::transport::decode_status_json_response(&body)?)
    }

    /// Delete messages (`messages/deleteMessages`).
    pub async fn delete_messages(&self, request: DeleteMessages) -> Result<(), VkTeamsError> {
        let params = crate::transport::encode_delete_messages_query(&request);
        let body = self
            .call(HttpMethod::Get, "/messages/deleteMessages", params, None, None)
            .await?;
        into_result(crate::transport::decode_status_json_response(&body)?)
    }

    /// Answer a button press (`messages/answerCallbackQuery`).
    pub async fn answer_callback(&self, request: AnswerCallback) -> Result<(), VkTeamsError> {
        let params = crate::transport::encode_answer_callback_query(&request);
        let body = self
            .call(
                HttpMethod::Get,
                "/messages/answerCallbackQuery",
                params,
                None,
                None,
            )
            .await?;
        into_result(crate::transport::decode_status_json_response(&body)?)
    }

    /// Fetch events newer than `last_event_id` (`events/get`).
    ///
    /// The server holds the request for up to `poll_time` when nothing is pending and
    /// answers as soon as an event exists. Events come oldest first. An `"ok": false`
    /// reply is reported as [`VkTeamsError::Api`].
    pub async fn get_events(
        &self,
        last_event_id: u64,
        poll_time: PollTime,
    ) -> Result<Vec<Event>, VkTeamsError> {
        let params = crate::transport::encode_get_events_query(last_event_id, poll_time);
        let timeout = poll_time.as_duration() + POLL_TIMEOUT_SLACK;
        let body = self
            .call(HttpMethod::Get, "/events/get", params, None, Some(timeout))
            .await?;
        into_result(crate::transport::decode_events_json_response(&body)?)
    }

    /// Poll time used by [`VkTeamsClient::subscribe`].
    pub fn poll_time(&self) -> PollTime {
        self.poll_time
    }

    async fn send_file_like(
        &self,
        path: &str,
        params: Params,
        requested: Option<FileId>,
        upload: Option<FileUpload>,
    ) -> Result<SendFileResponse, VkTeamsError> {
        let method = if upload.is_some() {
            HttpMethod::Post
        } else {
            HttpMethod::Get
        };
        let body = self.call(method, path, params, upload, None).await?;
        into_result(crate::transport::decode_send_file_json_response(requested.as_ref(), &body)?)
    }

    async fn call(
        &self,
        method: HttpMethod,
        path: &str,
        params: Params,
        upload: Option<FileUpload>,
        timeout: Option<Duration>,
    ) -> Result<String, VkTeamsError> {
        let url = self.request_url(path, params)?;
        tracing::debug!(?method, path, "sending request");

        let response = self
            .http
            .execute(HttpRequest {
                method,
                url,
                upload,
                timeout,
            })
            .await
            .map_err(VkTeamsError::Transport)?;

        if !(200..=299).contains(&response.status) {
            let body = if response.body.trim().is_empty() {
                None
            } else {
                Some(response.body)
            };
            return Err(VkTeamsError::HttpStatus {
                status: response.status,
                body,
            });
        }

        Ok(response.body)
    }

    fn request_url(&self, path: &str, params: Params) -> Result<Url, VkTeamsError> {
        let mut url = Url::parse(&format!("{}{}", self.api_url, path))?;
        url.query_pairs_mut()
            .extend_pairs(params)
            .append_pair(Token::FIELD, self.token.as_str());
        Ok(url)
    }
}

fn existing_file_id(source: &FileSource) -> Option<FileId> {
    match source {
        FileSource::Existing(file_id) => Some(file_id.clone()),
        FileSource::Upload(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use crate::domain::{ChatId, MessageText, MsgId, QueryId};

    use super::*;

    #[derive(Debug, Clone)]
    struct FakeTransport {
        state: Arc<Mutex<FakeTransportState>>,
    }

    #[derive(Debug)]
    struct FakeTransportState {
        last_request: Option<HttpRequest>,
        response_status: u16,
        response_body: String,
    }

    impl FakeTransport {
        fn new(response_status: u16, response_body: impl Into<String>) -> Self {
            Self {
                state: Arc::new(Mutex::new(FakeTransportState {
                    last_request: None,
                    response_status,
                    response_body: response_body.into(),
                })),
            }
        }

        fn last_request(&self) -> HttpRequest {
            let state = self.state.lock().unwrap();
            state.last_request.clone().expect("no request was sent")
        }
    }

    impl HttpTransport for FakeTransport {
        fn execute<'a>(
            &'a self,
            request: HttpRequest,
        ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
            Box::pin(async move {
                let (status, body) = {
                    let mut state = self.state.lock().unwrap();
                    state.last_request = Some(request);
                    (state.response_status, state.response_body.clone())
                };
                Ok(HttpResponse { status, body })
            })
        }
    }

    fn query(request: &HttpRequest) -> HashMap<String, Vec<String>> {
        let mut query = HashMap::<String, Vec<String>>::new();
        for (key, value) in request.url.query_pairs() {
            query.entry(key.into_owned()).or_default().push(value.into_owned());
        }
        query
    }

    fn assert_param(request: &HttpRequest, key: &str, value: &str) {
        let query = query(request);
        assert!(
            query.get(key).is_some_and(|values| values.iter().any(|v| v == value)),
            "missing param {key}={value}; got: {query:?}"
        );
    }

    fn make_client(transport: FakeTransport) -> VkTeamsClient {
        VkTeamsClient {
            token: Token::new("test-token").unwrap(),
            api_url: "https://example.invalid/bot/v1".to_owned(),
            poll_time: PollTime::default(),
            http: Arc::new(transport),
        }
    }

    fn chat() -> ChatId {
        ChatId::new("user@example.com").unwrap()
    }

    #[tokio::test]
    async fn send_text_includes_token_and_parses_msg_id() {
        let transport = FakeTransport::new(200, r#"{"ok": true, "msgId": "57883346846815032"}"#);
        let client = make_client(transport.clone());

        let request = SendText::new(chat(), MessageText::new("hello").unwrap());
        let response = client.send_text(request).await.unwrap();
        assert_eq!(response.msg_id.as_str(), "57883346846815032");

        let sent = transport.last_request();
        assert_eq!(sent.method, HttpMethod::Get);
        assert_eq!(sent.url.path(), "/bot/v1/messages/sendText");
        assert_param(&sent, "token", "test-token");
        assert_param(&sent, "chatId", "user@example.com");
        assert_param(&sent, "text", "hello");
        assert!(sent.upload.is_none());
        assert!(sent.timeout.is_none());
    }

    #[tokio::test]
    async fn send_text_maps_not_ok_to_described_api_error() {
        let transport =
            FakeTransport::new(200, r#"{"ok": false, "description": "Invalid chatId"}"#);
        let client = make_client(transport);

        let err = client
            .send_text(SendText::new(chat(), MessageText::new("hello").unwrap()))
            .await
            .unwrap_err();
        match err {
            VkTeamsError::Api { description } => {
                assert_eq!(description.as_deref(), Some("Invalid chatId"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn api_error_display_includes_description() {
        let err = VkTeamsError::Api {
            description: Some("Invalid chatId".to_owned()),
        };
        assert_eq!(err.to_string(), "response status is not ok: Invalid chatId");
        let err = VkTeamsError::Api { description: None };
        assert_eq!(err.to_string(), "response status is not ok: no description");
    }

    #[tokio::test]
    async fn send_text_maps_non_success_http_status() {
        let transport = FakeTransport::new(500, "oops");
        let client = make_client(transport);

        let err = client
            .send_text(SendText::new(chat(), MessageText::new("hello").unwrap()))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            VkTeamsError::HttpStatus {
                status: 500,
                body: Some(_)
            }
        ));
    }

    #[tokio::test]
    async fn send_text_maps_empty_http_body_to_none() {
        let transport = FakeTransport::new(503, "   ");
        let client = make_client(transport);

        let err = client
            .send_text(SendText::new(chat(), MessageText::new("hello").unwrap()))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            VkTeamsError::HttpStatus {
                status: 503,
                body: None
            }
        ));
    }

    #[tokio::test]
    async fn send_text_maps_invalid_json_to_parse_error() {
        let transport = FakeTransport::new(200, "{ not json }");
        let client = make_client(transport);

        let err = client
            .send_text(SendText::new(chat(), MessageText::new("hello").unwrap()))
            .await
            .unwrap_err();
        assert!(matches!(err, VkTeamsError::Parse(_)));
    }

    #[tokio::test]
    async fn send_file_upload_posts_multipart() {
        let transport = FakeTransport::new(
            200,
            r#"{"ok": true, "msgId": "1", "fileId": "0dC2"}"#,
        );
        let client = make_client(transport.clone());

        let upload = FileUpload::new("report.txt", b"contents".to_vec()).unwrap();
        let request = SendFile::new(chat(), FileSource::Upload(upload)).with_caption("weekly");
        let response = client.send_file(request).await.unwrap();
        assert_eq!(response.file_id, Some(FileId::new("0dC2").unwrap()));

        let sent = transport.last_request();
        assert_eq!(sent.method, HttpMethod::Post);
        assert_eq!(sent.url.path(), "/bot/v1/messages/sendFile");
        assert_param(&sent, "caption", "weekly");
        assert!(!query(&sent).contains_key("fileId"));
        let upload = sent.upload.expect("upload attached");
        assert_eq!(upload.filename(), "report.txt");
        assert_eq!(upload.contents(), b"contents");
    }

    #[tokio::test]
    async fn send_voice_with_existing_file_uses_get() {
        let transport = FakeTransport::new(200, r#"{"ok": true, "msgId": "2"}"#);
        let client = make_client(transport.clone());

        let file_id = FileId::new("voice-1").unwrap();
        let request = SendVoice::new(chat(), FileSource::Existing(file_id.clone()));
        let response = client.send_voice(request).await.unwrap();
        assert_eq!(response.msg_id.as_str(), "2");
        assert_eq!(response.file_id, Some(file_id));

        let sent = transport.last_request();
        assert_eq!(sent.method, HttpMethod::Get);
        assert_eq!(sent.url.path(), "/bot/v1/messages/sendVoice");
        assert_param(&sent, "fileId", "voice-1");
        assert!(sent.upload.is_none());
    }

    #[tokio::test]
    async fn edit_delete_and_answer_use_their_endpoints() {
        let transport = FakeTransport::new(200, r#"{"ok": true}"#);
        let client = make_client(transport.clone());

        client
            .edit_text(EditText::new(
                chat(),
                MsgId::new("5").unwrap(),
                MessageText::new("new text").unwrap(),
            ))
            .await
            .unwrap();
        let sent = transport.last_request();
        assert_eq!(sent.url.path(), "/bot/v1/messages/editText");
        assert_param(&sent, "msgId", "5");

        client
            .delete_messages(
                DeleteMessages::new(chat(), vec![MsgId::new("5").unwrap(), MsgId::new("6").unwrap()])
                    .unwrap(),
            )
            .await
            .unwrap();
        let sent = transport.last_request();
        assert_eq!(sent.url.path(), "/bot/v1/messages/deleteMessages");
        assert_eq!(query(&sent).get("msgId").map(Vec::len), Some(2));

        client
            .answer_callback(AnswerCallback::new(QueryId::new("SVR:1").unwrap()).with_text("ok"))
            .await
            .unwrap();
        let sent = transport.last_request();
        assert_eq!(sent.url.path(), "/bot/v1/messages/answerCallbackQuery");
        assert_param(&sent, "queryId", "SVR:1");
        assert_param(&sent, "token", "test-token");
    }

    #[tokio::test]
    async fn get_events_sets_cursor_and_long_poll_timeout() {
        let transport = FakeTransport::new(
            200,
            r#"{"ok": true, "events": [{"eventId": 3, "type": "newMessage", "payload": {}}]}"#,
        );
        let client = make_client(transport.clone());

        let events = client
            .get_events(2, PollTime::new(60).unwrap())
            .await
            .unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, 3);

        let sent = transport.last_request();
        assert_eq!(sent.url.path(), "/bot/v1/events/get");
        assert_param(&sent, "lastEventId", "2");
        assert_param(&sent, "pollTime", "60");
        assert_eq!(sent.timeout, Some(Duration::from_secs(65)));
    }

    #[tokio::test]
    async fn get_events_treats_not_ok_as_error() {
        let transport = FakeTransport::new(200, r#"{"ok": false, "description": "Invalid token"}"#);
        let client = make_client(transport);

        let err = client
            .get_events(0, PollTime::default())
            .await
            .unwrap_err();
        assert!(matches!(err, VkTeamsError::Api { .. }));
    }

    #[test]
    fn transport_errors_map_to_parse_or_encode() {
        let json_error = || serde_json::from_str::<u8>("x").unwrap_err();

        let err = VkTeamsError::from(TransportError::Json(json_error()));
        assert!(matches!(err, VkTeamsError::Parse(_)));

        let err = VkTeamsError::from(TransportError::Encode {
            field: "inlineKeyboardMarkup",
            source: json_error(),
        });
        assert!(matches!(err, VkTeamsError::Encode(_)));
        assert!(err.to_string().contains("inlineKeyboardMarkup"));
    }

    #[test]
    fn builder_applies_overrides_and_trims_url() {
        let client = VkTeamsClient::builder(Token::new("key").unwrap())
            .api_url("https://example.invalid/bot/v1/")
            .poll_time(PollTime::new(10).unwrap())
            .timeout(Duration::from_secs(3))
            .user_agent("test-agent")
            .build()
            .unwrap();
        assert_eq!(client.api_url, "https://example.invalid/bot/v1");
        assert_eq!(client.poll_time().seconds(), 10);
    }

    #[test]
    fn builder_rejects_invalid_url() {
        let err = VkTeamsClient::builder(Token::new("key").unwrap())
            .api_url("not a url")
            .build()
            .unwrap_err();
        assert!(matches!(err, VkTeamsError::InvalidUrl(_)));
    }

    #[test]
    fn debug_output_hides_token() {
        let client = make_client(FakeTransport::new(200, "{}"));
        let debug = format!("{client:?}");
        assert!(!debug.contains("test-token"));
    }
}
