use crate::domain::validation::ValidationError;
use crate::domain::value::{ChatId, FileId, MessageText, MsgId, QueryId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Text markup understood by the server (`parseMode`).
pub enum ParseMode {
    MarkdownV2,
    Html,
}

impl ParseMode {
    /// Query parameter name used by the Bot API (`parseMode`).
    pub const FIELD: &'static str = "parseMode";

    pub fn as_str(self) -> &'static str {
        match self {
            Self::MarkdownV2 => "MarkdownV2",
            Self::Html => "HTML",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Button color. Buttons without a style are rendered as `Base` by the server.
pub enum ButtonStyle {
    Base,
    Primary,
    Attention,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonAction {
    /// Open a link. Invariant: parses as an absolute URL.
    Url(String),
    /// Emit a `callbackQuery` event carrying this data.
    Callback(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    text: String,
    action: ButtonAction,
    style: Option<ButtonStyle>,
}

impl Button {
    /// Button that opens `url` when pressed.
    pub fn url(text: impl Into<String>, url: impl Into<String>) -> Result<Self, ValidationError> {
        let url = url.into();
        if url::Url::parse(&url).is_err() {
            return Err(ValidationError::InvalidUrl {
                field: "url",
                input: url,
            });
        }
        Self::with_action(text.into(), ButtonAction::Url(url))
    }

    /// Button that produces a callback query with `data` when pressed.
    pub fn callback(
        text: impl Into<String>,
        data: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let data = data.into();
        if data.is_empty() {
            return Err(ValidationError::Empty {
                field: "callbackData",
            });
        }
        Self::with_action(text.into(), ButtonAction::Callback(data))
    }

    fn with_action(text: String, action: ButtonAction) -> Result<Self, ValidationError> {
        if text.trim().is_empty() {
            return Err(ValidationError::Empty { field: "text" });
        }
        Ok(Self {
            text,
            action,
            style: None,
        })
    }

    pub fn styled(mut self, style: ButtonStyle) -> Self {
        self.style = Some(style);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn action(&self) -> &ButtonAction {
        &self.action
    }

    pub fn style(&self) -> Option<ButtonStyle> {
        self.style
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// Inline keyboard attached to a message (`inlineKeyboardMarkup`), as rows of buttons.
pub struct Keyboard {
    rows: Vec<Vec<Button>>,
}

impl Keyboard {
    /// Query parameter name used by the Bot API (`inlineKeyboardMarkup`).
    pub const FIELD: &'static str = "inlineKeyboardMarkup";

    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row. Empty rows are skipped.
    pub fn row(mut self, buttons: impl IntoIterator<Item = Button>) -> Self {
        let row = buttons.into_iter().collect::<Vec<_>>();
        if !row.is_empty() {
            self.rows.push(row);
        }
        self
    }

    pub fn rows(&self) -> &[Vec<Button>] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Message to forward along with the new one (`forwardChatId` + `forwardMsgId`).
pub struct Forward {
    pub chat_id: ChatId,
    pub msg_id: MsgId,
}

#[derive(Debug, Clone, Default)]
pub struct MessageOptions {
    pub reply_msg_id: Option<MsgId>,
    pub forward: Option<Forward>,
    pub keyboard: Option<Keyboard>,
    pub parse_mode: Option<ParseMode>,
}

#[derive(Debug, Clone)]
pub struct SendText {
    chat_id: ChatId,
    text: MessageText,
    options: MessageOptions,
}

impl SendText {
    pub fn new(chat_id: ChatId, text: MessageText) -> Self {
        Self::with_options(chat_id, text, MessageOptions::default())
    }

    pub fn with_options(chat_id: ChatId, text: MessageText, options: MessageOptions) -> Self {
        Self {
            chat_id,
            text,
            options,
        }
    }

    pub fn chat_id(&self) -> &ChatId {
        &self.chat_id
    }

    pub fn text(&self) -> &MessageText {
        &self.text
    }

    pub fn options(&self) -> &MessageOptions {
        &self.options
    }
}

#[derive(Clone, PartialEq, Eq)]
/// File contents sent as the multipart `file` field.
pub struct FileUpload {
    filename: String,
    contents: Vec<u8>,
}

impl FileUpload {
    pub fn new(filename: impl Into<String>, contents: Vec<u8>) -> Result<Self, ValidationError> {
        let filename = filename.into();
        if filename.trim().is_empty() {
            return Err(ValidationError::Empty { field: "filename" });
        }
        Ok(Self { filename, contents })
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn contents(&self) -> &[u8] {
        &self.contents
    }

    pub(crate) fn into_parts(self) -> (String, Vec<u8>) {
        (self.filename, self.contents)
    }
}

impl std::fmt::Debug for FileUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileUpload")
            .field("filename", &self.filename)
            .field("len", &self.contents.len())
            .finish()
    }
}

#[derive(Debug, Clone)]
pub enum FileSource {
    /// Resend a file the server already has.
    Existing(FileId),
    /// Upload new contents.
    Upload(FileUpload),
}

impl FileSource {
    fn into_upload(self) -> Option<FileUpload> {
        match self {
            Self::Existing(_) => None,
            Self::Upload(upload) => Some(upload),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SendFile {
    chat_id: ChatId,
    source: FileSource,
    caption: Option<String>,
    options: MessageOptions,
}

impl SendFile {
    pub fn new(chat_id: ChatId, source: FileSource) -> Self {
        Self {
            chat_id,
            source,
            caption: None,
            options: MessageOptions::default(),
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn with_options(mut self, options: MessageOptions) -> Self {
        self.options = options;
        self
    }

    pub fn chat_id(&self) -> &ChatId {
        &self.chat_id
    }

    pub fn source(&self) -> &FileSource {
        &self.source
    }

    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    pub fn options(&self) -> &MessageOptions {
        &self.options
    }

    pub(crate) fn into_upload(self) -> Option<FileUpload> {
        self.source.into_upload()
    }
}

#[derive(Debug, Clone)]
/// Voice message. Uploaded contents should be `aac`, `ogg` or `m4a` to render as voice.
pub struct SendVoice {
    chat_id: ChatId,
    source: FileSource,
    options: MessageOptions,
}

impl SendVoice {
    pub fn new(chat_id: ChatId, source: FileSource) -> Self {
        Self {
            chat_id,
            source,
            options: MessageOptions::default(),
        }
    }

    pub fn with_options(mut self, options: MessageOptions) -> Self {
        self.options = options;
        self
    }

    pub fn chat_id(&self) -> &ChatId {
        &self.chat_id
    }

    pub fn source(&self) -> &FileSource {
        &self.source
    }

    pub fn options(&self) -> &MessageOptions {
        &self.options
    }

    pub(crate) fn into_upload(self) -> Option<FileUpload> {
        self.source.into_upload()
    }
}

#[derive(Debug, Clone)]
pub struct EditText {
    chat_id: ChatId,
    msg_id: MsgId,
    text: MessageText,
    keyboard: Option<Keyboard>,
    parse_mode: Option<ParseMode>,
}

impl EditText {
    pub fn new(chat_id: ChatId, msg_id: MsgId, text: MessageText) -> Self {
        Self {
            chat_id,
            msg_id,
            text,
            keyboard: None,
            parse_mode: None,
        }
    }

    pub fn with_keyboard(mut self, keyboard: Keyboard) -> Self {
        self.keyboard = Some(keyboard);
        self
    }

    pub fn with_parse_mode(mut self, parse_mode: ParseMode) -> Self {
        self.parse_mode = Some(parse_mode);
        self
    }

    pub fn chat_id(&self) -> &ChatId {
        &self.chat_id
    }

    pub fn msg_id(&self) -> &MsgId {
        &self.msg_id
    }

    pub fn text(&self) -> &MessageText {
        &self.text
    }

    pub fn keyboard(&self) -> Option<&Keyboard> {
        self.keyboard.as_ref()
    }

    pub fn parse_mode(&self) -> Option<ParseMode> {
        self.parse_mode
    }
}

#[derive(Debug, Clone)]
pub struct DeleteMessages {
    chat_id: ChatId,
    msg_ids: Vec<MsgId>,
}

impl DeleteMessages {
    pub fn new(chat_id: ChatId, msg_ids: Vec<MsgId>) -> Result<Self, ValidationError> {
        if msg_ids.is_empty() {
            return Err(ValidationError::Empty {
                field: MsgId::FIELD,
            });
        }
        Ok(Self { chat_id, msg_ids })
    }

    pub fn one(chat_id: ChatId, msg_id: MsgId) -> Self {
        Self {
            chat_id,
            msg_ids: vec![msg_id],
        }
    }

    pub fn chat_id(&self) -> &ChatId {
        &self.chat_id
    }

    pub fn msg_ids(&self) -> &[MsgId] {
        &self.msg_ids
    }
}

#[derive(Debug, Clone)]
pub struct AnswerCallback {
    query_id: QueryId,
    text: Option<String>,
    show_alert: bool,
    url: Option<String>,
}

impl AnswerCallback {
    pub fn new(query_id: QueryId) -> Self {
        Self {
            query_id,
            text: None,
            show_alert: false,
            url: None,
        }
    }

    /// Notification text shown to the user who pressed the button.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Show the text as an alert instead of a transient notification.
    pub fn with_alert(mut self) -> Self {
        self.show_alert = true;
        self
    }

    /// Open `url` on the client side.
    pub fn with_url(mut self, url: impl Into<String>) -> Result<Self, ValidationError> {
        let url = url.into();
        if url::Url::parse(&url).is_err() {
            return Err(ValidationError::InvalidUrl {
                field: "url",
                input: url,
            });
        }
        self.url = Some(url);
        Ok(self)
    }

    pub fn query_id(&self) -> &QueryId {
        &self.query_id
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn show_alert(&self) -> bool {
        self.show_alert
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }
}
