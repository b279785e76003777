use std::time::Duration;

use crate::domain::validation::ValidationError;

fn non_empty_trimmed(value: String, field: &'static str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(trimmed.to_owned())
}

#[derive(Clone, PartialEq, Eq, Hash)]
/// Bot token issued by Metabot (`token`).
///
/// Invariant: non-empty after trimming. `Debug` output is redacted.
pub struct Token(String);

impl Token {
    /// Query parameter name used by the Bot API (`token`).
    pub const FIELD: &'static str = "token";

    /// Create a validated [`Token`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self(non_empty_trimmed(value.into(), Self::FIELD)?))
    }

    /// Borrow the validated token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Token(***)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Chat identifier (`chatId`): a user login, a group id or a channel nick.
///
/// Invariant: non-empty after trimming.
pub struct ChatId(String);

impl ChatId {
    /// Query parameter name used by the Bot API (`chatId`).
    pub const FIELD: &'static str = "chatId";

    /// Create a validated [`ChatId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self(non_empty_trimmed(value.into(), Self::FIELD)?))
    }

    pub(crate) fn from_wire(value: String) -> Self {
        Self(value)
    }

    /// Borrow the chat id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Message identifier (`msgId`), unique within a chat.
///
/// Invariant: non-empty after trimming.
pub struct MsgId(String);

impl MsgId {
    /// Query parameter name used by the Bot API (`msgId`).
    pub const FIELD: &'static str = "msgId";

    /// Create a validated [`MsgId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self(non_empty_trimmed(value.into(), Self::FIELD)?))
    }

    pub(crate) fn from_wire(value: String) -> Self {
        Self(value)
    }

    /// Borrow the message id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// User identifier (`userId`).
pub struct UserId(String);

impl UserId {
    /// Field name used by the Bot API (`userId`).
    pub const FIELD: &'static str = "userId";

    /// Create a validated [`UserId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self(non_empty_trimmed(value.into(), Self::FIELD)?))
    }

    pub(crate) fn from_wire(value: String) -> Self {
        Self(value)
    }

    /// Borrow the user id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Identifier of a file already stored on the server (`fileId`).
///
/// Reusing it in `sendFile`/`sendVoice` avoids uploading the contents again.
pub struct FileId(String);

impl FileId {
    /// Query parameter name used by the Bot API (`fileId`).
    pub const FIELD: &'static str = "fileId";

    /// Create a validated [`FileId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self(non_empty_trimmed(value.into(), Self::FIELD)?))
    }

    pub(crate) fn from_wire(value: String) -> Self {
        Self(value)
    }

    /// Borrow the file id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Callback query identifier (`queryId`) taken from a `callbackQuery` event.
pub struct QueryId(String);

impl QueryId {
    /// Query parameter name used by the Bot API (`queryId`).
    pub const FIELD: &'static str = "queryId";

    /// Create a validated [`QueryId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self(non_empty_trimmed(value.into(), Self::FIELD)?))
    }

    pub(crate) fn from_wire(value: String) -> Self {
        Self(value)
    }

    /// Borrow the query id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Message text (`text`).
///
/// Invariant: non-empty after trimming. The original value (including whitespace) is preserved.
pub struct MessageText(String);

impl MessageText {
    /// Query parameter name used by the Bot API (`text`).
    pub const FIELD: &'static str = "text";

    /// Create validated message text.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the message text as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// How long the server may hold an `events/get` request open (`pollTime`), in seconds.
///
/// Invariant: `1..=600`.
pub struct PollTime(u32);

impl PollTime {
    /// Query parameter name used by the Bot API (`pollTime`).
    pub const FIELD: &'static str = "pollTime";

    /// Minimum allowed poll time.
    pub const MIN: u32 = 1;
    /// Maximum allowed poll time.
    pub const MAX: u32 = 600;

    /// Create a validated poll time.
    pub fn new(seconds: u32) -> Result<Self, ValidationError> {
        if !(Self::MIN..=Self::MAX).contains(&seconds) {
            return Err(ValidationError::PollTimeOutOfRange {
                min: Self::MIN,
                max: Self::MAX,
                actual: seconds,
            });
        }
        Ok(Self(seconds))
    }

    /// Get the poll time in seconds.
    pub fn seconds(self) -> u32 {
        self.0
    }

    /// Get the poll time as a [`Duration`].
    pub fn as_duration(self) -> Duration {
        Duration::from_secs(u64::from(self.0))
    }
}

impl Default for PollTime {
    fn default() -> Self {
        Self(30)
    }
}
