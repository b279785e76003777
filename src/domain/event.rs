use crate::domain::value::{ChatId, FileId, MsgId, QueryId, UserId};

#[derive(Debug, Clone, PartialEq, Eq)]
/// A single notification from `events/get`.
///
/// `id` grows strictly for the lifetime of the bot and is used as the `lastEventId`
/// cursor of the next poll.
pub struct Event {
    pub id: u64,
    pub kind: EventKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
/// Event payload, selected by the wire `type` field.
pub enum EventKind {
    NewMessage(Message),
    EditedMessage(Message),
    DeletedMessage(MessageRef),
    PinnedMessage(Message),
    UnpinnedMessage(MessageRef),
    NewChatMembers(MembersChange),
    LeftChatMembers(MembersChange),
    CallbackQuery(CallbackQuery),
    /// An event type this crate does not know yet. It is still delivered so the cursor
    /// keeps moving past it.
    Unknown { kind: String },
}

impl EventKind {
    /// Chat the event happened in, if the event carries one.
    pub fn chat(&self) -> Option<&Chat> {
        match self {
            Self::NewMessage(message) | Self::EditedMessage(message) | Self::PinnedMessage(message) => {
                Some(&message.chat)
            }
            Self::DeletedMessage(message) | Self::UnpinnedMessage(message) => Some(&message.chat),
            Self::NewChatMembers(change) | Self::LeftChatMembers(change) => Some(&change.chat),
            Self::CallbackQuery(query) => query.message.as_ref().map(|message| &message.chat),
            Self::Unknown { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatType {
    Private,
    Group,
    Channel,
    Unknown(String),
}

impl ChatType {
    pub(crate) fn from_wire(value: String) -> Self {
        match value.as_str() {
            "private" => Self::Private,
            "group" => Self::Group,
            "channel" => Self::Channel,
            _ => Self::Unknown(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chat {
    pub id: ChatId,
    pub kind: ChatType,
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub user_id: UserId,
    pub first_name: String,
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Message body as delivered in `newMessage`, `editedMessage` and `pinnedMessage`.
pub struct Message {
    pub msg_id: MsgId,
    pub chat: Chat,
    pub from: Contact,
    pub timestamp: u64,
    pub text: String,
    /// Set only for `editedMessage`.
    pub edited_timestamp: Option<u64>,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Reference to a message that is no longer (or no longer pinned) in the chat.
pub struct MessageRef {
    pub msg_id: MsgId,
    pub chat: Chat,
    pub timestamp: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Members joined (`newChatMembers`) or left (`leftChatMembers`) a chat.
pub struct MembersChange {
    pub chat: Chat,
    pub members: Vec<Contact>,
    /// `addedBy` or `removedBy`; absent when members joined or left on their own.
    pub actor: Option<Contact>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Button press on an inline keyboard. Answer it with
/// [`crate::VkTeamsClient::answer_callback`].
pub struct CallbackQuery {
    pub query_id: QueryId,
    pub from: Contact,
    pub callback_data: String,
    /// Message that carried the keyboard.
    pub message: Option<Message>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
/// Structured attachment of a message.
pub enum Part {
    Sticker { file_id: FileId },
    Mention { contact: Contact },
    Voice { file_id: FileId },
    File {
        file_id: FileId,
        kind: Option<String>,
        caption: Option<String>,
    },
    Forward { message: QuotedMessage },
    Reply { message: QuotedMessage },
    Unknown { kind: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Message embedded in a `forward` or `reply` part.
pub struct QuotedMessage {
    pub msg_id: MsgId,
    pub from: Contact,
    pub text: String,
    pub timestamp: u64,
}
