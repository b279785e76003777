//! Domain layer: strong types with validation and invariants (no I/O).

mod event;
mod request;
mod response;
mod validation;
mod value;

pub use event::{
    CallbackQuery, Chat, ChatType, Contact, Event, EventKind, MembersChange, Message, MessageRef,
    Part, QuotedMessage,
};
pub use request::{
    AnswerCallback, Button, ButtonAction, ButtonStyle, DeleteMessages, EditText, FileSource,
    FileUpload, Forward, Keyboard, MessageOptions, ParseMode, SendFile, SendText, SendVoice,
};
pub use response::{SendFileResponse, SendTextResponse};
pub use validation::ValidationError;
pub use value::{ChatId, FileId, MessageText, MsgId, PollTime, QueryId, Token, UserId};
