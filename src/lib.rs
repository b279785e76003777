//! Typed Rust client for the VK Teams Bot HTTP API.
//!
//! The crate has a domain layer of strong types, a transport layer for wire-format
//! quirks, and a small client layer orchestrating requests. Incoming updates arrive
//! through [`VkTeamsClient::subscribe`], a long-poll loop that keeps going across
//! network failures until its cancellation token fires.
//!
//! ```rust,no_run
//! use futures::StreamExt;
//! use tokio_util::sync::CancellationToken;
//! use vkteams_bot::{EventKind, MessageText, SendText, Token, VkTeamsClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), vkteams_bot::VkTeamsError> {
//!     let client = VkTeamsClient::new(Token::new("...")?);
//!     let mut events = client.subscribe(CancellationToken::new());
//!     while let Some(event) = events.next().await {
//!         if let EventKind::NewMessage(message) = event.kind {
//!             let reply = SendText::new(message.chat.id, MessageText::new(message.text)?);
//!             client.send_text(reply).await?;
//!         }
//!     }
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
mod transport;

pub use client::{EventStream, VkTeamsClient, VkTeamsClientBuilder, VkTeamsError};
pub use domain::{
    AnswerCallback, Button, ButtonAction, ButtonStyle, CallbackQuery, Chat, ChatId, ChatType,
    Contact, DeleteMessages, EditText, Event, EventKind, FileId, FileSource, FileUpload, Forward,
    Keyboard, MembersChange, Message, MessageOptions, MessageRef, MessageText, MsgId, ParseMode,
    Part, PollTime, QueryId, QuotedMessage, SendFile, SendFileResponse, SendText,
    SendTextResponse, SendVoice, Token, UserId, ValidationError,
};
