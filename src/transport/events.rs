use serde::Deserialize;

use crate::domain::{
    CallbackQuery, Chat, ChatId, ChatType, Contact, Event, EventKind, FileId, MembersChange,
    Message, MessageRef, MsgId, Part, PollTime, QueryId, QuotedMessage, UserId,
};
use crate::transport::{Params, Reply, TransportError, push};

#[derive(Debug, Deserialize)]
struct EventsJsonResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    events: Vec<EventJson>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventJson {
    event_id: u64,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    payload: PayloadJson,
}

// One flat shape for every event type; only the fields relevant to `type` are set.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct PayloadJson {
    msg_id: String,
    chat: ChatJson,
    from: ContactJson,
    timestamp: u64,
    text: Option<String>,
    edited_timestamp: Option<u64>,
    parts: Vec<PartJson>,

    query_id: String,
    callback_data: Option<String>,
    message: Option<Box<PayloadJson>>,

    new_members: Vec<ContactJson>,
    left_members: Vec<ContactJson>,
    added_by: Option<ContactJson>,
    removed_by: Option<ContactJson>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ChatJson {
    chat_id: String,
    #[serde(rename = "type")]
    kind: String,
    title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ContactJson {
    user_id: String,
    first_name: Option<String>,
    last_name: Option<String>,
}

// Payload shape depends on `type` (keyboards send an array), so it is kept raw
// until the kind is known.
#[derive(Debug, Deserialize)]
struct PartJson {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    payload: serde_json::Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct PartPayloadJson {
    file_id: String,
    user_id: String,
    first_name: Option<String>,
    last_name: Option<String>,
    caption: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    message: Option<QuotedJson>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct QuotedJson {
    msg_id: String,
    from: ContactJson,
    text: Option<String>,
    timestamp: u64,
}

pub fn encode_get_events_query(last_event_id: u64, poll_time: PollTime) -> Params {
    let mut params = Params::new();
    push(&mut params, "lastEventId", last_event_id.to_string());
    push(&mut params, PollTime::FIELD, poll_time.seconds().to_string());
    params
}

/// Decode an `events/get` reply. Events keep the server order (oldest first).
pub fn decode_events_json_response(json: &str) -> Result<Reply<Vec<Event>>, TransportError> {
    let parsed: EventsJsonResponse = serde_json::from_str(json)?;
    if !parsed.ok {
        return Ok(Reply::NotOk {
            description: parsed.description,
        });
    }
    Ok(Reply::Ok(parsed.events.into_iter().map(into_event).collect()))
}

fn into_event(event: EventJson) -> Event {
    let payload = event.payload;
    let kind = match event.kind.as_str() {
        "newMessage" => EventKind::NewMessage(into_message(payload)),
        "editedMessage" => EventKind::EditedMessage(into_message(payload)),
        "pinnedMessage" => EventKind::PinnedMessage(into_message(payload)),
        "deletedMessage" => EventKind::DeletedMessage(into_message_ref(payload)),
        "unpinnedMessage" => EventKind::UnpinnedMessage(into_message_ref(payload)),
        "newChatMembers" => EventKind::NewChatMembers(MembersChange {
            chat: into_chat(payload.chat),
            members: payload.new_members.into_iter().map(into_contact).collect(),
            actor: payload.added_by.and_then(into_optional_contact),
        }),
        "leftChatMembers" => EventKind::LeftChatMembers(MembersChange {
            chat: into_chat(payload.chat),
            members: payload.left_members.into_iter().map(into_contact).collect(),
            actor: payload.removed_by.and_then(into_optional_contact),
        }),
        "callbackQuery" => EventKind::CallbackQuery(CallbackQuery {
            query_id: QueryId::from_wire(payload.query_id),
            from: into_contact(payload.from),
            callback_data: payload.callback_data.unwrap_or_default(),
            message: payload.message.map(|message| into_message(*message)),
        }),
        _ => EventKind::Unknown { kind: event.kind },
    };
    Event { id: event.event_id, kind }
}

fn into_message(payload: PayloadJson) -> Message {
    Message {
        msg_id: MsgId::from_wire(payload.msg_id),
        chat: into_chat(payload.chat),
        from: into_contact(payload.from),
        timestamp: payload.timestamp,
        text: payload.text.unwrap_or_default(),
        edited_timestamp: payload.edited_timestamp,
        parts: payload.parts.into_iter().map(into_part).collect(),
    }
}

fn into_message_ref(payload: PayloadJson) -> MessageRef {
    MessageRef {
        msg_id: MsgId::from_wire(payload.msg_id),
        chat: into_chat(payload.chat),
        timestamp: payload.timestamp,
    }
}

fn into_chat(chat: ChatJson) -> Chat {
    Chat {
        id: ChatId::from_wire(chat.chat_id),
        kind: ChatType::from_wire(chat.kind),
        title: chat.title.filter(|title| !title.is_empty()),
    }
}

fn into_contact(contact: ContactJson) -> Contact {
    Contact {
        user_id: UserId::from_wire(contact.user_id),
        first_name: contact.first_name.unwrap_or_default(),
        last_name: contact.last_name.filter(|name| !name.is_empty()),
    }
}

fn into_optional_contact(contact: ContactJson) -> Option<Contact> {
    if contact.user_id.is_empty() {
        return None;
    }
    Some(into_contact(contact))
}

fn into_part(part: PartJson) -> Part {
    const KNOWN: [&str; 6] = ["sticker", "voice", "file", "mention", "forward", "reply"];
    if !KNOWN.contains(&part.kind.as_str()) {
        return Part::Unknown { kind: part.kind };
    }
    let payload = match part.payload {
        serde_json::Value::Null => PartPayloadJson::default(),
        value @ serde_json::Value::Object(_) => {
            match serde_json::from_value::<PartPayloadJson>(value) {
                Ok(payload) => payload,
                Err(_) => return Part::Unknown { kind: part.kind },
            }
        }
        _ => return Part::Unknown { kind: part.kind },
    };
    match part.kind.as_str() {
        "sticker" => Part::Sticker {
            file_id: FileId::from_wire(payload.file_id),
        },
        "voice" => Part::Voice {
            file_id: FileId::from_wire(payload.file_id),
        },
        "file" => Part::File {
            file_id: FileId::from_wire(payload.file_id),
            kind: payload.kind,
            caption: payload.caption,
        },
        "mention" => Part::Mention {
            contact: into_contact(ContactJson {
                user_id: payload.user_id,
                first_name: payload.first_name,
                last_name: payload.last_name,
            }),
        },
        "forward" => Part::Forward {
            message: into_quoted(payload.message.unwrap_or_default()),
        },
        "reply" => Part::Reply {
            message: into_quoted(payload.message.unwrap_or_default()),
        },
        _ => Part::Unknown { kind: part.kind },
    }
}

fn into_quoted(message: QuotedJson) -> QuotedMessage {
    QuotedMessage {
        msg_id: MsgId::from_wire(message.msg_id),
        from: into_contact(message.from),
        text: message.text.unwrap_or_default(),
        timestamp: message.timestamp,
    }
}
