//! Transport layer: HTTP and wire-format details (serialization/deserialization).

mod callback;
mod events;
mod keyboard;
mod messages;

pub use callback::encode_answer_callback_query;
pub use events::{decode_events_json_response, encode_get_events_query};
pub use messages::{
    decode_send_file_json_response, decode_send_text_json_response, decode_status_json_response,
    encode_delete_messages_query, encode_edit_text_query, encode_send_file_query,
    encode_send_text_query, encode_send_voice_query,
};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("response is ok but lacks field: {field}")]
    MissingField { field: &'static str },

    #[error("failed to encode {field}: {source}")]
    Encode {
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Decoded reply envelope: either the payload of an `"ok": true` response or the
/// server-supplied description of an `"ok": false` one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply<T> {
    Ok(T),
    NotOk { description: Option<String> },
}

pub type Params = Vec<(String, String)>;

fn push(params: &mut Params, key: &str, value: impl Into<String>) {
    params.push((key.to_owned(), value.into()));
}
