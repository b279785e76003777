use serde::Deserialize;

use crate::domain::{
    ChatId, DeleteMessages, EditText, FileId, FileSource, Keyboard, MessageOptions, MessageText,
    MsgId, ParseMode, SendFile, SendFileResponse, SendText, SendTextResponse, SendVoice,
};
use crate::transport::keyboard::encode_keyboard;
use crate::transport::{Params, Reply, TransportError, push};

#[derive(Debug, Clone, Deserialize)]
struct StatusJsonResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendJsonResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    msg_id: Option<String>,
    #[serde(default)]
    file_id: Option<String>,
}

pub fn encode_send_text_query(request: &SendText) -> Result<Params, TransportError> {
    let mut params = Params::new();
    push(&mut params, ChatId::FIELD, request.chat_id().as_str());
    push(&mut params, MessageText::FIELD, request.text().as_str());
    push_options(&mut params, request.options())?;
    Ok(params)
}

pub fn encode_send_file_query(request: &SendFile) -> Result<Params, TransportError> {
    let mut params = Params::new();
    push(&mut params, ChatId::FIELD, request.chat_id().as_str());
    push_source(&mut params, request.source());
    if let Some(caption) = request.caption() {
        push(&mut params, "caption", caption);
    }
    push_options(&mut params, request.options())?;
    Ok(params)
}

pub fn encode_send_voice_query(request: &SendVoice) -> Result<Params, TransportError> {
    let mut params = Params::new();
    push(&mut params, ChatId::FIELD, request.chat_id().as_str());
    push_source(&mut params, request.source());
    push_options(&mut params, request.options())?;
    Ok(params)
}

pub fn encode_edit_text_query(request: &EditText) -> Result<Params, TransportError> {
    let mut params = Params::new();
    push(&mut params, ChatId::FIELD, request.chat_id().as_str());
    push(&mut params, MsgId::FIELD, request.msg_id().as_str());
    push(&mut params, MessageText::FIELD, request.text().as_str());
    push_markup(&mut params, request.keyboard(), request.parse_mode())?;
    Ok(params)
}

pub fn encode_delete_messages_query(request: &DeleteMessages) -> Params {
    let mut params = Params::new();
    push(&mut params, ChatId::FIELD, request.chat_id().as_str());
    for msg_id in request.msg_ids() {
        push(&mut params, MsgId::FIELD, msg_id.as_str());
    }
    params
}

fn push_source(params: &mut Params, source: &FileSource) {
    if let FileSource::Existing(file_id) = source {
        push(params, FileId::FIELD, file_id.as_str());
    }
}

fn push_options(params: &mut Params, options: &MessageOptions) -> Result<(), TransportError> {
    if let Some(reply_msg_id) = options.reply_msg_id.as_ref() {
        push(params, "replyMsgId", reply_msg_id.as_str());
    }
    if let Some(forward) = options.forward.as_ref() {
        push(params, "forwardChatId", forward.chat_id.as_str());
        push(params, "forwardMsgId", forward.msg_id.as_str());
    }
    push_markup(params, options.keyboard.as_ref(), options.parse_mode)
}

fn push_markup(
    params: &mut Params,
    keyboard: Option<&Keyboard>,
    parse_mode: Option<ParseMode>,
) -> Result<(), TransportError> {
    if let Some(keyboard) = keyboard.filter(|keyboard| !keyboard.is_empty()) {
        push(params, Keyboard::FIELD, encode_keyboard(keyboard)?);
    }
    if let Some(parse_mode) = parse_mode {
        push(params, ParseMode::FIELD, parse_mode.as_str());
    }
    Ok(())
}

pub fn decode_status_json_response(json: &str) -> Result<Reply<()>, TransportError> {
    let parsed: StatusJsonResponse = serde_json::from_str(json)?;
    if !parsed.ok {
        return Ok(Reply::NotOk {
            description: parsed.description,
        });
    }
    Ok(Reply::Ok(()))
}

pub fn decode_send_text_json_response(
    json: &str,
) -> Result<Reply<SendTextResponse>, TransportError> {
    let parsed: SendJsonResponse = serde_json::from_str(json)?;
    if !parsed.ok {
        return Ok(Reply::NotOk {
            description: parsed.description,
        });
    }
    let msg_id = required_msg_id(parsed.msg_id)?;
    Ok(Reply::Ok(SendTextResponse { msg_id }))
}

/// `requested` is the file id the request reused, if any; the server does not echo it.
pub fn decode_send_file_json_response(
    requested: Option<&FileId>,
    json: &str,
) -> Result<Reply<SendFileResponse>, TransportError> {
    let parsed: SendJsonResponse = serde_json::from_str(json)?;
    if !parsed.ok {
        return Ok(Reply::NotOk {
            description: parsed.description,
        });
    }
    let msg_id = required_msg_id(parsed.msg_id)?;
    let file_id = parsed
        .file_id
        .filter(|id| !id.is_empty())
        .map(FileId::from_wire)
        .or_else(|| requested.cloned());
    Ok(Reply::Ok(SendFileResponse { msg_id, file_id }))
}

fn required_msg_id(msg_id: Option<String>) -> Result<MsgId, TransportError> {
    msg_id
        .filter(|id| !id.is_empty())
        .map(MsgId::from_wire)
        .ok_or(TransportError::MissingField {
            field: MsgId::FIELD,
        })
}

#[cfg(test)]
mod tests {
    use crate::domain::{Button, FileUpload, Forward};

    use super::*;

    fn chat() -> ChatId {
        ChatId::new("user@example.com").unwrap()
    }

    #[test]
    fn encode_send_text_minimal() {
        let request = SendText::new(chat(), MessageText::new("hello").unwrap());
        assert_eq!(
            encode_send_text_query(&request).unwrap(),
            vec![
                ("chatId".to_owned(), "user@example.com".to_owned()),
                ("text".to_owned(), "hello".to_owned()),
            ]
        );
    }

    #[test]
    fn encode_send_text_with_all_options() {
        let options = MessageOptions {
            reply_msg_id: Some(MsgId::new("100").unwrap()),
            forward: Some(Forward {
                chat_id: ChatId::new("other@example.com").unwrap(),
                msg_id: MsgId::new("200").unwrap(),
            }),
            keyboard: Some(Keyboard::new().row([Button::callback("A", "a").unwrap()])),
            parse_mode: Some(ParseMode::Html),
        };
        let request =
            SendText::with_options(chat(), MessageText::new("<b>hi</b>").unwrap(), options);

        let params = encode_send_text_query(&request).unwrap();
        let keys = params.iter().map(|(k, _)| k.as_str()).collect::<Vec<_>>();
        assert_eq!(
            keys,
            vec![
                "chatId",
                "text",
                "replyMsgId",
                "forwardChatId",
                "forwardMsgId",
                "inlineKeyboardMarkup",
                "parseMode",
            ]
        );
        assert_eq!(params[2].1, "100");
        assert_eq!(params[3].1, "other@example.com");
        assert_eq!(params[4].1, "200");
        let keyboard: serde_json::Value = serde_json::from_str(&params[5].1).unwrap();
        assert_eq!(
            keyboard,
            serde_json::json!([[{"text": "A", "callbackData": "a"}]])
        );
        assert_eq!(params[6].1, "HTML");
    }

    #[test]
    fn encode_send_file_with_existing_id_and_caption() {
        let request = SendFile::new(
            chat(),
            FileSource::Existing(FileId::new("file-1").unwrap()),
        )
        .with_caption("report");

        assert_eq!(
            encode_send_file_query(&request).unwrap(),
            vec![
                ("chatId".to_owned(), "user@example.com".to_owned()),
                ("fileId".to_owned(), "file-1".to_owned()),
                ("caption".to_owned(), "report".to_owned()),
            ]
        );
    }

    #[test]
    fn encode_send_voice_upload_omits_file_id() {
        let upload = FileUpload::new("voice.ogg", vec![1, 2, 3]).unwrap();
        let request = SendVoice::new(chat(), FileSource::Upload(upload));

        assert_eq!(
            encode_send_voice_query(&request).unwrap(),
            vec![("chatId".to_owned(), "user@example.com".to_owned())]
        );
    }

    #[test]
    fn encode_edit_text_params() {
        let request = EditText::new(
            chat(),
            MsgId::new("42").unwrap(),
            MessageText::new("edited").unwrap(),
        )
        .with_parse_mode(ParseMode::MarkdownV2);

        assert_eq!(
            encode_edit_text_query(&request).unwrap(),
            vec![
                ("chatId".to_owned(), "user@example.com".to_owned()),
                ("msgId".to_owned(), "42".to_owned()),
                ("text".to_owned(), "edited".to_owned()),
                ("parseMode".to_owned(), "MarkdownV2".to_owned()),
            ]
        );
    }

    #[test]
    fn encode_delete_messages_repeats_msg_id() {
        let request = DeleteMessages::new(
            chat(),
            vec![MsgId::new("1").unwrap(), MsgId::new("2").unwrap()],
        )
        .unwrap();

        assert_eq!(
            encode_delete_messages_query(&request),
            vec![
                ("chatId".to_owned(), "user@example.com".to_owned()),
                ("msgId".to_owned(), "1".to_owned()),
                ("msgId".to_owned(), "2".to_owned()),
            ]
        );
    }

    #[test]
    fn decode_send_text_ok_and_not_ok() {
        let reply = decode_send_text_json_response(r#"{"ok": true, "msgId": "57"}"#).unwrap();
        assert_eq!(
            reply,
            Reply::Ok(SendTextResponse {
                msg_id: MsgId::new("57").unwrap()
            })
        );

        let reply =
            decode_send_text_json_response(r#"{"ok": false, "description": "Invalid chatId"}"#)
                .unwrap();
        assert_eq!(
            reply,
            Reply::NotOk {
                description: Some("Invalid chatId".to_owned())
            }
        );
    }

    #[test]
    fn decode_send_text_requires_msg_id_on_success() {
        let err = decode_send_text_json_response(r#"{"ok": true}"#).unwrap_err();
        assert!(matches!(
            err,
            TransportError::MissingField { field: "msgId" }
        ));
    }

    #[test]
    fn decode_send_file_prefers_server_file_id() {
        let requested = FileId::new("old").unwrap();
        let reply = decode_send_file_json_response(
            Some(&requested),
            r#"{"ok": true, "msgId": "1", "fileId": "new"}"#,
        )
        .unwrap();
        let Reply::Ok(response) = reply else {
            panic!("expected ok reply");
        };
        assert_eq!(response.file_id, Some(FileId::new("new").unwrap()));

        let reply =
            decode_send_file_json_response(Some(&requested), r#"{"ok": true, "msgId": "1"}"#)
                .unwrap();
        let Reply::Ok(response) = reply else {
            panic!("expected ok reply");
        };
        assert_eq!(response.file_id, Some(requested));
    }

    #[test]
    fn decode_status_rejects_invalid_json() {
        assert!(matches!(
            decode_status_json_response("{ nope"),
            Err(TransportError::Json(_))
        ));
        assert_eq!(
            decode_status_json_response(r#"{"ok": true}"#).unwrap(),
            Reply::Ok(())
        );
    }
}
