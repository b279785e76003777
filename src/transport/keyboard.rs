use serde::Serialize;

use crate::domain::{Button, ButtonAction, ButtonStyle, Keyboard};
use crate::transport::TransportError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ButtonJson<'a> {
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    callback_data: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    style: Option<StyleJson>,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
enum StyleJson {
    Base,
    Primary,
    Attention,
}

impl From<ButtonStyle> for StyleJson {
    fn from(style: ButtonStyle) -> Self {
        match style {
            ButtonStyle::Base => Self::Base,
            ButtonStyle::Primary => Self::Primary,
            ButtonStyle::Attention => Self::Attention,
        }
    }
}

impl<'a> From<&'a Button> for ButtonJson<'a> {
    fn from(button: &'a Button) -> Self {
        let (url, callback_data) = match button.action() {
            ButtonAction::Url(url) => (Some(url.as_str()), None),
            ButtonAction::Callback(data) => (None, Some(data.as_str())),
        };
        Self {
            text: button.text(),
            url,
            callback_data,
            style: button.style().map(StyleJson::from),
        }
    }
}

/// Encode a keyboard into the JSON array-of-rows expected by `inlineKeyboardMarkup`.
pub fn encode_keyboard(keyboard: &Keyboard) -> Result<String, TransportError> {
    let rows = keyboard
        .rows()
        .iter()
        .map(|row| row.iter().map(ButtonJson::from).collect::<Vec<_>>())
        .collect::<Vec<_>>();
    serde_json::to_string(&rows).map_err(|source| TransportError::Encode {
        field: Keyboard::FIELD,
        source,
    })
}
