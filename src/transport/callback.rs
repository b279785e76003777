use crate::domain::{AnswerCallback, QueryId};
use crate::transport::{Params, push};

pub fn encode_answer_callback_query(request: &AnswerCallback) -> Params {
    let mut params = Params::new();
    push(&mut params, QueryId::FIELD, request.query_id().as_str());
    if let Some(text) = request.text() {
        push(&mut params, "text", text);
    }
    if request.show_alert() {
        push(&mut params, "showAlert", "true");
    }
    if let Some(url) = request.url() {
        push(&mut params, "url", url);
    }
    params
}
