use crate::domain::value::{FileId, MsgId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendTextResponse {
    pub msg_id: MsgId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendFileResponse {
    pub msg_id: MsgId,
    /// Id of the stored file. The server returns it for uploads; for a resent file it is
    /// the id from the request.
    pub file_id: Option<FileId>,
}
