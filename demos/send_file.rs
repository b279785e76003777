use std::io;

use vkteams_bot::{ChatId, FileSource, FileUpload, SendFile, Token, VkTeamsClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let token = std::env::var("VKTEAMS_TOKEN").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "VKTEAMS_TOKEN environment variable is required",
        )
    })?;
    let chat_id = std::env::var("VKTEAMS_CHAT_ID").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "VKTEAMS_CHAT_ID environment variable is required",
        )
    })?;
    let path = std::env::args().nth(1).ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "usage: send_file <path>")
    })?;

    let mut builder = VkTeamsClient::builder(Token::new(token)?);
    if let Ok(api_url) = std::env::var("VKTEAMS_API_URL") {
        builder = builder.api_url(api_url);
    }
    let client = builder.build()?;

    let filename = std::path::Path::new(&path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("file")
        .to_owned();
    let contents = tokio::fs::read(&path).await?;
    let upload = FileUpload::new(filename, contents)?;

    let request = SendFile::new(ChatId::new(chat_id)?, FileSource::Upload(upload))
        .with_caption("sent by the vkteams-bot demo");
    let response = client.send_file(request).await?;
    println!(
        "sent message {}, file id: {:?}",
        response.msg_id.as_str(),
        response.file_id.as_ref().map(|id| id.as_str())
    );

    Ok(())
}
