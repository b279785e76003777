use std::io;

use vkteams_bot::{ChatId, MessageText, SendText, Token, VkTeamsClient};

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
    let message = std::env::var("VKTEAMS_MESSAGE")
        .unwrap_or_else(|_| "Hello from the vkteams-bot demo.".to_owned());

    let mut builder = VkTeamsClient::builder(Token::new(token)?);
    if let Ok(api_url) = std::env::var("VKTEAMS_API_URL") {
        builder = builder.api_url(api_url);
    }
    let client = builder.build()?;

    let request = SendText::new(ChatId::new(chat_id)?, MessageText::new(message)?);
    let response = client.send_text(request).await?;
    println!("sent message {}", response.msg_id.as_str());

    Ok(())
}
