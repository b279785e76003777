use std::io;

use futures::StreamExt;
use tokio_util::sync::CancellationToken;
use vkteams_bot::{
    AnswerCallback, Button, ButtonStyle, EventKind, Keyboard, MessageOptions, MessageText,
    PollTime, SendText, Token, VkTeamsClient, VkTeamsError,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,vkteams_bot=debug")),
        )
        .init();

    let token = std::env::var("VKTEAMS_TOKEN").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "VKTEAMS_TOKEN environment variable is required",
        )
    })?;

    let mut builder = VkTeamsClient::builder(Token::new(token)?);
    if let Ok(api_url) = std::env::var("VKTEAMS_API_URL") {
        builder = builder.api_url(api_url);
    }
    if let Ok(poll_time) = std::env::var("VKTEAMS_POLL_TIME") {
        let seconds = poll_time.parse().map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "VKTEAMS_POLL_TIME must be a number of seconds",
            )
        })?;
        builder = builder.poll_time(PollTime::new(seconds)?);
    }
    let client = builder.build()?;

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("ctrl-c received; shutting down");
            }
            cancel.cancel();
        }
    });

    let mut events = client.subscribe(cancel);
    while let Some(event) = events.next().await {
        if let Err(err) = handle(&client, event.kind).await {
            tracing::warn!(event_id = event.id, error = %err, "unable to handle event");
        }
    }

    Ok(())
}

async fn handle(client: &VkTeamsClient, kind: EventKind) -> Result<(), VkTeamsError> {
    match kind {
        EventKind::NewMessage(message) => {
            if message.text.trim().is_empty() {
                return Ok(());
            }
            let keyboard = Keyboard::new().row([
                Button::callback("Again", message.text.clone())?.styled(ButtonStyle::Primary),
                Button::url("About", "https://teams.vk.com/botapi/")?,
            ]);
            let options = MessageOptions {
                reply_msg_id: Some(message.msg_id),
                keyboard: Some(keyboard),
                ..MessageOptions::default()
            };
            let request =
                SendText::with_options(message.chat.id, MessageText::new(message.text)?, options);
            let response = client.send_text(request).await?;
            tracing::info!(msg_id = response.msg_id.as_str(), "echoed message");
        }
        EventKind::CallbackQuery(query) => {
            let answer = AnswerCallback::new(query.query_id).with_text(query.callback_data);
            client.answer_callback(answer).await?;
        }
        other => tracing::debug!(?other, "ignoring event"),
    }
    Ok(())
}
