use agora_llm::{ChatClient, ChatRequest, Message, OpenAIClient, StreamEvent};
use anyhow::Result;
use futures::StreamExt;
use std::io::Write;

#[tokio::main]
async fn main() -> Result<()> {
    let api_key = std::env::var("OPENAI_API_KEY")?;
    let client = OpenAIClient::new(api_key)?;

    let request = ChatRequest::new(
        "gpt-4o-mini",
        vec![Message::human("Write a haiku about the sea.")]
    );

    let mut stream = client.chat_stream(request).await?;

    while let Some(event) = stream.next().await {
        match event? {
            StreamEvent::Message { content } => {
                print!("{}", content);
                std::io::stdout().flush()?;
            }
            StreamEvent::Done { .. } => println!(),
            _ => {}
        }
    }

    Ok(())
}
