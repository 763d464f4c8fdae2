// Headless chat - line-based conversation with the advice assistant
//
// Reads one message per line. Lines starting with '/' are commands:
//   /pet <id>   switch context to a pet (starts a new conversation)
//   /pet        switch back to general questions
//   /quit       exit

use crate::advice::AdviceGenerator;
use crate::chat::{ChatSession, Role, SessionCache};
use crate::data::Dataset;
use anyhow::{bail, Result};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

/// Run the chat against stdin/stdout
pub async fn run_chat(
    data: &Dataset,
    pet_id: Option<&str>,
    advisor: Arc<dyn AdviceGenerator>,
) -> Result<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    run_chat_with(data, pet_id, advisor.as_ref(), stdin, stdout).await
}

async fn run_chat_with<R, W>(
    data: &Dataset,
    pet_id: Option<&str>,
    advisor: &dyn AdviceGenerator,
    input: R,
    mut output: W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut pet = match pet_id {
        Some(id) => match data.pet(id) {
            Some(pet) => Some(pet.clone()),
            None => bail!("Unknown pet id '{}' (see `petpal pets`)", id),
        },
        None => None,
    };

    tracing::info!(advisor = advisor.name(), pet = ?pet.as_ref().map(|p| &p.id), "Starting headless chat");

    let mut cache = SessionCache::new();
    print_transcript(&mut output, cache.session_for(pet.as_ref())).await?;

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();

        if let Some(command) = line.strip_prefix('/') {
            let mut parts = command.split_whitespace();
            match (parts.next(), parts.next()) {
                (Some("quit"), _) | (Some("exit"), _) => break,
                (Some("pet"), id) => {
                    let next = match id {
                        Some(id) => match data.pet(id) {
                            Some(found) => Some(found.clone()),
                            None => {
                                write_line(&mut output, &format!("! no pet with id '{id}'")).await?;
                                continue;
                            }
                        },
                        None => None,
                    };
                    pet = next;
                    print_transcript(&mut output, cache.session_for(pet.as_ref())).await?;
                }
                _ => write_line(&mut output, "! commands: /pet [id], /quit").await?,
            }
            continue;
        }

        let session = cache.session_for(pet.as_ref());
        match session.send_message(line, advisor).await {
            Ok(()) => {
                if let Some(reply) = session.messages().last() {
                    write_line(&mut output, &format!("petpal> {}", reply.text)).await?;
                }
            }
            Err(rejection) => {
                tracing::debug!(%rejection, "Send rejected");
            }
        }
    }

    output.flush().await?;
    Ok(())
}

async fn print_transcript<W: AsyncWrite + Unpin>(output: &mut W, session: &ChatSession) -> Result<()> {
    for message in session.messages() {
        let who = match message.role {
            Role::Assistant => "petpal",
            Role::User => "you",
        };
        write_line(output, &format!("{who}> {}", message.text)).await?;
    }
    Ok(())
}

async fn write_line<W: AsyncWrite + Unpin>(output: &mut W, line: &str) -> Result<()> {
    output.write_all(line.as_bytes()).await?;
    output.write_all(b"\n").await?;
    output.flush().await?;
    Ok(())
}
