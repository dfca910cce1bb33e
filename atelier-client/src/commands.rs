//! Subcommand implementations

use std::io::Write as _;
use std::path::Path;

use tokio::io::{AsyncBufReadExt, BufReader};

use atelier_protocol::{ChatCreate, InboundEvent};
use atelier_utils::{paths, AtelierError, Result};

use crate::api::ApiClient;
use crate::cli::{Args, Command};
use crate::config::ClientConfig;
use crate::credentials::Credentials;
use crate::session::SessionCoordinator;
use crate::workspace::status_presentation;

/// Dispatch a parsed command line.
///
/// A rejected token clears the stored credentials on the way out so the next
/// invocation prompts for login instead of failing the same way again.
pub async fn run(args: Args) -> Result<()> {
    let config = ClientConfig::load(args.api.as_deref())?;
    let api = ApiClient::new(config.api_base.clone());

    let result = dispatch(&api, &config, args.command).await;
    if let Err(e) = &result {
        clear_rejected_credentials(e, &paths::token_file());
    }
    result
}

/// Delete the stored token when the backend has rejected it, so the next
/// invocation asks for login instead of failing the same way again.
fn clear_rejected_credentials(err: &AtelierError, token_path: &Path) {
    if !err.invalidates_credentials() {
        return;
    }
    if let Err(clear_err) = Credentials::clear_at(token_path) {
        tracing::warn!("Failed to clear rejected credentials: {}", clear_err);
    } else {
        tracing::info!("Cleared stored credentials after rejection");
    }
}

async fn dispatch(api: &ApiClient, config: &ClientConfig, command: Command) -> Result<()> {
    match command {
        Command::Login { username } => login(api, &username).await,
        Command::Whoami => whoami(api).await,
        Command::Chats => chats(api).await,
        Command::Stacks => stacks(api).await,
        Command::New {
            name,
            stack,
            team,
            prompt,
        } => new_chat(api, name, stack, team, prompt).await,
        Command::Open { chat_id } => open(api, config, chat_id).await,
    }
}

fn require_credentials() -> Result<Credentials> {
    Credentials::load()?.ok_or_else(|| {
        AtelierError::config("Not logged in (run `atelier login <username>` first)")
    })
}

async fn login(api: &ApiClient, username: &str) -> Result<()> {
    let auth = api.create_user(username).await?;
    Credentials::new(&auth.token).store()?;
    println!("Logged in as {} (user #{})", auth.user.username, auth.user.id);
    Ok(())
}

async fn whoami(api: &ApiClient) -> Result<()> {
    let creds = require_credentials()?;
    let user = api.me(&creds).await?;
    println!("{} (user #{})", user.username, user.id);
    Ok(())
}

async fn chats(api: &ApiClient) -> Result<()> {
    let creds = require_credentials()?;
    let chats = api.list_chats(&creds).await?;
    if chats.is_empty() {
        println!("No chats yet (run `atelier new <name>`)");
        return Ok(());
    }
    for chat in chats {
        match chat.updated_at {
            Some(updated) => println!("{:>6}  {}  ({})", chat.id, chat.name, updated),
            None => println!("{:>6}  {}", chat.id, chat.name),
        }
    }
    Ok(())
}

async fn stacks(api: &ApiClient) -> Result<()> {
    let creds = require_credentials()?;
    for stack in api.list_stacks(&creds).await? {
        println!("{:>6}  {}  - {}", stack.id, stack.title, stack.description);
    }
    Ok(())
}

async fn new_chat(
    api: &ApiClient,
    name: String,
    stack: Option<i64>,
    team: Option<i64>,
    prompt: Option<String>,
) -> Result<()> {
    let creds = require_credentials()?;
    let chat = api
        .create_chat(
            &creds,
            &ChatCreate {
                name,
                stack_id: stack,
                team_id: team,
                seed_prompt: prompt,
                ..Default::default()
            },
        )
        .await?;
    println!("Created chat #{} ({})", chat.id, chat.name);
    println!("Open it with: atelier open {}", chat.id);
    Ok(())
}

/// Interactive session: stream the assistant's turns to stdout while reading
/// user turns from stdin. Exits when the server closes the socket or stdin
/// reaches end of file.
async fn open(api: &ApiClient, config: &ClientConfig, chat_id: i64) -> Result<()> {
    let creds = require_credentials()?;

    let chat = api.get_chat(&creds, chat_id).await?;
    let mut session = SessionCoordinator::new();
    if let Some(messages) = chat.messages {
        session.seed_transcript(messages);
    }

    let ws_url = config.ws_url(chat_id, creds.token())?;
    session.open(ws_url.as_str()).await?;

    let mut status_label = status_presentation(session.status()).label;
    println!("[{}] {}", chat.name, status_label);

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        tokio::select! {
            event = session.recv_event() => {
                let Some(event) = event else {
                    println!();
                    println!("Session closed by server");
                    break;
                };

                // Render the event before folding it in
                match &event {
                    InboundEvent::ChatChunk { content, complete, .. } => {
                        print!("{}", content);
                        if *complete {
                            println!();
                        }
                        let _ = std::io::stdout().flush();
                    }
                    InboundEvent::SandboxFileTree { paths } => {
                        tracing::debug!(files = paths.len(), "File tree updated");
                    }
                    _ => {}
                }

                session.apply(event);

                let label = status_presentation(session.status()).label;
                if label != status_label {
                    status_label = label;
                    println!("[{}] {}", chat.name, status_label);
                    if let Some(url) = session.preview_url() {
                        println!("Preview: {}", url);
                    }
                }
            }

            line = lines.next_line() => {
                match line {
                    Ok(Some(line)) => {
                        let line = line.trim();
                        if line.is_empty() {
                            continue;
                        }
                        session.push_user(line);
                        let transcript = session.model().transcript.clone();
                        if let Err(e) = session.send_turn(transcript).await {
                            eprintln!("Could not send: {}", e);
                        }
                    }
                    Ok(None) => break,
                    Err(e) => return Err(e.into()),
                }
            }
        }
    }

    session.close();
    Ok(())
}
