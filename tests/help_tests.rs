// tests/help_tests.rs
//
// The `commands`/`help` built-in: listing excludes hidden commands, per
// command help shows description and usage, and hidden or unknown names
// both report not-found.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::time::timeout;

use wrenbot::args::NamedParams;
use wrenbot::commands::{CommandContext, CommandHandler};
use wrenbot::error::Error;
use wrenbot::models::{ChatMessage, Chatter, CommandOptions, DeliveryKind};
use wrenbot::test_utils::helpers::RecordingTransport;
use wrenbot::transport::TransportEvent;
use wrenbot::{ClientBuilder, ClientEvent, ClientOptions, CommandClient};

struct Noop;

#[async_trait]
impl CommandHandler for Noop {
    async fn run(
        &self,
        _ctx: CommandContext,
        _msg: ChatMessage,
        _params: NamedParams,
    ) -> Result<Option<String>, Error> {
        Ok(None)
    }
}

fn fixture() -> (Arc<RecordingTransport>, CommandClient) {
    let transport = Arc::new(RecordingTransport::new("botname"));

    let mut greet = CommandOptions::named("greet");
    greet.description = "Sends a greeting.".to_string();
    greet.examples = vec!["!greet".to_string(), "!greet <name>".to_string()];

    let mut secret = CommandOptions::named("secret");
    secret.hide_from_help = true;

    let client = ClientBuilder::new(ClientOptions::new("botname", "secret"), transport.clone())
        .register(greet, Arc::new(Noop))
        .register(secret, Arc::new(Noop))
        .register_default_commands()
        .build()
        .expect("client should build");

    (transport, client)
}

async fn send_and_settle(
    client: &CommandClient,
    rx: &mut mpsc::Receiver<ClientEvent>,
    text: &str,
) {
    client
        .handle_event(TransportEvent::Message {
            channel: "#somechannel".to_string(),
            author: Chatter::named("viewer"),
            text: text.to_string(),
            kind: DeliveryKind::Chat,
            is_self: false,
        })
        .await;
    loop {
        let event = timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out waiting for dispatch outcome")
            .expect("event bus closed");
        match event {
            ClientEvent::CommandExecuted { .. } | ClientEvent::CommandError { .. } => return,
            _ => continue,
        }
    }
}

#[tokio::test]
async fn listing_skips_hidden_commands() {
    let (transport, client) = fixture();
    let mut rx = client.events().subscribe(None).await;

    send_and_settle(&client, &mut rx, "!commands").await;

    assert_eq!(
        transport.said(),
        vec!["@viewer, Command list → !greet, !commands, !txt".to_string()]
    );
}

#[tokio::test]
async fn help_alias_lists_the_same_commands() {
    let (transport, client) = fixture();
    let mut rx = client.events().subscribe(None).await;

    send_and_settle(&client, &mut rx, "!help").await;

    assert_eq!(
        transport.said(),
        vec!["@viewer, Command list → !greet, !commands, !txt".to_string()]
    );
}

#[tokio::test]
async fn per_command_help_shows_description_and_usage() {
    let (transport, client) = fixture();
    let mut rx = client.events().subscribe(None).await;

    send_and_settle(&client, &mut rx, "!help greet").await;

    assert_eq!(
        transport.said(),
        vec!["@viewer, Sends a greeting., Usage: !greet, !greet <name>".to_string()]
    );
}

#[tokio::test]
async fn command_without_examples_omits_usage() {
    let (transport, client) = fixture();
    let mut rx = client.events().subscribe(None).await;

    send_and_settle(&client, &mut rx, "!help txt").await;

    assert_eq!(
        transport.said(),
        vec!["@viewer, Manage text commands: set, get, unset, access, type".to_string()]
    );
}

#[tokio::test]
async fn hidden_command_reports_not_found() {
    let (transport, client) = fixture();
    let mut rx = client.events().subscribe(None).await;

    send_and_settle(&client, &mut rx, "!help secret").await;

    assert_eq!(
        transport.said(),
        vec!["@viewer, command 'secret' not found".to_string()]
    );
}

#[tokio::test]
async fn unknown_command_reports_not_found() {
    let (transport, client) = fixture();
    let mut rx = client.events().subscribe(None).await;

    send_and_settle(&client, &mut rx, "!help ghost").await;

    assert_eq!(
        transport.said(),
        vec!["@viewer, command 'ghost' not found".to_string()]
    );
}
