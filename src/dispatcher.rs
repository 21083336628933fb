//! The dispatch controller: consumes transport events, runs the
//! parse → lookup → validate → bind → invoke pipeline per message, and
//! publishes outcomes on the event bus. Handlers are spawned, not
//! awaited, so a slow command never blocks the next inbound message.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::args;
use crate::commands::help::HelpCommand;
use crate::commands::text_manager::TextCommandsManager;
use crate::commands::{CommandContext, CommandHandler};
use crate::config::ClientOptions;
use crate::error::Error;
use crate::eventbus::{ClientEvent, EventBus};
use crate::models::{ChatMessage, Chatter, CommandOptions, DeliveryKind};
use crate::parser::CommandParser;
use crate::rate_limit::RateLimiter;
use crate::registry::{CommandEntry, CommandRegistry};
use crate::sender::MessageSender;
use crate::store::TextCommandStore;
use crate::transport::{ChatTransport, TransportEvent};
use crate::validate::{pre_validate, Verdict};

/// Applied when the bot's own identity speaks without an elevated role;
/// guards against self-triggered command loops.
const SELF_ECHO_GRACE: Duration = Duration::from_secs(1);

/// Startup manifest: commands are declared against the builder and
/// resolved once, before the client exists.
pub struct ClientBuilder {
    options: ClientOptions,
    transport: Arc<dyn ChatTransport>,
    manifest: Vec<(CommandOptions, Arc<dyn CommandHandler>)>,
    text_store_path: Option<PathBuf>,
    with_defaults: bool,
}

impl ClientBuilder {
    pub fn new(options: ClientOptions, transport: Arc<dyn ChatTransport>) -> Self {
        Self {
            options,
            transport,
            manifest: Vec::new(),
            text_store_path: None,
            with_defaults: false,
        }
    }

    pub fn register(mut self, options: CommandOptions, handler: Arc<dyn CommandHandler>) -> Self {
        self.manifest.push((options, handler));
        self
    }

    /// Persist text commands in the document at `path`.
    pub fn with_text_commands(mut self, path: PathBuf) -> Self {
        self.text_store_path = Some(path);
        self
    }

    /// Wire the built-in commands (`commands`/`help` and `txt`).
    pub fn register_default_commands(mut self) -> Self {
        self.with_defaults = true;
        self
    }

    pub fn build(self) -> Result<CommandClient, Error> {
        self.options.check()?;

        let parser = CommandParser::new(&self.options.prefix)?;
        let registry = Arc::new(CommandRegistry::new());

        for (options, handler) in self.manifest {
            info!(command = %options.name, "registering command");
            registry.register(CommandEntry::new(options, handler));
        }

        let store = self
            .text_store_path
            .map(|path| TextCommandStore::open(&path, Arc::clone(&registry)))
            .transpose()?
            .map(Arc::new);

        if self.with_defaults {
            registry.register(CommandEntry::new(
                HelpCommand::options(&self.options.prefix),
                Arc::new(HelpCommand),
            ));
            registry.register(CommandEntry::new(
                TextCommandsManager::options(),
                Arc::new(TextCommandsManager::new(store.clone())),
            ));
        }

        let rate = Arc::new(RateLimiter::new(
            self.options.bot_tier,
            self.options.enable_rate_limiting_control,
        ));
        let sender = Arc::new(MessageSender::new(
            Arc::clone(&self.transport),
            Arc::clone(&rate),
        ));

        info!(prefix = %self.options.prefix, "command client built");

        Ok(CommandClient {
            options: self.options,
            parser,
            registry,
            rate,
            sender,
            transport: self.transport,
            bus: EventBus::new(),
            store,
            channels_with_mod: Mutex::new(Vec::new()),
        })
    }
}

pub struct CommandClient {
    options: ClientOptions,
    parser: CommandParser,
    registry: Arc<CommandRegistry>,
    rate: Arc<RateLimiter>,
    sender: Arc<MessageSender>,
    transport: Arc<dyn ChatTransport>,
    bus: EventBus,
    store: Option<Arc<TextCommandStore>>,
    channels_with_mod: Mutex<Vec<String>>,
}

impl CommandClient {
    pub fn events(&self) -> &EventBus {
        &self.bus
    }

    pub fn registry(&self) -> Arc<CommandRegistry> {
        Arc::clone(&self.registry)
    }

    pub fn store(&self) -> Option<Arc<TextCommandStore>> {
        self.store.clone()
    }

    pub fn sender(&self) -> Arc<MessageSender> {
        Arc::clone(&self.sender)
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Channels where the bot currently holds the moderator role.
    pub fn channels_with_mod(&self) -> Vec<String> {
        self.channels_with_mod.lock().unwrap().clone()
    }

    /// Drive the client from a transport event stream until it closes.
    pub async fn run(&self, mut events: mpsc::Receiver<TransportEvent>) {
        while let Some(event) = events.recv().await {
            if self.bus.is_shutdown() {
                break;
            }
            self.handle_event(event).await;
        }
        self.rate.shutdown();
    }

    pub async fn handle_event(&self, event: TransportEvent) {
        match event {
            TransportEvent::Connected => {
                info!("connected to chat");
                self.join_startup_channels().await;
                self.bus.publish(ClientEvent::Connected).await;
            }
            TransportEvent::Disconnected => {
                info!("disconnected from chat");
                self.rate.shutdown();
                self.bus.publish(ClientEvent::Disconnected).await;
            }
            TransportEvent::Reconnecting => {
                self.bus.publish(ClientEvent::Reconnecting).await;
            }
            TransportEvent::Joined { channel, who } => {
                if self.options.greet_on_join
                    && who == self.transport.username()
                    && !self.options.on_join_message.is_empty()
                {
                    if let Err(e) = self
                        .sender
                        .action(&channel, &self.options.on_join_message)
                        .await
                    {
                        error!(channel = %channel, "failed to send join greeting: {e}");
                    }
                }
                self.bus.publish(ClientEvent::Joined { channel, who }).await;
            }
            TransportEvent::Timeout {
                channel,
                who,
                reason,
                duration_seconds,
            } => {
                self.bus
                    .publish(ClientEvent::Timeout {
                        channel,
                        who,
                        reason,
                        duration_seconds,
                    })
                    .await;
            }
            TransportEvent::ModGranted { channel, who } => {
                if who == self.transport.username() {
                    let mut channels = self.channels_with_mod.lock().unwrap();
                    if !channels.contains(&channel) {
                        debug!(channel = %channel, "bot has received mod role");
                        channels.push(channel.clone());
                    }
                }
                self.bus
                    .publish(ClientEvent::ModGranted { channel, who })
                    .await;
            }
            TransportEvent::ModRevoked { channel, who } => {
                if who == self.transport.username() {
                    debug!(channel = %channel, "bot mod role revoked");
                    self.channels_with_mod
                        .lock()
                        .unwrap()
                        .retain(|c| c != &channel);
                }
                self.bus
                    .publish(ClientEvent::ModRevoked { channel, who })
                    .await;
            }
            TransportEvent::Message {
                channel,
                author,
                text,
                kind,
                is_self,
            } => {
                self.on_message(channel, author, text, kind, is_self).await;
            }
        }
    }

    async fn join_startup_channels(&self) {
        let mut channels = self.options.channels.clone();
        if self.options.auto_join_bot_channel {
            channels.push(format!("#{}", self.transport.username()));
        }
        info!(count = channels.len(), "autojoining channels");
        for channel in channels {
            if let Err(e) = self.transport.join(&channel).await {
                error!(channel = %channel, "failed to join: {e}");
            }
        }
    }

    async fn on_message(
        &self,
        channel: String,
        author: Chatter,
        text: String,
        kind: DeliveryKind,
        is_self: bool,
    ) {
        if is_self {
            return;
        }

        let msg = ChatMessage::new(&channel, author, &text, kind);

        if msg.author.username == self.transport.username() && !self.is_elevated_self(&msg) {
            tokio::time::sleep(SELF_ECHO_GRACE).await;
        }

        // Every message becomes a chat event, command or not.
        self.bus
            .publish(ClientEvent::Message {
                channel: msg.channel.name.clone(),
                user: msg.author.username.clone(),
                text: msg.text.clone(),
                timestamp: msg.timestamp,
            })
            .await;

        let Some(invocation) = self.parser.parse(&msg.text) else {
            return;
        };

        let Some(entry) = self.registry.find(&invocation.command) else {
            debug!(command = %invocation.command, "no command matched");
            return;
        };

        let verdict = pre_validate(
            &entry.options,
            &msg,
            &self.transport.username(),
            &self.options.bot_owners,
        );
        if let Verdict::Denied(reason) = verdict {
            debug!(command = %entry.options.name, "validation denied");
            if let Err(e) = self.sender.reply(&msg, &reason).await {
                error!("failed to send denial reply: {e}");
            }
            return;
        }

        let params = args::bind(&entry.options.args, &invocation.args);
        let command = entry.options.name.clone();
        let channel_name = msg.channel.name.clone();
        let ctx = CommandContext {
            options: entry.options.clone(),
            invocation,
            sender: Arc::clone(&self.sender),
            registry: Arc::clone(&self.registry),
            prefix: self.options.prefix.clone(),
        };

        let handler = Arc::clone(&entry.handler);
        let sender = Arc::clone(&self.sender);
        let bus = self.bus.clone();

        // Invocations run to completion concurrently; failures are
        // contained here and never crash the controller.
        tokio::spawn(async move {
            match handler.run(ctx, msg.clone(), params).await {
                Ok(result) => {
                    bus.publish(ClientEvent::CommandExecuted {
                        command,
                        channel: channel_name,
                        result,
                    })
                    .await;
                }
                Err(err) => {
                    error!(command = %command, "command failed: {err}");
                    let reply = format!("Unexpected error: {}", err);
                    if let Err(send_err) = sender.reply(&msg, &reply).await {
                        error!("failed to send error reply: {send_err}");
                    }
                    bus.publish(ClientEvent::CommandError {
                        command,
                        channel: channel_name,
                        error: err.to_string(),
                    })
                    .await;
                }
            }
        });
    }

    fn is_elevated_self(&self, msg: &ChatMessage) -> bool {
        msg.author.is_broadcaster || msg.author.is_moderator || msg.author.is_vip
    }
}
