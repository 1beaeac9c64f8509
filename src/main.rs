//! MentorBuddy Telegram Bot
//!
//! Main application entry point

use std::sync::Arc;
use std::time::Duration;

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::{Message, Update};
use teloxide::utils::command::BotCommands as TeloxideBotCommands;
use tracing::{error, info, warn};

use MentorBuddy::{
    config::Settings,
    handlers::{
        commands::{admin as admin_commands, help, start},
        messages,
    },
    middleware,
    services::{maintenance::MaintenanceCoordinator, Notifier, ServiceFactory},
    state::BusyRegistry,
    storage::SnapshotStore,
    utils::logging,
};

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging; the guard keeps the file writer alive
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting MentorBuddy Telegram Bot...");

    // Open the snapshot store
    info!("Opening snapshot store at {}", settings.storage.data_dir);
    let store = Arc::new(SnapshotStore::open(&settings.storage.data_dir).await?);

    // Initialize bot
    let bot = Bot::new(&settings.bot.token);

    // Initialize services
    info!("Initializing services...");
    let services = ServiceFactory::new(settings.clone(), store.clone())?;
    let coordinator = MaintenanceCoordinator::new();
    let busy = BusyRegistry::new();

    // Start the deadline reminder scheduler
    let notifier = Notifier::new(bot.clone(), store.clone(), services.auth_service.clone());
    let tick_interval = Duration::from_secs(settings.notifier.tick_seconds);
    tokio::spawn(notifier.run(tick_interval));

    // Create the handler
    let handler = create_handler();

    // Create dispatcher with dependencies registered
    let mut dispatcher = Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![
            Arc::new(services),
            Arc::new(coordinator),
            Arc::new(busy)
        ])
        .default_handler(|upd| async move {
            warn!("Unhandled update: {:?}", upd);
        })
        .enable_ctrlc_handler()
        .build();

    info!("MentorBuddy bot is ready, starting polling...");

    dispatcher.dispatch().await;

    info!("MentorBuddy bot has been shut down.");

    Ok(())
}

/// Create the main update handler
fn create_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    use teloxide::dispatching::UpdateFilterExt;

    dptree::entry().branch(
        Update::filter_message()
            .branch(
                // Maintenance gate: while a sync window is open, everything
                // except the allow-listed commands is short-circuited
                dptree::filter(|msg: Message, coordinator: Arc<MaintenanceCoordinator>| {
                    middleware::maintenance::should_block(&coordinator, msg.text())
                })
                .endpoint(handle_blocked_message),
            )
            .branch(
                // Handle commands
                dptree::entry()
                    .filter_command::<BotCommands>()
                    .endpoint(handle_commands),
            )
            .branch(
                // Handle reply-keyboard buttons and other text
                dptree::endpoint(handle_messages),
            ),
    )
}

#[derive(TeloxideBotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "MentorBuddy Bot Commands")]
enum BotCommands {
    #[command(description = "Start the bot and show the menu")]
    Start,
    #[command(description = "Show help information")]
    Help,
    #[command(description = "Create an administrator (admin only)")]
    NewAdmin(String),
}

/// Reply with the maintenance notice instead of normal handling
async fn handle_blocked_message(
    bot: Bot,
    msg: Message,
    coordinator: Arc<MaintenanceCoordinator>,
) -> HandlerResult {
    if let Err(e) = middleware::maintenance::reject(bot, msg, coordinator).await {
        error!(error = %e, "Error sending maintenance notice");
        return Err(e.into());
    }

    Ok(())
}

/// Handle bot commands
async fn handle_commands(
    bot: Bot,
    msg: Message,
    cmd: BotCommands,
    services: Arc<ServiceFactory>,
) -> HandlerResult {
    let services = (*services).clone();

    let result = match cmd {
        BotCommands::Start => start::handle_start(bot, msg, services).await,
        BotCommands::Help => help::handle_help(bot, msg).await,
        BotCommands::NewAdmin(args) => {
            admin_commands::handle_new_admin(bot, msg, args, services).await
        }
    };

    if let Err(e) = result {
        error!(error = %e, "Error handling command");
        return Err(e.into());
    }

    Ok(())
}

/// Handle regular messages
async fn handle_messages(
    bot: Bot,
    msg: Message,
    services: Arc<ServiceFactory>,
    coordinator: Arc<MaintenanceCoordinator>,
    busy: Arc<BusyRegistry>,
) -> HandlerResult {
    let services = (*services).clone();
    let coordinator = (*coordinator).clone();
    let busy = (*busy).clone();

    if let Err(e) = messages::handle_message(bot, msg, services, coordinator, busy).await {
        error!(error = %e, "Error handling message");
        return Err(e.into());
    }

    Ok(())
}
