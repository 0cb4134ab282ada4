//! NS Logger Telegram console
//!
//! Main application entry point

use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::{MaybeInaccessibleMessage, Update};
use teloxide::utils::command::BotCommands;
use tracing::{error, info, warn};

use nslogger::{
    config::Settings,
    database::{connection, DatabaseService},
    handlers::callbacks::{dispatch_callback, IncomingCallback},
    handlers::commands::start,
    handlers::messages::{dispatch_message, IncomingMessage},
    services::TelegramGateway,
    state::AppContext,
    utils::logging,
};

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "NS Logger commands")]
enum Command {
    #[command(description = "Start the console and show the main menu")]
    Start,
    #[command(description = "Show your profile and rank")]
    Me,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging; the guard must outlive the dispatcher.
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting NS Logger console...");

    // Initialize database
    info!("Connecting to database...");
    let pool = connection::create_pool(&settings.storage.database_url).await?;
    connection::run_migrations(&pool).await?;
    let db = DatabaseService::new(pool);
    db.bootstrap(&settings.bootstrap).await?;

    // Initialize bot and application context
    let bot = Bot::new(&settings.bot.token);
    let gateway = Arc::new(TelegramGateway::new(bot.clone()));
    let ctx = Arc::new(AppContext::new(settings, db, gateway));

    info!("NS Logger console is ready!");

    let handler = dptree::entry()
        .branch(
            Update::filter_message()
                .branch(
                    dptree::entry()
                        .filter_command::<Command>()
                        .endpoint(handle_command),
                )
                .branch(dptree::endpoint(handle_message)),
        )
        .branch(Update::filter_callback_query().endpoint(handle_callback));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![ctx])
        .default_handler(|update| async move {
            warn!("Unhandled update: {:?}", update);
        })
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("NS Logger console has been shut down.");
    Ok(())
}

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

fn incoming_message(msg: &Message) -> Option<IncomingMessage> {
    let from = msg.from.as_ref()?;
    let text = msg.text()?;
    Some(IncomingMessage {
        chat_id: msg.chat.id.0,
        username: from.username.clone().unwrap_or_default(),
        user_id: from.id.0 as i64,
        first_name: Some(from.first_name.clone()),
        text: text.to_string(),
    })
}

async fn handle_command(msg: Message, cmd: Command, ctx: Arc<AppContext>) -> HandlerResult {
    let Some(incoming) = incoming_message(&msg) else {
        return Ok(());
    };

    let result = match cmd {
        Command::Start => start::handle_start(&ctx, &incoming).await,
        Command::Me => start::handle_me(&ctx, &incoming).await,
    };

    if let Err(e) = result {
        error!(chat_id = incoming.chat_id, error = %e, "Error handling command");
    }
    Ok(())
}

async fn handle_message(msg: Message, ctx: Arc<AppContext>) -> HandlerResult {
    if let Some(incoming) = incoming_message(&msg) {
        dispatch_message(&ctx, incoming).await;
    }
    Ok(())
}

async fn handle_callback(query: CallbackQuery, ctx: Arc<AppContext>) -> HandlerResult {
    let Some(MaybeInaccessibleMessage::Regular(message)) = query.message else {
        // Without an originating message there is no chat to render into.
        return Ok(());
    };
    let Some(data) = query.data else {
        return Ok(());
    };

    let incoming = IncomingCallback {
        callback_id: query.id,
        chat_id: message.chat.id.0,
        username: query.from.username.clone().unwrap_or_default(),
        user_id: query.from.id.0 as i64,
        data,
    };
    dispatch_callback(&ctx, incoming).await;
    Ok(())
}
