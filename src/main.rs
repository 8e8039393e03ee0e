use anyhow::{bail, Context, Result};
use discord_webhook_notifier::state::FileTimestampStore;
use discord_webhook_notifier::{config, log, MessageSpec, WebhookNotifier};
use std::process::ExitCode;
use std::sync::Arc;

const USAGE: &str = "Usage: discord-webhook-notifier <message.json5> | --content <text>";

fn main() -> Result<ExitCode> {
    log::init_tracing();
    let log = log::get_logger();

    std::panic::set_hook(Box::new(|info| {
        log::get_logger().panic(info);
    }));

    log.start();

    let config = config::get_config().context("Unable to load config")?;
    let args: Vec<String> = std::env::args().skip(1).collect();
    let message = read_message(&args)?;

    let store = Arc::new(FileTimestampStore::new(&config.state_file));
    let notifier = WebhookNotifier::new(config.notifier, store.clone(), log.clone())?;

    log.info(&format!(
        "Cooldown is {}s, last send time kept in {}",
        notifier.config().cooldown.as_secs(),
        store.path().display()
    ));

    match notifier.send(&message) {
        Ok(delivery) if delivery.is_delivered() => Ok(ExitCode::SUCCESS),
        Ok(_) => Ok(ExitCode::FAILURE),
        Err(e) => {
            log.error(&format!("Error: {}", e));
            Ok(ExitCode::from(2))
        }
    }
}

fn read_message(args: &[String]) -> Result<MessageSpec> {
    match args {
        [flag, content] if flag == "--content" => Ok(MessageSpec::text(content)),
        [path] if !path.starts_with("--") => {
            let source = std::fs::read_to_string(path)
                .with_context(|| format!("Unable to read message file {}", path))?;

            MessageSpec::from_json5(&source)
                .with_context(|| format!("Unable to parse message file {}", path))
        }
        _ => bail!(USAGE),
    }
}
