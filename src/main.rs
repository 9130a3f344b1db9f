use orderbot::config::Config;
use orderbot::{FileSessionStore, LogSink, OrderBot, WebDriverBrowser};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Configuration error: {}", e);
            std::process::exit(2);
        }
    };

    setup_logging(config.verbose);

    let filter = config.keyword_filter();

    tracing::info!("📊 Configuration:");
    tracing::info!("  Keywords: {}", filter.len());
    for keyword in &config.keywords {
        tracing::info!("    - {}", keyword);
    }
    tracing::info!("  Poll interval: {:?}", config.poll_interval);
    tracing::info!("  Headless: {}", config.headless);
    tracing::info!("  Session file: {}", config.session_file.display());

    let browser = match WebDriverBrowser::connect(&config.webdriver_url, config.headless).await {
        Ok(browser) => browser,
        Err(e) => {
            tracing::error!(
                "Could not start a browser session at {}: {}",
                config.webdriver_url,
                e
            );
            std::process::exit(1);
        }
    };

    let store = FileSessionStore::new(config.session_file.clone());
    let bot = OrderBot::new(
        browser,
        store,
        config.credentials.clone(),
        filter,
        config.poll_interval,
        Arc::new(LogSink),
    );

    tracing::info!("\nPress Ctrl+C to stop...\n");

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("⚠️  Received Ctrl+C, shutting down...");
        }
        result = bot.run() => {
            // run() only returns on a fatal login failure
            if let Err(e) = result {
                tracing::error!("❌ Login failed: {}", e);
                std::process::exit(1);
            }
        }
    }

    tracing::info!("👋 Orderbot stopped");
}

fn setup_logging(verbose: bool) {
    let filter = if verbose {
        "orderbot=debug"
    } else {
        "orderbot=info"
    };

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
