mod analyzer;
mod api;
mod config;
mod console;
mod loader;
mod model;
mod normalizer;
mod session;
mod storage;
#[cfg(test)]
mod test_support;
mod utils;

use analyzer::{Matcher, MatcherImpl, filter_products};
use api::CatalogSource;
use clap::{Parser, Subcommand};
use config::{AppConfig, MatchStrategy, load_config};
use console::Console;
use console::render::{Palette, render_error, render_matches, render_products, render_user};
use model::{Category, Product};
use session::{AppContext, Registration, ThemeMode};
use std::io::IsTerminal;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "proglide", version, about = "ProGlide accessory compatibility lookup")]
struct Cli {
    /// Path to the JSON config file
    #[arg(long, default_value = "config.json")]
    config: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and remember the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account and sign in
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        shop_name: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in account
    Whoami,
    /// Show or change the colour theme (light, dark or toggle)
    Theme { mode: Option<String> },
    /// List catalog products
    Browse {
        #[arg(long)]
        category: Option<Category>,
        #[arg(long, default_value = "")]
        query: String,
    },
    /// Find devices sharing accessories with DEVICE
    Match {
        device: String,
        #[arg(long)]
        category: Option<Category>,
        /// Also list slightly narrower screen guards
        #[arg(long)]
        similar: bool,
        /// Match listed names by containment instead of equality
        #[arg(long)]
        contains: bool,
        /// Print the tiers as JSON
        #[arg(long)]
        json: bool,
    },
    /// Interactive lookup (default)
    Explore,
}

#[tokio::main]
async fn main() {
    // Initialize logging (stderr, RUST_LOG overrides the level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    // Set panic hook to log details about any panic
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("😱 Panic occurred: {:?}", panic_info);
    }));

    // Parse command line arguments
    let cli = Cli::parse();

    // Load configuration from file
    let config: Arc<AppConfig> = match load_config(&cli.config) {
        Ok(cfg) => Arc::new(cfg),
        Err(e) => {
            error!("Config load error: {}", e);
            fail("❌ Could not read the config file.");
        }
    };

    // Open local storage and restore the saved session and theme
    let mut ctx = match AppContext::open(config.clone()).await {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Failed to initialize: {}", e);
            fail("❌ Could not open local storage or the API client.");
        }
    };

    // Colour only when writing to a terminal
    let color = std::io::stdout().is_terminal();
    let palette = Palette::for_theme(ctx.theme(), color);

    // Run the requested command
    match cli.command.unwrap_or(Commands::Explore) {
        Commands::Login { email, password } => match ctx.login(&email, &password).await {
            Ok(user) => print!("{}", render_user(user, true)),
            Err(e) => fail(&format!("❌ {}", e)),
        },
        Commands::Register { name, email, phone, shop_name, password, confirm_password } => {
            let form = Registration { name, email, phone, shop_name, password, confirm_password };
            match ctx.register(&form).await {
                Ok(user) => print!("{}", render_user(user, true)),
                Err(e) => fail(&format!("❌ {}", e)),
            }
        }
        Commands::Logout => {
            ctx.logout().await;
            println!("👋 Signed out.");
        }
        Commands::Whoami => {
            print!("{}", render_user(ctx.current_user(), ctx.is_authenticated()));
            if let Some(at) = ctx.session().and_then(|s| s.signed_in_at) {
                println!("   Since {}", at.format("%Y-%m-%d %H:%M UTC"));
            }
        }
        Commands::Theme { mode } => {
            let result = match mode.as_deref() {
                None => Ok(ctx.theme()),
                Some("toggle") => ctx.toggle_theme().await,
                Some(raw) => match ThemeMode::parse(raw) {
                    Some(theme) => ctx.set_theme(theme).await.map(|_| theme),
                    None => fail(&format!("❌ Unknown theme '{}'. Use light, dark or toggle.", raw)),
                },
            };
            match result {
                Ok(theme) => println!("🎨 Theme: {}", theme.as_str()),
                Err(e) => fail(&format!("❌ Could not save the theme: {}", e)),
            }
        }
        Commands::Browse { category, query } => {
            let products = fetch_or_exit(&ctx, category).await;
            let listed = filter_products(&products, category, &query);
            print!("{}", render_products(&listed, &palette));
        }
        Commands::Match { device, category, similar, contains, json } => {
            let category = category.unwrap_or_else(|| config.default_category());
            let mut matcher_config = config.matcher.clone();
            matcher_config.include_similar |= similar;
            if contains {
                matcher_config.strategy = MatchStrategy::Contains;
            }

            // Fetch only the requested category
            let products = fetch_or_exit(&ctx, Some(category)).await;
            let result = MatcherImpl::new(matcher_config).compute_matches(&products, &device, category);

            if json {
                match serde_json::to_string_pretty(&result) {
                    Ok(text) => println!("{}", text),
                    Err(e) => fail(&format!("Failed to encode result: {}", e)),
                }
            } else {
                print!("{}", render_matches(&result, &device, category, &palette).text);
            }
        }
        Commands::Explore => {
            // Interactive loop over stdin until /quit or end of input
            let source: Arc<dyn CatalogSource> = ctx.client.clone();
            let (mut console, outcomes) = Console::new(ctx, source, Box::new(std::io::stdout()), color);
            console::listener::run(&mut console, BufReader::new(tokio::io::stdin()), outcomes).await;
        }
    }

    info!("Done");
}

async fn fetch_or_exit(ctx: &AppContext, category: Option<Category>) -> Vec<Product> {
    match ctx.client.get_products(category).await {
        Ok(products) => products,
        Err(e) => fail(&render_error(&e)),
    }
}

fn fail(message: &str) -> ! {
    eprintln!("{}", message);
    std::process::exit(1);
}
