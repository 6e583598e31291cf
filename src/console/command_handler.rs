// console/command_handler.rs

use crate::analyzer::filter_products;
use crate::console::Console;
use crate::console::render::{render_details, render_products, render_user};
use crate::model::Category;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    Pick(usize),
    Category(Option<String>),
    Browse(String),
    Details(usize),
    Refresh,
    Theme,
    WhoAmI,
    Logout,
    Help,
    Quit,
    Unknown(String),
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

const HELP: &str = "📋 Available commands:\n\
    <device>          match a device by name\n\
    /search <device>  same as typing the name\n\
    /pick <n>         search again with the n-th listed device\n\
    /category [name]  show or switch the category tab\n\
    /browse [text]    list products in the current category\n\
    /details <n>      show the n-th product from /browse\n\
    /refresh          reload the catalog\n\
    /theme            toggle light/dark\n\
    /whoami           current account\n\
    /logout           sign out\n\
    /help             this list\n\
    /quit             exit";

/// Splits a line into a command. Text without a leading slash is a search.
pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    if line.is_empty() {
        return Command::Empty;
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Command::Search(line.to_string());
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };
    let index = || arg.parse::<usize>().ok().filter(|n| *n > 0);

    match name.to_lowercase().as_str() {
        "search" | "s" if !arg.is_empty() => Command::Search(arg.to_string()),
        "pick" | "p" => index().map(Command::Pick).unwrap_or_else(|| Command::Unknown(line.to_string())),
        "category" | "c" => Command::Category((!arg.is_empty()).then(|| arg.to_string())),
        "browse" | "b" => Command::Browse(arg.to_string()),
        "details" | "d" => index().map(Command::Details).unwrap_or_else(|| Command::Unknown(line.to_string())),
        "refresh" | "r" => Command::Refresh,
        "theme" => Command::Theme,
        "whoami" | "me" => Command::WhoAmI,
        "logout" => Command::Logout,
        "help" | "h" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        _ => Command::Unknown(line.to_string()),
    }
}

/// Handles an incoming line and triggers the corresponding action.
pub async fn handle_command(line: &str, console: &mut Console) -> Flow {
    let command = parse_command(line);
    info!("Handling command: {:?}", command);

    match command {
        Command::Empty => {}
        Command::Search(device) => console.search(&device),
        Command::Pick(n) => match console.last_devices.get(n - 1).cloned() {
            Some(device) => console.search(&device),
            None => console.say(&format!("❌ No device #{} in the last result.", n)),
        },
        Command::Category(None) => {
            let mut msg = String::from("🗂 Categories:\n");
            for category in Category::ALL {
                let marker = if category == console.category { "▸" } else { " " };
                msg.push_str(&format!(" {} {}\n", marker, category));
            }
            console.say(&msg);
        }
        Command::Category(Some(name)) => match Category::from_label(&name) {
            Some(category) => {
                console.category = category;
                console.say(&format!("🗂 Category: {}", category));
                if let Some(target) = console.target.clone() {
                    console.search(&target);
                }
            }
            None => console.say(&format!("❌ Unknown category '{}'. Type /category to list them.", name)),
        },
        Command::Browse(query) => match console.loader.catalog() {
            Some(catalog) => {
                let products: Vec<_> = filter_products(&catalog, Some(console.category), &query)
                    .into_iter()
                    .cloned()
                    .collect();
                let text = render_products(&products.iter().collect::<Vec<_>>(), &console.palette());
                console.last_products = products;
                console.say(&text);
            }
            None => console.say("⏳ Catalog not loaded yet. Use /refresh."),
        },
        Command::Details(n) => match console.last_products.get(n - 1) {
            Some(product) => {
                let text = render_details(product, &console.palette());
                console.say(&text);
            }
            None => console.say(&format!("❌ No product #{} in the last listing.", n)),
        },
        Command::Refresh => {
            console.say("🔄 Refreshing catalog...");
            console.refresh();
        }
        Command::Theme => match console.ctx.toggle_theme().await {
            Ok(theme) => console.say(&format!("🎨 Theme: {}", theme.as_str())),
            Err(e) => {
                warn!("/theme error: {:?}", e);
                console.say("❌ Could not save the theme preference.");
            }
        },
        Command::WhoAmI => {
            let text = render_user(console.ctx.current_user(), console.ctx.is_authenticated());
            console.say(&text);
        }
        Command::Logout => {
            console.ctx.logout().await;
            console.say("👋 Signed out.");
        }
        Command::Help => console.say(HELP),
        Command::Quit => return Flow::Quit,
        Command::Unknown(text) => {
            console.say(&format!("🤖 Unknown command '{}'. Type /help for a list of commands.", text));
        }
    }

    Flow::Continue
}
