// console/render.rs

use crate::model::{ApiError, Category, MatchResult, Product, User};
use crate::normalizer::normalize_device;
use crate::session::ThemeMode;
use crate::utils::{format_mm, short_id};
use std::fmt::Write;

/// Terminal colours for a theme. `plain()` renders without escape codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    accent: &'static str,
    muted: &'static str,
    bold: &'static str,
    reset: &'static str,
}

impl Palette {
    pub fn for_theme(theme: ThemeMode, color: bool) -> Self {
        if !color {
            return Self::plain();
        }
        match theme {
            // #9D470A
            ThemeMode::Light => Self {
                accent: "\x1b[38;2;157;71;10m",
                muted: "\x1b[38;2;107;114;128m",
                bold: "\x1b[1m",
                reset: "\x1b[0m",
            },
            // #F97316
            ThemeMode::Dark => Self {
                accent: "\x1b[38;2;249;115;22m",
                muted: "\x1b[38;2;156;163;175m",
                bold: "\x1b[1m",
                reset: "\x1b[0m",
            },
        }
    }

    pub fn plain() -> Self {
        Self { accent: "", muted: "", bold: "", reset: "" }
    }

    fn accent(&self, text: &str) -> String {
        format!("{}{}{}", self.accent, text, self.reset)
    }

    fn strong(&self, text: &str) -> String {
        format!("{}{}{}{}", self.bold, self.accent, text, self.reset)
    }

    fn muted(&self, text: &str) -> String {
        format!("{}{}{}", self.muted, text, self.reset)
    }
}

/// Rendered tier lists plus the devices in the order they were numbered.
pub struct RenderedMatches {
    pub text: String,
    pub devices: Vec<String>,
}

/// Renders tiers as numbered tag lists. The searched device is marked, not removed.
pub fn render_matches(result: &MatchResult, target: &str, category: Category, palette: &Palette) -> RenderedMatches {
    let mut text = String::new();
    let mut devices = Vec::new();
    let _ = writeln!(text, "🔎 {} · {}", palette.strong(target.trim()), category);

    if result.is_empty() {
        let _ = writeln!(text, "📭 No matches found for '{}' in {}.", target.trim(), category);
        let _ = writeln!(text, "{}", palette.muted("Try another device name or category."));
        return RenderedMatches { text, devices };
    }

    let target_key = normalize_device(target);
    for (tier, entries) in result.tiers() {
        let _ = writeln!(text, "{} ({})", palette.accent(tier), entries.len());
        if entries.is_empty() {
            let _ = writeln!(text, "   {}", palette.muted("none"));
            continue;
        }
        for entry in entries {
            devices.push(entry.clone());
            if normalize_device(entry) == target_key {
                let _ = writeln!(text, "  {:>2}. ▸ {}", devices.len(), palette.strong(entry));
            } else {
                let _ = writeln!(text, "  {:>2}.   {}", devices.len(), entry);
            }
        }
    }

    RenderedMatches { text, devices }
}

/// One line per product, numbered from 1.
pub fn render_products(products: &[&Product], palette: &Palette) -> String {
    if products.is_empty() {
        return format!("📭 No Items Found\n{}\n", palette.muted("Try changing your search or category"));
    }

    let mut text = String::new();
    for (i, product) in products.iter().enumerate() {
        let category = product.category.map(Category::label).unwrap_or("Uncategorized");
        let devices = product.compatible_devices.as_deref().unwrap_or("Unknown Device");
        let _ = write!(text, "{:>3}. [{}] {}", i + 1, palette.accent(category), devices);

        if let Some(specs) = &product.specs {
            if let Some(model) = specs.model_no.as_deref() {
                let _ = write!(text, " {}", palette.muted(&format!("· Model: {}", model)));
            }
            if let (Some(h), Some(w)) = (specs.height, specs.width) {
                let _ = write!(text, " {}", palette.muted(&format!("· {} x {} mm", format_mm(h), format_mm(w))));
            }
        }
        text.push('\n');
    }
    text
}

/// Full product card: identity, descriptive specs, dimensions and corner radii.
pub fn render_details(product: &Product, palette: &Palette) -> String {
    let mut text = String::new();
    let category = product.category.map(Category::label).unwrap_or("Uncategorized");
    let _ = writeln!(text, "{}", palette.accent(&category.to_uppercase()));
    let _ = writeln!(
        text,
        "{}",
        palette.strong(product.compatible_devices.as_deref().unwrap_or("Unknown Device"))
    );
    let _ = writeln!(text, "{}", palette.muted(&format!("ID: {}", short_id(&product.id))));

    let Some(specs) = &product.specs else {
        return text;
    };

    let _ = writeln!(text, "\n{}", palette.accent("Specifications"));
    for (label, value) in [
        ("Drawing Model", &specs.original_drawing_model),
        ("Base Model", &specs.base_model),
        ("Brand", &specs.brand_name),
        ("Model Number", &specs.model_no),
    ] {
        if let Some(value) = value.as_deref().filter(|v| !v.trim().is_empty()) {
            let _ = writeln!(text, "  {:<14}{}", label, value);
        }
    }

    if specs.height.is_some() || specs.width.is_some() {
        let dim = |v: Option<f64>| v.map(format_mm).unwrap_or_else(|| "-".to_string());
        let _ = writeln!(text, "\n{}", palette.accent("Dimensions"));
        let _ = writeln!(text, "  Height        {} mm", dim(specs.height));
        let _ = writeln!(text, "  Width         {} mm", dim(specs.width));

        if specs.radius_top_left.is_some() || specs.radius_top_right.is_some() {
            let r = |v: Option<f64>| format_mm(v.unwrap_or(0.0));
            let _ = writeln!(text, "  Corner radii  ↖ {}  ↗ {}", r(specs.radius_top_left), r(specs.radius_top_right));
            let _ = writeln!(text, "                ↙ {}  ↘ {}", r(specs.radius_bottom_left), r(specs.radius_bottom_right));
        }
    }

    text
}

pub fn render_user(user: Option<&User>, signed_in: bool) -> String {
    match (user, signed_in) {
        (Some(user), _) => {
            let mut text = format!("👤 {}\n", user.name.as_deref().unwrap_or("User"));
            for (label, value) in [("Email", &user.email), ("Phone", &user.phone), ("Shop", &user.shop_name)] {
                if let Some(value) = value {
                    let _ = writeln!(text, "   {:<6}{}", label, value);
                }
            }
            text
        }
        (None, true) => "👤 Signed in\n".to_string(),
        (None, false) => "👤 Guest (not signed in)\n".to_string(),
    }
}

pub fn render_error(error: &ApiError) -> String {
    format!("⚠️  {}", error.user_message())
}
