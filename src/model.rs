// Core structs: Product, Specs, Category, User, MatchResult and the error types
use crate::normalizer::{lenient_number, split_devices};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// Closed set of inventory categories served by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    ScreenGuard,
    PhoneCase,
    ComboFolder,
    CcBoard,
    Battery,
    CenterPanel,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::ScreenGuard,
        Category::PhoneCase,
        Category::ComboFolder,
        Category::CcBoard,
        Category::Battery,
        Category::CenterPanel,
    ];

    /// Label used on the wire and in the `category` query parameter.
    pub fn label(self) -> &'static str {
        match self {
            Category::ScreenGuard => "Screen Guard",
            Category::PhoneCase => "Phone Case",
            Category::ComboFolder => "Combo/Display",
            Category::CcBoard => "CC Board",
            Category::Battery => "Battery",
            Category::CenterPanel => "Center Panel",
        }
    }

    /// Parses a category label leniently: case, spaces and punctuation are ignored,
    /// and the spellings used across catalog revisions are all accepted.
    pub fn from_label(label: &str) -> Option<Category> {
        let key: String = label
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect();

        match key.as_str() {
            "screenguard" | "guard" | "temperedglass" => Some(Category::ScreenGuard),
            "phonecase" | "case" => Some(Category::PhoneCase),
            "combofolder" | "combodisplay" | "combo" | "folder" | "display" => {
                Some(Category::ComboFolder)
            }
            "ccboard" | "chargingboard" => Some(Category::CcBoard),
            "battery" => Some(Category::Battery),
            "centerpanel" | "panel" | "centrepanel" => Some(Category::CenterPanel),
            _ => None,
        }
    }

    pub fn is_screen_guard(self) -> bool {
        self == Category::ScreenGuard
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::from_label(s).ok_or_else(|| format!("unknown category '{}'", s))
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Unknown or missing labels decode as `None` instead of failing the whole catalog.
fn lenient_category<'de, D>(deserializer: D) -> Result<Option<Category>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(Category::from_label))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Specs {
    #[serde(default, deserialize_with = "lenient_number")]
    pub height: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub width: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub radius: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub radius_top_left: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub radius_top_right: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub radius_bottom_left: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub radius_bottom_right: Option<f64>,
    #[serde(default)]
    pub model_no: Option<String>,
    #[serde(default)]
    pub base_model: Option<String>,
    #[serde(default)]
    pub brand_name: Option<String>,
    #[serde(default)]
    pub original_drawing_model: Option<String>,
}

impl Specs {
    /// Height in millimetres, 0 when absent or unparseable.
    pub fn height_mm(&self) -> f64 {
        self.height.unwrap_or(0.0)
    }

    pub fn width_mm(&self) -> f64 {
        self.width.unwrap_or(0.0)
    }

    /// Corner radius used for matching: top-left, falling back to the generic radius.
    pub fn effective_radius(&self) -> f64 {
        self.radius_top_left.or(self.radius).unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_category")]
    pub category: Option<Category>,
    #[serde(default)]
    pub compatible_devices: Option<String>,
    #[serde(default)]
    pub specs: Option<Specs>,
}

impl Product {
    /// Device names listed on this product, trimmed, in catalog order.
    pub fn devices(&self) -> Vec<&str> {
        self.compatible_devices
            .as_deref()
            .map(split_devices)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub shop_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub shop_name: String,
    pub password: String,
}

/// Tiered matcher output. Which tiers are present depends on the searched category:
/// screen guards carry `original`, `full_temper` and optionally `similar`; every other
/// category carries `perfect`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_temper: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similar: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perfect: Option<Vec<String>>,
}

impl MatchResult {
    /// Present tiers in display order, paired with their headings.
    pub fn tiers(&self) -> Vec<(&'static str, &[String])> {
        [
            ("Original Drawing", &self.original),
            ("Full Temper", &self.full_temper),
            ("Similar Match", &self.similar),
            ("Perfect Match", &self.perfect),
        ]
        .into_iter()
        .filter_map(|(name, tier)| tier.as_deref().map(|devices| (name, devices)))
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers().iter().all(|(_, devices)| devices.is_empty())
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request timed out")]
    Timeout,
    #[error("unable to reach server: {0}")]
    Unreachable(String),
    #[error("server responded {status}: {message:?}")]
    Server { status: u16, message: Option<String> },
    #[error("invalid response body: {0}")]
    Decode(String),
    #[error("request failed: {0}")]
    Other(String),
}

impl ApiError {
    /// Message suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Timeout => {
                "Connection timed out. Please check your internet and try again.".into()
            }
            ApiError::Unreachable(_) => {
                "Unable to connect to server. Please check your internet connection.".into()
            }
            ApiError::Server { message: Some(msg), .. } if !msg.trim().is_empty() => msg.clone(),
            ApiError::Server { .. } => "Server error. Please try again.".into(),
            ApiError::Decode(_) | ApiError::Other(_) => {
                "An unexpected error occurred. Please try again.".into()
            }
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ApiError::Timeout
        } else if e.is_connect() || e.is_request() {
            ApiError::Unreachable(e.to_string())
        } else if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Other(e.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("stored value is not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Please fill in all fields")]
    MissingFields,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Password must be at least 6 characters long")]
    PasswordTooShort,
    #[error("Invalid credentials. Please try again.")]
    Rejected,
    #[error("{}", .0.user_message())]
    Api(#[from] ApiError),
    #[error("failed to persist session: {0}")]
    Storage(#[from] StorageError),
}

#[derive(Debug, Error)]
pub enum ContextError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] ApiError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
