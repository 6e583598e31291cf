// Application context: persisted session and theme, loaded on launch, written through on change.
use crate::api::ApiClient;
use crate::config::AppConfig;
use crate::model::{
    ApiError, AuthError, AuthResponse, ContextError, LoginRequest, RegisterRequest, StorageError, User,
};
use crate::storage::SqliteStorage;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{info, warn};

pub const TOKEN_KEY: &str = "userToken";
pub const USER_KEY: &str = "userData";
pub const THEME_KEY: &str = "themeMode";

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    pub fn parse(raw: &str) -> Option<ThemeMode> {
        match raw.trim().to_lowercase().as_str() {
            "light" => Some(ThemeMode::Light),
            "dark" => Some(ThemeMode::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> ThemeMode {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: Option<User>,
    /// When the token was last written to storage.
    pub signed_in_at: Option<DateTime<Utc>>,
}

/// Fields collected by the sign-up form.
#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub shop_name: String,
    pub password: String,
    pub confirm_password: String,
}

impl Registration {
    pub fn validate(&self) -> Result<RegisterRequest, AuthError> {
        let required = [
            &self.name,
            &self.email,
            &self.phone,
            &self.shop_name,
            &self.password,
            &self.confirm_password,
        ];
        if required.iter().any(|field| field.trim().is_empty()) {
            return Err(AuthError::MissingFields);
        }
        if self.password != self.confirm_password {
            return Err(AuthError::PasswordMismatch);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::PasswordTooShort);
        }

        Ok(RegisterRequest {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            shop_name: self.shop_name.trim().to_string(),
            password: self.password.clone(),
        })
    }
}

pub fn validate_login(email: &str, password: &str) -> Result<LoginRequest, AuthError> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(AuthError::MissingFields);
    }
    Ok(LoginRequest {
        email: email.trim().to_string(),
        password: password.to_string(),
    })
}

/// Explicit application-level context handed to every command.
pub struct AppContext {
    pub config: Arc<AppConfig>,
    pub client: Arc<ApiClient>,
    storage: Arc<Mutex<SqliteStorage>>,
    session: Option<Session>,
    theme: ThemeMode,
}

impl AppContext {
    /// Loads the persisted session and theme and pushes the token into the client.
    pub async fn init(
        config: Arc<AppConfig>,
        client: Arc<ApiClient>,
        storage: Arc<Mutex<SqliteStorage>>,
    ) -> Result<Self, StorageError> {
        let (session, theme) = {
            let guard = storage.lock().await;
            (load_session(&guard)?, load_theme(&guard)?)
        };
        client.set_token(session.as_ref().map(|s| s.token.clone()));
        info!(
            "Context ready (signed in: {}, theme: {})",
            session.is_some(),
            theme.as_str()
        );

        Ok(Self { config, client, storage, session, theme })
    }

    /// Builds the client and opens the preferences database named by `config`.
    pub async fn open(config: Arc<AppConfig>) -> Result<Self, ContextError> {
        let client = ApiClient::new(
            &config.api_base_url,
            Duration::from_secs(config.request_timeout_seconds),
        )?;
        let storage = SqliteStorage::new(&config.db_path)?;
        Ok(Self::init(config, Arc::new(client), Arc::new(Mutex::new(storage))).await?)
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn current_user(&self) -> Option<&User> {
        self.session.as_ref().and_then(|s| s.user.as_ref())
    }

    pub fn theme(&self) -> ThemeMode {
        self.theme
    }

    pub async fn set_theme(&mut self, theme: ThemeMode) -> Result<(), StorageError> {
        self.storage.lock().await.set(THEME_KEY, theme.as_str())?;
        self.theme = theme;
        Ok(())
    }

    pub async fn toggle_theme(&mut self) -> Result<ThemeMode, StorageError> {
        let next = self.theme.toggled();
        self.set_theme(next).await?;
        Ok(next)
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<Option<&User>, AuthError> {
        let credentials = validate_login(email, password)?;
        let response = self.client.login(&credentials).await.map_err(|e| match e {
            ApiError::Server { message: None, .. } => AuthError::Rejected,
            other => AuthError::Api(other),
        })?;
        self.store_session(response).await?;
        Ok(self.current_user())
    }

    pub async fn register(&mut self, form: &Registration) -> Result<Option<&User>, AuthError> {
        let account = form.validate()?;
        let response = self.client.register(&account).await?;
        self.store_session(response).await?;
        Ok(self.current_user())
    }

    /// Clears the persisted session. Storage failures are logged, not returned.
    pub async fn logout(&mut self) {
        {
            let guard = self.storage.lock().await;
            for key in [TOKEN_KEY, USER_KEY] {
                if let Err(e) = guard.remove(key) {
                    warn!("Failed to clear {}: {}", key, e);
                }
            }
        }
        self.client.set_token(None);
        self.session = None;
        info!("Signed out");
    }

    async fn store_session(&mut self, response: AuthResponse) -> Result<(), StorageError> {
        let Some(token) = response.token.filter(|t| !t.is_empty()) else {
            warn!("Auth response carried no token; session unchanged");
            return Ok(());
        };

        {
            let guard = self.storage.lock().await;
            guard.set(TOKEN_KEY, &token)?;
            match &response.user {
                Some(user) => guard.set_json(USER_KEY, user)?,
                None => {
                    guard.remove(USER_KEY)?;
                }
            }
        }

        self.client.set_token(Some(token.clone()));
        self.session = Some(Session {
            token,
            user: response.user,
            signed_in_at: Some(Utc::now()),
        });
        info!("Session stored");
        Ok(())
    }
}

fn load_session(storage: &SqliteStorage) -> Result<Option<Session>, StorageError> {
    let Some(token) = storage.get(TOKEN_KEY)?.filter(|t| !t.is_empty()) else {
        return Ok(None);
    };
    let user = match storage.get_json::<User>(USER_KEY) {
        Ok(user) => user,
        Err(StorageError::Serde(e)) => {
            warn!("Ignoring unreadable {}: {}", USER_KEY, e);
            None
        }
        Err(e) => return Err(e),
    };
    let signed_in_at = storage.updated_at(TOKEN_KEY)?;
    Ok(Some(Session { token, user, signed_in_at }))
}

fn load_theme(storage: &SqliteStorage) -> Result<ThemeMode, StorageError> {
    Ok(storage
        .get(THEME_KEY)?
        .as_deref()
        .and_then(ThemeMode::parse)
        .unwrap_or_default())
}
