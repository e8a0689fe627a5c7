//! # Infrastructure Layer
//!
//! Concrete implementations of the collaborator contracts defined in
//! `otp_core`, plus the bootstrap that wires them together.
//!
//! ## Architecture
//!
//! - **Cache**: Redis client and the Redis / in-memory code stores
//! - **Messaging**: Twilio SMS / WhatsApp dispatcher and a mock dispatcher
//! - **Telemetry**: `tracing` subscriber installation
//!
//! ## Features
//!
//! - `twilio-sms`: Enable the Twilio dispatcher (default)

use std::sync::Arc;

use otp_core::{OtpManager, OtpManagerConfig, OtpStore, StoreError};
use otp_shared::{AppConfig, ConfigError, Environment};

/// Cache module - Redis client and code stores
pub mod cache;

/// Messaging module - SMS / WhatsApp providers
pub mod messaging;

/// Telemetry module - tracing subscriber setup
pub mod telemetry;

use cache::{RedisClient, RedisOtpStore};

/// Wired infrastructure services
#[derive(Clone)]
pub struct InfrastructureServices {
    /// Loaded application configuration
    pub config: AppConfig,
    /// Shared Redis client
    pub redis: RedisClient,
    /// OTP lifecycle manager backed by Redis
    pub otp_manager: Arc<OtpManager>,
}

/// Initialize infrastructure services
///
/// This function:
/// - Loads `.env` and the application configuration
/// - Connects to Redis and checks it answers PING
/// - Creates the messaging dispatcher, if credentials are available
/// - Builds the OTP manager
///
/// Tracing is not installed here; call `telemetry::init_tracing` first.
pub async fn initialize() -> Result<InfrastructureServices, InfrastructureError> {
    let config = load_config()?;
    initialize_with_config(config).await
}

/// Initialize infrastructure services from an already loaded configuration
pub async fn initialize_with_config(
    config: AppConfig,
) -> Result<InfrastructureServices, InfrastructureError> {
    tracing::info!(
        environment = %config.environment,
        "Initializing infrastructure services..."
    );

    let redis = RedisClient::new(config.cache.clone()).await?;
    if !redis.health_check().await? {
        return Err(InfrastructureError::Config(
            "Redis did not answer PING".to_string(),
        ));
    }

    let store: Arc<dyn OtpStore> = Arc::new(RedisOtpStore::new(redis.clone()));
    let dispatcher = messaging::create_dispatcher(&config.messaging);
    let otp_manager = Arc::new(OtpManager::new(
        store,
        dispatcher,
        OtpManagerConfig::from(&config.otp),
    ));

    tracing::info!("Infrastructure services initialized successfully");

    Ok(InfrastructureServices {
        config,
        redis,
        otp_manager,
    })
}

/// Load configuration from the environment files and the process environment
///
/// Variables already set in the process win over both files, and the
/// environment-specific file (e.g. `.env.production`) wins over `.env`.
pub fn load_config() -> Result<AppConfig, InfrastructureError> {
    let environment = Environment::from_env();
    if dotenvy::from_filename(environment.env_file()).is_ok() {
        tracing::debug!(file = environment.env_file(), "Loaded environment file");
    }
    dotenvy::dotenv().ok();
    Ok(AppConfig::from_env()?)
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<ConfigError> for InfrastructureError {
    fn from(err: ConfigError) -> Self {
        InfrastructureError::Config(err.to_string())
    }
}

impl From<InfrastructureError> for StoreError {
    fn from(err: InfrastructureError) -> Self {
        StoreError::new(err.to_string())
    }
}
