use serde::de::DeserializeOwned;
use serde::Deserialize;

pub use config::ConfigError;

/// Deserialize any configuration struct from process environment variables.
///
/// Keys are matched case-insensitively, so `QUEUE_URL` fills a `queue_url`
/// field. With a prefix, `APP_QUEUE_URL` fills the same field.
pub trait EnvConfig: Sized {
    fn from_env() -> Result<Self, ConfigError>;
    fn from_env_with_prefix(prefix: &str) -> Result<Self, ConfigError>;
}

impl<D> EnvConfig for D
where
    D: DeserializeOwned,
{
    fn from_env() -> Result<Self, ConfigError> {
        load(config::Environment::default())
    }

    fn from_env_with_prefix(prefix: &str) -> Result<Self, ConfigError> {
        load(config::Environment::with_prefix(prefix))
    }
}

fn load<D: DeserializeOwned>(source: config::Environment) -> Result<D, ConfigError> {
    dotenvy::dotenv().ok();

    config::Config::builder()
        .add_source(source)
        .build()?
        .try_deserialize()
}

/// Settings for the consumer loop: where messages come from and where
/// templates live.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkerConfig {
    /// Message source connection URL.
    #[serde(default = "default_queue_url")]
    pub queue_url: String,

    /// Queue to consume from. Used as both the stream name and its subject.
    #[serde(default = "default_queue_name")]
    pub queue_name: String,

    /// Durable consumer name, shared by every replica of the worker.
    #[serde(default = "default_queue_consumer")]
    pub queue_consumer: String,

    /// Root directory that template identifiers are resolved against.
    #[serde(default = "default_template_dir")]
    pub template_dir: String,

    /// Include raw payloads in log lines. Payloads carry email addresses and
    /// activation codes, so this stays off outside local debugging.
    #[serde(default)]
    pub log_payloads: bool,
}

fn default_queue_url() -> String {
    "nats://localhost:4222".to_string()
}

fn default_queue_name() -> String {
    "email_queue".to_string()
}

fn default_queue_consumer() -> String {
    "courier".to_string()
}

fn default_template_dir() -> String {
    "templates".to_string()
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            queue_url: default_queue_url(),
            queue_name: default_queue_name(),
            queue_consumer: default_queue_consumer(),
            template_dir: default_template_dir(),
            log_payloads: false,
        }
    }
}
