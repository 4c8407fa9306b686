use std::path::PathBuf;

/// Errors raised while reading configuration from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Identity printed in the header of every invoice.
#[derive(Debug, Clone)]
pub struct IssuerConfig {
    pub name: String,
    pub address: String,
    pub email: String,
    pub website: String,
    pub phone: String,
    pub currency_symbol: String,
}

impl Default for IssuerConfig {
    fn default() -> Self {
        Self {
            name: "DevNest".to_string(),
            address: String::new(),
            email: String::new(),
            website: String::new(),
            phone: String::new(),
            currency_symbol: "₹".to_string(),
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// | Env Var              | Default                                |
/// |----------------------|----------------------------------------|
/// | `DATABASE_URL`       | required                               |
/// | `HOST`               | `0.0.0.0`                              |
/// | `PORT`               | `3000`                                 |
/// | `ADMIN_API_KEY`      | empty (every guarded route is refused) |
/// | `UPLOAD_DIR`         | `./uploads`                            |
/// | `ALLOWED_EXTENSIONS` | `png,jpg,jpeg,gif,pdf,doc,docx`        |
/// | `MAX_UPLOAD_BYTES`   | `16777216`                             |
/// | `CORS_ORIGINS`       | `http://localhost:5173`                |
/// | `ISSUER_*`           | see [`IssuerConfig`]                   |
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub admin_api_key: String,
    pub upload_dir: PathBuf,
    pub allowed_extensions: Vec<String>,
    pub max_upload_bytes: usize,
    pub cors_origins: Vec<String>,
    pub issuer: IssuerConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            host: "0.0.0.0".to_string(),
            port: 3000,
            admin_api_key: String::new(),
            upload_dir: PathBuf::from("./uploads"),
            allowed_extensions: split_list("png,jpg,jpeg,gif,pdf,doc,docx"),
            max_upload_bytes: 16 * 1024 * 1024,
            cors_origins: vec!["http://localhost:5173".to_string()],
            issuer: IssuerConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        let issuer_defaults = defaults.issuer;
        let issuer = IssuerConfig {
            name: env_or("ISSUER_NAME", issuer_defaults.name),
            address: env_or("ISSUER_ADDRESS", issuer_defaults.address),
            email: env_or("ISSUER_EMAIL", issuer_defaults.email),
            website: env_or("ISSUER_WEBSITE", issuer_defaults.website),
            phone: env_or("ISSUER_PHONE", issuer_defaults.phone),
            currency_symbol: env_or("CURRENCY_SYMBOL", issuer_defaults.currency_symbol),
        };

        Ok(Self {
            database_url,
            host: env_or("HOST", defaults.host),
            port: env_parse("PORT", defaults.port)?,
            admin_api_key: env_or("ADMIN_API_KEY", defaults.admin_api_key),
            upload_dir: std::env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),
            allowed_extensions: std::env::var("ALLOWED_EXTENSIONS")
                .map(|v| split_list(&v))
                .unwrap_or(defaults.allowed_extensions),
            max_upload_bytes: env_parse("MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|v| split_list(&v))
                .unwrap_or(defaults.cors_origins),
            issuer,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn env_or(key: &str, default: String) -> String {
    std::env::var(key).unwrap_or(default)
}

fn env_parse<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        Err(_) => Ok(default),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list_normalizes_entries() {
        assert_eq!(split_list(" PDF, docx ,,png"), vec!["pdf", "docx", "png"]);
    }

    #[test]
    fn test_defaults_allow_documents_and_images() {
        let config = AppConfig::default();
        assert!(config.allowed_extensions.contains(&"pdf".to_string()));
        assert!(config.allowed_extensions.contains(&"jpeg".to_string()));
        assert!(!config.allowed_extensions.contains(&"exe".to_string()));
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
    }
}
