use crate::config::types::{
    Config, CrawlConfig, ExtractorConfig, HttpConfig, ServerConfig, SiteConfig, StorageConfig,
};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_extractor_config(&config.extractor)?;
    validate_crawl_config(&config.crawl)?;
    validate_http_config(&config.http)?;
    validate_storage_config(&config.storage)?;
    validate_server_config(&config.server)?;
    Ok(())
}

/// Validates the catalog site settings
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid base-url '{}': {}", config.base_url, e))
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' must use http or https",
            config.base_url
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' has no host",
            config.base_url
        )));
    }

    if config.listing_scope.trim().is_empty() {
        return Err(ConfigError::Validation(
            "listing-scope cannot be empty".to_string(),
        ));
    }

    if scraper::Selector::parse(&config.listing_scope).is_err() {
        return Err(ConfigError::Validation(format!(
            "listing-scope '{}' is not a valid CSS selector",
            config.listing_scope
        )));
    }

    Ok(())
}

/// Validates breadcrumb settings
fn validate_extractor_config(config: &ExtractorConfig) -> Result<(), ConfigError> {
    validate_class_name(&config.breadcrumb_class)?;

    if config.category_link_number < 1 {
        return Err(ConfigError::Validation(format!(
            "category-link-number must be >= 1, got {}",
            config.category_link_number
        )));
    }

    Ok(())
}

/// Validates crawl limits
fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max-pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.progress_log_interval < 1 {
        return Err(ConfigError::Validation(format!(
            "progress-log-interval must be >= 1, got {}",
            config.progress_log_interval
        )));
    }

    Ok(())
}

/// Validates HTTP client settings
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.timeout_secs < 1 || config.timeout_secs > 300 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be between 1 and 300, got {}",
            config.timeout_secs
        )));
    }

    // Larger than timeout-secs is allowed; the client clamps it
    if config.connect_timeout_secs < 1 || config.connect_timeout_secs > 300 {
        return Err(ConfigError::Validation(format!(
            "connect-timeout-secs must be between 1 and 300, got {}",
            config.connect_timeout_secs
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates dataset persistence settings
fn validate_storage_config(config: &StorageConfig) -> Result<(), ConfigError> {
    if config.dataset_path.is_empty() {
        return Err(ConfigError::Validation(
            "dataset-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the API listener
fn validate_server_config(config: &ServerConfig) -> Result<(), ConfigError> {
    if config.host.is_empty() {
        return Err(ConfigError::Validation("host cannot be empty".to_string()));
    }

    Ok(())
}

/// Validates a CSS class name used to build selectors
fn validate_class_name(class: &str) -> Result<(), ConfigError> {
    if class.is_empty() {
        return Err(ConfigError::Validation(
            "breadcrumb-class cannot be empty".to_string(),
        ));
    }

    if class.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(ConfigError::Validation(format!(
            "breadcrumb-class '{}' cannot start with a digit",
            class
        )));
    }

    if !class
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "breadcrumb-class '{}' contains invalid characters",
            class
        )));
    }

    Ok(())
}
