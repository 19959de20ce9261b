//! Seed the items table from a YAML file.
//!
//! The file lists items with their initial stock:
//!
//! ```yaml
//! items:
//!   - name: Keyboard
//!     quantity: 12
//!   - name: Mouse
//!     quantity: 30
//! ```

use std::path::Path;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use sqlx::PgPool;
use tracing::info;

/// Seed file contents.
#[derive(Debug, Deserialize)]
pub struct SeedConfig {
    pub items: Vec<SeedItem>,
}

/// One item row to seed.
#[derive(Debug, Deserialize)]
pub struct SeedItem {
    pub name: String,
    pub quantity: i32,
}

/// Validate a parsed seed configuration.
///
/// Returns one message per invalid entry.
fn validate_config(config: &SeedConfig) -> Vec<String> {
    let mut errors = Vec::new();

    if config.items.is_empty() {
        errors.push("seed file contains no items".to_string());
    }

    for (index, item) in config.items.iter().enumerate() {
        if item.name.trim().is_empty() {
            errors.push(format!("item #{index}: name is empty"));
        }
        if item.quantity < 0 {
            errors.push(format!(
                "item #{index} ({}): quantity {} is negative",
                item.name, item.quantity
            ));
        }
    }

    errors
}

/// Seed items from a YAML file.
///
/// # Arguments
///
/// * `file_path` - Path to the YAML file
/// * `clear_existing` - If true, clear items and orders first
///
/// # Errors
///
/// Returns an error if environment variables are missing, the file cannot be
/// read or validated, or database operations fail.
pub async fn items(
    file_path: &str,
    clear_existing: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let database_url = std::env::var("ESHOP_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| "ESHOP_DATABASE_URL not set")?;

    // Verify file exists
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {file_path}").into());
    }

    info!(path = %file_path, "Loading items from file");

    // Read and validate YAML before connecting to database
    let content = tokio::fs::read_to_string(path).await?;
    let config: SeedConfig = serde_yaml::from_str(&content)?;

    info!(items = config.items.len(), "Parsed seed file");

    let errors = validate_config(&config);
    if !errors.is_empty() {
        return Err(format!("Invalid seed file:\n  {}", errors.join("\n  ")).into());
    }

    let pool = PgPool::connect(database_url.expose_secret()).await?;

    if clear_existing {
        info!("Clearing existing items and orders");
        sqlx::query("TRUNCATE items, orders, order_items RESTART IDENTITY CASCADE")
            .execute(&pool)
            .await?;
    }

    for item in &config.items {
        sqlx::query("INSERT INTO items (name, quantity) VALUES ($1, $2)")
            .bind(&item.name)
            .bind(item.quantity)
            .execute(&pool)
            .await?;
        info!(name = %item.name, quantity = item.quantity, "Seeded item");
    }

    info!(items = config.items.len(), "Seeding complete");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seed_file() {
        let config: SeedConfig = serde_yaml::from_str(
            "items:\n  - name: Keyboard\n    quantity: 12\n  - name: Mouse\n    quantity: 30\n",
        )
        .unwrap();

        assert_eq!(config.items.len(), 2);
        assert_eq!(config.items[0].name, "Keyboard");
        assert_eq!(config.items[0].quantity, 12);
    }

    #[test]
    fn test_validate_config_ok() {
        let config: SeedConfig =
            serde_yaml::from_str("items:\n  - name: Keyboard\n    quantity: 12\n").unwrap();
        assert!(validate_config(&config).is_empty());
    }

    #[test]
    fn test_validate_config_empty() {
        let config = SeedConfig { items: Vec::new() };
        assert_eq!(validate_config(&config).len(), 1);
    }

    #[test]
    fn test_validate_config_negative_quantity() {
        let config: SeedConfig =
            serde_yaml::from_str("items:\n  - name: Keyboard\n    quantity: -1\n").unwrap();
        let errors = validate_config(&config);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("negative"));
    }
}
