//! Seed the catalog from a YAML file.
//!
//! The file is a list of shoes using the same keys as the admin create
//! payload (`name`, `brand`, `category`, `price`, `originalPrice`, ...).
//! Every entry is validated before connecting to the database, and all
//! inserts happen in one transaction.

use std::path::Path;

use tracing::{error, info};

use edge_shoes_admin::db::{self, ShoeRepository};
use edge_shoes_core::{ShoeDraft, ShoeInput};

/// Validate every entry, collecting one message per invalid shoe.
fn validate_entries(entries: &[ShoeInput]) -> Result<Vec<ShoeDraft>, Vec<String>> {
    let mut drafts = Vec::with_capacity(entries.len());
    let mut errors = Vec::new();

    for (index, entry) in entries.iter().enumerate() {
        match entry.validate() {
            Ok(draft) => drafts.push(draft),
            Err(e) => {
                let label = if entry.name.trim().is_empty() {
                    "<unnamed>"
                } else {
                    entry.name.trim()
                };
                errors.push(format!("entry {} ({label}): {e}", index + 1));
            }
        }
    }

    if errors.is_empty() {
        Ok(drafts)
    } else {
        Err(errors)
    }
}

/// Parse and validate a seed file's contents.
fn parse(content: &str) -> Result<Vec<ShoeDraft>, Box<dyn std::error::Error>> {
    let entries: Vec<ShoeInput> = serde_yaml::from_str(content)?;
    info!(shoes = entries.len(), "Parsed seed file");

    validate_entries(&entries).map_err(|errors| {
        error!("Seed file validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        format!("{} validation errors found", errors.len()).into()
    })
}

/// Insert the shoes listed in a YAML file.
///
/// # Arguments
///
/// * `file_path` - Path to the YAML file
/// * `clear_existing` - If true, delete the current catalog first
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, any entry is
/// invalid, or the database transaction fails.
pub async fn shoes(file_path: &str, clear_existing: bool) -> Result<(), Box<dyn std::error::Error>> {
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {file_path}").into());
    }

    info!(path = %file_path, "Loading shoes from file");

    // Read and validate YAML before connecting to database
    let content = tokio::fs::read_to_string(path).await?;
    let drafts = parse(&content)?;
    info!("Seed file validated successfully");

    let database_url = super::database_url()
        .ok_or("ADMIN_DATABASE_URL or DATABASE_URL not set")?;
    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");

    let inserted = ShoeRepository::new(&pool)
        .insert_all(&drafts, clear_existing)
        .await?;

    info!("Seeding complete!");
    info!("  Shoes inserted: {inserted}");
    if clear_existing {
        info!("  Previous catalog was cleared");
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use edge_shoes_core::Category;

    use super::*;

    #[test]
    fn test_sample_seed_file_is_valid() {
        let drafts = parse(include_str!("../../../../seed/shoes.yaml")).unwrap();
        assert_eq!(drafts.len(), 6);
        assert!(drafts.iter().any(|d| d.category == Category::Skate));
        assert!(drafts.iter().any(|d| d.featured));
    }

    #[test]
    fn test_defaults_apply_to_missing_fields() {
        let drafts = parse(
            r#"
- name: Plain Runner
  brand: Acme
  category: Running
  price: "50.00"
  image: /uploads/plain.jpg
"#,
        )
        .unwrap();

        let draft = &drafts[0];
        assert_eq!(draft.stock, 50);
        assert_eq!(draft.reviews, 0);
        assert!(!draft.featured);
        assert!(draft.description.is_empty());
    }

    #[test]
    fn test_every_invalid_entry_is_reported() {
        let entries: Vec<ShoeInput> = serde_yaml::from_str(
            r#"
- name: Good
  brand: Acme
  category: casual
  price: "10.00"
  image: /uploads/good.jpg
- name: ""
  brand: Acme
  category: casual
  price: "10.00"
  image: /uploads/x.jpg
- name: Hiker
  brand: Acme
  category: hiking
  price: "10.00"
  image: /uploads/hiker.jpg
"#,
        )
        .unwrap();

        let errors = validate_entries(&entries).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].starts_with("entry 2 (<unnamed>)"));
        assert!(errors[1].starts_with("entry 3 (Hiker)"));
    }

    #[test]
    fn test_malformed_yaml_is_rejected() {
        assert!(parse("name: [unclosed").is_err());
    }
}
