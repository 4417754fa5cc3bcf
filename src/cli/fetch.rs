//! Fetch CLI command handler

use serde_json::Value;

use crate::api::ApiClient;
use crate::cli::commands::FetchArgs;
use crate::core::config::Config;
use crate::error::{PortalError, Result};
use crate::routes::Route;

/// GET a list endpoint and print how many items came back
pub async fn handle_fetch(args: FetchArgs, config: &Config) -> Result<()> {
    let path = api_path(&args.path)?;
    let client = ApiClient::new(config)?;
    let items: Vec<Value> = client.get_list(&path).await?;

    println!("{} item(s) from {}", items.len(), client.url_for(&path)?);
    Ok(())
}

/// Accept either an API path or the name of a listing page
fn api_path(input: &str) -> Result<String> {
    if let Some(collection) = Route::from_name(input).and_then(|r| r.collection()) {
        return Ok(collection.to_string());
    }
    if input.starts_with('/') {
        return Ok(input.to_string());
    }
    Err(PortalError::InvalidInput(format!(
        "'{}' is neither an API path nor a listing page.",
        input
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_path() {
        assert_eq!(api_path("pdfbooks").unwrap(), "/books");
        assert_eq!(api_path("questionBank").unwrap(), "/questions");
        assert_eq!(api_path("/courses/rust").unwrap(), "/courses/rust");
        assert!(api_path("profile").is_err());
    }
}
