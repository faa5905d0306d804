//! Services command implementation
//!
//! These commands edit the shelf document directly. A running server only
//! reads it at startup.

use crate::cli::output::{format_services_json, format_services_table};
use crate::cli::{ServicesAddArgs, ServicesListArgs, ServicesRemoveArgs};
use crate::shelf::{Service, ShelfStore};

/// Handle `services list`
pub async fn handle_services_list(
    args: &ServicesListArgs,
    shelf: &ShelfStore,
) -> Result<String, Box<dyn std::error::Error>> {
    let services = shelf.services().await;

    if args.json {
        Ok(format_services_json(&services)?)
    } else if services.is_empty() {
        Ok("No services on the shelf.".to_string())
    } else {
        Ok(format_services_table(&services))
    }
}

/// Handle `services add`
pub async fn handle_services_add(
    args: &ServicesAddArgs,
    shelf: &ShelfStore,
) -> Result<String, Box<dyn std::error::Error>> {
    let mut service = Service::new(&args.name, &args.url, &args.icon, args.service_type);
    if let (Some(username), Some(password)) = (&args.username, &args.password) {
        service = service.with_credentials(username, password);
    }

    let service = shelf.add_service(service).await?;
    Ok(format!(
        "✓ Added {} ({}) at {}",
        service.name, service.service_type, service.url
    ))
}

/// Handle `services remove`
pub async fn handle_services_remove(
    args: &ServicesRemoveArgs,
    shelf: &ShelfStore,
) -> Result<String, Box<dyn std::error::Error>> {
    let removed = shelf.remove_service(&args.name).await?;
    Ok(format!("✓ Removed {}", removed.name))
}
