//! Output formatting helpers for CLI commands

use crate::reachability::Reachability;
use crate::shelf::Service;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use serde_json::json;

/// Format services as a table
pub fn format_services_table(services: &[Service]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Name", "URL", "Type", "Login", "Id"]);

    for s in services {
        let login = match &s.credentials {
            Some(c) => c.username.clone(),
            None => "-".dimmed().to_string(),
        };
        table.add_row(vec![
            Cell::new(&s.name),
            Cell::new(&s.url),
            Cell::new(s.service_type),
            Cell::new(login),
            Cell::new(&s.id),
        ]);
    }

    table.to_string()
}

/// Format services as JSON. Passwords are never printed.
pub fn format_services_json(services: &[Service]) -> Result<String, serde_json::Error> {
    let redacted: Vec<Service> = services.iter().map(Service::redacted).collect();

    serde_json::to_string_pretty(&json!({ "services": redacted }))
}

/// One-line reachability verdict for `host`.
pub fn format_reachability(host: &str, reachability: Reachability) -> String {
    match reachability {
        Reachability::Reachable => format!("{} {} is reachable", "✓".green(), host),
        Reachability::Unreachable => format!("{} {} is unreachable", "✗".red(), host),
    }
}
