//! Structured logging helpers
//!
//! Filter directive construction for the tracing subscriber, and the request
//! id middleware that tags every HTTP request.

pub mod middleware;

pub use middleware::{generate_request_id, request_id, REQUEST_ID_HEADER};

/// Build filter directives string from LoggingConfig
///
/// The result is the base level followed by one `homeshelf::<component>=<level>`
/// directive per configured component, e.g. `info,homeshelf::polling=debug`.
///
/// # Examples
///
/// ```
/// use homeshelf::config::LoggingConfig;
/// use homeshelf::logging::build_filter_directives;
///
/// let mut config = LoggingConfig::default();
/// config
///     .component_levels
///     .insert("polling".to_string(), "debug".to_string());
///
/// assert_eq!(build_filter_directives(&config), "info,homeshelf::polling=debug");
/// ```
pub fn build_filter_directives(config: &crate::config::LoggingConfig) -> String {
    std::iter::once(config.level.clone())
        .chain(
            config
                .component_levels
                .iter()
                .map(|(component, level)| format!("homeshelf::{}={}", component, level)),
        )
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoggingConfig;

    #[test]
    fn test_base_level_only() {
        let config = LoggingConfig {
            level: "warn".to_string(),
            ..LoggingConfig::default()
        };
        assert_eq!(build_filter_directives(&config), "warn");
    }

    #[test]
    fn test_component_levels_are_sorted() {
        let mut config = LoggingConfig::default();
        config
            .component_levels
            .insert("widgets".to_string(), "trace".to_string());
        config
            .component_levels
            .insert("api".to_string(), "debug".to_string());

        assert_eq!(
            build_filter_directives(&config),
            "info,homeshelf::api=debug,homeshelf::widgets=trace"
        );
    }
}
