//! `homeshelf config init`

use crate::cli::ConfigInitArgs;
use crate::config::HomeshelfConfig;

const EXAMPLE_CONFIG: &str = include_str!("../../homeshelf.example.toml");

/// Write the annotated example config to `args.output`.
///
/// Refuses to replace an existing file unless `--force` is given. Returns the
/// message to print, naming the shelf document the new config points at.
pub fn handle_config_init(args: &ConfigInitArgs) -> Result<String, Box<dyn std::error::Error>> {
    if args.output.exists() && !args.force {
        return Err(format!(
            "{} already exists, pass --force to replace it",
            args.output.display()
        )
        .into());
    }

    if let Some(parent) = args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&args.output, EXAMPLE_CONFIG)?;

    let storage = toml::from_str::<HomeshelfConfig>(EXAMPLE_CONFIG)?.storage.path;
    Ok(format!(
        "✓ Configuration file created: {}\n  Services will be stored in {}",
        args.output.display(),
        storage.display()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn init(output: &Path, force: bool) -> Result<String, Box<dyn std::error::Error>> {
        handle_config_init(&ConfigInitArgs {
            output: output.to_path_buf(),
            force,
        })
    }

    #[test]
    fn test_example_config_is_valid() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("conf.d").join("homeshelf.toml");

        let message = init(&output, false).unwrap();
        assert!(message.contains("homeshelf.json"));

        let parsed = HomeshelfConfig::load(Some(&output)).unwrap();
        assert!(parsed.validate().is_ok());
        assert_eq!(parsed.polling.max_failures, 3);
    }

    #[test]
    fn test_existing_file_needs_force() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("homeshelf.toml");
        std::fs::write(&output, "# mine").unwrap();

        let err = init(&output, false).unwrap_err();
        assert!(err.to_string().contains("--force"));
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "# mine");

        init(&output, true).unwrap();
        assert!(std::fs::read_to_string(&output).unwrap().contains("[polling]"));
    }
}
