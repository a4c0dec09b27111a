use std::path::PathBuf;

use clap::{Arg, ArgAction, Command, value_parser};

pub fn build_cli() -> Command {
    Command::new("vouch-installer")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Copy the vouch assertions into a crate")
        .long_about("Copies the vouch assertions into <PATH>/assert/ so a crate can use them without depending on vouch. Run it from the crate root, or point --manifest-path at the crate's Cargo.toml. <PATH> is relative to the manifest and must lie under src/, tests/, benches/ or examples/.")
        .arg(
            Arg::new("path")
                .value_name("PATH")
                .help("Directory that receives the assert module (default: [package.metadata.vouch] path)")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("manifest-path")
                .long("manifest-path")
                .value_name("FILE")
                .help("Path to the crate's Cargo.toml")
                .default_value("Cargo.toml")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging output")
                .action(ArgAction::SetTrue),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_build() {
        let app = build_cli();
        assert_eq!(app.get_name(), "vouch-installer");
    }

    #[test]
    fn test_cli_path_and_defaults() {
        let matches = build_cli()
            .try_get_matches_from(vec!["vouch-installer", "src/testutil"])
            .unwrap();

        assert_eq!(
            matches.get_one::<PathBuf>("path").unwrap(),
            &PathBuf::from("src/testutil")
        );
        assert_eq!(
            matches.get_one::<PathBuf>("manifest-path").unwrap(),
            &PathBuf::from("Cargo.toml")
        );
        assert!(!matches.get_flag("verbose"));
    }

    #[test]
    fn test_cli_path_is_optional() {
        let matches = build_cli()
            .try_get_matches_from(vec!["vouch-installer", "-v"])
            .unwrap();

        assert!(matches.get_one::<PathBuf>("path").is_none());
        assert!(matches.get_flag("verbose"));
    }

    #[test]
    fn test_cli_manifest_path() {
        let matches = build_cli()
            .try_get_matches_from(vec![
                "vouch-installer",
                "--manifest-path",
                "crates/demo/Cargo.toml",
                "tests/common",
            ])
            .unwrap();

        assert_eq!(
            matches.get_one::<PathBuf>("manifest-path").unwrap(),
            &PathBuf::from("crates/demo/Cargo.toml")
        );
    }

    #[test]
    fn test_cli_rejects_extra_positionals() {
        let result = build_cli().try_get_matches_from(vec!["vouch-installer", "src/a", "src/b"]);
        assert!(result.is_err());
    }
}
