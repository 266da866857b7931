use clap::{CommandFactory, Parser};
use nexusfs::tooling::cli::{Cli, Commands};

#[test]
fn parse_valid_command_matrix() {
    let cases: Vec<Vec<&str>> = vec![
        vec!["nexusfs", "ls"],
        vec!["nexusfs", "ls", "a/b", "-R"],
        vec!["nexusfs", "--root", "repo1", "ls", "--format", "json"],
        vec!["nexusfs", "stat", "a/b/c.txt"],
        vec!["nexusfs", "put", "local.bin", "remote/path.bin"],
        vec!["nexusfs", "mkdir", "x/y"],
        vec!["nexusfs", "rmdir", "x/y"],
        vec!["nexusfs", "--log-level", "debug", "--log-format", "json", "ls"],
    ];

    for args in cases {
        let parsed = Cli::try_parse_from(args.clone());
        assert!(parsed.is_ok(), "expected valid parse for args: {args:?}");
    }
}

#[test]
fn parse_rejects_missing_arguments() {
    assert!(Cli::try_parse_from(["nexusfs", "stat"]).is_err());
    assert!(Cli::try_parse_from(["nexusfs", "put", "only-source"]).is_err());
    assert!(Cli::try_parse_from(["nexusfs"]).is_err());
}

#[test]
fn ls_defaults_to_root_and_text() {
    let cli = Cli::try_parse_from(["nexusfs", "ls"]).unwrap();
    assert_eq!(cli.root, "");
    assert!(cli.config.is_none());
    match cli.command {
        Commands::Ls {
            path,
            recursive,
            format,
        } => {
            assert_eq!(path, "");
            assert!(!recursive);
            assert_eq!(format, "text");
        }
        _ => panic!("expected ls"),
    }
}

#[test]
fn command_definition_is_consistent() {
    Cli::command().debug_assert();
}
