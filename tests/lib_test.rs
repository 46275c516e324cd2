//! Library integration tests.

use pitch::PitchError;

#[test]
fn error_types_are_public() {
    let err = PitchError::CommandNotFound {
        name: "uv".into(),
    };
    assert!(err.to_string().contains("uv"));
}

#[test]
fn result_type_alias_is_public() {
    fn test_fn() -> pitch::Result<()> {
        Ok(())
    }
    assert!(test_fn().is_ok());
}

#[test]
fn cli_types_are_public() {
    use clap::Parser;
    use pitch::cli::{Cli, Commands};

    let cli = Cli::parse_from(["pitch", "verify", "--json"]);

    if let Some(Commands::Verify(args)) = cli.command {
        assert!(args.json);
    } else {
        panic!("Expected Verify command");
    }
}

#[test]
fn progress_line_is_public() {
    use pitch::ui::{render_line, BarFormat};

    let line = render_line(1, 2, &BarFormat::default());
    assert!(line.starts_with("Installing: |"));
    assert!(line.ends_with("| 50.0% complete"));
}

#[test]
fn progress_line_snapshot() {
    use pitch::ui::{render_line, BarFormat};

    let format = BarFormat {
        width: 10,
        ..BarFormat::default()
    };
    insta::assert_snapshot!(render_line(1, 4, &format), @"Installing: |██--------| 25.0% complete");
    insta::assert_snapshot!(render_line(4, 4, &format), @"Installing: |██████████| 100.0% complete");
}

#[test]
fn requirements_parsing_is_public() {
    use pitch::install::DependencyList;

    let list = DependencyList::parse("# pinned\npandas==2.2\n\nrich\n");
    assert_eq!(list.iter().collect::<Vec<_>>(), vec!["pandas==2.2", "rich"]);
}
