// File loading, batch checking, and report rendering

use lua_simples::config::Loader;
use lua_simples::driver::{check_units, dump_tokens, DriverError, SourceUnit};
use lua_simples::parser::{Mode, Options};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

fn source_file(text: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".lua")
        .tempfile()
        .expect("temp file");
    file.write_all(text.as_bytes()).expect("write");
    file
}

#[test]
fn test_load_and_check_file() {
    let file = source_file("local x = 1\nif x then x = 2 end\n");
    let unit = SourceUnit::load(file.path(), 1024).expect("load");

    assert_eq!(unit.text, "local x = 1\nif x then x = 2 end\n");

    let report = check_units(&[unit], &Options::strict());
    assert!(report.all_accepted());
    assert!(report.to_string().starts_with("Parsing successful for "));
}

#[test]
fn test_oversized_file_is_refused_before_analysis() {
    let file = source_file(&"x = 1\n".repeat(100));
    let err = SourceUnit::load(file.path(), 64).unwrap_err();

    match err {
        DriverError::TooLarge { size, limit, .. } => {
            assert_eq!(size, 600);
            assert_eq!(limit, 64);
        }
        other => panic!("expected TooLarge, got {other:?}"),
    }
}

#[test]
fn test_missing_file_is_an_io_error() {
    let err = SourceUnit::load(Path::new("no/such/file.lua"), 1024)
        .unwrap_err();

    assert!(matches!(err, DriverError::Io { .. }));
    assert!(err.to_string().contains("no/such/file.lua"));
}

#[test]
fn test_report_lists_every_diagnostic() {
    let units = vec![
        SourceUnit::new("ok.lua", "x = 1", 1024).unwrap(),
        SourceUnit::new("bad.lua", "x = = 1 ; y = ( 2", 1024).unwrap(),
    ];
    let report = check_units(&units, &Options::recover());
    let text = report.to_string();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(
        lines,
        vec![
            "Parsing successful for ok.lua!",
            "Parsing failed for bad.lua (2 error(s)):",
            "  Syntax error at line 1, position 5: expected Name, found '='",
            "  Syntax error at line 1, position 18: expected RParen, found end of input",
            "2 unit(s) checked: 1 accepted, 1 rejected",
        ]
    );
    assert!(!report.all_accepted());
}

#[test]
fn test_settings_drive_the_analysis() {
    let settings = Loader::new()
        .mode(Mode::Recover)
        .and_then(Loader::build)
        .unwrap();
    assert_eq!(settings.analysis.mode, Mode::Recover);

    let unit = SourceUnit::new(
        "two.lua",
        "a = ; b = ;",
        settings.input.max_source_bytes,
    )
    .unwrap();
    let report = check_units(&[unit], &settings.options());

    assert_eq!(report.units[0].analysis.diagnostics().len(), 2);
}

#[test]
fn test_token_dump() {
    let dump = dump_tokens("local s = 'a' -- note\n");

    assert_eq!(
        dump,
        "<local, Local> 1:1\n<s, Name> 1:7\n<=, Assign> 1:9\n<'a', String> 1:11\n<, EndOfInput> 2:1\n"
    );
}
