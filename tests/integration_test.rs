// Integration tests for the syntax checker

use lua_simples::parser::token::keyword;
use lua_simples::parser::{analyze, Analysis, Lexer, Options, TokenKind};
use proptest::prelude::*;
use rstest::rstest;
use std::fs;
use std::path::Path;

fn strict(source: &str) -> Analysis {
    analyze(source, &Options::strict())
}

#[test]
fn test_local_declaration_tokens_and_parse() {
    let kinds: Vec<TokenKind> = Lexer::new("local x = 1")
        .tokenize()
        .expect("tokenize")
        .into_iter()
        .map(|t| t.kind)
        .collect();

    assert_eq!(
        kinds,
        vec![
            TokenKind::Local,
            TokenKind::Name,
            TokenKind::Assign,
            TokenKind::Number,
            TokenKind::EndOfInput,
        ]
    );
    assert_eq!(strict("local x = 1"), Analysis::Accepted);
}

#[test]
fn test_if_else() {
    assert_eq!(strict("if x then y = 1 else y = 2 end"), Analysis::Accepted);
}

#[test]
fn test_missing_end() {
    let analysis = strict("if x then y = 1");
    let diagnostics = analysis.diagnostics();

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].expected, Some(TokenKind::End));
    assert_eq!(diagnostics[0].found.as_deref(), Some(""));
    assert_eq!(
        diagnostics[0].message,
        "expected End, found end of input"
    );
}

#[test]
fn test_numeric_for() {
    assert_eq!(
        strict("for i = 1 , 10 do x = x + i end"),
        Analysis::Accepted
    );
}

#[test]
fn test_missing_close_paren() {
    let analysis = strict("x = ( 1 + 2");
    let diagnostics = analysis.diagnostics();

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].expected, Some(TokenKind::RParen));
    assert!(diagnostics[0].message.ends_with("found end of input"));
}

#[rstest]
#[case("x = 1")]
#[case("a, b, c = 1, 'two', \"three four\"")]
#[case("local function f(a) if a then return 1 end return 2 end")]
#[case("while not done do done = x >= 10 or y .. z == w end")]
#[case("IF X THEN Y = 1 ELSE Y = 2 END")]
#[case("for i = -10, 10, 2 do t[i] = i * i end")]
#[case("")]
#[case("-- only a comment")]
#[case("--[[ a\nblock ]] x = 'y' -- trailing")]
fn test_accepted_programs(#[case] source: &str) {
    let analysis = strict(source);
    assert!(analysis.is_accepted(), "{source}: {analysis:?}");
}

#[test]
fn test_empty_statement_is_rejected() {
    let analysis = strict("x = 1; ;");
    let diagnostics = analysis.diagnostics();

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].expected, Some(TokenKind::Name));
    assert_eq!(diagnostics[0].position(), 8);
}

#[rstest]
#[case("x = ", TokenKind::Name, 1, 5)]
#[case("local = 1", TokenKind::Name, 1, 7)]
#[case("while x y = 1 end", TokenKind::Do, 1, 9)]
#[case("if x\nthen y = 1\nelse", TokenKind::End, 3, 5)]
#[case("function (a) end", TokenKind::Name, 1, 10)]
#[case("for i, 10 do end", TokenKind::Assign, 1, 6)]
fn test_strict_mode_reports_first_error(
    #[case] source: &str,
    #[case] expected: TokenKind,
    #[case] line: usize,
    #[case] position: usize,
) {
    let analysis = strict(source);
    let diagnostics = analysis.diagnostics();

    assert_eq!(diagnostics.len(), 1, "{source}");
    assert_eq!(diagnostics[0].expected, Some(expected), "{source}");
    assert_eq!(diagnostics[0].line(), line, "{source}");
    assert_eq!(diagnostics[0].position(), position, "{source}");
}

#[test]
fn test_lexical_error_rejects_in_strict_mode() {
    let analysis = strict("x = 3.1.4");
    let diagnostics = analysis.diagnostics();

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].message, "malformed number '3.1.4'");
    assert_eq!(diagnostics[0].position(), 5);
}

#[test]
fn test_strict_mode_drops_lexical_errors_after_the_first() {
    let analysis = strict("x = @ @ 1");
    let diagnostics = analysis.diagnostics();

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].message, "unexpected character '@'");
    assert_eq!(diagnostics[0].position(), 5);
}

#[test]
fn test_recover_mode_keeps_every_lexical_error() {
    let analysis = analyze("x = @ @ 1", &Options::recover());
    let positions: Vec<usize> =
        analysis.diagnostics().iter().map(|d| d.position()).collect();

    assert_eq!(positions, vec![5, 7]);
}

#[test]
fn test_demo_programs() {
    for name in ["function.lua", "loop.lua", "control.lua"] {
        let path = Path::new("demos").join(name);
        let source = fs::read_to_string(&path).expect("Failed to read demo");
        let analysis = strict(&source);

        assert!(analysis.is_accepted(), "{}: {:?}", name, analysis);
    }
}

// ===== Grammar-driven generation =====

const BINARY_OPERATORS: &[&str] = &[
    "or", "and", "<", ">", "<=", ">=", "~=", "==", "..", "+", "-", "*", "/",
    "^",
];

fn name() -> impl Strategy<Value = String> {
    "[a-zA-Z_][a-zA-Z0-9_]{0,5}".prop_filter("reserved word", |s| {
        keyword(s).is_none()
    })
}

fn exp() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        "[+-]?[0-9]{1,4}(\\.[0-9]{1,3})?",
        "\"[a-z ]{0,8}\"",
        "'[a-z ]{0,8}'",
        name(),
    ];

    leaf.prop_recursive(4, 32, 3, |inner| {
        prop_oneof![
            (
                inner.clone(),
                prop::sample::select(BINARY_OPERATORS),
                inner.clone()
            )
                .prop_map(|(a, op, b)| format!("{a} {op} {b}")),
            inner.clone().prop_map(|e| format!("( {e} )")),
            inner.clone().prop_map(|e| format!("not {e}")),
            inner.clone().prop_map(|e| format!("- {e}")),
            (name(), inner).prop_map(|(n, e)| format!("{n}[{e}]")),
        ]
    })
}

fn list(item: impl Strategy<Value = String>) -> impl Strategy<Value = String> {
    prop::collection::vec(item, 1..3).prop_map(|items| items.join(", "))
}

fn simple_statement() -> impl Strategy<Value = String> {
    prop_oneof![
        (list(name()), list(exp())).prop_map(|(v, e)| format!("{v} = {e}")),
        (list(name()), list(exp()))
            .prop_map(|(v, e)| format!("local {v} = {e}")),
        Just("break".to_string()),
    ]
}

/// Statements separated by `;` or plain spaces, with an optional final
/// `return` (which must close its block).
fn block_of(
    statement: impl Strategy<Value = String>,
) -> impl Strategy<Value = String> {
    (
        prop::collection::vec((statement, any::<bool>()), 0..4),
        prop::option::of(prop::option::of(list(exp()))),
    )
        .prop_map(|(statements, ret)| {
            let mut parts: Vec<String> = statements
                .into_iter()
                .map(|(s, semi)| if semi { format!("{s} ;") } else { s })
                .collect();
            match ret {
                Some(Some(values)) => parts.push(format!("return {values}")),
                Some(None) => parts.push("return".to_string()),
                None => {}
            }
            parts.join(" ")
        })
}

fn block() -> impl Strategy<Value = String> {
    block_of(simple_statement()).prop_recursive(3, 24, 3, |inner| {
        let compound = prop_oneof![
            inner.clone().prop_map(|b| format!("do {b} end")),
            (exp(), inner.clone())
                .prop_map(|(e, b)| format!("while {e} do {b} end")),
            (
                exp(),
                inner.clone(),
                prop::collection::vec((exp(), inner.clone()), 0..2),
                prop::option::of(inner.clone())
            )
                .prop_map(|(e, b, elseifs, otherwise)| {
                    let mut text = format!("if {e} then {b}");
                    for (e, b) in elseifs {
                        text.push_str(&format!(" elseif {e} then {b}"));
                    }
                    if let Some(b) = otherwise {
                        text.push_str(&format!(" else {b}"));
                    }
                    text + " end"
                }),
            (name(), exp(), exp(), prop::option::of(exp()), inner.clone())
                .prop_map(|(n, from, to, step, b)| {
                    let step = step.map(|s| format!(", {s}")).unwrap_or_default();
                    format!("for {n} = {from}, {to}{step} do {b} end")
                }),
            (
                any::<bool>(),
                name(),
                prop::option::of(prop::collection::vec(name(), 0..3)),
                inner
            )
                .prop_map(|(local, n, params, b)| {
                    let params = params
                        .map(|p| format!("({})", p.join(", ")))
                        .unwrap_or_default();
                    let local = if local { "local " } else { "" };
                    format!("{local}function {n}{params} {b} end")
                }),
        ];
        block_of(prop_oneof![simple_statement(), compound])
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn generated_programs_are_accepted(source in block()) {
        let analysis = strict(&source);
        prop_assert!(analysis.is_accepted(), "{}\n{:?}", source, analysis);
    }

    #[test]
    fn recovery_agrees_with_strict_on_the_first_error(source in "[ -~\n]{0,80}") {
        let strict_result = strict(&source);
        let recovered = analyze(&source, &Options::recover());

        prop_assert_eq!(strict_result.is_accepted(), recovered.is_accepted());
        if let Some(first) = strict_result.diagnostics().first() {
            prop_assert_eq!(Some(first), recovered.diagnostics().first());
        }
    }
}
