use std::fs::{self};

use aplite::{
    ast::{Axis, MonadicOperator, Primitive},
    config::Config,
    error::ErrorKind,
    get_result,
    interpreter::{
        lexer::{Token, tokenize},
        session::Session,
        symbol_table::SymbolKind,
        value::core::Value,
    },
};
use pretty_assertions::assert_eq;
use walkdir::WalkDir;

#[test]
fn book_examples_work() {
    let mut count = 0;

    for entry in
        WalkDir::new("book/src").into_iter()
                                .filter_map(Result::ok)
                                .filter(|e| e.path().extension().is_some_and(|ext| ext == "md"))
    {
        let path = entry.path();
        let content =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));

        for (i, code) in extract_apl_blocks(&content).into_iter().enumerate() {
            count += 1;
            if let Err(e) = get_result(&code, false) {
                panic!("APL example {} in {:?} failed:\n{}\nError: {:?}",
                       i + 1,
                       path,
                       code,
                       e);
            }
        }
    }

    assert!(count > 0, "No APL examples found in book/src");
}

fn extract_apl_blocks(content: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut inside = false;
    let mut buf = String::new();

    for line in content.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```apl") {
            inside = true;
            buf.clear();
            continue;
        }
        if inside && trimmed.starts_with("```") {
            inside = false;
            blocks.push(buf.clone());
            continue;
        }
        if inside {
            buf.push_str(line);
            buf.push('\n');
        }
    }

    blocks
}

fn session() -> Session {
    Session::new(Config::default()).expect("default configuration is valid")
}

fn assert_success(src: &str) {
    if let Err(e) = get_result(src, false) {
        panic!("Script failed: {e}");
    }
}

fn assert_failure(src: &str) {
    if get_result(src, false).is_ok() {
        panic!("Script succeeded but was expected to fail")
    }
}

fn assert_output(src: &str, expected: &str) {
    let output = session().echo(src)
                          .unwrap_or_else(|e| panic!("Script failed: {e}"))
                          .unwrap_or_default();
    assert_eq!(output, expected, "output of {src}");
}

fn assert_error_kind(src: &str, expected: ErrorKind) {
    match session().run(src) {
        Ok(value) => panic!("Script succeeded with {value:?} but was expected to fail"),
        Err(e) => assert_eq!(e.kind(), expected, "error for {src} was {e}"),
    }
}

#[test]
fn scalar_extension() {
    assert_output("3+1 2 3", "4 5 6");
    assert_output("1 2 3×10", "10 20 30");
    assert_output("(2 2⍴1 2 3 4)-1", "0 1\n2 3");
}

#[test]
fn shape_mismatch() {
    assert_error_kind("1 2+1 2 3", ErrorKind::ShapeMismatch);
    assert_error_kind("(2 2⍴1)+2 3⍴1", ErrorKind::ShapeMismatch);
    assert_error_kind("1 3+¨1 2 3", ErrorKind::ShapeMismatch);
}

#[test]
fn reduction() {
    assert_output("+/1 2 3 4", "10");
    assert_output("+/⍳5", "15");
    assert_output("-/⍳10", "¯5");
    assert_output("+/2 3⍴⍳6", "6 15");
    assert_output("+⌿2 3⍴⍳6", "5 7 9");
    assert_output("×/,5", "5");
    assert_output("+/7", "7");
}

#[test]
fn reduction_of_empty_axis() {
    assert_output("+/⍳0", "0");
    assert_output("×/⍳0", "1");
    assert_error_kind("⍟/⍳0", ErrorKind::DomainError);
    assert_error_kind("{⍺+⍵}/⍳0", ErrorKind::DomainError);
}

#[test]
fn reshape() {
    assert_output("5⍴1 2 3", "1 2 3 1 2");
    assert_output("2 3⍴⍳4", "1 2 3\n4 1 2");
    assert_output("⍴2 3⍴0", "2 3");
    assert_error_kind("3⍴⍳0", ErrorKind::DomainError);
}

#[test]
fn outer_product() {
    assert_output("1 2∘.×1 2 3", "1 2 3\n2 4 6");
    assert_output("⍴(⍳2)∘.+2 3⍴0", "2 2 3");
    assert_error_kind("∘.×3", ErrorKind::ArityMismatch);
}

#[test]
fn unbound_name() {
    let err = session().run("x").expect_err("x is not bound");
    assert_eq!(err.kind(), ErrorKind::UnboundName);
    assert_eq!(err.name(), Some("x"));
}

#[test]
fn commute() {
    assert_output("+⍨2", "4");
    assert_output("2÷⍨1", "0.5");
    assert_output("3-⍨10", "7");
}

#[test]
fn each() {
    assert_output("{2+⍵}¨2 3 4", "4 5 6");
    assert_output("1 2 3+¨10", "11 12 13");
    assert_output("⍴¨(1 2)(3 4 5)", "(2) (3)");
}

#[test]
fn composition() {
    assert_output("2-∘×2", "1");
    assert_output("2-⍤×2", "¯4");
    assert_output("2-⍥×2", "0");
    assert_output("-∘×¯5", "1");
    assert_output("(2∘×) 3", "6");
    assert_output("(×∘2) 3", "6");
    assert_output("(-∘1) 5", "4");
    assert_error_kind("1 (2∘×) 3", ErrorKind::ArityMismatch);
}

#[test]
fn inner_product() {
    assert_output("1 2 3+.×4 5 6", "32");
    assert_output("(2 2⍴1 2 3 4)+.×2 2⍴5 6 7 8", "19 22\n43 50");
    assert_output("1 2 3∧.=1 2 3", "1");
    assert_error_kind("1 2+.×1 2 3", ErrorKind::ShapeMismatch);
}

#[test]
fn power() {
    assert_output("(1∘+⍣3) 0", "3");
    assert_output("1∘+⍣{⍺>10} 1", "11");
    assert_output("2 (+⍣3) 0", "6");
    assert_output("({⍵×2}⍣0) 7", "7");
    assert_error_kind("(1∘+⍣¯1) 0", ErrorKind::DomainError);
}

#[test]
fn power_gives_up_without_convergence() {
    let config = Config { max_power_iterations: 50,
                          ..Config::default() };
    let mut session = Session::new(config).unwrap();
    let err = session.run("(1∘+⍣{0}) 1").expect_err("never converges");
    assert_eq!(err.kind(), ErrorKind::DomainError);
}

#[test]
fn index_origin() {
    assert_output("⎕IO←0 ⋄ +/⍳5", "10");
    assert_output("⎕IO←0 ⋄ 5 6 7⍳7", "2");
    assert_output("⎕IO", "1");
    assert_error_kind("⎕IO←2", ErrorKind::DomainError);
    assert_error_kind("⎕XY←1", ErrorKind::DomainError);
    assert_error_kind("⎕IO←+", ErrorKind::KindMismatch);
}

#[test]
fn failed_system_assignment_keeps_old_value() {
    let mut session = session();
    assert!(session.run("⎕IO←2").is_err());
    assert_eq!(session.echo("⍳3").unwrap().as_deref(), Some("1 2 3"));
    assert_eq!(session.settings().index_origin, 1);
}

#[test]
fn comparison_tolerance() {
    assert_output("1=1+1E¯15", "1");
    assert_output("⎕CT←0 ⋄ 1=1+1E¯15", "0");
    assert_error_kind("⎕CT←0.1", ErrorKind::DomainError);
}

#[test]
fn print_precision() {
    assert_output("÷3", "0.3333333333");
    assert_output("⎕PP←3 ⋄ ÷3", "0.333");
}

#[test]
fn system_variables_assigned_inside_functions_are_global() {
    let mut session = session();
    session.run("set←{⎕IO←⍵ ⋄ ⍵} ⋄ set 0").unwrap();
    assert_eq!(session.echo("⍳3").unwrap().as_deref(), Some("0 1 2"));
}

#[test]
fn scope_shadowing() {
    assert_output("x←1 ⋄ f←{x←5 ⋄ x+⍵} ⋄ y←f 1 ⋄ x y", "1 6");

    let mut session = session();
    session.run("x←1 ⋄ f←{x←5 ⋄ x} ⋄ f 0").unwrap();
    assert_eq!(session.echo("x").unwrap().as_deref(), Some("1"));
}

#[test]
fn local_assignments_do_not_change_outer_parsing() {
    assert_output("f←{⍵+1} ⋄ {f←2 ⋄ f} 0 ⋄ f 1", "2");
    assert_output("f←{⍵+1} ⋄ g←{f←⍵ ⋄ f×2} ⋄ (g 3),f 1", "6 2");
}

#[test]
fn closure_capture() {
    assert_output("x←10 ⋄ f←{x+⍵} ⋄ g←{x←100 ⋄ f ⍵} ⋄ g 1", "11");
    assert_output("n←2 ⋄ scale←{n×⍵} ⋄ apply←{n←10 ⋄ scale ⍵} ⋄ apply 3", "6");
    assert_error_kind("mk←{{⍵}} ⋄ mk 1", ErrorKind::KindMismatch);
}

#[test]
fn right_to_left_evaluation() {
    assert_output("x←1 ⋄ (x←2)+x", "3");
    assert_output("2×3+4", "14");
    assert_output("10-2-3", "11");
}

#[test]
fn guards_and_recursion() {
    assert_output("fact←{⍵≤1:1 ⋄ ⍵×∇ ⍵-1} ⋄ fact 5", "120");
    assert_output("fib←{⍵<2:⍵ ⋄ (∇ ⍵-1)+∇ ⍵-2} ⋄ fib 10", "55");
    assert_output("sgn←{⍵>0:'pos' ⋄ ⍵<0:'neg' ⋄ 'zero'} ⋄ sgn ¯4", "neg");
    assert_error_kind("{⍵>0:1} ¯1", ErrorKind::DomainError);
    assert_error_kind("{1 2:3} 0", ErrorKind::DomainError);
}

#[test]
fn dyadic_anonymous_functions() {
    assert_output("3 {⍺×⍵} 4", "12");
    assert_output("avg←{(+/⍵)÷≢⍵} ⋄ avg 1 2 3 4", "2.5");
    assert_error_kind("{⍺+⍵} 1", ErrorKind::UnboundName);
}

#[test]
fn call_depth_is_limited() {
    let config = Config { max_depth: 32,
                          ..Config::default() };
    let mut session = Session::new(config).unwrap();
    let err = session.run("f←{∇ ⍵} ⋄ f 1").expect_err("unbounded recursion");
    assert_eq!(err.kind(), ErrorKind::DomainError);
    assert_eq!(session.echo("{⍵≤1:⍵ ⋄ ∇ ⍵-1} 20").unwrap().as_deref(), Some("1"));
}

#[test]
fn deep_nesting_is_an_error_not_a_crash() {
    let terms = vec!["1"; 20_000].join("+");
    assert_error_kind(&terms, ErrorKind::SyntaxPassthrough);
    assert_output(&vec!["1"; 500].join("+"), "500");

    let config = Config { max_depth: 10_000,
                          max_nesting: 64,
                          ..Config::default() };
    let mut session = Session::new(config).unwrap();
    let count = "count←{⍵=0:0 ⋄ 1+∇ ⍵-1}";
    session.run(count).unwrap();
    let err = session.run("count 100").expect_err("nests past the limit");
    assert_eq!(err.kind(), ErrorKind::DomainError);
    assert_eq!(session.echo("count 5").unwrap().as_deref(), Some("5"));
}

#[test]
fn structural_primitives() {
    assert_output("1 2,3", "1 2 3");
    assert_output("⌽1 2 3", "3 2 1");
    assert_output("1⌽1 2 3", "2 3 1");
    assert_output("⊖2 2⍴⍳4", "3 4\n1 2");
    assert_output("⍉2 3⍴⍳6", "1 4\n2 5\n3 6");
    assert_output("2↑1 2 3", "1 2");
    assert_output("¯2↑1 2 3", "2 3");
    assert_output("5↑1 2", "1 2 0 0 0");
    assert_output("1↓1 2 3", "2 3");
    assert_output("¯1↓1 2 3", "1 2");
    assert_output("1 2 3⍳2", "2");
    assert_output("1 2 3 4~2 4", "1 3");
    assert_output("⊃1 2 3", "1");
    assert_output("≢1 2 3", "3");
    assert_output("≡(1 2)(3 4)", "2");
    assert_output("1 2≡1 2", "1");
    assert_output("1 2≢1 2", "0");
    assert_output("1⊣2", "1");
    assert_output("1⊢2", "2");
}

#[test]
fn unsupported_valences() {
    assert_error_kind("↑1 2", ErrorKind::ArityMismatch);
    assert_error_kind("1 2⍉3 4", ErrorKind::ArityMismatch);
    assert_error_kind("<3", ErrorKind::ArityMismatch);
    assert_error_kind("2+/1 2 3", ErrorKind::ArityMismatch);
}

#[test]
fn scalar_functions() {
    assert_output("-3", "¯3");
    assert_output("3-5", "¯2");
    assert_output("|¯4 3", "4 3");
    assert_output("⌊2.5 ¯2.5", "2 ¯3");
    assert_output("⌈2.5", "3");
    assert_output("3⌈5", "5");
    assert_output("!5", "120");
    assert_output("2!4", "6");
    assert_output("2*10", "1024");
    assert_output("10⍟1000", "3");
    assert_output("3|10", "1");
    assert_output("×¯2 0 3", "¯1 0 1");
    assert_output("|3J4", "5");
    assert_output("0÷0", "1");
    assert_output("1 0 1∧1 1 0", "1 0 0");
    assert_output("2<1 2 3", "0 0 1");
    assert_error_kind("1÷0", ErrorKind::DomainError);
    assert_error_kind("2∧3", ErrorKind::DomainError);
}

#[test]
fn overflow_is_a_domain_error() {
    assert_error_kind("2×1E308", ErrorKind::DomainError);
    assert_error_kind("!171", ErrorKind::DomainError);
    assert_error_kind("*1000", ErrorKind::DomainError);
    assert_error_kind("¯1E308-1E308", ErrorKind::DomainError);
    assert_success("!170");
}

#[test]
fn characters() {
    assert_output("'abc'", "abc");
    assert_output("⍴'hello'", "5");
    assert_output("'a'='abc'", "1 0 0");
    assert_output("'it''s'", "it's");
    assert_error_kind("'a'+1", ErrorKind::DomainError);
}

#[test]
fn nested_arrays() {
    assert_output("1 (2 3)", "1 (2 3)");
    assert_output("⍴1 (2 3) 4", "3");
    assert_output("(1 2)+(10 20)(30 40)", "(11 21) (32 42)");
    assert_output("⊂1 2", "(1 2)");
}

#[test]
fn assignment_is_silent() {
    assert_eq!(session().echo("x←3").unwrap(), None);
    assert_eq!(session().echo("f←+/").unwrap(), None);
    assert_eq!(session().echo("x←3 ⋄ x").unwrap().as_deref(), Some("3"));
}

#[test]
fn derived_functions_are_values() {
    assert_output("sum←+/ ⋄ sum 1 2 3", "6");
    assert_output("dot←+.× ⋄ 1 2 dot 3 4", "11");
    assert_output("f←{⍵+1} ⋄ g←f ⋄ g 1", "2");
    assert_output("+/", "+/");
}

#[test]
fn session_survives_errors() {
    let mut session = session();
    assert!(session.run("a←5 ⋄ b←c ⋄ d←1").is_err());
    assert_eq!(session.echo("a").unwrap().as_deref(), Some("5"));
    assert_eq!(session.run("d").unwrap_err().kind(), ErrorKind::UnboundName);
}

#[test]
fn workspace_persists_across_runs() {
    let mut session = session();
    session.run("sq←{⍵×⍵}").unwrap();
    session.run("v←sq 1 2 3").unwrap();
    assert_eq!(session.echo("v").unwrap().as_deref(), Some("1 4 9"));
    assert_eq!(session.names(SymbolKind::Function), vec!["sq".to_string()]);
    assert_eq!(session.names(SymbolKind::Data), vec!["v".to_string()]);

    session.clear().unwrap();
    assert!(session.names(SymbolKind::Function).is_empty());
    assert_eq!(session.echo("⎕IO").unwrap().as_deref(), Some("1"));
}

#[test]
fn run_returns_functions() {
    match session().run("+.×").unwrap() {
        Some(Value::Function(function)) => assert_eq!(function.to_string(), "+.×"),
        other => panic!("expected a function, got {other:?}"),
    }
    assert!(session().run("").unwrap().is_none());
}

#[test]
fn kind_mismatch() {
    assert_error_kind("1 0 1/1 2 3", ErrorKind::KindMismatch);

    let mut session = session();
    session.run("f←{⍵}").unwrap();
    session.run("g←f").unwrap();
    session.run("f←1").unwrap();
    assert_eq!(session.echo("g 2").unwrap().as_deref(), Some("2"));
}

#[test]
fn syntax_errors_pass_through() {
    assert_error_kind("1 +", ErrorKind::SyntaxPassthrough);
    assert_error_kind("(1 2", ErrorKind::SyntaxPassthrough);
    assert_error_kind("{⍵", ErrorKind::SyntaxPassthrough);
    assert_error_kind("1 $ 2", ErrorKind::SyntaxPassthrough);
    assert_error_kind("1←2", ErrorKind::SyntaxPassthrough);

    let err = session().run("1 2\n3 +").unwrap_err();
    assert_eq!(err.position().line, 2);
}

#[test]
fn reduction_glyphs_pick_their_axis() {
    let tokens: Vec<Token> = tokenize("+/ +⌿ ⍝ note").unwrap()
                                                    .into_iter()
                                                    .map(|(token, _)| token)
                                                    .collect();
    assert_eq!(tokens,
               vec![Token::Primitive(Primitive::Plus),
                    Token::MonadicOp(MonadicOperator::Reduce(Axis::Last)),
                    Token::Primitive(Primitive::Plus),
                    Token::MonadicOp(MonadicOperator::Reduce(Axis::First))]);
}

#[test]
fn comments_and_separators() {
    assert_success("x←1 ⍝ a comment\ny←2 ◊ z←x+y");
    assert_output("⍝ nothing here\n1+1", "2");
    assert_failure("x←");
}
