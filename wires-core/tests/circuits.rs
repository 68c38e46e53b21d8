use wires_core::lexer::{TokenKind, tokenize};
use wires_core::{CoreError, EvalError, LexError, Order, evaluate};

const FIXTURE: &str = "\
123 -> x
456 -> y
x AND y -> d
x OR y -> e
x LSHIFT 2 -> f
y RSHIFT 2 -> g
NOT x -> h
NOT y -> i
";

fn all(source: &str) -> Result<Vec<(String, u16)>, CoreError> {
    let none: &[&str] = &[];
    evaluate(source, none, Order::Name)
}

fn pairs(expected: &[(&str, u16)]) -> Vec<(String, u16)> {
    expected
        .iter()
        .map(|(name, value)| (name.to_string(), *value))
        .collect()
}

#[test]
fn evaluates_reference_circuit() {
    assert_eq!(
        all(FIXTURE).expect("evaluate"),
        pairs(&[
            ("d", 72),
            ("e", 507),
            ("f", 492),
            ("g", 114),
            ("h", 65412),
            ("i", 65079),
            ("x", 123),
            ("y", 456),
        ])
    );
}

#[test]
fn statement_order_does_not_change_values() {
    let reversed: String = FIXTURE
        .lines()
        .rev()
        .map(|line| format!("{line}\n"))
        .collect();
    assert_eq!(all(&reversed).expect("evaluate"), all(FIXTURE).expect("evaluate"));
}

#[test]
fn comments_and_blank_lines_are_ignored() {
    let annotated = "# inputs\n123 -> x\n\n456 -> y   # second input\n\nx AND y -> d\n";
    assert_eq!(
        evaluate(annotated, &["d"], Order::Name).expect("evaluate"),
        pairs(&[("d", 72)])
    );
}

#[test]
fn tokenizes_statement() {
    let kinds: Vec<TokenKind> = tokenize("123 -> x")
        .expect("lex")
        .into_iter()
        .map(|token| token.kind)
        .collect();
    assert_eq!(kinds, [TokenKind::Number, TokenKind::Arrow, TokenKind::Wire]);
}

#[test]
fn sixteen_bit_edges() {
    assert_eq!(
        evaluate("0 -> a\nNOT a -> z\n", &["z"], Order::Name).expect("evaluate"),
        pairs(&[("z", 65535)])
    );
    assert_eq!(
        evaluate("65535 -> w\nw LSHIFT 1 -> s\n", &["s"], Order::Name).expect("evaluate"),
        pairs(&[("s", 65534)])
    );
}

#[test]
fn reports_errors_from_every_stage() {
    assert!(matches!(
        all("x AN y -> z\n"),
        Err(CoreError::Lex(LexError::UnterminatedToken { .. }))
    ));
    assert!(matches!(
        all("1 -> x\nx AND q -> z\n"),
        Err(CoreError::Eval(EvalError::UndefinedWire { ref name, .. })) if name == "q"
    ));
    assert!(matches!(
        all("a -> b\nb -> a\n"),
        Err(CoreError::Eval(EvalError::CyclicDependency { .. }))
    ));
}
