//! Lexer for circuit descriptions.
//!
//! Token kinds are not chosen up front. When a token starts, one candidate
//! is opened for every entry of [`CANDIDATES`], and each
//! following character is offered to all candidates still in the running.
//! A candidate that refuses a character drops out. A separator (whitespace
//! or the end of the text) closes the token; exactly one candidate may be
//! left standing, and its spelling must be a whole lexeme of its kind.

use core::fmt;

use crate::error::LexError;
use crate::span::Position;

/// Kind of a token produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Number,
    Wire,
    UnaryGateKeyword,  // NOT
    BinaryGateKeyword, // AND OR
    ShiftGateKeyword,  // LSHIFT RSHIFT
    Arrow,             // ->
}

impl TokenKind {
    pub fn description(self) -> &'static str {
        match self {
            TokenKind::Number => "number",
            TokenKind::Wire => "wire",
            TokenKind::UnaryGateKeyword => "unary gate keyword",
            TokenKind::BinaryGateKeyword => "binary gate keyword",
            TokenKind::ShiftGateKeyword => "shift gate keyword",
            TokenKind::Arrow => "arrow",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Joins kinds into `a, b or c` for messages.
pub fn describe_kinds(kinds: &[TokenKind]) -> String {
    match kinds {
        [] => "nothing".to_string(),
        [only] => only.to_string(),
        [init @ .., last] => {
            let init: Vec<String> = init.iter().map(ToString::to_string).collect();
            format!("{} or {last}", init.join(", "))
        }
    }
}

/// A closed token: its kind, exact spelling and where it started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub spelling: String,
    pub position: Position,
}

impl Token {
    pub fn new(kind: TokenKind, spelling: impl Into<String>, position: Position) -> Self {
        Token {
            kind,
            spelling: spelling.into(),
            position,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:?} '{}' {})", self.kind, self.spelling, self.position)
    }
}

/// Acceptance rule of a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matcher {
    /// One or more ASCII digits.
    Digits,
    /// One or more lowercase ASCII letters.
    Lowercase,
    /// Exactly one of the listed lexemes, accepted one character at a time.
    Lexemes(&'static [&'static str]),
}

impl Matcher {
    /// Whether `spelling` followed by `ch` can still grow into a lexeme.
    fn accepts(self, spelling: &str, ch: char) -> bool {
        match self {
            Matcher::Digits => ch.is_ascii_digit(),
            Matcher::Lowercase => ch.is_ascii_lowercase(),
            Matcher::Lexemes(lexemes) => lexemes.iter().any(|lexeme| {
                lexeme
                    .strip_prefix(spelling)
                    .is_some_and(|rest| rest.starts_with(ch))
            }),
        }
    }

    fn is_complete(self, spelling: &str) -> bool {
        match self {
            Matcher::Digits | Matcher::Lowercase => !spelling.is_empty(),
            Matcher::Lexemes(lexemes) => lexemes.contains(&spelling),
        }
    }
}

/// One entry of the candidate table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateSpec {
    pub kind: TokenKind,
    pub matcher: Matcher,
}

/// Every token kind of the circuit language, tried in parallel.
pub const CANDIDATES: &[CandidateSpec] = &[
    CandidateSpec {
        kind: TokenKind::Number,
        matcher: Matcher::Digits,
    },
    CandidateSpec {
        kind: TokenKind::Wire,
        matcher: Matcher::Lowercase,
    },
    CandidateSpec {
        kind: TokenKind::UnaryGateKeyword,
        matcher: Matcher::Lexemes(&["NOT"]),
    },
    CandidateSpec {
        kind: TokenKind::BinaryGateKeyword,
        matcher: Matcher::Lexemes(&["AND", "OR"]),
    },
    CandidateSpec {
        kind: TokenKind::ShiftGateKeyword,
        matcher: Matcher::Lexemes(&["LSHIFT", "RSHIFT"]),
    },
    CandidateSpec {
        kind: TokenKind::Arrow,
        matcher: Matcher::Lexemes(&["->"]),
    },
];

/// A tentative guess at the kind of the token being scanned.
#[derive(Debug, Clone)]
struct Candidate {
    kind: TokenKind,
    matcher: Matcher,
    spelling: String,
    viable: bool,
}

impl Candidate {
    fn new(spec: &CandidateSpec) -> Self {
        Candidate {
            kind: spec.kind,
            matcher: spec.matcher,
            spelling: String::new(),
            viable: true,
        }
    }

    fn feed(&mut self, ch: char) {
        if self.viable && self.matcher.accepts(&self.spelling, ch) {
            self.spelling.push(ch);
        } else {
            self.viable = false;
        }
    }
}

/// A token that has accepted at least one character and is not yet closed.
#[derive(Debug)]
struct OpenToken {
    position: Position,
    spelling: String,
    candidates: Vec<Candidate>,
}

impl OpenToken {
    fn new(position: Position, table: &[CandidateSpec]) -> Self {
        OpenToken {
            position,
            spelling: String::new(),
            candidates: table.iter().map(Candidate::new).collect(),
        }
    }

    fn feed(&mut self, ch: char, at: Position) -> Result<(), LexError> {
        for candidate in &mut self.candidates {
            candidate.feed(ch);
        }
        if !self.candidates.iter().any(|candidate| candidate.viable) {
            return Err(LexError::NoMatch {
                position: at,
                found: ch,
                spelling: self.spelling.clone(),
            });
        }
        self.spelling.push(ch);
        Ok(())
    }

    fn close(self) -> Result<Token, LexError> {
        let mut live: Vec<Candidate> = self
            .candidates
            .into_iter()
            .filter(|candidate| candidate.viable)
            .collect();

        if live.len() > 1 {
            return Err(LexError::Ambiguous {
                position: self.position,
                spelling: self.spelling,
                kinds: live.iter().map(|candidate| candidate.kind).collect(),
            });
        }

        // `feed` refuses to leave an open token without candidates.
        let survivor = live.pop().expect("open token keeps a live candidate");
        if !survivor.matcher.is_complete(&survivor.spelling) {
            return Err(LexError::UnterminatedToken {
                position: self.position,
                spelling: survivor.spelling,
                kind: survivor.kind,
            });
        }
        Ok(Token::new(survivor.kind, survivor.spelling, self.position))
    }
}

/// Split circuit text into tokens using the standard candidate table.
pub fn tokenize(text: &str) -> Result<Vec<Token>, LexError> {
    tokenize_with(text, CANDIDATES)
}

/// Split text into tokens, trying the kinds of `table` in parallel.
pub fn tokenize_with(text: &str, table: &[CandidateSpec]) -> Result<Vec<Token>, LexError> {
    let mut lexer = Lexer {
        table,
        line: 1,
        column: 0,
        in_comment: false,
        open: None,
        tokens: Vec::new(),
    };
    for ch in text.chars() {
        lexer.step(ch)?;
    }
    lexer.close_open()?;
    Ok(lexer.tokens)
}

struct Lexer<'t> {
    table: &'t [CandidateSpec],
    line: usize,
    column: usize,
    in_comment: bool,
    open: Option<OpenToken>,
    tokens: Vec<Token>,
}

impl Lexer<'_> {
    fn step(&mut self, ch: char) -> Result<(), LexError> {
        let here = Position::new(self.line, self.column + 1);
        self.advance(ch);

        if self.in_comment {
            if ch == '\n' {
                self.in_comment = false;
            }
            return Ok(());
        }
        if ch.is_whitespace() {
            return self.close_open();
        }
        if ch == '#' && self.open.is_none() {
            self.in_comment = true;
            return Ok(());
        }

        let table = self.table;
        self.open
            .get_or_insert_with(|| OpenToken::new(here, table))
            .feed(ch, here)
    }

    fn advance(&mut self, ch: char) {
        if ch == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
    }

    fn close_open(&mut self) -> Result<(), LexError> {
        if let Some(open) = self.open.take() {
            self.tokens.push(open.close()?);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shapes(tokens: &[Token]) -> Vec<(TokenKind, &str)> {
        tokens
            .iter()
            .map(|token| (token.kind, token.spelling.as_str()))
            .collect()
    }

    #[test]
    fn tokenizes_literal_assignment() {
        let tokens = tokenize("123 -> x").expect("lex");
        assert_eq!(
            tokens,
            vec![
                Token::new(TokenKind::Number, "123", Position::new(1, 1)),
                Token::new(TokenKind::Arrow, "->", Position::new(1, 5)),
                Token::new(TokenKind::Wire, "x", Position::new(1, 8)),
            ]
        );
    }

    #[test]
    fn skips_comments() {
        let commented = tokenize("#comment\n1 -> x").expect("lex");
        let plain = tokenize("1 -> x").expect("lex");
        assert_eq!(shapes(&commented), shapes(&plain));
        assert_eq!(commented[0].position, Position::new(2, 1));

        let trailing = tokenize("1 -> x # the answer\n").expect("lex");
        assert_eq!(shapes(&trailing), shapes(&plain));
    }

    #[test]
    fn recognizes_every_gate_keyword() {
        let tokens = tokenize("NOT a AND b OR c LSHIFT d RSHIFT").expect("lex");
        assert_eq!(
            shapes(&tokens),
            vec![
                (TokenKind::UnaryGateKeyword, "NOT"),
                (TokenKind::Wire, "a"),
                (TokenKind::BinaryGateKeyword, "AND"),
                (TokenKind::Wire, "b"),
                (TokenKind::BinaryGateKeyword, "OR"),
                (TokenKind::Wire, "c"),
                (TokenKind::ShiftGateKeyword, "LSHIFT"),
                (TokenKind::Wire, "d"),
                (TokenKind::ShiftGateKeyword, "RSHIFT"),
            ]
        );
    }

    #[test]
    fn tracks_lines_and_columns() {
        let tokens = tokenize("1 -> x\n\n  NOT  x ->\ty\n").expect("lex");
        let not = &tokens[3];
        assert_eq!(not.kind, TokenKind::UnaryGateKeyword);
        assert_eq!(not.position, Position::new(3, 3));
        assert_eq!(tokens[4].position, Position::new(3, 8));
        assert_eq!(tokens[6].position, Position::new(3, 13));
    }

    #[test]
    fn accepts_empty_and_comment_only_text() {
        assert!(tokenize("").expect("lex").is_empty());
        assert!(tokenize("  \n# nothing here\n\n").expect("lex").is_empty());
    }

    #[test]
    fn reports_character_no_kind_accepts() {
        let err = tokenize("x AMD y -> d").unwrap_err();
        assert_eq!(
            err,
            LexError::NoMatch {
                position: Position::new(1, 4),
                found: 'M',
                spelling: "A".to_string(),
            }
        );

        let err = tokenize("Xy -> z").unwrap_err();
        assert!(matches!(err, LexError::NoMatch { found: 'X', .. }));

        let err = tokenize("12ab -> z").unwrap_err();
        assert!(matches!(err, LexError::NoMatch { found: 'a', .. }));
    }

    #[test]
    fn hash_inside_token_is_not_a_comment() {
        let err = tokenize("x#y -> z").unwrap_err();
        assert!(matches!(
            err,
            LexError::NoMatch {
                found: '#',
                position: Position { line: 1, column: 2 },
                ..
            }
        ));
    }

    #[test]
    fn reports_keyword_prefix_at_separator() {
        let err = tokenize("x AN y -> z").unwrap_err();
        assert_eq!(
            err,
            LexError::UnterminatedToken {
                position: Position::new(1, 3),
                spelling: "AN".to_string(),
                kind: TokenKind::BinaryGateKeyword,
            }
        );

        let err = tokenize("1 -").unwrap_err();
        assert!(matches!(
            err,
            LexError::UnterminatedToken {
                kind: TokenKind::Arrow,
                ..
            }
        ));
    }

    #[test]
    fn reports_ambiguous_fragment_with_viable_kinds() {
        const OVERLAPPING: &[CandidateSpec] = &[
            CandidateSpec {
                kind: TokenKind::BinaryGateKeyword,
                matcher: Matcher::Lexemes(&["OR"]),
            },
            CandidateSpec {
                kind: TokenKind::ShiftGateKeyword,
                matcher: Matcher::Lexemes(&["ORSHIFT"]),
            },
            CandidateSpec {
                kind: TokenKind::Wire,
                matcher: Matcher::Lowercase,
            },
        ];

        let err = tokenize_with("x O", OVERLAPPING).unwrap_err();
        assert_eq!(
            err,
            LexError::Ambiguous {
                position: Position::new(1, 3),
                spelling: "O".to_string(),
                kinds: vec![TokenKind::BinaryGateKeyword, TokenKind::ShiftGateKeyword],
            }
        );

        let tokens = tokenize_with("ORS", OVERLAPPING);
        assert!(matches!(
            tokens,
            Err(LexError::UnterminatedToken {
                kind: TokenKind::ShiftGateKeyword,
                ..
            })
        ));
    }

    #[test]
    fn displays_tokens_for_dumps() {
        let token = Token::new(TokenKind::ShiftGateKeyword, "LSHIFT", Position::new(5, 3));
        assert_eq!(token.to_string(), "(ShiftGateKeyword 'LSHIFT' 5:3)");
    }
}
