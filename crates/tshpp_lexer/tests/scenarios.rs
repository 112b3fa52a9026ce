use test_log::test;
use tshpp_common::TargetInfo;
use tshpp_diagnostics::{Diagnostics, Severity};
use tshpp_lexer::{Lexer, Token, TokenKind};

const PROGRAM: &str = "\
ако (x > 0) <
    врати тачно;
> иначе <
    врати нетачно;
>

док (i < 10) <
    i = i + 1;
>

за (i = 0; i < 10; i = i + 1) <
    ако (i == 5) < прекини; >
>

ради <
    x = x - 1;
> док (x > 0);

екстерно функција();
";

fn lex(source: &str) -> (Vec<Token>, Diagnostics) {
    let mut diagnostics = Diagnostics::quiet();
    let tokens = Lexer::new(source, "scenario.ћпп", TargetInfo::host(), &mut diagnostics)
        .collect::<Vec<_>>();
    (tokens, diagnostics)
}

#[test]
fn every_operator_and_delimiter() {
    let (tokens, diagnostics) = lex("+ - * / % = == != < <= > >= & && | || ! ^ ~ ( ) [ ] ; , . :");
    use TokenKind::*;
    let kinds = tokens.iter().map(Token::kind).collect::<Vec<_>>();
    assert_eq!(
        kinds,
        [
            Plus, Minus, Star, Slash, Percent, Assign, Eq, Neq, Lt, Lte, Gt, Gte, BitwiseAnd, And,
            BitwiseOr, Or, Bang, Caret, Tilde, LParen, RParen, LBracket, RBracket, SemiColon,
            Comma, Dot, Colon, Eof
        ]
    );
    assert!(diagnostics.is_empty());
}

#[test]
fn reserved_words_in_program() {
    let (tokens, diagnostics) = lex(PROGRAM);
    assert!(diagnostics.is_empty(), "{diagnostics:#?}");
    assert!(!tokens.iter().any(Token::is_error));

    let expected = [
        (TokenKind::If, None),
        (TokenKind::Identifier, None),
        (TokenKind::Gt, None),
        (TokenKind::Number, Some(0)),
        (TokenKind::Return, None),
        (TokenKind::True, None),
        (TokenKind::Else, None),
        (TokenKind::Return, None),
        (TokenKind::False, None),
    ];
    let mut remaining = tokens.iter();
    for (kind, value) in expected {
        let found = remaining.find(|token| token.kind() == kind && (value.is_none() || token.integer() == value));
        assert!(found.is_some(), "{kind} missing from token stream");
    }

    let reserved = tokens
        .iter()
        .filter(|token| token.kind().is_reserved())
        .map(Token::kind)
        .collect::<Vec<_>>();
    use TokenKind::*;
    assert_eq!(
        reserved,
        [If, Return, True, Else, Return, False, While, For, If, Break, Do, While, External]
    );
    assert_eq!(tokens.last().map(Token::kind), Some(Eof));
}

#[test]
fn block_delimiters_are_comparison_tokens() {
    let (tokens, _) = lex("ако (а) < б; >");
    use TokenKind::*;
    let kinds = tokens.iter().map(Token::kind).collect::<Vec<_>>();
    assert_eq!(
        kinds,
        [If, LParen, Identifier, RParen, Lt, Identifier, SemiColon, Gt, Eof]
    );
}

/// Fractional literals are truncated with a warning. This is how the lexer
/// currently behaves, not necessarily how it should.
#[test]
fn fractional_literal_is_truncated_with_warning() {
    let (tokens, diagnostics) = lex("3.14159");
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].kind(), TokenKind::Number);
    assert_eq!(tokens[0].integer(), Some(3));
    assert_eq!(tokens[0].lexeme(), "3.14159");
    assert_eq!(diagnostics.len(), 1);
    let warning = diagnostics.iter().next().unwrap();
    assert_eq!(warning.severity(), Severity::Warning);
    assert_eq!(warning.message(), "Floating-point numbers are not fully supported yet");
    assert_eq!(warning.suggestion(), Some("Truncating to integer value"));
}

#[test]
fn unterminated_string_is_one_error() {
    let (tokens, diagnostics) = lex("\"abc");
    assert_eq!(tokens[0].kind(), TokenKind::Error);
    assert_eq!(diagnostics.count(Severity::Error), 1);
    assert_eq!(diagnostics.len(), 1);
    let error = diagnostics.iter().next().unwrap();
    assert_eq!(error.message(), "Unterminated string literal");
    assert_eq!((error.line(), error.column()), (1, 1));
    assert_eq!(error.file(), "scenario.ћпп");
}

#[test]
fn mixed_tokens() {
    let (tokens, _) = lex("+ - * / 42 \"string\" 'c'");
    assert_eq!(tokens[4].integer(), Some(42));
    assert_eq!(tokens[5].str(), Some("string"));
    assert_eq!(tokens[6].char(), Some('c'));
    assert_eq!(tokens[7].kind(), TokenKind::Eof);
}

#[test]
fn peeking_never_changes_the_stream() {
    let mut plain_diagnostics = Diagnostics::quiet();
    let mut plain = Lexer::new(PROGRAM, "a.ћпп", TargetInfo::host(), &mut plain_diagnostics);
    let mut peeking_diagnostics = Diagnostics::quiet();
    let mut peeking = Lexer::new(PROGRAM, "a.ћпп", TargetInfo::host(), &mut peeking_diagnostics);

    for round in 0.. {
        let before = peeking.position();
        let mut peeked = None;
        for _ in 0..(round % 3) {
            let token = peeking.peek_token().clone();
            assert_eq!(peeking.position(), before);
            if let Some(previous) = &peeked {
                assert_eq!(previous, &token);
            }
            peeked = Some(token);
        }

        let expected = plain.next_token();
        let actual = peeking.next_token();
        assert_eq!(actual, expected);
        if let Some(peeked) = peeked {
            assert_eq!(peeked, actual);
        }
        assert_eq!(peeking.position(), plain.position());
        if actual.is_eof() {
            break;
        }
    }
}
