//! Tokenization of Go source
//!
//! [tokenize_with_spans] keeps every token, comments and line breaks included, because the
//! outline needs to know where comments and blank lines are. [parser_stream] derives the stream
//! the grammar runs on: comments and line breaks are dropped and the semicolons Go inserts
//! automatically are made explicit.
//!
//! Semicolon insertion follows the Go rule: a line break (or the end of the file) terminates the
//! statement when the last token on the line is an identifier, a literal, one of
//! `break continue fallthrough return`, `++`, `--`, or a closing bracket. A block comment that
//! spans lines counts as a line break.

use std::ops::Range;

use logos::Logos;

use super::error::ParseError;
use super::location::SourceLocation;
use super::token::Token;

/// A token with its byte range in the source
pub type TokenSpan = (Token, Range<usize>);

/// Tokenize the source, keeping comments and line breaks
pub fn tokenize_with_spans(source: &str) -> Result<Vec<TokenSpan>, ParseError> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        match result {
            Ok(token) => tokens.push((token, lexer.span())),
            Err(()) => {
                let span = lexer.span();
                let location = SourceLocation::new(source);
                let position = location.byte_to_position(source, span.start);
                return Err(ParseError::new(
                    position.line + 1,
                    position.column + 1,
                    format!("unexpected character `{}`", lexer.slice()),
                ));
            }
        }
    }

    Ok(tokens)
}

/// Derive the parser stream: no comments, no line breaks, explicit semicolons
pub fn parser_stream(source: &str, tokens: &[TokenSpan]) -> Vec<TokenSpan> {
    let mut stream = Vec::with_capacity(tokens.len());
    let mut last: Option<Token> = None;

    for (token, span) in tokens {
        let breaks_line = match token {
            Token::Newline => true,
            Token::BlockComment => source[span.clone()].contains('\n'),
            _ => false,
        };

        if breaks_line {
            if last.is_some_and(|t| t.ends_statement()) {
                stream.push((Token::Semicolon, span.start..span.start));
            }
            last = None;
            continue;
        }

        if token.is_comment() {
            continue;
        }

        stream.push((*token, span.clone()));
        last = Some(*token);
    }

    if last.is_some_and(|t| t.ends_statement()) {
        stream.push((Token::Semicolon, source.len()..source.len()));
    }

    stream
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream_kinds(source: &str) -> Vec<Token> {
        let tokens = tokenize_with_spans(source).expect("source to tokenize");
        parser_stream(source, &tokens)
            .into_iter()
            .map(|(token, _)| token)
            .collect()
    }

    #[test]
    fn test_spans_cover_source_text() {
        let source = "var x = 1 // one\n";
        let tokens = tokenize_with_spans(source).unwrap();
        let texts: Vec<&str> = tokens.iter().map(|(_, span)| &source[span.clone()]).collect();
        assert_eq!(texts, vec!["var", "x", "=", "1", "// one", "\n"]);
    }

    #[test]
    fn test_semicolon_after_identifier_and_brace() {
        assert_eq!(
            stream_kinds("package main\nfunc f() {\n}\n"),
            vec![
                Token::Package,
                Token::Ident,
                Token::Semicolon,
                Token::Func,
                Token::Ident,
                Token::LParen,
                Token::RParen,
                Token::LBrace,
                Token::RBrace,
                Token::Semicolon
            ]
        );
    }

    #[test]
    fn test_no_semicolon_after_operator_or_comma() {
        assert_eq!(
            stream_kinds("x = 1 +\n2,\n"),
            vec![
                Token::Ident,
                Token::Assign,
                Token::Number,
                Token::Op,
                Token::Number,
                Token::Comma
            ]
        );
    }

    #[test]
    fn test_semicolon_at_end_of_file() {
        let source = "var x int";
        let tokens = tokenize_with_spans(source).unwrap();
        let stream = parser_stream(source, &tokens);
        assert_eq!(stream.last(), Some(&(Token::Semicolon, 9..9)));
    }

    #[test]
    fn test_multiline_block_comment_breaks_line() {
        assert_eq!(
            stream_kinds("x /* a\nb */ y"),
            vec![Token::Ident, Token::Semicolon, Token::Ident, Token::Semicolon]
        );
        assert_eq!(
            stream_kinds("x /* a */ y"),
            vec![Token::Ident, Token::Ident, Token::Semicolon]
        );
    }

    #[test]
    fn test_comments_are_dropped() {
        assert_eq!(
            stream_kinds("// doc\nreturn // done\n"),
            vec![Token::Jump, Token::Semicolon]
        );
    }

    #[test]
    fn test_unknown_character_is_reported() {
        let error = tokenize_with_spans("package main\nvar x = 1 @ 2\n").unwrap_err();
        assert_eq!(error.line, 2);
        assert_eq!(error.column, 11);
        assert_eq!(error.message, "unexpected character `@`");
    }

    #[test]
    fn test_unterminated_string_is_reported() {
        let error = tokenize_with_spans("var s = \"open\n").unwrap_err();
        assert_eq!(error.line, 1);
        assert_eq!(error.column, 9);
    }
}
