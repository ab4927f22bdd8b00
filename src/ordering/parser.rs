//! Parser for the top-level structure of Go files using chumsky
//!
//! Grammar, over the parser stream (see [lexer](super::lexer)):
//!
//!     <file>       = <package> <import>* <decl>* EOF
//!     <package>    = "package" IDENT ";"+
//!     <import>     = "import" <item-tree>+ ";"+
//!     <decl>       = ("const" | "var" | "type") <item-tree>+ ";"+
//!                  | "func" <paren-group>? IDENT <item-tree>* ";"+
//!     <item-tree>  = <group> | any leaf except ";" and the item keywords other than "func"
//!     <group>      = "(" <tree>* ")" | "[" <tree>* "]" | "{" <tree>* "}"
//!
//! Brackets must balance, so an unclosed brace anywhere in the file is a parse error.

use chumsky::error::SimpleReason;
use chumsky::prelude::*;

use super::ast::{Decl, Delimiter, FuncDecl, GenDecl, ImportDecl, SourceFile, TokenTree};
use super::error::ParseError;
use super::lexer::{parser_stream, tokenize_with_spans, TokenSpan};
use super::location::SourceLocation;
use super::token::Token;

/// Type alias for parser error
type ParserError = Simple<TokenSpan>;

/// A parsed file together with what later stages need to map it back onto lines
#[derive(Debug, Clone)]
pub struct ParsedFile {
    pub file: SourceFile,
    /// Every token of the source, comments and line breaks included
    pub tokens: Vec<TokenSpan>,
    pub location: SourceLocation,
}

/// Parse Go source into its top-level structure
pub fn parse(source: &str) -> Result<ParsedFile, ParseError> {
    let tokens = tokenize_with_spans(source)?;
    let stream = parser_stream(source, &tokens);
    let location = SourceLocation::new(source);

    tracing::trace!(
        target: "goreorder::parser",
        tokens = tokens.len(),
        stream = stream.len(),
        "tokenized"
    );

    match source_file().parse(stream.clone()) {
        Ok(file) => Ok(ParsedFile {
            file,
            tokens,
            location,
        }),
        Err(errors) => Err(convert_error(source, &stream, &location, errors)),
    }
}

/// Helper: match a specific token type, keeping the span
fn token(t: Token) -> impl Parser<TokenSpan, TokenSpan, Error = ParserError> + Clone {
    filter(move |(tok, _): &TokenSpan| *tok == t)
}

/// A leaf or a balanced group
fn token_tree() -> impl Parser<TokenSpan, TokenTree, Error = ParserError> + Clone {
    recursive(|tree| {
        let group = |delimiter: Delimiter| {
            let (open, close) = delimiter.tokens();
            token(open)
                .then(tree.clone().repeated())
                .then(token(close))
                .map(move |((open, children), close)| TokenTree::Group {
                    delimiter,
                    span: open.1.start..close.1.end,
                    children,
                })
        };

        choice((
            group(Delimiter::Paren),
            group(Delimiter::Bracket),
            group(Delimiter::Brace),
            filter(|(tok, _): &TokenSpan| !tok.is_opening() && !tok.is_closing())
                .map(TokenTree::Leaf),
        ))
    })
}

/// A token tree at the top level of an item: statement ends and item keywords stop it
fn item_tree() -> impl Parser<TokenSpan, TokenTree, Error = ParserError> + Clone {
    token_tree().try_map(|tree, span| match tree.token() {
        Some(Token::Func) => Ok(tree),
        Some(tok) if tok == Token::Semicolon || tok.starts_item() => {
            Err(Simple::custom(span, "unexpected keyword"))
        }
        _ => Ok(tree),
    })
}

fn source_file() -> impl Parser<TokenSpan, SourceFile, Error = ParserError> {
    let terminator = token(Token::Semicolon).repeated().at_least(1).ignored();

    let package = token(Token::Package)
        .then(token(Token::Ident))
        .then_ignore(terminator.clone())
        .map(|(keyword, name)| keyword.1.start..name.1.end);

    let import = token(Token::Import)
        .then(item_tree().repeated().at_least(1))
        .then_ignore(terminator.clone())
        .map(|(keyword, trees)| {
            let end = trees.last().map(|tree| tree.span().end).unwrap_or(keyword.1.end);
            ImportDecl {
                span: keyword.1.start..end,
            }
        });

    let gen_decl = choice((token(Token::Const), token(Token::Var), token(Token::Type)))
        .then(item_tree().repeated().at_least(1))
        .map(|(keyword, trees)| Decl::Gen(GenDecl::from_trees(keyword, trees)));

    let func_decl = token(Token::Func)
        .then(item_tree().repeated().at_least(1))
        .try_map(|(keyword, trees), span| {
            FuncDecl::from_trees(keyword, trees)
                .map(Decl::Func)
                .ok_or_else(|| Simple::custom(span, "function declaration without a name"))
        });

    let decl = gen_decl.or(func_decl).then_ignore(terminator);

    package
        .then(import.repeated())
        .then(decl.repeated())
        .then_ignore(end())
        .map(|((package, imports), decls)| SourceFile {
            package,
            imports,
            decls,
        })
}

/// Turn the furthest chumsky error into a positioned [ParseError]
fn convert_error(
    source: &str,
    stream: &[TokenSpan],
    location: &SourceLocation,
    errors: Vec<ParserError>,
) -> ParseError {
    let error = errors.into_iter().max_by_key(|error| error.span().start);
    let index = error.as_ref().map(|error| error.span().start).unwrap_or(0);
    let found = stream.get(index);

    let offset = found.map(|(_, span)| span.start).unwrap_or(source.len());
    let position = location.byte_to_position(source, offset);

    let message = match (&error, found) {
        (Some(error), _) if matches!(error.reason(), SimpleReason::Custom(_)) => {
            match error.reason() {
                SimpleReason::Custom(message) if message != "unexpected keyword" => {
                    message.clone()
                }
                _ => format!("unexpected {}", describe(source, found)),
            }
        }
        (_, Some((tok, _))) if index == 0 && *tok != Token::Package => {
            format!("expected `package`, found {}", describe(source, found))
        }
        _ => format!("unexpected {}", describe(source, found)),
    };

    ParseError::new(position.line + 1, position.column + 1, message)
}

fn describe(source: &str, found: Option<&TokenSpan>) -> String {
    match found {
        None => "end of file".to_string(),
        Some((Token::Semicolon, span)) if span.is_empty() => {
            if span.start >= source.len() {
                "end of file".to_string()
            } else {
                "newline".to_string()
            }
        }
        Some((_, span)) => format!("`{}`", &source[span.clone()]),
    }
}
