//! Token definitions for Go source
//!
//! The lexer only needs to be precise enough to find the top-level structure of a file: bracket
//! nesting, statement ends, comments and the declaration keywords. Operators are kept as
//! individual tokens so that a comment glued to an operator (`x =// c`) is still seen as a
//! comment. Literals are not interpreted.
use logos::Logos;

/// All tokens the Go lexer produces
#[derive(Logos, Debug, PartialEq, Eq, Hash, Clone, Copy)]
#[logos(skip r"[ \t\r\f]+")]
pub enum Token {
    #[token("\n")]
    Newline,

    // Comments
    #[regex(r"//[^\n]*")]
    LineComment,
    #[token("/*", block_comment)]
    BlockComment,

    // Literals
    #[regex(r"`[^`]*`")]
    RawString,
    #[regex(r#""([^"\\\n]|\\.)*""#)]
    String,
    #[regex(r"'([^'\\\n]|\\.)*'")]
    Rune,
    #[regex(r"[0-9][0-9A-Za-z_]*(\.[0-9A-Za-z_]*)?")]
    #[regex(r"\.[0-9][0-9A-Za-z_]*")]
    Number,

    #[regex(r"[\p{L}_][\p{L}\p{Nd}_]*")]
    Ident,

    // Keywords the parser looks at
    #[token("package")]
    Package,
    #[token("import")]
    Import,
    #[token("const")]
    Const,
    #[token("var")]
    Var,
    #[token("type")]
    Type,
    #[token("func")]
    Func,
    #[token("interface")]
    Interface,
    #[token("struct")]
    Struct,
    #[token("map")]
    Map,
    #[token("chan")]
    Chan,

    /// `break`, `continue`, `fallthrough` and `return` end a statement when they end a line
    #[token("break")]
    #[token("continue")]
    #[token("fallthrough")]
    #[token("return")]
    Jump,

    #[token("case")]
    #[token("default")]
    #[token("defer")]
    #[token("else")]
    #[token("for")]
    #[token("go")]
    #[token("goto")]
    #[token("if")]
    #[token("range")]
    #[token("select")]
    #[token("switch")]
    Keyword,

    // Delimiters
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,

    // Punctuation with structural meaning
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token(".")]
    Dot,
    #[token("...")]
    Ellipsis,
    #[token("*")]
    Star,
    #[token("=")]
    Assign,
    #[token("++")]
    #[token("--")]
    IncDec,

    #[token("+")]
    #[token("-")]
    #[token("/")]
    #[token("%")]
    #[token("&")]
    #[token("|")]
    #[token("^")]
    #[token("<<")]
    #[token(">>")]
    #[token("&^")]
    #[token("+=")]
    #[token("-=")]
    #[token("*=")]
    #[token("/=")]
    #[token("%=")]
    #[token("&=")]
    #[token("|=")]
    #[token("^=")]
    #[token("<<=")]
    #[token(">>=")]
    #[token("&^=")]
    #[token("&&")]
    #[token("||")]
    #[token("<-")]
    #[token("==")]
    #[token("!=")]
    #[token("<")]
    #[token("<=")]
    #[token(">")]
    #[token(">=")]
    #[token("!")]
    #[token("~")]
    #[token(":=")]
    #[token(":")]
    Op,
}

/// Consume a block comment up to and including `*/`. Unterminated comments are lexing errors.
fn block_comment(lexer: &mut logos::Lexer<Token>) -> bool {
    match lexer.remainder().find("*/") {
        Some(end) => {
            lexer.bump(end + 2);
            true
        }
        None => {
            lexer.bump(lexer.remainder().len());
            false
        }
    }
}

impl Token {
    pub fn is_comment(&self) -> bool {
        matches!(self, Token::LineComment | Token::BlockComment)
    }

    /// Tokens that are neither comments nor line breaks
    pub fn is_code(&self) -> bool {
        !self.is_comment() && *self != Token::Newline
    }

    pub fn is_opening(&self) -> bool {
        matches!(self, Token::LParen | Token::LBracket | Token::LBrace)
    }

    pub fn is_closing(&self) -> bool {
        matches!(self, Token::RParen | Token::RBracket | Token::RBrace)
    }

    /// Keywords that open a top-level item
    pub fn starts_item(&self) -> bool {
        matches!(
            self,
            Token::Package | Token::Import | Token::Const | Token::Var | Token::Type | Token::Func
        )
    }

    /// Whether a line break after this token terminates the statement
    pub fn ends_statement(&self) -> bool {
        matches!(
            self,
            Token::Ident
                | Token::Number
                | Token::String
                | Token::RawString
                | Token::Rune
                | Token::Jump
                | Token::IncDec
                | Token::RParen
                | Token::RBracket
                | Token::RBrace
        )
    }
}
