//! Syntax tree for the top-level structure of a Go file
//!
//! Declarations are not parsed down to expressions. Their contents are kept as token trees:
//! leaves are single tokens, groups are balanced `()`, `[]` or `{}` pairs with their children.
//! That is enough to tell declarations apart, find receivers and result types, and to know
//! where every declaration starts and ends.

use std::ops::Range;

use super::lexer::TokenSpan;
use super::token::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Delimiter {
    Paren,
    Bracket,
    Brace,
}

impl Delimiter {
    pub fn tokens(self) -> (Token, Token) {
        match self {
            Delimiter::Paren => (Token::LParen, Token::RParen),
            Delimiter::Bracket => (Token::LBracket, Token::RBracket),
            Delimiter::Brace => (Token::LBrace, Token::RBrace),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenTree {
    Leaf(TokenSpan),
    Group {
        delimiter: Delimiter,
        span: Range<usize>,
        children: Vec<TokenTree>,
    },
}

impl TokenTree {
    pub fn span(&self) -> Range<usize> {
        match self {
            TokenTree::Leaf((_, span)) => span.clone(),
            TokenTree::Group { span, .. } => span.clone(),
        }
    }

    /// The token of a leaf
    pub fn token(&self) -> Option<Token> {
        match self {
            TokenTree::Leaf((token, _)) => Some(*token),
            TokenTree::Group { .. } => None,
        }
    }

    pub fn is_leaf(&self, token: Token) -> bool {
        self.token() == Some(token)
    }

    pub fn is_group(&self, delimiter: Delimiter) -> bool {
        matches!(self, TokenTree::Group { delimiter: d, .. } if *d == delimiter)
    }

    pub fn children(&self) -> &[TokenTree] {
        match self {
            TokenTree::Leaf(_) => &[],
            TokenTree::Group { children, .. } => children,
        }
    }

    /// Source text of an identifier leaf
    pub fn ident<'s>(&self, source: &'s str) -> Option<&'s str> {
        match self {
            TokenTree::Leaf((Token::Ident, span)) => source.get(span.clone()),
            _ => None,
        }
    }
}

/// Split a tree sequence on top-level separator leaves, dropping empty parts
pub fn split_on(trees: &[TokenTree], separator: Token) -> Vec<&[TokenTree]> {
    trees
        .split(|tree| tree.is_leaf(separator))
        .filter(|part| !part.is_empty())
        .collect()
}

/// Byte range from the first to the last tree of a non-empty sequence
pub fn span_of(trees: &[TokenTree]) -> Option<Range<usize>> {
    let first = trees.first()?.span();
    let last = trees.last()?.span();
    Some(first.start..last.end)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDecl {
    pub span: Range<usize>,
}

/// A `const`, `var` or `type` declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenDecl {
    pub keyword: Token,
    pub span: Range<usize>,
    /// Whether the specs sit in a `( ... )` block
    pub grouped: bool,
    pub specs: Vec<Vec<TokenTree>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncDecl {
    pub span: Range<usize>,
    /// The receiver parameter list of a method
    pub receiver: Option<TokenTree>,
    pub name: Range<usize>,
    /// Everything after the name: type parameters, parameters, results and body
    pub signature: Vec<TokenTree>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decl {
    Gen(GenDecl),
    Func(FuncDecl),
}

impl Decl {
    pub fn keyword(&self) -> Token {
        match self {
            Decl::Gen(decl) => decl.keyword,
            Decl::Func(_) => Token::Func,
        }
    }

    pub fn span(&self) -> Range<usize> {
        match self {
            Decl::Gen(decl) => decl.span.clone(),
            Decl::Func(decl) => decl.span.clone(),
        }
    }
}

/// A parsed Go file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// The `package name` clause
    pub package: Range<usize>,
    pub imports: Vec<ImportDecl>,
    pub decls: Vec<Decl>,
}

impl SourceFile {
    /// Every top-level item after the package clause with its keyword, in source order
    pub fn items(&self) -> Vec<(Token, Range<usize>)> {
        self.imports
            .iter()
            .map(|import| (Token::Import, import.span.clone()))
            .chain(self.decls.iter().map(|decl| (decl.keyword(), decl.span())))
            .collect()
    }
}

impl GenDecl {
    pub(crate) fn from_trees(keyword: TokenSpan, trees: Vec<TokenTree>) -> Self {
        let end = trees.last().map(|tree| tree.span().end).unwrap_or(keyword.1.end);
        let span = keyword.1.start..end;

        let (grouped, specs) = match trees.as_slice() {
            [group] if group.is_group(Delimiter::Paren) => (
                true,
                split_on(group.children(), Token::Semicolon)
                    .into_iter()
                    .map(|spec| spec.to_vec())
                    .collect(),
            ),
            _ => (false, vec![trees]),
        };

        GenDecl {
            keyword: keyword.0,
            span,
            grouped,
            specs,
        }
    }
}

impl FuncDecl {
    /// Shape `func (recv)? name signature...`. Returns `None` when there is no name.
    pub(crate) fn from_trees(keyword: TokenSpan, trees: Vec<TokenTree>) -> Option<Self> {
        let end = trees.last()?.span().end;
        let mut rest = trees.into_iter().peekable();

        let receiver = match rest.peek() {
            Some(tree) if tree.is_group(Delimiter::Paren) => rest.next(),
            _ => None,
        };
        let name = match rest.next()? {
            TokenTree::Leaf((Token::Ident, span)) => span,
            _ => return None,
        };

        Some(FuncDecl {
            span: keyword.1.start..end,
            receiver,
            name,
            signature: rest.collect(),
        })
    }
}
