use super::{Span, Spanned};
use std::fmt;

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Token {
    Keyword(Keyword),
    Ident(String),
    Num(i64),
    Str(String),
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    LeftBrace,
    RightBrace,
    Eq,
    Semicolon,
    Comma,
    Dot,
    Pipe,
    Star,
    Slash,
    Plus,
    Minus,
    EqEq,
    Ne,
    Le,
    Ge,
    Lt,
    Gt,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keyword(k) => write!(f, "{}", k),
            Self::Ident(s) => write!(f, "{}", s),
            Self::Num(n) => write!(f, "{}", n),
            Self::Str(s) => write!(f, "\"{}\"", s),
            Self::LeftParen => write!(f, "("),
            Self::RightParen => write!(f, ")"),
            Self::LeftBracket => write!(f, "["),
            Self::RightBracket => write!(f, "]"),
            Self::LeftBrace => write!(f, "{{"),
            Self::RightBrace => write!(f, "}}"),
            Self::Eq => write!(f, "="),
            Self::Semicolon => write!(f, ";"),
            Self::Comma => write!(f, ","),
            Self::Dot => write!(f, "."),
            Self::Pipe => write!(f, "|"),
            Self::Star => write!(f, "*"),
            Self::Slash => write!(f, "/"),
            Self::Plus => write!(f, "+"),
            Self::Minus => write!(f, "-"),
            Self::EqEq => write!(f, "=="),
            Self::Ne => write!(f, "!="),
            Self::Le => write!(f, "<="),
            Self::Ge => write!(f, ">="),
            Self::Lt => write!(f, "<"),
            Self::Gt => write!(f, ">"),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Keyword {
    Class,
    Function,
    Module,
    Macro,
    Global,
    Where,
    If,
    Then,
    Elseif,
    Else,
    And,
    Or,
}

impl Keyword {
    pub fn from_ident(s: &str) -> Option<Self> {
        Some(match s {
            "class" => Self::Class,
            "function" => Self::Function,
            "module" => Self::Module,
            "macro" => Self::Macro,
            "global" => Self::Global,
            "where" => Self::Where,
            "if" => Self::If,
            "then" => Self::Then,
            "elseif" => Self::Elseif,
            "else" => Self::Else,
            "and" => Self::And,
            "or" => Self::Or,
            _ => return None,
        })
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class => write!(f, "class"),
            Self::Function => write!(f, "function"),
            Self::Module => write!(f, "module"),
            Self::Macro => write!(f, "macro"),
            Self::Global => write!(f, "global"),
            Self::Where => write!(f, "where"),
            Self::If => write!(f, "if"),
            Self::Then => write!(f, "then"),
            Self::Elseif => write!(f, "elseif"),
            Self::Else => write!(f, "else"),
            Self::And => write!(f, "and"),
            Self::Or => write!(f, "or"),
        }
    }
}

/// The kind of a named top-level definition. All four kinds evaluate the
/// same way; the keyword documents the author's intent.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DefKind {
    Class,
    Function,
    Module,
    Macro,
}

impl fmt::Display for DefKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class => write!(f, "class"),
            Self::Function => write!(f, "function"),
            Self::Module => write!(f, "module"),
            Self::Macro => write!(f, "macro"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    Global {
        pattern: Pattern,
        value: Expr,
    },
    Def {
        kind: DefKind,
        name: Spanned<String>,
        params: Vec<Spanned<String>>,
        body: Expr,
    },
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global { pattern, value } => {
                write!(f, "global {} = {}", pattern, value)
            }
            Self::Def {
                kind,
                name,
                params,
                body,
            } => write!(
                f,
                "{} {}({}) = {}",
                kind,
                name.0,
                params
                    .iter()
                    .map(|p| p.0.clone())
                    .collect::<Vec<_>>()
                    .join(", "),
                body
            ),
        }
    }
}

/// A (possibly nested) assignment target, e.g. `[l, t, b]`.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Pattern {
    Id(Spanned<String>),
    List(Vec<Pattern>),
}

impl Pattern {
    pub fn names(&self) -> Vec<&str> {
        match self {
            Self::Id(i) => vec![i.as_str()],
            Self::List(ps) => ps.iter().flat_map(|p| p.names()).collect(),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(i) => write!(f, "{}", i.0),
            Self::List(ps) => write!(
                f,
                "[{}]",
                ps.iter()
                    .map(|p| p.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Ne,
    Le,
    Ge,
    Lt,
    Gt,
    And,
    Or,
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => write!(f, "+"),
            Self::Sub => write!(f, "-"),
            Self::Mul => write!(f, "*"),
            Self::Div => write!(f, "/"),
            Self::Eq => write!(f, "=="),
            Self::Ne => write!(f, "!="),
            Self::Le => write!(f, "<="),
            Self::Ge => write!(f, ">="),
            Self::Lt => write!(f, "<"),
            Self::Gt => write!(f, ">"),
            Self::And => write!(f, "and"),
            Self::Or => write!(f, "or"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Id(Spanned<String>),
    Num(i64),
    Quote(String),
    List(Vec<Expr>),
    Dna(DnaLiteral),
    Uminus(Box<Expr>),
    BinOp {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    If {
        arms: Vec<(Expr, Expr)>,
        fallback: Option<Box<Expr>>,
        span: Span,
    },
    Where {
        body: Box<Expr>,
        bindings: Vec<(Pattern, Expr)>,
    },
    Apply {
        head: Box<Expr>,
        args: Vec<Expr>,
        span: Span,
    },
    Index {
        head: Box<Expr>,
        index: Box<Expr>,
        span: Span,
    },
    Attr {
        head: Box<Expr>,
        field: Spanned<String>,
    },
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(i) => write!(f, "{}", i.0),
            Self::Num(n) => write!(f, "{}", n),
            Self::Quote(s) => write!(f, "\"{}\"", s),
            Self::List(es) => write!(
                f,
                "[{}]",
                es.iter()
                    .map(|e| e.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            Self::Dna(d) => write!(f, "{}", d),
            Self::Uminus(e) => write!(f, "-{}", e),
            Self::BinOp { op, lhs, rhs } => write!(f, "({} {} {})", lhs, op, rhs),
            Self::If {
                arms,
                fallback,
                ..
            } => {
                for (i, (cond, branch)) in arms.iter().enumerate() {
                    let kwd = if i == 0 { "if" } else { " elseif" };

                    write!(f, "{} {} then {}", kwd, cond, branch)?;
                }

                if let Some(fb) = fallback {
                    write!(f, " else {}", fb)?;
                }

                Ok(())
            }
            Self::Where { body, bindings } => {
                write!(f, "{} where {{ ", body)?;

                for (i, (pattern, value)) in bindings.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }

                    write!(f, "{} = {}", pattern, value)?;
                }

                write!(f, " }}")
            }
            Self::Apply { head, args, .. } => write!(
                f,
                "{}({})",
                head,
                args.iter()
                    .map(|a| a.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            Self::Index { head, index, .. } => write!(f, "{}[{}]", head, index),
            Self::Attr { head, field } => write!(f, "{}.{}", head, field.0),
        }
    }
}

/// A two-row structure literal: a domain sequence row and an aligned
/// dot-paren annotation row.
#[derive(Clone, Debug, PartialEq)]
pub struct DnaLiteral {
    pub sequence: Vec<SeqToken>,
    pub structure: Vec<StructToken>,
}

impl fmt::Display for DnaLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\"{}\" | \"{}\"",
            self.sequence
                .iter()
                .map(|t| t.to_string())
                .collect::<Vec<_>>()
                .join(" "),
            self.structure
                .iter()
                .map(|t| t.to_string())
                .collect::<Vec<_>>()
                .join(" ")
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SeqToken {
    Domain { name: Spanned<String>, starred: bool },
    /// `?`: an unspecified domain, minted fresh during flattening.
    Unspec,
    /// `~`: structurally inert filler aligned with an annotation wildcard.
    Inert,
    Break,
}

impl fmt::Display for SeqToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain { name, starred } => {
                write!(f, "{}{}", name.0, if *starred { "*" } else { "" })
            }
            Self::Unspec => write!(f, "?"),
            Self::Inert => write!(f, "~"),
            Self::Break => write!(f, "+"),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StructToken {
    Dot,
    Open,
    Close,
    Wildcard,
    Break,
}

impl fmt::Display for StructToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dot => write!(f, "."),
            Self::Open => write!(f, "("),
            Self::Close => write!(f, ")"),
            Self::Wildcard => write!(f, "~"),
            Self::Break => write!(f, "+"),
        }
    }
}
