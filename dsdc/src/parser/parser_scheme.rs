use super::{
    ast_scheme::{
        BinOp, DefKind, DnaLiteral, Expr, Keyword, Pattern, SeqToken, Stmt, StructToken, Token,
    },
    Span, Spanned,
};
use crate::{error::SchemeError, COMMENT_STR};
use chumsky::{
    error::{LabelError, RichPattern},
    prelude::*,
    util::MaybeRef,
};

pub fn lexer<'src>(
) -> impl Parser<'src, &'src str, Vec<Spanned<Token>>, extra::Err<Rich<'src, char>>> {
    let comment = just(COMMENT_STR)
        .then(any().and_is(just('\n').not()).repeated())
        .padded();

    let ident = text::ident().map(|i: &str| match Keyword::from_ident(i) {
        Some(k) => Token::Keyword(k),
        None => Token::Ident(i.to_owned()),
    });
    let num = text::int(10).try_map(|s: &str, span| {
        s.parse()
            .map(Token::Num)
            .map_err(|_| Rich::custom(span, "integer literal out of range"))
    });
    let string = choice((
        none_of('"')
            .repeated()
            .collect::<String>()
            .delimited_by(just('"'), just('"')),
        none_of('\'')
            .repeated()
            .collect::<String>()
            .delimited_by(just('\''), just('\'')),
    ))
    .map(Token::Str);
    let op = choice((
        just("==").map(|_| Token::EqEq),
        just("!=").map(|_| Token::Ne),
        just("<=").map(|_| Token::Le),
        just(">=").map(|_| Token::Ge),
        just("<").map(|_| Token::Lt),
        just(">").map(|_| Token::Gt),
        just("(").map(|_| Token::LeftParen),
        just(")").map(|_| Token::RightParen),
        just("[").map(|_| Token::LeftBracket),
        just("]").map(|_| Token::RightBracket),
        just("{").map(|_| Token::LeftBrace),
        just("}").map(|_| Token::RightBrace),
        just("=").map(|_| Token::Eq),
        just(";").map(|_| Token::Semicolon),
        just(",").map(|_| Token::Comma),
        just(".").map(|_| Token::Dot),
        just("|").map(|_| Token::Pipe),
        just("*").map(|_| Token::Star),
        just("/").map(|_| Token::Slash),
        just("+").map(|_| Token::Plus),
        just("-").map(|_| Token::Minus),
    ));

    let tok = choice((string, num, ident, op));

    tok.map_with(|tok, e| {
        Spanned(
            tok,
            {
                let x: SimpleSpan = e.span();
                x
            }
            .into_range(),
        )
    })
    .padded_by(comment.repeated())
    .padded()
    .repeated()
    .collect()
    .then_ignore(end())
}

fn span_just<'src>(
    val: Token,
) -> impl Parser<'src, &'src [Spanned<Token>], Spanned<Token>, extra::Err<Rich<'src, Spanned<Token>>>>
       + Clone {
    let v = val.clone();

    select! {
        Spanned(x, s) if x == v => Spanned({ let z: Token = x; z }, s)
    }
    .map_err(move |e: Rich<_>| {
        <Rich<_> as LabelError<&'src [Spanned<Token>], RichPattern<_>>>::merge_expected_found(
            e.clone(),
            [RichPattern::Token(MaybeRef::Val(Spanned(
                val.clone(),
                e.clone().span().into_range(),
            )))],
            None,
            *e.span(),
        )
    })
}

fn kw<'src>(
    k: Keyword,
) -> impl Parser<'src, &'src [Spanned<Token>], Spanned<Token>, extra::Err<Rich<'src, Spanned<Token>>>>
       + Clone {
    span_just(Token::Keyword(k))
}

fn ident<'src>(
) -> impl Parser<'src, &'src [Spanned<Token>], Spanned<String>, extra::Err<Rich<'src, Spanned<Token>>>>
       + Clone {
    select! {
        Spanned(Token::Ident(i), s) => Spanned(i, s)
    }
}

fn string<'src>(
) -> impl Parser<'src, &'src [Spanned<Token>], Spanned<String>, extra::Err<Rich<'src, Spanned<Token>>>>
       + Clone {
    select! {
        Spanned(Token::Str(x), s) => Spanned(x, s)
    }
}

fn pattern<'src>(
) -> impl Parser<'src, &'src [Spanned<Token>], Pattern, extra::Err<Rich<'src, Spanned<Token>>>> + Clone
{
    recursive(|pattern| {
        choice((
            ident().map(Pattern::Id),
            pattern
                .separated_by(span_just(Token::Comma))
                .at_least(1)
                .collect::<Vec<_>>()
                .delimited_by(
                    span_just(Token::LeftBracket),
                    span_just(Token::RightBracket),
                )
                .map(Pattern::List),
        ))
    })
}

enum Trailer {
    Call(Vec<Expr>, Span),
    Index(Expr, Span),
    Attr(Spanned<String>),
}

pub fn expr<'src>(
) -> impl Parser<'src, &'src [Spanned<Token>], Expr, extra::Err<Rich<'src, Spanned<Token>>>> + Clone
{
    recursive(|expr| {
        let dna = string()
            .then_ignore(span_just(Token::Pipe))
            .then(string())
            .try_map(|(seq, stru), span| {
                let sequence =
                    tokenize_sequence_row(&seq.0, &seq.1).map_err(|m| Rich::custom(span, m))?;
                let structure =
                    tokenize_structure_row(&stru.0).map_err(|m| Rich::custom(span, m))?;

                Ok(Expr::Dna(DnaLiteral {
                    sequence,
                    structure,
                }))
            });
        let list = expr
            .clone()
            .separated_by(span_just(Token::Comma))
            .collect::<Vec<_>>()
            .delimited_by(
                span_just(Token::LeftBracket),
                span_just(Token::RightBracket),
            )
            .map(Expr::List);
        let paren = expr
            .clone()
            .delimited_by(span_just(Token::LeftParen), span_just(Token::RightParen));
        let quote = string().map(|Spanned(s, _)| Expr::Quote(s));

        let atom = choice((
            paren,
            list,
            dna,
            quote,
            ident().map(Expr::Id),
            select! { Spanned(Token::Num(n), _) => Expr::Num(n) },
        ));

        let call = span_just(Token::LeftParen)
            .then(
                expr.clone()
                    .separated_by(span_just(Token::Comma))
                    .collect::<Vec<_>>(),
            )
            .then_ignore(span_just(Token::RightParen))
            .map(|(Spanned(_, s), args)| Trailer::Call(args, s));
        let index = span_just(Token::LeftBracket)
            .then(expr.clone())
            .then_ignore(span_just(Token::RightBracket))
            .map(|(Spanned(_, s), e)| Trailer::Index(e, s));
        let attr = span_just(Token::Dot)
            .ignore_then(ident())
            .map(Trailer::Attr);

        let trailered = atom.foldl(
            choice((call, index, attr)).repeated(),
            |head, trailer| match trailer {
                Trailer::Call(args, span) => Expr::Apply {
                    head: Box::new(head),
                    args,
                    span,
                },
                Trailer::Index(e, span) => Expr::Index {
                    head: Box::new(head),
                    index: Box::new(e),
                    span,
                },
                Trailer::Attr(field) => Expr::Attr {
                    head: Box::new(head),
                    field,
                },
            },
        );

        let factor = recursive(|factor| {
            choice((
                span_just(Token::Minus)
                    .ignore_then(factor)
                    .map(|e| Expr::Uminus(Box::new(e))),
                trailered,
            ))
        });

        let binop = |op: BinOp| move |lhs: Expr, rhs: Expr| Expr::BinOp {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        };

        let mul_op = choice((
            span_just(Token::Star).map(|_| BinOp::Mul),
            span_just(Token::Slash).map(|_| BinOp::Div),
        ));
        let term = factor
            .clone()
            .foldl(mul_op.then(factor).repeated(), move |lhs, (op, rhs)| {
                binop(op)(lhs, rhs)
            });

        let add_op = choice((
            span_just(Token::Plus).map(|_| BinOp::Add),
            span_just(Token::Minus).map(|_| BinOp::Sub),
        ));
        let arith = term
            .clone()
            .foldl(add_op.then(term).repeated(), move |lhs, (op, rhs)| {
                binop(op)(lhs, rhs)
            });

        let cmp_op = choice((
            span_just(Token::EqEq).map(|_| BinOp::Eq),
            span_just(Token::Ne).map(|_| BinOp::Ne),
            span_just(Token::Le).map(|_| BinOp::Le),
            span_just(Token::Ge).map(|_| BinOp::Ge),
            span_just(Token::Lt).map(|_| BinOp::Lt),
            span_just(Token::Gt).map(|_| BinOp::Gt),
        ));
        let cmp = arith
            .clone()
            .foldl(cmp_op.then(arith).repeated(), move |lhs, (op, rhs)| {
                binop(op)(lhs, rhs)
            });

        let bool_op = choice((
            kw(Keyword::And).map(|_| BinOp::And),
            kw(Keyword::Or).map(|_| BinOp::Or),
        ));
        let boolean = cmp
            .clone()
            .foldl(bool_op.then(cmp).repeated(), move |lhs, (op, rhs)| {
                binop(op)(lhs, rhs)
            });

        let asgn = pattern()
            .then_ignore(span_just(Token::Eq))
            .then(expr.clone());
        let where_clause = kw(Keyword::Where).ignore_then(choice((
            asgn.clone()
                .separated_by(span_just(Token::Semicolon))
                .at_least(1)
                .collect::<Vec<_>>()
                .delimited_by(span_just(Token::LeftBrace), span_just(Token::RightBrace)),
            asgn.map(|a| vec![a]),
        )));
        let where_expr =
            boolean
                .then(where_clause.or_not())
                .map(|(body, bindings)| match bindings {
                    Some(bindings) => Expr::Where {
                        body: Box::new(body),
                        bindings,
                    },
                    None => body,
                });

        let if_expr = kw(Keyword::If)
            .then(expr.clone())
            .then_ignore(kw(Keyword::Then))
            .then(expr.clone())
            .then(
                kw(Keyword::Elseif)
                    .ignore_then(expr.clone())
                    .then_ignore(kw(Keyword::Then))
                    .then(expr.clone())
                    .repeated()
                    .collect::<Vec<_>>(),
            )
            .then(kw(Keyword::Else).ignore_then(expr.clone()).or_not())
            .map(|((((tok, c0), b0), rest), fallback)| {
                let mut arms = vec![(c0, b0)];
                arms.extend(rest);

                Expr::If {
                    arms,
                    fallback: fallback.map(Box::new),
                    span: tok.1,
                }
            });

        choice((if_expr, where_expr))
    })
}

pub fn parser<'src>(
) -> impl Parser<'src, &'src [Spanned<Token>], Vec<Spanned<Stmt>>, extra::Err<Rich<'src, Spanned<Token>>>>
{
    let e = expr();

    let params = ident()
        .separated_by(span_just(Token::Comma))
        .collect::<Vec<_>>()
        .delimited_by(span_just(Token::LeftParen), span_just(Token::RightParen));
    let def_kind = choice((
        kw(Keyword::Class).map(|t| Spanned(DefKind::Class, t.1)),
        kw(Keyword::Function).map(|t| Spanned(DefKind::Function, t.1)),
        kw(Keyword::Module).map(|t| Spanned(DefKind::Module, t.1)),
        kw(Keyword::Macro).map(|t| Spanned(DefKind::Macro, t.1)),
    ));
    let def = def_kind
        .then(ident())
        .then(params)
        .then_ignore(span_just(Token::Eq))
        .then(e.clone())
        .map(|(((Spanned(kind, s), name), params), body)| {
            Spanned(
                Stmt::Def {
                    kind,
                    name,
                    params,
                    body,
                },
                s,
            )
        });

    let global = kw(Keyword::Global)
        .then(pattern())
        .then_ignore(span_just(Token::Eq))
        .then(e)
        .map(|((t, pattern), value)| Spanned(Stmt::Global { pattern, value }, t.1));

    choice((def, global))
        .separated_by(span_just(Token::Semicolon))
        .at_least(1)
        .allow_trailing()
        .collect::<Vec<_>>()
        .then_ignore(end())
}

pub fn lex(source: &str) -> Result<Vec<Spanned<Token>>, SchemeError> {
    lexer().parse(source).into_result().map_err(|errs| {
        match errs.into_iter().next() {
            Some(e) => SchemeError::Syntax {
                message: e.to_string(),
                span: Some(
                    {
                        let s: SimpleSpan = *e.span();
                        s
                    }
                    .into_range(),
                ),
            },
            None => SchemeError::Syntax {
                message: "lexing failed".to_owned(),
                span: None,
            },
        }
    })
}

pub fn parse(source: &str) -> Result<Vec<Spanned<Stmt>>, SchemeError> {
    let tokens = lex(source)?;
    let res = parser()
        .parse(&tokens)
        .into_result()
        .map_err(|errs| syntax_error(&tokens, errs));

    res
}

/// Parses a single expression, e.g. a REPL line.
pub fn parse_expr(source: &str) -> Result<Expr, SchemeError> {
    let tokens = lex(source)?;
    let res = expr()
        .then_ignore(end())
        .parse(&tokens)
        .into_result()
        .map_err(|errs| syntax_error(&tokens, errs));

    res
}

fn syntax_error<'a>(
    tokens: &'a [Spanned<Token>],
    errs: Vec<Rich<'a, Spanned<Token>>>,
) -> SchemeError {
    let e = match errs.into_iter().next() {
        Some(e) => e,
        None => {
            return SchemeError::Syntax {
                message: "parsing failed".to_owned(),
                span: None,
            }
        }
    };
    let span = e
        .found()
        .map(|t| t.1.clone())
        .or_else(|| {
            let idx: SimpleSpan = *e.span();

            tokens.get(idx.start).map(|t| t.1.clone())
        })
        .or_else(|| tokens.last().map(|t| t.1.end..t.1.end));

    SchemeError::Syntax {
        message: e.to_string(),
        span,
    }
}

fn tokenize_sequence_row(raw: &str, span: &Span) -> Result<Vec<SeqToken>, String> {
    // skip the opening quote
    let base = span.start + 1;
    let mut toks = Vec::new();
    let mut chars = raw.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if c.is_whitespace() {
            continue;
        }

        match c {
            '?' => toks.push(SeqToken::Unspec),
            '~' => toks.push(SeqToken::Inert),
            '+' => toks.push(SeqToken::Break),
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut end = i + c.len_utf8();

                while let Some(&(j, d)) = chars.peek() {
                    if d.is_ascii_alphanumeric() || d == '_' {
                        chars.next();
                        end = j + d.len_utf8();
                    } else {
                        break;
                    }
                }

                let mut starred = false;

                if let Some(&(_, '*')) = chars.peek() {
                    chars.next();
                    starred = true;
                }

                toks.push(SeqToken::Domain {
                    name: Spanned(raw[i..end].to_owned(), base + i..base + end),
                    starred,
                });
            }
            other => {
                return Err(format!("unexpected character `{}' in domain row", other));
            }
        }
    }

    Ok(toks)
}

fn tokenize_structure_row(raw: &str) -> Result<Vec<StructToken>, String> {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '.' => Ok(StructToken::Dot),
            '(' => Ok(StructToken::Open),
            ')' => Ok(StructToken::Close),
            '~' => Ok(StructToken::Wildcard),
            '+' => Ok(StructToken::Break),
            other => Err(format!(
                "unexpected character `{}' in annotation row",
                other
            )),
        })
        .collect()
}
