pub mod builtins;

pub use builtins::Builtin;

use crate::{
    error::{Result, SchemeError},
    objects::{ComplexFragment, Domain, Gate, SeqItem, StructItem},
    parser::{
        ast_scheme::{BinOp, DefKind, DnaLiteral, Expr, Pattern, SeqToken, Stmt, StructToken},
        naming::DomainAllocator,
        Span, Spanned,
    },
};
use std::{cell::RefCell, collections::BTreeMap, fmt, rc::Rc};
use tracing::{debug, trace};

#[derive(Clone, Debug)]
pub enum Value {
    Num(i64),
    Bool(bool),
    Str(String),
    List(Vec<Value>),
    Domain(Domain),
    Fragment(Rc<ComplexFragment>),
    Species(Rc<SpeciesValue>),
    Reaction(Rc<ReactionValue>),
    Gate(Rc<Gate>),
    Closure(Rc<Definition>),
    Builtin(Builtin),
    Void,
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Num(a), Self::Num(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Domain(a), Self::Domain(b)) => a == b,
            (Self::Fragment(a), Self::Fragment(b)) => a == b,
            (Self::Species(a), Self::Species(b)) => a == b,
            (Self::Reaction(a), Self::Reaction(b)) => a == b,
            (Self::Gate(a), Self::Gate(b)) => a == b,
            (Self::Builtin(a), Self::Builtin(b)) => a == b,
            (Self::Void, Self::Void) => true,
            // Two closures are never equal, not even to themselves.
            (Self::Closure(_), Self::Closure(_)) => false,
            _ => false,
        }
    }
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Num(_) => "number",
            Self::Bool(_) => "boolean",
            Self::Str(_) => "string",
            Self::List(_) => "list",
            Self::Domain(_) => "domain",
            Self::Fragment(_) => "structure",
            Self::Species(_) => "species",
            Self::Reaction(_) => "reaction",
            Self::Gate(_) => "gate",
            Self::Closure(_) => "function",
            Self::Builtin(_) => "builtin",
            Self::Void => "void",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Num(n) => write!(f, "{}", n),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Str(s) => write!(f, "{}", s),
            Self::List(vs) => write!(
                f,
                "[{}]",
                vs.iter()
                    .map(|v| v.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            Self::Domain(d) => write!(f, "{}", d),
            Self::Fragment(frag) => match &frag.name {
                Some(name) => write!(f, "{}", name),
                None => write!(f, "{}", frag),
            },
            Self::Species(s) => write!(f, "{}", s.name),
            Self::Reaction(r) => {
                let side = |vs: &[Value]| {
                    vs.iter()
                        .map(|v| v.to_string())
                        .collect::<Vec<_>>()
                        .join(" + ")
                };

                write!(
                    f,
                    "{} {} {}",
                    side(&r.reactants),
                    if r.reversible { "<=>" } else { "->" },
                    side(&r.products)
                )
            }
            Self::Gate(g) => write!(f, "{}", g),
            Self::Closure(def) => write!(f, "<{} {}>", def.kind, def.name),
            Self::Builtin(b) => write!(f, "<builtin {}>", b.name()),
            Self::Void => write!(f, "()"),
        }
    }
}

/// A formal species handed to the scheme's `formal' definition.
#[derive(Clone, Debug, PartialEq)]
pub struct SpeciesValue {
    pub name: String,
}

/// One reaction of the input CRN, with each side holding the species'
/// translated structures.
#[derive(Clone, Debug, PartialEq)]
pub struct ReactionValue {
    pub reactants: Vec<Value>,
    pub products: Vec<Value>,
    pub reversible: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Definition {
    pub kind: DefKind,
    pub name: String,
    pub params: Vec<String>,
    pub body: Expr,
}

/// A deferred `where' assignment, shared by every name its pattern
/// binds. The right-hand side runs at most once.
#[derive(Debug)]
pub struct WhereThunk {
    pattern: Pattern,
    expr: Expr,
    state: RefCell<ThunkState>,
}

#[derive(Debug)]
enum ThunkState {
    Pending,
    InProgress,
    Forced(BTreeMap<String, Value>),
}

#[derive(Clone, Debug)]
enum Binding {
    Value(Value),
    Thunk(Rc<WhereThunk>),
}

/// One lexical frame. Call frames have no parent; name resolution falls
/// back to the globals after the chain is exhausted.
#[derive(Debug)]
pub struct Scope<'a> {
    parent: Option<&'a Scope<'a>>,
    vars: RefCell<BTreeMap<String, Binding>>,
}

impl Scope<'_> {
    pub fn root() -> Self {
        Self {
            parent: None,
            vars: RefCell::new(BTreeMap::new()),
        }
    }
}

/// All mutable state of one translation run: the loaded globals, the
/// domain allocator, and the stack of `where' bindings currently being
/// forced.
#[derive(Debug)]
pub struct Environment {
    pub globals: BTreeMap<String, Value>,
    pub allocator: DomainAllocator,
    forcing: Vec<Rc<WhereThunk>>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    pub fn new() -> Self {
        let mut globals = BTreeMap::new();

        for b in Builtin::ALL {
            globals.insert(b.name().to_owned(), Value::Builtin(b));
        }

        globals.insert("empty".to_owned(), Value::List(Vec::new()));

        Self {
            globals,
            allocator: DomainAllocator::default(),
            forcing: Vec::new(),
        }
    }

    /// Installs the top-level statements of a scheme into the globals.
    pub fn load(&mut self, stmts: &[Spanned<Stmt>]) -> Result<()> {
        for stmt in stmts {
            match &stmt.0 {
                Stmt::Def {
                    kind,
                    name,
                    params,
                    body,
                } => {
                    debug!("loading {} {}", kind, name.0);

                    self.globals.insert(
                        name.0.clone(),
                        Value::Closure(Rc::new(Definition {
                            kind: *kind,
                            name: name.0.clone(),
                            params: params.iter().map(|p| p.0.clone()).collect(),
                            body: body.clone(),
                        })),
                    );
                }
                Stmt::Global { pattern, value } => {
                    debug!("loading global {}", pattern);

                    let value = self.eval(&Scope::root(), value)?;

                    for (name, value) in pattern_match(pattern, value)? {
                        self.globals.insert(name, value);
                    }
                }
            }
        }

        Ok(())
    }

    pub fn eval(&mut self, scope: &Scope, expr: &Expr) -> Result<Value> {
        match expr {
            Expr::Id(Spanned(name, span)) => self.lookup(scope, name, span),
            Expr::Num(n) => Ok(Value::Num(*n)),
            Expr::Quote(s) => Ok(Value::Str(s.clone())),
            Expr::List(es) => es
                .iter()
                .map(|e| self.eval(scope, e))
                .collect::<Result<Vec<_>>>()
                .map(Value::List),
            Expr::Dna(lit) => self.eval_dna(scope, lit),
            Expr::Uminus(e) => match self.eval(scope, e)? {
                Value::Num(n) => Ok(Value::Num(-n)),
                other => Err(SchemeError::Type {
                    message: format!(
                        "unary minus requires a number, got a {}",
                        other.type_name()
                    ),
                }),
            },
            Expr::BinOp { op, lhs, rhs } => self.eval_binop(scope, *op, lhs, rhs),
            Expr::If {
                arms,
                fallback,
                span,
            } => {
                for (cond, branch) in arms {
                    match self.eval(scope, cond)? {
                        Value::Bool(true) => return self.eval(scope, branch),
                        Value::Bool(false) => {}
                        other => {
                            return Err(SchemeError::Type {
                                message: format!(
                                    "a condition must be a boolean, got a {}",
                                    other.type_name()
                                ),
                            })
                        }
                    }
                }

                match fallback {
                    Some(fb) => self.eval(scope, fb),
                    None => Err(SchemeError::UnmatchedBranch {
                        span: Some(span.clone()),
                    }),
                }
            }
            Expr::Where { body, bindings } => {
                let inner = Scope {
                    parent: Some(scope),
                    vars: RefCell::new(BTreeMap::new()),
                };

                for (pattern, value) in bindings {
                    let thunk = Rc::new(WhereThunk {
                        pattern: pattern.clone(),
                        expr: value.clone(),
                        state: RefCell::new(ThunkState::Pending),
                    });

                    for name in pattern.names() {
                        inner
                            .vars
                            .borrow_mut()
                            .insert(name.to_owned(), Binding::Thunk(thunk.clone()));
                    }
                }

                self.eval(&inner, body)
            }
            Expr::Apply { head, args, .. } => {
                let f = self.eval(scope, head)?;
                let args = args
                    .iter()
                    .map(|a| self.eval(scope, a))
                    .collect::<Result<Vec<_>>>()?;

                self.apply(f, args)
            }
            Expr::Index { head, index, .. } => {
                let head = self.eval(scope, head)?;
                let index = self.eval(scope, index)?;

                match (head, index) {
                    (Value::List(vs), Value::Num(n)) => {
                        let idx = if n < 0 { vs.len() as i64 + n } else { n };

                        if idx < 0 || idx as usize >= vs.len() {
                            return Err(SchemeError::Index {
                                index: n,
                                len: vs.len(),
                            });
                        }

                        Ok(vs[idx as usize].clone())
                    }
                    (Value::List(_), other) => Err(SchemeError::Type {
                        message: format!("an index must be a number, got a {}", other.type_name()),
                    }),
                    (other, _) => Err(SchemeError::Type {
                        message: format!("a {} cannot be indexed", other.type_name()),
                    }),
                }
            }
            Expr::Attr { head, field } => {
                let head = self.eval(scope, head)?;

                attr(&head, field)
            }
        }
    }

    pub fn apply(&mut self, f: Value, args: Vec<Value>) -> Result<Value> {
        match f {
            Value::Closure(def) => {
                trace!("applying {} to {} argument(s)", def.name, args.len());

                if args.len() != def.params.len() {
                    return Err(SchemeError::ArityMismatch {
                        name: def.name.clone(),
                        expected: def.params.len(),
                        given: args.len(),
                    });
                }

                // Call frames deliberately do not chain to the caller:
                // free names in the body resolve against the globals.
                let scope = Scope {
                    parent: None,
                    vars: RefCell::new(
                        def.params
                            .iter()
                            .cloned()
                            .zip(args.into_iter().map(Binding::Value))
                            .collect(),
                    ),
                };

                self.eval(&scope, &def.body)
            }
            Value::Builtin(b) => builtins::call(self, b, args),
            other => Err(SchemeError::Type {
                message: format!("a value of type {} is not callable", other.type_name()),
            }),
        }
    }

    fn lookup(&mut self, scope: &Scope, name: &str, span: &Span) -> Result<Value> {
        enum Probe {
            Forced(Option<Value>),
            InProgress,
            Pending,
        }

        let mut cur = Some(scope);

        'walk: while let Some(s) = cur {
            let binding = s.vars.borrow().get(name).cloned();

            if let Some(binding) = binding {
                let thunk = match binding {
                    Binding::Value(v) => return Ok(v),
                    Binding::Thunk(t) => t,
                };
                let probe = match &*thunk.state.borrow() {
                    ThunkState::Forced(map) => Probe::Forced(map.get(name).cloned()),
                    ThunkState::InProgress => Probe::InProgress,
                    ThunkState::Pending => Probe::Pending,
                };

                match probe {
                    Probe::Forced(Some(v)) => return Ok(v),
                    Probe::Forced(None) => {
                        return Err(SchemeError::PatternMismatch {
                            message: format!("`{}' is not produced by its binding pattern", name),
                        })
                    }
                    Probe::InProgress => {
                        // A binding like `crn = irrev_reactions(crn)'
                        // refers to its own name while being forced:
                        // that occurrence resolves one scope up.
                        if self
                            .forcing
                            .last()
                            .map(|f| Rc::ptr_eq(f, &thunk))
                            .unwrap_or(false)
                        {
                            cur = s.parent;

                            continue 'walk;
                        }

                        return Err(SchemeError::Recursion {
                            name: name.to_owned(),
                        });
                    }
                    Probe::Pending => {
                        trace!("forcing the binding of `{}'", name);

                        *thunk.state.borrow_mut() = ThunkState::InProgress;
                        self.forcing.push(thunk.clone());

                        let result = self.eval(s, &thunk.expr);

                        self.forcing.pop();

                        let value = match result {
                            Ok(v) => v,
                            Err(e) => {
                                *thunk.state.borrow_mut() = ThunkState::Pending;

                                return Err(e);
                            }
                        };
                        let map = pattern_match(&thunk.pattern, value)?;
                        let out = map.get(name).cloned();

                        *thunk.state.borrow_mut() = ThunkState::Forced(map);

                        return out.ok_or_else(|| SchemeError::PatternMismatch {
                            message: format!("`{}' is not produced by its binding pattern", name),
                        });
                    }
                }
            }

            cur = s.parent;
        }

        if let Some(v) = self.globals.get(name) {
            return Ok(v.clone());
        }

        Err(SchemeError::UnboundName {
            name: name.to_owned(),
            span: Some(span.clone()),
        })
    }

    fn eval_dna(&mut self, scope: &Scope, lit: &DnaLiteral) -> Result<Value> {
        let mut sequence = Vec::new();
        let mut attributes = BTreeMap::new();

        for tok in &lit.sequence {
            match tok {
                SeqToken::Domain { name, starred } => {
                    let v = self.lookup(scope, &name.0, &name.1)?;

                    attributes.insert(name.0.clone(), v.clone());

                    match v {
                        Value::Domain(d) => sequence.push(SeqItem::Domain(if *starred {
                            d.complement()
                        } else {
                            d
                        })),
                        other if *starred => {
                            return Err(SchemeError::Type {
                                message: format!(
                                    "`*' applies to domains, but `{}' is a {}",
                                    name.0,
                                    other.type_name()
                                ),
                            })
                        }
                        other => sequence.push(SeqItem::Sub(other)),
                    }
                }
                SeqToken::Unspec => sequence.push(SeqItem::Unspec),
                SeqToken::Inert => sequence.push(SeqItem::Sub(Value::List(Vec::new()))),
                SeqToken::Break => sequence.push(SeqItem::Break),
            }
        }

        let structure = lit
            .structure
            .iter()
            .map(|t| match t {
                StructToken::Dot => StructItem::Dot,
                StructToken::Open => StructItem::Open,
                StructToken::Close => StructItem::Close,
                StructToken::Wildcard => StructItem::Wildcard,
                StructToken::Break => StructItem::Break,
            })
            .collect();

        ComplexFragment::new(sequence, structure, attributes)
            .map(|frag| Value::Fragment(Rc::new(frag)))
    }

    fn eval_binop(&mut self, scope: &Scope, op: BinOp, lhs: &Expr, rhs: &Expr) -> Result<Value> {
        let l = self.eval(scope, lhs)?;

        // `and' and `or' short-circuit.
        if let BinOp::And | BinOp::Or = op {
            let l = as_bool(l, op)?;

            if (op == BinOp::And && !l) || (op == BinOp::Or && l) {
                return Ok(Value::Bool(l));
            }

            return as_bool(self.eval(scope, rhs)?, op).map(Value::Bool);
        }

        let r = self.eval(scope, rhs)?;

        match op {
            BinOp::Add => add(l, r),
            BinOp::Sub | BinOp::Mul | BinOp::Div => {
                let (Value::Num(a), Value::Num(b)) = (&l, &r) else {
                    return Err(SchemeError::Type {
                        message: format!(
                            "`{}' requires numbers, got a {} and a {}",
                            op,
                            l.type_name(),
                            r.type_name()
                        ),
                    });
                };

                match op {
                    BinOp::Sub => Ok(Value::Num(a - b)),
                    BinOp::Mul => Ok(Value::Num(a * b)),
                    _ => {
                        if *b == 0 {
                            Err(SchemeError::Type {
                                message: "division by zero".to_owned(),
                            })
                        } else {
                            Ok(Value::Num(a / b))
                        }
                    }
                }
            }
            BinOp::Eq => Ok(Value::Bool(l == r)),
            BinOp::Ne => Ok(Value::Bool(l != r)),
            BinOp::Le | BinOp::Ge | BinOp::Lt | BinOp::Gt => {
                let (Value::Num(a), Value::Num(b)) = (&l, &r) else {
                    return Err(SchemeError::Type {
                        message: format!(
                            "`{}' requires numbers, got a {} and a {}",
                            op,
                            l.type_name(),
                            r.type_name()
                        ),
                    });
                };

                Ok(Value::Bool(match op {
                    BinOp::Le => a <= b,
                    BinOp::Ge => a >= b,
                    BinOp::Lt => a < b,
                    _ => a > b,
                }))
            }
            BinOp::And | BinOp::Or => unreachable!("handled above"),
        }
    }
}

/// The `+' operator: numeric addition, list concatenation, or string
/// concatenation.
pub(crate) fn add(l: Value, r: Value) -> Result<Value> {
    match (l, r) {
        (Value::Num(a), Value::Num(b)) => Ok(Value::Num(a + b)),
        (Value::List(mut a), Value::List(b)) => {
            a.extend(b);

            Ok(Value::List(a))
        }
        (Value::Str(a), Value::Str(b)) => Ok(Value::Str(a + &b)),
        (l, r) => Err(SchemeError::Type {
            message: format!("cannot add a {} and a {}", l.type_name(), r.type_name()),
        }),
    }
}

fn as_bool(v: Value, op: BinOp) -> Result<bool> {
    match v {
        Value::Bool(b) => Ok(b),
        other => Err(SchemeError::Type {
            message: format!("`{}' requires booleans, got a {}", op, other.type_name()),
        }),
    }
}

fn attr(head: &Value, field: &Spanned<String>) -> Result<Value> {
    let err = || SchemeError::UnknownAttribute {
        name: field.0.clone(),
        span: Some(field.1.clone()),
    };

    match head {
        Value::Fragment(frag) => {
            if let Some(v) = frag.attributes.get(&field.0) {
                return Ok(v.clone());
            }

            if field.0 == "name" {
                return frag.name.clone().map(Value::Str).ok_or_else(err);
            }

            Err(err())
        }
        Value::Species(s) if field.0 == "name" => Ok(Value::Str(s.name.clone())),
        Value::Reaction(r) => match field.0.as_str() {
            "reactants" => Ok(Value::List(r.reactants.clone())),
            "products" => Ok(Value::List(r.products.clone())),
            "reversible" => Ok(Value::Bool(r.reversible)),
            _ => Err(err()),
        },
        _ => Err(err()),
    }
}

pub fn pattern_match(pattern: &Pattern, value: Value) -> Result<BTreeMap<String, Value>> {
    match pattern {
        Pattern::Id(name) => Ok(BTreeMap::from([(name.0.clone(), value)])),
        Pattern::List(ps) => match value {
            Value::List(vs) => {
                if ps.len() != vs.len() {
                    return Err(SchemeError::PatternMismatch {
                        message: format!(
                            "a pattern of {} name(s) cannot match a list of length {}",
                            ps.len(),
                            vs.len()
                        ),
                    });
                }

                let mut map = BTreeMap::new();

                for (p, v) in ps.iter().zip(vs) {
                    map.extend(pattern_match(p, v)?);
                }

                Ok(map)
            }
            other => Err(SchemeError::PatternMismatch {
                message: format!(
                    "cannot destructure a {} with a list pattern",
                    other.type_name()
                ),
            }),
        },
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::parser::parser_scheme::{parse, parse_expr};

    fn eval_str(src: &str) -> Result<Value> {
        let mut env = Environment::new();

        env.eval(&Scope::root(), &parse_expr(src).unwrap())
    }

    #[test_log::test]
    fn test_unused_bindings_stay_unevaluated() {
        assert_eq!(eval_str("0 where x = 1 / 0"), Ok(Value::Num(0)));
    }

    #[test_log::test]
    fn test_binding_forced_once_and_shared() {
        assert_eq!(
            eval_str("[a, b] where [a, b] = [1 + 1, 2 + 2]"),
            Ok(Value::List(vec![Value::Num(2), Value::Num(4)]))
        );
    }

    #[test_log::test]
    fn test_self_reference_shadows_outer_binding() {
        assert_eq!(
            eval_str("(crn where crn = crn + [2]) where crn = [1]"),
            Ok(Value::List(vec![Value::Num(1), Value::Num(2)]))
        );
    }

    #[test_log::test]
    fn test_mutual_recursion_is_an_error() {
        assert!(matches!(
            eval_str("a where { a = b; b = a }"),
            Err(SchemeError::Recursion { .. })
        ));
    }

    #[test_log::test]
    fn test_call_frames_see_globals_not_callers() {
        let mut env = Environment::new();

        env.load(
            &parse("global g = 5; function f(x) = x + g; function h(g) = f(1)").unwrap(),
        )
        .unwrap();

        // `h' rebinds `g' locally, but `f' resolves it against the
        // globals.
        assert_eq!(
            env.eval(&Scope::root(), &parse_expr("h(100)").unwrap()),
            Ok(Value::Num(6))
        );
    }

    #[test_log::test]
    fn test_free_names_in_a_body_are_unbound() {
        let mut env = Environment::new();

        env.load(&parse("function f(x) = y; function g(y) = f(y)").unwrap())
            .unwrap();

        assert!(matches!(
            env.eval(&Scope::root(), &parse_expr("g(1)").unwrap()),
            Err(SchemeError::UnboundName { ref name, .. }) if name == "y"
        ));
    }

    #[test_log::test]
    fn test_closures_never_compare_equal() {
        let mut env = Environment::new();

        env.load(&parse("function f(x) = x; function g(x) = x").unwrap())
            .unwrap();

        assert_eq!(
            env.eval(&Scope::root(), &parse_expr("f == g").unwrap()),
            Ok(Value::Bool(false))
        );
        assert_eq!(
            env.eval(&Scope::root(), &parse_expr("f == f").unwrap()),
            Ok(Value::Bool(false))
        );
    }

    #[test_log::test]
    fn test_negative_indexing() {
        assert_eq!(eval_str("[1, 2, 3][-1]"), Ok(Value::Num(3)));
        assert_eq!(
            eval_str("[1, 2, 3][3]"),
            Err(SchemeError::Index { index: 3, len: 3 })
        );
        assert_eq!(
            eval_str("[1, 2, 3][-4]"),
            Err(SchemeError::Index { index: -4, len: 3 })
        );
    }

    #[test_log::test]
    fn test_conditions_must_be_boolean() {
        assert!(matches!(
            eval_str("if 1 then 2 else 3"),
            Err(SchemeError::Type { .. })
        ));
    }

    #[test_log::test]
    fn test_missing_else_is_an_error() {
        assert!(matches!(
            eval_str("if 1 == 2 then 3"),
            Err(SchemeError::UnmatchedBranch { .. })
        ));
        assert_eq!(
            eval_str("if 1 == 2 then 3 elseif 2 == 2 then 4"),
            Ok(Value::Num(4))
        );
    }

    #[test_log::test]
    fn test_arity_is_checked() {
        let mut env = Environment::new();

        env.load(&parse("function f(x, y) = x + y").unwrap()).unwrap();

        assert_eq!(
            env.eval(&Scope::root(), &parse_expr("f(1)").unwrap()),
            Err(SchemeError::ArityMismatch {
                name: "f".to_owned(),
                expected: 2,
                given: 1
            })
        );
    }

    #[test_log::test]
    fn test_globals_load_with_patterns() {
        let mut env = Environment::new();

        env.load(&parse("global [a, b] = [1, [2, 3]]").unwrap()).unwrap();

        assert_eq!(
            env.eval(&Scope::root(), &parse_expr("a + b[0]").unwrap()),
            Ok(Value::Num(3))
        );
    }

    #[test_log::test]
    fn test_empty_is_predefined() {
        assert_eq!(eval_str("empty + [1]"), Ok(Value::List(vec![Value::Num(1)])));
    }

    #[test_log::test]
    fn test_short_circuit() {
        assert_eq!(eval_str("1 == 2 and 1 / 0 == 0"), Ok(Value::Bool(false)));
        assert_eq!(eval_str("1 == 1 or 1 / 0 == 0"), Ok(Value::Bool(true)));
    }
}
