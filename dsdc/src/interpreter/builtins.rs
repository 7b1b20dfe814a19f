use super::{add, Environment, ReactionValue, Value};
use crate::{
    error::{Result, SchemeError},
    objects::{Complex, Gate, Multiplicity},
};
use itertools::Itertools;
use std::{fmt, rc::Rc};
use tracing::info;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Builtin {
    Print,
    Abort,
    Head,
    Tail,
    Flip,
    Long,
    Short,
    Unique,
    Infty,
    Complement,
    RevReactions,
    IrrevReactions,
    Map,
    Map2,
    Len,
    Range,
    Reverse,
    Sum,
}

impl Builtin {
    pub const ALL: [Self; 18] = [
        Self::Print,
        Self::Abort,
        Self::Head,
        Self::Tail,
        Self::Flip,
        Self::Long,
        Self::Short,
        Self::Unique,
        Self::Infty,
        Self::Complement,
        Self::RevReactions,
        Self::IrrevReactions,
        Self::Map,
        Self::Map2,
        Self::Len,
        Self::Range,
        Self::Reverse,
        Self::Sum,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Print => "print",
            Self::Abort => "abort",
            Self::Head => "head",
            Self::Tail => "tail",
            Self::Flip => "flip",
            Self::Long => "long",
            Self::Short => "short",
            Self::Unique => "unique",
            Self::Infty => "infty",
            Self::Complement => "complement",
            Self::RevReactions => "rev_reactions",
            Self::IrrevReactions => "irrev_reactions",
            Self::Map => "map",
            Self::Map2 => "map2",
            Self::Len => "len",
            Self::Range => "range",
            Self::Reverse => "reverse",
            Self::Sum => "sum",
        }
    }
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

pub fn call(env: &mut Environment, b: Builtin, args: Vec<Value>) -> Result<Value> {
    match b {
        Builtin::Print => {
            info!(
                "{}",
                args.iter()
                    .map(|a| a.to_string())
                    .collect::<Vec<_>>()
                    .join(" ")
            );

            Ok(Value::Void)
        }
        Builtin::Abort => {
            let [message] = take(b, args)?;

            Err(SchemeError::Abort {
                message: message.to_string(),
            })
        }
        Builtin::Head => {
            let [l] = take(b, args)?;
            let vs = as_list(b, l)?;

            vs.into_iter()
                .next()
                .ok_or(SchemeError::EmptyList { builtin: "head" })
        }
        Builtin::Tail => {
            let [l] = take(b, args)?;
            let vs = as_list(b, l)?;

            if vs.is_empty() {
                return Err(SchemeError::EmptyList { builtin: "tail" });
            }

            Ok(Value::List(vs[1..].to_vec()))
        }
        Builtin::Flip => {
            let [l, n] = take(b, args)?;
            let rows = as_list(b, l)?;
            let n = as_num(b, n)?;

            if n < 0 {
                return Err(SchemeError::Type {
                    message: "the dimension given to `flip' must not be negative".to_owned(),
                });
            }

            let n = n as usize;
            let mut out = vec![Vec::with_capacity(rows.len()); n];

            for row in rows {
                let row = as_list(b, row)?;

                if row.len() != n {
                    return Err(SchemeError::LengthMismatch {
                        builtin: "flip",
                        expected: n,
                        found: row.len(),
                    });
                }

                for (j, v) in row.into_iter().enumerate() {
                    out[j].push(v);
                }
            }

            Ok(Value::List(out.into_iter().map(Value::List).collect()))
        }
        Builtin::Long => {
            take::<0>(b, args)?;

            Ok(Value::Domain(env.allocator.long()))
        }
        Builtin::Short => {
            take::<0>(b, args)?;

            Ok(Value::Domain(env.allocator.short()))
        }
        Builtin::Unique => {
            let [n] = take(b, args)?;
            let n = as_num(b, n)?;

            if n <= 0 {
                return Err(SchemeError::Type {
                    message: "the length given to `unique' must be positive".to_owned(),
                });
            }

            Ok(Value::Domain(env.allocator.unique(n as usize)))
        }
        Builtin::Infty => {
            let [v] = take(b, args)?;

            infty_gates(env, v).map(Value::List)
        }
        Builtin::Complement => {
            let [v] = take(b, args)?;

            Ok(complement_value(v))
        }
        Builtin::RevReactions => {
            let [crn] = take(b, args)?;
            let rxns = as_reactions(b, crn)?;
            let mut removed = vec![false; rxns.len()];
            let mut out = Vec::new();

            for (i, r) in rxns.iter().enumerate() {
                if removed[i] {
                    continue;
                }

                let mut reversible = r.reversible;

                for (j, r2) in rxns.iter().enumerate() {
                    if i == j || removed[j] {
                        continue;
                    }

                    if side_key(&r.reactants) == side_key(&r2.products)
                        && side_key(&r.products) == side_key(&r2.reactants)
                    {
                        reversible = true;
                        removed[j] = true;

                        break;
                    }
                }

                out.push(Value::Reaction(Rc::new(ReactionValue {
                    reactants: r.reactants.clone(),
                    products: r.products.clone(),
                    reversible,
                })));
            }

            Ok(Value::List(out))
        }
        Builtin::IrrevReactions => {
            let [crn] = take(b, args)?;
            let rxns = as_reactions(b, crn)?;
            let mut out = Vec::new();

            for r in rxns {
                if r.reversible {
                    out.push(Value::Reaction(Rc::new(ReactionValue {
                        reactants: r.reactants.clone(),
                        products: r.products.clone(),
                        reversible: false,
                    })));
                    out.push(Value::Reaction(Rc::new(ReactionValue {
                        reactants: r.products.clone(),
                        products: r.reactants.clone(),
                        reversible: false,
                    })));
                } else {
                    out.push(Value::Reaction(r));
                }
            }

            Ok(Value::List(out))
        }
        Builtin::Map => {
            let [f, l] = take(b, args)?;
            let vs = as_list(b, l)?;
            let mut out = Vec::with_capacity(vs.len());

            for v in vs {
                out.push(env.apply(f.clone(), vec![v])?);
            }

            Ok(Value::List(out))
        }
        Builtin::Map2 => {
            let [f, xs, ys] = take(b, args)?;
            let xs = as_list(b, xs)?;
            let ys = as_list(b, ys)?;

            if xs.len() != ys.len() {
                return Err(SchemeError::LengthMismatch {
                    builtin: "map2",
                    expected: xs.len(),
                    found: ys.len(),
                });
            }

            let mut out = Vec::with_capacity(xs.len());

            for (x, y) in xs.into_iter().zip(ys) {
                out.push(env.apply(f.clone(), vec![x, y])?);
            }

            Ok(Value::List(out))
        }
        Builtin::Len => {
            let [l] = take(b, args)?;

            Ok(Value::Num(as_list(b, l)?.len() as i64))
        }
        Builtin::Range => {
            let [n] = take(b, args)?;
            let n = as_num(b, n)?;

            Ok(Value::List((0..n.max(0)).map(Value::Num).collect()))
        }
        Builtin::Reverse => {
            let [l] = take(b, args)?;
            let mut vs = as_list(b, l)?;

            vs.reverse();

            Ok(Value::List(vs))
        }
        Builtin::Sum => {
            let [l] = take(b, args)?;
            let vs = as_list(b, l)?;
            let mut it = vs.into_iter();
            let mut acc = match it.next() {
                Some(v) => v,
                None => return Ok(Value::List(Vec::new())),
            };

            for v in it {
                acc = add(acc, v)?;
            }

            Ok(acc)
        }
    }
}

fn infty_gates(env: &mut Environment, v: Value) -> Result<Vec<Value>> {
    match v {
        Value::Fragment(frag) => {
            let (sequence, structure) = frag.flatten(&mut env.allocator)?;

            if sequence.is_empty() {
                return Ok(Vec::new());
            }

            let complex = Complex::assemble(
                frag.name.clone().unwrap_or_default(),
                sequence,
                structure,
            )?;

            Ok(vec![Value::Gate(Rc::new(Gate {
                complex,
                multiplicity: Multiplicity::Catalytic,
            }))])
        }
        Value::List(vs) => {
            let mut out = Vec::new();

            for v in vs {
                out.extend(infty_gates(env, v)?);
            }

            Ok(out)
        }
        other => Err(SchemeError::Type {
            message: format!("`infty' requires a structure, got a {}", other.type_name()),
        }),
    }
}

fn complement_value(v: Value) -> Value {
    match v {
        Value::Domain(d) => Value::Domain(d.complement()),
        Value::List(vs) => Value::List(vs.into_iter().rev().map(complement_value).collect()),
        Value::Str(s) if s == "(" => Value::Str(")".to_owned()),
        Value::Str(s) if s == ")" => Value::Str("(".to_owned()),
        other => other,
    }
}

/// A name multiset identifying one side of a reaction.
fn side_key(side: &[Value]) -> Vec<String> {
    side.iter().map(species_name).sorted().collect()
}

fn species_name(v: &Value) -> String {
    match v {
        Value::Fragment(frag) => frag.name.clone().unwrap_or_else(|| frag.to_string()),
        Value::Species(s) => s.name.clone(),
        other => other.to_string(),
    }
}

fn take<const N: usize>(b: Builtin, args: Vec<Value>) -> Result<[Value; N]> {
    let given = args.len();

    args.try_into().map_err(|_| SchemeError::ArityMismatch {
        name: b.name().to_owned(),
        expected: N,
        given,
    })
}

fn as_list(b: Builtin, v: Value) -> Result<Vec<Value>> {
    match v {
        Value::List(vs) => Ok(vs),
        other => Err(SchemeError::Type {
            message: format!(
                "`{}' requires a list, got a {}",
                b.name(),
                other.type_name()
            ),
        }),
    }
}

fn as_num(b: Builtin, v: Value) -> Result<i64> {
    match v {
        Value::Num(n) => Ok(n),
        other => Err(SchemeError::Type {
            message: format!(
                "`{}' requires a number, got a {}",
                b.name(),
                other.type_name()
            ),
        }),
    }
}

fn as_reactions(b: Builtin, v: Value) -> Result<Vec<Rc<ReactionValue>>> {
    as_list(b, v)?
        .iter()
        .map(|v| match v {
            Value::Reaction(r) => Ok(r.clone()),
            other => Err(SchemeError::Type {
                message: format!(
                    "`{}' requires a list of reactions, got a {}",
                    b.name(),
                    other.type_name()
                ),
            }),
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        interpreter::Scope,
        objects::{ComplexFragment, DomainKind},
        parser::parser_scheme::parse_expr,
    };

    fn eval_str(src: &str) -> Result<Value> {
        let mut env = Environment::new();

        env.eval(&Scope::root(), &parse_expr(src).unwrap())
    }

    fn species(name: &str) -> Value {
        Value::Fragment(Rc::new(ComplexFragment {
            name: Some(name.to_owned()),
            ..Default::default()
        }))
    }

    fn rxn(reactants: Vec<Value>, products: Vec<Value>, reversible: bool) -> Value {
        Value::Reaction(Rc::new(ReactionValue {
            reactants,
            products,
            reversible,
        }))
    }

    #[test_log::test]
    fn test_flip_transposes() {
        assert_eq!(
            eval_str("flip([[1, 2, 3], [4, 5, 6]], 3)"),
            Ok(Value::List(vec![
                Value::List(vec![Value::Num(1), Value::Num(4)]),
                Value::List(vec![Value::Num(2), Value::Num(5)]),
                Value::List(vec![Value::Num(3), Value::Num(6)]),
            ]))
        );
        assert_eq!(
            eval_str("flip(flip([[1, 2], [3, 4]], 2), 2)"),
            eval_str("[[1, 2], [3, 4]]")
        );
    }

    #[test_log::test]
    fn test_flip_rejects_ragged_rows() {
        assert_eq!(
            eval_str("flip([[1, 2], [3]], 2)"),
            Err(SchemeError::LengthMismatch {
                builtin: "flip",
                expected: 2,
                found: 1
            })
        );
    }

    #[test_log::test]
    fn test_head() {
        assert_eq!(eval_str("head([1, 2])"), Ok(Value::Num(1)));
        assert_eq!(
            eval_str("head([])"),
            Err(SchemeError::EmptyList { builtin: "head" })
        );
    }

    #[test_log::test]
    fn test_tail() {
        assert_eq!(
            eval_str("tail([1, 2])"),
            Ok(Value::List(vec![Value::Num(2)]))
        );
        assert_eq!(
            eval_str("tail([])"),
            Err(SchemeError::EmptyList { builtin: "tail" })
        );
    }

    #[test_log::test]
    fn test_range_and_len() {
        assert_eq!(
            eval_str("range(3)"),
            Ok(Value::List(vec![Value::Num(0), Value::Num(1), Value::Num(2)]))
        );
        assert_eq!(eval_str("range(0)"), Ok(Value::List(Vec::new())));
        assert_eq!(eval_str("range(-2)"), Ok(Value::List(Vec::new())));
        assert_eq!(eval_str("len(range(4))"), Ok(Value::Num(4)));
    }

    #[test_log::test]
    fn test_sum_concatenates() {
        assert_eq!(eval_str("sum([[1], [2, 3]])"), eval_str("[1, 2, 3]"));
        assert_eq!(eval_str("sum([])"), Ok(Value::List(Vec::new())));
        assert_eq!(eval_str("sum([5])"), Ok(Value::Num(5)));
        assert_eq!(eval_str("sum([1, 2, 3])"), Ok(Value::Num(6)));
    }

    #[test_log::test]
    fn test_map2_requires_equal_lengths() {
        assert_eq!(
            eval_str("map2(flip, [[[1]]], [1, 1])"),
            Err(SchemeError::LengthMismatch {
                builtin: "map2",
                expected: 1,
                found: 2
            })
        );
    }

    #[test_log::test]
    fn test_unique_length_classes() {
        let Ok(Value::Domain(d)) = eval_str("unique(5)") else {
            panic!("expected a domain");
        };

        assert_eq!(d.name, "u0");
        assert_eq!(d.kind, DomainKind::Short);
        assert_eq!(d.length, 5);
    }

    #[test_log::test]
    fn test_complement() {
        assert_eq!(
            eval_str("complement(\"(\")"),
            Ok(Value::Str(")".to_owned()))
        );
        // lists are complemented elementwise, in reverse order
        assert_eq!(
            eval_str("complement([\"(\", \".\"])"),
            Ok(Value::List(vec![
                Value::Str(".".to_owned()),
                Value::Str(")".to_owned())
            ]))
        );
    }

    #[test_log::test]
    fn test_infty_of_empty_structure_vanishes() {
        assert_eq!(eval_str("infty(\"\" | \"\")"), Ok(Value::List(Vec::new())));
    }

    #[test_log::test]
    fn test_abort_raises() {
        assert_eq!(
            eval_str("abort(\"unsupported arity\")"),
            Err(SchemeError::Abort {
                message: "unsupported arity".to_owned()
            })
        );
    }

    #[test_log::test]
    fn test_rev_reactions_merges_opposing_pairs() {
        let mut env = Environment::new();
        let (a, b2) = (species("A"), species("B"));
        let out = call(
            &mut env,
            Builtin::RevReactions,
            vec![Value::List(vec![
                rxn(vec![a.clone()], vec![b2.clone()], false),
                rxn(vec![b2.clone()], vec![a.clone()], false),
            ])],
        )
        .unwrap();
        let Value::List(rs) = out else {
            panic!("expected a list");
        };

        assert_eq!(rs.len(), 1);

        let Value::Reaction(r) = &rs[0] else {
            panic!("expected a reaction");
        };

        assert!(r.reversible);
    }

    #[test_log::test]
    fn test_rev_reactions_compares_multisets() {
        let mut env = Environment::new();
        let (a, b2) = (species("A"), species("B"));
        let out = call(
            &mut env,
            Builtin::RevReactions,
            vec![Value::List(vec![
                rxn(vec![a.clone(), b2.clone()], vec![a.clone()], false),
                rxn(vec![a.clone()], vec![b2.clone(), a.clone()], false),
            ])],
        )
        .unwrap();
        let Value::List(rs) = out else {
            panic!("expected a list");
        };

        assert_eq!(rs.len(), 1);
    }

    #[test_log::test]
    fn test_irrev_reactions_splits() {
        let mut env = Environment::new();
        let (a, b2) = (species("A"), species("B"));
        let out = call(
            &mut env,
            Builtin::IrrevReactions,
            vec![Value::List(vec![rxn(
                vec![a.clone()],
                vec![b2.clone()],
                true,
            )])],
        )
        .unwrap();
        let Value::List(rs) = out else {
            panic!("expected a list");
        };

        assert_eq!(rs.len(), 2);

        for r in &rs {
            let Value::Reaction(r) = r else {
                panic!("expected a reaction");
            };

            assert!(!r.reversible);
        }
    }

    #[test_log::test]
    fn test_map_applies_closures() {
        let mut env = Environment::new();

        env.load(
            &crate::parser::parser_scheme::parse("function inc(x) = x + 1").unwrap(),
        )
        .unwrap();

        assert_eq!(
            env.eval(&Scope::root(), &parse_expr("map(inc, [1, 2])").unwrap()),
            Ok(Value::List(vec![Value::Num(2), Value::Num(3)]))
        );
        assert_eq!(
            env.eval(&Scope::root(), &parse_expr("map(inc, [])").unwrap()),
            Ok(Value::List(Vec::new()))
        );
    }
}
