use crate::{
    error::{Result, SchemeError},
    interpreter::{Environment, ReactionValue, SpeciesValue, Value},
    objects::{Complex, ComplexFragment, DsdSystem, Gate, Multiplicity},
    parser::{
        ast_scheme::{Expr, Stmt},
        parser_scheme, Spanned,
    },
    PREFIX_FUEL,
};
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, BTreeSet},
    rc::Rc,
};
use tracing::debug;

/// Utility definitions loaded into every environment before the scheme
/// itself.
const PRELUDE: &str = "function rxn_degree(x, r) = if len(x) == 0 then [] elseif len(x[0].reactants) == r then [x[0]] + rxn_degree(tail(x), r) else rxn_degree(tail(x), r) ;
function unirxn(x) = if len(x) == 0 then [] elseif len(x[0].reactants) == 1 then [x[0]] + unirxn(tail(x)) else unirxn(tail(x)) ;
function birxn(x) = if len(x) == 0 then [] elseif len(x[0].reactants) == 2 then [x[0]] + birxn(tail(x)) else birxn(tail(x))";

/// One reaction of the input CRN, by species name.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Reaction {
    pub reactants: Vec<String>,
    pub products: Vec<String>,
    #[serde(default)]
    pub reversible: bool,
}

/// Parses a CRN given either as JSON or in arrow notation, e.g.
/// `A + B -> C; C <=> A`.
pub fn parse_crn(input: &str) -> Result<Vec<Reaction>> {
    let trimmed = input.trim_start();

    if trimmed.starts_with('[') {
        return serde_json::from_str(input).map_err(|e| SchemeError::Syntax {
            message: format!("invalid CRN JSON: {}", e),
            span: None,
        });
    }

    input
        .split(['\n', ';'])
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with(crate::COMMENT_STR))
        .map(parse_reaction)
        .collect()
}

fn parse_reaction(line: &str) -> Result<Reaction> {
    let (lhs, rhs, reversible) = if let Some((l, r)) = line.split_once("<=>") {
        (l, r, true)
    } else if let Some((l, r)) = line.split_once("->") {
        (l, r, false)
    } else {
        return Err(SchemeError::Syntax {
            message: format!("`{}' is not a reaction", line),
            span: None,
        });
    };
    let side = |s: &str| {
        s.split('+')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_owned)
            .collect::<Vec<_>>()
    };

    Ok(Reaction {
        reactants: side(lhs),
        products: side(rhs),
        reversible,
    })
}

/// A parsed and statically checked translation scheme.
#[derive(Clone, Debug)]
pub struct Scheme {
    pub stmts: Vec<Spanned<Stmt>>,
}

impl Scheme {
    pub fn parse(source: &str) -> Result<Self> {
        let stmts = parser_scheme::parse(source)?;

        for required in ["formal", "main"] {
            if !stmts.iter().any(
                |stmt| matches!(&stmt.0, Stmt::Def { name, .. } if name.0 == required),
            ) {
                return Err(SchemeError::Syntax {
                    message: format!("a translation scheme must define `{}'", required),
                    span: None,
                });
            }
        }

        validate_attributes(&stmts)?;

        Ok(Self { stmts })
    }
}

/// Rejects `.field' accesses whose name appears in no structure literal
/// of the scheme and is not one of the reaction fields.
fn validate_attributes(stmts: &[Spanned<Stmt>]) -> Result<()> {
    let mut universe: BTreeSet<&str> =
        BTreeSet::from(["name", "reactants", "products", "reversible"]);
    let mut accesses = Vec::new();

    for stmt in stmts {
        let (Stmt::Global { value: body, .. } | Stmt::Def { body, .. }) = &stmt.0;

        walk(body, &mut universe, &mut accesses);
    }

    for field in accesses {
        if !universe.contains(field.0.as_str()) {
            return Err(SchemeError::UnknownAttribute {
                name: field.0.clone(),
                span: Some(field.1.clone()),
            });
        }
    }

    Ok(())
}

fn walk<'a>(
    expr: &'a Expr,
    universe: &mut BTreeSet<&'a str>,
    accesses: &mut Vec<&'a Spanned<String>>,
) {
    match expr {
        Expr::Id(_) | Expr::Num(_) | Expr::Quote(_) => {}
        Expr::List(es) => {
            for e in es {
                walk(e, universe, accesses);
            }
        }
        Expr::Dna(lit) => {
            for tok in &lit.sequence {
                if let crate::parser::ast_scheme::SeqToken::Domain { name, .. } = tok {
                    universe.insert(name.0.as_str());
                }
            }
        }
        Expr::Uminus(e) => walk(e, universe, accesses),
        Expr::BinOp { lhs, rhs, .. } => {
            walk(lhs, universe, accesses);
            walk(rhs, universe, accesses);
        }
        Expr::If { arms, fallback, .. } => {
            for (cond, branch) in arms {
                walk(cond, universe, accesses);
                walk(branch, universe, accesses);
            }

            if let Some(fb) = fallback {
                walk(fb, universe, accesses);
            }
        }
        Expr::Where { body, bindings } => {
            walk(body, universe, accesses);

            for (_, value) in bindings {
                walk(value, universe, accesses);
            }
        }
        Expr::Apply { head, args, .. } => {
            walk(head, universe, accesses);

            for a in args {
                walk(a, universe, accesses);
            }
        }
        Expr::Index { head, index, .. } => {
            walk(head, universe, accesses);
            walk(index, universe, accesses);
        }
        Expr::Attr { head, field } => {
            walk(head, universe, accesses);
            accesses.push(field);
        }
    }
}

/// A fresh environment with the prelude loaded.
pub fn base_environment() -> Result<Environment> {
    let mut env = Environment::new();

    env.load(&parser_scheme::parse(PRELUDE)?)?;

    Ok(env)
}

/// Translates a CRN into a DSD system: one signal complex per formal
/// species, plus the fuel gates produced by the scheme's `main'.
pub fn translate(scheme: &Scheme, crn: &[Reaction]) -> Result<DsdSystem> {
    let mut env = base_environment()?;

    env.load(&scheme.stmts)?;

    let formal = lookup_global(&env, "formal")?;
    let mut names: Vec<String> = Vec::new();

    for r in crn {
        for name in r.reactants.iter().chain(&r.products) {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
    }

    let mut signals = Vec::new();
    let mut fragments: BTreeMap<String, Value> = BTreeMap::new();

    for name in &names {
        let v = env.apply(
            formal.clone(),
            vec![Value::Species(Rc::new(SpeciesValue { name: name.clone() }))],
        )?;
        let Value::Fragment(frag) = v else {
            return Err(SchemeError::Type {
                message: format!("`formal' must return a structure, got a {}", v.type_name()),
            });
        };
        let (sequence, structure) = frag.flatten(&mut env.allocator)?;
        let signal = Complex::assemble(name.clone(), sequence.clone(), structure.clone())?;

        debug!("signal {} = {}", name, signal);

        signals.push(signal);
        fragments.insert(
            name.clone(),
            Value::Fragment(Rc::new(ComplexFragment::from_flat(
                Some(name.clone()),
                sequence,
                structure,
                frag.attributes.clone(),
            ))),
        );
    }

    let crn_value = Value::List(
        crn.iter()
            .map(|r| {
                Value::Reaction(Rc::new(ReactionValue {
                    reactants: r.reactants.iter().map(|n| fragments[n].clone()).collect(),
                    products: r.products.iter().map(|n| fragments[n].clone()).collect(),
                    reversible: r.reversible,
                }))
            })
            .collect(),
    );
    let main = lookup_global(&env, "main")?;
    let result = env.apply(main, vec![crn_value])?;
    let mut gates = Vec::new();

    collect_gates(&result, &mut gates, &mut env)?;

    // Catalytic fuels are deduplicated by structure and renamed; a
    // single-copy complex is kept once per reaction instance.
    let mut unique: Vec<Gate> = Vec::new();
    let mut n_fuels = 0;

    for mut g in gates {
        if g.multiplicity == Multiplicity::Catalytic {
            if unique.iter().any(|u| {
                u.multiplicity == Multiplicity::Catalytic
                    && u.complex.same_structure(&g.complex)
            }) {
                continue;
            }

            g.complex.name = format!("{}{}", PREFIX_FUEL, n_fuels);
            n_fuels += 1;

            debug!("fuel {} = {}", g.complex.name, g);
        }

        unique.push(g);
    }

    Ok(DsdSystem {
        signals,
        gates: unique,
    })
}

fn lookup_global(env: &Environment, name: &str) -> Result<Value> {
    env.globals
        .get(name)
        .cloned()
        .ok_or_else(|| SchemeError::UnboundName {
            name: name.to_owned(),
            span: None,
        })
}

fn collect_gates(v: &Value, out: &mut Vec<Gate>, env: &mut Environment) -> Result<()> {
    match v {
        Value::Gate(g) => {
            out.push((**g).clone());

            Ok(())
        }
        Value::Fragment(frag) => {
            let (sequence, structure) = frag.flatten(&mut env.allocator)?;

            if sequence.is_empty() {
                return Ok(());
            }

            let complex = Complex::assemble(
                frag.name.clone().unwrap_or_default(),
                sequence,
                structure,
            )?;

            out.push(Gate {
                complex,
                multiplicity: Multiplicity::SingleCopy,
            });

            Ok(())
        }
        Value::List(vs) => {
            for v in vs {
                collect_gates(v, out, env)?;
            }

            Ok(())
        }
        Value::Void => Ok(()),
        other => Err(SchemeError::Type {
            message: format!(
                "`main' must produce structures, got a {}",
                other.type_name()
            ),
        }),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test_log::test]
    fn test_parse_crn_arrow_notation() {
        let crn = parse_crn("A + B -> C; C <=> A").unwrap();

        assert_eq!(
            crn,
            vec![
                Reaction {
                    reactants: vec!["A".to_owned(), "B".to_owned()],
                    products: vec!["C".to_owned()],
                    reversible: false,
                },
                Reaction {
                    reactants: vec!["C".to_owned()],
                    products: vec!["A".to_owned()],
                    reversible: true,
                },
            ]
        );
    }

    #[test_log::test]
    fn test_parse_crn_json() {
        let crn = parse_crn(r#"[{"reactants": ["A"], "products": ["B"]}]"#).unwrap();

        assert_eq!(crn.len(), 1);
        assert!(!crn[0].reversible);
    }

    #[test_log::test]
    fn test_parse_crn_rejects_garbage() {
        assert!(parse_crn("A B C").is_err());
    }

    #[test_log::test]
    fn test_scheme_requires_formal_and_main() {
        let err = Scheme::parse("module main(crn) = []").unwrap_err();

        assert!(matches!(err, SchemeError::Syntax { .. }));
    }

    #[test_log::test]
    fn test_unknown_attributes_are_rejected_at_load() {
        let source = "class formal(s) = \"t x\" | \". .\"
    where { t = short(); x = long() };
module main(crn) = map(rxn, crn);
module rxn(r) = r.reactants[0].frobnicate";
        let err = Scheme::parse(source).unwrap_err();

        assert!(
            matches!(err, SchemeError::UnknownAttribute { ref name, .. } if name == "frobnicate")
        );
    }

    #[test_log::test]
    fn test_attributes_from_any_literal_are_known() {
        // `x' is declared in the formal literal, accessed through a
        // reaction elsewhere
        let source = "class formal(s) = \"t x\" | \". .\"
    where { t = short(); x = long() };
module rxn(r) = r.reactants[0].x;
module main(crn) = map(rxn, crn)";

        assert!(Scheme::parse(source).is_ok());
    }

    #[test_log::test]
    fn test_prelude_filters_by_degree() {
        let scheme = Scheme::parse(
            "class formal(s) = \"x\" | \".\" where x = long();
module rxn(r) = infty(\"xi t xo + xo* t*\" | \". ( ( + ) )\")
    where { xi = r.reactants[0].x; t = short(); xo = r.products[0].x };
module main(crn) = sum(map(rxn, unirxn(crn)))",
        )
        .unwrap();
        let crn = parse_crn("A -> B; A + B -> A").unwrap();
        let sys = translate(&scheme, &crn).unwrap();

        // only the unimolecular reaction produces a gate
        assert_eq!(sys.gates.len(), 1);
    }
}
