use crate::{
    compiler::{parse_crn, translate, Scheme},
    error::SchemeError,
    objects::Multiplicity,
};

/// A minimal scheme with a shared global toehold: every signal is
/// `t x`, every reaction becomes one catalytic gate.
const TOEHOLD_SCHEME: &str = "global toehold = short();
class formal(s) = \"t x\" | \". .\"
    where { t = toehold; x = long() };
module rxn(r) = infty(\"xi t xo + xo* t*\" | \". ( ( + ) )\")
    where {
        xi = r.reactants[0].x;
        t = toehold;
        xo = r.products[0].x };
module main(crn) = sum(map(rxn, crn))
    where crn = irrev_reactions(crn)";

/// A scheme that only supports generator reactions `-> A', emitting a
/// catalytic fuel and a single-copy complex per reaction.
const GENERATOR_SCHEME: &str = "global gt = short();
class formal(s) = \"gt x\" | \". .\" where x = long();
module rxn(r) =
    (if len(r.reactants) == 0 and len(r.products) == 1 then
        infty(\"a gt b\" | \"( . )\") + [\"x gt\" | \". .\"]
    else abort(\"unsupported reaction arity\"))
    where {
        x = r.products[0].x;
        a = long();
        b = complement(a) };
module main(crn) = sum(map(rxn, crn))";

#[test_log::test]
fn test_unimolecular_translation() {
    let scheme = Scheme::parse(TOEHOLD_SCHEME).unwrap();
    let crn = parse_crn("A -> B").unwrap();
    let sys = translate(&scheme, &crn).unwrap();

    assert_eq!(sys.signals.len(), 2);
    assert_eq!(sys.signals[0].name, "A");
    assert_eq!(sys.signals[0].to_string(), "t0 d1");
    assert_eq!(sys.signals[1].name, "B");
    assert_eq!(sys.signals[1].to_string(), "t0 d2");

    assert_eq!(sys.gates.len(), 1);
    assert_eq!(sys.gates[0].complex.name, "f0");
    assert_eq!(sys.gates[0].complex.to_string(), "d1 t0( d2( + ) )");
    assert_eq!(sys.gates[0].multiplicity, Multiplicity::Catalytic);
}

#[test_log::test]
fn test_reversible_reactions_split_into_two_gates() {
    let scheme = Scheme::parse(TOEHOLD_SCHEME).unwrap();
    let crn = parse_crn("A <=> B").unwrap();
    let sys = translate(&scheme, &crn).unwrap();

    assert_eq!(sys.gates.len(), 2);
    assert_eq!(sys.gates[0].complex.to_string(), "d1 t0( d2( + ) )");
    assert_eq!(sys.gates[1].complex.to_string(), "d2 t0( d1( + ) )");
}

#[test_log::test]
fn test_duplicate_gates_are_merged() {
    let scheme = Scheme::parse(TOEHOLD_SCHEME).unwrap();
    let crn = parse_crn("A -> B; A -> B").unwrap();
    let sys = translate(&scheme, &crn).unwrap();

    assert_eq!(sys.gates.len(), 1);
}

#[test_log::test]
fn test_single_copy_gates_stay_one_per_reaction() {
    // the same complex is emitted both as a fuel and as a bare
    // single-copy output
    let scheme = Scheme::parse(
        "global gt = short();
class formal(s) = \"gt x\" | \". .\" where x = long();
module rxn(r) = infty(\"x gt\" | \". .\") + [\"x gt\" | \". .\"]
    where x = r.reactants[0].x;
module main(crn) = sum(map(rxn, crn))",
    )
    .unwrap();
    let crn = parse_crn("A -> B; A -> B").unwrap();
    let sys = translate(&scheme, &crn).unwrap();

    let catalytic = sys
        .gates
        .iter()
        .filter(|g| g.multiplicity == Multiplicity::Catalytic)
        .count();
    let singles = sys
        .gates
        .iter()
        .filter(|g| g.multiplicity == Multiplicity::SingleCopy)
        .count();

    // the duplicate fuel merges, the single-copy complexes do not
    assert_eq!(catalytic, 1);
    assert_eq!(singles, 2);
}

#[test_log::test]
fn test_one_signal_per_species() {
    let scheme = Scheme::parse(TOEHOLD_SCHEME).unwrap();
    let crn = parse_crn("A -> B; B -> A; A -> A").unwrap();
    let sys = translate(&scheme, &crn).unwrap();

    assert_eq!(
        sys.signals.iter().map(|s| s.name.as_str()).collect::<Vec<_>>(),
        vec!["A", "B"]
    );
}

#[test_log::test]
fn test_global_toehold_is_shared() {
    let scheme = Scheme::parse(TOEHOLD_SCHEME).unwrap();
    let crn = parse_crn("A -> B").unwrap();
    let sys = translate(&scheme, &crn).unwrap();

    // both signals carry the same `t0', minted once at load time
    assert_eq!(sys.signals[0].sequence[0], sys.signals[1].sequence[0]);
}

#[test_log::test]
fn test_translation_is_deterministic() {
    let scheme = Scheme::parse(TOEHOLD_SCHEME).unwrap();
    let crn = parse_crn("A <=> B; B -> C").unwrap();

    assert_eq!(
        translate(&scheme, &crn).unwrap(),
        translate(&scheme, &crn).unwrap()
    );
}

#[test_log::test]
fn test_generator_reactions() {
    let scheme = Scheme::parse(GENERATOR_SCHEME).unwrap();
    let crn = parse_crn(" -> A").unwrap();
    let sys = translate(&scheme, &crn).unwrap();

    assert_eq!(sys.signals.len(), 1);
    assert_eq!(sys.gates.len(), 2);
    assert_eq!(sys.gates[0].multiplicity, Multiplicity::Catalytic);
    assert_eq!(sys.gates[1].multiplicity, Multiplicity::SingleCopy);
}

#[test_log::test]
fn test_unsupported_arity_aborts() {
    let scheme = Scheme::parse(GENERATOR_SCHEME).unwrap();
    let crn = parse_crn("A + B -> C").unwrap();

    assert_eq!(
        translate(&scheme, &crn),
        Err(SchemeError::Abort {
            message: "unsupported reaction arity".to_owned()
        })
    );
}
