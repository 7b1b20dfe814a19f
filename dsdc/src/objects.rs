use crate::{
    error::{Result, SchemeError},
    interpreter::Value,
    parser::naming::DomainAllocator,
};
use std::{collections::BTreeMap, fmt};

#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum DomainKind {
    Short,
    Long,
}

impl fmt::Display for DomainKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Short => write!(f, "short"),
            Self::Long => write!(f, "long"),
        }
    }
}

/// A named stretch of nucleotides. Two domains with the same name and
/// opposite `starred` flags are complementary.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Domain {
    pub name: String,
    pub kind: DomainKind,
    pub length: usize,
    pub starred: bool,
}

impl Domain {
    pub fn complement(&self) -> Self {
        Self {
            starred: !self.starred,
            ..self.clone()
        }
    }

    pub fn is_complement_of(&self, other: &Self) -> bool {
        self.name == other.name && self.starred != other.starred
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, if self.starred { "*" } else { "" })
    }
}

/// One slot in a fragment's domain row. `Sub` holds a composite value
/// spliced in under a `~` annotation during flattening.
#[derive(Clone, Debug, PartialEq)]
pub enum SeqItem {
    Domain(Domain),
    Break,
    Unspec,
    Sub(Value),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StructItem {
    Dot,
    Open,
    Close,
    Wildcard,
    Break,
}

impl fmt::Display for StructItem {
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

/// A fully resolved slot: wildcards spliced, `?` replaced by fresh
/// history domains.
#[derive(Clone, Debug, PartialEq)]
pub enum FlatItem {
    Domain(Domain),
    Break,
}

impl fmt::Display for FlatItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain(d) => write!(f, "{}", d),
            Self::Break => write!(f, "+"),
        }
    }
}

/// A (sequence, structure) pair as written in a scheme, before
/// flattening. `attributes` maps the identifiers appearing in the
/// literal to the values they were bound to, for later `.x` access.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ComplexFragment {
    pub name: Option<String>,
    pub sequence: Vec<SeqItem>,
    pub structure: Vec<StructItem>,
    pub attributes: BTreeMap<String, Value>,
}

impl ComplexFragment {
    pub fn new(
        sequence: Vec<SeqItem>,
        structure: Vec<StructItem>,
        attributes: BTreeMap<String, Value>,
    ) -> Result<Self> {
        if sequence.len() != structure.len() {
            return Err(SchemeError::RowLengthMismatch {
                domains: sequence.len(),
                annotations: structure.len(),
            });
        }

        Ok(Self {
            name: None,
            sequence,
            structure,
            attributes,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Rebuilds a fragment from flattened rows, keeping the attribute
    /// map of the fragment it came from.
    pub fn from_flat(
        name: Option<String>,
        sequence: Vec<FlatItem>,
        structure: Vec<StructItem>,
        attributes: BTreeMap<String, Value>,
    ) -> Self {
        Self {
            name,
            sequence: sequence
                .into_iter()
                .map(|item| match item {
                    FlatItem::Domain(d) => SeqItem::Domain(d),
                    FlatItem::Break => SeqItem::Break,
                })
                .collect(),
            structure,
            attributes,
        }
    }

    /// Resolves nested fragments and lists under `~` wildcards, mints a
    /// history domain per `?`, and strips redundant strand breaks.
    pub fn flatten(
        &self,
        alloc: &mut DomainAllocator,
    ) -> Result<(Vec<FlatItem>, Vec<StructItem>)> {
        let mut sequence = Vec::new();
        let mut structure = Vec::new();

        for (item, ann) in self.sequence.iter().zip(self.structure.iter()) {
            resolve(item, ann, &mut sequence, &mut structure, alloc)?;
        }

        // Walking back to front removes trailing breaks first, then any
        // break directly preceding one already removed, then a break
        // left at the very front.
        let mut start = true;

        for i in (0..sequence.len()).rev() {
            if sequence[i] == FlatItem::Break {
                if start || i == 0 {
                    sequence.remove(i);
                    structure.remove(i);
                }

                start = true;
            } else {
                start = false;
            }
        }

        Ok((sequence, structure))
    }
}

impl fmt::Display for ComplexFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\"{}\" | \"{}\"",
            self.sequence
                .iter()
                .map(|item| match item {
                    SeqItem::Domain(d) => d.to_string(),
                    SeqItem::Break => "+".to_owned(),
                    SeqItem::Unspec => "?".to_owned(),
                    SeqItem::Sub(_) => "~".to_owned(),
                })
                .collect::<Vec<_>>()
                .join(" "),
            self.structure
                .iter()
                .map(|item| item.to_string())
                .collect::<Vec<_>>()
                .join(" ")
        )
    }
}

fn resolve(
    item: &SeqItem,
    ann: &StructItem,
    sequence: &mut Vec<FlatItem>,
    structure: &mut Vec<StructItem>,
    alloc: &mut DomainAllocator,
) -> Result<()> {
    match (item, ann) {
        (SeqItem::Domain(d), StructItem::Dot | StructItem::Open | StructItem::Close) => {
            sequence.push(FlatItem::Domain(d.clone()));
            structure.push(*ann);

            Ok(())
        }
        (SeqItem::Unspec, StructItem::Dot | StructItem::Open | StructItem::Close) => {
            sequence.push(FlatItem::Domain(alloc.history()));
            structure.push(*ann);

            Ok(())
        }
        (SeqItem::Break, StructItem::Break) => {
            sequence.push(FlatItem::Break);
            structure.push(StructItem::Break);

            Ok(())
        }
        (SeqItem::Break, _) | (_, StructItem::Break) => Err(SchemeError::MisalignedBreak),
        (SeqItem::Sub(v), StructItem::Wildcard) => {
            resolve_value(v, sequence, structure, alloc)
        }
        (SeqItem::Sub(_), _) => Err(SchemeError::Type {
            message: "a composite value in a domain row must be annotated with `~'".to_owned(),
        }),
        (_, StructItem::Wildcard) => Err(SchemeError::Type {
            message: "a `~' annotation requires a composite value in the domain row".to_owned(),
        }),
    }
}

fn resolve_value(
    v: &Value,
    sequence: &mut Vec<FlatItem>,
    structure: &mut Vec<StructItem>,
    alloc: &mut DomainAllocator,
) -> Result<()> {
    match v {
        Value::Fragment(frag) => {
            for (item, ann) in frag.sequence.iter().zip(frag.structure.iter()) {
                resolve(item, ann, sequence, structure, alloc)?;
            }

            Ok(())
        }
        Value::List(vs) => {
            for v in vs {
                resolve_value(v, sequence, structure, alloc)?;
            }

            Ok(())
        }
        other => Err(SchemeError::Type {
            message: format!(
                "a value of type {} cannot be spliced into a structure",
                other.type_name()
            ),
        }),
    }
}

/// A validated, named complex in fully flattened form.
#[derive(Clone, Debug, PartialEq)]
pub struct Complex {
    pub name: String,
    pub sequence: Vec<FlatItem>,
    pub structure: Vec<StructItem>,
}

impl Complex {
    /// Checks that every `(` is closed by the complement of the domain
    /// that opened it.
    pub fn assemble(
        name: String,
        sequence: Vec<FlatItem>,
        structure: Vec<StructItem>,
    ) -> Result<Self> {
        if sequence.len() != structure.len() {
            return Err(SchemeError::RowLengthMismatch {
                domains: sequence.len(),
                annotations: structure.len(),
            });
        }

        let mut stack: Vec<&Domain> = Vec::new();

        for (item, ann) in sequence.iter().zip(structure.iter()) {
            match ann {
                StructItem::Open => {
                    let FlatItem::Domain(d) = item else {
                        return Err(SchemeError::Pairing {
                            message: "a strand break cannot open a pairing".to_owned(),
                        });
                    };

                    stack.push(d);
                }
                StructItem::Close => {
                    let FlatItem::Domain(d) = item else {
                        return Err(SchemeError::Pairing {
                            message: "a strand break cannot close a pairing".to_owned(),
                        });
                    };
                    let top = stack.pop().ok_or_else(|| SchemeError::Pairing {
                        message: format!("`{}' closes a pairing that was never opened", d),
                    })?;

                    if !d.is_complement_of(top) {
                        return Err(SchemeError::Pairing {
                            message: format!("`{}' cannot pair with `{}'", d, top),
                        });
                    }
                }
                StructItem::Wildcard => {
                    return Err(SchemeError::Pairing {
                        message: "an unresolved `~' annotation remains".to_owned(),
                    });
                }
                StructItem::Dot | StructItem::Break => {}
            }
        }

        if let Some(d) = stack.last() {
            return Err(SchemeError::Pairing {
                message: format!("`{}' is left without a closing pair", d),
            });
        }

        Ok(Self {
            name,
            sequence,
            structure,
        })
    }

    /// Structural equality, ignoring the assigned name.
    pub fn same_structure(&self, other: &Self) -> bool {
        self.sequence == other.sequence && self.structure == other.structure
    }
}

impl fmt::Display for Complex {
    /// Kernel notation, e.g. `d1 t0( d2( + ) )`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts = self
            .sequence
            .iter()
            .zip(self.structure.iter())
            .map(|(item, ann)| match (item, ann) {
                (FlatItem::Domain(d), StructItem::Open) => format!("{}(", d),
                (FlatItem::Domain(_), StructItem::Close) => ")".to_owned(),
                (item, _) => item.to_string(),
            })
            .collect::<Vec<_>>();

        write!(f, "{}", parts.join(" "))
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Multiplicity {
    SingleCopy,
    Catalytic,
}

impl fmt::Display for Multiplicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SingleCopy => write!(f, "single"),
            Self::Catalytic => write!(f, "catalytic"),
        }
    }
}

/// A fuel complex emitted by the translation, tagged with how many
/// copies the scheme assumes are present.
#[derive(Clone, Debug, PartialEq)]
pub struct Gate {
    pub complex: Complex,
    pub multiplicity: Multiplicity,
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.complex, self.multiplicity)
    }
}

/// The output of translating a CRN: one signal complex per formal
/// species plus the deduplicated fuel gates.
#[derive(Clone, Debug, PartialEq)]
pub struct DsdSystem {
    pub signals: Vec<Complex>,
    pub gates: Vec<Gate>,
}

impl fmt::Display for DsdSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for signal in &self.signals {
            writeln!(f, "signal {} = {}", signal.name, signal)?;
        }

        for gate in &self.gates {
            writeln!(
                f,
                "fuel {} = {} ({})",
                gate.complex.name, gate.complex, gate.multiplicity
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::rc::Rc;

    fn dom(name: &str, starred: bool) -> Domain {
        Domain {
            name: name.to_owned(),
            kind: DomainKind::Long,
            length: 15,
            starred,
        }
    }

    #[test]
    fn test_rows_must_have_equal_lengths() {
        assert_eq!(
            ComplexFragment::new(
                vec![SeqItem::Domain(dom("a", false))],
                vec![StructItem::Dot, StructItem::Dot],
                BTreeMap::new(),
            ),
            Err(SchemeError::RowLengthMismatch {
                domains: 1,
                annotations: 2
            })
        );
    }

    #[test]
    fn test_flatten_splices_wildcards() {
        let inner = ComplexFragment::new(
            vec![
                SeqItem::Domain(dom("a", false)),
                SeqItem::Break,
                SeqItem::Domain(dom("b", false)),
            ],
            vec![StructItem::Dot, StructItem::Break, StructItem::Dot],
            BTreeMap::new(),
        )
        .unwrap();
        let outer = ComplexFragment::new(
            vec![
                SeqItem::Domain(dom("x", false)),
                SeqItem::Sub(Value::Fragment(Rc::new(inner))),
            ],
            vec![StructItem::Dot, StructItem::Wildcard],
            BTreeMap::new(),
        )
        .unwrap();

        let (seq, stru) = outer.flatten(&mut DomainAllocator::default()).unwrap();

        assert_eq!(seq.len(), 4);
        assert_eq!(
            stru,
            vec![
                StructItem::Dot,
                StructItem::Dot,
                StructItem::Break,
                StructItem::Dot
            ]
        );
    }

    #[test]
    fn test_flatten_strips_redundant_breaks() {
        let frag = ComplexFragment::new(
            vec![
                SeqItem::Break,
                SeqItem::Domain(dom("a", false)),
                SeqItem::Break,
                SeqItem::Break,
                SeqItem::Domain(dom("b", false)),
                SeqItem::Break,
            ],
            vec![
                StructItem::Break,
                StructItem::Dot,
                StructItem::Break,
                StructItem::Break,
                StructItem::Dot,
                StructItem::Break,
            ],
            BTreeMap::new(),
        )
        .unwrap();

        let (seq, _) = frag.flatten(&mut DomainAllocator::default()).unwrap();

        assert_eq!(
            seq,
            vec![
                FlatItem::Domain(dom("a", false)),
                FlatItem::Break,
                FlatItem::Domain(dom("b", false)),
            ]
        );
    }

    #[test]
    fn test_flatten_mints_history_domains() {
        let frag = ComplexFragment::new(
            vec![SeqItem::Unspec, SeqItem::Domain(dom("a", false))],
            vec![StructItem::Dot, StructItem::Dot],
            BTreeMap::new(),
        )
        .unwrap();

        let (seq, _) = frag.flatten(&mut DomainAllocator::default()).unwrap();
        let FlatItem::Domain(h) = &seq[0] else {
            panic!("expected a domain");
        };

        assert_eq!(h.name, "h0");
        assert_eq!(h.kind, DomainKind::Long);
    }

    #[test]
    fn test_flatten_rejects_misaligned_breaks() {
        let frag = ComplexFragment::new(
            vec![SeqItem::Break, SeqItem::Domain(dom("a", false))],
            vec![StructItem::Dot, StructItem::Break],
            BTreeMap::new(),
        )
        .unwrap();

        assert_eq!(
            frag.flatten(&mut DomainAllocator::default()),
            Err(SchemeError::MisalignedBreak)
        );
    }

    #[test]
    fn test_assemble_checks_pairing() {
        let ok = Complex::assemble(
            "g".to_owned(),
            vec![
                FlatItem::Domain(dom("a", false)),
                FlatItem::Break,
                FlatItem::Domain(dom("a", true)),
            ],
            vec![StructItem::Open, StructItem::Break, StructItem::Close],
        );

        assert!(ok.is_ok());

        let mismatched = Complex::assemble(
            "g".to_owned(),
            vec![
                FlatItem::Domain(dom("a", false)),
                FlatItem::Domain(dom("b", true)),
            ],
            vec![StructItem::Open, StructItem::Close],
        );

        assert!(matches!(mismatched, Err(SchemeError::Pairing { .. })));

        let dangling = Complex::assemble(
            "g".to_owned(),
            vec![FlatItem::Domain(dom("a", false))],
            vec![StructItem::Open],
        );

        assert!(matches!(dangling, Err(SchemeError::Pairing { .. })));
    }

    #[test]
    fn test_kernel_notation() {
        let c = Complex::assemble(
            "g".to_owned(),
            vec![
                FlatItem::Domain(dom("d1", false)),
                FlatItem::Domain(dom("t0", false)),
                FlatItem::Domain(dom("d2", false)),
                FlatItem::Break,
                FlatItem::Domain(dom("d2", true)),
                FlatItem::Domain(dom("t0", true)),
            ],
            vec![
                StructItem::Dot,
                StructItem::Open,
                StructItem::Open,
                StructItem::Break,
                StructItem::Close,
                StructItem::Close,
            ],
        )
        .unwrap();

        assert_eq!(c.to_string(), "d1 t0( d2( + ) )");
    }
}
