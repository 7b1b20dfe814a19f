use crate::{
    objects::{Domain, DomainKind},
    DTYPE_CUTOFF, LONG_DOM_LEN, PREFIX_HISTORY, PREFIX_LONG, PREFIX_SHORT, PREFIX_UNIQUE,
    SHORT_DOM_LEN,
};

/// Issues fresh domain identifiers within one translation run.
///
/// A single monotonically incrementing counter is shared by all length
/// classes, so two calls never return the same name even with identical
/// parameters.
#[derive(Debug, Default)]
pub struct DomainAllocator {
    curr_id: usize,
}

impl DomainAllocator {
    fn next_name(&mut self, prefix: &str) -> String {
        let ident = self.curr_id.to_string();

        self.curr_id += 1;

        format!("{}{}", prefix, ident)
    }

    pub fn short(&mut self) -> Domain {
        Domain {
            name: self.next_name(PREFIX_SHORT),
            kind: DomainKind::Short,
            length: SHORT_DOM_LEN,
            starred: false,
        }
    }

    pub fn long(&mut self) -> Domain {
        Domain {
            name: self.next_name(PREFIX_LONG),
            kind: DomainKind::Long,
            length: LONG_DOM_LEN,
            starred: false,
        }
    }

    /// A long domain minted for a `?` wildcard during flattening.
    pub fn history(&mut self) -> Domain {
        Domain {
            name: self.next_name(PREFIX_HISTORY),
            kind: DomainKind::Long,
            length: LONG_DOM_LEN,
            starred: false,
        }
    }

    /// A domain with an explicit length override.
    pub fn unique(&mut self, length: usize) -> Domain {
        let kind = if length <= DTYPE_CUTOFF {
            DomainKind::Short
        } else {
            DomainKind::Long
        };

        Domain {
            name: self.next_name(PREFIX_UNIQUE),
            kind,
            length,
            starred: false,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_names_never_collide() {
        let mut alloc = DomainAllocator::default();

        let a = alloc.short();
        let b = alloc.short();
        let c = alloc.long();

        assert_ne!(a.name, b.name);
        assert_ne!(b.name, c.name);
        assert_eq!(a.name, "t0");
        assert_eq!(b.name, "t1");
        assert_eq!(c.name, "d2");
    }

    #[test]
    fn test_unique_guesses_kind_from_length() {
        let mut alloc = DomainAllocator::default();

        assert_eq!(alloc.unique(5).kind, DomainKind::Short);
        assert_eq!(alloc.unique(15).kind, DomainKind::Long);
    }

    #[test]
    fn test_fresh_runs_restart_numbering() {
        let mut a = DomainAllocator::default();
        let mut b = DomainAllocator::default();

        assert_eq!(a.long().name, b.long().name);
    }
}
