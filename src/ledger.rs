//! Allocation ledger: the runtime guard that no two committed subnet CIDRs
//! overlap.
//!
//! Cardinality is bounded by accounts × providers × regions × AZs × roles,
//! typically in the low thousands, so a linear scan on insert is simpler
//! than an interval tree and does not show up in profiles at this scale.

use crate::cidr::Cidr;
use crate::error::{PlannerError, Result};

/// Append-only set of committed CIDRs with overlap rejection on insert.
#[derive(Debug, Default)]
pub struct Ledger {
    committed: Vec<Cidr>,
}

impl Ledger {
    pub fn new() -> Ledger {
        Ledger {
            committed: Vec::new(),
        }
    }

    /// Commit `cidr` if it overlaps nothing already committed.
    pub fn try_insert(&mut self, cidr: Cidr) -> Result<()> {
        if let Some(existing) = self.committed.iter().find(|e| e.overlap(&cidr)) {
            return Err(PlannerError::cidr_already_allocated(cidr)
                .with_context("conflictsWith", existing));
        }
        self.committed.push(cidr);
        Ok(())
    }

    pub fn is_allocated(&self, cidr: &Cidr) -> bool {
        self.committed.iter().any(|e| e == cidr)
    }

    pub fn count(&self) -> usize {
        self.committed.len()
    }

    pub fn enumerate(&self) -> &[Cidr] {
        &self.committed
    }
}
