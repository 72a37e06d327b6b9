//! Nullable-set computation: the non-terminals that can derive the empty
//! string.

use std::collections::HashSet;

use log::trace;

use crate::grammar::Grammar;
use crate::symbol::SymbolId;

/// Fixpoint over the predicate "some production's RHS is empty, or consists
/// entirely of usages that are either marked optional or whose symbol is
/// already known nullable". A single sweep over this unified predicate
/// subsumes the three staged passes from the design (empty RHS; single
/// nullable-or-optional usage; all usages nullable-or-optional) because
/// each later pass's condition is implied by the general one given the same
/// iteration to convergence.
pub fn compute_nullables(grammar: &Grammar) -> HashSet<SymbolId> {
    let mut out: HashSet<SymbolId> = HashSet::new();
    let mut sweep = 0u32;
    loop {
        let mut changed = false;
        for &nt in grammar.non_terminals() {
            if out.contains(&nt) {
                continue;
            }
            let is_nullable = grammar.productions_of(nt).iter().any(|prod| {
                prod.rhs().usages().iter().all(|usage| {
                    usage.is_optional()
                        || (grammar.symbol(usage.symbol()).is_non_terminal()
                            && out.contains(&usage.symbol()))
                })
            });
            if is_nullable {
                out.insert(nt);
                changed = true;
            }
        }
        sweep += 1;
        trace!("nullable sweep {sweep}: changed={changed}, |nullable|={}", out.len());
        if !changed {
            break;
        }
    }
    out
}
