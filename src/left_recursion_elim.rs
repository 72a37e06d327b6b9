//! Removal of left recursion via Paull's algorithm.

use log::debug;

use crate::error::{GrammarError, Result};
use crate::grammar::Grammar;
use crate::production::SymbolString;
use crate::symbol::{SymbolId, SymbolUsage};

/// Generates a candidate name for the fresh non-terminal Paull's algorithm
/// introduces when splitting direct left recursion off `base`, given how
/// many candidates have already been rejected as taken.
pub type NameGenerator<'a> = dyn Fn(&str, u32) -> String + 'a;

fn default_namegen(base: &str, attempt: u32) -> String {
    format!("{base}{attempt}")
}

fn unique_name(grammar: &Grammar, base: &str, namegen: &NameGenerator<'_>) -> String {
    let mut attempt = 1u32;
    loop {
        let candidate = namegen(base, attempt);
        if grammar.symbol_by_name(&candidate).is_err() {
            return candidate;
        }
        attempt += 1;
    }
}

fn precondition_check(grammar: &Grammar) -> Result<()> {
    if grammar.all_productions().any(|(_, p)| p.is_empty()) {
        return Err(GrammarError::PreconditionViolation(
            "remove_left_recursion requires null productions to be removed first".to_string(),
        ));
    }
    if !crate::cycles::detect_cycles(grammar).is_empty() {
        return Err(GrammarError::PreconditionViolation(
            "remove_left_recursion requires cycles to be removed first".to_string(),
        ));
    }
    Ok(())
}

/// Eliminates both indirect and direct left recursion, processing
/// non-terminals in `order` (defaults to registration order).
///
/// For `i` in `1..=m`: substitutes away any production of `order[i]`
/// starting with an earlier `order[j]` (replacing it with that production
/// appended to every one of `order[j]`'s alternatives), then splits off
/// direct left recursion on `order[i]` into a fresh non-terminal.
pub fn remove_left_recursion(grammar: &mut Grammar, order: Option<&[SymbolId]>) -> Result<()> {
    precondition_check(grammar)?;
    let order: Vec<SymbolId> = order
        .map(|o| o.to_vec())
        .unwrap_or_else(|| grammar.non_terminals().to_vec());

    for i in 0..order.len() {
        let ai = order[i];
        for &aj in &order[..i] {
            substitute_indirect(grammar, ai, aj);
        }
        split_direct_recursion(grammar, ai, &default_namegen)?;
    }
    Ok(())
}

/// Eliminates direct left recursion on a single non-terminal, without the
/// indirect-substitution pass `remove_left_recursion` performs across an
/// ordering. Useful when a caller has already cleared indirect recursion
/// (or knows there is none) and wants control over the name generator.
pub fn remove_left_recursion_for(
    grammar: &mut Grammar,
    nonterm: SymbolId,
    namegen: Option<&NameGenerator<'_>>,
) -> Result<()> {
    precondition_check(grammar)?;
    let default: &NameGenerator<'_> = &default_namegen;
    split_direct_recursion(grammar, nonterm, namegen.unwrap_or(default))
}

fn substitute_indirect(grammar: &mut Grammar, ai: SymbolId, aj: SymbolId) {
    let ai_prods: Vec<_> = grammar.productions_of(ai).iter().cloned().collect();
    let aj_prods: Vec<_> = grammar.productions_of(aj).iter().cloned().collect();

    for prod in &ai_prods {
        let starts_with_aj = prod.rhs().get(0).map(|u| u.symbol()) == Some(aj);
        if !starts_with_aj {
            continue;
        }
        let gamma: Vec<SymbolUsage> = prod.rhs().usages()[1..].to_vec();
        grammar
            .productions_of_mut(ai)
            .remove_matching(|p| p.is_duplicate_of(prod));
        for beta_prod in &aj_prods {
            let mut usages = beta_prod.rhs().usages().to_vec();
            usages.extend(gamma.clone());
            grammar
                .add_production(ai, SymbolString::new(usages), prod.handler().map(|s| s.to_string()))
                .ok();
        }
    }
}

fn split_direct_recursion(
    grammar: &mut Grammar,
    ai: SymbolId,
    namegen: &NameGenerator<'_>,
) -> Result<()> {
    let prods: Vec<_> = grammar.productions_of(ai).iter().cloned().collect();
    let (recursive, non_recursive): (Vec<_>, Vec<_>) = prods
        .into_iter()
        .partition(|p| p.rhs().get(0).map(|u| u.symbol()) == Some(ai));

    if recursive.is_empty() {
        return Ok(());
    }

    let base_name = grammar.symbol(ai).name().to_string();
    let fresh_name = unique_name(grammar, &base_name, namegen);
    let ai_prime = grammar.add_non_terminal(&fresh_name, None)?;

    grammar.productions_of_mut(ai).clear();
    for beta in &non_recursive {
        let mut usages = beta.rhs().usages().to_vec();
        usages.push(SymbolUsage::new(ai_prime));
        grammar
            .add_production(ai, SymbolString::new(usages), beta.handler().map(|s| s.to_string()))
            .ok();
    }
    for alpha in &recursive {
        let mut usages = alpha.rhs().usages()[1..].to_vec();
        usages.push(SymbolUsage::new(ai_prime));
        grammar
            .add_production(
                ai_prime,
                SymbolString::new(usages),
                alpha.handler().map(|s| s.to_string()),
            )
            .ok();
    }
    grammar.add_production(ai_prime, SymbolString::empty(), None).ok();

    debug!(
        "split direct left recursion on `{}` into fresh non-terminal `{}`",
        base_name, fresh_name
    );
    Ok(())
}
