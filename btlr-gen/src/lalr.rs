//! LALR(1) lookaheads over the LR(0) automaton.
//!
//! Lookaheads are computed by discovering which lookaheads each kernel item
//! generates spontaneously and which it merely propagates. Every kernel item
//! `K` of state `s` is closed with the placeholder lookahead `#` (symbol
//! index `n_sym`, outside the grammar). For each closure item `A -> α . X β`
//! with lookahead `l`, the item `A -> α X . β` in `goto(s, X)` receives `l`
//! spontaneously if `l` is a real terminal, and receives everything `K` has
//! when `l` is `#`. The start item is seeded with `end` and propagation runs
//! to a fixpoint.
//!
//! Reduce lookaheads are read off the LR(1) closure of each state's kernel,
//! which also covers completed ε-items that never appear in a kernel.

use crate::lr0::{Item, Lr0, prods_by_lhs};
use std::collections::{BTreeMap, BTreeSet};

/// Lookahead sets keyed by item. Lookaheads are encoded symbol indices.
pub type Lookaheads = BTreeMap<Item, BTreeSet<usize>>;

/// FIRST sets and nullability for every encoded symbol.
#[derive(Debug, Clone)]
pub struct FirstSets {
    pub first: Vec<BTreeSet<usize>>,
    pub nullable: Vec<bool>,
}

impl FirstSets {
    pub fn compute(prods: &[Vec<usize>], n_nonterm: usize, n_term: usize) -> Self {
        let n_sym = n_nonterm + n_term;
        let mut first: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); n_sym];
        let mut nullable = vec![false; n_sym];
        for (t, set) in first.iter_mut().enumerate().skip(n_nonterm) {
            set.insert(t);
        }
        let mut changed = true;
        while changed {
            changed = false;
            for prod in prods {
                let lhs = prod[0];
                let mut all_nullable = true;
                for &sym in &prod[1..] {
                    let add: Vec<usize> = first[sym].difference(&first[lhs]).copied().collect();
                    if !add.is_empty() {
                        first[lhs].extend(add);
                        changed = true;
                    }
                    if !nullable[sym] {
                        all_nullable = false;
                        break;
                    }
                }
                if all_nullable && !nullable[lhs] {
                    nullable[lhs] = true;
                    changed = true;
                }
            }
        }
        FirstSets { first, nullable }
    }

    /// FIRST(seq · la).
    pub fn of_seq(&self, seq: &[usize], la: &BTreeSet<usize>) -> BTreeSet<usize> {
        let mut out = BTreeSet::new();
        for &sym in seq {
            out.extend(self.first[sym].iter().copied());
            if !self.nullable[sym] {
                return out;
            }
        }
        out.extend(la.iter().copied());
        out
    }
}

/// LR(1) closure of `kernel`.
pub fn closure1(
    kernel: &Lookaheads,
    prods: &[Vec<usize>],
    by_lhs: &[Vec<usize>],
    fs: &FirstSets,
) -> Lookaheads {
    let mut set = kernel.clone();
    let mut work: Vec<Item> = kernel.keys().copied().collect();
    while let Some(item) = work.pop() {
        let Some(b) = item.next(prods) else {
            continue;
        };
        if b >= by_lhs.len() {
            continue;
        }
        let la = fs.of_seq(&prods[item.prod][item.dot + 1..], &set[&item]);
        for &p in &by_lhs[b] {
            let new = Item::new(p, 1);
            let is_new = !set.contains_key(&new);
            let entry = set.entry(new).or_default();
            let before = entry.len();
            entry.extend(la.iter().copied());
            if is_new || entry.len() > before {
                work.push(new);
            }
        }
    }
    set
}

/// LALR(1) annotation of an LR(0) automaton.
#[derive(Debug, Clone)]
pub struct Lalr {
    /// Kernel lookaheads per state.
    pub kernels: Vec<Lookaheads>,
    pub first: FirstSets,
    by_lhs: Vec<Vec<usize>>,
}

impl Lalr {
    pub fn build(lr0: &Lr0, prods: &[Vec<usize>], n_nonterm: usize, n_term: usize) -> Self {
        let first = FirstSets::compute(prods, n_nonterm, n_term);
        let by_lhs = prods_by_lhs(prods, n_nonterm);
        let hash = n_nonterm + n_term;
        let end = hash - 1;

        let mut kernels: Vec<Lookaheads> = lr0
            .kernels
            .iter()
            .map(|k| k.iter().map(|i| (*i, BTreeSet::new())).collect())
            .collect();
        let mut propagate: BTreeMap<(usize, Item), Vec<(usize, Item)>> = BTreeMap::new();

        for (s, kernel) in lr0.kernels.iter().enumerate() {
            for k in kernel {
                let seed = Lookaheads::from([(*k, BTreeSet::from([hash]))]);
                for (item, las) in closure1(&seed, prods, &by_lhs, &first) {
                    let Some(x) = item.next(prods) else {
                        continue;
                    };
                    let Some(t) = lr0.goto(s, x) else {
                        continue;
                    };
                    let target = item.advance();
                    for l in las {
                        if l == hash {
                            propagate.entry((s, *k)).or_default().push((t, target));
                        } else if let Some(set) = kernels[t].get_mut(&target) {
                            set.insert(l);
                        }
                    }
                }
            }
        }

        if let Some(set) = kernels[0].get_mut(&Item::new(0, 1)) {
            set.insert(end);
        }

        let mut rounds = 0;
        let mut changed = true;
        while changed {
            changed = false;
            rounds += 1;
            for ((s, k), targets) in &propagate {
                let src = kernels[*s][k].clone();
                for (t, ti) in targets {
                    if let Some(dst) = kernels[*t].get_mut(ti) {
                        let before = dst.len();
                        dst.extend(src.iter().copied());
                        changed |= dst.len() > before;
                    }
                }
            }
        }
        log::debug!(
            "LALR(1): {} propagation links, fixpoint after {} rounds",
            propagate.values().map(Vec::len).sum::<usize>(),
            rounds
        );

        Lalr {
            kernels,
            first,
            by_lhs,
        }
    }

    /// Completed items of `state` with their lookaheads.
    pub fn reductions(&self, state: usize, prods: &[Vec<usize>]) -> Vec<(usize, BTreeSet<usize>)> {
        closure1(&self.kernels[state], prods, &self.by_lhs, &self.first)
            .into_iter()
            .filter(|(item, _)| item.is_complete(prods))
            .map(|(item, la)| (item.prod, la))
            .collect()
    }
}
