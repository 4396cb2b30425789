//! LR(0) items and the canonical collection.
//!
//! Productions use the integer encoding of
//! [`Grammar::encoded`](crate::grammar::Grammar::encoded): element 0 is the
//! left-hand side, so a dot position of `1` is the start of the right-hand
//! side and `prod.len()` marks a completed item.
//!
//! States are identified by their kernel. The collection is built with a
//! worklist: the start state is the kernel `{Start -> . S}`, and every state
//! contributes one successor kernel per symbol that appears after a dot in
//! its closure.

use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Item {
    pub prod: usize,
    pub dot: usize,
}

impl Item {
    pub const fn new(prod: usize, dot: usize) -> Self {
        Self { prod, dot }
    }

    /// Symbol after the dot, if any.
    #[inline]
    pub fn next(&self, prods: &[Vec<usize>]) -> Option<usize> {
        prods[self.prod].get(self.dot).copied()
    }

    #[inline]
    pub fn advance(&self) -> Item {
        Item::new(self.prod, self.dot + 1)
    }

    #[inline]
    pub fn is_complete(&self, prods: &[Vec<usize>]) -> bool {
        self.dot >= prods[self.prod].len()
    }
}

pub type ItemSet = BTreeSet<Item>;

/// Production indices grouped by left-hand side.
pub fn prods_by_lhs(prods: &[Vec<usize>], n_nonterm: usize) -> Vec<Vec<usize>> {
    let mut by_lhs = vec![Vec::new(); n_nonterm];
    for (i, p) in prods.iter().enumerate() {
        by_lhs[p[0]].push(i);
    }
    by_lhs
}

/// Kernel plus every `B -> . γ` reachable through a non-terminal after a dot.
pub fn closure(kernel: &ItemSet, prods: &[Vec<usize>], by_lhs: &[Vec<usize>]) -> ItemSet {
    let mut set = kernel.clone();
    let mut work: Vec<Item> = kernel.iter().copied().collect();
    while let Some(item) = work.pop() {
        let Some(sym) = item.next(prods) else {
            continue;
        };
        if sym >= by_lhs.len() {
            continue;
        }
        for &p in &by_lhs[sym] {
            let new = Item::new(p, 1);
            if set.insert(new) {
                work.push(new);
            }
        }
    }
    set
}

/// Successor kernels of a closed item set, keyed by symbol.
pub fn successors(closed: &ItemSet, prods: &[Vec<usize>]) -> BTreeMap<usize, ItemSet> {
    let mut out: BTreeMap<usize, ItemSet> = BTreeMap::new();
    for item in closed {
        if let Some(sym) = item.next(prods) {
            out.entry(sym).or_default().insert(item.advance());
        }
    }
    out
}

/// The LR(0) automaton.
#[derive(Debug, Clone)]
pub struct Lr0 {
    pub kernels: Vec<ItemSet>,
    /// Per state, symbol to successor state.
    pub transitions: Vec<BTreeMap<usize, usize>>,
}

impl Lr0 {
    pub fn build(prods: &[Vec<usize>], n_nonterm: usize) -> Self {
        let by_lhs = prods_by_lhs(prods, n_nonterm);
        let start = ItemSet::from([Item::new(0, 1)]);
        let mut index: HashMap<ItemSet, usize> = HashMap::new();
        let mut kernels = vec![start.clone()];
        let mut transitions = vec![BTreeMap::new()];
        index.insert(start, 0);

        let mut work = VecDeque::from([0usize]);
        while let Some(state) = work.pop_front() {
            let closed = closure(&kernels[state], prods, &by_lhs);
            for (sym, kernel) in successors(&closed, prods) {
                let target = match index.get(&kernel) {
                    Some(&t) => t,
                    None => {
                        let t = kernels.len();
                        index.insert(kernel.clone(), t);
                        kernels.push(kernel);
                        transitions.push(BTreeMap::new());
                        work.push_back(t);
                        t
                    }
                };
                transitions[state].insert(sym, target);
            }
        }
        log::info!("LR(0): {} states", kernels.len());
        Lr0 {
            kernels,
            transitions,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.kernels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.kernels.is_empty()
    }

    pub fn goto(&self, state: usize, sym: usize) -> Option<usize> {
        self.transitions[state].get(&sym).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 0 Start, 1 E, 2 T | 3 plus, 4 n, 5 end
    fn prods() -> Vec<Vec<usize>> {
        vec![vec![0, 1], vec![1, 1, 3, 2], vec![1, 2], vec![2, 4]]
    }

    #[test]
    fn closure_adds_nonkernel_items() {
        let p = prods();
        let by_lhs = prods_by_lhs(&p, 3);
        let c = closure(&ItemSet::from([Item::new(0, 1)]), &p, &by_lhs);
        let expected = ItemSet::from([
            Item::new(0, 1),
            Item::new(1, 1),
            Item::new(2, 1),
            Item::new(3, 1),
        ]);
        assert_eq!(c, expected);
    }

    #[test]
    fn canonical_collection() {
        let p = prods();
        let lr0 = Lr0::build(&p, 3);
        // {S'->.E}, {S'->E., E->E.+T}, {E->T.}, {T->n.}, {E->E+.T}, {E->E+T.}
        assert_eq!(lr0.len(), 6);
        let s1 = lr0.goto(0, 1).unwrap();
        assert_eq!(
            lr0.kernels[s1],
            ItemSet::from([Item::new(0, 2), Item::new(1, 2)])
        );
        let s4 = lr0.goto(s1, 3).unwrap();
        // T -> n reached from two states lands in one.
        assert_eq!(lr0.goto(0, 4), lr0.goto(s4, 4));
        assert!(lr0.goto(0, 3).is_none());
    }
}
