//! Persistent stack with structural sharing.
//!
//! `push` and `pop` return new stacks and leave the original untouched, so a
//! saved copy (a checkpoint) stays valid no matter what happens to the stack
//! it was taken from. Cloning is O(1).

use std::fmt;
use std::rc::Rc;

struct Node<T> {
    item: T,
    next: Option<Rc<Node<T>>>,
    len: usize,
}

/// Immutable stack; `push` and `pop` return new stacks sharing the rest.
///
/// ```
/// use btlr::Stack;
///
/// let base = Stack::new().push(1).push(2);
/// let top = base.push(3);
/// assert_eq!(top.iter().copied().collect::<Vec<_>>(), [3, 2, 1]);
/// assert_eq!(base.peek(), Some(&2));
/// assert!(top.pop().unwrap().ptr_eq(&base));
/// ```
pub struct Stack<T> {
    head: Option<Rc<Node<T>>>,
}

impl<T> Stack<T> {
    /// Empty stack.
    pub const fn new() -> Self {
        Self { head: None }
    }

    /// This stack with `item` on top. `self` is unchanged.
    pub fn push(&self, item: T) -> Self {
        let len = self.len() + 1;
        Self {
            head: Some(Rc::new(Node {
                item,
                next: self.head.clone(),
                len,
            })),
        }
    }

    /// Stack without its top element, `None` when empty.
    pub fn pop(&self) -> Option<Self> {
        self.head.as_ref().map(|node| Self {
            head: node.next.clone(),
        })
    }

    /// Drop the top `n` elements. `None` if fewer than `n` are present.
    pub fn pop_n(&self, n: usize) -> Option<Self> {
        if n > self.len() {
            return None;
        }
        let mut head = self.head.as_ref();
        for _ in 0..n {
            head = head.and_then(|node| node.next.as_ref());
        }
        Some(Self { head: head.cloned() })
    }

    /// Top item.
    pub fn peek(&self) -> Option<&T> {
        self.head.as_ref().map(|node| &node.item)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.head.as_ref().map_or(0, |node| node.len)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Iterate from the top down.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            next: self.head.as_deref(),
        }
    }

    /// Do both stacks share the same top node?
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.head, &other.head) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<T: Clone> Stack<T> {
    /// Top `n` elements in bottom-to-top order.
    pub fn top_n(&self, n: usize) -> Vec<T> {
        let mut items: Vec<T> = self.iter().take(n).cloned().collect();
        items.reverse();
        items
    }
}

impl<T> Clone for Stack<T> {
    fn clone(&self) -> Self {
        Self {
            head: self.head.clone(),
        }
    }
}

impl<T> Default for Stack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Stack<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut items: Vec<&T> = self.iter().collect();
        items.reverse();
        f.debug_list().entries(items).finish()
    }
}

// Unlink uniquely owned nodes one at a time; the default recursive drop can
// overflow on long stacks.
impl<T> Drop for Stack<T> {
    fn drop(&mut self) {
        let mut head = self.head.take();
        while let Some(node) = head {
            match Rc::try_unwrap(node) {
                Ok(mut node) => head = node.next.take(),
                Err(_) => break,
            }
        }
    }
}

/// Iterator from the top of a [`Stack`] down.
pub struct Iter<'a, T> {
    next: Option<&'a Node<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.next.map(|node| {
            self.next = node.next.as_deref();
            &node.item
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshots_survive_later_pushes() {
        let s0: Stack<i32> = Stack::new();
        let s1 = s0.push(1).push(2);
        let snap = s1.clone();
        let s2 = s1.pop().unwrap().push(7).push(8);
        assert_eq!(snap.iter().copied().collect::<Vec<_>>(), vec![2, 1]);
        assert_eq!(s2.iter().copied().collect::<Vec<_>>(), vec![8, 7, 1]);
        assert_eq!(s2.len(), 3);
        assert!(s0.is_empty());
    }

    #[test]
    fn pop_n_and_top_n() {
        let s = (1..=5).fold(Stack::new(), |s, i| s.push(i));
        assert_eq!(s.top_n(3), vec![3, 4, 5]);
        let rest = s.pop_n(3).unwrap();
        assert_eq!(rest.peek(), Some(&2));
        assert_eq!(rest.len(), 2);
        assert!(s.pop_n(6).is_none());
        assert!(s.pop_n(5).unwrap().is_empty());
    }

    #[test]
    fn shared_tail() {
        let base = Stack::new().push("a");
        let left = base.push("b");
        let right = base.push("c");
        assert!(left.pop().unwrap().ptr_eq(&right.pop().unwrap()));
        assert!(!left.ptr_eq(&right));
    }

    #[test]
    fn long_stack_drops_without_overflow() {
        let mut s = Stack::new();
        for i in 0..200_000 {
            s = s.push(i);
        }
        assert_eq!(s.len(), 200_000);
        drop(s);
    }

    #[test]
    fn debug_lists_bottom_to_top() {
        let s = Stack::new().push(1).push(2);
        assert_eq!(format!("{s:?}"), "[1, 2]");
    }
}
