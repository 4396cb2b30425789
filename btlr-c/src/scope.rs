//! Lexical scopes of ordinary identifiers.
//!
//! C puts typedef names and ordinary identifiers (objects, functions,
//! enumeration constants) in one name space, so one binding per name and
//! frame is enough; the [`NameKind`] says which of the two it is. Struct
//! tags, members and labels live elsewhere and are not tracked.
//!
//! [`Scopes`] is a persistent stack of frames: cloning is O(1), and a frame is
//! copied only when a clone that shares it declares a name. This is what
//! lets the parser driver carry its scopes inside the per-path context.

use btlr::{Span, Stack};
use indexmap::IndexMap;
use smartstring::alias::String;
use std::rc::Rc;

/// Which of the two kinds of name an identifier is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameKind {
    Typedef,
    Ordinary,
}

/// A name in a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub kind: NameKind,
    /// Where the name was declared.
    pub span: Span,
}

type Frame = IndexMap<String, Binding>;

/// A name already bound in the same frame with the other kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Redefinition {
    pub previous: Binding,
}

/// Stack of frames, innermost on top.
#[derive(Debug, Clone)]
pub struct Scopes {
    frames: Stack<Rc<Frame>>,
}

impl Default for Scopes {
    fn default() -> Self {
        Self::new()
    }
}

impl Scopes {
    /// Scopes holding just the (empty) file scope.
    pub fn new() -> Self {
        Self {
            frames: Stack::new().push(Rc::new(Frame::new())),
        }
    }

    /// Number of open frames, the file scope included.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Open a frame.
    pub fn push(&mut self) {
        self.frames = self.frames.push(Rc::new(Frame::new()));
    }

    /// Close the innermost frame. The file scope is never closed; returns
    /// `false` if asked to.
    pub fn pop(&mut self) -> bool {
        if self.frames.len() <= 1 {
            return false;
        }
        if let Some(rest) = self.frames.pop() {
            self.frames = rest;
        }
        true
    }

    /// Innermost binding of `name`.
    pub fn lookup(&self, name: &str) -> Option<Binding> {
        self.frames.iter().find_map(|f| f.get(name).copied())
    }

    /// Binding of `name` in the innermost frame only.
    pub fn lookup_local(&self, name: &str) -> Option<Binding> {
        self.frames.peek().and_then(|f| f.get(name).copied())
    }

    /// Declare `name` in the innermost frame. Declaring it again with the
    /// same kind is allowed; with the other kind it is a [`Redefinition`]
    /// and the frame is left unchanged.
    pub fn declare(&mut self, name: &str, kind: NameKind, span: Span) -> Result<(), Redefinition> {
        if let Some(previous) = self.lookup_local(name) {
            if previous.kind != kind {
                return Err(Redefinition { previous });
            }
            return Ok(());
        }
        self.bind(name, kind, span);
        Ok(())
    }

    /// Bind `name` in the innermost frame, replacing any binding there.
    pub fn bind(&mut self, name: &str, kind: NameKind, span: Span) {
        let Some(top) = self.frames.peek() else {
            return;
        };
        let mut top = Rc::clone(top);
        Rc::make_mut(&mut top).insert(name.into(), Binding { kind, span });
        let rest = self.frames.pop().unwrap_or_default();
        self.frames = rest.push(top);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sp() -> Span {
        Span::default()
    }

    #[test]
    fn inner_frames_shadow_outer() {
        let mut s = Scopes::new();
        s.declare("a", NameKind::Typedef, sp()).unwrap();
        s.push();
        assert_eq!(s.lookup("a").map(|b| b.kind), Some(NameKind::Typedef));
        s.declare("a", NameKind::Ordinary, sp()).unwrap();
        assert_eq!(s.lookup("a").map(|b| b.kind), Some(NameKind::Ordinary));
        assert!(s.pop());
        assert_eq!(s.lookup("a").map(|b| b.kind), Some(NameKind::Typedef));
        assert!(!s.pop());
        assert_eq!(s.depth(), 1);
    }

    #[test]
    fn same_frame_kind_change_is_a_redefinition() {
        let mut s = Scopes::new();
        s.declare("a", NameKind::Ordinary, sp()).unwrap();
        s.declare("a", NameKind::Ordinary, sp()).unwrap();
        let e = s.declare("a", NameKind::Typedef, sp()).unwrap_err();
        assert_eq!(e.previous.kind, NameKind::Ordinary);
        assert_eq!(s.lookup("a").map(|b| b.kind), Some(NameKind::Ordinary));
    }

    #[test]
    fn clones_are_independent() {
        let mut a = Scopes::new();
        a.declare("x", NameKind::Ordinary, sp()).unwrap();
        let mut b = a.clone();
        b.bind("x", NameKind::Typedef, sp());
        b.declare("y", NameKind::Ordinary, sp()).unwrap();
        assert_eq!(a.lookup("x").map(|b| b.kind), Some(NameKind::Ordinary));
        assert_eq!(a.lookup("y"), None);
        assert_eq!(b.lookup("x").map(|b| b.kind), Some(NameKind::Typedef));
    }

    #[test]
    fn undeclared() {
        let mut s = Scopes::new();
        s.push();
        assert_eq!(s.lookup("nope"), None);
        assert_eq!(s.lookup_local("nope"), None);
    }
}
