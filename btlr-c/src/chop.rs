//! Scope-aware disambiguation of candidate parse trees.
//!
//! Each candidate tree is walked in source order with exact C scoping:
//!
//! * a compound statement opens a scope; a function body shares its scope
//!   with the parameters;
//! * a `for` statement opens a scope around the whole loop;
//! * a parameter list opens a prototype scope of its own;
//! * a declarator's names are in scope right after the declarator, before
//!   its initializer; an enumeration constant right after its enumerator.
//!
//! Every `PrimaryExpression -> identifier` must name an ordinary identifier
//! and every `TypedefName -> identifier` a typedef, and no scope may declare
//! a name as both. A tree passes if nothing is violated; the first violation
//! in source order rejects it. [`chop`] keeps the passing trees.

use crate::error::{ErrorKind, ScopeError};
use crate::grammar::{CGrammar, Category, Rule};
use crate::scope::{NameKind, Scopes};
use crate::token::Token;
use crate::tree::{Declared, NodeId, Tree};

/// Result of [`chop`].
#[derive(Debug, Clone, Default)]
pub struct Chopped {
    /// Trees that passed, in forest order.
    pub survivors: Vec<Tree>,
    /// Index of each rejected candidate in the input, and why.
    pub rejected: Vec<(usize, ScopeError)>,
}

/// Check every tree of `forest`; survivors keep their relative order.
pub fn chop(grammar: &CGrammar, tokens: &[Token], forest: Vec<Tree>) -> Chopped {
    let mut out = Chopped::default();
    for (i, tree) in forest.into_iter().enumerate() {
        match check(grammar, tokens, &tree) {
            Ok(()) => out.survivors.push(tree),
            Err(e) => {
                log::debug!("candidate {i} rejected: {e}");
                out.rejected.push((i, e));
            }
        }
    }
    log::debug!(
        "{} candidate(s) survive, {} rejected",
        out.survivors.len(),
        out.rejected.len()
    );
    out
}

/// Scope-check one tree.
pub fn check(grammar: &CGrammar, tokens: &[Token], tree: &Tree) -> Result<(), ScopeError> {
    Walker {
        grammar,
        tokens,
        tree,
        scopes: Scopes::new(),
        declaration: None,
        work: vec![Work::Visit(tree.root())],
    }
    .run()
}

enum Work {
    Visit(NodeId),
    Push,
    Pop,
    /// Declare the names in the annotations of a node; `None` means "with the
    /// kind of the enclosing declaration".
    DeclareNames(NodeId, Option<NameKind>),
    /// Declare the parameters of a function declarator.
    DeclareParams(NodeId),
    /// Declare the identifier leaf as an ordinary name.
    DeclareToken(NodeId),
    SetDeclaration(Option<NameKind>),
}

struct Walker<'a> {
    grammar: &'a CGrammar,
    tokens: &'a [Token],
    tree: &'a Tree,
    scopes: Scopes,
    /// Kind of the names declared by the declaration being walked.
    declaration: Option<NameKind>,
    work: Vec<Work>,
}

impl Walker<'_> {
    fn run(mut self) -> Result<(), ScopeError> {
        let tree = self.tree;
        while let Some(item) = self.work.pop() {
            match item {
                Work::Visit(id) => self.visit(id)?,
                Work::Push => self.scopes.push(),
                Work::Pop => {
                    self.scopes.pop();
                }
                Work::DeclareNames(id, kind) => {
                    let kind = kind.or(self.declaration).unwrap_or(NameKind::Ordinary);
                    for d in &tree.node(id).annotations.declares {
                        self.declare(d, kind)?;
                    }
                }
                Work::DeclareParams(id) => {
                    if let Some(params) = &tree.node(id).annotations.params {
                        for d in params {
                            self.declare(d, NameKind::Ordinary)?;
                        }
                    }
                }
                Work::DeclareToken(id) => {
                    let d = self.leaf(id);
                    self.declare(&d, NameKind::Ordinary)?;
                }
                Work::SetDeclaration(kind) => self.declaration = kind,
            }
        }
        Ok(())
    }

    fn leaf(&self, id: NodeId) -> Declared {
        let node = self.tree.node(id);
        let token = node.token().unwrap_or(usize::MAX);
        Declared {
            name: self.tokens.get(token).map(|t| t.text.clone()).unwrap_or_default(),
            token,
            span: node.span,
        }
    }

    fn declare(&mut self, d: &Declared, kind: NameKind) -> Result<(), ScopeError> {
        self.scopes
            .declare(&d.name, kind, d.span)
            .map_err(|_| ScopeError {
                kind: ErrorKind::RedefinitionSymbol,
                name: d.name.clone(),
                span: d.span,
            })
    }

    fn expect(&self, leaf: NodeId, kind: NameKind) -> Result<(), ScopeError> {
        let d = self.leaf(leaf);
        let error = |kind| ScopeError {
            kind,
            name: d.name.clone(),
            span: d.span,
        };
        match self.scopes.lookup(&d.name) {
            None => Err(error(ErrorKind::UndeclaredIdentifier)),
            Some(b) if b.kind != kind => Err(error(ErrorKind::InvalidSymbolKind)),
            Some(_) => Ok(()),
        }
    }

    fn is_parameter_list(&self, id: NodeId) -> bool {
        self.tree
            .node(id)
            .production()
            .is_some_and(|p| self.grammar.category(p) == Category::ParameterTypeList)
    }

    /// Expand `id` into work items, scheduled in source order.
    fn visit(&mut self, id: NodeId) -> Result<(), ScopeError> {
        let tree = self.tree;
        let node = tree.node(id);
        let Some(production) = node.production() else {
            return Ok(());
        };
        let children = node.children.as_slice();
        let rule = self.grammar.rule(production);
        match rule {
            Rule::PrimaryIdentifier => return self.expect(children[0], NameKind::Ordinary),
            Rule::TypedefName => return self.expect(children[0], NameKind::Typedef),
            Rule::DeclaratorName => return Ok(()),
            _ => {}
        }

        let visit_all = |ids: &[NodeId]| ids.iter().map(|&c| Work::Visit(c)).collect::<Vec<_>>();
        let mut plan = Vec::new();
        match self.grammar.category(production) {
            Category::FunctionDefinition => {
                let (specifiers, declarator, body) = (children[0], children[1], children[2]);
                plan.push(Work::Visit(specifiers));
                plan.push(Work::Visit(declarator));
                plan.push(Work::DeclareNames(declarator, Some(NameKind::Ordinary)));
                plan.push(Work::Push);
                plan.push(Work::DeclareParams(declarator));
                // the body's own children, so the parameters share its scope
                plan.extend(visit_all(tree.children(body)));
                plan.push(Work::Pop);
            }
            Category::CompoundStatement => {
                plan.push(Work::Push);
                plan.extend(visit_all(children));
                plan.push(Work::Pop);
            }
            Category::IterationStatement if rule == Rule::For => {
                plan.push(Work::Push);
                plan.extend(visit_all(children));
                plan.push(Work::Pop);
            }
            Category::Declaration => {
                let kind = if node.annotations.typedef {
                    NameKind::Typedef
                } else {
                    NameKind::Ordinary
                };
                plan.push(Work::SetDeclaration(Some(kind)));
                plan.extend(visit_all(children));
                plan.push(Work::SetDeclaration(self.declaration));
            }
            Category::InitDeclarator => {
                plan.push(Work::Visit(children[0]));
                plan.push(Work::DeclareNames(id, None));
                plan.extend(visit_all(&children[1..]));
            }
            Category::ParameterDeclaration => {
                plan.extend(visit_all(children));
                plan.push(Work::DeclareNames(id, Some(NameKind::Ordinary)));
            }
            Category::DirectDeclarator | Category::DirectAbstractDeclarator => {
                for &c in children {
                    if self.is_parameter_list(c) {
                        plan.push(Work::Push);
                        plan.push(Work::Visit(c));
                        plan.push(Work::Pop);
                    } else {
                        plan.push(Work::Visit(c));
                    }
                }
            }
            Category::Enumerator => {
                plan.extend(visit_all(&children[1..]));
                plan.push(Work::DeclareToken(children[0]));
            }
            _ => plan.extend(visit_all(children)),
        }
        self.work.extend(plan.into_iter().rev());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FrontConfig, FrontEnd};

    fn forest(src: &str) -> (FrontEnd, Vec<Token>, Vec<Tree>) {
        let front = FrontEnd::new(FrontConfig::default().with_gate_values(false)).unwrap();
        let forest = front.parse_forest(src).unwrap();
        (front, forest.tokens, forest.trees)
    }

    #[test]
    fn first_violation_in_source_order() {
        let (front, tokens, trees) = forest("int main() { return u + v; }");
        assert_eq!(trees.len(), 1);
        let e = check(front.grammar(), &tokens, &trees[0]).unwrap_err();
        assert_eq!(e.kind, ErrorKind::UndeclaredIdentifier);
        assert_eq!(e.name, "u");
    }

    #[test]
    fn rejected_candidates_keep_their_index() {
        let (front, tokens, trees) = forest("typedef int T; void f(void) { T * x; }");
        assert_eq!(trees.len(), 2);
        let chopped = chop(front.grammar(), &tokens, trees.clone());
        assert_eq!(chopped.survivors.len(), 1);
        let (index, error) = &chopped.rejected[0];
        assert_ne!(trees[*index], chopped.survivors[0]);
        assert_eq!(error.kind, ErrorKind::InvalidSymbolKind);
        assert_eq!(error.name, "T");
    }

    #[test]
    fn parameters_share_the_body_scope() {
        let (front, tokens, trees) = forest("int f(int a) { typedef int a; }");
        let chopped = chop(front.grammar(), &tokens, trees);
        assert!(chopped.survivors.is_empty());
        let (_, e) = &chopped.rejected[0];
        assert_eq!(e.kind, ErrorKind::RedefinitionSymbol);
        assert_eq!(e.name, "a");

        let (front, tokens, trees) = forest("int f(int a) { { typedef int a; } return 0; }");
        assert_eq!(chop(front.grammar(), &tokens, trees).survivors.len(), 1);
    }
}
