//! Parser driver for C.
//!
//! [`CParserDriver`] builds parse-tree nodes into a [`NodePool`] and prunes
//! paths on which an identifier is used against its declared kind. For that
//! every path carries a [`ParseContext`] with provisional scopes:
//!
//! * `{` opening a block (the `BlockOpen` reduction) pushes a frame and the
//!   end of the compound statement pops it; `for` pushes a frame that the end
//!   of the loop pops;
//! * a declarator followed by `=` binds its name as ordinary at once, and a
//!   complete declaration binds all its names, as typedef names if the
//!   specifiers contain `typedef`;
//! * enumeration constants are bound as ordinary when reduced;
//! * the parameters of a function declarator directly followed by `{` are
//!   bound in the frame that `{` opens.
//!
//! A reduction to `TypedefName` is rejected unless the innermost binding of
//! the name is a typedef. A reduction to a primary expression is rejected
//! when the innermost binding is a typedef, unless value gating is off.
//! Specifier lists that combine a typedef name with another type specifier
//! are rejected as well.
//!
//! These scopes are only good enough to prune; the authoritative check is
//! done on complete trees by [`chop`](crate::chop).

use crate::error::{ErrorKind, FrontError, Stage};
use crate::grammar::{CGrammar, Category, Rule};
use crate::scope::{NameKind, Scopes};
use crate::token::{Token, TokenKind};
use crate::tree::{Annotations, Declared, NodeId, NodeKind, NodePool, PoolNode, SpecSummary};
use btlr::{ParserDriver, Production};
use std::rc::Rc;

/// Per-path state of the C parser.
#[derive(Debug, Clone, Default)]
pub struct ParseContext {
    /// Provisional scopes of the path.
    pub scopes: Scopes,
    /// Parameters waiting for the function body's `{`.
    pending_params: Option<Rc<Vec<Declared>>>,
}

/// [`ParserDriver`] for C: builds nodes into a [`NodePool`] and gates
/// identifiers by the provisional scopes in [`ParseContext`].
pub struct CParserDriver<'a> {
    grammar: &'a CGrammar,
    tokens: &'a [Token],
    pool: NodePool,
    gate_values: bool,
}

impl<'a> CParserDriver<'a> {
    /// Driver over `tokens`, which must be the slice handed to the parser.
    pub fn new(grammar: &'a CGrammar, tokens: &'a [Token], gate_values: bool) -> Self {
        Self {
            grammar,
            tokens,
            pool: NodePool::new(),
            gate_values,
        }
    }

    /// Nodes built so far, by every path.
    pub fn pool(&self) -> &NodePool {
        &self.pool
    }

    /// Take the node pool, to materialize accepted roots from it.
    pub fn into_pool(self) -> NodePool {
        self.pool
    }

    fn category_of(&self, id: NodeId) -> Option<Category> {
        match self.pool.get(id).kind {
            NodeKind::NonTerminal { production } => Some(self.grammar.category(production)),
            NodeKind::Terminal { .. } => None,
        }
    }

    /// The identifier token under leaf `id`.
    fn identifier(&self, id: NodeId) -> Declared {
        let node = self.pool.get(id);
        let token = match node.kind {
            NodeKind::Terminal { token } => token,
            NodeKind::NonTerminal { .. } => usize::MAX,
        };
        Declared {
            name: self
                .tokens
                .get(token)
                .map(|t| t.text.clone())
                .unwrap_or_default(),
            token,
            span: node.span,
        }
    }

    fn reject(&self, kind: ErrorKind, at: &Declared) -> FrontError {
        FrontError::new(Stage::Parser, kind, at.span).with_detail(&at.name)
    }

    /// Declared names and parameters of a declarator-like node.
    fn propagate(&self, category: Category, rule: Rule, children: &[NodeId], ann: &mut Annotations) {
        for &c in children {
            if self.category_of(c) == Some(Category::ParameterTypeList) {
                continue;
            }
            ann.declares
                .extend(self.pool.get(c).annotations.declares.iter().cloned());
        }
        if !matches!(category, Category::Declarator | Category::DirectDeclarator) {
            return;
        }
        ann.params = children.iter().find_map(|&c| {
            match self.category_of(c) {
                Some(Category::Declarator | Category::DirectDeclarator) => {
                    self.pool.get(c).annotations.params.clone()
                }
                _ => None,
            }
        });
        if ann.params.is_none() {
            ann.params = match rule {
                Rule::FunctionDeclarator => children
                    .iter()
                    .find(|&&c| self.category_of(c) == Some(Category::ParameterTypeList))
                    .map(|&c| self.pool.get(c).annotations.declares.clone()),
                Rule::FunctionDeclaratorEmpty => Some(Vec::new()),
                _ => None,
            };
        }
    }
}

impl ParserDriver for CParserDriver<'_> {
    type Token = Token;
    type Value = NodeId;
    type Context = ParseContext;
    type Error = FrontError;

    fn terminal(&self, token: &Token) -> usize {
        self.grammar.terminal(token.kind)
    }

    fn shift(&mut self, ctx: &mut ParseContext, token: &Token, index: usize) -> Result<NodeId, FrontError> {
        if token.kind != TokenKind::LeftBrace {
            ctx.pending_params = None;
        }
        if token.kind == TokenKind::For {
            ctx.scopes.push();
        }
        Ok(self.pool.push(PoolNode {
            kind: NodeKind::Terminal { token: index },
            children: Vec::new(),
            span: token.span,
            annotations: Annotations::default(),
        }))
    }

    fn reduce(
        &mut self,
        ctx: &mut ParseContext,
        production: &Production,
        children: Vec<NodeId>,
    ) -> Result<NodeId, FrontError> {
        let rule = self.grammar.rule(production.index);
        let category = self.grammar.category(production.index);
        let span = children
            .iter()
            .map(|&c| self.pool.get(c).span)
            .reduce(|a, b| a.merge(&b))
            .unwrap_or_default();
        let mut ann = Annotations::default();

        match rule {
            Rule::TypedefName => {
                let name = self.identifier(children[0]);
                match ctx.scopes.lookup(&name.name) {
                    Some(b) if b.kind == NameKind::Typedef => {}
                    Some(_) => return Err(self.reject(ErrorKind::InvalidSymbolKind, &name)),
                    None => return Err(self.reject(ErrorKind::UndeclaredIdentifier, &name)),
                }
            }
            Rule::PrimaryIdentifier if self.gate_values => {
                let name = self.identifier(children[0]);
                if ctx.scopes.lookup(&name.name).is_some_and(|b| b.kind == NameKind::Typedef) {
                    return Err(self.reject(ErrorKind::InvalidSymbolKind, &name));
                }
            }
            Rule::DeclaratorName => ann.declares = vec![self.identifier(children[0])],
            Rule::TypedefStorage => ann.typedef = true,
            Rule::NamedType => ann.spec = SpecSummary { types: 1, named: true },
            _ => {}
        }

        match category {
            Category::TypeSpecifier if rule != Rule::NamedType => {
                ann.spec = SpecSummary { types: 1, named: false };
            }
            Category::DeclarationSpecifiers | Category::SpecifierQualifierList => {
                for &c in &children {
                    let child = &self.pool.get(c).annotations;
                    ann.spec = ann.spec.add(child.spec);
                    ann.typedef |= child.typedef;
                }
                if !ann.spec.is_consistent() {
                    return Err(FrontError::new(Stage::Parser, ErrorKind::InconsistentSpecifiers, span));
                }
            }
            Category::Declarator
            | Category::DirectDeclarator
            | Category::InitDeclarator
            | Category::InitDeclaratorList
            | Category::DeclaratorInit
            | Category::ParameterDeclaration
            | Category::ParameterList
            | Category::ParameterTypeList => {
                self.propagate(category, rule, &children, &mut ann);
                match category {
                    Category::Declarator => {
                        if let Some(params) = &ann.params {
                            ctx.pending_params = Some(Rc::new(params.clone()));
                        }
                    }
                    Category::DeclaratorInit => {
                        for d in &ann.declares {
                            ctx.scopes.bind(&d.name, NameKind::Ordinary, d.span);
                        }
                    }
                    _ => {}
                }
            }
            Category::Declaration => {
                let specifiers = &self.pool.get(children[0]).annotations;
                ann.typedef = specifiers.typedef;
                let kind = if ann.typedef {
                    NameKind::Typedef
                } else {
                    NameKind::Ordinary
                };
                if children.len() == 3 {
                    ann.declares = self.pool.get(children[1]).annotations.declares.clone();
                }
                for d in &ann.declares {
                    ctx.scopes.bind(&d.name, kind, d.span);
                }
            }
            Category::Enumerator => {
                let name = self.identifier(children[0]);
                ctx.scopes.bind(&name.name, NameKind::Ordinary, name.span);
                ann.declares = vec![name];
            }
            Category::BlockOpen => {
                ctx.scopes.push();
                if let Some(params) = ctx.pending_params.take() {
                    for p in params.iter() {
                        ctx.scopes.bind(&p.name, NameKind::Ordinary, p.span);
                    }
                }
            }
            Category::CompoundStatement => {
                ctx.scopes.pop();
            }
            Category::IterationStatement if rule == Rule::For => {
                ctx.scopes.pop();
            }
            _ => {}
        }

        Ok(self.pool.push(PoolNode {
            kind: NodeKind::NonTerminal {
                production: production.index,
            },
            children,
            span,
            annotations: ann,
        }))
    }

    fn syntax_error(&self, token: &Token, _index: usize) -> FrontError {
        FrontError::new(Stage::Parser, ErrorKind::UnexpectedToken, token.span)
            .with_detail(format!("unexpected {token}"))
    }
}
