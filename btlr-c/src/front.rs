//! The front end: source text in, disambiguated parse trees out.

use crate::chop::chop;
use crate::config::FrontConfig;
use crate::driver::CParserDriver;
use crate::error::{ErrorKind, FrontError, ScopeError, Stage};
use crate::grammar::{CGrammar, GrammarError, c_grammar};
use crate::lexer;
use crate::token::Token;
use crate::tree::Tree;
use btlr::{ParseError, Parser, ParserStats, Span};

/// Every tree the parser accepted, before scope analysis.
#[derive(Debug, Clone)]
pub struct Forest {
    /// Every token, ending with [`TokenKind::End`](crate::TokenKind::End).
    pub tokens: Vec<Token>,
    /// Accepted trees in the order the parser found them.
    pub trees: Vec<Tree>,
    /// Counters of the parse.
    pub stats: ParserStats,
}

/// Outcome of scope analysis over a [`Forest`].
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Every token of the input.
    pub tokens: Vec<Token>,
    /// Trees that passed scope analysis.
    pub survivors: Vec<Tree>,
    /// Rejected candidates by their index in the forest.
    pub rejected: Vec<(usize, ScopeError)>,
}

/// The one valid parse of a translation unit.
#[derive(Debug, Clone)]
pub struct TranslationUnit {
    /// Every token of the input.
    pub tokens: Vec<Token>,
    /// The parse tree; leaves index into `tokens`.
    pub tree: Tree,
}

/// Lexer, parser and scope analysis over the embedded C grammar.
///
/// A `FrontEnd` is cheap to clone; the grammar is loaded once per process
/// and shared.
#[derive(Debug, Clone)]
pub struct FrontEnd {
    grammar: &'static CGrammar,
    config: FrontConfig,
}

impl FrontEnd {
    /// Front end with `config`. Fails only if the embedded table is unusable.
    pub fn new(config: FrontConfig) -> Result<Self, GrammarError> {
        Ok(Self {
            grammar: c_grammar()?,
            config,
        })
    }

    /// The grammar the trees are built from, for label lookups.
    pub fn grammar(&self) -> &'static CGrammar {
        self.grammar
    }

    pub fn config(&self) -> &FrontConfig {
        &self.config
    }

    /// Tokenize `src`. The last token is always
    /// [`TokenKind::End`](crate::TokenKind::End).
    ///
    /// ```
    /// use btlr_c::{FrontConfig, FrontEnd, TokenKind};
    ///
    /// let front = FrontEnd::new(FrontConfig::default()).unwrap();
    /// let kinds: Vec<_> = front.tokenize("x += 1;").unwrap().iter().map(|t| t.kind).collect();
    /// assert_eq!(
    ///     kinds,
    ///     [TokenKind::Identifier, TokenKind::PlusEqual, TokenKind::IntegerConstant, TokenKind::Semicolon, TokenKind::End]
    /// );
    /// ```
    pub fn tokenize(&self, src: &str) -> Result<Vec<Token>, FrontError> {
        Ok(lexer::tokenize(src.as_bytes())?)
    }

    /// Tokenize and parse `src`, keeping every accepted tree.
    pub fn parse_forest(&self, src: &str) -> Result<Forest, FrontError> {
        let tokens = self.tokenize(src)?;
        let (trees, stats) = self.parse_tokens(&tokens)?;
        Ok(Forest { tokens, trees, stats })
    }

    /// Parse an already tokenized input.
    pub fn parse_tokens(&self, tokens: &[Token]) -> Result<(Vec<Tree>, ParserStats), FrontError> {
        let driver = CParserDriver::new(self.grammar, tokens, self.config.gate_values);
        let mut parser = Parser::new(&self.grammar.table, driver, self.config.parser.clone());
        let roots = parser.parse(tokens).map_err(|e| self.parse_error(e, tokens))?;
        let stats = parser.stats().clone();
        let pool = parser.into_driver().into_pool();
        log::debug!(
            "{} candidate(s) from {} tokens using {} nodes",
            roots.len(),
            tokens.len(),
            pool.len()
        );
        let trees = roots.into_iter().map(|root| pool.materialize(root)).collect();
        Ok((trees, stats))
    }

    fn parse_error(&self, e: ParseError<FrontError>, tokens: &[Token]) -> FrontError {
        let span = tokens.last().map(|t| t.span).unwrap_or_default();
        match e {
            ParseError::NoParse(e) => e,
            ParseError::SearchLimit { steps } => {
                FrontError::new(Stage::Parser, ErrorKind::SearchLimitExceeded, span)
                    .with_detail(format!("more than {steps} steps"))
            }
            ParseError::CandidateLimit { limit } => {
                FrontError::new(Stage::Parser, ErrorKind::SearchLimitExceeded, span)
                    .with_detail(format!("more than {limit} candidates"))
            }
            ParseError::MissingGoto { state, nonterminal } => {
                FrontError::new(Stage::Parser, ErrorKind::MalformedTable, span)
                    .with_detail(format!("no goto from state {state} on {nonterminal}"))
            }
            ParseError::EmptyInput => FrontError::new(Stage::Parser, ErrorKind::UnexpectedToken, span)
                .with_detail("empty token sequence"),
        }
    }

    /// Parse `src` and scope-check every candidate.
    pub fn analyze(&self, src: &str) -> Result<Analysis, FrontError> {
        let forest = self.parse_forest(src)?;
        let chopped = chop(self.grammar, &forest.tokens, forest.trees);
        Ok(Analysis {
            tokens: forest.tokens,
            survivors: chopped.survivors,
            rejected: chopped.rejected,
        })
    }

    /// Parse `src` to its single valid tree.
    ///
    /// With no survivor, the scope error found furthest into the input is
    /// returned. With more than one, the input is reported as
    /// [`ErrorKind::Ambiguous`].
    pub fn parse(&self, src: &str) -> Result<TranslationUnit, FrontError> {
        let Analysis {
            tokens,
            mut survivors,
            rejected,
        } = self.analyze(src)?;
        match survivors.len() {
            1 => {
                let tree = survivors.remove(0);
                Ok(TranslationUnit { tokens, tree })
            }
            0 => {
                let furthest = rejected
                    .into_iter()
                    .map(|(_, e)| e)
                    .reduce(|best, e| if e.span >= best.span { e } else { best });
                Err(match furthest {
                    Some(e) => e.into(),
                    None => FrontError::new(Stage::Parser, ErrorKind::UnexpectedToken, Span::default()),
                })
            }
            n => {
                let span = survivors[0].node(survivors[0].root()).span;
                Err(FrontError::new(Stage::Parser, ErrorKind::Ambiguous, span)
                    .with_detail(format!("{n} valid parses")))
            }
        }
    }
}
