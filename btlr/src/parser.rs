//! Non-deterministic table-driven parser.
//!
//! The engine runs an LR automaton over a [`ParseTable`] whose cells may hold
//! several actions. The current path is an explicit state record: input
//! position, a state stack, a value stack and a driver context. When a cell
//! offers more than one action the record is saved as a checkpoint before the
//! first untried alternative is taken. When a path dies (an empty cell, a
//! driver rejection) or after an accept, the most recent checkpoint is
//! restored and its next alternative tried. Exploration is therefore
//! depth-first, most recent ambiguity first, and ends when the checkpoint
//! stack is empty. Every accepted value is returned, in discovery order.
//!
//! Stacks are persistent ([`Stack`]) and the driver context is expected to be
//! cheap to clone, so a checkpoint costs O(1) regardless of stack depth.
//!
//! Semantic work is delegated to a [`ParserDriver`]: it builds values on
//! shift and reduce and may reject a step, which kills the current path only.
//! When no path accepts, the failure observed at the deepest input position
//! is reported.

use crate::stack::Stack;
use crate::table::{Action, ParseTable, Production};
use crate::trace::{LogSink, NullSink, TraceEvent, TraceSink};
use std::fmt::Debug;
use thiserror::Error;

/// Semantic hooks of the parser.
pub trait ParserDriver {
    type Token;
    /// Value kept on the value stack for every grammar symbol.
    type Value: Clone;
    /// Per-path state carried along and restored on backtrack.
    type Context: Clone + Default;
    type Error: Clone + Debug;

    /// Terminal index of `token` in the table.
    fn terminal(&self, token: &Self::Token) -> usize;

    /// Value for a shifted token at input position `index`.
    fn shift(
        &mut self,
        ctx: &mut Self::Context,
        token: &Self::Token,
        index: usize,
    ) -> Result<Self::Value, Self::Error>;

    /// Value for a reduction; `children` are in left-to-right order.
    fn reduce(
        &mut self,
        ctx: &mut Self::Context,
        production: &Production,
        children: Vec<Self::Value>,
    ) -> Result<Self::Value, Self::Error>;

    /// Error for a token that has no action in the current state.
    fn syntax_error(&self, token: &Self::Token, index: usize) -> Self::Error;
}

/// Why a parse produced no value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError<E: Debug> {
    /// Every path failed; this is the failure at the deepest position.
    #[error("no parse: {0:?}")]
    NoParse(E),

    #[error("search exceeded {steps} steps")]
    SearchLimit { steps: usize },

    #[error("search found more than {limit} candidates")]
    CandidateLimit { limit: usize },

    #[error("no goto from state {state} on non-terminal {nonterminal}")]
    MissingGoto { state: usize, nonterminal: usize },

    #[error("empty token stream")]
    EmptyInput,
}

/// Search bounds and tracing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    /// Upper bound on engine steps (shifts, reductions, backtracks) per parse.
    pub max_steps: usize,
    /// Upper bound on accepted candidates per parse.
    pub max_candidates: usize,
    /// Report steps to [`LogSink`].
    pub trace: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_steps: 2_000_000,
            max_candidates: 256,
            trace: false,
        }
    }
}

/// Counters of the last [`Parser::parse`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParserStats {
    /// Loop iterations, over all paths.
    pub steps: usize,
    /// Tokens shifted, over all paths.
    pub shifts: usize,
    /// Productions reduced, over all paths.
    pub reductions: usize,
    /// Checkpoints taken at conflicting cells.
    pub checkpoints: usize,
    /// Checkpoints resumed.
    pub backtracks: usize,
    /// Paths abandoned on a syntax error or a driver rejection.
    pub rejections: usize,
    /// Candidates accepted.
    pub accepts: usize,
    /// Deepest checkpoint stack.
    pub max_depth: usize,
}

/// The current path.
struct Path<D: ParserDriver> {
    pos: usize,
    states: Stack<usize>,
    values: Stack<D::Value>,
    ctx: D::Context,
}

impl<D: ParserDriver> Clone for Path<D> {
    fn clone(&self) -> Self {
        Self {
            pos: self.pos,
            states: self.states.clone(),
            values: self.values.clone(),
            ctx: self.ctx.clone(),
        }
    }
}

struct Checkpoint<D: ParserDriver> {
    path: Path<D>,
    alternative: usize,
}

enum Step<E> {
    Continue,
    /// Path is finished, successfully or not.
    Backtrack(Option<E>),
}

/// Backtracking LR parser over a [`ParseTable`], calling `D` to build values.
pub struct Parser<'t, D: ParserDriver> {
    table: &'t ParseTable,
    driver: D,
    config: ParserConfig,
    sink: Box<dyn TraceSink>,
    stats: ParserStats,
}

impl<'t, D: ParserDriver> Parser<'t, D> {
    /// Parser over `table`. The trace sink is [`LogSink`] if `config.trace` is
    /// set and [`NullSink`] otherwise.
    pub fn new(table: &'t ParseTable, driver: D, config: ParserConfig) -> Self {
        let sink: Box<dyn TraceSink> = if config.trace {
            Box::new(LogSink)
        } else {
            Box::new(NullSink)
        };
        Self {
            table,
            driver,
            config,
            sink,
            stats: ParserStats::default(),
        }
    }

    /// Replace the trace sink chosen by the configuration.
    pub fn with_sink(mut self, sink: Box<dyn TraceSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Counters of the last parse.
    pub fn stats(&self) -> &ParserStats {
        &self.stats
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Take the driver back, with whatever it accumulated.
    pub fn into_driver(self) -> D {
        self.driver
    }

    /// Explore every derivation of `tokens`, which must end with exactly one
    /// end-of-input token, and return the accepted values.
    pub fn parse(&mut self, tokens: &[D::Token]) -> Result<Vec<D::Value>, ParseError<D::Error>> {
        if tokens.is_empty() {
            return Err(ParseError::EmptyInput);
        }
        self.stats = ParserStats::default();

        let mut path: Path<D> = Path {
            pos: 0,
            states: Stack::new().push(0),
            values: Stack::new(),
            ctx: D::Context::default(),
        };
        let mut checkpoints: Vec<Checkpoint<D>> = Vec::new();
        let mut choose = 0;
        let mut candidates = Vec::new();
        let mut deepest: Option<(usize, D::Error)> = None;

        loop {
            self.stats.steps += 1;
            if self.stats.steps > self.config.max_steps {
                log::warn!("parse abandoned after {} steps", self.config.max_steps);
                return Err(ParseError::SearchLimit {
                    steps: self.config.max_steps,
                });
            }

            let step = self.step(&mut path, &mut checkpoints, choose, tokens, &mut candidates)?;
            choose = 0;
            let Step::Backtrack(failure) = step else {
                continue;
            };

            if let Some(err) = failure {
                self.stats.rejections += 1;
                self.sink.event(TraceEvent::Reject {
                    pos: path.pos,
                    reason: format!("{err:?}"),
                });
                // Ties go to the later path.
                if deepest.as_ref().is_none_or(|(pos, _)| path.pos >= *pos) {
                    deepest = Some((path.pos, err));
                }
            }

            let Some(cp) = checkpoints.pop() else {
                break;
            };
            self.stats.backtracks += 1;
            path = cp.path;
            choose = cp.alternative + 1;
            self.sink.event(TraceEvent::Backtrack {
                pos: path.pos,
                alternative: choose,
                depth: checkpoints.len(),
            });
        }

        log::debug!(
            "parse finished: {} candidate(s), {} steps, {} backtracks",
            candidates.len(),
            self.stats.steps,
            self.stats.backtracks
        );
        if candidates.is_empty() {
            let err = match deepest {
                Some((_, err)) => err,
                None => {
                    let last = tokens.len() - 1;
                    self.driver.syntax_error(&tokens[last], last)
                }
            };
            return Err(ParseError::NoParse(err));
        }
        Ok(candidates)
    }

    fn step(
        &mut self,
        path: &mut Path<D>,
        checkpoints: &mut Vec<Checkpoint<D>>,
        choose: usize,
        tokens: &[D::Token],
        candidates: &mut Vec<D::Value>,
    ) -> Result<Step<D::Error>, ParseError<D::Error>> {
        let table = self.table;
        let Some(&state) = path.states.peek() else {
            return Ok(Step::Backtrack(None));
        };
        let last = tokens.len() - 1;
        let token = &tokens[path.pos.min(last)];
        let actions = table.actions(state, self.driver.terminal(token));

        if choose >= actions.len() {
            let err = actions
                .is_empty()
                .then(|| self.driver.syntax_error(token, path.pos.min(last)));
            return Ok(Step::Backtrack(err));
        }
        if choose + 1 < actions.len() {
            checkpoints.push(Checkpoint {
                path: path.clone(),
                alternative: choose,
            });
            self.stats.checkpoints += 1;
            self.stats.max_depth = self.stats.max_depth.max(checkpoints.len());
            self.sink.event(TraceEvent::Checkpoint {
                pos: path.pos,
                state,
                alternatives: actions.len(),
                depth: checkpoints.len(),
            });
        }

        match actions[choose] {
            Action::Shift(next) => {
                if path.pos >= last {
                    // The end marker is never shifted.
                    return Ok(Step::Backtrack(Some(self.driver.syntax_error(token, last))));
                }
                let value = match self.driver.shift(&mut path.ctx, token, path.pos) {
                    Ok(v) => v,
                    Err(err) => return Ok(Step::Backtrack(Some(err))),
                };
                self.sink.event(TraceEvent::Shift {
                    pos: path.pos,
                    terminal: self.driver.terminal(token),
                    state: next,
                });
                path.states = path.states.push(next);
                path.values = path.values.push(value);
                path.pos += 1;
                self.stats.shifts += 1;
            }
            Action::Reduce(index) => {
                let prod = &table.productions[index];
                let n = prod.rhs.len();
                let (Some(states), Some(values)) = (path.states.pop_n(n), path.values.pop_n(n))
                else {
                    return Ok(Step::Backtrack(None));
                };
                let Some(&exposed) = states.peek() else {
                    return Ok(Step::Backtrack(None));
                };
                let Some(next) = table.goto(exposed, prod.lhs) else {
                    return Err(ParseError::MissingGoto {
                        state: exposed,
                        nonterminal: prod.lhs,
                    });
                };
                let children = path.values.top_n(n);
                let value = match self.driver.reduce(&mut path.ctx, prod, children) {
                    Ok(v) => v,
                    Err(err) => return Ok(Step::Backtrack(Some(err))),
                };
                self.sink.event(TraceEvent::Reduce {
                    pos: path.pos,
                    production: index,
                    state: next,
                });
                path.states = states.push(next);
                path.values = values.push(value);
                self.stats.reductions += 1;
            }
            Action::Accept => {
                if let Some(value) = path.values.peek() {
                    candidates.push(value.clone());
                    self.stats.accepts += 1;
                    self.sink.event(TraceEvent::Accept {
                        pos: path.pos,
                        candidate: candidates.len() - 1,
                    });
                    if candidates.len() > self.config.max_candidates {
                        return Err(ParseError::CandidateLimit {
                            limit: self.config.max_candidates,
                        });
                    }
                }
                return Ok(Step::Backtrack(None));
            }
        }
        Ok(Step::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::tests::sum_table;
    use crate::table::{Symbol, TABLE_FORMAT_VERSION};
    use crate::trace::RecordingSink;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    const PLUS: usize = 0;
    const N: usize = 1;
    const END: usize = 2;

    /// `E -> E + E | n`: shift/reduce conflict on `+` in state 4.
    fn ambiguous_table() -> ParseTable {
        let mut t = sum_table();
        t.productions[1].rhs = vec![Symbol::NonTerm(1), Symbol::Term(PLUS), Symbol::NonTerm(1)];
        t.actions = vec![
            vec![(N, vec![Action::Shift(2)])],
            vec![(PLUS, vec![Action::Shift(3)]), (END, vec![Action::Accept])],
            vec![(PLUS, vec![Action::Reduce(2)]), (END, vec![Action::Reduce(2)])],
            vec![(N, vec![Action::Shift(2)])],
            vec![
                (PLUS, vec![Action::Shift(3), Action::Reduce(1)]),
                (END, vec![Action::Reduce(1)]),
            ],
        ];
        t.gotos = vec![vec![(1, 1)], vec![], vec![], vec![(1, 4)], vec![]];
        assert_eq!(t.version, TABLE_FORMAT_VERSION);
        t
    }

    /// Builds bracketed strings; `left_assoc_only` rejects `a + (b + c)`.
    #[derive(Default)]
    struct Brackets {
        left_assoc_only: bool,
    }

    impl ParserDriver for Brackets {
        type Token = usize;
        type Value = String;
        type Context = usize;
        type Error = (usize, &'static str);

        fn terminal(&self, token: &usize) -> usize {
            *token
        }

        fn shift(&mut self, ctx: &mut usize, token: &usize, _index: usize) -> Result<String, Self::Error> {
            *ctx += 1;
            Ok(match *token {
                PLUS => "+".into(),
                _ => "n".into(),
            })
        }

        fn reduce(
            &mut self,
            _ctx: &mut usize,
            production: &Production,
            children: Vec<String>,
        ) -> Result<String, Self::Error> {
            if production.index == 2 {
                return Ok(children.concat());
            }
            if self.left_assoc_only && children[2].len() > 1 {
                return Err((0, "right operand is a sum"));
            }
            Ok(format!("({})", children.concat()))
        }

        fn syntax_error(&self, _token: &usize, index: usize) -> Self::Error {
            (index, "syntax")
        }
    }

    #[test]
    fn deterministic_table_single_candidate() {
        init_logger();
        let table = sum_table();
        let mut parser = Parser::new(&table, Brackets::default(), ParserConfig::default());
        let out = parser.parse(&[N, PLUS, N, PLUS, N, END]).unwrap();
        assert_eq!(out, vec!["((n+n)+n)".to_string()]);
        assert_eq!(parser.stats().checkpoints, 0);
        assert_eq!(parser.stats().accepts, 1);
    }

    #[test]
    fn explores_every_alternative_shift_first() {
        init_logger();
        let table = ambiguous_table();
        let mut parser = Parser::new(&table, Brackets::default(), ParserConfig::default());
        let out = parser.parse(&[N, PLUS, N, PLUS, N, END]).unwrap();
        assert_eq!(out, vec!["(n+(n+n))".to_string(), "((n+n)+n)".to_string()]);
        // one conflicting cell: one checkpoint, resumed once
        assert_eq!(parser.stats().checkpoints, 1);
        assert_eq!(parser.stats().backtracks, 1);
        assert_eq!(parser.stats().accepts, 2);
    }

    #[test]
    fn driver_rejection_prunes_path() {
        let table = ambiguous_table();
        let driver = Brackets {
            left_assoc_only: true,
        };
        let mut parser = Parser::new(&table, driver, ParserConfig::default());
        let out = parser.parse(&[N, PLUS, N, PLUS, N, PLUS, N, END]).unwrap();
        assert_eq!(out, vec!["(((n+n)+n)+n)".to_string()]);
        assert!(parser.stats().rejections > 0);
    }

    #[test]
    fn deepest_failure_is_reported() {
        let table = ambiguous_table();
        let mut parser = Parser::new(&table, Brackets::default(), ParserConfig::default());
        let err = parser.parse(&[N, PLUS, N, PLUS, END]).unwrap_err();
        assert_eq!(err, ParseError::NoParse((4, "syntax")));
        let err = parser.parse(&[PLUS, END]).unwrap_err();
        assert_eq!(err, ParseError::NoParse((0, "syntax")));
    }

    #[test]
    fn parsing_twice_gives_same_forest() {
        let table = ambiguous_table();
        let tokens = [N, PLUS, N, PLUS, N, PLUS, N, END];
        let mut parser = Parser::new(&table, Brackets::default(), ParserConfig::default());
        let first = parser.parse(&tokens).unwrap();
        let second = parser.parse(&tokens).unwrap();
        assert_eq!(first.len(), 5);
        assert_eq!(first, second);
    }

    #[test]
    fn limits() {
        let table = ambiguous_table();
        let tokens = [N, PLUS, N, PLUS, N, PLUS, N, END];
        let config = ParserConfig {
            max_steps: 10,
            ..ParserConfig::default()
        };
        let mut parser = Parser::new(&table, Brackets::default(), config);
        assert_eq!(parser.parse(&tokens), Err(ParseError::SearchLimit { steps: 10 }));

        let config = ParserConfig {
            max_candidates: 2,
            ..ParserConfig::default()
        };
        let mut parser = Parser::new(&table, Brackets::default(), config);
        assert_eq!(parser.parse(&tokens), Err(ParseError::CandidateLimit { limit: 2 }));
        assert_eq!(parser.parse(&[]), Err(ParseError::EmptyInput));
    }

    #[test]
    fn trace_records_checkpoints_and_backtracks() {
        let table = ambiguous_table();
        let sink = RecordingSink::new();
        let mut parser = Parser::new(&table, Brackets::default(), ParserConfig::default())
            .with_sink(Box::new(sink.clone()));
        parser.parse(&[N, PLUS, N, PLUS, N, END]).unwrap();
        let events = sink.events();
        assert!(matches!(events[0], TraceEvent::Shift { pos: 0, terminal: N, state: 2 }));
        assert!(events.iter().any(|e| matches!(e, TraceEvent::Checkpoint { alternatives: 2, .. })));
        assert!(events.iter().any(|e| matches!(e, TraceEvent::Backtrack { alternative: 1, .. })));
        let accepts = events
            .iter()
            .filter(|e| matches!(e, TraceEvent::Accept { .. }))
            .count();
        assert_eq!(accepts, 2);
    }
}
