//! Front-end configuration.

use btlr::ParserConfig;

/// Settings of a [`FrontEnd`](crate::FrontEnd).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontConfig {
    /// Search limits and tracing for the backtracking parser.
    pub parser: ParserConfig,
    /// Prune parse paths that use a typedef name as a value. Without it the
    /// parser keeps both readings of `T * x;` and leaves the choice to scope
    /// analysis, which multiplies candidates.
    pub gate_values: bool,
}

impl Default for FrontConfig {
    fn default() -> Self {
        Self {
            parser: ParserConfig::default(),
            gate_values: true,
        }
    }
}

impl FrontConfig {
    /// Defaults overridden from the environment:
    ///
    /// * `BTLR_TRACE`: any value but `0` enables step tracing;
    /// * `BTLR_MAX_STEPS`, `BTLR_MAX_CANDIDATES`: parser limits;
    /// * `BTLR_GATE_VALUES`: `0` disables value gating.
    ///
    /// Unparsable numbers are ignored with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(v) = lookup("BTLR_TRACE") {
            config.parser.trace = v != "0";
        }
        if let Some(n) = number(&lookup, "BTLR_MAX_STEPS") {
            config.parser.max_steps = n;
        }
        if let Some(n) = number(&lookup, "BTLR_MAX_CANDIDATES") {
            config.parser.max_candidates = n;
        }
        if let Some(v) = lookup("BTLR_GATE_VALUES") {
            config.gate_values = v != "0";
        }
        config
    }

    /// Report every parser step through `log::trace!`.
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.parser.trace = trace;
        self
    }

    /// Give up after `max_steps` parser steps.
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.parser.max_steps = max_steps;
        self
    }

    /// Give up once more than `max_candidates` trees are accepted.
    pub fn with_max_candidates(mut self, max_candidates: usize) -> Self {
        self.parser.max_candidates = max_candidates;
        self
    }

    /// See [`FrontConfig::gate_values`].
    pub fn with_gate_values(mut self, gate_values: bool) -> Self {
        self.gate_values = gate_values;
        self
    }
}

fn number(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<usize> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(n) => Some(n),
        Err(e) => {
            log::warn!("ignoring {key}={raw:?}: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from(vars: &[(&str, &str)]) -> FrontConfig {
        let vars: HashMap<std::string::String, std::string::String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        FrontConfig::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        assert_eq!(from(&[]), FrontConfig::default());
        assert!(FrontConfig::default().gate_values);
    }

    #[test]
    fn overrides() {
        let c = from(&[
            ("BTLR_TRACE", "1"),
            ("BTLR_MAX_STEPS", "1000"),
            ("BTLR_MAX_CANDIDATES", " 3 "),
            ("BTLR_GATE_VALUES", "0"),
        ]);
        assert!(c.parser.trace);
        assert_eq!(c.parser.max_steps, 1000);
        assert_eq!(c.parser.max_candidates, 3);
        assert!(!c.gate_values);
    }

    #[test]
    fn bad_numbers_are_ignored() {
        let c = from(&[("BTLR_MAX_STEPS", "lots")]);
        assert_eq!(c.parser.max_steps, ParserConfig::default().max_steps);
    }
}
