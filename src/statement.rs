use crate::tokenizer::{CountPolicy, Tokenizer};

/// Separator between statements on one input line.
pub const STATEMENT_DELIMITER: char = ';';
/// Separator between the command name and its arguments.
pub const ARGUMENT_DELIMITER: char = ' ';

/// One command name plus its arguments, cut from a `;`-delimited segment of a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    tokens: Vec<String>,
    count: usize,
}

impl Statement {
    /// Command name (token 0).
    pub fn name(&self) -> &str {
        &self.tokens[0]
    }

    /// Arguments (tokens 1..).
    pub fn args(&self) -> &[String] {
        &self.tokens[1..]
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Token count as reported by the tokenizer, used for arity validation.
    pub fn count(&self) -> usize {
        self.count
    }
}

/// Builds the statements of a line.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatementBuilder {
    policy: CountPolicy,
}

impl StatementBuilder {
    pub fn new(policy: CountPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> CountPolicy {
        self.policy
    }

    /// Split `line` into statements. Blank lines and blank segments produce nothing.
    pub fn build(&self, line: &str) -> Vec<Statement> {
        if line.trim().is_empty() {
            return Vec::new();
        }

        let segments = Tokenizer::new(STATEMENT_DELIMITER).tokenize(line);
        let words = Tokenizer::new(ARGUMENT_DELIMITER).with_policy(self.policy);

        segments
            .items()
            .iter()
            .filter_map(|segment| {
                let tokens = words.tokenize(segment);
                if tokens.is_empty() {
                    return None;
                }
                let count = tokens.count();
                let tokens = tokens.into_items();
                debug_assert!(
                    self.policy != CountPolicy::Accurate || count == tokens.len(),
                    "accurate count must match materialized tokens"
                );
                Some(Statement { tokens, count })
            })
            .collect()
    }
}
