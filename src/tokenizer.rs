//! Splitting of raw text on a single-character delimiter.
//!
//! The tokenizer is used twice per input line: once with `;` to cut the line into
//! statement segments and once with a space to cut each segment into a command name
//! and its arguments.

/// How the token count reported alongside the tokens is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CountPolicy {
    /// The count equals the number of tokens produced.
    #[default]
    Accurate,
    /// Historical counting: one extra slot whenever the (newline-stripped) input is
    /// non-empty and ends in the delimiter or does not end in a newline.
    Compat,
}

impl CountPolicy {
    /// Number of extra slots this policy adds on top of the materialized tokens for an
    /// ordinary, cleanly terminated segment.
    pub fn slack(self) -> usize {
        match self {
            CountPolicy::Accurate => 0,
            CountPolicy::Compat => 1,
        }
    }
}

/// The result of one tokenizer run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tokens {
    items: Vec<String>,
    count: usize,
}

impl Tokens {
    /// The tokens in input order.
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Token count as defined by the [`CountPolicy`] in effect.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_items(self) -> Vec<String> {
        self.items
    }
}

/// Stateless splitter over a single delimiter character.
#[derive(Debug, Clone, Copy)]
pub struct Tokenizer {
    delimiter: char,
    policy: CountPolicy,
}

impl Tokenizer {
    pub fn new(delimiter: char) -> Self {
        Self {
            delimiter,
            policy: CountPolicy::Accurate,
        }
    }

    pub fn with_policy(mut self, policy: CountPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Tokenize an optional input; an absent input yields no tokens.
    pub fn tokenize_opt(&self, input: Option<&str>) -> Tokens {
        input.map(|s| self.tokenize(s)).unwrap_or_default()
    }

    /// Split `input` on the delimiter, dropping zero-length pieces.
    ///
    /// Exactly one trailing `\n` is removed from the input before splitting, and one
    /// trailing `\n` is removed from every produced token.
    pub fn tokenize(&self, input: &str) -> Tokens {
        if input.is_empty() {
            return Tokens::default();
        }

        let body = input.strip_suffix('\n').unwrap_or(input);

        let items: Vec<String> = body
            .split(self.delimiter)
            .map(|piece| piece.strip_suffix('\n').unwrap_or(piece))
            .filter(|piece| !piece.is_empty())
            .map(str::to_owned)
            .collect();

        let count = match self.policy {
            CountPolicy::Accurate => items.len(),
            CountPolicy::Compat => items.len() + self.historical_extra(body),
        };

        Tokens { items, count }
    }

    fn historical_extra(&self, body: &str) -> usize {
        match body.chars().last() {
            Some(last) if last == self.delimiter || last != '\n' => 1,
            _ => 0,
        }
    }
}
