// SPDX-License-Identifier: MIT OR Apache-2.0

//! Move history accumulated from server notation deltas

use serde::{Deserialize, Serialize};

/// Ordered notation tokens of the moves played so far
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MoveHistory {
    tokens: Vec<String>,
}

impl MoveHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tokens(tokens: Vec<String>) -> Self {
        Self { tokens }
    }

    /// Append the tokens of one confirmed server response
    pub fn extend<I>(&mut self, tokens: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.tokens.extend(tokens);
    }

    /// Drop the last `count` tokens
    pub fn truncate_last(&mut self, count: usize) {
        let keep = self.tokens.len().saturating_sub(count);
        self.tokens.truncate(keep);
    }

    pub fn clear(&mut self) {
        self.tokens.clear();
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Numbered move pairs, one per line.
    ///
    /// ```
    /// use chess_client_core::MoveHistory;
    ///
    /// let history = MoveHistory::from_tokens(vec!["e4".into(), "e5".into(), "Nf3".into()]);
    /// assert_eq!(history.export(), "1 e4 e5\n2. Nf3\n");
    /// ```
    pub fn export(&self) -> String {
        let mut out = String::new();
        for (ix, pair) in self.tokens.chunks(2).enumerate() {
            let number = ix + 1;
            match pair {
                [white, black] => out.push_str(&format!("{number} {white} {black}\n")),
                [white] => out.push_str(&format!("{number}. {white}\n")),
                _ => {}
            }
        }
        out
    }
}
