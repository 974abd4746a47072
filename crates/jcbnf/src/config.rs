//! Configuration for the match engine.

/// Limits applied while matching.
///
/// # Example
///
/// ```rust
/// use jcbnf::MatchConfig;
///
/// // Use the default limits
/// let config = MatchConfig::default();
/// assert_eq!(config.max_depth, 1000);
///
/// // Or allow deeper grammars
/// let config = MatchConfig::default().with_max_depth(10_000);
/// assert_eq!(config.max_depth, 10_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchConfig {
    /// Maximum nesting depth of element evaluation.
    ///
    /// Every element the engine descends into counts one level, so deeply
    /// self-referential grammars fail with
    /// [`MatchError::TooDeep`](crate::MatchError::TooDeep) instead of
    /// exhausting the native stack.
    pub max_depth: usize,
}

impl MatchConfig {
    /// Returns this configuration with a different depth limit.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self { max_depth: 1000 }
    }
}
