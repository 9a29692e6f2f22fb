use serde::{Deserialize, Serialize};

/// Configuration for the [`crate::MatchingEngine`].
///
/// Nothing here changes which paths are reconstructed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Dump the whole path store at `debug` level after every transaction.
    pub trace_paths: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_quiet() {
        assert!(!EngineConfig::default().trace_paths);
    }
}
