//! Engine configuration types.

/// Configuration for a game state engine
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Count state-transition derivations (zero overhead when false)
    pub enable_profiling: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            enable_profiling: false,
        }
    }
}
