/// Resource limits to keep evaluation bounded on hostile or corrupted models
///
/// These limits protect against malicious inputs while being generous enough
/// for all legitimate use cases.
#[derive(Debug, Clone)]
pub struct ResourceLimits {
    /// Maximum number of nested rule formulas for one evaluation
    /// Real usage: ~10 levels, Limit: 128
    pub max_resolution_depth: usize,

    /// Maximum size of a model JSON document in bytes
    /// Real usage: ~2MB, Limit: 64MB
    pub max_model_bytes: usize,

    /// Maximum size of a situation JSON document in bytes
    /// Real usage: ~10KB, Limit: 1MB
    pub max_situation_bytes: usize,

    /// Maximum size of a JSON array of situations in bytes
    /// Real usage: ~20MB for a large poll, Limit: 256MB
    pub max_batch_bytes: usize,
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            max_resolution_depth: 128,
            max_model_bytes: 64 * 1024 * 1024,    // 64 MB
            max_situation_bytes: 1024 * 1024,     // 1 MB
            max_batch_bytes: 256 * 1024 * 1024,   // 256 MB
        }
    }
}

impl ResourceLimits {
    /// Create a new ResourceLimits with default values
    pub fn new() -> Self {
        Self::default()
    }
}
