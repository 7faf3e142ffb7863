//! Per-invocation tool context.

use crate::policy::FsPolicy;
use std::sync::Arc;
use uuid::Uuid;

/// Context passed to a tool for a single invocation.
///
/// Cloning is cheap; the policy is shared.
#[derive(Debug, Clone)]
pub struct ToolContext {
    /// Identifier correlating log lines for one call.
    pub call_id: Uuid,
    /// Name the tool was invoked under.
    pub tool_name: String,
    /// Access policy enforced before execution.
    pub policy: Arc<FsPolicy>,
}

impl ToolContext {
    /// Create a context with a fresh call id.
    pub fn new(tool_name: impl Into<String>, policy: Arc<FsPolicy>) -> Self {
        Self {
            call_id: Uuid::new_v4(),
            tool_name: tool_name.into(),
            policy,
        }
    }

    /// Context with a permissive policy, mostly useful in tests.
    pub fn permissive(tool_name: impl Into<String>) -> Self {
        Self::new(tool_name, Arc::new(FsPolicy::permissive()))
    }
}
