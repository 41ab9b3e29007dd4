//! Client configuration.

use parley_json_rpc::DiagnosticConfig;

/// Behavior knobs for [`RpcClient`](crate::client::RpcClient).
#[derive(Debug, Clone, Copy)]
pub struct ClientConfig {
    /// Emit object-shaped params for operations registered with meaningful
    /// parameter names. When off, every call is positional.
    pub named_params: bool,
    /// How much diagnostic detail locally synthesized wire errors carry.
    pub diagnostics: DiagnosticConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            named_params: true,
            diagnostics: DiagnosticConfig::default().with_cause_chain(true),
        }
    }
}
