//! Audit trail.
//!
//! Every state change is emitted as a `tracing` event on the
//! `snakehunt::audit` target so operators can route it to its own sink with
//! an `EnvFilter` directive such as `snakehunt::audit=info`.

use serde_json::Value;

/// Records that `actor` performed `action`. `detail` carries the ids and
/// values involved.
pub fn record(actor: &str, action: &str, detail: Value) {
    tracing::info!(
        target: "snakehunt::audit",
        actor,
        action,
        detail = %detail,
        "audit"
    );
}
