//! Tracing hooks for phase transitions (starter).
//!
//! Kept feature-gated so the core stays free of telemetry stacks; wire the
//! events into a subscriber in the binary layer.

#[cfg(feature = "trace")]
pub fn phase_event(phase: &str, key_values: &[(&str, String)]) {
    for (k, v) in key_values {
        tracing::debug!(%phase, %k, %v, "pipeline phase");
    }
    if key_values.is_empty() {
        tracing::debug!(%phase, "pipeline phase");
    }
}

#[cfg(not(feature = "trace"))]
pub fn phase_event(_phase: &str, _key_values: &[(&str, String)]) { /* no-op */
}
