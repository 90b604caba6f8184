pub mod entities;

// Re-export tracing so dependents log through the same crate
pub use tracing;

// Initialize tracing if not already initialized
#[cfg(not(test))]
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::fmt::format::FmtSpan;

    // Logs to stdout; the level is controlled via RUST_LOG
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_span_events(FmtSpan::CLOSE)
        .init();
}
