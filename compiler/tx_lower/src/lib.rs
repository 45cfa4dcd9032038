//! tx lowering - rewrite passes over the typed AST
//!
//! Passes walk a compilation unit with the [`tx_ir::TreeVisitor`] protocol,
//! consult the type/element model through a [`TypeEnv`], and splice
//! runtime-call forms in place of source constructs.
//!
//! # Passes
//!
//! - [`ArrayRewriter`]: array creation, element access and assignment,
//!   `.length` and array `instanceof` become calls on the runtime array
//!   classes
//!
//! # Tracing
//!
//! Call [`init_tracing`] once at startup and set `RUST_LOG`
//! (e.g. `RUST_LOG=tx_lower=debug`) to see every rewrite.

mod array;
mod env;
mod error;
mod options;
mod pass;
mod retain;

pub use array::ArrayRewriter;
pub use env::TypeEnv;
pub use error::LoweringViolation;
pub use options::{MemoryManagement, TranslateOptions};
pub use pass::{run_passes, TranslationPass};
pub use retain::{is_assigned, retain_result};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Installs a subscriber only when `RUST_LOG`
/// is set.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
