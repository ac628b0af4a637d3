//! Non-fatal notices raised while deriving types or compiling arguments.
//!
//! Each notice is reported at most once per [`Diagnostics`] owner, which is either a
//! [`crate::TypeGraph`] (compile-time notices) or a [`crate::DerivationContext`] (notices
//! raised while building derived types). Clearing the owner starts a new cycle.

use std::{
    collections::HashSet,
    fmt,
    sync::{Arc, Mutex, PoisonError},
};

use itertools::Itertools;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Computed fields that declare no dependencies cannot be safely filtered or projected.
    UnsafeComputedFields { ty: String, fields: Vec<String> },
    /// The `opr`/`value`/`values`/`NEQ` leaf filter shape was used.
    DeprecatedLeafFilter,
}

impl Diagnostic {
    fn key(&self) -> String {
        match self {
            Diagnostic::UnsafeComputedFields { ty, .. } => format!("unsafe-computed-fields:{ty}"),
            Diagnostic::DeprecatedLeafFilter => "deprecated-leaf-filter".to_string(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnsafeComputedFields { ty, fields } => write!(
                f,
                "Type {ty} has computed fields without declared dependencies ({}); \
                 filtering or projecting through them is not safe",
                fields.iter().join(", ")
            ),
            Diagnostic::DeprecatedLeafFilter => write!(
                f,
                "scalar filter \"opr\" field is deprecated, please switch to the operator fields"
            ),
        }
    }
}

pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, diagnostic: &Diagnostic);
}

/// Forwards every diagnostic to `tracing` at the warn level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, diagnostic: &Diagnostic) {
        tracing::warn!("{diagnostic}");
    }
}

pub struct Diagnostics {
    sink: Arc<dyn DiagnosticSink>,
    warned: Mutex<HashSet<String>>,
}

impl Diagnostics {
    pub fn new(sink: Arc<dyn DiagnosticSink>) -> Self {
        Diagnostics {
            sink,
            warned: Mutex::default(),
        }
    }

    pub fn sink(&self) -> Arc<dyn DiagnosticSink> {
        Arc::clone(&self.sink)
    }

    /// Emits the diagnostic unless an equivalent one was already emitted.
    pub fn warn_once(&self, diagnostic: Diagnostic) {
        let first_time = self
            .warned
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(diagnostic.key());

        if first_time {
            self.sink.emit(&diagnostic);
        }
    }

    pub fn reset(&self) {
        self.warned.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Diagnostics::new(Arc::new(TracingSink))
    }
}

impl fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let warned = self.warned.lock().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("Diagnostics").field("warned", &*warned).finish_non_exhaustive()
    }
}
