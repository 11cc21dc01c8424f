//! Diagnostics sink used to report delivery failures.

use std::error::Error;
use std::sync::Arc;

use tracing::error;

/// Leveled error reporting with key-value context.
///
/// The service and every route handler report failures through this trait
/// instead of returning them to the alerting engine.
pub trait Diagnostic: Send + Sync {
    /// Derive a sink that attaches `ctx` to every report.
    fn with_context(&self, ctx: &[(&str, &str)]) -> Arc<dyn Diagnostic>;

    /// Report an error.
    fn error(&self, msg: &str, err: Option<&(dyn Error + 'static)>, kvs: &[(&str, &str)]);
}

/// [`Diagnostic`] backed by `tracing` error events.
///
/// A `code` key-value becomes its own `code` field. Route context and any
/// other key-values vary per call site, so they are rendered as
/// space-separated `key=value` lists in the `context` and `fields` fields.
#[derive(Debug, Clone, Default)]
pub struct TracingDiagnostic {
    context: Vec<(String, String)>,
}

impl TracingDiagnostic {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            context: Vec::new(),
        }
    }

    fn extended(&self, ctx: &[(&str, &str)]) -> Self {
        let mut context = self.context.clone();
        context.extend(ctx.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())));
        Self { context }
    }

    fn format_pairs<'a>(pairs: impl Iterator<Item = (&'a str, &'a str)>) -> String {
        pairs
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Pull the `code` value out of `kvs`, rendering the rest.
    fn split_code<'a>(kvs: &[(&'a str, &'a str)]) -> (Option<&'a str>, String) {
        let code = kvs.iter().find(|(k, _)| *k == "code").map(|(_, v)| *v);
        let rest = Self::format_pairs(kvs.iter().copied().filter(|(k, _)| *k != "code"));
        (code, rest)
    }
}

impl Diagnostic for TracingDiagnostic {
    fn with_context(&self, ctx: &[(&str, &str)]) -> Arc<dyn Diagnostic> {
        Arc::new(self.extended(ctx))
    }

    fn error(&self, msg: &str, err: Option<&(dyn Error + 'static)>, kvs: &[(&str, &str)]) {
        let context =
            Self::format_pairs(self.context.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        let (code, fields) = Self::split_code(kvs);

        match err {
            Some(err) => error!(
                service = "sensugo",
                code,
                context = %context,
                fields = %fields,
                error = %err,
                "{msg}"
            ),
            None => error!(
                service = "sensugo",
                code,
                context = %context,
                fields = %fields,
                "{msg}"
            ),
        }
    }
}
