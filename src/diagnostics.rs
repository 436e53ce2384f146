use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WarningKind {
    UnknownElement,
    UnknownStyleKey,
    InvalidValue,
    UnresolvedPaint,
    MisplacedElement,
    MissingId,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WarningKind::UnknownElement => "unknown-element",
            WarningKind::UnknownStyleKey => "unknown-style-key",
            WarningKind::InvalidValue => "invalid-value",
            WarningKind::UnresolvedPaint => "unresolved-paint",
            WarningKind::MisplacedElement => "misplaced-element",
            WarningKind::MissingId => "missing-id",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub kind: WarningKind,
    pub detail: String,
}

#[derive(Debug, Default)]
pub(crate) struct Diagnostics {
    warnings: Vec<Warning>,
    counters: BTreeMap<WarningKind, u64>,
}

impl Diagnostics {
    pub(crate) fn warn(&mut self, kind: WarningKind, detail: impl Into<String>) {
        let detail = detail.into();
        tracing::warn!(kind = %kind, "{detail}");
        let entry = self.counters.entry(kind).or_insert(0);
        *entry = entry.saturating_add(1);
        self.warnings.push(Warning { kind, detail });
    }

    #[cfg(test)]
    pub(crate) fn count(&self, kind: WarningKind) -> u64 {
        self.counters.get(&kind).copied().unwrap_or(0)
    }

    // Logs per-kind totals and hands the collected warnings over.
    pub(crate) fn finish(self) -> Vec<Warning> {
        if !self.counters.is_empty() {
            let summary = self
                .counters
                .iter()
                .map(|(kind, n)| format!("{kind}={n}"))
                .collect::<Vec<_>>()
                .join(", ");
            tracing::debug!(total = self.warnings.len(), "parse warnings: {summary}");
        }
        self.warnings
    }
}
