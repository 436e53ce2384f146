use crate::diagnostics::{Diagnostics, WarningKind};
use crate::error::{Result, SvgError};
use crate::xml::{Attribute, lookup};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    pub tag: String,
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Captured {
    Start(Definition),
    // Closes the most recent unclosed `Start`.
    EndGroup,
}

#[derive(Debug)]
struct Pending {
    // `None` for an element without an id; captured only to keep nesting balanced.
    id: Option<String>,
    items: Vec<Captured>,
    depth: usize,
}

#[derive(Debug, Default)]
pub(crate) struct DefinitionStore {
    defs: HashMap<String, Vec<Captured>>,
    // Open captures, outermost first. A nested element with an id opens its
    // own capture alongside the enclosing ones.
    pending: Vec<Pending>,
}

impl DefinitionStore {
    // Records an element start. A top-level element, or a nested one with an
    // id, opens a new definition.
    pub(crate) fn start(
        &mut self,
        tag: &str,
        attrs: &[Attribute],
        diag: &mut Diagnostics,
    ) -> Result<()> {
        let id = match lookup(attrs, "id") {
            Some(id) if id.trim().is_empty() => {
                return Err(SvgError::EmptyIdentifier(tag.to_string()));
            }
            Some(id) => Some(id.trim().to_string()),
            None => None,
        };
        if self.pending.is_empty() || id.is_some() {
            if id.is_none() {
                diag.warn(
                    WarningKind::MissingId,
                    format!("<{tag}> in defs has no id and cannot be used"),
                );
            }
            self.pending.push(Pending {
                id,
                items: Vec::new(),
                depth: 0,
            });
        }
        for pending in &mut self.pending {
            pending.items.push(Captured::Start(Definition {
                tag: tag.to_string(),
                attributes: attrs.to_vec(),
            }));
            pending.depth += 1;
        }
        Ok(())
    }

    // Records an element end, storing each definition once it is complete.
    pub(crate) fn end(&mut self) {
        for pending in &mut self.pending {
            pending.items.push(Captured::EndGroup);
            pending.depth = pending.depth.saturating_sub(1);
        }
        while self.pending.last().is_some_and(|p| p.depth == 0) {
            if let Some(done) = self.pending.pop() {
                self.store(done);
            }
        }
    }

    // Stores whatever is pending, closing any groups left open.
    pub(crate) fn flush(&mut self) {
        while let Some(mut pending) = self.pending.pop() {
            for _ in 0..pending.depth {
                pending.items.push(Captured::EndGroup);
            }
            self.store(pending);
        }
    }

    fn store(&mut self, pending: Pending) {
        if let Some(id) = pending.id {
            tracing::trace!(id = %id, steps = pending.items.len(), "captured definition");
            self.defs.insert(id, pending.items);
        }
    }

    pub(crate) fn get(&self, id: &str) -> Option<&[Captured]> {
        self.defs.get(id).map(Vec::as_slice)
    }

    pub(crate) fn len(&self) -> usize {
        self.defs.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> Vec<Attribute> {
        pairs.iter().map(|(k, v)| Attribute::new(*k, *v)).collect()
    }

    #[test]
    fn nested_group_is_bracketed() {
        let mut diag = Diagnostics::default();
        let mut store = DefinitionStore::default();
        store.start("g", &attrs(&[("id", "grp")]), &mut diag).unwrap();
        store.start("rect", &attrs(&[("width", "1")]), &mut diag).unwrap();
        store.end();
        store.start("circle", &attrs(&[("r", "1")]), &mut diag).unwrap();
        store.end();
        store.end();
        let steps = store.get("grp").unwrap();
        let shape: Vec<&str> = steps
            .iter()
            .map(|s| match s {
                Captured::Start(d) => d.tag.as_str(),
                Captured::EndGroup => "/",
            })
            .collect();
        assert_eq!(shape, vec!["g", "rect", "/", "circle", "/", "/"]);
    }

    #[test]
    fn siblings_are_separate_definitions() {
        let mut diag = Diagnostics::default();
        let mut store = DefinitionStore::default();
        store.start("rect", &attrs(&[("id", "a")]), &mut diag).unwrap();
        store.end();
        store.start("rect", &attrs(&[("id", "b")]), &mut diag).unwrap();
        store.end();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("a").unwrap().len(), 2);
    }

    #[test]
    fn nested_ids_are_stored_on_their_own() {
        let mut diag = Diagnostics::default();
        let mut store = DefinitionStore::default();
        store.start("g", &attrs(&[("id", "grp")]), &mut diag).unwrap();
        store.start("rect", &attrs(&[("id", "inner")]), &mut diag).unwrap();
        store.end();
        store.start("circle", &attrs(&[]), &mut diag).unwrap();
        store.end();
        store.end();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("grp").unwrap().len(), 6);
        let inner = store.get("inner").unwrap();
        assert_eq!(inner.len(), 2);
        assert!(matches!(&inner[0], Captured::Start(d) if d.tag == "rect"));
        assert_eq!(diag.count(WarningKind::MissingId), 0);
    }

    #[test]
    fn flush_closes_open_groups() {
        let mut diag = Diagnostics::default();
        let mut store = DefinitionStore::default();
        store.start("g", &attrs(&[("id", "open")]), &mut diag).unwrap();
        store.start("rect", &attrs(&[]), &mut diag).unwrap();
        store.flush();
        let steps = store.get("open").unwrap();
        assert_eq!(steps.len(), 4);
        assert_eq!(steps[3], Captured::EndGroup);
    }

    #[test]
    fn missing_and_empty_ids() {
        let mut diag = Diagnostics::default();
        let mut store = DefinitionStore::default();
        store.start("rect", &attrs(&[]), &mut diag).unwrap();
        store.end();
        assert_eq!(store.len(), 0);
        assert_eq!(diag.count(WarningKind::MissingId), 1);
        let err = store.start("rect", &attrs(&[("id", " ")]), &mut diag);
        assert!(matches!(err, Err(SvgError::EmptyIdentifier(_))));
    }
}
