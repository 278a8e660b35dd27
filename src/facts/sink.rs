use super::{kinds, AnyLabel, Fact, Label};
use rustc_hash::FxHashMap;
use std::fmt::Write as _;

/// Receives label bindings and facts as the extractor produces them.
pub trait FactSink {
    /// A keyed label was allocated; `key` is its canonical key.
    fn bind_label(&mut self, label: AnyLabel, key: &str);

    /// A keyless label was allocated.
    fn bind_fresh(&mut self, _label: AnyLabel) {}

    fn write(&mut self, fact: Fact);
}

/// In-memory sink keeping everything in emission order.
#[derive(Debug, Default)]
pub struct FactLog {
    bindings: Vec<(AnyLabel, Option<String>)>,
    by_key: FxHashMap<String, AnyLabel>,
    facts: Vec<Fact>,
}

impl FactLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn facts(&self) -> &[Fact] {
        &self.facts
    }

    pub fn label_of(&self, key: &str) -> Option<AnyLabel> {
        self.by_key.get(key).copied()
    }

    pub fn key_of(&self, label: AnyLabel) -> Option<&str> {
        self.bindings
            .iter()
            .find(|(bound, _)| *bound == label)
            .and_then(|(_, key)| key.as_deref())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.bindings.iter().filter_map(|(_, key)| key.as_deref())
    }

    /// Number of facts of the given relation.
    pub fn count(&self, relation: &str) -> usize {
        self.facts
            .iter()
            .filter(|fact| fact.relation() == relation)
            .count()
    }

    /// Supertypes recorded for `sub`, in emission order.
    pub fn extends_of(&self, sub: AnyLabel) -> Vec<Label<kinds::ClassOrInterface>> {
        self.facts
            .iter()
            .filter_map(|fact| match fact {
                Fact::ExtendsReftype { sub: s, sup } if s.any() == sub => Some(*sup),
                _ => None,
            })
            .collect()
    }

    /// Bindings followed by facts, one per line.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (label, key) in &self.bindings {
            match key {
                Some(key) => {
                    let _ = writeln!(out, "{}={}", label, key);
                }
                None => {
                    let _ = writeln!(out, "{}=*", label);
                }
            }
        }
        for fact in &self.facts {
            let _ = writeln!(out, "{}", fact);
        }
        out
    }
}

impl FactSink for FactLog {
    fn bind_label(&mut self, label: AnyLabel, key: &str) {
        self.by_key.insert(key.to_string(), label);
        self.bindings.push((label, Some(key.to_string())));
    }

    fn bind_fresh(&mut self, label: AnyLabel) {
        self.bindings.push((label, None));
    }

    fn write(&mut self, fact: Fact) {
        self.facts.push(fact);
    }
}
