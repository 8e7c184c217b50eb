//! The append-only chain of named word entries, plus the compiled-cell
//! shape every definition's body is built from.

use crate::runtime::Runtime;
use crate::value::Value;
use crate::error::ForthError;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

/// A dictionary entry's run-time behavior: invoked directly for a builtin,
/// or (for a user-defined word) the DOCOL closure that pushes a fresh return
/// frame referencing the entry itself.
pub type Primitive = Rc<dyn Fn(&mut Runtime) -> Result<(), ForthError>>;

/// One cell of a definition's compiled body: either a reference to another
/// word (dispatched through its primitive) or an inline literal value
/// (pushed verbatim by the executor).
#[derive(Clone)]
pub enum CompiledItem {
    Word(Rc<DictionaryEntry>),
    Literal(Value),
}

pub struct DictionaryEntry {
    pub name: Option<String>,
    pub previous: Option<Rc<DictionaryEntry>>,
    pub immediate: Cell<bool>,
    pub primitive: RefCell<Primitive>,
    pub compiled: RefCell<Vec<CompiledItem>>,
}

impl DictionaryEntry {
    pub fn call(self: &Rc<Self>, rt: &mut Runtime) -> Result<(), ForthError> {
        let p = self.primitive.borrow().clone();
        p(rt)
    }

    /// Replaces this entry's run-time behavior in place. Used only by
    /// `var:`/`const:`, which must build the entry (to capture a reference
    /// to itself) before its final primitive can be written.
    pub fn replace_primitive(&self, primitive: Primitive) {
        *self.primitive.borrow_mut() = primitive;
    }
}

impl DictionaryEntry {
    /// Builds an anonymous, unlinked entry (array literals, postpone
    /// helpers, each/endeach machinery) — not reachable by name, kept alive
    /// only through references held on a stack or inside another entry.
    pub fn anonymous(primitive: Primitive) -> Rc<DictionaryEntry> {
        Rc::new(DictionaryEntry {
            name: None,
            previous: None,
            immediate: Cell::new(false),
            primitive: RefCell::new(primitive),
            compiled: RefCell::new(Vec::new()),
        })
    }

    /// An anonymous entry whose primitive always raises `UncallableCalled` —
    /// used as the placeholder primitive for entries that are only ever
    /// executed by pushing a frame onto their own `compiled` body (see
    /// `docol`), never invoked directly.
    pub fn uncallable() -> Rc<DictionaryEntry> {
        DictionaryEntry::anonymous(Rc::new(|_: &mut Runtime| Err(ForthError::UncallableCalled)))
    }
}

/// The chain itself, plus the side-table of "core" words (the ones defined
/// before any user program runs) that parsing words consult when they need
/// to resolve a name reliably even if a user definition has since shadowed
/// it in the ordinary `find` chain.
pub struct Dictionary {
    latest: RefCell<Option<Rc<DictionaryEntry>>>,
    core_words: RefCell<HashMap<String, Rc<DictionaryEntry>>>,
    defining_core: Cell<bool>,
}

impl Dictionary {
    pub fn new() -> Rc<Dictionary> {
        Rc::new(Dictionary {
            latest: RefCell::new(None),
            core_words: RefCell::new(HashMap::new()),
            defining_core: Cell::new(true),
        })
    }

    /// Marks the end of core-word registration; any `define` calls after
    /// this point are ordinary user definitions and are not recorded in the
    /// core-word table.
    pub fn finish_core_phase(&self) {
        self.defining_core.set(false);
    }

    pub fn define(
        &self,
        name: Option<String>,
        primitive: Primitive,
        immediate: bool,
    ) -> Rc<DictionaryEntry> {
        let entry = Rc::new(DictionaryEntry {
            name: name.clone(),
            previous: self.latest.borrow().clone(),
            immediate: Cell::new(immediate),
            primitive: RefCell::new(primitive),
            compiled: RefCell::new(Vec::new()),
        });
        if let Some(n) = &name {
            self.record_definition(n, &entry);
        }
        entry
    }

    /// The shape `:` needs: a user-defined word whose primitive is DOCOL —
    /// pushing a return frame that refers back to the entry itself. Built
    /// with `Rc::new_cyclic` so the closure can hold a `Weak` to its own
    /// entry instead of requiring after-the-fact mutation.
    pub fn define_docol(&self, name: Option<String>, immediate: bool) -> Rc<DictionaryEntry> {
        let previous = self.latest.borrow().clone();
        let entry = Rc::new_cyclic(|weak| {
            let weak = weak.clone();
            DictionaryEntry {
                name: name.clone(),
                previous,
                immediate: Cell::new(immediate),
                primitive: RefCell::new(Rc::new(move |rt: &mut crate::runtime::Runtime| {
                    let entry = weak.upgrade().expect("docol entry outlives its own frame push");
                    crate::runtime::push_frame(rt, entry);
                    Ok(())
                })),
                compiled: RefCell::new(Vec::new()),
            }
        });
        if let Some(n) = &name {
            self.record_definition(n, &entry);
        }
        entry
    }

    fn record_definition(&self, name: &str, entry: &Rc<DictionaryEntry>) {
        if self.defining_core.get() {
            let mut core = self.core_words.borrow_mut();
            if core.contains_key(name) {
                panic!("duplicate core word definition: {}", name);
            }
            core.insert(name.to_string(), entry.clone());
        }
        *self.latest.borrow_mut() = Some(entry.clone());
    }

    pub fn find(&self, name: &str) -> Option<Rc<DictionaryEntry>> {
        let mut cur = self.latest.borrow().clone();
        while let Some(entry) = cur {
            if entry.name.as_deref() == Some(name) {
                return Some(entry);
            }
            cur = entry.previous.clone();
        }
        None
    }

    pub fn core_word(&self, name: &str) -> Option<Primitive> {
        self.core_words.borrow().get(name).map(|e| e.primitive.borrow().clone())
    }

    pub fn core_entry(&self, name: &str) -> Option<Rc<DictionaryEntry>> {
        self.core_words.borrow().get(name).cloned()
    }

    pub fn latest(&self) -> Option<Rc<DictionaryEntry>> {
        self.latest.borrow().clone()
    }

    pub fn set_latest(&self, entry: Rc<DictionaryEntry>) {
        *self.latest.borrow_mut() = Some(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_walks_back_from_latest() {
        let dict = Dictionary::new();
        dict.define(Some("x".into()), Rc::new(|_: &mut Runtime| Ok(())), false);
        dict.define(Some("y".into()), Rc::new(|_: &mut Runtime| Ok(())), false);
        assert!(dict.find("x").is_some());
        assert!(dict.find("y").is_some());
        assert!(dict.find("z").is_none());
    }

    #[test]
    fn later_definition_shadows_earlier() {
        let dict = Dictionary::new();
        let first = dict.define(Some("dup".into()), Rc::new(|_: &mut Runtime| Ok(())), false);
        let second = dict.define(Some("dup".into()), Rc::new(|_: &mut Runtime| Ok(())), false);
        let found = dict.find("dup").unwrap();
        assert!(Rc::ptr_eq(&found, &second));
        assert!(!Rc::ptr_eq(&found, &first));
    }
}
