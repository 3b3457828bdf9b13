//! Post-commit effects.
//!
//! Effects requested while a composition renders are queued and run only
//! after the render has finished, in the order their call sites were reached.
//! Each call site owns one [`EffectCell`] holding the `Dispose` of its most
//! recent run; that handle runs right before the call site's next effect and
//! once more when the composition unmounts.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use smallvec::SmallVec;

use crate::runtime::with_active;
use crate::{Dispose, current_scope, remember};

pub(crate) type PendingEffects = SmallVec<[PendingEffect; 4]>;

pub(crate) struct PendingEffect {
    cell: Rc<EffectCell>,
    effect: Box<dyn FnOnce() -> Dispose>,
    /// Bookkeeping that only becomes true once the effect actually runs.
    on_commit: Option<Box<dyn FnOnce()>>,
}

impl PendingEffect {
    pub(crate) fn run(self) {
        if let Some(on_commit) = self.on_commit {
            on_commit();
        }
        self.cell.run_cleanup();
        let d = (self.effect)();
        self.cell.store(d);
    }
}

#[derive(Default)]
pub struct EffectCell {
    cleanup: RefCell<Option<Dispose>>,
    installed: Cell<bool>,
    runs: Cell<usize>,
}

impl EffectCell {
    fn run_cleanup(&self) {
        let d = self.cleanup.borrow_mut().take();
        if let Some(d) = d {
            d.run();
        }
    }

    fn store(&self, d: Dispose) {
        self.runs.set(self.runs.get() + 1);
        *self.cleanup.borrow_mut() = Some(d);
    }

    /// How many times this call site's effect has run.
    pub fn runs(&self) -> usize {
        self.runs.get()
    }
}

/// Remembers the cell for this call site and hooks its cleanup to the
/// current scope the first time through.
fn effect_cell() -> Rc<EffectCell> {
    let cell = remember(EffectCell::default);
    if !cell.installed.replace(true) {
        match current_scope() {
            Some(scope) => {
                let cell = cell.clone();
                scope.add_disposer(move || cell.run_cleanup());
            }
            None => log::warn!("effect registered without a scope; it will not be cleaned up"),
        }
    }
    cell
}

fn enqueue(
    cell: Rc<EffectCell>,
    effect: impl FnOnce() -> Dispose + 'static,
    on_commit: Option<Box<dyn FnOnce()>>,
) {
    with_active("use_effect", |active| {
        active.pending.borrow_mut().push(PendingEffect {
            cell,
            effect: Box::new(effect),
            on_commit,
        });
    });
}

/// Runs `effect` after every commit of the current composition.
///
/// Before each run after the first, the `Dispose` returned by the previous
/// run is invoked. The last one runs when the composition unmounts.
///
/// Call sites are handled one at a time: with two effects the commit runs
/// cleanup 1, effect 1, cleanup 2, effect 2 (not all cleanups first).
pub fn use_effect(effect: impl FnOnce() -> Dispose + 'static) -> Rc<EffectCell> {
    let cell = effect_cell();
    enqueue(cell.clone(), effect, None);
    cell
}

/// Like [`use_effect`], but only queued when `key` differs from the key
/// committed with the previous run. The first render always runs.
///
/// The key is recorded when the effect commits, so a render that unwinds
/// (or a commit cut short by an earlier panicking effect) leaves it unchanged.
pub fn use_keyed_effect<K: PartialEq + 'static>(
    key: K,
    effect: impl FnOnce() -> Dispose + 'static,
) -> Rc<EffectCell> {
    let last_key = remember(|| RefCell::new(None::<K>));
    let cell = effect_cell();

    let changed = last_key.borrow().as_ref() != Some(&key);
    if changed {
        let record = move || *last_key.borrow_mut() = Some(key);
        enqueue(cell.clone(), effect, Some(Box::new(record)));
    }
    cell
}
