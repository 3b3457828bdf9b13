use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::commit::PendingEffects;
use crate::error::RuntimeError;
use crate::scope::Scope;

thread_local! {
    /// Compositions currently rendering, innermost last.
    static ACTIVE: RefCell<Vec<Active>> = const { RefCell::new(Vec::new()) };
}

#[derive(Default)]
pub struct Composer {
    pub slots: Vec<Box<dyn Any>>,
    pub cursor: usize,
    pub keyed_slots: HashMap<String, Box<dyn Any>>,
}

/// What a rendering composition exposes to the hooks called inside it.
#[derive(Clone)]
pub(crate) struct Active {
    pub(crate) name: Rc<str>,
    pub(crate) composer: Rc<RefCell<Composer>>,
    pub(crate) pending: Rc<RefCell<PendingEffects>>,
    pub(crate) invalidator: Invalidator,
}

pub(crate) fn with_active<R>(hook: &str, f: impl FnOnce(&Active) -> R) -> R {
    let active = ACTIVE.with(|stack| stack.borrow().last().cloned());
    match active {
        Some(active) => f(&active),
        None => panic!("{hook} called outside of a composition; hooks only work inside `Composition::render`"),
    }
}

/// Keeps a composition on the active stack for the duration of a render.
pub struct ComposeGuard {
    _private: (),
}

impl ComposeGuard {
    pub(crate) fn begin(active: Active) -> Self {
        active.composer.borrow_mut().cursor = 0;
        ACTIVE.with(|stack| stack.borrow_mut().push(active));
        ComposeGuard { _private: () }
    }
}

impl Drop for ComposeGuard {
    fn drop(&mut self) {
        ACTIVE.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

/// Slot-based remember (sequential composition only)
pub fn remember<T: 'static>(init: impl FnOnce() -> T) -> Rc<T> {
    with_active("remember", |active| {
        let mut c = active.composer.borrow_mut();
        let cursor = c.cursor;
        c.cursor += 1;

        if cursor >= c.slots.len() {
            let rc: Rc<T> = Rc::new(init());
            c.slots.push(Box::new(rc.clone()));
            return rc;
        }

        if let Some(rc) = c.slots[cursor].downcast_ref::<Rc<T>>() {
            rc.clone()
        } else {
            log::warn!(
                "{}: remember slot {} type changed; replacing. \
                 If this is due to conditional composition, prefer remember_with_key.",
                active.name,
                cursor
            );
            let rc: Rc<T> = Rc::new(init());
            c.slots[cursor] = Box::new(rc.clone());
            rc
        }
    })
}

/// Key-based remember
pub fn remember_with_key<T: 'static>(key: impl Into<String>, init: impl FnOnce() -> T) -> Rc<T> {
    with_active("remember_with_key", |active| {
        let mut c = active.composer.borrow_mut();
        let key = key.into();

        if let Some(existing) = c.keyed_slots.get(&key) {
            if let Some(rc) = existing.downcast_ref::<Rc<T>>() {
                return rc.clone();
            }
            log::warn!(
                "{}: remember_with_key: key '{}' reused with a different type; replacing.",
                active.name,
                key
            );
        }

        let rc: Rc<T> = Rc::new(init());
        c.keyed_slots.insert(key, Box::new(rc.clone()));
        rc
    })
}

pub fn remember_state<T: 'static>(init: impl FnOnce() -> T) -> Rc<RefCell<T>> {
    remember(|| RefCell::new(init()))
}

pub fn remember_state_with_key<T: 'static>(
    key: impl Into<String>,
    init: impl FnOnce() -> T,
) -> Rc<RefCell<T>> {
    remember_with_key(key, || RefCell::new(init()))
}

/// Handle that asks a composition to render again.
#[derive(Clone, Default)]
pub struct Invalidator(Rc<Cell<bool>>);

impl Invalidator {
    pub fn invalidate(&self) {
        self.0.set(true);
    }

    pub fn is_dirty(&self) -> bool {
        self.0.get()
    }

    fn clear(&self) {
        self.0.set(false);
    }
}

/// Invalidator of the composition currently rendering.
pub fn current_invalidator() -> Invalidator {
    with_active("current_invalidator", |active| active.invalidator.clone())
}

#[derive(Clone, Debug)]
pub struct CompositionConfig {
    /// Shown in log lines and errors.
    pub name: String,
    /// Upper bound on renders performed by a single `settle` call.
    pub max_recompositions: usize,
}

impl Default for CompositionConfig {
    fn default() -> Self {
        Self {
            name: "composition".to_string(),
            max_recompositions: 100,
        }
    }
}

/// One mounted component instance: its slots, its teardown scope, and the
/// effects queued by its current render.
pub struct Composition {
    config: CompositionConfig,
    name: Rc<str>,
    composer: Rc<RefCell<Composer>>,
    pending: Rc<RefCell<PendingEffects>>,
    invalidator: Invalidator,
    scope: Option<Scope>,
    renders: usize,
}

impl Composition {
    pub fn new() -> Self {
        Self::with_config(CompositionConfig::default())
    }

    pub fn with_config(config: CompositionConfig) -> Self {
        let invalidator = Invalidator::default();
        // Nothing has been rendered yet.
        invalidator.invalidate();
        Self {
            name: Rc::from(config.name.as_str()),
            config,
            composer: Rc::new(RefCell::new(Composer::default())),
            pending: Rc::new(RefCell::new(PendingEffects::new())),
            invalidator,
            scope: Some(Scope::new()),
            renders: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &CompositionConfig {
        &self.config
    }

    pub fn is_mounted(&self) -> bool {
        self.scope.is_some()
    }

    pub fn render_count(&self) -> usize {
        self.renders
    }

    pub fn invalidator(&self) -> Invalidator {
        self.invalidator.clone()
    }

    pub fn invalidate(&self) {
        self.invalidator.invalidate();
    }

    pub fn is_dirty(&self) -> bool {
        self.invalidator.is_dirty()
    }

    fn unmounted(&self) -> RuntimeError {
        RuntimeError::Unmounted {
            name: self.config.name.clone(),
        }
    }

    /// Renders `content`, then commits: effects queued during the render run
    /// in call order once `content` has returned.
    ///
    /// Panics from `content` or from effects unwind to the caller untouched.
    pub fn render<R>(&mut self, content: impl FnOnce() -> R) -> Result<R, RuntimeError> {
        let scope = self.scope.clone().ok_or_else(|| self.unmounted())?;

        self.invalidator.clear();
        // Leftovers from a render that unwound never committed.
        self.pending.borrow_mut().clear();

        let output = {
            let _guard = ComposeGuard::begin(Active {
                name: self.name.clone(),
                composer: self.composer.clone(),
                pending: self.pending.clone(),
                invalidator: self.invalidator.clone(),
            });
            scope.run(content)
        };
        self.renders += 1;
        log::trace!("{}: render #{} complete", self.name, self.renders);

        self.commit();
        Ok(output)
    }

    fn commit(&self) {
        let queued = std::mem::take(&mut *self.pending.borrow_mut());
        log::trace!("{}: committing {} effect(s)", self.name, queued.len());
        for effect in queued {
            effect.run();
        }
    }

    /// Renders while the composition is dirty. Returns the number of renders.
    pub fn settle<R>(&mut self, mut content: impl FnMut() -> R) -> Result<usize, RuntimeError> {
        if !self.is_mounted() {
            return Err(self.unmounted());
        }
        let mut renders = 0;
        while self.is_dirty() {
            if renders >= self.config.max_recompositions {
                return Err(RuntimeError::RecompositionLimit {
                    name: self.config.name.clone(),
                    limit: self.config.max_recompositions,
                });
            }
            self.render(&mut content)?;
            renders += 1;
        }
        log::debug!("{}: settled after {} render(s)", self.name, renders);
        Ok(renders)
    }

    /// Runs every outstanding cleanup once and drops all remembered state.
    pub fn unmount(&mut self) -> Result<(), RuntimeError> {
        let scope = self.scope.take().ok_or_else(|| self.unmounted())?;
        log::trace!(
            "{}: unmounting after {} render(s), {} disposer(s)",
            self.name,
            self.renders,
            scope.disposer_count()
        );
        self.pending.borrow_mut().clear();
        scope.dispose();
        let mut composer = self.composer.borrow_mut();
        composer.slots.clear();
        composer.keyed_slots.clear();
        composer.cursor = 0;
        Ok(())
    }
}

impl Default for Composition {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Composition {
    fn drop(&mut self) {
        if std::thread::panicking() {
            // A cleanup panicking while we already unwind would abort.
            if let Some(scope) = self.scope.take() {
                log::warn!("{}: dropped while panicking; skipping cleanups", self.name);
                scope.discard();
            }
        } else if self.is_mounted() {
            let _ = self.unmount();
        }
    }
}
