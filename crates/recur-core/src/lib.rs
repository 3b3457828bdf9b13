//! # Compositions, Slots, and Effects
//!
//! Recur models a component instance as a [`Composition`]. Rendering one runs
//! a closure with the composition installed as the active one, so the hooks
//! called inside can find their state:
//!
//! - `remember*` — storage bound to the composition, addressed by call order
//!   (or by key).
//! - `use_signal` — observable state whose writes mark the composition dirty.
//! - `use_effect` / `use_keyed_effect` — side effects that run after the
//!   render has committed, with a `Dispose` cleanup.
//!
//! ## Render, commit, unmount
//!
//! ```rust
//! use recur_core::*;
//!
//! let mut comp = Composition::new();
//! comp.render(|| {
//!     let renders = remember(|| std::cell::Cell::new(0));
//!     renders.set(renders.get() + 1);
//!
//!     use_effect(|| {
//!         log::info!("committed");
//!         on_unmount(|| log::info!("cleaned up"))
//!     });
//! })
//! .unwrap();
//! comp.unmount().unwrap();
//! ```
//!
//! - Effects queued by `use_effect` run after the render closure returns, in
//!   call order. Before a call site's effect runs again, the `Dispose` from
//!   its previous run is invoked.
//! - `unmount` disposes the composition's scope, which runs each call site's
//!   last `Dispose` exactly once.
//! - `settle` keeps rendering while something (typically a signal) has
//!   invalidated the composition.
//!
//! Panics raised by render closures, effects, or cleanups are not caught by
//! the runtime; wrap the call in [`error_boundary`] to recover from them.

pub mod commit;
pub mod effects;
pub mod error;
pub mod runtime;
pub mod scope;
pub mod signal;

pub use commit::*;
pub use effects::*;
pub use error::*;
pub use runtime::*;
pub use scope::*;
pub use signal::*;
