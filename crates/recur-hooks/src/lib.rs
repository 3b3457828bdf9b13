//! Lifecycle hooks layered on `recur-core`.
//!
//! [`use_on_every_update`] runs a side effect after every commit of the
//! composition calling it, with no dependency gating, and hands the side
//! effect's result to an optional cleanup before the next run and at unmount.
//!
//! ```rust
//! use recur_core::Composition;
//! use recur_hooks::{EveryUpdate, use_on_every_update};
//!
//! let mut comp = Composition::new();
//! for _ in 0..3 {
//!     comp.render(|| {
//!         use_on_every_update(
//!             EveryUpdate::new(|| log::info!("rendered"))
//!                 .with_cleanup(|()| log::info!("before next render")),
//!         );
//!     })
//!     .unwrap();
//! }
//! comp.unmount().unwrap();
//! ```

pub mod every_update;

pub use every_update::*;
