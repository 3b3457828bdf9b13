use recur_core::{Dispose, use_effect};

/// Options for [`use_on_every_update`].
///
/// `C` defaults to a plain function pointer so that `EveryUpdate::new` works
/// without naming a cleanup type.
pub struct EveryUpdate<S, C> {
    pub side_effect: S,
    pub cleanup: Option<C>,
}

impl<S, R> EveryUpdate<S, fn(R)>
where
    S: FnOnce() -> R,
{
    pub fn new(side_effect: S) -> Self {
        Self {
            side_effect,
            cleanup: None,
        }
    }
}

impl<S, C> EveryUpdate<S, C> {
    pub fn with_cleanup<R, C2>(self, cleanup: C2) -> EveryUpdate<S, C2>
    where
        S: FnOnce() -> R,
        C2: FnOnce(R),
    {
        EveryUpdate {
            side_effect: self.side_effect,
            cleanup: Some(cleanup),
        }
    }

    pub fn has_cleanup(&self) -> bool {
        self.cleanup.is_some()
    }
}

/// Runs `opts.side_effect` after every commit of the current composition.
///
/// Before the next run, and once when the composition unmounts, the cleanup
/// (if any) receives the value returned by the run it follows. A panic in
/// either closure unwinds to whoever drove the render or unmount.
pub fn use_on_every_update<S, C, R>(opts: EveryUpdate<S, C>)
where
    S: FnOnce() -> R + 'static,
    C: FnOnce(R) + 'static,
    R: 'static,
{
    let EveryUpdate {
        side_effect,
        cleanup,
    } = opts;

    use_effect(move || {
        let result = side_effect();
        Dispose::new(move || {
            match cleanup {
                Some(cleanup) => cleanup(result),
                None => log::trace!("every-update effect has no cleanup"),
            }
        })
    });
}

/// Shorthand for `use_on_every_update(EveryUpdate::new(side_effect).with_cleanup(cleanup))`.
pub fn use_on_every_update_with<S, C, R>(side_effect: S, cleanup: C)
where
    S: FnOnce() -> R + 'static,
    C: FnOnce(R) + 'static,
    R: 'static,
{
    use_on_every_update(EveryUpdate::new(side_effect).with_cleanup(cleanup));
}
