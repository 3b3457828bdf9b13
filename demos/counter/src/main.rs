use std::rc::Rc;

use recur_core::{Composition, CompositionConfig, Signal, use_signal};
use recur_hooks::{EveryUpdate, use_on_every_update};

/// Stand-in for something a component subscribes to while it is on screen.
struct Subscription {
    topic: String,
    render: i32,
}

impl Subscription {
    fn unsubscribe(&self) {
        log::info!("unsubscribed from '{}' (render {})", self.topic, self.render);
    }
}

fn counter() -> Signal<i32> {
    let count = use_signal(|| 0);
    let current = count.get();

    use_on_every_update(
        EveryUpdate::new(move || {
            log::info!("count is now {current}; subscribing");
            Rc::new(Subscription {
                topic: "count".to_string(),
                render: current,
            })
        })
        .with_cleanup(|sub: Rc<Subscription>| sub.unsubscribe()),
    );

    count
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut comp = Composition::with_config(CompositionConfig {
        name: "counter".to_string(),
        ..Default::default()
    });

    let count = comp.render(counter)?;
    for _ in 0..3 {
        count.update(|c| *c += 1);
        comp.settle(counter)?;
    }
    comp.unmount()?;

    log::info!("rendered {} time(s), final count {}", comp.render_count(), count.get());
    Ok(())
}
