//! Event routing to systems.
//!
//! Routes are resolved once per system, when it is added: for every event
//! the dispatcher records which call forms the system declared. Delivery then
//! walks the route list of the event in declared system order, calling the
//! plain form before the contextual one for a system that declared both.
//! Delivery is strictly sequential and stops at the first failing handler.

use tracing::{error, trace};

use crate::context::Context;
use crate::event::Event;
use crate::system::System;

/// Which handler a route calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CallForm {
    Plain,
    Contextual,
}

#[derive(Debug, Clone, Copy)]
struct Route {
    system: usize,
    form: CallForm,
}

/// An ordered list of systems plus their per-event routes.
#[derive(Default)]
pub struct Dispatcher {
    systems: Vec<Box<dyn System>>,
    routes: [Vec<Route>; Event::COUNT],
}

impl Dispatcher {
    /// Create an empty dispatcher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a system and resolve its routes.
    pub fn push(&mut self, system: Box<dyn System>) {
        let index = self.systems.len();
        for event in Event::ALL {
            let interest = system.interest(event);
            let routes = &mut self.routes[event.index()];
            if interest.plain {
                routes.push(Route {
                    system: index,
                    form: CallForm::Plain,
                });
            }
            if interest.contextual {
                routes.push(Route {
                    system: index,
                    form: CallForm::Contextual,
                });
            }
        }
        self.systems.push(system);
    }

    /// Builder form of [`Dispatcher::push`].
    #[must_use]
    pub fn with_system(mut self, system: impl System + 'static) -> Self {
        self.push(Box::new(system));
        self
    }

    /// Number of systems.
    #[must_use]
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    /// Returns `true` if there are no systems.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    /// System names in declared order.
    #[must_use]
    pub fn system_names(&self) -> Vec<&str> {
        self.systems.iter().map(|system| system.name()).collect()
    }

    /// Number of handler calls one delivery of `event` makes.
    #[must_use]
    pub fn route_count(&self, event: Event) -> usize {
        self.routes[event.index()].len()
    }

    /// Deliver `event` to every interested system.
    ///
    /// # Errors
    ///
    /// The first handler error, returned unmodified. Systems after the
    /// failing one are not called.
    pub fn dispatch(&mut self, event: Event, ctx: &mut Context<'_>) -> anyhow::Result<()> {
        for route in &self.routes[event.index()] {
            let Some(system) = self.systems.get_mut(route.system) else {
                continue;
            };
            trace!(system = system.name(), %event, form = ?route.form, "delivering event");
            let result = match route.form {
                CallForm::Plain => system.on_event(event),
                CallForm::Contextual => system.on_event_with_context(event, ctx),
            };
            if let Err(err) = result {
                error!(
                    system = system.name(),
                    %event,
                    cycle = ctx.cycle(),
                    error = %err,
                    "system failed"
                );
                return Err(err);
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("systems", &self.system_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use sim_component::Directory;

    use super::*;
    use crate::system::Interest;

    type Log = Rc<RefCell<Vec<String>>>;

    struct Probe {
        label: &'static str,
        interest: Interest,
        log: Log,
    }

    impl System for Probe {
        fn name(&self) -> &str {
            self.label
        }

        fn interest(&self, event: Event) -> Interest {
            if event == Event::Cycle {
                self.interest
            } else {
                Interest::NONE
            }
        }

        fn on_event(&mut self, event: Event) -> anyhow::Result<()> {
            self.log
                .borrow_mut()
                .push(format!("{}:{event}", self.label));
            Ok(())
        }

        fn on_event_with_context(
            &mut self,
            event: Event,
            ctx: &mut Context<'_>,
        ) -> anyhow::Result<()> {
            self.log
                .borrow_mut()
                .push(format!("{}:{event}@{}", self.label, ctx.cycle()));
            Ok(())
        }
    }

    struct Failing;

    impl System for Failing {
        fn interest(&self, _event: Event) -> Interest {
            Interest::PLAIN
        }

        fn on_event(&mut self, _event: Event) -> anyhow::Result<()> {
            anyhow::bail!("boom")
        }
    }

    fn probe(label: &'static str, interest: Interest, log: &Log) -> Probe {
        Probe {
            label,
            interest,
            log: Rc::clone(log),
        }
    }

    #[test]
    fn test_routes_resolved_on_push() {
        let log = Log::default();
        let dispatcher = Dispatcher::new()
            .with_system(probe("a", Interest::PLAIN, &log))
            .with_system(probe("b", Interest::BOTH, &log))
            .with_system(probe("c", Interest::NONE, &log));
        assert_eq!(dispatcher.len(), 3);
        assert_eq!(dispatcher.route_count(Event::Cycle), 3);
        assert_eq!(dispatcher.route_count(Event::Render), 0);
        assert_eq!(dispatcher.system_names(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_declared_order_and_call_forms() {
        let log = Log::default();
        let mut dispatcher = Dispatcher::new()
            .with_system(probe("a", Interest::CONTEXTUAL, &log))
            .with_system(probe("b", Interest::BOTH, &log))
            .with_system(probe("c", Interest::PLAIN, &log));
        let directory = Directory::new();
        let mut ctx = Context::new(4, &directory);

        dispatcher.dispatch(Event::Cycle, &mut ctx).unwrap();
        dispatcher.dispatch(Event::Render, &mut ctx).unwrap();

        assert_eq!(
            *log.borrow(),
            vec!["a:cycle@4", "b:cycle", "b:cycle@4", "c:cycle"]
        );
    }

    #[test]
    fn test_failure_stops_delivery() {
        let log = Log::default();
        let mut dispatcher = Dispatcher::new()
            .with_system(Failing)
            .with_system(probe("after", Interest::PLAIN, &log));
        let directory = Directory::new();
        let mut ctx = Context::new(0, &directory);

        let err = dispatcher.dispatch(Event::Cycle, &mut ctx).unwrap_err();
        assert_eq!(err.to_string(), "boom");
        assert!(log.borrow().is_empty());
    }
}
