use std::{pin::pin, rc::Rc, time::Duration};

use futures::{
    future::{self, select, Either, LocalBoxFuture},
    stream::FuturesUnordered,
    FutureExt, Stream, StreamExt,
};
use shared::{
    error::SubmitError,
    protocol::{EventOutcome, PageEvent, Subscription},
    surface::PageSurface,
};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, trace};

use crate::{
    config::ControllerConfig,
    controller::PageController,
    status::StatusTicket,
    submit::ContactSubmitter,
    units::Effect,
};

#[derive(Debug, Clone, Copy)]
struct PendingHide {
    deadline: Instant,
    ticket: StatusTicket,
}

type Submission = LocalBoxFuture<'static, Result<(), SubmitError>>;

/// Work the loop owns besides incoming events.
enum Wake {
    HideDue,
    Submitted(Result<(), SubmitError>),
}

enum Turn {
    Event(Option<PageEvent>),
    Wake(Wake),
}

/// Serializes page handling: one event at a time, at most one pending status
/// hide. Submissions run alongside and never hold up later events.
pub struct EventLoop<S, C> {
    surface: S,
    controller: PageController,
    submitter: Rc<C>,
    pending_hide: Option<PendingHide>,
    in_flight: FuturesUnordered<Submission>,
}

impl<S, C> EventLoop<S, C>
where
    S: PageSurface,
    C: ContactSubmitter + 'static,
{
    pub fn attach(surface: S, config: &ControllerConfig, submitter: C) -> Self {
        let controller = PageController::attach(&surface, config);
        Self {
            surface,
            controller,
            submitter: Rc::new(submitter),
            pending_hide: None,
            in_flight: FuturesUnordered::new(),
        }
    }

    pub fn subscriptions(&self) -> Vec<Subscription> {
        self.controller.subscriptions()
    }

    /// Handles one event. A submission it starts is polled once here; if it
    /// cannot finish right away it completes during `run`, `idle` or `settle`.
    pub fn dispatch(&mut self, event: PageEvent) -> EventOutcome {
        self.fire_due_hide();
        self.collect_finished();
        trace!(kind = ?event.kind(), target = ?event.target(), "dispatching page event");
        let reaction = self.controller.handle(&mut self.surface, &event);
        if let Some(effect) = reaction.effect {
            self.apply(effect);
        }
        reaction.outcome
    }

    /// Consumes `events` until the stream ends. The status hide and finished
    /// submissions are handled whenever they come due between events.
    pub async fn run<E>(&mut self, mut events: E)
    where
        E: Stream<Item = PageEvent> + Unpin,
    {
        loop {
            let turn = {
                let wake = pin!(self.next_wake());
                match select(events.next(), wake).await {
                    Either::Left((event, _)) => Turn::Event(event),
                    Either::Right((wake, _)) => Turn::Wake(wake),
                }
            };
            match turn {
                Turn::Event(Some(event)) => {
                    self.dispatch(event);
                }
                Turn::Event(None) => break,
                Turn::Wake(wake) => self.on_wake(wake),
            }
        }
    }

    /// Lets `duration` pass with no input.
    pub async fn idle(&mut self, duration: Duration) {
        let until = Instant::now() + duration;
        loop {
            let wake = {
                let wake = pin!(self.next_wake());
                match select(wake, pin!(sleep_until(until))).await {
                    Either::Left((wake, _)) => Some(wake),
                    Either::Right(((), _)) => None,
                }
            };
            match wake {
                Some(wake) => self.on_wake(wake),
                None => break,
            }
        }
        self.fire_due_hide();
        self.collect_finished();
    }

    /// Waits until no submission is in flight and no status hide is pending.
    pub async fn settle(&mut self) {
        while self.pending_hide.is_some() || !self.in_flight.is_empty() {
            let wake = self.next_wake().await;
            self.on_wake(wake);
        }
    }

    /// Waits for in-flight submissions only, firing any hide due meanwhile.
    pub async fn finish_submissions(&mut self) {
        while !self.in_flight.is_empty() {
            let wake = self.next_wake().await;
            self.on_wake(wake);
        }
    }

    pub fn has_pending_hide(&self) -> bool {
        self.pending_hide.is_some()
    }

    pub fn submissions_in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn controller(&self) -> &PageController {
        &self.controller
    }

    fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::Submit { form, payload } => {
                debug!(form = form.0, "starting contact submission");
                let submitter = Rc::clone(&self.submitter);
                self.in_flight
                    .push(async move { submitter.submit(&payload).await }.boxed_local());
                self.collect_finished();
            }
            Effect::ScheduleStatusHide(ticket) => self.schedule_hide(ticket),
        }
    }

    /// Resolves at the hide deadline or when a submission finishes. Never
    /// resolves while there is neither.
    async fn next_wake(&mut self) -> Wake {
        let hide = match self.pending_hide {
            Some(pending) => Either::Left(sleep_until(pending.deadline)),
            None => Either::Right(future::pending::<()>()),
        };
        let in_flight = &mut self.in_flight;
        let submission = async move {
            match in_flight.next().await {
                Some(result) => result,
                None => future::pending().await,
            }
        };
        match select(pin!(hide), pin!(submission)).await {
            Either::Left(((), _)) => Wake::HideDue,
            Either::Right((result, _)) => Wake::Submitted(result),
        }
    }

    fn on_wake(&mut self, wake: Wake) {
        match wake {
            Wake::HideDue => self.fire_due_hide(),
            Wake::Submitted(result) => self.finish_submission(result),
        }
    }

    /// Completes every submission that is already done without waiting.
    fn collect_finished(&mut self) {
        while let Some(Some(result)) = self.in_flight.next().now_or_never() {
            self.finish_submission(result);
        }
    }

    fn finish_submission(&mut self, result: Result<(), SubmitError>) {
        debug!(ok = result.is_ok(), "contact submission finished");
        if let Some(ticket) = self.controller.finish_submission(&mut self.surface, result) {
            self.schedule_hide(ticket);
        }
    }

    fn schedule_hide(&mut self, ticket: StatusTicket) {
        let pending = PendingHide {
            deadline: Instant::now() + ticket.hide_after,
            ticket,
        };
        if let Some(replaced) = self.pending_hide.replace(pending) {
            debug!(
                replaced = replaced.ticket.generation,
                generation = ticket.generation,
                "cancelled pending status hide"
            );
        }
    }

    fn fire_due_hide(&mut self) {
        let Some(pending) = self.pending_hide else {
            return;
        };
        if Instant::now() < pending.deadline {
            return;
        }
        self.pending_hide = None;
        if self.controller.expire_status(&mut self.surface, pending.ticket) {
            debug!(generation = pending.ticket.generation, "status hidden");
        }
    }
}
