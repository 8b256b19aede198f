//! The FSM router: state machine, route table and dispatch in one handle.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use arc_swap::ArcSwap;
use tokio::task::JoinHandle;
use tracing::Instrument;
use uuid::Uuid;

use crate::engine::queue::{Admission, CycleGuard, DispatchQueue};
use crate::engine::snapshot::{RouteView, RouterSnapshot, TransitionView};
use crate::engine::SameStatePolicy;
use crate::error::{RouterError, RouterResult};
use crate::fsm::{AfterHook, BeforeHook, StateHook, StateMachine};
use crate::navigation::NavigationSource;
use crate::routing::{
    Availability, Handler, Navigation, Params, Pattern, RouteEntry, RouteTable, Special,
    SpecialHandlers,
};

struct Inner {
    machine: StateMachine,
    routes: ArcSwap<RouteTable>,
    specials: ArcSwap<SpecialHandlers>,
    queue: DispatchQueue,
    source: Option<Arc<dyn NavigationSource>>,
    policy: SameStatePolicy,
}

/// Shared handle to a router. Clones refer to the same engine, so hooks and
/// handlers may capture one and call back in.
#[derive(Clone)]
pub struct FsmRouter {
    inner: Arc<Inner>,
}

/// Builder for [`FsmRouter`].
pub struct RouterBuilder {
    initial: String,
    source: Option<Arc<dyn NavigationSource>>,
    policy: SameStatePolicy,
}

impl RouterBuilder {
    /// Navigation source read by `check_hash` and written by `trigger`.
    pub fn source(mut self, source: Arc<dyn NavigationSource>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn same_state_policy(mut self, policy: SameStatePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn build(self) -> FsmRouter {
        tracing::debug!(initial = %self.initial, policy = ?self.policy, "Router created");
        FsmRouter {
            inner: Arc::new(Inner {
                machine: StateMachine::new(self.initial),
                routes: ArcSwap::from_pointee(RouteTable::new()),
                specials: ArcSwap::from_pointee(SpecialHandlers::default()),
                queue: DispatchQueue::default(),
                source: self.source,
                policy: self.policy,
            }),
        }
    }
}

impl FsmRouter {
    /// A router with no navigation source, starting in `initial`.
    pub fn new(initial: impl Into<String>) -> Self {
        Self::builder(initial).build()
    }

    pub fn builder(initial: impl Into<String>) -> RouterBuilder {
        RouterBuilder {
            initial: initial.into(),
            source: None,
            policy: SameStatePolicy::default(),
        }
    }

    // --- State graph ---

    pub fn state_add(&self, state: &str) -> bool {
        self.inner.machine.state_add(state)
    }

    pub fn state_del(&self, state: &str) -> bool {
        self.inner.machine.state_del(state)
    }

    pub fn state_on_enter_add(&self, state: &str, hook: StateHook) -> bool {
        self.inner.machine.state_on_enter_add(state, hook)
    }

    pub fn state_on_enter_del(&self, state: &str, hook: &StateHook) -> bool {
        self.inner.machine.state_on_enter_del(state, hook)
    }

    pub fn state_on_leave_add(&self, state: &str, hook: StateHook) -> bool {
        self.inner.machine.state_on_leave_add(state, hook)
    }

    pub fn state_on_leave_del(&self, state: &str, hook: &StateHook) -> bool {
        self.inner.machine.state_on_leave_del(state, hook)
    }

    // --- Transitions ---

    pub fn transition_add(&self, from: &str, to: &str) -> bool {
        self.inner.machine.transition_add(from, to)
    }

    pub fn transition_del(&self, from: &str, to: &str) -> bool {
        self.inner.machine.transition_del(from, to)
    }

    pub fn transition_on_before_add(&self, from: &str, to: &str, hook: BeforeHook) -> bool {
        self.inner.machine.transition_on_before_add(from, to, hook)
    }

    pub fn transition_on_before_del(&self, from: &str, to: &str, hook: &BeforeHook) -> bool {
        self.inner.machine.transition_on_before_del(from, to, hook)
    }

    pub fn transition_on_after_add(&self, from: &str, to: &str, hook: AfterHook) -> bool {
        self.inner.machine.transition_on_after_add(from, to, hook)
    }

    pub fn transition_on_after_del(&self, from: &str, to: &str, hook: &AfterHook) -> bool {
        self.inner.machine.transition_on_after_del(from, to, hook)
    }

    pub fn state_get(&self) -> String {
        self.inner.machine.state_get()
    }

    /// See [`StateMachine::state_set`].
    pub async fn state_set(&self, next: &str) -> bool {
        self.inner.machine.state_set(next).await
    }

    pub fn check_transition(&self, next: &str) -> bool {
        self.inner.machine.check_transition(next)
    }

    // --- Route table ---

    /// Install an engine-wide fallback handler for code 403, 404 or 500.
    pub fn route_special_add(&self, code: u16, handler: Handler) -> RouterResult<()> {
        let special = Special::try_from(code)?;
        self.inner.specials.rcu(|current| {
            let mut specials = SpecialHandlers::clone(current);
            specials.set(special, handler.clone());
            specials
        });
        tracing::debug!(code, "Special handler installed");
        Ok(())
    }

    /// Register `pattern` for `state` (`None`: any state).
    ///
    /// `Ok(false)` means an equivalent route is already registered.
    pub fn route_add(
        &self,
        state: Option<&str>,
        pattern: &str,
        handler: Handler,
    ) -> RouterResult<bool> {
        self.route_add_with(state, pattern, handler, None, None)
    }

    /// Like [`route_add`](Self::route_add), with an availability predicate
    /// and a per-route forbidden handler.
    pub fn route_add_with(
        &self,
        state: Option<&str>,
        pattern: &str,
        handler: Handler,
        available: Option<Availability>,
        forbidden: Option<Handler>,
    ) -> RouterResult<bool> {
        if let Some(state) = state {
            if !self.inner.machine.has_state(state) {
                return Err(RouterError::UnknownState(state.to_string()));
            }
        }
        let pattern = Pattern::parse(pattern)?;
        let entry = RouteEntry {
            available,
            forbidden,
            ..RouteEntry::new(pattern, state.map(str::to_string), handler)
        };

        let mut added = false;
        self.inner.routes.rcu(|current| {
            let mut table = RouteTable::clone(current);
            added = table.insert(entry.clone());
            table
        });

        if added {
            tracing::info!(
                route = %entry.pattern,
                weight = entry.pattern.weight(),
                state = ?entry.state,
                "Route added"
            );
        } else {
            tracing::debug!(route = %entry.pattern, "Equivalent route already registered");
        }
        Ok(added)
    }

    /// Remove the route equivalent to `pattern`.
    pub fn route_del(&self, pattern: &str) -> RouterResult<bool> {
        let pattern = Pattern::parse(pattern)?;
        let mut removed = false;
        self.inner.routes.rcu(|current| {
            let mut table = RouteTable::clone(current);
            removed = table.remove(&pattern);
            table
        });
        Ok(removed)
    }

    // --- Navigation ---

    /// Point the navigation source at `path` unless it is already there.
    pub fn trigger(&self, path: &str) -> RouterResult<()> {
        let Some(source) = &self.inner.source else {
            tracing::warn!(path, "No navigation source configured, trigger ignored");
            return Ok(());
        };
        let fragment = format!("#{path}");
        if source.current() != fragment {
            source.set(&fragment)?;
        }
        Ok(())
    }

    /// Read the navigation source and route its path, if any.
    pub async fn check_hash(&self) {
        let Some(source) = &self.inner.source else {
            return;
        };
        let fragment = source.current();
        let path = fragment.strip_prefix('#').unwrap_or_default();
        if !path.is_empty() {
            self.route(path).await;
        }
    }

    /// Route `path`, or queue it behind the cycle already in progress.
    ///
    /// The caller that starts a cycle also drains every path queued while it
    /// runs; a queued call returns immediately.
    pub async fn route(&self, path: impl Into<String>) {
        match self.inner.queue.admit(path.into()) {
            Admission::Run(path) => self.drain(path).await,
            Admission::Queued(depth) => tracing::debug!(depth, "Routing in progress, path queued"),
        }
    }

    /// True while a routing cycle (or its queue drain) is running.
    pub fn is_routing(&self) -> bool {
        self.inner.queue.is_routing()
    }

    /// Feed every change of the navigation source into the router until
    /// `shutdown` resolves.
    pub fn listen<S>(&self, shutdown: S) -> RouterResult<JoinHandle<()>>
    where
        S: Future<Output = ()> + Send + 'static,
    {
        let source = self.inner.source.clone().ok_or(RouterError::NoSource)?;
        let mut changes = source.subscribe()?;
        let router = self.clone();

        Ok(tokio::spawn(async move {
            tokio::pin!(shutdown);
            tracing::info!("Navigation listener started");
            loop {
                tokio::select! {
                    changed = changes.changed() => {
                        if changed.is_err() {
                            tracing::info!("Navigation source closed, listener exiting");
                            break;
                        }
                        let fragment = changes.borrow_and_update().clone();
                        router.admit_fragment(&fragment);
                    }
                    _ = &mut shutdown => {
                        tracing::info!("Navigation listener received shutdown signal, exiting loop");
                        break;
                    }
                }
            }
        }))
    }

    /// Queue a fragment in arrival order; spawn the drain if it starts a cycle.
    fn admit_fragment(&self, fragment: &str) {
        let path = fragment.strip_prefix('#').unwrap_or_default();
        if path.is_empty() {
            return;
        }
        match self.inner.queue.admit(path.to_string()) {
            Admission::Run(path) => {
                let router = self.clone();
                tokio::spawn(async move { router.drain(path).await });
            }
            Admission::Queued(depth) => tracing::debug!(depth, "Routing in progress, path queued"),
        }
    }

    async fn drain(&self, first: String) {
        let guard = CycleGuard::new(&self.inner.queue);
        let mut next = Some(first);
        while let Some(path) = next {
            let span = tracing::info_span!("routing_cycle", cycle_id = %Uuid::new_v4(), path = %path);
            self.cycle(&path).instrument(span).await;
            next = self.inner.queue.next();
        }
        guard.disarm();
    }

    /// One resolution-and-dispatch pass.
    async fn cycle(&self, path: &str) {
        let table = self.inner.routes.load_full();
        let specials = self.inner.specials.load_full();
        let mut navigation = Navigation {
            route: String::new(),
            path: path.to_string(),
            params: Params::new(),
        };

        let resolved = match table.find(path) {
            Some((route, params)) => {
                navigation.route = route.pattern.canonical().to_string();
                navigation.params = params;
                tracing::debug!(route = %navigation.route, "Route matched");
                self.resolve(&route, &navigation, &specials).await
            }
            None => {
                tracing::debug!("No route matched");
                None
            }
        };

        let handler = resolved
            .or_else(|| specials.not_found.clone())
            .or_else(|| specials.failed.clone());

        match handler {
            Some(handler) => handler.call(navigation).await,
            None => tracing::debug!("No handler resolved, navigation ignored"),
        }
    }

    async fn resolve(
        &self,
        route: &RouteEntry,
        navigation: &Navigation,
        specials: &SpecialHandlers,
    ) -> Option<Handler> {
        let available = match &route.available {
            Some(predicate) => predicate.call(navigation.clone()).await,
            None => true,
        };

        let machine = &self.inner.machine;
        let current = machine.state_get();
        let reachable = match route.state.as_deref() {
            None => true,
            Some(state) => state == current || machine.check_transition(state),
        };

        if !(available && reachable) {
            tracing::info!(available, reachable, "Route forbidden");
            return route.forbidden.clone().or_else(|| specials.forbidden.clone());
        }

        match route.state.as_deref() {
            Some(state) if state != current => {
                if machine.state_set(state).await {
                    Some(route.handler.clone())
                } else {
                    tracing::warn!(from = %current, to = state, "Transition for route failed");
                    specials.failed.clone()
                }
            }
            _ => match self.inner.policy {
                SameStatePolicy::Handle => Some(route.handler.clone()),
                SameStatePolicy::Fail => specials.failed.clone(),
            },
        }
    }

    // --- Introspection ---

    /// Serializable view of states, transitions and routes.
    pub fn snapshot(&self) -> RouterSnapshot {
        let (current_state, states, transitions) = {
            let graph = self.inner.machine.graph();
            let transitions = graph
                .transition_pairs()
                .into_iter()
                .map(|(from, to)| TransitionView { from, to })
                .collect();
            (graph.current().to_string(), graph.state_names(), transitions)
        };

        let routes = self
            .inner
            .routes
            .load()
            .iter()
            .map(|route| RouteView {
                path: route.pattern.canonical().to_string(),
                weight: route.pattern.weight(),
                state: route.state.clone(),
            })
            .collect();

        let specials = self.inner.specials.load();
        let special_codes = [
            (Special::Forbidden, specials.forbidden.is_some()),
            (Special::NotFound, specials.not_found.is_some()),
            (Special::Failed, specials.failed.is_some()),
        ]
        .into_iter()
        .filter(|(_, installed)| *installed)
        .map(|(special, _)| special.code())
        .collect();

        RouterSnapshot {
            current_state,
            states,
            transitions,
            routes,
            specials: special_codes,
        }
    }
}

impl fmt::Debug for FsmRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FsmRouter")
            .field("current_state", &self.state_get())
            .field("routes", &self.inner.routes.load().len())
            .field("routing", &self.is_routing())
            .field("policy", &self.inner.policy)
            .finish_non_exhaustive()
    }
}
