//! Route table with middleware stacks scoped to groups.
//!
//! A [`Mux`] collects `(path, MethodRouter)` pairs and wraps every handler
//! with the middleware attached to that mux at registration time.
//! [`Mux::group`] forks the middleware list while keeping a single shared
//! route table, so a group can add gates (auth, role checks) without
//! leaking them to its parent or siblings.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::convert::Infallible;
use std::rc::Rc;
use std::sync::Arc;

use axum::{
    extract::Request,
    response::IntoResponse,
    routing::{MethodRouter, Route},
    Router,
};
use tower::{Layer, Service};

type Wrap<S> = dyn Fn(MethodRouter<S>) -> MethodRouter<S> + Send + Sync;

/// A reusable handler wrapper.
pub struct Middleware<S>(Arc<Wrap<S>>);

impl<S> Clone for Middleware<S> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<S> Middleware<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new<F>(wrap: F) -> Self
    where
        F: Fn(MethodRouter<S>) -> MethodRouter<S> + Send + Sync + 'static,
    {
        Self(Arc::new(wrap))
    }

    /// Wraps handlers with a tower layer, e.g. `axum::middleware::from_fn`.
    /// The layer only runs for requests that matched a route.
    pub fn layer<L>(layer: L) -> Self
    where
        L: Layer<Route> + Clone + Send + Sync + 'static,
        L::Service: Service<Request, Error = Infallible> + Clone + Send + 'static,
        <L::Service as Service<Request>>::Response: IntoResponse + 'static,
        <L::Service as Service<Request>>::Future: Send + 'static,
    {
        Self::new(move |method_router| method_router.route_layer(layer.clone()))
    }

    fn apply(&self, method_router: MethodRouter<S>) -> MethodRouter<S> {
        (self.0)(method_router)
    }
}

pub struct Mux<S = ()> {
    routes: Rc<RefCell<BTreeMap<String, MethodRouter<S>>>>,
    middlewares: Vec<Middleware<S>>,
}

impl<S> Mux<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            routes: Rc::new(RefCell::new(BTreeMap::new())),
            middlewares: Vec::new(),
        }
    }

    /// Appends `middleware` to this mux only. Routes registered earlier are
    /// not affected.
    pub fn layer(&mut self, middleware: Middleware<S>) -> &mut Self {
        self.middlewares.push(middleware);
        self
    }

    /// Registers `method_router` under `path`, wrapped by the current
    /// middleware list with the first-added middleware outermost. A second
    /// registration on the same path merges the method routers.
    pub fn route(&mut self, path: &str, method_router: MethodRouter<S>) -> &mut Self {
        let wrapped = self
            .middlewares
            .iter()
            .rev()
            .fold(method_router, |mr, middleware| middleware.apply(mr));

        let mut routes = self.routes.borrow_mut();
        let merged = match routes.remove(path) {
            Some(existing) => existing.merge(wrapped),
            None => wrapped,
        };
        routes.insert(path.to_string(), merged);
        drop(routes);
        self
    }

    /// Child mux sharing this route table, starting with a copy of the
    /// current middleware list.
    pub fn group(&self) -> Self {
        Self {
            routes: Rc::clone(&self.routes),
            middlewares: self.middlewares.clone(),
        }
    }

    pub fn route_count(&self) -> usize {
        self.routes.borrow().len()
    }

    pub fn build(&self) -> Router<S> {
        self.routes
            .borrow()
            .iter()
            .fold(Router::new(), |router, (path, method_router)| {
                router.route(path, method_router.clone())
            })
    }
}

impl<S> Default for Mux<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
