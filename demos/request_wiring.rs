//! Handler wiring on top of a registry.
//!
//! A small router keeps one application registry and dispatches requests to
//! handlers whose parameters are injected from it. Each request gets its own
//! registry holding the request plus the application's shared services.
//!
//! Run with `RUST_LOG=ferrous_registry=trace cargo run --example request_wiring`
//! to see registration and materialization events.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use ferrous_registry::{must, Binding, Key, Lifetime, Registry, Resolver, Value};
use parking_lot::Mutex;
use tracing_subscriber::EnvFilter;

// ===== Application services =====

trait UserStore: Send + Sync {
    fn find(&self, id: u32) -> Option<String>;
}

struct MemoryUserStore {
    users: HashMap<u32, String>,
}

impl UserStore for MemoryUserStore {
    fn find(&self, id: u32) -> Option<String> {
        self.users.get(&id).cloned()
    }
}

#[derive(Default)]
struct AccessLog {
    lines: Mutex<Vec<String>>,
}

// ===== Request context =====

struct Request {
    method: &'static str,
    path: String,
}

impl Request {
    fn param(&self, name: &str) -> Option<&str> {
        let prefix = format!("/{}/", name);
        self.path.strip_prefix(&prefix)
    }
}

#[derive(Debug)]
struct Response {
    status: u16,
    body: String,
}

impl Response {
    fn ok(body: impl Into<String>) -> Self {
        Self { status: 200, body: body.into() }
    }

    fn not_found() -> Self {
        Self { status: 404, body: "not found".to_string() }
    }
}

// ===== Router =====

type Handler = Box<dyn Fn(&Registry) -> Result<Vec<Value>> + Send + Sync>;

struct Router {
    app: Registry,
    routes: HashMap<(&'static str, &'static str), Handler>,
}

impl Router {
    fn new(app: Registry) -> Self {
        Self { app, routes: HashMap::new() }
    }

    fn route<F, Args>(&mut self, method: &'static str, prefix: &'static str, handler: F)
    where
        F: ferrous_registry::Injectable<Args, Output = Response> + Send + Sync + Clone + 'static,
        Args: 'static,
    {
        let handler: Handler = Box::new(move |registry: &Registry| Ok(registry.call(handler.clone())?));
        self.routes.insert((method, prefix), handler);
    }

    fn dispatch(&self, request: Request) -> Result<Arc<Response>> {
        let prefix = request
            .path
            .split('/')
            .nth(1)
            .map(|segment| format!("/{}", segment))
            .unwrap_or_default();
        let handler = self
            .routes
            .iter()
            .find(|((method, p), _)| *method == request.method && *p == prefix)
            .map(|(_, h)| h)
            .ok_or_else(|| anyhow!("no route for {} {}", request.method, request.path))?;

        let scope = self.request_registry(request)?;
        let results = handler(&scope)?;
        let response = results
            .first()
            .ok_or_else(|| anyhow!("handler produced no response"))?
            .downcast::<Response>()?;
        Ok(response)
    }

    /// Copies the application's shared services into a fresh registry next
    /// to the request.
    fn request_registry(&self, request: Request) -> Result<Registry> {
        let scope = Registry::new();
        scope.bind_value(Key::of::<Request>(), request)?;
        scope.bind_shared(Key::of::<dyn UserStore>(), self.app.get::<dyn UserStore>()?)?;
        scope.bind_shared(Key::of::<AccessLog>(), self.app.get::<AccessLog>()?)?;
        scope.bind_value("app", self.app.clone())?;
        Ok(scope)
    }
}

// ===== Handlers =====

fn show_user(request: Arc<Request>, users: Arc<dyn UserStore>, log: Arc<AccessLog>) -> Response {
    log.lines.lock().push(format!("{} {}", request.method, request.path));
    let user = request
        .param("users")
        .and_then(|id| id.parse().ok())
        .and_then(|id| users.find(id));
    match user {
        Some(name) => Response::ok(format!("user: {}", name)),
        None => Response::not_found(),
    }
}

fn health(registry: Registry) -> Response {
    let app = registry.must_get_by_key::<Registry>("app");
    Response::ok(format!("{} bindings", app.len()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let app = Registry::new();
    app.register(
        Binding::factory(|| MemoryUserStore {
            users: HashMap::from([(1, "ada".to_string()), (2, "grace".to_string())]),
        })
        .provides(|store| store as Arc<dyn UserStore>),
    )?;
    must(app.bind(AccessLog::default, Lifetime::Singleton));

    let mut router = Router::new(app.clone());
    router.route("GET", "/users", show_user);
    router.route("GET", "/health", health);

    for path in ["/users/1", "/users/2", "/users/9", "/health"] {
        let response = router.dispatch(Request { method: "GET", path: path.to_string() })?;
        println!("GET {:<10} -> {} {}", path, response.status, response.body);
    }

    let log = app.must_get::<AccessLog>();
    println!("access log: {:?}", log.lines.lock());
    println!("stats: {:?}", app.stats());
    Ok(())
}
