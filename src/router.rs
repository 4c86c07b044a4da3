//! The router handle: registration, rebuild scheduling and lookup dispatch.
//!
//! A [`Router`] stores registered patterns as a flat terminal list next to
//! the compact automaton compiled from them. Registration only appends to
//! the list and marks the automaton stale; the rebuild (compile →
//! determinize → compact) runs lazily on the next lookup, or eagerly via
//! [`Router::rebuild`].
//!
//! Routes are registered under an arbitrary key — the httprouter-style
//! shortcuts use [`http::Method`] — and the key is handed back to the
//! lookup visitor, which decides whether to accept the terminal:
//!
//! ```rust
//! use http::Method;
//! use routomaton::Router;
//!
//! let mut router = Router::new();
//! router
//!     .add(Method::GET, "/posts/:id", "show")?
//!     .add(Method::POST, "/posts", "create")?;
//!
//! let mut handled = None;
//! router.lookup(b"/posts/42", |m| {
//!     if *m.key != Method::GET {
//!         return false;
//!     }
//!     handled = Some((*m.value, m.params.get("id").map(<[u8]>::to_vec)));
//!     true
//! });
//! assert_eq!(handled, Some(("show", Some(b"42".to_vec()))));
//! # Ok::<(), routomaton::InsertError>(())
//! ```
use crate::dfa::Dfa;
use crate::error::InsertError;
use crate::nfa::{self, Nfa};
use crate::params::Params;
use http::Method;

/// A registered route: the original pattern bytes, the registration key,
/// the caller's value and the placeholder names in order of appearance.
struct Terminal<K, V> {
  pattern: Vec<u8>,
  key: K,
  value: V,
  names: Vec<Box<[u8]>>,
}

/// One accepting route, handed to the lookup visitor.
pub struct Matched<'r, 'p, K, V> {
  /// The key the route was registered under.
  pub key: &'r K,
  /// The value the route was registered with.
  pub value: &'r V,
  /// The original pattern bytes, retained for diagnostics.
  pub pattern: &'r [u8],
  /// The placeholder captures, sliced out of the looked-up path.
  pub params: Params<'r, 'p>,
}

/// A router matching every registered pattern in a single automaton pass.
///
/// Patterns may overlap freely; a lookup reports all accepting routes in
/// registration order. See the [crate documentation](crate) for the
/// pattern syntax.
pub struct Router<K, V> {
  prefix: Vec<u8>,
  terminals: Vec<Terminal<K, V>>,
  dfa: Dfa,
  up_to_date: bool,

  /// Configurable handler consulted by the serving layer when no route
  /// matches the request.
  pub not_found: Option<V>,
}

impl<K, V> Default for Router<K, V> {
  fn default() -> Self {
    Router::new()
  }
}

impl<K, V> Router<K, V> {
  /// Creates an empty router with an empty prefix.
  pub fn new() -> Self {
    Router::with_prefix(Vec::new())
  }

  /// Creates an empty router serving paths under `prefix`.
  ///
  /// The prefix does not take part in matching: dispatchers are expected
  /// to pass incoming paths through [`strip_prefix`](Router::strip_prefix)
  /// before looking them up.
  pub fn with_prefix(prefix: impl Into<Vec<u8>>) -> Self {
    Router {
      prefix: prefix.into(),
      terminals: Vec::new(),
      dfa: Dfa::default(),
      up_to_date: true,
      not_found: None,
    }
  }

  /// The prefix this router was created with.
  pub fn prefix(&self) -> &[u8] {
    &self.prefix
  }

  /// Strips the router prefix from an incoming path. Returns `None` when
  /// the path does not start with the prefix; a dispatcher should then
  /// leave the request alone.
  pub fn strip_prefix<'p>(&self, path: &'p [u8]) -> Option<&'p [u8]> {
    path.strip_prefix(self.prefix.as_slice())
  }

  /// Registers `pattern` under `key`. The automaton is rebuilt lazily on
  /// the next lookup.
  ///
  /// Returns the router again for chaining. A rejected pattern reports the
  /// registration error and leaves the router unchanged.
  pub fn add(
    &mut self,
    key: K,
    pattern: impl Into<Vec<u8>>,
    value: V,
  ) -> Result<&mut Self, InsertError> {
    let pattern = pattern.into();
    let names = nfa::check(&pattern)?;
    self.terminals.push(Terminal {
      pattern,
      key,
      value,
      names,
    });
    self.up_to_date = false;
    Ok(self)
  }

  /// The number of registered routes.
  pub fn len(&self) -> usize {
    self.terminals.len()
  }

  /// Returns `true` if no routes are registered.
  pub fn is_empty(&self) -> bool {
    self.terminals.is_empty()
  }

  /// Forces an eager rebuild: compile, determinize, compact.
  ///
  /// Rebuilding twice in a row produces a behaviorally identical
  /// automaton.
  pub fn rebuild(&mut self) {
    let mut nfa = Nfa::new();
    for (i, terminal) in self.terminals.iter().enumerate() {
      nfa.insert(&terminal.pattern, i as u32);
    }
    nfa.determinize();
    self.dfa = Dfa::from_nfa(&nfa, self.terminals.len());
    self.up_to_date = true;
  }

  /// Matches `path` against every registered pattern in one left-to-right
  /// pass, invoking `visitor` for each accepting route in registration
  /// order until one returns `true`.
  ///
  /// Returns whether any visitor accepted. Rebuilds the automaton first if
  /// routes were added since the last build.
  ///
  /// ```rust
  /// use http::Method;
  /// use routomaton::Router;
  ///
  /// let mut router = Router::new();
  /// router.add(Method::GET, "/cmd/:tool", ())?;
  ///
  /// assert!(router.lookup(b"/cmd/vet", |m| m.params.get("tool") == Some(&b"vet"[..])));
  /// assert!(!router.lookup(b"/cmd/vet/flags", |_| true));
  /// # Ok::<(), routomaton::InsertError>(())
  /// ```
  pub fn lookup<'p, F>(&mut self, path: &'p [u8], visitor: F) -> bool
  where
    F: FnMut(Matched<'_, 'p, K, V>) -> bool,
  {
    if !self.up_to_date {
      self.rebuild();
    }
    self.scan(path, visitor)
  }

  /// Lookup against the automaton as last built. The serving layer
  /// rebuilds once and then shares the router immutably, so staleness
  /// cannot arise there.
  pub(crate) fn scan<'r, 'p, F>(&'r self, path: &'p [u8], mut visitor: F) -> bool
  where
    F: FnMut(Matched<'r, 'p, K, V>) -> bool,
  {
    let accept = match self.dfa.walk(path) {
      Some(node) => node,
      None => return false,
    };

    for tag in self.dfa.tags(accept) {
      let terminal = &self.terminals[tag.terminal as usize];

      let mut ranges = vec![(0, 0); terminal.names.len()];
      self.dfa.captures(tag.terminal, path, &mut ranges);

      // a placeholder matches one or more bytes
      if ranges.iter().any(|&(from, to)| from == to) {
        continue;
      }

      let mut params = Params::new();
      for (name, &(from, to)) in terminal.names.iter().zip(&ranges) {
        params.push(name, &path[from..to]);
      }

      let matched = Matched {
        key: &terminal.key,
        value: &terminal.value,
        pattern: &terminal.pattern,
        params,
      };
      if visitor(matched) {
        return true;
      }
    }
    false
  }
}

impl<V> Router<Method, V> {
  /// Registers a route for `GET` requests.
  pub fn get(&mut self, pattern: impl Into<Vec<u8>>, value: V) -> Result<&mut Self, InsertError> {
    self.add(Method::GET, pattern, value)
  }

  /// Registers a route for `HEAD` requests.
  pub fn head(&mut self, pattern: impl Into<Vec<u8>>, value: V) -> Result<&mut Self, InsertError> {
    self.add(Method::HEAD, pattern, value)
  }

  /// Registers a route for `OPTIONS` requests.
  pub fn options(
    &mut self,
    pattern: impl Into<Vec<u8>>,
    value: V,
  ) -> Result<&mut Self, InsertError> {
    self.add(Method::OPTIONS, pattern, value)
  }

  /// Registers a route for `POST` requests.
  pub fn post(&mut self, pattern: impl Into<Vec<u8>>, value: V) -> Result<&mut Self, InsertError> {
    self.add(Method::POST, pattern, value)
  }

  /// Registers a route for `PUT` requests.
  pub fn put(&mut self, pattern: impl Into<Vec<u8>>, value: V) -> Result<&mut Self, InsertError> {
    self.add(Method::PUT, pattern, value)
  }

  /// Registers a route for `PATCH` requests.
  pub fn patch(&mut self, pattern: impl Into<Vec<u8>>, value: V) -> Result<&mut Self, InsertError> {
    self.add(Method::PATCH, pattern, value)
  }

  /// Registers a route for `DELETE` requests.
  pub fn delete(
    &mut self,
    pattern: impl Into<Vec<u8>>,
    value: V,
  ) -> Result<&mut Self, InsertError> {
    self.add(Method::DELETE, pattern, value)
  }
}

#[cfg(feature = "hyper-server")]
pub mod hyper {
  //! Serving layer connecting a [`Router`] to a hyper server.
  //!
  //! Handlers are asynchronous functions taking a `Request<Body>`, boxed
  //! with [`handler`]. Each request is dispatched to the first route whose
  //! pattern matches the prefix-stripped path and whose method matches the
  //! request; the captures are stored in the request extensions as
  //! [`OwnedParams`](crate::OwnedParams). A `HEAD` request that matched
  //! nothing is retried once as `GET`.
  //!
  //! ```rust,no_run
  //! use http::Method;
  //! use hyper::{Body, Request, Response};
  //! use routomaton::{handler, BoxedHandler, OwnedParams, Router};
  //!
  //! async fn index(_: Request<Body>) -> Result<Response<Body>, hyper::Error> {
  //!     Ok(Response::new("Hello, World!".into()))
  //! }
  //!
  //! async fn hello(req: Request<Body>) -> Result<Response<Body>, hyper::Error> {
  //!     let params = req.extensions().get::<OwnedParams>().unwrap();
  //!     Ok(Response::new(
  //!         format!("Hello, {}", params.by_name("user").unwrap()).into(),
  //!     ))
  //! }
  //!
  //! # async fn run() {
  //! let mut router: Router<Method, BoxedHandler> = Router::new();
  //! router.get("/", handler(index)).unwrap();
  //! router.get("/hello/:user", handler(hello)).unwrap();
  //!
  //! hyper::Server::bind(&([127, 0, 0, 1], 3000).into())
  //!     .serve(router.into_service())
  //!     .await;
  //! # }
  //! ```
  use crate::params::OwnedParams;
  use crate::router::Router;
  use futures::future::{ok, BoxFuture, Future, FutureExt, Ready};
  use hyper::service::Service;
  use hyper::{Body, Method, Request, Response, StatusCode};
  use std::convert::Infallible;
  use std::sync::Arc;
  use std::task::{Context, Poll};

  type HandlerResult = Result<Response<Body>, hyper::Error>;

  /// An asynchronous request handler. Implemented for any `async fn` (or
  /// closure returning a future) taking a `Request<Body>`.
  pub trait Handler: Send + Sync {
    fn call(&self, req: Request<Body>) -> BoxFuture<'static, HandlerResult>;
  }

  impl<F, R> Handler for F
  where
    F: Fn(Request<Body>) -> R + Send + Sync,
    R: Future<Output = HandlerResult> + Send + 'static,
  {
    fn call(&self, req: Request<Body>) -> BoxFuture<'static, HandlerResult> {
      self(req).boxed()
    }
  }

  /// A route handler boxed for storage in the router.
  pub type BoxedHandler = Box<dyn Handler>;

  /// Boxes an asynchronous function as a route [`Handler`].
  pub fn handler<H>(h: H) -> BoxedHandler
  where
    H: Handler + 'static,
  {
    Box::new(h)
  }

  /// A hyper `Service` dispatching every request through a shared
  /// [`Router`].
  #[derive(Clone)]
  pub struct RouterService {
    router: Arc<Router<Method, BoxedHandler>>,
  }

  impl Service<Request<Body>> for RouterService {
    type Response = Response<Body>;
    type Error = hyper::Error;
    type Future = BoxFuture<'static, HandlerResult>;

    fn poll_ready(&mut self, _: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
      Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
      self.dispatch(req)
    }
  }

  impl RouterService {
    /// Resolves a request to the first route whose pattern accepts `path`
    /// and whose key equals `method`.
    fn find<'r>(&'r self, method: &Method, path: &[u8]) -> Option<(&'r BoxedHandler, OwnedParams)> {
      let mut found = None;
      self.router.scan(path, |m| {
        if m.key != method {
          return false;
        }
        found = Some((m.value, OwnedParams::from(&m.params)));
        true
      });
      found
    }

    fn dispatch(&self, mut req: Request<Body>) -> BoxFuture<'static, HandlerResult> {
      let path = req.uri().path().as_bytes().to_vec();

      let mut found = None;
      if let Some(path) = self.router.strip_prefix(&path) {
        found = self.find(req.method(), path);

        // a HEAD request that matched nothing is retried as GET, once
        if found.is_none() && *req.method() == Method::HEAD {
          found = self.find(&Method::GET, path);
        }
      }

      match found {
        Some((handler, params)) => {
          req.extensions_mut().insert(params);
          handler.call(req)
        }
        None => match &self.router.not_found {
          Some(handler) => handler.call(req),
          None => {
            let response = Response::builder()
              .status(StatusCode::NOT_FOUND)
              .body(Body::empty())
              .unwrap();
            ok(response).boxed()
          }
        },
      }
    }
  }

  /// Connection-level service maker handing each connection a clone of the
  /// shared [`RouterService`].
  pub struct MakeRouterService(RouterService);

  impl<T> Service<T> for MakeRouterService {
    type Response = RouterService;
    type Error = Infallible;
    type Future = Ready<Result<RouterService, Infallible>>;

    fn poll_ready(&mut self, _: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
      Poll::Ready(Ok(()))
    }

    fn call(&mut self, _: T) -> Self::Future {
      ok(self.0.clone())
    }
  }

  impl Router<Method, BoxedHandler> {
    /// Converts the router into a hyper `Service`, building the automaton
    /// eagerly; the shared router is immutable from here on.
    pub fn into_service(mut self) -> MakeRouterService {
      self.rebuild();
      MakeRouterService(RouterService {
        router: Arc::new(self),
      })
    }
  }
}
