#![deny(rust_2018_idioms)]

//! Matches URL patterns with support for named placeholders and trailing
//! wildcards.
//!
//! ```rust
//! use http::Method;
//! use routomaton::Router;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut router = Router::new();
//! router.add(Method::GET, "/home", "Welcome!")?;
//! router.add(Method::GET, "/users/:id", "A User")?;
//!
//! let mut value = None;
//! router.lookup(b"/users/1", |m| {
//!     assert_eq!(m.params.get("id"), Some(&b"1"[..]));
//!     value = Some(*m.value);
//!     true
//! });
//! assert_eq!(value, Some("A User"));
//! # Ok(())
//! # }
//! ```
//!
//! Unlike prefix-tree routers, `routomaton` compiles the whole route set
//! into one deterministic automaton and matches every registered pattern in
//! a single left-to-right pass of the path. Patterns may overlap freely —
//! `/user/new` and `/user/:name` can coexist — and a lookup reports all
//! accepting routes to its visitor in registration order, so "first
//! registered wins" falls out naturally.
//!
//! ### Parameters
//!
//! The registered pattern can contain two types of parameters:
//! ```text
//! Syntax    Type
//! :name     named placeholder
//! *         catch-all suffix
//! ```
//!
//! Named placeholders match one or more bytes up to the next `/` or the
//! path end:
//!
//! ```text
//! Pattern: /user/:user
//!
//!  /user/gordon              match: user="gordon"
//!  /user/you                 match: user="you"
//!  /user/gordon/profile      no match
//!  /user/                    no match
//! ```
//!
//! The catch-all matches any suffix, including the empty one, and is only
//! allowed as the final byte of a pattern:
//!
//! ```text
//! Pattern: /src/*
//!
//!  /src/                     match
//!  /src/somefile.rs          match
//!  /src/subdir/somefile.rs   match
//!  /src                      no match
//! ```
//!
//! Captured values are accessible through [`Params`], either by the
//! placeholder name or by iterating in pattern order. Captures are byte
//! slices of the looked-up path and never contain a `/`.
//!
//! ## How does it work?
//!
//! Each registered pattern is compiled into a nondeterministic match graph:
//! a chain of nodes for its literal bytes, a non-slash self-loop for every
//! `:name` placeholder, an any-byte self-loop for a trailing `*`, and an
//! edge on a synthetic end-of-input sentinel into a per-pattern accept
//! node. A shared root fans out to every pattern's entry, so the graph
//! matches all routes simultaneously.
//!
//! Subset construction then collapses the graph into a deterministic one,
//! and the result is flattened into a dense array of nodes, each carrying a
//! 257-slot edge table (one slot per byte value plus the end sentinel) and
//! the list of patterns passing through it. Matching is a table lookup per
//! path byte, independent of how many routes are registered.
//!
//! Placeholder values are recovered afterwards, per accepting pattern, by
//! replaying the walk: every automaton node remembers which placeholder of
//! which pattern is active there, so the replay just notes where those
//! regions begin and end. A placeholder that would capture nothing
//! disqualifies its pattern, which is how `/a/` fails to match `/a/:name`.
//!
//! Registration appends to the route list and marks the automaton stale;
//! the next lookup (or an explicit [`Router::rebuild`]) recompiles it. Once
//! built, the automaton is immutable until the next registration — a
//! router behind an `Arc` can serve lookups from many tasks at once, which
//! is how the optional `hyper-server` integration shares it.

mod dfa;
mod error;
mod nfa;
mod params;
mod router;

pub use error::InsertError;
pub use params::{OwnedParams, Params, ParamsIter};
pub use router::{Matched, Router};

#[cfg(feature = "hyper-server")]
pub use router::hyper::{handler, BoxedHandler, Handler, MakeRouterService, RouterService};

#[cfg(doctest)]
mod test_readme {
    macro_rules! doc_comment {
        ($x:expr) => {
            #[doc = $x]
            extern "C" {}
        };
    }

    doc_comment!(include_str!("../README.md"));
}
