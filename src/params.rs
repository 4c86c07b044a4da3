use std::iter;
use std::slice;

/// A single captured placeholder: the placeholder name and the bytes it
/// matched.
#[derive(Debug, PartialEq, Eq, Default, Copy, Clone)]
struct Param<'k, 'v> {
    key: &'k [u8],
    value: &'v [u8],
}

// routes rarely declare more than a few placeholders, so the first few
// captures live inline and the rest spill to the heap
const INLINE: usize = 4;

/// The placeholder values captured by a route match.
///
/// Keys are the placeholder names in the order they appear in the pattern;
/// values are byte slices of the matched path.
///
/// ```rust
/// use http::Method;
/// use routomaton::Router;
///
/// let mut router = Router::new();
/// router.add(Method::GET, "/users/:id", ()).unwrap();
///
/// router.lookup(b"/users/978", |m| {
///     assert_eq!(m.params.get("id"), Some(&b"978"[..]));
///     true
/// });
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Params<'k, 'v> {
    head: [Param<'k, 'v>; INLINE],
    len: usize,
    spill: Vec<Param<'k, 'v>>,
}

impl<'k, 'v> Params<'k, 'v> {
    pub(crate) fn new() -> Self {
        Params {
            head: [Param::default(); INLINE],
            len: 0,
            spill: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, key: &'k [u8], value: &'v [u8]) {
        let param = Param { key, value };
        if self.len < INLINE {
            self.head[self.len] = param;
        } else {
            self.spill.push(param);
        }
        self.len += 1;
    }

    /// Returns the value captured for the placeholder named `key`.
    pub fn get(&self, key: impl AsRef<[u8]>) -> Option<&'v [u8]> {
        let key = key.as_ref();
        self.iter().find(|&(k, _)| k == key).map(|(_, v)| v)
    }

    /// The number of captured placeholders.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the matched pattern declared no placeholders.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns an iterator over `(name, value)` pairs in pattern order.
    pub fn iter(&self) -> ParamsIter<'_, 'k, 'v> {
        let inline = &self.head[..self.len.min(INLINE)];
        ParamsIter {
            inner: inline.iter().chain(self.spill.iter()),
        }
    }
}

/// An iterator over the names and values of captured
/// [parameters](crate::Params).
pub struct ParamsIter<'p, 'k, 'v> {
    inner: iter::Chain<slice::Iter<'p, Param<'k, 'v>>, slice::Iter<'p, Param<'k, 'v>>>,
}

impl<'p, 'k, 'v> Iterator for ParamsIter<'p, 'k, 'v> {
    type Item = (&'k [u8], &'v [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|p| (p.key, p.value))
    }
}

/// Captures copied out of a match, detached from the path they were sliced
/// from. The serving layer stores these in request extensions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnedParams(Vec<(String, String)>);

impl OwnedParams {
    /// Returns the value of the first parameter captured under `name`.
    pub fn by_name(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key.as_str() == name)
            .map(|(_, value)| value.as_str())
    }

    /// The number of captured parameters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no parameters were captured.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over `(name, value)` pairs in pattern order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl From<&Params<'_, '_>> for OwnedParams {
    /// Non-UTF-8 bytes are replaced with the replacement character.
    fn from(params: &Params<'_, '_>) -> Self {
        OwnedParams(
            params
                .iter()
                .map(|(k, v)| {
                    (
                        String::from_utf8_lossy(k).into_owned(),
                        String::from_utf8_lossy(v).into_owned(),
                    )
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline() {
        let mut params = Params::new();
        params.push(b"a", b"1");
        params.push(b"b", b"2");

        assert_eq!(params.len(), 2);
        assert!(params.spill.is_empty());
        assert_eq!(params.get("a"), Some(&b"1"[..]));
        assert_eq!(params.get("b"), Some(&b"2"[..]));
        assert_eq!(params.get("missing"), None);
    }

    #[test]
    fn spill() {
        let pairs: Vec<(&[u8], &[u8])> = vec![
            (b"a", b"1"),
            (b"b", b"2"),
            (b"c", b"3"),
            (b"d", b"4"),
            (b"e", b"5"),
            (b"f", b"6"),
        ];

        let mut params = Params::new();
        for (key, value) in pairs.clone() {
            params.push(key, value);
            assert_eq!(params.get(key), Some(value));
        }

        assert_eq!(params.len(), pairs.len());
        assert_eq!(params.spill.len(), pairs.len() - INLINE);
        assert!(params.iter().eq(pairs));
    }

    #[test]
    fn empty() {
        let params = Params::new();
        assert!(params.is_empty());
        assert!(params.get("").is_none());
    }

    #[test]
    fn owned() {
        let mut params = Params::new();
        params.push(b"user", b"gordon");
        params.push(b"file", b"a.txt");

        let owned = OwnedParams::from(&params);
        assert_eq!(owned.by_name("user"), Some("gordon"));
        assert_eq!(owned.by_name("file"), Some("a.txt"));
        assert_eq!(owned.by_name("other"), None);
        assert!(owned
            .iter()
            .eq(vec![("user", "gordon"), ("file", "a.txt")]));
    }
}
