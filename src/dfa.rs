use std::collections::HashMap;

use crate::nfa::{Nfa, Tag, END, SLOTS, START};

/// Marks an absent edge in the dense tables.
const NONE: u32 = u32::MAX;

/// A node of the compact automaton: a dense edge table plus a slice into
/// the shared terminal-tag array.
struct DfaNode {
    edges: Box<[u32; SLOTS]>,
    tags: (u32, u32),
}

/// The determinized, flattened match graph used at match time. Once built
/// it is logically immutable until the next registration.
#[derive(Default)]
pub(crate) struct Dfa {
    nodes: Vec<DfaNode>,
    tags: Vec<Tag>,
    /// For each terminal, the nodes lying strictly inside one of its
    /// placeholders, keyed by compact node index.
    placeholders: Vec<HashMap<u32, u32>>,
}

impl Dfa {
    /// Flattens the determinized graph from its unique start state,
    /// assigning dense indices in discovery order.
    pub fn from_nfa(nfa: &Nfa, terminals: usize) -> Self {
        let mut dfa = Dfa {
            nodes: Vec::new(),
            tags: Vec::new(),
            placeholders: vec![HashMap::new(); terminals],
        };

        let start = match nfa.nodes.first().and_then(|root| root.edges[START].first()) {
            Some(&start) => start,
            None => return dfa,
        };

        let mut dense: HashMap<u32, u32> = HashMap::new();
        let mut order = vec![start];
        dense.insert(start, 0);

        let mut next = 0;
        while next < order.len() {
            let node = &nfa.nodes[order[next] as usize];

            let mut edges = Box::new([NONE; SLOTS]);
            for slot in 0..SLOTS {
                debug_assert!(node.edges[slot].len() <= 1);
                if let Some(&succ) = node.edges[slot].first() {
                    let fresh = dense.len() as u32;
                    edges[slot] = *dense.entry(succ).or_insert_with(|| {
                        order.push(succ);
                        fresh
                    });
                }
            }

            let tag_start = dfa.tags.len() as u32;
            for &tag in &node.tags {
                if let Some(p) = tag.placeholder {
                    dfa.placeholders[tag.terminal as usize].insert(next as u32, p);
                }
                dfa.tags.push(tag);
            }

            dfa.nodes.push(DfaNode {
                edges,
                tags: (tag_start, dfa.tags.len() as u32),
            });
            next += 1;
        }
        dfa
    }

    /// Runs the automaton over `path`. Returns the accept node, or `None`
    /// if the walk falls off the graph.
    pub fn walk(&self, path: &[u8]) -> Option<u32> {
        if self.nodes.is_empty() {
            return None;
        }
        let mut node = 0;
        for &b in path {
            node = self.step(node, b as usize)?;
        }
        self.step(node, END)
    }

    fn step(&self, node: u32, slot: usize) -> Option<u32> {
        match self.nodes[node as usize].edges[slot] {
            NONE => None,
            next => Some(next),
        }
    }

    /// The terminal tags recorded at `node`, in first-insertion order.
    pub fn tags(&self, node: u32) -> &[Tag] {
        let (start, end) = self.nodes[node as usize].tags;
        &self.tags[start as usize..end as usize]
    }

    /// Re-walks `path` and reconstructs the byte range captured by each of
    /// the terminal's placeholders. The main walk must already have
    /// accepted this path.
    pub fn captures(&self, terminal: u32, path: &[u8], ranges: &mut [(usize, usize)]) {
        let inside = &self.placeholders[terminal as usize];
        let mut node = 0;
        let mut active: Option<u32> = None;
        let mut from = 0;

        for (i, &b) in path.iter().enumerate() {
            let here = inside.get(&node).copied();
            if here != active {
                if let Some(p) = active.take() {
                    // the byte before `i` belonged to the literal that
                    // terminated the placeholder
                    ranges[p as usize] = (from, i - 1);
                }
                if let Some(p) = here {
                    active = Some(p);
                    from = i;
                }
            }
            node = self.nodes[node as usize].edges[b as usize];
            debug_assert_ne!(node, NONE);
        }

        if let Some(p) = active {
            if inside.get(&node).copied() == active {
                ranges[p as usize] = (from, path.len());
            } else {
                ranges[p as usize] = (from, path.len() - 1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(patterns: &[&str]) -> Dfa {
        let mut nfa = Nfa::new();
        for (i, pattern) in patterns.iter().enumerate() {
            nfa.insert(pattern.as_bytes(), i as u32);
        }
        nfa.determinize();
        Dfa::from_nfa(&nfa, patterns.len())
    }

    #[test]
    fn walk_literal() {
        let dfa = build(&["/test"]);
        assert!(dfa.walk(b"/test").is_some());
        assert!(dfa.walk(b"/tes").is_none());
        assert!(dfa.walk(b"/testx").is_none());
        assert!(dfa.walk(b"").is_none());
    }

    #[test]
    fn accept_tags_in_registration_order() {
        let dfa = build(&["ab", "a*"]);

        let accept = dfa.walk(b"ab").unwrap();
        let terminals: Vec<u32> = dfa.tags(accept).iter().map(|t| t.terminal).collect();
        assert_eq!(terminals, vec![0, 1]);

        let accept = dfa.walk(b"abc").unwrap();
        let terminals: Vec<u32> = dfa.tags(accept).iter().map(|t| t.terminal).collect();
        assert_eq!(terminals, vec![1]);
    }

    #[test]
    fn capture_ranges() {
        let dfa = build(&["/a/:x/"]);
        assert!(dfa.walk(b"/a/yz/").is_some());

        let mut ranges = [(0, 0)];
        dfa.captures(0, b"/a/yz/", &mut ranges);
        assert_eq!(ranges, [(3, 5)]);
    }

    #[test]
    fn capture_runs_to_end_of_path() {
        let dfa = build(&["/a/:x"]);
        assert!(dfa.walk(b"/a/yz").is_some());

        let mut ranges = [(0, 0)];
        dfa.captures(0, b"/a/yz", &mut ranges);
        assert_eq!(ranges, [(3, 5)]);
    }

    #[test]
    fn empty_automaton() {
        let dfa = Dfa::default();
        assert!(dfa.walk(b"/x").is_none());
        assert!(dfa.walk(b"").is_none());
    }
}
