use indexmap::IndexMap;
use result::{Error, Result};
use std::{cell::OnceCell, collections::HashSet, hash::Hash};

#[derive(Clone, Debug)]
struct RingEdge<P> {
    prev: (P, P),
    next: (P, P),
}

// Rings tracks the boundaries of a set of polygons as linked directed edges.
// Adding a polygon next to an existing one cancels the shared edges, so that
// outer boundaries and holes remain. Outer rings keep the orientation of the
// added polygons, holes run the other way.
#[derive(Clone, Debug)]
pub struct Rings<P: Clone + Eq + Hash> {
    edges: IndexMap<(P, P), RingEdge<P>>,
    rings: OnceCell<Vec<Vec<P>>>,
}

impl<P: Clone + Eq + Hash> Default for Rings<P> {
    fn default() -> Self {
        Rings::new()
    }
}

impl<P: Clone + Eq + Hash> Rings<P> {
    pub fn new() -> Rings<P> {
        Rings { edges: IndexMap::new(), rings: OnceCell::new() }
    }

    // len is the number of directed edges on all rings
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn has_edge(&self, a: &P, b: &P) -> bool {
        self.edges.contains_key(&(a.clone(), b.clone()))
    }

    // add_ring adds the closed polygon through points and merges it with touching rings.
    // Nothing changes if one of its directed edges is already present.
    pub fn add_ring(&mut self, points: &[P]) -> Result<()> {
        let n = points.len();
        let keys: Vec<(P, P)> = (0..n).map(|i| (points[i].clone(), points[(i + 1) % n].clone())).collect();

        let mut seen = HashSet::new();
        for key in keys.iter() {
            if self.edges.contains_key(key) || !seen.insert(key) {
                return Err(Error::DuplicateDirectedEdge)
            }
        }

        let existing = self.edges.len();
        for i in 0..n {
            let edge = RingEdge { prev: keys[(i + n - 1) % n].clone(), next: keys[(i + 1) % n].clone() };
            self.edges.insert(keys[i].clone(), edge);
        }

        if existing > 0 {
            for key in keys.iter() {
                let reverse = (key.1.clone(), key.0.clone());
                if self.edges.contains_key(key) && self.edges.contains_key(&reverse) {
                    self.cancel(key, &reverse);
                }
            }
        }

        self.rings = OnceCell::new();
        Ok(())
    }

    // remove_ring cuts the polygon through points out of the rings again
    pub fn remove_ring(&mut self, points: &[P]) -> Result<()> {
        let reversed: Vec<P> = points.iter().rev().cloned().collect();
        self.add_ring(&reversed)
    }

    // cancel removes an edge and its reverse, joining the rings on either side
    fn cancel(&mut self, key: &(P, P), reverse: &(P, P)) {
        let reverse_prev = self.link(reverse, |edge| &edge.prev);
        let key_next = self.link(key, |edge| &edge.next);
        self.set_link(&reverse_prev, |edge| &mut edge.next, key_next);

        let key_next = self.link(key, |edge| &edge.next);
        let reverse_prev = self.link(reverse, |edge| &edge.prev);
        self.set_link(&key_next, |edge| &mut edge.prev, reverse_prev);

        let key_prev = self.link(key, |edge| &edge.prev);
        let reverse_next = self.link(reverse, |edge| &edge.next);
        self.set_link(&key_prev, |edge| &mut edge.next, reverse_next);

        let reverse_next = self.link(reverse, |edge| &edge.next);
        let key_prev = self.link(key, |edge| &edge.prev);
        self.set_link(&reverse_next, |edge| &mut edge.prev, key_prev);

        self.edges.shift_remove(key);
        self.edges.shift_remove(reverse);
    }

    fn link(&self, key: &(P, P), field: impl Fn(&RingEdge<P>) -> &(P, P)) -> (P, P) {
        self.edges.get(key).map_or_else(|| key.clone(), |edge| field(edge).clone())
    }

    fn set_link(&mut self, key: &(P, P), field: impl Fn(&mut RingEdge<P>) -> &mut (P, P), value: (P, P)) {
        if let Some(edge) = self.edges.get_mut(key) {
            *field(edge) = value;
        }
    }

    // rings lists every ring as a sequence of points, starting from the oldest edge
    pub fn rings(&self) -> &[Vec<P>] {
        self.rings.get_or_init(|| {
            let mut rings = vec![];
            let mut seen: HashSet<&(P, P)> = HashSet::new();
            for (key, edge) in self.edges.iter() {
                if !seen.insert(key) {
                    continue
                }
                let mut ring = vec![key.0.clone()];
                let mut next = &edge.next;
                while next != key && ring.len() <= self.edges.len() {
                    let (next_key, next_edge) = match self.edges.get_key_value(next) {
                        Some(entry) => entry,
                        None => break,
                    };
                    seen.insert(next_key);
                    ring.push(next_key.0.clone());
                    next = &next_edge.next;
                }
                rings.push(ring);
            }
            rings
        })
    }
}
