use geometry::*;
use serde::{Deserialize, Serialize};
use std::{
    boxed::Box,
    collections::{HashMap, HashSet},
    hash::Hash,
    mem,
    rc::{Rc, Weak},
};

// MAX_EXPANSIONS caps how many times the root may double while looking for room for one item.
const MAX_EXPANSIONS: usize = 64;

// https://stackoverflow.com/questions/25903180/pmr-quadtree-data-structure-and-algorithm
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub initial_radius: f64,
    pub max_depth: u8,
    pub splitting_threshold: usize,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            initial_radius: 64.,
            max_depth: 16,
            splitting_threshold: 8,
        }
    }
}

#[derive(Debug)]
pub struct Tree<K: Eq + Hash, S: Spatial<Hashed = K>> {
    pub config: Config,
    pub root: Node<S>,
    pub items: HashMap<K, Rc<S>>,
}

#[derive(Debug)]
pub enum NodeType<S: Spatial> {
    InnerNode(Box<InnerNode<S>>),
    Leaf(Leaf<S>),
}

#[derive(Debug)]
pub struct Node<S: Spatial> {
    node: NodeType<S>,
}

impl<S: Spatial> From<Leaf<S>> for Node<S> {
    fn from(leaf: Leaf<S>) -> Node<S> {
        Node {
            node: NodeType::Leaf(leaf)
        }
    }
}

impl<S: Spatial> From<InnerNode<S>> for Node<S> {
    fn from(inner_node: InnerNode<S>) -> Node<S> {
        Node {
            node: NodeType::InnerNode(Box::new(inner_node))
        }
    }
}

// level counts down as the root expands outward, so it is signed
#[derive(Debug)]
pub struct Leaf<S: Spatial> {
    pub bounds: Bounds,
    pub items: Vec<Weak<S>>,
    pub level: i32,
}

#[derive(Debug)]
pub struct InnerNode<S: Spatial> {
    pub bounds: Bounds,
    pub level: i32,
    pub ne: Node<S>,
    pub nw: Node<S>,
    pub se: Node<S>,
    pub sw: Node<S>,
}

impl<S: Spatial> Leaf<S> {
    fn new(level: i32, bounds: Bounds) -> Leaf<S> {
        Leaf { level, bounds, items: Vec::new() }
    }

    // is_full is true once a leaf above the depth limit holds more items than the threshold
    fn is_full(&self, config: &Config) -> bool {
        self.level < config.max_depth as i32 && self.items.len() > config.splitting_threshold
    }

    // split hands every live item to each quadrant it reaches
    fn split(&self) -> InnerNode<S> {
        let SplitBounds { ne, nw, se, sw } = self.bounds.split();
        let live: Vec<(Rc<S>, &Weak<S>)> = self.items
            .iter()
            .filter_map(|item| item.upgrade().map(|rc_item| (rc_item, item)))
            .collect();
        let leaf = |bounds: Bounds| {
            let items = live
                .iter()
                .filter(|(rc_item, _)| rc_item.intersects(&bounds))
                .map(|(_, item)| Weak::clone(item))
                .collect();
            Node::from(Leaf { level: self.level + 1, bounds, items })
        };
        InnerNode {
            bounds: self.bounds.clone(),
            level: self.level,
            ne: leaf(ne),
            nw: leaf(nw),
            se: leaf(se),
            sw: leaf(sw),
        }
    }

    fn query(&self, bounds: &Bounds, found: &mut Vec<Rc<S>>, seen: &mut HashSet<*const S>) {
        for item in self.items.iter() {
            if let Some(rc_item) = item.upgrade() {
                if rc_item.intersects(bounds) && seen.insert(Rc::as_ptr(&rc_item)) {
                    found.push(rc_item);
                }
            }
        }
    }

    // remove drops target and any item that no longer exists
    fn remove(&mut self, target: &Weak<S>) {
        self.items.retain(|item| item.strong_count() > 0 && !item.ptr_eq(target));
    }
}

impl<S: Spatial> InnerNode<S> {
    fn children<'b>(&'b self) -> [&'b Node<S>; 4] {
        [&self.ne, &self.nw, &self.se, &self.sw]
    }

    fn children_mut<'b>(&'b mut self) -> [&'b mut Node<S>; 4] {
        [&mut self.ne, &mut self.nw, &mut self.se, &mut self.sw]
    }
}

impl<S: Spatial> Node<S> {
    fn bounds<'b>(&'b self) -> &'b Bounds {
        match &self.node {
            NodeType::InnerNode(inner_node) => &(*inner_node).bounds,
            NodeType::Leaf(leaf) => &leaf.bounds,
        }
    }

    fn insert(&mut self, item: &Rc<S>, config: &Config) {
        if !item.intersects(self.bounds()) { return }
        let mut new_node: Option<Node<S>> = None;
        match &mut self.node {
            NodeType::InnerNode(inner_node) => {
                for child in inner_node.children_mut() {
                    child.insert(item, config);
                }
            },
            NodeType::Leaf(leaf) => {
                leaf.items.push(Rc::downgrade(item));
                if leaf.is_full(config) {
                    new_node = Some(Node::from(leaf.split()));
                }
            },
        };
        if let Some(new_node) = new_node {
            self.node = new_node.node;
        }
    }

    fn query(&self, bounds: &Bounds, found: &mut Vec<Rc<S>>, seen: &mut HashSet<*const S>) {
        if !self.bounds().intersects(bounds) { return }
        match &self.node {
            NodeType::InnerNode(inner_node) => {
                for child in inner_node.children().iter() {
                    child.query(bounds, found, seen);
                }
            },
            NodeType::Leaf(leaf) => leaf.query(bounds, found, seen),
        }
    }

    fn remove(&mut self, target: &Weak<S>) {
        match &mut self.node {
            NodeType::InnerNode(inner_node) => {
                for child in inner_node.children_mut() {
                    child.remove(target);
                }
            },
            NodeType::Leaf(leaf) => leaf.remove(target),
        }
    }
}

impl<K: Eq + Hash, S: Spatial<Hashed = K>> Tree<K, S> {
    pub fn new(config: Config) -> Tree<K, S> {
        let radius = config.initial_radius;
        Tree {
            config,
            root: Node::from(Leaf::new(0, Bounds { center: ORIGIN, radius })),
            items: HashMap::new(),
        }
    }

    pub fn has(&self, key: &K) -> bool {
        self.items.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    // insert returns the already stored item if one exists under the same key
    pub fn insert(&mut self, item: S) -> Option<Rc<S>> {
        let key = item.key(); // only call once, clones

        if let Some(item_rc) = self.get(&key) {
            return Some(item_rc)
        }

        let mut expansions = 0;
        while !item.bounded_by(self.root.bounds()) && expansions < MAX_EXPANSIONS {
            self.expand();
            expansions += 1;
        }

        let item = self.items.entry(key).or_insert(Rc::new(item));
        self.root.insert(item, &self.config);
        None
    }

    pub fn get(&self, key: &K) -> Option<Rc<S>> {
        self.items.get(key).cloned()
    }

    pub fn remove(&mut self, key: &K) -> Option<Rc<S>> {
        let item = self.items.remove(key)?;
        self.root.remove(&Rc::downgrade(&item));
        Some(item)
    }

    // query returns every stored item intersecting bounds, each once
    pub fn query(&self, bounds: &Bounds) -> Vec<Rc<S>> {
        let mut found = vec![];
        let mut seen = HashSet::new();
        self.root.query(bounds, &mut found, &mut seen);
        found
    }

    // expand doubles the root's radius. Each old quadrant becomes the inner corner of a new quadrant.
    fn expand(&mut self) {
        let root = mem::replace(&mut self.root, Node::from(Leaf::new(0, Bounds { center: ORIGIN, radius: 0. })));
        let root = match root.node {
            NodeType::InnerNode(inner_node) => *inner_node,
            NodeType::Leaf(leaf) => leaf.split(),
        };
        let (level, step) = (root.level, root.bounds.radius);
        self.root = Node::from(InnerNode {
            level: level - 1,
            bounds: root.bounds.mul(2.),
            ne: Node::from(grow(root.ne, NE, level, step)),
            nw: Node::from(grow(root.nw, NW, level, step)),
            se: Node::from(grow(root.se, SE, level, step)),
            sw: Node::from(grow(root.sw, SW, level, step)),
        });
    }
}

// grow wraps quadrant, which lies toward direction from the center, in a node twice its size
// whose other three children are fresh leaves further out
fn grow<S: Spatial>(quadrant: Node<S>, direction: Point, level: i32, step: f64) -> InnerNode<S> {
    let bounds = quadrant.bounds().clone();
    let (east, north) = (direction.0 > 0., direction.1 > 0.);
    let leaf = |to_east: bool, to_north: bool| {
        let dx = if to_east == east { direction.0 } else { 0. };
        let dy = if to_north == north { direction.1 } else { 0. };
        Node::from(Leaf::new(level + 1, bounds.shift(&Point(dx, dy).mul(2. * step))))
    };
    let outer = bounds.shift(&direction.mul(step)).mul(2.);
    let (ne, nw, se, sw) = match (east, north) {
        (true, true) => (leaf(true, true), leaf(false, true), leaf(true, false), quadrant),
        (false, true) => (leaf(true, true), leaf(false, true), quadrant, leaf(false, false)),
        (true, false) => (leaf(true, true), quadrant, leaf(true, false), leaf(false, false)),
        (false, false) => (quadrant, leaf(false, true), leaf(true, false), leaf(false, false)),
    };
    InnerNode { bounds: outer, level, ne, nw, se, sw }
}
