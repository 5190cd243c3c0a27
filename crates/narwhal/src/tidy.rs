//! Reingold-Tilford tidy tree with the linear-time apportion step.
//!
//! The first walk runs bottom-up and assigns each node a preliminary breadth coordinate relative
//! to its left sibling, pushing subtrees apart along their contours (followed through threads).
//! The second walk runs top-down and accumulates the modifiers into absolute positions.

use crate::tree::{IndexTree, NodePair, Sizing, TreeLayout, TreeOptions};

#[derive(Debug, Clone)]
struct Walk {
    /// Preliminary coordinate.
    prelim: f64,
    /// Subtree modifier.
    modifier: f64,
    change: f64,
    shift: f64,
    thread: Option<usize>,
    ancestor: usize,
    /// Index among siblings.
    number: usize,
}

struct State<'a> {
    tree: &'a IndexTree,
    options: &'a TreeOptions,
    depth: Vec<usize>,
    walk: Vec<Walk>,
    /// Default ancestor kept per parent while its children are walked.
    default_ancestor: Vec<Option<usize>>,
}

pub(crate) fn layout(tree: &IndexTree, options: &TreeOptions) -> TreeLayout {
    let n = tree.len();
    let mut walk: Vec<Walk> = (0..n)
        .map(|v| Walk {
            prelim: 0.0,
            modifier: 0.0,
            change: 0.0,
            shift: 0.0,
            thread: None,
            ancestor: v,
            number: 0,
        })
        .collect();
    for v in 0..n {
        for (i, &c) in tree.children(v).iter().enumerate() {
            walk[c].number = i;
        }
    }

    let mut state = State {
        tree,
        options,
        depth: tree.depths(),
        walk,
        default_ancestor: vec![None; n],
    };

    for v in tree.post_order() {
        state.first_walk(v);
    }

    let mut x = vec![0.0; n];
    // The root's parent is a synthetic wrapper whose modifier recentres the root on 0.
    let root_shift = -state.walk[0].prelim;
    for v in tree.pre_order() {
        let parent_mod = match tree.parent(v) {
            Some(p) => state.walk[p].modifier,
            None => root_shift,
        };
        x[v] = state.walk[v].prelim + parent_mod;
        state.walk[v].modifier += parent_mod;
    }

    let depth = state.depth;
    let mut y = vec![0.0; n];
    match options.sizing {
        Sizing::NodeSize {
            breadth,
            depth: step,
        } => {
            for v in 0..n {
                x[v] *= breadth;
                y[v] = depth[v] as f64 * step;
            }
        }
        Sizing::Extent {
            breadth,
            depth: extent,
        } => {
            let mut left = 0usize;
            let mut right = 0usize;
            let mut bottom = 0usize;
            for v in tree.pre_order() {
                if x[v] < x[left] {
                    left = v;
                }
                if x[v] > x[right] {
                    right = v;
                }
                if depth[v] > depth[bottom] {
                    bottom = v;
                }
            }
            let sep = |a: usize, b: usize| {
                (options.separation)(NodePair {
                    a,
                    b,
                    same_parent: tree.parent(a) == tree.parent(b),
                    depth: depth[a],
                })
            };
            let tx = sep(left, right) / 2.0 - x[left];
            let kx = breadth / (x[right] + sep(right, left) / 2.0 + tx);
            let ky = extent / (depth[bottom].max(1) as f64);
            for v in 0..n {
                x[v] = (x[v] + tx) * kx;
                y[v] = depth[v] as f64 * ky;
            }
        }
    }

    TreeLayout { x, y, depth }
}

impl State<'_> {
    fn separation(&self, a: usize, b: usize) -> f64 {
        (self.options.separation)(NodePair {
            a,
            b,
            same_parent: self.tree.parent(a) == self.tree.parent(b),
            depth: self.depth[a],
        })
    }

    fn next_left(&self, v: usize) -> Option<usize> {
        match self.tree.children(v).first() {
            Some(&c) => Some(c),
            None => self.walk[v].thread,
        }
    }

    fn next_right(&self, v: usize) -> Option<usize> {
        match self.tree.children(v).last() {
            Some(&c) => Some(c),
            None => self.walk[v].thread,
        }
    }

    fn first_walk(&mut self, v: usize) {
        let children = self.tree.children(v);
        let parent = self.tree.parent(v);
        let left_sibling = match parent {
            Some(p) if self.walk[v].number > 0 => Some(self.tree.children(p)[self.walk[v].number - 1]),
            _ => None,
        };

        if let (Some(&first), Some(&last)) = (children.first(), children.last()) {
            self.execute_shifts(v);
            let midpoint = (self.walk[first].prelim + self.walk[last].prelim) / 2.0;
            match left_sibling {
                Some(w) => {
                    self.walk[v].prelim = self.walk[w].prelim + self.separation(v, w);
                    self.walk[v].modifier = self.walk[v].prelim - midpoint;
                }
                None => self.walk[v].prelim = midpoint,
            }
        } else if let Some(w) = left_sibling {
            self.walk[v].prelim = self.walk[w].prelim + self.separation(v, w);
        }

        if let Some(p) = parent {
            let ancestor = self.default_ancestor[p].unwrap_or(self.tree.children(p)[0]);
            self.default_ancestor[p] = Some(self.apportion(v, left_sibling, ancestor));
        }
    }

    /// Pushes the subtree of `v` right of everything to its left, returning the updated default
    /// ancestor.
    fn apportion(&mut self, v: usize, left_sibling: Option<usize>, mut ancestor: usize) -> usize {
        let Some(w) = left_sibling else {
            return ancestor;
        };
        let Some(parent) = self.tree.parent(v) else {
            return ancestor;
        };

        // i = inner, o = outer, p = right subtree (v), m = left forest.
        let mut vip = v;
        let mut vop = v;
        let mut vim = w;
        let mut vom = self.tree.children(parent)[0];
        let mut sip = self.walk[vip].modifier;
        let mut sop = self.walk[vop].modifier;
        let mut sim = self.walk[vim].modifier;
        let mut som = self.walk[vom].modifier;

        let mut next_im = self.next_right(vim);
        let mut next_ip = self.next_left(vip);
        while let (Some(im), Some(ip)) = (next_im, next_ip) {
            let (Some(om), Some(op)) = (self.next_left(vom), self.next_right(vop)) else {
                break;
            };
            vim = im;
            vip = ip;
            vom = om;
            vop = op;
            self.walk[vop].ancestor = v;

            let shift = self.walk[vim].prelim + sim - self.walk[vip].prelim - sip
                + self.separation(vim, vip);
            if shift > 0.0 {
                let wm = self.ancestor_of(vim, v, ancestor);
                self.move_subtree(wm, v, shift);
                sip += shift;
                sop += shift;
            }
            sim += self.walk[vim].modifier;
            sip += self.walk[vip].modifier;
            som += self.walk[vom].modifier;
            sop += self.walk[vop].modifier;

            next_im = self.next_right(vim);
            next_ip = self.next_left(vip);
        }

        if let Some(im) = next_im {
            if self.next_right(vop).is_none() {
                self.walk[vop].thread = Some(im);
                self.walk[vop].modifier += sim - sop;
            }
        }
        if let Some(ip) = next_ip {
            if self.next_left(vom).is_none() {
                self.walk[vom].thread = Some(ip);
                self.walk[vom].modifier += sip - som;
                ancestor = v;
            }
        }
        ancestor
    }

    fn ancestor_of(&self, vim: usize, v: usize, default_ancestor: usize) -> usize {
        let a = self.walk[vim].ancestor;
        if self.tree.parent(a) == self.tree.parent(v) {
            a
        } else {
            default_ancestor
        }
    }

    fn move_subtree(&mut self, wm: usize, wp: usize, shift: f64) {
        let subtrees = self.walk[wp].number as f64 - self.walk[wm].number as f64;
        let change = shift / subtrees;
        self.walk[wp].change -= change;
        self.walk[wp].shift += shift;
        self.walk[wm].change += change;
        self.walk[wp].prelim += shift;
        self.walk[wp].modifier += shift;
    }

    fn execute_shifts(&mut self, v: usize) {
        let mut shift = 0.0;
        let mut change = 0.0;
        for &w in self.tree.children(v).iter().rev() {
            self.walk[w].prelim += shift;
            self.walk[w].modifier += shift;
            change += self.walk[w].change;
            shift += self.walk[w].shift + change;
        }
    }
}
