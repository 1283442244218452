//! Adjacency-matrix graph used to prove a command hierarchy is a rooted tree.

/// Directed graph over dense indices. Index 0 is the root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    adj: Vec<Vec<bool>>,
}

/// Cycle and reachability facts gathered by a single walk from the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    pub cyclic: bool,
    pub first_unreachable: Option<usize>,
}

impl Shape {
    pub fn is_tree(&self) -> bool {
        !self.cyclic && self.first_unreachable.is_none()
    }
}

/// Outcome of a depth-first walk from the root.
struct Walk {
    cyclic: bool,
    visited: Vec<bool>,
}

impl Graph {
    /// A graph of `len` nodes with no edges.
    pub fn with_nodes(len: usize) -> Self {
        Self {
            adj: vec![vec![false; len]; len],
        }
    }

    pub fn from_adjacency(adj: Vec<Vec<bool>>) -> Self {
        Self { adj }
    }

    pub fn adjacency(&self) -> &[Vec<bool>] {
        &self.adj
    }

    pub fn len(&self) -> usize {
        self.adj.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adj.is_empty()
    }

    /// Add a directed edge. Out-of-range indices are ignored.
    pub fn add_edge(&mut self, from: usize, to: usize) {
        if let Some(cell) = self.adj.get_mut(from).and_then(|row| row.get_mut(to)) {
            *cell = true;
        }
    }

    fn edge(&self, from: usize, to: usize) -> bool {
        self.adj
            .get(from)
            .and_then(|row| row.get(to))
            .copied()
            .unwrap_or(false)
    }

    /// Whether the walk from the root runs into a cycle.
    pub fn is_cyclic(&self) -> bool {
        self.walk().cyclic
    }

    /// Index of the first node the root cannot reach, if any.
    pub fn first_unreachable(&self) -> Option<usize> {
        self.walk().visited.iter().position(|seen| !seen)
    }

    /// Acyclic and every node reachable from the root.
    pub fn is_tree(&self) -> bool {
        self.shape().is_tree()
    }

    pub fn shape(&self) -> Shape {
        let walk = self.walk();
        Shape {
            cyclic: walk.cyclic,
            first_unreachable: walk.visited.iter().position(|seen| !seen),
        }
    }

    fn walk(&self) -> Walk {
        let n = self.len();
        let mut visited = vec![false; n];

        // Graphs of up to two nodes are decided directly. In the two-node case
        // a pair of opposite edges counts as a cycle.
        let cyclic = match n {
            0 => false,
            1 => {
                visited[0] = true;
                self.adj[0].len() == 1 && self.adj[0][0]
            }
            2 => {
                visited[0] = true;
                visited[1] = self.edge(0, 1);
                (self.edge(0, 1) && self.edge(1, 0)) || self.edge(0, 0) || self.edge(1, 1)
            }
            _ => self.visit(0, None, &mut visited),
        };

        Walk { cyclic, visited }
    }

    fn visit(&self, v: usize, parent: Option<usize>, visited: &mut [bool]) -> bool {
        visited[v] = true;
        for child in 0..self.len() {
            if !self.edge(v, child) {
                continue;
            }
            if child == v {
                return true;
            }
            if !visited[child] {
                if self.visit(child, Some(v), visited) {
                    return true;
                }
            } else if Some(child) != parent {
                return true;
            }
        }
        false
    }
}
