//! Generic leaf/branch tree shared by reducers, actions and selectors.
//!
//! The compiler produces a single `Tree<CompiledLeaf>`; the three public
//! trees are projections of it through [`Tree::map`], so they have the same
//! keys at every depth.

/// A compiled structure position: a leaf payload or a branch of named children.
#[derive(Clone, Debug)]
pub enum Tree<L> {
    Leaf(L),
    Branch(Branch<L>),
}

/// Named children of a compiled shape.
///
/// A branch is either a reducer boundary or a plain shape that only exists
/// because one of its descendants is a boundary.
#[derive(Clone, Debug)]
pub struct Branch<L> {
    location: String,
    boundary: bool,
    children: Vec<(String, Tree<L>)>,
}

impl<L> Branch<L> {
    /// A plain intermediate branch.
    pub fn new(location: impl Into<String>, children: Vec<(String, Tree<L>)>) -> Self {
        Self {
            location: location.into(),
            boundary: false,
            children,
        }
    }

    /// A branch compiled for a reducer boundary.
    pub fn boundary(location: impl Into<String>, children: Vec<(String, Tree<L>)>) -> Self {
        Self {
            boundary: true,
            ..Self::new(location, children)
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn is_boundary(&self) -> bool {
        self.boundary
    }

    pub fn children(&self) -> &[(String, Tree<L>)] {
        &self.children
    }
}

impl<L> Tree<L> {
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    pub fn as_leaf(&self) -> Option<&L> {
        match self {
            Self::Leaf(leaf) => Some(leaf),
            Self::Branch(_) => None,
        }
    }

    pub fn as_branch(&self) -> Option<&Branch<L>> {
        match self {
            Self::Leaf(_) => None,
            Self::Branch(branch) => Some(branch),
        }
    }

    /// Location path of a branch.
    pub fn location(&self) -> Option<&str> {
        self.as_branch().map(Branch::location)
    }

    /// Child names of a branch, in declaration order; empty for a leaf.
    pub fn keys(&self) -> Vec<&str> {
        self.as_branch()
            .map(|branch| {
                branch
                    .children
                    .iter()
                    .map(|(name, _)| name.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn get(&self, key: &str) -> Option<&Tree<L>> {
        self.as_branch()?
            .children
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, child)| child)
    }

    /// Follow a path of child names.
    pub fn at(&self, path: &[&str]) -> Option<&Tree<L>> {
        path.iter().try_fold(self, |node, key| node.get(key))
    }

    /// The leaf payload at `path`.
    pub fn leaf(&self, path: &[&str]) -> Option<&L> {
        self.at(path)?.as_leaf()
    }

    /// All leaves with their dot-joined paths, depth first.
    pub fn leaves(&self) -> Vec<(String, &L)> {
        let mut out = Vec::new();
        self.collect_leaves(String::new(), &mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, prefix: String, out: &mut Vec<(String, &'a L)>) {
        match self {
            Self::Leaf(leaf) => out.push((prefix, leaf)),
            Self::Branch(branch) => {
                for (name, child) in &branch.children {
                    let path = if prefix.is_empty() {
                        name.clone()
                    } else {
                        format!("{prefix}.{name}")
                    };
                    child.collect_leaves(path, out);
                }
            }
        }
    }

    /// Project every leaf, keeping the branch structure intact.
    pub fn map<M, F>(&self, f: F) -> Tree<M>
    where
        F: Fn(&L) -> M,
    {
        self.map_with(&f)
    }

    fn map_with<M>(&self, f: &dyn Fn(&L) -> M) -> Tree<M> {
        match self {
            Self::Leaf(leaf) => Tree::Leaf(f(leaf)),
            Self::Branch(branch) => Tree::Branch(Branch {
                location: branch.location.clone(),
                boundary: branch.boundary,
                children: branch
                    .children
                    .iter()
                    .map(|(name, child)| (name.clone(), child.map_with(f)))
                    .collect(),
            }),
        }
    }

    /// Same keys and nesting depth as `other`, ignoring leaf payloads.
    pub fn has_same_shape<M>(&self, other: &Tree<M>) -> bool {
        match (self, other) {
            (Self::Leaf(_), Tree::Leaf(_)) => true,
            (Self::Branch(left), Tree::Branch(right)) => {
                left.children.len() == right.children.len()
                    && left
                        .children
                        .iter()
                        .zip(&right.children)
                        .all(|((a, left), (b, right))| a == b && left.has_same_shape(right))
            }
            _ => false,
        }
    }
}
