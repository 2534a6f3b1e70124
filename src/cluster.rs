//! Union-find cluster store over mention ids.
//!
//! Clusters are parent-pointer trees over the mention arena with path
//! compression on [`ClusterStore::find`]. The representative of a cluster is
//! always its earliest mention, so merges never depend on the order in which
//! pairs are visited. Per-cluster member lists and aggregated attributes are
//! kept at the representative.

use crate::mention::{Attributes, MentionId, MentionSet};

/// Partition of a document's mentions into clusters.
#[derive(Debug, Clone)]
pub struct ClusterStore {
    parent: Vec<usize>,
    /// Sorted member positions, valid at representatives only.
    members: Vec<Vec<usize>>,
    /// Aggregated attributes, valid at representatives only.
    attributes: Vec<Attributes>,
}

impl ClusterStore {
    /// Every mention in its own singleton cluster.
    #[must_use]
    pub fn new(mentions: &MentionSet) -> Self {
        let n = mentions.len();
        Self {
            parent: (0..n).collect(),
            members: (0..n).map(|i| vec![i]).collect(),
            attributes: mentions.iter().map(|m| m.attributes.clone()).collect(),
        }
    }

    /// Number of mentions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    /// True if the store holds no mentions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    fn root_index(&self, mut i: usize) -> usize {
        while self.parent[i] != i {
            i = self.parent[i];
        }
        i
    }

    /// Representative of `id`'s cluster, compressing the path walked.
    pub fn find(&mut self, id: MentionId) -> MentionId {
        let mut i = id.index();
        let root = self.root_index(i);
        while self.parent[i] != root {
            let next = self.parent[i];
            self.parent[i] = root;
            i = next;
        }
        MentionId::from_index(root)
    }

    /// True if both mentions are in the same cluster.
    #[must_use]
    pub fn linked(&self, a: MentionId, b: MentionId) -> bool {
        self.root_index(a.index()) == self.root_index(b.index())
    }

    /// Merge the clusters of `a` and `b`; returns the representative.
    ///
    /// The earlier representative survives. Merging linked mentions is a
    /// no-op. Attribute conflicts downgrade to unknown.
    pub fn merge(&mut self, a: MentionId, b: MentionId) -> MentionId {
        let ra = self.find(a).index();
        let rb = self.find(b).index();
        if ra == rb {
            return MentionId::from_index(ra);
        }
        let (keep, gone) = if ra < rb { (ra, rb) } else { (rb, ra) };
        self.parent[gone] = keep;

        let moved = std::mem::take(&mut self.members[gone]);
        let kept = std::mem::take(&mut self.members[keep]);
        self.members[keep] = merge_sorted(kept, moved);

        self.attributes[keep] = self.attributes[keep].merge(&self.attributes[gone]);
        MentionId::from_index(keep)
    }

    /// Members of the cluster containing `id`, in document order.
    pub fn members(&self, id: MentionId) -> impl Iterator<Item = MentionId> + '_ {
        self.members[self.root_index(id.index())]
            .iter()
            .map(|&i| MentionId::from_index(i))
    }

    /// Number of mentions in `id`'s cluster.
    #[must_use]
    pub fn cluster_size(&self, id: MentionId) -> usize {
        self.members[self.root_index(id.index())].len()
    }

    /// Aggregated attributes of `id`'s cluster.
    #[must_use]
    pub fn attributes(&self, id: MentionId) -> &Attributes {
        &self.attributes[self.root_index(id.index())]
    }

    /// Representatives, in document order.
    pub fn representatives(&self) -> impl Iterator<Item = MentionId> + '_ {
        (0..self.parent.len())
            .filter(|&i| self.parent[i] == i)
            .map(MentionId::from_index)
    }

    /// Representative of every mention, indexed by arena position.
    #[must_use]
    pub fn snapshot(&self) -> Vec<MentionId> {
        (0..self.parent.len())
            .map(|i| MentionId::from_index(self.root_index(i)))
            .collect()
    }
}

fn merge_sorted(a: Vec<usize>, b: Vec<usize>) -> Vec<usize> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if a[i] <= b[j] {
            out.push(a[i]);
            i += 1;
        } else {
            out.push(b[j]);
            j += 1;
        }
    }
    out.extend_from_slice(&a[i..]);
    out.extend_from_slice(&b[j..]);
    out
}
