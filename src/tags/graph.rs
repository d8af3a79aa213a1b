use std::collections::{HashMap, HashSet};

use super::error::EmptyInputError;

#[derive(Clone, Debug, PartialEq)]
pub struct TagNode {
    pub id: String,
    pub count: u32,
}

impl TagNode {
    pub fn radius(&self) -> f32 {
        (self.count as f32 * 10.0).sqrt()
    }
}

/// Undirected co-occurrence between two distinct tags.
///
/// `source` and `target` index into [`TagGraph::nodes`] and are ordered so the
/// source id sorts before the target id.
#[derive(Clone, Debug, PartialEq)]
pub struct TagLink {
    pub source: usize,
    pub target: usize,
    pub count: u32,
}

impl TagLink {
    pub fn other(&self, index: usize) -> Option<usize> {
        if self.source == index {
            Some(self.target)
        } else if self.target == index {
            Some(self.source)
        } else {
            None
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct TagGraph {
    pub nodes: Vec<TagNode>,
    pub links: Vec<TagLink>,
    index_by_id: HashMap<String, usize>,
    link_by_pair: HashMap<(usize, usize), usize>,
    adjacency: Vec<Vec<usize>>,
}

impl TagGraph {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    #[cfg(test)]
    pub fn node(&self, id: &str) -> Option<&TagNode> {
        self.index_of(id).map(|index| &self.nodes[index])
    }

    #[cfg(test)]
    pub fn link_between(&self, a: &str, b: &str) -> Option<&TagLink> {
        let a = self.index_of(a)?;
        let b = self.index_of(b)?;
        let key = self.pair_key(a, b)?;
        self.link_by_pair.get(&key).map(|&index| &self.links[index])
    }

    #[cfg(test)]
    pub fn link_ids(&self, link: &TagLink) -> (&str, &str) {
        (
            self.nodes[link.source].id.as_str(),
            self.nodes[link.target].id.as_str(),
        )
    }

    pub fn max_link_count(&self) -> u32 {
        self.links.iter().map(|link| link.count).max().unwrap_or(0)
    }

    /// Link indices incident to the node at `index`.
    pub fn links_of(&self, index: usize) -> &[usize] {
        self.adjacency
            .get(index)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn degree(&self, index: usize) -> usize {
        self.links_of(index).len()
    }

    #[cfg(test)]
    pub fn neighbors(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        self.links_of(index)
            .iter()
            .filter_map(move |&link| self.links[link].other(index))
    }

    fn pair_key(&self, a: usize, b: usize) -> Option<(usize, usize)> {
        if a == b || a >= self.nodes.len() || b >= self.nodes.len() {
            return None;
        }
        if self.nodes[a].id < self.nodes[b].id {
            Some((a, b))
        } else {
            Some((b, a))
        }
    }

    fn upsert_node(&mut self, tag: &str) -> usize {
        if let Some(&index) = self.index_by_id.get(tag) {
            self.nodes[index].count += 1;
            return index;
        }

        let index = self.nodes.len();
        self.nodes.push(TagNode {
            id: tag.to_owned(),
            count: 1,
        });
        self.index_by_id.insert(tag.to_owned(), index);
        self.adjacency.push(Vec::new());
        index
    }

    fn upsert_link(&mut self, a: usize, b: usize) {
        let Some(key) = self.pair_key(a, b) else {
            return;
        };

        if let Some(&index) = self.link_by_pair.get(&key) {
            self.links[index].count += 1;
            return;
        }

        let index = self.links.len();
        self.links.push(TagLink {
            source: key.0,
            target: key.1,
            count: 1,
        });
        self.link_by_pair.insert(key, index);
        self.adjacency[key.0].push(index);
        self.adjacency[key.1].push(index);
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Count each tag once per file and pair only unique tags.
    pub dedup_within_file: bool,
}

pub fn split_tags(payload: &str) -> Vec<&str> {
    payload
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// Folds per-file tag payloads into a single [`TagGraph`].
///
/// Without `dedup_within_file`, a tag repeated inside one file counts once per
/// occurrence and every index pair `i < j` with distinct tags adds one to the
/// link, so repeats multiply link counts.
pub struct TagGraphBuilder {
    graph: TagGraph,
    options: BuildOptions,
    payloads: usize,
}

impl TagGraphBuilder {
    pub fn new(options: BuildOptions) -> Self {
        Self {
            graph: TagGraph::default(),
            options,
            payloads: 0,
        }
    }

    pub fn fold(&mut self, payload: &str) {
        self.payloads += 1;

        let mut tags = split_tags(payload);
        if self.options.dedup_within_file {
            let mut seen = HashSet::new();
            tags.retain(|tag| seen.insert(*tag));
        }

        let indices = tags
            .iter()
            .map(|tag| self.graph.upsert_node(tag))
            .collect::<Vec<_>>();

        for i in 0..indices.len() {
            for j in (i + 1)..indices.len() {
                if indices[i] != indices[j] {
                    self.graph.upsert_link(indices[i], indices[j]);
                }
            }
        }
    }

    pub fn payloads(&self) -> usize {
        self.payloads
    }

    pub fn finish(self) -> Result<TagGraph, EmptyInputError> {
        if self.graph.is_empty() {
            return Err(EmptyInputError {
                payloads: self.payloads,
            });
        }
        Ok(self.graph)
    }
}

#[cfg(test)]
pub fn build_tag_graph<'a, I>(
    payloads: I,
    options: BuildOptions,
) -> Result<TagGraph, EmptyInputError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut builder = TagGraphBuilder::new(options);
    for payload in payloads {
        builder.fold(payload);
    }
    builder.finish()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use proptest::prelude::*;

    use super::*;

    fn build(payloads: &[&str]) -> TagGraph {
        build_tag_graph(payloads.iter().copied(), BuildOptions::default())
            .expect("payloads contain tags")
    }

    #[test]
    fn two_files_share_one_tag() {
        let graph = build(&["cat, dog", "dog, bird"]);

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.node("cat").map(|n| n.count), Some(1));
        assert_eq!(graph.node("dog").map(|n| n.count), Some(2));
        assert_eq!(graph.node("bird").map(|n| n.count), Some(1));

        assert_eq!(graph.link_count(), 2);
        assert_eq!(graph.link_between("cat", "dog").map(|l| l.count), Some(1));
        assert_eq!(graph.link_between("bird", "dog").map(|l| l.count), Some(1));
        assert!(graph.link_between("cat", "bird").is_none());
    }

    #[test]
    fn repeated_tag_multiplies_pairs() {
        let graph = build(&["x, x, y"]);

        assert_eq!(graph.node("x").map(|n| n.count), Some(2));
        assert_eq!(graph.node("y").map(|n| n.count), Some(1));
        assert_eq!(graph.link_between("x", "y").map(|l| l.count), Some(2));
        assert!(graph.link_between("x", "x").is_none());
        assert_eq!(graph.link_count(), 1);
    }

    #[test]
    fn dedup_within_file_counts_presence() {
        let graph = build_tag_graph(
            ["x, x, y", "x"],
            BuildOptions {
                dedup_within_file: true,
            },
        )
        .expect("payloads contain tags");

        assert_eq!(graph.node("x").map(|n| n.count), Some(2));
        assert_eq!(graph.link_between("x", "y").map(|l| l.count), Some(1));
    }

    #[test]
    fn link_endpoints_are_ordered_by_id() {
        let graph = build(&["zebra, apple"]);
        let link = &graph.links[0];
        assert_eq!(graph.link_ids(link), ("apple", "zebra"));
        assert_eq!(graph.link_between("zebra", "apple"), Some(link));
    }

    #[test]
    fn tokens_are_trimmed_and_empty_ones_dropped() {
        assert_eq!(split_tags("  a ,b,, c ,\n"), vec!["a", "b", "c"]);
        assert!(split_tags("").is_empty());
        assert!(split_tags(" , ,").is_empty());
    }

    #[test]
    fn tags_are_case_sensitive() {
        let graph = build(&["Rust, rust"]);
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.link_count(), 1);
    }

    #[test]
    fn empty_payloads_fail_to_build() {
        let error = build_tag_graph(["", " , "], BuildOptions::default())
            .expect_err("no tags were supplied");
        assert_eq!(error.payloads, 2);
    }

    #[test]
    fn adjacency_tracks_neighbors() {
        let graph = build(&["a, b, c", "c, d"]);
        let c = graph.index_of("c").expect("c exists");
        let mut neighbors = graph
            .neighbors(c)
            .map(|index| graph.nodes[index].id.as_str())
            .collect::<Vec<_>>();
        neighbors.sort_unstable();

        assert_eq!(neighbors, vec!["a", "b", "d"]);
        assert_eq!(graph.degree(c), 3);
        assert_eq!(graph.max_link_count(), 1);
        assert!(graph.link_between("a", "d").is_none());
        assert!(graph.link_between("d", "c").is_some());
    }

    #[test]
    fn radius_follows_count() {
        let node = TagNode {
            id: "t".to_owned(),
            count: 10,
        };
        assert!((node.radius() - 10.0).abs() < 1e-5);
    }

    fn payload_strategy() -> impl Strategy<Value = Vec<Vec<String>>> {
        prop::collection::vec(
            prop::collection::vec(prop::sample::select(vec!["a", "b", "c", "d", "e", "f"]), 0..6)
                .prop_map(|tags| tags.into_iter().map(str::to_owned).collect()),
            1..6,
        )
    }

    proptest! {
        #[test]
        fn node_set_matches_distinct_tags(files in payload_strategy()) {
            let payloads = files.iter().map(|tags| tags.join(", ")).collect::<Vec<_>>();
            let distinct = files.iter().flatten().cloned().collect::<BTreeSet<_>>();

            match build_tag_graph(payloads.iter().map(String::as_str), BuildOptions::default()) {
                Ok(graph) => prop_assert_eq!(graph.node_count(), distinct.len()),
                Err(_) => prop_assert!(distinct.is_empty()),
            }
        }

        #[test]
        fn links_exist_only_for_co_occurring_pairs(files in payload_strategy()) {
            let texts = files.iter().map(|tags| tags.join(",")).collect::<Vec<_>>();
            let payloads = texts.iter().map(String::as_str);
            let Ok(graph) = build_tag_graph(payloads, BuildOptions::default()) else {
                return Ok(());
            };

            for link in &graph.links {
                prop_assert_ne!(link.source, link.target);
            }

            let ids = graph.nodes.iter().map(|node| node.id.clone()).collect::<Vec<_>>();
            for a in &ids {
                for b in &ids {
                    if a >= b {
                        continue;
                    }
                    let co_occur = files
                        .iter()
                        .any(|tags| tags.contains(a) && tags.contains(b));
                    prop_assert_eq!(graph.link_between(a, b).is_some(), co_occur);
                }
            }
        }

        #[test]
        fn folding_more_files_never_lowers_counts(
            files in payload_strategy(),
            extra in payload_strategy(),
        ) {
            let mut builder = TagGraphBuilder::new(BuildOptions::default());
            for tags in &files {
                builder.fold(&tags.join(","));
            }
            let before = builder.graph.clone();
            for tags in &extra {
                builder.fold(&tags.join(","));
            }
            let after = &builder.graph;

            for node in &before.nodes {
                let later = after.node(&node.id).map(|n| n.count).unwrap_or(0);
                prop_assert!(later >= node.count);
            }
            for link in &before.links {
                let (a, b) = before.link_ids(link);
                let later = after.link_between(a, b).map(|l| l.count).unwrap_or(0);
                prop_assert!(later >= link.count);
            }
        }
    }
}
