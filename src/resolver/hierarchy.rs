use anyhow::{Result, bail};

use crate::model::TocEntry;

/// One TOC entry enriched with hierarchy links. Nodes live in the
/// `SectionTree` arena and refer to their parent by index; they are never
/// mutated after construction.
#[derive(Debug, Clone)]
pub struct SectionNode {
    pub entry: TocEntry,
    pub parent: Option<usize>,
    /// Effective nesting depth. Differs from `entry.level` only for orphaned
    /// deep entries that were promoted to level 1.
    pub level: u32,
    pub range_start: u32,
    /// Inclusive end of the ordinal interval this node covers, open-ended
    /// for the last node at each depth.
    pub range_end: Option<u32>,
}

impl SectionNode {
    pub fn contains(&self, ordinal: u32) -> bool {
        self.range_start <= ordinal && self.range_end.is_none_or(|end| ordinal <= end)
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedSection {
    pub node_index: usize,
    pub title: String,
    pub level: u32,
    pub parent_title: Option<String>,
}

/// The reconstructed section hierarchy: an ordinal-sorted arena of nodes,
/// one per merged TOC entry. Rebuilt from scratch whenever a new TOC is
/// loaded; no incremental update.
#[derive(Debug, Clone)]
pub struct SectionTree {
    nodes: Vec<SectionNode>,
    structural_warnings: Vec<String>,
}

impl SectionTree {
    /// Builds the hierarchy from a deduplicated, ordinal-sorted entry list.
    ///
    /// Single linear pass with one open-ancestor slot per level: processing
    /// an entry closes every open node at its own level or deeper. An entry
    /// deeper than level 1 with no open shallower ancestor degrades to
    /// level 1 and is recorded as a structural warning. A second pass closes
    /// each node at the next entry whose level is the same or shallower.
    ///
    /// An unsorted or empty entry list is a caller bug and fails fast.
    pub fn build(entries: &[TocEntry]) -> Result<Self> {
        if entries.is_empty() {
            bail!("cannot build a section hierarchy from an empty TOC entry list");
        }
        if let Some(window) = entries.windows(2).find(|pair| pair[0].ordinal > pair[1].ordinal) {
            bail!(
                "TOC entries must be sorted by ordinal before building: {} (page {}) precedes {} (page {})",
                window[0].title,
                window[0].ordinal,
                window[1].title,
                window[1].ordinal
            );
        }

        let mut nodes = Vec::with_capacity(entries.len());
        let mut structural_warnings = Vec::new();
        let mut open_by_level: Vec<Option<usize>> = Vec::new();

        for entry in entries {
            let mut level = entry.level.max(1);

            let parent = if level > 1 {
                let parent_slot = (level - 1) as usize;
                match open_by_level.get(parent_slot).copied().flatten() {
                    Some(index) => Some(index),
                    None => {
                        structural_warnings.push(format!(
                            "orphaned level-{} entry '{}' (page {}) promoted to a main section",
                            level, entry.title, entry.ordinal
                        ));
                        level = 1;
                        None
                    }
                }
            } else {
                None
            };

            let index = nodes.len();
            nodes.push(SectionNode {
                entry: entry.clone(),
                parent,
                level,
                range_start: entry.ordinal,
                range_end: None,
            });

            let slot = level as usize;
            if open_by_level.len() <= slot {
                open_by_level.resize(slot + 1, None);
            }
            for open in open_by_level.iter_mut().skip(slot) {
                *open = None;
            }
            open_by_level[slot] = Some(index);
        }

        // A node ends one page before the next entry at the same or a
        // shallower level; one boundary slot per level applies that rule to
        // siblings and returns to a shallower ancestor alike in a single
        // reverse pass. The end is clamped to the start so same-ordinal
        // neighbors keep a non-empty range.
        let deepest = nodes.iter().map(|node| node.level).max().unwrap_or(1) as usize;
        let mut next_boundary: Vec<Option<u32>> = vec![None; deepest + 1];
        for index in (0..nodes.len()).rev() {
            let level = nodes[index].level as usize;
            let start = nodes[index].range_start;
            nodes[index].range_end =
                next_boundary[level].map(|ordinal| ordinal.saturating_sub(1).max(start));
            for slot in next_boundary.iter_mut().skip(level) {
                *slot = Some(nodes[index].entry.ordinal);
            }
        }

        Ok(Self {
            nodes,
            structural_warnings,
        })
    }

    pub fn nodes(&self) -> &[SectionNode] {
        &self.nodes
    }

    pub fn structural_warnings(&self) -> &[String] {
        &self.structural_warnings
    }

    pub fn main_section_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.level == 1).count()
    }

    /// Maps a canonical page ordinal to the deepest enclosing section.
    ///
    /// Pure function of the tree: binary search bounds the candidates to
    /// nodes starting at or before the ordinal, then the containing node
    /// with the maximum level wins. Ties on level fall to the latest range
    /// start and then to the latest entry, so a section and its first
    /// subsection sharing a start resolve to the subsection even when the
    /// TOC lists them out of nesting order. Ordinals before the first
    /// declared section are intentionally unresolved.
    pub fn resolve(&self, ordinal: u32) -> Option<ResolvedSection> {
        let upper = self
            .nodes
            .partition_point(|node| node.range_start <= ordinal);
        if upper == 0 {
            return None;
        }

        // max_by_key keeps the last of equally-deep candidates, which is
        // the latest entry in reading order.
        let (index, node) = self.nodes[..upper]
            .iter()
            .enumerate()
            .filter(|(_, node)| node.contains(ordinal))
            .max_by_key(|(_, node)| (node.level, node.range_start))?;

        let parent_title = node
            .parent
            .map(|parent_index| self.nodes[parent_index].entry.title.clone());

        Some(ResolvedSection {
            node_index: index,
            title: node.entry.title.clone(),
            level: node.level,
            parent_title,
        })
    }
}
