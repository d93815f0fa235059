/*
 * SPDX-FileCopyrightText: 2026 power-rank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Graphs in adjacency-list format.
//!
//! The format is the one used by
//! [NetworkX](https://networkx.org/documentation/stable/reference/readwrite/adjlist.html):
//! each line contains a source node followed by its successors, separated by
//! whitespace.
//!
//! ```text
//! # comment
//! a b c
//! b c
//! c a
//! d
//! ```
//!
//! Everything following a `#` is ignored, as are blank lines. Node labels are
//! arbitrary strings without whitespace, and numerical identifiers are
//! assigned to them in order of first appearance. A source may appear on
//! several lines; repeated arcs are collapsed.

use crate::matrix::CscMatrix;
use anyhow::{Context, Result};
use dsi_progress_logger::{no_logging, ProgressLog};
use std::collections::HashMap;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// The adjacency matrix of a graph, together with the labels of its nodes.
///
/// Column *j* of the matrix contains the successors of node *j* (that is,
/// the node with label `labels[j]`), each with value one.
#[derive(Debug, Clone, PartialEq)]
pub struct Adjacency {
    labels: Vec<String>,
    matrix: CscMatrix,
}

impl Adjacency {
    /// Reads a graph in adjacency-list format.
    pub fn from_reader(reader: impl BufRead) -> Result<Self> {
        Self::read(reader, no_logging![])
    }

    /// Reads a graph in adjacency-list format from a file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .with_context(|| format!("Could not open {}", path.display()))?;
        Self::from_reader(BufReader::new(file))
            .with_context(|| format!("Could not read graph from {}", path.display()))
    }

    /// Reads a graph in adjacency-list format, logging progress on `pl`.
    pub fn read(reader: impl BufRead, pl: &mut impl ProgressLog) -> Result<Self> {
        let mut ids: HashMap<String, usize> = HashMap::new();
        let mut labels = Vec::new();
        let mut arcs = Vec::new();

        let mut id_of = |label: &str| -> usize {
            if let Some(&id) = ids.get(label) {
                return id;
            }
            let id = labels.len();
            labels.push(label.to_owned());
            ids.insert(label.to_owned(), id);
            id
        };

        pl.item_name("line");
        pl.expected_updates(None);
        pl.start("Reading adjacency lists...");
        for (line_num, line) in reader.lines().enumerate() {
            let line = line.with_context(|| format!("Error reading line {}", line_num + 1))?;
            let content = match line.find('#') {
                Some(pos) => &line[..pos],
                None => &line[..],
            };
            let mut tokens = content.split_whitespace();
            let Some(src) = tokens.next() else {
                continue;
            };
            let src = id_of(src);
            for dst in tokens {
                arcs.push((src, id_of(dst)));
            }
            pl.light_update();
        }
        pl.done();

        let matrix = CscMatrix::from_arcs(labels.len(), arcs);
        log::info!(
            "Read {} nodes and {} arcs",
            labels.len(),
            matrix.nnz()
        );
        Ok(Self { labels, matrix })
    }

    pub fn num_nodes(&self) -> usize {
        self.labels.len()
    }

    /// Returns the number of distinct arcs.
    pub fn num_arcs(&self) -> usize {
        self.matrix.nnz()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Returns the label of node `node`.
    pub fn label(&self, node: usize) -> &str {
        &self.labels[node]
    }

    pub fn matrix(&self) -> &CscMatrix {
        &self.matrix
    }

    pub fn into_parts(self) -> (Vec<String>, CscMatrix) {
        (self.labels, self.matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_in_appearance_order() -> Result<()> {
        let adj = Adjacency::from_reader("b a\na c\n".as_bytes())?;
        assert_eq!(adj.labels(), &["b", "a", "c"]);
        assert_eq!(adj.matrix().column(0).0, &[1]);
        assert_eq!(adj.matrix().column(1).0, &[2]);
        assert_eq!(adj.matrix().column_nnz(2), 0);
        Ok(())
    }

    #[test]
    fn test_comments_and_blank_lines() -> Result<()> {
        let text = "# header\n\n1 2 # trailing\n   \n2\n";
        let adj = Adjacency::from_reader(text.as_bytes())?;
        assert_eq!(adj.num_nodes(), 2);
        assert_eq!(adj.num_arcs(), 1);
        assert_eq!(adj.label(1), "2");
        Ok(())
    }
}
