//! Text rendering of chromosomes and per-generation progress output.
//!
//! Nodes are printed in braces joined by `<--->` to show chain links.
//! Identity in the concise mode is the node's chain position, which is
//! stable within a render.

use crate::chromosome::Chromosome;
use crate::error::Result;
use std::fmt::Write as _;
use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::Path;

/// How much detail a render carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// One node per line with position, kind, and payload.
    Verbose,
    /// Single line of `{ position:payload }` cells joined by `<--->`.
    ConciseIds,
    /// Concise line restricted to chain positions `from..to`
    /// (zero-based, end-exclusive, clamped to the chromosome length).
    ConciseRange { from: usize, to: usize },
}

/// Renders a chromosome in the requested mode.
pub fn render(chromosome: &Chromosome, mode: RenderMode) -> String {
    match mode {
        RenderMode::Verbose => {
            let mut out = String::new();
            for (pos, payload) in chromosome.iter().enumerate() {
                let _ = writeln!(
                    out,
                    "node {pos:4}  [{:?}]  {payload}",
                    chromosome.kind()
                );
            }
            out
        }
        RenderMode::ConciseIds => concise(chromosome, 0, chromosome.len()),
        RenderMode::ConciseRange { from, to } => {
            let to = to.min(chromosome.len());
            let from = from.min(to);
            concise(chromosome, from, to)
        }
    }
}

fn concise(chromosome: &Chromosome, from: usize, to: usize) -> String {
    let mut out = String::new();
    for (pos, payload) in chromosome.iter().enumerate().take(to).skip(from) {
        if !out.is_empty() {
            out.push_str(" <---> ");
        }
        let _ = write!(out, "{{ {pos}:{payload} }}");
    }
    out
}

/// Appends one generation's summary to the visualization output file.
pub fn write_generation(
    path: &Path,
    generation: usize,
    best_fitness: f64,
    best: &Chromosome,
) -> Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(
        file,
        "generation {generation}: best fitness {best_fitness}\n{}",
        render(best, RenderMode::ConciseIds)
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chromosome::{NodePayload, ObjectKind};

    fn chrom() -> Chromosome {
        Chromosome::from_payloads(
            ObjectKind::Integer,
            vec![
                NodePayload::Integer(1),
                NodePayload::Integer(2),
                NodePayload::Integer(3),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_verbose_one_line_per_node() {
        let text = render(&chrom(), RenderMode::Verbose);
        assert_eq!(text.lines().count(), 3);
        assert!(text.contains("int:2"));
    }

    #[test]
    fn test_concise_joins_with_links() {
        let text = render(&chrom(), RenderMode::ConciseIds);
        assert_eq!(text, "{ 0:int:1 } <---> { 1:int:2 } <---> { 2:int:3 }");
    }

    #[test]
    fn test_range_clamps() {
        let text = render(&chrom(), RenderMode::ConciseRange { from: 1, to: 99 });
        assert_eq!(text, "{ 1:int:2 } <---> { 2:int:3 }");
        let empty = render(&chrom(), RenderMode::ConciseRange { from: 5, to: 2 });
        assert!(empty.is_empty());
    }

    #[test]
    fn test_write_generation_appends() {
        let dir = std::env::temp_dir().join("seqevo-render-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("run.txt");
        let _ = std::fs::remove_file(&path);
        write_generation(&path, 0, 3.5, &chrom()).unwrap();
        write_generation(&path, 1, 2.0, &chrom()).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("generation 0: best fitness 3.5"));
        assert!(contents.contains("generation 1: best fitness 2"));
        std::fs::remove_file(&path).unwrap();
    }
}
