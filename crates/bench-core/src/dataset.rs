//! Synthetic benchmark datasets.

use serde::{Deserialize, Serialize};

use crate::embedding::HashEmbedder;
use crate::Embedding;

/// One memory to load into every system.
#[derive(Debug, Clone)]
pub struct DatasetEntry {
    pub text: String,
    pub embedding: Embedding,
    /// Importance in [0, 1].
    pub importance: f32,
}

/// Text template and importance cycle used to generate entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetTemplate {
    /// Machine-learning system descriptions with importance 0.5..=0.9.
    #[default]
    Comprehensive,
    /// A single sentence suffixed with the index, importance fixed at 0.8.
    Stress,
}

const COMPREHENSIVE_IMPORTANCE: [f32; 5] = [0.5, 0.6, 0.7, 0.8, 0.9];
const STRESS_IMPORTANCE: [f32; 1] = [0.8];

const STRESS_TEXT: &str = "Artificial intelligence systems benefit from structured memory.";

impl DatasetTemplate {
    /// Text of entry `i`. Distinct for distinct `i`.
    pub fn text(&self, i: usize) -> String {
        match self {
            Self::Comprehensive => format!(
                "Artificial intelligence and machine learning system #{i} with structured memory architecture"
            ),
            Self::Stress => format!("{STRESS_TEXT} #{i}"),
        }
    }

    /// Importance of entry `i`.
    pub fn importance(&self, i: usize) -> f32 {
        let cycle: &[f32] = match self {
            Self::Comprehensive => &COMPREHENSIVE_IMPORTANCE,
            Self::Stress => &STRESS_IMPORTANCE,
        };
        cycle[i % cycle.len()]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Comprehensive => "comprehensive",
            Self::Stress => "stress",
        }
    }
}

/// An immutable set of entries shared by every adapter for one dataset size.
#[derive(Debug, Clone)]
pub struct Dataset {
    entries: Vec<DatasetEntry>,
}

impl Dataset {
    /// Generate `n` entries from `template`, embedding each text with `embedder`.
    pub fn generate(n: usize, template: DatasetTemplate, embedder: &HashEmbedder) -> Self {
        let entries = (0..n)
            .map(|i| {
                let text = template.text(i);
                DatasetEntry {
                    embedding: embedder.embed(&text),
                    importance: template.importance(i),
                    text,
                }
            })
            .collect();

        Self { entries }
    }

    pub fn entries(&self) -> &[DatasetEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DatasetEntry> {
        self.entries.iter()
    }
}

impl From<Vec<DatasetEntry>> for Dataset {
    fn from(entries: Vec<DatasetEntry>) -> Self {
        Self { entries }
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a DatasetEntry;
    type IntoIter = std::slice::Iter<'a, DatasetEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
