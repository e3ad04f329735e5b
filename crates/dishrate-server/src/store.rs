//! Review store
//!
//! In-memory review collection with an optional append-only JSON-lines
//! journal. The journal is replayed at startup, appended on every
//! create, and truncated by clear-all. Single-record create and bulk
//! clear are atomic under the store locks; there is no update path.

use crate::config::StoreConfig;
use dishrate_core::{Error, Result, Review};
use parking_lot::{Mutex, RwLock};
use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use tracing::{info, warn};

pub struct ReviewStore {
    reviews: RwLock<Vec<Review>>,
    journal: Option<Mutex<Journal>>,
}

struct Journal {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl ReviewStore {
    /// Open the store, replaying the journal if one is configured.
    pub fn open(config: &StoreConfig) -> Result<Self> {
        let Some(path) = &config.journal_path else {
            return Ok(Self::in_memory());
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let reviews = replay_journal(path)?;
        if !reviews.is_empty() {
            info!("Replayed {} reviews from {}", reviews.len(), path.display());
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            reviews: RwLock::new(reviews),
            journal: Some(Mutex::new(Journal {
                path: path.clone(),
                writer: BufWriter::new(file),
            })),
        })
    }

    /// Store without any journal, for tests and ephemeral runs.
    pub fn in_memory() -> Self {
        Self {
            reviews: RwLock::new(Vec::new()),
            journal: None,
        }
    }

    /// Persist a new review. The journal write happens first so an IO
    /// failure never leaves memory ahead of disk.
    pub fn create(&self, text: impl Into<String>, predicted_rating: f64) -> Result<Review> {
        let review = Review::new(text, predicted_rating);

        if let Some(journal) = &self.journal {
            let mut journal = journal.lock();
            let line = serde_json::to_string(&review)?;
            journal
                .writer
                .write_all(line.as_bytes())
                .and_then(|_| journal.writer.write_all(b"\n"))
                .and_then(|_| journal.writer.flush())
                .map_err(|e| Error::storage(format!("Failed to append review journal: {e}")))?;
        }

        self.reviews.write().push(review.clone());
        Ok(review)
    }

    /// All reviews, newest first.
    pub fn newest_first(&self) -> Vec<Review> {
        // Appends are chronological, so reversed insertion order is
        // newest-first without re-sorting.
        self.reviews.read().iter().rev().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.reviews.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.reviews.read().is_empty()
    }

    /// Mean predicted rating, `None` when the store is empty.
    pub fn average_rating(&self) -> Option<f64> {
        let reviews = self.reviews.read();
        if reviews.is_empty() {
            return None;
        }
        Some(reviews.iter().map(|r| r.predicted_rating).sum::<f64>() / reviews.len() as f64)
    }

    /// Review counts keyed by rounded rating; every star 1..=5 is
    /// present even at zero.
    pub fn star_distribution(&self) -> BTreeMap<u8, u64> {
        let mut counts: BTreeMap<u8, u64> = (1..=5).map(|star| (star, 0)).collect();
        for review in self.reviews.read().iter() {
            let star = (review.predicted_rating.round() as i64).clamp(1, 5) as u8;
            *counts.entry(star).or_default() += 1;
        }
        counts
    }

    /// Counts per distinct raw rating value, ascending.
    pub fn rating_groups(&self) -> Vec<(f64, u64)> {
        let mut groups: Vec<(f64, u64)> = Vec::new();
        for review in self.reviews.read().iter() {
            match groups
                .iter_mut()
                .find(|(rating, _)| *rating == review.predicted_rating)
            {
                Some((_, count)) => *count += 1,
                None => groups.push((review.predicted_rating, 1)),
            }
        }
        groups.sort_by(|a, b| a.0.total_cmp(&b.0));
        groups
    }

    /// Delete every review, returning how many were removed.
    pub fn clear_all(&self) -> Result<usize> {
        let mut reviews = self.reviews.write();
        let count = reviews.len();

        if let Some(journal) = &self.journal {
            let mut journal = journal.lock();
            let file = File::create(&journal.path)
                .map_err(|e| Error::storage(format!("Failed to truncate review journal: {e}")))?;
            journal.writer = BufWriter::new(file);
        }

        reviews.clear();
        Ok(count)
    }
}

/// Read all reviews back from a journal file. Lines that fail to
/// parse are skipped with a warning rather than refusing to start.
fn replay_journal(path: &PathBuf) -> Result<Vec<Review>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let reader = BufReader::new(File::open(path)?);
    let mut reviews = Vec::new();
    for (n, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Review>(&line) {
            Ok(review) => reviews.push(review),
            Err(e) => warn!("Skipping corrupt journal line {}: {e}", n + 1),
        }
    }
    Ok(reviews)
}
