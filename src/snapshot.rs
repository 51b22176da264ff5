use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::cli::{CheckArgs, GenerateArgs};
use crate::formats::{
    Cat, ContentSnapshot, Entry, Faq, HomepageContent, Kitten, Review, SiteSettings,
};
use crate::reader::ContentReader;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStage {
    Idle,
    ReadingCollections,
    ReadingSingletons,
    Sorting,
    Serializing,
    Done,
    Failed,
}

impl fmt::Display for BuildStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::ReadingCollections => "reading collections",
            Self::ReadingSingletons => "reading singletons",
            Self::Sorting => "sorting",
            Self::Serializing => "serializing",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Runs one snapshot build. Stages only move forward; any error ends in
/// [`BuildStage::Failed`].
#[derive(Debug)]
pub struct SnapshotBuilder {
    reader: ContentReader,
    stage: BuildStage,
}

impl SnapshotBuilder {
    pub fn new(reader: ContentReader) -> Self {
        Self {
            reader,
            stage: BuildStage::Idle,
        }
    }

    pub fn stage(&self) -> BuildStage {
        self.stage
    }

    /// Reads, sorts and assembles the snapshot without writing it.
    pub fn build(&mut self) -> anyhow::Result<ContentSnapshot> {
        let result = self.try_build();
        self.finish(result)
    }

    /// Builds the snapshot and writes it to `out` as pretty-printed JSON.
    pub fn build_to(&mut self, out: &Path) -> anyhow::Result<ContentSnapshot> {
        let result = self.try_build().and_then(|snapshot| {
            self.advance(BuildStage::Serializing);
            write_snapshot(out, &snapshot)?;
            Ok(snapshot)
        });
        self.finish(result)
    }

    fn try_build(&mut self) -> anyhow::Result<ContentSnapshot> {
        self.advance(BuildStage::ReadingCollections);
        let mut cats = self.reader.read_collection::<Cat>()?;
        let mut kittens = self.reader.read_collection::<Kitten>()?;
        let mut reviews = self.reader.read_collection::<Review>()?;
        let mut faqs = self.reader.read_collection::<Faq>()?;

        self.advance(BuildStage::ReadingSingletons);
        let homepage = self
            .reader
            .read_singleton::<HomepageContent>()?
            .unwrap_or_default();
        let settings = self
            .reader
            .read_singleton::<SiteSettings>()?
            .unwrap_or_default();

        self.advance(BuildStage::Sorting);
        sort_entries(&mut cats);
        sort_entries(&mut kittens);
        sort_entries(&mut reviews);
        sort_entries(&mut faqs);

        Ok(ContentSnapshot {
            cats,
            kittens,
            reviews,
            faqs,
            homepage,
            settings,
        })
    }

    fn finish(
        &mut self,
        result: anyhow::Result<ContentSnapshot>,
    ) -> anyhow::Result<ContentSnapshot> {
        match result {
            Ok(snapshot) => {
                self.advance(BuildStage::Done);
                Ok(snapshot)
            }
            Err(err) => {
                let failed_in = self.stage;
                self.advance(BuildStage::Failed);
                Err(err.context(format!("snapshot build failed while {failed_in}")))
            }
        }
    }

    fn advance(&mut self, next: BuildStage) {
        tracing::debug!(from = %self.stage, to = %next, "snapshot stage");
        self.stage = next;
    }
}

/// Stable ascending sort by `order`; equal keys keep their read order.
pub fn sort_entries<T: Entry>(entries: &mut [T]) {
    entries.sort_by_key(|entry| entry.order());
}

/// Overwrites `out`, creating parent directories as needed.
pub fn write_snapshot(out: &Path, snapshot: &ContentSnapshot) -> anyhow::Result<()> {
    if let Some(parent) = out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create snapshot dir: {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(snapshot).context("serialize snapshot")?;
    std::fs::write(out, json).with_context(|| format!("write snapshot: {}", out.display()))?;
    Ok(())
}

pub fn read_snapshot(path: &Path) -> anyhow::Result<ContentSnapshot> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("read snapshot: {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("parse snapshot: {}", path.display()))
}

pub fn run(args: GenerateArgs) -> anyhow::Result<()> {
    let out = PathBuf::from(&args.out);
    let reader = ContentReader::new(&args.content).with_entry_extension(&args.entry_extension);

    tracing::info!(content = %args.content, out = %out.display(), "generating content snapshot");
    let snapshot = SnapshotBuilder::new(reader).build_to(&out)?;

    log_counts(&snapshot);
    tracing::info!(out = %out.display(), "snapshot written");
    Ok(())
}

pub fn check(args: CheckArgs) -> anyhow::Result<()> {
    let reader = ContentReader::new(&args.content).with_entry_extension(&args.entry_extension);
    let snapshot = SnapshotBuilder::new(reader).build()?;

    log_counts(&snapshot);
    println!(
        "{} cats, {} kittens, {} reviews, {} FAQs",
        snapshot.cats.len(),
        snapshot.kittens.len(),
        snapshot.reviews.len(),
        snapshot.faqs.len()
    );
    Ok(())
}

fn log_counts(snapshot: &ContentSnapshot) {
    tracing::info!(
        cats = snapshot.cats.len(),
        kittens = snapshot.kittens.len(),
        reviews = snapshot.reviews.len(),
        faqs = snapshot.faqs.len(),
        "content aggregated"
    );
}
