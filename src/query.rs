use std::path::PathBuf;

use anyhow::Context as _;

use crate::cli::{QueryArgs, QueryTarget};
use crate::formats::{Cat, ContentSnapshot, Faq, FaqCategory, Kitten, KittenStatus, Review};
use crate::snapshot::read_snapshot;

impl ContentSnapshot {
    pub fn cat_by_slug(&self, slug: &str) -> Option<&Cat> {
        self.cats.iter().find(|cat| cat.slug == slug)
    }

    pub fn featured_cats(&self) -> Vec<&Cat> {
        self.cats.iter().filter(|cat| cat.featured).collect()
    }

    pub fn kittens_by_status(&self, status: KittenStatus) -> Vec<&Kitten> {
        self.kittens
            .iter()
            .filter(|kitten| kitten.status == status)
            .collect()
    }

    pub fn featured_reviews(&self) -> Vec<&Review> {
        self.reviews.iter().filter(|review| review.featured).collect()
    }

    pub fn faqs_by_category(&self, category: FaqCategory) -> Vec<&Faq> {
        self.faqs
            .iter()
            .filter(|faq| faq.category == category)
            .collect()
    }
}

pub fn run(args: QueryArgs) -> anyhow::Result<()> {
    let snapshot_path = PathBuf::from(&args.snapshot);
    let snapshot = read_snapshot(&snapshot_path)?;

    let json = match args.target {
        QueryTarget::Cat { slug } => {
            let cat = snapshot
                .cat_by_slug(&slug)
                .ok_or_else(|| anyhow::anyhow!("no cat with slug `{slug}`"))?;
            serde_json::to_string_pretty(cat)
        }
        QueryTarget::Cats { featured } => {
            let cats: Vec<&Cat> = if featured {
                snapshot.featured_cats()
            } else {
                snapshot.cats.iter().collect()
            };
            serde_json::to_string_pretty(&cats)
        }
        QueryTarget::Kittens { status } => {
            let kittens: Vec<&Kitten> = match status {
                Some(status) => snapshot.kittens_by_status(status),
                None => snapshot.kittens.iter().collect(),
            };
            serde_json::to_string_pretty(&kittens)
        }
        QueryTarget::Reviews { featured } => {
            let reviews: Vec<&Review> = if featured {
                snapshot.featured_reviews()
            } else {
                snapshot.reviews.iter().collect()
            };
            serde_json::to_string_pretty(&reviews)
        }
        QueryTarget::Faqs { category } => {
            let faqs: Vec<&Faq> = match category {
                Some(category) => snapshot.faqs_by_category(category),
                None => snapshot.faqs.iter().collect(),
            };
            serde_json::to_string_pretty(&faqs)
        }
    }
    .context("serialize query result")?;

    println!("{json}");
    Ok(())
}
