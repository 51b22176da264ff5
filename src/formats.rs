use serde::{Deserialize, Deserializer, Serialize};

use crate::normalize::{
    RawImage, deserialize_text, deserialize_text_or_empty, normalize_images,
};

/// One item of a collection. The constants tell the normalizer where the
/// entry's body goes and which integer fields need coercion.
pub trait Entry: serde::de::DeserializeOwned + Serialize {
    /// Directory name under the content root.
    const COLLECTION: &'static str;
    /// Field that receives the trimmed body text.
    const BODY_FIELD: &'static str;
    /// Integer fields and the value they fall back to when malformed.
    const INTEGER_FIELDS: &'static [IntegerField] = &[IntegerField::ORDER];
    /// `(alias, field)` header keys. The alias is only used when the field
    /// itself is absent.
    const ALIASES: &'static [(&'static str, &'static str)] = &[];

    fn slug(&self) -> &str;
    fn order(&self) -> i64;
}

#[derive(Debug, Clone, Copy)]
pub struct IntegerField {
    pub key: &'static str,
    pub default: i64,
    pub min: i64,
    pub max: i64,
}

impl IntegerField {
    pub const ORDER: Self = Self {
        key: "order",
        default: 0,
        min: i64::MIN,
        max: i64::MAX,
    };
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawImage")]
pub struct ImageRef {
    pub src: String,
    pub alt: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cat {
    pub slug: String,
    #[serde(default, deserialize_with = "deserialize_text_or_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_text_or_empty")]
    pub breed: String,
    #[serde(default, deserialize_with = "deserialize_text_or_empty")]
    pub color: String,
    /// A list of titles in the header is joined with ", ".
    #[serde(default, deserialize_with = "deserialize_text_or_empty")]
    pub titles: String,
    #[serde(default, deserialize_with = "deserialize_images")]
    pub images: Vec<ImageRef>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub description: String,
}

impl Entry for Cat {
    const COLLECTION: &'static str = "cats";
    const BODY_FIELD: &'static str = "description";

    fn slug(&self) -> &str {
        &self.slug
    }

    fn order(&self) -> i64 {
        self.order
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum KittenStatus {
    #[default]
    #[serde(alias = "Available", alias = "AVAILABLE")]
    Available,
    #[serde(alias = "Reserved", alias = "RESERVED")]
    Reserved,
    #[serde(alias = "Sold", alias = "SOLD")]
    Sold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[serde(alias = "Male", alias = "MALE")]
    Male,
    #[serde(alias = "Female", alias = "FEMALE")]
    Female,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parents {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mother: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub father: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kitten {
    pub slug: String,
    #[serde(default, deserialize_with = "deserialize_text_or_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_text_or_empty")]
    pub age: String,
    #[serde(default)]
    pub status: KittenStatus,
    #[serde(
        default,
        deserialize_with = "deserialize_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "deserialize_images")]
    pub images: Vec<ImageRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(
        default,
        deserialize_with = "deserialize_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub birth_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parents: Option<Parents>,
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub description: String,
}

impl Entry for Kitten {
    const COLLECTION: &'static str = "kittens";
    const BODY_FIELD: &'static str = "description";

    fn slug(&self) -> &str {
        &self.slug
    }

    fn order(&self) -> i64 {
        self.order
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewPlatform {
    #[default]
    #[serde(alias = "Facebook", alias = "FACEBOOK")]
    Facebook,
    #[serde(alias = "Google", alias = "GOOGLE")]
    Google,
    #[serde(alias = "Instagram", alias = "INSTAGRAM")]
    Instagram,
    #[serde(alias = "Testimonial", alias = "TESTIMONIAL")]
    Testimonial,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub slug: String,
    #[serde(default, deserialize_with = "deserialize_text_or_empty")]
    pub name: String,
    #[serde(default = "Review::default_rating")]
    pub rating: i64,
    #[serde(default, deserialize_with = "deserialize_text_or_empty")]
    pub date: String,
    #[serde(default)]
    pub platform: ReviewPlatform,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub text: String,
}

impl Review {
    pub const RATING: IntegerField = IntegerField {
        key: "rating",
        default: 5,
        min: 1,
        max: 5,
    };

    fn default_rating() -> i64 {
        Self::RATING.default
    }
}

impl Entry for Review {
    const COLLECTION: &'static str = "reviews";
    const BODY_FIELD: &'static str = "text";
    const INTEGER_FIELDS: &'static [IntegerField] = &[IntegerField::ORDER, Review::RATING];
    const ALIASES: &'static [(&'static str, &'static str)] = &[("author", "name")];

    fn slug(&self) -> &str {
        &self.slug
    }

    fn order(&self) -> i64 {
        self.order
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FaqCategory {
    #[serde(alias = "Adoption", alias = "ADOPTION")]
    Adoption,
    #[serde(alias = "Breeding", alias = "BREEDING")]
    Breeding,
    #[serde(alias = "Care", alias = "CARE")]
    Care,
    #[default]
    #[serde(alias = "General", alias = "GENERAL")]
    General,
    #[serde(alias = "Health", alias = "HEALTH")]
    Health,
    #[serde(alias = "Pricing", alias = "PRICING")]
    Pricing,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Faq {
    pub slug: String,
    #[serde(default, deserialize_with = "deserialize_text_or_empty")]
    pub question: String,
    #[serde(default)]
    pub category: FaqCategory,
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub answer: String,
}

impl Entry for Faq {
    const COLLECTION: &'static str = "faqs";
    const BODY_FIELD: &'static str = "answer";

    fn slug(&self) -> &str {
        &self.slug
    }

    fn order(&self) -> i64 {
        self.order
    }
}

/// A site-wide record read from a single YAML file.
pub trait Singleton: serde::de::DeserializeOwned + Serialize + Default {
    const NAME: &'static str;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// Missing fields fall back to the defaults below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HomepageContent {
    pub hero_title: String,
    pub hero_subtitle: String,
    pub features: Vec<Feature>,
}

impl Default for HomepageContent {
    fn default() -> Self {
        Self {
            hero_title: "Default Title".to_owned(),
            hero_subtitle: "Default Subtitle".to_owned(),
            features: Vec::new(),
        }
    }
}

impl Singleton for HomepageContent {
    const NAME: &'static str = "homepage";
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialMedia {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteSettings {
    pub site_name: String,
    pub site_description: String,
    pub contact_email: String,
    pub contact_phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub social_media: SocialMedia,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            site_name: "Miausairovi Cattery".to_owned(),
            site_description: "British Shorthair Cattery".to_owned(),
            contact_email: String::new(),
            contact_phone: String::new(),
            address: None,
            social_media: SocialMedia::default(),
        }
    }
}

impl Singleton for SiteSettings {
    const NAME: &'static str = "settings";
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentSnapshot {
    pub cats: Vec<Cat>,
    pub kittens: Vec<Kitten>,
    pub reviews: Vec<Review>,
    pub faqs: Vec<Faq>,
    pub homepage: HomepageContent,
    pub settings: SiteSettings,
}

fn deserialize_images<'de, D>(deserializer: D) -> Result<Vec<ImageRef>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_yaml::Value>::deserialize(deserializer)?;
    Ok(normalize_images(value))
}
