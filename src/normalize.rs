use anyhow::Context as _;
use serde::{Deserialize, Deserializer};
use serde_yaml::{Mapping, Value};

use crate::formats::{Entry, ImageRef, IntegerField};

/// Image shapes found in entry headers. Older entries store the path under
/// `image`; the current schema uses `src`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawImage {
    Current {
        src: String,
        #[serde(default, deserialize_with = "deserialize_text")]
        alt: Option<String>,
    },
    Legacy {
        image: String,
        #[serde(default, deserialize_with = "deserialize_text")]
        alt: Option<String>,
    },
    Path(String),
    Unrecognized(Value),
}

impl From<RawImage> for ImageRef {
    fn from(raw: RawImage) -> Self {
        match raw {
            RawImage::Current { src, alt } => ImageRef {
                src,
                alt: alt.unwrap_or_default(),
            },
            RawImage::Legacy { image, alt } => ImageRef {
                src: image,
                alt: alt.unwrap_or_default(),
            },
            RawImage::Path(src) => ImageRef {
                src,
                alt: String::new(),
            },
            RawImage::Unrecognized(value) => {
                let field = |key: &str| value.get(key).cloned().and_then(text_of);
                ImageRef {
                    src: field("src").or_else(|| field("image")).unwrap_or_default(),
                    alt: field("alt").unwrap_or_default(),
                }
            }
        }
    }
}

/// Renders a scalar as text. Sequences are joined with ", "; mappings have
/// no text form.
fn text_of(value: Value) -> Option<String> {
    match value {
        Value::Null | Value::Mapping(_) => None,
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Sequence(items) => Some(
            items
                .into_iter()
                .filter_map(text_of)
                .collect::<Vec<_>>()
                .join(", "),
        ),
        Value::Tagged(tagged) => text_of(tagged.value),
    }
}

// YAML scalars such as `price: 450` or `date: 2024-05-01` arrive as numbers
// or strings depending on quoting; both are kept as text.
pub(crate) fn deserialize_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(text_of))
}

pub(crate) fn deserialize_text_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserialize_text(deserializer)?.unwrap_or_default())
}

/// Anything other than a sequence yields no images.
pub fn normalize_images(value: Option<Value>) -> Vec<ImageRef> {
    let Some(Value::Sequence(items)) = value else {
        return Vec::new();
    };
    items
        .into_iter()
        .map(|item| {
            serde_yaml::from_value::<RawImage>(item)
                .map(ImageRef::from)
                .unwrap_or_default()
        })
        .collect()
}

/// Turns one parsed entry file into its typed record.
///
/// `slug` and the collection's body field always win over header keys of the
/// same name. Null header values count as absent so field defaults apply.
/// Free-text fields accept any scalar; only enum fields reject values.
pub fn normalize_entry<T: Entry>(mut header: Mapping, body: &str, slug: &str) -> anyhow::Result<T> {
    header.retain(|_, value| !value.is_null());

    for (alias, field) in T::ALIASES {
        let Some(value) = header.remove(*alias) else {
            continue;
        };
        if header.contains_key(*field) {
            tracing::debug!(slug, alias = *alias, field = *field, "field already set; ignoring alias");
        } else {
            header.insert(Value::from(*field), value);
        }
    }

    for field in T::INTEGER_FIELDS {
        coerce_integer(&mut header, field, slug);
    }

    header.insert(Value::from("slug"), Value::from(slug));
    header.insert(Value::from(T::BODY_FIELD), Value::from(body.trim()));

    serde_yaml::from_value(Value::Mapping(header))
        .with_context(|| format!("normalize {} entry `{slug}`", T::COLLECTION))
}

fn coerce_integer(header: &mut Mapping, field: &IntegerField, slug: &str) {
    let Some(raw) = header.get(field.key) else {
        return;
    };

    let parsed = match raw {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().filter(|f| f.is_finite()).map(|f| f as i64)),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    };

    let value = match parsed {
        Some(value) if (field.min..=field.max).contains(&value) => value,
        Some(value) => {
            let clamped = value.clamp(field.min, field.max);
            tracing::warn!(slug, field = field.key, value, clamped, "value out of range; clamped");
            clamped
        }
        None => {
            tracing::warn!(
                slug,
                field = field.key,
                raw = ?raw,
                default = field.default,
                "value is not an integer; using default"
            );
            field.default
        }
    };

    header.insert(Value::from(field.key), Value::from(value));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::{Cat, Faq, FaqCategory, Kitten, KittenStatus, Review, ReviewPlatform};

    fn header(yaml: &str) -> Mapping {
        serde_yaml::from_str(yaml).expect("test header is a mapping")
    }

    #[test]
    fn legacy_image_field_becomes_src() -> anyhow::Result<()> {
        let cat: Cat = normalize_entry(
            header("images:\n  - image: /cats/a.jpg\n  - image: /cats/b.jpg\n    alt: B\n"),
            "",
            "a",
        )?;

        assert_eq!(
            cat.images,
            vec![
                ImageRef {
                    src: "/cats/a.jpg".to_owned(),
                    alt: String::new(),
                },
                ImageRef {
                    src: "/cats/b.jpg".to_owned(),
                    alt: "B".to_owned(),
                },
            ]
        );
        Ok(())
    }

    #[test]
    fn src_wins_over_legacy_image() {
        let value = serde_yaml::from_str("- src: /new.jpg\n  image: /old.jpg\n  alt: x\n").unwrap();
        let images = normalize_images(Some(value));
        assert_eq!(images[0].src, "/new.jpg");
        assert_eq!(images[0].alt, "x");
    }

    #[test]
    fn unusable_image_shapes_degrade_to_empty_src() {
        let value = serde_yaml::from_str("- alt: only alt\n- 42\n- /plain/path.jpg\n").unwrap();
        let images = normalize_images(Some(value));
        assert_eq!(images.len(), 3);
        assert_eq!(images[0].src, "");
        assert_eq!(images[0].alt, "only alt");
        assert_eq!(images[1], ImageRef::default());
        assert_eq!(images[2].src, "/plain/path.jpg");

        assert!(normalize_images(Some(Value::from("not a list"))).is_empty());
        assert!(normalize_images(None).is_empty());
    }

    #[test]
    fn slug_and_body_override_header_fields() -> anyhow::Result<()> {
        let cat: Cat = normalize_entry(
            header("slug: wrong\ndescription: from header\nname: Pukis\n"),
            "\n  Our champion.\n\n",
            "pukis",
        )?;
        assert_eq!(cat.slug, "pukis");
        assert_eq!(cat.description, "Our champion.");
        assert_eq!(cat.name, "Pukis");
        Ok(())
    }

    #[test]
    fn body_lands_in_the_collection_body_field() -> anyhow::Result<()> {
        let review: Review = normalize_entry(header("name: Anna\n"), "Lovely kitten!", "anna")?;
        assert_eq!(review.text, "Lovely kitten!");

        let faq: Faq = normalize_entry(header("question: When?\n"), "At 13 weeks.", "when")?;
        assert_eq!(faq.answer, "At 13 weeks.");
        assert_eq!(faq.category, FaqCategory::General);
        Ok(())
    }

    #[test]
    fn malformed_integers_are_coerced() -> anyhow::Result<()> {
        let cat: Cat = normalize_entry(header("order: soon\n"), "", "a")?;
        assert_eq!(cat.order, 0);

        let cat: Cat = normalize_entry(header("order: ' 7 '\n"), "", "a")?;
        assert_eq!(cat.order, 7);

        let cat: Cat = normalize_entry(header("order: 2.9\n"), "", "a")?;
        assert_eq!(cat.order, 2);

        let review: Review = normalize_entry(header("rating: 11\n"), "", "r")?;
        assert_eq!(review.rating, 5);

        let review: Review = normalize_entry(header("rating: bad\n"), "", "r")?;
        assert_eq!(review.rating, 5);

        let review: Review = normalize_entry(header("rating: 3\n"), "", "r")?;
        assert_eq!(review.rating, 3);
        Ok(())
    }

    #[test]
    fn null_values_take_defaults() -> anyhow::Result<()> {
        let kitten: Kitten = normalize_entry(header("name: Mia\nstatus:\nage:\n"), "", "mia")?;
        assert_eq!(kitten.status, KittenStatus::Available);
        assert_eq!(kitten.age, "");
        Ok(())
    }

    #[test]
    fn numeric_price_is_kept_as_text() -> anyhow::Result<()> {
        let kitten: Kitten = normalize_entry(header("price: 450\nbirthDate: 2024-05-01\n"), "", "k")?;
        assert_eq!(kitten.price.as_deref(), Some("450"));
        assert_eq!(kitten.birth_date.as_deref(), Some("2024-05-01"));
        Ok(())
    }

    #[test]
    fn enum_values_are_validated() {
        let err = normalize_entry::<Kitten>(header("status: adopted\n"), "", "k").unwrap_err();
        assert!(format!("{err:#}").contains("normalize kittens entry `k`"));

        let kitten: Kitten =
            normalize_entry(header("status: Reserved\n"), "", "k").expect("capitalized status");
        assert_eq!(kitten.status, KittenStatus::Reserved);

        assert!(normalize_entry::<Faq>(header("category: misc\n"), "", "f").is_err());
    }

    #[test]
    fn reviewer_accepts_author_alias() -> anyhow::Result<()> {
        let review: Review = normalize_entry(header("author: Tom\n"), "", "tom")?;
        assert_eq!(review.name, "Tom");

        let review: Review = normalize_entry(header("name: Anna\nauthor: Tom\n"), "", "anna")?;
        assert_eq!(review.name, "Anna");

        let review: Review = normalize_entry(header("name:\nauthor: Tom\n"), "", "tom")?;
        assert_eq!(review.name, "Tom");
        Ok(())
    }

    #[test]
    fn free_text_fields_accept_any_scalar() -> anyhow::Result<()> {
        let kitten: Kitten = normalize_entry(header("name: Mia\nage: 8\n"), "", "mia")?;
        assert_eq!(kitten.age, "8");

        let cat: Cat = normalize_entry(
            header("name: 2024\nbreed: true\ntitles: [GC, RW]\n"),
            "",
            "pukis",
        )?;
        assert_eq!(cat.name, "2024");
        assert_eq!(cat.breed, "true");
        assert_eq!(cat.titles, "GC, RW");

        let faq: Faq = normalize_entry(header("question: 42\n"), "", "f")?;
        assert_eq!(faq.question, "42");

        let review: Review = normalize_entry(header("name: {first: Anna}\n"), "", "r")?;
        assert_eq!(review.name, "");
        Ok(())
    }

    #[test]
    fn non_text_alt_keeps_image_path() {
        let value =
            serde_yaml::from_str("- src: /a.jpg\n  alt: 2024\n- image: /b.jpg\n  alt: true\n")
                .unwrap();
        let images = normalize_images(Some(value));
        assert_eq!(
            images,
            vec![
                ImageRef {
                    src: "/a.jpg".to_owned(),
                    alt: "2024".to_owned(),
                },
                ImageRef {
                    src: "/b.jpg".to_owned(),
                    alt: "true".to_owned(),
                },
            ]
        );

        let value = serde_yaml::from_str("- src: /c.jpg\n  alt: {nested: x}\n").unwrap();
        assert_eq!(normalize_images(Some(value))[0].src, "/c.jpg");
    }

    #[test]
    fn enum_spellings_are_case_tolerant() -> anyhow::Result<()> {
        for (raw, expected) in [
            ("care", FaqCategory::Care),
            ("Care", FaqCategory::Care),
            ("CARE", FaqCategory::Care),
        ] {
            let faq: Faq = normalize_entry(header(&format!("category: {raw}\n")), "", "f")?;
            assert_eq!(faq.category, expected);
        }
        for raw in ["google", "Google", "GOOGLE"] {
            let review: Review = normalize_entry(header(&format!("platform: {raw}\n")), "", "r")?;
            assert_eq!(review.platform, ReviewPlatform::Google);
        }
        let kitten: Kitten = normalize_entry(header("status: SOLD\n"), "", "k")?;
        assert_eq!(kitten.status, KittenStatus::Sold);
        Ok(())
    }
}
