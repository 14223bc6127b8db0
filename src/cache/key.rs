//! Deterministic cache keys

use serde::Serialize;

use crate::data::CatalogFilters;

/// Identifies one cached upstream response
///
/// Keys are encoded as JSON, so every field is quoted and delimited: a value
/// containing `|` or `-` can never shift into a neighbouring field, and an unset
/// filter (`null`) never equals an empty one (`""`).
#[derive(Debug, Clone, PartialEq)]
pub enum CacheKey {
    /// A discovery listing for a filter set
    Catalog(CatalogFilters),
    /// A single movie detail by upstream id
    Detail { id: u64 },
}

/// Wire form of a key
///
/// JSON has no NaN or infinity and `serde_json` writes them as `null`, so the
/// rating goes in as its bit pattern instead.
#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum EncodedKey<'a> {
    Catalog {
        year: u16,
        genre: Option<&'a str>,
        min_rating_bits: Option<u64>,
        min_runtime: Option<u32>,
        language: Option<&'a str>,
    },
    Detail {
        id: u64,
    },
}

/// Bit pattern for a rating with every NaN folded into one and `-0.0` into `0.0`
fn rating_bits(rating: f64) -> u64 {
    if rating.is_nan() {
        f64::NAN.to_bits()
    } else {
        (rating + 0.0).to_bits()
    }
}

impl CacheKey {
    /// Encode the key as the string stored in the cache map
    pub fn encode(&self) -> String {
        let encoded = match self {
            CacheKey::Catalog(filters) => EncodedKey::Catalog {
                year: filters.year,
                genre: filters.genre.as_deref(),
                min_rating_bits: filters.min_rating.map(rating_bits),
                min_runtime: filters.min_runtime,
                language: filters.language.as_deref(),
            },
            CacheKey::Detail { id } => EncodedKey::Detail { id: *id },
        };
        // Only strings and integers remain, which always serialize; fall back to
        // the Debug form, which is equally deterministic.
        serde_json::to_string(&encoded).unwrap_or_else(|_| format!("{:?}", self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filters(genre: Option<&str>, language: Option<&str>) -> CatalogFilters {
        CatalogFilters {
            year: 2020,
            genre: genre.map(str::to_string),
            min_rating: Some(7.5),
            min_runtime: Some(90),
            language: language.map(str::to_string),
        }
    }

    fn with_rating(rating: Option<f64>) -> CacheKey {
        CacheKey::Catalog(CatalogFilters {
            min_rating: rating,
            ..CatalogFilters::for_year(2020)
        })
    }

    #[test]
    fn test_equal_filters_give_equal_keys() {
        let a = CacheKey::Catalog(filters(Some("Action"), Some("en")));
        let b = CacheKey::Catalog(filters(Some("Action"), Some("en")));

        assert_eq!(a.encode(), b.encode());
    }

    #[test]
    fn test_distinct_filters_give_distinct_keys() {
        let keys = [
            CacheKey::Catalog(filters(Some("Action"), Some("en"))),
            CacheKey::Catalog(filters(Some("Action"), Some("fr"))),
            CacheKey::Catalog(filters(Some("Drama"), Some("en"))),
            CacheKey::Catalog(filters(None, Some("en"))),
            CacheKey::Catalog(filters(Some(""), Some("en"))),
            CacheKey::Catalog(filters(Some("Action"), None)),
            CacheKey::Catalog(CatalogFilters::for_year(2020)),
            CacheKey::Catalog(CatalogFilters::for_year(2021)),
            CacheKey::Detail { id: 2020 },
            CacheKey::Detail { id: 603 },
        ];

        for (i, a) in keys.iter().enumerate() {
            for (j, b) in keys.iter().enumerate() {
                if i != j {
                    assert_ne!(a.encode(), b.encode(), "{:?} collided with {:?}", a, b);
                }
            }
        }
    }

    #[test]
    fn test_non_finite_ratings_do_not_collide_with_unset_rating() {
        let keys = [
            with_rating(None),
            with_rating(Some(f64::NAN)),
            with_rating(Some(f64::INFINITY)),
            with_rating(Some(f64::NEG_INFINITY)),
            with_rating(Some(0.0)),
            with_rating(Some(7.0)),
        ];

        for (i, a) in keys.iter().enumerate() {
            for (j, b) in keys.iter().enumerate() {
                if i != j {
                    assert_ne!(a.encode(), b.encode(), "{:?} collided with {:?}", a, b);
                }
            }
        }
    }

    #[test]
    fn test_equivalent_ratings_share_a_key() {
        assert_eq!(
            with_rating(Some(f64::NAN)).encode(),
            with_rating(Some(-f64::NAN)).encode()
        );
        assert_eq!(with_rating(Some(-0.0)).encode(), with_rating(Some(0.0)).encode());
    }

    #[test]
    fn test_separator_characters_do_not_cause_collisions() {
        let mut shifted_a = CatalogFilters::for_year(2020);
        shifted_a.genre = Some("Action|en".to_string());

        let mut shifted_b = CatalogFilters::for_year(2020);
        shifted_b.genre = Some("Action".to_string());
        shifted_b.language = Some("en".to_string());

        assert_ne!(
            CacheKey::Catalog(shifted_a).encode(),
            CacheKey::Catalog(shifted_b).encode()
        );
    }

    #[test]
    fn test_detail_key_format() {
        assert_eq!(
            CacheKey::Detail { id: 603 }.encode(),
            r#"{"kind":"detail","id":603}"#
        );
    }
}
