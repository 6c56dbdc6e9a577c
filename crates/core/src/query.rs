//! List query builder
//!
//! Turns `GET /api/products` query parameters into a filter, an optional
//! sort and an optional projection, in the store's native BSON form.

use bson::{Bson, Document, doc};

use crate::resource::ID_FIELD;

/// Query parameters accepted by the product list route
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListParams {
    /// Exact-match category filter
    pub category: Option<String>,
    /// Inclusive lower bound on `price`
    pub min_price: Option<String>,
    /// Only `price` is recognised
    pub sort: Option<String>,
    /// Comma-separated projection allow-list
    pub fields: Option<String>,
}

/// A find request ready to hand to the store
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindSpec {
    pub filter: Document,
    pub sort: Option<Document>,
    pub projection: Option<Document>,
}

impl FindSpec {
    /// Match every document, natural order, all fields
    pub fn all() -> Self {
        Self::default()
    }
}

impl ListParams {
    /// Collect parameters from decoded query pairs.
    ///
    /// Unknown keys are ignored. Blank values count as absent, and a repeated
    /// key keeps its first non-blank value.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "category" => &mut params.category,
                "minPrice" => &mut params.min_price,
                "sort" => &mut params.sort,
                "fields" => &mut params.fields,
                _ => continue,
            };
            if slot.is_none() {
                let value = value.into();
                if !value.is_empty() {
                    *slot = Some(value);
                }
            }
        }
        params
    }

    pub fn to_find_spec(&self) -> FindSpec {
        let mut filter = Document::new();

        if let Some(ref category) = self.category {
            filter.insert("category", category.as_str());
        }
        if let Some(ref min_price) = self.min_price {
            filter.insert("price", doc! { "$gte": coerce_number(min_price) });
        }

        let sort = match self.sort.as_deref() {
            Some("price") => Some(doc! { "price": 1 }),
            _ => None,
        };

        let projection = self.fields.as_deref().map(build_projection);

        FindSpec {
            filter,
            sort,
            projection,
        }
    }
}

/// Inclusion projection over the listed fields. `_id` is excluded unless
/// named explicitly.
fn build_projection(fields: &str) -> Document {
    let mut projection = Document::new();
    for name in fields.split(',').map(str::trim).filter(|n| !n.is_empty()) {
        projection.insert(name, 1);
    }
    if !projection.contains_key(ID_FIELD) {
        projection.insert(ID_FIELD, 0);
    }
    projection
}

/// Numeric coercion with JavaScript `Number()` semantics.
///
/// Blank input is zero; anything unparseable is NaN, which compares false
/// against every stored price.
pub fn coerce_number(raw: &str) -> Bson {
    let s = raw.trim();
    let value = if s.is_empty() {
        0.0
    } else if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16).map_or(f64::NAN, |n| n as f64)
    } else {
        match s {
            "Infinity" | "+Infinity" => f64::INFINITY,
            "-Infinity" => f64::NEG_INFINITY,
            // Rust also accepts "inf" and "nan" spellings
            _ if s.chars().any(|c| c.is_ascii_alphabetic() && !matches!(c, 'e' | 'E')) => f64::NAN,
            _ => s.parse::<f64>().unwrap_or(f64::NAN),
        }
    };
    Bson::Double(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(
        category: Option<&str>,
        min_price: Option<&str>,
        sort: Option<&str>,
        fields: Option<&str>,
    ) -> ListParams {
        ListParams {
            category: category.map(String::from),
            min_price: min_price.map(String::from),
            sort: sort.map(String::from),
            fields: fields.map(String::from),
        }
    }

    fn pairs(raw: &[(&str, &str)]) -> ListParams {
        ListParams::from_pairs(raw.iter().copied())
    }

    fn min_price_of(spec: &FindSpec) -> f64 {
        spec.filter
            .get_document("price")
            .unwrap()
            .get_f64("$gte")
            .unwrap()
    }

    #[test]
    fn empty_params_match_everything() {
        assert_eq!(ListParams::default().to_find_spec(), FindSpec::all());
    }

    #[test]
    fn full_query() {
        let spec =
            params(Some("books"), Some("10"), Some("price"), Some("name,price")).to_find_spec();

        assert_eq!(
            spec.filter,
            doc! { "category": "books", "price": { "$gte": 10.0 } }
        );
        assert_eq!(spec.sort, Some(doc! { "price": 1 }));
        assert_eq!(spec.projection, Some(doc! { "name": 1, "price": 1, "_id": 0 }));
    }

    #[test]
    fn pairs_map_to_params() {
        let parsed = pairs(&[
            ("category", "books"),
            ("minPrice", "10"),
            ("sort", "price"),
            ("fields", "name,price"),
            ("page", "2"),
        ]);
        assert_eq!(
            parsed,
            params(Some("books"), Some("10"), Some("price"), Some("name,price"))
        );
    }

    #[test]
    fn repeated_keys_keep_first_value() {
        let parsed = pairs(&[
            ("minPrice", "1"),
            ("minPrice", "2"),
            ("sort", "price"),
            ("sort", "name"),
        ]);
        assert_eq!(parsed, params(None, Some("1"), Some("price"), None));
    }

    #[test]
    fn blank_values_are_absent() {
        let parsed = pairs(&[("category", ""), ("fields", ""), ("minPrice", ""), ("sort", "")]);
        assert_eq!(parsed, ListParams::default());
        assert_eq!(parsed.to_find_spec(), FindSpec::all());

        // a later non-blank value still counts
        let parsed = pairs(&[("category", ""), ("category", "books")]);
        assert_eq!(parsed.category.as_deref(), Some("books"));
    }

    #[test]
    fn unknown_sort_is_ignored() {
        let spec = params(None, None, Some("name"), None).to_find_spec();
        assert_eq!(spec.sort, None);
    }

    #[test]
    fn listed_id_stays_in_projection() {
        let spec = params(None, None, None, Some("_id, name,,")).to_find_spec();
        assert_eq!(spec.projection, Some(doc! { "_id": 1, "name": 1 }));
    }

    #[test]
    fn non_numeric_min_price_is_nan() {
        for raw in ["abc", "nan", "inf", "12abc"] {
            let spec = params(None, Some(raw), None, None).to_find_spec();
            assert!(min_price_of(&spec).is_nan(), "{raw:?} should coerce to NaN");
        }
    }

    #[test]
    fn numeric_coercion_follows_number_semantics() {
        assert_eq!(coerce_number(""), Bson::Double(0.0));
        assert_eq!(coerce_number(" 12.5 "), Bson::Double(12.5));
        assert_eq!(coerce_number("1e2"), Bson::Double(100.0));
        assert_eq!(coerce_number("0x10"), Bson::Double(16.0));
        assert_eq!(coerce_number("-Infinity"), Bson::Double(f64::NEG_INFINITY));
    }
}
