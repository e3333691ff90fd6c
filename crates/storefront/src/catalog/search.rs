//! Client-side product search and pagination.
//!
//! Operates on a fully loaded product list without further network calls.
//! Matching is a case-insensitive substring test over id, name, category
//! name, description and price. Results are ordered by a simple multi-key
//! rank: exact id, then partial id, then name, then anything else. Ties keep
//! the original order.

use shopfront_core::Product;

/// Why a product matched. Lower sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchRank {
    ExactId,
    PartialId,
    Name,
    Other,
}

/// A normalised search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query(String);

impl Query {
    /// Trim and lowercase. Returns `None` for a blank query.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let q = raw.trim().to_lowercase();
        (!q.is_empty()).then_some(Self(q))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Rank a product against a query, `None` if it does not match.
#[must_use]
pub fn rank(product: &Product, query: &Query) -> Option<MatchRank> {
    let needle = query.as_str();
    let id = product.id.to_string();

    if id == needle {
        return Some(MatchRank::ExactId);
    }
    if id.contains(needle) {
        return Some(MatchRank::PartialId);
    }
    if contains(&product.name, needle) {
        return Some(MatchRank::Name);
    }

    let other = product.category_name().is_some_and(|c| contains(c, needle))
        || product
            .description
            .as_deref()
            .is_some_and(|d| contains(d, needle))
        || product.price.to_string().contains(needle);

    other.then_some(MatchRank::Other)
}

/// Whether a product matches a query at all.
#[must_use]
pub fn matches(product: &Product, query: &Query) -> bool {
    rank(product, query).is_some()
}

/// Filter and rank. Ties keep their position in `products`.
#[must_use]
pub fn filter_and_rank<'a>(products: &'a [Product], query: &Query) -> Vec<&'a Product> {
    let mut ranked: Vec<(MatchRank, &Product)> = products
        .iter()
        .filter_map(|p| rank(p, query).map(|r| (r, p)))
        .collect();
    // sort_by_key is stable
    ranked.sort_by_key(|(r, _)| *r);
    ranked.into_iter().map(|(_, p)| p).collect()
}

/// One page of an in-memory list plus pagination metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct PageView<T> {
    pub items: Vec<T>,
    /// 1-based, clamped into `1..=last_page`.
    pub current_page: usize,
    /// Never less than 1, even for an empty list.
    pub last_page: usize,
    pub total: usize,
}

/// Slice `items` into pages of `page_size` and return page `page`.
///
/// Out-of-range pages are clamped; an empty list yields an empty first page.
#[must_use]
pub fn paginate<T: Clone>(items: &[T], page_size: usize, page: usize) -> PageView<T> {
    let page_size = page_size.max(1);
    let total = items.len();
    let last_page = total.div_ceil(page_size).max(1);
    let current_page = page.clamp(1, last_page);

    let items = items
        .chunks(page_size)
        .nth(current_page - 1)
        .map(<[T]>::to_vec)
        .unwrap_or_default();

    PageView {
        items,
        current_page,
        last_page,
        total,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use shopfront_core::{Category, CategoryId, ProductId};

    use super::*;

    fn product(id: i64, name: &str, price: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            description: None,
            price: Decimal::new(price * 100, 2),
            stock: 5,
            category_id: None,
            category: None,
            image: None,
        }
    }

    fn ids(results: &[&Product]) -> Vec<i64> {
        results.iter().map(|p| p.id.as_i64()).collect()
    }

    #[test]
    fn test_exact_id_ranks_first_then_partial_in_original_order() {
        let products = vec![
            product(17, "Kettle", 10),
            product(3, "Toaster", 20),
            product(27, "Blender", 30),
            product(7, "Mixer", 40),
        ];
        let q = Query::parse("7").unwrap();
        assert_eq!(ids(&filter_and_rank(&products, &q)), vec![7, 17, 27]);
    }

    #[test]
    fn test_rank_order_id_then_name_then_other() {
        let mut described = product(1, "Plate", 10);
        described.description = Some("Pairs with the 42 mug".to_string());
        let mut categorised = product(2, "Bowl", 10);
        categorised.category = Some(Category {
            id: CategoryId::new(1),
            name: "Mugs & Cups".to_string(),
            slug: "mugs".to_string(),
        });
        let products = vec![
            described,
            categorised,
            product(3, "MUG classic", 10),
            product(42, "Teapot", 10),
        ];

        let q = Query::parse("  MUG ").unwrap();
        assert_eq!(ids(&filter_and_rank(&products, &q)), vec![3, 1, 2]);
        let q = Query::parse("42").unwrap();
        assert_eq!(ids(&filter_and_rank(&products, &q)), vec![42, 1]);
    }

    #[test]
    fn test_price_matches_as_string() {
        let products = vec![product(1, "Rug", 125), product(2, "Vase", 30)];
        let q = Query::parse("125.00").unwrap();
        assert_eq!(ids(&filter_and_rank(&products, &q)), vec![1]);
        assert!(matches(&products[0], &q));
        assert!(!matches(&products[1], &q));
    }

    #[test]
    fn test_no_matches_is_empty_not_error() {
        let products = vec![product(1, "Rug", 10)];
        let q = Query::parse("zzz").unwrap();
        let results = filter_and_rank(&products, &q);
        assert!(results.is_empty());

        let page = paginate(&results, 10, 1);
        assert!(page.items.is_empty());
        assert_eq!((page.current_page, page.last_page, page.total), (1, 1, 0));
    }

    #[test]
    fn test_blank_query_is_none() {
        assert!(Query::parse("   ").is_none());
    }

    #[test]
    fn test_paginate_slices_and_clamps() {
        let items: Vec<i32> = (1..=7).collect();

        let p2 = paginate(&items, 3, 2);
        assert_eq!(p2.items, vec![4, 5, 6]);
        assert_eq!((p2.current_page, p2.last_page, p2.total), (2, 3, 7));

        let last = paginate(&items, 3, 99);
        assert_eq!(last.items, vec![7]);
        assert_eq!(last.current_page, 3);

        let first = paginate(&items, 0, 0);
        assert_eq!(first.items, vec![1]);
        assert_eq!(first.last_page, 7);
    }
}
