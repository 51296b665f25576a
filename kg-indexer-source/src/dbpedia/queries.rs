//! SPARQL query builders.

use kg_indexer_shared::ResourceCategory;

/// Build the query counting resources of a category.
pub fn build_count_query(category: &ResourceCategory) -> String {
    format!(
        "select (count(?s) as ?count) where {{ ?s a {}. }}",
        category.as_str()
    )
}

/// Build the query for one page of resources with their abstract in `lang`.
///
/// The abstract is optional so resources without one still occupy their
/// slot in the page.
pub fn build_page_query(category: &ResourceCategory, limit: u64, offset: u64, lang: &str) -> String {
    format!(
        "select distinct ?s ?a where {{ ?s a {}. \
         OPTIONAL {{ ?s dbo:abstract ?a. filter(langMatches(lang(?a), '{}')) }}. \
         }} limit {} offset {}",
        category.as_str(),
        lang,
        limit,
        offset
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_query() {
        let query = build_count_query(&ResourceCategory::manga());
        assert_eq!(
            query,
            "select (count(?s) as ?count) where { ?s a dbo:Manga. }"
        );
    }

    #[test]
    fn test_page_query() {
        let query = build_page_query(&ResourceCategory::anime(), 42, 84, "en");

        assert!(query.starts_with("select distinct ?s ?a where { ?s a dbo:Anime."));
        assert!(query.contains("OPTIONAL { ?s dbo:abstract ?a. filter(langMatches(lang(?a), 'en')) }"));
        assert!(query.ends_with("limit 42 offset 84"));
    }
}
