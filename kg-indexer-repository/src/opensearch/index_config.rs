//! OpenSearch index configuration and mappings.
//!
//! This module defines the index settings and mappings for knowledge-graph
//! documents.

use serde_json::{json, Value};

/// Get the index settings and mappings for a knowledge-graph index.
///
/// The configuration includes:
/// - **text**: Full-text fields for the title and abstract
/// - **Keyword fields**: The short flag and category labels, for filtering
pub fn get_index_settings() -> Value {
    json!({
        "settings": {
            "number_of_shards": 1,
            "number_of_replicas": 1
        },
        "mappings": {
            "properties": {
                "title": {
                    "type": "text",
                    "fields": {
                        "raw": {
                            "type": "keyword",
                            "ignore_above": 1024
                        }
                    }
                },
                "abstract": {
                    "type": "text"
                },
                "short": {
                    "type": "keyword"
                },
                "categories": {
                    "properties": {
                        "type": {
                            "type": "keyword"
                        }
                    }
                }
            }
        }
    })
}
