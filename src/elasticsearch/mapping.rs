use serde_json::{Value, json};

use super::compat::{Compatibility, DOC_TYPE};

/// Body of the index creation request declaring the type of every document field.
pub fn index_mapping(compatibility: Compatibility) -> Value {
    let mut mappings = json!({
        "properties": {
            "executed_at": { "type": "date" },
            "name": { "type": "keyword" },
            "iterations": { "type": "long" },
            "pkg": { "type": "keyword" },
            "hostname": { "type": "keyword" },
            "go_version": { "type": "keyword" },
            "os_version": { "type": "keyword" },
            "goos": { "type": "keyword" },
            "goarch": { "type": "keyword" },
            "ns_per_op": { "type": "double" },
            "mb_per_s": { "type": "double" },
            "alloced_bytes_per_op": { "type": "long" },
            "allocs_per_op": { "type": "long" },
            "git": {
                "properties": {
                    "commit": { "type": "text" },
                    "subject": { "type": "text" },
                    "committer": {
                        "properties": {
                            "date": { "type": "date" }
                        }
                    }
                }
            }
        },
        "dynamic_templates": [
            {
                "extra_metrics": {
                    "path_match": "extra_metrics.*",
                    "mapping": { "type": "float" }
                }
            }
        ]
    });
    if compatibility.include_type_name {
        mappings = json!({ DOC_TYPE: mappings });
    }

    json!({ "mappings": mappings })
}
