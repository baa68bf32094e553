//! Warnings for config keys serde would silently ignore.

use serde_json::{Map, Value};
use tracing::warn;

/// Known keys of every config section. The top level holds sections only.
const SECTIONS: &[(&str, &[&str])] = &[
    (
        "transitions",
        &[
            "insertMs",
            "updateMs",
            "deleteMs",
            "reorderMs",
            "resizeMs",
            "throttleThreshold",
            "maxPending",
        ],
    ),
    (
        "panel",
        &[
            "panelWidth",
            "rowHeight",
            "minictrlMaxHeight",
            "notificationLimit",
        ],
    ),
];

/// Log one warning per unrecognised key path in `content`. Malformed JSON is
/// left for the real parse to report.
pub fn warn_unknown_fields(content: &str, source: &str) {
    let Ok(Value::Object(root)) = serde_json::from_str::<Value>(content) else {
        return;
    };
    for path in unknown_paths(&root) {
        warn!("Unknown config field in {source}: {path}");
    }
}

/// Dotted paths like `panel.rowHieght` for keys outside `SECTIONS`.
fn unknown_paths(root: &Map<String, Value>) -> Vec<String> {
    let mut unknown = Vec::new();
    for (key, value) in root {
        let Some((_, fields)) = SECTIONS.iter().find(|(name, _)| *name == key.as_str()) else {
            unknown.push(key.clone());
            continue;
        };
        if let Value::Object(section) = value {
            unknown.extend(
                section
                    .keys()
                    .filter(|field| !fields.contains(&field.as_str()))
                    .map(|field| format!("{key}.{field}")),
            );
        }
    }
    unknown
}
