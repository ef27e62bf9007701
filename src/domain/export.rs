//! Manifest cleanup for `koi export`
//!
//! Paths are dotted: a mapping key, a numeric sequence index, or `[]` for
//! every element of a sequence.

use serde_yaml::Value;

/// Fields populated by the API server that make a manifest non-reusable.
pub const SERVER_FIELDS: &[&str] = &[
    "metadata.ownerReferences",
    "metadata.resourceVersion",
    "metadata.selfLink",
    "metadata.uid",
    "metadata.generation",
    "metadata.creationTimestamp",
    "metadata.managedFields",
    "metadata.generateName",
    "status",
    "spec.nodeName",
];

/// Wildcard segment matching every sequence element.
pub const EVERY_ELEMENT: &str = "[]";

/// Delete `path` from `node` if it exists. Missing segments are ignored.
pub fn delete_path(node: &mut Value, path: &[&str]) {
    let Some((head, rest)) = path.split_first() else {
        return;
    };
    match node {
        Value::Mapping(map) => {
            if rest.is_empty() {
                map.shift_remove(*head);
                return;
            }
            // `key.[]` names the whole sequence under `key`
            if rest == [EVERY_ELEMENT] && map.get(*head).is_some_and(Value::is_sequence) {
                map.shift_remove(*head);
                return;
            }
            if let Some(child) = map.get_mut(*head) {
                delete_path(child, rest);
            }
        }
        Value::Sequence(items) => {
            if *head == EVERY_ELEMENT {
                if rest.is_empty() {
                    items.clear();
                } else {
                    for item in items.iter_mut() {
                        delete_path(item, rest);
                    }
                }
                return;
            }
            let Ok(index) = head.parse::<usize>() else {
                return;
            };
            if index >= items.len() {
                return;
            }
            if rest.is_empty() {
                items.remove(index);
            } else {
                delete_path(&mut items[index], rest);
            }
        }
        _ => {}
    }
}

/// Strip every server-populated field, at the root and in each list item.
pub fn strip_server_fields(document: &mut Value) {
    for field in SERVER_FIELDS {
        let path: Vec<&str> = field.split('.').collect();
        delete_path(document, &path);

        let mut list_path = vec!["items", EVERY_ELEMENT];
        list_path.extend(&path);
        delete_path(document, &list_path);
    }
}
