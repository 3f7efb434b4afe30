use serde_json::{Map, Value};

/// Turns dotted field names into nested objects:
/// `{"_formData.tableName": "events"}` becomes `{"_formData": {"tableName": "events"}}`.
pub fn make_object_from_fields_values(values: &Map<String, Value>) -> Map<String, Value> {
    let mut root = Value::Object(Map::new());
    for (name, value) in values {
        let path: Vec<String> = name.split('.').map(str::to_string).collect();
        insert_path(&mut root, &path, value.clone());
    }
    match root {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

pub fn insert_path(root: &mut Value, path: &[String], value: Value) {
    if path.is_empty() {
        *root = value;
        return;
    }

    if !root.is_object() {
        *root = Value::Object(Map::new());
    }

    if let Value::Object(obj) = root {
        if path.len() == 1 {
            obj.insert(path[0].clone(), value);
            return;
        }

        let entry = obj
            .entry(path[0].clone())
            .or_insert_with(|| Value::Object(Map::new()));
        insert_path(entry, &path[1..], value);
    }
}

pub fn value_at_path<'a>(value: &'a Value, path: &[String]) -> Option<&'a Value> {
    let mut current = value;
    for segment in path {
        match current {
            Value::Object(map) => {
                current = map.get(segment)?;
            }
            _ => return None,
        }
    }
    Some(current)
}

/// Shallow merge: keys of `overlay` replace same-named keys of `base`.
pub fn shallow_merge(mut base: Map<String, Value>, overlay: Map<String, Value>) -> Map<String, Value> {
    for (key, value) in overlay {
        base.insert(key, value);
    }
    base
}
