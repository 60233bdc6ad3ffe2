//! Deep merge for settings tables.

/// Merges `overlay` into `base` key by key.
///
/// Nested tables merge recursively; any other value (arrays included)
/// replaces the existing one wholesale.
pub fn merge_tables(base: &mut toml::Table, overlay: &toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => {
                merge_tables(existing, incoming);
            }
            _ => {
                base.insert(key.clone(), value.clone());
            }
        }
    }
}
