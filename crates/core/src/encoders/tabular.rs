use crate::{encoders::payload_properties, error::Result, events::Entry};

/// Column order of the normalized events stream.
pub const EVENT_COLUMNS: [&str; 8] = ["root", "id", "parent", "schema", "time", "host", "pid", "deploy"];

/// Column order of the normalized properties stream, joinable on `(root, id)`.
pub const PROPERTY_COLUMNS: [&str; 5] = ["root", "id", "parent", "key", "value"];

pub type EventRow = [String; 8];
pub type PropertyRow = [String; 5];
pub type DenormalizedRow = [String; 10];

fn parent_cell(entry: &Entry) -> String {
    entry.parent().map(|p| p.to_string()).unwrap_or_default()
}

pub fn event_row(entry: &Entry) -> EventRow {
    let meta = entry.metadata();
    [
        entry.root().to_string(),
        entry.id().to_string(),
        parent_cell(entry),
        entry.schema().to_owned(),
        entry.time_rfc3339(),
        meta.host().to_owned(),
        meta.pid().to_string(),
        meta.deploy().unwrap_or_default().to_owned(),
    ]
}

pub fn property_rows(entry: &Entry) -> Result<Vec<PropertyRow>> {
    let props = payload_properties(entry.event())?;
    let (root, id, parent) = (entry.root().to_string(), entry.id().to_string(), parent_cell(entry));

    Ok(props
        .iter()
        .map(|(k, v)| [root.clone(), id.clone(), parent.clone(), k.clone(), v.clone()])
        .collect())
}

/// Event columns repeated on every property row. An entry without properties
/// still yields one row, with empty key and value cells.
pub fn denormalized_rows(entry: &Entry) -> Result<Vec<DenormalizedRow>> {
    let props = payload_properties(entry.event())?;
    let [root, id, parent, schema, time, host, pid, deploy] = event_row(entry);
    let row = |k: &str, v: &str| {
        [
            root.clone(),
            id.clone(),
            parent.clone(),
            schema.clone(),
            time.clone(),
            host.clone(),
            pid.clone(),
            deploy.clone(),
            k.to_owned(),
            v.to_owned(),
        ]
    };

    if props.is_empty() {
        return Ok(vec![row("", "")]);
    }
    Ok(props.iter().map(|(k, v)| row(k.as_str(), v.as_str())).collect())
}
