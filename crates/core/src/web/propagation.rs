use http::{HeaderMap, HeaderValue, header::HeaderName};

use crate::{
    error::{Result, TraceError},
    events::Tracer,
    ids::EventId,
};

/// Header carrying the event that caused a request.
pub const EVENT_ID_HEADER: HeaderName = HeaderName::from_static("event-id");

pub fn encode_header(id: &EventId) -> String {
    id.to_query()
}

/// `None` and empty values mean "no known ancestor" and are not errors.
pub fn decode_header(value: Option<&str>) -> Result<Option<EventId>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => EventId::parse_query(s).map(Some),
    }
}

pub fn set_event_id(headers: &mut HeaderMap, id: &EventId) -> Result<()> {
    let value = HeaderValue::from_str(&encode_header(id))?;
    headers.insert(EVENT_ID_HEADER, value);
    Ok(())
}

pub fn get_event_id(headers: &HeaderMap) -> Result<Option<EventId>> {
    match headers.get(EVENT_ID_HEADER) {
        None => Ok(None),
        Some(value) => {
            let s = value.to_str().map_err(|_| TraceError::MalformedEventId)?;
            decode_header(Some(s))
        }
    }
}

/// The identity for handling an inbound request: a child of the caller's event
/// when the header is present, a fresh root otherwise.
pub fn request_event_id(tracer: &Tracer, headers: &HeaderMap) -> Result<EventId> {
    Ok(match get_event_id(headers)? {
        Some(parent) => tracer.child_id(&parent),
        None => tracer.root_id(),
    })
}
