//! End-to-end: build a causal tree across two "processes", ship it through
//! the sinks, and read it back.

use std::{
    collections::HashMap,
    io,
    sync::{Arc, Mutex},
};

use http::HeaderMap;
use tracelink_core::{
    AsyncSink, Entry, EventId, Id, IdGenerator, Message, ProcessIdentity, RawEntry, Sink,
    TextEncoder, Tracer, WriterSink, encoders::Encoder, get_event_id, set_event_id,
    web::request_event_id,
};

#[derive(Clone, Default)]
struct Shared(Arc<Mutex<Vec<u8>>>);

impl io::Write for Shared {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Shared {
    fn lines(&self) -> Vec<String> {
        String::from_utf8(self.0.lock().unwrap().clone())
            .unwrap()
            .lines()
            .map(str::to_owned)
            .collect()
    }
}

fn tracer(host: &str) -> Tracer {
    Tracer::new(
        IdGenerator::new().unwrap(),
        ProcessIdentity::new(host, Some("build-17".into()), 1000),
    )
}

#[test]
fn tree_survives_a_process_hop() {
    let frontend = tracer("frontend");
    let backend = tracer("backend");
    let out = Shared::default();
    let sink = WriterSink::json(out.clone());

    // frontend: inbound request with no ancestry
    let request = frontend.root(Message::new("GET /users/7"));
    sink.write(&request).unwrap();

    let mut headers = HeaderMap::new();
    set_event_id(&mut headers, request.event_id()).unwrap();

    // backend: derives from the propagated identity
    let handled_id = request_event_id(&backend, &headers).unwrap();
    let handled = backend.entry(handled_id, Arc::new(Message::new("load user")));
    let query = backend.child(handled.event_id(), Message::new("SELECT * FROM users"));
    sink.write(&handled).unwrap();
    sink.write(&query).unwrap();

    let entries: Vec<RawEntry> = out
        .lines()
        .iter()
        .map(|l| RawEntry::from_json(l).unwrap())
        .collect();
    assert_eq!(entries.len(), 3);

    let root = entries[0].id;
    assert!(entries.iter().all(|e| e.root == root));
    assert_eq!(entries[0].parent, None);
    assert_eq!(entries[1].parent, Some(entries[0].id));
    assert_eq!(entries[2].parent, Some(entries[1].id));
    assert_eq!(entries[0].host, "frontend");
    assert_eq!(entries[1].host, "backend");
    assert_eq!(entries[2].deploy.as_deref(), Some("build-17"));

    let by_id: HashMap<Id, &RawEntry> = entries.iter().map(|e| (e.id, e)).collect();
    assert_eq!(by_id.len(), 3);
    for e in &entries {
        if let Some(parent) = e.parent {
            assert_eq!(by_id[&parent].root, e.root);
        }
    }
}

#[test]
fn absent_header_means_no_ancestry() {
    assert_eq!(get_event_id(&HeaderMap::new()).unwrap(), None);
}

#[test]
fn text_lines_keep_the_causal_fields() {
    let t = tracer("web");
    let root = t.root(Message::new("root action"));
    let sub = t.child(root.event_id(), Message::new("sub action"));

    let line = String::from_utf8(TextEncoder.to_bytes(&sub).unwrap()).unwrap();
    assert!(line.starts_with("sub action schema=\"message\" "));
    assert!(line.contains(&format!(" root=\"{}\"", root.root())));
    assert!(line.contains(&format!(" id=\"{}\"", sub.id())));
    assert!(line.contains(&format!(" parent=\"{}\"", root.id())));
    assert!(line.ends_with('\n'));
}

#[tokio::test]
async fn async_pipeline_delivers_every_entry_in_order() {
    let t = tracer("worker");
    let out = Shared::default();
    let sink = AsyncSink::start(WriterSink::json(out.clone()), 4, |e: Option<&Entry>, err| {
        panic!("write of {:?} failed: {err}", e.map(Entry::id));
    });

    let root = t.root_id();
    let mut expected = Vec::new();
    let mut parent: EventId = root;
    for i in 0..50 {
        let e = t.entry(t.child_id(&parent), Arc::new(Message::new(format!("step {i}"))));
        parent = *e.event_id();
        expected.push(e.id());
        sink.write(e).await.unwrap();
    }
    sink.stop().await;

    let got: Vec<RawEntry> = out
        .lines()
        .iter()
        .map(|l| RawEntry::from_json(l).unwrap())
        .collect();
    assert_eq!(got.iter().map(|e| e.id).collect::<Vec<_>>(), expected);
    assert!(got.iter().all(|e| e.root == root.root));
    assert_eq!(got[0].parent, Some(root.id));
    for pair in got.windows(2) {
        assert_eq!(pair[1].parent, Some(pair[0].id));
    }
}
