use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    error::{Result, TraceError},
    ids::{Id, IdGenerator},
};

/// The identity of an event and its place in a causal tree.
///
/// `root` is shared by every event in the tree and equals `id` for the root
/// event itself. `parent` is the `id` of the immediate predecessor and is
/// absent for root events. A zero parent means absent too, and is never
/// written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId {
    pub root: Id,
    pub id: Id,
    #[serde(
        default,
        deserialize_with = "nonzero_parent",
        skip_serializing_if = "no_parent"
    )]
    pub parent: Option<Id>,
}

impl EventId {
    /// Mints the identity of an event with no in-system predecessor.
    pub fn new_root(ids: &IdGenerator) -> Self {
        let id = ids.next_id();
        Self {
            root: id,
            id,
            parent: None,
        }
    }

    /// Mints the identity of an event caused by `self`.
    pub fn derive(&self, ids: &IdGenerator) -> Self {
        Self {
            root: self.root,
            id: ids.next_id(),
            parent: Some(self.id),
        }
    }

    /// The parent, with a zero ID treated as absent.
    pub fn parent(&self) -> Option<Id> {
        self.parent.filter(|p| !p.is_zero())
    }

    pub fn is_root(&self) -> bool {
        self.parent().is_none()
    }

    /// `root=…&id=…[&parent=…]`, the form carried in headers and query strings.
    pub fn to_query(&self) -> String {
        match self.parent() {
            Some(parent) => format!("root={}&id={}&parent={}", self.root, self.id, parent),
            None => format!("root={}&id={}", self.root, self.id),
        }
    }

    /// Parses the query form. `root` and `id` are required, `parent` is
    /// optional, and any other or repeated key is rejected.
    pub fn parse_query(s: &str) -> Result<Self> {
        let mut root = None;
        let mut id = None;
        let mut parent = None;

        for pair in s.split('&') {
            let (key, value) = pair.split_once('=').ok_or(TraceError::MalformedEventId)?;
            let slot = match key {
                "root" => &mut root,
                "id" => &mut id,
                "parent" => &mut parent,
                _ => return Err(TraceError::MalformedEventId),
            };
            if slot.is_some() {
                return Err(TraceError::MalformedEventId);
            }
            *slot = Some(parse_field(value)?);
        }

        match (root, id) {
            (Some(root), Some(id)) => Ok(Self {
                root,
                id,
                parent: parent.filter(|p| !p.is_zero()),
            }),
            _ => Err(TraceError::MalformedEventId),
        }
    }

    /// `root/id` for root events, `root/parent/id` otherwise.
    pub fn to_path(&self) -> String {
        match self.parent() {
            Some(parent) => format!("{}/{}/{}", self.root, parent, self.id),
            None => format!("{}/{}", self.root, self.id),
        }
    }

    pub fn parse_path(s: &str) -> Result<Self> {
        let fields: Vec<&str> = s.split('/').collect();
        match fields.as_slice() {
            [root, id] => Ok(Self {
                root: parse_field(root)?,
                id: parse_field(id)?,
                parent: None,
            }),
            [root, parent, id] => Ok(Self {
                root: parse_field(root)?,
                id: parse_field(id)?,
                parent: Some(parse_field(parent)?).filter(|p| !p.is_zero()),
            }),
            _ => Err(TraceError::MalformedEventId),
        }
    }

    /// Prefixes a SQL statement with a `/* root/id */` comment so slow query
    /// logs can be joined back to the event that issued the query.
    pub fn annotate(&self, sql: &str) -> String {
        format!("/* {}/{} */ {}", self.root, self.id, sql)
    }
}

fn parse_field(s: &str) -> Result<Id> {
    Id::parse(s).map_err(|_| TraceError::MalformedEventId)
}

pub(crate) fn nonzero_parent<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<Id>, D::Error> {
    Ok(Option::<Id>::deserialize(deserializer)?.filter(|p| !p.is_zero()))
}

fn no_parent(parent: &Option<Id>) -> bool {
    parent.is_none_or(|p| p.is_zero())
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query())
    }
}
