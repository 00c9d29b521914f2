#![allow(missing_docs)]
#![allow(dead_code)]

use std::collections::BTreeMap;

use jsonbind::{Bind, ErrorStack, OwnedEvent, from_events, impl_record};

pub const USERS: &str = r#"
[
    {
        "ID": 7947402710862746952,
        "nickname": "tails",
        "birthday": {"year": 1984, "month": 9, "day": 15},
        "block_event": {
            "serial_number": 9876543210123456789,
            "administrator ID": 11223344556677889900,
            "date": {"year": 1970, "month": 12, "day": 31},
            "description": "advertisement",
            "details": "various authors"
        },
        "dark_history": [
            {
                "serial_number": 9876543210123456788,
                "administrator ID": 11223344556677889900,
                "date": {"year": 1970, "month": 12, "day": 31},
                "description": "blocked",
                "details": "spam"
            }
        ],
        "optional_attributes": {"Self description": "Nothing", "Sex": "Female"}
    },
    {
        "ID": 13478355757133566847,
        "nickname": "☔☔☔",
        "birthday": {"year": 1, "month": 1, "day": 1},
        "block_event": null,
        "dark_history": [],
        "optional_attributes": {}
    }
]
"#;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Date {
    pub year: i32,
    pub month: i32,
    pub day: i32,
}

impl_record! {
    #[strict]
    Date {
        year: i32 [required],
        month: i32 [required],
        day: i32 [required],
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockEvent {
    pub serial_number: u64,
    pub admin_id: u64,
    pub date: Date,
    pub description: String,
    pub details: String,
}

impl Default for BlockEvent {
    fn default() -> Self {
        Self {
            serial_number: 0,
            admin_id: 255,
            date: Date {
                year: 1970,
                month: 1,
                day: 1,
            },
            description: String::new(),
            details: String::new(),
        }
    }
}

impl_record! {
    BlockEvent {
        serial_number: u64 [required],
        admin_id: u64 ["administrator ID"],
        date: Date,
        description: String,
        details: String,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: u64,
    pub nickname: String,
    pub birthday: Date,
    pub block_event: Option<Box<BlockEvent>>,
    pub dark_history: Vec<BlockEvent>,
    pub optional_attributes: BTreeMap<String, String>,
}

impl Default for User {
    fn default() -> Self {
        Self {
            id: 0,
            nickname: "❶❷❸".into(),
            birthday: Date::default(),
            block_event: None,
            dark_history: Vec::new(),
            optional_attributes: BTreeMap::new(),
        }
    }
}

impl_record! {
    User {
        id: u64 ["ID", required],
        nickname: String [required],
        birthday: Date,
        block_event: Option<Box<BlockEvent>>,
        dark_history: Vec<BlockEvent>,
        optional_attributes: BTreeMap<String, String>,
    }
}

/// Tokenizes `text` the way a SAX reader reports it.
pub fn events(text: &str) -> Vec<OwnedEvent> {
    let json: serde_json::Value = serde_json::from_str(text).expect("valid JSON");
    let mut out = Vec::new();
    push(&json, &mut out);
    out
}

fn push(json: &serde_json::Value, out: &mut Vec<OwnedEvent>) {
    match json {
        serde_json::Value::Null => out.push(OwnedEvent::Null),
        serde_json::Value::Bool(b) => out.push(OwnedEvent::Bool(*b)),
        serde_json::Value::Number(n) => out.push(if let Some(u) = n.as_u64() {
            u32::try_from(u).map_or(OwnedEvent::Uint64(u), OwnedEvent::Uint)
        } else if let Some(i) = n.as_i64() {
            i32::try_from(i).map_or(OwnedEvent::Int64(i), OwnedEvent::Int)
        } else {
            OwnedEvent::Double(n.as_f64().unwrap_or(f64::NAN))
        }),
        serde_json::Value::String(s) => out.push(OwnedEvent::String(s.clone())),
        serde_json::Value::Array(items) => {
            out.push(OwnedEvent::StartArray);
            for item in items {
                push(item, out);
            }
            out.push(OwnedEvent::EndArray(items.len()));
        }
        serde_json::Value::Object(members) => {
            out.push(OwnedEvent::StartObject);
            for (key, value) in members {
                out.push(OwnedEvent::Key(key.clone()));
                push(value, out);
            }
            out.push(OwnedEvent::EndObject(members.len()));
        }
    }
}

pub fn bind<T: Bind + Default>(text: &str) -> Result<T, ErrorStack> {
    let mut dest = T::default();
    from_events(&mut dest, &events(text))?;
    Ok(dest)
}

pub fn minify(text: &str) -> String {
    let json: serde_json::Value = serde_json::from_str(text).expect("valid JSON");
    serde_json::to_string(&json).expect("serializable")
}
