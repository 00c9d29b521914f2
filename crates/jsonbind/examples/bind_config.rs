//! Binds a service configuration onto typed records and reports where a
//! broken configuration went wrong.
//!
//! Documents are tokenized with `serde_json` and replayed as events, the way
//! a SAX reader would push them.
//!
//! Run with
//!
//! ```bash
//! cargo run -p jsonbind --example bind_config
//! ```

#![allow(clippy::needless_raw_string_hashes)]

use std::collections::BTreeMap;

use jsonbind::{
    Bound, EventSink, Value, WriterOptions, impl_record, to_string_pretty, to_string_with,
};

#[derive(Debug, Default)]
struct Listener {
    host: String,
    port: u16,
    tls: bool,
}

impl_record! {
    #[strict]
    Listener {
        host: String [required],
        port: u16 [required],
        tls: bool,
    }
}

#[derive(Debug, Default)]
struct Config {
    name: String,
    listeners: Vec<Listener>,
    limits: BTreeMap<String, u32>,
    fallback: Option<Box<Listener>>,
    metadata: Value,
}

impl_record! {
    Config {
        name: String ["service name", required],
        listeners: Vec<Listener>,
        limits: BTreeMap<String, u32>,
        fallback: Option<Box<Listener>>,
        metadata: Value,
    }
}

const GOOD: &str = r#"
{
    "service name": "edge",
    "listeners": [
        {"host": "0.0.0.0", "port": 443, "tls": true},
        {"host": "0.0.0.0", "port": 80}
    ],
    "limits": {"connections": 1024, "requests per second": 300},
    "fallback": null,
    "metadata": {"owner": "ops", "tags": ["public", 2]},
    "comment": "ignored by the lenient record"
}
"#;

const BAD: &str = r#"
{
    "service name": "edge",
    "listeners": [
        {"host": "0.0.0.0", "port": 443},
        {"host": "0.0.0.0", "port": 70000}
    ]
}
"#;

/// Pushes `json` into `sink` the way a SAX reader reports it.
fn push<S: EventSink>(json: &serde_json::Value, sink: &mut S) -> jsonbind::Flow {
    match json {
        serde_json::Value::Null => sink.null(),
        serde_json::Value::Bool(b) => sink.bool(*b),
        serde_json::Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                sink.uint64(u)
            } else if let Some(i) = n.as_i64() {
                sink.int64(i)
            } else {
                sink.double(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        serde_json::Value::String(s) => sink.string(s, true),
        serde_json::Value::Array(items) => {
            sink.start_array()?;
            for item in items {
                push(item, sink)?;
            }
            sink.end_array(items.len())
        }
        serde_json::Value::Object(members) => {
            sink.start_object()?;
            for (key, value) in members {
                sink.key(key, true)?;
                push(value, sink)?;
            }
            sink.end_object(members.len())
        }
    }
}

fn load(text: &str) -> Result<Config, jsonbind::ErrorStack> {
    let json: serde_json::Value = serde_json::from_str(text).expect("example documents are valid JSON");
    let mut config = Config::default();
    let mut bound = Bound::new(&mut config);
    // A halt leaves the cause in the handlers; `finish` reports it.
    let _ = push(&json, &mut bound);
    bound.finish()?;
    Ok(config)
}

fn main() {
    let config = load(GOOD).expect("the good configuration binds");
    println!("loaded {:?} with {} listeners", config.name, config.listeners.len());
    for listener in &config.listeners {
        println!(
            "  {}:{}{}",
            listener.host,
            listener.port,
            if listener.tls { " (tls)" } else { "" }
        );
    }
    println!("limits: {}", to_string_pretty(&config.limits));
    println!(
        "metadata: {}",
        to_string_with(&config.metadata, WriterOptions { pretty: true, indent: 2 })
    );

    let errors = load(BAD).expect_err("the bad configuration fails");
    println!("rejected: {errors}");
    for frame in &errors {
        println!("  {frame}");
    }

    #[cfg(not(miri))]
    insta::assert_snapshot!(errors.to_string(), @r#"number out of range for type "u16" at /listeners/1/port"#);
}
