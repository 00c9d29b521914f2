//! Rendering an event stream as JSON text.
use alloc::vec::Vec;
use core::fmt::{self, Write};

use crate::{
    error::{Flow, Halt},
    event::{Event, EventSink},
    options::WriterOptions,
    value::write_escaped_string,
};

#[derive(Debug, Clone, Copy)]
struct Level {
    entries: usize,
}

/// An [`EventSink`] that writes JSON text into any [`fmt::Write`].
///
/// The writer trusts the stream to be well formed. Non-finite doubles have
/// no JSON spelling and are written as `null`. A formatter error halts the
/// stream.
///
/// # Examples
///
/// ```
/// use jsonbind::{EventSink, JsonWriter};
///
/// let mut text = String::new();
/// let mut writer = JsonWriter::new(&mut text);
/// writer.start_object()?;
/// writer.key("ratio", false)?;
/// writer.double(0.5)?;
/// writer.end_object(1)?;
/// assert_eq!(text, r#"{"ratio":0.5}"#);
/// # Ok::<(), jsonbind::Halt>(())
/// ```
pub struct JsonWriter<W: Write> {
    out: W,
    options: WriterOptions,
    levels: Vec<Level>,
    after_key: bool,
}

impl<W: Write> JsonWriter<W> {
    /// Creates a compact writer.
    pub fn new(out: W) -> Self {
        Self::with_options(out, WriterOptions::default())
    }

    /// Creates a writer configured by `options`.
    pub fn with_options(out: W, options: WriterOptions) -> Self {
        Self {
            out,
            options,
            levels: Vec::new(),
            after_key: false,
        }
    }

    /// Returns the underlying output.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn newline(&mut self) -> fmt::Result {
        if !self.options.pretty {
            return Ok(());
        }
        self.out.write_char('\n')?;
        for _ in 0..self.levels.len() * self.options.indent {
            self.out.write_char(' ')?;
        }
        Ok(())
    }

    /// Writes the separator that precedes a new array element or object key.
    fn separate(&mut self) -> fmt::Result {
        let Some(level) = self.levels.last_mut() else {
            return Ok(());
        };
        let first = level.entries == 0;
        level.entries += 1;
        if !first {
            self.out.write_char(',')?;
        }
        self.newline()
    }

    fn begin_value(&mut self) -> fmt::Result {
        if self.after_key {
            self.after_key = false;
            Ok(())
        } else {
            self.separate()
        }
    }

    fn open(&mut self, bracket: char) -> fmt::Result {
        self.begin_value()?;
        self.out.write_char(bracket)?;
        self.levels.push(Level { entries: 0 });
        Ok(())
    }

    fn close(&mut self, bracket: char) -> fmt::Result {
        let level = self.levels.pop().unwrap_or(Level { entries: 0 });
        if level.entries > 0 {
            self.newline()?;
        }
        self.out.write_char(bracket)
    }

    fn quoted(&mut self, text: &str) -> fmt::Result {
        self.out.write_char('"')?;
        write_escaped_string(text, &mut self.out)?;
        self.out.write_char('"')
    }

    fn write_event(&mut self, event: Event<'_>) -> fmt::Result {
        match event {
            Event::Null => {
                self.begin_value()?;
                self.out.write_str("null")
            }
            Event::Bool(b) => {
                self.begin_value()?;
                self.out.write_str(if b { "true" } else { "false" })
            }
            Event::Int(i) => {
                self.begin_value()?;
                write!(self.out, "{i}")
            }
            Event::Uint(u) => {
                self.begin_value()?;
                write!(self.out, "{u}")
            }
            Event::Int64(i) => {
                self.begin_value()?;
                write!(self.out, "{i}")
            }
            Event::Uint64(u) => {
                self.begin_value()?;
                write!(self.out, "{u}")
            }
            Event::Double(d) => {
                self.begin_value()?;
                if d.is_finite() {
                    write!(self.out, "{d:?}")
                } else {
                    self.out.write_str("null")
                }
            }
            Event::String { value, .. } => {
                self.begin_value()?;
                self.quoted(value)
            }
            Event::Key { name, .. } => {
                self.separate()?;
                self.quoted(name)?;
                self.out
                    .write_str(if self.options.pretty { ": " } else { ":" })?;
                self.after_key = true;
                Ok(())
            }
            Event::StartArray => self.open('['),
            Event::EndArray(_) => self.close(']'),
            Event::StartObject => self.open('{'),
            Event::EndObject(_) => self.close('}'),
        }
    }
}

impl<W: Write> EventSink for JsonWriter<W> {
    fn event(&mut self, event: Event<'_>) -> Flow {
        self.write_event(event).map_err(|_| Halt)
    }
}
