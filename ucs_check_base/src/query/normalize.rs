//! Collapse childless elements into self-closing form.
//!
//! `<aaaLogout inCookie="x"></aaaLogout>` becomes `<aaaLogout inCookie="x"/>`.
//! Some controller firmware rejects the expanded form.

use crate::api::errors::DocumentError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};

/// Rewrite every start tag immediately followed by its end tag as an empty tag
pub fn normalize_self_closing(document: &str) -> Result<String, DocumentError> {
    let mut reader = Reader::from_str(document);
    let mut writer = Writer::new(Vec::new());
    let mut pending: Option<BytesStart> = None;

    loop {
        let event = reader.read_event().map_err(DocumentError::new)?;

        if let Some(start) = pending.take() {
            match &event {
                Event::End(end) if end.name() == start.name() => {
                    writer
                        .write_event(Event::Empty(start))
                        .map_err(DocumentError::new)?;
                    continue;
                }
                _ => writer
                    .write_event(Event::Start(start))
                    .map_err(DocumentError::new)?,
            }
        }

        match event {
            Event::Eof => break,
            Event::Start(start) => pending = Some(start),
            other => writer.write_event(other).map_err(DocumentError::new)?,
        }
    }

    String::from_utf8(writer.into_inner()).map_err(DocumentError::new)
}
