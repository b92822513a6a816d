// ABOUTME: XML helpers shared by carriers with XML APIs
// ABOUTME: Per-call response deserialization and an event-based request document builder
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use serde::de::DeserializeOwned;
use trackit_core::{TrackingError, TrackingResult};

/// Deserialize a carrier XML response
///
/// A fresh deserializer is built for every call.
pub(crate) fn from_xml<T: DeserializeOwned>(carrier: &'static str, response: &str) -> TrackingResult<T> {
    quick_xml::de::from_str(response).map_err(|e| TrackingError::malformed(carrier, e))
}

/// Local name of the document element, `None` for a document without one
///
/// Carriers that answer with different document types (tracking detail or
/// an error envelope) are dispatched on this before deserializing.
pub(crate) fn root_element(carrier: &'static str, response: &str) -> TrackingResult<Option<String>> {
    let mut reader = Reader::from_str(response);
    loop {
        match reader.read_event() {
            Ok(Event::Start(element) | Event::Empty(element)) => {
                let name = element.local_name();
                return Ok(Some(String::from_utf8_lossy(name.as_ref()).into_owned()));
            }
            Ok(Event::Eof) => return Ok(None),
            Ok(_) => {}
            Err(e) => return Err(TrackingError::malformed(carrier, e)),
        }
    }
}

/// Builds carrier request documents event by event
pub(crate) struct XmlBuilder {
    carrier: &'static str,
    writer: Writer<Vec<u8>>,
}

impl XmlBuilder {
    pub(crate) fn new(carrier: &'static str) -> Self {
        Self {
            carrier,
            writer: Writer::new(Vec::new()),
        }
    }

    /// `<?xml version="1.0" encoding="UTF-8"?>`, optionally with `standalone`
    pub(crate) fn declaration(&mut self, standalone: Option<&str>) -> TrackingResult<&mut Self> {
        self.write(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), standalone)))
    }

    pub(crate) fn open(&mut self, name: &str) -> TrackingResult<&mut Self> {
        self.write(Event::Start(BytesStart::new(name)))
    }

    pub(crate) fn open_with(
        &mut self,
        name: &str,
        attributes: &[(&str, &str)],
    ) -> TrackingResult<&mut Self> {
        let mut start = BytesStart::new(name);
        for &attribute in attributes {
            start.push_attribute(attribute);
        }
        self.write(Event::Start(start))
    }

    /// Self-closing element carrying only attributes
    pub(crate) fn empty_with(
        &mut self,
        name: &str,
        attributes: &[(&str, &str)],
    ) -> TrackingResult<&mut Self> {
        let mut element = BytesStart::new(name);
        for &attribute in attributes {
            element.push_attribute(attribute);
        }
        self.write(Event::Empty(element))
    }

    /// `<name>value</name>` with `value` escaped
    pub(crate) fn text(&mut self, name: &str, value: &str) -> TrackingResult<&mut Self> {
        self.open(name)?;
        self.write(Event::Text(BytesText::new(value)))?;
        self.close(name)
    }

    pub(crate) fn close(&mut self, name: &str) -> TrackingResult<&mut Self> {
        self.write(Event::End(BytesEnd::new(name)))
    }

    pub(crate) fn finish(self) -> TrackingResult<String> {
        let carrier = self.carrier;
        String::from_utf8(self.writer.into_inner())
            .map_err(|e| TrackingError::invalid_request(carrier, e))
    }

    fn write(&mut self, event: Event<'_>) -> TrackingResult<&mut Self> {
        let carrier = self.carrier;
        self.writer
            .write_event(event)
            .map_err(|e| TrackingError::invalid_request(carrier, e))?;
        Ok(self)
    }
}
