//! XML-RPC value grammar shared by request composition and response decoding.
//!
//! A value is one of four shapes: an integer scalar, a character-data scalar,
//! a struct of named members or an array of values. Integers keep their
//! decimal text so identifiers round-trip without numeric conversion.

use std::io::Write;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::{BacklogError, Result};

/// Represents a decoded or to-be-encoded XML-RPC value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Int(String),
    Text(String),
    Struct(Vec<Member>),
    Array(Vec<Value>),
}

/// Named field inside a struct value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub name: String,
    pub value: Value,
}

impl Member {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

impl Value {
    pub fn int(value: impl Into<String>) -> Self {
        Value::Int(value.into())
    }

    pub fn text(value: impl Into<String>) -> Self {
        Value::Text(value.into())
    }

    pub fn as_int(&self) -> Option<&str> {
        match self {
            Value::Int(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&[Member]> {
        match self {
            Value::Struct(members) => Some(members),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(values) => Some(values),
            _ => None,
        }
    }

    /// Returns the last member with the given name when this value is a struct.
    pub fn member(&self, name: &str) -> Option<&Value> {
        self.as_struct()?
            .iter()
            .rev()
            .find(|member| member.name == name)
            .map(|member| &member.value)
    }

    /// Writes this value as a `<value>` element.
    pub fn write_to<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        write_element(writer, "value", |writer| match self {
            Value::Int(value) => write_text_element(writer, "int", value),
            Value::Text(value) => write_text_element(writer, "string", value),
            Value::Struct(members) => write_element(writer, "struct", |writer| {
                for member in members {
                    write_element(writer, "member", |writer| {
                        write_text_element(writer, "name", &member.name)?;
                        member.value.write_to(writer)
                    })?;
                }
                Ok(())
            }),
            Value::Array(values) => write_element(writer, "array", |writer| {
                write_element(writer, "data", |writer| {
                    for value in values {
                        value.write_to(writer)?;
                    }
                    Ok(())
                })
            }),
        })
    }
}

pub(crate) fn write_element<W, F>(writer: &mut Writer<W>, tag: &str, body: F) -> Result<()>
where
    W: Write,
    F: FnOnce(&mut Writer<W>) -> Result<()>,
{
    writer
        .write_event(Event::Start(BytesStart::new(tag)))
        .map_err(write_error)?;
    body(writer)?;
    writer
        .write_event(Event::End(BytesEnd::new(tag)))
        .map_err(write_error)
}

pub(crate) fn write_text_element<W: Write>(writer: &mut Writer<W>, tag: &str, text: &str) -> Result<()> {
    write_element(writer, tag, |writer| {
        writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(write_error)
    })
}

pub(crate) fn write_error(err: impl std::fmt::Display) -> BacklogError {
    BacklogError::Xml(err.to_string())
}

/// Structural token produced by [`XmlCursor`].
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Token {
    Open(String),
    Close(String),
    Text(String),
    Eof,
}

/// Pull cursor over an XML document that yields only the tokens the value grammar cares about.
pub(crate) struct XmlCursor<'a> {
    reader: Reader<&'a [u8]>,
}

impl<'a> XmlCursor<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        let mut reader = Reader::from_reader(bytes);
        let config = reader.config_mut();
        config.expand_empty_elements = true;
        config.check_end_names = true;
        Self { reader }
    }

    pub(crate) fn next_token(&mut self) -> Result<Token> {
        loop {
            match self.reader.read_event()? {
                Event::Start(start) => {
                    return Ok(Token::Open(decode_name(start.local_name().as_ref())?))
                }
                Event::End(end) => return Ok(Token::Close(decode_name(end.local_name().as_ref())?)),
                Event::Text(text) => return Ok(Token::Text(text.unescape()?.into_owned())),
                Event::CData(data) => {
                    let raw = data.into_inner().into_owned();
                    let text = String::from_utf8(raw)
                        .map_err(|err| BacklogError::malformed(err.to_string()))?;
                    return Ok(Token::Text(text));
                }
                Event::Eof => return Ok(Token::Eof),
                _ => continue,
            }
        }
    }

    /// Returns the next element boundary, skipping character data between elements.
    pub(crate) fn next_tag(&mut self) -> Result<Token> {
        loop {
            match self.next_token()? {
                Token::Text(_) => continue,
                other => return Ok(other),
            }
        }
    }

    pub(crate) fn expect_open(&mut self, tag: &str) -> Result<()> {
        match self.next_tag()? {
            Token::Open(name) if name == tag => Ok(()),
            other => Err(unexpected(tag, &other)),
        }
    }

    pub(crate) fn expect_close(&mut self, tag: &str) -> Result<()> {
        match self.next_tag()? {
            Token::Close(name) if name == tag => Ok(()),
            other => Err(unexpected(&format!("/{tag}"), &other)),
        }
    }

    /// Collects character data up to the closing tag of a scalar element.
    pub(crate) fn text_until(&mut self, tag: &str) -> Result<String> {
        let mut text = String::new();
        loop {
            match self.next_token()? {
                Token::Text(chunk) => text.push_str(&chunk),
                Token::Close(name) if name == tag => return Ok(text),
                other => return Err(unexpected(&format!("/{tag}"), &other)),
            }
        }
    }

    /// Consumes everything up to and including the close of an already opened element.
    pub(crate) fn skip_element(&mut self, tag: &str) -> Result<()> {
        let mut depth = 0usize;
        loop {
            match self.next_token()? {
                Token::Open(_) => depth += 1,
                Token::Close(name) => {
                    if depth == 0 {
                        return if name == tag {
                            Ok(())
                        } else {
                            Err(unexpected(&format!("/{tag}"), &Token::Close(name)))
                        };
                    }
                    depth -= 1;
                }
                Token::Text(_) => {}
                Token::Eof => return Err(unexpected(&format!("/{tag}"), &Token::Eof)),
            }
        }
    }

    /// Parses the body of a `<value>` element whose opening tag was already consumed.
    pub(crate) fn value_body(&mut self) -> Result<Value> {
        let mut text = String::new();
        loop {
            match self.next_token()? {
                Token::Text(chunk) => text.push_str(&chunk),
                Token::Close(name) if name == "value" => return Ok(Value::Text(text)),
                Token::Open(tag) => {
                    let value = match tag.as_str() {
                        "int" | "i4" => Value::Int(self.text_until(&tag)?.trim().to_string()),
                        "string" => Value::Text(self.text_until(&tag)?),
                        "struct" => Value::Struct(self.struct_body()?),
                        "array" => Value::Array(self.array_body()?),
                        // boolean, double, dateTime.iso8601 and base64 are carried as raw text
                        _ => Value::Text(self.text_until(&tag)?),
                    };
                    self.expect_close("value")?;
                    return Ok(value);
                }
                other => return Err(unexpected("/value", &other)),
            }
        }
    }

    fn struct_body(&mut self) -> Result<Vec<Member>> {
        let mut members = Vec::new();
        loop {
            match self.next_tag()? {
                Token::Close(name) if name == "struct" => return Ok(members),
                Token::Open(name) if name == "member" => {
                    if let Some(member) = self.member_body()? {
                        members.push(member);
                    }
                }
                Token::Open(name) => self.skip_element(&name)?,
                other => return Err(unexpected("/struct", &other)),
            }
        }
    }

    fn member_body(&mut self) -> Result<Option<Member>> {
        let mut name = None;
        let mut value = None;
        loop {
            match self.next_tag()? {
                Token::Close(tag) if tag == "member" => break,
                Token::Open(tag) if tag == "name" => name = Some(self.text_until("name")?),
                Token::Open(tag) if tag == "value" => value = Some(self.value_body()?),
                Token::Open(tag) => self.skip_element(&tag)?,
                other => return Err(unexpected("/member", &other)),
            }
        }
        Ok(name.zip(value).map(|(name, value)| Member { name, value }))
    }

    fn array_body(&mut self) -> Result<Vec<Value>> {
        let mut values = Vec::new();
        loop {
            match self.next_tag()? {
                Token::Close(name) if name == "array" => return Ok(values),
                Token::Open(name) if name == "data" => loop {
                    match self.next_tag()? {
                        Token::Close(tag) if tag == "data" => break,
                        Token::Open(tag) if tag == "value" => values.push(self.value_body()?),
                        Token::Open(tag) => self.skip_element(&tag)?,
                        other => return Err(unexpected("/data", &other)),
                    }
                },
                Token::Open(name) => self.skip_element(&name)?,
                other => return Err(unexpected("/array", &other)),
            }
        }
    }
}

fn decode_name(raw: &[u8]) -> Result<String> {
    std::str::from_utf8(raw)
        .map(str::to_string)
        .map_err(|err| BacklogError::malformed(err.to_string()))
}

fn unexpected(expected: &str, found: &Token) -> BacklogError {
    let found = match found {
        Token::Open(name) => format!("<{name}>"),
        Token::Close(name) => format!("</{name}>"),
        Token::Text(_) => "character data".to_string(),
        Token::Eof => "end of document".to_string(),
    };
    BacklogError::malformed(format!("expected <{expected}>, found {found}"))
}

/// Parses a standalone `<value>` element.
pub fn parse_value(bytes: &[u8]) -> Result<Value> {
    let mut cursor = XmlCursor::new(bytes);
    cursor.expect_open("value")?;
    cursor.value_body()
}

/// Serializes a value to a standalone `<value>` element.
pub fn value_to_string(value: &Value) -> Result<String> {
    let mut writer = Writer::new(Vec::new());
    value.write_to(&mut writer)?;
    String::from_utf8(writer.into_inner()).map_err(write_error)
}
