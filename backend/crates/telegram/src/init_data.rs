//! Init Data Parsing
//!
//! Telegram hands Mini Apps a URL-encoded `initData` string such as
//! `auth_date=...&user=%7B...%7D&hash=...`. This module decodes it into
//! the canonical form the verification protocol operates on.

use std::collections::BTreeMap;

/// A decoded init data payload.
///
/// Fields are kept in a `BTreeMap` so iteration yields keys in the
/// byte-wise sorted order the data-check string requires. The `hash`
/// field is carried separately; it is never part of the signed content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitData {
    fields: BTreeMap<String, String>,
    hash: Option<String>,
}

impl InitData {
    /// Parse a raw URL-encoded init data string.
    ///
    /// Keys and values are percent-decoded with `+` treated as space,
    /// matching how Telegram encodes the payload. Duplicate keys keep
    /// the last occurrence. Parsing never fails: a malformed payload
    /// simply produces fields that will not verify.
    pub fn parse(raw: &str) -> Self {
        let mut fields = BTreeMap::new();
        let mut hash = None;

        for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
            if key == "hash" {
                hash = Some(value.into_owned());
            } else {
                fields.insert(key.into_owned(), value.into_owned());
            }
        }

        Self { fields, hash }
    }

    /// The received hash, exactly as sent. Compared byte-wise against
    /// the lowercase hex digest; a payload carrying uppercase hex does
    /// not verify.
    pub fn received_hash(&self) -> Option<&str> {
        self.hash.as_deref()
    }

    /// Look up a decoded field by key.
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Build the data-check string: every field except `hash` rendered
    /// as `key=value` with decoded values, sorted by key, joined with
    /// `\n`. This is the exact byte sequence Telegram signs.
    pub fn data_check_string(&self) -> String {
        let mut lines = Vec::with_capacity(self.fields.len());
        for (key, value) in &self.fields {
            lines.push(format!("{key}={value}"));
        }
        lines.join("\n")
    }
}
