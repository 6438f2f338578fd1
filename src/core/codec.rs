//! Lockfile serialization
//!
//! Output is a pure function of the lockfile's content: every map is
//! written with its keys sorted, so inserting the same entries in any
//! order produces identical bytes. Sorting happens on a borrowed view and
//! never touches the lockfile itself. Extension results and facts are
//! written back byte for byte; only their outer keys are sorted.
//!
//! Top-level fields are always written in this order:
//! `lockFileVersion`, `registryFileHashes`, `selectedYankedVersions`,
//! `moduleExtensions`, `facts`. Empty maps are written as `{}`.

use serde::{Deserialize, Serialize};
use serde_json::ser::{Formatter, PrettyFormatter};
use std::collections::{BTreeMap, HashMap};
use std::io;
use thiserror::Error;

use crate::config::defaults::DEFAULT_INDENT;
use crate::core::lockfile::{Lockfile, Payload};
use crate::core::versions::{self, FormatVersion};

/// Lockfile encoding errors
#[derive(Error, Debug)]
pub enum CodecError {
    /// Input is not a well-formed lockfile document
    #[error("Failed to parse lockfile: {error}")]
    Parse { error: String },

    /// Output could not be produced
    #[error("Failed to serialize lockfile: {error}")]
    Serialize { error: String },
}

/// Sorted, borrowed view of a lockfile used for writing
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LockfileView<'a> {
    lock_file_version: FormatVersion,
    registry_file_hashes: BTreeMap<&'a str, &'a str>,
    selected_yanked_versions: BTreeMap<&'a str, &'a str>,
    module_extensions: BTreeMap<&'a str, BTreeMap<&'a str, &'a Payload>>,
    facts: BTreeMap<&'a str, &'a Payload>,
}

impl<'a> LockfileView<'a> {
    fn new(lockfile: &'a Lockfile) -> Self {
        Self {
            lock_file_version: lockfile.version,
            registry_file_hashes: sorted_strings(&lockfile.registry_file_hashes),
            selected_yanked_versions: sorted_strings(&lockfile.selected_yanked_versions),
            module_extensions: lockfile
                .module_extensions
                .iter()
                .map(|(extension, results)| {
                    (
                        extension.as_str(),
                        results.iter().map(|(k, v)| (k.as_str(), v)).collect(),
                    )
                })
                .collect(),
            facts: lockfile
                .facts
                .iter()
                .map(|(k, v)| (k.as_str(), v))
                .collect(),
        }
    }
}

fn sorted_strings(map: &HashMap<String, String>) -> BTreeMap<&str, &str> {
    map.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
}

/// Lockfile document as read; any map may be missing or `null`
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LockfileDocument {
    lock_file_version: Option<FormatVersion>,
    registry_file_hashes: Option<HashMap<String, String>>,
    selected_yanked_versions: Option<HashMap<String, String>>,
    module_extensions: Option<HashMap<String, Option<HashMap<String, Payload>>>>,
    facts: Option<HashMap<String, Payload>>,
}

impl From<LockfileDocument> for Lockfile {
    fn from(doc: LockfileDocument) -> Self {
        Self {
            version: doc.lock_file_version.unwrap_or(0),
            registry_file_hashes: doc.registry_file_hashes.unwrap_or_default(),
            selected_yanked_versions: doc.selected_yanked_versions.unwrap_or_default(),
            module_extensions: doc
                .module_extensions
                .unwrap_or_default()
                .into_iter()
                .map(|(extension, results)| (extension, results.unwrap_or_default()))
                .collect(),
            facts: doc.facts.unwrap_or_default(),
        }
    }
}

/// Serialize a lockfile compactly
pub fn serialize(lockfile: &Lockfile) -> Result<Vec<u8>, CodecError> {
    serde_json::to_vec(&LockfileView::new(lockfile)).map_err(|e| CodecError::Serialize {
        error: e.to_string(),
    })
}

/// Serialize a lockfile pretty-printed
///
/// Every line after the first starts with `prefix`, followed by one `indent`
/// per nesting level. Payload text is written untouched, including any line
/// breaks inside it. Apart from whitespace the output equals [`serialize`].
pub fn serialize_indented(
    lockfile: &Lockfile,
    prefix: &str,
    indent: &str,
) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::new();
    let formatter = PrefixedFormatter::new(prefix.as_bytes(), indent.as_bytes());
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    LockfileView::new(lockfile)
        .serialize(&mut serializer)
        .map_err(|e| CodecError::Serialize {
            error: e.to_string(),
        })?;
    Ok(out)
}

/// Pretty formatter that starts each new line with a prefix
///
/// Only line breaks written by the formatter itself are prefixed; raw
/// payload fragments bypass it.
struct PrefixedFormatter<'a> {
    pretty: PrettyFormatter<'a>,
    prefix: &'a [u8],
}

impl<'a> PrefixedFormatter<'a> {
    fn new(prefix: &'a [u8], indent: &'a [u8]) -> Self {
        Self {
            pretty: PrettyFormatter::with_indent(indent),
            prefix,
        }
    }
}

/// Writer inserting a prefix after every newline
struct PrefixWriter<'w, W: ?Sized> {
    inner: &'w mut W,
    prefix: &'w [u8],
}

impl<W: ?Sized + io::Write> io::Write for PrefixWriter<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for line in buf.split_inclusive(|&b| b == b'\n') {
            self.inner.write_all(line)?;
            if line.ends_with(b"\n") {
                self.inner.write_all(self.prefix)?;
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

macro_rules! prefixed {
    ($self:ident, $writer:ident, $method:ident $(, $arg:expr)*) => {{
        let mut writer = PrefixWriter {
            inner: $writer,
            prefix: $self.prefix,
        };
        $self.pretty.$method(&mut writer $(, $arg)*)
    }};
}

impl Formatter for PrefixedFormatter<'_> {
    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        prefixed!(self, writer, begin_array)
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        prefixed!(self, writer, end_array)
    }

    fn begin_array_value<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        prefixed!(self, writer, begin_array_value, first)
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        prefixed!(self, writer, end_array_value)
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        prefixed!(self, writer, begin_object)
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        prefixed!(self, writer, end_object)
    }

    fn begin_object_key<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        prefixed!(self, writer, begin_object_key, first)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        prefixed!(self, writer, begin_object_value)
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        prefixed!(self, writer, end_object_value)
    }
}

/// Serialize a lockfile the way it is stored on disk
///
/// Indented output with a trailing newline.
pub fn serialize_for_file(lockfile: &Lockfile, indent: &str) -> Result<Vec<u8>, CodecError> {
    let mut out = serialize_indented(lockfile, "", indent)?;
    out.push(b'\n');
    Ok(out)
}

/// Parse a lockfile document
///
/// Missing or `null` maps become empty maps. The format version is not
/// checked here; see [`crate::core::versions::is_compatible`].
pub fn parse(data: &[u8]) -> Result<Lockfile, CodecError> {
    let doc: LockfileDocument = serde_json::from_slice(data).map_err(|e| CodecError::Parse {
        error: e.to_string(),
    })?;
    let lockfile = Lockfile::from(doc);

    if versions::format_info(lockfile.version).is_none() {
        tracing::debug!(
            "Parsed lockfile with unknown format version {}",
            lockfile.version
        );
    }

    Ok(lockfile)
}

impl Lockfile {
    /// Parse from JSON bytes
    pub fn from_json(data: &[u8]) -> Result<Self, CodecError> {
        parse(data)
    }

    /// Serialize to the on-disk JSON form
    pub fn to_json(&self) -> Result<String, CodecError> {
        let bytes = serialize_for_file(self, DEFAULT_INDENT)?;
        String::from_utf8(bytes).map_err(|e| CodecError::Serialize {
            error: e.to_string(),
        })
    }
}
