//! Per-call decoding state shared by the generic walker and the handlers.

use msgseries_core::{DecodeError, Deserializer, FieldPath, PrimitiveKind, Value};

use crate::{
    error::ParseError, policy::TruncationPolicy, registry::SchemaRegistry, shapes::HeaderLayout,
};

/// One-time warnings already issued by a parser.
#[derive(Debug, Default)]
pub(crate) struct Warnings {
    truncation: bool,
    length_mismatch: bool,
}

/// Cursor, pending writes and configuration for a single `parse` call.
///
/// Writes are collected here and handed back by [`finish`](Self::finish) so
/// that every sample of a message carries the same timestamp.
pub(crate) struct ParseContext<'a> {
    de: &'a mut dyn Deserializer,
    pub(crate) registry: &'a SchemaRegistry,
    pub(crate) channel: &'a str,
    policy: TruncationPolicy,
    header_layout: HeaderLayout,
    warnings: &'a mut Warnings,
    writes: Vec<(FieldPath, f64)>,
    emitting: bool,
    stamp: Option<f64>,
}

impl<'a> ParseContext<'a> {
    pub(crate) fn new(
        de: &'a mut dyn Deserializer,
        registry: &'a SchemaRegistry,
        channel: &'a str,
        policy: TruncationPolicy,
        header_layout: HeaderLayout,
        warnings: &'a mut Warnings,
    ) -> Self {
        Self {
            de,
            registry,
            channel,
            policy,
            header_layout,
            warnings,
            writes: Vec::new(),
            emitting: true,
            stamp: None,
        }
    }

    /// Pending writes and the header stamp found at the top level, if any.
    pub(crate) fn finish(self) -> (Vec<(FieldPath, f64)>, Option<f64>) {
        (self.writes, self.stamp)
    }

    pub(crate) fn header_layout(&self) -> HeaderLayout {
        self.header_layout
    }

    pub(crate) fn found_stamp(&mut self, stamp: f64) {
        self.stamp = Some(stamp);
    }

    pub(crate) fn emit(&mut self, path: FieldPath, value: f64) {
        if !self.emitting {
            return;
        }
        let path = if path.is_root() { path.child("") } else { path };
        self.writes.push((path, value));
    }

    /// Run `f` with emission disabled. Used to consume array elements that
    /// the truncation policy drops.
    pub(crate) fn muted<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        let previous = std::mem::replace(&mut self.emitting, false);
        let out = f(self);
        self.emitting = previous;
        out
    }

    /// Apply the truncation policy to a runtime array length.
    ///
    /// Returns how many leading elements to emit; the caller still consumes
    /// all `len` elements.
    pub(crate) fn emit_count(&mut self, len: usize, path: &FieldPath) -> Result<usize, ParseError> {
        if !self.emitting {
            return Ok(0);
        }
        let count = self.policy.emit_count(len, path)?;
        if count < len && !self.warnings.truncation {
            self.warnings.truncation = true;
            tracing::warn!(
                path = %path,
                len,
                max = self.policy.max_size,
                "array exceeds size limit, emitting a prefix"
            );
        }
        Ok(count)
    }

    pub(crate) fn warn_length_mismatch(&mut self, names: usize, values: usize) {
        if self.warnings.length_mismatch {
            return;
        }
        self.warnings.length_mismatch = true;
        tracing::warn!(
            channel = self.channel,
            names,
            values,
            "value count differs from registered names"
        );
    }

    pub(crate) fn bytes_left(&self) -> usize {
        self.de.bytes_left()
    }

    pub(crate) fn decode(&mut self, kind: PrimitiveKind, path: &FieldPath) -> Result<Value, ParseError> {
        self.de
            .decode(kind)
            .map_err(|source| ParseError::mismatch(path, source))
    }

    /// Decode a numeric primitive of `kind` as `f64`.
    pub(crate) fn read_number(&mut self, kind: PrimitiveKind, path: &FieldPath) -> Result<f64, ParseError> {
        self.decode(kind, path)?
            .try_f64()
            .map_err(|e| ParseError::mismatch(path, e.into()))
    }

    pub(crate) fn read_f64(&mut self, path: &FieldPath) -> Result<f64, ParseError> {
        self.read_number(PrimitiveKind::F64, path)
    }

    pub(crate) fn read_string(&mut self, path: &FieldPath) -> Result<String, ParseError> {
        self.de
            .decode_string()
            .map_err(|source| ParseError::mismatch(path, source))
    }

    pub(crate) fn skip_string(&mut self, path: &FieldPath) -> Result<(), ParseError> {
        self.decode(PrimitiveKind::String, path).map(drop)
    }

    /// Decode the runtime length prefix of a variable-length array.
    pub(crate) fn read_len(&mut self, path: &FieldPath) -> Result<usize, ParseError> {
        self.de
            .decode_len()
            .map_err(|source| ParseError::mismatch(path, source))
    }

    /// Decode a length prefix and reject it up front when `len` elements of
    /// at least `min_elem_size` bytes each cannot fit in what is left.
    pub(crate) fn read_count(
        &mut self,
        path: &FieldPath,
        min_elem_size: usize,
    ) -> Result<usize, ParseError> {
        let len = self.read_len(path)?;
        self.ensure_room(len, min_elem_size, path)?;
        Ok(len)
    }

    pub(crate) fn ensure_room(
        &self,
        len: usize,
        min_elem_size: usize,
        path: &FieldPath,
    ) -> Result<(), ParseError> {
        let needed = len.saturating_mul(min_elem_size);
        let remaining = self.bytes_left();
        if needed > remaining {
            return Err(ParseError::mismatch(
                path,
                DecodeError::UnexpectedEof { needed, remaining },
            ));
        }
        Ok(())
    }

    pub(crate) fn read_string_seq(&mut self, path: &FieldPath) -> Result<Vec<String>, ParseError> {
        let len = self.read_count(path, PrimitiveKind::String.min_wire_size())?;
        let mut out = Vec::with_capacity(len);
        for i in 0..len {
            out.push(self.read_string(&path.index(i))?);
        }
        Ok(out)
    }
}
