//! Transcode raw export bytes into UTF-8 text.
//!
//! Decoding is strict: a malformed sequence is an error rather than a
//! replacement character, so a file saved in the wrong encoding fails loudly
//! instead of producing mojibake category names.

use encoding_rs::{DecoderResult, Encoding, SHIFT_JIS, UTF_8};
use mfreport_core::{PipelineError, Result};

use crate::types::SourceEncoding;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

fn encoding_for(source: SourceEncoding) -> &'static Encoding {
    match source {
        SourceEncoding::Utf8 => UTF_8,
        SourceEncoding::ShiftJis => SHIFT_JIS,
    }
}

/// Decode `bytes` from `source` into a UTF-8 string.
///
/// A leading UTF-8 byte order mark is dropped when the source is UTF-8.
pub fn to_utf8(bytes: &[u8], source: SourceEncoding) -> Result<String> {
    let bytes = match source {
        SourceEncoding::Utf8 => bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes),
        SourceEncoding::ShiftJis => bytes,
    };

    let mut decoder = encoding_for(source).new_decoder_without_bom_handling();
    let capacity = decoder
        .max_utf8_buffer_length_without_replacement(bytes.len())
        .unwrap_or(bytes.len().saturating_mul(3));
    let mut out = String::with_capacity(capacity);

    let (result, read) = decoder.decode_to_string_without_replacement(bytes, &mut out, true);
    match result {
        DecoderResult::InputEmpty => Ok(out),
        DecoderResult::Malformed(bad, extra) => Err(PipelineError::Encoding {
            encoding: source.name().to_string(),
            offset: read.saturating_sub(bad as usize + extra as usize),
        }),
        DecoderResult::OutputFull => Err(PipelineError::Encoding {
            encoding: source.name().to_string(),
            offset: read,
        }),
    }
}
