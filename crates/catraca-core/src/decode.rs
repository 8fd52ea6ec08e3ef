use std::io::{BufRead, BufReader, Read};

use encoding_rs::{UTF_8, WINDOWS_1252};
use encoding_rs_io::DecodeReaderBytesBuilder;

/// Encoding flavor of an incoming feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedEncoding {
    /// BOM-sniffed, UTF-8 when no BOM is present. A UTF-16 BOM switches
    /// decoding accordingly; any leading BOM is stripped.
    Utf8Bom,
    /// Single-byte Western encoding, no BOM handling. Every byte maps,
    /// so decoding this flavor can never fail.
    Windows1252,
}

/// Wrap a raw byte stream as a decoded, line-oriented text stream.
///
/// At most `byte_length` bytes are consumed from `reader`, even if the
/// underlying transport would supply more. Undecodable input comes out
/// as U+FFFD instead of aborting the stream.
pub fn decoded_lines<R: Read>(
    reader: R,
    byte_length: u64,
    encoding: FeedEncoding,
) -> impl BufRead {
    let bounded = reader.take(byte_length);
    let decoder = match encoding {
        FeedEncoding::Utf8Bom => DecodeReaderBytesBuilder::new()
            .encoding(Some(UTF_8))
            .bom_override(true)
            .build(bounded),
        FeedEncoding::Windows1252 => DecodeReaderBytesBuilder::new()
            .encoding(Some(WINDOWS_1252))
            .bom_sniffing(false)
            .build(bounded),
    };
    BufReader::new(decoder)
}

/// Delimiter detection: semicolon if the first line contains one,
/// otherwise comma. Decided once, applied to every subsequent row.
pub fn sniff_delimiter(header_line: &str) -> u8 {
    if header_line.contains(';') {
        b';'
    } else {
        b','
    }
}
