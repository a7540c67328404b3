use chardetng::EncodingDetector;
use encoding_rs::Encoding;

/// Decode raw page bytes to UTF-8: BOM -> Content-Type charset -> chardetng
/// guess. Decoding is lossy; a mangled character must not abort a harvest.
pub fn decode_page(bytes: &[u8], content_type: Option<&str>) -> String {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return decode_with(bytes, encoding);
    }

    if let Some(label) = content_type.and_then(extract_charset) {
        if let Some(encoding) = Encoding::for_label(label.as_bytes()) {
            return decode_with(bytes, encoding);
        }
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    decode_with(bytes, detector.guess(None, true))
}

fn decode_with(bytes: &[u8], encoding: &'static Encoding) -> String {
    let (text, _, _) = encoding.decode(bytes);
    text.into_owned()
}

fn extract_charset(content_type: &str) -> Option<&str> {
    content_type.split(';').find_map(|part| {
        let part = part.trim();
        strip_prefix_ignore_ascii_case(part, "charset=")
            .map(|value| value.trim_matches([' ', '"', '\''].as_ref()))
    })
}

fn strip_prefix_ignore_ascii_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    if text.len() < prefix.len() {
        return None;
    }
    if !text.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes()) {
        return None;
    }
    text.get(prefix.len()..)
}
