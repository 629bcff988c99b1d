use chardetng::EncodingDetector;
use encoding_rs::Encoding;

/// Page bytes decoded to UTF-8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPage {
    pub text: String,
    pub encoding_label: String,
}

/// Decode raw response bytes using: BOM -> Content-Type charset -> chardetng
/// detection. Malformed sequences are replaced rather than failing, since a
/// mostly-readable chapter beats no chapter.
pub fn decode_page(bytes: &[u8], content_type: Option<&str>) -> DecodedPage {
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

fn extract_charset(content_type: &str) -> Option<String> {
    content_type.split(';').find_map(|part| {
        let part = part.trim();
        if part.len() < "charset=".len() {
            return None;
        }
        let (key, value) = part.split_at("charset=".len());
        if key.eq_ignore_ascii_case("charset=") {
            Some(value.trim_matches([' ', '"', '\''].as_ref()).to_string())
        } else {
            None
        }
    })
}

fn decode_with(bytes: &[u8], encoding: &'static Encoding) -> DecodedPage {
    let (text, used, _had_errors) = encoding.decode(bytes);
    DecodedPage {
        text: text.into_owned(),
        encoding_label: used.name().to_string(),
    }
}
