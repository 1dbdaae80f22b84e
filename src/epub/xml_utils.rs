use quick_xml::events::BytesStart;
use std::borrow::Cow;

/// Decode XML bytes to a UTF-8 string.
///
/// Package and navigation documents may legally be UTF-16. The byte order
/// mark picks the encoding; without one the bytes are read as UTF-8, with
/// invalid sequences replaced rather than rejected.
pub fn decode_text(content: &[u8]) -> Cow<'_, str> {
    let (encoding, skip) =
        encoding_rs::Encoding::for_bom(content).unwrap_or((encoding_rs::UTF_8, 0));
    let (out, _) = encoding.decode_without_bom_handling(&content[skip..]);

    out
}

/// Local name of an element, ignoring any namespace prefix.
pub fn local_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

/// Find an attribute by local name, ignoring any namespace prefix in the
/// process (`epub:type` matches `type`).
pub fn attr_no_namespace(e: &BytesStart<'_>, name: &str) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.local_name().as_ref() == name.as_bytes())
        .map(|attr| match attr.unescape_value() {
            Ok(value) => value.into_owned(),
            Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
        })
}
