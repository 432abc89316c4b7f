use crate::PrimitiveType;

/// Classify a numeric-literal token by its lexical suffix.
///
/// The parser guarantees the token is a well-formed number literal, so this
/// never fails: `f`/`F` is a float, `l`/`L` a long, `d`/`D` a double, and an
/// unsuffixed token is an int unless it contains a decimal point.
#[must_use]
pub fn classify_number_literal(token: &str) -> PrimitiveType {
    match token.as_bytes().last() {
        Some(b'f' | b'F') => PrimitiveType::Float,
        Some(b'l' | b'L') => PrimitiveType::Long,
        Some(b'd' | b'D') => PrimitiveType::Double,
        _ if !token.contains('.') => PrimitiveType::Int,
        _ => PrimitiveType::Double,
    }
}
