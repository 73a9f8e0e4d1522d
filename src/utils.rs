/// 读取ASCII字段并去除前后空格
///
/// Non-ASCII bytes are replaced rather than rejected, so a stray byte in a
/// free-text field does not make the whole header unreadable.
pub fn ascii_field(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).trim().to_string()
}

/// 严格的整数解析：空字段或非法字符返回 `None`
pub fn parse_ascii_int(bytes: &[u8]) -> Option<i64> {
    let s = ascii_field(bytes);
    if s.is_empty() {
        return None;
    }
    // i64::from_str 接受前导 '+'
    s.parse().ok()
}

/// 严格的浮点数解析
pub fn parse_ascii_float(bytes: &[u8]) -> Option<f64> {
    let s = ascii_field(bytes);
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}
