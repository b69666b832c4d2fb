/// 以十进制单位格式化字节数，与 apt 的大小显示一致
///
/// 小于 10000 时显示整数，之后依次换算为 k、M、G…；
/// 换算后的值小于 100 时保留一位小数。
pub fn format_size(bytes: u128) -> String {
    const UNITS: [&str; 7] = ["", "k", "M", "G", "T", "P", "E"];

    let mut size = bytes as f64;
    for (i, unit) in UNITS.iter().enumerate() {
        if i != 0 && size < 100.0 {
            return format!("{:.1} {}", size, unit);
        }
        if size < 10000.0 {
            return format!("{:.0} {}", size, unit).trim_end().to_string();
        }
        size /= 1000.0;
    }
    format!("{:.0} {}", size, UNITS[UNITS.len() - 1])
}
