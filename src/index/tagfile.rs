use std::io::{self, BufRead};

/// 标签文件中的一个段落 (一个软件包的描述)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paragraph {
    fields: Vec<(String, String)>,
}

impl Paragraph {
    /// 按字段名查找，字段名不区分大小写
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(field))
            .map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// 解析 `Field: value` 格式的标签文件
///
/// 段落之间以空行分隔；以空格或制表符开头的行是上一字段的续行；
/// 以 `#` 开头的行为注释。
pub fn parse_paragraphs<R: BufRead>(reader: R) -> io::Result<Vec<Paragraph>> {
    let mut paragraphs = Vec::new();
    let mut current = Paragraph::default();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = index + 1;

        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(std::mem::take(&mut current));
            }
            continue;
        }

        if line.starts_with('#') {
            continue;
        }

        if line.starts_with(' ') || line.starts_with('\t') {
            let Some((_, value)) = current.fields.last_mut() else {
                return Err(invalid(line_no, "续行之前没有字段"));
            };
            value.push('\n');
            value.push_str(line.trim());
            continue;
        }

        let Some((name, value)) = line.split_once(':') else {
            return Err(invalid(line_no, "缺少字段分隔符 ':'"));
        };
        let name = name.trim();
        if name.is_empty() {
            return Err(invalid(line_no, "字段名为空"));
        }
        current
            .fields
            .push((name.to_string(), value.trim().to_string()));
    }

    if !current.is_empty() {
        paragraphs.push(current);
    }

    Ok(paragraphs)
}

fn invalid(line_no: usize, message: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidData,
        format!("第 {} 行: {}", line_no, message),
    )
}
