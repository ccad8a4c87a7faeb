use unicode_width::UnicodeWidthChar;

/// Word-wraps `text` into display rows no wider than `width` terminal columns.
///
/// Explicit newlines always start a new row. Words longer than the width are
/// broken across rows; whitespace at a wrap point is dropped. Wide glyphs
/// (CJK, most emoji) take two columns.
pub fn wrap_lines(text: &str, width: u16) -> Vec<String> {
    let width = usize::from(width.max(1));
    let mut rows = Vec::new();
    for source_line in text.split('\n') {
        wrap_source_line(source_line.trim_end_matches('\r'), width, &mut rows);
    }
    rows
}

fn column_width(ch: char) -> usize {
    ch.width().unwrap_or(0)
}

fn wrap_source_line(line: &str, width: usize, rows: &mut Vec<String>) {
    let chars: Vec<char> = line.chars().collect();
    let mut row = String::new();
    let mut col = 0usize;
    let mut idx = 0usize;

    while idx < chars.len() {
        let ch = chars[idx];
        if ch.is_whitespace() {
            if col >= width {
                rows.push(std::mem::take(&mut row));
                col = 0;
            } else if col > 0 || row.is_empty() {
                row.push(ch);
                col += 1;
            }
            idx += 1;
            continue;
        }

        let word_len = chars[idx..]
            .iter()
            .take_while(|c| !c.is_whitespace())
            .count();
        let word = &chars[idx..idx + word_len];
        let word_width: usize = word.iter().copied().map(column_width).sum();
        if col > 0 && word_width <= width && col + word_width > width {
            rows.push(std::mem::take(&mut row).trim_end().to_string());
            col = 0;
        }
        for ch in word.iter().copied() {
            let ch_width = column_width(ch);
            if col > 0 && col + ch_width > width {
                rows.push(std::mem::take(&mut row));
                col = 0;
            }
            row.push(ch);
            col += ch_width;
        }
        idx += word_len;
    }

    rows.push(row);
}
