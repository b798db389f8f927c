use unicode_width::UnicodeWidthStr;

pub struct TextMetrics {
    pub char_width: f64,
    pub line_height: f64,
    pub padding_x: f64,
    pub padding_y: f64,
    pub header_padding: f64,
    pub min_node_width: f64,
    pub min_node_height: f64,
}

impl Default for TextMetrics {
    fn default() -> Self {
        Self {
            char_width: 7.0,
            line_height: 18.0,
            padding_x: 10.0,
            padding_y: 10.0,
            header_padding: 4.0,
            min_node_width: 200.0,
            min_node_height: 60.0,
        }
    }
}

impl TextMetrics {
    pub fn text_width(&self, text: &str) -> f64 {
        let width = UnicodeWidthStr::width(text);
        width as f64 * self.char_width
    }

    /// Box needed to show an entity: a header line with its name, then one
    /// line per raw field declaration.
    pub fn node_size<S: AsRef<str>>(&self, label: &str, lines: &[S]) -> (f64, f64) {
        let header_width = self.text_width(label);

        let max_line_width = lines
            .iter()
            .map(|line| self.text_width(line.as_ref()))
            .fold(0.0, f64::max);

        let content_width = header_width.max(max_line_width) + self.padding_x * 2.0;
        let width = content_width.max(self.min_node_width);

        let header_height = self.line_height + self.header_padding * 2.0;
        let body_height = if lines.is_empty() {
            0.0
        } else {
            lines.len() as f64 * self.line_height + self.padding_y * 2.0
        };

        let height = (header_height + body_height).max(self.min_node_height);

        (width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_width() {
        let m = TextMetrics::default();
        assert_eq!(m.text_width("User"), 4.0 * 7.0);
    }

    #[test]
    fn test_unicode_width() {
        let m = TextMetrics::default();
        // full-width characters count as two columns
        assert_eq!(m.text_width("ユーザー"), 8.0 * 7.0);
    }

    #[test]
    fn test_node_size_no_fields() {
        let m = TextMetrics::default();
        let (w, h) = m.node_size::<&str>("User", &[]);
        assert_eq!(w, m.min_node_width);
        assert_eq!(h, m.min_node_height);
    }

    #[test]
    fn test_node_size_grows_with_fields() {
        let m = TextMetrics::default();
        let lines = vec![
            "id    Int     @id @default(autoincrement())".to_string(),
            "name  String".to_string(),
            "email String  @unique".to_string(),
        ];
        let (w, h) = m.node_size("User", &lines);
        assert!(w > m.min_node_width);
        assert_eq!(h, 26.0 + 3.0 * 18.0 + 20.0);
    }
}
