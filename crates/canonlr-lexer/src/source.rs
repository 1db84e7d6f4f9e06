//! Source text preprocessing.

/// Remove `//` and `/* */` comments and drop the lines left blank.
///
/// Block comments may span lines. A block comment is replaced by a single
/// space so that the tokens around it stay separated.
pub fn strip_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut in_block = false;

    for line in source.lines() {
        let mut kept = String::new();
        let mut rest = line;
        loop {
            if in_block {
                match rest.find("*/") {
                    Some(end) => {
                        rest = &rest[end + 2..];
                        in_block = false;
                    }
                    None => break,
                }
                continue;
            }

            match (rest.find("//"), rest.find("/*")) {
                (Some(line_start), Some(block_start)) if line_start < block_start => {
                    kept.push_str(&rest[..line_start]);
                    break;
                }
                (_, Some(block_start)) => {
                    kept.push_str(&rest[..block_start]);
                    kept.push(' ');
                    rest = &rest[block_start + 2..];
                    in_block = true;
                }
                (Some(line_start), None) => {
                    kept.push_str(&rest[..line_start]);
                    break;
                }
                (None, None) => {
                    kept.push_str(rest);
                    break;
                }
            }
        }

        if !kept.trim().is_empty() {
            out.push_str(&kept);
            out.push('\n');
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_comments() {
        assert_eq!(strip_comments("a = 1; // one\n// only\nb = 2;"), "a = 1; \nb = 2;\n");
    }

    #[test]
    fn block_comment_on_one_line() {
        assert_eq!(strip_comments("a /* x */ = 1;"), "a   = 1;\n");
    }

    #[test]
    fn block_comment_across_lines() {
        let source = "main() {\n  /* first\n     second */ x = 1;\n}\n";
        assert_eq!(strip_comments(source), "main() {\n x = 1;\n}\n");
    }

    #[test]
    fn unterminated_block_swallows_the_rest() {
        assert_eq!(strip_comments("a;\n/* open\nb;\n"), "a;\n");
    }
}
