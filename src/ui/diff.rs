//! Line diff between the previous and new contents of a file.

use std::io::{self, Write};

use console::style;

/// One line of a diff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffLine<'a> {
    Same(&'a str),
    Removed(&'a str),
    Added(&'a str),
}

/// Compute a line diff using the longest common subsequence.
///
/// Removals are listed before additions at each point of change.
pub fn diff_lines<'a>(old: &'a str, new: &'a str) -> Vec<DiffLine<'a>> {
    let old: Vec<&str> = old.lines().collect();
    let new: Vec<&str> = new.lines().collect();
    let (n, m) = (old.len(), new.len());

    // lcs[i][j] = LCS length of old[i..] and new[j..]
    let mut lcs = vec![vec![0usize; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            lcs[i][j] = if old[i] == new[j] {
                lcs[i + 1][j + 1] + 1
            } else {
                lcs[i + 1][j].max(lcs[i][j + 1])
            };
        }
    }

    let mut lines = Vec::with_capacity(n.max(m));
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if old[i] == new[j] {
            lines.push(DiffLine::Same(old[i]));
            i += 1;
            j += 1;
        } else if lcs[i + 1][j] >= lcs[i][j + 1] {
            lines.push(DiffLine::Removed(old[i]));
            i += 1;
        } else {
            lines.push(DiffLine::Added(new[j]));
            j += 1;
        }
    }
    lines.extend(old[i..].iter().copied().map(DiffLine::Removed));
    lines.extend(new[j..].iter().copied().map(DiffLine::Added));
    lines
}

/// Write a coloured diff section for one file
pub fn write_diff(out: &mut dyn Write, name: &str, old: &str, new: &str) -> io::Result<()> {
    writeln!(out, "{}", style("===").blue())?;
    writeln!(out, "Showing changes to {}\n", style(name).yellow())?;

    for line in diff_lines(old, new) {
        match line {
            DiffLine::Same(text) => writeln!(out, "  {}", text)?,
            DiffLine::Removed(text) => writeln!(out, "{}", style(format!("- {}", text)).red())?,
            DiffLine::Added(text) => writeln!(out, "{}", style(format!("+ {}", text)).green())?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diff_identical() {
        let lines = diff_lines("a\nb", "a\nb");
        assert_eq!(lines, vec![DiffLine::Same("a"), DiffLine::Same("b")]);
    }

    #[test]
    fn test_diff_single_change() {
        let old = "name: app\nversion: 0.1.0\nappVersion: 1.0.0\n";
        let new = "name: app\nversion: 0.1.1\nappVersion: 1.1.0\n";
        assert_eq!(
            diff_lines(old, new),
            vec![
                DiffLine::Same("name: app"),
                DiffLine::Removed("version: 0.1.0"),
                DiffLine::Removed("appVersion: 1.0.0"),
                DiffLine::Added("version: 0.1.1"),
                DiffLine::Added("appVersion: 1.1.0"),
            ]
        );
    }

    #[test]
    fn test_diff_insert_and_delete() {
        assert_eq!(
            diff_lines("a\nc", "a\nb\nc"),
            vec![DiffLine::Same("a"), DiffLine::Added("b"), DiffLine::Same("c")]
        );
        assert_eq!(
            diff_lines("a\nb\nc", "a\nc"),
            vec![DiffLine::Same("a"), DiffLine::Removed("b"), DiffLine::Same("c")]
        );
        assert_eq!(diff_lines("", "x"), vec![DiffLine::Added("x")]);
        assert_eq!(diff_lines("x", ""), vec![DiffLine::Removed("x")]);
    }

    #[test]
    fn test_write_diff() {
        let mut buf = Vec::new();
        write_diff(&mut buf, "Chart.yaml", "version: 1", "version: 2").unwrap();
        let text = console::strip_ansi_codes(&String::from_utf8(buf).unwrap()).to_string();
        assert_eq!(
            text,
            "===\nShowing changes to Chart.yaml\n\n- version: 1\n+ version: 2\n"
        );
    }
}
