use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::script::types::{Scene, Video};

fn heading_regex() -> &'static Regex {
    static HEADING_RE: OnceLock<Regex> = OnceLock::new();
    HEADING_RE.get_or_init(|| {
        Regex::new(r"^## \*\*Video\s+(\d+):\s*(.*?)\*\*").expect("video heading regex should compile")
    })
}

fn digits_regex() -> &'static Regex {
    static DIGITS_RE: OnceLock<Regex> = OnceLock::new();
    DIGITS_RE.get_or_init(|| Regex::new(r"\d+").expect("digit run regex should compile"))
}

/// Where the scanner is relative to the current video's scene table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TableState {
    Outside,
    Rows,
}

/// Parse the full script text into videos in document order
///
/// Never fails: unmatched headings, tables outside a video section and short rows
/// are skipped.
pub fn parse_script(text: &str) -> Vec<Video> {
    let mut videos = Vec::new();
    let mut current: Option<Video> = None;
    let mut table = TableState::Outside;

    for raw_line in text.lines() {
        let line = raw_line.trim();

        if let Some(video) = parse_heading(line) {
            if let Some(done) = current.take() {
                videos.push(done);
            }
            debug!("Found video {}: {}", video.video_number, video.title);
            current = Some(video);
            table = TableState::Outside;
            continue;
        }

        let Some(video) = current.as_mut() else {
            continue;
        };

        if !line.starts_with('|') {
            table = TableState::Outside;
            continue;
        }

        let cells = split_row(line);

        if cells.first().map(|cell| *cell == "Scene").unwrap_or(false) {
            table = TableState::Rows;
            continue;
        }

        if table == TableState::Outside || is_separator(&cells) {
            continue;
        }

        if let Some(scene) = parse_row(&cells, video.scenes.len()) {
            video.scenes.push(scene);
        }
    }

    if let Some(done) = current {
        videos.push(done);
    }

    videos
}

fn parse_heading(line: &str) -> Option<Video> {
    let caps = heading_regex().captures(line)?;
    let video_number = caps[1].parse().ok()?;
    Some(Video::new(video_number, &caps[2]))
}

/// Split `| a | b | c |` into trimmed cells, dropping the outer pipes
fn split_row(line: &str) -> Vec<&str> {
    line.trim_matches('|').split('|').map(str::trim).collect()
}

fn is_separator(cells: &[&str]) -> bool {
    cells
        .iter()
        .all(|cell| !cell.is_empty() && cell.chars().all(|c| matches!(c, '-' | ':' | ' ')))
}

fn parse_row(cells: &[&str], scenes_so_far: usize) -> Option<Scene> {
    if cells.len() < 3 {
        return None;
    }

    let scene_number = parse_scene_number(cells[0]).unwrap_or(scenes_so_far as u32 + 1);
    Some(Scene::new(scene_number, cells[1], strip_quotes(cells[2])))
}

/// First run of digits in the label once emphasis markers are removed
fn parse_scene_number(label: &str) -> Option<u32> {
    let label = label.replace('*', "");
    digits_regex().find(label.trim())?.as_str().parse().ok()
}

/// Remove one layer of surrounding quotation marks
fn strip_quotes(text: &str) -> &str {
    let text = text
        .strip_prefix(|c: char| c == '"' || c == '\u{201C}')
        .unwrap_or(text);
    text.strip_suffix(|c: char| c == '"' || c == '\u{201D}')
        .unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_VIDEOS: &str = r#"# Course Recording Script

Intro text that is not part of any video.

## **Video 1: Getting Started**

Some context paragraph.

| Scene | Visual | Narration |
| :---- | :---- | :---- |
| **1** | Logo on black | "Welcome to the course." |
| **2** | Dashboard overview | "This is the dashboard." |

## **Video 2: Advanced Topics**

| Scene | Visual | Narration |
| :---- | :---- | :---- |
| **1** | Settings page | "Open the settings." |
| **2** | Export dialog | "Export your work." |
| **3** | Closing slide | "Thanks for watching." |
"#;

    #[test]
    fn test_two_videos_in_order() {
        let videos = parse_script(TWO_VIDEOS);
        assert_eq!(videos.len(), 2);

        assert_eq!(videos[0].video_number, 1);
        assert_eq!(videos[0].title, "Getting Started");
        assert_eq!(videos[0].scenes.len(), 2);
        assert_eq!(videos[0].scenes[1].visual, "Dashboard overview");
        assert_eq!(videos[0].scenes[1].narration, "This is the dashboard.");

        assert_eq!(videos[1].title, "Advanced Topics");
        let numbers: Vec<u32> = videos[1].scenes.iter().map(|s| s.scene_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(videos[1].scenes[2].narration, "Thanks for watching.");
    }

    #[test]
    fn test_bold_label_number() {
        let script = "## **Video 4: Labels**\n| Scene | Visual | Narration |\n| --- | --- | --- |\n| **3** | x | y |\n";
        let videos = parse_script(script);
        assert_eq!(videos[0].scenes[0].scene_number, 3);
    }

    #[test]
    fn test_label_without_digits_uses_position() {
        let script = "## **Video 1: Labels**\n\
                      | Scene | Visual | Narration |\n\
                      | :---- | :---- | :---- |\n\
                      | **7** | a | first |\n\
                      | Intro | b | second |\n\
                      | *Outro* | c | third |\n";
        let videos = parse_script(script);
        let numbers: Vec<u32> = videos[0].scenes.iter().map(|s| s.scene_number).collect();
        assert_eq!(numbers, vec![7, 2, 3]);
    }

    #[test]
    fn test_label_takes_first_digit_run() {
        let script = "## **Video 1: Labels**\n| Scene | Visual | Narration |\n| Scene 12b (take 3) | a | b |\n";
        let videos = parse_script(script);
        assert_eq!(videos[0].scenes[0].scene_number, 12);
    }

    #[test]
    fn test_video_without_table_is_empty() {
        let script = "## **Video 1: Talking Head**\nJust prose here.\n\n## **Video 2: Demo**\n| Scene | Visual | Narration |\n| 1 | a | b |\n";
        let videos = parse_script(script);
        assert_eq!(videos.len(), 2);
        assert!(videos[0].scenes.is_empty());
        assert_eq!(videos[1].scenes.len(), 1);
    }

    #[test]
    fn test_malformed_headings_ignored() {
        let script = "## Video 1: Not bold\n### **Video 2: Wrong level**\n## **Video three: Not a number**\n## **Video 5: Good**\n";
        let videos = parse_script(script);
        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].video_number, 5);
        assert_eq!(videos[0].title, "Good");
    }

    #[test]
    fn test_short_rows_ignored() {
        let script = "## **Video 1: Rows**\n| Scene | Visual | Narration |\n| 1 | only visual |\n| 2 | v | n |\n";
        let videos = parse_script(script);
        assert_eq!(videos[0].scenes.len(), 1);
        assert_eq!(videos[0].scenes[0].scene_number, 2);
    }

    #[test]
    fn test_table_ends_at_non_table_line() {
        let script = "## **Video 1: Rows**\n\
                      | Scene | Visual | Narration |\n\
                      | 1 | v | inside |\n\
                      \n\
                      | 2 | v | after a blank line, no header |\n";
        let videos = parse_script(script);
        assert_eq!(videos[0].scenes.len(), 1);
    }

    #[test]
    fn test_rows_before_any_heading_ignored() {
        let script = "| Scene | Visual | Narration |\n| 1 | v | orphan |\n## **Video 1: Late**\n";
        let videos = parse_script(script);
        assert_eq!(videos.len(), 1);
        assert!(videos[0].scenes.is_empty());
    }

    #[test]
    fn test_single_quote_layer_stripped() {
        assert_eq!(strip_quotes("\"Hello\""), "Hello");
        assert_eq!(strip_quotes("\"\"Nested\"\""), "\"Nested\"");
        assert_eq!(strip_quotes("\u{201C}Curly\u{201D}"), "Curly");
        assert_eq!(strip_quotes("No quotes"), "No quotes");
    }

    #[test]
    fn test_duplicate_numbers_accepted() {
        let script = "## **Video 2: Dupes**\n| Scene | Visual | Narration |\n| 3 | a | x |\n| 3 | b | y |\n| 1 | c | z |\n## **Video 2: Again**\n";
        let videos = parse_script(script);
        assert_eq!(videos.len(), 2);
        let numbers: Vec<u32> = videos[0].scenes.iter().map(|s| s.scene_number).collect();
        assert_eq!(numbers, vec![3, 3, 1]);
        assert_eq!(videos[1].video_number, 2);
    }

    #[test]
    fn test_empty_document() {
        assert!(parse_script("").is_empty());
    }
}
