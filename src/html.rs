//! `index.html` for a finished album.
//!
//! The page is a fixed template: a one-line instruction, then for every image
//! its caption as a heading and its thumbnail linking to the medium-size copy.
//!
//! ```text
//! Please click on a thumbnail to view a medium-size image
//!
//! <h2>caption</h2>
//! <a href="001-pier-medium.jpg"><img src="001-pier-thumb.jpg" border="1"></a>
//! ```
//!
//! Uses [maud](https://maud.lambda.xyz/), so captions typed at the prompt are
//! escaped rather than pasted into the markup.

use crate::album::Album;
use maud::{DOCTYPE, Markup, html};
use std::fs;
use std::path::{Path, PathBuf};

pub const INDEX_FILE: &str = "index.html";

const INSTRUCTIONS: &str = "Please click on a thumbnail to view a medium-size image";

/// Render the album page.
pub fn render_index(album: &Album, title: &str) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="UTF-8";
                title { (title) }
            }
            body {
                p { (INSTRUCTIONS) }
                @for item in &album.items {
                    h2 { (item.caption) }
                    a href=(item.medium) {
                        img src=(item.thumbnail) border="1" alt=(item.caption);
                    }
                }
            }
        }
    }
}

/// Render and write `index.html` into `output_dir`, returning its path.
pub fn write_index(album: &Album, output_dir: &Path, title: &str) -> std::io::Result<PathBuf> {
    fs::create_dir_all(output_dir)?;
    let path = output_dir.join(INDEX_FILE);
    fs::write(&path, render_index(album, title).into_string())?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::album::AlbumItem;
    use tempfile::TempDir;

    fn album(captions: &[&str]) -> Album {
        Album {
            items: captions
                .iter()
                .enumerate()
                .map(|(i, caption)| AlbumItem {
                    index: i + 1,
                    source: format!("src/{i}.jpg").into(),
                    thumbnail: format!("{:03}-x-thumb.jpg", i + 1),
                    medium: format!("{:03}-x-medium.jpg", i + 1),
                    caption: caption.to_string(),
                    rotation: None,
                })
                .collect(),
        }
    }

    #[test]
    fn index_links_thumbnail_to_medium() {
        let html = render_index(&album(&["Pier"]), "Holiday").into_string();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Holiday</title>"));
        assert!(html.contains(INSTRUCTIONS));
        assert!(html.contains("<h2>Pier</h2>"));
        assert!(html.contains(r#"<a href="001-x-medium.jpg"><img src="001-x-thumb.jpg" border="1""#));
    }

    #[test]
    fn items_appear_in_album_order() {
        let html = render_index(&album(&["first", "second", "third"]), "t").into_string();
        let a = html.find("first").unwrap();
        let b = html.find("second").unwrap();
        let c = html.find("third").unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn captions_are_escaped() {
        let html = render_index(&album(&["<script>alert(1)</script> & co"]), "t").into_string();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("&amp; co"));
    }

    #[test]
    fn empty_album_still_has_instructions() {
        let html = render_index(&album(&[]), "t").into_string();
        assert!(html.contains(INSTRUCTIONS));
        assert!(!html.contains("<h2>"));
    }

    #[test]
    fn write_index_creates_file() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("site");
        let path = write_index(&album(&["a"]), &out, "t").unwrap();
        assert_eq!(path, out.join("index.html"));
        assert!(std::fs::read_to_string(path).unwrap().contains("<h2>a</h2>"));
    }
}
