//! Directory listing module
//!
//! Renders an HTML index of a directory that has no index file.

use crate::handler::router::RequestContext;
use crate::http::{self, path, ResponseBody};
use crate::logger;
use hyper::Response;
use std::io;
use std::path::Path;
use tokio::fs;

/// One row of a directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub name: String,
    pub is_dir: bool,
    pub is_symlink: bool,
}

impl ListingEntry {
    /// Name shown to the user: `@` for symlinks, `/` for other directories
    fn display_name(&self) -> String {
        if self.is_symlink {
            format!("{}@", self.name)
        } else if self.is_dir {
            format!("{}/", self.name)
        } else {
            self.name.clone()
        }
    }

    /// Relative link target, directories keep their trailing slash
    fn link_name(&self) -> String {
        if self.is_dir {
            format!("{}/", self.name)
        } else {
            self.name.clone()
        }
    }
}

/// Serve the listing for `dir`, 404 if it cannot be read
pub async fn serve_listing(ctx: &RequestContext<'_>, dir: &Path) -> Response<ResponseBody> {
    match read_entries(dir).await {
        Ok(entries) => {
            let title = path::percent_decode(ctx.path);
            http::build_html_response(render_listing(&title, &entries), ctx.is_head)
        }
        Err(e) => {
            logger::log_warning(&format!(
                "Failed to list directory '{}': {e}",
                dir.display()
            ));
            http::build_404_response("No permission to list directory", ctx.is_head)
        }
    }
}

/// Read `dir`, sorted case-insensitively by name
pub async fn read_entries(dir: &Path) -> io::Result<Vec<ListingEntry>> {
    let mut reader = fs::read_dir(dir).await?;
    let mut entries = Vec::new();

    while let Some(entry) = reader.next_entry().await? {
        let is_symlink = entry.file_type().await.is_ok_and(|t| t.is_symlink());
        // Follows symlinks, a link to a directory links with a trailing slash
        let is_dir = fs::metadata(entry.path()).await.is_ok_and(|m| m.is_dir());
        entries.push(ListingEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir,
            is_symlink,
        });
    }

    entries.sort_by_cached_key(|e| e.name.to_lowercase());
    Ok(entries)
}

/// Render the listing document
pub fn render_listing(title: &str, entries: &[ListingEntry]) -> String {
    let title = path::escape_html(title);
    let mut html = format!(
        "<!DOCTYPE HTML>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Directory listing for {title}</title>\n</head>\n<body>\n\
         <h1>Directory listing for {title}</h1>\n<hr>\n<ul>\n"
    );

    for entry in entries {
        html.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            path::percent_encode_path(&entry.link_name()),
            path::escape_html(&entry.display_name()),
        ));
    }

    html.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TempRoot;

    fn entry(name: &str, is_dir: bool, is_symlink: bool) -> ListingEntry {
        ListingEntry {
            name: name.to_string(),
            is_dir,
            is_symlink,
        }
    }

    #[test]
    fn test_render_listing() {
        let html = render_listing(
            "/assets/",
            &[
                entry("libs", true, false),
                entry("main.js", false, false),
                entry("my page.html", false, false),
                entry("latest", false, true),
                entry("current", true, true),
            ],
        );
        assert!(html.contains("<title>Directory listing for /assets/</title>"));
        assert!(html.contains("<h1>Directory listing for /assets/</h1>"));
        assert!(html.contains("<li><a href=\"libs/\">libs/</a></li>"));
        assert!(html.contains("<li><a href=\"main.js\">main.js</a></li>"));
        assert!(html.contains("<li><a href=\"my%20page.html\">my page.html</a></li>"));
        assert!(html.contains("<li><a href=\"latest\">latest@</a></li>"));
        assert!(html.contains("<li><a href=\"current/\">current@</a></li>"));
        assert!(html.ends_with("</html>\n"));
    }

    #[test]
    fn test_render_escapes_names() {
        let html = render_listing("/<x>/", &[entry("a&b<c>.txt", false, false)]);
        assert!(html.contains("Directory listing for /&lt;x&gt;/"));
        assert!(html.contains(">a&amp;b&lt;c&gt;.txt</a>"));
        assert!(html.contains("href=\"a%26b%3Cc%3E.txt\""));
    }

    #[tokio::test]
    async fn test_read_entries_sorted() {
        let root = TempRoot::new("listing-sorted");
        root.write("b.txt", "");
        root.write("A.txt", "");
        root.mkdir("c");
        let entries = read_entries(root.path()).await.unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["A.txt", "b.txt", "c"]);
        assert!(entries[2].is_dir);
        assert!(!entries[0].is_dir);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlinked_directory_entry() {
        let root = TempRoot::new("listing-symlink-dir");
        let target = root.mkdir("releases/v2");
        std::os::unix::fs::symlink(&target, root.path().join("current")).unwrap();

        let entries = read_entries(root.path()).await.unwrap();
        let current = entries.iter().find(|e| e.name == "current").unwrap();
        assert!(current.is_dir);
        assert!(current.is_symlink);

        let html = render_listing("/", &entries);
        assert!(html.contains("<li><a href=\"current/\">current@</a></li>"));
        assert!(html.contains("<li><a href=\"releases/\">releases/</a></li>"));
    }

    #[tokio::test]
    async fn test_read_entries_missing_dir() {
        let root = TempRoot::new("listing-missing");
        assert!(read_entries(&root.path().join("nope")).await.is_err());
    }
}
