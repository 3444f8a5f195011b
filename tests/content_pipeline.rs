use std::fs;
use std::path::Path;

use folio::content::{ContentError, ContentRecord, ContentRepository};
use folio::Site;

fn write(path: &Path, text: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, text).unwrap();
}

fn post(dir: &Path, name: &str, title: &str, date: &str) {
    write(
        &dir.join("content/blog").join(name),
        &format!(
            "---\ntitle: {}\ndate: {}\n---\n\nSome *text* with [a link](https://other.example/x).\n",
            title, date
        ),
    );
}

fn sample_site() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    write(
        &root.join("_config.yml"),
        "title: Test\nurl: https://moroz.dev\nper_page: 2\n",
    );

    post(root, "alpha.md", "Alpha", "2024-03-01");
    post(root, "bravo.md", "Bravo", "2024-03-01");
    post(root, "charlie.md", "Charlie", "2024-05-20 08:00:00");
    post(root, "delta.md", "Delta", "2023-12-31");
    post(root, "echo.md", "Echo", "2024-03-01");

    write(
        &root.join("content/videos/talk.md"),
        "---\ntitle: Talk\ndate: 2023-07-09\nyoutube: abc123\n---\n",
    );
    write(
        &root.join("content/videos/demo.md"),
        "---\ntitle: Demo\ndate: 2024-01-02\nyoutube: def456\n---\n",
    );

    // Not markdown; ignored
    write(&root.join("content/blog/cover.png"), "");

    dir
}

#[test]
fn test_load_sorts_newest_first_and_keeps_ties_in_file_order() {
    let dir = sample_site();
    let site = Site::new(dir.path()).unwrap();
    let repo = ContentRepository::load(&site).unwrap();

    let slugs = repo.post_slugs();
    assert_eq!(slugs, vec!["charlie", "alpha", "bravo", "echo", "delta"]);
    assert_eq!(repo.video_slugs(), vec!["demo", "talk"]);
}

#[test]
fn test_ties_keep_file_order_not_slug_order() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    for (file, slug) in [("a.md", "zulu"), ("b.md", "mike"), ("c.md", "alpha")] {
        write(
            &root.join("content/blog").join(file),
            &format!("---\ntitle: {}\nslug: {}\ndate: 2024-03-01\n---\n", slug, slug),
        );
    }
    post(root, "d.md", "Newer", "2024-04-01");

    let site = Site::new(root).unwrap();
    let repo = ContentRepository::load(&site).unwrap();
    assert_eq!(repo.post_slugs(), vec!["d", "zulu", "mike", "alpha"]);
}

#[test]
fn test_rebuild_removes_stale_data() {
    let dir = sample_site();
    let root = dir.path();
    let site = Site::new(root).unwrap();
    site.build().unwrap();

    let public = root.join("public");
    assert!(public.join("blog/3.json").exists());
    assert!(public.join("posts/echo.json").exists());

    fs::remove_file(root.join("content/blog/echo.md")).unwrap();
    fs::remove_file(root.join("content/blog/delta.md")).unwrap();
    site.build().unwrap();

    assert!(public.join("blog/2.json").exists());
    assert!(!public.join("blog/3.json").exists());
    assert!(!public.join("posts/echo.json").exists());
    assert!(public.join("posts/alpha.json").exists());
}

#[test]
fn test_records_are_fully_built() {
    let dir = sample_site();
    let site = Site::new(dir.path()).unwrap();
    let repo = ContentRepository::load(&site).unwrap();

    let charlie = repo.post("charlie").unwrap();
    assert_eq!(charlie.title(), "Charlie");
    assert_eq!(charlie.date().pretty(), "May 20, 2024");
    assert_eq!(charlie.lang, "en");
    assert!(charlie.html.contains("<em>text</em>"));
    assert!(charlie.html.contains(r#"rel="noopener noreferrer""#));
    assert_eq!(
        charlie.filename(),
        site.post_dir.join("charlie.md").as_path()
    );

    let demo = repo.video("demo").unwrap();
    assert_eq!(demo.youtube, "def456");
    assert!(repo.post("missing").is_none());
}

#[test]
fn test_blog_pages() {
    let dir = sample_site();
    let site = Site::new(dir.path()).unwrap();
    let repo = ContentRepository::load(&site).unwrap();

    assert_eq!(repo.blog_page_count(), 3);

    let first = repo.blog_page(1);
    let titles: Vec<_> = first.items.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["Charlie", "Alpha"]);

    let last = repo.blog_page(3);
    assert_eq!(last.items.len(), 1);
    assert_eq!(last.items[0].slug, "delta");

    assert!(repo.blog_page(4).items.is_empty());
}

#[test]
fn test_build_writes_page_data() {
    let dir = sample_site();
    let site = Site::new(dir.path()).unwrap();
    site.build().unwrap();

    let public = dir.path().join("public");
    let posts: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(public.join("posts.json")).unwrap()).unwrap();
    assert_eq!(posts.as_array().unwrap().len(), 5);
    assert_eq!(posts[0]["slug"], "charlie");
    assert_eq!(posts[0]["url"], "/blog/charlie/");
    assert_eq!(posts[0]["datePretty"], "May 20, 2024");

    let single: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(public.join("posts/alpha.json")).unwrap())
            .unwrap();
    assert_eq!(single["title"], "Alpha");
    assert_eq!(single["date"], "2024-03-01T00:00:00.000Z");
    assert!(single.get("filename").is_none());

    let page2: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(public.join("blog/2.json")).unwrap()).unwrap();
    assert_eq!(page2["pagination"]["current"], 2);
    assert_eq!(page2["pagination"]["total"], 3);
    assert_eq!(page2["pagination"]["prevLink"], "/blog");
    assert_eq!(page2["pagination"]["nextLink"], "/blog/page/3");
    assert_eq!(page2["pagination"]["currentUrl"], "/blog/page/2");
    assert_eq!(page2["pagination"]["perPage"], 2);
    assert!(page2["pagination"].get("prev_link").is_none());
    assert_eq!(page2["posts"][0]["slug"], "bravo");

    assert!(public.join("blog/1.json").exists());
    assert!(public.join("blog/3.json").exists());
    assert!(!public.join("blog/4.json").exists());

    let videos: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(public.join("videos.json")).unwrap()).unwrap();
    assert_eq!(videos[0]["slug"], "demo");
    assert_eq!(videos[0]["featured"], true);
    assert_eq!(videos[1]["featured"], false);
    assert_eq!(
        videos[0]["watchUrl"],
        "https://www.youtube.com/watch?v=def456"
    );

    site.clean().unwrap();
    assert!(!public.exists());
}

#[test]
fn test_empty_site_builds() {
    let dir = tempfile::tempdir().unwrap();
    let site = Site::new(dir.path()).unwrap();
    let repo = ContentRepository::load(&site).unwrap();
    assert!(repo.posts().is_empty());
    assert_eq!(repo.blog_page_count(), 0);

    site.build().unwrap();
    let page1: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(dir.path().join("public/blog/1.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(page1["posts"].as_array().unwrap().len(), 0);
    assert_eq!(page1["pagination"]["total"], 0);
}

#[test]
fn test_all_document_errors_are_reported() {
    let dir = sample_site();
    let root = dir.path();
    write(
        &root.join("content/blog/nodate.md"),
        "---\ntitle: No date\n---\nBody",
    );
    write(
        &root.join("content/blog/broken.md"),
        "---\ntitle: Broken\ndate: 2024-01-01\nBody without closing",
    );
    write(
        &root.join("content/videos/noid.md"),
        "---\ntitle: No id\ndate: 2024-01-01\n---\n",
    );

    let site = Site::new(root).unwrap();
    let errors = match ContentRepository::load(&site) {
        Err(errors) => errors,
        Ok(_) => panic!("expected the build to fail"),
    };
    assert_eq!(errors.errors().len(), 3);

    let missing_date = errors
        .errors()
        .iter()
        .find(|e| e.path().ends_with("nodate.md"))
        .unwrap();
    assert!(matches!(
        missing_date,
        ContentError::MissingRequiredField { field: "date", .. }
    ));
    assert!(errors
        .errors()
        .iter()
        .any(|e| matches!(e, ContentError::MalformedFrontmatter { .. })));
    assert!(errors
        .errors()
        .iter()
        .any(|e| matches!(e, ContentError::MissingRequiredField { field: "youtube", .. })));

    let message = errors.to_string();
    assert!(message.contains("nodate.md"));
    assert!(message.contains("broken.md"));
    assert!(message.contains("noid.md"));

    assert!(site.build().is_err());
}

#[test]
fn test_zero_per_page_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir.path().join("_config.yml"), "per_page: 0\n");
    assert!(Site::new(dir.path()).is_err());
}
