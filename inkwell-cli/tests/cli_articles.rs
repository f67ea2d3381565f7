use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write_site(root: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let articles = root.join("articles");
    fs::create_dir_all(&articles)?;

    fs::write(
        root.join("inkwell.yml"),
        r#"
site:
  title: "Test Blog"
  author: "Tester"
  url: "https://example.com"
"#,
    )?;

    fs::write(
        articles.join("index.yaml"),
        r#"
- date: 2012-10-22
  title: First blog post
  summary: Some kind of introductory blog post
  file_name: first_post.md
- date: 2012-10-25
  title: Second blog post
  summary: Some kind of sophmore blog post
  file_name: second_post.md
- date: 2012-11-01
  title: Unfinished
  summary: Not yet
  file_name: unfinished.md
  draft: true
"#,
    )?;

    fs::write(articles.join("first_post.md"), "# oh hai!\n\nsome content\n")?;
    fs::write(
        articles.join("second_post.md"),
        "He said \"or something\".\n\n```ruby\nputs 'hi'\n```\n",
    )?;
    fs::write(articles.join("unfinished.md"), "draft text\n")?;
    Ok(())
}

#[test]
fn list_json_orders_published_articles() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    write_site(dir.path())?;

    #[allow(deprecated)]
    let assert = Command::cargo_bin("inkwell")?
        .current_dir(dir.path())
        .args(["list", "--json"])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone())?;
    let value: Value = serde_json::from_str(&stdout)?;
    let arr = value.as_array().expect("json array");
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[0]["permalink"], "/2012/10/second-blog-post.html");
    assert_eq!(arr[1]["permalink"], "/2012/10/first-blog-post.html");
    assert_eq!(arr[0]["date"], "2012-10-25");
    Ok(())
}

#[test]
fn list_all_includes_drafts() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    write_site(dir.path())?;

    #[allow(deprecated)]
    Command::cargo_bin("inkwell")?
        .current_dir(dir.path())
        .args(["list", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/2012/11/unfinished.html"))
        .stdout(predicate::str::contains("[draft]"));
    Ok(())
}

#[test]
fn show_renders_article() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    write_site(dir.path())?;

    #[allow(deprecated)]
    Command::cargo_bin("inkwell")?
        .current_dir(dir.path())
        .args(["show", "/2012/10/second-blog-post.html"])
        .assert()
        .success()
        .stdout(predicate::str::contains("“or something”"))
        .stdout(predicate::str::contains("class=\"highlight\""));
    Ok(())
}

#[test]
fn show_unknown_permalink_fails() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    write_site(dir.path())?;

    #[allow(deprecated)]
    Command::cargo_bin("inkwell")?
        .current_dir(dir.path())
        .args(["show", "pretend.html"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Article not found: /pretend.html"));
    Ok(())
}

#[test]
fn feed_lists_published_entries() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    write_site(dir.path())?;

    #[allow(deprecated)]
    let assert = Command::cargo_bin("inkwell")?
        .current_dir(dir.path())
        .arg("feed")
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone())?;
    assert_eq!(stdout.matches("<entry>").count(), 2);
    assert!(stdout.contains("<id>https://example.com/2012/10/second-blog-post.html</id>"));
    assert!(stdout.contains("<updated>2012-10-25T00:00:00Z</updated>"));
    assert!(!stdout.contains("unfinished"));
    Ok(())
}

#[test]
fn build_writes_articles_and_feed() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    write_site(dir.path())?;

    #[allow(deprecated)]
    Command::cargo_bin("inkwell")?
        .current_dir(dir.path())
        .arg("build")
        .assert()
        .success();

    let public = dir.path().join("public");
    let first = fs::read_to_string(public.join("2012/10/first-blog-post.html"))?;
    assert_eq!(first, "<h1>oh hai!</h1>\n<p>some content</p>\n");
    assert!(public.join("index.atom").exists());
    assert!(!public.join("2012/11/unfinished.html").exists());
    Ok(())
}

#[test]
fn build_refuses_permalink_outside_output() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let site = dir.path().join("site");
    write_site(&site)?;
    fs::write(
        site.join("articles/index.yaml"),
        r#"
- date: 2012-10-22
  title: Escaping
  file_name: first_post.md
  permalink: /../x.html
"#,
    )?;

    #[allow(deprecated)]
    Command::cargo_bin("inkwell")?
        .current_dir(&site)
        .arg("build")
        .assert()
        .failure()
        .stderr(predicate::str::contains("/../x.html"));

    assert!(!site.join("x.html").exists());
    assert!(!site.join("public/../x.html").exists());
    Ok(())
}

#[test]
fn build_refuses_feed_path_outside_output() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let site = dir.path().join("site");
    write_site(&site)?;
    fs::write(
        site.join("inkwell.yml"),
        r#"
site:
  title: "Test Blog"
  author: "Tester"
  url: "https://example.com"
  feed_path: "../../feed.atom"
"#,
    )?;

    #[allow(deprecated)]
    Command::cargo_bin("inkwell")?
        .current_dir(&site)
        .arg("build")
        .assert()
        .failure()
        .stderr(predicate::str::contains("../../feed.atom"));

    assert!(!dir.path().join("feed.atom").exists());
    Ok(())
}
