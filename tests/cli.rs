//! End-to-end tests driving the `room-gallery` binary against a temporary
//! site directory.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run(root: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_room-gallery"))
        .arg("--root")
        .arg(root)
        .args(args)
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn write_png(path: &Path, width: u32, height: u32) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    image::RgbImage::new(width, height).save(path).unwrap();
}

fn site() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let projects = tmp.path().join("projects");
    write_png(&projects.join("kitchen/a.png"), 300, 200);
    write_png(&projects.join("kitchen/b.png"), 300, 450);
    write_png(&projects.join("kitchen/c.png"), 300, 300);
    fs::write(projects.join("kitchen/notes.txt"), "not an image").unwrap();
    write_png(&projects.join("premium-living/lounge.png"), 200, 200);
    fs::write(projects.join("premium-living/broken.jpg"), "fake image").unwrap();
    tmp
}

#[test]
fn build_without_projects_succeeds() {
    let tmp = TempDir::new().unwrap();
    let output = run(tmp.path(), &["build"]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("No projects directory"));
    assert!(!tmp.path().join("data").exists());
}

#[test]
fn build_writes_manifests() {
    let tmp = site();
    let output = run(tmp.path(), &["build"]);

    assert!(output.status.success());
    let kitchen = fs::read_to_string(tmp.path().join("data/kitchen.json")).unwrap();
    let files: Vec<String> = serde_json::from_str(&kitchen).unwrap();
    assert_eq!(files, vec!["a.png", "b.png", "c.png"]);
    assert!(stdout(&output).contains("Generated 2 manifests, 5 images"));
}

#[test]
fn build_is_idempotent() {
    let tmp = site();
    run(tmp.path(), &["build"]);
    let first = fs::read(tmp.path().join("data/premium-living.json")).unwrap();
    run(tmp.path(), &["build"]);
    let second = fs::read(tmp.path().join("data/premium-living.json")).unwrap();
    assert_eq!(first, second);
}

#[test]
fn build_honors_config_paths() {
    let tmp = site();
    fs::write(
        tmp.path().join("gallery.toml"),
        "[paths]\ndata = \"public/data\"\n",
    )
    .unwrap();

    let output = run(tmp.path(), &["build"]);

    assert!(output.status.success());
    assert!(tmp.path().join("public/data/kitchen.json").exists());
}

#[test]
fn invalid_config_fails() {
    let tmp = site();
    fs::write(tmp.path().join("gallery.toml"), "[loading]\nhead_batch = 0\n").unwrap();

    let output = run(tmp.path(), &["build"]);
    assert!(!output.status.success());
}

#[test]
fn preview_lays_out_category() {
    let tmp = site();
    run(tmp.path(), &["build"]);

    let output = run(tmp.path(), &["preview", "/kitchen.html", "--columns", "2"]);

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Page /kitchen.html → kitchen"));
    assert!(text.contains("kitchen (2 columns, 3 images)"));
    assert!(text.contains("001 /projects/kitchen/a.png [revealed]"));
    assert!(!text.contains("[queued]"));
}

#[test]
fn preview_premium_drops_broken_images() {
    let tmp = site();
    run(tmp.path(), &["build"]);

    let output = run(tmp.path(), &["preview", "/premium.html"]);

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("premium-living (3 columns, 1 image)"));
    assert!(!text.contains("broken.jpg"));
    // Premium categories without a manifest fail on their own
    assert!(text.contains("premium-kitchen: manifest fetch failed"));
}

#[test]
fn preview_unknown_page_loads_nothing() {
    let tmp = TempDir::new().unwrap();
    let output = run(tmp.path(), &["preview", "/contact.html"]);

    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "Page /contact.html → no gallery");
}

#[test]
fn resolve_lists_premium_categories() {
    let tmp = TempDir::new().unwrap();
    let output = run(tmp.path(), &["resolve", "/premium.html"]);

    let text = stdout(&output);
    assert_eq!(text.lines().count(), 7);
    assert!(text.contains("premium-furniture → /data/premium-furniture.json"));
}

#[test]
fn gen_config_prints_stock_file() {
    let tmp = TempDir::new().unwrap();
    let output = run(tmp.path(), &["gen-config"]);

    let text = stdout(&output);
    assert!(text.contains("[layout]"));
    assert!(text.contains("head_batch = 10"));
}
