//! Script interpreter driven end to end with the real codec backend.

use imgscript::config::parse_config;
use imgscript::imaging::{ImageBackend, Pixel, RustBackend};
use imgscript::registry::Registry;
use imgscript::script::Session;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn fixture() -> String {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures/sample.ppm")
        .display()
        .to_string()
}

fn run(script: &str) -> (Session, String) {
    let mut session = Session::new(Registry::new());
    let mut out = Vec::new();
    session.run(script.as_bytes(), &mut out, false).unwrap();
    (session, String::from_utf8(out).unwrap())
}

#[test]
fn script_transforms_and_saves() {
    let tmp = TempDir::new().unwrap();
    let out_ppm = tmp.path().join("bright.ppm");
    let out_png = tmp.path().join("flip.png");
    let script = format!(
        "# brighten, flip, save in two formats\n\
         load {} koala\n\
         brighten 10 koala koala-bright\n\
         horizontal-flip koala koala-flip\n\
         save {} koala-bright\n\
         save {} koala-flip\n",
        fixture(),
        out_ppm.display(),
        out_png.display()
    );
    let (_, out) = run(&script);
    assert!(!out.contains("Error"), "{out}");

    let bright = RustBackend::new().decode(&out_ppm).unwrap();
    assert_eq!(bright.get_pixel_at(1, 0).unwrap(), Pixel::rgb(21, 22, 23));

    let flip = RustBackend::new().decode(&out_png).unwrap();
    assert_eq!(flip.get_pixel_at(0, 0).unwrap(), Pixel::rgb(21, 22, 23));
}

#[test]
fn saved_ppm_has_header_and_one_pixel_per_line() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("out.ppm");
    run(&format!("load {} s\nsave {} s\n", fixture(), out.display()));
    let text = fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(&lines[..4], &["P3", "# Created by imgscript", "3 3", "255"]);
    assert_eq!(lines.len(), 4 + 9);
    assert_eq!(lines[4], "1 2 3");
}

#[test]
fn failures_are_reported_and_execution_continues() {
    let script = format!(
        "load {} s\nemboss s t\nblur nope t\nred-component s r\nshow r\n",
        fixture()
    );
    let (session, out) = run(&script);
    assert!(out.contains("Error: Undefined instruction: emboss"), "{out}");
    assert!(out.contains("Error: Unknown image 'nope'"), "{out}");
    assert!(session.registry().contains("r"));
    assert!(out.contains("3 3\n(R:1, G:1, B:1) (R:4, G:4, B:4) (R:7, G:7, B:7)\n"), "{out}");
}

#[test]
fn load_of_missing_file_is_reported() {
    let (session, out) = run("load /nonexistent/dir/a.ppm a\nmenu\n");
    assert!(out.starts_with("Error: IO error"), "{out}");
    assert!(out.contains("Supported operations:"));
    assert!(session.registry().is_empty());
}

#[test]
fn configured_session_uses_clamped_sepia() {
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("white.ppm");
    fs::write(&src, "P3\n1 1\n255\n200 200 200\n").unwrap();

    let config = parse_config("[filters]\nsepia_overflow = \"clamp\"\n").unwrap();
    let mut session = Session::new(config.registry());
    let mut out = Vec::new();
    session
        .run(
            format!("load {} w\nsepia w s\n", src.display()).as_bytes(),
            &mut out,
            false,
        )
        .unwrap();

    let toned = session.registry().get_image("s").unwrap();
    assert_eq!(toned.get_pixel_at(0, 0).unwrap(), Pixel::rgb(255, 240, 187));
}
