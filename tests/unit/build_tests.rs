use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crass::build::{BuildOptions, Builder};
use crass::core::{CurriculumVitae, DocumentFormat, SlugRules, VibesFile, resolve_slugs};
use crass::render::{HtmlRenderer, HtmlToPdf};
use crass::test_utils::fixtures::{SAMPLE_CV, UnitTestFixture};
use crass::{CrassError, Result};

/// Records conversions and writes a marker file instead of a real PDF.
#[derive(Default)]
struct RecordingPdf {
    calls: Mutex<Vec<(PathBuf, PathBuf)>>,
    fail: bool,
}

impl HtmlToPdf for RecordingPdf {
    fn convert(&self, html: &str, output: &Path, workdir: &Path) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push((output.to_path_buf(), workdir.to_path_buf()));
        if self.fail {
            return Err(CrassError::Render("converter exploded".to_string()));
        }
        std::fs::write(output, format!("PDF({} bytes)", html.len()))?;
        Ok(())
    }
}

fn theme_fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/theme")
}

fn resolved_cv() -> CurriculumVitae {
    let cv = CurriculumVitae::parse(SAMPLE_CV, DocumentFormat::Yaml).unwrap();
    resolve_slugs(&cv, &SlugRules::default()).unwrap()
}

fn vibes(fixture: &UnitTestFixture, yaml: &str) -> VibesFile {
    VibesFile::load(&fixture.create_vibes(yaml)).unwrap()
}

#[test]
fn themed_vibe_writes_html_pdf_and_includes() {
    let fixture = UnitTestFixture::new();
    let file = vibes(
        &fixture,
        &format!(
            "- name: Print Ready\n  theme: {}\n  output: [html, pdf]\n  filter: {{basics: true}}\n",
            theme_fixture().display()
        ),
    );
    let cv = resolved_cv();
    let pdf = RecordingPdf::default();
    let out_dir = fixture.data_path.join("dist");
    let options = BuildOptions {
        out_dir: out_dir.clone(),
        default_theme: None,
    };

    let report = Builder::new(&cv, &HtmlRenderer::new(), &pdf, options).build_vibe(&file.vibes()[0]);

    assert!(report.is_ok(), "{:?}", report.errors);
    assert_eq!(report.written.len(), 2);
    let html = std::fs::read_to_string(out_dir.join("print-ready.html")).unwrap();
    assert!(html.contains("<title>Themed CV</title>"));
    assert!(html.contains("href=\"style.css\""));
    assert!(!html.contains("Acme"));
    assert!(out_dir.join("print-ready.pdf").exists());
    assert!(out_dir.join("logo.txt").exists());

    let calls = pdf.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].1, out_dir);
}

#[test]
fn failing_converter_keeps_html() {
    let fixture = UnitTestFixture::new();
    let file = vibes(&fixture, "- name: cv\n  output: [pdf, html]\n");
    let cv = resolved_cv();
    let pdf = RecordingPdf {
        fail: true,
        ..RecordingPdf::default()
    };
    let options = BuildOptions {
        out_dir: fixture.data_path.join("out"),
        default_theme: None,
    };

    let report = Builder::new(&cv, &HtmlRenderer::new(), &pdf, options).build_vibe(&file.vibes()[0]);

    assert!(!report.is_ok());
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].contains("converter exploded"));
    assert_eq!(report.written.len(), 1);
    assert!(fixture.data_path.join("out/cv.html").exists());
}

#[test]
fn missing_theme_fails_only_that_vibe() {
    let fixture = UnitTestFixture::new();
    let file = vibes(
        &fixture,
        "- name: Lost\n  theme: no-such-theme\n  output: [html]\n- name: Found\n  output: [html]\n",
    );
    let cv = resolved_cv();
    let pdf = RecordingPdf::default();
    let options = BuildOptions {
        out_dir: fixture.data_path.join("out"),
        default_theme: None,
    };
    let selected = file.select(&[]).unwrap();

    let report = Builder::new(&cv, &HtmlRenderer::new(), &pdf, options).build(&selected);

    assert_eq!(report.failed(), 1);
    assert_eq!(report.written(), 1);
    assert!(report.vibes[0].errors[0].contains("no-such-theme"));
    assert!(fixture.data_path.join("out/found.html").exists());
}

#[test]
fn explicit_output_path_and_default_theme() {
    let fixture = UnitTestFixture::new();
    let file = vibes(&fixture, "- name: Web\n  output: [site/index.html]\n");
    let cv = resolved_cv();
    let pdf = RecordingPdf::default();
    let options = BuildOptions {
        out_dir: fixture.data_path.join("unused"),
        default_theme: Some(theme_fixture()),
    };

    let report = Builder::new(&cv, &HtmlRenderer::new(), &pdf, options).build_vibe(&file.vibes()[0]);

    assert!(report.is_ok(), "{:?}", report.errors);
    let html = std::fs::read_to_string(fixture.data_path.join("site/index.html")).unwrap();
    assert!(html.contains("Themed CV"));
    assert!(fixture.data_path.join("site/logo.txt").exists());
    assert!(!fixture.data_path.join("unused").exists());
}

#[test]
fn vibes_with_same_stem_get_distinct_files() {
    let fixture = UnitTestFixture::new();
    let file = vibes(
        &fixture,
        "- name: Short CV\n  output: [html]\n  filter: {work: [acme-co]}\n- name: short-cv\n  output: [html]\n  filter: {work: [initech]}\n",
    );
    let cv = resolved_cv();
    let pdf = RecordingPdf::default();
    let out_dir = fixture.data_path.join("out");
    let options = BuildOptions {
        out_dir: out_dir.clone(),
        default_theme: None,
    };
    let selected = file.select(&[]).unwrap();

    let report = Builder::new(&cv, &HtmlRenderer::new(), &pdf, options).build(&selected);

    assert_eq!(report.failed(), 0);
    assert_eq!(report.vibes[0].written[0].path, out_dir.join("short-cv.html"));
    assert_eq!(report.vibes[1].written[0].path, out_dir.join("short-cv-2.html"));
    assert!(report.vibes[1].warnings.iter().any(|w| w.contains("short-cv-2")));

    let first = std::fs::read_to_string(out_dir.join("short-cv.html")).unwrap();
    let second = std::fs::read_to_string(out_dir.join("short-cv-2.html")).unwrap();
    assert!(first.contains("Acme Co") && !first.contains("Initech"));
    assert!(second.contains("Initech") && !second.contains("Acme Co"));
}

#[test]
fn explicit_path_is_written_once_per_build() {
    let fixture = UnitTestFixture::new();
    let file = vibes(
        &fixture,
        "- name: One\n  output: [site/cv.html]\n  filter: {work: [acme-co]}\n- name: Two\n  output: [site/cv.html, html]\n  filter: {work: [initech]}\n",
    );
    let cv = resolved_cv();
    let pdf = RecordingPdf::default();
    let out_dir = fixture.data_path.join("out");
    let options = BuildOptions {
        out_dir: out_dir.clone(),
        default_theme: None,
    };
    let selected = file.select(&[]).unwrap();

    let report = Builder::new(&cv, &HtmlRenderer::new(), &pdf, options).build(&selected);

    assert_eq!(report.failed(), 1);
    assert!(report.vibes[0].is_ok());
    assert!(report.vibes[1].errors[0].contains("already produced"));
    assert_eq!(report.vibes[1].written.len(), 1);
    assert!(out_dir.join("two.html").exists());

    let kept = std::fs::read_to_string(fixture.data_path.join("site/cv.html")).unwrap();
    assert!(kept.contains("Acme Co"));
    assert!(!kept.contains("Initech"));
}
