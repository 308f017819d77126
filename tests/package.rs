use std::fs;
use std::path::PathBuf;
use std::process::Command;

use rstest::{fixture, rstest};
use underline_contrast::{fix_underline_contrast, Config, Error, Package};

const GRAPHIC_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<idPkg:Graphic xmlns:idPkg="http://ns.adobe.com/AdobeInDesign/idml/1.0/packaging" DOMVersion="18.0">
	<Color Self="Color/Black" Model="Process" Space="CMYK" ColorValue="0 0 0 100" Name="Black"/>
	<Color Self="Color/Paper" Model="Process" Space="CMYK" ColorValue="0 0 0 0" Name="Paper"/>
	<Color Self="Color/Gold" Model="Spot" Space="CMYK" ColorValue="0 20 90 10" Name="Gold"/>
</idPkg:Graphic>"#;

const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<idPkg:Styles xmlns:idPkg="http://ns.adobe.com/AdobeInDesign/idml/1.0/packaging" DOMVersion="18.0">
	<RootParagraphStyleGroup Self="u70">
		<ParagraphStyle Self="ParagraphStyle/$ID/[No paragraph style]" Name="$ID/[No paragraph style]"/>
		<ParagraphStyle Self="ParagraphStyle/Link" Name="Link" Underline="true" FillColor="Color/Black" UnderlineColor="Color/Black" UnderlineTint="100">
			<Properties>
				<BasedOn type="string">$ID/[No paragraph style]</BasedOn>
			</Properties>
		</ParagraphStyle>
		<ParagraphStyle Self="ParagraphStyle/Link Small" Name="Link Small">
			<Properties>
				<BasedOn type="object">ParagraphStyle/Link</BasedOn>
			</Properties>
		</ParagraphStyle>
		<ParagraphStyle Self="ParagraphStyle/Link Large" Name="Link Large">
			<Properties>
				<BasedOn type="object">ParagraphStyle/Link</BasedOn>
			</Properties>
		</ParagraphStyle>
		<ParagraphStyle Self="ParagraphStyle/Inverse" Name="Inverse" Underline="true" FillColor="Color/Paper" UnderlineColor="Color/Black"/>
		<ParagraphStyle Self="ParagraphStyle/Gold" Name="Gold" Underline="true" FillColor="Color/Black" UnderlineColor="Color/Gold"/>
	</RootParagraphStyleGroup>
</idPkg:Styles>"#;

struct Scratch(PathBuf);

impl Drop for Scratch {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}

fn scratch(name: &str) -> Scratch {
    let dir = std::env::temp_dir().join(format!(
        "underline-contrast-{}-{name}",
        std::process::id()
    ));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(dir.join("Resources")).unwrap();
    Scratch(dir)
}

#[fixture]
fn package_dir(#[default("package")] name: &str) -> Scratch {
    let dir = scratch(name);
    fs::write(dir.0.join("Resources/Graphic.xml"), GRAPHIC_XML).unwrap();
    fs::write(dir.0.join("Resources/Styles.xml"), STYLES_XML).unwrap();
    dir
}

#[rstest]
fn fixes_and_saves_shared_root(#[with("save")] package_dir: Scratch) {
    let mut package = Package::open(&package_dir.0).unwrap();
    let report = fix_underline_contrast(&mut package.styles, &Config::default()).unwrap();
    assert_eq!(
        report.to_string(),
        "Underline Contrast Fix Complete\n\n\
         Contrast Errors\n\
         Paragraph Style Name: Link Adjustment: 100% -> 51%\n"
    );
    assert_eq!(package.save().unwrap(), 2);

    let reopened = Package::open(&package_dir.0).unwrap();
    let tint = |name| reopened.styles.record(name).unwrap().underline_tint;
    assert_eq!(tint("Link"), Some(51.0));
    assert_eq!(tint("Inverse"), Some(100.0));
    assert_eq!(tint("Link Small"), None);
    assert_eq!(tint("Link Large"), None);
    assert_eq!(tint("Gold"), None);
    assert!(!package_dir.0.join("Resources/Styles.xml.tmp").exists());
}

#[rstest]
fn second_run_changes_nothing(#[with("rerun")] package_dir: Scratch) {
    let mut package = Package::open(&package_dir.0).unwrap();
    fix_underline_contrast(&mut package.styles, &Config::default()).unwrap();
    package.save().unwrap();

    let mut package = Package::open(&package_dir.0).unwrap();
    let report = fix_underline_contrast(&mut package.styles, &Config::default()).unwrap();
    assert!(report.adjustments.is_empty());
}

#[test]
fn missing_document_is_reported() {
    let dir = scratch("missing");
    assert!(matches!(Package::open(&dir.0), Err(Error::NoDocument(_))));
}

#[rstest]
fn cli_dry_run_leaves_package_alone(#[with("cli")] package_dir: Scratch) {
    let output = Command::new(env!("CARGO_BIN_EXE_underline-contrast"))
        .arg("--input")
        .arg(&package_dir.0)
        .arg("--dry-run")
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Paragraph Style Name: Link Adjustment: 100% -> 51%"));
    let styles = fs::read_to_string(package_dir.0.join("Resources/Styles.xml")).unwrap();
    assert_eq!(styles, STYLES_XML);
}

#[test]
fn cli_refuses_missing_document() {
    let dir = scratch("cli-missing");
    let output = Command::new(env!("CARGO_BIN_EXE_underline-contrast"))
        .arg("--input")
        .arg(&dir.0)
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Please open a document first"));
}
