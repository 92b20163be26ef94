#![allow(dead_code, clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use lopdf::{Document as PdfDocument, Object, ObjectId, Stream, StringFormat, dictionary};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;
use tempfile::TempDir;

pub const CMD_TIMEOUT: Duration = Duration::from_secs(15);

fn data_dir() -> &'static Path {
    static DATA_DIR: OnceLock<TempDir> = OnceLock::new();
    DATA_DIR
        .get_or_init(|| tempfile::tempdir().expect("failed to create data dir for tests"))
        .path()
}

/// Create a configured `folio` command isolated from the user's data and config.
pub fn folio_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("folio"));
    cmd.timeout(CMD_TIMEOUT);
    let dir = data_dir();
    cmd.env("FOLIO_DATA_DIR", dir);
    cmd.env_remove("FOLIO_CONFIG");
    cmd.env_remove("FOLIO_OUTPUT_FORMAT");
    cmd.env("FOLIO_CONFIG_DIR", dir);
    cmd.env("NO_COLOR", "1");
    cmd
}

/// Write a PDF with one line of text per page and a flat outline of
/// `(title, zero-based page index)` entries.
pub fn write_pdf(dir: &Path, name: &str, pages: &[&str], outline: &[(&str, usize)]) -> PathBuf {
    let mut doc = PdfDocument::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids = Vec::new();
    let mut page_ids = Vec::new();
    for text in pages {
        let content = format!("BT /F1 12 Tf 72 712 Td ({text}) Tj ET");
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
        page_ids.push(page_id);
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => i64::try_from(pages.len()).unwrap(),
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );

    let mut catalog = dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    };

    if !outline.is_empty() {
        let outlines_id = doc.new_object_id();
        let item_ids: Vec<ObjectId> = outline.iter().map(|_| doc.new_object_id()).collect();
        for (i, (title, page)) in outline.iter().enumerate() {
            let mut item = dictionary! {
                "Title" => Object::String(title.as_bytes().to_vec(), StringFormat::Literal),
                "Parent" => outlines_id,
                "Dest" => vec![Object::Reference(page_ids[*page]), "Fit".into()],
            };
            if let Some(next) = item_ids.get(i + 1) {
                item.set("Next", *next);
            }
            doc.objects.insert(item_ids[i], Object::Dictionary(item));
        }
        doc.objects.insert(
            outlines_id,
            Object::Dictionary(dictionary! {
                "Type" => "Outlines",
                "First" => item_ids[0],
                "Last" => item_ids[item_ids.len() - 1],
            }),
        );
        catalog.set("Outlines", outlines_id);
    }

    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", catalog_id);
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal("Widget Guide"),
        "Author" => Object::string_literal("Folio Tests"),
    });
    doc.trailer.set("Info", info_id);

    let path = dir.join(name);
    doc.save(&path).expect("failed to write test pdf");
    path
}

/// A three-page guide with one outline entry per page.
pub fn guide_pdf(dir: &Path) -> PathBuf {
    write_pdf(
        dir,
        "guide.pdf",
        &[
            "Welcome to the guide",
            "Install the widget with care",
            "Use the widget daily",
        ],
        &[("Introduction", 0), ("Installation", 1), ("Usage", 2)],
    )
}
